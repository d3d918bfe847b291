use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use ampli_pcr::consts::{DEFAULT_CHANNEL_CAPACITY, DEFAULT_MAX_PRODUCT_LENGTH};

///
/// Settings for one `simulatepcr` run. Loaded from a TOML file with
/// `--config`; command line flags override what the file sets.
///
/// ```toml
/// primers = ["ACGTACGT"]
/// forward_primers = ["AAACCC"]
/// reverse_primers = ["GGGTTT"]
/// max_length = 2000
/// ignore_case = true
/// sort = false
/// channel_capacity = 4096
/// threads = 8
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulatePcrConfig {
    pub primers: Vec<String>,
    pub forward_primers: Vec<String>,
    pub reverse_primers: Vec<String>,
    pub max_length: usize,
    pub ignore_case: bool,
    pub sort: bool,
    pub channel_capacity: usize,
    /// 0 processes one template per available core
    pub threads: usize,
}

impl Default for SimulatePcrConfig {
    fn default() -> Self {
        SimulatePcrConfig {
            primers: Vec::new(),
            forward_primers: Vec::new(),
            reverse_primers: Vec::new(),
            max_length: DEFAULT_MAX_PRODUCT_LENGTH,
            ignore_case: false,
            sort: false,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            threads: 0,
        }
    }
}

impl SimulatePcrConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Invalid simulatepcr config")
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        Self::from_toml_str(&contents).with_context(|| format!("In config file: {:?}", path))
    }

    pub fn has_primers(&self) -> bool {
        !(self.primers.is_empty() && self.forward_primers.is_empty() && self.reverse_primers.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn test_full_config() {
        let config = SimulatePcrConfig::from_toml_str(
            r#"
            primers = ["ACGT"]
            forward_primers = ["AAA"]
            reverse_primers = ["CCC"]
            max_length = 1000
            ignore_case = true
            sort = true
            channel_capacity = 8
            threads = 2
            "#,
        )
        .unwrap();

        assert_eq!(
            config,
            SimulatePcrConfig {
                primers: vec!["ACGT".to_string()],
                forward_primers: vec!["AAA".to_string()],
                reverse_primers: vec!["CCC".to_string()],
                max_length: 1000,
                ignore_case: true,
                sort: true,
                channel_capacity: 8,
                threads: 2,
            }
        );
        assert!(config.has_primers());
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config = SimulatePcrConfig::from_toml_str("max_length = 50").unwrap();
        assert_eq!(config.max_length, 50);
        assert_eq!(config.channel_capacity, DEFAULT_CHANNEL_CAPACITY);
        assert!(!config.has_primers());
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        assert!(SimulatePcrConfig::from_toml_str("max_lenght = 50").is_err());
    }
}
