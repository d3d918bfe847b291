use std::io::Read;
use std::path::Path;

use log::{debug, info};
use seq_io::fasta::{Reader, Record};

use crate::errors::TemplateError;
use crate::models::{Template, TemplateStore};
use crate::utils::get_dynamic_reader_w_stdin;

/// Loads every record of a FASTA file into a `TemplateStore`.
///
/// Handles plain and gzipped (`.gz`) files, and `-` for stdin. Sequence case
/// is preserved; see [`TemplateStore::to_uppercase`].
///
/// # Arguments
///
/// * `file_path` - path to the FASTA file, or `-` for stdin
///
/// # Errors
///
/// This function will return an error if:
/// - The file cannot be opened or read
/// - Sequence data appears before the first header
/// - Two records share a name
/// - The file holds no records
pub fn load_templates<P: AsRef<Path>>(file_path: P) -> Result<TemplateStore, TemplateError> {
    let file_path = file_path.as_ref();
    let source = file_path.display().to_string();

    info!("Loading FASTA file: {}", source);

    let reader = get_dynamic_reader_w_stdin(&source)
        .map_err(|e| TemplateError::FileReadError(format!("{:#}", e)))?;
    let store = read_templates(reader, &source)?;

    info!(
        "Loaded {} template(s), {} bp total",
        store.len(),
        store.total_length()
    );

    Ok(store)
}

/// Parses FASTA records from any reader.
///
/// The record name is the header text up to the first whitespace. `source`
/// is only used in error messages.
pub fn read_templates<R: Read>(reader: R, source: &str) -> Result<TemplateStore, TemplateError> {
    let mut fasta_reader = Reader::new(reader);
    let mut store = TemplateStore::new();

    while let Some(record) = fasta_reader.next() {
        let record = record
            .map_err(|e| TemplateError::InvalidFasta(format!("{}: {}", source, e)))?;
        let name = record.id().map_err(|e| {
            TemplateError::InvalidFasta(format!(
                "{}: record #{} has an invalid name: {}",
                source,
                store.len() + 1,
                e
            ))
        })?;

        let mut sequence = String::new();
        for seq_line in record.seq_lines() {
            let seq_line = std::str::from_utf8(seq_line).map_err(|e| {
                TemplateError::InvalidFasta(format!("{}: sequence of {}: {}", source, name, e))
            })?;
            sequence.push_str(seq_line.trim_end());
        }

        debug!("Read template {} ({} bp)", name, sequence.len());
        store.insert(Template::new(name, sequence))?;
    }

    if store.is_empty() {
        return Err(TemplateError::EmptyTemplateSet(source.to_string()));
    }

    Ok(store)
}
