use std::fmt::{self, Display};

use fxhash::FxHashMap as HashMap;

use crate::errors::TemplateError;

///
/// One named sequence a primer can bind to, e.g. a chromosome or contig
///
#[derive(Eq, PartialEq, Debug, Clone)]
pub struct Template {
    pub name: String,
    pub sequence: String,
}

impl Template {
    pub fn new(name: impl Into<String>, sequence: impl Into<String>) -> Self {
        Template {
            name: name.into(),
            sequence: sequence.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }
}

impl Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} bp)", self.name, self.len())
    }
}

///
/// Read-only collection of templates, kept in load order with a name index.
///
#[derive(Debug, Clone, Default)]
pub struct TemplateStore {
    templates: Vec<Template>,
    index: HashMap<String, usize>,
}

impl TemplateStore {
    pub fn new() -> Self {
        Self::default()
    }

    ///
    /// Add a template to the store.
    ///
    /// # Errors
    /// Returns `TemplateError::DuplicateName` if a template with the same
    /// name was already added.
    pub fn insert(&mut self, template: Template) -> Result<(), TemplateError> {
        if self.index.contains_key(&template.name) {
            return Err(TemplateError::DuplicateName(template.name));
        }
        self.index
            .insert(template.name.clone(), self.templates.len());
        self.templates.push(template);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Template> {
        self.index.get(name).map(|&idx| &self.templates[idx])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Template> {
        self.templates.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Total number of bases across all templates
    pub fn total_length(&self) -> usize {
        self.templates.iter().map(Template::len).sum()
    }

    ///
    /// Uppercase every template sequence in place. Matching is exact, so
    /// callers that want case-insensitive binding normalize both templates
    /// and primers.
    ///
    pub fn to_uppercase(mut self) -> TemplateStore {
        for template in &mut self.templates {
            template.sequence.make_ascii_uppercase();
        }
        self
    }
}

impl TryFrom<Vec<Template>> for TemplateStore {
    type Error = TemplateError;

    fn try_from(value: Vec<Template>) -> Result<Self, Self::Error> {
        let mut store = TemplateStore::new();
        for template in value {
            store.insert(template)?;
        }
        Ok(store)
    }
}

impl<'a> IntoIterator for &'a TemplateStore {
    type Item = &'a Template;
    type IntoIter = std::slice::Iter<'a, Template>;

    fn into_iter(self) -> Self::IntoIter {
        self.templates.iter()
    }
}
