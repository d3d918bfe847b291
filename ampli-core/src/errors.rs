use thiserror::Error;

#[derive(Error, Debug)]
pub enum TemplateError {
    #[error("Can't read file: {0}")]
    FileReadError(String),

    #[error("No template sequences found in: {0}")]
    EmptyTemplateSet(String),

    #[error("Template name appears more than once: {0}")]
    DuplicateName(String),

    #[error("Invalid FASTA input: {0}")]
    InvalidFasta(String),
}
