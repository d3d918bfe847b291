use thiserror::Error;

#[derive(Error, Debug)]
pub enum PcrError {
    #[error("At least one primer is required")]
    NoPrimers,

    #[error("Primer #{0} is empty")]
    EmptyPrimer(usize),

    #[error("At least one template sequence is required")]
    NoTemplates,

    #[error("PCR simulation was cancelled")]
    Cancelled,

    #[error("Worker thread panicked: {0}")]
    WorkerPanicked(String),

    #[error("Failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Failed to deliver amplicon to output: {0}")]
    Sink(String),
}
