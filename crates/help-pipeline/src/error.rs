/// Errors raised while driving the indexing pipeline.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("index store failure: {0}")]
    Index(#[from] help_index::IndexError),

    #[error("background batch-commit task panicked or was cancelled: {0}")]
    Join(#[from] tokio::task::JoinError),
}
