/// Errors raised by the persistent topic index.
#[derive(Debug, thiserror::Error)]
pub enum IndexError {
    #[error("failed to create index directory {path}: {source}")]
    CreateDir {
        path: String,
        source: std::io::Error,
    },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
