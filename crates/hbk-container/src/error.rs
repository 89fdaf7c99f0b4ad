/// Errors raised while opening or reading an `.hbk` container.
#[derive(Debug, thiserror::Error)]
pub enum ContainerError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("block format error: {0}")]
    Format(#[from] hbk_format::FormatError),
}
