/// Errors raised while decompressing a ZIP entry.
///
/// Unsupported compression methods are not an error variant here — the
/// caller (`hbk-container`) filters entries down to methods 0 and 8 before
/// ever calling [`crate::decompress`], skipping anything else silently.
#[derive(Debug, thiserror::Error)]
pub enum ZipError {
    /// Raw DEFLATE decoding failed partway through.
    #[error("deflate decoding failed for entry {name:?}: {source}")]
    Deflate {
        name: String,
        source: std::io::Error,
    },
}
