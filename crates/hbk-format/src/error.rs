/// Errors raised while parsing the `.hbk` block structure.
///
/// There is no write-side error variant — this crate has no `write_block`
/// counterpart to `read_block` (no write path back to the container).
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// A block header was malformed: bad hex framing, an inconsistent
    /// `payload_size`/`block_size` pair, or a payload that runs past the
    /// end of the buffer.
    #[error("malformed block header at offset {offset}: {reason}")]
    Malformed { offset: u64, reason: String },

    /// A block chain's `next_raw` pointer looped back to an offset already
    /// visited, which would otherwise read forever.
    #[error("block chain at offset {offset} is cyclic")]
    Cycle { offset: u64 },

    /// The concatenated entity exceeded the 1 GiB safety bound.
    #[error("entity exceeded the 1 GiB concatenation bound")]
    EntityTooLarge,
}
