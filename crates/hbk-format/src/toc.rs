use crate::block::read_block;
use crate::error::FormatError;

/// Raw byte offset of the block holding the table of contents.
pub const TOC_BLOCK_OFFSET: u64 = 16;

/// Size of one TOC record: two little-endian `i32` addresses plus four
/// reserved bytes.
const ENTRY_SIZE: usize = 12;

/// One entry in the top-level entity directory: where to find an entity's
/// name header and where its body chain begins.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TocEntry {
    pub header_addr: i32,
    pub body_addr: i32,
}

impl TocEntry {
    fn is_zeroed(self) -> bool {
        self.header_addr == 0 && self.body_addr == 0
    }
}

/// Parse the table of contents: the first block's payload, split into
/// 12-byte records, with trailing zeroed records dropped.
///
/// # Errors
///
/// Returns [`FormatError::Malformed`] if the TOC block header itself can't
/// be parsed.
pub fn parse_toc(buf: &[u8]) -> Result<Vec<TocEntry>, FormatError> {
    let header = read_block(buf, TOC_BLOCK_OFFSET)?;
    let payload = &buf[header.data_start..header.data_start + header.payload_size as usize];

    let mut entries: Vec<TocEntry> = payload
        .chunks_exact(ENTRY_SIZE)
        .map(|chunk| TocEntry {
            header_addr: i32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
            body_addr: i32::from_le_bytes([chunk[4], chunk[5], chunk[6], chunk[7]]),
        })
        .collect();

    while matches!(entries.last(), Some(entry) if entry.is_zeroed()) {
        entries.pop();
    }

    Ok(entries)
}
