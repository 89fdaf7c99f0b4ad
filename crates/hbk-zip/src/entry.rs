use std::io::Read;

use flate2::read::DeflateDecoder;

use crate::error::ZipError;

/// Local file header signature `PK\x03\x04`.
const LOCAL_FILE_SIGNATURE: u32 = 0x0403_4b50;

/// Minimum bytes needed to read the fixed part of a local file header
/// (before the variable-length name and extra field).
const LOCAL_HEADER_SIZE: usize = 30;

/// Stored (no compression).
pub const METHOD_STORED: u16 = 0;
/// Raw DEFLATE.
pub const METHOD_DEFLATE: u16 = 8;

fn le_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

fn le_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

/// One local-file-header entry, with its compressed data as a zero-copy
/// subrange over the original ZIP byte buffer.
#[derive(Clone, Debug)]
pub struct ZipEntryRef<'a> {
    pub name: String,
    pub compression_method: u16,
    pub uncompressed_size: u32,
    pub compressed_data: &'a [u8],
}

/// Iterates local-file-header records in a byte buffer that holds a ZIP
/// archive (or at least its local-file-header section — the central
/// directory, if present, is never consulted).
///
/// Advances one entry per `next()` call and stops cleanly — yielding no
/// more entries, not an error — the moment the next 4 bytes aren't the
/// local-file-header signature. That's either the start of the central
/// directory or the end of the buffer.
pub struct ZipEntries<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ZipEntries<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Bytes consumed so far — how far into `buf` the next `next()` call
    /// will start reading from.
    #[must_use]
    pub fn pos(&self) -> usize {
        self.pos
    }
}

impl<'a> Iterator for ZipEntries<'a> {
    type Item = ZipEntryRef<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = self.buf.get(self.pos..)?;
        if remaining.len() < LOCAL_HEADER_SIZE {
            return None;
        }
        if le_u32(remaining, 0) != LOCAL_FILE_SIGNATURE {
            return None;
        }

        let compression_method = le_u16(remaining, 8);
        let compressed_size = le_u32(remaining, 18) as usize;
        let uncompressed_size = le_u32(remaining, 22);
        let name_length = le_u16(remaining, 26) as usize;
        let extra_length = le_u16(remaining, 28) as usize;

        let name_start = LOCAL_HEADER_SIZE;
        let name_end = name_start.checked_add(name_length)?;
        let data_start = name_end.checked_add(extra_length)?;
        let data_end = data_start.checked_add(compressed_size)?;

        if data_end > remaining.len() {
            return None;
        }

        let name = String::from_utf8_lossy(&remaining[name_start..name_end]).into_owned();
        let compressed_data = &remaining[data_start..data_end];

        self.pos += data_end;

        Some(ZipEntryRef {
            name,
            compression_method,
            uncompressed_size,
            compressed_data,
        })
    }
}

/// Decompress one entry's `compressed_data`.
///
/// Only [`METHOD_STORED`] and [`METHOD_DEFLATE`] are supported — the
/// caller is expected to filter out anything else before calling this
/// (see `hbk-container`'s page stream, which skips unknown methods rather
/// than treating them as errors). Calling this with any other method
/// returns the stored bytes unchanged, since there's nothing else sound to
/// do with them.
///
/// # Errors
///
/// Returns [`ZipError::Deflate`] if raw DEFLATE decoding fails partway
/// through the entry's data.
pub fn decompress(entry: &ZipEntryRef<'_>) -> Result<Vec<u8>, ZipError> {
    match entry.compression_method {
        METHOD_DEFLATE => {
            let mut decoder = DeflateDecoder::new(entry.compressed_data);
            let mut out = Vec::with_capacity(entry.uncompressed_size as usize);
            decoder
                .read_to_end(&mut out)
                .map_err(|source| ZipError::Deflate {
                    name: entry.name.clone(),
                    source,
                })?;
            Ok(out)
        }
        _ => entry.compressed_data.to_vec(),
    }
}
