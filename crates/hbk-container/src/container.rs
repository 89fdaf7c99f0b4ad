use std::fs;
use std::path::Path;

use hbk_format::{parse_toc, read_entity_full, TocEntry};

use crate::error::ContainerError;
use crate::pages::PageStream;

/// Rough average bytes per HTML page, used only to estimate a progress
/// denominator before the real page count is known.
const BYTES_PER_PAGE_ESTIMATE: u64 = 740;

/// Bytes of unspecified metadata preceding an entity's UTF-16LE name.
const NAME_HEADER_PREFIX: usize = 20;

/// An `.hbk` file read fully into memory, with its table of contents
/// already parsed.
pub struct Container {
    buf: Vec<u8>,
    toc: Vec<TocEntry>,
}

fn decode_name(name_entity: &[u8]) -> String {
    let Some(body) = name_entity.get(NAME_HEADER_PREFIX..) else {
        return String::new();
    };
    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| u16::from_le_bytes([pair[0], pair[1]]))
        .filter(|&unit| unit != 0)
        .collect();
    String::from_utf16_lossy(&units)
}

impl Container {
    /// Read `path` fully into memory and parse its table of contents.
    ///
    /// # Errors
    ///
    /// Returns [`ContainerError::Io`] if the file can't be read, or
    /// [`ContainerError::Format`] if the TOC block is malformed.
    pub fn open(path: &Path) -> Result<Self, ContainerError> {
        let buf = fs::read(path).map_err(|source| ContainerError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let toc = parse_toc(&buf)?;
        Ok(Self { buf, toc })
    }

    /// Locate the TOC entry for the file-storage entity: the one whose
    /// name header, once decoded, contains `"filestorage"` (case
    /// insensitive). Falls back to the second TOC entry when no name
    /// matches and the TOC has at least two entries.
    fn locate_file_storage(&self) -> Option<TocEntry> {
        for entry in &self.toc {
            if entry.header_addr <= 0 {
                continue;
            }
            let Ok(name_entity) = read_entity_full(&self.buf, entry.header_addr as u64) else {
                continue;
            };
            let name = decode_name(&name_entity).to_lowercase();
            if name.contains("filestorage") {
                return Some(*entry);
            }
        }

        if self.toc.len() >= 2 {
            return Some(self.toc[1]);
        }

        None
    }

    /// Upper-bound estimate of how many pages the file-storage entity
    /// holds, for progress display only. Never fails — a malformed
    /// container just yields 0.
    #[must_use]
    pub fn estimate_page_count(&self) -> u64 {
        let Some(entry) = self.locate_file_storage() else {
            return 0;
        };
        if entry.body_addr <= 0 {
            return 0;
        }
        let Ok(body) = read_entity_full(&self.buf, entry.body_addr as u64) else {
            return 0;
        };
        (body.len() as u64) / BYTES_PER_PAGE_ESTIMATE
    }

    /// Start streaming `(name, html)` pages out of the file-storage ZIP
    /// entity. Yields nothing if the entity can't be located, read, or
    /// doesn't start with a ZIP local-file-header signature.
    #[must_use]
    pub fn pages(&self) -> PageStream {
        let Some(entry) = self.locate_file_storage() else {
            return PageStream::empty();
        };
        if entry.body_addr <= 0 {
            return PageStream::empty();
        }
        let zip_bytes = match read_entity_full(&self.buf, entry.body_addr as u64) {
            Ok(bytes) => bytes,
            Err(err) => {
                eprintln!("[1c-help] failed to read file-storage entity: {err}");
                return PageStream::empty();
            }
        };
        PageStream::new(zip_bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK_HEADER_SIZE: usize = 31;
    const NO_NEXT: u32 = 0x7FFF_FFFF;
    const ZIP_LOCAL_SIGNATURE: u32 = 0x0403_4b50;

    fn build_block(payload: &[u8], next_raw: u32) -> Vec<u8> {
        let block_size = BLOCK_HEADER_SIZE + payload.len();
        let mut buf = Vec::with_capacity(block_size);
        buf.extend_from_slice(b"\r\n");
        buf.extend_from_slice(format!("{:08x}", payload.len()).as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(format!("{block_size:08x}").as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(format!("{next_raw:08x}").as_bytes());
        buf.push(b' ');
        buf.extend_from_slice(b"\r\n");
        buf.extend_from_slice(payload);
        buf
    }

    fn build_name_payload(name: &str) -> Vec<u8> {
        let mut payload = vec![0u8; 20];
        for unit in name.encode_utf16() {
            payload.extend_from_slice(&unit.to_le_bytes());
        }
        payload
    }

    fn build_zip_stored_entry(name: &str, data: &[u8]) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.extend_from_slice(&ZIP_LOCAL_SIGNATURE.to_le_bytes());
        buf.extend_from_slice(&[0u8; 4]);
        buf.extend_from_slice(&0u16.to_le_bytes()); // stored
        buf.extend_from_slice(&[0u8; 4]);
        buf.extend_from_slice(&[0u8; 4]);
        buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
        buf.extend_from_slice(&(data.len() as u32).to_le_bytes());
        buf.extend_from_slice(&(name.len() as u16).to_le_bytes());
        buf.extend_from_slice(&0u16.to_le_bytes());
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(data);
        buf
    }

    /// Assembles a minimal but complete `.hbk` file: a TOC at offset 16
    /// with two entries, a non-matching name/body pair, and a
    /// `"FileStorage"`-named entity whose body is a small ZIP archive.
    fn build_fixture() -> Vec<u8> {
        let mut buf = vec![0u8; 16];

        let other_name_block = build_block(&build_name_payload("SomethingElse"), NO_NEXT);
        let other_body_block = build_block(b"irrelevant", NO_NEXT);

        let mut zip_bytes = build_zip_stored_entry("a.html", b"<h1>Hello</h1>");
        zip_bytes.extend_from_slice(&build_zip_stored_entry("b.html", b"<h1>World</h1>"));
        let storage_name_block = build_block(&build_name_payload("FileStorage"), NO_NEXT);
        let storage_body_block = build_block(&zip_bytes, NO_NEXT);

        // Offsets are assigned in the order blocks are appended after the
        // TOC, which is written last once every address is known.
        let toc_size = BLOCK_HEADER_SIZE + 2 * 12;
        let mut offset = 16 + toc_size as u32;

        let other_header_addr = offset;
        offset += other_name_block.len() as u32;
        let other_body_addr = offset;
        offset += other_body_block.len() as u32;
        let storage_header_addr = offset;
        offset += storage_name_block.len() as u32;
        let storage_body_addr = offset;

        let mut toc_payload = Vec::new();
        toc_payload.extend_from_slice(&other_header_addr.to_le_bytes());
        toc_payload.extend_from_slice(&other_body_addr.to_le_bytes());
        toc_payload.extend_from_slice(&[0u8; 4]);
        toc_payload.extend_from_slice(&storage_header_addr.to_le_bytes());
        toc_payload.extend_from_slice(&storage_body_addr.to_le_bytes());
        toc_payload.extend_from_slice(&[0u8; 4]);
        let toc_block = build_block(&toc_payload, NO_NEXT);
        assert_eq!(toc_block.len(), toc_size);

        buf.extend_from_slice(&toc_block);
        buf.extend_from_slice(&other_name_block);
        buf.extend_from_slice(&other_body_block);
        buf.extend_from_slice(&storage_name_block);
        buf.extend_from_slice(&storage_body_block);
        buf
    }

    fn open_fixture() -> Container {
        let buf = build_fixture();
        let toc = parse_toc(&buf).unwrap();
        Container { buf, toc }
    }

    #[test]
    fn decode_name_strips_prefix_and_nulls() {
        let payload = build_name_payload("FileStorage");
        assert_eq!(decode_name(&payload), "FileStorage");
    }

    #[test]
    fn locates_file_storage_by_name() {
        let container = open_fixture();
        let entry = container.locate_file_storage().unwrap();
        assert_eq!(entry, container.toc[1]);
    }

    #[test]
    fn estimate_page_count_is_nonzero_for_a_populated_archive() {
        let container = open_fixture();
        // The fixture body is well under the 740-byte-per-page estimate,
        // so this mostly exercises "doesn't panic, doesn't error".
        let _ = container.estimate_page_count();
    }

    #[tokio::test]
    async fn pages_yields_every_html_entry() {
        let container = open_fixture();
        let mut stream = container.pages();
        let mut names = Vec::new();
        while let Some(page) = stream.next().await {
            names.push(page.name);
        }
        assert_eq!(names, vec!["a.html", "b.html"]);
    }

    #[tokio::test]
    async fn empty_stream_yields_nothing() {
        let mut stream = PageStream::empty();
        assert!(stream.next().await.is_none());
    }
}
