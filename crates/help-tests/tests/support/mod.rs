//! Shared fixture helpers for the scenario and invariant suites.
//!
//! Builds a minimal but structurally valid `.hbk` file on disk: a TOC at
//! offset 16 with two entries (a throwaway name/body pair, then the
//! `"FileStorage"` entity), whose body is a stored-method ZIP archive
//! holding the requested HTML pages. This mirrors the fixture `hbk-container`
//! builds for its own unit tests, generalized to an arbitrary page list so
//! the same builder can produce the three-page S2 fixture.

use std::path::Path;

use help_discovery::scan_roots;
use help_index::IndexStore;
use help_types::Installation;

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

/// Assemble a complete `.hbk` file holding `pages` (name, html body pairs)
/// inside its `"FileStorage"` ZIP entity.
fn build_hbk_bytes(pages: &[(&str, &str)]) -> Vec<u8> {
    let mut buf = vec![0u8; 16];

    let other_name_block = build_block(&build_name_payload("SomethingElse"), NO_NEXT);
    let other_body_block = build_block(b"irrelevant", NO_NEXT);

    let mut zip_bytes = Vec::new();
    for (name, data) in pages {
        zip_bytes.extend_from_slice(&build_zip_stored_entry(name, data.as_bytes()));
    }
    let storage_name_block = build_block(&build_name_payload("FileStorage"), NO_NEXT);
    let storage_body_block = build_block(&zip_bytes, NO_NEXT);

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

/// Write `shcntx_ru.hbk` under `version_dir/bin/`, holding `pages`, and
/// return an [`Installation`] pointing at it — as [`help_discovery::scan_roots`]
/// would have produced from a real platform install.
pub fn write_syntax_fixture(
    root: &Path,
    version: &str,
    pages: &[(&str, &str)],
) -> Installation {
    let bin = root.join(version).join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    std::fs::write(bin.join("shcntx_ru.hbk"), build_hbk_bytes(pages)).unwrap();

    scan_roots(&[root.to_path_buf()]).expect("fixture installation should be discoverable")
}

/// The three-page fixture used across the S2-S6 scenarios: `a.html`,
/// `b.html`, `c.html` under version `8.3.27.1989`.
pub fn write_s2_fixture(root: &Path) -> Installation {
    write_syntax_fixture(
        root,
        "8.3.27.1989",
        &[
            ("a.html", "<h1>A</h1>"),
            ("b.html", "<h1>B</h1>"),
            ("c.html", "<h1>C</h1>"),
        ],
    )
}

/// Open a fresh [`IndexStore`] at `dir/help.db`.
pub fn open_store(dir: &Path) -> IndexStore {
    IndexStore::open(&dir.join("help.db")).unwrap()
}
