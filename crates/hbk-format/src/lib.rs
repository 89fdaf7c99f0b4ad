#![warn(clippy::pedantic)]

//! Parses the `.hbk` block-container format: ASCII-hex block headers
//! linked into chains, and the fixed-size table of contents at the start
//! of the file.
//!
//! This crate is read-only — there is no write path back to the
//! container (see the system spec's non-goals), so unlike a typical
//! binary-format crate there's no `write_to` counterpart to `read_block`.

pub mod block;
pub mod error;
pub mod toc;

pub use block::{read_block, read_entity_full, BlockHeader};
pub use error::FormatError;
pub use toc::{parse_toc, TocEntry};
