#![warn(clippy::pedantic)]
//! Streams local-file-header entries out of a ZIP byte buffer and
//! decompresses them.
//!
//! This is not a general ZIP reader: it never looks at the central
//! directory, never resolves a Zip64 extension, and trusts local file
//! headers at face value. That's sufficient for reading the single
//! ZIP archive embedded in an `.hbk` container, which is produced by
//! one writer and never hand-edited.

pub mod entry;
pub mod error;

pub use entry::{decompress, ZipEntries, ZipEntryRef, METHOD_DEFLATE, METHOD_STORED};
pub use error::ZipError;
