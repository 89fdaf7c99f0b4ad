#![warn(clippy::pedantic)]
//! Drives the container reader and text extractor into the index store,
//! with batching, per-version clearing, and progress reporting.

pub mod error;
pub mod extract;
pub mod pipeline;

pub use error::PipelineError;
pub use extract::{extract, ExtractedText};
pub use pipeline::{run_indexing, ProgressEvent};
