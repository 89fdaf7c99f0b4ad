#![warn(clippy::pedantic)]
//! Opens an `.hbk` container, locates its file-storage entity, and
//! streams the HTML pages packed inside as a ZIP archive.

pub mod container;
pub mod error;
pub mod pages;

pub use container::Container;
pub use error::ContainerError;
pub use pages::PageStream;
