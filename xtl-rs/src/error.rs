//! Error types for template-driven loading.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias for loader operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while loading a document.
///
/// A document that contains nothing matching the root template is not an
/// error; loaders report it as `Ok(None)`.
#[derive(Error, Debug)]
pub enum Error {
    /// The document source could not be opened.
    #[error("cannot open {}: {source}", .path.display())]
    SourceUnavailable {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// Names or values that could not be decoded.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// XML error from quick-xml.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}
