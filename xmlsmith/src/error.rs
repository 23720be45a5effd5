//! Error types for xmlsmith.

use thiserror::Error;

/// Result type alias for xmlsmith operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while building, parsing, or serializing trees.
#[derive(Error, Debug)]
pub enum Error {
    /// A node kind appeared in a position the serializer cannot place it.
    #[error("structure error: {0}")]
    Structure(String),

    /// Content rejected by the well-formedness checks.
    #[error("not well-formed: {0}")]
    WellFormed(String),

    /// XML parsing error.
    #[error("XML parse error: {0}")]
    Parse(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// XML error from quick-xml.
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}
