//! Error types for the docdump library.

use std::io;
use thiserror::Error;

/// Result type alias for docdump operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while opening or dumping a document.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations or while writing the transcript.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file is recognized but cannot be read by this backend.
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Error reading ZIP archive.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// Error parsing XML content.
    #[error("XML parse error: {0}")]
    XmlParse(String),

    /// Invalid or malformed data in the document.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// A required document component is missing.
    #[error("Missing component: {0}")]
    MissingComponent(String),

    /// The backend was not compiled into this build.
    #[error("Backend not available: {0}")]
    BackendUnavailable(&'static str),

    /// A third-party reader failed. The backend name is reported by the
    /// caller, so only the message is displayed.
    #[error("{message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        Error::ZipArchive(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        Error::XmlParse(err.to_string())
    }
}

#[cfg(feature = "calamine")]
impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        Error::Backend {
            backend: "calamine",
            message: err.to_string(),
        }
    }
}
