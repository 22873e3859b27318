//! Error types for md2docx library.

use std::io;
use thiserror::Error;

/// Result type alias for md2docx operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for md2docx library.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The file format is not recognized.
    #[error("Unknown file format")]
    UnknownFormat,

    /// The file format is not supported (e.g., legacy .doc).
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Invalid or malformed data.
    #[error("Invalid data: {0}")]
    InvalidData(String),

    /// The template is not a usable word-processing document.
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// The Markdown input is blank.
    #[error("Markdown input is empty")]
    EmptyInput,

    /// Conversion was requested before a template was analyzed successfully.
    #[error("Template styles are not ready; load a template first")]
    StyleNotReady,

    /// ZIP archive error.
    #[error("ZIP archive error: {0}")]
    ZipArchive(String),

    /// XML parsing error in document.xml.
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// Text encoding error.
    #[error("Text encoding error: {0}")]
    Encoding(String),
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

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::Encoding(err.to_string())
    }
}
