//! Format detection for template documents.

use crate::error::{Error, Result};
use std::io::{Read, Seek, SeekFrom};
use std::path::Path;

/// Magic bytes for OLE Compound File (Word 97-2003 .doc)
const OLE_MAGIC: [u8; 8] = [0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Magic bytes for ZIP archive (.docx)
const ZIP_MAGIC: [u8; 4] = [0x50, 0x4B, 0x03, 0x04];

/// Template format types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatType {
    /// Office Open XML word-processing document (ZIP container)
    Docx,
    /// Legacy binary Word document (OLE container)
    LegacyDoc,
}

impl std::fmt::Display for FormatType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatType::Docx => write!(f, "DOCX"),
            FormatType::LegacyDoc => write!(f, "Word 97-2003 (.doc)"),
        }
    }
}

/// Detect template format from a file path.
pub fn detect_format_from_path(path: impl AsRef<Path>) -> Result<FormatType> {
    let mut file = std::fs::File::open(path)?;
    detect_format(&mut file)
}

/// Detect template format from a reader.
pub fn detect_format<R: Read + Seek>(reader: &mut R) -> Result<FormatType> {
    let mut buffer = [0u8; 8];

    reader.seek(SeekFrom::Start(0))?;
    let bytes_read = reader.read(&mut buffer)?;
    reader.seek(SeekFrom::Start(0))?;

    detect_format_from_bytes(&buffer[..bytes_read])
}

/// Detect template format from bytes.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<FormatType> {
    if data.len() < 8 {
        return Err(Error::InvalidData("Data too small".into()));
    }

    if data[..4] == ZIP_MAGIC {
        return Ok(FormatType::Docx);
    }

    if data[..8] == OLE_MAGIC {
        return Ok(FormatType::LegacyDoc);
    }

    Err(Error::UnknownFormat)
}

/// Checks that the data is a template the converter can read.
pub(crate) fn ensure_docx(data: &[u8]) -> Result<()> {
    match detect_format_from_bytes(data)? {
        FormatType::Docx => Ok(()),
        other => Err(Error::UnsupportedFormat(format!(
            "{other} templates are not supported; save the template as .docx"
        ))),
    }
}
