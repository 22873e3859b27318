//! ZIP container wrapper for DOCX documents.

use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read, Write};
use std::path::Path;
use zip::write::SimpleFileOptions;
use zip::{ZipArchive, ZipWriter};

/// DOCX container paths.
pub(crate) mod paths {
    pub const DOCUMENT_XML: &str = "word/document.xml";
}

/// ZIP container wrapper for DOCX files.
pub struct DocxContainer {
    archive: ZipArchive<Cursor<Vec<u8>>>,
}

impl DocxContainer {
    /// Opens a DOCX container from a file path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read(path)?;
        Self::from_bytes(data)
    }

    /// Opens a DOCX container from a reader.
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Opens a DOCX container from bytes.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let cursor = Cursor::new(data);
        let archive = ZipArchive::new(cursor)?;
        Ok(Self { archive })
    }

    /// Reads a file from the archive as UTF-8 string.
    pub fn read_file(&mut self, path: &str) -> Result<String> {
        let mut file = self
            .archive
            .by_name(path)
            .map_err(|_| Error::InvalidData(format!("missing archive member {path}")))?;

        let mut data = Vec::new();
        file.read_to_end(&mut data)?;
        let content = std::str::from_utf8(&data)?;
        Ok(content.to_string())
    }

    /// Reads the main document part.
    ///
    /// A template without `word/document.xml` is not a word-processing document.
    pub fn read_document_xml(&mut self) -> Result<String> {
        if !self.file_exists(paths::DOCUMENT_XML) {
            return Err(Error::InvalidTemplate(format!(
                "{} not found in archive",
                paths::DOCUMENT_XML
            )));
        }
        self.read_file(paths::DOCUMENT_XML)
    }

    /// Checks if a file exists in the archive.
    pub fn file_exists(&mut self, path: &str) -> bool {
        self.archive.by_name(path).is_ok()
    }

    /// Lists all member names in archive order.
    pub fn file_names(&self) -> Vec<String> {
        self.archive.file_names().map(str::to_string).collect()
    }

    /// Number of members in the archive.
    pub fn len(&self) -> usize {
        self.archive.len()
    }

    /// Returns true if the archive has no members.
    pub fn is_empty(&self) -> bool {
        self.archive.len() == 0
    }

    /// Consumes the container, returning the original archive bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.archive.into_inner().into_inner()
    }

    /// Serializes the archive with some members replaced.
    ///
    /// Untouched members are copied raw, without recompression. Replaced members
    /// keep their position and compression method; replacements naming a member
    /// that does not exist are appended at the end.
    pub fn write_with(&mut self, replacements: &HashMap<&str, String>) -> Result<Vec<u8>> {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let mut replaced = HashSet::new();

        for index in 0..self.archive.len() {
            let file = self.archive.by_index_raw(index)?;
            let name = file.name().to_string();

            match replacements.get(name.as_str()) {
                Some(content) => {
                    let options =
                        SimpleFileOptions::default().compression_method(file.compression());
                    writer.start_file(name.as_str(), options)?;
                    writer.write_all(content.as_bytes())?;
                    replaced.insert(name);
                }
                None => writer.raw_copy_file(file)?,
            }
        }

        for (name, content) in replacements {
            if replaced.contains(*name) {
                continue;
            }
            writer.start_file(*name, SimpleFileOptions::default())?;
            writer.write_all(content.as_bytes())?;
        }

        let cursor = writer.finish()?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::docx::fixtures;

    #[test]
    fn test_read_document_xml() {
        let xml = fixtures::document_xml("<w:p/>");
        let mut container = DocxContainer::from_bytes(fixtures::build_docx(&xml)).unwrap();

        assert_eq!(container.read_document_xml().unwrap(), xml);
        assert!(container.file_exists("word/styles.xml"));
        assert!(container.file_exists("[Content_Types].xml"));
    }

    #[test]
    fn test_missing_document_xml() {
        let data = fixtures::build_archive(&[("word/styles.xml", "<w:styles/>")]);
        let mut container = DocxContainer::from_bytes(data).unwrap();

        assert!(matches!(
            container.read_document_xml(),
            Err(Error::InvalidTemplate(_))
        ));
    }

    #[test]
    fn test_from_unseekable_reader() {
        let data = fixtures::build_docx(&fixtures::document_xml("<w:p/>"));
        // A byte slice reads forward only
        let mut container = DocxContainer::from_reader(data.as_slice()).unwrap();
        assert!(container.file_exists("word/document.xml"));
    }

    #[test]
    fn test_not_a_zip() {
        let result = DocxContainer::from_bytes(b"plain text, not an archive".to_vec());
        assert!(matches!(result, Err(Error::ZipArchive(_))));
    }

    #[test]
    fn test_write_with_replacement_preserves_others() {
        let xml = fixtures::document_xml("<w:p/>");
        let mut container = DocxContainer::from_bytes(fixtures::build_docx(&xml)).unwrap();
        let original_names = container.file_names();
        let original_styles = container.read_file("word/styles.xml").unwrap();

        let replacements = HashMap::from([(paths::DOCUMENT_XML, "<replaced/>".to_string())]);
        let output = container.write_with(&replacements).unwrap();

        let mut rewritten = DocxContainer::from_bytes(output).unwrap();
        assert_eq!(rewritten.file_names(), original_names);
        assert_eq!(rewritten.read_document_xml().unwrap(), "<replaced/>");
        assert_eq!(rewritten.read_file("word/styles.xml").unwrap(), original_styles);
    }

    #[test]
    fn test_write_with_new_member_is_appended() {
        let xml = fixtures::document_xml("<w:p/>");
        let mut container = DocxContainer::from_bytes(fixtures::build_docx(&xml)).unwrap();
        let count = container.len();

        let replacements = HashMap::from([("word/extra.xml", "<extra/>".to_string())]);
        let output = container.write_with(&replacements).unwrap();

        let mut rewritten = DocxContainer::from_bytes(output).unwrap();
        assert_eq!(rewritten.len(), count + 1);
        assert_eq!(rewritten.file_names().last().unwrap(), "word/extra.xml");
        assert_eq!(rewritten.read_file("word/extra.xml").unwrap(), "<extra/>");
    }
}
