//! Async API for non-blocking conversion.
//!
//! Enable the `async` feature to use these APIs:
//!
//! ```toml
//! [dependencies]
//! md2docx = { version = "0.1", features = ["async"] }
//! ```

use crate::docx::{DocxTemplate, OutputDocument};
use crate::error::{Error, Result};
use crate::model::TemplateAnalysis;
use crate::render::RenderOptions;
use std::path::Path;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncReadExt};

/// Runs CPU-bound work on the blocking pool.
async fn blocking<T, F>(work: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))?
}

/// Asynchronously loads and analyzes a template file.
pub async fn load_template(path: impl AsRef<Path>) -> Result<DocxTemplate> {
    let data = fs::read(path).await?;
    blocking(move || DocxTemplate::from_bytes(data)).await
}

/// Asynchronously loads and analyzes a template from an async reader.
pub async fn load_template_reader<R: AsyncRead + Unpin>(mut reader: R) -> Result<DocxTemplate> {
    let mut data = Vec::new();
    reader.read_to_end(&mut data).await?;
    blocking(move || DocxTemplate::from_bytes(data)).await
}

/// Asynchronously analyzes a template file.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> md2docx::Result<()> {
/// let analysis = md2docx::async_api::analyze_template("template.docx").await?;
/// println!("Matched lines: {}", analysis.matched_lines().count());
/// # Ok(())
/// # }
/// ```
pub async fn analyze_template(path: impl AsRef<Path>) -> Result<TemplateAnalysis> {
    let template = load_template(path).await?;
    Ok(template.analysis().clone())
}

/// Asynchronously converts Markdown using a template file.
///
/// # Example
///
/// ```no_run
/// # async fn example() -> md2docx::Result<()> {
/// let output = md2docx::async_api::convert_file("template.docx", "# Title").await?;
/// tokio::fs::write("output.docx", &output.bytes).await?;
/// # Ok(())
/// # }
/// ```
pub async fn convert_file(template: impl AsRef<Path>, markdown: &str) -> Result<OutputDocument> {
    convert_file_with_options(template, markdown, &RenderOptions::default()).await
}

/// Asynchronously converts Markdown using a template file, with custom options.
pub async fn convert_file_with_options(
    template: impl AsRef<Path>,
    markdown: &str,
    options: &RenderOptions,
) -> Result<OutputDocument> {
    let data = fs::read(template).await?;
    convert_bytes_with_options(data, markdown, options).await
}

/// Asynchronously converts Markdown using template bytes.
pub async fn convert_bytes(template: Vec<u8>, markdown: &str) -> Result<OutputDocument> {
    convert_bytes_with_options(template, markdown, &RenderOptions::default()).await
}

async fn convert_bytes_with_options(
    template: Vec<u8>,
    markdown: &str,
    options: &RenderOptions,
) -> Result<OutputDocument> {
    let markdown = markdown.to_string();
    let options = options.clone();
    blocking(move || DocxTemplate::from_bytes(template)?.convert(&markdown, &options)).await
}

/// Asynchronously converts Markdown and writes the document to a file.
pub async fn convert_to_file(
    template: impl AsRef<Path>,
    markdown: &str,
    output: impl AsRef<Path>,
) -> Result<()> {
    let document = convert_file(template, markdown).await?;
    fs::write(output, &document.bytes).await?;
    Ok(())
}
