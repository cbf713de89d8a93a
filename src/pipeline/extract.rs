//! PDF text extraction: byte stream in, one concatenated string out.
//!
//! Extraction is delegated to the `pdf-extract` crate, which walks pages in
//! order and concatenates whatever text each page yields — pages with no
//! extractable text contribute nothing. The parser is CPU-bound and not
//! async-aware, so the work runs inside `spawn_blocking`.
//!
//! A document that parses but yields only whitespace is reported as
//! [`PdfSumError::NoExtractableText`]: the rest of the pipeline requires
//! non-empty input, and "scanned, needs OCR" is a far more useful diagnosis
//! than an empty summary.

use crate::error::PdfSumError;
use std::path::Path;
use tracing::{debug, info};

/// Extract the full text of the PDF at `path`.
///
/// Returns the concatenated page texts in page order. Fails with
/// [`PdfSumError::ExtractionFailed`] when the parser rejects the document
/// and [`PdfSumError::NoExtractableText`] when nothing but whitespace comes
/// out.
pub async fn extract_text(path: &Path) -> Result<String, PdfSumError> {
    let owned = path.to_path_buf();
    debug!("Extracting text from: {}", owned.display());

    let text = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text(&owned).map_err(|e| (owned, e.to_string()))
    })
    .await
    .map_err(|e| PdfSumError::Internal(format!("extraction task panicked: {e}")))?
    .map_err(|(path, detail)| PdfSumError::ExtractionFailed { path, detail })?;

    if text.trim().is_empty() {
        return Err(PdfSumError::NoExtractableText {
            path: path.to_path_buf(),
        });
    }

    info!(chars = text.chars().count(), "extracted document text");
    Ok(text)
}
