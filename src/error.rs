//! Error types for the pdfsum library.
//!
//! Three distinct error types reflect three distinct failure granularities:
//!
//! * [`PdfSumError`] — **Fatal**: the summarization run cannot proceed at all
//!   (bad input file, no extractable text, missing or rejected credential).
//!   Returned as `Err(PdfSumError)` from the top-level `summarize*` functions.
//!
//! * [`ClientError`] — **Single-call**: one remote summarization call failed.
//!   Consumed inside the pipeline; only [`ClientError::Forbidden`] is promoted
//!   to the fatal [`PdfSumError::Forbidden`], everything else is recovered at
//!   the chunk level.
//!
//! * [`ChunkError`] — **Non-fatal**: a single chunk failed after the fallback
//!   transport was exhausted. Stored inside [`crate::output::ChunkSummary`] so
//!   callers can inspect partial success rather than losing the whole
//!   document to one bad chunk.
//!
//! The separation lets callers decide their own tolerance: abort on the first
//! chunk failure, log and continue, or collect all markers for a post-run report.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the pdfsum library.
///
/// Chunk-level failures use [`ChunkError`] and are stored in
/// [`crate::output::ChunkSummary`] rather than propagated here.
#[derive(Debug, Error)]
pub enum PdfSumError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The input string is not a valid file path or URL.
    #[error("Invalid input '{input}': not a file path or a valid HTTP/HTTPS URL")]
    InvalidInput { input: String },

    /// HTTP URL was syntactically valid but download failed.
    #[error("Failed to download '{url}': {reason}\nCheck your internet connection.")]
    DownloadFailed { url: String, reason: String },

    /// Download exceeded the configured timeout.
    #[error("Download timed out after {secs}s for '{url}'\nIncrease --download-timeout.")]
    DownloadTimeout { url: String, secs: u64 },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── Extraction errors ─────────────────────────────────────────────────
    /// The PDF parser rejected the document.
    #[error("Text extraction failed for '{path}': {detail}")]
    ExtractionFailed { path: PathBuf, detail: String },

    /// Extraction succeeded but produced no text (scanned or image-only PDF).
    #[error(
        "No extractable text found in '{path}'.\n\
         The document is likely scanned or image-only; run it through OCR first."
    )]
    NoExtractableText { path: PathBuf },

    // ── Credential / inference errors ─────────────────────────────────────
    /// No inference API token could be resolved at startup.
    #[error(
        "No inference API token configured.\n\
         Set HF_API_TOKEN (or HF_TOKEN) in the environment, or pass a token \
         via SummarizeConfig::builder().token(...)."
    )]
    MissingToken,

    /// The inference API rejected the token (HTTP 403 / Forbidden).
    #[error(
        "403 Forbidden — the inference token lacks Inference API access: {detail}\n\
         Create a new token with the Inference API permission at your \
         provider's token settings page and update your environment."
    )]
    Forbidden { detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Failure of a single remote summarization call.
///
/// Produced by [`crate::client::SummarizationClient::summarize`]. Every
/// variant except [`ClientError::Forbidden`] is recovered at the chunk level
/// by recording a [`ChunkError`] marker; `Forbidden` halts the run because a
/// rejected token will fail every subsequent call identically.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The primary transport signalled HTTP 403 / "Forbidden".
    /// No fallback is attempted for this variant.
    #[error("403 Forbidden — token lacks Inference API permission: {detail}")]
    Forbidden { detail: String },

    /// The fallback transport answered with a non-success status.
    #[error("HTTP fallback failed: {status} — {body}")]
    FallbackStatus { status: u16, body: String },

    /// Both the primary call and the fallback transport failed.
    #[error("Summarization failed: {primary} | fallback error: {fallback}")]
    BothFailed { primary: String, fallback: String },

    /// A response arrived but could not be decoded as JSON.
    #[error("Malformed inference response: {0}")]
    InvalidResponse(String),

    /// The input was empty or whitespace-only; no call was made.
    #[error("Nothing to summarize: input text is empty")]
    EmptyInput,
}

impl ClientError {
    /// Whether this failure is an authorization rejection that must halt the
    /// whole run instead of being recovered per chunk.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, ClientError::Forbidden { .. })
    }
}

/// A non-fatal error for a single chunk.
///
/// Stored alongside [`crate::output::ChunkSummary`] when a chunk fails.
/// The overall run continues; the reducer simply skips marked chunks.
#[derive(Debug, Clone, Error, serde::Serialize, serde::Deserialize)]
pub enum ChunkError {
    /// Both transports failed for this chunk.
    #[error("Chunk {chunk} failed: {detail}")]
    SummarizeFailed { chunk: usize, detail: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_display_carries_remediation() {
        let e = PdfSumError::Forbidden {
            detail: "inference api".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("403 Forbidden"), "got: {msg}");
        assert!(msg.contains("Inference API"), "got: {msg}");
    }

    #[test]
    fn client_forbidden_is_flagged() {
        let e = ClientError::Forbidden {
            detail: "nope".into(),
        };
        assert!(e.is_forbidden());
        assert!(!ClientError::EmptyInput.is_forbidden());
    }

    #[test]
    fn fallback_status_display() {
        let e = ClientError::FallbackStatus {
            status: 503,
            body: "model loading".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("503"));
        assert!(msg.contains("model loading"));
    }

    #[test]
    fn both_failed_combines_messages() {
        let e = ClientError::BothFailed {
            primary: "timeout".into(),
            fallback: "connection refused".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("timeout"));
        assert!(msg.contains("connection refused"));
    }

    #[test]
    fn chunk_error_display_is_positional() {
        let e = ChunkError::SummarizeFailed {
            chunk: 3,
            detail: "boom".into(),
        };
        assert!(e.to_string().contains("Chunk 3 failed"));
    }
}
