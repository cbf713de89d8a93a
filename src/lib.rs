//! # pdfsum
//!
//! Summarize PDF documents with hosted text-summarization models.
//!
//! ## Why this crate?
//!
//! Extracted PDF text is routinely far larger than what a hosted
//! summarization model accepts in one request. Instead of truncating the
//! document and hoping, this crate splits the text into model-size-safe
//! chunks along natural boundaries, summarizes each chunk through a remote
//! inference call with a fallback transport, and hierarchically reduces the
//! per-chunk summaries into one final summary — tolerating individual chunk
//! failures along the way.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     resolve local file or download from URL
//!  ├─ 2. Extract   concatenated page text via pdf-extract (spawn_blocking)
//!  ├─ 3. Chunk     greedy split on paragraph or sentence boundaries
//!  ├─ 4. Summarize one remote call per chunk, HTTP fallback on failure
//!  ├─ 5. Reduce    join chunk summaries, condense once more if still long
//!  └─ 6. Output    final summary + per-chunk results + run stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pdfsum::{summarize, SummarizeConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Token read from HF_API_TOKEN / HF_TOKEN
//!     let config = SummarizeConfig::default();
//!     let output = summarize("document.pdf", &config).await?;
//!     println!("{}", output.summary);
//!     eprintln!(
//!         "chunks: {} ok / {} failed / {} skipped",
//!         output.stats.summarized_chunks,
//!         output.stats.failed_chunks,
//!         output.stats.skipped_chunks
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `pdfsum` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! pdfsum = { version = "0.3", default-features = false }
//! ```
//!
//! ## Failure model
//!
//! A single chunk's failed remote call never aborts the run — it becomes a
//! positional failure marker in [`SummaryOutput::chunk_summaries`]. Only two
//! things halt a run once started: unusable input (no extractable text) and
//! an authorization rejection (HTTP 403) from the inference API, which would
//! fail every subsequent call identically. When every chunk fails, the run
//! still completes, with [`FinalSummary::Unavailable`] as the explicit
//! "nothing to summarize" terminal state.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod client;
pub mod config;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod summarize;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{
    normalize_response, HfInference, InferenceTransport, NormalizedResponse, SummarizationClient,
    TransportError,
};
pub use config::{ChunkStrategy, SummarizeConfig, SummarizeConfigBuilder, DEFAULT_MODEL};
pub use error::{ChunkError, ClientError, PdfSumError};
pub use output::{ChunkSummary, DocumentPreview, FinalSummary, RunStats, SummaryOutput};
pub use progress::{NoopProgressCallback, ProgressCallback, SummarizeProgressCallback};
pub use summarize::{
    inspect, summarize, summarize_bytes, summarize_extracted, summarize_sync, summarize_to_file,
};
