//! Result types returned by the summarization pipeline.
//!
//! [`SummaryOutput`] carries everything the presentation layer needs: the
//! final summary, the ordered chunk list for preview, the ordered per-chunk
//! summaries (with failure markers), and run statistics. All types are
//! serialisable so the CLI can emit them as JSON.

use crate::error::ChunkError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Outcome of summarizing a single chunk.
///
/// Failures are recorded here rather than propagated: a single bad chunk
/// must never abort the run. When `error` is `Some`, `summary` is empty and
/// the entry acts as the positional failure marker ("Chunk N failed: …").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkSummary {
    /// 1-indexed position in the original chunk sequence.
    ///
    /// Positions are preserved across skipped chunks, so the numbers in
    /// failure markers always refer back to the chunk list the caller saw.
    pub chunk_num: usize,

    /// The summary text. Empty when `error` is `Some`.
    pub summary: String,

    /// Wall-clock duration of the remote call(s) for this chunk.
    pub duration_ms: u64,

    /// The failure marker, if both transports failed for this chunk.
    pub error: Option<ChunkError>,
}

impl ChunkSummary {
    /// Whether this chunk produced a usable summary.
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Human-readable line for display: the summary, or the failure marker.
    pub fn display_text(&self) -> String {
        match &self.error {
            None => self.summary.clone(),
            Some(e) => format!("[{e}]"),
        }
    }
}

/// The final summary of a run.
///
/// `Unavailable` is a legitimate terminal state (every chunk summary
/// failed), not an error — callers must render it distinctly from a fatal
/// failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum FinalSummary {
    /// The combined chunk summaries were long enough to warrant one more
    /// summarization pass; this is its output.
    Reduced(String),

    /// The chunk summaries joined as-is — either short enough already, or
    /// the reduce call failed and the pipeline degraded gracefully.
    Combined(String),

    /// No chunk summary succeeded; there is nothing to combine.
    Unavailable,
}

impl FinalSummary {
    /// The summary text, if one exists.
    pub fn text(&self) -> Option<&str> {
        match self {
            FinalSummary::Reduced(s) | FinalSummary::Combined(s) => Some(s),
            FinalSummary::Unavailable => None,
        }
    }

    /// Whether the run ended with no usable summary.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, FinalSummary::Unavailable)
    }
}

impl fmt::Display for FinalSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FinalSummary::Reduced(s) | FinalSummary::Combined(s) => f.write_str(s),
            FinalSummary::Unavailable => f.write_str("No summary generated."),
        }
    }
}

/// Everything produced by one summarization run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryOutput {
    /// The final summary (or the explicit "nothing to summarize" state).
    pub summary: FinalSummary,

    /// The ordered chunks fed to the summarizer, for preview/debugging.
    pub chunks: Vec<String>,

    /// Per-chunk outcomes in chunk order. Shorter than `chunks` when chunks
    /// were skipped for being under the minimum length.
    pub chunk_summaries: Vec<ChunkSummary>,

    /// Run statistics.
    pub stats: RunStats,
}

/// Statistics for one summarization run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    /// Chunks produced by the splitter.
    pub total_chunks: usize,

    /// Chunks that summarized successfully.
    pub summarized_chunks: usize,

    /// Chunks whose remote calls failed (failure markers recorded).
    pub failed_chunks: usize,

    /// Chunks dropped for being under the minimum length.
    pub skipped_chunks: usize,

    /// Character count of the extracted document text.
    pub input_chars: usize,

    /// Time spent extracting text from the PDF.
    pub extract_duration_ms: u64,

    /// Time spent in per-chunk summarization calls.
    pub summarize_duration_ms: u64,

    /// Time spent in the final reduce pass (0 when no pass was made).
    pub reduce_duration_ms: u64,

    /// End-to-end wall-clock time.
    pub total_duration_ms: u64,
}

/// What [`crate::summarize::inspect`] reports without any network call:
/// the shape a document will take once chunked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentPreview {
    /// Character count of the extracted text.
    pub char_count: usize,

    /// Number of chunks the active strategy would produce.
    pub chunk_count: usize,

    /// Up to the first 300 characters of the first chunk.
    pub preview: String,
}
