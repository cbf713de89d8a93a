//! Top-level summarization entry points.
//!
//! ## Shape of a run
//!
//! This module wires the pipeline stages together: resolve the input, build
//! the authenticated client once, extract text, chunk it, drive every chunk
//! through the client sequentially, then reduce. It collects every
//! [`ChunkSummary`] into memory and settles the final summary before
//! returning — a run is a single logical task, and the only blocking points
//! are the bounded-timeout network calls inside the client.

use crate::client::SummarizationClient;
use crate::config::{ChunkStrategy, SummarizeConfig};
use crate::error::{ChunkError, ClientError, PdfSumError};
use crate::output::{ChunkSummary, DocumentPreview, RunStats, SummaryOutput};
use crate::pipeline::{chunk, extract, input, postprocess, reduce};
use std::io::Write;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Characters of the first chunk shown in a [`DocumentPreview`].
const PREVIEW_CHARS: usize = 300;

/// Summarize a PDF file or URL.
///
/// This is the primary entry point for the library.
///
/// # Arguments
/// * `input_str` — Local file path or HTTP/HTTPS URL to a PDF
/// * `config` — Summarization configuration
///
/// # Returns
/// `Ok(SummaryOutput)` on success, even if some chunks failed (check
/// `output.stats.failed_chunks`) or every chunk failed
/// (`output.summary.is_unavailable()`).
///
/// # Errors
/// Returns `Err(PdfSumError)` only for fatal errors:
/// - File not found / permission denied / not a valid PDF
/// - No extractable text (scanned or image-only document)
/// - Missing credential, or the inference API rejecting it (403)
pub async fn summarize(
    input_str: impl AsRef<str>,
    config: &SummarizeConfig,
) -> Result<SummaryOutput, PdfSumError> {
    let total_start = Instant::now();
    let input_str = input_str.as_ref();
    info!("Starting summarization: {}", input_str);

    // ── Step 1: Resolve input ────────────────────────────────────────────
    let resolved = input::resolve_input(input_str, config.download_timeout_secs).await?;

    // ── Step 2: Build the client (fails fast on a missing token) ────────
    let client = SummarizationClient::from_config(config)?;

    // ── Step 3: Extract text ─────────────────────────────────────────────
    let extract_start = Instant::now();
    let text = extract::extract_text(resolved.path()).await?;
    let extract_duration_ms = extract_start.elapsed().as_millis() as u64;

    // ── Steps 4–7: Chunk, summarize, reduce ──────────────────────────────
    run_pipeline(&client, &text, config, extract_duration_ms, total_start).await
}

/// Summarize text that has already been extracted.
///
/// Skips input resolution and PDF extraction — useful when the caller
/// already has document text in hand (a different extraction backend, a
/// plain-text source) and only wants the chunk/summarize/reduce stages.
///
/// Empty or whitespace-only text is not an error here: it produces zero
/// chunks and the run completes with [`crate::output::FinalSummary::Unavailable`].
pub async fn summarize_extracted(
    text: &str,
    config: &SummarizeConfig,
) -> Result<SummaryOutput, PdfSumError> {
    let total_start = Instant::now();
    let client = SummarizationClient::from_config(config)?;
    run_pipeline(&client, text, config, 0, total_start).await
}

/// The chunk → summarize → reduce core shared by every entry point.
async fn run_pipeline(
    client: &SummarizationClient,
    text: &str,
    config: &SummarizeConfig,
    extract_duration_ms: u64,
    total_start: Instant,
) -> Result<SummaryOutput, PdfSumError> {
    let input_chars = text.chars().count();

    // ── Chunk ────────────────────────────────────────────────────────────
    let chunks = split_document(text, config);
    info!(
        chunks = chunks.len(),
        strategy = ?config.strategy,
        "document chunked for summarization"
    );

    if let Some(cb) = &config.progress_callback {
        cb.on_run_start(chunks.len());
    }

    // ── Summarize each chunk ─────────────────────────────────────────────
    let map_start = Instant::now();
    let chunk_summaries = summarize_chunks(client, &chunks, config).await?;
    let summarize_duration_ms = map_start.elapsed().as_millis() as u64;

    // ── Reduce ───────────────────────────────────────────────────────────
    let reduce_start = Instant::now();
    let summary = reduce::create_final_summary(client, &chunk_summaries, config).await;
    let reduce_duration_ms = reduce_start.elapsed().as_millis() as u64;

    // ── Stats ────────────────────────────────────────────────────────────
    let summarized = chunk_summaries.iter().filter(|s| s.is_ok()).count();
    let failed = chunk_summaries.len() - summarized;
    let skipped = chunks.len() - chunk_summaries.len();

    let stats = RunStats {
        total_chunks: chunks.len(),
        summarized_chunks: summarized,
        failed_chunks: failed,
        skipped_chunks: skipped,
        input_chars,
        extract_duration_ms,
        summarize_duration_ms,
        reduce_duration_ms,
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    info!(
        "Summarization complete: {}/{} chunks, {}ms total",
        summarized, stats.total_chunks, stats.total_duration_ms
    );

    if let Some(cb) = &config.progress_callback {
        cb.on_run_complete(stats.total_chunks, summarized);
    }

    Ok(SummaryOutput {
        summary,
        chunks,
        chunk_summaries,
        stats,
    })
}

/// Summarize PDF bytes in memory.
///
/// This avoids the need for the caller to create a temporary file.
/// Internally the library writes `bytes` to a managed [`tempfile`] and
/// cleans it up automatically on return or panic.
///
/// This is the recommended API when PDF data comes from an upload, a
/// database, or a network stream rather than a file on disk.
pub async fn summarize_bytes(
    bytes: &[u8],
    config: &SummarizeConfig,
) -> Result<SummaryOutput, PdfSumError> {
    let mut tmp = tempfile::NamedTempFile::new()
        .map_err(|e| PdfSumError::Internal(format!("tempfile: {e}")))?;
    tmp.write_all(bytes)
        .map_err(|e| PdfSumError::Internal(format!("tempfile write: {e}")))?;
    let path = tmp.path().to_string_lossy().to_string();
    // `tmp` is dropped (and the file deleted) when `summarize` returns
    summarize(&path, config).await
}

/// Summarize a PDF and write the final summary directly to a file.
///
/// Uses atomic write (temp file + rename) to prevent partial files.
pub async fn summarize_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &SummarizeConfig,
) -> Result<RunStats, PdfSumError> {
    let output = summarize(input_str, config).await?;
    let path = output_path.as_ref();

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| PdfSumError::OutputWriteFailed {
                path: path.to_path_buf(),
                source: e,
            })?;
    }

    let tmp_path = path.with_extension("txt.tmp");
    tokio::fs::write(&tmp_path, output.summary.to_string())
        .await
        .map_err(|e| PdfSumError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    tokio::fs::rename(&tmp_path, path)
        .await
        .map_err(|e| PdfSumError::OutputWriteFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

    Ok(output.stats)
}

/// Synchronous wrapper around [`summarize`].
///
/// Creates a temporary tokio runtime internally.
pub fn summarize_sync(
    input_str: impl AsRef<str>,
    config: &SummarizeConfig,
) -> Result<SummaryOutput, PdfSumError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| PdfSumError::Internal(format!("Failed to create tokio runtime: {e}")))?
        .block_on(summarize(input_str, config))
}

/// Extract and chunk a PDF without making any network call.
///
/// Does not require an inference token. Useful to preview how a document
/// will be split before spending remote calls on it.
pub async fn inspect(
    input_str: impl AsRef<str>,
    config: &SummarizeConfig,
) -> Result<DocumentPreview, PdfSumError> {
    let resolved = input::resolve_input(input_str.as_ref(), config.download_timeout_secs).await?;
    let text = extract::extract_text(resolved.path()).await?;
    let chunks = split_document(&text, config);

    let preview = chunks
        .first()
        .map(|c| chunk::truncate_chars(c, PREVIEW_CHARS).to_string())
        .unwrap_or_default();

    Ok(DocumentPreview {
        char_count: text.chars().count(),
        chunk_count: chunks.len(),
        preview,
    })
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Run the splitter selected by the configured [`ChunkStrategy`].
fn split_document(text: &str, config: &SummarizeConfig) -> Vec<String> {
    match config.strategy {
        ChunkStrategy::Paragraphs => chunk::split_into_chunks(text, config.chunk_size),
        ChunkStrategy::Sentences => chunk::split_text(text, config.sentence_chunk_size),
    }
}

/// Drive every chunk through the client, in order, one at a time.
///
/// Chunks under the minimum length are dropped without a marker — headings
/// and stray fragments would only summarize to noise. A failed call records
/// a position-tagged marker and the loop continues: one chunk's failure
/// must never abort processing of subsequent chunks. The single exception
/// is an authorization rejection, which would fail every remaining call the
/// same way and therefore halts the run.
async fn summarize_chunks(
    client: &SummarizationClient,
    chunks: &[String],
    config: &SummarizeConfig,
) -> Result<Vec<ChunkSummary>, PdfSumError> {
    let total = chunks.len();
    let cb = config.progress_callback.as_ref();
    let mut results = Vec::with_capacity(total);

    for (i, text) in chunks.iter().enumerate() {
        let chunk_num = i + 1;

        if text.trim().chars().count() < config.min_chunk_chars {
            debug!(chunk = chunk_num, "skipping chunk under minimum length");
            if let Some(cb) = cb {
                cb.on_chunk_skipped(chunk_num, total);
            }
            continue;
        }

        if let Some(cb) = cb {
            cb.on_chunk_start(chunk_num, total);
        }
        let start = Instant::now();

        match client.summarize(text).await {
            Ok(summary) => {
                let summary = postprocess::clean_summary(&summary);
                if let Some(cb) = cb {
                    cb.on_chunk_complete(chunk_num, total, summary.chars().count());
                }
                results.push(ChunkSummary {
                    chunk_num,
                    summary,
                    duration_ms: start.elapsed().as_millis() as u64,
                    error: None,
                });
            }
            Err(ClientError::Forbidden { detail }) => {
                return Err(PdfSumError::Forbidden { detail });
            }
            Err(e) => {
                let detail = e.to_string();
                warn!(chunk = chunk_num, error = %detail, "chunk summarization failed");
                if let Some(cb) = cb {
                    cb.on_chunk_error(chunk_num, total, &detail);
                }
                results.push(ChunkSummary {
                    chunk_num,
                    summary: String::new(),
                    duration_ms: start.elapsed().as_millis() as u64,
                    error: Some(ChunkError::SummarizeFailed {
                        chunk: chunk_num,
                        detail,
                    }),
                });
            }
        }
    }

    Ok(results)
}
