//! Configuration types for PDF summarization.
//!
//! All pipeline behaviour is controlled through [`SummarizeConfig`], built
//! via its [`SummarizeConfigBuilder`]. Keeping every knob in one struct makes
//! it trivial to share configs across threads, serialise them for logging,
//! and diff two runs to understand why their outputs differ.
//!
//! # Design choice: builder over constructor
//! A dozen-field constructor is unreadable and breaks on every new field.
//! The builder pattern lets callers set only what they care about and rely on
//! well-documented defaults for the rest.

use crate::client::InferenceTransport;
use crate::error::PdfSumError;
use crate::progress::ProgressCallback;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Default summarization model, a pretrained abstractive summarizer hosted
/// by the inference provider.
pub const DEFAULT_MODEL: &str = "facebook/bart-large-cnn";

/// Default base URL for the hosted inference router.
pub const DEFAULT_ENDPOINT_BASE: &str = "https://router.huggingface.co/hf-inference/models";

/// Configuration for a summarization run.
///
/// Built via [`SummarizeConfig::builder()`] or using
/// [`SummarizeConfig::default()`].
///
/// # Example
/// ```rust
/// use pdfsum::SummarizeConfig;
///
/// let config = SummarizeConfig::builder()
///     .chunk_size(900)
///     .model("sshleifer/distilbart-cnn-12-6")
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct SummarizeConfig {
    /// Summarization model identifier, e.g. "facebook/bart-large-cnn".
    pub model: String,

    /// Soft character limit per chunk when splitting on paragraphs. Default: 700.
    ///
    /// Hosted summarization models reject or truncate long inputs; 700
    /// characters keeps each request comfortably inside the model's context
    /// while leaving enough material for a meaningful per-chunk summary.
    /// A single paragraph longer than this is still emitted as one oversized
    /// chunk rather than split mid-paragraph.
    pub chunk_size: usize,

    /// Character limit per chunk when splitting on sentence boundaries. Default: 3000.
    ///
    /// Used by [`ChunkStrategy::Sentences`]. Sentence splitting produces
    /// fewer, larger chunks than paragraph splitting, which means fewer
    /// remote calls at the cost of coarser per-chunk summaries.
    pub sentence_chunk_size: usize,

    /// Chunks whose trimmed length is below this are skipped as
    /// uninformative. Default: 50.
    ///
    /// Headings, page numbers, and stray fragments summarize to noise.
    /// Skipped chunks are dropped from the summary sequence entirely (they
    /// get no failure marker); the count is reported in
    /// [`crate::output::RunStats::skipped_chunks`].
    pub min_chunk_chars: usize,

    /// Hard cap on characters transmitted per summarization call. Default: 3500.
    ///
    /// Applied by the client before either transport sends anything, so a
    /// chunk that slipped past the soft limits can never trigger a remote
    /// token-limit rejection.
    pub max_input_chars: usize,

    /// Below this combined length the reducer returns chunk summaries
    /// joined as-is instead of re-summarizing. Default: 200.
    ///
    /// Re-summarizing already-short text costs a network call and tends to
    /// degrade it.
    pub short_form_threshold: usize,

    /// Token cap passed to the fallback transport (`max_new_tokens`). Default: 100.
    pub max_new_tokens: u32,

    /// Which splitter feeds the pipeline. Default: [`ChunkStrategy::Paragraphs`].
    pub strategy: ChunkStrategy,

    /// Inference API token. If `None`, resolved from `HF_API_TOKEN` /
    /// `HF_TOKEN` at client construction; absence everywhere is fatal.
    pub token: Option<String>,

    /// Base URL of the inference router. Default: [`DEFAULT_ENDPOINT_BASE`].
    ///
    /// Overridable mainly so tests can point the client at a local mock.
    pub endpoint_base: String,

    /// Pre-constructed primary transport. Takes precedence over `token`.
    ///
    /// Inject a stub here to test the pipeline without any network.
    pub transport: Option<Arc<dyn InferenceTransport>>,

    /// Per-call timeout in seconds, applied to both transports. Default: 30.
    pub api_timeout_secs: u64,

    /// Download timeout for URL inputs in seconds. Default: 120.
    pub download_timeout_secs: u64,

    /// Progress observer fired as the pipeline works through chunks.
    /// Default: none (no-op).
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SummarizeConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            chunk_size: 700,
            sentence_chunk_size: 3000,
            min_chunk_chars: 50,
            max_input_chars: 3500,
            short_form_threshold: 200,
            max_new_tokens: 100,
            strategy: ChunkStrategy::default(),
            token: None,
            endpoint_base: DEFAULT_ENDPOINT_BASE.to_string(),
            transport: None,
            api_timeout_secs: 30,
            download_timeout_secs: 120,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SummarizeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SummarizeConfig")
            .field("model", &self.model)
            .field("chunk_size", &self.chunk_size)
            .field("sentence_chunk_size", &self.sentence_chunk_size)
            .field("min_chunk_chars", &self.min_chunk_chars)
            .field("max_input_chars", &self.max_input_chars)
            .field("short_form_threshold", &self.short_form_threshold)
            .field("max_new_tokens", &self.max_new_tokens)
            .field("strategy", &self.strategy)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .field("endpoint_base", &self.endpoint_base)
            .field("transport", &self.transport.as_ref().map(|_| "<dyn InferenceTransport>"))
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("download_timeout_secs", &self.download_timeout_secs)
            .finish()
    }
}

impl SummarizeConfig {
    /// Create a new builder for `SummarizeConfig`.
    pub fn builder() -> SummarizeConfigBuilder {
        SummarizeConfigBuilder {
            config: Self::default(),
        }
    }

    /// The character limit the active [`ChunkStrategy`] splits against.
    pub fn active_chunk_limit(&self) -> usize {
        match self.strategy {
            ChunkStrategy::Paragraphs => self.chunk_size,
            ChunkStrategy::Sentences => self.sentence_chunk_size,
        }
    }
}

/// Builder for [`SummarizeConfig`].
#[derive(Debug)]
pub struct SummarizeConfigBuilder {
    config: SummarizeConfig,
}

impl SummarizeConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn chunk_size(mut self, n: usize) -> Self {
        self.config.chunk_size = n.max(1);
        self
    }

    pub fn sentence_chunk_size(mut self, n: usize) -> Self {
        self.config.sentence_chunk_size = n.max(1);
        self
    }

    pub fn min_chunk_chars(mut self, n: usize) -> Self {
        self.config.min_chunk_chars = n;
        self
    }

    pub fn max_input_chars(mut self, n: usize) -> Self {
        self.config.max_input_chars = n.max(1);
        self
    }

    pub fn short_form_threshold(mut self, n: usize) -> Self {
        self.config.short_form_threshold = n;
        self
    }

    pub fn max_new_tokens(mut self, n: u32) -> Self {
        self.config.max_new_tokens = n.max(1);
        self
    }

    pub fn strategy(mut self, strategy: ChunkStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.config.token = Some(token.into());
        self
    }

    pub fn endpoint_base(mut self, base: impl Into<String>) -> Self {
        self.config.endpoint_base = base.into();
        self
    }

    pub fn transport(mut self, transport: Arc<dyn InferenceTransport>) -> Self {
        self.config.transport = Some(transport);
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn download_timeout_secs(mut self, secs: u64) -> Self {
        self.config.download_timeout_secs = secs;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SummarizeConfig, PdfSumError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(PdfSumError::InvalidConfig(
                "Model identifier must not be empty".into(),
            ));
        }
        if c.chunk_size == 0 || c.sentence_chunk_size == 0 {
            return Err(PdfSumError::InvalidConfig(
                "Chunk sizes must be ≥ 1".into(),
            ));
        }
        if c.max_input_chars < c.min_chunk_chars {
            return Err(PdfSumError::InvalidConfig(format!(
                "max_input_chars ({}) must not be below min_chunk_chars ({})",
                c.max_input_chars, c.min_chunk_chars
            )));
        }
        if c.api_timeout_secs == 0 {
            return Err(PdfSumError::InvalidConfig(
                "API timeout must be ≥ 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Which boundary the chunker splits on.
///
/// Paragraph splitting (newline boundaries, 700-char soft limit) gives the
/// summarizer small, focused inputs and is the right default for extracted
/// PDF text, where line breaks are plentiful. Sentence splitting (". "
/// boundaries, 3000-char limit) produces fewer, larger chunks — useful for
/// prose that arrives as one long line, or to cut the number of remote calls
/// on very large documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChunkStrategy {
    /// Split on paragraph (newline) boundaries. (default)
    #[default]
    Paragraphs,
    /// Split on sentence (". ") boundaries.
    Sentences,
}
