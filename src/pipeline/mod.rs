//! Pipeline stages for PDF summarization.
//!
//! Each submodule implements exactly one transformation step.
//! Keeping stages separate makes each independently testable and lets us
//! swap implementations (e.g. a different extraction backend) without
//! touching other stages.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ extract ──▶ chunk ──▶ summarize ──▶ reduce ──▶ postprocess
//! (URL/path) (pdf text)  (greedy)  (per-chunk)   (combine)   (whitespace)
//! ```
//!
//! 1. [`input`]   — canonicalise the user-supplied path or URL to a local file
//! 2. [`extract`] — pull concatenated page text out of the PDF; runs in
//!    `spawn_blocking` because the parser is CPU-bound
//! 3. [`chunk`]   — split text into bounded-size chunks along paragraph or
//!    sentence boundaries
//! 4. per-chunk summarization — driven by [`crate::summarize`]; the only
//!    stage with network I/O, via [`crate::client::SummarizationClient`]
//! 5. [`reduce`]  — combine chunk summaries into the final summary
//! 6. [`postprocess`] — deterministic whitespace cleanup of model output

pub mod chunk;
pub mod extract;
pub mod input;
pub mod postprocess;
pub mod reduce;
