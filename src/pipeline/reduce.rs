//! Reduction: combine per-chunk summaries into one final summary.
//!
//! The reducer is deliberately forgiving. By the time it runs, the pipeline
//! has already spent one remote call per chunk; whatever happens here must
//! not throw that work away. Zero usable summaries is a legitimate terminal
//! state ([`FinalSummary::Unavailable`]), and a failed condensing pass
//! degrades to the uncondensed concatenation rather than surfacing an error.

use crate::client::SummarizationClient;
use crate::config::SummarizeConfig;
use crate::output::{ChunkSummary, FinalSummary};
use crate::pipeline::postprocess;
use tracing::{info, warn};

/// Combine chunk summaries into the final summary.
///
/// Failure markers are filtered out first. The remaining summaries are
/// joined with spaces, in chunk order. Below the short-form threshold the
/// joined text is returned as-is — re-summarizing already-short text costs
/// a call and tends to degrade it. Otherwise one more summarization call
/// condenses the combination; if that call fails the joined text is
/// returned instead.
pub async fn create_final_summary(
    client: &SummarizationClient,
    chunk_summaries: &[ChunkSummary],
    config: &SummarizeConfig,
) -> FinalSummary {
    let valid: Vec<&str> = chunk_summaries
        .iter()
        .filter(|s| s.is_ok())
        .map(|s| s.summary.as_str())
        .collect();

    if valid.is_empty() {
        info!("no chunk summaries succeeded, nothing to reduce");
        return FinalSummary::Unavailable;
    }

    let combined = valid.join(" ");
    let combined_chars = combined.chars().count();

    if combined_chars < config.short_form_threshold {
        info!(chars = combined_chars, "combined summaries already short, skipping reduce pass");
        return FinalSummary::Combined(combined);
    }

    if let Some(cb) = &config.progress_callback {
        cb.on_reduce_start(combined_chars);
    }
    info!(chars = combined_chars, "condensing combined chunk summaries");

    match client.summarize(&combined).await {
        Ok(text) => FinalSummary::Reduced(postprocess::clean_summary(&text)),
        Err(e) => {
            warn!(error = %e, "final reduce pass failed, returning uncondensed combination");
            FinalSummary::Combined(combined)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{InferenceTransport, TransportError};
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Arc;

    struct OkTransport(&'static str);

    #[async_trait]
    impl InferenceTransport for OkTransport {
        async fn summarization(&self, _: &str, _: &str) -> Result<Value, TransportError> {
            Ok(json!({ "summary_text": self.0 }))
        }
    }

    struct PanickingTransport;

    #[async_trait]
    impl InferenceTransport for PanickingTransport {
        async fn summarization(&self, _: &str, _: &str) -> Result<Value, TransportError> {
            panic!("reduce must not call the client here");
        }
    }

    struct FailingTransport;

    #[async_trait]
    impl InferenceTransport for FailingTransport {
        async fn summarization(&self, _: &str, _: &str) -> Result<Value, TransportError> {
            Err(TransportError::Network("connection reset".into()))
        }
    }

    fn config_with(transport: Arc<dyn InferenceTransport>) -> SummarizeConfig {
        SummarizeConfig::builder()
            .transport(transport)
            .token("test")
            // Point the fallback at a closed port so a failing primary stays failed.
            .endpoint_base("http://127.0.0.1:1")
            .build()
            .unwrap()
    }

    fn client_with(config: &SummarizeConfig) -> SummarizationClient {
        SummarizationClient::from_config(config).unwrap()
    }

    fn ok_summary(n: usize, text: &str) -> ChunkSummary {
        ChunkSummary {
            chunk_num: n,
            summary: text.to_string(),
            duration_ms: 1,
            error: None,
        }
    }

    fn failed_summary(n: usize) -> ChunkSummary {
        ChunkSummary {
            chunk_num: n,
            summary: String::new(),
            duration_ms: 1,
            error: Some(crate::error::ChunkError::SummarizeFailed {
                chunk: n,
                detail: "boom".into(),
            }),
        }
    }

    #[tokio::test]
    async fn all_failures_yield_unavailable_without_a_call() {
        let config = config_with(Arc::new(PanickingTransport));
        let client = client_with(&config);
        let summaries = vec![failed_summary(1), failed_summary(2)];

        let result = create_final_summary(&client, &summaries, &config).await;
        assert_eq!(result, FinalSummary::Unavailable);
    }

    #[tokio::test]
    async fn any_success_never_yields_unavailable() {
        let config = config_with(Arc::new(OkTransport("condensed")));
        let client = client_with(&config);
        let summaries = vec![failed_summary(1), ok_summary(2, "it survived")];

        let result = create_final_summary(&client, &summaries, &config).await;
        assert!(!result.is_unavailable());
    }

    #[tokio::test]
    async fn short_combination_is_returned_as_is() {
        let config = config_with(Arc::new(PanickingTransport));
        let client = client_with(&config);
        let summaries = vec![ok_summary(1, "First."), ok_summary(2, "Second.")];

        let result = create_final_summary(&client, &summaries, &config).await;
        assert_eq!(result, FinalSummary::Combined("First. Second.".into()));
    }

    #[tokio::test]
    async fn long_combination_is_condensed() {
        let config = config_with(Arc::new(OkTransport("condensed")));
        let client = client_with(&config);
        let long = "word ".repeat(60);
        let summaries = vec![ok_summary(1, long.trim())];

        let result = create_final_summary(&client, &summaries, &config).await;
        assert_eq!(result, FinalSummary::Reduced("condensed".into()));
    }

    #[tokio::test]
    async fn failed_reduce_degrades_to_combination() {
        let config = config_with(Arc::new(FailingTransport));
        let client = client_with(&config);
        let long = "word ".repeat(60);
        let summaries = vec![ok_summary(1, long.trim())];

        let result = create_final_summary(&client, &summaries, &config).await;
        assert_eq!(result, FinalSummary::Combined(long.trim().to_string()));
    }

    #[tokio::test]
    async fn order_of_summaries_is_preserved_in_combination() {
        let config = config_with(Arc::new(PanickingTransport));
        let client = client_with(&config);
        let summaries = vec![ok_summary(1, "Alpha."), failed_summary(2), ok_summary(3, "Beta.")];

        let result = create_final_summary(&client, &summaries, &config).await;
        assert_eq!(result, FinalSummary::Combined("Alpha. Beta.".into()));
    }
}
