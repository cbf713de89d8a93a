//! The summarization client: one logical `summarize(text) -> String`
//! operation over two transports.
//!
//! The primary transport is abstracted behind [`InferenceTransport`] so tests
//! (and callers with custom plumbing) can substitute it without any network.
//! When the primary call fails for any reason other than an authorization
//! rejection, the client falls back to a direct HTTP POST against the same
//! inference router with an explicit token cap and deterministic decoding.
//! A 403/Forbidden from the primary is surfaced immediately — retrying a
//! rejected token on a second transport can only fail the same way.
//!
//! Responses from hosted summarization models come in several shapes: an
//! object with `summary_text`, an object with `generated_text`, a singleton
//! list wrapping either, or something else entirely. [`normalize_response`]
//! folds all of them into an explicit [`NormalizedResponse`] so call sites
//! never inspect JSON shapes ad hoc.

use crate::config::SummarizeConfig;
use crate::error::{ClientError, PdfSumError};
use crate::pipeline::chunk::truncate_chars;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

/// Errors surfaced by an [`InferenceTransport`] implementation.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The endpoint answered with a non-success HTTP status.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The request never produced a usable response (connect failure,
    /// timeout, undecodable body).
    #[error("{0}")]
    Network(String),
}

impl TransportError {
    /// Whether this failure is an authorization rejection.
    ///
    /// Besides the literal 403 status, some gateways tunnel the rejection
    /// inside an error body or message, so the textual "Forbidden" signal is
    /// honoured as well.
    pub fn is_forbidden(&self) -> bool {
        match self {
            TransportError::Status { status, body } => *status == 403 || body.contains("Forbidden"),
            TransportError::Network(msg) => msg.contains("403") || msg.contains("Forbidden"),
        }
    }
}

/// The primary summarization transport.
///
/// One outbound call per invocation; implementations return the raw JSON
/// response and leave shape normalization to the client.
#[async_trait]
pub trait InferenceTransport: Send + Sync {
    /// Run the hosted summarization task for `text` on `model`.
    async fn summarization(&self, text: &str, model: &str) -> Result<Value, TransportError>;
}

/// Default [`InferenceTransport`]: the hosted inference router's model route,
/// authenticated with a bearer token.
pub struct HfInference {
    http: Client,
    token: String,
    endpoint_base: String,
}

impl HfInference {
    /// Build the transport with its own bounded-timeout HTTP client.
    pub fn new(
        token: impl Into<String>,
        endpoint_base: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, PdfSumError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pdfsum/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PdfSumError::Internal(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self {
            http,
            token: token.into(),
            endpoint_base: endpoint_base.into(),
        })
    }

    fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.endpoint_base.trim_end_matches('/'), model)
    }
}

#[async_trait]
impl InferenceTransport for HfInference {
    async fn summarization(&self, text: &str, model: &str) -> Result<Value, TransportError> {
        let response = self
            .http
            .post(self.model_url(model))
            .bearer_auth(&self.token)
            .json(&json!({ "inputs": text }))
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| TransportError::Network(format!("invalid JSON response: {e}")))
    }
}

/// A remote response folded into one of two explicit shapes.
///
/// `StructuredSummary` means the provider returned a recognised summary
/// field; `RawValue` is the stringified response for anything else, kept so
/// the caller still gets *something* rather than an opaque failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NormalizedResponse {
    /// Text taken from a `summary_text` or `generated_text` field.
    StructuredSummary(String),
    /// The response had no recognised field; this is its JSON rendering.
    RawValue(String),
}

impl NormalizedResponse {
    /// Unwrap to the plain summary string.
    pub fn into_text(self) -> String {
        match self {
            NormalizedResponse::StructuredSummary(s) | NormalizedResponse::RawValue(s) => s,
        }
    }
}

/// Fold a raw inference response into a [`NormalizedResponse`].
///
/// Accepts either a bare object or a singleton list wrapping one; prefers
/// `summary_text`, then `generated_text`, then the stringified value.
pub fn normalize_response(value: &Value) -> NormalizedResponse {
    let object = match value {
        Value::Array(items) => items.first().and_then(Value::as_object),
        Value::Object(map) => Some(map),
        _ => None,
    };

    if let Some(map) = object {
        for key in ["summary_text", "generated_text"] {
            if let Some(text) = map.get(key).and_then(Value::as_str) {
                return NormalizedResponse::StructuredSummary(text.to_string());
            }
        }
    }

    NormalizedResponse::RawValue(value.to_string())
}

/// One authenticated summarization client, constructed once per process and
/// shared by reference across the pipeline.
///
/// Holds the primary transport, the fallback HTTP client, and the sizing
/// knobs the two transports share. `Send + Sync`; reusable across runs.
pub struct SummarizationClient {
    transport: Arc<dyn InferenceTransport>,
    http: Client,
    token: String,
    endpoint_base: String,
    model: String,
    max_input_chars: usize,
    max_new_tokens: u32,
}

impl std::fmt::Debug for SummarizationClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SummarizationClient")
            .field("endpoint_base", &self.endpoint_base)
            .field("model", &self.model)
            .field("max_input_chars", &self.max_input_chars)
            .field("max_new_tokens", &self.max_new_tokens)
            .finish_non_exhaustive()
    }
}

impl SummarizationClient {
    /// Resolve a client from configuration.
    ///
    /// Resolution order, most-specific first:
    ///
    /// 1. **Injected transport** (`config.transport`) — used as-is; tests and
    ///    callers with custom middleware land here.
    /// 2. **Configured token** (`config.token`).
    /// 3. **Environment** — `HF_API_TOKEN`, then `HF_TOKEN`.
    ///
    /// With no transport and no token anywhere, the run cannot start:
    /// [`PdfSumError::MissingToken`].
    pub fn from_config(config: &SummarizeConfig) -> Result<Self, PdfSumError> {
        let timeout = Duration::from_secs(config.api_timeout_secs);
        let token = resolve_token(config);

        let transport: Arc<dyn InferenceTransport> = match &config.transport {
            Some(t) => Arc::clone(t),
            None => {
                let token = token.clone().ok_or(PdfSumError::MissingToken)?;
                Arc::new(HfInference::new(token, config.endpoint_base.clone(), timeout)?)
            }
        };

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("pdfsum/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| PdfSumError::Internal(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            transport,
            http,
            token: token.unwrap_or_default(),
            endpoint_base: config.endpoint_base.clone(),
            model: config.model.clone(),
            max_input_chars: config.max_input_chars,
            max_new_tokens: config.max_new_tokens,
        })
    }

    /// The model this client summarizes with.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Summarize one piece of text.
    ///
    /// The text is truncated to the configured character cap before
    /// transmission. The primary transport is tried first; any non-403
    /// failure routes through the fallback POST. The result is always a
    /// plain string or a typed [`ClientError`] — nothing panics or escapes
    /// untyped.
    pub async fn summarize(&self, text: &str) -> Result<String, ClientError> {
        if text.trim().is_empty() {
            return Err(ClientError::EmptyInput);
        }

        let text = truncate_chars(text, self.max_input_chars);
        debug!(chars = text.len(), model = %self.model, "summarization request");

        match self.transport.summarization(text, &self.model).await {
            Ok(value) => Ok(normalize_response(&value).into_text()),
            Err(e) if e.is_forbidden() => Err(ClientError::Forbidden {
                detail: e.to_string(),
            }),
            Err(primary) => {
                warn!(error = %primary, "primary summarization call failed, trying HTTP fallback");
                self.summarize_fallback(text, &primary).await
            }
        }
    }

    /// Probe the remote endpoint with a tiny fixed text.
    ///
    /// Used by the CLI connection test; a 403 here means the token will be
    /// rejected for every real call as well.
    pub async fn check_connection(&self) -> Result<String, ClientError> {
        self.summarize(
            "Artificial intelligence is transforming the world through \
             machine learning and deep learning technologies.",
        )
        .await
    }

    /// The fallback transport: a direct POST to the model route with an
    /// explicit token cap and sampling disabled.
    async fn summarize_fallback(
        &self,
        text: &str,
        primary_err: &TransportError,
    ) -> Result<String, ClientError> {
        let url = format!("{}/{}", self.endpoint_base.trim_end_matches('/'), self.model);
        let payload = json!({
            "inputs": text,
            "parameters": { "max_new_tokens": self.max_new_tokens, "do_sample": false }
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| ClientError::BothFailed {
                primary: primary_err.to_string(),
                fallback: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::FallbackStatus {
                status: status.as_u16(),
                body,
            });
        }

        let value: Value = response
            .json()
            .await
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;

        Ok(normalize_response(&value).into_text())
    }
}

/// Token resolution: explicit config first, then the environment.
fn resolve_token(config: &SummarizeConfig) -> Option<String> {
    if let Some(token) = &config.token {
        if !token.is_empty() {
            return Some(token.clone());
        }
    }
    for var in ["HF_API_TOKEN", "HF_TOKEN"] {
        if let Ok(token) = std::env::var(var) {
            if !token.is_empty() {
                return Some(token);
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_prefers_summary_text() {
        let v = json!({ "summary_text": "short", "generated_text": "long" });
        assert_eq!(
            normalize_response(&v),
            NormalizedResponse::StructuredSummary("short".into())
        );
    }

    #[test]
    fn normalize_falls_back_to_generated_text() {
        let v = json!({ "generated_text": "gen" });
        assert_eq!(
            normalize_response(&v),
            NormalizedResponse::StructuredSummary("gen".into())
        );
    }

    #[test]
    fn normalize_unwraps_singleton_list() {
        let v = json!([{ "summary_text": "listed" }]);
        assert_eq!(
            normalize_response(&v),
            NormalizedResponse::StructuredSummary("listed".into())
        );
    }

    #[test]
    fn normalize_stringifies_unknown_shapes() {
        let v = json!({ "error": "model overloaded" });
        match normalize_response(&v) {
            NormalizedResponse::RawValue(s) => assert!(s.contains("model overloaded")),
            other => panic!("expected RawValue, got {other:?}"),
        }

        let v = json!("bare string");
        assert_eq!(
            normalize_response(&v),
            NormalizedResponse::RawValue("\"bare string\"".into())
        );
    }

    #[test]
    fn transport_error_forbidden_detection() {
        let e = TransportError::Status {
            status: 403,
            body: String::new(),
        };
        assert!(e.is_forbidden());

        let e = TransportError::Status {
            status: 500,
            body: "Forbidden by gateway".into(),
        };
        assert!(e.is_forbidden());

        let e = TransportError::Network("error 403 Forbidden".into());
        assert!(e.is_forbidden());

        let e = TransportError::Status {
            status: 503,
            body: "loading".into(),
        };
        assert!(!e.is_forbidden());
    }

    #[tokio::test]
    async fn empty_input_short_circuits_without_network() {
        struct PanickingTransport;

        #[async_trait]
        impl InferenceTransport for PanickingTransport {
            async fn summarization(&self, _: &str, _: &str) -> Result<Value, TransportError> {
                panic!("must not be called for empty input");
            }
        }

        let config = SummarizeConfig::builder()
            .transport(Arc::new(PanickingTransport))
            .token("test")
            .build()
            .unwrap();
        let client = SummarizationClient::from_config(&config).unwrap();

        let err = client.summarize("   \n  ").await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyInput));
    }

    #[test]
    fn missing_token_is_fatal_without_transport() {
        // Guard against ambient tokens leaking into the test environment.
        let had_any = std::env::var("HF_API_TOKEN").is_ok() || std::env::var("HF_TOKEN").is_ok();
        if had_any {
            return;
        }
        let config = SummarizeConfig::default();
        let err = SummarizationClient::from_config(&config).unwrap_err();
        assert!(matches!(err, PdfSumError::MissingToken));
    }
}
