//! Client for the external text-generation service.
//!
//! The wire contract is a single synchronous JSON exchange:
//! `{model, prompt, stream:false}` out, `{model, created_at, response,
//! done}` back. Only `response` is consumed. No client-side timeout is
//! applied; the inference backend may legitimately take minutes, and the
//! front-facing server's write timeout is the only bound.

use crate::error::GenerateError;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outbound generation request.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

/// Inbound generation reply. Everything except `response` is metadata
/// the service reports about itself and is ignored here.
#[derive(Debug, Deserialize)]
struct GenerateReply {
    #[serde(default)]
    #[allow(dead_code)]
    model: String,
    #[serde(default)]
    #[allow(dead_code)]
    created_at: String,
    response: String,
    #[serde(default)]
    #[allow(dead_code)]
    done: bool,
}

/// Synchronous client for the generate endpoint.
#[derive(Debug, Clone)]
pub struct BackendClient {
    url: String,
    model: String,
}

impl BackendClient {
    /// Create a client for the given endpoint and fixed model identifier.
    pub fn new(url: impl Into<String>, model: impl Into<String>) -> Self {
        BackendClient {
            url: url.into(),
            model: model.into(),
        }
    }

    /// The configured endpoint URL.
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Submit a prompt and return the completion text.
    pub fn complete(&self, prompt: &str) -> Result<String, GenerateError> {
        let request = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };
        debug!(url = %self.url, model = %self.model, prompt_bytes = prompt.len(), "submitting generation request");

        let response = ureq::post(&self.url)
            .send_json(&request)
            .map_err(|err| match err {
                ureq::Error::Status(status, response) => GenerateError::Backend {
                    status,
                    body: response.into_string().unwrap_or_default(),
                },
                ureq::Error::Transport(transport) => GenerateError::Transport {
                    reason: transport.to_string(),
                },
            })?;

        let reply: GenerateReply =
            response
                .into_json()
                .map_err(|err| GenerateError::MalformedResponse {
                    reason: err.to_string(),
                })?;
        Ok(reply.response)
    }
}
