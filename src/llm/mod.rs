//! Metadata generation backends.
//!
//! [`MetadataGenerator`] is the only seam the promotion engine sees. Remote
//! backends implement the smaller [`CompletionBackend`] trait and are wrapped
//! in [`RemoteGenerator`], which owns prompt building, bounded retries and
//! JSON extraction:
//!
//! - transport failures (connect, timeout, non-2xx) are retried up to
//!   `max_retries` extra times, with no backoff
//! - a reply that is not a JSON object fails immediately as
//!   [`TrellisError::MalformedResponse`]
//!
//! Without a configured provider the deterministic [`StubGenerator`] is used.

pub mod gemini;
pub mod openai;
pub mod prompts;
pub mod scripted;
pub mod stub;

pub use gemini::GeminiBackend;
pub use openai::OpenAiBackend;
pub use scripted::ScriptedGenerator;
pub use stub::StubGenerator;

use anyhow::Context;
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{LlmProvider, LlmSettings};
use crate::context::ContextSummary;
use crate::error::{Result, TrellisError};
use crate::utils::truncate_chars;

const HTTP_CONNECT_TIMEOUT_SECS: u64 = 10;
const HTTP_REQUEST_TIMEOUT_SECS: u64 = 60;

/// Produces a metadata draft (a JSON object) for a project.
pub trait MetadataGenerator {
    /// Backend name for messages, e.g. `"OpenAI"`.
    fn name(&self) -> &str;

    /// Generate a draft from the project summary.
    fn generate(&self, context: &ContextSummary) -> Result<Value>;
}

/// One request/response exchange with a text-completion API.
pub trait CompletionBackend {
    fn provider(&self) -> &str;

    /// Send the prompts and return the raw reply text.
    fn complete(&self, system: &str, user: &str) -> anyhow::Result<String>;
}

/// Generator backed by a remote completion API.
pub struct RemoteGenerator<B> {
    backend: B,
    max_retries: u32,
}

impl<B: CompletionBackend> RemoteGenerator<B> {
    pub fn new(backend: B, max_retries: u32) -> Self {
        Self {
            backend,
            max_retries,
        }
    }
}

impl<B: CompletionBackend> MetadataGenerator for RemoteGenerator<B> {
    fn name(&self) -> &str {
        self.backend.provider()
    }

    fn generate(&self, context: &ContextSummary) -> Result<Value> {
        let (system, user) = prompts::build_prompts(context)?;
        let attempts = self.max_retries + 1;
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            debug!(
                "{} request attempt {attempt}/{attempts}",
                self.backend.provider()
            );
            match self.backend.complete(&system, &user) {
                Ok(text) => return parse_json_payload(&text),
                Err(e) => {
                    warn!("{} request failed (attempt {attempt}): {e:#}", self.backend.provider());
                    last_error = format!("{e:#}");
                }
            }
        }

        Err(TrellisError::Generator {
            provider: self.backend.provider().to_string(),
            message: last_error,
        })
    }
}

/// Pick the generator for the configured provider.
pub fn build_generator(llm: &LlmSettings) -> Result<Box<dyn MetadataGenerator>> {
    let Some(provider) = llm.provider else {
        debug!("No llm provider configured; using stub generator");
        return Ok(Box::new(StubGenerator));
    };

    let key = llm.api_key.clone().ok_or_else(|| {
        TrellisError::config(format!(
            "Missing llm_key for {}. Run `trellis set llm_key <key>`.",
            provider_label(provider)
        ))
    })?;
    let model = llm.model_for(provider);
    let client = create_http_client()?;

    Ok(match provider {
        LlmProvider::OpenAi => Box::new(RemoteGenerator::new(
            OpenAiBackend::new(client, key, model),
            llm.max_retries,
        )),
        LlmProvider::Gemini => Box::new(RemoteGenerator::new(
            GeminiBackend::new(client, key, model),
            llm.max_retries,
        )),
    })
}

fn provider_label(provider: LlmProvider) -> &'static str {
    match provider {
        LlmProvider::OpenAi => openai::PROVIDER,
        LlmProvider::Gemini => gemini::PROVIDER,
    }
}

/// HTTP client with connect and total request timeouts.
pub(crate) fn create_http_client() -> Result<Client> {
    Ok(Client::builder()
        .connect_timeout(Duration::from_secs(HTTP_CONNECT_TIMEOUT_SECS))
        .timeout(Duration::from_secs(HTTP_REQUEST_TIMEOUT_SECS))
        .user_agent(concat!("trellis/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")?)
}

/// Parse a reply into a JSON object, tolerating a markdown code fence.
pub fn parse_json_payload(content: &str) -> Result<Value> {
    let cleaned = strip_code_fence(content);
    let value: Value = serde_json::from_str(&cleaned).map_err(|e| {
        warn!("Unparseable AI response: {}", truncate_chars(content, 1000));
        TrellisError::MalformedResponse {
            message: e.to_string(),
        }
    })?;
    if !value.is_object() {
        return Err(TrellisError::MalformedResponse {
            message: "expected a JSON object".to_string(),
        });
    }
    Ok(value)
}

/// Remove a surrounding ```` ``` ```` fence, with or without a language tag.
pub fn strip_code_fence(content: &str) -> String {
    if !content.contains("```") {
        return content.trim().to_string();
    }
    let mut lines: Vec<&str> = content.trim().lines().collect();
    if lines.first().is_some_and(|l| l.starts_with("```")) {
        lines.remove(0);
    }
    if lines.last().is_some_and(|l| l.starts_with("```")) {
        lines.pop();
    }
    lines.join("\n").trim().to_string()
}
