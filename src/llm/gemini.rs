//! Gemini `generateContent` backend.
//!
//! Gemini takes a single prompt, so the system and user prompts are joined.

use anyhow::{bail, Context};
use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use super::CompletionBackend;

pub const PROVIDER: &str = "Gemini";

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateResponse {
    fn first_text(self) -> String {
        self.candidates
            .into_iter()
            .filter_map(|c| c.content)
            .flat_map(|c| c.parts)
            .find_map(|p| p.text)
            .unwrap_or_default()
    }
}

pub struct GeminiBackend {
    client: Client,
    api_key: String,
    model: String,
}

impl GeminiBackend {
    pub fn new(client: Client, api_key: String, model: String) -> Self {
        Self {
            client,
            api_key,
            model,
        }
    }

    fn endpoint(&self) -> String {
        format!("{API_BASE}/{}:generateContent", self.model)
    }
}

impl CompletionBackend for GeminiBackend {
    fn provider(&self) -> &str {
        PROVIDER
    }

    fn complete(&self, system: &str, user: &str) -> anyhow::Result<String> {
        let body = json!({
            "contents": [{ "parts": [{ "text": format!("{system}\n\n{user}") }] }]
        });

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&body)
            .send()
            .context("Failed to reach Gemini")?;

        let status = response.status();
        if !status.is_success() {
            bail!(
                "HTTP {} - {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown error")
            );
        }

        let reply: GenerateResponse = response.json().context("Failed to decode Gemini reply")?;
        Ok(reply.first_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_text() {
        let reply: GenerateResponse = serde_json::from_str(
            r#"{"candidates": [{"content": {"parts": [{"text": "{\"name\": \"x\"}"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(reply.first_text(), "{\"name\": \"x\"}");
    }

    #[test]
    fn test_empty_reply() {
        let reply: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(reply.first_text(), "");
    }

    #[test]
    fn test_endpoint_includes_model() {
        let backend = GeminiBackend::new(Client::new(), "k".into(), "gemini-1.5-flash".into());
        assert!(backend.endpoint().ends_with("/gemini-1.5-flash:generateContent"));
    }
}
