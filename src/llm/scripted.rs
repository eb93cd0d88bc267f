//! Test double for [`MetadataGenerator`].
//!
//! ```
//! use serde_json::json;
//! use trellis::llm::{MetadataGenerator, ScriptedGenerator};
//!
//! let generator = ScriptedGenerator::new().with_response(json!({"name": "widget-tool"}));
//! assert_eq!(generator.call_count(), 0);
//! ```

use serde_json::Value;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use super::{parse_json_payload, MetadataGenerator};
use crate::context::ContextSummary;
use crate::error::{Result, TrellisError};

#[derive(Debug, Clone)]
enum Reply {
    Json(Value),
    Raw(String),
    Error(String),
}

/// Generator that returns a fixed reply and records what it was asked.
#[derive(Debug)]
pub struct ScriptedGenerator {
    reply: Reply,
    call_count: AtomicU32,
    last_context: Mutex<Option<ContextSummary>>,
}

impl Default for ScriptedGenerator {
    fn default() -> Self {
        Self {
            reply: Reply::Json(Value::Object(Default::default())),
            call_count: AtomicU32::new(0),
            last_context: Mutex::new(None),
        }
    }
}

impl ScriptedGenerator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reply with this draft.
    #[must_use]
    pub fn with_response(mut self, draft: Value) -> Self {
        self.reply = Reply::Json(draft);
        self
    }

    /// Reply with raw text, parsed like a real backend reply.
    #[must_use]
    pub fn with_raw_response(mut self, text: &str) -> Self {
        self.reply = Reply::Raw(text.to_string());
        self
    }

    /// Fail every call with a transport error.
    #[must_use]
    pub fn with_error(mut self, message: &str) -> Self {
        self.reply = Reply::Error(message.to_string());
        self
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::SeqCst)
    }

    /// Context passed to the most recent call.
    pub fn last_context(&self) -> Option<ContextSummary> {
        self.last_context.lock().ok().and_then(|guard| guard.clone())
    }
}

impl MetadataGenerator for ScriptedGenerator {
    fn name(&self) -> &str {
        "scripted"
    }

    fn generate(&self, context: &ContextSummary) -> Result<Value> {
        self.call_count.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut guard) = self.last_context.lock() {
            *guard = Some(context.clone());
        }
        match &self.reply {
            Reply::Json(value) => Ok(value.clone()),
            Reply::Raw(text) => parse_json_payload(text),
            Reply::Error(message) => Err(TrellisError::Generator {
                provider: self.name().to_string(),
                message: message.clone(),
            }),
        }
    }
}
