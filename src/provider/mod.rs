//! Upstream provider trait and the Gemini implementation.

pub mod gemini;
pub mod http;

pub use gemini::GeminiClient;

use async_trait::async_trait;
use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::prompt::Prompt;

/// Raw status and body of a canary call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeResponse {
    pub status_code: u16,
    pub response: String,
}

/// Stream of raw SSE lines as the transport delivers them.
pub type LineStream = BoxStream<'static, Result<String>>;

/// A generative-language API that turns a prompt into free text.
#[async_trait]
pub trait UpstreamClient: Send + Sync {
    /// Blocking generation; returns the first candidate's text.
    async fn generate(&self, prompt: &Prompt) -> Result<String>;

    /// Streamed generation; yields raw server-sent-event lines.
    ///
    /// Non-2xx responses fail here, before any line is produced.
    async fn generate_stream(&self, prompt: &Prompt) -> Result<LineStream>;

    /// Send the canary prompt and return the raw status and body.
    async fn probe(&self) -> Result<ProbeResponse>;
}
