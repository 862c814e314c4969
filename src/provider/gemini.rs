//! Google Gemini API client.

use async_trait::async_trait;
use futures::StreamExt;
use serde::Deserialize;
use tracing::debug;

use crate::config::BriefConfig;
use crate::error::{BriefError, Result};
use crate::prompt::Prompt;

use super::http::{build_client, check_status, response_lines, with_timeout};
use super::{LineStream, ProbeResponse, UpstreamClient};

pub struct GeminiClient {
    client: reqwest::Client,
    config: BriefConfig,
}

impl GeminiClient {
    pub fn new(config: BriefConfig) -> Result<Self> {
        let client = build_client(config.request_timeout())?;
        Ok(Self { client, config })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent?key={}",
            self.config.base_url(),
            self.config.model(),
            self.config.api_key()
        )
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse&key={}",
            self.config.base_url(),
            self.config.model(),
            self.config.api_key()
        )
    }

    async fn post(&self, url: &str, prompt: &Prompt) -> Result<reqwest::Response> {
        let timeout = self.config.request_timeout();
        let request = self
            .client
            .post(url)
            .json(&prompt.to_request_body())
            .send();
        with_timeout(timeout, async { request.await.map_err(map_transport) }).await
    }
}

#[async_trait]
impl UpstreamClient for GeminiClient {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        debug!(model = self.config.model(), "Gemini generate");

        let timeout = self.config.request_timeout();
        with_timeout(timeout, async {
            let resp = self.post(&self.generate_url(), prompt).await?;
            let resp = check_status(resp).await?;
            let data: GeminiResponse = resp.json().await.map_err(|e| {
                if e.is_decode() {
                    BriefError::parse(format!("unexpected Gemini response: {e}"))
                } else {
                    map_transport(e)
                }
            })?;
            data.first_candidate_text()
                .ok_or_else(|| BriefError::parse("No candidates in Gemini response"))
        })
        .await
    }

    async fn generate_stream(&self, prompt: &Prompt) -> Result<LineStream> {
        debug!(model = self.config.model(), "Gemini generate_stream");

        let resp = self.post(&self.stream_url(), prompt).await?;
        let resp = check_status(resp).await?;
        Ok(response_lines(resp).boxed())
    }

    async fn probe(&self) -> Result<ProbeResponse> {
        debug!(model = self.config.model(), "Gemini probe");

        let resp = self.post(&self.generate_url(), &Prompt::canary()).await?;
        let status_code = resp.status().as_u16();
        let response = resp.text().await.map_err(map_transport)?;
        Ok(ProbeResponse {
            status_code,
            response,
        })
    }
}

fn map_transport(err: reqwest::Error) -> BriefError {
    BriefError::UpstreamUnreachable(err.without_url())
}

/// Text carried by one streamed envelope: the first candidate's parts, joined.
///
/// `Ok(None)` means the envelope parsed but held no text.
pub fn envelope_text(data: &str) -> std::result::Result<Option<String>, serde_json::Error> {
    let envelope: GeminiResponse = serde_json::from_str(data)?;
    Ok(envelope.first_candidate_text().filter(|t| !t.is_empty()))
}

// Internal Gemini response types

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

impl GeminiResponse {
    fn first_candidate_text(self) -> Option<String> {
        let candidate = self.candidates.into_iter().next()?;
        let text = candidate
            .content
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        Some(text)
    }
}

#[derive(Deserialize)]
struct GeminiCandidate {
    content: Option<GeminiContent>,
}

#[derive(Deserialize)]
struct GeminiContent {
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Deserialize)]
struct GeminiPart {
    text: Option<String>,
}
