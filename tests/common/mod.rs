//! Shared test helpers and a scripted upstream.

#![allow(dead_code)]

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::StreamExt;

use music_brief::error::{BriefError, Result};
use music_brief::prompt::Prompt;
use music_brief::provider::{LineStream, ProbeResponse, UpstreamClient};

/// SSE data line carrying one Gemini text fragment.
pub fn data_line(text: &str) -> String {
    let envelope = serde_json::json!({
        "candidates": [{"content": {"parts": [{"text": text}], "role": "model"}}]
    });
    format!("data: {envelope}")
}

/// What the fake answers with.
pub enum Script {
    Text(String),
    Lines(Vec<String>),
    /// Lines followed by a transport failure.
    LinesThenFailure(Vec<String>),
    /// Lines, then the stream stays open forever.
    LinesThenHang(Vec<String>),
    Status(u16, String),
}

/// Sets a flag when dropped; used to observe upstream stream release.
pub struct DropFlag(pub Arc<AtomicBool>);

impl Drop for DropFlag {
    fn drop(&mut self) {
        self.0.store(true, Ordering::SeqCst);
    }
}

/// An upstream that replays a script and records its calls.
pub struct FakeUpstream {
    script: Mutex<Option<Script>>,
    pub calls: AtomicUsize,
    pub prompts: Mutex<Vec<Prompt>>,
    pub stream_dropped: Arc<AtomicBool>,
}

impl FakeUpstream {
    pub fn new(script: Script) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(Some(script)),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
            stream_dropped: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn take(&self, prompt: &Prompt) -> Script {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts.lock().unwrap().push(prompt.clone());
        self.script
            .lock()
            .unwrap()
            .take()
            .expect("fake upstream called more than once")
    }
}

fn status_error(status: u16, body: String) -> BriefError {
    music_brief::provider::http::status_to_error(status, &body)
}

#[async_trait]
impl UpstreamClient for FakeUpstream {
    async fn generate(&self, prompt: &Prompt) -> Result<String> {
        match self.take(prompt) {
            Script::Text(text) => Ok(text),
            Script::Lines(lines) => Ok(lines.concat()),
            Script::Status(status, body) => Err(status_error(status, body)),
            Script::LinesThenFailure(_) | Script::LinesThenHang(_) => {
                Err(BriefError::Timeout(1))
            }
        }
    }

    async fn generate_stream(&self, prompt: &Prompt) -> Result<LineStream> {
        let flag = DropFlag(self.stream_dropped.clone());
        let (lines, tail) = match self.take(prompt) {
            Script::Lines(lines) => (lines, Tail::End),
            Script::LinesThenFailure(lines) => (lines, Tail::Fail),
            Script::LinesThenHang(lines) => (lines, Tail::Hang),
            Script::Text(text) => (vec![data_line(&text)], Tail::End),
            Script::Status(status, body) => return Err(status_error(status, body)),
        };

        let stream = async_stream::stream! {
            let _flag = flag;
            for line in lines {
                yield Ok(line);
            }
            match tail {
                Tail::End => {}
                Tail::Fail => yield Err(BriefError::Timeout(1)),
                Tail::Hang => futures::future::pending::<()>().await,
            }
        };
        Ok(stream.boxed())
    }

    async fn probe(&self) -> Result<ProbeResponse> {
        match self.take(&Prompt::canary()) {
            Script::Status(status_code, response) => Ok(ProbeResponse {
                status_code,
                response,
            }),
            Script::Text(response) => Ok(ProbeResponse {
                status_code: 200,
                response,
            }),
            _ => Err(BriefError::Timeout(1)),
        }
    }
}

enum Tail {
    End,
    Fail,
    Hang,
}
