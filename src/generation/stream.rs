//! Streamed generation: relay upstream fragments, then assemble the brief.

use std::sync::Arc;

use futures::{Stream, StreamExt};
use tokio::sync::mpsc;
use tracing::{debug, info_span, warn, Instrument};

use crate::error::BriefError;
use crate::prompt::Prompt;
use crate::provider::gemini::envelope_text;
use crate::provider::http::parse_sse_data;
use crate::provider::UpstreamClient;
use crate::types::{RelayPhase, StreamEvent};

use super::parse_brief;

/// Capacity of the channel between the relay task and the SSE body.
pub const EVENT_CHANNEL_CAPACITY: usize = 32;

/// Turns upstream SSE lines into progress events and one terminal event.
#[derive(Debug)]
pub struct StreamAssembler {
    accumulated: String,
    phase: RelayPhase,
}

impl Default for StreamAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl StreamAssembler {
    pub fn new() -> Self {
        Self {
            accumulated: String::new(),
            phase: RelayPhase::Init,
        }
    }

    pub fn phase(&self) -> RelayPhase {
        self.phase
    }

    /// Text received so far.
    pub fn accumulated(&self) -> &str {
        &self.accumulated
    }

    /// Feed one raw line. Returns a progress event when it carried text.
    ///
    /// Non-data lines, `[DONE]`, and envelopes that fail to parse are skipped.
    pub fn push_line(&mut self, line: &str) -> Option<StreamEvent> {
        if self.phase == RelayPhase::Init {
            self.phase = RelayPhase::Relaying;
        }
        let data = parse_sse_data(line)?;
        let chunk = match envelope_text(data) {
            Ok(Some(text)) => text,
            Ok(None) => return None,
            Err(e) => {
                debug!(error = %e, "skipping unparseable stream line");
                return None;
            }
        };
        self.accumulated.push_str(&chunk);
        Some(StreamEvent::Progress {
            chunk,
            full: self.accumulated.clone(),
        })
    }

    /// Upstream ended: parse the accumulated text into the terminal event.
    pub fn finish(&mut self) -> StreamEvent {
        self.phase = RelayPhase::Finalizing;
        match parse_brief(&self.accumulated) {
            Ok(result) => {
                self.phase = RelayPhase::Done;
                StreamEvent::Done { result }
            }
            Err(e) => self.fail(&e),
        }
    }

    /// Terminal error event.
    pub fn fail(&mut self, err: &BriefError) -> StreamEvent {
        self.phase = RelayPhase::Failed;
        StreamEvent::failed(err)
    }
}

/// Drive `lines` through an assembler, sending events to `tx`.
///
/// Stops as soon as the receiver is gone; dropping `lines` on return
/// releases the upstream connection.
pub async fn relay_lines<S>(lines: S, tx: mpsc::Sender<StreamEvent>) -> RelayPhase
where
    S: Stream<Item = crate::error::Result<String>> + Send,
{
    futures::pin_mut!(lines);
    let mut assembler = StreamAssembler::new();

    loop {
        let next = tokio::select! {
            _ = tx.closed() => {
                debug!("downstream closed, abandoning upstream stream");
                return assembler.phase();
            }
            next = lines.next() => next,
        };

        match next {
            Some(Ok(line)) => {
                if let Some(event) = assembler.push_line(&line) {
                    if tx.send(event).await.is_err() {
                        debug!("downstream closed, abandoning upstream stream");
                        return assembler.phase();
                    }
                }
            }
            Some(Err(e)) => {
                warn!(error = %e, "upstream stream failed");
                let _ = tx.send(assembler.fail(&e)).await;
                return assembler.phase();
            }
            None => break,
        }
    }

    let _ = tx.send(assembler.finish()).await;
    assembler.phase()
}

/// Start a streamed generation in the background.
///
/// The returned receiver yields progress events followed by exactly one
/// terminal event. Dropping it cancels the upstream request.
pub fn spawn_relay(
    upstream: Arc<dyn UpstreamClient>,
    prompt: Prompt,
) -> mpsc::Receiver<StreamEvent> {
    let (tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
    let span = info_span!("brief_stream", request_id = %uuid::Uuid::new_v4());

    tokio::spawn(
        async move {
            let opened = tokio::select! {
                _ = tx.closed() => {
                    debug!("downstream closed before upstream answered");
                    return;
                }
                opened = upstream.generate_stream(&prompt) => opened,
            };

            let phase = match opened {
                Ok(lines) => relay_lines(lines, tx).await,
                Err(e) => {
                    warn!(error = %e, "upstream stream rejected");
                    let _ = tx.send(StreamEvent::failed(&e)).await;
                    RelayPhase::Failed
                }
            };
            debug!(?phase, "relay finished");
        }
        .instrument(span),
    );

    rx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_line(text: &str) -> String {
        let envelope = serde_json::json!({
            "candidates": [{"content": {"parts": [{"text": text}]}}]
        });
        format!("data: {envelope}")
    }

    #[test]
    fn phases_advance_through_success() {
        let mut assembler = StreamAssembler::new();
        assert_eq!(assembler.phase(), RelayPhase::Init);

        assert!(assembler.push_line(&data_line("{\"bpm\":")).is_some());
        assert_eq!(assembler.phase(), RelayPhase::Relaying);
        assembler.push_line(&data_line(" \"90\"}"));

        let event = assembler.finish();
        assert_eq!(assembler.phase(), RelayPhase::Done);
        match event {
            StreamEvent::Done { result } => assert_eq!(result.raw()["bpm"], "90"),
            other => panic!("expected Done, got {other:?}"),
        }
    }

    #[test]
    fn noise_lines_are_skipped() {
        let mut assembler = StreamAssembler::new();
        assert!(assembler.push_line("").is_none());
        assert!(assembler.push_line(": keep-alive").is_none());
        assert!(assembler.push_line("data: {broken").is_none());
        assert!(assembler.push_line("data: [DONE]").is_none());
        assert_eq!(assembler.accumulated(), "");
        assert_eq!(assembler.phase(), RelayPhase::Relaying);
    }

    #[test]
    fn unparseable_accumulation_fails() {
        let mut assembler = StreamAssembler::new();
        assembler.push_line(&data_line("{\"style\": }"));
        let event = assembler.finish();
        assert_eq!(assembler.phase(), RelayPhase::Failed);
        assert!(matches!(
            event,
            StreamEvent::Failed { kind: crate::error::ErrorKind::Parse, .. }
        ));
    }
}
