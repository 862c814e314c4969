//! HTTP client construction, SSE line handling, and status mapping.

use std::future::Future;
use std::time::Duration;

use futures::{Stream, StreamExt};

use crate::error::{BriefError, Result};

/// Build a reqwest client. `timeout` bounds connection establishment; callers
/// apply per-request deadlines.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(timeout)
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| BriefError::Configuration(format!("cannot build HTTP client: {e}")))
}

/// Parse an SSE `data:` line, returning None for other lines and `[DONE]`.
pub fn parse_sse_data(line: &str) -> Option<&str> {
    let data = line.strip_prefix("data:")?;
    let data = data.strip_prefix(' ').unwrap_or(data);
    if data == "[DONE]" {
        return None;
    }
    Some(data)
}

/// Map a non-success HTTP status to an error.
pub fn status_to_error(status: u16, body: &str) -> BriefError {
    match status {
        403 => BriefError::UpstreamForbidden(body.to_string()),
        _ => BriefError::UpstreamStatus {
            status,
            body: body.to_string(),
        },
    }
}

/// Fail a response with a non-2xx status, consuming its body for the message.
pub async fn check_status(resp: reqwest::Response) -> Result<reqwest::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let body_text = resp.text().await.unwrap_or_default();
    Err(status_to_error(status.as_u16(), &body_text))
}

/// Line stream over a response body.
pub fn response_lines(
    resp: reqwest::Response,
) -> impl Stream<Item = Result<String>> + Send + 'static {
    split_lines(resp.bytes_stream())
}

/// Re-frame a byte stream into text lines, without the trailing `\r\n`.
///
/// A final line without a terminating newline is still yielded. The first
/// transport error is yielded and ends the stream.
pub fn split_lines<S, B, E>(bytes: S) -> impl Stream<Item = Result<String>> + Send + 'static
where
    S: Stream<Item = std::result::Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Into<BriefError> + Send + 'static,
{
    async_stream::stream! {
        let mut buffer: Vec<u8> = Vec::new();
        futures::pin_mut!(bytes);

        while let Some(chunk) = bytes.next().await {
            let chunk = match chunk {
                Ok(c) => c,
                Err(e) => {
                    yield Err(e.into());
                    return;
                }
            };
            buffer.extend_from_slice(chunk.as_ref());

            while let Some(line_end) = buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = buffer.drain(..=line_end).collect();
                yield Ok(decode_line(&line));
            }
        }

        if !buffer.is_empty() {
            yield Ok(decode_line(&buffer));
        }
    }
}

fn decode_line(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim_end_matches(['\n', '\r'])
        .to_string()
}

/// Wrap a future with a timeout.
pub async fn with_timeout<T>(
    duration: Duration,
    future: impl Future<Output = Result<T>>,
) -> Result<T> {
    match tokio::time::timeout(duration, future).await {
        Ok(result) => result,
        Err(_) => Err(BriefError::Timeout(duration.as_millis() as u64)),
    }
}
