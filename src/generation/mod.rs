//! Brief generation: blocking and streamed.

pub mod stream;

pub use stream::{relay_lines, spawn_relay, StreamAssembler};

use tracing::debug;

use crate::error::Result;
use crate::extract::extract;
use crate::prompt::Prompt;
use crate::provider::UpstreamClient;
use crate::types::BriefRecord;

/// Extract and parse a brief from raw model text.
///
/// Both the blocking and streaming paths finish through this function.
pub fn parse_brief(raw_text: &str) -> Result<BriefRecord> {
    BriefRecord::from_json_str(&extract(raw_text))
}

/// Generate a brief for `idea` with one blocking upstream call.
pub async fn generate_brief(upstream: &dyn UpstreamClient, idea: &str) -> Result<BriefRecord> {
    let prompt = Prompt::compose(idea)?;
    let raw_text = upstream.generate(&prompt).await?;
    debug!(chars = raw_text.len(), "received brief text");
    parse_brief(&raw_text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BriefError;

    #[test]
    fn parse_brief_accepts_fenced_output() {
        let record = parse_brief("Voici:\n```json\n{\"style\": \"lofi\"}\n```").unwrap();
        assert_eq!(record.raw()["style"], "lofi");
    }

    #[test]
    fn parse_brief_without_object_yields_empty_record() {
        let record = parse_brief("sorry, no brief today").unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn parse_brief_rejects_greedy_span_over_two_objects() {
        let err = parse_brief("{\"a\":1} and {\"b\":2}").unwrap_err();
        assert!(matches!(err, BriefError::Parse(_)));
    }
}
