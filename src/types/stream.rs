//! Streaming types.

use serde::{Deserialize, Serialize};

use super::brief::BriefRecord;
use crate::error::{BriefError, ErrorKind};

/// An event relayed to the caller during a streamed generation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamEvent {
    /// Incremental text fragment plus everything received so far.
    Progress { chunk: String, full: String },
    /// Terminal: the assembled brief.
    Done { result: BriefRecord },
    /// Terminal: the generation failed.
    #[serde(rename = "error")]
    Failed {
        error: String,
        kind: ErrorKind,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        status: Option<u16>,
    },
}

impl StreamEvent {
    pub fn failed(err: &BriefError) -> Self {
        Self::Failed {
            error: err.to_string(),
            kind: err.kind(),
            status: err.upstream_status(),
        }
    }

    /// SSE event name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Progress { .. } => "progress",
            Self::Done { .. } => "done",
            Self::Failed { .. } => "error",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Progress { .. })
    }
}

/// Where a relay is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayPhase {
    Init,
    Relaying,
    Finalizing,
    Done,
    Failed,
}
