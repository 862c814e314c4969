//! Convenience re-exports for common use.

pub use crate::config::BriefConfig;
pub use crate::error::{BriefError, ErrorKind, Result};
pub use crate::extract::extract;
pub use crate::generation::{generate_brief, parse_brief, spawn_relay};
pub use crate::prompt::Prompt;
pub use crate::provider::{GeminiClient, UpstreamClient};
pub use crate::render::{layout_brief, render_pdf};
pub use crate::types::{BriefField, BriefRecord, FieldValue, StreamEvent};
