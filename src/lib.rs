//! music-brief: production brief generator.
//!
//! Turns a short musical idea into a structured production brief using the
//! Google Gemini API, streams generation progress over server-sent events,
//! and exports briefs as PDF documents.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use music_brief::config::BriefConfig;
//! use music_brief::provider::GeminiClient;
//! use music_brief::server::{build_router, AppState};
//!
//! # async fn example() -> music_brief::error::Result<()> {
//! let config = BriefConfig::builder().api_key("your-key").build();
//! let app = build_router(AppState::new(Arc::new(GeminiClient::new(config)?)));
//! # let _ = app;
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod extract;
pub mod generation;
pub mod prelude;
pub mod prompt;
pub mod provider;
pub mod render;
pub mod server;
pub mod types;
