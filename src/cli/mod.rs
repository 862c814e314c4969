//! Command-line arguments for the server binary.

use std::path::PathBuf;

use clap::Parser;

use crate::config::Overrides;

/// Music brief generator HTTP service
#[derive(Parser, Debug)]
#[command(name = "music-brief", version, about = "Gemini-backed music brief generator service")]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Address to bind (overrides HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Emit logs as JSON
    #[arg(long)]
    pub log_json: bool,
}

impl Cli {
    /// Parse CLI arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn overrides(&self) -> Overrides {
        Overrides {
            host: self.host.clone(),
            port: self.port,
        }
    }
}
