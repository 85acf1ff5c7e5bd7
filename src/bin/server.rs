//! HTTP gateway binary
//!
//! Serves the API helpers and diagnostics as JSON over HTTP.
//!
//! # Usage
//!
//! ```bash
//! bililive-server --port 4417 --host 0.0.0.0
//! ```
//!
//! # API Endpoints
//!
//! - `GET /ping`: Health check endpoint
//! - `GET /cookies/bnut`, `GET /buvid/getbuvid`, `GET /buvid/spi`
//! - `GET /live/master_info/{uid}`, `GET /live/common_areas/{room_id}`,
//!   `GET /live/areas`, `GET /live/room_info_old/{mid}`,
//!   `GET /live/room_base_info/{room_id}`
//! - `POST /diagnostics/ssl_probe`, `GET /diagnostics/connectivity`

use bililive_api::{
    cli::{
        init_logging,
        server::{ServerArgs, run_server_mode},
    },
    config::ConfigLoader,
};
use clap::Parser;
use std::path::PathBuf;

/// HTTP gateway for the live API helpers
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Host to bind to
    #[arg(long)]
    host: Option<String>,

    /// Configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Disable TLS certificate verification for upstream requests
    #[arg(long)]
    insecure: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = ConfigLoader::new().load(cli.config.as_deref())?;
    init_logging(
        settings.logging.level_or("info"),
        cli.verbose || settings.logging.verbose,
    );

    let args = ServerArgs {
        port: cli.port,
        host: cli.host,
        insecure: cli.insecure,
    };
    run_server_mode(args, settings).await
}
