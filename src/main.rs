//! Query mode binary
//!
//! Runs one API helper or diagnostic and prints its JSON result to stdout.
//! Exits with status 1 when the result reports failure.
//!
//! # Usage
//!
//! ```bash
//! bililive master-info --uid 143474500
//! bililive --insecure common-areas --room-id 25322725
//! bililive ssl-probe --url https://api.bilibili.com
//! ```

use bililive_api::{
    cli::{
        init_logging,
        query::{QueryCommand, run_query},
    },
    config::ConfigLoader,
    utils::VERSION,
};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "bililive")]
#[command(disable_version_flag = true, arg_required_else_help = true)]
struct Cli {
    /// Configuration file (defaults to the per-user config location)
    #[arg(short, long, value_name = "FILE", global = true)]
    config: Option<PathBuf>,

    /// Disable TLS certificate verification for upstream requests
    #[arg(long, global = true)]
    insecure: bool,

    /// Enable verbose logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Show version information
    #[arg(long)]
    version: bool,

    #[command(subcommand)]
    command: Option<QueryCommand>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.version {
        println!("{}", VERSION);
        return Ok(());
    }

    let Some(command) = cli.command else {
        anyhow::bail!("no command given, see --help");
    };

    let mut settings = ConfigLoader::new().load(cli.config.as_deref())?;
    init_logging(
        settings.logging.level_or("error"),
        cli.verbose || settings.logging.verbose,
    );

    if cli.insecure {
        settings.client.verify_tls = false;
    }

    let output = run_query(&command, &settings).await?;
    println!("{}", output.json);

    if !output.success {
        std::process::exit(1);
    }
    Ok(())
}
