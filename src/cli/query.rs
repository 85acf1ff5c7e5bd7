//! Query mode CLI logic
//!
//! Runs one helper or diagnostic and renders its result as JSON.

use crate::{api::BiliClient, config::Settings, diagnostics};
use anyhow::Result;
use clap::Subcommand;
use serde::Serialize;

/// One-shot commands
#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum QueryCommand {
    /// buvid3 and b_nut cookies from the landing page
    BuvidCookies,
    /// buvid3 from the getbuvid endpoint
    Buvid,
    /// buvid3/buvid4 pair from the finger/spi endpoint
    BuvidSpi,
    /// Streamer profile
    MasterInfo {
        #[arg(long)]
        uid: u64,
    },
    /// Areas a streamer used recently
    CommonAreas {
        #[arg(long)]
        room_id: u64,
    },
    /// Full live area tree
    Areas,
    /// Legacy room summary for a user
    RoomInfoOld {
        #[arg(long)]
        mid: u64,
    },
    /// Room details
    RoomBaseInfo {
        #[arg(long)]
        room_id: u64,
    },
    /// Check whether TLS certificates can be verified
    SslProbe {
        /// URL to probe instead of the configured one
        #[arg(long)]
        url: Option<String>,
    },
    /// Check internet connectivity
    Connectivity,
}

/// Rendered command result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryOutput {
    pub success: bool,
    pub json: String,
}

impl QueryOutput {
    fn render<T: Serialize>(success: bool, value: &T) -> Result<Self> {
        Ok(Self {
            success,
            json: serde_json::to_string_pretty(value)?,
        })
    }
}

macro_rules! envelope {
    ($call:expr) => {{
        let envelope = $call.await;
        QueryOutput::render(envelope.is_success(), &envelope)
    }};
}

/// Run a single command against the configured upstream
pub async fn run_query(command: &QueryCommand, settings: &Settings) -> Result<QueryOutput> {
    tracing::debug!("Running query: {:?}", command);

    let client = || BiliClient::from_settings(settings);

    match command {
        QueryCommand::BuvidCookies => envelope!(client()?.fetch_buvid3_and_bnut()),
        QueryCommand::Buvid => envelope!(client()?.fetch_buvid3()),
        QueryCommand::BuvidSpi => envelope!(client()?.fetch_buvid_pair()),
        QueryCommand::MasterInfo { uid } => envelope!(client()?.master_info(*uid)),
        QueryCommand::CommonAreas { room_id } => {
            envelope!(client()?.anchor_common_areas(*room_id))
        }
        QueryCommand::Areas => envelope!(client()?.area_list()),
        QueryCommand::RoomInfoOld { mid } => envelope!(client()?.room_info_old(*mid)),
        QueryCommand::RoomBaseInfo { room_id } => envelope!(client()?.room_base_info(*room_id)),
        QueryCommand::SslProbe { url } => {
            let url = url.as_deref().unwrap_or(&settings.probe.ssl_test_url);
            let report = diagnostics::probe_ssl(url, settings.probe.timeout()).await;
            QueryOutput::render(report.success, &report)
        }
        QueryCommand::Connectivity => {
            let report = diagnostics::check_connectivity(&settings.connectivity).await;
            QueryOutput::render(report.connected, &report)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_input_renders_envelope() {
        let output = run_query(&QueryCommand::MasterInfo { uid: 0 }, &Settings::default())
            .await
            .unwrap();

        assert!(!output.success);
        let json: serde_json::Value = serde_json::from_str(&output.json).unwrap();
        assert_eq!(json["kind"], "invalid_input");
        assert_eq!(json["status_code"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_ssl_probe_invalid_url() {
        let command = QueryCommand::SslProbe {
            url: Some("::not a url".to_string()),
        };
        let output = run_query(&command, &Settings::default()).await.unwrap();

        assert!(!output.success);
        assert!(output.json.contains("\"code\": 2"));
    }
}
