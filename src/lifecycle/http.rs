//! Shared HTTP client construction and error mapping

use crate::config::NetworkConfig;
use crate::core::LpmError;
use anyhow::{Context, Result};
use reqwest::Client;

/// Builds the client used for version queries and downloads.
///
/// The read timeout bounds each wait for data, so large downloads are not cut
/// off as long as bytes keep arriving.
pub fn build_client(network: &NetworkConfig) -> Result<Client> {
    Client::builder()
        .connect_timeout(network.connect_timeout())
        .read_timeout(network.read_timeout())
        .user_agent(network.user_agent())
        .build()
        .context("Failed to build HTTP client")
}

/// Sends a GET request and rejects non-success statuses.
pub(crate) async fn get(client: &Client, url: &str) -> Result<reqwest::Response, LpmError> {
    tracing::debug!(target: "lifecycle", "GET {}", url);

    let response = client.get(url).send().await.map_err(|e| network_error(url, &e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(LpmError::NetworkError {
            url: url.to_string(),
            reason: format!("HTTP {status}"),
        });
    }
    Ok(response)
}

/// Maps a transport error onto [`LpmError::NetworkError`].
pub(crate) fn network_error(url: &str, error: &reqwest::Error) -> LpmError {
    let reason = if error.is_timeout() {
        format!("request timed out: {error}")
    } else if error.is_connect() {
        format!("could not connect: {error}")
    } else {
        error.to_string()
    };
    LpmError::NetworkError {
        url: url.to_string(),
        reason,
    }
}
