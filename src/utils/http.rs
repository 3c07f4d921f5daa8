// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use crate::error::Result;
use crate::models::{Credentials, FeedConfig};

/// Create a configured blocking HTTP client.
pub fn create_client(config: &FeedConfig) -> Result<reqwest::blocking::Client> {
    let client = reqwest::blocking::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a remote file's bytes, failing on any non-success status.
pub fn download(
    client: &reqwest::blocking::Client,
    url: &str,
    credentials: &Credentials,
) -> Result<Vec<u8>> {
    let response = client
        .get(url)
        .basic_auth(&credentials.username, Some(&credentials.password))
        .send()?
        .error_for_status()?;
    Ok(response.bytes()?.to_vec())
}
