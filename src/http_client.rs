use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

const DEFAULT_TIMEOUT_SECS: u64 = 10;
// Season play-by-play files run to tens of megabytes.
const DOWNLOAD_TIMEOUT_SECS: u64 = 180;
const USER_AGENT: &str = "gridiron-edge/0.1";

static CLIENT: OnceCell<Client> = OnceCell::new();
static DOWNLOAD_CLIENT: OnceCell<Client> = OnceCell::new();

/// Shared client for small API calls (weather, feed checks).
pub fn http_client() -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| build_client(timeout_from_env()))
}

/// Shared client for bulk season downloads.
pub fn download_client() -> Result<&'static Client> {
    DOWNLOAD_CLIENT.get_or_try_init(|| build_client(DOWNLOAD_TIMEOUT_SECS))
}

fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .context("failed to build http client")
}

fn timeout_from_env() -> u64 {
    std::env::var("HTTP_TIMEOUT_SECS")
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
        .clamp(2, 120)
}
