use std::fs;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use reqwest::header::{
    ETAG, HeaderMap, HeaderName, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

const CACHE_VERSION: u32 = 1;
const CACHE_DIR: &str = "gridiron_edge";

/// Sidecar metadata stored next to each cached payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheMeta {
    version: u32,
    url: String,
    etag: Option<String>,
    last_modified: Option<String>,
    fetched_at: u64,
}

/// GETs `url`, revalidating against the on-disk copy when one exists.
///
/// A 304 serves the cached body. Cache write failures are logged and
/// otherwise ignored; the fresh body is still returned.
pub fn fetch_bytes_cached(client: &Client, url: &str) -> Result<Vec<u8>> {
    let paths = cache_paths(url);
    let cached = paths.as_ref().and_then(|(body_path, meta_path)| {
        let meta = fs::read_to_string(meta_path)
            .ok()
            .and_then(|raw| serde_json::from_str::<CacheMeta>(&raw).ok())
            .filter(|m| m.version == CACHE_VERSION && m.url == url)?;
        let body = fs::read(body_path).ok()?;
        Some((meta, body))
    });

    let mut req = client.get(url);
    if let Some((meta, _)) = cached.as_ref() {
        if let Some(etag) = meta.etag.as_ref() {
            req = req.header(IF_NONE_MATCH, etag);
        }
        if let Some(last_modified) = meta.last_modified.as_ref() {
            req = req.header(IF_MODIFIED_SINCE, last_modified);
        }
    }

    let resp = req.send().with_context(|| format!("request {url}"))?;
    let status = resp.status();
    if status == StatusCode::NOT_MODIFIED {
        if let Some((_, body)) = cached {
            debug!(url, "served from download cache");
            return Ok(body);
        }
        return Err(anyhow!("received 304 without cache body for {url}"));
    }
    if !status.is_success() {
        return Err(anyhow!("http {status} for {url}"));
    }

    let meta = CacheMeta {
        version: CACHE_VERSION,
        url: url.to_string(),
        etag: header_str(resp.headers(), ETAG),
        last_modified: header_str(resp.headers(), LAST_MODIFIED),
        fetched_at: system_time_to_secs(SystemTime::now()).unwrap_or_default(),
    };
    let body = resp
        .bytes()
        .with_context(|| format!("read body {url}"))?
        .to_vec();

    if let Some((body_path, meta_path)) = paths {
        if let Err(err) = store(&body_path, &meta_path, &body, &meta) {
            warn!(url, error = %err, "download cache write failed");
        }
    }
    Ok(body)
}

/// Plain GET without the disk cache.
pub fn fetch_bytes(client: &Client, url: &str) -> Result<Vec<u8>> {
    let resp = client
        .get(url)
        .send()
        .with_context(|| format!("request {url}"))?
        .error_for_status()
        .with_context(|| format!("status for {url}"))?;
    let body = resp.bytes().with_context(|| format!("read body {url}"))?;
    Ok(body.to_vec())
}

fn header_str(headers: &HeaderMap, name: HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
}

fn store(body_path: &Path, meta_path: &Path, body: &[u8], meta: &CacheMeta) -> Result<()> {
    if let Some(dir) = body_path.parent() {
        fs::create_dir_all(dir).context("create cache dir")?;
    }
    let tmp = body_path.with_extension("tmp");
    fs::write(&tmp, body).context("write cached body")?;
    fs::rename(&tmp, body_path).context("swap cached body")?;
    let json = serde_json::to_string(meta).context("serialize cache meta")?;
    fs::write(meta_path, json).context("write cache meta")?;
    Ok(())
}

fn cache_paths(url: &str) -> Option<(PathBuf, PathBuf)> {
    let dir = app_cache_dir()?;
    let key = cache_key(url);
    Some((
        dir.join(format!("{key}.bin")),
        dir.join(format!("{key}.meta.json")),
    ))
}

fn cache_key(url: &str) -> String {
    let digest = Sha256::digest(url.as_bytes());
    digest.iter().map(|b| format!("{b:02x}")).collect()
}

pub fn app_cache_dir() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CACHE_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CACHE_DIR));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(PathBuf::from(home).join(".cache").join(CACHE_DIR))
}

fn system_time_to_secs(time: SystemTime) -> Option<u64> {
    time.duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}
