use std::time::Instant;

use anyhow::Result;

use gridiron_edge::config::EngineConfig;
use gridiron_edge::http_client::http_client;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FeedStatus {
    Reachable,
    Blocked,
    RateLimited,
    Unexpected(u16),
}

fn classify_status(code: u16) -> FeedStatus {
    match code {
        200..=299 => FeedStatus::Reachable,
        403 => FeedStatus::Blocked,
        429 => FeedStatus::RateLimited,
        other => FeedStatus::Unexpected(other),
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");

    let cfg = EngineConfig::from_env();
    let Some(&season) = cfg.feed.seasons.first() else {
        println!("No seasons configured (NFL_SEASONS).");
        return Ok(());
    };
    if let Some(dir) = cfg.feed.data_dir.as_ref() {
        println!("NFL_DATA_DIR is set ({}); network feed is not used.", dir.display());
    }
    let url = cfg.feed.pbp_url(season);
    println!("Testing connection to {url} ...");

    let client = http_client()?;
    let start = Instant::now();
    match client.get(&url).header("Range", "bytes=0-3").send() {
        Ok(resp) => {
            let secs = start.elapsed().as_secs_f64();
            match classify_status(resp.status().as_u16()) {
                FeedStatus::Reachable => {
                    println!("OK: feed responded in {secs:.2}s. The engine can run.");
                }
                FeedStatus::Blocked => {
                    println!("BLOCKED (403): this IP is currently refused by the host.");
                    println!("Fix: switch networks to get a new IP.");
                }
                FeedStatus::RateLimited => {
                    println!("RATE LIMITED (429): too many requests.");
                    println!("Fix: wait a few minutes or switch networks.");
                }
                FeedStatus::Unexpected(code) => {
                    println!("UNEXPECTED: server returned status {code}.");
                }
            }
        }
        Err(err) if err.is_timeout() => {
            println!("TIMEOUT: the host is too slow or dropping packets.");
            println!("Fix: check connection quality or raise HTTP_TIMEOUT_SECS.");
        }
        Err(err) => {
            println!("CONNECTION ERROR: {err}");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_map_to_hints() {
        assert_eq!(classify_status(200), FeedStatus::Reachable);
        assert_eq!(classify_status(206), FeedStatus::Reachable);
        assert_eq!(classify_status(403), FeedStatus::Blocked);
        assert_eq!(classify_status(429), FeedStatus::RateLimited);
        assert_eq!(classify_status(500), FeedStatus::Unexpected(500));
    }
}
