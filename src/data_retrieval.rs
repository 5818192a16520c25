use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use tracing::{info, warn};

use crate::config::FeedConfig;
use crate::error::EngineError;
use crate::http_cache::{fetch_bytes, fetch_bytes_cached};
use crate::http_client::download_client;
use crate::table::{InjuryTable, PlayTable, injuries_from_bytes, plays_from_bytes};

/// Where raw season payloads come from. Implementations return undecoded bytes;
/// normalization into tables happens in one place, below.
pub trait SeasonSource {
    fn play_by_play(&self, season: i32) -> Result<Vec<u8>>;
    fn injuries(&self, season: i32) -> Result<Vec<u8>>;
}

/// Pulls nflverse release assets over HTTP.
pub struct HttpSource {
    cfg: FeedConfig,
}

impl HttpSource {
    pub fn new(cfg: FeedConfig) -> Self {
        Self { cfg }
    }

    fn get(&self, url: &str) -> Result<Vec<u8>> {
        let client = download_client()?;
        if self.cfg.http_cache {
            fetch_bytes_cached(client, url)
        } else {
            fetch_bytes(client, url)
        }
    }
}

impl SeasonSource for HttpSource {
    fn play_by_play(&self, season: i32) -> Result<Vec<u8>> {
        self.get(&self.cfg.pbp_url(season))
    }

    fn injuries(&self, season: i32) -> Result<Vec<u8>> {
        self.get(&self.cfg.injuries_url(season))
    }
}

/// Reads pre-downloaded files (`play_by_play_{season}.parquet|json`,
/// `injuries_{season}.parquet|json`) from a directory.
pub struct LocalDirSource {
    dir: PathBuf,
}

impl LocalDirSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read_first(&self, stem: &str) -> Result<Vec<u8>> {
        for ext in ["parquet", "json"] {
            let path = self.dir.join(format!("{stem}.{ext}"));
            if path.is_file() {
                return std::fs::read(&path).with_context(|| format!("read {}", path.display()));
            }
        }
        Err(anyhow!(
            "no {stem}.parquet or {stem}.json in {}",
            self.dir.display()
        ))
    }
}

impl SeasonSource for LocalDirSource {
    fn play_by_play(&self, season: i32) -> Result<Vec<u8>> {
        self.read_first(&format!("play_by_play_{season}"))
    }

    fn injuries(&self, season: i32) -> Result<Vec<u8>> {
        self.read_first(&format!("injuries_{season}"))
    }
}

pub fn source_from_config(cfg: &FeedConfig) -> Box<dyn SeasonSource> {
    match cfg.data_dir.as_deref() {
        Some(dir) => Box::new(LocalDirSource::new(dir)),
        None => Box::new(HttpSource::new(cfg.clone())),
    }
}

#[derive(Debug, Clone, Default)]
pub struct NflData {
    pub plays: PlayTable,
    pub injuries: InjuryTable,
    /// Recoverable feed failures, already converted to empty data.
    pub warnings: Vec<EngineError>,
}

/// Loads play-by-play and injury tables for `seasons`.
///
/// Play-by-play failures are fatal. Injury failures for a season yield no rows
/// for that season plus a `DataUnavailable` warning.
pub fn get_nfl_data(source: &dyn SeasonSource, seasons: &[i32]) -> Result<NflData> {
    info!(?seasons, "fetching play-by-play data");
    let plays = load_plays(source, seasons)?;

    info!(?seasons, "fetching injury reports");
    let mut injuries = InjuryTable::empty();
    let mut warnings = Vec::new();
    for &season in seasons {
        match source
            .injuries(season)
            .and_then(|bytes| injuries_from_bytes(&bytes))
        {
            Ok(table) => injuries.append(table),
            Err(err) => {
                warn!(season, error = %err, "injury report unavailable, continuing without it");
                warnings.push(EngineError::unavailable(
                    &format!("injury report {season}"),
                    format!("{err:#}"),
                ));
            }
        }
    }

    Ok(NflData {
        plays,
        injuries,
        warnings,
    })
}

pub fn load_plays(source: &dyn SeasonSource, seasons: &[i32]) -> Result<PlayTable> {
    let mut plays = PlayTable::default();
    for &season in seasons {
        let bytes = source
            .play_by_play(season)
            .with_context(|| format!("fetch play-by-play for {season}"))?;
        let table =
            plays_from_bytes(&bytes).with_context(|| format!("decode play-by-play for {season}"))?;
        info!(season, rows = table.len(), "play-by-play loaded");
        plays.append(table);
    }
    Ok(plays)
}
