use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::WeatherConfig;
use crate::error::EngineError;
use crate::http_client::http_client;
use crate::predict::{SPREAD_DECIMALS, round_to};

/// Spread multiplier once any rain is falling.
pub const RAIN_SUPPRESSION: f64 = 0.95;
/// Points credited to the surface beneficiary in heavy rain.
pub const SURFACE_ADVANTAGE_PTS: f64 = 1.5;
/// Rain (mm) above which the surface advantage applies.
pub const HEAVY_RAIN_MM: f64 = 2.0;

/// Team that the heavy-rain surface advantage is credited to. This is a
/// fixed editorial call, not derived from either offense's run/pass mix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum SurfaceBeneficiary {
    #[default]
    TeamA,
    TeamB,
}

impl SurfaceBeneficiary {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "a" | "team_a" | "home" => Some(Self::TeamA),
            "b" | "team_b" | "away" => Some(Self::TeamB),
            _ => None,
        }
    }

    /// Sign of the bonus in the spread frame (positive favors team A).
    fn sign(self) -> f64 {
        match self {
            Self::TeamA => 1.0,
            Self::TeamB => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherAdjustment {
    pub precipitation_mm: f64,
    pub suppression_factor: f64,
    pub surface_advantage: f64,
    pub final_spread: f64,
}

/// `(final_spread, suppression_factor)` with the bonus credited to team A.
pub fn adjust(spread: f64, precipitation_mm: f64) -> (f64, f64) {
    let adj = adjust_for(spread, precipitation_mm, SurfaceBeneficiary::TeamA);
    (adj.final_spread, adj.suppression_factor)
}

pub fn adjust_for(
    spread: f64,
    precipitation_mm: f64,
    beneficiary: SurfaceBeneficiary,
) -> WeatherAdjustment {
    let suppression_factor = if precipitation_mm > 0.0 {
        RAIN_SUPPRESSION
    } else {
        1.0
    };
    let surface_advantage = if precipitation_mm > HEAVY_RAIN_MM {
        SURFACE_ADVANTAGE_PTS * beneficiary.sign()
    } else {
        0.0
    };
    WeatherAdjustment {
        precipitation_mm,
        suppression_factor,
        surface_advantage,
        final_spread: round_to(
            spread * suppression_factor + surface_advantage,
            SPREAD_DECIMALS,
        ),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PrecipitationReading {
    pub mm: f64,
    pub observed_at: Option<String>,
    /// Set when the fetch failed and `mm` is the 0.0 fallback.
    pub warning: Option<EngineError>,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current: Option<CurrentBlock>,
}

#[derive(Debug, Deserialize)]
struct CurrentBlock {
    time: Option<String>,
    precipitation: Option<f64>,
}

/// Extracts `current.precipitation` (mm) from an open-meteo forecast body.
pub fn parse_current_precipitation(raw: &str) -> Result<(f64, Option<String>)> {
    let resp: ForecastResponse = serde_json::from_str(raw).context("decode forecast json")?;
    let current = resp
        .current
        .ok_or_else(|| anyhow!("forecast has no current block"))?;
    let mm = current
        .precipitation
        .ok_or_else(|| anyhow!("forecast has no current precipitation"))?;
    let mm = if mm.is_finite() { mm.max(0.0) } else { 0.0 };
    Ok((mm, current.time))
}

pub struct WeatherClient {
    cfg: WeatherConfig,
}

impl WeatherClient {
    pub fn new(cfg: WeatherConfig) -> Self {
        Self { cfg }
    }

    /// Live precipitation at the venue. Never fails: any error maps to 0.0mm.
    pub fn current_precipitation(&self) -> PrecipitationReading {
        match self.fetch() {
            Ok((mm, observed_at)) => {
                info!(mm, lat = self.cfg.latitude, lon = self.cfg.longitude, "weather read");
                PrecipitationReading {
                    mm,
                    observed_at,
                    warning: None,
                }
            }
            Err(err) => {
                warn!(error = %err, "weather fetch failed, assuming no rain");
                PrecipitationReading {
                    mm: 0.0,
                    observed_at: None,
                    warning: Some(EngineError::unavailable("weather", format!("{err:#}"))),
                }
            }
        }
    }

    fn fetch(&self) -> Result<(f64, Option<String>)> {
        let client = http_client()?;
        let lat = self.cfg.latitude.to_string();
        let lon = self.cfg.longitude.to_string();
        let body = client
            .get(&self.cfg.url)
            .query(&[
                ("latitude", lat.as_str()),
                ("longitude", lon.as_str()),
                ("current", "precipitation,rain,showers"),
                ("timezone", self.cfg.timezone.as_str()),
            ])
            .send()
            .context("weather request failed")?
            .error_for_status()
            .context("weather status")?
            .text()
            .context("weather body")?;
        parse_current_precipitation(&body)
    }
}
