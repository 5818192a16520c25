use std::env;
use std::path::PathBuf;

use crate::metrics::RatingModel;
use crate::weather::SurfaceBeneficiary;

const DEFAULT_SEASON: i32 = 2025;
const DEFAULT_TEAM_A: &str = "SEA";
const DEFAULT_TEAM_B: &str = "NE";

const DEFAULT_PBP_URL_TEMPLATE: &str =
    "https://github.com/nflverse/nflverse-data/releases/download/pbp/play_by_play_{season}.parquet";
const DEFAULT_INJURIES_URL_TEMPLATE: &str =
    "https://github.com/nflverse/nflverse-data/releases/download/injuries/injuries_{season}.parquet";

// Levi's Stadium, Santa Clara.
const DEFAULT_VENUE_LAT: f64 = 37.403;
const DEFAULT_VENUE_LON: f64 = -121.970;
const DEFAULT_VENUE_TZ: &str = "America/Los_Angeles";
const DEFAULT_WEATHER_URL: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Debug, Clone)]
pub struct FeedConfig {
    pub seasons: Vec<i32>,
    pub pbp_url_template: String,
    pub injuries_url_template: String,
    pub data_dir: Option<PathBuf>,
    pub http_cache: bool,
}

impl FeedConfig {
    pub fn pbp_url(&self, season: i32) -> String {
        fill_season(&self.pbp_url_template, season)
    }

    pub fn injuries_url(&self, season: i32) -> String {
        fill_season(&self.injuries_url_template, season)
    }
}

#[derive(Debug, Clone)]
pub struct WeatherConfig {
    pub enabled: bool,
    pub url: String,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: String,
    pub surface_beneficiary: SurfaceBeneficiary,
}

#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub team_a: String,
    pub team_b: String,
    pub feed: FeedConfig,
    pub weather: WeatherConfig,
    pub rating_model: RatingModel,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        let seasons = env::var("NFL_SEASONS")
            .ok()
            .map(|raw| parse_seasons(&raw))
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| vec![DEFAULT_SEASON]);
        let data_dir = env::var("NFL_DATA_DIR")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .map(PathBuf::from);

        let feed = FeedConfig {
            seasons,
            pbp_url_template: env_string("NFL_PBP_URL_TEMPLATE", DEFAULT_PBP_URL_TEMPLATE),
            injuries_url_template: env_string(
                "NFL_INJURIES_URL_TEMPLATE",
                DEFAULT_INJURIES_URL_TEMPLATE,
            ),
            data_dir,
            http_cache: env_bool("NFL_HTTP_CACHE", true),
        };

        let surface_beneficiary = env::var("SURFACE_BENEFICIARY")
            .ok()
            .and_then(|v| SurfaceBeneficiary::parse(&v))
            .unwrap_or_default();
        let weather = WeatherConfig {
            enabled: env_bool("WEATHER_ENABLED", true),
            url: env_string("WEATHER_URL", DEFAULT_WEATHER_URL),
            latitude: env_f64("VENUE_LAT", DEFAULT_VENUE_LAT).clamp(-90.0, 90.0),
            longitude: env_f64("VENUE_LON", DEFAULT_VENUE_LON).clamp(-180.0, 180.0),
            timezone: env_string("VENUE_TIMEZONE", DEFAULT_VENUE_TZ),
            surface_beneficiary,
        };

        let rating_model = env::var("RATING_MODEL")
            .ok()
            .and_then(|v| RatingModel::parse(&v))
            .unwrap_or_default();

        Self {
            team_a: env_team("NFL_TEAM_A", DEFAULT_TEAM_A),
            team_b: env_team("NFL_TEAM_B", DEFAULT_TEAM_B),
            feed,
            weather,
            rating_model,
        }
    }
}

pub fn parse_seasons(raw: &str) -> Vec<i32> {
    raw.split(',')
        .filter_map(|s| s.trim().parse::<i32>().ok())
        .filter(|y| (1999..=2100).contains(y))
        .collect()
}

fn fill_season(template: &str, season: i32) -> String {
    template.replace("{season}", &season.to_string())
}

fn env_string(key: &str, default: &str) -> String {
    env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn env_team(key: &str, default: &str) -> String {
    env_string(key, default).to_ascii_uppercase()
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    let Ok(raw) = env::var(key) else {
        return default;
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seasons_parse_skips_garbage() {
        assert_eq!(parse_seasons("2024, 2025,abc,,1850"), vec![2024, 2025]);
        assert!(parse_seasons("").is_empty());
    }

    #[test]
    fn url_template_fills_season() {
        let feed = FeedConfig {
            seasons: vec![2025],
            pbp_url_template: DEFAULT_PBP_URL_TEMPLATE.to_string(),
            injuries_url_template: DEFAULT_INJURIES_URL_TEMPLATE.to_string(),
            data_dir: None,
            http_cache: false,
        };
        assert!(feed.pbp_url(2025).ends_with("/pbp/play_by_play_2025.parquet"));
        assert!(feed.injuries_url(2024).ends_with("/injuries/injuries_2024.parquet"));
    }
}
