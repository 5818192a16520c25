use chrono::Utc;
use serde::Serialize;

use crate::edge::{EdgeCall, EdgeConfig, Side, evaluate_with};
use crate::error::EngineResult;
use crate::metrics::{RatingModel, TeamRating};
use crate::predict::predicted_spread;
use crate::table::PlayTable;
use crate::weather::{SurfaceBeneficiary, WeatherAdjustment, adjust_for};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Matchup {
    pub team_a: String,
    pub team_b: String,
}

impl Matchup {
    pub fn new(team_a: &str, team_b: &str) -> Self {
        Self {
            team_a: team_a.to_string(),
            team_b: team_b.to_string(),
        }
    }

    pub fn team(&self, side: Side) -> &str {
        match side {
            Side::TeamA => &self.team_a,
            Side::TeamB => &self.team_b,
        }
    }
}

/// Structured outcome of one run. Built in stages so the console can print
/// the projection before asking for a market line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub generated_at: String,
    pub matchup: Matchup,
    pub rating_a: TeamRating,
    pub rating_b: TeamRating,
    pub predicted_spread: f64,
    pub weather: Option<WeatherAdjustment>,
    pub final_spread: f64,
    pub edge: Option<EdgeCall>,
    pub warnings: Vec<String>,
}

impl Prediction {
    /// Rates both teams and projects the raw spread. Fails if either team has
    /// no qualifying plays.
    pub fn project(
        plays: &PlayTable,
        matchup: &Matchup,
        stars_a: &[String],
        stars_b: &[String],
        model: &RatingModel,
    ) -> EngineResult<Self> {
        let rating_a = model.rate(plays, &matchup.team_a, stars_a)?;
        let rating_b = model.rate(plays, &matchup.team_b, stars_b)?;
        let spread = predicted_spread(rating_a.rating, rating_b.rating);
        Ok(Self {
            generated_at: Utc::now().to_rfc3339(),
            matchup: matchup.clone(),
            rating_a,
            rating_b,
            predicted_spread: spread,
            weather: None,
            final_spread: spread,
            edge: None,
            warnings: Vec::new(),
        })
    }

    pub fn apply_weather(&mut self, precipitation_mm: f64, beneficiary: SurfaceBeneficiary) {
        let adj = adjust_for(self.predicted_spread, precipitation_mm, beneficiary);
        self.final_spread = adj.final_spread;
        self.weather = Some(adj);
    }

    /// Evaluates the market line with the dead zone matching whether weather ran.
    pub fn apply_market(&mut self, market_line: f64) -> EdgeCall {
        let cfg = EdgeConfig::for_run(self.weather.is_some());
        let call = evaluate_with(self.final_spread, market_line, &cfg);
        self.edge = Some(call);
        call
    }

    pub fn recommended_team(&self) -> Option<&str> {
        self.edge.map(|e| self.matchup.team(e.recommended_side))
    }
}

/// One-shot pipeline: ratings, spread, optional weather, optional market line.
/// `weather` pairs the observed precipitation with the team credited for the
/// wet-surface advantage.
pub fn predict(
    plays: &PlayTable,
    matchup: &Matchup,
    stars_a: &[String],
    stars_b: &[String],
    model: &RatingModel,
    weather: Option<(f64, SurfaceBeneficiary)>,
    market_line: Option<f64>,
) -> EngineResult<Prediction> {
    let mut prediction = Prediction::project(plays, matchup, stars_a, stars_b, model)?;
    if let Some((mm, beneficiary)) = weather {
        prediction.apply_weather(mm, beneficiary);
    }
    if let Some(line) = market_line {
        prediction.apply_market(line);
    }
    Ok(prediction)
}
