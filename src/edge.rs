use std::fmt;

use serde::Serialize;

use crate::predict::{SPREAD_DECIMALS, round_to};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Side {
    TeamA,
    TeamB,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SignalStrength {
    Massive,
    Moderate,
    None,
}

impl fmt::Display for SignalStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Massive => "massive",
            Self::Moderate => "moderate",
            Self::None => "none",
        };
        f.write_str(label)
    }
}

/// Bucket thresholds for classifying an edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeConfig {
    /// Edges at or below (or strictly below, see `dead_zone_inclusive`) this are noise.
    pub dead_zone: f64,
    pub dead_zone_inclusive: bool,
    /// Edges at or above this are massive.
    pub massive_at: f64,
}

impl EdgeConfig {
    /// Weather-adjusted runs: `<= 1.5` none, `>= 3.0` massive.
    pub fn weather() -> Self {
        Self {
            dead_zone: 1.5,
            dead_zone_inclusive: true,
            massive_at: 3.0,
        }
    }

    /// Runs without the weather step: `< 0.5` none.
    pub fn basic() -> Self {
        Self {
            dead_zone: 0.5,
            dead_zone_inclusive: false,
            massive_at: 3.0,
        }
    }

    pub fn for_run(weather_ran: bool) -> Self {
        if weather_ran {
            Self::weather()
        } else {
            Self::basic()
        }
    }

    pub fn classify(&self, edge: f64) -> SignalStrength {
        let in_dead_zone = if self.dead_zone_inclusive {
            edge <= self.dead_zone
        } else {
            edge < self.dead_zone
        };
        if in_dead_zone {
            SignalStrength::None
        } else if edge >= self.massive_at {
            SignalStrength::Massive
        } else {
            SignalStrength::Moderate
        }
    }
}

impl Default for EdgeConfig {
    fn default() -> Self {
        Self::weather()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EdgeCall {
    pub market_line: f64,
    pub recommended_side: Side,
    pub edge_magnitude: f64,
    pub signal_strength: SignalStrength,
}

/// Compares the model spread with the market line.
///
/// Side A when the model spread is strictly above the line; a tie goes to B.
pub fn evaluate(final_spread: f64, market_line: f64) -> (Side, f64, SignalStrength) {
    let call = evaluate_with(final_spread, market_line, &EdgeConfig::weather());
    (call.recommended_side, call.edge_magnitude, call.signal_strength)
}

pub fn evaluate_with(final_spread: f64, market_line: f64, cfg: &EdgeConfig) -> EdgeCall {
    let edge_magnitude = round_to((final_spread - market_line).abs(), SPREAD_DECIMALS);
    let recommended_side = if final_spread > market_line {
        Side::TeamA
    } else {
        Side::TeamB
    };
    EdgeCall {
        market_line,
        recommended_side,
        edge_magnitude,
        signal_strength: cfg.classify(edge_magnitude),
    }
}
