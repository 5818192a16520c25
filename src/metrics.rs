use std::collections::HashMap;

use serde::Serialize;

use crate::error::{EngineError, EngineResult};
use crate::table::PlayTable;

/// Flat efficiency penalty per star ruled out.
pub const STAR_PENALTY: f64 = 0.06;
pub const OFFENSIVE_PLAY_TYPES: [&str; 2] = ["pass", "rush"];

/// Mean EPA of one team's offensive plays in one game.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameAggregate {
    pub game_id: String,
    pub week: i64,
    /// `None` when every play in the game had a null EPA.
    pub mean_epa: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WindowWeight {
    pub window: usize,
    pub weight: f64,
}

/// Weighted set of trailing windows blended into a rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingModel {
    pub windows: Vec<WindowWeight>,
}

impl Default for RatingModel {
    fn default() -> Self {
        Self::blended()
    }
}

impl RatingModel {
    /// 70% five-game, 30% three-game.
    pub fn blended() -> Self {
        Self {
            windows: vec![
                WindowWeight {
                    window: 5,
                    weight: 0.70,
                },
                WindowWeight {
                    window: 3,
                    weight: 0.30,
                },
            ],
        }
    }

    /// Five-game rolling mean only.
    pub fn rolling5() -> Self {
        Self {
            windows: vec![
                WindowWeight {
                    window: 5,
                    weight: 1.0,
                },
                WindowWeight {
                    window: 3,
                    weight: 0.0,
                },
            ],
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "blend" | "blended" | "70/30" => Some(Self::blended()),
            "rolling5" | "5g" | "five" => Some(Self::rolling5()),
            _ => None,
        }
    }

    pub fn rate(
        &self,
        plays: &PlayTable,
        team: &str,
        stars_out: &[String],
    ) -> EngineResult<TeamRating> {
        let games = game_aggregates(plays, team);
        let means: Vec<Option<f64>> = games.iter().map(|g| g.mean_epa).collect();

        let mut rolling = Vec::with_capacity(self.windows.len());
        let mut blended = 0.0;
        for w in &self.windows {
            // Zero-weight windows are reported when defined but never required.
            let Some(latest) = latest_rolling_mean(&means, w.window) else {
                if w.weight == 0.0 {
                    continue;
                }
                return Err(EngineError::InsufficientData {
                    team: team.to_string(),
                });
            };
            blended += w.weight * latest;
            rolling.push(RollingValue {
                window: w.window,
                latest,
            });
        }

        let penalty = STAR_PENALTY * stars_out.len() as f64;
        Ok(TeamRating {
            team: team.to_string(),
            games: games.len(),
            rolling,
            blended,
            stars_out: stars_out.to_vec(),
            injury_penalty: penalty,
            rating: blended - penalty,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RollingValue {
    pub window: usize,
    pub latest: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamRating {
    pub team: String,
    pub games: usize,
    pub rolling: Vec<RollingValue>,
    pub blended: f64,
    pub stars_out: Vec<String>,
    pub injury_penalty: f64,
    pub rating: f64,
}

/// Blended 70/30 rating for `team`, less the star penalty.
pub fn rating(plays: &PlayTable, team: &str, stars_out: &[String]) -> EngineResult<f64> {
    RatingModel::blended()
        .rate(plays, team, stars_out)
        .map(|r| r.rating)
}

/// Per-game EPA means for `team`'s pass/rush plays, ordered by week.
pub fn game_aggregates(plays: &PlayTable, team: &str) -> Vec<GameAggregate> {
    struct Acc {
        week: i64,
        sum: f64,
        n: usize,
    }

    let mut order: Vec<&str> = Vec::new();
    let mut acc: HashMap<&str, Acc> = HashMap::new();
    for p in &plays.rows {
        if p.posteam != team || !OFFENSIVE_PLAY_TYPES.contains(&p.play_type.as_str()) {
            continue;
        }
        let entry = acc.entry(p.game_id.as_str()).or_insert_with(|| {
            order.push(p.game_id.as_str());
            Acc {
                week: p.week,
                sum: 0.0,
                n: 0,
            }
        });
        if let Some(epa) = p.epa.filter(|v| v.is_finite()) {
            entry.sum += epa;
            entry.n += 1;
        }
    }

    let mut games: Vec<GameAggregate> = order
        .into_iter()
        .filter_map(|id| {
            let a = acc.get(id)?;
            Some(GameAggregate {
                game_id: id.to_string(),
                week: a.week,
                mean_epa: (a.n > 0).then(|| a.sum / a.n as f64),
            })
        })
        .collect();
    games.sort_by(|a, b| a.week.cmp(&b.week).then_with(|| a.game_id.cmp(&b.game_id)));
    games
}

/// Trailing mean over the last `window` points, skipping undefined points.
/// Uses whatever is available when fewer than `window` points exist.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            mean_defined(&values[start..=i])
        })
        .collect()
}

fn latest_rolling_mean(values: &[Option<f64>], window: usize) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let start = values.len().saturating_sub(window.max(1));
    mean_defined(&values[start..])
}

fn mean_defined(values: &[Option<f64>]) -> Option<f64> {
    let (sum, n) = values
        .iter()
        .flatten()
        .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::PlayRecord;

    #[test]
    fn rolling_mean_uses_partial_windows() {
        let vals = [Some(1.0), Some(2.0), Some(3.0), Some(4.0)];
        let r3 = rolling_mean(&vals, 3);
        assert_eq!(r3, vec![Some(1.0), Some(1.5), Some(2.0), Some(3.0)]);
    }

    #[test]
    fn rolling_mean_skips_undefined_games() {
        let vals = [Some(1.0), None, Some(3.0)];
        assert_eq!(rolling_mean(&vals, 2), vec![Some(1.0), Some(1.0), Some(3.0)]);
        assert_eq!(rolling_mean(&[None], 5), vec![None]);
    }

    #[test]
    fn aggregates_are_week_ordered_and_filtered() {
        let plays = PlayTable::new(vec![
            PlayRecord::new("SEA", "pass", "g3", 3, 0.3),
            PlayRecord::new("SEA", "rush", "g1", 1, 0.2),
            PlayRecord::new("SEA", "pass", "g1", 1, 0.0),
            PlayRecord::new("SEA", "punt", "g1", 1, 5.0),
            PlayRecord::new("NE", "pass", "g1", 1, 9.0),
        ]);
        let games = game_aggregates(&plays, "SEA");
        assert_eq!(games.len(), 2);
        assert_eq!(games[0].game_id, "g1");
        assert!((games[0].mean_epa.unwrap() - 0.1).abs() < 1e-12);
        assert_eq!(games[1].week, 3);
    }

    #[test]
    fn blend_weights_recent_form() {
        // Per-game means 0..=5 over weeks 1..=6: r5 = 3.0, r3 = 4.0.
        let plays = PlayTable::new(
            (0..6)
                .map(|i| PlayRecord::new("SEA", "pass", &format!("g{i}"), i + 1, i as f64))
                .collect(),
        );
        let r = RatingModel::blended().rate(&plays, "SEA", &[]).unwrap();
        assert!((r.rolling[0].latest - 3.0).abs() < 1e-12);
        assert!((r.rolling[1].latest - 4.0).abs() < 1e-12);
        assert!((r.rating - (0.7 * 3.0 + 0.3 * 4.0)).abs() < 1e-12);

        let simple = RatingModel::rolling5().rate(&plays, "SEA", &[]).unwrap();
        assert!((simple.rating - 3.0).abs() < 1e-12);
    }

    #[test]
    fn zero_weight_window_may_be_undefined() {
        // Two defined games, then three where every play had a null EPA.
        let mut rows: Vec<PlayRecord> = (0..5)
            .map(|i| PlayRecord::new("SEA", "pass", &format!("g{i}"), i + 1, 0.1 * (i + 1) as f64))
            .collect();
        for r in rows.iter_mut().skip(2) {
            r.epa = None;
        }
        let plays = PlayTable::new(rows);

        let five = RatingModel::rolling5().rate(&plays, "SEA", &[]).unwrap();
        assert!((five.rating - 0.15).abs() < 1e-12);
        assert_eq!(five.rolling.len(), 1);
        assert_eq!(five.rolling[0].window, 5);

        assert!(matches!(
            RatingModel::blended().rate(&plays, "SEA", &[]),
            Err(EngineError::InsufficientData { .. })
        ));
    }

    #[test]
    fn no_plays_is_insufficient_data() {
        let plays = PlayTable::new(vec![PlayRecord::new("NE", "pass", "g1", 1, 0.1)]);
        assert_eq!(
            rating(&plays, "SEA", &[]),
            Err(EngineError::InsufficientData {
                team: "SEA".to_string()
            })
        );
    }

    #[test]
    fn model_names_parse() {
        assert_eq!(RatingModel::parse("Blend"), Some(RatingModel::blended()));
        assert_eq!(RatingModel::parse("rolling5"), Some(RatingModel::rolling5()));
        assert_eq!(RatingModel::parse("elo"), None);
    }
}
