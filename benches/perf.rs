use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use gridiron_edge::injuries::stars_out;
use gridiron_edge::metrics::{RatingModel, game_aggregates};
use gridiron_edge::table::{InjuryRecord, InjuryTable, PlayRecord, PlayTable};

const TEAMS: [&str; 8] = ["SEA", "NE", "SF", "KC", "BUF", "DET", "PHI", "BAL"];

// Roughly one regular season: 17 weeks, ~130 plays per game.
fn synthetic_season() -> PlayTable {
    let mut rows = Vec::new();
    for week in 1..=17_i64 {
        for (t, team) in TEAMS.iter().enumerate() {
            let game_id = format!("2025_{week:02}_{team}");
            for play in 0..130 {
                let play_type = match play % 5 {
                    0 | 1 => "pass",
                    2 | 3 => "rush",
                    _ => "punt",
                };
                let epa = (((week * 31 + t as i64 * 7 + play) % 23) as f64 - 11.0) / 20.0;
                rows.push(PlayRecord::new(team, play_type, &game_id, week, epa));
            }
        }
    }
    PlayTable::new(rows)
}

fn synthetic_injuries() -> InjuryTable {
    let positions = ["QB", "RB", "T", "LB", "WR", "CB"];
    let statuses = ["Out", "Questionable", "Doubtful"];
    let mut rows = Vec::new();
    for (t, team) in TEAMS.iter().enumerate() {
        for i in 0..40 {
            rows.push(InjuryRecord::new(
                team,
                positions[(i + t) % positions.len()],
                statuses[i % statuses.len()],
                &format!("{team} player {i}"),
            ));
        }
    }
    InjuryTable::new(rows)
}

fn bench_game_aggregates(c: &mut Criterion) {
    let plays = synthetic_season();
    c.bench_function("game_aggregates_one_team", |b| {
        b.iter(|| {
            let games = game_aggregates(black_box(&plays), black_box("SEA"));
            black_box(games.len());
        })
    });
}

fn bench_team_rating(c: &mut Criterion) {
    let plays = synthetic_season();
    let injuries = synthetic_injuries();
    let model = RatingModel::blended();
    c.bench_function("team_rating_with_injuries", |b| {
        b.iter(|| {
            let stars = stars_out(black_box(&injuries), "SEA");
            let r = model.rate(black_box(&plays), "SEA", &stars).unwrap();
            black_box(r.rating);
        })
    });
}

criterion_group!(benches, bench_game_aggregates, bench_team_rating);
criterion_main!(benches);
