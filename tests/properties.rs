use proptest::prelude::*;

use gridiron_edge::metrics::{STAR_PENALTY, rating};
use gridiron_edge::predict::{predicted_spread, round_to};
use gridiron_edge::table::{PlayRecord, PlayTable};
use gridiron_edge::weather::adjust;

fn season(epas: &[f64]) -> PlayTable {
    PlayTable::new(
        epas.iter()
            .enumerate()
            .map(|(i, epa)| PlayRecord::new("SEA", "pass", &format!("g{i}"), i as i64 + 1, *epa))
            .collect(),
    )
}

proptest! {
    #[test]
    fn spread_is_antisymmetric(a in -1.0f64..1.0, b in -1.0f64..1.0) {
        prop_assert_eq!(predicted_spread(a, b), -predicted_spread(b, a));
    }

    #[test]
    fn injury_penalty_is_linear(
        epas in prop::collection::vec(-1.5f64..1.5, 1..12),
        n in 0usize..8,
    ) {
        let plays = season(&epas);
        let stars: Vec<String> = (0..n).map(|i| format!("player {i}")).collect();
        let base = rating(&plays, "SEA", &[]).unwrap();
        let hurt = rating(&plays, "SEA", &stars).unwrap();
        prop_assert!(base.is_finite());
        prop_assert!((hurt - (base - STAR_PENALTY * n as f64)).abs() < 1e-12);
    }

    #[test]
    fn zero_rain_only_rounds(spread in -30.0f64..30.0) {
        prop_assert_eq!(adjust(spread, 0.0), (round_to(spread, 2), 1.0));
    }
}
