/// Points per unit of per-play EPA differential.
pub const SPREAD_SCALE: f64 = 22.0;
/// Decimal places kept on every published spread and edge.
pub const SPREAD_DECIMALS: i32 = 2;

/// Projected point differential; positive favors team A.
pub fn predicted_spread(rating_a: f64, rating_b: f64) -> f64 {
    round_to((rating_a - rating_b) * SPREAD_SCALE, SPREAD_DECIMALS)
}

pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10_f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_and_precision_are_fixed() {
        assert_eq!(SPREAD_SCALE, 22.0);
        assert_eq!(SPREAD_DECIMALS, 2);
    }

    #[test]
    fn tenth_of_epa_is_about_two_points() {
        assert!((predicted_spread(0.20, 0.10) - 2.2).abs() < 1e-9);
        assert!((predicted_spread(0.20, 0.00) - 4.4).abs() < 1e-9);
        assert!((predicted_spread(-0.013, 0.05) + 1.39).abs() < 1e-9);
    }

    #[test]
    fn round_to_two_places() {
        assert_eq!(round_to(5.678, 2), 5.68);
        assert_eq!(round_to(-5.678, 2), -5.68);
        assert_eq!(round_to(3.0, 2), 3.0);
    }
}
