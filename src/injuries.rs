use crate::table::InjuryTable;

/// Positions whose absence moves an offense's efficiency.
pub const CRITICAL_POSITIONS: [&str; 7] = ["QB", "T", "G", "C", "WR", "CB", "DE"];
pub const RULED_OUT_STATUSES: [&str; 2] = ["Out", "Doubtful"];

/// Names of critical-position players ruled Out/Doubtful for `team`, in table order.
pub fn stars_out(injuries: &InjuryTable, team: &str) -> Vec<String> {
    injuries
        .rows
        .iter()
        .filter(|r| r.team == team)
        .filter(|r| CRITICAL_POSITIONS.contains(&r.position.as_str()))
        .filter(|r| RULED_OUT_STATUSES.contains(&r.report_status.as_str()))
        .map(|r| r.full_name.clone())
        .collect()
}

/// Splits a comma-separated console line into trimmed, non-empty names.
pub fn parse_manual_names(line: &str) -> Vec<String> {
    line.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Appends hand-sourced names. Duplicates are kept; only the count feeds the penalty.
pub fn extend_stars(stars: &mut Vec<String>, extra: impl IntoIterator<Item = String>) {
    stars.extend(extra);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::InjuryRecord;

    fn report() -> InjuryTable {
        InjuryTable::new(vec![
            InjuryRecord::new("SEA", "T", "Out", "Charles Cross"),
            InjuryRecord::new("SEA", "RB", "Out", "Not A Star"),
            InjuryRecord::new("SEA", "QB", "Questionable", "Maybe Plays"),
            InjuryRecord::new("NE", "LB", "Doubtful", "Robert Spillane"),
            InjuryRecord::new("SEA", "WR", "Doubtful", "Second Star"),
            InjuryRecord::new("sea", "QB", "Out", "Wrong Case"),
        ])
    }

    #[test]
    fn filters_team_position_and_status() {
        assert_eq!(
            stars_out(&report(), "SEA"),
            vec!["Charles Cross".to_string(), "Second Star".to_string()]
        );
        assert!(stars_out(&report(), "NE").is_empty());
    }

    #[test]
    fn empty_report_yields_no_stars() {
        assert!(stars_out(&InjuryTable::empty(), "SEA").is_empty());
    }

    #[test]
    fn manual_names_are_trimmed_and_duplicates_kept() {
        let mut stars = vec!["Charles Cross".to_string()];
        extend_stars(&mut stars, parse_manual_names(" Charles Cross, ,Sam Darnold,"));
        assert_eq!(
            stars,
            vec![
                "Charles Cross".to_string(),
                "Charles Cross".to_string(),
                "Sam Darnold".to_string()
            ]
        );
        assert!(parse_manual_names("   ").is_empty());
    }
}
