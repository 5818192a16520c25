use std::io::{BufRead, Write};

use anyhow::{Context, Result};

use crate::engine::{Matchup, Prediction};
use crate::error::{EngineError, EngineResult};
use crate::injuries::{extend_stars, parse_manual_names};

/// Interactive prompts over any reader/writer pair.
pub struct Console<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    pub fn prompt(&mut self, question: &str) -> Result<String> {
        write!(self.output, "{question}").context("write prompt")?;
        self.output.flush().context("flush prompt")?;
        let mut line = String::new();
        self.input.read_line(&mut line).context("read console line")?;
        Ok(line.trim().to_string())
    }

    pub fn confirm(&mut self, question: &str) -> Result<bool> {
        Ok(self.prompt(question)?.eq_ignore_ascii_case("y"))
    }

    pub fn names(&mut self, question: &str) -> Result<Vec<String>> {
        Ok(parse_manual_names(&self.prompt(question)?))
    }

    /// Reads the market spread. The outer error is IO; the inner one is a bad number.
    pub fn market_line(&mut self, question: &str) -> Result<EngineResult<f64>> {
        let raw = self.prompt(question)?;
        Ok(parse_market_line(&raw))
    }

    /// Appends flag-supplied names to both star lists, then, when `ask` is set,
    /// offers the interactive override prompts on top of them.
    pub fn star_overrides(
        &mut self,
        matchup: &Matchup,
        flags: (Option<&str>, Option<&str>),
        stars: (&mut Vec<String>, &mut Vec<String>),
        ask: bool,
    ) -> Result<()> {
        let (stars_a, stars_b) = stars;
        extend_stars(stars_a, flags.0.map(parse_manual_names).unwrap_or_default());
        extend_stars(stars_b, flags.1.map(parse_manual_names).unwrap_or_default());
        if ask && self.confirm("\nAdd manual star overrides? (y/n): ")? {
            let extra_a = self.names(&format!(
                "Additional {} stars (comma-separated): ",
                matchup.team_a
            ))?;
            let extra_b = self.names(&format!(
                "Additional {} stars (comma-separated): ",
                matchup.team_b
            ))?;
            extend_stars(stars_a, extra_a);
            extend_stars(stars_b, extra_b);
        }
        Ok(())
    }

    pub fn say(&mut self, text: &str) -> Result<()> {
        writeln!(self.output, "{text}").context("write console line")
    }
}

pub fn parse_market_line(raw: &str) -> EngineResult<f64> {
    let trimmed = raw.trim();
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| {
            EngineError::InvalidInput(format!(
                "market line must be a number, got {trimmed:?}"
            ))
        })
}

pub fn projection_block(p: &Prediction) -> String {
    let rule = "-".repeat(40);
    let mut out = String::new();
    out.push_str(&format!("\n{rule}\n"));
    for r in [&p.rating_a, &p.rating_b] {
        let windows = r
            .rolling
            .iter()
            .map(|w| format!("{}g {:+.3}", w.window, w.latest))
            .collect::<Vec<_>>()
            .join(" | ");
        out.push_str(&format!(
            "{:<4} rating {:+.3} ({} games; {}; {} out -{:.2})\n",
            r.team,
            r.rating,
            r.games,
            windows,
            r.stars_out.len(),
            r.injury_penalty
        ));
    }
    out.push_str(&format!("RAW PROJECTION:     {}\n", p.predicted_spread));
    if let Some(w) = p.weather.as_ref() {
        out.push_str(&format!(
            "PRECIP ADJUST (Pa): {} ({}mm rain)\n",
            w.suppression_factor, w.precipitation_mm
        ));
        if w.surface_advantage != 0.0 {
            out.push_str(&format!("SURFACE ADVANTAGE:  {:+}\n", w.surface_advantage));
        }
    }
    out.push_str(&format!("FINAL SPREAD:       {}\n", p.final_spread));
    out.push_str(&rule);
    out
}

pub fn verdict_block(p: &Prediction) -> Option<String> {
    let edge = p.edge?;
    let team = p.matchup.team(edge.recommended_side);
    let mut out = String::new();
    out.push_str(&format!("\n{} FINAL VERDICT {}\n", "*".repeat(20), "*".repeat(20)));
    out.push_str(&format!("TARGET SIDE:     {team} (market {})\n", edge.market_line));
    out.push_str(&format!("CALCULATED EDGE: {:.2} points\n", edge.edge_magnitude));
    out.push_str(&format!(
        "SIGNAL STRENGTH: {}\n",
        edge.signal_strength.to_string().to_uppercase()
    ));
    out.push_str(&"*".repeat(55));
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn market_line_parses_signed_floats() {
        assert_eq!(parse_market_line(" -4.5 "), Ok(-4.5));
        assert!(matches!(
            parse_market_line("four"),
            Err(EngineError::InvalidInput(_))
        ));
        assert!(parse_market_line("NaN").is_err());
    }

    #[test]
    fn prompts_read_lines_in_order() {
        let input = b"Y\nCharles Cross, Sam Darnold\nabc\n".as_slice();
        let mut console = Console::new(input, Vec::new());
        assert!(console.confirm("override? ").unwrap());
        assert_eq!(
            console.names("SEA: ").unwrap(),
            vec!["Charles Cross".to_string(), "Sam Darnold".to_string()]
        );
        assert!(console.market_line("line: ").unwrap().is_err());
        let shown = String::from_utf8(console.into_output()).unwrap();
        assert!(shown.contains("override? "));
    }

    #[test]
    fn flag_overrides_apply_when_prompts_are_declined() {
        let matchup = Matchup::new("SEA", "NE");
        let mut stars_a = vec!["Charles Cross".to_string()];
        let mut stars_b = Vec::new();
        let mut console = Console::new(b"n\n".as_slice(), Vec::new());
        console
            .star_overrides(
                &matchup,
                (Some("Geno Smith, DK Metcalf"), None),
                (&mut stars_a, &mut stars_b),
                true,
            )
            .unwrap();
        assert_eq!(stars_a, vec!["Charles Cross", "Geno Smith", "DK Metcalf"]);
        assert!(stars_b.is_empty());
    }

    #[test]
    fn prompted_names_stack_on_flag_overrides() {
        let matchup = Matchup::new("SEA", "NE");
        let (mut stars_a, mut stars_b) = (Vec::new(), Vec::new());
        let mut console = Console::new(b"y\nKenneth Walker\n\n".as_slice(), Vec::new());
        console
            .star_overrides(
                &matchup,
                (Some("Geno Smith"), Some("Drake Maye")),
                (&mut stars_a, &mut stars_b),
                true,
            )
            .unwrap();
        assert_eq!(stars_a, vec!["Geno Smith", "Kenneth Walker"]);
        assert_eq!(stars_b, vec!["Drake Maye"]);
    }

    #[test]
    fn non_interactive_runs_never_prompt() {
        let matchup = Matchup::new("SEA", "NE");
        let (mut stars_a, mut stars_b) = (Vec::new(), Vec::new());
        let mut console = Console::new(b"".as_slice(), Vec::new());
        console
            .star_overrides(
                &matchup,
                (None, Some("Drake Maye")),
                (&mut stars_a, &mut stars_b),
                false,
            )
            .unwrap();
        assert!(stars_a.is_empty());
        assert_eq!(stars_b, vec!["Drake Maye"]);
        assert!(console.into_output().is_empty());
    }

    #[test]
    fn exhausted_input_reads_as_empty() {
        let mut console = Console::new(b"".as_slice(), Vec::new());
        assert!(!console.confirm("override? ").unwrap());
    }
}
