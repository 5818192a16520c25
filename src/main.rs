use std::io;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use gridiron_edge::config::EngineConfig;
use gridiron_edge::console::{Console, parse_market_line, projection_block, verdict_block};
use gridiron_edge::data_retrieval::{get_nfl_data, source_from_config};
use gridiron_edge::injuries::stars_out;
use gridiron_edge::weather::WeatherClient;
use gridiron_edge::{EngineError, Matchup, Prediction};

const USAGE: &str = "\
usage: gridiron_edge [--no-weather] [--json] [--market <spread>]
                     [--stars-a <names>] [--stars-b <names>]

  --no-weather   skip the live weather step (narrower 0.5pt no-edge zone)
  --json         print the structured prediction as JSON after the report
  --market       market spread; skips the interactive prompts
  --stars-a/-b   comma-separated extra players ruled out for team A/B

Configuration comes from the environment (.env.local, .env): NFL_SEASONS,
NFL_TEAM_A, NFL_TEAM_B, NFL_DATA_DIR, RATING_MODEL, SURFACE_BENEFICIARY, ...";

#[derive(Debug, Default)]
struct CliArgs {
    help: bool,
    no_weather: bool,
    json: bool,
    market: Option<String>,
    stars_a: Option<String>,
    stars_b: Option<String>,
}

impl CliArgs {
    fn parse(args: &[String]) -> Self {
        let mut out = Self::default();
        let mut idx = 0;
        while idx < args.len() {
            let arg = args[idx].as_str();
            let mut take_value = |name: &str| -> Option<String> {
                if let Some(v) = arg.strip_prefix(&format!("{name}=")) {
                    return Some(v.to_string());
                }
                if arg == name {
                    idx += 1;
                    return args.get(idx).cloned();
                }
                None
            };
            if let Some(v) = take_value("--market") {
                out.market = Some(v);
            } else if let Some(v) = take_value("--stars-a") {
                out.stars_a = Some(v);
            } else if let Some(v) = take_value("--stars-b") {
                out.stars_b = Some(v);
            } else {
                match arg {
                    "-h" | "--help" => out.help = true,
                    "--no-weather" => out.no_weather = true,
                    "--json" => out.json = true,
                    other => tracing::warn!(argument = other, "ignoring unknown argument"),
                }
            }
            idx += 1;
        }
        out
    }
}

fn main() -> Result<()> {
    let _ = dotenvy::from_filename(".env.local");
    let _ = dotenvy::from_filename(".env");
    init_tracing();

    let args = CliArgs::parse(&std::env::args().skip(1).collect::<Vec<_>>());
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }
    run(&args)
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(args: &CliArgs) -> Result<()> {
    let cfg = EngineConfig::from_env();
    let matchup = Matchup::new(&cfg.team_a, &cfg.team_b);
    let weather_on = cfg.weather.enabled && !args.no_weather;
    let interactive = args.market.is_none();

    println!("\n{}", "=".repeat(60));
    println!(
        "--- {} vs {} PREDICTION ENGINE{} ---",
        matchup.team_a,
        matchup.team_b,
        if weather_on { " | WEATHER-INTEGRATED" } else { "" }
    );
    println!("{}", "=".repeat(60));

    let source = source_from_config(&cfg.feed);
    let data = get_nfl_data(source.as_ref(), &cfg.feed.seasons)
        .context("play-by-play data is required")?;
    let mut warnings: Vec<String> = data.warnings.iter().map(|w| w.to_string()).collect();

    let mut stars_a = stars_out(&data.injuries, &matchup.team_a);
    let mut stars_b = stars_out(&data.injuries, &matchup.team_b);

    let stdin = io::stdin();
    let mut console = Console::new(stdin.lock(), io::stdout());

    console.say("\n[INJURY STATUS]")?;
    if data.injuries.is_empty() {
        console.say("Automated injury feed offline; no automated injury weights.")?;
    } else {
        console.say(&format!(
            "Automated scan found stars out - {}: {:?} | {}: {:?}",
            matchup.team_a, stars_a, matchup.team_b, stars_b
        ))?;
    }

    console.star_overrides(
        &matchup,
        (args.stars_a.as_deref(), args.stars_b.as_deref()),
        (&mut stars_a, &mut stars_b),
        interactive,
    )?;

    console.say("\nCalculating rolling EPA metrics...")?;
    let mut prediction =
        Prediction::project(&data.plays, &matchup, &stars_a, &stars_b, &cfg.rating_model)?;

    if weather_on {
        console.say("\nFetching live weather for the venue...")?;
        let reading = WeatherClient::new(cfg.weather.clone()).current_precipitation();
        if let Some(w) = reading.warning.as_ref() {
            warnings.push(w.to_string());
        }
        if let Some(at) = reading.observed_at.as_deref() {
            console.say(&format!("Observed {}mm at {at} (venue local time)", reading.mm))?;
        }
        prediction.apply_weather(reading.mm, cfg.weather.surface_beneficiary);
    }
    prediction.warnings = warnings;

    console.say(&projection_block(&prediction))?;

    let market = match args.market.as_deref() {
        Some(raw) => parse_market_line(raw),
        None => console.market_line(&format!(
            "\nEnter market spread (positive favors {}): ",
            matchup.team_a
        ))?,
    };
    match market {
        Ok(line) => {
            prediction.apply_market(line);
            if let Some(block) = verdict_block(&prediction) {
                console.say(&block)?;
            }
        }
        Err(err @ EngineError::InvalidInput(_)) => {
            console.say(&format!("{err}. Skipping edge detection."))?;
        }
        Err(err) => return Err(err.into()),
    }

    if args.json {
        let json = serde_json::to_string_pretty(&prediction).context("serialize prediction")?;
        console.say(&json)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::CliArgs;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn parses_flags_and_values() {
        let a = CliArgs::parse(&args(&[
            "--no-weather",
            "--market",
            "-4.5",
            "--stars-a=Charles Cross",
            "--json",
        ]));
        assert!(a.no_weather);
        assert!(a.json);
        assert_eq!(a.market.as_deref(), Some("-4.5"));
        assert_eq!(a.stars_a.as_deref(), Some("Charles Cross"));
        assert!(a.stars_b.is_none());
    }
}
