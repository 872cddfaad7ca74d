mod config;
mod display;
mod error;
mod export;
mod parser;
mod schedule;
mod web;

use config::{coerce_count_str, TournamentConfig, MAX_PLAYERS};
use display::{print_plan, write_schedule_to_file};
use export::write_schedule_csv;
use parser::{default_player_names, load_players, resolve_players};
use schedule::plan_tournament;

/// Options for a CLI run
#[derive(Debug, Default, PartialEq)]
struct CliOptions {
    players_file: Option<String>,
    player_count: Option<usize>,
    csv_out: Option<String>,
    text_out: Option<String>,
}

/// Reads `--flag value` pairs, applying counts and seed onto `config`
fn parse_cli_args(args: &[String], config: &mut TournamentConfig) -> Result<CliOptions, String> {
    let mut options = CliOptions::default();
    let mut iter = args.iter();

    while let Some(flag) = iter.next() {
        let value = iter
            .next()
            .ok_or_else(|| format!("Missing value for {}", flag))?;
        match flag.as_str() {
            "--players" => options.players_file = Some(value.clone()),
            "--count" => options.player_count = Some(coerce_count_str(value).min(MAX_PLAYERS) as usize),
            "--groups" => config.group_count = coerce_count_str(value),
            "--boards" => config.board_count = coerce_count_str(value),
            "--rounds" => config.round_count = coerce_count_str(value),
            "--seed" => {
                config.shuffle_seed = Some(value.trim().parse().map_err(|_| format!("Invalid seed: {}", value))?)
            }
            "--csv" => options.csv_out = Some(value.clone()),
            "--out" => options.text_out = Some(value.clone()),
            _ => return Err(format!("Unknown option: {}", flag)),
        }
    }
    *config = config.clone().clamped();
    Ok(options)
}

fn print_usage() {
    println!("Usage:");
    println!("  tournament-scheduler [--players FILE] [--count N] [--groups N] [--boards N]");
    println!("                       [--rounds N] [--seed N] [--csv FILE] [--out FILE]");
    println!("  tournament-scheduler web [PORT]");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut config = TournamentConfig::from_env();

    // Check if we should run in web mode
    let args: Vec<String> = std::env::args().collect();
    if args.len() > 1 && args[1] == "web" {
        let port = args.get(2)
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(8080);

        println!("Starting web server on port {}...", port);
        println!("Access the site at http://localhost:{}", port);

        web::start_server(port, config).await?;
        return Ok(());
    }

    let options = match parse_cli_args(args.get(1..).unwrap_or_default(), &mut config) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            print_usage();
            std::process::exit(2);
        }
    };

    let players = match &options.players_file {
        Some(path) => {
            println!("Loading players from {}...", path);
            let loaded = load_players(path)?;
            match options.player_count {
                Some(count) => resolve_players(&loaded, Some(count)),
                None => loaded,
            }
        }
        None => default_player_names(options.player_count.unwrap_or(8)),
    };
    println!("Loaded {} players", players.len());

    let plan = plan_tournament(&players, &config);
    print_plan(&plan);

    if let Some(path) = &options.csv_out {
        write_schedule_csv(path, &plan.groups, &plan.schedule)?;
        println!("\nCSV schedule saved to {}", path);
    }
    if let Some(path) = &options.text_out {
        write_schedule_to_file(&plan, path)?;
        println!("Schedule saved to {}", path);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_cli_args() {
        let mut config = TournamentConfig::default();
        let options = parse_cli_args(
            &args(&["--count", "10", "--groups", "0", "--boards", "4", "--seed", "5", "--csv", "out.csv"]),
            &mut config,
        )
        .unwrap();

        assert_eq!(options.player_count, Some(10));
        assert_eq!(options.csv_out.as_deref(), Some("out.csv"));
        assert_eq!(config.group_count, 1);
        assert_eq!(config.board_count, 4);
        assert_eq!(config.round_count, 6);
        assert_eq!(config.shuffle_seed, Some(5));
    }

    #[test]
    fn test_parse_cli_args_caps_counts() {
        let mut config = TournamentConfig::default();
        let options = parse_cli_args(
            &args(&["--count", "1e9", "--groups", "900", "--boards", "5000", "--rounds", "3000000"]),
            &mut config,
        )
        .unwrap();

        assert_eq!(options.player_count, Some(MAX_PLAYERS as usize));
        assert_eq!(config.group_count, config::MAX_GROUPS);
        assert_eq!(config.board_count, config::MAX_BOARDS);
        assert_eq!(config.round_count, config::MAX_ROUNDS);
    }

    #[test]
    fn test_parse_cli_args_errors() {
        let mut config = TournamentConfig::default();
        assert!(parse_cli_args(&args(&["--rounds"]), &mut config).is_err());
        assert!(parse_cli_args(&args(&["--colour", "red"]), &mut config).is_err());
        assert!(parse_cli_args(&args(&["--seed", "abc"]), &mut config).is_err());
        assert!(parse_cli_args(&args(&["--seed", "-4"]), &mut config).is_err());
        assert_eq!(parse_cli_args(&[], &mut config).unwrap(), CliOptions::default());
    }
}
