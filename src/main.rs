use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::io;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use playoffs::config::{generate_sample_config, Config};
use playoffs::event::JsonLinesSink;
use playoffs::ingest::{load_game_results, load_teams, League};
use playoffs::round::num_games_to_win_series;
use playoffs::sim::{self, SeriesOddsInput};
use playoffs::{
    advance_round, seed_bracket, Advance, JsonFileStore, PlayoffEngine, PlayoffError, PlayoffSeries,
    Result, SeriesStore,
};

#[derive(Parser)]
#[command(name = "playoffs", about = "Playoff series progression for a league simulation")]
struct Cli {
    /// YAML config file (defaults to playoffs.yaml if present)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the season's bracket from a teams CSV
    Seed {
        #[arg(long)]
        teams: String,
        #[arg(long, default_value = "playoff_data")]
        store: String,
    },
    /// Apply one day of results from a CSV file
    Update {
        #[arg(long)]
        results: String,
        #[arg(long)]
        teams: Option<String>,
        #[arg(long, default_value = "playoff_data")]
        store: String,
    },
    /// Simulate the rest of the playoffs
    Simulate {
        #[arg(long)]
        teams: String,
        #[arg(long, default_value = "playoff_data")]
        store: String,
    },
    /// Odds of the home court team winning a series
    Odds {
        #[arg(long)]
        home_rating: f64,
        #[arg(long)]
        away_rating: f64,
        #[arg(long, default_value_t = 0)]
        home_won: u32,
        #[arg(long, default_value_t = 0)]
        away_won: u32,
        #[arg(long, default_value_t = 7)]
        best_of: u32,
    },
    /// Print a sample configuration file
    SampleConfig,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let config = Config::load_or_default(cli.config.as_deref());

    if let Err(e) = run(cli.command, &config) {
        error!("{}", e);
        std::process::exit(1);
    }
}

fn run(command: Command, config: &Config) -> Result<()> {
    match command {
        Command::Seed { teams, store } => seed(config, &teams, &store),
        Command::Update { results, teams, store } => update(config, &results, teams.as_deref(), &store),
        Command::Simulate { teams, store } => simulate(config, &teams, &store),
        Command::Odds { home_rating, away_rating, home_won, away_won, best_of } => {
            let input = SeriesOddsInput {
                home_rating,
                away_rating,
                home_won,
                away_won,
                games_to_win: num_games_to_win_series(best_of),
                home_court_advantage: config.simulation.home_court_advantage,
            };
            let prob = sim::series_win_probability(&input, config.simulation.odds_simulations);
            println!("{:.4}", prob);
            Ok(())
        }
        Command::SampleConfig => {
            print!("{}", generate_sample_config());
            Ok(())
        }
    }
}

fn seed(config: &Config, teams_path: &str, store_dir: &str) -> Result<()> {
    let league = load_teams(teams_path)?;
    let bracket = config.to_bracket_config();
    bracket.validate()?;
    let by_conf = bracket.playoffs_by_conf;
    let num_groups = if by_conf { 2 } else { 1 };
    let per_group = (1usize << bracket.num_rounds()) / num_groups;

    let groups = league.seeded_groups(by_conf, per_group);
    let series = seed_bracket(config.league.season, &groups, bracket.num_rounds())?;

    let mut store = JsonFileStore::new(store_dir)?;
    store.put(&series)?;
    info!("Seeded {} playoff teams for {}", per_group * num_groups, config.league.season);
    Ok(())
}

fn update(config: &Config, results_path: &str, teams_path: Option<&str>, store_dir: &str) -> Result<()> {
    let league = match teams_path {
        Some(path) => load_teams(path)?,
        None => League::default(),
    };
    let bracket = config.to_bracket_config();
    let engine = PlayoffEngine::new(&bracket, &league.teams, config.league.league_id);
    let results = load_game_results(results_path)?;

    let mut store = JsonFileStore::new(store_dir)?;
    let mut sink = JsonLinesSink::new(io::stdout());
    let mut report = engine.process_day(&mut store, config.league.season, &results, &mut sink)?;
    info!(
        "Applied {} games, skipped {}, {} series concluded",
        report.applied.len(),
        report.skipped.len(),
        report.concluded.len()
    );

    if let Advance::Advanced(_) | Advance::Champion(_) = advance_round(&mut report.series, &bracket)? {
        store.put(&report.series)?;
    }
    Ok(())
}

fn next_gid(series: &PlayoffSeries) -> u32 {
    series
        .series
        .iter()
        .flatten()
        .chain(series.play_ins.iter())
        .flat_map(|m| m.gids.iter())
        .max()
        .map_or(0, |gid| gid + 1)
}

fn simulate(config: &Config, teams_path: &str, store_dir: &str) -> Result<()> {
    let league = load_teams(teams_path)?;
    let bracket = config.to_bracket_config();
    let engine = PlayoffEngine::new(&bracket, &league.teams, config.league.league_id);
    let season = config.league.season;

    let mut store = JsonFileStore::new(store_dir)?;
    let mut sink = JsonLinesSink::new(io::stdout());
    let mut rng = match config.simulation.rng_seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut series = store.get(season)?.ok_or(PlayoffError::SeriesNotFound(season))?;
    let mut gid = next_gid(&series);

    let max_days = config.simulation.max_days;
    let pb = ProgressBar::new(max_days as u64);
    pb.set_style(ProgressStyle::default_bar().template("{bar:40} day {pos} {msg}"));

    for _ in 0..max_days {
        let results = sim::simulate_day(
            &series,
            &bracket,
            &league.ratings,
            config.simulation.home_court_advantage,
            &mut gid,
            &mut rng,
        )?;

        let report = engine.process_day(&mut store, season, &results, &mut sink)?;
        series = report.series;
        pb.inc(1);

        match advance_round(&mut series, &bracket)? {
            Advance::NotReady => {}
            Advance::Advanced(round) => {
                store.put(&series)?;
                pb.set_message(format!("round {}", round));
            }
            Advance::Champion(tid) => {
                store.put(&series)?;
                pb.finish_with_message(format!("champion: {}", league.teams.name(tid)));
                return Ok(());
            }
        }
    }

    pb.abandon();
    warn!("No champion after {} days", max_days);
    Ok(())
}
