// Configuration module for the playoff engine
// Supports YAML configuration files for bracket format, league identity, and simulation settings

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{PlayoffError, Result};
use crate::game_result::Tid;
use crate::round::num_games_to_win_series;
use crate::series::PLAY_IN_ROUND;

/// Files tried, in order, when no config path is given
const DEFAULT_CONFIG_PATHS: [&str; 3] = ["playoffs.yaml", "playoffs.yml", ".playoffs.yaml"];

/// Largest supported bracket, in rounds
pub const MAX_ROUNDS: usize = 20;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub playoffs: PlayoffSettings,
    #[serde(default)]
    pub league: LeagueSettings,
    #[serde(default)]
    pub simulation: SimulationSettings,
}

impl Config {
    /// Load configuration from a YAML file
    pub fn from_file(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            return Err(PlayoffError::ConfigNotFound(path.to_string()));
        }

        let content = fs::read_to_string(path)?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.to_bracket_config().validate()?;
        Ok(config)
    }

    /// Load configuration from file if it exists, otherwise use defaults
    pub fn load_or_default(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::from_file(p).unwrap_or_else(|e| {
                warn!("{}; using default configuration", e);
                Self::default()
            }),
            None => Self::load_first_existing(&DEFAULT_CONFIG_PATHS),
        }
    }

    /// Load the first of `paths` that exists. A file that exists but fails to load
    /// is not skipped: defaults are used and the error is logged.
    fn load_first_existing(paths: &[&str]) -> Self {
        let Some(path) = paths.iter().copied().find(|p| Path::new(p).exists()) else {
            return Self::default();
        };
        match Self::from_file(path) {
            Ok(config) => {
                info!("Loaded configuration from {}", path);
                config
            }
            Err(e) => {
                warn!("{}: {}; using default configuration", path, e);
                Self::default()
            }
        }
    }

    /// Save configuration to a YAML file
    pub fn save_to_file(&self, path: &str) -> Result<()> {
        let yaml = serde_yaml::to_string(self)?;
        fs::write(path, yaml)?;
        Ok(())
    }

    /// The values the engine needs, detached from the rest of the config
    pub fn to_bracket_config(&self) -> BracketConfig {
        BracketConfig {
            num_games_playoff_series: self.playoffs.num_games_playoff_series.clone(),
            playoffs_by_conf: self.playoffs.playoffs_by_conf,
            user_tid: self.league.user_tid,
        }
    }
}

/// Playoff format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayoffSettings {
    /// Length of the best-of-N series for each round, first round first
    #[serde(default = "default_num_games_playoff_series")]
    pub num_games_playoff_series: Vec<u32>,

    /// Whether the bracket is split by conference (affects round names)
    #[serde(default = "default_playoffs_by_conf")]
    pub playoffs_by_conf: bool,
}

impl Default for PlayoffSettings {
    fn default() -> Self {
        PlayoffSettings {
            num_games_playoff_series: default_num_games_playoff_series(),
            playoffs_by_conf: default_playoffs_by_conf(),
        }
    }
}

fn default_num_games_playoff_series() -> Vec<u32> {
    vec![7, 7, 7, 7]
}

fn default_playoffs_by_conf() -> bool {
    true
}

/// League identity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeagueSettings {
    /// Used to build links in event text
    #[serde(default = "default_league_id")]
    pub league_id: u32,

    #[serde(default = "default_season")]
    pub season: i32,

    /// Team controlled by the user, if any
    #[serde(default)]
    pub user_tid: Option<Tid>,
}

impl Default for LeagueSettings {
    fn default() -> Self {
        LeagueSettings {
            league_id: default_league_id(),
            season: default_season(),
            user_tid: None,
        }
    }
}

fn default_league_id() -> u32 { 1 }
fn default_season() -> i32 { 2025 }

/// Game simulation settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationSettings {
    /// Rating points added to the home team of each game
    #[serde(default = "default_home_court_advantage")]
    pub home_court_advantage: f64,

    /// Number of simulated series used for odds
    #[serde(default = "default_odds_simulations")]
    pub odds_simulations: usize,

    /// Fixed RNG seed for reproducible runs
    #[serde(default)]
    pub rng_seed: Option<u64>,

    /// Stop simulating after this many days even without a champion
    #[serde(default = "default_max_days")]
    pub max_days: u32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        SimulationSettings {
            home_court_advantage: default_home_court_advantage(),
            odds_simulations: default_odds_simulations(),
            rng_seed: None,
            max_days: default_max_days(),
        }
    }
}

fn default_home_court_advantage() -> f64 { 1.0 }
fn default_odds_simulations() -> usize { 10000 }
fn default_max_days() -> u32 { 200 }

/// Bracket format and user identity handed to the engine for one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketConfig {
    pub num_games_playoff_series: Vec<u32>,
    pub playoffs_by_conf: bool,
    pub user_tid: Option<Tid>,
}

impl BracketConfig {
    pub fn num_rounds(&self) -> usize {
        self.num_games_playoff_series.len()
    }

    /// Wins needed to take a series in `round`. The play-in is always a single game.
    pub fn num_games_to_win(&self, round: i32) -> Result<u32> {
        if round == PLAY_IN_ROUND {
            return Ok(1);
        }
        let Some(&num_games) = usize::try_from(round)
            .ok()
            .and_then(|r| self.num_games_playoff_series.get(r))
        else {
            return Err(PlayoffError::RoundOutOfRange {
                round,
                configured: self.num_rounds(),
            });
        };
        if num_games == 0 {
            return Err(PlayoffError::InvalidConfig(format!(
                "round {} has a zero-game series",
                round
            )));
        }
        Ok(num_games_to_win_series(num_games))
    }

    pub fn is_final_round(&self, round: i32) -> bool {
        round == self.num_rounds() as i32 - 1
    }

    /// Reject round tables the engine cannot play: no rounds, more than
    /// `MAX_ROUNDS`, or a zero-game series
    pub fn validate(&self) -> Result<()> {
        let num_rounds = self.num_rounds();
        if num_rounds == 0 || num_rounds > MAX_ROUNDS {
            return Err(PlayoffError::InvalidConfig(format!(
                "num_games_playoff_series must have 1 to {} rounds, got {}",
                MAX_ROUNDS, num_rounds
            )));
        }
        if let Some(round) = self.num_games_playoff_series.iter().position(|&n| n == 0) {
            return Err(PlayoffError::InvalidConfig(format!(
                "round {} has a zero-game series",
                round
            )));
        }
        Ok(())
    }
}

impl Default for BracketConfig {
    fn default() -> Self {
        Config::default().to_bracket_config()
    }
}

/// Generate a sample configuration file
pub fn generate_sample_config() -> String {
    r#"# Playoff Engine Configuration
# All values shown are defaults - uncomment and modify as needed

# Playoff format
playoffs:
  # Best-of-N series length per round, first round first.
  # The number of entries is the number of rounds.
  num_games_playoff_series: [7, 7, 7, 7]
  # Split the bracket by conference ("conference finals" instead of "semifinals")
  playoffs_by_conf: true

# League identity
league:
  # Used in team links inside event text
  league_id: 1
  season: 2025
  # Team controlled by the user; its series always raise notifications
  user_tid: null

# Game simulation settings
simulation:
  # Rating points added to the home team of each game
  home_court_advantage: 1.0
  # Number of simulated series when computing odds
  odds_simulations: 10000
  # Fixed RNG seed for reproducible runs (null = random)
  rng_seed: null
  # Safety limit on simulated days
  max_days: 200
"#.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;
    use std::sync::{Arc, Mutex};

    /// Log output collected by a test subscriber
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    fn with_captured_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let result = tracing::subscriber::with_default(subscriber, f);
        (result, logs.contents())
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.playoffs.num_games_playoff_series, vec![7, 7, 7, 7]);
        assert!(config.playoffs.playoffs_by_conf);
        assert_eq!(config.league.user_tid, None);
        assert_eq!(config.simulation.odds_simulations, 10000);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
playoffs:
  num_games_playoff_series: [5, 7, 7]
league:
  user_tid: 12
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.playoffs.num_games_playoff_series, vec![5, 7, 7]);
        assert_eq!(config.league.user_tid, Some(12));
        // Defaults should still work
        assert!(config.playoffs.playoffs_by_conf);
        assert_eq!(config.league.season, 2025);
    }

    #[test]
    fn test_sample_config_parses_to_defaults() {
        let config: Config = serde_yaml::from_str(&generate_sample_config()).unwrap();
        assert_eq!(config.to_bracket_config(), BracketConfig::default());
        assert_eq!(config.simulation.max_days, 200);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playoffs.yaml");
        let path = path.to_str().unwrap();

        let mut config = Config::default();
        config.league.user_tid = Some(3);
        config.playoffs.playoffs_by_conf = false;
        config.save_to_file(path).unwrap();

        let loaded = Config::from_file(path).unwrap();
        assert_eq!(loaded.league.user_tid, Some(3));
        assert!(!loaded.playoffs.playoffs_by_conf);
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            Config::from_file("/nonexistent/playoffs.yaml"),
            Err(PlayoffError::ConfigNotFound(_))
        ));
        let config = Config::load_or_default(Some("/nonexistent/playoffs.yaml"));
        assert_eq!(config.league.league_id, 1);
    }

    #[test]
    fn test_games_to_win_per_round() {
        let bracket = BracketConfig {
            num_games_playoff_series: vec![5, 7, 7, 7],
            playoffs_by_conf: true,
            user_tid: Some(4),
        };
        assert_eq!(bracket.num_games_to_win(-1).unwrap(), 1);
        assert_eq!(bracket.num_games_to_win(0).unwrap(), 3);
        assert_eq!(bracket.num_games_to_win(3).unwrap(), 4);
        assert!(matches!(
            bracket.num_games_to_win(4),
            Err(PlayoffError::RoundOutOfRange { round: 4, configured: 4 })
        ));
        assert!(bracket.num_games_to_win(-2).is_err());

        let zero = BracketConfig {
            num_games_playoff_series: vec![0, 7],
            ..bracket.clone()
        };
        assert!(matches!(zero.num_games_to_win(0), Err(PlayoffError::InvalidConfig(_))));
        assert_eq!(zero.num_games_to_win(1).unwrap(), 4);
        assert!(bracket.is_final_round(3));
        assert!(!bracket.is_final_round(2));
    }

    #[test]
    fn test_malformed_default_file_warns_and_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("playoffs.yml");
        let broken = dir.path().join("playoffs.yaml");
        fs::write(&broken, "league:\n  user_tid: [oops\n").unwrap();
        let (missing, broken) = (missing.to_str().unwrap(), broken.to_str().unwrap());

        let (config, logs) = with_captured_logs(|| Config::load_first_existing(&[missing, broken]));
        assert_eq!(config.league.user_tid, None);
        assert_eq!(config.playoffs.num_games_playoff_series, vec![7, 7, 7, 7]);
        assert!(logs.contains("WARN"), "no warning logged: {:?}", logs);
        assert!(logs.contains(broken));
    }

    #[test]
    fn test_first_existing_default_file_is_loaded() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("playoffs.yaml");
        let second = dir.path().join(".playoffs.yaml");
        fs::write(&first, "league:\n  user_tid: 7\n").unwrap();
        fs::write(&second, "league:\n  user_tid: 8\n").unwrap();

        let (config, logs) = with_captured_logs(|| {
            Config::load_first_existing(&[first.to_str().unwrap(), second.to_str().unwrap()])
        });
        assert_eq!(config.league.user_tid, Some(7));
        assert!(!logs.contains("WARN"));

        let none_exist = Config::load_first_existing(&["/nonexistent/playoffs.yaml"]);
        assert_eq!(none_exist.league.user_tid, None);
    }

    #[test]
    fn test_round_table_validation() {
        let bracket = |games: Vec<u32>| BracketConfig {
            num_games_playoff_series: games,
            playoffs_by_conf: false,
            user_tid: None,
        };
        assert!(bracket(vec![7, 7, 7, 7]).validate().is_ok());
        assert!(bracket(vec![1]).validate().is_ok());
        assert!(matches!(bracket(vec![]).validate(), Err(PlayoffError::InvalidConfig(_))));
        assert!(matches!(bracket(vec![7, 0, 7]).validate(), Err(PlayoffError::InvalidConfig(_))));
        assert!(bracket(vec![7; MAX_ROUNDS]).validate().is_ok());
        assert!(matches!(
            bracket(vec![7; MAX_ROUNDS + 1]).validate(),
            Err(PlayoffError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_zero_game_round_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("playoffs.yaml");
        fs::write(&path, "playoffs:\n  num_games_playoff_series: [7, 0, 7]\n").unwrap();
        let path = path.to_str().unwrap();

        assert!(matches!(Config::from_file(path), Err(PlayoffError::InvalidConfig(_))));
        let (config, logs) = with_captured_logs(|| Config::load_or_default(Some(path)));
        assert_eq!(config.playoffs.num_games_playoff_series, vec![7, 7, 7, 7]);
        assert!(logs.contains("zero-game series"));
    }
}
