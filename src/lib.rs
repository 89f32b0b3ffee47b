// Playoff series progression for a basketball league simulation.
// Applies each simulated day's results to the season's bracket, names rounds,
// and reports concluded series as log events.

pub mod bracket;
pub mod config;
pub mod engine;
pub mod error;
pub mod event;
pub mod game_result;
pub mod ingest;
pub mod round;
pub mod series;
pub mod sim;
pub mod store;
pub mod team;

pub use bracket::{advance_round, seed_bracket, Advance};
pub use config::{BracketConfig, Config};
pub use engine::{DayReport, PlayoffEngine};
pub use error::{PlayoffError, Result};
pub use event::{EventSink, LogEvent};
pub use game_result::{GameResult, Gid, TeamResult, Tid};
pub use round::{RoundInfo, RoundName};
pub use series::{Matchup, PlayoffSeries, SeriesState, SeriesTeam};
pub use store::{JsonFileStore, MemoryStore, SeriesStore};
