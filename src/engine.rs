// Playoff progression engine: applies one day of game results to a season's bracket.
// For each game the matching series is located, the score is applied, and when a team
// reaches the round's win threshold a series event is emitted.
// The engine takes the season record by value and hands it back in the DayReport.

use tracing::{debug, info, warn};

use crate::config::BracketConfig;
use crate::error::{PlayoffError, Result};
use crate::event::{build_series_event, EventContext, EventSink};
use crate::game_result::{GameResult, Gid, Tid};
use crate::round::RoundInfo;
use crate::series::PlayoffSeries;
use crate::store::SeriesStore;
use crate::team::TeamInfoCache;

/// Outcome of processing one day's results
#[derive(Debug, Clone)]
pub struct DayReport {
    /// The updated record
    pub series: PlayoffSeries,
    /// Games applied to a series, in processing order
    pub applied: Vec<Gid>,
    /// Games that matched no series of the active round
    pub skipped: Vec<Gid>,
    /// (winner, loser) of each series that reached its threshold
    pub concluded: Vec<(Tid, Tid)>,
    /// Events the sink refused
    pub failed_events: usize,
}

pub struct PlayoffEngine<'a> {
    config: &'a BracketConfig,
    teams: &'a TeamInfoCache,
    league_id: u32,
}

impl<'a> PlayoffEngine<'a> {
    pub fn new(config: &'a BracketConfig, teams: &'a TeamInfoCache, league_id: u32) -> Self {
        PlayoffEngine {
            config,
            teams,
            league_id,
        }
    }

    /// Apply `results` to `series` in order.
    /// Fails only if the active round has no configured series length; unknown team
    /// pairs are skipped and sink failures are logged.
    pub fn update(
        &self,
        mut series: PlayoffSeries,
        results: &[GameResult],
        sink: &mut dyn EventSink,
    ) -> Result<DayReport> {
        let round = series.current_round;
        let games_to_win = self.config.num_games_to_win(round)?;
        let round_info = RoundInfo::new(round, self.config.num_rounds(), self.config.playoffs_by_conf);
        let is_final_round = self.config.is_final_round(round);
        let event_ctx = EventContext {
            season: series.season,
            league_id: self.league_id,
            user_tid: self.config.user_tid,
            teams: self.teams,
        };

        let mut applied = Vec::with_capacity(results.len());
        let mut skipped = Vec::new();
        let mut concluded = Vec::new();
        let mut failed_events = 0;

        for result in results {
            let [team0, team1] = &result.teams;
            let Some(matchup) = series.find_series_mut(team0.tid, team1.tid) else {
                debug!(
                    "No series in round {} for game {} ({} vs {}), skipping",
                    round, result.gid, team0.tid, team1.tid
                );
                skipped.push(result.gid);
                continue;
            };

            matchup.apply_result(result);
            applied.push(result.gid);

            let Some(event) = build_series_event(matchup, games_to_win, &round_info, is_final_round, &event_ctx) else {
                continue;
            };

            let (winner, loser) = (event.tids[0], event.tids[1]);
            info!("Team {} defeated team {} in the {}", winner, loser, round_info.label);
            concluded.push((winner, loser));

            if let Err(e) = sink.log_event(event) {
                warn!("Failed to log series result for game {}: {}", result.gid, e);
                failed_events += 1;
            }
        }

        Ok(DayReport {
            series,
            applied,
            skipped,
            concluded,
            failed_events,
        })
    }

    /// Load the season's record, apply the day, and write it back.
    /// A missing record means games were simulated for a bracket that doesn't exist.
    pub fn process_day<S: SeriesStore + ?Sized>(
        &self,
        store: &mut S,
        season: i32,
        results: &[GameResult],
        sink: &mut dyn EventSink,
    ) -> Result<DayReport> {
        let series = store
            .get(season)?
            .ok_or(PlayoffError::SeriesNotFound(season))?;
        let report = self.update(series, results, sink)?;
        store.put(&report.series)?;
        Ok(report)
    }
}
