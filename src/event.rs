// Log events describing concluded playoff series, and the sinks they are delivered to.
// Delivery is fire-and-forget from the engine's point of view: the score has already been
// applied by the time an event is built.

use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::error::{PlayoffError, Result};
use crate::game_result::Tid;
use crate::round::RoundInfo;
use crate::series::Matchup;
use crate::team::{roster_url, TeamInfoCache};

/// Weight given to series results in the event feed
pub const SERIES_EVENT_SCORE: u32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventType {
    Playoffs,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEvent {
    #[serde(rename = "type")]
    pub kind: EventType,
    pub season: i32,
    /// HTML text with links to the teams' roster pages
    pub text: String,
    pub show_notification: bool,
    /// Winner first, then loser
    pub tids: Vec<Tid>,
    pub score: u32,
    pub save_to_db: bool,
}

/// Receives events produced by the engine
pub trait EventSink {
    fn log_event(&mut self, event: LogEvent) -> Result<()>;
}

impl EventSink for Vec<LogEvent> {
    fn log_event(&mut self, event: LogEvent) -> Result<()> {
        self.push(event);
        Ok(())
    }
}

/// Writes each event as one JSON line
pub struct JsonLinesSink<W: Write> {
    writer: W,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        JsonLinesSink { writer }
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> EventSink for JsonLinesSink<W> {
    fn log_event(&mut self, event: LogEvent) -> Result<()> {
        let line = serde_json::to_string(&event)?;
        writeln!(self.writer, "{}", line).map_err(|e| PlayoffError::Event(e.to_string()))
    }
}

/// What the emitter needs to know beyond the matchup itself
#[derive(Debug, Clone, Copy)]
pub struct EventContext<'a> {
    pub season: i32,
    pub league_id: u32,
    pub user_tid: Option<Tid>,
    pub teams: &'a TeamInfoCache,
}

impl EventContext<'_> {
    pub fn is_user_team(&self, tid: Tid) -> bool {
        self.user_tid == Some(tid)
    }
}

/// "4-1" for a series, or the literal score for a single-game round
pub fn series_score(matchup: &Matchup, games_to_win: u32) -> Option<String> {
    let (winner, loser) = matchup.winner_loser(games_to_win)?;
    let score = match (games_to_win, winner.pts, loser.pts) {
        (1, Some(winner_pts), Some(loser_pts)) => format!("{}-{}", winner_pts, loser_pts),
        _ => format!("{}-{}", games_to_win, loser.won),
    };
    Some(score)
}

/// Build the event for a concluded matchup. Returns None while the series is still going.
pub fn build_series_event(
    matchup: &Matchup,
    games_to_win: u32,
    round: &RoundInfo,
    is_final_round: bool,
    ctx: &EventContext,
) -> Option<LogEvent> {
    let (winner, loser) = matchup.winner_loser(games_to_win)?;
    let score = series_score(matchup, games_to_win)?;

    let team_link = |tid: Tid| {
        format!(
            "<a href=\"{}\">{}</a>",
            roster_url(ctx.league_id, ctx.teams, tid, ctx.season),
            ctx.teams.name(tid)
        )
    };

    let text = format!(
        "The {} defeated the {} in the {}, {}.",
        team_link(winner.tid),
        team_link(loser.tid),
        round.label,
        score
    );

    let involves_user = ctx.is_user_team(winner.tid) || ctx.is_user_team(loser.tid);

    Some(LogEvent {
        kind: EventType::Playoffs,
        season: ctx.season,
        text,
        show_notification: involves_user || is_final_round,
        tids: vec![winner.tid, loser.tid],
        score: SERIES_EVENT_SCORE,
        save_to_db: round.save_to_db,
    })
}
