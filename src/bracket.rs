// Bracket construction and round advancement.
// Seeds are laid out in standard bracket order so that matchups 2i and 2i+1 of one round
// feed matchup i of the next. Play-in winners fill the first-round slots that are still
// waiting for an opponent, in order.

use tracing::info;

use crate::config::BracketConfig;
use crate::error::{PlayoffError, Result};
use crate::game_result::Tid;
use crate::series::{Matchup, PlayoffSeries, SeriesTeam, PLAY_IN_ROUND};

/// Result of trying to move the bracket forward
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Some series of the active round are still being played
    NotReady,
    /// The bracket moved to this round
    Advanced(i32),
    /// The final round is over
    Champion(Tid),
}

/// Seed numbers in bracket order: for 8 teams, [1, 8, 4, 5, 2, 7, 3, 6]
pub fn seed_order(num_teams: usize) -> Vec<u32> {
    let mut order = vec![1u32];
    while order.len() < num_teams {
        let size = order.len() as u32 * 2;
        order = order.iter().flat_map(|&seed| [seed, size + 1 - seed]).collect();
    }
    order
}

/// Build the first round. Each group is one conference (or the whole league), listed by
/// seed; `None` marks a seed that will be filled by a play-in winner.
pub fn seed_bracket(season: i32, groups: &[Vec<Option<Tid>>], num_rounds: usize) -> Result<PlayoffSeries> {
    let group_size = groups.first().map_or(0, |g| g.len());
    if group_size < 2 || !group_size.is_power_of_two() {
        return Err(PlayoffError::InvalidBracket(format!(
            "each group needs a power of two teams, got {}",
            group_size
        )));
    }
    if groups.iter().any(|g| g.len() != group_size) {
        return Err(PlayoffError::InvalidBracket("groups have different sizes".to_string()));
    }
    let num_teams = group_size * groups.len();
    if num_rounds >= usize::BITS as usize || num_teams != 1 << num_rounds {
        return Err(PlayoffError::InvalidBracket(format!(
            "{} teams cannot fill a {} round bracket",
            num_teams, num_rounds
        )));
    }

    let order = seed_order(group_size);
    let mut first_round = Vec::with_capacity(num_teams / 2);

    for (cid, group) in groups.iter().enumerate() {
        for pair in order.chunks(2) {
            let (home_seed, away_seed) = (pair[0], pair[1]);
            let home_tid = group[home_seed as usize - 1].ok_or_else(|| {
                PlayoffError::InvalidBracket(format!(
                    "seed {} in group {} cannot come from the play-in",
                    home_seed, cid
                ))
            })?;
            let home = SeriesTeam::new(home_tid, cid as u32, home_seed);
            let matchup = match group[away_seed as usize - 1] {
                Some(away_tid) => Matchup::new(home, SeriesTeam::new(away_tid, cid as u32, away_seed)),
                None => Matchup::awaiting(home),
            };
            first_round.push(matchup);
        }
    }

    Ok(PlayoffSeries::new(season, first_round))
}

impl PlayoffSeries {
    /// Attach single-game play-in matchups, one per open first-round slot, and start
    /// the bracket in the play-in round
    pub fn with_play_ins(mut self, play_ins: Vec<Matchup>) -> Result<Self> {
        let open_slots = self
            .series
            .first()
            .map_or(0, |round| round.iter().filter(|m| m.away.is_none()).count());
        if open_slots != play_ins.len() {
            return Err(PlayoffError::InvalidBracket(format!(
                "{} play-in matchups for {} open slots",
                play_ins.len(),
                open_slots
            )));
        }
        if !play_ins.is_empty() {
            self.play_ins = play_ins;
            self.current_round = PLAY_IN_ROUND;
        }
        Ok(self)
    }

    /// Winner of the final round, once it is over
    pub fn champion(&self, config: &BracketConfig) -> Option<Tid> {
        let last = config.num_rounds().checked_sub(1)?;
        let games_to_win = config.num_games_to_win(last as i32).ok()?;
        match self.series.get(last)?.as_slice() {
            [final_series] => final_series.winner_loser(games_to_win).map(|(w, _)| w.tid),
            _ => None,
        }
    }
}

/// Winners of the active round, with fresh records for the next round
fn round_winners(matchups: &[Matchup], games_to_win: u32) -> Vec<SeriesTeam> {
    matchups
        .iter()
        .filter_map(|m| m.winner_loser(games_to_win))
        .map(|(winner, _)| winner.reset())
        .collect()
}

/// Move the bracket to the next round if every series of the active round is over
pub fn advance_round(series: &mut PlayoffSeries, config: &BracketConfig) -> Result<Advance> {
    let games_to_win = config.num_games_to_win(series.current_round)?;
    if !series.round_concluded(games_to_win) {
        return Ok(Advance::NotReady);
    }

    if series.is_play_in() {
        let mut winners = round_winners(&series.play_ins, games_to_win).into_iter();
        let first_round = series
            .series
            .first_mut()
            .ok_or_else(|| PlayoffError::InvalidBracket("no first round".to_string()))?;
        for slot in first_round.iter_mut().filter(|m| m.away.is_none()) {
            let winner = winners
                .next()
                .ok_or_else(|| PlayoffError::InvalidBracket("not enough play-in winners".to_string()))?;
            slot.away = Some(winner);
        }
        series.current_round = 0;
        info!("Play-in complete, starting the first round");
        return Ok(Advance::Advanced(0));
    }

    let round = series.current_round as usize;
    let winners = round_winners(&series.series[round], games_to_win);

    if config.is_final_round(series.current_round) {
        return match winners.as_slice() {
            [champion] => {
                info!("Team {} won the {} playoffs", champion.tid, series.season);
                Ok(Advance::Champion(champion.tid))
            }
            _ => Err(PlayoffError::InvalidBracket(format!(
                "final round has {} winners",
                winners.len()
            ))),
        };
    }

    if winners.len() < 2 || winners.len() % 2 != 0 {
        return Err(PlayoffError::InvalidBracket(format!(
            "round {} produced {} winners",
            round,
            winners.len()
        )));
    }

    let next_round: Vec<Matchup> = winners
        .chunks(2)
        .map(|pair| {
            let (a, b) = (&pair[0], &pair[1]);
            if b.seed < a.seed {
                Matchup::new(b.clone(), a.clone())
            } else {
                Matchup::new(a.clone(), b.clone())
            }
        })
        .collect();

    series.series.truncate(round + 1);
    series.series.push(next_round);
    series.current_round += 1;
    info!("Advanced to round {}", series.current_round);
    Ok(Advance::Advanced(series.current_round))
}
