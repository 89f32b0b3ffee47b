// Simulation of playoff games from team ratings.
// Ratings use the same 60-100 scale and logistic win probability as the bracket optimizer.
// Also estimates series odds by Monte Carlo simulation across threads with rayon.

use fnv::FnvHashMap;
use rand::Rng;
use rayon::prelude::*;

use crate::config::BracketConfig;
use crate::error::Result;
use crate::game_result::{GameResult, Gid, TeamResult, Tid};
use crate::series::PlayoffSeries;

/// Rating used for teams missing from the ratings table
pub const DEFAULT_RATING: f64 = 80.0;

pub type Ratings = FnvHashMap<Tid, f64>;

/// Probability that a team rated `rating_a` beats a team rated `rating_b`
pub fn win_probability(rating_a: f64, rating_b: f64) -> f64 {
    let rating_diff = rating_a - rating_b;
    1.0 / (1.0 + 10.0_f64.powf(-rating_diff * 30.464 / 400.0))
}

pub fn rating_of(ratings: &Ratings, tid: Tid) -> f64 {
    ratings.get(&tid).copied().unwrap_or(DEFAULT_RATING)
}

/// Does the team with home court advantage host game `game_index` (0-based)?
/// Short series alternate; longer ones follow 2-2-1-1-1.
pub fn series_home_hosts(game_index: usize, games_to_win: u32) -> bool {
    if games_to_win <= 2 {
        return game_index % 2 == 0;
    }
    match game_index {
        0 | 1 => true,
        2 | 3 => false,
        i => i % 2 == 0,
    }
}

/// Simulate one game. Scores are always decisive.
pub fn simulate_game<R: Rng>(
    gid: Gid,
    home: Tid,
    away: Tid,
    ratings: &Ratings,
    home_court_advantage: f64,
    rng: &mut R,
) -> GameResult {
    let prob = win_probability(rating_of(ratings, home) + home_court_advantage, rating_of(ratings, away));
    let home_wins = rng.gen_bool(prob.clamp(0.0, 1.0));

    let loser_pts = rng.gen_range(80..=110);
    let winner_pts = loser_pts + rng.gen_range(1..=20);

    let (home_pts, away_pts) = if home_wins {
        (winner_pts, loser_pts)
    } else {
        (loser_pts, winner_pts)
    };

    GameResult::new(gid, TeamResult::new(home, home_pts), TeamResult::new(away, away_pts))
}

/// One game for every unfinished series of the active round.
/// Game ids are taken from `next_gid`, which is advanced past the last one used.
pub fn simulate_day<R: Rng>(
    series: &PlayoffSeries,
    config: &BracketConfig,
    ratings: &Ratings,
    home_court_advantage: f64,
    next_gid: &mut Gid,
    rng: &mut R,
) -> Result<Vec<GameResult>> {
    let games_to_win = config.num_games_to_win(series.current_round)?;
    let mut games = Vec::new();

    for matchup in series.active_round() {
        let Some(away) = matchup.away.as_ref() else {
            continue;
        };
        if matchup.is_concluded(games_to_win) {
            continue;
        }

        let (host, visitor) = if series_home_hosts(matchup.games_played(), games_to_win) {
            (matchup.home.tid, away.tid)
        } else {
            (away.tid, matchup.home.tid)
        };
        games.push(simulate_game(*next_gid, host, visitor, ratings, home_court_advantage, rng));
        *next_gid += 1;
    }

    Ok(games)
}

/// Current state of a series for odds purposes
#[derive(Debug, Clone, Copy)]
pub struct SeriesOddsInput {
    pub home_rating: f64,
    pub away_rating: f64,
    pub home_won: u32,
    pub away_won: u32,
    pub games_to_win: u32,
    pub home_court_advantage: f64,
}

impl SeriesOddsInput {
    /// Play out the rest of the series, returns true if the home court team wins it
    fn play_out<R: Rng>(&self, rng: &mut R) -> bool {
        let (mut home_won, mut away_won) = (self.home_won, self.away_won);
        while home_won < self.games_to_win && away_won < self.games_to_win {
            let game_index = (home_won + away_won) as usize;
            let prob = if series_home_hosts(game_index, self.games_to_win) {
                win_probability(self.home_rating + self.home_court_advantage, self.away_rating)
            } else {
                1.0 - win_probability(self.away_rating + self.home_court_advantage, self.home_rating)
            };
            if rng.gen_bool(prob.clamp(0.0, 1.0)) {
                home_won += 1;
            } else {
                away_won += 1;
            }
        }
        home_won >= self.games_to_win
    }
}

/// Probability that the home court team wins the series from its current state
pub fn series_win_probability(input: &SeriesOddsInput, simulations: usize) -> f64 {
    if input.home_won >= input.games_to_win {
        return 1.0;
    }
    if input.away_won >= input.games_to_win {
        return 0.0;
    }
    if simulations == 0 {
        return 0.5;
    }

    let wins: usize = (0..simulations)
        .into_par_iter()
        .map(|_| {
            let mut rng = rand::thread_rng();
            usize::from(input.play_out(&mut rng))
        })
        .sum();

    wins as f64 / simulations as f64
}
