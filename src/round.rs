// Round naming and win thresholds.
// A round index is named by checking, in order: play-in, first round, the three rounds
// counted back from the finals, then a generic ordinal. With very short brackets several
// checks can match the same index; the earliest check wins.

use std::fmt;

use ordinal::ToOrdinal as _;

use crate::series::PLAY_IN_ROUND;

/// Number of wins needed to take a best-of-`num_games` series
pub fn num_games_to_win_series(num_games: u32) -> u32 {
    (num_games + 1) / 2
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundName {
    PlayIn,
    FirstRound,
    ConferenceSemifinals,
    Quarterfinals,
    ConferenceFinals,
    Semifinals,
    Finals,
    /// Any other round, holding the 0-based round index
    Nth(u32),
}

impl RoundName {
    /// Classify `round` within a bracket of `num_rounds` rounds
    pub fn classify(round: i32, num_rounds: usize, playoffs_by_conf: bool) -> Self {
        let num_rounds = num_rounds as i32;

        if round == PLAY_IN_ROUND {
            RoundName::PlayIn
        } else if round == 0 {
            RoundName::FirstRound
        } else if round == num_rounds - 3 {
            if playoffs_by_conf {
                RoundName::ConferenceSemifinals
            } else {
                RoundName::Quarterfinals
            }
        } else if round == num_rounds - 2 {
            if playoffs_by_conf {
                RoundName::ConferenceFinals
            } else {
                RoundName::Semifinals
            }
        } else if round == num_rounds - 1 {
            RoundName::Finals
        } else {
            RoundName::Nth(round.max(0) as u32)
        }
    }

    /// Whether a concluded series in this round needs its own persisted log entry.
    /// The last two rounds already get a game-level event elsewhere.
    pub fn save_to_db(&self) -> bool {
        !matches!(
            self,
            RoundName::ConferenceFinals | RoundName::Semifinals | RoundName::Finals
        )
    }
}

impl fmt::Display for RoundName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RoundName::PlayIn => write!(f, "play-in tournament"),
            RoundName::FirstRound => write!(f, "{} round of the playoffs", 1u32.to_ordinal_string()),
            RoundName::ConferenceSemifinals => write!(f, "conference semifinals"),
            RoundName::Quarterfinals => write!(f, "quarterfinals"),
            RoundName::ConferenceFinals => write!(f, "conference finals"),
            RoundName::Semifinals => write!(f, "semifinals"),
            RoundName::Finals => write!(f, "finals"),
            RoundName::Nth(round) => {
                write!(f, "{} round of the playoffs", (round + 1).to_ordinal_string())
            }
        }
    }
}

/// Label and persistence decision for a round, as used by the event emitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundInfo {
    pub name: RoundName,
    pub label: String,
    pub save_to_db: bool,
}

impl RoundInfo {
    pub fn new(round: i32, num_rounds: usize, playoffs_by_conf: bool) -> Self {
        let name = RoundName::classify(round, num_rounds, playoffs_by_conf);
        RoundInfo {
            name,
            label: name.to_string(),
            save_to_db: name.save_to_db(),
        }
    }
}
