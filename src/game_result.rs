// This module defines the data structures for the results of simulated games
// A day's worth of results is the batch the playoff engine consumes

use serde::{Deserialize, Serialize};

/// Team identifier
pub type Tid = u32;

/// Game identifier
pub type Gid = u32;

/// One side of a finished game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamResult {
    pub tid: Tid,
    pub pts: u32,
}

impl TeamResult {
    pub fn new(tid: Tid, pts: u32) -> Self {
        TeamResult { tid, pts }
    }
}

/// Represents the result of a single game.
/// `teams[0]` is the home team of this game, which is not necessarily the team
/// holding home court advantage in the series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameResult {
    pub gid: Gid,
    pub teams: [TeamResult; 2],
}

impl GameResult {
    pub fn new(gid: Gid, home: TeamResult, away: TeamResult) -> Self {
        GameResult {
            gid,
            teams: [home, away],
        }
    }

    /// Returns true if teams[0] won. A tie counts as a teams[1] win.
    pub fn home_won(&self) -> bool {
        self.teams[0].pts > self.teams[1].pts
    }

    /// Returns the winning side
    pub fn winner(&self) -> &TeamResult {
        if self.home_won() {
            &self.teams[0]
        } else {
            &self.teams[1]
        }
    }
}
