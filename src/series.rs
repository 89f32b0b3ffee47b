// Playoff series record for one season: the bracket, the round currently being played,
// and the running totals of every matchup.
// Locating the matchup a game belongs to and applying the game's score live here.

use serde::{Deserialize, Serialize};

use crate::game_result::{GameResult, Gid, Tid};

/// Round index of the play-in tournament
pub const PLAY_IN_ROUND: i32 = -1;

/// One team's side of a playoff matchup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesTeam {
    pub tid: Tid,
    #[serde(default)]
    pub cid: u32,
    pub seed: u32,
    #[serde(default)]
    pub won: u32,
    /// Cumulative points, absent until the first game is recorded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pts: Option<u32>,
}

impl SeriesTeam {
    pub fn new(tid: Tid, cid: u32, seed: u32) -> Self {
        SeriesTeam {
            tid,
            cid,
            seed,
            won: 0,
            pts: None,
        }
    }

    /// Same team, fresh record for a new round
    pub fn reset(&self) -> Self {
        SeriesTeam::new(self.tid, self.cid, self.seed)
    }

    fn record_game(&mut self, pts: u32, won: bool) {
        *self.pts.get_or_insert(0) += pts;
        if won {
            self.won += 1;
        }
    }
}

/// Where a matchup stands relative to its win threshold
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesState {
    NotStarted,
    InProgress,
    Concluded,
}

/// A best-of-N contest between two teams in one round
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Matchup {
    /// Team with home court advantage
    pub home: SeriesTeam,
    /// None while the slot waits for an opponent (a bye or a play-in winner)
    #[serde(default)]
    pub away: Option<SeriesTeam>,
    #[serde(default)]
    pub gids: Vec<Gid>,
}

impl Matchup {
    pub fn new(home: SeriesTeam, away: SeriesTeam) -> Self {
        Matchup {
            home,
            away: Some(away),
            gids: Vec::new(),
        }
    }

    /// A slot whose opponent is not known yet
    pub fn awaiting(home: SeriesTeam) -> Self {
        Matchup {
            home,
            away: None,
            gids: Vec::new(),
        }
    }

    /// True if this matchup is between exactly these two teams, in any order
    pub fn is_between(&self, tid0: Tid, tid1: Tid) -> bool {
        match &self.away {
            Some(away) => {
                (self.home.tid == tid0 && away.tid == tid1)
                    || (self.home.tid == tid1 && away.tid == tid0)
            }
            None => false,
        }
    }

    pub fn games_played(&self) -> usize {
        self.gids.len()
    }

    pub fn state(&self, games_to_win: u32) -> SeriesState {
        let away_won = self.away.as_ref().map_or(0, |a| a.won);
        let most = self.home.won.max(away_won);
        if most >= games_to_win {
            SeriesState::Concluded
        } else if most == 0 && self.gids.is_empty() {
            SeriesState::NotStarted
        } else {
            SeriesState::InProgress
        }
    }

    pub fn is_concluded(&self, games_to_win: u32) -> bool {
        self.state(games_to_win) == SeriesState::Concluded
    }

    /// Returns (winner, loser) once either side has reached `games_to_win`
    pub fn winner_loser(&self, games_to_win: u32) -> Option<(&SeriesTeam, &SeriesTeam)> {
        let away = self.away.as_ref()?;
        if away.won >= games_to_win {
            Some((away, &self.home))
        } else if self.home.won >= games_to_win {
            Some((&self.home, away))
        } else {
            None
        }
    }

    /// Apply one game's result. Sides are matched by tid, so it does not matter which
    /// team hosted the game. Applying the same game twice counts it twice.
    pub fn apply_result(&mut self, result: &GameResult) {
        let Some(away) = self.away.as_mut() else {
            return;
        };

        let winner = result.winner().tid;
        let [game_home, game_away] = &result.teams;

        let (for_home, for_away) = if self.home.tid == game_home.tid {
            (game_home, game_away)
        } else if away.tid == game_home.tid {
            (game_away, game_home)
        } else {
            return;
        };
        self.home.record_game(for_home.pts, for_home.tid == winner);
        away.record_game(for_away.pts, for_away.tid == winner);

        self.gids.push(result.gid);
    }
}

/// The playoff bracket of one season
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayoffSeries {
    pub season: i32,
    pub current_round: i32,
    /// series[round] holds the matchups of that round
    pub series: Vec<Vec<Matchup>>,
    #[serde(default)]
    pub play_ins: Vec<Matchup>,
}

impl PlayoffSeries {
    pub fn new(season: i32, first_round: Vec<Matchup>) -> Self {
        PlayoffSeries {
            season,
            current_round: 0,
            series: vec![first_round],
            play_ins: Vec::new(),
        }
    }

    pub fn is_play_in(&self) -> bool {
        self.current_round == PLAY_IN_ROUND
    }

    /// Matchups of the round being played
    pub fn active_round(&self) -> &[Matchup] {
        if self.is_play_in() {
            return &self.play_ins;
        }
        usize::try_from(self.current_round)
            .ok()
            .and_then(|r| self.series.get(r))
            .map(|round| round.as_slice())
            .unwrap_or(&[])
    }

    pub fn active_round_mut(&mut self) -> &mut [Matchup] {
        if self.is_play_in() {
            return &mut self.play_ins;
        }
        match usize::try_from(self.current_round)
            .ok()
            .and_then(|r| self.series.get_mut(r))
        {
            Some(round) => round.as_mut_slice(),
            None => &mut [],
        }
    }

    /// Find the matchup of the active round between these two teams
    pub fn find_series(&self, tid0: Tid, tid1: Tid) -> Option<&Matchup> {
        self.active_round().iter().find(|m| m.is_between(tid0, tid1))
    }

    pub fn find_series_mut(&mut self, tid0: Tid, tid1: Tid) -> Option<&mut Matchup> {
        self.active_round_mut()
            .iter_mut()
            .find(|m| m.is_between(tid0, tid1))
    }

    /// True when every matchup of the active round has a winner
    pub fn round_concluded(&self, games_to_win: u32) -> bool {
        let round = self.active_round();
        !round.is_empty()
            && round
                .iter()
                .all(|m| m.away.is_some() && m.is_concluded(games_to_win))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_result::TeamResult;
    use proptest::prelude::*;

    fn matchup(home: Tid, away: Tid) -> Matchup {
        Matchup::new(SeriesTeam::new(home, 0, 1), SeriesTeam::new(away, 0, 8))
    }

    fn game(gid: Gid, tid0: Tid, pts0: u32, tid1: Tid, pts1: u32) -> GameResult {
        GameResult::new(gid, TeamResult::new(tid0, pts0), TeamResult::new(tid1, pts1))
    }

    #[test]
    fn test_is_between_ignores_order() {
        let m = matchup(4, 9);
        assert!(m.is_between(4, 9));
        assert!(m.is_between(9, 4));
        assert!(!m.is_between(4, 5));
        assert!(!Matchup::awaiting(SeriesTeam::new(4, 0, 1)).is_between(4, 9));
    }

    #[test]
    fn test_find_series_in_active_round() {
        let mut series = PlayoffSeries::new(2025, vec![matchup(0, 7), matchup(3, 4)]);
        assert!(series.find_series(4, 3).is_some());
        assert!(series.find_series(0, 4).is_none());

        series.play_ins = vec![matchup(7, 8)];
        series.current_round = PLAY_IN_ROUND;
        assert!(series.find_series(8, 7).is_some());
        assert!(series.find_series(0, 7).is_none());

        series.current_round = 5;
        assert!(series.active_round().is_empty());
        assert!(series.find_series_mut(0, 7).is_none());
    }

    #[test]
    fn test_apply_result_aligns_sides_by_tid() {
        let mut m = matchup(1, 2);
        assert_eq!(m.state(4), SeriesState::NotStarted);

        // Away team hosts this game and wins it
        m.apply_result(&game(10, 2, 110, 1, 100));
        let away = m.away.as_ref().unwrap();
        assert_eq!(away.won, 1);
        assert_eq!(away.pts, Some(110));
        assert_eq!(m.home.won, 0);
        assert_eq!(m.home.pts, Some(100));
        assert_eq!(m.gids, vec![10]);
        assert_eq!(m.state(4), SeriesState::InProgress);
    }

    #[test]
    fn test_sweep_concludes_series() {
        let mut m = matchup(1, 2);
        let scores = [(100, 90), (95, 88), (102, 99), (88, 80)];
        for (i, (home, away)) in scores.iter().enumerate() {
            m.apply_result(&game(i as Gid, 1, *home, 2, *away));
        }
        let away = m.away.as_ref().unwrap();
        assert_eq!(m.home.won, 4);
        assert_eq!(away.won, 0);
        assert_eq!(m.home.pts, Some(385));
        assert_eq!(away.pts, Some(357));
        assert_eq!(m.state(4), SeriesState::Concluded);
        let (winner, loser) = m.winner_loser(4).unwrap();
        assert_eq!((winner.tid, loser.tid), (1, 2));
    }

    #[test]
    fn test_tied_game_goes_to_second_side() {
        let mut m = matchup(1, 2);
        m.apply_result(&game(1, 1, 95, 2, 95));
        assert_eq!(m.away.as_ref().unwrap().won, 1);
        m.apply_result(&game(2, 2, 90, 1, 90));
        assert_eq!(m.home.won, 1);
        assert_eq!(m.home.pts, Some(185));
    }

    #[test]
    fn test_foreign_result_is_ignored() {
        let mut m = matchup(1, 2);
        let before = m.clone();
        m.apply_result(&game(1, 5, 100, 6, 90));
        assert_eq!(m, before);
    }

    #[test]
    fn test_round_concluded() {
        let mut series = PlayoffSeries::new(2025, vec![matchup(1, 2), matchup(3, 4)]);
        assert!(!series.round_concluded(1));
        series.find_series_mut(1, 2).unwrap().apply_result(&game(1, 1, 90, 2, 80));
        assert!(!series.round_concluded(1));
        series.find_series_mut(3, 4).unwrap().apply_result(&game(2, 4, 90, 3, 80));
        assert!(series.round_concluded(1));
    }

    #[test]
    fn test_serialized_field_names() {
        let series = PlayoffSeries::new(2025, vec![matchup(1, 2)]);
        let json = serde_json::to_value(&series).unwrap();
        assert_eq!(json["currentRound"], 0);
        assert!(json["series"][0][0]["home"].get("pts").is_none());
        let back: PlayoffSeries = serde_json::from_value(json).unwrap();
        assert_eq!(back, series);
    }

    proptest! {
        #[test]
        fn prop_each_game_adds_exactly_one_win(
            games in prop::collection::vec((any::<bool>(), 60u32..140, 60u32..140), 1..12)
        ) {
            let mut m = matchup(1, 2);
            let mut expected_home_pts = 0;
            let mut expected_away_pts = 0;
            for (i, (hosted_by_home, a, b)) in games.iter().enumerate() {
                let before = m.home.won + m.away.as_ref().unwrap().won;
                let before_home = m.home.won;
                let result = if *hosted_by_home {
                    expected_home_pts += a;
                    expected_away_pts += b;
                    game(i as Gid, 1, *a, 2, *b)
                } else {
                    expected_away_pts += a;
                    expected_home_pts += b;
                    game(i as Gid, 2, *a, 1, *b)
                };
                m.apply_result(&result);
                let after = m.home.won + m.away.as_ref().unwrap().won;
                prop_assert_eq!(after, before + 1);
                let home_gained = m.home.won - before_home;
                prop_assert!(home_gained <= 1);
                prop_assert_eq!(home_gained == 1, result.winner().tid == 1);
            }
            prop_assert_eq!(m.gids.len(), games.len());
            prop_assert_eq!(m.home.pts, Some(expected_home_pts));
            prop_assert_eq!(m.away.as_ref().unwrap().pts, Some(expected_away_pts));
        }
    }
}
