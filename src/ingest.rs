// This file ingests CSV data: the league's teams (with conference and rating) and
// the results of one simulated day

use serde::Deserialize;
use std::io::Read;
use std::path::Path;

use crate::error::Result;
use crate::game_result::{GameResult, Gid, TeamResult, Tid};
use crate::sim::Ratings;
use crate::team::{TeamInfo, TeamInfoCache};

/// One row of the teams file: `tid,abbrev,region,name,cid,rating`
#[derive(Debug, Clone, Deserialize)]
pub struct TeamRow {
    pub tid: Tid,
    pub abbrev: String,
    pub region: String,
    pub name: String,
    #[serde(default)]
    pub cid: u32,
    #[serde(default)]
    pub rating: Option<f64>,
}

impl TeamRow {
    pub fn info(&self) -> TeamInfo {
        TeamInfo::new(self.tid, &self.abbrev, &self.region, &self.name)
    }
}

/// Everything read from a teams file
#[derive(Debug, Clone, Default)]
pub struct League {
    pub rows: Vec<TeamRow>,
    pub teams: TeamInfoCache,
    pub ratings: Ratings,
}

impl League {
    pub fn from_rows(rows: Vec<TeamRow>) -> Self {
        let teams = rows.iter().map(TeamRow::info).collect();
        let ratings = rows
            .iter()
            .filter_map(|row| row.rating.map(|rating| (row.tid, rating)))
            .collect();
        League { rows, teams, ratings }
    }

    /// Teams grouped by conference id (or all together), best rating first,
    /// each group cut down to `per_group` teams
    pub fn seeded_groups(&self, by_conf: bool, per_group: usize) -> Vec<Vec<Option<Tid>>> {
        let mut groups: Vec<(u32, Vec<&TeamRow>)> = Vec::new();
        for row in &self.rows {
            let key = if by_conf { row.cid } else { 0 };
            match groups.iter().position(|(cid, _)| *cid == key) {
                Some(i) => groups[i].1.push(row),
                None => groups.push((key, vec![row])),
            }
        }
        groups.sort_by_key(|(cid, _)| *cid);

        groups
            .into_iter()
            .map(|(_, mut rows)| {
                rows.sort_by(|a, b| {
                    let (ra, rb) = (a.rating.unwrap_or(0.0), b.rating.unwrap_or(0.0));
                    rb.total_cmp(&ra).then(a.tid.cmp(&b.tid))
                });
                rows.into_iter().take(per_group).map(|row| Some(row.tid)).collect()
            })
            .collect()
    }
}

pub fn read_teams<R: Read>(reader: R) -> Result<League> {
    let mut rdr = csv::Reader::from_reader(reader);
    let rows = rdr.deserialize().collect::<std::result::Result<Vec<TeamRow>, _>>()?;
    Ok(League::from_rows(rows))
}

pub fn load_teams<P: AsRef<Path>>(path: P) -> Result<League> {
    let mut rdr = csv::Reader::from_path(path)?;
    let rows = rdr.deserialize().collect::<std::result::Result<Vec<TeamRow>, _>>()?;
    Ok(League::from_rows(rows))
}

/// One row of a results file: `gid,tid0,pts0,tid1,pts1`, where side 0 hosted the game
#[derive(Debug, Clone, Copy, Deserialize)]
struct GameRow {
    gid: Gid,
    tid0: Tid,
    pts0: u32,
    tid1: Tid,
    pts1: u32,
}

impl From<GameRow> for GameResult {
    fn from(row: GameRow) -> Self {
        GameResult::new(row.gid, TeamResult::new(row.tid0, row.pts0), TeamResult::new(row.tid1, row.pts1))
    }
}

pub fn read_game_results<R: Read>(reader: R) -> Result<Vec<GameResult>> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut games = Vec::new();
    for row in rdr.deserialize::<GameRow>() {
        games.push(row?.into());
    }
    Ok(games)
}

pub fn load_game_results<P: AsRef<Path>>(path: P) -> Result<Vec<GameResult>> {
    let file = std::fs::File::open(path)?;
    read_game_results(file)
}
