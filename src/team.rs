// Team metadata needed to describe a series in text: abbreviation, region and nickname,
// plus the league URL helpers used for links in log events

use fnv::FnvHashMap;
use serde::{Deserialize, Serialize};

use crate::game_result::Tid;

/// Basic team information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamInfo {
    pub tid: Tid,
    pub abbrev: String,
    pub region: String,
    pub name: String,
}

impl TeamInfo {
    pub fn new(tid: Tid, abbrev: &str, region: &str, name: &str) -> Self {
        TeamInfo {
            tid,
            abbrev: abbrev.to_string(),
            region: region.to_string(),
            name: name.to_string(),
        }
    }
}

/// Lookup of team info by tid
#[derive(Debug, Clone, Default)]
pub struct TeamInfoCache {
    teams: FnvHashMap<Tid, TeamInfo>,
}

impl TeamInfoCache {
    pub fn new() -> Self {
        TeamInfoCache {
            teams: FnvHashMap::default(),
        }
    }

    pub fn insert(&mut self, team: TeamInfo) {
        self.teams.insert(team.tid, team);
    }

    pub fn get(&self, tid: Tid) -> Option<&TeamInfo> {
        self.teams.get(&tid)
    }

    /// Abbreviation for `tid`, or a placeholder when the team is unknown
    pub fn abbrev(&self, tid: Tid) -> String {
        self.get(tid)
            .map(|t| t.abbrev.clone())
            .unwrap_or_else(|| format!("T{}", tid))
    }

    /// Nickname for `tid`, or a placeholder when the team is unknown
    pub fn name(&self, tid: Tid) -> String {
        self.get(tid)
            .map(|t| t.name.clone())
            .unwrap_or_else(|| format!("Team {}", tid))
    }
}

impl FromIterator<TeamInfo> for TeamInfoCache {
    fn from_iter<I: IntoIterator<Item = TeamInfo>>(iter: I) -> Self {
        let mut cache = TeamInfoCache::new();
        for team in iter {
            cache.insert(team);
        }
        cache
    }
}

/// Build a league-relative URL like `/l/1/roster/BOS_0/2025`
pub fn league_url(league_id: u32, parts: &[&str]) -> String {
    let mut url = format!("/l/{}", league_id);
    for part in parts {
        url.push('/');
        url.push_str(part);
    }
    url
}

/// URL of a team's roster page for a season
pub fn roster_url(league_id: u32, teams: &TeamInfoCache, tid: Tid, season: i32) -> String {
    let slug = format!("{}_{}", teams.abbrev(tid), tid);
    let season = season.to_string();
    league_url(league_id, &["roster", &slug, &season])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_cache() -> TeamInfoCache {
        vec![
            TeamInfo::new(0, "BOS", "Boston", "Celtics"),
            TeamInfo::new(1, "MIA", "Miami", "Heat"),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_lookup_and_fallbacks() {
        let cache = sample_cache();
        assert_eq!(cache.name(1), "Heat");
        assert_eq!(cache.abbrev(0), "BOS");
        assert_eq!(cache.name(9), "Team 9");
        assert_eq!(cache.abbrev(9), "T9");
        assert_eq!(cache.get(0).map(|t| t.region.as_str()), Some("Boston"));
    }

    #[test]
    fn test_roster_url() {
        let cache = sample_cache();
        assert_eq!(roster_url(3, &cache, 0, 2025), "/l/3/roster/BOS_0/2025");
        assert_eq!(league_url(1, &[]), "/l/1");
    }
}
