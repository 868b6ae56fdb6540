// src/stats.rs
// Reduce a full OpenDota match record to the one row we keep per match.

use serde::Deserialize;

use crate::error::SyncError;

/// The slice of the OpenDota `/matches/{id}` response we depend on.
/// Anything else in the (large) response is ignored.
#[derive(Debug, Deserialize)]
pub struct MatchRecord {
    pub match_id: u64,
    pub radiant_team_id: u64,
    pub dire_team_id: u64,
    pub players: Vec<PlayerLine>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerLine {
    pub player_slot: u8,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub gold_per_min: i64,
    pub xp_per_min: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamTotals {
    pub team_id: u64,
    pub kills: i64,
    pub deaths: i64,
    pub assists: i64,
    pub xpm: i64,
    pub gpm: i64,
}

impl TeamTotals {
    fn new(team_id: u64) -> Self {
        TeamTotals { team_id, kills: 0, deaths: 0, assists: 0, xpm: 0, gpm: 0 }
    }
}

/// One row of the persisted table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchSummary {
    pub match_id: u64,
    pub radiant: TeamTotals,
    pub dire: TeamTotals,
}

/// Sum the per-player stats into per-team totals. Slot numbering is an
/// OpenDota contract: radiant occupies 0-127, dire 128-255, so `slot / 128`
/// picks the team. Stats are summed exactly as received.
pub fn summarize(m: &MatchRecord) -> MatchSummary {
    let mut teams = [TeamTotals::new(m.radiant_team_id), TeamTotals::new(m.dire_team_id)];
    for p in &m.players {
        let t = &mut teams[(p.player_slot / 128) as usize];
        t.kills += p.kills;
        t.deaths += p.deaths;
        t.assists += p.assists;
        t.xpm += p.xp_per_min;
        t.gpm += p.gold_per_min;
    }
    let [radiant, dire] = teams;
    MatchSummary { match_id: m.match_id, radiant, dire }
}

impl MatchSummary {
    pub fn to_row(&self) -> Vec<String> {
        let r = &self.radiant;
        let d = &self.dire;
        [
            self.match_id.to_string(),
            r.team_id.to_string(),
            r.kills.to_string(),
            r.deaths.to_string(),
            r.assists.to_string(),
            r.xpm.to_string(),
            r.gpm.to_string(),
            d.team_id.to_string(),
            d.kills.to_string(),
            d.deaths.to_string(),
            d.assists.to_string(),
            d.xpm.to_string(),
            d.gpm.to_string(),
        ]
        .into()
    }

    pub fn from_row(row: &[String]) -> Result<Self, SyncError> {
        if row.len() != 13 {
            return Err(SyncError::malformed(
                "table row",
                format!("expected 13 columns, got {}", row.len()),
            ));
        }
        fn cell<T: std::str::FromStr>(row: &[String], i: usize) -> Result<T, SyncError> {
            row[i]
                .parse()
                .map_err(|_| SyncError::malformed("table row", format!("bad value {:?} in column {i}", row[i])))
        }
        Ok(MatchSummary {
            match_id: cell(row, 0)?,
            radiant: TeamTotals {
                team_id: cell(row, 1)?,
                kills: cell(row, 2)?,
                deaths: cell(row, 3)?,
                assists: cell(row, 4)?,
                xpm: cell(row, 5)?,
                gpm: cell(row, 6)?,
            },
            dire: TeamTotals {
                team_id: cell(row, 7)?,
                kills: cell(row, 8)?,
                deaths: cell(row, 9)?,
                assists: cell(row, 10)?,
                xpm: cell(row, 11)?,
                gpm: cell(row, 12)?,
            },
        })
    }
}
