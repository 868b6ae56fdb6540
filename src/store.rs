// src/store.rs
// Durable state: the ld2l->OpenDota pairing cache (JSON, one file per season)
// and the per-match summary table (CSV). Absence of either file just means a
// first run. The sync engine is the sole writer and writes each file exactly
// once per run, after all fetches have succeeded.

use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::csv;
use crate::error::SyncError;
use crate::stats::MatchSummary;

pub const TABLE_HEADER: [&str; 13] = [
    "match_id",
    "radiant_team_id",
    "r_kills",
    "r_deaths",
    "r_assists",
    "r_xpm",
    "r_gpm",
    "dire_team_id",
    "d_kills",
    "d_deaths",
    "d_assists",
    "d_xpm",
    "d_gpm",
];

pub struct Store {
    data_dir: PathBuf,
}

impl Store {
    pub fn new(data_dir: &Path) -> Self {
        Store { data_dir: data_dir.to_path_buf() }
    }

    fn pairing_path(&self, season_id: u32) -> PathBuf {
        self.data_dir.join(format!("ld2l_od_pairs_s{season_id}.json"))
    }

    pub fn default_table_path(&self, season_id: u32) -> PathBuf {
        self.data_dir.join(format!("match_data_s{season_id}.csv"))
    }

    /// Load the season's pairing cache; an absent file is an empty cache.
    /// Keys are ld2l IDs, values OpenDota IDs (0 = never played).
    pub fn load_pairings(&self, season_id: u32) -> Result<BTreeMap<u64, u64>, SyncError> {
        let path = self.pairing_path(season_id);
        let text = match fs::read_to_string(&path) {
            Ok(t) => t,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&text)
            .map_err(|e| SyncError::malformed(path.display().to_string(), e.to_string()))
    }

    pub fn save_pairings(&self, season_id: u32, pairings: &BTreeMap<u64, u64>) -> Result<(), SyncError> {
        fs::create_dir_all(&self.data_dir)?;
        let path = self.pairing_path(season_id);
        // BTreeMap keeps the keys sorted, so the file is diffable across runs
        let text = serde_json::to_string(pairings)
            .map_err(|e| SyncError::malformed(path.display().to_string(), e.to_string()))?;
        fs::write(&path, text)?;
        Ok(())
    }
}

/// Load the summary table; an absent file is an empty table.
pub fn load_table(path: &Path) -> Result<Vec<MatchSummary>, SyncError> {
    let text = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(e.into()),
    };

    let mut rows = csv::parse_rows(&text).into_iter();
    match rows.next() {
        Some(header) if header == TABLE_HEADER => {}
        _ => {
            return Err(SyncError::malformed(
                path.display().to_string(),
                "missing or unrecognized header row",
            ));
        }
    }
    rows.map(|row| MatchSummary::from_row(&row)).collect()
}

pub fn save_table(path: &Path, table: &[MatchSummary]) -> Result<(), SyncError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut w = BufWriter::new(File::create(path)?);
    let header: Vec<String> = TABLE_HEADER.iter().map(|s| s.to_string()).collect();
    csv::write_row(&mut w, &header)?;
    for m in table {
        csv::write_row(&mut w, &m.to_row())?;
    }
    w.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::TeamTotals;

    fn tmp_dir(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("ld2l_store_{name}"));
        let _ = fs::remove_dir_all(&p);
        fs::create_dir_all(&p).unwrap();
        p
    }

    fn summary(id: u64) -> MatchSummary {
        let team = |t| TeamTotals { team_id: t, kills: 10, deaths: 11, assists: 12, xpm: 2500, gpm: 2000 };
        MatchSummary { match_id: id, radiant: team(1), dire: team(2) }
    }

    #[test]
    fn absent_files_load_as_empty_state() {
        let dir = tmp_dir("absent");
        let store = Store::new(&dir);
        assert!(store.load_pairings(33).unwrap().is_empty());
        assert!(load_table(&store.default_table_path(33)).unwrap().is_empty());
    }

    #[test]
    fn pairings_round_trip_with_string_keys() {
        let dir = tmp_dir("pairs");
        let store = Store::new(&dir);
        let pairings = BTreeMap::from([(101, 55555), (102, 0)]);
        store.save_pairings(33, &pairings).unwrap();

        // on-disk format is a JSON object keyed by the ld2l ID as text
        let raw = fs::read_to_string(dir.join("ld2l_od_pairs_s33.json")).unwrap();
        assert!(raw.contains(r#""101":55555"#));

        assert_eq!(store.load_pairings(33).unwrap(), pairings);
    }

    #[test]
    fn table_round_trips() {
        let dir = tmp_dir("table");
        let path = dir.join("t.csv");
        let table = vec![summary(5), summary(6)];
        save_table(&path, &table).unwrap();
        assert_eq!(load_table(&path).unwrap(), table);
    }

    #[test]
    fn table_without_header_is_malformed() {
        let dir = tmp_dir("noheader");
        let path = dir.join("t.csv");
        fs::write(&path, "1,2,3\n").unwrap();
        assert!(matches!(load_table(&path), Err(SyncError::Malformed { .. })));
    }
}
