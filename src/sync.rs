// src/sync.rs
// The reconciliation engine. One run: load caches, repair gaps, discover new
// matches on ld2l.gg, pull their stats from OpenDota, write both caches back.
// Durable state is written exactly once, at the end, and only when every
// fetch succeeded; an aborted run leaves the previous files untouched.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::time::Duration;

use crate::error::SyncError;
use crate::net::{Clock, Fetcher, HttpTransport, SystemClock, Transport};
use crate::params::{
    DEFAULT_DATA_DIR, LEAGUE_BASE_URL, LEAGUE_INTERVAL_SECS, STATS_BASE_URL, STATS_INTERVAL_SECS,
};
use crate::progress::Progress;
use crate::scrape::{match_list, match_page};
use crate::stats::{self, MatchRecord, MatchSummary};
use crate::store::{self, Store};

pub struct SyncOptions {
    pub season_id: u32,
    /// Table file; `data_dir/match_data_s{season}.csv` when not given.
    pub table_path: Option<PathBuf>,
    pub data_dir: PathBuf,
}

impl SyncOptions {
    pub fn new(season_id: u32) -> Self {
        SyncOptions { season_id, table_path: None, data_dir: PathBuf::from(DEFAULT_DATA_DIR) }
    }
}

/// What a run did, for the frontend to report.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub new_pairings: usize,
    pub new_rows: usize,
    pub backfilled: usize,
    pub orphan_rows: usize,
    /// False when there was nothing new and the files were left alone.
    pub wrote: bool,
}

/// Sync one season against the live sites.
pub fn synchronize(opts: &SyncOptions, progress: Option<&mut dyn Progress>) -> Result<RunSummary, SyncError> {
    let mut league = Fetcher::new(
        LEAGUE_BASE_URL,
        Duration::from_secs(LEAGUE_INTERVAL_SECS),
        HttpTransport::new()?,
        SystemClock,
    );
    let mut stats_api = Fetcher::new(
        STATS_BASE_URL,
        Duration::from_secs(STATS_INTERVAL_SECS),
        HttpTransport::new()?,
        SystemClock,
    );
    run_with(opts, &mut league, &mut stats_api, progress)
}

/// The engine proper, with both sources injected. Tests drive this with
/// canned transports and a virtual clock.
pub fn run_with<L, S, CL, CS>(
    opts: &SyncOptions,
    league: &mut Fetcher<L, CL>,
    stats_api: &mut Fetcher<S, CS>,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, SyncError>
where
    L: Transport,
    S: Transport,
    CL: Clock,
    CS: Clock,
{
    let mut summary = RunSummary::default();

    // 1. Load caches. Absent files are just a first run.
    let db = Store::new(&opts.data_dir);
    let mut pairings = db.load_pairings(opts.season_id)?;
    let table_path = opts
        .table_path
        .clone()
        .unwrap_or_else(|| db.default_table_path(opts.season_id));
    let mut table = store::load_table(&table_path)?;

    let cached_informal: BTreeSet<u64> = pairings.keys().copied().collect();
    // 0 marks a forfeit; there is never stats data for it
    let cached_stats: BTreeSet<u64> = pairings.values().copied().filter(|&id| id != 0).collect();
    let known_stats: BTreeSet<u64> = table.iter().map(|m| m.match_id).collect();
    logf!(
        "season {}: {} pairing(s) cached, {} row(s) in table",
        opts.season_id,
        cached_informal.len(),
        known_stats.len()
    );

    // 2. Cached pairings with no table row mean a previous run was cut short
    // between pulling pairings and pulling stats. Refetch those matches.
    let missing: Vec<u64> = cached_stats.difference(&known_stats).copied().collect();
    if !missing.is_empty() {
        logw!(
            "table {} is missing {} match(es) present in the pairing cache; refetching",
            table_path.display(),
            missing.len()
        );
        for &stats_id in &missing {
            match fetch_summary(stats_api, stats_id) {
                Ok(m) => {
                    table.push(m);
                    summary.backfilled += 1;
                }
                Err(SyncError::Malformed { what, detail }) => {
                    // bad record, not a bad connection: skip it and let the
                    // next run's backfill try again
                    logw!("skipping {what}: {detail}");
                }
                Err(e) => return Err(e),
            }
        }
    }

    // 3. Table rows with no pairing mean the cache was edited out of band.
    // There is no way to tell which ld2l match produced them, so just say so.
    summary.orphan_rows = known_stats.difference(&cached_stats).count();
    if summary.orphan_rows > 0 {
        logw!(
            "table {} has {} row(s) with no pairing cache entry; leaving them as-is",
            table_path.display(),
            summary.orphan_rows
        );
    }

    // 4. What does ld2l currently list as decided?
    let listing = league.fetch(&format!("seasons/{}/matches", opts.season_id))?;
    let posted = match_list::completed_matches(&listing)?;

    // ld2l never un-posts a finished match. If one of ours is gone, the site
    // was restructured and nothing downstream can be trusted.
    let vanished: Vec<u64> = cached_informal.difference(&posted).copied().collect();
    if !vanished.is_empty() {
        return Err(SyncError::ConsistencyViolation { vanished });
    }

    // 5. Pair and pull each newly decided match, in ascending ID order.
    let new_ids: Vec<u64> = posted.difference(&cached_informal).copied().collect();
    if let Some(p) = progress.as_deref_mut() {
        p.begin(new_ids.len());
    }

    let mut new_pairings: BTreeMap<u64, u64> = BTreeMap::new();
    for &informal_id in &new_ids {
        let page = league.fetch(&format!("matches/{informal_id}"))?;
        let stats_id = match_page::stats_match_id(&page)?;

        if stats_id != 0
            && (cached_stats.contains(&stats_id) || new_pairings.values().any(|&v| v == stats_id))
        {
            // Two ld2l matches pointing at one OpenDota match would leave the
            // caches ambiguous forever. Refuse rather than overwrite.
            return Err(SyncError::IdCollision { stats_id, informal_id });
        }
        new_pairings.insert(informal_id, stats_id);

        if stats_id != 0 && !known_stats.contains(&stats_id) {
            match fetch_summary(stats_api, stats_id) {
                Ok(m) => {
                    table.push(m);
                    summary.new_rows += 1;
                }
                Err(SyncError::Malformed { what, detail }) => {
                    logw!("skipping {what}: {detail}");
                }
                Err(e) => return Err(e),
            }
        }
        if let Some(p) = progress.as_deref_mut() {
            p.item_done(informal_id);
        }
    }
    summary.new_pairings = new_pairings.len();

    // 6. Single write point. Nothing new means nothing to write.
    if new_pairings.is_empty() && summary.backfilled == 0 {
        logf!("no new matches");
        if let Some(p) = progress.as_deref_mut() {
            p.log("No new matches.");
            p.finish();
        }
        return Ok(summary);
    }

    pairings.extend(&new_pairings);
    db.save_pairings(opts.season_id, &pairings)?;
    store::save_table(&table_path, &table)?;
    summary.wrote = true;

    logf!(
        "wrote {} pairing(s) and {} row(s) ({} backfilled)",
        pairings.len(),
        table.len(),
        summary.backfilled
    );
    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    Ok(summary)
}

fn fetch_summary<S: Transport, C: Clock>(
    stats_api: &mut Fetcher<S, C>,
    stats_id: u64,
) -> Result<MatchSummary, SyncError> {
    let body = stats_api.fetch(&format!("matches/{stats_id}"))?;
    let record: MatchRecord = serde_json::from_str(&body)
        .map_err(|e| SyncError::malformed(format!("stats record for match {stats_id}"), e.to_string()))?;
    Ok(stats::summarize(&record))
}
