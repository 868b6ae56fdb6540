// src/params.rs
// Fixed knobs. Both sources are polled politely; the league site is a small
// community server so it gets the long interval, the stats API the short one.

pub const LEAGUE_BASE_URL: &str = "https://ld2l.gg/";
pub const STATS_BASE_URL: &str = "https://api.opendota.com/api/";

/// Minimum seconds between requests to ld2l.gg.
pub const LEAGUE_INTERVAL_SECS: u64 = 15;
/// Minimum seconds between requests to the OpenDota API.
pub const STATS_INTERVAL_SECS: u64 = 1;

pub const HTTP_TIMEOUT_SECS: u64 = 30;
pub const USER_AGENT: &str = concat!("ld2l_sync/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_DATA_DIR: &str = "data";
