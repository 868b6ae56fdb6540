// src/error.rs
use std::fmt;
use std::io;

/// Everything that can stop (or get logged during) a sync run.
#[derive(Debug)]
pub enum SyncError {
    /// Expected structure missing from an upstream page. The site layout
    /// changed; results cannot be trusted, so the run aborts.
    UpstreamFormat { page: &'static str, detail: String },

    /// The league site no longer lists matches we have cached. It is supposed
    /// to be append-only; the caches cannot be reconciled against it anymore.
    ConsistencyViolation { vanished: Vec<u64> },

    /// Two league match IDs resolved to the same OpenDota match ID.
    IdCollision { stats_id: u64, informal_id: u64 },

    /// Request failed or returned a non-success status.
    Net { url: String, detail: String },

    /// A cache file, table file or stats record did not parse.
    Malformed { what: String, detail: String },

    Io(io::Error),
}

impl SyncError {
    pub fn upstream_format(page: &'static str, detail: impl Into<String>) -> Self {
        SyncError::UpstreamFormat { page, detail: detail.into() }
    }

    pub fn net(url: impl Into<String>, detail: impl Into<String>) -> Self {
        SyncError::Net { url: url.into(), detail: detail.into() }
    }

    pub fn malformed(what: impl Into<String>, detail: impl Into<String>) -> Self {
        SyncError::Malformed { what: what.into(), detail: detail.into() }
    }
}

impl fmt::Display for SyncError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncError::UpstreamFormat { page, detail } => {
                write!(f, "unexpected {page} layout: {detail}")
            }
            SyncError::ConsistencyViolation { vanished } => {
                write!(
                    f,
                    "league site no longer lists cached match(es) {vanished:?}; \
                     refusing to touch the caches"
                )
            }
            SyncError::IdCollision { stats_id, informal_id } => {
                write!(
                    f,
                    "league match {informal_id} maps to OpenDota match {stats_id}, \
                     which is already paired with another match"
                )
            }
            SyncError::Net { url, detail } => write!(f, "request to {url} failed: {detail}"),
            SyncError::Malformed { what, detail } => write!(f, "could not parse {what}: {detail}"),
            SyncError::Io(e) => write!(f, "io error: {e}"),
        }
    }
}

impl std::error::Error for SyncError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SyncError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for SyncError {
    fn from(e: io::Error) -> Self {
        SyncError::Io(e)
    }
}
