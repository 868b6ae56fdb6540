// src/progress.rs
/// Progress reporting for a sync run. With a 15-second politeness interval a
/// season catch-up can take minutes, so the frontend gets a line per match.
pub trait Progress {
    /// Called once the number of matches to fetch is known.
    fn begin(&mut self, _total: usize) {}

    /// Free-form status line for human eyes.
    fn log(&mut self, _msg: &str) {}

    /// One match fully processed (paired, and fetched if it was played).
    fn item_done(&mut self, _informal_id: u64) {}

    /// Called at the end of the run, successful or not.
    fn finish(&mut self) {}
}

/// A no-op progress sink.
pub struct NullProgress;
impl Progress for NullProgress {}
