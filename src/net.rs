// src/net.rs
// Outbound HTTP plus the per-source politeness throttle.

use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use crate::error::SyncError;
use crate::params::{HTTP_TIMEOUT_SECS, USER_AGENT};

/* ---------------- Clock ---------------- */

/// Time source for the throttle. Injectable so tests run without real sleeps.
pub trait Clock {
    fn now(&self) -> Instant;
    fn sleep(&self, d: Duration);
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }

    fn sleep(&self, d: Duration) {
        std::thread::sleep(d);
    }
}

/// Deterministic clock for tests: `sleep` advances virtual time instantly.
/// Clones share the same timeline.
#[derive(Clone)]
pub struct VirtualClock {
    base: Instant,
    offset: Rc<Cell<Duration>>,
}

impl VirtualClock {
    pub fn new() -> Self {
        VirtualClock { base: Instant::now(), offset: Rc::new(Cell::new(Duration::ZERO)) }
    }

    /// Virtual time elapsed since construction.
    pub fn elapsed(&self) -> Duration {
        self.offset.get()
    }

    pub fn advance(&self, d: Duration) {
        self.offset.set(self.offset.get() + d);
    }
}

impl Default for VirtualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for VirtualClock {
    fn now(&self) -> Instant {
        self.base + self.offset.get()
    }

    fn sleep(&self, d: Duration) {
        self.advance(d);
    }
}

/* ---------------- Transport ---------------- */

/// One GET, no politeness. The throttle lives in `Fetcher`.
pub trait Transport {
    fn get(&self, url: &str) -> Result<String, SyncError>;
}

impl<T: Transport + ?Sized> Transport for Rc<T> {
    fn get(&self, url: &str) -> Result<String, SyncError> {
        (**self).get(url)
    }
}

pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, SyncError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| SyncError::net("client setup", e.to_string()))?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String, SyncError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| SyncError::net(url, e.to_string()))?;

        if !resp.status().is_success() {
            return Err(SyncError::net(url, format!("HTTP {}", resp.status())));
        }
        resp.text().map_err(|e| SyncError::net(url, e.to_string()))
    }
}

/* ---------------- Rate-limited fetcher ---------------- */

/// Issues GETs against one site, guaranteeing a minimum gap since its own
/// previous request. Each source gets its own instance: ld2l.gg and the
/// OpenDota API want different politeness intervals, and sharing a clock
/// would mis-throttle one of them.
pub struct Fetcher<T: Transport, C: Clock> {
    base_url: String,
    interval: Duration,
    prev_pull: Option<Instant>,
    transport: T,
    clock: C,
}

impl<T: Transport, C: Clock> Fetcher<T, C> {
    pub fn new(base_url: &str, interval: Duration, transport: T, clock: C) -> Self {
        Fetcher {
            base_url: base_url.to_string(),
            interval,
            prev_pull: None,
            transport,
            clock,
        }
    }

    /// GET `base_url + path`, sleeping first if the previous request was too
    /// recent. The slot is consumed even when the request fails, so a string
    /// of errors cannot turn into a request burst.
    pub fn fetch(&mut self, path: &str) -> Result<String, SyncError> {
        if let Some(prev) = self.prev_pull {
            let since = self.clock.now().saturating_duration_since(prev);
            if since < self.interval {
                self.clock.sleep(self.interval - since);
            }
        }

        let url = format!("{}{}", self.base_url, path);
        logd!("GET {url}");
        let out = self.transport.get(&url);
        self.prev_pull = Some(self.clock.now());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    /// Records the virtual instant of each request; optionally fails some.
    struct Probe {
        clock: VirtualClock,
        calls: RefCell<Vec<Duration>>,
        fail_first: Cell<bool>,
    }

    impl Transport for Probe {
        fn get(&self, url: &str) -> Result<String, SyncError> {
            self.calls.borrow_mut().push(self.clock.elapsed());
            if self.fail_first.replace(false) {
                return Err(SyncError::net(url, "boom"));
            }
            Ok(String::from("ok"))
        }
    }

    fn fetcher(secs: u64, fail_first: bool) -> (Fetcher<Rc<Probe>, VirtualClock>, Rc<Probe>) {
        let clock = VirtualClock::new();
        let probe = Rc::new(Probe {
            clock: clock.clone(),
            calls: RefCell::new(Vec::new()),
            fail_first: Cell::new(fail_first),
        });
        let f = Fetcher::new("https://x.test/", Duration::from_secs(secs), probe.clone(), clock);
        (f, probe)
    }

    #[test]
    fn consecutive_requests_are_spaced_by_interval() {
        let (mut f, probe) = fetcher(10, false);
        for _ in 0..3 {
            f.fetch("a").unwrap();
        }
        let calls = probe.calls.borrow();
        assert_eq!(calls.len(), 3);
        for pair in calls.windows(2) {
            assert!(pair[1] - pair[0] >= Duration::from_secs(10));
        }
    }

    #[test]
    fn first_request_goes_out_immediately() {
        let (mut f, probe) = fetcher(10, false);
        f.fetch("a").unwrap();
        assert_eq!(probe.calls.borrow()[0], Duration::ZERO);
    }

    #[test]
    fn failed_request_still_consumes_its_slot() {
        let (mut f, probe) = fetcher(10, true);
        assert!(f.fetch("a").is_err());
        f.fetch("a").unwrap();
        let calls = probe.calls.borrow();
        assert!(calls[1] - calls[0] >= Duration::from_secs(10));
    }
}
