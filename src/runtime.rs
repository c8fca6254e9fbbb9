use std::sync::atomic::{AtomicU64, Ordering};

use hifitime::prelude::{Duration, Epoch, TimeScale};

use crate::report::Class;

/// Session bookkeeping, shared between the session thread (writer)
/// and the scrape handlers (readers). Lock free.
#[derive(Debug)]
pub struct Runtime {
    /// Epoch of deployment
    deploy_time: Epoch,

    /// Reports successfully decoded, per [Class]
    received: [AtomicU64; 3],

    /// Reports whose envelope decoded but typed decoding failed, per [Class]
    rejected: [AtomicU64; 3],

    /// Reports of a class we do not implement
    unknown: AtomicU64,
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new(Epoch::now().unwrap_or_else(|_| Epoch::from_unix_seconds(0.0)))
    }
}

impl Runtime {
    pub fn new(deploy_time: Epoch) -> Self {
        Self {
            deploy_time,
            received: Default::default(),
            rejected: Default::default(),
            unknown: AtomicU64::new(0),
        }
    }

    /// Latch a successfully decoded report
    pub fn received(&self, class: Class) {
        self.received[class.index()].fetch_add(1, Ordering::Relaxed);
    }

    /// Latch a report that failed typed decoding
    pub fn rejected(&self, class: Class) {
        self.rejected[class.index()].fetch_add(1, Ordering::Relaxed);
    }

    /// Latch a report of unknown class
    pub fn unknown(&self) {
        self.unknown.fetch_add(1, Ordering::Relaxed);
    }

    /// Total number of decoded reports of this [Class]
    pub fn reports(&self, class: Class) -> u64 {
        self.received[class.index()].load(Ordering::Relaxed)
    }

    /// Total number of typed decoding failures for this [Class]
    pub fn decode_failures(&self, class: Class) -> u64 {
        self.rejected[class.index()].load(Ordering::Relaxed)
    }

    pub fn unknown_reports(&self) -> u64 {
        self.unknown.load(Ordering::Relaxed)
    }

    /// Returns current epoch in [TimeScale::UTC]
    pub fn utc_time(&self) -> Epoch {
        Epoch::now()
            .unwrap_or(self.deploy_time)
            .to_time_scale(TimeScale::UTC)
    }

    /// Current [TimeScale::UTC] epoch rounded to the second, for log lines
    pub fn timestamp(&self) -> Epoch {
        self.utc_time().round(Duration::from_seconds(1.0))
    }

    /// Time elapsed since deployment
    pub fn uptime(&self) -> Duration {
        self.utc_time() - self.deploy_time
    }
}
