use std::sync::{Mutex, MutexGuard};

use crate::report::{Sky, Tpv};

#[derive(Debug, Default)]
struct Latest {
    sky: Sky,
    tpv: Option<Tpv>,
}

/// Latest [Sky] and [Tpv] reports received on the session.
///
/// A single lock covers both slots so a scrape always observes a consistent
/// pair. Before anything arrived, the sky slot holds an empty view and the
/// fix slot is vacant: neither projects to any metric.
#[derive(Debug, Default)]
pub struct Cache {
    inner: Mutex<Latest>,
}

impl Cache {
    fn lock(&self) -> MutexGuard<'_, Latest> {
        // slots are always overwritten as a whole, a poisoned guard is still coherent
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the latest [Sky] report
    pub fn set_latest_sky(&self, sky: Sky) {
        self.lock().sky = sky;
    }

    /// Replace the latest [Tpv] report
    pub fn set_latest_tpv(&self, tpv: Tpv) {
        self.lock().tpv = Some(tpv);
    }

    /// Consistent copy of both slots. The fix is [None] until the
    /// first TPV report arrived.
    pub fn snapshot(&self) -> (Sky, Option<Tpv>) {
        let latest = self.lock();
        (latest.sky.clone(), latest.tpv.clone())
    }
}
