use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Sliding-window rate limiter keyed by caller identity.
///
/// Injected into the HTTP layer rather than living in process-wide state, so
/// tests and alternate entry points can carry their own limits. `allow` prunes
/// the caller it touches; a periodic `evict_stale` sweep drops drained
/// callers from the map entirely.
#[derive(Clone)]
pub struct RateLimiter {
    max_requests: usize,
    window: Duration,
    attempts: Arc<Mutex<HashMap<String, Vec<Instant>>>>,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            attempts: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Record an attempt for `caller` and report whether it is within the
    /// limit. Returns false once the window is saturated.
    pub fn allow(&self, caller: &str) -> bool {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        // A window longer than the clock has been running means nothing has
        // expired yet; `checked_sub` keeps that case from panicking.
        let cutoff = Instant::now().checked_sub(self.window);

        let timestamps = map.entry(caller.to_string()).or_default();
        if let Some(cutoff) = cutoff {
            timestamps.retain(|t| *t > cutoff);
        }
        if timestamps.len() >= self.max_requests {
            return false;
        }
        timestamps.push(Instant::now());
        true
    }

    /// Drop every caller whose window has fully drained. `allow` only prunes
    /// the caller it touches, so this runs on a periodic task to keep the map
    /// from accumulating one entry per distinct caller identity.
    pub fn evict_stale(&self) {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        let Some(cutoff) = Instant::now().checked_sub(self.window) else {
            return;
        };
        map.retain(|_, timestamps| {
            timestamps.retain(|t| *t > cutoff);
            !timestamps.is_empty()
        });
    }

    /// Number of caller identities currently holding recorded attempts.
    pub fn tracked_callers(&self) -> usize {
        let map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        map.len()
    }

    /// Clear recorded attempts for the given caller.
    pub fn clear(&self, caller: &str) {
        let mut map = self.attempts.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(caller);
    }
}
