use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use crate::observer::Observer;

/// Time source for TTL checks, injected so tests can move time.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// Cache key for one scan: position rounded to ~100 m plus the TTL
/// bucket the timestamp falls into, so repeated scans from the same
/// spot within the window coalesce.
pub fn scan_key(observer: &Observer, ttl: Duration) -> String {
    let bucket_s = ttl.as_secs().max(1) as i64;
    let bucket = observer.timestamp.timestamp().div_euclid(bucket_s);
    format!(
        "{:.3},{:.3},{}",
        observer.latitude_deg, observer.longitude_deg, bucket
    )
}

struct Entry<V> {
    inserted: Instant,
    value: V,
}

/// In-memory TTL cache owned by the scan orchestrator. Guarded by a
/// mutex since the server handles requests on multiple threads.
pub struct TtlCache<V> {
    ttl: Duration,
    clock: Box<dyn Clock>,
    entries: Mutex<HashMap<String, Entry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Box::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Box<dyn Clock>) -> Self {
        Self {
            ttl,
            clock,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns a clone of the cached value, evicting it if expired.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.entries.lock().unwrap();
        match entries.get(key) {
            Some(entry) if now.duration_since(entry.inserted) < self.ttl => {
                Some(entry.value.clone())
            }
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: String, value: V) {
        let mut entries = self.entries.lock().unwrap();
        entries.insert(
            key,
            Entry {
                inserted: self.clock.now(),
                value,
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Arc;

    /// Starts at an arbitrary origin and advances only when told to.
    struct ManualClock {
        origin: Instant,
        offset_s: AtomicU64,
    }

    impl ManualClock {
        fn new() -> Self {
            Self {
                origin: Instant::now(),
                offset_s: AtomicU64::new(0),
            }
        }

        fn advance(&self, seconds: u64) {
            self.offset_s.fetch_add(seconds, Ordering::SeqCst);
        }
    }

    impl Clock for Arc<ManualClock> {
        fn now(&self) -> Instant {
            self.origin + Duration::from_secs(self.offset_s.load(Ordering::SeqCst))
        }
    }

    #[test]
    fn hit_within_ttl_miss_after_expiry() {
        let clock = Arc::new(ManualClock::new());
        let cache: TtlCache<String> =
            TtlCache::with_clock(Duration::from_secs(300), Box::new(clock.clone()));

        cache.insert("k".into(), "report".into());
        assert_eq!(cache.get("k").as_deref(), Some("report"));

        clock.advance(299);
        assert_eq!(cache.get("k").as_deref(), Some("report"));

        clock.advance(2);
        assert_eq!(cache.get("k"), None);
    }

    #[test]
    fn unknown_key_misses() {
        let cache: TtlCache<String> = TtlCache::new(Duration::from_secs(300));
        assert_eq!(cache.get("missing"), None);
    }

    #[test]
    fn same_bucket_same_key() {
        let t1 = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 10).unwrap();
        let t2 = t1 + chrono::Duration::seconds(30);
        let ttl = Duration::from_secs(300);
        let a = Observer::new(12.8688, 77.6513, 920.0, t1).unwrap();
        let b = Observer::new(12.8688, 77.6513, 920.0, t2).unwrap();
        assert_eq!(scan_key(&a, ttl), scan_key(&b, ttl));
    }

    #[test]
    fn different_position_different_key() {
        let t = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 10).unwrap();
        let ttl = Duration::from_secs(300);
        let a = Observer::new(12.8688, 77.6513, 920.0, t).unwrap();
        let b = Observer::new(12.9688, 77.6513, 920.0, t).unwrap();
        assert_ne!(scan_key(&a, ttl), scan_key(&b, ttl));
    }
}
