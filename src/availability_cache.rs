use crate::types::TimeSlot;
use std::{collections::HashMap, time::Duration};
use tokio::time::Instant;

pub const CACHE_CAPACITY: usize = 10;
pub const CACHE_DURATION: Duration = Duration::from_secs(5 * 60);

pub fn cache_key(date: &str, time: &str) -> String {
    format!("{date}_{time}")
}

#[derive(Debug, Clone)]
struct CacheEntry {
    data: Vec<TimeSlot>,
    timestamp: Instant,
    sequence: u64,
}

/// Recently fetched slot lists, keyed by [`cache_key`].
#[derive(Debug)]
pub struct AvailabilityCache {
    entries: HashMap<String, CacheEntry>,
    capacity: usize,
    ttl: Duration,
    writes: u64,
}

impl Default for AvailabilityCache {
    fn default() -> Self {
        Self::new(CACHE_CAPACITY, CACHE_DURATION)
    }
}

impl AvailabilityCache {
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            capacity,
            ttl,
            writes: 0,
        }
    }

    pub fn get(&self, key: &str) -> Option<Vec<TimeSlot>> {
        self.entries
            .get(key)
            .filter(|entry| entry.timestamp.elapsed() < self.ttl)
            .map(|entry| entry.data.clone())
    }

    pub fn insert(&mut self, key: String, data: Vec<TimeSlot>) {
        self.writes += 1;
        self.entries.insert(
            key,
            CacheEntry {
                data,
                timestamp: Instant::now(),
                sequence: self.writes,
            },
        );

        if self.entries.len() > self.capacity {
            self.evict();
        }
    }

    fn evict(&mut self) {
        let mut entries: Vec<(String, CacheEntry)> = self.entries.drain().collect();
        entries.sort_unstable_by(|(_, a), (_, b)| {
            b.timestamp
                .cmp(&a.timestamp)
                .then(b.sequence.cmp(&a.sequence))
        });
        entries.truncate(self.capacity);
        self.entries.extend(entries);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::testutils::example_slots;

    #[test]
    fn cache_key_joins_date_and_time() {
        assert_eq!(cache_key("2025-08-28", "10:00"), "2025-08-28_10:00");
    }

    #[tokio::test(start_paused = true)]
    async fn fresh_entry_is_returned() {
        let mut cache = AvailabilityCache::default();
        let slots = example_slots("2025-08-28", 10);

        cache.insert(cache_key("2025-08-28", "10:00"), slots.clone());

        assert_eq!(cache.get("2025-08-28_10:00"), Some(slots));
        assert_eq!(cache.get("2025-08-28_11:00"), None);
    }

    #[tokio::test(start_paused = true)]
    async fn entry_expires_after_freshness_window() {
        let mut cache = AvailabilityCache::default();
        cache.insert("key".into(), example_slots("2025-08-28", 9));

        tokio::time::advance(CACHE_DURATION - Duration::from_secs(1)).await;
        assert!(cache.get("key").is_some());

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(cache.get("key").is_none());
        assert!(cache.contains_key("key"));
    }

    #[tokio::test(start_paused = true)]
    async fn eleventh_write_evicts_oldest_entry() {
        let mut cache = AvailabilityCache::default();
        for index in 0..CACHE_CAPACITY {
            cache.insert(format!("key_{index}"), vec![]);
            tokio::time::advance(Duration::from_millis(10)).await;
        }
        assert_eq!(cache.len(), CACHE_CAPACITY);

        cache.insert("key_new".into(), vec![]);

        assert_eq!(cache.len(), CACHE_CAPACITY);
        assert!(!cache.contains_key("key_0"));
        assert!(cache.contains_key("key_1"));
        assert!(cache.contains_key("key_new"));
    }

    #[tokio::test(start_paused = true)]
    async fn same_instant_writes_evict_by_write_order() {
        let mut cache = AvailabilityCache::new(3, CACHE_DURATION);
        for key in ["a", "b", "c", "d", "e"] {
            cache.insert(key.into(), vec![]);
        }

        assert_eq!(cache.len(), 3);
        assert!(!cache.contains_key("a"));
        assert!(!cache.contains_key("b"));
        assert!(cache.contains_key("c"));
        assert!(cache.contains_key("e"));
    }

    #[tokio::test(start_paused = true)]
    async fn reads_do_not_refresh_recency() {
        let mut cache = AvailabilityCache::new(2, CACHE_DURATION);
        cache.insert("first".into(), vec![]);
        tokio::time::advance(Duration::from_millis(10)).await;
        cache.insert("second".into(), vec![]);

        assert!(cache.get("first").is_some());
        cache.insert("third".into(), vec![]);

        assert!(!cache.contains_key("first"));
        assert!(cache.contains_key("second"));
        assert!(cache.contains_key("third"));
    }

    #[tokio::test(start_paused = true)]
    async fn rewriting_a_key_keeps_a_single_entry() {
        let mut cache = AvailabilityCache::default();
        cache.insert("key".into(), vec![]);
        cache.insert("key".into(), example_slots("2025-08-28", 16));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get("key").unwrap().len(), 2);
    }
}
