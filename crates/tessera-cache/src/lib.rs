//! Bounded LRU caches keyed by integer `(x, y)` coordinates.
#![forbid(unsafe_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use hashbrown::HashMap;
use tessera_geom::Point2;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SpatialCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    pub entries: usize,
    pub capacity: usize,
}

/// Strict-LRU map from a lattice coordinate to a shared value.
///
/// Owned by a single generator; callers that share one across threads must
/// serialize access themselves. A miss is reported as `None`, never as a
/// placeholder value.
pub struct SpatialCache<V> {
    entries: HashMap<Point2, Arc<V>>,
    order: VecDeque<Point2>,
    capacity: usize,
    hits: u64,
    misses: u64,
    evictions: u64,
}

impl<V> SpatialCache<V> {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: HashMap::with_capacity(capacity.min(1024)),
            order: VecDeque::with_capacity(capacity.min(1024)),
            capacity,
            hits: 0,
            misses: 0,
            evictions: 0,
        }
    }

    /// Look up `(x, y)` and mark it most recently used.
    pub fn load(&mut self, x: i32, y: i32) -> Option<Arc<V>> {
        let key = Point2::new(x, y);
        match self.entries.get(&key).cloned() {
            Some(value) => {
                self.hits += 1;
                self.touch(&key);
                Some(value)
            }
            None => {
                self.misses += 1;
                None
            }
        }
    }

    /// Presence check that leaves the recency order untouched.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        self.entries.contains_key(&Point2::new(x, y))
    }

    /// Insert or replace `(x, y)`, evicting least recently used entries past capacity.
    pub fn store(&mut self, x: i32, y: i32, value: impl Into<Arc<V>>) -> Arc<V> {
        let key = Point2::new(x, y);
        let value = value.into();
        if self.entries.insert(key, Arc::clone(&value)).is_some() {
            self.remove_from_order(&key);
        }
        self.order.push_back(key);
        self.enforce_capacity();
        value
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Resize the cache; shrinking evicts the oldest entries immediately.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.enforce_capacity();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.evictions += self.entries.len() as u64;
        self.entries.clear();
        self.order.clear();
    }

    pub fn stats(&self) -> SpatialCacheStats {
        SpatialCacheStats {
            hits: self.hits,
            misses: self.misses,
            evictions: self.evictions,
            entries: self.entries.len(),
            capacity: self.capacity,
        }
    }

    fn touch(&mut self, key: &Point2) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            if let Some(entry) = self.order.remove(pos) {
                self.order.push_back(entry);
            }
        }
    }

    fn remove_from_order(&mut self, key: &Point2) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
    }

    fn enforce_capacity(&mut self) {
        while self.order.len() > self.capacity {
            let Some(old) = self.order.pop_front() else {
                break;
            };
            if self.entries.remove(&old).is_some() {
                self.evictions += 1;
                log::trace!("evicted ({}, {})", old.x, old.y);
            }
        }
    }
}

impl<V> std::fmt::Debug for SpatialCache<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialCache")
            .field("entries", &self.entries.len())
            .field("capacity", &self.capacity)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn miss_is_absent_not_default() {
        let mut cache: SpatialCache<u32> = SpatialCache::new(2);
        assert!(cache.load(0, 0).is_none());
        cache.store(0, 0, 0u32);
        assert_eq!(cache.load(0, 0).as_deref(), Some(&0));
        let stats = cache.stats();
        assert_eq!((stats.hits, stats.misses), (1, 1));
    }

    #[test]
    fn load_refreshes_recency() {
        let mut cache: SpatialCache<char> = SpatialCache::new(2);
        cache.store(0, 0, 'a');
        cache.store(1, 0, 'b');
        assert!(cache.load(0, 0).is_some());
        cache.store(2, 0, 'c');
        assert!(cache.contains(0, 0));
        assert!(!cache.contains(1, 0));
        assert!(cache.contains(2, 0));
    }

    #[test]
    fn replacing_a_key_keeps_one_entry() {
        let mut cache: SpatialCache<i32> = SpatialCache::new(2);
        cache.store(5, 5, 1);
        cache.store(5, 5, 2);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.load(5, 5).as_deref(), Some(&2));
    }

    #[test]
    fn shrinking_evicts_oldest() {
        let mut cache: SpatialCache<i32> = SpatialCache::new(4);
        for i in 0..4 {
            cache.store(i, -i, i);
        }
        cache.set_capacity(1);
        assert_eq!(cache.len(), 1);
        assert!(cache.contains(3, -3));
        assert_eq!(cache.stats().evictions, 3);
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut cache: SpatialCache<i32> = SpatialCache::new(0);
        let v = cache.store(1, 1, 9);
        assert_eq!(*v, 9);
        assert!(cache.is_empty());
    }
}
