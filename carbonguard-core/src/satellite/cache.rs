//! Caller-owned memoization of satellite analysis results

use std::collections::{HashMap, VecDeque};

use chrono::{DateTime, Utc};

use crate::location::{EcosystemType, SiteLocation};
use crate::time::DateRange;

use super::{DataType, SatelliteAnalysisResult};

/// Composite key of one analysis request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    latitude_micro: i64,
    longitude_micro: i64,
    ecosystem: EcosystemType,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    data_type: DataType,
}

impl CacheKey {
    pub fn new(site: &SiteLocation, range: &DateRange, data_type: DataType) -> Self {
        let (latitude_micro, longitude_micro) = site.point.micro_degrees();
        Self {
            latitude_micro,
            longitude_micro,
            ecosystem: site.ecosystem,
            start: range.start,
            end: range.end,
            data_type,
        }
    }
}

/// Key -> result store with an eviction policy of the implementor's choosing
pub trait AnalysisCache {
    fn get(&mut self, key: &CacheKey) -> Option<SatelliteAnalysisResult>;

    fn put(&mut self, key: CacheKey, result: SatelliteAnalysisResult);
}

/// Bounded cache evicting the least recently used entry
#[derive(Debug)]
pub struct LruAnalysisCache {
    capacity: usize,
    entries: HashMap<CacheKey, SatelliteAnalysisResult>,
    // Front is least recently used
    order: VecDeque<CacheKey>,
}

impl LruAnalysisCache {
    /// Create a cache holding at most `capacity` results (minimum 1)
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.contains_key(key)
    }

    fn touch(&mut self, key: &CacheKey) {
        if let Some(pos) = self.order.iter().position(|k| k == key) {
            self.order.remove(pos);
        }
        self.order.push_back(*key);
    }
}

impl AnalysisCache for LruAnalysisCache {
    fn get(&mut self, key: &CacheKey) -> Option<SatelliteAnalysisResult> {
        let hit = self.entries.get(key).cloned();
        if hit.is_some() {
            self.touch(key);
        }
        hit
    }

    fn put(&mut self, key: CacheKey, result: SatelliteAnalysisResult) {
        if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
            if let Some(evicted) = self.order.pop_front() {
                log::debug!("evicting satellite analysis {:?}", evicted);
                self.entries.remove(&evicted);
            }
        }
        self.entries.insert(key, result);
        self.touch(&key);
    }
}
