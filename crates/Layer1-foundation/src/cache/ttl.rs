//! TTL Cache
//!
//! 키마다 독립적인 만료 시간을 가진 단순 캐시.
//! 원격 카탈로그처럼 "일정 시간 동안 다시 가져오지 않기"가 목적인 경우에 사용합니다.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::{Duration, Instant};

#[derive(Debug)]
struct TtlEntry<V> {
    value: V,
    expires_at: Instant,
}

/// 캐시 통계
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TtlCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub expirations: u64,
}

/// TTL 캐시
#[derive(Debug)]
pub struct TtlCache<K, V> {
    entries: HashMap<K, TtlEntry<V>>,
    default_ttl: Duration,
    stats: TtlCacheStats,
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    /// Create a new cache with the default TTL
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            default_ttl,
            stats: TtlCacheStats::default(),
        }
    }

    /// Get a clone of the value if it exists and hasn't expired
    pub fn get(&mut self, key: &K) -> Option<V> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if entry.expires_at > now => {
                self.stats.hits += 1;
                Some(entry.value.clone())
            }
            Some(_) => {
                // Entry expired, remove it
                self.entries.remove(key);
                self.stats.expirations += 1;
                self.stats.misses += 1;
                None
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Insert a value with the default TTL
    pub fn insert(&mut self, key: K, value: V) {
        self.insert_with_ttl(key, value, self.default_ttl);
    }

    /// Insert a value with a custom TTL
    pub fn insert_with_ttl(&mut self, key: K, value: V, ttl: Duration) {
        let entry = TtlEntry {
            value,
            expires_at: Instant::now() + ttl,
        };
        self.entries.insert(key, entry);
    }

    /// Remove expired entries
    pub fn cleanup_expired(&mut self) {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, e| e.expires_at > now);
        self.stats.expirations += (before - self.entries.len()) as u64;
    }

    pub fn remove(&mut self, key: &K) -> Option<V> {
        self.entries.remove(key).map(|e| e.value)
    }

    /// Invalidate everything
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Number of entries (including potentially expired ones)
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn stats(&self) -> TtlCacheStats {
        self.stats
    }
}
