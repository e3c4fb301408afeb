use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

/// How `get` treats a cache hit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CacheReadPolicy {
    /// Always read the store; refresh or evict the cache entry from the result.
    #[default]
    Revalidate,
    /// Return a decodable cache hit without touching the store.
    TrustCache,
}

impl CacheReadPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheReadPolicy::Revalidate => "revalidate",
            CacheReadPolicy::TrustCache => "trust-cache",
        }
    }
}

impl fmt::Display for CacheReadPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown cache read policy {0:?} (expected \"revalidate\" or \"trust-cache\")")]
pub struct UnknownCacheReadPolicy(pub String);

impl FromStr for CacheReadPolicy {
    type Err = UnknownCacheReadPolicy;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "revalidate" => Ok(CacheReadPolicy::Revalidate),
            "trust-cache" | "trust_cache" => Ok(CacheReadPolicy::TrustCache),
            _ => Err(UnknownCacheReadPolicy(s.to_string())),
        }
    }
}

/// Tunables shared by every repository built from one wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RepositoryOptions {
    /// TTL for cache entries written by `create` and `get`.
    pub cache_ttl: Duration,
    pub read_policy: CacheReadPolicy,
    /// Deadline for insert, replace, and soft-delete.
    pub write_timeout: Duration,
    /// Deadline for single reads, counts, and each cache call.
    pub read_timeout: Duration,
    /// Deadline for draining a list page, measured from the start of iteration.
    pub list_timeout: Duration,
}

impl Default for RepositoryOptions {
    fn default() -> Self {
        Self {
            cache_ttl: Duration::from_secs(3600),
            read_policy: CacheReadPolicy::default(),
            write_timeout: Duration::from_secs(1),
            read_timeout: Duration::from_secs(1),
            list_timeout: Duration::from_secs(3),
        }
    }
}
