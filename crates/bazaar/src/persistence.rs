//! Wiring of the shared collaborators behind every repository.

use std::sync::Arc;

use bazaar_core::cache::Cache;
use bazaar_core::clock::{Clock, SystemClock};
use bazaar_core::events::EventSink;
use bazaar_core::record::Entity;
use bazaar_core::storage::DocumentStore;

use crate::cache::MemoryCache;
use crate::config::Config;
use crate::events::{EventEmitter, EventWorker};
use crate::repository::{Repository, RepositoryOptions};

/// The process-wide store, cache, emitter, and clock.
///
/// Cheap to clone. Every repository created from the same bundle shares its
/// collaborators.
#[derive(Clone)]
pub struct Persistence {
    store: Arc<dyn DocumentStore>,
    cache: Arc<dyn Cache>,
    events: EventEmitter,
    clock: Arc<dyn Clock>,
    options: RepositoryOptions,
}

impl Persistence {
    pub fn new(store: Arc<dyn DocumentStore>, cache: Arc<dyn Cache>, events: EventEmitter) -> Self {
        Self {
            store,
            cache,
            events,
            clock: Arc::new(SystemClock),
            options: RepositoryOptions::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_options(mut self, options: RepositoryOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &RepositoryOptions {
        &self.options
    }

    /// Builds the repository for `T`.
    pub fn repository<T: Entity>(&self) -> Repository<T> {
        Repository::new(
            Arc::clone(&self.store),
            Arc::clone(&self.cache),
            self.events.clone(),
            Arc::clone(&self.clock),
            self.options,
        )
    }

    /// Connects the backends selected by enabled features.
    ///
    /// - `sqlite`: SQLite store at `config.sqlite_path`; otherwise in-memory.
    /// - `redis`: Redis cache at `config.redis_url`; otherwise in-memory LRU.
    ///
    /// Events are delivered to `sink` by the returned worker.
    pub async fn from_config(
        config: &Config,
        sink: Arc<dyn EventSink>,
    ) -> Result<(Self, EventWorker), anyhow::Error> {
        let store = connect_store(config).await?;
        let cache = connect_cache(config).await?;
        let (events, worker) = EventEmitter::spawn(sink);

        tracing::info!(
            cache_ttl_seconds = config.cache_ttl_seconds,
            read_policy = %config.cache_read_policy,
            "Persistence initialized"
        );

        let persistence =
            Self::new(store, cache, events).with_options(config.repository_options());
        Ok((persistence, worker))
    }
}

#[cfg(feature = "sqlite")]
async fn connect_store(config: &Config) -> Result<Arc<dyn DocumentStore>, anyhow::Error> {
    let store = crate::storage::SqliteStore::open(&config.sqlite_path).await?;
    tracing::info!(path = %config.sqlite_path, "Using SQLite document store");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "sqlite"))]
async fn connect_store(_config: &Config) -> Result<Arc<dyn DocumentStore>, anyhow::Error> {
    tracing::info!("Using in-memory document store");
    Ok(Arc::new(crate::storage::InMemoryStore::new()))
}

#[cfg(feature = "redis")]
async fn connect_cache(config: &Config) -> Result<Arc<dyn Cache>, anyhow::Error> {
    let cache = crate::cache::RedisCache::new(&config.redis_url).await?;
    tracing::info!("Using Redis cache");
    Ok(Arc::new(cache))
}

#[cfg(not(feature = "redis"))]
async fn connect_cache(config: &Config) -> Result<Arc<dyn Cache>, anyhow::Error> {
    tracing::info!(max_entries = config.cache_max_entries, "Using in-memory cache");
    Ok(Arc::new(MemoryCache::new(config.cache_max_entries)))
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence")
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

/// In-memory store and cache with a fresh emitter. Intended for tests and
/// local tooling.
pub fn in_memory(sink: Arc<dyn EventSink>) -> (Persistence, EventWorker) {
    let (events, worker) = EventEmitter::spawn(sink);
    let persistence = Persistence::new(
        Arc::new(crate::storage::InMemoryStore::new()),
        Arc::new(MemoryCache::new(10_000)),
        events,
    );
    (persistence, worker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    use bazaar_core::clock::ManualClock;

    use crate::entities::{Review, Wallet};
    use crate::events::BroadcastSink;

    #[tokio::test]
    async fn test_repositories_share_collaborators() {
        let sink = Arc::new(BroadcastSink::new(16));
        let mut rx = sink.subscribe();
        let (persistence, _worker) = in_memory(sink);

        let wallets = persistence.repository::<Wallet>();
        let again = persistence.repository::<Wallet>();
        let created = wallets
            .create(Wallet {
                owner_id: "user-1".into(),
                balance_minor: 0,
                currency: "EUR".into(),
            })
            .await
            .unwrap();

        assert_eq!(again.get_by_id(&created.id).await.unwrap(), Some(created));
        assert_eq!(rx.recv().await.unwrap().topic, "wallet.created");
    }

    #[tokio::test]
    async fn test_with_clock_and_options() {
        let at = Utc.with_ymd_and_hms(2025, 2, 3, 4, 5, 6).unwrap();
        let options = RepositoryOptions {
            cache_ttl: std::time::Duration::from_secs(5),
            ..Default::default()
        };
        let (persistence, _worker) = in_memory(Arc::new(BroadcastSink::new(4)));
        let persistence = persistence
            .with_clock(Arc::new(ManualClock::new(at)))
            .with_options(options);

        let reviews = persistence.repository::<Review>();
        assert_eq!(reviews.options(), &options);

        let review = reviews
            .create(Review {
                author_id: "a".into(),
                subject_id: "s".into(),
                rating: 4,
                comment: Some("Quick pickup".into()),
            })
            .await
            .unwrap();
        assert_eq!(review.created_at, at);
    }

    #[cfg(not(feature = "redis"))]
    #[tokio::test]
    async fn test_from_config() {
        let dir = std::env::temp_dir().join(format!("bazaar-{}.db", uuid::Uuid::now_v7()));
        let config = Config {
            cache_ttl_seconds: 60,
            cache_max_entries: 100,
            cache_read_policy: Default::default(),
            store_write_timeout_ms: 1_000,
            store_read_timeout_ms: 1_000,
            list_timeout_ms: 3_000,
            event_channel_capacity: 16,
            sqlite_path: dir.to_string_lossy().into_owned(),
            redis_url: String::new(),
        };

        let (persistence, worker) =
            Persistence::from_config(&config, Arc::new(BroadcastSink::new(16)))
                .await
                .unwrap();
        assert_eq!(persistence.options().cache_ttl, std::time::Duration::from_secs(60));

        let wallets = persistence.repository::<Wallet>();
        let created = wallets
            .create(Wallet {
                owner_id: "user-2".into(),
                balance_minor: 1_500,
                currency: "USD".into(),
            })
            .await
            .unwrap();
        assert!(wallets.get_by_id(&created.id).await.unwrap().is_some());

        drop(wallets);
        drop(persistence);
        worker.finish().await;
        let _ = std::fs::remove_file(dir);
    }
}
