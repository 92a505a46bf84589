use crate::{
    config::Config,
    db::{PostStore, UserStore},
    session::SessionStore,
    upload::ObjectStorage,
};
use governor::{DefaultKeyedRateLimiter, Quota, RateLimiter};
use std::{num::NonZeroU32, sync::Arc, time::Duration};
use tokio::task::JoinHandle;
use tracing::debug;

/// Shared by every handler; cloning only bumps reference counts.
#[derive(Clone)]
pub struct AppState {
    pub posts: Arc<dyn PostStore>,
    pub users: Arc<dyn UserStore>,
    pub uploads: Arc<dyn ObjectStorage>,
    pub sessions: SessionStore,
    pub login_limiter: Arc<DefaultKeyedRateLimiter<String>>, // Keyed by email
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        config: Config,
        posts: Arc<dyn PostStore>,
        users: Arc<dyn UserStore>,
        uploads: Arc<dyn ObjectStorage>,
    ) -> Self {
        let per_minute =
            NonZeroU32::new(config.login_attempts_per_minute).unwrap_or(NonZeroU32::MIN);

        Self {
            posts,
            users,
            uploads,
            sessions: SessionStore::new(config.session_ttl_secs),
            login_limiter: Arc::new(RateLimiter::keyed(Quota::per_minute(per_minute))),
            config: Arc::new(config),
        }
    }

    /// Drops expired sessions and login throttle entries that have fully
    /// replenished. Returns the number of sessions removed.
    pub fn purge_stale(&self) -> usize {
        let purged = self.sessions.purge_expired();
        self.login_limiter.retain_recent();
        self.login_limiter.shrink_to_fit();
        purged
    }
}

/// Runs [`AppState::purge_stale`] every `every` so abandoned logins and
/// one-off login emails don't pile up.
pub fn spawn_purge_task(state: AppState, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            let purged = state.purge_stale();
            if purged > 0 {
                debug!("Purged {} expired sessions", purged);
            }
            debug!("{} login throttle entries kept", state.login_limiter.len());
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{db::MemoryStore, upload::MemoryStorage};

    fn state(attempts_per_minute: &str) -> AppState {
        let config = Config::from_lookup(|key| {
            let value = match key {
                "DB_URL" => "mongodb://localhost:27017",
                "SECRET" => "test-secret",
                "S3_KEY" => "key",
                "S3_SECRET" => "secret",
                "LOGIN_ATTEMPTS_PER_MINUTE" => attempts_per_minute,
                _ => return None,
            };
            Some(value.to_string())
        })
        .unwrap();
        let store = Arc::new(MemoryStore::new());

        AppState::new(config, store.clone(), store, Arc::new(MemoryStorage::new()))
    }

    #[test]
    fn purge_drops_replenished_login_keys() {
        // one cell replenishes every millisecond
        let state = state("60000");
        for n in 0..20 {
            assert!(state.login_limiter.check_key(&format!("user{n}@example.com")).is_ok());
        }
        assert_eq!(state.login_limiter.len(), 20);

        std::thread::sleep(Duration::from_millis(50));
        state.purge_stale();

        assert!(state.login_limiter.is_empty());
    }

    #[test]
    fn purge_keeps_throttled_login_keys() {
        let state = state("2");
        assert!(state.login_limiter.check_key(&"kim@example.com".to_string()).is_ok());

        state.purge_stale();

        assert_eq!(state.login_limiter.len(), 1);
    }
}
