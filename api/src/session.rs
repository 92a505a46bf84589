use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use mongodb::bson::oid::ObjectId;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Clone)]
struct SessionRecord {
    user_id: ObjectId,
    expires_at: DateTime<Utc>,
}

/// Server-side session registry: session id -> user id, with a fixed lifetime.
#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<DashMap<Uuid, SessionRecord>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: Arc::new(DashMap::new()),
            ttl: Duration::seconds(ttl_secs as i64),
        }
    }

    /// Opens a session for `user_id`, returning its id and expiry.
    pub fn create(&self, user_id: ObjectId) -> (Uuid, DateTime<Utc>) {
        self.create_at(user_id, Utc::now())
    }

    pub fn get(&self, session_id: &Uuid) -> Option<ObjectId> {
        self.get_at(session_id, Utc::now())
    }

    pub fn remove(&self, session_id: &Uuid) {
        self.sessions.remove(session_id);
    }

    /// Drops every expired session, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        self.purge_expired_at(Utc::now())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    fn create_at(&self, user_id: ObjectId, now: DateTime<Utc>) -> (Uuid, DateTime<Utc>) {
        let session_id = Uuid::new_v4();
        let expires_at = now + self.ttl;
        self.sessions.insert(
            session_id,
            SessionRecord {
                user_id,
                expires_at,
            },
        );
        (session_id, expires_at)
    }

    fn get_at(&self, session_id: &Uuid, now: DateTime<Utc>) -> Option<ObjectId> {
        let record = self.sessions.get(session_id)?.clone();
        if record.expires_at <= now {
            self.sessions.remove(session_id);
            return None;
        }
        Some(record.user_id)
    }

    fn purge_expired_at(&self, now: DateTime<Utc>) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, record| record.expires_at > now);
        before.saturating_sub(self.sessions.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_resolves_until_expiry() {
        let store = SessionStore::new(60);
        let user = ObjectId::new();
        let now = Utc::now();
        let (sid, expires_at) = store.create_at(user, now);

        assert_eq!(expires_at, now + Duration::seconds(60));
        assert_eq!(store.get_at(&sid, now + Duration::seconds(59)), Some(user));
        assert_eq!(store.get_at(&sid, now + Duration::seconds(60)), None);
        // expired lookups evict the record
        assert!(store.is_empty());
    }

    #[test]
    fn purge_keeps_live_sessions() {
        let store = SessionStore::new(60);
        let now = Utc::now();
        store.create_at(ObjectId::new(), now - Duration::seconds(120));
        let (live, _) = store.create_at(ObjectId::new(), now);

        assert_eq!(store.purge_expired_at(now), 1);
        assert_eq!(store.len(), 1);
        assert!(store.get_at(&live, now).is_some());
    }

    #[test]
    fn removed_session_is_gone() {
        let store = SessionStore::new(60);
        let (sid, _) = store.create(ObjectId::new());
        store.remove(&sid);
        assert!(store.get(&sid).is_none());
    }
}
