use std::time::Duration;

use async_trait::async_trait;
use moka::future::Cache;
use uuid::Uuid;

use super::SessionData;

pub type SessionId = Uuid;

/// Server-side session persistence keyed by the id carried in the session cookie
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    async fn load(&self, id: &SessionId) -> Option<SessionData>;
    async fn save(&self, id: &SessionId, data: SessionData);
    async fn delete(&self, id: &SessionId);
}

/// In-process session store. Sessions expire after `idle` without access.
#[derive(Clone)]
pub struct MemorySessionStore {
    cache: Cache<SessionId, SessionData>,
}

impl MemorySessionStore {
    pub fn new(idle: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(100_000)
            .time_to_idle(idle)
            .build();

        Self { cache }
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn load(&self, id: &SessionId) -> Option<SessionData> {
        self.cache.get(id).await
    }

    async fn save(&self, id: &SessionId, data: SessionData) {
        self.cache.insert(*id, data).await;
    }

    async fn delete(&self, id: &SessionId) {
        self.cache.invalidate(id).await;
    }
}
