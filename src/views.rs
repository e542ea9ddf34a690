// Open view sessions, keyed by the id handed to the host view

use crate::coordinator::SharedSession;
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::{sync::RwLock, task::JoinHandle, time::Instant};
use uuid::Uuid;

struct OpenView {
    session: SharedSession,
    last_seen: Instant,
}

#[derive(Clone, Default)]
pub struct ViewRegistry {
    sessions: Arc<RwLock<HashMap<Uuid, OpenView>>>,
}

impl ViewRegistry {
    pub async fn insert(&self, session: SharedSession) -> Uuid {
        let id = Uuid::new_v4();
        let view = OpenView {
            session,
            last_seen: Instant::now(),
        };
        self.sessions.write().await.insert(id, view);
        id
    }

    /// Looks up a view and marks it as used now.
    pub async fn get(&self, id: &Uuid) -> Option<SharedSession> {
        let mut sessions = self.sessions.write().await;
        let view = sessions.get_mut(id)?;
        view.last_seen = Instant::now();
        Some(view.session.clone())
    }

    /// Removes the session and closes it, so fetches still in flight for it are discarded.
    pub async fn close(&self, id: &Uuid) -> bool {
        let removed = self.sessions.write().await.remove(id);
        match removed {
            Some(view) => {
                view.session.lock().await.close();
                true
            }
            None => false,
        }
    }

    /// Closes and drops every view not used within `idle`. Returns how many went.
    pub async fn evict_idle(&self, idle: Duration) -> usize {
        let expired: Vec<SharedSession> = {
            let mut sessions = self.sessions.write().await;
            let now = Instant::now();
            let ids: Vec<Uuid> = sessions
                .iter()
                .filter(|(_, view)| now.duration_since(view.last_seen) >= idle)
                .map(|(id, _)| *id)
                .collect();
            ids.iter()
                .filter_map(|id| sessions.remove(id))
                .map(|view| view.session)
                .collect()
        };

        for session in &expired {
            session.lock().await.close();
        }
        expired.len()
    }

    /// Background sweep that runs `evict_idle` a few times per idle period.
    pub fn spawn_eviction(&self, idle: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        let period = (idle / 4).max(Duration::from_secs(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let evicted = registry.evict_idle(idle).await;
                if evicted > 0 {
                    let open_views = registry.len().await;
                    tracing::info!(evicted, open_views, "Evicted idle views");
                }
            }
        })
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{presets::resolve, session::DiscoverySession};
    use tokio::sync::Mutex;

    fn session(slug: &str) -> SharedSession {
        Arc::new(Mutex::new(DiscoverySession::new(resolve(slug), 12)))
    }

    #[tokio::test]
    async fn closing_removes_and_closes_the_session() {
        let registry = ViewRegistry::default();
        let session = session("watches");
        let id = registry.insert(session.clone()).await;
        assert!(registry.get(&id).await.is_some());

        assert!(registry.close(&id).await);
        assert!(registry.get(&id).await.is_none());
        assert!(session.lock().await.is_closed());
        assert!(!registry.close(&id).await);
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test(start_paused = true)]
    async fn idle_views_are_evicted_and_closed() {
        let registry = ViewRegistry::default();
        let active = session("watches");
        let idle = session("shoes");
        let active_id = registry.insert(active.clone()).await;
        let idle_id = registry.insert(idle.clone()).await;

        tokio::time::advance(Duration::from_secs(30)).await;
        assert!(registry.get(&active_id).await.is_some());
        tokio::time::advance(Duration::from_secs(40)).await;

        assert_eq!(registry.evict_idle(Duration::from_secs(60)).await, 1);
        assert!(registry.get(&idle_id).await.is_none());
        assert!(idle.lock().await.is_closed());
        assert!(registry.get(&active_id).await.is_some());
        assert!(!active.lock().await.is_closed());
    }

    #[tokio::test(start_paused = true)]
    async fn background_sweep_drops_abandoned_views() {
        let registry = ViewRegistry::default();
        let sweeper = registry.spawn_eviction(Duration::from_secs(60));
        let abandoned = session("handbags");
        registry.insert(abandoned.clone()).await;

        tokio::time::sleep(Duration::from_secs(120)).await;
        assert_eq!(registry.len().await, 0);
        assert!(abandoned.lock().await.is_closed());
        sweeper.abort();
    }
}
