//! In-memory wizard sessions.
//!
//! One `OrderWizard` per open order form. Nothing is persisted; a restart or
//! an idle timeout drops the session.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::aggregates::{OrderWizard, PreviewJob};
use crate::{PrintShopError, Result};

#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<Uuid, OrderWizard>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn open(&self) -> Uuid {
        let wizard = OrderWizard::new();
        let id = wizard.id();
        self.sessions.write().await.insert(id, wizard);
        tracing::info!(order = %id, "order session opened");
        id
    }

    /// Runs `op` against the session under the write lock.
    pub async fn update<R>(&self, id: Uuid, op: impl FnOnce(&mut OrderWizard) -> R) -> Result<R> {
        let mut sessions = self.sessions.write().await;
        let wizard = sessions.get_mut(&id).ok_or(PrintShopError::SessionNotFound)?;
        Ok(op(wizard))
    }

    pub async fn close(&self, id: Uuid) -> Result<()> {
        self.sessions.write().await.remove(&id).ok_or(PrintShopError::SessionNotFound)?;
        tracing::info!(order = %id, "order session closed");
        Ok(())
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Drops sessions untouched for longer than `max_idle`. Returns how many went.
    /// A window reaching past the calendar's start keeps everything.
    pub async fn prune_idle(&self, max_idle: Duration) -> usize {
        let Some(cutoff) = Utc::now().checked_sub_signed(max_idle) else {
            return 0;
        };
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, wizard| wizard.updated_at() >= cutoff);
        before - sessions.len()
    }

    /// Renders the preview off the async runtime and hands it back to the
    /// session. A newer upload or a removal in the meantime wins.
    pub fn spawn_preview(&self, id: Uuid, job: PreviewJob) {
        let store = self.clone();
        tokio::spawn(async move {
            let generation = job.generation;
            let rendered = match tokio::task::spawn_blocking(move || job.render()).await {
                Ok(rendered) => rendered,
                Err(e) => {
                    tracing::warn!(order = %id, error = %e, "preview task failed");
                    return;
                }
            };
            if let Err(e) = &rendered {
                tracing::debug!(order = %id, error = %e, "no preview produced");
            }
            match store.update(id, |w| w.complete_preview(generation, rendered)).await {
                Ok(true) => tracing::debug!(order = %id, generation, "preview ready"),
                Ok(false) => tracing::debug!(order = %id, generation, "stale preview discarded"),
                Err(_) => tracing::debug!(order = %id, "session gone before preview finished"),
            }
        });
    }

    pub fn spawn_pruner(&self, max_idle: Duration, every: StdDuration) -> tokio::task::JoinHandle<()> {
        let store = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                let dropped = store.prune_idle(max_idle).await;
                if dropped > 0 {
                    tracing::info!(dropped, "pruned idle order sessions");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::upload::FileHandle;

    async fn at_upload_step(store: &SessionStore) -> Uuid {
        let id = store.open().await;
        store
            .update(id, |w| {
                w.select_product("posters")?;
                w.advance()?;
                w.select_size("a4")?;
                w.select_material("standard")?;
                w.advance()
            })
            .await
            .unwrap()
            .unwrap();
        id
    }

    #[tokio::test]
    async fn test_open_update_close() {
        let store = SessionStore::new();
        let id = store.open().await;
        assert_eq!(store.len().await, 1);
        store.update(id, |w| w.select_product("flyers")).await.unwrap().unwrap();
        store.close(id).await.unwrap();
        assert!(store.is_empty().await);
        assert!(matches!(store.update(id, |w| w.step()).await, Err(PrintShopError::SessionNotFound)));
    }

    #[tokio::test]
    async fn test_prune_idle() {
        let store = SessionStore::new();
        store.open().await;
        assert_eq!(store.prune_idle(Duration::minutes(5)).await, 0);
        assert_eq!(store.prune_idle(Duration::minutes(-1)).await, 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_prune_idle_with_unrepresentable_cutoff() {
        let store = SessionStore::new();
        store.open().await;
        assert_eq!(store.prune_idle(Duration::days(100_000_000)).await, 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_preview_lands_eventually() {
        let store = SessionStore::new();
        let id = at_upload_step(&store).await;
        let handle = FileHandle::new("photo.jpg", 2 * 1024 * 1024, "image/jpeg").with_content(vec![7; 2 * 1024 * 1024]);
        let job = store.update(id, |w| w.attach_file(handle)).await.unwrap().unwrap().unwrap();
        store.spawn_preview(id, job);

        let mut preview = None;
        for _ in 0..200 {
            preview = store.update(id, |w| w.file().and_then(|f| f.preview.clone())).await.unwrap();
            if preview.is_some() { break; }
            tokio::time::sleep(StdDuration::from_millis(10)).await;
        }
        assert!(preview.unwrap().starts_with("data:image/jpeg;base64,"));
    }
}
