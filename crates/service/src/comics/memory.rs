use std::{cmp::Reverse, collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use super::{
    domain::{Comic, ComicDraft, ComicFilter, ComicPage, ComicPatch},
    repository::ComicRepository,
};
use crate::errors::ServiceError;

#[derive(Default)]
struct State {
    last_id: i64,
    rows: BTreeMap<i64, Comic>,
}

/// Process-local comic collection.
///
/// Ids come from a counter that is never rewound, so deleted ids are not reused.
#[derive(Clone, Default)]
pub struct MemoryComicRepository {
    inner: Arc<RwLock<State>>,
}

impl MemoryComicRepository {
    pub fn new() -> Self { Self::default() }
}

#[async_trait]
impl ComicRepository for MemoryComicRepository {
    fn backend(&self) -> &'static str { "memory" }

    async fn list(&self, filter: &ComicFilter) -> Result<ComicPage, ServiceError> {
        let state = self.inner.read().await;
        let mut items: Vec<Comic> = state.rows.values().filter(|c| filter.matches(c)).cloned().collect();
        items.sort_by_key(|c| Reverse((c.created_at, c.id)));
        Ok(ComicPage { count: items.len() as u64, total: state.rows.len() as u64, items })
    }

    async fn insert(&self, draft: ComicDraft) -> Result<Comic, ServiceError> {
        let mut state = self.inner.write().await;
        state.last_id += 1;
        let comic = draft.into_comic(state.last_id, Utc::now());
        state.rows.insert(comic.id, comic.clone());
        Ok(comic)
    }

    async fn get(&self, id: i64) -> Result<Option<Comic>, ServiceError> {
        let state = self.inner.read().await;
        Ok(state.rows.get(&id).cloned())
    }

    async fn update(&self, id: i64, patch: &ComicPatch) -> Result<Option<Comic>, ServiceError> {
        let mut state = self.inner.write().await;
        let Some(existing) = state.rows.get_mut(&id) else { return Ok(None) };
        patch.apply(existing, Utc::now());
        Ok(Some(existing.clone()))
    }

    async fn delete(&self, id: i64) -> Result<Option<Comic>, ServiceError> {
        let mut state = self.inner.write().await;
        Ok(state.rows.remove(&id))
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        Ok(self.inner.read().await.rows.len() as u64)
    }

    async fn ping(&self) -> Result<(), ServiceError> { Ok(()) }

    async fn close(&self) -> Result<(), ServiceError> { Ok(()) }
}
