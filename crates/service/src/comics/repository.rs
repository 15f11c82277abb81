use async_trait::async_trait;

use super::domain::{Comic, ComicDraft, ComicFilter, ComicPage, ComicPatch};
use crate::errors::ServiceError;

/// Storage adapter behind `ComicService`.
///
/// Implementations do not validate; they receive already-checked drafts and
/// patches. Missing records are reported as `Ok(None)`.
#[async_trait]
pub trait ComicRepository: Send + Sync {
    /// Short backend name for logs and the health report.
    fn backend(&self) -> &'static str;
    /// Matching comics newest first, with matched and unfiltered counts.
    async fn list(&self, filter: &ComicFilter) -> Result<ComicPage, ServiceError>;
    async fn insert(&self, draft: ComicDraft) -> Result<Comic, ServiceError>;
    async fn get(&self, id: i64) -> Result<Option<Comic>, ServiceError>;
    async fn update(&self, id: i64, patch: &ComicPatch) -> Result<Option<Comic>, ServiceError>;
    async fn delete(&self, id: i64) -> Result<Option<Comic>, ServiceError>;
    async fn count(&self) -> Result<u64, ServiceError>;
    async fn ping(&self) -> Result<(), ServiceError>;
    async fn close(&self) -> Result<(), ServiceError>;
}
