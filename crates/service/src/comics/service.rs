use std::sync::Arc;

use tracing::{info, instrument};

use super::{
    domain::{Comic, ComicFilter, ComicPage, ComicPatch, NewComic},
    repository::ComicRepository,
    seed,
};
use crate::errors::ServiceError;

/// Application service for the comic catalogue.
/// Validates input and reports missing records; storage is delegated to the repository.
#[derive(Clone)]
pub struct ComicService {
    repo: Arc<dyn ComicRepository>,
}

impl ComicService {
    pub fn new(repo: Arc<dyn ComicRepository>) -> Self { Self { repo } }

    pub fn backend(&self) -> &'static str { self.repo.backend() }

    pub async fn list(&self, filter: &ComicFilter) -> Result<ComicPage, ServiceError> {
        self.repo.list(filter).await
    }

    #[instrument(skip_all, fields(backend = self.repo.backend()))]
    pub async fn create(&self, input: NewComic) -> Result<Comic, ServiceError> {
        let draft = input.into_draft()?;
        let created = self.repo.insert(draft).await?;
        info!(event = "comic_created", id = created.id, title = %created.title, "created comic");
        Ok(created)
    }

    pub async fn get(&self, id: i64) -> Result<Comic, ServiceError> {
        self.repo.get(id).await?.ok_or_else(|| ServiceError::not_found("Comic"))
    }

    #[instrument(skip(self, patch), fields(backend = self.repo.backend()))]
    pub async fn update(&self, id: i64, patch: ComicPatch) -> Result<Comic, ServiceError> {
        patch.validate()?;
        let updated = self
            .repo
            .update(id, &patch)
            .await?
            .ok_or_else(|| ServiceError::not_found("Comic"))?;
        info!(event = "comic_updated", id, "updated comic");
        Ok(updated)
    }

    #[instrument(skip(self), fields(backend = self.repo.backend()))]
    pub async fn delete(&self, id: i64) -> Result<Comic, ServiceError> {
        let deleted = self.repo.delete(id).await?.ok_or_else(|| ServiceError::not_found("Comic"))?;
        info!(event = "comic_deleted", id, "deleted comic");
        Ok(deleted)
    }

    pub async fn count(&self) -> Result<u64, ServiceError> { self.repo.count().await }

    /// Connectivity check followed by a record count, for the health endpoint.
    pub async fn health(&self) -> Result<u64, ServiceError> {
        self.repo.ping().await?;
        self.repo.count().await
    }

    pub async fn close(&self) -> Result<(), ServiceError> { self.repo.close().await }

    /// Insert the sample catalogue when the store is empty; returns how many were inserted.
    pub async fn seed_if_empty(&self) -> Result<usize, ServiceError> {
        if self.repo.count().await? > 0 {
            return Ok(0);
        }
        let samples = seed::sample_comics();
        let n = samples.len();
        for input in samples {
            self.create(input).await?;
        }
        info!(event = "seeded", count = n, backend = self.repo.backend(), "seeded sample comics");
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{comics::memory::MemoryComicRepository, test_support::get_db, PgComicRepository};

    fn memory_service() -> ComicService {
        ComicService::new(Arc::new(MemoryComicRepository::new()))
    }

    fn input(title: &str) -> NewComic {
        NewComic {
            title: Some(title.into()),
            author: Some("A".into()),
            publisher: Some("P".into()),
            ..NewComic::default()
        }
    }

    /// Behaviour every backend must share.
    async fn exercise_contract(svc: &ComicService) -> Result<(), anyhow::Error> {
        let a = svc.create(input("Contract A")).await?;
        let b = svc.create(input("Contract B")).await?;
        assert_ne!(a.id, b.id);

        // round trip
        let found = svc.get(a.id).await?;
        assert_eq!(found.title, a.title);
        assert_eq!(found.genre, "Unknown");
        assert_eq!(found.price, 0.0);
        assert!(found.in_stock);
        assert!(found.updated_at.is_none());

        // validation happens before persisting
        let before = svc.count().await?;
        assert!(matches!(svc.create(NewComic::default()).await, Err(ServiceError::Validation(_))));
        assert_eq!(svc.count().await?, before);

        // partial update
        let patch = ComicPatch { price: Some(1000.0), ..ComicPatch::default() };
        let updated = svc.update(a.id, patch).await?;
        assert_eq!(updated.price, 1000.0);
        assert_eq!(updated.title, "Contract A");
        assert_eq!(updated.id, a.id);
        assert!(updated.updated_at.is_some());
        assert!(matches!(
            svc.update(a.id, ComicPatch { year: Some(1899), ..ComicPatch::default() }).await,
            Err(ServiceError::Validation(_))
        ));
        assert_eq!(svc.get(a.id).await?.created_at.timestamp(), a.created_at.timestamp());

        // delete twice
        let deleted = svc.delete(b.id).await?;
        assert_eq!(deleted.id, b.id);
        assert!(matches!(svc.get(b.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.delete(b.id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.update(b.id, ComicPatch::default()).await, Err(ServiceError::NotFound(_))));

        svc.delete(a.id).await?;
        Ok(())
    }

    #[tokio::test]
    async fn memory_backend_contract() -> Result<(), anyhow::Error> {
        exercise_contract(&memory_service()).await
    }

    #[tokio::test]
    async fn postgres_backend_contract() -> Result<(), anyhow::Error> {
        let Some(db) = get_db().await? else { return Ok(()) };
        exercise_contract(&ComicService::new(Arc::new(PgComicRepository::new(db)))).await
    }

    #[tokio::test]
    async fn seeding_is_idempotent() -> Result<(), anyhow::Error> {
        let svc = memory_service();
        assert_eq!(svc.seed_if_empty().await?, 3);
        assert_eq!(svc.seed_if_empty().await?, 0);
        assert_eq!(svc.count().await?, 3);

        let dc = svc.list(&ComicFilter::new(None, Some("dc".into()), None)).await?;
        assert_eq!(dc.count, 2);
        let out = svc.list(&ComicFilter::new(None, None, Some(false))).await?;
        assert_eq!(out.items.len(), 1);
        assert_eq!(out.items[0].title, "Watchmen");
        Ok(())
    }

    #[tokio::test]
    async fn seeding_skips_non_empty_store() -> Result<(), anyhow::Error> {
        let svc = memory_service();
        svc.create(input("Mine")).await?;
        assert_eq!(svc.seed_if_empty().await?, 0);
        assert_eq!(svc.count().await?, 1);
        Ok(())
    }

    #[tokio::test]
    async fn health_reports_count() -> Result<(), anyhow::Error> {
        let svc = memory_service();
        svc.create(input("One")).await?;
        assert_eq!(svc.health().await?, 1);
        assert_eq!(svc.backend(), "memory");
        Ok(())
    }
}
