use async_trait::async_trait;
use chrono::Utc;
use models::comic::{self, Entity as ComicEntity};
use sea_orm::{
    sea_query::{Expr, Func, LikeExpr},
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, NotSet, PaginatorTrait, QueryFilter,
    QueryOrder, Select, Set,
};

use super::{
    domain::{Comic, ComicDraft, ComicFilter, ComicPage, ComicPatch},
    repository::ComicRepository,
};
use crate::errors::ServiceError;

/// SeaORM-backed repository over the `comic` table.
#[derive(Clone)]
pub struct PgComicRepository {
    pub db: DatabaseConnection,
}

impl PgComicRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

/// `%needle%` for a case-insensitive LIKE; wildcards in the needle match literally.
fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.to_lowercase().chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn ilike(finder: Select<ComicEntity>, column: comic::Column, needle: &str) -> Select<ComicEntity> {
    finder.filter(
        Expr::expr(Func::lower(Expr::col(column)))
            .like(LikeExpr::new(like_pattern(needle)).escape('\\')),
    )
}

#[async_trait]
impl ComicRepository for PgComicRepository {
    fn backend(&self) -> &'static str { "postgres" }

    async fn list(&self, filter: &ComicFilter) -> Result<ComicPage, ServiceError> {
        let mut finder = ComicEntity::find();
        if let Some(genre) = &filter.genre { finder = ilike(finder, comic::Column::Genre, genre); }
        if let Some(publisher) = &filter.publisher { finder = ilike(finder, comic::Column::Publisher, publisher); }
        if let Some(in_stock) = filter.in_stock {
            finder = finder.filter(comic::Column::InStock.eq(in_stock));
        }
        let rows = finder
            .order_by_desc(comic::Column::CreatedAt)
            .order_by_desc(comic::Column::Id)
            .all(&self.db)
            .await?;
        let total = ComicEntity::find().count(&self.db).await?;
        let items: Vec<Comic> = rows.into_iter().map(Comic::from).collect();
        Ok(ComicPage { count: items.len() as u64, total, items })
    }

    async fn insert(&self, draft: ComicDraft) -> Result<Comic, ServiceError> {
        let am = comic::ActiveModel {
            id: NotSet,
            title: Set(draft.title),
            author: Set(draft.author),
            publisher: Set(draft.publisher),
            year: Set(draft.year),
            genre: Set(draft.genre),
            description: Set(draft.description),
            price: Set(draft.price),
            in_stock: Set(draft.in_stock),
            created_at: Set(Utc::now().into()),
            updated_at: Set(None),
        };
        let created = am.insert(&self.db).await?;
        Ok(created.into())
    }

    async fn get(&self, id: i64) -> Result<Option<Comic>, ServiceError> {
        let found = ComicEntity::find_by_id(id).one(&self.db).await?;
        Ok(found.map(Comic::from))
    }

    async fn update(&self, id: i64, patch: &ComicPatch) -> Result<Option<Comic>, ServiceError> {
        let Some(existing) = ComicEntity::find_by_id(id).one(&self.db).await? else { return Ok(None) };
        let mut am: comic::ActiveModel = existing.into();
        if let Some(v) = &patch.title { am.title = Set(v.clone()); }
        if let Some(v) = &patch.author { am.author = Set(v.clone()); }
        if let Some(v) = &patch.publisher { am.publisher = Set(v.clone()); }
        if let Some(v) = patch.year { am.year = Set(v); }
        if let Some(v) = &patch.genre { am.genre = Set(v.clone()); }
        if let Some(v) = &patch.description { am.description = Set(v.clone()); }
        if let Some(v) = patch.price { am.price = Set(v); }
        if let Some(v) = patch.in_stock { am.in_stock = Set(v); }
        am.updated_at = Set(Some(Utc::now().into()));
        match am.update(&self.db).await {
            Ok(updated) => Ok(Some(updated.into())),
            // deleted between the read and the write
            Err(DbErr::RecordNotUpdated) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, id: i64) -> Result<Option<Comic>, ServiceError> {
        let Some(existing) = ComicEntity::find_by_id(id).one(&self.db).await? else { return Ok(None) };
        let res = ComicEntity::delete_by_id(id).exec(&self.db).await?;
        Ok((res.rows_affected > 0).then(|| existing.into()))
    }

    async fn count(&self) -> Result<u64, ServiceError> {
        Ok(ComicEntity::find().count(&self.db).await?)
    }

    async fn ping(&self) -> Result<(), ServiceError> {
        Ok(self.db.ping().await?)
    }

    async fn close(&self) -> Result<(), ServiceError> {
        Ok(self.db.clone().close().await?)
    }
}
