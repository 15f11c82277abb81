use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use service::{Comic, ComicFilter, ComicPatch, NewComic};
use tracing::info;

use crate::{
    envelope::{Envelope, ListFilters},
    errors::{parse_comic_id, ApiError},
    metrics,
    state::AppState,
};

type ApiResult<T> = Result<(StatusCode, Json<Envelope<T>>), ApiError>;

#[derive(Debug, Default, PartialEq, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Case-insensitive substring of the genre
    pub genre: Option<String>,
    /// Case-insensitive substring of the publisher
    pub publisher: Option<String>,
    /// `true` for in-stock comics; any other value selects out-of-stock
    #[serde(rename = "inStock")]
    pub in_stock: Option<String>,
}

impl ListQuery {
    /// First value wins for repeated keys; unknown keys are ignored.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut q = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "genre" => &mut q.genre,
                "publisher" => &mut q.publisher,
                "inStock" => &mut q.in_stock,
                _ => continue,
            };
            if slot.is_none() {
                *slot = Some(value);
            }
        }
        q
    }

    fn filter(&self) -> ComicFilter {
        ComicFilter::new(
            self.genre.clone(),
            self.publisher.clone(),
            self.in_stock.as_deref().map(|v| v == "true"),
        )
    }

    fn echo(self) -> ListFilters {
        ListFilters { genre: self.genre, publisher: self.publisher, in_stock: self.in_stock }
    }
}

fn record<T: Serialize>(operation: &str, res: ApiResult<T>) -> ApiResult<T> {
    let outcome = match &res {
        Ok(_) => "ok",
        Err(e) => e.kind(),
    };
    metrics::observe(operation, outcome);
    res
}

#[utoipa::path(
    get, path = "/comics", tag = "comics",
    params(ListQuery),
    responses(
        (status = 200, description = "Matching comics, newest first", body = crate::openapi::ComicListDoc),
        (status = 500, description = "Store error")
    )
)]
pub async fn list(
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> ApiResult<Vec<Comic>> {
    record("list", list_comics(&state, ListQuery::from_pairs(pairs)).await)
}

async fn list_comics(state: &AppState, q: ListQuery) -> ApiResult<Vec<Comic>> {
    let page = state.comics.list(&q.filter()).await.map_err(ApiError::read)?;
    info!(count = page.count, total = page.total, "list comics");
    Ok((
        StatusCode::OK,
        Json(Envelope::ok(page.items).with_counts(page.count, page.total, q.echo())),
    ))
}

#[utoipa::path(
    post, path = "/comics", tag = "comics",
    request_body = crate::openapi::NewComicDoc,
    responses(
        (status = 201, description = "Created", body = crate::openapi::ComicEnvelopeDoc),
        (status = 400, description = "Validation Error")
    )
)]
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewComic>, JsonRejection>,
) -> ApiResult<Comic> {
    record("create", create_comic(&state, body).await)
}

async fn create_comic(state: &AppState, body: Result<Json<NewComic>, JsonRejection>) -> ApiResult<Comic> {
    let Json(input) = body?;
    let created = state.comics.create(input).await.map_err(ApiError::write)?;
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(created).with_message("Comic created successfully")),
    ))
}

#[utoipa::path(
    get, path = "/comics/{id}", tag = "comics",
    params(("id" = i64, Path, description = "Comic ID")),
    responses(
        (status = 200, description = "OK", body = crate::openapi::ComicEnvelopeDoc),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn get(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Comic> {
    record("get", get_comic(&state, &id).await)
}

async fn get_comic(state: &AppState, raw_id: &str) -> ApiResult<Comic> {
    let id = parse_comic_id(raw_id)?;
    let comic = state.comics.get(id).await.map_err(ApiError::read)?;
    Ok((StatusCode::OK, Json(Envelope::ok(comic))))
}

#[utoipa::path(
    put, path = "/comics/{id}", tag = "comics",
    params(("id" = i64, Path, description = "Comic ID")),
    request_body = crate::openapi::ComicPatchDoc,
    responses(
        (status = 200, description = "Updated", body = crate::openapi::ComicEnvelopeDoc),
        (status = 400, description = "Invalid ID or Validation Error"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ComicPatch>, JsonRejection>,
) -> ApiResult<Comic> {
    record("update", update_comic(&state, &id, body).await)
}

async fn update_comic(
    state: &AppState,
    raw_id: &str,
    body: Result<Json<ComicPatch>, JsonRejection>,
) -> ApiResult<Comic> {
    let id = parse_comic_id(raw_id)?;
    let Json(patch) = body?;
    let updated = state.comics.update(id, patch).await.map_err(ApiError::write)?;
    Ok((
        StatusCode::OK,
        Json(Envelope::ok(updated).with_message("Comic updated successfully")),
    ))
}

#[utoipa::path(
    delete, path = "/comics/{id}", tag = "comics",
    params(("id" = i64, Path, description = "Comic ID")),
    responses(
        (status = 200, description = "Deleted; body carries the removed comic", body = crate::openapi::ComicEnvelopeDoc),
        (status = 400, description = "Invalid ID"),
        (status = 404, description = "Not Found")
    )
)]
pub async fn delete(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<Comic> {
    record("delete", delete_comic(&state, &id).await)
}

async fn delete_comic(state: &AppState, raw_id: &str) -> ApiResult<Comic> {
    let id = parse_comic_id(raw_id)?;
    let deleted = state.comics.delete(id).await.map_err(ApiError::read)?;
    Ok((
        StatusCode::OK,
        Json(Envelope::ok(deleted).with_message("Comic deleted successfully")),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(raw: &[(&str, &str)]) -> Vec<(String, String)> {
        raw.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn repeated_keys_keep_first_value() {
        let q = ListQuery::from_pairs(pairs(&[("genre", "super"), ("genre", "hero"), ("inStock", "true")]));
        assert_eq!(q.genre.as_deref(), Some("super"));
        assert_eq!(q.in_stock.as_deref(), Some("true"));
        assert_eq!(q.publisher, None);
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let q = ListQuery::from_pairs(pairs(&[("page", "2"), ("publisher", "DC")]));
        assert_eq!(q, ListQuery { publisher: Some("DC".into()), ..ListQuery::default() });
    }

    #[test]
    fn in_stock_other_than_true_selects_out_of_stock() {
        let q = ListQuery::from_pairs(pairs(&[("inStock", "yes")]));
        assert_eq!(q.filter().in_stock, Some(false));
    }
}
