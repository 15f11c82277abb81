use chrono::{DateTime, Utc};
use models::comic as entity;
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// A stored comic as returned to callers.
///
/// `updated_at` stays `None` (and is omitted from JSON) until the first update.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Comic {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub year: i32,
    pub genre: String,
    pub description: String,
    pub price: f64,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<entity::Model> for Comic {
    fn from(m: entity::Model) -> Self {
        Self {
            id: m.id,
            title: m.title,
            author: m.author,
            publisher: m.publisher,
            year: m.year,
            genre: m.genre,
            description: m.description,
            price: m.price,
            in_stock: m.in_stock,
            created_at: m.created_at.with_timezone(&Utc),
            updated_at: m.updated_at.map(|t| t.with_timezone(&Utc)),
        }
    }
}

/// Create payload. Required fields are optional here so a missing field is
/// reported as a validation error rather than a deserialization failure.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct NewComic {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub in_stock: Option<bool>,
}

/// Fully resolved field values for a comic that has no id yet.
#[derive(Clone, Debug, PartialEq)]
pub struct ComicDraft {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub year: i32,
    pub genre: String,
    pub description: String,
    pub price: f64,
    pub in_stock: bool,
}

impl NewComic {
    /// Validate and apply defaults for absent optional fields.
    pub fn into_draft(self) -> Result<ComicDraft, ServiceError> {
        let title = self.title.unwrap_or_default();
        let author = self.author.unwrap_or_default();
        let publisher = self.publisher.unwrap_or_default();
        entity::validate_required(&title, &author, &publisher)?;
        if let Some(year) = self.year {
            entity::validate_year(year)?;
        }
        if let Some(price) = self.price {
            entity::validate_price(price)?;
        }
        Ok(ComicDraft {
            title,
            author,
            publisher,
            year: self.year.unwrap_or_else(entity::current_year),
            genre: self.genre.unwrap_or_else(|| entity::DEFAULT_GENRE.to_string()),
            description: self.description.unwrap_or_default(),
            price: self.price.unwrap_or(entity::MIN_PRICE),
            in_stock: self.in_stock.unwrap_or(true),
        })
    }
}

impl ComicDraft {
    pub fn into_comic(self, id: i64, created_at: DateTime<Utc>) -> Comic {
        Comic {
            id,
            title: self.title,
            author: self.author,
            publisher: self.publisher,
            year: self.year,
            genre: self.genre,
            description: self.description,
            price: self.price,
            in_stock: self.in_stock,
            created_at,
            updated_at: None,
        }
    }
}

/// Partial update: only present fields are validated and applied.
/// `id`, `createdAt` and `updatedAt` in a payload are ignored.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComicPatch {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub in_stock: Option<bool>,
}

impl ComicPatch {
    pub fn validate(&self) -> Result<(), ServiceError> {
        if let Some(year) = self.year {
            entity::validate_year(year)?;
        }
        if let Some(price) = self.price {
            entity::validate_price(price)?;
        }
        if let Some(title) = &self.title { entity::validate_non_empty("title", title)?; }
        if let Some(author) = &self.author { entity::validate_non_empty("author", author)?; }
        if let Some(publisher) = &self.publisher { entity::validate_non_empty("publisher", publisher)?; }
        Ok(())
    }

    /// Merge into an existing record and stamp `updated_at`.
    pub fn apply(&self, comic: &mut Comic, now: DateTime<Utc>) {
        if let Some(v) = &self.title { comic.title = v.clone(); }
        if let Some(v) = &self.author { comic.author = v.clone(); }
        if let Some(v) = &self.publisher { comic.publisher = v.clone(); }
        if let Some(v) = self.year { comic.year = v; }
        if let Some(v) = &self.genre { comic.genre = v.clone(); }
        if let Some(v) = &self.description { comic.description = v.clone(); }
        if let Some(v) = self.price { comic.price = v; }
        if let Some(v) = self.in_stock { comic.in_stock = v; }
        comic.updated_at = Some(now);
    }
}

/// List filter. Blank strings impose no constraint.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ComicFilter {
    pub genre: Option<String>,
    pub publisher: Option<String>,
    pub in_stock: Option<bool>,
}

impl ComicFilter {
    pub fn new(genre: Option<String>, publisher: Option<String>, in_stock: Option<bool>) -> Self {
        let non_blank = |s: Option<String>| s.filter(|v| !v.is_empty());
        Self { genre: non_blank(genre), publisher: non_blank(publisher), in_stock }
    }

    pub fn matches(&self, comic: &Comic) -> bool {
        contains_ignore_case(&comic.genre, self.genre.as_deref())
            && contains_ignore_case(&comic.publisher, self.publisher.as_deref())
            && self.in_stock.map_or(true, |s| comic.in_stock == s)
    }
}

fn contains_ignore_case(haystack: &str, needle: Option<&str>) -> bool {
    match needle {
        Some(n) => haystack.to_lowercase().contains(&n.to_lowercase()),
        None => true,
    }
}

/// Result of a list call: `count` matched the filter, `total` is unfiltered.
#[derive(Clone, Debug, PartialEq)]
pub struct ComicPage {
    pub items: Vec<Comic>,
    pub count: u64,
    pub total: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal() -> NewComic {
        NewComic {
            title: Some("T".into()),
            author: Some("A".into()),
            publisher: Some("P".into()),
            ..NewComic::default()
        }
    }

    #[test]
    fn minimal_create_applies_defaults() {
        let draft = minimal().into_draft().unwrap();
        assert_eq!(draft.genre, "Unknown");
        assert_eq!(draft.description, "");
        assert_eq!(draft.price, 0.0);
        assert!(draft.in_stock);
        assert_eq!(draft.year, entity::current_year());
    }

    #[test]
    fn missing_required_field_is_validation_error() {
        let input = NewComic { title: Some("Incomplete".into()), ..NewComic::default() };
        let err = input.into_draft().unwrap_err();
        assert!(matches!(err, ServiceError::Validation(ref m) if m.contains("required")));
    }

    #[test]
    fn create_checks_year_and_price() {
        let err = NewComic { year: Some(1800), ..minimal() }.into_draft().unwrap_err();
        assert!(err.to_string().contains("Year must be between"));
        let err = NewComic { price: Some(-10.0), ..minimal() }.into_draft().unwrap_err();
        assert!(err.to_string().contains("Price must be between"));
        assert!(NewComic { year: Some(1900), price: Some(1000.0), ..minimal() }.into_draft().is_ok());
    }

    #[test]
    fn patch_only_checks_present_fields() {
        assert!(ComicPatch::default().validate().is_ok());
        assert!(ComicPatch { year: Some(1800), ..ComicPatch::default() }.validate().is_err());
        assert!(ComicPatch { price: Some(1000.01), ..ComicPatch::default() }.validate().is_err());
        assert!(ComicPatch { title: Some("".into()), ..ComicPatch::default() }.validate().is_err());
        assert!(ComicPatch { genre: Some("".into()), ..ComicPatch::default() }.validate().is_ok());
    }

    #[test]
    fn patch_apply_leaves_absent_fields() {
        let now = Utc::now();
        let mut comic = minimal().into_draft().unwrap().into_comic(7, now);
        let patch = ComicPatch { title: Some("New".into()), price: Some(25.99), ..ComicPatch::default() };
        patch.apply(&mut comic, now);
        assert_eq!(comic.id, 7);
        assert_eq!(comic.title, "New");
        assert_eq!(comic.author, "A");
        assert_eq!(comic.price, 25.99);
        assert_eq!(comic.created_at, now);
        assert_eq!(comic.updated_at, Some(now));
    }

    #[test]
    fn filter_is_case_insensitive_substring() {
        let now = Utc::now();
        let mut comic = minimal().into_draft().unwrap().into_comic(1, now);
        comic.genre = "Superhero".into();
        comic.publisher = "Marvel Comics".into();
        assert!(ComicFilter::new(Some("super".into()), None, None).matches(&comic));
        assert!(ComicFilter::new(None, Some("MARVEL".into()), Some(true)).matches(&comic));
        assert!(!ComicFilter::new(Some("horror".into()), None, None).matches(&comic));
        assert!(!ComicFilter::new(None, None, Some(false)).matches(&comic));
        assert_eq!(ComicFilter::new(Some(String::new()), None, None), ComicFilter::default());
    }

    #[test]
    fn serialized_comic_uses_camel_case_and_hides_updated_at() {
        let comic = minimal().into_draft().unwrap().into_comic(1, Utc::now());
        let json = serde_json::to_value(&comic).unwrap();
        assert_eq!(json["inStock"], true);
        assert!(json.get("createdAt").is_some());
        assert!(json.get("updatedAt").is_none());
    }
}
