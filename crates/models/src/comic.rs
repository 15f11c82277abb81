use chrono::{Datelike, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

pub const MIN_YEAR: i32 = 1900;
pub const MIN_PRICE: f64 = 0.0;
pub const MAX_PRICE: f64 = 1000.0;

pub const DEFAULT_GENRE: &str = "Unknown";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "comic")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    #[sea_orm(column_type = "Text")]
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub author: String,
    #[sea_orm(column_type = "Text")]
    pub publisher: String,
    pub year: i32,
    #[sea_orm(column_type = "Text")]
    pub genre: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Double")]
    pub price: f64,
    pub in_stock: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Calendar year in UTC; also the default `year` for new comics.
pub fn current_year() -> i32 {
    Utc::now().year()
}

/// Latest accepted publication year (announced issues may be dated next year).
pub fn max_year() -> i32 {
    current_year() + 1
}

pub fn validate_required(title: &str, author: &str, publisher: &str) -> Result<(), ModelError> {
    if [title, author, publisher].iter().any(|v| v.trim().is_empty()) {
        return Err(ModelError::Validation(
            "Title, author, and publisher are required fields".into(),
        ));
    }
    Ok(())
}

/// Used for partial updates, where each required field is checked on its own.
pub fn validate_non_empty(field: &str, value: &str) -> Result<(), ModelError> {
    if value.trim().is_empty() {
        return Err(ModelError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

pub fn validate_year(year: i32) -> Result<(), ModelError> {
    let max = max_year();
    if !(MIN_YEAR..=max).contains(&year) {
        return Err(ModelError::Validation(format!(
            "Year must be between {MIN_YEAR} and {max}"
        )));
    }
    Ok(())
}

pub fn validate_price(price: f64) -> Result<(), ModelError> {
    if !price.is_finite() || !(MIN_PRICE..=MAX_PRICE).contains(&price) {
        return Err(ModelError::Validation("Price must be between 0 and 1000".into()));
    }
    Ok(())
}
