use chrono::{DateTime, Utc};
use serde::Serialize;

pub const SERVICE_NAME: &str = "Comics API";

/// Body of `GET /health`.
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Health {
    pub status: &'static str,
    pub timestamp: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    pub database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_comics: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Health {
    pub fn healthy(environment: &str, store: &'static str, total_comics: u64) -> Self {
        Self {
            status: "healthy",
            timestamp: Utc::now(),
            service: Some(SERVICE_NAME),
            version: Some(env!("CARGO_PKG_VERSION")),
            environment: Some(environment.to_string()),
            database: "connected",
            store: Some(store),
            total_comics: Some(total_comics),
            error: None,
        }
    }

    pub fn unhealthy(error: impl Into<String>) -> Self {
        Self {
            status: "unhealthy",
            timestamp: Utc::now(),
            service: Some(SERVICE_NAME),
            version: None,
            environment: None,
            database: "disconnected",
            store: None,
            total_comics: None,
            error: Some(error.into()),
        }
    }
}
