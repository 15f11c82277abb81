use std::sync::Arc;

use service::ComicService;

/// Shared handler state: the comic service plus the deployment environment name.
#[derive(Clone)]
pub struct AppState {
    pub comics: ComicService,
    pub environment: Arc<str>,
}

impl AppState {
    pub fn new(comics: ComicService, environment: &str) -> Self {
        Self { comics, environment: Arc::from(environment) }
    }
}
