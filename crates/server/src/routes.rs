use axum::{routing::get, Router};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{openapi::ApiDoc, state::AppState};

pub mod comics;
pub mod system;

/// Build the full application router.
pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    // service info, health and metrics
    let public = Router::new()
        .route("/", get(system::root))
        .route("/health", get(system::health))
        .route("/metrics", get(system::metrics));

    // catalogue CRUD
    let comic_routes = Router::new()
        .route("/comics", get(comics::list).post(comics::create))
        .route(
            "/comics/:id",
            get(comics::get).put(comics::update).delete(comics::delete),
        );

    public
        .merge(comic_routes)
        // OpenAPI document and UI
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
        // permissive CORS, then a span per request
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    DefaultOnResponse::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                // 5xx
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
