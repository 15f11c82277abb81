use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub service: String,
    pub version: String,
    pub environment: String,
    pub database: String,
    pub store: String,
    pub total_comics: u64,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComicDoc {
    pub id: i64,
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub year: i32,
    pub genre: String,
    pub description: String,
    pub price: f64,
    pub in_stock: bool,
    pub created_at: String,
    pub updated_at: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewComicDoc {
    pub title: String,
    pub author: String,
    pub publisher: String,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub in_stock: Option<bool>,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ComicPatchDoc {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub year: Option<i32>,
    pub genre: Option<String>,
    pub description: Option<String>,
    pub price: Option<f64>,
    pub in_stock: Option<bool>,
}

#[derive(Serialize, ToSchema)]
pub struct ComicEnvelopeDoc {
    pub success: bool,
    pub data: Option<ComicDoc>,
    pub error: Option<String>,
    pub message: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct ComicListDoc {
    pub success: bool,
    pub data: Vec<ComicDoc>,
    pub count: u64,
    pub total: u64,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::system::health,
        crate::routes::comics::list,
        crate::routes::comics::create,
        crate::routes::comics::get,
        crate::routes::comics::update,
        crate::routes::comics::delete,
    ),
    components(
        schemas(
            HealthResponse,
            ComicDoc,
            NewComicDoc,
            ComicPatchDoc,
            ComicEnvelopeDoc,
            ComicListDoc,
        )
    ),
    tags(
        (name = "health"),
        (name = "comics", description = "Comic catalogue CRUD")
    )
)]
pub struct ApiDoc;
