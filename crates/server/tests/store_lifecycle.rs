use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use server::{routes, state::AppState};
use service::{
    comics::domain::ComicDraft, errors::ServiceError, Comic, ComicFilter, ComicPage, ComicPatch, ComicRepository,
    ComicService,
};
use tokio::{net::TcpListener, sync::oneshot};
use tower_http::cors::CorsLayer;

/// Store whose connection is gone: every call fails, `close` is recorded.
#[derive(Default)]
struct UnreachableStore {
    closed: Arc<AtomicBool>,
}

fn unreachable() -> ServiceError {
    ServiceError::Db("connection refused".into())
}

#[async_trait]
impl ComicRepository for UnreachableStore {
    fn backend(&self) -> &'static str { "postgres" }

    async fn list(&self, _filter: &ComicFilter) -> Result<ComicPage, ServiceError> { Err(unreachable()) }

    async fn insert(&self, _draft: ComicDraft) -> Result<Comic, ServiceError> { Err(unreachable()) }

    async fn get(&self, _id: i64) -> Result<Option<Comic>, ServiceError> { Err(unreachable()) }

    async fn update(&self, _id: i64, _patch: &ComicPatch) -> Result<Option<Comic>, ServiceError> {
        Err(unreachable())
    }

    async fn delete(&self, _id: i64) -> Result<Option<Comic>, ServiceError> { Err(unreachable()) }

    async fn count(&self) -> Result<u64, ServiceError> { Err(unreachable()) }

    async fn ping(&self) -> Result<(), ServiceError> { Err(unreachable()) }

    async fn close(&self) -> Result<(), ServiceError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}

struct Running {
    base_url: String,
    closed: Arc<AtomicBool>,
    stop: oneshot::Sender<()>,
    handle: tokio::task::JoinHandle<Result<(), server::errors::StartupError>>,
}

async fn start_unreachable() -> anyhow::Result<Running> {
    let store = UnreachableStore::default();
    let closed = store.closed.clone();
    let comics = ComicService::new(Arc::new(store));
    let app = routes::build_router(AppState::new(comics.clone(), "test"), CorsLayer::very_permissive());

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr = listener.local_addr()?;
    let (stop, stopped) = oneshot::channel::<()>();
    let handle = tokio::spawn(server::serve(listener, app, comics, async {
        stopped.await.ok();
    }));

    Ok(Running { base_url: format!("http://{}", addr), closed, stop, handle })
}

#[tokio::test]
async fn health_reports_unreachable_store() -> anyhow::Result<()> {
    let app = start_unreachable().await?;
    let res = reqwest::get(format!("{}/health", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "unhealthy");
    assert_eq!(body["database"], "disconnected");
    assert!(body["error"].as_str().unwrap_or("").contains("connection refused"));
    assert!(body.get("totalComics").is_none());
    Ok(())
}

#[tokio::test]
async fn store_errors_map_by_path() -> anyhow::Result<()> {
    let app = start_unreachable().await?;
    let c = reqwest::Client::new();

    // reads fail as server errors
    let res = c.get(format!("{}/comics", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let body = res.json::<Value>().await?;
    assert_eq!(body["success"], false);
    assert!(body["error"].is_string());

    let res = c.get(format!("{}/comics/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);
    let res = c.delete(format!("{}/comics/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::INTERNAL_SERVER_ERROR);

    // writes fail as client errors
    let res = c
        .post(format!("{}/comics", app.base_url))
        .json(&json!({"title": "T", "author": "A", "publisher": "P"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let res = c.put(format!("{}/comics/1", app.base_url)).json(&json!({"price": 5})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);

    // validation still runs before the store is touched
    let res = c.post(format!("{}/comics", app.base_url)).json(&json!({"title": "T"})).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert!(body["error"].as_str().unwrap_or("").contains("required"));
    Ok(())
}

#[tokio::test]
async fn shutdown_closes_store() -> anyhow::Result<()> {
    let app = start_unreachable().await?;
    let res = reqwest::get(format!("{}/", app.base_url)).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert!(!app.closed.load(Ordering::SeqCst));

    app.stop.send(()).map_err(|_| anyhow::anyhow!("server already stopped"))?;
    app.handle.await??;
    assert!(app.closed.load(Ordering::SeqCst));
    Ok(())
}
