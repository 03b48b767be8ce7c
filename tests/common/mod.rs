#![allow(dead_code)]

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Json, Router,
    extract::Query,
    http::{HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
};
use inventory_client::{
    client::AppStore,
    config::{AppConfig, ClientConfig},
    db::{Db, create_db, seed_admin, seed_catalog},
    dto::auth::ErrorDetail,
    models::Category,
    response::TOTAL_COUNT_HEADER,
    routes::{create_app, serve},
    state::AppState,
};

pub const INVITE_CODE: &str = "let-me-in";
pub const ADMIN_PASSWORD: &str = "1234";

pub struct TestServer {
    pub base_url: String,
    pub db: Db,
}

async fn bind(app: Router) -> anyhow::Result<String> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = serve(listener, app).await;
    });
    Ok(format!("http://{addr}"))
}

/// Runs the reference backend with only the admin account.
pub async fn spawn_backend() -> anyhow::Result<TestServer> {
    spawn_with(AppConfig::local("test-secret", INVITE_CODE), false).await
}

/// Runs the reference backend with the starter catalog loaded.
pub async fn spawn_seeded_backend() -> anyhow::Result<TestServer> {
    spawn_with(AppConfig::local("test-secret", INVITE_CODE), true).await
}

pub async fn spawn_with(config: AppConfig, with_catalog: bool) -> anyhow::Result<TestServer> {
    let db = create_db();
    seed_admin(&db, &config.admin_password).await?;
    if with_catalog {
        seed_catalog(&db).await;
    }
    let base_url = bind(create_app(AppState::new(db.clone(), config))).await?;
    Ok(TestServer { base_url, db })
}

/// Short timings so debounce and flash behaviour can be observed quickly.
pub fn client_config(base_url: &str) -> ClientConfig {
    ClientConfig {
        debounce: Duration::from_millis(60),
        flash_ttl: Duration::from_millis(150),
        ..ClientConfig::new(base_url)
    }
}

pub fn store(server: &TestServer) -> anyhow::Result<AppStore> {
    Ok(AppStore::new(&client_config(&server.base_url))?)
}

pub async fn signed_in_store(server: &TestServer) -> anyhow::Result<AppStore> {
    let store = store(server)?;
    store.session().login("admin", ADMIN_PASSWORD).await?;
    Ok(store)
}

/// Every query string a [`RecordingStub`] received, in arrival order.
pub type Recorded = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// A `/categories` listing that records each request and answers with a fixed
/// page and total.
pub struct RecordingStub {
    pub base_url: String,
    pub requests: Recorded,
}

impl RecordingStub {
    pub fn requests(&self) -> Vec<HashMap<String, String>> {
        self.requests.lock().unwrap().clone()
    }
}

pub async fn spawn_recording_stub(total: u64) -> anyhow::Result<RecordingStub> {
    let requests: Recorded = Arc::default();
    let seen = Arc::clone(&requests);
    let app = Router::new().route(
        "/categories",
        get(move |Query(params): Query<HashMap<String, String>>| {
            let seen = Arc::clone(&seen);
            async move {
                let name = params.get("q").cloned().unwrap_or_default();
                seen.lock().unwrap().push(params);
                let mut headers = HeaderMap::new();
                headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(total));
                let body = vec![Category { id: 1, name }];
                (headers, Json(body))
            }
        }),
    );
    let base_url = bind(app).await?;
    Ok(RecordingStub { base_url, requests })
}

/// A `/categories` listing that answers with one item after `delay`.
pub async fn spawn_slow_stub(delay: Duration) -> anyhow::Result<String> {
    let app = Router::new().route(
        "/categories",
        get(move || async move {
            tokio::time::sleep(delay).await;
            let mut headers = HeaderMap::new();
            headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(1u64));
            let body = vec![Category {
                id: 1,
                name: "Dairy".into(),
            }];
            (headers, Json(body))
        }),
    );
    bind(app).await
}

/// A `/login` that refuses every account with 403.
pub async fn spawn_forbidding_login_stub(detail: &'static str) -> anyhow::Result<String> {
    let app = Router::new().route(
        "/login",
        post(move || async move {
            let body = ErrorDetail {
                detail: detail.to_string(),
            };
            (StatusCode::FORBIDDEN, Json(body))
        }),
    );
    bind(app).await
}

pub async fn settle(delay: Duration) {
    tokio::time::sleep(delay).await;
}
