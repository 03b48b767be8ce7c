mod common;

use inventory_client::routes::health::{HealthData, health_check};

#[tokio::test]
async fn health_check_returns_ok() {
    let response = health_check().await;
    assert_eq!(response.0.status, "ok");
}

#[tokio::test]
async fn health_endpoint_is_served() -> anyhow::Result<()> {
    let server = common::spawn_backend().await?;
    let body: HealthData = reqwest::get(format!("{}/health", server.base_url))
        .await?
        .json()
        .await?;
    assert_eq!(body.status, "ok");

    let missing = reqwest::get(format!("{}/nowhere", server.base_url)).await?;
    assert_eq!(missing.status(), reqwest::StatusCode::NOT_FOUND);
    Ok(())
}
