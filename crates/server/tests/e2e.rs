use std::sync::Arc;

use reqwest::StatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;

use server::{build_router, startup::build_cors, ServerState};
use service::storage::{DocumentStore, MemoryStore};

struct TestApp {
    base_url: String,
    client: reqwest::Client,
}

async fn start_server() -> anyhow::Result<TestApp> {
    let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
    let app = build_router(ServerState::new(store, &configs::AuthConfig::default()), build_cors());

    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    Ok(TestApp { base_url: format!("http://{addr}"), client: reqwest::Client::new() })
}

#[tokio::test]
async fn people_lifecycle_over_http() -> anyhow::Result<()> {
    let app = start_server().await?;
    let people = format!("{}/api/people", app.base_url);

    let created: Value = app
        .client
        .post(&people)
        .basic_auth("First", Some("112233"))
        .json(&json!({"name": "Ada", "age": 36}))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let id = created["_id"].as_str().unwrap().to_string();

    let listed: Value = app.client.get(&people).send().await?.json().await?;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let item = format!("{people}/{id}");
    let updated: Value = app
        .client
        .put(&item)
        .basic_auth("First", Some("112233"))
        .json(&json!({"age": 37}))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(updated, json!({"_id": id, "name": "Ada", "age": 37}));

    let anon = app.client.delete(&item).send().await?;
    assert_eq!(anon.status(), StatusCode::UNAUTHORIZED);
    assert!(anon.headers().contains_key("www-authenticate"));

    let deleted: u64 = app.client.delete(&item).basic_auth("First", Some("112233")).send().await?.json().await?;
    assert_eq!(deleted, 1);

    let listed: Value = app.client.get(&people).send().await?.json().await?;
    assert_eq!(listed, json!([]));
    Ok(())
}

#[tokio::test]
async fn register_login_me_over_http() -> anyhow::Result<()> {
    let app = start_server().await?;

    let resp = app
        .client
        .post(format!("{}/api/register", app.base_url))
        .json(&json!({"username": "ada", "password": "pw"}))
        .send()
        .await?;
    assert_eq!(resp.status(), StatusCode::OK);

    let login: Value = app
        .client
        .post(format!("{}/api/login", app.base_url))
        .json(&json!({"username": "ada", "password": "pw"}))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    let token = login["token"].as_str().unwrap();

    let claims: Value = app
        .client
        .get(format!("{}/api/me", app.base_url))
        .bearer_auth(token)
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;
    assert_eq!(claims["username"], "ada");

    let bad = app.client.get(format!("{}/api/me", app.base_url)).bearer_auth("not.a.token").send().await?;
    assert_eq!(bad.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}
