use std::net::SocketAddr;

use axum::Router;
use reqwest::StatusCode as HttpStatusCode;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use uuid::Uuid;

use server::routes::{self, AppState};
use server::Variant;
use store::ItemStore;

struct TestApp {
    base_url: String,
}

async fn start_server(variant: Variant) -> anyhow::Result<TestApp> {
    let store = ItemStore::seeded(variant.id_scheme(), variant.seed_names());
    let state = AppState { store, variant };
    let app: Router = routes::build_router(state, CorsLayer::very_permissive());

    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    let base_url = format!("http://{}:{}", addr.ip(), addr.port());

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            eprintln!("server error: {}", e);
        }
    });

    Ok(TestApp { base_url })
}

fn client() -> reqwest::Client {
    reqwest::Client::new()
}

#[tokio::test]
async fn health_ok() -> anyhow::Result<()> {
    let app = start_server(Variant::Sequential).await?;
    let res = client().get(format!("{}/health", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn sequential_crud_scenario() -> anyhow::Result<()> {
    let app = start_server(Variant::Sequential).await?;
    let c = client();

    // Fresh process: exactly the three seeded records, in seed order
    let res = c.get(format!("{}/items", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(
        body,
        json!([
            {"id": 1, "name": "Item 1"},
            {"id": 2, "name": "Item 2"},
            {"id": 3, "name": "Item 3"}
        ])
    );

    // Create assigns the next integer id
    let res = c
        .post(format!("{}/items", app.base_url))
        .json(&json!({"name": "New"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({"id": 4, "name": "New"}));

    // Delete answers 200 with a fixed payload
    let res = c.delete(format!("{}/items/2", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({"message": "Item deleted"}));

    // The deleted id is gone
    let res = c.get(format!("{}/items/2", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({"error": "Item not found"}));

    let res = c.get(format!("{}/items", app.base_url)).send().await?;
    let body = res.json::<Value>().await?;
    let items = body.as_array().expect("array body");
    assert_eq!(items.len(), 3);
    assert!(items.iter().all(|it| it["id"] != json!(2)));
    Ok(())
}

#[tokio::test]
async fn get_unknown_id_is_not_found() -> anyhow::Result<()> {
    let app = start_server(Variant::Sequential).await?;
    let res = client().get(format!("{}/items/99", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({"error": "Item not found"}));
    Ok(())
}

#[tokio::test]
async fn create_overwrites_caller_id_and_keeps_extra_fields() -> anyhow::Result<()> {
    let app = start_server(Variant::Sequential).await?;
    let c = client();

    let res = c
        .post(format!("{}/items", app.base_url))
        .json(&json!({"id": 999, "name": "Widget", "tags": ["a", "b"]}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<Value>().await?;
    assert_eq!(created["id"], json!(4));
    assert_eq!(created["tags"], json!(["a", "b"]));

    let res = c.get(format!("{}/items/4", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    assert_eq!(res.json::<Value>().await?, created);
    Ok(())
}

#[tokio::test]
async fn delete_is_idempotent() -> anyhow::Result<()> {
    let app = start_server(Variant::Sequential).await?;
    let c = client();

    for _ in 0..2 {
        let res = c.delete(format!("{}/items/3", app.base_url)).send().await?;
        assert_eq!(res.status(), HttpStatusCode::OK);
        let body = res.json::<Value>().await?;
        assert_eq!(body, json!({"message": "Item deleted"}));

        let res = c.get(format!("{}/items", app.base_url)).send().await?;
        let body = res.json::<Value>().await?;
        assert_eq!(body.as_array().expect("array body").len(), 2);
    }
    Ok(())
}

#[tokio::test]
async fn non_integer_id_is_bad_request() -> anyhow::Result<()> {
    let app = start_server(Variant::Sequential).await?;
    let c = client();

    let res = c.get(format!("{}/items/abc", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({"error": "invalid item id"}));

    let res = c.delete(format!("{}/items/abc", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn readonly_variant_serves_reads_only() -> anyhow::Result<()> {
    let app = start_server(Variant::Readonly).await?;
    let c = client();

    let res = c.get(format!("{}/items", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(
        body,
        json!([
            {"id": 1, "name": "Alice"},
            {"id": 2, "name": "Bob"},
            {"id": 3, "name": "Charlotte"}
        ])
    );

    // Not-found payload uses the `message` key on this variant
    let res = c.get(format!("{}/items/9", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({"message": "Item not found"}));

    // No create/delete routes registered
    let res = c
        .post(format!("{}/items", app.base_url))
        .json(&json!({"name": "nope"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::METHOD_NOT_ALLOWED);
    let res = c.delete(format!("{}/items/1", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::METHOD_NOT_ALLOWED);
    Ok(())
}

#[tokio::test]
async fn uuid_variant_round_trip() -> anyhow::Result<()> {
    let app = start_server(Variant::Uuid).await?;
    let c = client();

    let res = c.get(format!("{}/items", app.base_url)).send().await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    let items = body.as_array().expect("array body");
    assert_eq!(items.len(), 3);
    let first_id = items[0]["id"].as_str().expect("string id").to_string();
    Uuid::parse_str(&first_id)?;

    // Lookup by the seeded uuid actually matches
    let res = c
        .get(format!("{}/items/{}", app.base_url, first_id))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["name"], json!("Item 1"));

    // Unknown uuid -> 404 with the `error` key
    let res = c
        .get(format!("{}/items/{}", app.base_url, Uuid::new_v4()))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    let body = res.json::<Value>().await?;
    assert_eq!(body, json!({"error": "Item not found"}));

    // Create assigns a fresh uuid, overwriting the caller's id
    let res = c
        .post(format!("{}/items", app.base_url))
        .json(&json!({"id": "mine", "name": "New"}))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::CREATED);
    let created = res.json::<Value>().await?;
    let new_id = created["id"].as_str().expect("string id").to_string();
    assert_ne!(new_id, "mine");
    Uuid::parse_str(&new_id)?;

    // Delete it and confirm it is gone
    let res = c
        .delete(format!("{}/items/{}", app.base_url, new_id))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let res = c
        .get(format!("{}/items/{}", app.base_url, new_id))
        .send()
        .await?;
    assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
    Ok(())
}
