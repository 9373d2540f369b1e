mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use helpers::{authed_client, test_state};
use impact_core::Item;
use impact_server::store::MemoryCollection;
use serde_json::json;

#[tokio::test]
async fn item_crud_round() {
    let state = test_state();
    let api = authed_client(&state).await;

    let created = api.post_json("/api/items", &json!({"name": "Notebook"})).await;
    created.assert_status(StatusCode::CREATED);
    let item: Item = created.json();
    assert_eq!(item.name, "Notebook");

    let fetched: Item = api.get(&format!("/api/items/{}", item.id)).await.json();
    assert_eq!(fetched, item);

    let updated = api
        .put_json(&format!("/api/items/{}", item.id), &json!({"name": "Sketchbook"}))
        .await;
    updated.assert_status(StatusCode::OK);
    let renamed: Item = updated.json();
    assert_eq!(renamed.id, item.id);
    assert_eq!(renamed.name, "Sketchbook");
    assert_eq!(renamed.created_at, item.created_at);

    let deleted = api.delete(&format!("/api/items/{}", item.id)).await;
    deleted.assert_status(StatusCode::OK);
    let body: serde_json::Value = deleted.json();
    assert_eq!(body["message"], "Item deleted.");

    api.get(&format!("/api/items/{}", item.id))
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn list_reflects_writes_despite_cache() {
    let state = test_state();
    let api = authed_client(&state).await;

    let first = api.get("/api/items").await;
    first.assert_header("x-cache", "MISS");
    assert!(first.json::<Vec<Item>>().is_empty());

    api.get("/api/items").await.assert_header("x-cache", "HIT");

    api.post_json("/api/items", &json!({"name": "Pen"})).await;

    let after = api.get("/api/items").await;
    after.assert_header("x-cache", "MISS");
    let items: Vec<Item> = after.json();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Pen");
}

#[tokio::test]
async fn write_invalidates_query_variants_and_document() {
    let state = test_state();
    let api = authed_client(&state).await;

    let item: Item = api.post_json("/api/items", &json!({"name": "Lamp"})).await.json();
    let doc = format!("/api/items/{}", item.id);

    api.get("/api/items?page=1").await;
    api.get(&doc).await;
    api.get("/api/items?page=1").await.assert_header("x-cache", "HIT");
    api.get(&doc).await.assert_header("x-cache", "HIT");

    api.put_json(&doc, &json!({"name": "Desk lamp"})).await;

    api.get("/api/items?page=1").await.assert_header("x-cache", "MISS");
    let fresh = api.get(&doc).await;
    fresh.assert_header("x-cache", "MISS");
    assert_eq!(fresh.json::<Item>().name, "Desk lamp");
}

#[tokio::test]
async fn delete_invalidates_document_key() {
    let state = test_state();
    let api = authed_client(&state).await;

    let item: Item = api.post_json("/api/items", &json!({"name": "Mug"})).await.json();
    let doc = format!("/api/items/{}", item.id);

    api.get(&doc).await.assert_status(StatusCode::OK);
    api.delete(&doc).await.assert_status(StatusCode::OK);

    api.get(&doc).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn missing_name_is_bad_request() {
    let state = test_state();
    let api = authed_client(&state).await;

    let response = api.post_json("/api/items", &json!({"name": "  "})).await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: serde_json::Value = response.json();
    assert!(body["message"].as_str().unwrap().contains("name"));
}

#[tokio::test]
async fn mistyped_name_is_json_bad_request() {
    let state = test_state();
    let api = authed_client(&state).await;

    let response = api.post_json("/api/items", &json!({"name": 5})).await;
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_content_type_contains("application/json");
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"], "Bad Request");
    assert!(body["message"].as_str().unwrap().contains("name"));

    let items: Vec<Item> = api.get("/api/items").await.json();
    assert!(items.is_empty());
}

#[tokio::test]
async fn missing_documents_are_not_found() {
    let state = test_state();
    let api = authed_client(&state).await;

    api.put_json("/api/items/nope", &json!({"name": "x"}))
        .await
        .assert_status(StatusCode::NOT_FOUND);
    api.delete("/api/items/nope")
        .await
        .assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn shared_collection_is_visible_across_instances() {
    // Dos instancias con caches propios sobre la misma coleccion
    let items = Arc::new(MemoryCollection::<Item>::new("items"));
    let first = test_state().with_items(items.clone());
    let second = test_state().with_items(items);

    let writer = authed_client(&first).await;
    let reader = authed_client(&second).await;

    assert!(reader.get("/api/items").await.json::<Vec<Item>>().is_empty());

    writer
        .post_json("/api/items", &json!({"name": "Shared"}))
        .await
        .assert_status(StatusCode::CREATED);

    // El cache de la segunda instancia no se entera de la escritura
    let stale = reader.get("/api/items").await;
    stale.assert_header("x-cache", "HIT");
    assert!(stale.json::<Vec<Item>>().is_empty());

    second.cache().clear_cache("/api/items").await;
    let fresh: Vec<Item> = reader.get("/api/items").await.json();
    assert_eq!(fresh.len(), 1);
    assert_eq!(fresh[0].name, "Shared");
}
