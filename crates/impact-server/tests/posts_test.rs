mod helpers;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use helpers::{authed_client, test_state};
use impact_core::Post;
use impact_server::store::{Collection, MemoryCollection};
use serde_json::json;

fn payload(text: &str, likes: u64) -> serde_json::Value {
    json!({
        "text": text,
        "topic": "Technology",
        "date": "2024-05-01T12:00:00Z",
        "likes": likes,
        "shares": 3,
        "comments": 1
    })
}

#[tokio::test]
async fn post_crud_round() {
    let state = test_state();
    let api = authed_client(&state).await;

    let created = api
        .post_json("/api/social-media-posts", &payload("Launch day", 10))
        .await;
    created.assert_status(StatusCode::CREATED);
    let post: Post = created.json();
    assert_eq!(post.likes, 10);
    assert!(post.created_at.is_some());

    let uri = format!("/api/social-media-posts/{}", post.id);
    let updated: Post = api.put_json(&uri, &payload("Launch week", 25)).await.json();
    assert_eq!(updated.text, "Launch week");
    assert_eq!(updated.likes, 25);
    assert_eq!(updated.created_at, post.created_at);

    let deleted = api.delete(&uri).await;
    deleted.assert_status(StatusCode::OK);
    assert_eq!(
        deleted.json::<serde_json::Value>()["message"],
        "Social media post deleted."
    );
    api.get(&uri).await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_invalidates_collection() {
    let state = test_state();
    let api = authed_client(&state).await;

    assert!(api.get("/api/social-media-posts").await.json::<Vec<Post>>().is_empty());
    api.get("/api/social-media-posts")
        .await
        .assert_header("x-cache", "HIT");

    api.post_json("/api/social-media-posts", &payload("Fresh", 1))
        .await
        .assert_status(StatusCode::CREATED);

    let posts: Vec<Post> = api.get("/api/social-media-posts").await.json();
    assert_eq!(posts.len(), 1);
}

#[tokio::test]
async fn missing_required_fields_are_bad_request() {
    let state = test_state();
    let api = authed_client(&state).await;

    let response = api
        .post_json("/api/social-media-posts", &json!({"text": "no topic"}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);

    let posts: Vec<Post> = api.get("/api/social-media-posts").await.json();
    assert!(posts.is_empty());
}

#[tokio::test]
async fn mistyped_body_is_json_bad_request() {
    let state = test_state();
    let api = authed_client(&state).await;

    let mut body = payload("Negative likes", 0);
    body["likes"] = json!(-1);

    let response = api.post_json("/api/social-media-posts", &body).await;
    response
        .assert_status(StatusCode::BAD_REQUEST)
        .assert_content_type_contains("application/json");
    let error: serde_json::Value = response.json();
    assert_eq!(error["error"], "Bad Request");
    assert!(error["message"].as_str().unwrap().contains("likes"));

    let created: Post = api
        .post_json("/api/social-media-posts", &payload("Valid", 1))
        .await
        .json();
    api.put_json(&format!("/api/social-media-posts/{}", created.id), &body)
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn seeded_posts_are_listed() {
    let state = test_state();
    state
        .populator()
        .seed_posts(state.posts())
        .await
        .unwrap();
    let api = authed_client(&state).await;

    let posts: Vec<Post> = api.get("/api/social-media-posts").await.json();
    assert_eq!(posts.len(), 30);

    let one: Post = api
        .get("/api/social-media-posts/facebook_post_1")
        .await
        .json();
    assert_eq!(one.text, "This is a sample post for Facebook - 1");
}

#[tokio::test]
async fn injected_collection_is_served() {
    let posts = Arc::new(MemoryCollection::<Post>::new("socialmediaposts"));
    posts
        .insert(Post::new("ext_1", "From another store", "Business", Utc::now()).with_counts(7, 2))
        .await
        .unwrap();

    let state = test_state().with_posts(posts.clone());
    let api = authed_client(&state).await;

    let listed: Vec<Post> = api.get("/api/social-media-posts").await.json();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "ext_1");

    api.delete("/api/social-media-posts/ext_1")
        .await
        .assert_status(StatusCode::OK);
    assert_eq!(posts.count().await.unwrap(), 0);
}
