mod common;

use axum::http::{Method, StatusCode};
use serde_json::{Value, json};

use common::{TestApp, bearer, test_app};

async fn post_chirp(app: &TestApp, token: &Value, body: &str) -> (StatusCode, Value) {
    app.send(
        Method::POST,
        "/api/chirps",
        Some(&bearer(token)),
        Some(json!({ "body": body })),
    )
    .await
}

#[tokio::test]
async fn create_requires_authentication() {
    let app = test_app("dev");
    let (status, body) = app
        .send(Method::POST, "/api/chirps", None, Some(json!({ "body": "hi" })))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn create_censors_profanity() {
    let app = test_app("dev");
    let session = app.session("walt@example.com").await;

    let (status, chirp) = post_chirp(&app, &session["token"], "I had a Kerfuffle with a sharbert!").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(chirp["body"], "I had a **** with a sharbert!");
    assert_eq!(chirp["user_id"], session["id"]);
}

#[tokio::test]
async fn length_limit_counts_characters() {
    let app = test_app("dev");
    let session = app.session("walt@example.com").await;

    let (status, _) = post_chirp(&app, &session["token"], &"é".repeat(140)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = post_chirp(&app, &session["token"], &"a".repeat(141)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Chirp is too long");
}

#[tokio::test]
async fn list_sorts_and_filters() {
    let app = test_app("dev");
    let walt = app.session("walt@example.com").await;
    let jesse = app.session("jesse@example.com").await;

    post_chirp(&app, &walt["token"], "one").await;
    post_chirp(&app, &jesse["token"], "two").await;
    post_chirp(&app, &walt["token"], "three").await;

    let bodies = |v: &Value| -> Vec<String> {
        v.as_array()
            .expect("array")
            .iter()
            .map(|c| c["body"].as_str().unwrap_or_default().to_string())
            .collect()
    };

    let (status, all) = app.send(Method::GET, "/api/chirps", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(bodies(&all), ["one", "two", "three"]);

    let (_, desc) = app.send(Method::GET, "/api/chirps?sort=desc", None, None).await;
    assert_eq!(bodies(&desc), ["three", "two", "one"]);

    let uri = format!("/api/chirps?author_id={}", walt["id"].as_str().unwrap());
    let (_, walts) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(bodies(&walts), ["one", "three"]);
}

#[tokio::test]
async fn list_rejects_bad_query() {
    let app = test_app("dev");
    let (status, _) = app
        .send(Method::GET, "/api/chirps?author_id=nope", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .send(Method::GET, "/api/chirps?sort=random", None, None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn get_by_id() {
    let app = test_app("dev");
    let session = app.session("walt@example.com").await;
    let (_, chirp) = post_chirp(&app, &session["token"], "hello").await;

    let uri = format!("/api/chirps/{}", chirp["id"].as_str().unwrap());
    let (status, fetched) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, chirp);

    let (status, _) = app
        .send(
            Method::GET,
            "/api/chirps/00000000-0000-0000-0000-000000000000",
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app.send(Method::GET, "/api/chirps/xyz", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_the_author_can_delete() {
    let app = test_app("dev");
    let walt = app.session("walt@example.com").await;
    let jesse = app.session("jesse@example.com").await;
    let (_, chirp) = post_chirp(&app, &walt["token"], "say my name").await;
    let uri = format!("/api/chirps/{}", chirp["id"].as_str().unwrap());

    let (status, _) = app.send(Method::DELETE, &uri, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(Method::DELETE, &uri, Some(&bearer(&jesse["token"])), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .send(Method::DELETE, &uri, Some(&bearer(&walt["token"])), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.send(Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send(Method::DELETE, &uri, Some(&bearer(&walt["token"])), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
