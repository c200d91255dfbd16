mod common;

use axum::http::Method;
use serde_json::json;

#[tokio::test]
async fn board_round_trip_via_token_endpoint() {
    let app = common::test_app().await;

    // POST /token -> POST /boards -> GET /boards, the full happy path
    let (status, body) = common::request(
        &app,
        Method::POST,
        "/token",
        None,
        Some(json!({ "role": "ADMIN", "permissions": ["READ", "WRITE"] })),
    )
    .await;
    assert_eq!(status, 200);
    let token = body["token"].as_str().unwrap().to_string();

    let (status, board) = common::request(
        &app,
        Method::POST,
        "/boards",
        Some(&token),
        Some(json!({ "title": "Sprint 1" })),
    )
    .await;
    assert_eq!(status, 201);
    assert_eq!(board["id"], 1);
    assert_eq!(board["title"], "Sprint 1");

    let (status, boards) =
        common::request(&app, Method::GET, "/boards?skip=0&limit=20", Some(&token), None).await;
    assert_eq!(status, 200);
    assert_eq!(boards, json!([{ "id": 1, "title": "Sprint 1", "cards": [] }]));
}

#[tokio::test]
async fn list_pagination_window_is_applied() {
    let app = common::test_app().await;
    let writer = common::token("ADMIN", &["READ", "WRITE"]);

    for title in ["A", "B", "C", "D"] {
        let (status, _) = common::request(
            &app,
            Method::POST,
            "/boards",
            Some(&writer),
            Some(json!({ "title": title })),
        )
        .await;
        assert_eq!(status, 201);
    }

    let (status, body) =
        common::request(&app, Method::GET, "/boards?skip=1&limit=2", Some(&writer), None).await;
    assert_eq!(status, 200);
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["B", "C"]);
}

#[tokio::test]
async fn malformed_pagination_is_rejected_with_400() {
    let app = common::test_app().await;
    let reader = common::token("USER", &["READ"]);

    for uri in ["/boards?skip=abc", "/boards?limit=abc", "/boards?skip=-1", "/boards?limit=0"] {
        let (status, body) = common::request(&app, Method::GET, uri, Some(&reader), None).await;
        assert_eq!(status, 400, "{uri}");
        assert!(body["error"].is_string(), "{uri}");
    }
}

#[tokio::test]
async fn patch_updates_only_supplied_fields() {
    let app = common::test_app().await;
    let writer = common::token("ADMIN", &["READ", "WRITE"]);

    let (_, board) = common::request(
        &app,
        Method::POST,
        "/boards",
        Some(&writer),
        Some(json!({ "title": "Old" })),
    )
    .await;
    let id = board["id"].as_i64().unwrap();

    let (status, updated) = common::request(
        &app,
        Method::PATCH,
        &format!("/boards/{id}"),
        Some(&writer),
        Some(json!({ "title": "New" })),
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(updated["title"], "New");
    assert_eq!(updated["id"], id);
}

#[tokio::test]
async fn patch_missing_board_returns_404() {
    let app = common::test_app().await;
    let writer = common::token("ADMIN", &["WRITE"]);

    let (status, body) = common::request(
        &app,
        Method::PATCH,
        "/boards/999",
        Some(&writer),
        Some(json!({ "title": "ghost" })),
    )
    .await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "Board not found");
}

#[tokio::test]
async fn delete_returns_204_and_misses_return_404_every_time() {
    let app = common::test_app().await;
    let writer = common::token("ADMIN", &["READ", "WRITE"]);

    let (_, board) = common::request(
        &app,
        Method::POST,
        "/boards",
        Some(&writer),
        Some(json!({ "title": "Done" })),
    )
    .await;
    let id = board["id"].as_i64().unwrap();

    let (status, body) =
        common::request(&app, Method::DELETE, &format!("/boards/{id}"), Some(&writer), None).await;
    assert_eq!(status, 204);
    assert!(body.is_null());

    // Not idempotent: a repeated delete reports the miss
    for _ in 0..2 {
        let (status, body) =
            common::request(&app, Method::DELETE, &format!("/boards/{id}"), Some(&writer), None)
                .await;
        assert_eq!(status, 404);
        assert_eq!(body["error"], "Board not found");
    }
}
