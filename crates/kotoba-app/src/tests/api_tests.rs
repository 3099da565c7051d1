use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use super::fakes::{FakeModel, cat, test_state};
use crate::handlers::router;

async fn send(app: axum::Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn delete(uri: &str) -> Request<Body> {
    Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

#[tokio::test]
async fn search_returns_entries_with_history() {
    let (state, _dir, _watchdog) = test_state(&[cat()], None);

    let (status, body) = send(router(state.clone()), get("/api/search?q=%E7%8C%AB")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["word"], "猫");
    assert_eq!(body[0]["reading"], "ねこ");
    assert_eq!(body[0]["history"]["count"], 1);
    assert_eq!(body[0]["history"]["lastSearched"], Value::Null);

    let (_, body) = send(router(state), get("/api/search?q=%E7%8C%AB")).await;
    assert_eq!(body[0]["history"]["count"], 2);
    assert!(body[0]["history"]["lastSearched"].is_string());
}

#[tokio::test]
async fn search_without_query_is_bad_request() {
    let (state, _dir, _watchdog) = test_state(&[cat()], None);

    let (status, body) = send(router(state.clone()), get("/api/search")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Query is required" }));

    let (status, _) = send(router(state), get("/api/search?q=%20")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_word_is_not_found() {
    let (state, _dir, _watchdog) = test_state(&[cat()], None);

    let (status, body) = send(router(state), get("/api/search?q=%E7%8A%AC")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "找不到單字" }));
}

#[tokio::test]
async fn exhausted_quota_is_reported() {
    let (state, _dir, _watchdog) = test_state(&[cat()], Some(FakeModel { reply: None }));

    let (status, body) = send(
        router(state),
        get("/api/search?q=%E8%B2%93&direction=zh-ja"),
    )
    .await;

    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body, json!({ "error": "找不到單字 (且 API 額度已滿，無法翻譯)" }));
}

#[tokio::test]
async fn chinese_query_found_through_translation() {
    let model = FakeModel {
        reply: Some("猫".to_string()),
    };
    let (state, _dir, _watchdog) = test_state(&[cat()], Some(model));

    let (status, body) = send(
        router(state),
        get("/api/search?q=%E8%B2%93&direction=zh-ja"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["word"], "猫");
    assert_eq!(body[0]["originalQuery"], "貓");
    assert!(body[0].get("isLLM").is_none());
}

#[tokio::test]
async fn save_is_idempotent_and_listed() {
    let (state, _dir, _watchdog) = test_state(&[], None);
    let entry = json!({ "word": "猫", "reading": "ねこ", "meaning": "貓", "examples": [] });

    let (status, body) = send(router(state.clone()), post_json("/api/save", entry.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (_, body) = send(router(state.clone()), post_json("/api/save", entry)).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let (status, body) = send(router(state), get("/api/saved")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["word"], "猫");
    assert_eq!(body[0]["searchCount"], 0);
    assert_eq!(body[0]["flashcardStats"]["correct"], 0);
}

#[tokio::test]
async fn delete_removes_one_reading_or_all() {
    let (state, _dir, _watchdog) = test_state(&[], None);
    for reading in ["なま", "せい"] {
        send(
            router(state.clone()),
            post_json("/api/save", json!({ "word": "生", "reading": reading })),
        )
        .await;
    }

    // 生 / なま
    let (status, body) = send(
        router(state.clone()),
        delete("/api/saved/%E7%94%9F?reading=%E3%81%AA%E3%81%BE"),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["reading"], "せい");

    let (_, body) = send(router(state), delete("/api/saved/%E7%94%9F")).await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn review_updates_counters() {
    let (state, _dir, _watchdog) = test_state(&[], None);
    send(
        router(state.clone()),
        post_json("/api/save", json!({ "word": "猫", "reading": "ねこ" })),
    )
    .await;

    let (status, body) = send(
        router(state.clone()),
        post_json(
            "/api/flashcard/review",
            json!({ "word": "猫", "reading": "ねこ", "result": "correct" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["flashcardStats"]["correct"], 1);

    let (_, body) = send(
        router(state.clone()),
        post_json("/api/flashcard/review", json!({ "word": "猫", "result": "wrong" })),
    )
    .await;
    assert_eq!(body["data"]["flashcardStats"]["incorrect"], 1);

    let (_, body) = send(
        router(state),
        post_json("/api/flashcard/review", json!({ "word": "犬", "result": "correct" })),
    )
    .await;
    assert_eq!(body["data"], Value::Null);
}

#[tokio::test]
async fn review_without_result_is_bad_request() {
    let (state, _dir, _watchdog) = test_state(&[], None);

    let (status, body) = send(
        router(state),
        post_json("/api/flashcard/review", json!({ "word": "猫" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Missing word or result" }));
}

#[tokio::test]
async fn review_result_of_any_type_counts_as_incorrect() {
    let (state, _dir, _watchdog) = test_state(&[], None);
    send(
        router(state.clone()),
        post_json("/api/save", json!({ "word": "猫", "reading": "ねこ" })),
    )
    .await;

    for result in [json!(true), json!(1), json!({ "ok": true })] {
        let (status, _) = send(
            router(state.clone()),
            post_json("/api/flashcard/review", json!({ "word": "猫", "result": result })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (_, body) = send(router(state.clone()), get("/api/saved")).await;
    assert_eq!(body[0]["flashcardStats"]["incorrect"], 3);
    assert_eq!(body[0]["flashcardStats"]["correct"], 0);

    for result in [json!(false), json!(0), json!("")] {
        let (status, _) = send(
            router(state.clone()),
            post_json("/api/flashcard/review", json!({ "word": "猫", "result": result })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn heartbeat_reports_local_mode() {
    let (state, _dir, _watchdog) = test_state(&[], None);

    let (status, body) = send(router(state), get("/api/heartbeat")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "alive", "dbStatus": "connected", "dbMode": "local" })
    );
}

#[tokio::test]
async fn suggest_without_llm_is_empty() {
    let (state, _dir, _watchdog) = test_state(&[], None);

    let (status, body) = send(router(state.clone()), get("/api/suggest?q=%E8%B2%93")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));

    let (_, body) = send(router(state), get("/api/suggest")).await;
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn suggest_swallows_bad_replies() {
    let model = FakeModel {
        reply: Some("no idea".to_string()),
    };
    let (state, _dir, _watchdog) = test_state(&[], Some(model));

    let (status, body) = send(router(state), get("/api/suggest?q=%E8%B2%93")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn grammar_errors() {
    let (state, _dir, _watchdog) = test_state(&[], None);

    let (status, _) = send(router(state.clone()), get("/api/grammar")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(router(state), get("/api/grammar?q=%E3%81%BB%E3%81%A9")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "API Key missing" }));

    let model = FakeModel {
        reply: Some("not json".to_string()),
    };
    let (state, _dir, _watchdog) = test_state(&[], Some(model));
    let (status, body) = send(router(state), get("/api/grammar?q=%E3%81%BB%E3%81%A9")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed to generate grammar explanation" }));
}

#[tokio::test]
async fn grammar_returns_explanation() {
    let model = FakeModel {
        reply: Some(
            "```json\n{\"grammar\": \"N + ほど～ない\", \"meaning\": \"沒有比...更...\", \"usage\": \"接在名詞後面\", \"examples\": []}\n```"
                .to_string(),
        ),
    };
    let (state, _dir, _watchdog) = test_state(&[], Some(model));

    let (status, body) = send(router(state), get("/api/grammar?q=%E3%81%BB%E3%81%A9")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["grammar"], "N + ほど～ない");
}
