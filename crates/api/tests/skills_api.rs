//! Skills DNA, goals, and recommendations.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete_auth, get, get_auth, post_auth, post_json_auth, put_json_auth, register};

// ---------------------------------------------------------------------------
// Skills DNA
// ---------------------------------------------------------------------------

#[tokio::test]
async fn skills_require_login() {
    let app = common::build_test_app(common::test_pool().await);
    let response = get(app, "/api/skills").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn new_learner_has_empty_dna() {
    let app = common::build_test_app(common::test_pool().await);
    let token = register(app.clone(), "blank").await;

    let response = get_auth(app, "/api/skills", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["skills"], serde_json::json!([]));
    assert_eq!(data["summary"]["skillCount"], 0);
    assert_eq!(data["summary"]["level"], "awareness");
    assert!(data["summary"]["strongest"].is_null());
}

#[tokio::test]
async fn set_progress_validates_range_and_derives_level() {
    let app = common::build_test_app(common::test_pool().await);
    let token = register(app.clone(), "setter").await;

    let response = put_json_auth(
        app.clone(),
        "/api/skills/python",
        serde_json::json!({ "progress": 150 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = put_json_auth(
        app,
        "/api/skills/Python",
        serde_json::json!({ "progress": 50 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["skillName"], "python");
    assert_eq!(data["progress"], 50.0);
    assert_eq!(data["currentLevel"], "application");
}

#[tokio::test]
async fn deltas_clamp_and_history_is_oldest_first() {
    let app = common::build_test_app(common::test_pool().await);
    let token = register(app.clone(), "delta").await;

    put_json_auth(app.clone(), "/api/skills/ml", serde_json::json!({ "progress": 50 }), &token).await;

    let response = post_json_auth(
        app.clone(),
        "/api/skills/ml/progress",
        serde_json::json!({ "delta": -80 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["data"]["progress"], 0.0);

    let response = post_json_auth(
        app.clone(),
        "/api/skills/ml/progress",
        serde_json::json!({ "delta": 200 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    post_json_auth(app.clone(), "/api/skills/ml/progress", serde_json::json!({ "delta": 25 }), &token).await;

    let response = get_auth(app.clone(), "/api/skills/ml/history", &token).await;
    let data = body_json(response).await["data"].clone();
    let progress: Vec<f64> = data
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["progress"].as_f64().unwrap())
        .collect();
    assert_eq!(progress, vec![50.0, 0.0, 25.0]);

    let response = get_auth(app, "/api/skills/ml/history?limit=2", &token).await;
    let data = body_json(response).await["data"].clone();
    let progress: Vec<f64> = data
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["progress"].as_f64().unwrap())
        .collect();
    assert_eq!(progress, vec![0.0, 25.0]);
}

#[tokio::test]
async fn summary_reflects_all_skills() {
    let app = common::build_test_app(common::test_pool().await);
    let token = register(app.clone(), "summary").await;

    for (name, progress) in [("python", 90.0), ("ethics", 10.0), ("ml", 50.0)] {
        put_json_auth(
            app.clone(),
            &format!("/api/skills/{name}"),
            serde_json::json!({ "progress": progress }),
            &token,
        )
        .await;
    }

    let response = get_auth(app, "/api/skills", &token).await;
    let summary = body_json(response).await["data"]["summary"].clone();
    assert_eq!(summary["skillCount"], 3);
    assert_eq!(summary["average"], 50.0);
    assert_eq!(summary["strongest"], "python");
    assert_eq!(summary["weakest"], "ethics");
    assert_eq!(summary["levelCounts"]["expertise"], 1);
}

#[tokio::test]
async fn invalid_skill_name_is_400() {
    let app = common::build_test_app(common::test_pool().await);
    let token = register(app.clone(), "badname").await;

    let response = put_json_auth(
        app,
        "/api/skills/no%20spaces",
        serde_json::json!({ "progress": 10 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// ---------------------------------------------------------------------------
// Goals
// ---------------------------------------------------------------------------

#[tokio::test]
async fn goal_lifecycle() {
    let app = common::build_test_app(common::test_pool().await);
    let token = register(app.clone(), "goalie").await;

    put_json_auth(app.clone(), "/api/skills/python", serde_json::json!({ "progress": 50 }), &token).await;

    let response = put_json_auth(
        app.clone(),
        "/api/skills/goals/python",
        serde_json::json!({ "targetProgress": 80 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let view = body_json(response).await["data"].clone();
    assert_eq!(view["skillName"], "python");
    assert_eq!(view["targetProgress"], 80.0);
    assert_eq!(view["currentProgress"], 50.0);
    assert_eq!(view["projection"]["status"], "insufficient_data");
    assert_eq!(view["deadlineStatus"], "no_deadline");

    // Lowering the target below current progress marks it reached.
    let response = put_json_auth(
        app.clone(),
        "/api/skills/goals/python",
        serde_json::json!({ "targetProgress": 40, "deadline": "2030-01-01T00:00:00Z" }),
        &token,
    )
    .await;
    let view = body_json(response).await["data"].clone();
    assert_eq!(view["projection"]["status"], "reached");
    assert_eq!(view["deadlineStatus"], "on_track");

    let response = get_auth(app.clone(), "/api/skills/goals", &token).await;
    let goals = body_json(response).await["data"].clone();
    assert_eq!(goals.as_array().unwrap().len(), 1);

    let response = delete_auth(app.clone(), "/api/skills/goals/python", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = delete_auth(app.clone(), "/api/skills/goals/python", &token).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = get_auth(app, "/api/skills/goals", &token).await;
    assert_eq!(body_json(response).await["data"], serde_json::json!([]));
}

#[tokio::test]
async fn goal_target_is_validated() {
    let app = common::build_test_app(common::test_pool().await);
    let token = register(app.clone(), "target").await;

    for target in [0.0, 101.0] {
        let response = put_json_auth(
            app.clone(),
            "/api/skills/goals/python",
            serde_json::json!({ "targetProgress": target }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn crawling_progress_projects_as_stalled() {
    let app = common::build_test_app(common::test_pool().await);
    let token = register(app.clone(), "snail").await;

    put_json_auth(app.clone(), "/api/skills/python", serde_json::json!({ "progress": 10.0 }), &token).await;
    // Samples need at least a second between them to yield a rate.
    tokio::time::sleep(std::time::Duration::from_millis(1100)).await;
    put_json_auth(
        app.clone(),
        "/api/skills/python",
        serde_json::json!({ "progress": 10.000000000001 }),
        &token,
    )
    .await;

    let response = put_json_auth(
        app.clone(),
        "/api/skills/goals/python",
        serde_json::json!({ "targetProgress": 80 }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let view = body_json(response).await["data"].clone();
    assert_eq!(view["projection"]["status"], "stalled");

    let response = get_auth(app, "/api/skills/goals", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let goals = body_json(response).await["data"].clone();
    assert_eq!(goals[0]["projection"]["status"], "stalled");
}

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

fn course_ids(json: &serde_json::Value) -> Vec<i64> {
    json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["courseId"].as_i64().unwrap())
        .collect()
}

#[tokio::test]
async fn new_learner_is_steered_to_the_beginner_course() {
    let app = common::build_test_app(common::test_pool().await);
    let token = register(app.clone(), "newbie").await;

    let response = get_auth(app, "/api/recommendations", &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(course_ids(&json), vec![1, 2, 3]);
    assert!(!json["data"][0]["reasons"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn completed_courses_are_not_recommended() {
    let app = common::build_test_app(common::test_pool().await);
    let token = register(app.clone(), "graduate").await;

    for lesson in 1..=3 {
        let response = post_auth(app.clone(), &format!("/api/lessons/{lesson}/complete"), &token).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = get_auth(app.clone(), "/api/recommendations", &token).await;
    assert_eq!(course_ids(&body_json(response).await), vec![2, 3]);

    let response = get_auth(app, "/api/recommendations?limit=1", &token).await;
    assert_eq!(course_ids(&body_json(response).await), vec![2]);
}
