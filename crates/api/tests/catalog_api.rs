//! Course catalog: listing, detail, and authoring.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, get_auth, post_json_auth, register, register_instructor};

#[tokio::test]
async fn course_list_is_a_bare_array_of_published_courses() {
    let app = common::build_test_app(common::test_pool().await);

    let response = get(app, "/api/courses").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let courses = json.as_array().expect("course list must be a bare array");
    assert_eq!(courses.len(), 3);
    assert_eq!(courses[0]["slug"], "ai-foundations");
    assert_eq!(courses[0]["level"], "beginner");
    assert_eq!(courses[0]["skillTags"][0], "machine-learning");
    assert_eq!(courses[0]["isPublished"], true);
}

#[tokio::test]
async fn course_detail_nests_modules_and_lessons() {
    let app = common::build_test_app(common::test_pool().await);

    let response = get(app, "/api/courses/1").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["success"], true);
    let course = &json["data"];
    assert_eq!(course["title"], "AI Foundations");
    let modules = course["modules"].as_array().unwrap();
    assert_eq!(modules.len(), 2);
    assert_eq!(modules[0]["position"], 1);
    assert_eq!(modules[0]["lessons"].as_array().unwrap().len(), 2);
    assert_eq!(modules[1]["lessons"][0]["skillName"], "ai-ethics");
}

#[tokio::test]
async fn unknown_course_is_404() {
    let app = common::build_test_app(common::test_pool().await);
    let response = get(app, "/api/courses/999").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn students_cannot_author() {
    let app = common::build_test_app(common::test_pool().await);
    let token = register(app.clone(), "student1").await;

    let body = serde_json::json!({ "slug": "x", "title": "X", "level": "beginner" });
    let response = post_json_auth(app, "/api/courses", body, &token).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn instructor_builds_a_course() {
    let pool = common::test_pool().await;
    let app = common::build_test_app(pool.clone());
    let token = register_instructor(app.clone(), &pool, "prof").await;

    let body = serde_json::json!({
        "slug": "data-viz",
        "title": "  Data Visualisation ",
        "level": "intermediate",
        "durationHours": 6,
        "skillTags": ["Data-Viz", "python", "python"],
    });
    let response = post_json_auth(app.clone(), "/api/courses", body, &token).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let course = body_json(response).await["data"].clone();
    assert_eq!(course["title"], "Data Visualisation");
    assert_eq!(course["skillTags"], serde_json::json!(["data-viz", "python"]));
    let course_id = course["id"].as_i64().unwrap();

    let response = post_json_auth(
        app.clone(),
        &format!("/api/courses/{course_id}/modules"),
        serde_json::json!({ "title": "Charts" }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let module_id = body_json(response).await["data"]["id"].as_i64().unwrap();

    for title in ["Bar charts", "Line charts"] {
        let response = post_json_auth(
            app.clone(),
            &format!("/api/modules/{module_id}/lessons"),
            serde_json::json!({ "title": title, "skillName": "data-viz", "skillGain": 12.5 }),
            &token,
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = get(app, &format!("/api/courses/{course_id}")).await;
    let json = body_json(response).await;
    let lessons = json["data"]["modules"][0]["lessons"].as_array().unwrap().clone();
    assert_eq!(lessons.len(), 2);
    assert_eq!(lessons[1]["position"], 2);
    assert_eq!(lessons[1]["skillGain"], 12.5);
}

#[tokio::test]
async fn duplicate_slug_is_409() {
    let pool = common::test_pool().await;
    let app = common::build_test_app(pool.clone());
    let token = register_instructor(app.clone(), &pool, "prof2").await;

    let body = serde_json::json!({ "slug": "ai-foundations", "title": "Again", "level": "beginner" });
    let response = post_json_auth(app, "/api/courses", body, &token).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn invalid_course_fields_are_400() {
    let pool = common::test_pool().await;
    let app = common::build_test_app(pool.clone());
    let token = register_instructor(app.clone(), &pool, "prof3").await;

    let cases = [
        serde_json::json!({ "slug": "Bad Slug", "title": "T", "level": "beginner" }),
        serde_json::json!({ "slug": "ok", "title": "T", "level": "expert" }),
        serde_json::json!({ "slug": "ok", "title": "   ", "level": "beginner" }),
        serde_json::json!({ "slug": "ok", "title": "T", "level": "beginner", "skillTags": ["no spaces"] }),
        serde_json::json!({ "slug": "ok", "title": "T", "level": "beginner", "skillTags": ["Goals"] }),
    ];
    for body in cases {
        let response = post_json_auth(app.clone(), "/api/courses", body, &token).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn drafts_are_hidden_from_learners() {
    let pool = common::test_pool().await;
    let app = common::build_test_app(pool.clone());
    let author = register_instructor(app.clone(), &pool, "drafter").await;
    let learner = register(app.clone(), "reader").await;

    let body = serde_json::json!({
        "slug": "secret-draft", "title": "Draft", "level": "advanced", "isPublished": false,
    });
    let response = post_json_auth(app.clone(), "/api/courses", body, &author).await;
    let id = body_json(response).await["data"]["id"].as_i64().unwrap();

    let response = get(app.clone(), "/api/courses").await;
    assert_eq!(body_json(response).await.as_array().unwrap().len(), 3);

    let response = get_auth(app.clone(), &format!("/api/courses/{id}"), &learner).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get_auth(app, &format!("/api/courses/{id}"), &author).await;
    assert_eq!(response.status(), StatusCode::OK);
}
