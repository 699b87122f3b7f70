mod common;

use axum::http::StatusCode;
use serde_json::json;

use common::{setup, unique};

#[tokio::test]
async fn resubmitting_feedback_replaces_the_review() {
    let Some(app) = setup().await else { return };

    let (_, teacher) = app.register_and_login("teacher").await;
    let lesson_id = app.create_lesson(&teacher).await;
    let (_, alice) = app.register_and_login("student").await;
    let (_, bob) = app.register_and_login("student").await;

    let (status, _) = app
        .call(
            "POST",
            "/api/feedback",
            Some(&alice),
            Some(json!({ "lesson_id": lesson_id, "rating": 4.0, "comment": "Clear" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, _) = app
        .call(
            "POST",
            "/api/feedback",
            Some(&bob),
            Some(json!({ "lesson_id": lesson_id, "rating": 5.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (_, lesson) = app
        .call("GET", &format!("/api/lessons/{}", lesson_id), Some(&alice), None)
        .await;
    assert_eq!(lesson["rating"].as_f64(), Some(4.5));
    assert_eq!(lesson["review_count"].as_i64(), Some(2));

    let (status, mine) = app
        .call(
            "POST",
            "/api/feedback",
            Some(&alice),
            Some(json!({ "lesson_id": lesson_id, "rating": 2.0, "comment": "Too fast" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(mine["comment"], "Too fast");

    let (_, lesson) = app
        .call("GET", &format!("/api/lessons/{}", lesson_id), Some(&alice), None)
        .await;
    assert_eq!(lesson["rating"].as_f64(), Some(3.5));
    assert_eq!(lesson["review_count"].as_i64(), Some(2));

    let (status, listed) = app
        .call("GET", &format!("/api/feedback/lesson/{}", lesson_id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let feedback_id = mine["id"].as_i64().unwrap();
    let (status, _) = app
        .call(
            "PUT",
            &format!("/api/feedback/{}", feedback_id),
            Some(&bob),
            Some(json!({ "rating": 1.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = app
        .call(
            "DELETE",
            &format!("/api/feedback/{}", feedback_id),
            Some(&alice),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, lesson) = app
        .call("GET", &format!("/api/lessons/{}", lesson_id), Some(&bob), None)
        .await;
    assert_eq!(lesson["rating"].as_f64(), Some(5.0));
    assert_eq!(lesson["review_count"].as_i64(), Some(1));

    let (_, bob_rows) = app
        .call("GET", "/api/feedback/my-feedback", Some(&bob), None)
        .await;
    let bob_id = bob_rows[0]["id"].as_i64().unwrap();
    let (status, _) = app
        .call("DELETE", &format!("/api/feedback/{}", bob_id), Some(&bob), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, lesson) = app
        .call("GET", &format!("/api/lessons/{}", lesson_id), Some(&bob), None)
        .await;
    assert_eq!(lesson["rating"].as_f64(), Some(0.0));
    assert_eq!(lesson["review_count"].as_i64(), Some(0));
}

#[tokio::test]
async fn feedback_rating_out_of_range_is_rejected() {
    let Some(app) = setup().await else { return };

    let (_, teacher) = app.register_and_login("teacher").await;
    let lesson_id = app.create_lesson(&teacher).await;
    let (_, student) = app.register_and_login("student").await;

    for rating in [0.5, 5.5] {
        let (status, _) = app
            .call(
                "POST",
                "/api/feedback",
                Some(&student),
                Some(json!({ "lesson_id": lesson_id, "rating": rating })),
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    let (status, _) = app
        .call(
            "POST",
            "/api/feedback",
            Some(&student),
            Some(json!({ "lesson_id": 999999999, "rating": 3.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn progress_is_clamped_and_completion_is_sticky() {
    let Some(app) = setup().await else { return };

    let (_, teacher) = app.register_and_login("teacher").await;
    let lesson_id = app.create_lesson(&teacher).await;
    let (_, student) = app.register_and_login("student").await;
    let uri = format!("/api/lessons/{}/progress", lesson_id);

    let (status, progress) = app
        .call(
            "POST",
            &uri,
            Some(&student),
            Some(json!({ "progress_percentage": 150.0, "completed_sections": [1, 2], "time_spent": 300 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", progress);
    assert_eq!(progress["progress_percentage"].as_f64(), Some(100.0));
    assert_eq!(progress["is_completed"], true);
    assert_eq!(progress["completed_sections"], json!([1, 2]));
    let completed_at = progress["completed_at"].clone();
    assert!(completed_at.is_string());

    let (_, progress) = app
        .call(
            "POST",
            &uri,
            Some(&student),
            Some(json!({ "progress_percentage": 50.0 })),
        )
        .await;
    assert_eq!(progress["progress_percentage"].as_f64(), Some(50.0));
    assert_eq!(progress["is_completed"], false);
    assert_eq!(progress["completed_at"], completed_at);
    assert_eq!(progress["completed_sections"], json!([1, 2]));
    assert_eq!(progress["time_spent"].as_i64(), Some(300));

    let (_, progress) = app
        .call(
            "POST",
            &uri,
            Some(&student),
            Some(json!({ "progress_percentage": -10.0 })),
        )
        .await;
    assert_eq!(progress["progress_percentage"].as_f64(), Some(0.0));

    let (status, lessons) = app
        .call("GET", "/api/lessons/my-lessons", Some(&student), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    let entry = lessons
        .as_array()
        .unwrap()
        .iter()
        .find(|l| l["id"].as_i64() == Some(lesson_id));
    if let Some(entry) = entry {
        assert_eq!(entry["progress"].as_f64(), Some(0.0));
    }
}

#[tokio::test]
async fn teachers_cannot_record_progress() {
    let Some(app) = setup().await else { return };

    let (_, teacher) = app.register_and_login("teacher").await;
    let lesson_id = app.create_lesson(&teacher).await;
    let (status, _) = app
        .call(
            "POST",
            &format!("/api/lessons/{}/progress", lesson_id),
            Some(&teacher),
            Some(json!({ "progress_percentage": 10.0 })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn progress_accepts_query_parameters_without_a_body() {
    let Some(app) = setup().await else { return };

    let (_, teacher) = app.register_and_login("teacher").await;
    let lesson_id = app.create_lesson(&teacher).await;
    let (_, student) = app.register_and_login("student").await;

    let (status, progress) = app
        .call(
            "POST",
            &format!(
                "/api/lessons/{}/progress?progress_percentage=40&completed_sections=1,2&time_spent=30",
                lesson_id
            ),
            Some(&student),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", progress);
    assert_eq!(progress["progress_percentage"].as_f64(), Some(40.0));
    assert_eq!(progress["completed_sections"], json!([1, 2]));
    assert_eq!(progress["time_spent"].as_i64(), Some(30));
    assert_eq!(progress["message"], "Progress updated successfully");

    // A malformed id list leaves the stored sections alone.
    let (status, progress) = app
        .call(
            "POST",
            &format!(
                "/api/lessons/{}/progress?progress_percentage=60&completed_sections=1,x",
                lesson_id
            ),
            Some(&student),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(progress["progress_percentage"].as_f64(), Some(60.0));
    assert_eq!(progress["completed_sections"], json!([1, 2]));

    let (status, body) = app
        .call(
            "POST",
            &format!("/api/lessons/{}/progress", lesson_id),
            Some(&student),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].is_string());
}

#[tokio::test]
async fn my_lessons_filters_by_grade_and_limits() {
    let Some(app) = setup().await else { return };

    let (_, teacher) = app.register_and_login("teacher").await;
    for _ in 0..2 {
        let (status, lesson) = app
            .call(
                "POST",
                "/api/lessons",
                Some(&teacher),
                Some(json!({
                    "title": "Integers",
                    "slug": unique("grade6"),
                    "grade": 6,
                    "duration": 30,
                    "difficulty": "easy",
                    "is_published": true
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", lesson);
    }
    let (_, student) = app.register_and_login("student").await;

    let (status, lessons) = app
        .call("GET", "/api/lessons/my-lessons?grade=6&limit=1", Some(&student), None)
        .await;
    assert_eq!(status, StatusCode::OK, "{}", lessons);
    let lessons = lessons.as_array().unwrap();
    assert_eq!(lessons.len(), 1);
    assert!(lessons.iter().all(|l| l["grade"].as_i64() == Some(6)));

    let (status, _) = app
        .call("GET", "/api/lessons/my-lessons?limit=0", Some(&student), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
