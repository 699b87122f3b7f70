mod common;

use axum::http::StatusCode;
use serde_json::{json, Value as JsonValue};

use common::setup;

fn correct_answer_id(question: &JsonValue) -> i64 {
    question["answers"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["is_correct"] == true)
        .and_then(|a| a["id"].as_i64())
        .unwrap()
}

fn wrong_answer_id(question: &JsonValue) -> i64 {
    question["answers"]
        .as_array()
        .unwrap()
        .iter()
        .find(|a| a["is_correct"] == false)
        .and_then(|a| a["id"].as_i64())
        .unwrap()
}

#[tokio::test]
async fn half_correct_submission_scores_fifty_and_updates_progress() {
    let Some(app) = setup().await else { return };

    let (_, teacher) = app.register_and_login("teacher").await;
    let lesson_id = app.create_lesson(&teacher).await;

    let (status, quiz) = app
        .call(
            "POST",
            "/api/quizzes",
            Some(&teacher),
            Some(json!({
                "lesson_id": lesson_id,
                "title": "Check-up",
                "passing_score": 50.0,
                "questions": [
                    {
                        "question_text": "2 + 2 = ?",
                        "points": 1.0,
                        "order": 1,
                        "answers": [
                            {"answer_text": "4", "is_correct": true},
                            {"answer_text": "5"}
                        ]
                    },
                    {
                        "question_text": "3 * 3 = ?",
                        "points": 1.0,
                        "order": 2,
                        "answers": [
                            {"answer_text": "6"},
                            {"answer_text": "9", "is_correct": true}
                        ]
                    }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", quiz);
    let quiz_id = quiz["id"].as_i64().unwrap();
    let questions = quiz["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 2);

    let (student_id, student) = app.register_and_login("student").await;

    let (status, served) = app
        .call(
            "GET",
            &format!("/api/quizzes/lesson/{}/quiz", lesson_id),
            Some(&student),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(served["id"].as_i64(), Some(quiz_id));
    assert!(!served.to_string().contains("is_correct"));

    let q1 = &questions[0];
    let q2 = &questions[1];
    let mut answers = serde_json::Map::new();
    answers.insert(q1["id"].to_string(), json!(correct_answer_id(q1)));
    answers.insert(q2["id"].to_string(), json!(wrong_answer_id(q2)));

    let (status, result) = app
        .call(
            "POST",
            &format!("/api/quizzes/{}/submit", quiz_id),
            Some(&student),
            Some(json!({ "answers": answers, "time_spent": 90 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", result);
    assert_eq!(result["attempt"]["score"].as_f64(), Some(50.0));
    assert_eq!(result["attempt"]["points_earned"].as_f64(), Some(1.0));
    assert_eq!(result["attempt"]["total_points"].as_f64(), Some(2.0));
    assert_eq!(result["attempt"]["is_completed"], true);
    assert_eq!(result["passed"], true);
    assert_eq!(result["correct_answers"].as_array().unwrap().len(), 2);

    let (average, quiz_score): (Option<f64>, Option<f64>) = sqlx::query_as(
        "SELECT average_score, quiz_score FROM student_progress WHERE user_id = $1 AND lesson_id = $2",
    )
    .bind(student_id)
    .bind(lesson_id)
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(average, Some(50.0));
    assert_eq!(quiz_score, Some(50.0));

    let mut all_right = serde_json::Map::new();
    all_right.insert(q1["id"].to_string(), json!(correct_answer_id(q1)));
    all_right.insert(q2["id"].to_string(), json!(correct_answer_id(q2).to_string()));
    let (status, result) = app
        .call(
            "POST",
            &format!("/api/quizzes/{}/submit", quiz_id),
            Some(&student),
            Some(json!({ "answers": all_right, "time_spent": 60 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["attempt"]["score"].as_f64(), Some(100.0));

    let average: Option<f64> = sqlx::query_scalar(
        "SELECT average_score FROM student_progress WHERE user_id = $1 AND lesson_id = $2",
    )
    .bind(student_id)
    .bind(lesson_id)
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(average, Some(75.0));

    let (status, best) = app
        .call(
            "GET",
            &format!("/api/quizzes/{}/best-attempt", quiz_id),
            Some(&student),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(best["score"].as_f64(), Some(100.0));

    let (status, attempts) = app
        .call(
            "GET",
            &format!("/api/quizzes/attempts/my-attempts?quiz_id={}", quiz_id),
            Some(&student),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(attempts.as_array().unwrap().len(), 2);

    let (_, other) = app.register_and_login("student").await;
    let attempt_id = best["id"].as_i64().unwrap();
    let (status, _) = app
        .call(
            "GET",
            &format!("/api/quizzes/attempts/{}", attempt_id),
            Some(&other),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn failed_attempt_leaves_progress_untouched() {
    let Some(app) = setup().await else { return };

    let (_, teacher) = app.register_and_login("teacher").await;
    let lesson_id = app.create_lesson(&teacher).await;
    let (status, quiz) = app
        .call(
            "POST",
            "/api/quizzes",
            Some(&teacher),
            Some(json!({
                "lesson_id": lesson_id,
                "title": "Short answer",
                "passing_score": 100.0,
                "show_answers": false,
                "questions": [{
                    "question_text": "Square root of 25?",
                    "question_type": "short_answer",
                    "answers": [{"answer_text": "Five", "is_correct": true}]
                }]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let quiz_id = quiz["id"].as_i64().unwrap();
    let question_id = quiz["questions"][0]["id"].as_i64().unwrap();

    let (student_id, student) = app.register_and_login("student").await;
    let (status, result) = app
        .call(
            "POST",
            &format!("/api/quizzes/{}/submit", quiz_id),
            Some(&student),
            Some(json!({ "answers": { question_id.to_string(): "six" } })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["passed"], false);
    assert!(result.get("correct_answers").is_none());

    let rows: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM student_progress WHERE user_id = $1 AND lesson_id = $2",
    )
    .bind(student_id)
    .bind(lesson_id)
    .fetch_one(&app.pool)
    .await
    .unwrap();
    assert_eq!(rows, 0);

    let (status, result) = app
        .call(
            "POST",
            &format!("/api/quizzes/{}/submit", quiz_id),
            Some(&student),
            Some(json!({ "answers": { question_id.to_string(): "  FIVE " } })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(result["passed"], true);
}

#[tokio::test]
async fn missing_quiz_returns_404() {
    let Some(app) = setup().await else { return };

    let (_, student) = app.register_and_login("student").await;
    let (status, _) = app
        .call(
            "POST",
            "/api/quizzes/999999999/submit",
            Some(&student),
            Some(json!({ "answers": {} })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, err) = app
        .call("GET", "/api/quizzes/lesson/999999999/quiz", Some(&student), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["detail"], "No active quiz found for this lesson");
}

#[tokio::test]
async fn updating_questions_replaces_the_set() {
    let Some(app) = setup().await else { return };

    let (_, teacher) = app.register_and_login("teacher").await;
    let lesson_id = app.create_lesson(&teacher).await;
    let (_, quiz) = app
        .call(
            "POST",
            "/api/quizzes",
            Some(&teacher),
            Some(json!({
                "lesson_id": lesson_id,
                "title": "v1",
                "questions": [
                    {"question_text": "a", "answers": [{"answer_text": "1", "is_correct": true}]},
                    {"question_text": "b", "answers": [{"answer_text": "2", "is_correct": true}]}
                ]
            })),
        )
        .await;
    let quiz_id = quiz["id"].as_i64().unwrap();

    let (status, updated) = app
        .call(
            "PUT",
            &format!("/api/quizzes/{}", quiz_id),
            Some(&teacher),
            Some(json!({
                "title": "v2",
                "questions": [
                    {"question_text": "c", "question_type": "true_false", "answers": [
                        {"answer_text": "True", "is_correct": true},
                        {"answer_text": "False"}
                    ]}
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK, "{}", updated);
    assert_eq!(updated["title"], "v2");
    assert_eq!(updated["questions"].as_array().unwrap().len(), 1);
    assert_eq!(updated["questions"][0]["question_text"], "c");
}
