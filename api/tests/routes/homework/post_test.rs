#[cfg(test)]
mod tests {
    use crate::helpers::app::{
        ScriptedOutcome, empty_request, get_json_body, json_request, make_test_app,
    };
    use crate::helpers::data::{seed_event, seed_pending_submission, seed_student};
    use api::services::grading;
    use axum::http::StatusCode;
    use db::models::{grading_result, homework_submission};
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    #[tokio::test]
    #[serial]
    async fn submit_creates_a_pending_submission() {
        let (app, state, _grader) = make_test_app().await;
        let student = seed_student(state.db(), "Gil", "gil@test.com", None).await;
        let event = seed_event(state.db(), student.id).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/homework/submissions",
                json!({
                    "attendance_event_id": event.id,
                    "student_id": student.id,
                    "images": ["aW1hZ2Ux", "aW1hZ2Uy"],
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["status"], "pending");
        assert_eq!(json["data"]["image_count"], 2);
        assert_eq!(json["data"]["attempts"], 0);
        assert_eq!(json["data"]["attendance_event_id"], event.id);
    }

    #[tokio::test]
    #[serial]
    async fn submit_without_images_is_rejected() {
        let (app, state, _grader) = make_test_app().await;
        let student = seed_student(state.db(), "Hana", "hana@test.com", None).await;
        let event = seed_event(state.db(), student.id).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/homework/submissions",
                json!({
                    "attendance_event_id": event.id,
                    "student_id": student.id,
                    "images": [],
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "At least one image is required");
    }

    #[tokio::test]
    #[serial]
    async fn submit_with_oversized_image_is_rejected() {
        let (app, state, _grader) = make_test_app().await;
        let student = seed_student(state.db(), "Ian", "ian@test.com", None).await;
        let event = seed_event(state.db(), student.id).await;
        let oversized = "a".repeat(2 * 1024 * 1024 + 1);

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/homework/submissions",
                json!({
                    "attendance_event_id": event.id,
                    "student_id": student.id,
                    "images": [oversized],
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    #[serial]
    async fn submit_against_unknown_event_is_not_found() {
        let (app, state, _grader) = make_test_app().await;
        let student = seed_student(state.db(), "Joy", "joy@test.com", None).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/homework/submissions",
                json!({
                    "attendance_event_id": 999,
                    "student_id": student.id,
                    "images": ["aW1hZ2U="],
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Attendance event not found");
    }

    #[tokio::test]
    #[serial]
    async fn submit_for_someone_elses_event_is_forbidden() {
        let (app, state, _grader) = make_test_app().await;
        let owner = seed_student(state.db(), "Kim", "kim@test.com", None).await;
        let other = seed_student(state.db(), "Lee", "lee@test.com", None).await;
        let event = seed_event(state.db(), owner.id).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/homework/submissions",
                json!({
                    "attendance_event_id": event.id,
                    "student_id": other.id,
                    "images": ["aW1hZ2U="],
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    #[serial]
    async fn grade_trigger_grades_a_pending_submission() {
        let (app, state, grader) = make_test_app().await;
        let (_student, submission) =
            seed_pending_submission(state.db(), "mia@test.com").await;
        grader.push_grade(92.0, &["fractions"]);

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/homework/submissions/{}/grade", submission.id),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["data"]["status"], "graded");
        assert_eq!(json["data"]["attempts"], 1);
        assert_eq!(json["data"]["grading"]["score"], 92.0);
        assert_eq!(json["data"]["grading"]["graded_by"], "Mock AI");

        let stored = grading_result::Model::for_submission(state.db(), submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.score, 92.0);
    }

    #[tokio::test]
    #[serial]
    async fn grade_trigger_timeout_marks_submission_failed() {
        let (app, state, grader) = make_test_app().await;
        let (_student, submission) =
            seed_pending_submission(state.db(), "nia@test.com").await;
        grader.push(ScriptedOutcome::Timeout);

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/homework/submissions/{}/grade", submission.id),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let stored = homework_submission::Model::find_by_id(state.db(), submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            stored.status,
            homework_submission::SubmissionStatus::Failed
        );
        assert_eq!(stored.attempts, 1);
        // No result row for a failed attempt.
        assert!(
            grading_result::Model::for_submission(state.db(), submission.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    #[serial]
    async fn grade_trigger_quota_exhaustion_marks_submission_failed() {
        let (app, state, grader) = make_test_app().await;
        let (student, submission) =
            seed_pending_submission(state.db(), "ona@test.com").await;

        // Prime the cache so the failed attempt can be shown to leave it alone.
        let weak_uri = format!("/api/students/{}/weak-concepts", student.id);
        let primed = app.clone().oneshot(empty_request("GET", &weak_uri)).await.unwrap();
        assert_eq!(primed.status(), StatusCode::OK);

        grader.push(ScriptedOutcome::Quota);
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/homework/submissions/{}/grade", submission.id),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        let json = get_json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Grading service quota exceeded");

        let stored = homework_submission::Model::find_by_id(state.db(), submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, homework_submission::SubmissionStatus::Failed);
        assert_eq!(stored.attempts, 1);
        assert!(
            grading_result::Model::for_submission(state.db(), submission.id)
                .await
                .unwrap()
                .is_none()
        );

        // The cached summary survives a failed attempt.
        let after = app.oneshot(empty_request("GET", &weak_uri)).await.unwrap();
        assert_eq!(get_json_body(after).await["data"]["cached"], true);
    }

    #[tokio::test]
    #[serial]
    async fn grade_trigger_malformed_reply_marks_submission_failed() {
        let (app, state, grader) = make_test_app().await;
        let (_student, submission) =
            seed_pending_submission(state.db(), "pia@test.com").await;
        grader.push(ScriptedOutcome::Malformed);

        let response = app
            .oneshot(json_request(
                "POST",
                &format!("/api/homework/submissions/{}/grade", submission.id),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let stored = homework_submission::Model::find_by_id(state.db(), submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, homework_submission::SubmissionStatus::Failed);
        assert_eq!(stored.attempts, 1);
        assert!(
            grading_result::Model::for_submission(state.db(), submission.id)
                .await
                .unwrap()
                .is_none()
        );
    }

    #[tokio::test]
    #[serial]
    async fn grading_an_already_graded_submission_is_a_noop() {
        let (app, state, grader) = make_test_app().await;
        let (_student, submission) =
            seed_pending_submission(state.db(), "oli@test.com").await;
        let uri = format!("/api/homework/submissions/{}/grade", submission.id);

        let first = app
            .clone()
            .oneshot(json_request("POST", &uri, json!({})))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        assert_eq!(grader.calls(), 1);

        let second = app
            .oneshot(json_request("POST", &uri, json!({})))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::OK);
        let json = get_json_body(second).await;
        assert_eq!(json["data"]["status"], "graded");
        // The backend was not called again.
        assert_eq!(grader.calls(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn force_regrade_overwrites_the_result() {
        let (app, state, grader) = make_test_app().await;
        let (_student, submission) =
            seed_pending_submission(state.db(), "pam@test.com").await;
        let uri = format!("/api/homework/submissions/{}/grade", submission.id);

        grader.push_grade(60.0, &["fractions"]);
        let first = app
            .clone()
            .oneshot(json_request("POST", &uri, json!({})))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        grader.push_grade(88.0, &["geometry"]);
        let regrade = app
            .oneshot(json_request("POST", &format!("{}?force=true", uri), json!({})))
            .await
            .unwrap();
        assert_eq!(regrade.status(), StatusCode::OK);
        let json = get_json_body(regrade).await;
        assert_eq!(json["data"]["grading"]["score"], 88.0);
        assert_eq!(grader.calls(), 2);

        // Still exactly one result row, overwritten in place.
        let stored = grading_result::Model::for_submission(state.db(), submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.score, 88.0);
    }

    #[tokio::test]
    #[serial]
    async fn grading_an_unknown_submission_is_not_found() {
        let (app, _state, _grader) = make_test_app().await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/homework/submissions/999/grade",
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn concurrent_dispatches_settle_on_graded() {
        let (_app, state, grader) = make_test_app().await;
        let (_student, submission) =
            seed_pending_submission(state.db(), "quin@test.com").await;
        grader.push_grade(70.0, &["fractions"]);
        grader.push_grade(75.0, &["fractions"]);

        let db = state.db_clone();
        let (a, b) = futures::join!(
            grading::dispatch(&db, grader.as_ref(), submission.id, false),
            grading::dispatch(&db, grader.as_ref(), submission.id, false),
        );
        assert!(a.is_ok());
        assert!(b.is_ok());

        let stored = homework_submission::Model::find_by_id(state.db(), submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            stored.status,
            homework_submission::SubmissionStatus::Graded
        );
        // Exactly one result row survives, whichever attempt wrote last.
        let result = grading_result::Model::for_submission(state.db(), submission.id)
            .await
            .unwrap()
            .unwrap();
        assert!(result.score == 70.0 || result.score == 75.0);
    }
}
