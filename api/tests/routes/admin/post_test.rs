#[cfg(test)]
mod tests {
    use crate::helpers::app::{
        ScriptedOutcome, get_json_body, json_request, make_test_app,
    };
    use crate::helpers::data::{seed_code, seed_event, seed_pending_submission, seed_student};
    use axum::http::StatusCode;
    use db::models::{attendance_code, attendance_event, homework_submission, user};
    use sea_orm::EntityTrait;
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    #[tokio::test]
    #[serial]
    async fn reconcile_with_nothing_stuck_is_empty() {
        let (app, _state, _grader) = make_test_app().await;

        let response = app
            .oneshot(json_request("POST", "/api/admin/reconcile", json!({})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["data"]["processed"], 0);
        assert_eq!(json["data"]["succeeded"], 0);
        assert_eq!(json["data"]["failed"], 0);
    }

    #[tokio::test]
    #[serial]
    async fn reconcile_regrades_a_failed_submission() {
        let (app, state, grader) = make_test_app().await;
        let (_student, submission) =
            seed_pending_submission(state.db(), "xan@test.com").await;

        // First attempt fails against the external service.
        grader.push(ScriptedOutcome::Timeout);
        let failed = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/homework/submissions/{}/grade", submission.id),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(failed.status(), StatusCode::BAD_GATEWAY);

        grader.push_grade(73.0, &["fractions"]);
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/admin/reconcile",
                json!({ "older_than_minutes": 0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["data"]["processed"], 1);
        assert_eq!(json["data"]["succeeded"], 1);
        assert_eq!(json["data"]["failed"], 0);

        let stored = homework_submission::Model::find_by_id(state.db(), submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, homework_submission::SubmissionStatus::Graded);
        assert_eq!(stored.attempts, 2);
    }

    #[tokio::test]
    #[serial]
    async fn reconcile_sweeps_stale_pending_submissions() {
        let (app, state, _grader) = make_test_app().await;
        let (_student, submission) =
            seed_pending_submission(state.db(), "yan@test.com").await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/admin/reconcile",
                json!({ "older_than_minutes": 0 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["data"]["processed"], 1);
        assert_eq!(json["data"]["succeeded"], 1);

        let stored = homework_submission::Model::find_by_id(state.db(), submission.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, homework_submission::SubmissionStatus::Graded);
    }

    #[tokio::test]
    #[serial]
    async fn reconcile_respects_the_retry_budget() {
        let (app, state, grader) = make_test_app().await;
        let (_student, submission) =
            seed_pending_submission(state.db(), "zed@test.com").await;

        grader.push(ScriptedOutcome::Timeout);
        let failed = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/homework/submissions/{}/grade", submission.id),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(failed.status(), StatusCode::BAD_GATEWAY);

        // attempts == 1 already, so a budget of 1 excludes it.
        let response = app
            .oneshot(json_request(
                "POST",
                "/api/admin/reconcile",
                json!({ "older_than_minutes": 0, "max_retries": 1 }),
            ))
            .await
            .unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["processed"], 0);
        assert_eq!(grader.calls(), 1);
    }

    #[tokio::test]
    #[serial]
    async fn cleanup_deactivates_codes_of_deleted_students() {
        let (app, state, _grader) = make_test_app().await;
        let student = seed_student(state.db(), "Ana", "ana@test.com", None).await;
        let code = seed_code(state.db(), student.id).await;
        let event = seed_event(state.db(), student.id).await;

        user::Entity::delete_by_id(student.id)
            .exec(state.db())
            .await
            .unwrap();

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/admin/attendance-codes/cleanup",
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["deactivated"], 1);

        // The code no longer admits check-ins...
        let blocked = app
            .oneshot(json_request(
                "POST",
                "/api/attendance/check-in",
                json!({ "code": code.code }),
            ))
            .await
            .unwrap();
        assert_eq!(blocked.status(), StatusCode::FORBIDDEN);

        // ...but the historical event is untouched.
        let kept = attendance_event::Model::find_by_id(state.db(), event.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(kept.code, code.code);
    }

    #[tokio::test]
    #[serial]
    async fn cleanup_leaves_codes_of_existing_students_alone() {
        let (app, state, _grader) = make_test_app().await;
        let student = seed_student(state.db(), "Ben", "ben@test.com", None).await;
        let code = seed_code(state.db(), student.id).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/admin/attendance-codes/cleanup",
                json!({}),
            ))
            .await
            .unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["deactivated"], 0);

        let kept = attendance_code::Model::find_by_code(state.db(), &code.code)
            .await
            .unwrap()
            .unwrap();
        assert!(kept.is_active);
    }
}
