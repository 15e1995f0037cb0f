#[cfg(test)]
mod tests {
    use crate::helpers::app::{get_json_body, json_request, make_test_app};
    use crate::helpers::data::{seed_class, seed_code, seed_student};
    use axum::http::StatusCode;
    use db::models::attendance_code;
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;
    use util::config::AppConfig;

    #[tokio::test]
    #[serial]
    async fn issue_code_is_idempotent() {
        let (app, state, _grader) = make_test_app().await;
        let student = seed_student(state.db(), "Alice", "alice@test.com", None).await;

        let body = json!({ "student_id": student.id });
        let first = app
            .clone()
            .oneshot(json_request("POST", "/api/attendance/codes", body.clone()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);
        let first_json = get_json_body(first).await;
        assert_eq!(first_json["success"], true);

        let code = first_json["data"]["code"].as_str().unwrap().to_string();
        assert_eq!(code.len(), 6);
        let value: u32 = code.parse().unwrap();
        assert!((100_000..=999_999).contains(&value));
        assert_eq!(first_json["data"]["is_active"], true);

        // A second issue for the same student returns the same code.
        let second = app
            .oneshot(json_request("POST", "/api/attendance/codes", body))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::OK);
        let second_json = get_json_body(second).await;
        assert_eq!(second_json["data"]["code"], code.as_str());
    }

    #[tokio::test]
    #[serial]
    async fn issue_code_for_unknown_student_is_not_found() {
        let (app, _state, _grader) = make_test_app().await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/attendance/codes",
                json!({ "student_id": 999 }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = get_json_body(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "Student not found");
    }

    #[tokio::test]
    #[serial]
    async fn check_in_creates_an_event() {
        let (app, state, _grader) = make_test_app().await;
        // Class that has not started yet, so the check-in counts as present.
        let class = seed_class(state.db(), "Math A", "23:59").await;
        let student =
            seed_student(state.db(), "Bob", "bob@test.com", Some(class.id)).await;
        let code = seed_code(state.db(), student.id).await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/attendance/check-in",
                json!({ "code": code.code }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);

        let json = get_json_body(response).await;
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["student_id"], student.id);
        assert_eq!(json["data"]["status"], "present");
        assert_eq!(json["data"]["class_id"], class.id);
    }

    #[tokio::test]
    #[serial]
    async fn check_in_with_unknown_code_is_not_found() {
        let (app, _state, _grader) = make_test_app().await;

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/attendance/check-in",
                json!({ "code": "000000" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Attendance code not found");
    }

    #[tokio::test]
    #[serial]
    async fn check_in_with_deactivated_code_is_forbidden() {
        let (app, state, _grader) = make_test_app().await;
        let student = seed_student(state.db(), "Cara", "cara@test.com", None).await;
        let code = seed_code(state.db(), student.id).await;
        attendance_code::Model::set_active_by_code(state.db(), &code.code, false)
            .await
            .unwrap();

        let response = app
            .oneshot(json_request(
                "POST",
                "/api/attendance/check-in",
                json!({ "code": code.code }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        let json = get_json_body(response).await;
        assert_eq!(json["message"], "Attendance code is deactivated");
    }

    #[tokio::test]
    #[serial]
    async fn repeat_check_in_appends_a_new_event() {
        let (app, state, _grader) = make_test_app().await;
        let student = seed_student(state.db(), "Dan", "dan@test.com", None).await;
        let code = seed_code(state.db(), student.id).await;
        let body = json!({ "code": code.code });

        let first = app
            .clone()
            .oneshot(json_request("POST", "/api/attendance/check-in", body.clone()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);
        let first_id = get_json_body(first).await["data"]["id"].as_i64().unwrap();

        let second = app
            .oneshot(json_request("POST", "/api/attendance/check-in", body))
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::CREATED);
        let second_id = get_json_body(second).await["data"]["id"].as_i64().unwrap();

        assert_ne!(first_id, second_id);
    }

    #[tokio::test]
    #[serial]
    async fn check_in_within_cooldown_conflicts() {
        let (app, state, _grader) = make_test_app().await;
        let student = seed_student(state.db(), "Eve", "eve@test.com", None).await;
        let code = seed_code(state.db(), student.id).await;
        let body = json!({ "code": code.code });

        AppConfig::override_with(|c| c.checkin_cooldown_seconds = 3600);

        let first = app
            .clone()
            .oneshot(json_request("POST", "/api/attendance/check-in", body.clone()))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = app
            .oneshot(json_request("POST", "/api/attendance/check-in", body))
            .await
            .unwrap();

        AppConfig::reset();
        assert_eq!(second.status(), StatusCode::CONFLICT);
    }
}
