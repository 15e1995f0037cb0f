#[cfg(test)]
mod tests {
    use crate::helpers::app::{get_json_body, json_request, make_test_app};
    use crate::helpers::data::{seed_code, seed_student};
    use axum::http::StatusCode;
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    #[tokio::test]
    #[serial]
    async fn deactivate_then_reactivate_a_code() {
        let (app, state, _grader) = make_test_app().await;
        let student = seed_student(state.db(), "Fay", "fay@test.com", None).await;
        let code = seed_code(state.db(), student.id).await;
        let uri = format!("/api/attendance/codes/{}/active", code.code);
        let check_in = json!({ "code": code.code });

        let off = app
            .clone()
            .oneshot(json_request("PUT", &uri, json!({ "is_active": false })))
            .await
            .unwrap();
        assert_eq!(off.status(), StatusCode::OK);
        assert_eq!(get_json_body(off).await["data"]["is_active"], false);

        let blocked = app
            .clone()
            .oneshot(json_request("POST", "/api/attendance/check-in", check_in.clone()))
            .await
            .unwrap();
        assert_eq!(blocked.status(), StatusCode::FORBIDDEN);

        // Reactivating restores the same code value.
        let on = app
            .clone()
            .oneshot(json_request("PUT", &uri, json!({ "is_active": true })))
            .await
            .unwrap();
        assert_eq!(on.status(), StatusCode::OK);
        let on_json = get_json_body(on).await;
        assert_eq!(on_json["data"]["is_active"], true);
        assert_eq!(on_json["data"]["code"], code.code.as_str());

        let allowed = app
            .oneshot(json_request("POST", "/api/attendance/check-in", check_in))
            .await
            .unwrap();
        assert_eq!(allowed.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    #[serial]
    async fn set_active_on_unknown_code_is_not_found() {
        let (app, _state, _grader) = make_test_app().await;

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/attendance/codes/000000/active",
                json!({ "is_active": false }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
