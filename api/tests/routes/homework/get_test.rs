#[cfg(test)]
mod tests {
    use crate::helpers::app::{empty_request, get_json_body, json_request, make_test_app};
    use crate::helpers::data::{seed_event, seed_pending_submission, seed_student};
    use axum::http::StatusCode;
    use db::models::homework_submission;
    use serde_json::json;
    use serial_test::serial;
    use tower::ServiceExt;

    #[tokio::test]
    #[serial]
    async fn get_submission_returns_pending_without_grading() {
        let (app, state, _grader) = make_test_app().await;
        let (_student, submission) =
            seed_pending_submission(state.db(), "ray@test.com").await;

        let response = app
            .oneshot(empty_request(
                "GET",
                &format!("/api/homework/submissions/{}", submission.id),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["data"]["status"], "pending");
        assert!(json["data"].get("grading").is_none());
    }

    #[tokio::test]
    #[serial]
    async fn get_submission_includes_grading_once_graded() {
        let (app, state, grader) = make_test_app().await;
        let (_student, submission) =
            seed_pending_submission(state.db(), "sam@test.com").await;
        grader.push_grade(81.0, &["decimals"]);

        let graded = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/homework/submissions/{}/grade", submission.id),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(graded.status(), StatusCode::OK);

        let response = app
            .oneshot(empty_request(
                "GET",
                &format!("/api/homework/submissions/{}", submission.id),
            ))
            .await
            .unwrap();
        let json = get_json_body(response).await;
        assert_eq!(json["data"]["status"], "graded");
        assert_eq!(json["data"]["grading"]["score"], 81.0);
        assert_eq!(json["data"]["grading"]["suggestions"][0], "decimals");
    }

    #[tokio::test]
    #[serial]
    async fn get_unknown_submission_is_not_found() {
        let (app, _state, _grader) = make_test_app().await;

        let response = app
            .oneshot(empty_request("GET", "/api/homework/submissions/999"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn images_come_back_in_upload_order() {
        let (app, state, _grader) = make_test_app().await;
        let student = seed_student(state.db(), "Tess", "tess@test.com", None).await;
        let event = seed_event(state.db(), student.id).await;
        let submission = homework_submission::Model::create_with_images(
            state.db(),
            student.id,
            event.id,
            event.academy_id,
            &[
                "Zmlyc3Q=".to_string(),
                "c2Vjb25k".to_string(),
                "dGhpcmQ=".to_string(),
            ],
        )
        .await
        .unwrap();

        let response = app
            .oneshot(empty_request(
                "GET",
                &format!("/api/homework/submissions/{}/images", submission.id),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        assert_eq!(json["data"]["images"][0], "Zmlyc3Q=");
        assert_eq!(json["data"]["images"][1], "c2Vjb25k");
        assert_eq!(json["data"]["images"][2], "dGhpcmQ=");
    }

    #[tokio::test]
    #[serial]
    async fn history_lists_a_students_submissions_newest_first() {
        let (app, state, grader) = make_test_app().await;
        let student = seed_student(state.db(), "Uma", "uma@test.com", None).await;
        let event = seed_event(state.db(), student.id).await;

        let first = homework_submission::Model::create_with_images(
            state.db(),
            student.id,
            event.id,
            event.academy_id,
            &["b25l".to_string()],
        )
        .await
        .unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        let second = homework_submission::Model::create_with_images(
            state.db(),
            student.id,
            event.id,
            event.academy_id,
            &["dHdv".to_string()],
        )
        .await
        .unwrap();

        grader.push_grade(77.0, &["fractions"]);
        let graded = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/homework/submissions/{}/grade", first.id),
                json!({}),
            ))
            .await
            .unwrap();
        assert_eq!(graded.status(), StatusCode::OK);

        let response = app
            .oneshot(empty_request(
                "GET",
                &format!("/api/homework/students/{}/submissions", student.id),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = get_json_body(response).await;
        let history = json["data"].as_array().unwrap();
        assert_eq!(history.len(), 2);
        assert_eq!(history[0]["id"], second.id);
        assert_eq!(history[1]["id"], first.id);
        assert_eq!(history[1]["grading"]["score"], 77.0);
        assert!(history[0].get("grading").is_none());
    }
}
