pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::state::AppState;
use crate::wizard::handlers;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Form
        .route(
            "/api/v1/form",
            get(handlers::handle_get_form)
                .patch(handlers::handle_update_field)
                .delete(handlers::handle_reset_form),
        )
        .route("/api/v1/form/projects", post(handlers::handle_add_project))
        .route(
            "/api/v1/form/projects/:index",
            patch(handlers::handle_update_project).delete(handlers::handle_remove_project),
        )
        // Wizard
        .route("/api/v1/wizard", get(handlers::handle_get_wizard))
        .route("/api/v1/wizard/next", post(handlers::handle_next))
        .route("/api/v1/wizard/prev", post(handlers::handle_prev))
        .route("/api/v1/wizard/submit", post(handlers::handle_submit))
        // Result
        .route("/api/v1/result", get(handlers::handle_get_result))
        .route("/api/v1/result/copy", post(handlers::handle_copy_result))
        .route("/api/v1/result/export", post(handlers::handle_export_result))
        .route(
            "/api/v1/result/translate",
            post(handlers::handle_translate_result),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::llm_client::completion::testing::FakeGenerator;
    use crate::llm_client::TextGenerator;
    use crate::wizard::session::testing::{harness, Harness};

    async fn app(generator: Option<Arc<dyn TextGenerator>>) -> (Router, Harness) {
        let h = harness(generator).await;
        let state = AppState {
            session: h.session.clone(),
        };
        (build_router(state), h)
    }

    async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(json) => {
                request = request.header("content-type", "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };
        let response = app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let (app, _h) = app(None).await;
        let (status, body) = send(&app, "GET", "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "resume-wizard");
    }

    #[tokio::test]
    async fn test_field_updates_round_trip_through_the_api() {
        let (app, _h) = app(None).await;

        let (status, form) = send(
            &app,
            "PATCH",
            "/api/v1/form",
            Some(json!({"field": "name", "value": "Ana Silva"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(form["personalInfo"]["name"], "Ana Silva");

        let (_, form) = send(
            &app,
            "PATCH",
            "/api/v1/form",
            Some(json!({"field": "priority_skills", "value": "Go, PostgreSQL"})),
        )
        .await;
        assert_eq!(form["config"]["prioritySkills"], json!(["Go", "PostgreSQL"]));

        let (_, form) = send(&app, "GET", "/api/v1/form", None).await;
        assert_eq!(form["personalInfo"]["name"], "Ana Silva");
    }

    #[tokio::test]
    async fn test_unknown_field_is_rejected() {
        let (app, _h) = app(None).await;
        let (status, _) = send(
            &app,
            "PATCH",
            "/api/v1/form",
            Some(json!({"field": "salary", "value": "1"})),
        )
        .await;
        assert!(status.is_client_error());
    }

    #[tokio::test]
    async fn test_project_endpoints() {
        let (app, _h) = app(None).await;

        let (status, body) = send(&app, "POST", "/api/v1/form/projects", None).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["index"], 0);

        let (status, form) = send(
            &app,
            "PATCH",
            "/api/v1/form/projects/0",
            Some(json!({"field": "github_url", "value": "https://github.com/ana/ledger"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            form["userData"]["projects"][0]["githubUrl"],
            "https://github.com/ana/ledger"
        );

        let (status, body) = send(&app, "DELETE", "/api/v1/form/projects/7", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    }

    #[tokio::test]
    async fn test_wizard_navigation_clamps() {
        let (app, _h) = app(None).await;

        let (_, view) = send(&app, "POST", "/api/v1/wizard/prev", None).await;
        assert_eq!(view["currentStep"], 0);

        for _ in 0..7 {
            send(&app, "POST", "/api/v1/wizard/next", None).await;
        }
        let (status, view) = send(&app, "GET", "/api/v1/wizard", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(view["currentStep"], 4);
        assert_eq!(view["isLastStep"], true);
        assert_eq!(view["busy"], false);
        assert_eq!(view["steps"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_submit_before_last_step_is_rejected() {
        let (app, _h) = app(Some(Arc::new(FakeGenerator::replying(vec![Ok("# x")])))).await;
        let (status, _) = send(&app, "POST", "/api/v1/wizard/submit", None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_submit_without_credential_is_service_unavailable() {
        let (app, h) = app(None).await;
        h.session
            .update_field(crate::models::form::FieldUpdate::JobDescription("Go".into()))
            .await;
        crate::wizard::session::testing::walk_to_last_step(&h.session).await;

        let (status, body) = send(&app, "POST", "/api/v1/wizard/submit", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["error"]["code"], "CONFIGURATION_ERROR");
    }

    #[tokio::test]
    async fn test_generate_copy_and_export() {
        let fake = Arc::new(FakeGenerator::replying(vec![Ok("# Ana Silva\n\n- Go")]));
        let (app, h) = app(Some(fake)).await;
        send(
            &app,
            "PATCH",
            "/api/v1/form",
            Some(json!({"field": "job_description", "value": "Backend Engineer"})),
        )
        .await;
        crate::wizard::session::testing::walk_to_last_step(&h.session).await;

        let (status, rendered) = send(&app, "POST", "/api/v1/wizard/submit", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(rendered["result"]["markdown"], "# Ana Silva\n\n- Go");

        let (status, _) = send(&app, "POST", "/api/v1/result/copy", None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);
        assert_eq!(h.clipboard.copies.lock().unwrap().len(), 1);

        let (status, doc) = send(&app, "POST", "/api/v1/result/export", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(doc["pageCount"], 1);

        let (status, rendered) = send(&app, "GET", "/api/v1/result", None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(rendered["html"].as_str().unwrap().contains("<li>Go</li>"));
    }

    #[tokio::test]
    async fn test_result_actions_without_result_are_not_found() {
        let (app, _h) = app(None).await;
        for (method, uri) in [
            ("GET", "/api/v1/result"),
            ("POST", "/api/v1/result/copy"),
            ("POST", "/api/v1/result/export"),
        ] {
            let (status, body) = send(&app, method, uri, None).await;
            assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
            assert_eq!(body["error"]["code"], "NOT_FOUND");
        }
    }

    #[tokio::test]
    async fn test_reset_clears_form() {
        let (app, _h) = app(None).await;
        send(
            &app,
            "PATCH",
            "/api/v1/form",
            Some(json!({"field": "city", "value": "Recife"})),
        )
        .await;
        let (status, form) = send(&app, "DELETE", "/api/v1/form", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(form["personalInfo"]["location"]["city"], "");
    }
}
