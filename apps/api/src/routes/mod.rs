pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};

use crate::form::handlers as form;
use crate::script::handlers as script;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let upload_limit = state.config.max_upload_bytes;

    Router::new()
        .route("/health", get(health::health_handler))
        // Form state
        .route(
            "/api/v1/form",
            get(form::handle_get_form).delete(form::handle_reset_form),
        )
        // Attachments
        .route(
            "/api/v1/attachments",
            post(form::handle_upload)
                .put(form::handle_replace)
                .delete(form::handle_clear_attachments),
        )
        .route(
            "/api/v1/attachments/:handle",
            delete(form::handle_remove_attachment),
        )
        .route(
            "/api/v1/attachments/:handle/preview",
            get(form::handle_preview),
        )
        // Scripts
        .route("/api/v1/scripts/generate", post(script::handle_generate))
        .route("/api/v1/scripts/current", get(script::handle_current))
        .route(
            "/api/v1/scripts/current/text",
            get(script::handle_current_text),
        )
        .route("/api/v1/scripts/current/pdf", get(script::handle_current_pdf))
        .layer(DefaultBodyLimit::max(upload_limit))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::{
        body::{to_bytes, Body},
        http::{header, Request, StatusCode},
        response::Response,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::config::Config;
    use crate::errors::INPUT_MISSING_MESSAGE;
    use crate::form::FormSession;
    use crate::layout::default_page_config;
    use crate::llm_client::stub::StubModel;
    use crate::script::models::tests::sample_script_json;

    fn test_state(model: StubModel) -> AppState {
        AppState {
            llm: Arc::new(model),
            config: Config {
                gemini_api_key: "test-key".to_string(),
                port: 0,
                rust_log: "debug".to_string(),
                max_upload_bytes: 1024 * 1024,
            },
            page_config: default_page_config(),
            form: Arc::new(FormSession::new()),
        }
    }

    async fn send(app: &Router, request: Request<Body>) -> Response {
        app.clone().oneshot(request).await.unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn generate_request(topic: &str) -> Request<Body> {
        Request::post("/api/v1/scripts/generate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json!({ "topic": topic }).to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let app = build_router(test_state(StubModel::replying("")));
        let response = send(&app, Request::get("/health").body(Body::empty()).unwrap()).await;

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["service"], "guion-api");
    }

    #[tokio::test]
    async fn test_generate_without_input_is_bad_request() {
        let app = build_router(test_state(StubModel::replying("")));
        let response = send(&app, generate_request("")).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "INPUT_MISSING");
        assert_eq!(body["error"]["message"], INPUT_MISSING_MESSAGE);
    }

    #[tokio::test]
    async fn test_generate_failure_is_bad_gateway() {
        let app = build_router(test_state(StubModel::failing(500)));
        let response = send(&app, generate_request("ruido")).await;
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }

    #[tokio::test]
    async fn test_generate_then_download_pdf() {
        let app = build_router(test_state(StubModel::replying(
            sample_script_json().to_string(),
        )));

        let response = send(&app, generate_request("El ruido urbano")).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            json_body(response).await["titulo"],
            "El Ruido Urbano: Cómo Nos Afecta"
        );

        let text = send(
            &app,
            Request::get("/api/v1/scripts/current/text")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(text.status(), StatusCode::OK);

        let pdf = send(
            &app,
            Request::get("/api/v1/scripts/current/pdf")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(pdf.status(), StatusCode::OK);
        assert_eq!(pdf.headers()[header::CONTENT_TYPE], "application/pdf");
        assert_eq!(
            pdf.headers()[header::CONTENT_DISPOSITION],
            "attachment; filename=\"guion_el_ruido_urbano__c_mo_nos_afecta.pdf\""
        );
        let bytes = to_bytes(pdf.into_body(), usize::MAX).await.unwrap();
        assert!(lopdf::Document::load_mem(&bytes).is_ok());
    }

    #[tokio::test]
    async fn test_current_pdf_without_script_is_not_found() {
        let app = build_router(test_state(StubModel::replying("")));
        let response = send(
            &app,
            Request::get("/api/v1/scripts/current/pdf")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_upload_preview_and_remove_attachment() {
        let app = build_router(test_state(StubModel::replying("")));
        let multipart = "--XBOUNDARY\r\n\
            Content-Disposition: form-data; name=\"files\"; filename=\"nota.txt\"\r\n\
            Content-Type: text/plain\r\n\r\n\
            hola\r\n\
            --XBOUNDARY--\r\n";

        let response = send(
            &app,
            Request::post("/api/v1/attachments")
                .header(
                    header::CONTENT_TYPE,
                    "multipart/form-data; boundary=XBOUNDARY",
                )
                .body(Body::from(multipart))
                .unwrap(),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let added = json_body(response).await;
        assert_eq!(added[0]["name"], "nota.txt");
        assert_eq!(added[0]["mime_type"], "text/plain");
        let handle = added[0]["preview"].as_str().unwrap().to_string();

        let preview = send(
            &app,
            Request::get(format!("/api/v1/attachments/{handle}/preview"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(preview.status(), StatusCode::OK);
        assert_eq!(preview.headers()[header::CONTENT_TYPE], "text/plain");
        let bytes = to_bytes(preview.into_body(), usize::MAX).await.unwrap();
        assert_eq!(bytes.as_ref(), b"hola");

        let removed = send(
            &app,
            Request::delete(format!("/api/v1/attachments/{handle}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(removed.status(), StatusCode::NO_CONTENT);

        let again = send(
            &app,
            Request::delete(format!("/api/v1/attachments/{handle}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(again.status(), StatusCode::NOT_FOUND);

        let form = send(&app, Request::get("/api/v1/form").body(Body::empty()).unwrap()).await;
        assert_eq!(json_body(form).await["attachments"], json!([]));
    }
}
