pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::chat::handlers as chat;
use crate::market::handlers as market;
use crate::recruit::handlers as recruit;
use crate::state::AppState;

/// Upper bound for one multipart upload request.
const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Market-query assistant
        .route("/api/v1/market/query", post(market::handle_query))
        .route("/api/v1/market/classify", post(market::handle_classify))
        // Recruiting assistant
        .route(
            "/api/v1/recruit/cvs",
            post(recruit::handle_upload).layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/api/v1/recruit/embed", post(recruit::handle_embed))
        .route("/api/v1/recruit/search", post(recruit::handle_search))
        .route("/api/v1/recruit/cvs/:file_name", get(recruit::handle_view))
        .route(
            "/api/v1/recruit/cvs/:file_name/download",
            get(recruit::handle_download),
        )
        .route(
            "/api/v1/recruit/cvs/:file_name/summary",
            post(recruit::handle_summary),
        )
        .route(
            "/api/v1/recruit/cvs/:file_name/ask",
            post(recruit::handle_ask),
        )
        .route(
            "/api/v1/recruit/cvs/:file_name/email",
            post(recruit::handle_email),
        )
        // Chat front-end
        .route("/api/v1/chat/models", get(chat::handle_models))
        .route("/api/v1/chat/sessions", post(chat::handle_create_session))
        .route(
            "/api/v1/chat/sessions/:id",
            get(chat::handle_transcript).delete(chat::handle_close),
        )
        .route(
            "/api/v1/chat/sessions/:id/messages",
            post(chat::handle_send).delete(chat::handle_clear),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::chat::ollama::testing::EchoBackend;
    use crate::chat::ChatHub;
    use crate::config::{ChunkingConfig, Config};
    use crate::llm_client::testing::ScriptedModel;
    use crate::market::intent::MarkerParser;
    use crate::market::{MarketDataClient, MarketDesk};
    use crate::recruit::extract::fixtures::docx_bytes;
    use crate::recruit::testing::desk_with;

    const UNREACHABLE: &str = "http://127.0.0.1:9";

    fn app(llm_reply: &str) -> (tempfile::TempDir, Router) {
        let llm = Arc::new(ScriptedModel::replying(llm_reply));
        let (root, recruit) = desk_with(llm.clone());
        let config = Config {
            alpha_vantage_api_key: "demo".to_string(),
            alpha_vantage_base_url: UNREACHABLE.to_string(),
            openai_api_key: "test".to_string(),
            openai_base_url: UNREACHABLE.to_string(),
            ollama_url: UNREACHABLE.to_string(),
            qdrant_url: UNREACHABLE.to_string(),
            qdrant_collection: "cv_embeddings".to_string(),
            dirs: recruit.workspace.dirs().clone(),
            chunking: ChunkingConfig::default(),
            smtp: None,
            port: 0,
            rust_log: "info".to_string(),
        };
        let market = MarketDesk {
            llm,
            data: MarketDataClient::new("demo".to_string(), UNREACHABLE.to_string()).unwrap(),
            parser: Arc::new(MarkerParser),
        };
        let state = AppState {
            config: Arc::new(config),
            market: Arc::new(market),
            recruit: Arc::new(recruit),
            chat: Arc::new(ChatHub::new(Arc::new(EchoBackend::default()))),
        };
        (root, build_router(state))
    }

    fn json_request(method: Method, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn multipart_upload(file_name: &str, bytes: &[u8]) -> Request<Body> {
        let boundary = "assist-test-boundary";
        let mut body = format!(
            "--{boundary}\r\nContent-Disposition: form-data; name=\"files\"; filename=\"{file_name}\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n"
        )
        .into_bytes();
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());
        Request::builder()
            .method(Method::POST)
            .uri("/api/v1/recruit/cvs")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={boundary}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_health() {
        let (_root, router) = app("");
        let request = Request::get("/health").body(Body::empty()).unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["service"], "assist-api");
        assert_eq!(body["mail_configured"], false);
    }

    #[tokio::test]
    async fn test_empty_market_query_is_rejected() {
        let (_root, router) = app("");
        let (status, body) = send(
            &router,
            json_request(Method::POST, "/api/v1/market/query", json!({"query": "  "})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Please enter a query.");
    }

    #[tokio::test]
    async fn test_general_query_is_answered_without_market_data() {
        let (_root, router) = app("Category: General Query");
        let (status, body) = send(
            &router,
            json_request(
                Method::POST,
                "/api/v1/market/query",
                json!({"query": "What is the capital of France?"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["intent"]["category"], "general");
        assert_eq!(body["answer"]["kind"], "general");
    }

    #[tokio::test]
    async fn test_upload_view_and_download_a_cv() {
        let (_root, router) = app("");
        let cv = docx_bytes(&["Jane Doe", "jane@example.com"]);

        let (status, body) = send(&router, multipart_upload("jane.docx", &cv)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["stored"], json!(["jane.docx"]));

        let view = Request::get("/api/v1/recruit/cvs/jane.docx")
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, view).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["content"], "Jane Doe\njane@example.com");
        assert_eq!(body["email"]["to"], "jane@example.com");

        let download = Request::get("/api/v1/recruit/cvs/jane.docx/download")
            .body(Body::empty())
            .unwrap();
        let response = router.clone().oneshot(download).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        );
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(bytes.as_ref(), cv.as_slice());
    }

    #[tokio::test]
    async fn test_upload_of_unsupported_type_is_rejected() {
        let (_root, router) = app("");
        let (status, _) = send(&router, multipart_upload("notes.txt", b"hello")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_email_requires_subject_and_body() {
        let (_root, router) = app("");
        let (status, body) = send(
            &router,
            json_request(
                Method::POST,
                "/api/v1/recruit/cvs/jane.docx/email",
                json!({"subject": "", "body": "Hi"}),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"]["message"],
            "Please fill in both the subject and body of the email."
        );
    }

    #[tokio::test]
    async fn test_chat_session_round_trip() {
        let (_root, router) = app("");
        let (status, created) = send(
            &router,
            json_request(Method::POST, "/api/v1/chat/sessions", json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["model"], "llama3.2");
        let id = created["id"].as_str().unwrap().to_string();
        let messages = format!("/api/v1/chat/sessions/{id}/messages");

        let (status, body) = send(
            &router,
            json_request(Method::POST, &messages, json!({"message": ""})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"]["message"], "Please enter a message.");

        let (status, turn) = send(
            &router,
            json_request(Method::POST, &messages, json!({"message": "Hi"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(turn["display"], "echo: Hi");

        let transcript = Request::get(format!("/api/v1/chat/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (_, body) = send(&router, transcript).await;
        assert_eq!(body["transcript"], json!(["You: Hi", "AI: echo: Hi"]));

        let clear = Request::delete(&messages).body(Body::empty()).unwrap();
        let (status, body) = send(&router, clear).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["history"], json!([]));

        let close = Request::delete(format!("/api/v1/chat/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, _) = send(&router, close).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let gone = Request::get(format!("/api/v1/chat/sessions/{id}"))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, gone).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_unknown_chat_session_is_404() {
        let (_root, router) = app("");
        let request = Request::get(format!("/api/v1/chat/sessions/{}", uuid::Uuid::new_v4()))
            .body(Body::empty())
            .unwrap();
        let (status, body) = send(&router, request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }
}
