// Request extractors that report rejections through ApiError
//
// axum's own Json, Path and Query reject with a plain-text body. These
// wrappers run the same extraction and turn the rejection into the
// `{ok:false, message}` failure envelope.

use axum::extract::{FromRequest, FromRequestParts};

use crate::error::ApiError;

/// JSON request body
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct AppJson<T>(pub T);

/// Typed path parameters
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct AppPath<T>(pub T);

/// Typed query string
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct AppQuery<T>(pub T);

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::StatusCode,
        routing::{get, post},
        Json, Router,
    };
    use axum_test::TestServer;
    use serde::Deserialize;
    use serde_json::{json, Value};

    #[derive(Debug, Deserialize)]
    struct Contact {
        name: String,
    }

    #[derive(Debug, Deserialize)]
    struct Line {
        quantity: u32,
    }

    #[derive(Debug, Deserialize)]
    struct Listing {
        page: Option<u32>,
    }

    async fn echo_contact(AppJson(contact): AppJson<Contact>) -> Json<Value> {
        Json(json!({ "ok": true, "name": contact.name }))
    }

    async fn echo_line(AppPath(id): AppPath<i32>, AppJson(line): AppJson<Line>) -> Json<Value> {
        Json(json!({ "ok": true, "id": id, "quantity": line.quantity }))
    }

    async fn echo_listing(AppQuery(listing): AppQuery<Listing>) -> Json<Value> {
        Json(json!({ "ok": true, "page": listing.page }))
    }

    fn create_test_app() -> TestServer {
        let app = Router::new()
            .route("/contacts", post(echo_contact))
            .route("/lines/:id", post(echo_line))
            .route("/listing", get(echo_listing));
        TestServer::new(app).unwrap()
    }

    fn assert_failure_envelope(body: &Value) {
        assert_eq!(body["ok"], json!(false));
        assert!(body["message"].as_str().is_some_and(|m| !m.is_empty()));
    }

    #[tokio::test]
    async fn test_valid_requests_pass_through() {
        let server = create_test_app();

        let response = server.post("/contacts").json(&json!({ "name": "Ana" })).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["name"], json!("Ana"));

        let response = server.post("/lines/7").json(&json!({ "quantity": 3 })).await;
        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.json::<Value>()["id"], json!(7));

        let response = server.get("/listing").add_query_param("page", 2).await;
        assert_eq!(response.json::<Value>()["page"], json!(2));
    }

    #[tokio::test]
    async fn test_missing_body_field_uses_failure_envelope() {
        let server = create_test_app();

        let response = server.post("/contacts").json(&json!({ "items": [] })).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        let body = response.json::<Value>();
        assert_failure_envelope(&body);
        assert!(body["message"].as_str().unwrap().contains("name"));
    }

    #[tokio::test]
    async fn test_malformed_json_uses_failure_envelope() {
        let server = create_test_app();

        let response = server
            .post("/contacts")
            .text("{\"name\": ")
            .content_type("application/json")
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_failure_envelope(&response.json::<Value>());
    }

    #[tokio::test]
    async fn test_missing_content_type_uses_failure_envelope() {
        let server = create_test_app();

        let response = server.post("/contacts").text("{\"name\": \"Ana\"}").await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_failure_envelope(&response.json::<Value>());
    }

    #[tokio::test]
    async fn test_non_integer_path_uses_failure_envelope() {
        let server = create_test_app();

        let response = server.post("/lines/abc").json(&json!({ "quantity": 1 })).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_failure_envelope(&response.json::<Value>());
    }

    #[tokio::test]
    async fn test_bad_query_string_uses_failure_envelope() {
        let server = create_test_app();

        let response = server.get("/listing").add_query_param("page", "first").await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_failure_envelope(&response.json::<Value>());
    }
}
