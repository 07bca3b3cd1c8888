//! Request extractors whose rejections speak the API's error dialect.

use axum::extract::rejection::JsonRejection;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::error::AppError;

/// JSON body extractor.
///
/// The stock `axum::Json` rejects a missing field or malformed body with
/// 422; clients of this API get the same 400 `{"message": "..."}` shape as
/// every other input error, so the rejection is routed through [`AppError`].
/// Also usable as a response body, so handlers need only this one `Json`.
#[derive(Debug, axum::extract::FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct Json<T>(pub T);

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        Self::BadRequest(rejection.body_text())
    }
}

impl<T: Serialize> IntoResponse for Json<T> {
    fn into_response(self) -> Response {
        axum::Json(self.0).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use axum::routing::post;
    use serde::Deserialize;
    use tower::ServiceExt;

    use super::Json;

    #[derive(Deserialize)]
    struct EchoRequest {
        message: String,
    }

    async fn echo(Json(body): Json<EchoRequest>) -> Json<serde_json::Value> {
        Json(serde_json::json!({ "echo": body.message }))
    }

    fn app() -> Router {
        Router::new().route("/", post(echo))
    }

    fn request(body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_owned()))
            .expect("request")
    }

    #[tokio::test]
    async fn test_missing_field_is_bad_request_with_message_body() {
        let response = app().oneshot(request("{}")).await.expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json error body");
        assert!(value.get("message").is_some());
    }

    #[tokio::test]
    async fn test_malformed_body_is_bad_request() {
        let response = app()
            .oneshot(request("{not even json"))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_complete_body_passes_through() {
        let response = app()
            .oneshot(request(r#"{"message": "hello"}"#))
            .await
            .expect("response");
        assert_eq!(response.status(), StatusCode::OK);
    }
}
