//! Request extractors whose rejections use the crate error body.

use axum::extract::{
    rejection::{FormRejection, JsonRejection, QueryRejection},
    FromRequest, FromRequestParts,
};

use crate::error::Error;

/// JSON request body; malformed or missing bodies become 400 `{"detail": ...}`.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Error))]
pub struct JsonBody<T>(pub T);

/// URL-encoded form body, as sent by OAuth2 password-flow clients.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Form), rejection(Error))]
pub struct FormBody<T>(pub T);

/// Query string; unparsable parameters become 400 `{"detail": ...}`.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Error))]
pub struct QueryParams<T>(pub T);

impl From<JsonRejection> for Error {
    fn from(rejection: JsonRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<FormRejection> for Error {
    fn from(rejection: FormRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for Error {
    fn from(rejection: QueryRejection) -> Self {
        Error::BadRequest(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::{to_bytes, Body},
        http::{Request, StatusCode},
        response::IntoResponse,
        routing::post,
        Router,
    };
    use serde::Deserialize;
    use tower::ServiceExt;

    #[derive(Deserialize)]
    struct Payload {
        #[allow(dead_code)]
        value: i32,
    }

    #[derive(Deserialize)]
    struct Params {
        #[allow(dead_code)]
        page: i64,
    }

    async fn body_handler(JsonBody(_): JsonBody<Payload>) -> impl IntoResponse {
        StatusCode::OK
    }

    async fn query_handler(QueryParams(_): QueryParams<Params>) -> impl IntoResponse {
        StatusCode::OK
    }

    fn app() -> Router {
        Router::new()
            .route("/body", post(body_handler))
            .route("/query", post(query_handler))
    }

    async fn detail(resp: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(resp.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn missing_content_type_is_a_json_400() {
        let resp = app()
            .oneshot(Request::post("/body").body(Body::from("{\"value\":1}")).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(detail(resp).await["detail"].is_string());
    }

    #[tokio::test]
    async fn schema_mismatch_is_a_json_400() {
        let resp = app()
            .oneshot(
                Request::post("/body")
                    .header("content-type", "application/json")
                    .body(Body::from("{\"value\":\"nope\"}"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(detail(resp).await["detail"].is_string());
    }

    #[tokio::test]
    async fn bad_query_is_a_json_400() {
        let resp = app()
            .oneshot(Request::post("/query?page=abc").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(detail(resp).await["detail"].is_string());

        let resp = app()
            .oneshot(Request::post("/query?page=2").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }
}
