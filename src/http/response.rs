//! Turning relay outcomes into responses for the caller.
//!
//! - Relayed: backend body verbatim (or `Error: ...`), backend status or 200
//! - Status probe: fixed JSON payload, 200
//!
//! The `Content-Type: application/json` header is applied to every response
//! by the server's middleware stack, not here.

use axum::response::{IntoResponse, Response};

use crate::relay::{BackendResponse, Reply, STATUS_PAYLOAD};

impl IntoResponse for BackendResponse {
    fn into_response(self) -> Response {
        (self.caller_status(), self.caller_body()).into_response()
    }
}

impl IntoResponse for Reply {
    fn into_response(self) -> Response {
        match self {
            Reply::Status => STATUS_PAYLOAD.into_response(),
            Reply::Relayed(response) => response.into_response(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relay::RelayFailure;
    use axum::body::{to_bytes, Bytes};
    use axum::http::StatusCode;

    async fn body_of(response: Response) -> Bytes {
        to_bytes(response.into_body(), usize::MAX).await.unwrap()
    }

    #[tokio::test]
    async fn status_reply_is_fixed_payload() {
        let response = Reply::Status.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, r#"{"status": "Proxy Active"}"#);
    }

    #[tokio::test]
    async fn backend_status_and_body_are_mirrored() {
        let reply = Reply::Relayed(BackendResponse::delivered(
            StatusCode::UNPROCESSABLE_ENTITY,
            Bytes::from_static(b"{\"ok\":false}"),
        ));
        let response = reply.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body_of(response).await, "{\"ok\":false}");
    }

    #[tokio::test]
    async fn failure_becomes_error_text() {
        let reply = Reply::Relayed(BackendResponse::failed(RelayFailure::new(
            None,
            "operation timed out",
        )));
        let response = reply.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_of(response).await, "Error: operation timed out");
    }
}
