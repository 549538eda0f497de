//! Error envelope middleware.
//!
//! Handlers only know the error code and message; the originating request
//! path and the timestamp are stamped here, once, for every error response.

use api_types::envelope::{ErrorBody, ErrorResponse};
use axum::{
    Json,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

pub(crate) async fn stamp(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let response = next.run(request).await;

    let Some(body) = response.extensions().get::<ErrorBody>().cloned() else {
        return response;
    };

    let status = response.status();
    let envelope = ErrorResponse {
        error: body,
        timestamp: Utc::now().to_rfc3339(),
        path,
    };
    (status, Json(envelope)).into_response()
}
