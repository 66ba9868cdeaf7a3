use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// JSON error body. `redirect` carries the page a browser client should
/// navigate to (login or the plan catalog) instead of a server-side redirect.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect: Option<&'static str>,
}

pub fn error_response(
    status: StatusCode,
    message: String,
    redirect: Option<&'static str>,
) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message,
            redirect,
        }),
    )
        .into_response()
}
