/**
 * Error Conversion
 *
 * This module turns an `ApiError` into an HTTP response so handlers can
 * return `Result<_, ApiError>` directly.
 *
 * # Response Format
 *
 * Only the public facet of the error is written:
 * ```json
 * {
 *   "error": "Not found",
 *   "status": 404
 * }
 * ```
 *
 * Internal details and stack frames never leave the process this way.
 */

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::backend::error::types::ApiError;

/// JSON body written for every `ApiError`
#[derive(Debug, Serialize)]
pub struct ErrorBody<'a> {
    pub error: &'a str,
    pub status: u16,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.http_code();
        let body = ErrorBody {
            error: self.message(),
            status: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}
