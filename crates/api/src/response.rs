//! Success envelope shared by the JSON handlers.
//!
//! Responses look like `{ "success": true, "data": ... }`. The course list
//! endpoint is the one exception and returns a bare array, which the
//! frontend consumes directly.

use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}
