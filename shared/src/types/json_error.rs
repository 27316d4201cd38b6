use serde::{Deserialize, Serialize};

/// Standard error response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub code: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            status: "error".to_string(),
            code: code.to_string(),
            message: message.to_string(),
        }
    }

    /// Body sent for every credential failure on a protected path.
    pub fn login_required() -> Self {
        Self::new("LOGIN_REQUIRED", "Please log in first")
    }
}
