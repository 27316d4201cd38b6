use serde::{Deserialize, Serialize};

/// `{msg, code, data}` envelope returned by the application routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiReply<T> {
    pub msg: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiReply<T> {
    pub fn ok(msg: &str, data: T) -> Self {
        Self {
            msg: msg.to_string(),
            code: 200,
            data: Some(data),
        }
    }
}

impl ApiReply<()> {
    /// Envelope without a `data` field.
    pub fn message(msg: &str, code: u16) -> Self {
        Self {
            msg: msg.to_string(),
            code,
            data: None,
        }
    }
}
