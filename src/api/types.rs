// Cloudflare API response types.
// Every v4 response is wrapped in the same envelope: success flag, errors,
// messages, result, and optional pagination info.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Standard Cloudflare v4 response envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<ApiMessage>,
    #[serde(default)]
    pub messages: Vec<ApiMessage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_info: Option<ResultInfo>,
}

/// An error or informational entry in the envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<i64>,
    pub message: String,
}

/// Pagination block accompanying list results.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_count: Option<u64>,
}

impl ApiEnvelope {
    /// Minimal success envelope for responses with an empty body.
    pub fn empty_success() -> Self {
        Self {
            success: true,
            errors: Vec::new(),
            messages: Vec::new(),
            result: None,
            result_info: None,
        }
    }

    /// Synthesized failure envelope for responses that are not envelopes.
    pub fn failure(code: Option<i64>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            errors: vec![ApiMessage {
                code,
                message: message.into(),
            }],
            messages: Vec::new(),
            result: None,
            result_info: None,
        }
    }
}
