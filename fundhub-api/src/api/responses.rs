//! API response types

use serde::{Deserialize, Serialize};

/// Envelope for successful responses: `{ "success": true, "data": ... }`
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Error response: `{ "success": false, "error": "<message>" }`
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
        }
    }
}

/// Records of a fund, optionally narrowed to one investor
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvestmentHistory<T> {
    pub fund_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub investor: Option<String>,
    pub investments: Vec<T>,
    pub total: usize,
}
