// src/types/response.rs
//! `{success, message?, ...}` envelope decoding

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ClientError;
use crate::types::user::User;

/// Decoded envelope: either the typed payload or the server's refusal.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiResponse<T> {
    Ok(T),
    Err { message: Option<String> },
}

impl<T: DeserializeOwned> ApiResponse<T> {
    /// Decode a response body. The payload type reads its fields from the whole
    /// envelope object, so `data`, `pagination`, `token` etc. sit next to `success`.
    pub fn decode(body: &str) -> Result<Self, ClientError> {
        let value: Value = serde_json::from_str(body)
            .map_err(|e| ClientError::Decode(format!("body is not JSON: {}", e)))?;

        let (success, message) = {
            let object = value
                .as_object()
                .ok_or_else(|| ClientError::Decode("body is not a JSON object".to_string()))?;
            let success = object
                .get("success")
                .and_then(Value::as_bool)
                .ok_or_else(|| {
                    ClientError::Decode("missing boolean `success` field".to_string())
                })?;
            let message = object
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string);
            (success, message)
        };

        if !success {
            return Ok(ApiResponse::Err { message });
        }

        serde_json::from_value(value)
            .map(ApiResponse::Ok)
            .map_err(|e| ClientError::Decode(format!("payload does not match: {}", e)))
    }
}

impl<T> ApiResponse<T> {
    pub fn into_result(self) -> Result<T, ClientError> {
        match self {
            ApiResponse::Ok(payload) => Ok(payload),
            ApiResponse::Err { message } => Err(ClientError::Rejected { message }),
        }
    }
}

/// `data: [...]` with optional pagination; a null or missing list reads as empty.
#[derive(Debug, Clone, Deserialize)]
pub struct ListPayload<T> {
    pub data: Option<Vec<T>>,
    pub pagination: Option<PaginationInfo>,
}

impl<T> ListPayload<T> {
    pub fn items(self) -> Vec<T> {
        self.data.unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaginationInfo {
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default, rename = "totalPages")]
    pub total_pages: Option<u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginPayload {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<User>,
    #[serde(default)]
    pub message: Option<String>,
}
