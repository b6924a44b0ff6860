//! JSON API
//!
//! String-in/string-out entry points for host applications (web view, admin
//! panel, scripts). Every call returns an [`ApiResponse`] envelope, including
//! on malformed input.

pub mod lineup_json;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::LineupError;

pub use lineup_json::*;

/// API version for schema compatibility
pub const API_VERSION: &str = "v1";

/// Standard API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<ApiError>,
    pub schema_version: String,
    pub timestamp: DateTime<Utc>,
}

/// Structured API error with codes and details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    pub details: Option<HashMap<String, serde_json::Value>>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            schema_version: API_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(error: ApiError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error),
            schema_version: API_VERSION.to_string(),
            timestamp: Utc::now(),
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }
}

impl ApiError {
    pub fn new(code: &str, message: &str) -> Self {
        Self { code: code.to_string(), message: message.to_string(), details: None }
    }

    pub fn with_detail(mut self, key: &str, value: impl Into<serde_json::Value>) -> Self {
        self.details.get_or_insert_with(HashMap::new).insert(key.to_string(), value.into());
        self
    }

    pub fn invalid_json(err: &serde_json::Error) -> Self {
        Self::new("INVALID_JSON", &format!("Invalid JSON format: {}", err))
            .with_detail("line", err.line())
            .with_detail("column", err.column())
    }

    pub fn unsupported_version(version: &str) -> Self {
        Self::new(
            "UNSUPPORTED_SCHEMA_VERSION",
            &format!("Schema version {} is not supported (expected {})", version, API_VERSION),
        )
    }
}

impl From<LineupError> for ApiError {
    fn from(err: LineupError) -> Self {
        ApiError::new(err.code(), &err.to_string())
    }
}

/// Requests may omit the version; a present one must match.
pub(crate) fn check_version(version: Option<&str>) -> Result<(), ApiError> {
    match version {
        Some(v) if v != API_VERSION => Err(ApiError::unsupported_version(v)),
        _ => Ok(()),
    }
}
