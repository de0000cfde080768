use rocket::serde::{Deserialize, Serialize};
use schemars::JsonSchema;

use crate::error::app_error::AppError;

/// Offset pagination parameters for message listings.
/// Both values are optional; missing values fall back to the defaults below.
#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
#[serde(crate = "rocket::serde")]
pub struct OffsetParams {
    /// Number of items to return. Values below 1 use the default, values above the maximum are capped.
    pub limit: Option<i64>,
    /// Number of items to skip. Must not be negative.
    pub offset: Option<i64>,
}

impl OffsetParams {
    pub const DEFAULT_LIMIT: i64 = 50;
    pub const MAX_LIMIT: i64 = 100;

    pub fn new(limit: Option<i64>, offset: Option<i64>) -> Self {
        Self { limit, offset }
    }

    pub fn effective_limit(&self) -> i64 {
        match self.limit {
            Some(limit) if limit > 0 => limit.min(Self::MAX_LIMIT),
            _ => Self::DEFAULT_LIMIT,
        }
    }

    pub fn effective_offset(&self) -> Result<i64, AppError> {
        match self.offset {
            Some(offset) if offset < 0 => Err(AppError::bad_request("offset must not be negative")),
            Some(offset) => Ok(offset),
            None => Ok(0),
        }
    }
}

/// Pagination metadata echoed back with a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(crate = "rocket::serde")]
pub struct PageInfo {
    pub limit: i64,
    pub offset: i64,
    pub total: i64,
}
