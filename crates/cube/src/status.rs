//! Result normalization – the single translation point for engine status tags.

use crate::types::{RawSolveResult, SolveResult, StatusTag};
use serde::{Deserialize, Serialize};

/// Closed set of solve outcomes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    Ok,
    Unsolvable,
    NotFound,
    InvalidSrc,
    InvalidTgt,
    UnknownErr,
}

impl StatusCode {
    pub const ALL: [StatusCode; 6] = [
        StatusCode::Ok,
        StatusCode::Unsolvable,
        StatusCode::NotFound,
        StatusCode::InvalidSrc,
        StatusCode::InvalidTgt,
        StatusCode::UnknownErr,
    ];

    /// Unbox an engine status. Tags outside the wire contract are `UnknownErr`.
    pub fn from_tag(tag: StatusTag) -> Self {
        match tag.value {
            0 => StatusCode::Ok,
            1 => StatusCode::Unsolvable,
            2 => StatusCode::NotFound,
            3 => StatusCode::InvalidSrc,
            4 => StatusCode::InvalidTgt,
            _ => StatusCode::UnknownErr,
        }
    }

    /// The wire tag this status travels as.
    pub fn tag(self) -> StatusTag {
        let value = match self {
            StatusCode::Ok => 0,
            StatusCode::Unsolvable => 1,
            StatusCode::NotFound => 2,
            StatusCode::InvalidSrc => 3,
            StatusCode::InvalidTgt => 4,
            StatusCode::UnknownErr => 5,
        };
        StatusTag::new(value)
    }

    /// Human-readable description of the outcome.
    pub fn description(self) -> &'static str {
        match self {
            StatusCode::Ok => "Solved.",
            StatusCode::Unsolvable => "The cube configuration is unsolvable.",
            StatusCode::NotFound => "No solution found within the step limit.",
            StatusCode::InvalidSrc => "The source cube configuration is invalid.",
            StatusCode::InvalidTgt => "The target cube configuration is invalid.",
            StatusCode::UnknownErr => "Unknown error occurred.",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_else(|| format!("{:?}", self));
        f.write_str(&s)
    }
}

impl std::str::FromStr for StatusCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        serde_json::from_value(serde_json::Value::String(s.to_ascii_uppercase()))
            .map_err(|_| format!("unknown status code: {}", s))
    }
}

/// Pair the unboxed status with the engine's solution text, verbatim.
pub fn normalize(raw: RawSolveResult) -> SolveResult {
    SolveResult {
        status_code: StatusCode::from_tag(raw.status),
        solution: raw.solution,
    }
}
