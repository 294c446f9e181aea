//! Error type and machine-readable outcomes

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Everything the core can reject
///
/// A call that fails leaves the session as it was.
#[derive(Error, Debug)]
pub enum Error {
    /// The current screen does not accept the action
    #[error("Invalid transition: {0}")]
    InvalidTransition(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed input such as a blank login or a bad seed file
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    pub fn invalid_transition(msg: impl Into<String>) -> Self {
        Self::InvalidTransition(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// One reply of a scripted session, serialized as a JSON line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome<T> {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> Outcome<T> {
    pub fn success(data: T) -> Self {
        Self {
            ok: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

impl<T> From<Result<T>> for Outcome<T> {
    fn from(result: Result<T>) -> Self {
        result.map_or_else(|e| Self::failure(e.to_string()), Self::success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            Error::invalid_transition("cannot vote from the home screen").to_string(),
            "Invalid transition: cannot vote from the home screen"
        );
        assert_eq!(Error::not_found("restaurant 42").to_string(), "Not found: restaurant 42");
    }

    #[test]
    fn test_outcome_json_shape() {
        let ok = serde_json::to_value(Outcome::success(3)).unwrap();
        assert_eq!(ok, serde_json::json!({ "ok": true, "data": 3 }));

        let failed = serde_json::to_value(Outcome::<u8>::failure("no such screen")).unwrap();
        assert_eq!(failed, serde_json::json!({ "ok": false, "error": "no such screen" }));
    }

    #[test]
    fn test_outcome_from_result() {
        let found: Result<&str> = Ok("3");
        assert_eq!(Outcome::from(found), Outcome::success("3"));

        let missing: Result<&str> = Err(Error::not_found("restaurant 7"));
        let missing = Outcome::from(missing);
        assert!(!missing.ok);
        assert_eq!(missing.error.as_deref(), Some("Not found: restaurant 7"));
    }
}
