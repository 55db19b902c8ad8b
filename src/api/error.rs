use std::error::Error;
use std::fmt;

use wasm_bindgen::JsValue;

/// Failure kinds surfaced by the API client.
///
/// Callers keep their previously fetched state on any of these; the
/// rendering layer decides what, if anything, the user sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// The server could not be reached at all.
    Transport(String),
    /// The server answered, but with a non-success status or an
    /// `{"error": ...}` body.
    Server { status: u16, message: String },
    /// The server answered, but the payload was not understood.
    Decode(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "could not reach game server: {message}"),
            Self::Server { status, message } => {
                write!(f, "game server rejected the request (status {status}): {message}")
            }
            Self::Decode(message) => write!(f, "malformed game server payload: {message}"),
        }
    }
}

impl Error for ApiError {}

impl From<ApiError> for JsValue {
    fn from(err: ApiError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}
