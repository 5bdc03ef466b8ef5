//! Uniform request envelope and the typed error surfaced to pages.

use serde::de::DeserializeOwned;
use serde_json::Value;

/// The shape every HTTP call resolves to, regardless of transport outcome.
///
/// `success` is true iff the backend answered 200 or 201. Transport
/// failures carry `status == 0` and a fixed message; HTTP errors carry the
/// real status and whatever message the body offered.
#[derive(Debug, Clone)]
pub struct Envelope {
    pub success: bool,
    pub status: u16,
    pub data: Value,
    pub message: Option<String>,
}

pub const CONNECTION_ERROR: &str = "connection error";

impl Envelope {
    pub fn ok(status: u16, data: Value) -> Self {
        Envelope {
            success: true,
            status,
            data,
            message: None,
        }
    }

    pub fn http_error(status: u16, message: String) -> Self {
        Envelope {
            success: false,
            status,
            data: Value::Null,
            message: Some(message),
        }
    }

    pub fn transport_error() -> Self {
        Envelope {
            success: false,
            status: 0,
            data: Value::Null,
            message: Some(CONNECTION_ERROR.to_string()),
        }
    }

    /// Converts the envelope into a typed result for the endpoint layer.
    pub fn decode<T: DeserializeOwned>(self) -> Result<T, ApiError> {
        if !self.success {
            return Err(self.into_error());
        }
        serde_json::from_value(self.data).map_err(|e| ApiError::Decode(e.to_string()))
    }

    fn into_error(self) -> ApiError {
        if self.status == 0 {
            ApiError::Transport
        } else {
            ApiError::Http {
                status: self.status,
                message: self
                    .message
                    .unwrap_or_else(|| format!("HTTP {}", self.status)),
            }
        }
    }
}

#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("connection error")]
    Transport,
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("unexpected response shape: {0}")]
    Decode(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Deserialize, Debug, PartialEq)]
    struct Created {
        id: String,
    }

    #[test]
    fn test_decode_success() {
        let env = Envelope::ok(201, serde_json::json!({"id": "42"}));
        let created: Created = env.decode().unwrap();
        assert_eq!(created, Created { id: "42".into() });
    }

    #[test]
    fn test_decode_transport_error() {
        let env = Envelope::transport_error();
        assert_eq!(env.status, 0);
        assert!(!env.success);
        let err = env.decode::<Created>().unwrap_err();
        assert_eq!(err, ApiError::Transport);
    }

    #[test]
    fn test_decode_http_error_keeps_status_and_message() {
        let env = Envelope::http_error(404, "budget not found".to_string());
        let err = env.decode::<Created>().unwrap_err();
        assert_eq!(
            err,
            ApiError::Http {
                status: 404,
                message: "budget not found".to_string()
            }
        );
    }

    #[test]
    fn test_decode_shape_mismatch() {
        let env = Envelope::ok(200, serde_json::json!({"unexpected": true}));
        assert!(matches!(
            env.decode::<Created>(),
            Err(ApiError::Decode(_))
        ));
    }
}
