/// Error types for the quanianitis provider
use thiserror::Error;

#[derive(Error, Debug)]
pub enum QuanianitisError {
    #[error("Configuration incomplete: `{0}` is not known yet")]
    ConfigIncomplete(String),

    #[error("Missing credential: set `gcloud_identity_token` or the GCLOUD_IDENTITY_TOKEN environment variable")]
    MissingCredential,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Forward error: {0}")]
    Forward(String),

    #[error("Remote rejected mail with status {0}")]
    RemoteRejected(u16),

    #[error("Mail forward cancelled")]
    Cancelled,
}

impl QuanianitisError {
    /// Determines if re-invoking the same operation later may succeed
    ///
    /// An incomplete configuration resolves once planning completes; everything
    /// else needs a change in input or in the remote side.
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::ConfigIncomplete(_) => true,
            Self::MissingCredential => false,
            Self::InvalidConfig(_) => false,
            Self::Validation(_) => false,
            Self::Encoding(_) => false,
            Self::Forward(_) => false,
            Self::RemoteRejected(_) => false,
            Self::Cancelled => false,
        }
    }

    /// Attribute the error is attached to, when there is one
    pub fn attribute(&self) -> Option<&str> {
        match self {
            Self::ConfigIncomplete(attr) => Some(attr),
            Self::MissingCredential => Some(crate::constants::ATTR_IDENTITY_TOKEN),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for QuanianitisError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

impl From<reqwest::Error> for QuanianitisError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Forward(format!("request timed out: {}", err))
        } else {
            Self::Forward(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_errors() {
        assert!(QuanianitisError::ConfigIncomplete("endpoint".to_string()).is_recoverable());
        assert!(!QuanianitisError::MissingCredential.is_recoverable());
        assert!(!QuanianitisError::RemoteRejected(500).is_recoverable());
        assert!(!QuanianitisError::Forward("connection refused".to_string()).is_recoverable());
    }

    #[test]
    fn test_error_display() {
        let err = QuanianitisError::RemoteRejected(503);
        assert_eq!(err.to_string(), "Remote rejected mail with status 503");

        let err = QuanianitisError::ConfigIncomplete("endpoint".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration incomplete: `endpoint` is not known yet"
        );
    }

    #[test]
    fn test_error_attribute() {
        assert_eq!(
            QuanianitisError::ConfigIncomplete("endpoint".to_string()).attribute(),
            Some("endpoint")
        );
        assert_eq!(
            QuanianitisError::MissingCredential.attribute(),
            Some("gcloud_identity_token")
        );
        assert_eq!(QuanianitisError::Cancelled.attribute(), None);
    }

    #[test]
    fn test_from_serde_error() {
        let err: QuanianitisError = serde_json::from_str::<serde_json::Value>("{")
            .unwrap_err()
            .into();
        assert!(matches!(err, QuanianitisError::Encoding(_)));
    }
}
