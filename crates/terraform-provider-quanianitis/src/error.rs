/// Provider error types and their diagnostic form
use quanianitis_core::QuanianitisError;
use serde::{Deserialize, Serialize};

/// Adapter-level error
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("Unsupported resource type: {0}")]
    UnsupportedResource(String),

    #[error("Provider has not been configured")]
    Unconfigured,

    #[error("Invalid resource data: {0}")]
    Decode(String),

    #[error(transparent)]
    Core(#[from] QuanianitisError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
}

/// A message reported back to the orchestrator
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub summary: String,
    pub detail: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute: Option<String>,
}

impl Diagnostic {
    pub fn error(summary: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            summary: summary.into(),
            detail: detail.into(),
            attribute: None,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<String>) -> Self {
        self.attribute = Some(attribute.into());
        self
    }
}

impl From<&ProviderError> for Diagnostic {
    fn from(err: &ProviderError) -> Self {
        match err {
            ProviderError::UnsupportedResource(name) => Diagnostic::error(
                "Unsupported resource type",
                format!("This provider does not manage resources of type '{}'.", name),
            ),
            ProviderError::Unconfigured => Diagnostic::error(
                "Unconfigured provider",
                "The provider must be configured before resources can be managed.",
            ),
            ProviderError::Decode(msg) => {
                Diagnostic::error("Invalid resource data", msg.clone())
            }
            ProviderError::Core(core) => Diagnostic::from(core),
        }
    }
}

impl From<&QuanianitisError> for Diagnostic {
    fn from(err: &QuanianitisError) -> Self {
        let summary = match err {
            QuanianitisError::ConfigIncomplete(_) => "Unknown configuration value",
            QuanianitisError::MissingCredential => "Missing identity token",
            QuanianitisError::InvalidConfig(_) => "Invalid provider configuration",
            QuanianitisError::Validation(_) => "Invalid mail attributes",
            QuanianitisError::Encoding(_) => {
                "Error marshaling submitted data to a Mail-compatible format"
            }
            QuanianitisError::Forward(_) => "Error forwarding mail",
            QuanianitisError::RemoteRejected(_) => "Error response from Cloud Function",
            QuanianitisError::Cancelled => "Mail forward cancelled",
        };

        let detail = if err.is_recoverable() {
            format!("{}. Apply again once the value is known.", err)
        } else {
            err.to_string()
        };
        let diagnostic = Diagnostic::error(summary, detail);
        match err.attribute() {
            Some(attribute) => diagnostic.with_attribute(attribute),
            None => diagnostic,
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_rejected_diagnostic() {
        let err = ProviderError::Core(QuanianitisError::RemoteRejected(500));
        let diagnostic = Diagnostic::from(&err);

        assert_eq!(diagnostic.severity, Severity::Error);
        assert_eq!(diagnostic.summary, "Error response from Cloud Function");
        assert!(diagnostic.detail.contains("500"));
        assert_eq!(diagnostic.attribute, None);
    }

    #[test]
    fn test_incomplete_config_names_attribute() {
        let err = QuanianitisError::ConfigIncomplete("endpoint".to_string());
        let diagnostic = Diagnostic::from(&err);

        assert_eq!(diagnostic.attribute.as_deref(), Some("endpoint"));
        assert!(diagnostic.detail.ends_with("Apply again once the value is known."));
    }

    #[test]
    fn test_unrecoverable_detail_is_error_text() {
        let err = QuanianitisError::MissingCredential;
        let diagnostic = Diagnostic::from(&err);

        assert_eq!(diagnostic.detail, err.to_string());
    }

    #[test]
    fn test_diagnostic_serialization_skips_empty_attribute() {
        let value = serde_json::to_value(Diagnostic::error("s", "d")).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "severity": "error", "summary": "s", "detail": "d" })
        );
    }
}
