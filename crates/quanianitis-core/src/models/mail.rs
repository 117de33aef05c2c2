/// Mail request and resource state models
use crate::error::QuanianitisError;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A single mail to forward; serializes to the relay's payload shape
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MailRequest {
    pub from_address: String,
    pub to_address: String,
    pub subject: String,
    pub plain_text_content: String,
}

impl MailRequest {
    /// Builds a request, rejecting any blank field
    ///
    /// Addresses are not format-checked; the relay owns that decision.
    pub fn new(
        from_address: impl Into<String>,
        to_address: impl Into<String>,
        subject: impl Into<String>,
        plain_text_content: impl Into<String>,
    ) -> Result<Self, QuanianitisError> {
        let request = Self {
            from_address: from_address.into(),
            to_address: to_address.into(),
            subject: subject.into(),
            plain_text_content: plain_text_content.into(),
        };
        request.validate()?;
        Ok(request)
    }

    pub fn validate(&self) -> Result<(), QuanianitisError> {
        let fields = [
            ("from", &self.from_address),
            ("to", &self.to_address),
            ("subject", &self.subject),
            ("content", &self.plain_text_content),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(QuanianitisError::Validation(format!(
                    "`{}` must not be empty",
                    name
                )));
            }
        }
        Ok(())
    }

    /// Serializes the relay payload
    pub fn to_payload(&self) -> Result<Vec<u8>, QuanianitisError> {
        Ok(serde_json::to_vec(self)?)
    }
}

/// Persisted state of a `mail` resource
///
/// Never reconciled against the relay: what was stored at creation is what
/// read and update hand back.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct MailResourceState {
    pub id: String,
    pub from: String,
    pub to: String,
    pub subject: String,
    pub content: String,
    pub created_at: String,
}

impl MailResourceState {
    pub fn new(id: impl Into<String>, created_at: DateTime<Utc>, request: &MailRequest) -> Self {
        Self {
            id: id.into(),
            from: request.from_address.clone(),
            to: request.to_address.clone(),
            subject: request.subject.clone(),
            content: request.plain_text_content.clone(),
            created_at: created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }
}
