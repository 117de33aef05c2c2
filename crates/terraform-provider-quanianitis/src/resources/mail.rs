/// `quanianitis_mail` resource - forwards a mail on create, local-only otherwise
use crate::error::ProviderError;
use quanianitis_core::utils::logging::{redact_body, redact_email};
use quanianitis_core::{
    Cancellation, ConfigValue, MailForwarder, MailRequest, MailResourceState, QuanianitisError,
    create_mail,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

pub const MAIL_RESOURCE_TYPE: &str = "quanianitis_mail";

/// Resource data as exchanged with the orchestrator
///
/// Every attribute may be unknown during planning and null after import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct MailResourceModel {
    #[serde(default)]
    pub id: ConfigValue,
    #[serde(default)]
    pub created_at: ConfigValue,
    #[serde(default)]
    pub from: ConfigValue,
    #[serde(default)]
    pub to: ConfigValue,
    #[serde(default)]
    pub subject: ConfigValue,
    #[serde(default)]
    pub content: ConfigValue,
}

impl MailResourceModel {
    pub fn to_mail_request(&self) -> Result<MailRequest, ProviderError> {
        Ok(MailRequest::new(
            required(&self.from, "from")?,
            required(&self.to, "to")?,
            required(&self.subject, "subject")?,
            required(&self.content, "content")?,
        )?)
    }
}

impl From<MailResourceState> for MailResourceModel {
    fn from(state: MailResourceState) -> Self {
        Self {
            id: ConfigValue::Known(state.id),
            created_at: ConfigValue::Known(state.created_at),
            from: ConfigValue::Known(state.from),
            to: ConfigValue::Known(state.to),
            subject: ConfigValue::Known(state.subject),
            content: ConfigValue::Known(state.content),
        }
    }
}

fn required(value: &ConfigValue, name: &str) -> Result<String, ProviderError> {
    match value {
        ConfigValue::Known(value) => Ok(value.clone()),
        ConfigValue::Unknown => Err(QuanianitisError::ConfigIncomplete(name.to_string()).into()),
        ConfigValue::Null => {
            Err(QuanianitisError::Validation(format!("`{}` is required", name)).into())
        }
    }
}

fn decode(value: Value) -> Result<MailResourceModel, ProviderError> {
    Ok(serde_json::from_value(value)?)
}

fn encode(model: &MailResourceModel) -> Result<Value, ProviderError> {
    Ok(serde_json::to_value(model)?)
}

/// Forwards the planned mail and returns the state to persist
#[tracing::instrument(name = "mail.create", skip_all)]
pub async fn create(
    forwarder: &dyn MailForwarder,
    planned_state: Value,
    cancel: Cancellation,
) -> Result<Value, ProviderError> {
    let request = decode(planned_state)?.to_mail_request()?;
    debug!(
        to = %redact_email(&request.to_address),
        content = %redact_body(&request.plain_text_content),
        "Creating mail resource"
    );

    let state = create_mail(forwarder, &request, cancel).await?;
    info!(id = %state.id, "Mail resource created");

    encode(&MailResourceModel::from(state))
}

/// Returns the stored state untouched; the relay is never consulted
pub fn read(current_state: Value) -> Result<Value, ProviderError> {
    encode(&decode(current_state)?)
}

/// Adopts the planned attributes while keeping the identity of the prior state
pub fn update(prior_state: Value, planned_state: Value) -> Result<Value, ProviderError> {
    let prior = decode(prior_state)?;
    let mut planned = decode(planned_state)?;

    if !matches!(planned.id, ConfigValue::Known(_)) {
        planned.id = prior.id;
    }
    if !matches!(planned.created_at, ConfigValue::Known(_)) {
        planned.created_at = prior.created_at;
    }

    encode(&planned)
}

/// Drops the resource locally; a sent mail cannot be recalled
pub fn delete(current_state: Value) -> Result<(), ProviderError> {
    let model = decode(current_state)?;
    debug!(id = ?model.id, "Removing mail resource from state");
    Ok(())
}

/// Builds state for `terraform import`, taking the id verbatim
pub fn import_state(id: &str) -> Result<Value, ProviderError> {
    if id.trim().is_empty() {
        return Err(QuanianitisError::Validation("import id must not be empty".to_string()).into());
    }

    encode(&MailResourceModel {
        id: ConfigValue::known(id),
        ..Default::default()
    })
}
