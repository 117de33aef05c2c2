/// Plugin protocol - request/response shapes and dispatch
use crate::error::{Diagnostic, ProviderError};
use crate::provider::ProviderService;
use crate::schema::ProviderSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{error, info};

/// A request from the orchestrator, tagged by `type`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProviderRequest {
    GetSchema,
    Configure {
        #[serde(default)]
        config: Value,
    },
    Create {
        resource_type: String,
        planned_state: Value,
    },
    Read {
        resource_type: String,
        current_state: Value,
    },
    Update {
        resource_type: String,
        prior_state: Value,
        planned_state: Value,
    },
    Delete {
        resource_type: String,
        current_state: Value,
    },
    ImportState {
        resource_type: String,
        id: String,
    },
    Stop,
}

impl ProviderRequest {
    pub fn name(&self) -> &'static str {
        match self {
            Self::GetSchema => "get_schema",
            Self::Configure { .. } => "configure",
            Self::Create { .. } => "create",
            Self::Read { .. } => "read",
            Self::Update { .. } => "update",
            Self::Delete { .. } => "delete",
            Self::ImportState { .. } => "import_state",
            Self::Stop => "stop",
        }
    }
}

/// Response to a single request
///
/// `new_state` is absent whenever the operation failed, so nothing gets
/// persisted for a failed create.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProviderResponse {
    pub request_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<ProviderSchema>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_state: Option<Value>,
    pub diagnostics: Vec<Diagnostic>,
}

impl ProviderResponse {
    fn ok() -> Self {
        Self::default()
    }

    fn state(new_state: Value) -> Self {
        Self {
            new_state: Some(new_state),
            ..Self::default()
        }
    }

    fn failed(diagnostic: Diagnostic) -> Self {
        Self {
            diagnostics: vec![diagnostic],
            ..Self::default()
        }
    }

    /// Response for input that could not be decoded into a request
    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::failed(Diagnostic::error("Malformed request", detail))
    }

    pub fn has_error(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

fn respond<T>(
    result: Result<T, ProviderError>,
    on_ok: impl FnOnce(T) -> ProviderResponse,
) -> ProviderResponse {
    match result {
        Ok(value) => on_ok(value),
        Err(e) => {
            error!(error = %e, "Provider operation failed");
            ProviderResponse::failed(Diagnostic::from(&e))
        }
    }
}

/// Dispatches one request to the provider
pub async fn handle<P>(provider: &P, request: ProviderRequest) -> ProviderResponse
where
    P: ProviderService + ?Sized,
{
    info!(request = request.name(), "Received provider request");

    match request {
        ProviderRequest::GetSchema => ProviderResponse {
            schema: Some(provider.schema()),
            ..ProviderResponse::default()
        },
        ProviderRequest::Configure { config } => {
            respond(provider.configure(config).await, |_| ProviderResponse::ok())
        }
        ProviderRequest::Create {
            resource_type,
            planned_state,
        } => respond(
            provider.create(&resource_type, planned_state).await,
            ProviderResponse::state,
        ),
        ProviderRequest::Read {
            resource_type,
            current_state,
        } => respond(
            provider.read(&resource_type, current_state).await,
            ProviderResponse::state,
        ),
        ProviderRequest::Update {
            resource_type,
            prior_state,
            planned_state,
        } => respond(
            provider
                .update(&resource_type, prior_state, planned_state)
                .await,
            ProviderResponse::state,
        ),
        ProviderRequest::Delete {
            resource_type,
            current_state,
        } => respond(
            provider.delete(&resource_type, current_state).await,
            |_| ProviderResponse::ok(),
        ),
        ProviderRequest::ImportState { resource_type, id } => respond(
            provider.import_state(&resource_type, &id).await,
            ProviderResponse::state,
        ),
        ProviderRequest::Stop => {
            provider.stop().await;
            ProviderResponse::ok()
        }
    }
}

/// Parses and handles one newline-delimited request
///
/// Malformed input still yields a response, carrying the request id when one
/// could be recovered.
pub async fn handle_line<P>(provider: &P, line: &str) -> ProviderResponse
where
    P: ProviderService + ?Sized,
{
    let value: Value = match serde_json::from_str(line) {
        Ok(value) => value,
        Err(e) => {
            return ProviderResponse::malformed(format!("Request is not valid JSON: {}", e));
        }
    };

    let request_id = value.get("request_id").and_then(Value::as_u64);
    let mut response = match serde_json::from_value::<ProviderRequest>(value) {
        Ok(request) => handle(provider, request).await,
        Err(e) => ProviderResponse::malformed(format!("Request could not be decoded: {}", e)),
    };
    response.request_id = request_id;
    response
}
