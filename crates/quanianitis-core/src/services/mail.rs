/// Mail forwarding - posts a mail request to the relay and records the result
use crate::constants::{LOG_TARGET_RELAY, MAX_LOGGED_RESPONSE_CHARS, MAX_REJECTION_BODY_BYTES};
use crate::error::QuanianitisError;
use crate::models::{MailRequest, MailResourceState, ProviderConfig};
use crate::services::client::authenticated_client;
use crate::services::config::ClientSettings;
use crate::utils::logging::{redact_email, redact_subject, truncate_for_log};
use async_trait::async_trait;
use chrono::Utc;
use futures::FutureExt;
use futures::future::BoxFuture;
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;

/// Resolves when the surrounding operation has been cancelled
pub type Cancellation = BoxFuture<'static, ()>;

/// A cancellation that never fires
pub fn never_cancelled() -> Cancellation {
    futures::future::pending().boxed()
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MailForwarder: Send + Sync {
    /// Forwards one mail; no retry is attempted on any failure
    async fn forward(
        &self,
        mail: &MailRequest,
        cancel: Cancellation,
    ) -> Result<(), QuanianitisError>;
}

/// Forwarder posting JSON to the cloud function relay
pub struct HttpMailForwarder {
    endpoint: Url,
    client: reqwest::Client,
}

impl HttpMailForwarder {
    pub fn new(
        config: &ProviderConfig,
        settings: &ClientSettings,
    ) -> Result<Self, QuanianitisError> {
        Ok(Self {
            endpoint: config.endpoint.clone(),
            client: authenticated_client(&config.identity_token, settings)?,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    async fn post(&self, body: Vec<u8>) -> Result<(), QuanianitisError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            // The acknowledgement body carries nothing we keep
            drop(response);
            return Ok(());
        }

        let excerpt = rejection_excerpt(response).await;
        debug!(
            target: LOG_TARGET_RELAY,
            status = status.as_u16(),
            body = %redact_email(&excerpt),
            "Relay rejected mail"
        );
        Err(QuanianitisError::RemoteRejected(status.as_u16()))
    }
}

/// Reads a bounded prefix of a rejection body for logging
///
/// At most `MAX_REJECTION_BODY_BYTES` are downloaded; the response is dropped here.
async fn rejection_excerpt(mut response: reqwest::Response) -> String {
    let mut excerpt = Vec::with_capacity(MAX_REJECTION_BODY_BYTES);

    while excerpt.len() < MAX_REJECTION_BODY_BYTES {
        match response.chunk().await {
            Ok(Some(chunk)) => {
                let room = MAX_REJECTION_BODY_BYTES - excerpt.len();
                excerpt.extend_from_slice(&chunk[..chunk.len().min(room)]);
            }
            Ok(None) => break,
            Err(e) => {
                debug!(target: LOG_TARGET_RELAY, error = %e, "Failed to read rejection body");
                break;
            }
        }
    }

    truncate_for_log(&String::from_utf8_lossy(&excerpt), MAX_LOGGED_RESPONSE_CHARS)
}

#[async_trait]
impl MailForwarder for HttpMailForwarder {
    #[tracing::instrument(
        name = "relay.forward",
        skip(self, mail, cancel),
        fields(
            endpoint = %self.endpoint,
            to = %redact_email(&mail.to_address),
            subject = %redact_subject(&mail.subject)
        )
    )]
    async fn forward(
        &self,
        mail: &MailRequest,
        cancel: Cancellation,
    ) -> Result<(), QuanianitisError> {
        let body = mail.to_payload()?;

        tokio::select! {
            result = self.post(body) => {
                match &result {
                    Ok(()) => info!(target: LOG_TARGET_RELAY, "Mail forwarded"),
                    Err(e) => warn!(target: LOG_TARGET_RELAY, error = %e, "Mail forward failed"),
                }
                result
            }
            _ = cancel => {
                warn!(target: LOG_TARGET_RELAY, "Mail forward cancelled, aborting request");
                Err(QuanianitisError::Cancelled)
            }
        }
    }
}

/// Forwards `request` and, on success, builds the state to persist
///
/// The id is a random UUID; nothing is returned when the forward fails.
pub async fn create_mail(
    forwarder: &dyn MailForwarder,
    request: &MailRequest,
    cancel: Cancellation,
) -> Result<MailResourceState, QuanianitisError> {
    request.validate()?;
    forwarder.forward(request, cancel).await?;

    let id = Uuid::new_v4().to_string();
    Ok(MailResourceState::new(id, Utc::now(), request))
}
