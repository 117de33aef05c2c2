/// Provider service - the orchestrator-facing lifecycle
use crate::error::ProviderError;
use crate::resources::mail::{self, MAIL_RESOURCE_TYPE};
use crate::schema::{ProviderSchema, full_schema};
use async_trait::async_trait;
use futures::FutureExt;
use quanianitis_core::{
    Cancellation, ClientSettings, ConfigResolver, HttpMailForwarder, MailForwarder,
    QuanianitisError, RawProviderConfig,
};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::{info, warn};

/// Operations the orchestrator drives
#[async_trait]
pub trait ProviderService: Send + Sync {
    fn schema(&self) -> ProviderSchema;

    async fn configure(&self, config: Value) -> Result<(), ProviderError>;

    async fn create(&self, resource_type: &str, planned_state: Value)
    -> Result<Value, ProviderError>;

    async fn read(&self, resource_type: &str, current_state: Value)
    -> Result<Value, ProviderError>;

    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError>;

    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError>;

    async fn import_state(&self, resource_type: &str, id: &str) -> Result<Value, ProviderError>;

    /// Cancels every in-flight and future forward
    async fn stop(&self);
}

pub struct QuanianitisProvider {
    version: String,
    resolver: ConfigResolver,
    settings: ClientSettings,
    forwarder: RwLock<Option<Arc<dyn MailForwarder>>>,
    stop: watch::Sender<bool>,
}

impl QuanianitisProvider {
    pub fn new(
        version: impl Into<String>,
        resolver: ConfigResolver,
        settings: ClientSettings,
    ) -> Self {
        let (stop, _) = watch::channel(false);
        Self {
            version: version.into(),
            resolver,
            settings,
            forwarder: RwLock::new(None),
            stop,
        }
    }

    /// Builds a provider from `GCLOUD_IDENTITY_TOKEN` and
    /// `QUANIANITIS_REQUEST_TIMEOUT_SECS`
    pub fn from_env() -> Result<Self, QuanianitisError> {
        Ok(Self::new(
            env!("CARGO_PKG_VERSION"),
            ConfigResolver::from_env(),
            ClientSettings::from_env()?,
        ))
    }

    async fn forwarder(&self) -> Result<Arc<dyn MailForwarder>, ProviderError> {
        self.forwarder
            .read()
            .await
            .clone()
            .ok_or(ProviderError::Unconfigured)
    }

    fn cancellation(&self) -> Cancellation {
        let mut stopped = self.stop.subscribe();
        async move {
            // A closed channel means the provider is gone; never fire then
            let signalled = stopped.wait_for(|stopped| *stopped).await.is_ok();
            if !signalled {
                futures::future::pending::<()>().await;
            }
        }
        .boxed()
    }
}

fn ensure_mail(resource_type: &str) -> Result<(), ProviderError> {
    if resource_type == MAIL_RESOURCE_TYPE {
        Ok(())
    } else {
        Err(ProviderError::UnsupportedResource(resource_type.to_string()))
    }
}

#[async_trait]
impl ProviderService for QuanianitisProvider {
    fn schema(&self) -> ProviderSchema {
        full_schema(&self.version)
    }

    #[tracing::instrument(name = "provider.configure", skip_all)]
    async fn configure(&self, config: Value) -> Result<(), ProviderError> {
        let raw: RawProviderConfig = if config.is_null() {
            RawProviderConfig::default()
        } else {
            serde_json::from_value(config)?
        };
        let config = self.resolver.resolve(&raw)?;
        let forwarder = HttpMailForwarder::new(&config, &self.settings)?;

        info!(endpoint = %forwarder.endpoint(), "Provider configured");
        *self.forwarder.write().await = Some(Arc::new(forwarder));
        Ok(())
    }

    async fn create(
        &self,
        resource_type: &str,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        ensure_mail(resource_type)?;
        let forwarder = self.forwarder().await?;
        mail::create(forwarder.as_ref(), planned_state, self.cancellation()).await
    }

    async fn read(
        &self,
        resource_type: &str,
        current_state: Value,
    ) -> Result<Value, ProviderError> {
        ensure_mail(resource_type)?;
        mail::read(current_state)
    }

    async fn update(
        &self,
        resource_type: &str,
        prior_state: Value,
        planned_state: Value,
    ) -> Result<Value, ProviderError> {
        ensure_mail(resource_type)?;
        mail::update(prior_state, planned_state)
    }

    async fn delete(&self, resource_type: &str, current_state: Value) -> Result<(), ProviderError> {
        ensure_mail(resource_type)?;
        mail::delete(current_state)
    }

    async fn import_state(&self, resource_type: &str, id: &str) -> Result<Value, ProviderError> {
        ensure_mail(resource_type)?;
        mail::import_state(id)
    }

    async fn stop(&self) {
        warn!("Stop requested, cancelling in-flight mail forwards");
        self.stop.send_replace(true);
    }
}
