/// Quanianitis Core - configuration resolution and mail forwarding
///
/// This crate holds everything the provider does that is not dictated by the
/// orchestrator: resolving the endpoint and identity token into an
/// authenticated client, and forwarding mail requests to the relay.
pub mod constants;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

// Re-export commonly used types
pub use error::QuanianitisError;
pub use models::{ConfigValue, MailRequest, MailResourceState, ProviderConfig, RawProviderConfig};
pub use services::config::{ClientSettings, ConfigResolver};
pub use services::mail::{
    Cancellation, HttpMailForwarder, MailForwarder, create_mail, never_cancelled,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
