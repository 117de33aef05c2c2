/// Terraform provider for quanianitis.com outbound mail
///
/// This crate adapts the orchestrator's request/response shapes onto
/// `quanianitis-core`: schema declarations, diagnostics, the `mail` resource
/// lifecycle and the plugin loop.
pub mod error;
pub mod logging;
pub mod protocol;
pub mod provider;
pub mod resources;
pub mod schema;
pub mod server;

pub use error::{Diagnostic, ProviderError, Severity};
pub use protocol::{ProviderRequest, ProviderResponse, handle, handle_line};
pub use provider::{ProviderService, QuanianitisProvider};
pub use server::serve;
