//! Common test utilities for provider integration tests
#![allow(dead_code)]

use quanianitis_core::{ClientSettings, ConfigResolver};
use serde_json::{Value, json};
use terraform_provider_quanianitis::QuanianitisProvider;

pub const TEST_TOKEN: &str = "test-identity-token";
pub const MAIL: &str = "quanianitis_mail";

/// Provider whose environment carries `TEST_TOKEN`
pub fn provider() -> QuanianitisProvider {
    provider_with_env(Some(TEST_TOKEN))
}

pub fn provider_with_env(env_token: Option<&str>) -> QuanianitisProvider {
    QuanianitisProvider::new(
        "0.0.0-test",
        ConfigResolver::new(env_token.map(str::to_string)),
        ClientSettings::default(),
    )
}

/// Provider configuration pointing at `endpoint`
pub fn config_for(endpoint: &str) -> Value {
    json!({ "endpoint": endpoint, "gcloud_identity_token": null })
}

/// Planned state as the orchestrator sends it for a new mail
pub fn planned_mail() -> Value {
    json!({
        "id": { "unknown": true },
        "created_at": { "unknown": true },
        "from": "work@quanianitis.com",
        "to": "recipient@example.com",
        "subject": "Deployment finished",
        "content": "The apply completed without errors."
    })
}

/// The body the relay should receive for `planned_mail`
pub fn expected_payload() -> Value {
    json!({
        "from_address": "work@quanianitis.com",
        "to_address": "recipient@example.com",
        "subject": "Deployment finished",
        "plain_text_content": "The apply completed without errors."
    })
}

/// A state record as persisted after a successful create
pub fn stored_mail() -> Value {
    json!({
        "id": "9b2e7d0c-1f3a-4b5c-8d6e-7f8091a2b3c4",
        "created_at": "2025-01-15T08:30:00Z",
        "from": "work@quanianitis.com",
        "to": "recipient@example.com",
        "subject": "Deployment finished",
        "content": "The apply completed without errors."
    })
}
