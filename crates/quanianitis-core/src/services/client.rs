/// Authenticated HTTP client for the mail relay
use crate::error::QuanianitisError;
use crate::services::config::ClientSettings;
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};

/// Builds a client that stamps `Authorization: Bearer <token>` on every request
///
/// The header value is marked sensitive so it is never printed by `Debug`.
pub fn authenticated_client(
    identity_token: &str,
    settings: &ClientSettings,
) -> Result<reqwest::Client, QuanianitisError> {
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", identity_token)).map_err(|_| {
        QuanianitisError::InvalidConfig(
            "identity token contains characters not allowed in an HTTP header".to_string(),
        )
    })?;
    auth.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, auth);

    reqwest::Client::builder()
        .default_headers(headers)
        .timeout(settings.timeout)
        .user_agent(settings.user_agent.as_str())
        .build()
        .map_err(|e| QuanianitisError::InvalidConfig(format!("failed to build HTTP client: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::test_constants::TEST_TOKEN;

    #[test]
    fn test_builds_with_valid_token() {
        assert!(authenticated_client(TEST_TOKEN, &ClientSettings::default()).is_ok());
    }

    #[test]
    fn test_rejects_token_with_newline() {
        let err = authenticated_client("abc\ndef", &ClientSettings::default()).unwrap_err();
        assert!(matches!(err, QuanianitisError::InvalidConfig(_)));
    }
}
