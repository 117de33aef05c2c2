/// Application constants
///
/// Hardcoded values shared by the resolver, the forwarder and the provider.
// ============================================================================
// Relay Endpoint
// ============================================================================
/// Cloud function used when no endpoint is configured
pub const DEFAULT_ENDPOINT: &str =
    "https://asia-southeast1-personal-quanianitis.cloudfunctions.net/sendgrid";

/// Environment variable holding the fallback identity token
pub const IDENTITY_TOKEN_ENV: &str = "GCLOUD_IDENTITY_TOKEN";

/// Environment variable overriding the outbound request timeout
pub const REQUEST_TIMEOUT_ENV: &str = "QUANIANITIS_REQUEST_TIMEOUT_SECS";

// ============================================================================
// Attribute Names
// ============================================================================

/// Provider attribute for the relay endpoint
pub const ATTR_ENDPOINT: &str = "endpoint";

/// Provider attribute for the identity token
pub const ATTR_IDENTITY_TOKEN: &str = "gcloud_identity_token";

// ============================================================================
// Timing Constants
// ============================================================================

/// Default outbound request timeout in seconds
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// ============================================================================
// Logging
// ============================================================================

/// Maximum number of response body characters kept for diagnostics
pub const MAX_LOGGED_RESPONSE_CHARS: usize = 512;

/// Upper bound on rejection body bytes read from the relay (four bytes per char)
pub const MAX_REJECTION_BODY_BYTES: usize = MAX_LOGGED_RESPONSE_CHARS * 4;

/// Log target for outbound relay calls
pub const LOG_TARGET_RELAY: &str = "relay";
