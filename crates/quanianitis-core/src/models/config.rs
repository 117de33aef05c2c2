/// Provider configuration models
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use url::Url;

/// A configuration value as seen by the orchestrator
///
/// On the wire a value is `null` (or absent), a JSON string, or the marker
/// object `{"unknown": true}` while planning has not settled it yet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigValue {
    Unknown,
    #[default]
    Null,
    Known(String),
}

impl ConfigValue {
    pub fn known(value: impl Into<String>) -> Self {
        Self::Known(value.into())
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    /// Returns the value when it is known and not blank
    pub fn non_blank(&self) -> Option<&str> {
        match self {
            Self::Known(value) if !value.trim().is_empty() => Some(value.trim()),
            _ => None,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WireValue {
    Known(String),
    Marker { unknown: bool },
}

impl<'de> Deserialize<'de> for ConfigValue {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(match Option::<WireValue>::deserialize(deserializer)? {
            None => Self::Null,
            Some(WireValue::Known(value)) => Self::Known(value),
            Some(WireValue::Marker { unknown: true }) => Self::Unknown,
            Some(WireValue::Marker { unknown: false }) => Self::Null,
        })
    }
}

impl Serialize for ConfigValue {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Unknown => serde_json::json!({ "unknown": true }).serialize(serializer),
            Self::Null => serializer.serialize_none(),
            Self::Known(value) => serializer.serialize_str(value),
        }
    }
}

/// Provider configuration exactly as the orchestrator supplied it
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct RawProviderConfig {
    #[serde(default)]
    pub endpoint: ConfigValue,
    #[serde(default)]
    pub gcloud_identity_token: ConfigValue,
}

/// Resolved provider configuration, immutable once built
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub endpoint: Url,
    pub identity_token: String,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("identity_token", &"***")
            .finish()
    }
}
