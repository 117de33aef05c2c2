/// Schema declarations exposed to the orchestrator
use crate::resources::mail::MAIL_RESOURCE_TYPE;
use quanianitis_core::constants::{ATTR_ENDPOINT, ATTR_IDENTITY_TOKEN};
use serde::Serialize;
use std::collections::BTreeMap;

/// Provider type name used as resource type prefix
pub const PROVIDER_TYPE_NAME: &str = "quanianitis";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeType {
    String,
}

/// A single schema attribute
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    #[serde(rename = "type")]
    pub attribute_type: AttributeType,
    pub required: bool,
    pub optional: bool,
    pub computed: bool,
    pub sensitive: bool,
    pub markdown_description: String,
}

impl Attribute {
    fn string(description: &str) -> Self {
        Self {
            attribute_type: AttributeType::String,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            markdown_description: description.to_string(),
        }
    }

    pub fn required_string(description: &str) -> Self {
        Self {
            required: true,
            ..Self::string(description)
        }
    }

    pub fn optional_string(description: &str) -> Self {
        Self {
            optional: true,
            ..Self::string(description)
        }
    }

    pub fn computed_string(description: &str) -> Self {
        Self {
            computed: true,
            ..Self::string(description)
        }
    }

    pub fn sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    pub version: i64,
    pub markdown_description: String,
    pub attributes: BTreeMap<String, Attribute>,
}

impl Schema {
    pub fn v0(description: &str) -> Self {
        Self {
            version: 0,
            markdown_description: description.to_string(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn with_attribute(mut self, name: &str, attribute: Attribute) -> Self {
        self.attributes.insert(name.to_string(), attribute);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderMetadata {
    pub type_name: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderSchema {
    pub metadata: ProviderMetadata,
    pub provider: Schema,
    pub resources: BTreeMap<String, Schema>,
}

/// Provider configuration schema
pub fn provider_schema() -> Schema {
    Schema::v0("Outbound mail forwarding for the quanianitis.com domain")
        .with_attribute(
            ATTR_ENDPOINT,
            Attribute::optional_string(
                "Endpoint for cloud function mail forwarding for quanianitis.com domain",
            )
            .sensitive(),
        )
        .with_attribute(
            ATTR_IDENTITY_TOKEN,
            Attribute::optional_string(
                "Identity token authorizing calls to the mail forward function. \
                 Falls back to the `GCLOUD_IDENTITY_TOKEN` environment variable.",
            )
            .sensitive(),
        )
}

/// `quanianitis_mail` resource schema
pub fn mail_resource_schema() -> Schema {
    Schema::v0("Outbound Mail Forwarding for quanianitis.com domain")
        .with_attribute("id", Attribute::computed_string("Identifier of the forwarded mail"))
        .with_attribute(
            "created_at",
            Attribute::computed_string("RFC3339 timestamp of when the mail was forwarded"),
        )
        .with_attribute("from", Attribute::required_string("The email address of the sender"))
        .with_attribute("to", Attribute::required_string("The email address of the recipient"))
        .with_attribute("subject", Attribute::required_string("The subject of the email"))
        .with_attribute(
            "content",
            Attribute::required_string("The plain text content of the email"),
        )
}

pub fn full_schema(version: &str) -> ProviderSchema {
    ProviderSchema {
        metadata: ProviderMetadata {
            type_name: PROVIDER_TYPE_NAME.to_string(),
            version: version.to_string(),
        },
        provider: provider_schema(),
        resources: BTreeMap::from([(MAIL_RESOURCE_TYPE.to_string(), mail_resource_schema())]),
    }
}
