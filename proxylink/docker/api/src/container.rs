use crate::{de, labels, Labels};
use serde::Deserialize;
use std::collections::BTreeMap;

/// A container as returned by a container listing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerSummary {
    pub id: String,
}

/// A container as returned by inspection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Container {
    pub id: String,

    /// The container's name, usually with a leading `/`.
    #[serde(default)]
    pub name: String,

    #[serde(default, deserialize_with = "de::nullable")]
    pub config: ContainerConfig,

    #[serde(default, deserialize_with = "de::nullable")]
    pub network_settings: NetworkSettings,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContainerConfig {
    #[serde(default)]
    pub labels: Labels,

    /// Raw `KEY=VALUE` entries.
    #[serde(default, deserialize_with = "de::nullable")]
    pub env: Vec<String>,

    /// Exposed ports keyed by `port/protocol`, each with an optional explicit URL.
    #[serde(default, deserialize_with = "de::exposed_ports")]
    pub exposed_ports: BTreeMap<String, Option<String>>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkSettings {
    /// Attached networks, keyed by network name.
    #[serde(default, deserialize_with = "de::nullable")]
    pub networks: BTreeMap<String, EndpointSettings>,
}

/// A container's attachment to a single network.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EndpointSettings {
    #[serde(rename = "NetworkID", default)]
    pub network_id: String,

    /// Legacy links, formatted as `<container>:<alias>`.
    #[serde(default, deserialize_with = "de::nullable")]
    pub links: Vec<String>,
}

// === impl ContainerSummary ===

impl From<&Container> for ContainerSummary {
    fn from(container: &Container) -> Self {
        Self {
            id: container.id.clone(),
        }
    }
}

// === impl Container ===

impl Container {
    pub fn labels(&self) -> &Labels {
        &self.config.labels
    }

    /// The container's name without its leading `/`.
    pub fn short_name(&self) -> &str {
        self.name.strip_prefix('/').unwrap_or(&self.name)
    }

    /// The compose project and service this container belongs to; empty when unlabeled.
    pub fn compose_identity(&self) -> (&str, &str) {
        let labels = self.labels();
        (
            labels.get_or_empty(labels::COMPOSE_PROJECT),
            labels.get_or_empty(labels::COMPOSE_SERVICE),
        )
    }
}
