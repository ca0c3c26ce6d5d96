use crate::{de, Labels};
use serde::Deserialize;

/// A swarm service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Service {
    #[serde(rename = "ID")]
    pub id: String,

    #[serde(default, deserialize_with = "de::nullable")]
    pub spec: ServiceSpec,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ServiceSpec {
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub labels: Labels,
}

/// A single scheduled instance of a swarm service.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Task {
    #[serde(rename = "ID")]
    pub id: String,

    #[serde(rename = "ServiceID", default)]
    pub service_id: String,

    /// Replicated services number their tasks; global service tasks have no slot.
    #[serde(default, deserialize_with = "de::nullable")]
    pub slot: u64,

    #[serde(default)]
    pub desired_state: String,

    #[serde(default, deserialize_with = "de::nullable")]
    pub spec: TaskSpec,

    /// Network attachments, in the order the API reports them.
    #[serde(default, deserialize_with = "de::nullable")]
    pub networks_attachments: Vec<NetworkAttachment>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskSpec {
    #[serde(default, deserialize_with = "de::nullable")]
    pub container_spec: TaskContainerSpec,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct TaskContainerSpec {
    /// Raw `KEY=VALUE` entries.
    #[serde(default, deserialize_with = "de::nullable")]
    pub env: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct NetworkAttachment {
    #[serde(default, deserialize_with = "de::nullable")]
    pub network: AttachedNetwork,

    /// Addresses in CIDR notation, e.g. `10.0.1.5/24`.
    #[serde(default, deserialize_with = "de::nullable")]
    pub addresses: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
pub struct AttachedNetwork {
    #[serde(rename = "ID", default)]
    pub id: String,
}

// === impl Task ===

impl Task {
    pub fn network_ids(&self) -> impl Iterator<Item = &str> {
        self.networks_attachments
            .iter()
            .map(|attachment| attachment.network.id.as_str())
    }
}
