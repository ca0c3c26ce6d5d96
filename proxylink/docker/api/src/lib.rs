//! The orchestration objects consumed by link resolution, and the read-only interface used to
//! query them.
//!
//! Records mirror the JSON shapes of the Docker Engine API so that they may be decoded directly
//! from API responses or from a captured [`Snapshot`]. Fields that resolution doesn't read are
//! not modeled.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

mod client;
mod container;
mod de;
pub mod labels;
mod snapshot;
mod swarm;

pub use self::{
    client::{Client, TaskFilter},
    container::{Container, ContainerConfig, ContainerSummary, EndpointSettings, NetworkSettings},
    labels::Labels,
    snapshot::Snapshot,
    swarm::{
        AttachedNetwork, NetworkAttachment, Service, ServiceSpec, Task, TaskContainerSpec, TaskSpec,
    },
};

/// The name of the overlay network that carries a swarm's published ports.
///
/// Every task with a published port is attached to it, so sharing it never indicates that a
/// service is linked to the proxy.
pub const INGRESS_NETWORK: &str = "ingress";

/// Names the environment variable through which a swarm service advertises a comma-separated
/// list of its ports.
pub const SERVICE_PORTS_ENV: &str = "SERVICE_PORTS";
