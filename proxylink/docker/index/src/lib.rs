//! Link resolution against Docker orchestration metadata.
//!
//! Backends are discovered in one of two topologies:
//!
//! - In **compose** mode, the proxy container's network settings list legacy links to the
//!   containers it depends on. The linked service names are recovered from those records, and
//!   every container labeled with the proxy's project and one of those services is linked.
//! - In **swarm** mode, the proxy runs as a service task. Every running task of another service
//!   that shares a (non-ingress) overlay network with the proxy is linked.
//!
//! Independently of topology, operators may declare **additional** `project:service` targets.
//!
//! ```text
//! [ proxy ] -> [ membership ] -> [ containers | tasks ] -> [ Links ]
//!                                 [ additional ] ------------^
//! ```
//!
//! Every pass is a synchronous read of the orchestrator through
//! [`Client`](proxylink_docker_api::Client); nothing is cached between passes.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod additional;
pub mod compose;
mod resolver;
pub mod swarm;


pub use self::resolver::{LinkResolver, Resolution};
