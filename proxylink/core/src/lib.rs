//! Core types for resolving the backends a reverse proxy should route to.
//!
//! A resolution pass turns orchestration metadata into a set of [`Link`]s, one per backend
//! container or task. This crate holds the pieces of that transform that don't depend on a
//! particular orchestrator's object model:
//!
//! - [`EnvVar`] parsing of raw `KEY=VALUE` entries;
//! - [`LinkedServices`], the operator-supplied allow-list that may also override a service's
//!   ports;
//! - [`endpoint::derive`], which builds `protocol://host:port` URLs keyed by `port/protocol`;
//! - [`Links`], the resolved link map and its sorted summaries.

#![deny(warnings, rust_2018_idioms)]
#![forbid(unsafe_code)]

pub mod endpoint;
mod env;
mod error;
mod link;
pub mod linked;

pub use self::{
    endpoint::Endpoints,
    env::EnvVar,
    error::{Error, Result},
    link::{Link, Links},
    linked::{LinkedServiceSpec, LinkedServices},
};

/// Selects how backends are discovered.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Probe for cluster mode first, falling back to compose discovery.
    #[default]
    Auto,

    /// Links are inferred from the proxy's network link records.
    Compose,

    /// Links are inferred from overlay networks shared between the proxy and service tasks.
    Swarm,

    /// Only explicitly declared `project:service` targets are linked.
    Manual,
}

// === impl Mode ===

impl std::str::FromStr for Mode {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s {
            "auto" => Ok(Self::Auto),
            "compose" => Ok(Self::Compose),
            "swarm" => Ok(Self::Swarm),
            "manual" => Ok(Self::Manual),
            s => Err(anyhow::anyhow!("invalid mode: {:?}", s)),
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => "auto".fmt(f),
            Self::Compose => "compose".fmt(f),
            Self::Swarm => "swarm".fmt(f),
            Self::Manual => "manual".fmt(f),
        }
    }
}
