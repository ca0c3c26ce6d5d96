use crate::{
    additional::{self, AdditionalLink, AdditionalLinks},
    compose::{self, Membership},
    swarm::{self, Identity, TaskLinks},
};
use proxylink_core::{Error, LinkedServices, Links, Mode, Result};
use proxylink_docker_api::{Client, Labels};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use tracing::{info, instrument, warn};

/// Resolves the proxy's links in a single mode.
///
/// The linked-services and additional-links settings are parsed once, when the resolver is
/// built, and shared by every resolution pass.
#[derive(Clone, Debug)]
pub struct LinkResolver {
    mode: Mode,
    linked: LinkedServices,
    additional: Vec<AdditionalLink>,
}

/// The outcome of a resolution pass.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Resolution {
    /// The mode that produced the links; `auto` is resolved to a concrete mode.
    pub mode: Mode,

    pub links: Links,

    /// Names of the services that were considered linked.
    pub services: BTreeSet<String>,

    /// Labels of each linked task's service, keyed by task ID. Only populated in swarm mode.
    pub service_labels: BTreeMap<String, Labels>,
}

// === impl LinkResolver ===

impl LinkResolver {
    /// Builds a resolver. Malformed additional link declarations are logged here and ignored.
    pub fn new(mode: Mode, linked: LinkedServices, additional: &str) -> Self {
        Self {
            mode,
            linked,
            additional: additional::parse_declared(additional),
        }
    }

    /// Runs a resolution pass for the proxy container identified by `proxy_id`.
    ///
    /// In compose mode, a proxy without a compose project label fails with
    /// [`Error::MissingOrchestrationIdentity`]. In auto mode, such a proxy only receives its
    /// additional links.
    #[instrument(skip(self, client), fields(mode = %self.mode))]
    pub fn resolve<C: Client>(&self, client: &C, proxy_id: &str) -> Result<Resolution> {
        match self.mode {
            Mode::Swarm => match Identity::probe(client, proxy_id) {
                Some(identity) => self.swarm(client, &identity),
                None => {
                    warn!("Swarm mode was requested but the proxy is not a swarm service");
                    Ok(Resolution::new(Mode::Swarm))
                }
            },

            Mode::Compose => {
                let mut resolution = self.compose(client, proxy_id)?;
                resolution.merge(self.additional(client)?);
                Ok(resolution)
            }

            Mode::Manual => {
                let mut resolution = Resolution::new(Mode::Manual);
                resolution.merge(self.additional(client)?);
                Ok(resolution)
            }

            Mode::Auto => {
                if let Some(identity) = Identity::probe(client, proxy_id) {
                    return self.swarm(client, &identity);
                }

                let mut resolution = match self.compose(client, proxy_id) {
                    Ok(resolution) => resolution,
                    Err(error @ Error::MissingOrchestrationIdentity { .. }) => {
                        warn!(
                            %error,
                            "Proxy is not managed by compose; only additional links apply"
                        );
                        Resolution::new(Mode::Manual)
                    }
                    Err(error) => return Err(error),
                };
                resolution.merge(self.additional(client)?);
                Ok(resolution)
            }
        }
    }

    fn swarm<C: Client>(&self, client: &C, identity: &Identity) -> Result<Resolution> {
        let TaskLinks {
            links,
            service_labels,
        } = swarm::task_links(client, identity, &self.linked)?;
        let services = links.iter().map(|l| l.service_name.clone()).collect();
        Ok(Resolution {
            mode: Mode::Swarm,
            links,
            services,
            service_labels,
        })
    }

    fn compose<C: Client>(&self, client: &C, proxy_id: &str) -> Result<Resolution> {
        let proxy = client.inspect_container(proxy_id)?;
        let membership = Membership::from_proxy(&proxy, &self.linked)?;
        info!(
            project = %membership.project,
            services = ?membership.services,
            "Resolved compose membership"
        );

        let links = compose::container_links(
            client,
            &membership.project,
            &membership.services,
            &self.linked,
        )?;
        Ok(Resolution {
            mode: Mode::Compose,
            links,
            services: membership.qualified_services().collect(),
            service_labels: BTreeMap::new(),
        })
    }

    fn additional<C: Client>(&self, client: &C) -> Result<AdditionalLinks> {
        if self.additional.is_empty() {
            return Ok(AdditionalLinks::default());
        }
        additional::additional_links(client, &self.additional, &self.linked)
    }
}

// === impl Resolution ===

impl Resolution {
    fn new(mode: Mode) -> Self {
        Self {
            mode,
            ..Default::default()
        }
    }

    fn merge(&mut self, additional: AdditionalLinks) {
        self.links.extend(additional.links);
        self.services.extend(additional.services);
    }

    /// The distinct service names of all links, sorted.
    pub fn service_names(&self) -> Vec<String> {
        self.links.service_names()
    }

    /// The distinct container names of all links, sorted.
    pub fn container_names(&self) -> Vec<String> {
        self.links.container_names()
    }
}
