//! Compose-mode discovery.
//!
//! Compose connects the proxy to the services it depends on with legacy links, which the proxy's
//! network settings list as `<project>_<service>_<instance>:<alias>`. The linked service names are
//! recovered from those records and every running container of those services is linked.

use proxylink_core::{endpoint, EnvVar, Error, Link, LinkedServices, Links, Result};
use proxylink_docker_api::{labels, Client, Container};
use tracing::{debug, instrument, trace};

/// The proxy's compose project and the services it is linked to, in first-seen order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Membership {
    pub project: String,
    pub services: Vec<String>,
}

// === impl Membership ===

impl Membership {
    /// Determines which services the proxy container is linked to.
    ///
    /// Networks are visited in name order. Services excluded by a non-empty allow-list are
    /// dropped.
    pub fn from_proxy(proxy: &Container, linked: &LinkedServices) -> Result<Self> {
        let project = proxy.labels().get_or_empty(labels::COMPOSE_PROJECT);
        if project.is_empty() {
            return Err(Error::MissingOrchestrationIdentity {
                label: labels::COMPOSE_PROJECT,
            });
        }

        let mut services = Vec::<String>::new();
        let links = proxy
            .network_settings
            .networks
            .values()
            .flat_map(|net| net.links.iter());
        for link in links {
            let Some(service) = linked_service(link, project) else {
                trace!(%link, "Ignoring link outside of the project");
                continue;
            };
            if !linked.allows(service) {
                debug!(%service, "Service is not listed in linked services");
                continue;
            }
            if !services.iter().any(|s| s == service) {
                services.push(service.to_string());
            }
        }

        Ok(Self {
            project: project.to_string(),
            services,
        })
    }

    /// Returns the `<project>_<service>` name of each linked service.
    pub fn qualified_services(&self) -> impl Iterator<Item = String> + '_ {
        self.services
            .iter()
            .map(|service| qualified_name(&self.project, service))
    }
}

/// Extracts the service name from a `<project>_<service>_<instance>:<alias>` link record.
///
/// Returns `None` when the linked container doesn't belong to `project`.
pub fn linked_service<'l>(link: &'l str, project: &str) -> Option<&'l str> {
    let container = link.split(':').next().unwrap_or_default().trim();
    let rest = container.strip_prefix(project)?.strip_prefix('_')?;
    let (service, _instance) = rest.rsplit_once('_')?;
    Some(service)
}

pub(crate) fn qualified_name(project: &str, service: &str) -> String {
    format!("{}_{}", project, service)
}

/// Links every container of `project` that belongs to one of `services`.
///
/// Each listed container is inspected; containers of other projects or services are skipped.
#[instrument(skip(client, services, linked), fields(services = services.len()))]
pub fn container_links<C: Client>(
    client: &C,
    project: &str,
    services: &[String],
    linked: &LinkedServices,
) -> Result<Links> {
    let mut links = Links::default();
    for summary in client.list_containers()? {
        let container = client.inspect_container(&summary.id)?;
        let (container_project, container_service) = container.compose_identity();
        if container_project != project || !services.iter().any(|s| s == container_service) {
            trace!(id = %container.id, "Container is not linked");
            continue;
        }

        let link = container_link(&container, linked);
        debug!(
            id = %link.id,
            service = %link.service_name,
            container = %link.container_name,
            "Linked container"
        );
        links.insert(link);
    }
    Ok(links)
}

/// Builds the link for a compose container.
///
/// Ports listed for the service in `linked` take precedence over the container's exposed ports.
pub fn container_link(container: &Container, linked: &LinkedServices) -> Link {
    let (project, service) = container.compose_identity();
    let container_name = container.short_name();

    let endpoints = match linked.targets(service) {
        Some(targets) => endpoint::derive(
            targets.iter().map(|target| (target, None::<&str>)),
            container_name,
        ),
        None => endpoint::derive(
            container
                .config
                .exposed_ports
                .iter()
                .map(|(port, url)| (port, url.as_deref())),
            container_name,
        ),
    };

    Link {
        id: container.id.clone(),
        service_name: qualified_name(project, service),
        container_name: container_name.to_string(),
        endpoints,
        env_vars: EnvVar::parse_all(&container.config.env),
        source_service: service.to_string(),
        source_project: project.to_string(),
    }
}
