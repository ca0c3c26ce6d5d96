//! Swarm-mode discovery.
//!
//! A proxy running as a swarm service is linked to every task that shares one of its overlay
//! networks. The ingress network is shared by every task with a published port, so it never
//! counts.

use proxylink_core::{endpoint, EnvVar, Link, LinkedServices, Links, Result};
use proxylink_docker_api::{
    labels, Client, Container, Labels, Service, Task, TaskFilter, INGRESS_NETWORK,
    SERVICE_PORTS_ENV,
};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use tracing::{debug, info, instrument, trace};

/// Describes the swarm service the proxy runs as.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Identity {
    pub service_id: String,

    /// The stack the proxy was deployed with; empty when deployed outside of a stack.
    pub namespace: String,

    /// IDs of the proxy's networks, excluding ingress.
    pub networks: BTreeSet<String>,
}

/// Links resolved from swarm tasks.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskLinks {
    pub links: Links,

    /// The labels of each linked task's service, keyed by task ID.
    pub service_labels: BTreeMap<String, Labels>,
}

// === impl Identity ===

impl Identity {
    /// Determines whether the proxy runs as a swarm service.
    ///
    /// Returns `None` when the proxy container can't be inspected or isn't a service task, in
    /// which case compose-mode discovery applies.
    #[instrument(skip(client))]
    pub fn probe<C: Client>(client: &C, proxy_id: &str) -> Option<Self> {
        let proxy = match client.inspect_container(proxy_id) {
            Ok(proxy) => proxy,
            Err(error) => {
                info!(%error, "Orchestration API error, regressing to legacy links mode");
                return None;
            }
        };

        let identity = Self::from_proxy(&proxy);
        if identity.is_none() {
            info!("Proxy is not running as a swarm service");
        }
        identity
    }

    pub fn from_proxy(proxy: &Container) -> Option<Self> {
        let labels = proxy.labels();
        let service_id = labels.get_or_empty(labels::SWARM_SERVICE_ID);
        if service_id.is_empty() {
            return None;
        }

        let networks = proxy
            .network_settings
            .networks
            .iter()
            .filter(|(name, _)| *name != INGRESS_NETWORK)
            .map(|(_, net)| net.network_id.clone())
            .collect();

        Some(Self {
            service_id: service_id.to_string(),
            namespace: labels.get_or_empty(labels::STACK_NAMESPACE).to_string(),
            networks,
        })
    }

    /// Qualifies the linked-services setting with the proxy's stack namespace.
    fn linked_services(&self, linked: &LinkedServices) -> LinkedServices {
        if self.namespace.is_empty() {
            return linked.clone();
        }
        linked.qualified(&self.namespace)
    }

    /// Strips the stack namespace from a service name, if present.
    fn source_service<'n>(&self, service_name: &'n str) -> &'n str {
        if self.namespace.is_empty() {
            return service_name;
        }
        service_name
            .strip_prefix(self.namespace.as_str())
            .and_then(|s| s.strip_prefix('_'))
            .unwrap_or(service_name)
    }
}

/// Lists running tasks and services and links the tasks that share a network with the proxy.
#[instrument(skip(client, linked), fields(service = %identity.service_id))]
pub fn task_links<C: Client>(
    client: &C,
    identity: &Identity,
    linked: &LinkedServices,
) -> Result<TaskLinks> {
    let services = client.list_services()?;
    let tasks = client.list_tasks(&TaskFilter::running())?;
    Ok(resolve_tasks(identity, &tasks, &services, linked))
}

/// Links each task that shares a non-ingress network with the proxy.
pub fn resolve_tasks(
    identity: &Identity,
    tasks: &[Task],
    services: &[Service],
    linked: &LinkedServices,
) -> TaskLinks {
    let services = services
        .iter()
        .map(|s| (s.id.as_str(), s))
        .collect::<HashMap<_, _>>();
    let linked = identity.linked_services(linked);

    let mut resolved = TaskLinks::default();
    for task in tasks {
        if task.service_id == identity.service_id {
            trace!(task = %task.id, "Skipping the proxy's own task");
            continue;
        }

        let shared = task
            .network_ids()
            .filter(|id| identity.networks.contains(*id))
            .collect::<BTreeSet<_>>();
        if shared.is_empty() {
            trace!(task = %task.id, "Task shares no network with the proxy");
            continue;
        }

        let (service_name, service_labels) = match services.get(task.service_id.as_str()) {
            Some(s) => (s.spec.name.as_str(), s.spec.labels.clone()),
            None => ("", Labels::default()),
        };

        if !linked.allows(service_name) {
            debug!(
                task = %task.id,
                service = %service_name,
                "Service is not listed in linked services"
            );
            continue;
        }

        if service_labels.is_true(labels::DEACTIVATE) {
            debug!(
                task = %task.id,
                service = %service_name,
                "Linking is deactivated for service"
            );
            continue;
        }

        let link = task_link(identity, task, service_name, &shared, &linked);
        debug!(
            task = %link.id,
            service = %link.service_name,
            endpoints = link.endpoints.len(),
            "Linked task"
        );
        resolved.service_labels.insert(task.id.clone(), service_labels);
        resolved.links.insert(link);
    }
    resolved
}

fn task_link(
    identity: &Identity,
    task: &Task,
    service_name: &str,
    shared: &BTreeSet<&str>,
    linked: &LinkedServices,
) -> Link {
    let container_name = format!("{}.{}.{}", service_name, task.slot, task.id);
    let env_vars = EnvVar::parse_all(&task.spec.container_spec.env);

    let ports = match linked.targets(service_name) {
        Some(targets) => targets.to_vec(),
        None => EnvVar::lookup(&env_vars, SERVICE_PORTS_ENV)
            .map(parse_ports)
            .unwrap_or_default(),
    };
    let ports = ports
        .iter()
        .filter_map(|port| tcp_port(port, &task.id))
        .collect::<Vec<_>>();

    // The first address on a shared network, in the order the task reports its attachments.
    let host = task
        .networks_attachments
        .iter()
        .filter(|attachment| shared.contains(attachment.network.id.as_str()))
        .find_map(|attachment| attachment.addresses.first())
        .map(|address| address.split('/').next().unwrap_or_default())
        .filter(|ip| !ip.is_empty())
        .unwrap_or(container_name.as_str());
    let endpoints = endpoint::tcp(&ports, host);

    Link {
        id: task.id.clone(),
        service_name: service_name.to_string(),
        container_name,
        endpoints,
        env_vars,
        source_service: identity.source_service(service_name).to_string(),
        source_project: identity.namespace.clone(),
    }
}

/// Reduces a port or `port/protocol` key to its port number. Tasks are only reachable over TCP,
/// so keys of any other protocol are skipped.
fn tcp_port<'p>(port: &'p str, task: &str) -> Option<&'p str> {
    match port.split_once('/') {
        None => Some(port),
        Some((port, protocol)) if protocol.eq_ignore_ascii_case("tcp") => Some(port),
        Some((_, protocol)) => {
            debug!(%task, %port, %protocol, "Skipping non-TCP port");
            None
        }
    }
}

/// Parses a comma-separated list of ports, ignoring blank items.
fn parse_ports(ports: &str) -> Vec<String> {
    ports
        .split(',')
        .map(str::trim)
        .filter(|port| !port.is_empty())
        .map(str::to_string)
        .collect()
}
