use crate::{Client, Container, ContainerSummary, Service, Task, TaskFilter};
use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// A captured, immutable view of the orchestrator's state.
///
/// A snapshot is a JSON document holding container inspection records, services, and tasks as
/// the Docker Engine API reports them:
///
/// ```json
/// {"containers": [{"Id": "...", "Name": "/shop_db_1", "Config": {...}}],
///  "services": [{"ID": "...", "Spec": {...}}],
///  "tasks": [{"ID": "...", "ServiceID": "...", "NetworksAttachments": [...]}]}
/// ```
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    containers: Vec<Container>,

    #[serde(default)]
    services: Vec<Service>,

    #[serde(default)]
    tasks: Vec<Task>,
}

// === impl Snapshot ===

impl Snapshot {
    /// Decodes a snapshot document, which must be a JSON object.
    pub fn from_slice(json: &[u8]) -> Result<Self> {
        let doc = serde_json::from_slice::<serde_json::Value>(json).context("decoding snapshot")?;
        if !doc.is_object() {
            bail!("snapshot must be a JSON object");
        }
        serde_json::from_value(doc).context("decoding snapshot")
    }

    pub fn with_container(mut self, container: Container) -> Self {
        self.containers.push(container);
        self
    }

    pub fn with_service(mut self, service: Service) -> Self {
        self.services.push(service);
        self
    }

    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    fn find_container(&self, id: &str) -> Result<&Container> {
        if id.is_empty() {
            bail!("no such container: empty id");
        }

        if let Some(c) = self.containers.iter().find(|c| c.id == id) {
            return Ok(c);
        }

        let name = id.strip_prefix('/').unwrap_or(id);
        if let Some(c) = self.containers.iter().find(|c| c.short_name() == name) {
            return Ok(c);
        }

        let mut matches = self.containers.iter().filter(|c| c.id.starts_with(id));
        match (matches.next(), matches.next()) {
            (Some(c), None) => Ok(c),
            (Some(_), Some(_)) => bail!("multiple containers match id prefix {}", id),
            (None, _) => bail!("no such container: {}", id),
        }
    }
}

impl Client for Snapshot {
    fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        Ok(self.containers.iter().map(ContainerSummary::from).collect())
    }

    fn inspect_container(&self, id: &str) -> Result<Container> {
        let container = self.find_container(id)?;
        tracing::trace!(%id, container = %container.id, "Inspected container");
        Ok(container.clone())
    }

    fn list_services(&self) -> Result<Vec<Service>> {
        Ok(self.services.clone())
    }

    fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        Ok(self
            .tasks
            .iter()
            .filter(|task| filter.matches(task))
            .cloned()
            .collect())
    }
}
