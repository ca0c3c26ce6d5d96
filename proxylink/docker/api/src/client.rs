use crate::{Container, ContainerSummary, Service, Task};
use anyhow::Result;

/// Read-only queries against the orchestrator.
///
/// Resolvers only ever read through this interface; any timeout or retry policy belongs to the
/// implementation.
pub trait Client {
    /// Lists running containers.
    fn list_containers(&self) -> Result<Vec<ContainerSummary>>;

    /// Inspects a container by ID, unique ID prefix, or name.
    fn inspect_container(&self, id: &str) -> Result<Container>;

    fn list_services(&self) -> Result<Vec<Service>>;

    fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>>;
}

/// Restricts a task listing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub desired_state: Option<String>,
}

// === impl TaskFilter ===

impl TaskFilter {
    /// Selects tasks the orchestrator intends to be running.
    pub fn running() -> Self {
        Self {
            desired_state: Some("running".to_string()),
        }
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.desired_state
            .as_deref()
            .map_or(true, |state| task.desired_state == state)
    }
}

impl<C: Client + ?Sized> Client for &C {
    fn list_containers(&self) -> Result<Vec<ContainerSummary>> {
        (**self).list_containers()
    }

    fn inspect_container(&self, id: &str) -> Result<Container> {
        (**self).inspect_container(id)
    }

    fn list_services(&self) -> Result<Vec<Service>> {
        (**self).list_services()
    }

    fn list_tasks(&self, filter: &TaskFilter) -> Result<Vec<Task>> {
        (**self).list_tasks(filter)
    }
}
