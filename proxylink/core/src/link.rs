use crate::{Endpoints, EnvVar};
use serde::Serialize;
use std::collections::{btree_map, BTreeMap, BTreeSet};

/// A resolved backend: a single container or task that the proxy should route to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Link {
    /// The container or task ID.
    pub id: String,

    /// The name the backend is grouped under, e.g. `shop_db`.
    pub service_name: String,

    /// The name of the container (or the synthesized name of a task).
    pub container_name: String,

    pub endpoints: Endpoints,

    /// Declared environment, in declaration order.
    pub env_vars: Vec<EnvVar>,

    /// The service name as declared within its project, e.g. `db`.
    pub source_service: String,

    /// The compose project or stack namespace.
    pub source_project: String,
}

/// Resolved links, keyed by container or task ID.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Links(BTreeMap<String, Link>);

// === impl Links ===

impl Links {
    pub fn insert(&mut self, link: Link) -> Option<Link> {
        self.0.insert(link.id.clone(), link)
    }

    pub fn get(&self, id: &str) -> Option<&Link> {
        self.0.get(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Link> {
        self.0.values()
    }

    /// The distinct service names of all links, sorted.
    pub fn service_names(&self) -> Vec<String> {
        self.distinct(|link| &link.service_name)
    }

    /// The distinct container names of all links, sorted.
    pub fn container_names(&self) -> Vec<String> {
        self.distinct(|link| &link.container_name)
    }

    fn distinct(&self, field: impl Fn(&Link) -> &String) -> Vec<String> {
        self.0
            .values()
            .map(field)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .cloned()
            .collect()
    }
}

impl Extend<Link> for Links {
    fn extend<T: IntoIterator<Item = Link>>(&mut self, iter: T) {
        for link in iter {
            self.insert(link);
        }
    }
}

impl FromIterator<Link> for Links {
    fn from_iter<T: IntoIterator<Item = Link>>(iter: T) -> Self {
        let mut links = Self::default();
        links.extend(iter);
        links
    }
}

impl IntoIterator for Links {
    type Item = Link;
    type IntoIter = btree_map::IntoValues<String, Link>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_values()
    }
}
