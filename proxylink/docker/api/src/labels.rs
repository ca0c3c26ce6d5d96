use serde::{Deserialize, Serialize, Serializer};
use std::{collections::BTreeMap, sync::Arc};

/// Identifies the compose project a container belongs to.
pub const COMPOSE_PROJECT: &str = "com.docker.compose.project";

/// Identifies the compose service a container belongs to.
pub const COMPOSE_SERVICE: &str = "com.docker.compose.service";

/// Identifies the stack a swarm service was deployed with.
pub const STACK_NAMESPACE: &str = "com.docker.stack.namespace";

/// Set on containers that run as a swarm service task.
pub const SWARM_SERVICE_ID: &str = "com.docker.swarm.service.id";

/// When `true` on a swarm service, its tasks are never linked.
pub const DEACTIVATE: &str = "com.docker.dockercloud.haproxy.deactivate";

pub type Map = BTreeMap<String, String>;

/// An immutable set of labels.
///
/// Docker reports absent labels as `null`, which deserializes as the empty set.
#[derive(Clone, Debug, Eq, Default, Deserialize)]
#[serde(from = "Option<Map>")]
pub struct Labels(Arc<Map>);

// === Labels ===

impl Labels {
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the label's value, or an empty string when it isn't set.
    pub fn get_or_empty(&self, key: &str) -> &str {
        self.get(key).unwrap_or_default()
    }

    /// Indicates whether the label is set to `true`, ignoring case.
    pub fn is_true(&self, key: &str) -> bool {
        self.get(key)
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map> for Labels {
    #[inline]
    fn from(labels: Map) -> Self {
        Self(Arc::new(labels))
    }
}

impl From<Option<Map>> for Labels {
    #[inline]
    fn from(labels: Option<Map>) -> Self {
        labels.unwrap_or_default().into()
    }
}

impl AsRef<Map> for Labels {
    #[inline]
    fn as_ref(&self) -> &Map {
        self.0.as_ref()
    }
}

impl<T: AsRef<Map>> std::cmp::PartialEq<T> for Labels {
    #[inline]
    fn eq(&self, t: &T) -> bool {
        self.0.as_ref().eq(t.as_ref())
    }
}

impl Serialize for Labels {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl std::iter::FromIterator<(String, String)> for Labels {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self(Arc::new(iter.into_iter().collect()))
    }
}

impl std::iter::FromIterator<(&'static str, &'static str)> for Labels {
    fn from_iter<T: IntoIterator<Item = (&'static str, &'static str)>>(iter: T) -> Self {
        iter.into_iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }
}
