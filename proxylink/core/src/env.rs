use serde::Serialize;

/// An environment variable declared by a backend container.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct EnvVar {
    pub key: String,
    pub value: String,
}

// === impl EnvVar ===

impl EnvVar {
    /// Parses a raw `KEY=VALUE` entry, splitting on the first `=`.
    ///
    /// An entry without `=` yields an empty value.
    pub fn parse(raw: &str) -> Self {
        let (key, value) = raw.split_once('=').unwrap_or((raw, ""));
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    /// Parses every entry, preserving declaration order.
    pub fn parse_all<S: AsRef<str>>(raw: impl IntoIterator<Item = S>) -> Vec<Self> {
        raw.into_iter().map(|s| Self::parse(s.as_ref())).collect()
    }

    /// Returns the value of the last variable named `key`, if any.
    ///
    /// Later declarations shadow earlier ones, as they would in the container's environment.
    pub fn lookup<'a>(vars: &'a [Self], key: &str) -> Option<&'a str> {
        vars.iter()
            .rev()
            .find(|var| var.key == key)
            .map(|var| var.value.as_str())
    }
}
