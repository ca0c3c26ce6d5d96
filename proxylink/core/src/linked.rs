//! The operator-supplied linked-services setting.
//!
//! The setting has the form `service[:target,target,...](;service[:target,...])*`. Listing any
//! service restricts linking to the listed services; a target list overrides the ports that are
//! exposed for that service. For example, `db:5432;web` links only `db` and `web`, and only port
//! 5432 of `db`.

use std::collections::BTreeMap;

/// A single entry of the linked-services setting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkedServiceSpec {
    pub service_name: String,

    /// Port numbers or `port/protocol` keys, in declaration order and without duplicates.
    pub explicit_targets: Vec<String>,

    /// The unparsed target list, or an empty string when no targets were given.
    pub raw_override: String,
}

/// The parsed linked-services setting, keyed by service name.
///
/// An empty set means that no filtering is applied and no ports are overridden.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkedServices(BTreeMap<String, LinkedServiceSpec>);

// === impl LinkedServiceSpec ===

impl LinkedServiceSpec {
    fn parse(entry: &str) -> Self {
        let terms = entry.split(':').collect::<Vec<_>>();
        let service_name = terms[0].to_string();

        // Anything other than a single `:` leaves the service listed without targets.
        let raw_override = match terms.as_slice() {
            [_, targets] => targets.trim().to_string(),
            _ => String::new(),
        };

        let mut explicit_targets = Vec::new();
        for target in raw_override.split(',').map(str::trim) {
            if !target.is_empty() && !explicit_targets.iter().any(|t| t == target) {
                explicit_targets.push(target.to_string());
            }
        }

        Self {
            service_name,
            explicit_targets,
            raw_override,
        }
    }

    pub fn has_targets(&self) -> bool {
        !self.explicit_targets.is_empty()
    }
}

// === impl LinkedServices ===

impl LinkedServices {
    /// Parses the linked-services setting.
    ///
    /// Parsing stops at the first blank entry, so a trailing `;` is harmless but anything listed
    /// after an empty entry (as in `a;;b`) is ignored. This matches how the setting has always
    /// been interpreted.
    pub fn parse(s: &str) -> Self {
        let mut services = BTreeMap::new();
        for entry in s.trim().split(';') {
            let entry = entry.trim();
            if entry.is_empty() {
                break;
            }

            let spec = LinkedServiceSpec::parse(entry);
            services.insert(spec.service_name.clone(), spec);
        }
        Self(services)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Indicates whether `service` may be linked: every service is allowed when nothing is listed.
    pub fn allows(&self, service: &str) -> bool {
        self.0.is_empty() || self.0.contains_key(service)
    }

    pub fn get(&self, service: &str) -> Option<&LinkedServiceSpec> {
        self.0.get(service)
    }

    /// Returns the explicit targets for `service`, if it lists any.
    pub fn targets(&self, service: &str) -> Option<&[String]> {
        self.get(service)
            .filter(|spec| spec.has_targets())
            .map(|spec| spec.explicit_targets.as_slice())
    }

    /// Prefixes each service name with `<namespace>_`.
    ///
    /// Services deployed as part of a stack are named after the stack namespace, while the
    /// setting names them as they appear in the stack file.
    pub fn qualified(&self, namespace: &str) -> Self {
        let services = self
            .0
            .values()
            .map(|spec| {
                let service_name = format!("{}_{}", namespace, spec.service_name);
                let spec = LinkedServiceSpec {
                    service_name: service_name.clone(),
                    ..spec.clone()
                };
                (service_name, spec)
            })
            .collect();
        Self(services)
    }
}
