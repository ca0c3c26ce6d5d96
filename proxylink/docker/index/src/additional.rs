use crate::compose::{self, qualified_name};
use proxylink_core::{Error, LinkedServices, Links, Result};
use proxylink_docker_api::Client;
use std::collections::BTreeSet;
use tracing::{info, instrument, warn};

/// An explicitly declared `project:service` target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdditionalLink {
    pub project: String,
    pub service: String,
}

/// Links resolved from additional link declarations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AdditionalLinks {
    pub links: Links,

    /// The `<project>_<service>` name of each resolved declaration.
    pub services: BTreeSet<String>,
}

// === impl AdditionalLink ===

impl AdditionalLink {
    /// Parses a comma-separated list of `project:service` declarations.
    ///
    /// Blank entries are ignored; each malformed entry is returned as an error alongside the
    /// declarations that parsed.
    pub fn parse_list(s: &str) -> (Vec<Self>, Vec<Error>) {
        let mut links = Vec::new();
        let mut errors = Vec::new();
        for entry in s.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            match entry.parse() {
                Ok(link) => links.push(link),
                Err(error) => errors.push(error),
            }
        }
        (links, errors)
    }
}

impl std::str::FromStr for AdditionalLink {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().split(':').collect::<Vec<_>>().as_slice() {
            [project, service] => Ok(Self {
                project: project.to_string(),
                service: service.to_string(),
            }),
            _ => Err(Error::MalformedAdditionalLinkEntry(s.trim().to_string())),
        }
    }
}

impl std::fmt::Display for AdditionalLink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.project, self.service)
    }
}

/// Parses the additional links setting, logging and dropping malformed declarations.
pub fn parse_declared(declared: &str) -> Vec<AdditionalLink> {
    let (targets, errors) = AdditionalLink::parse_list(declared);
    for error in errors {
        warn!(%error, "Skipping additional link");
    }
    targets
}

/// Resolves each declared target independently of the proxy's network topology.
///
/// Declarations that match no container are logged and skipped.
#[instrument(skip(client, targets, linked), fields(targets = targets.len()))]
pub fn additional_links<C: Client>(
    client: &C,
    targets: &[AdditionalLink],
    linked: &LinkedServices,
) -> Result<AdditionalLinks> {
    let mut resolved = AdditionalLinks::default();
    for target in targets {
        let services = [target.service.clone()];
        let links = compose::container_links(client, &target.project, &services, linked)?;
        if links.is_empty() {
            let error = Error::UnresolvableAdditionalLink {
                project: target.project.clone(),
                service: target.service.clone(),
            };
            info!(%error, "Skipping additional link");
            continue;
        }

        resolved
            .services
            .insert(qualified_name(&target.project, &target.service));
        resolved.links.extend(links);
    }
    Ok(resolved)
}
