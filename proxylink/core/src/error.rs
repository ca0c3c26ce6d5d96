pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The proxy's own metadata lacks the label that identifies its project or namespace, so it
    /// is not managed by the orchestration mode being resolved.
    #[error("proxy container is missing the {label:?} label")]
    MissingOrchestrationIdentity { label: &'static str },

    #[error("malformed additional link {0:?}: expected project:service")]
    MalformedAdditionalLinkEntry(String),

    #[error("no running container matches additional link {project}:{service}")]
    UnresolvableAdditionalLink { project: String, service: String },

    #[error("orchestration query failed: {0}")]
    OrchestrationQueryFailure(#[from] anyhow::Error),
}
