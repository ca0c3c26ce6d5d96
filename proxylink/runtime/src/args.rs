use crate::{
    core::{LinkedServices, Mode},
    docker::Snapshot,
    index::{LinkResolver, Resolution},
    LogFormat, Output,
};
use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tokio::time::{self, Duration, MissedTickBehavior};
use tracing::{debug, info, instrument, warn};

#[derive(Debug, Parser)]
#[clap(
    name = "proxylink",
    about = "Resolves the backend containers a proxy should route to"
)]
pub struct Args {
    #[clap(long, default_value = "proxylink=info,warn", env = "PROXYLINK_LOG")]
    log_level: String,

    #[clap(long, default_value = "plain")]
    log_format: LogFormat,

    /// Services the proxy may link to, as `service[:port,...]` entries separated by `;`.
    ///
    /// When unset, every service on the proxy's networks is linked.
    #[clap(long, env = "LINKED_SERVICES")]
    linked_services: Option<String>,

    /// Extra `project:service` targets, separated by `,`.
    #[clap(long, env = "ADDITIONAL_SERVICES")]
    additional_services: Option<String>,

    /// The ID (or unique ID prefix, or name) of the proxy's own container.
    #[clap(long, env = "HOSTNAME")]
    proxy_id: String,

    #[clap(long, default_value = "auto")]
    mode: Mode,

    /// A JSON document describing the engine's containers, services and tasks.
    #[clap(long)]
    snapshot: PathBuf,

    /// Where the resolved links are written. Defaults to stdout.
    #[clap(long)]
    output: Option<PathBuf>,

    /// Re-resolves on this interval until interrupted. Resolves once when unset.
    #[clap(long)]
    refresh_interval_secs: Option<u64>,
}

impl Args {
    #[inline]
    pub async fn parse_and_run() -> Result<()> {
        Self::parse().run().await
    }

    pub async fn run(self) -> Result<()> {
        let Self {
            log_level,
            log_format,
            linked_services,
            additional_services,
            proxy_id,
            mode,
            snapshot,
            output,
            refresh_interval_secs,
        } = self;

        log_format.try_init(&log_level)?;

        let resolver = LinkResolver::new(
            mode,
            LinkedServices::parse(linked_services.as_deref().unwrap_or_default()),
            additional_services.as_deref().unwrap_or_default(),
        );
        let output = output.as_deref();

        let period = match refresh_interval_secs {
            None | Some(0) => {
                let resolution = resolve(&resolver, &snapshot, &proxy_id).await?;
                log_summary(&resolution);
                return Output::new(&resolution).write(output).await;
            }
            Some(secs) => Duration::from_secs(secs),
        };

        info!(?period, "Refreshing links periodically");
        let mut interval = time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut published = Published::default();
        loop {
            tokio::select! {
                _ = interval.tick() => {}
                res = tokio::signal::ctrl_c() => {
                    res.context("failed to listen for interrupts")?;
                    info!("Interrupted; shutting down");
                    return Ok(());
                }
            }

            let resolution = match resolve(&resolver, &snapshot, &proxy_id).await {
                Ok(resolution) => resolution,
                Err(error) => {
                    warn!(error = %format!("{error:#}"), "Failed to resolve links");
                    continue;
                }
            };
            if !published.is_changed(&resolution) {
                debug!("Links unchanged");
                continue;
            }

            log_summary(&resolution);
            if let Err(error) = Output::new(&resolution).write(output).await {
                warn!(error = %format!("{error:#}"), "Failed to write links");
                continue;
            }
            published.record(resolution);
        }
    }
}

/// The last resolution that was successfully written.
///
/// A pass that fails, or whose output can't be written, leaves it in place so that the next pass
/// writes again.
#[derive(Debug, Default)]
struct Published(Option<Resolution>);

// === impl Published ===

impl Published {
    fn is_changed(&self, resolution: &Resolution) -> bool {
        self.0.as_ref() != Some(resolution)
    }

    fn record(&mut self, resolution: Resolution) {
        self.0 = Some(resolution);
    }
}

#[instrument(skip(resolver, path), fields(snapshot = %path.display()))]
async fn resolve(resolver: &LinkResolver, path: &Path, proxy_id: &str) -> Result<Resolution> {
    let buf = tokio::fs::read(path)
        .await
        .with_context(|| format!("failed to read snapshot {}", path.display()))?;
    let snapshot = Snapshot::from_slice(&buf)
        .with_context(|| format!("failed to parse snapshot {}", path.display()))?;
    let resolution = resolver.resolve(&snapshot, proxy_id)?;
    Ok(resolution)
}

fn log_summary(resolution: &Resolution) {
    info!(
        mode = %resolution.mode,
        services = ?resolution.service_names(),
        containers = ?resolution.container_names(),
        "Resolved links"
    );
}
