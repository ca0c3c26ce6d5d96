use crate::index::Resolution;
use anyhow::{Context, Result};
use serde::Serialize;
use std::path::Path;
use tokio::io::AsyncWriteExt;

/// The rendered document handed to the proxy's configuration generator.
#[derive(Debug, Serialize)]
pub struct Output<'r> {
    #[serde(flatten)]
    resolution: &'r Resolution,
    service_links: Vec<String>,
    container_links: Vec<String>,
}

// === impl Output ===

impl<'r> Output<'r> {
    pub fn new(resolution: &'r Resolution) -> Self {
        Self {
            resolution,
            service_links: resolution.service_names(),
            container_links: resolution.container_names(),
        }
    }

    pub fn service_links(&self) -> &[String] {
        &self.service_links
    }

    pub fn container_links(&self) -> &[String] {
        &self.container_links
    }

    /// Renders the document as pretty-printed JSON, terminated by a newline.
    pub fn to_vec(&self) -> Result<Vec<u8>> {
        let mut buf = serde_json::to_vec_pretty(self)?;
        buf.push(b'\n');
        Ok(buf)
    }

    /// Writes the document to `path`, or to stdout when no path is given.
    pub async fn write(&self, path: Option<&Path>) -> Result<()> {
        let buf = self.to_vec()?;
        match path {
            Some(path) => tokio::fs::write(path, &buf)
                .await
                .with_context(|| format!("failed to write {}", path.display())),
            None => {
                let mut stdout = tokio::io::stdout();
                stdout.write_all(&buf).await?;
                stdout.flush().await?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::Mode, index::LinkResolver};
    use proxylink_core::LinkedServices;
    use proxylink_docker_api::Snapshot;

    const SNAPSHOT: &str = r#"{
        "containers": [
            {
                "Id": "0123456789ab",
                "Name": "/shop_proxy_1",
                "Config": {
                    "Labels": { "com.docker.compose.project": "shop" }
                },
                "NetworkSettings": {
                    "Networks": {
                        "shop_default": { "NetworkID": "net-shop", "Links": ["shop_db_1:db"] }
                    }
                }
            },
            {
                "Id": "c-db",
                "Name": "/shop_db_1",
                "Config": {
                    "Labels": {
                        "com.docker.compose.project": "shop",
                        "com.docker.compose.service": "db"
                    },
                    "Env": ["POSTGRES_DB=shop"],
                    "ExposedPorts": { "5432/tcp": {} }
                }
            }
        ]
    }"#;

    #[test]
    fn renders_summaries_alongside_links() {
        let client = Snapshot::from_slice(SNAPSHOT.as_bytes()).unwrap();
        let resolution = LinkResolver::new(Mode::Auto, LinkedServices::default(), "")
            .resolve(&client, "0123456789ab")
            .unwrap();

        let output = Output::new(&resolution);
        assert_eq!(output.service_links(), ["shop_db"]);
        assert_eq!(output.container_links(), ["shop_db_1"]);

        let buf = output.to_vec().unwrap();
        assert_eq!(buf.last(), Some(&b'\n'));
        let json: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(json["mode"], "compose");
        assert_eq!(json["service_links"], serde_json::json!(["shop_db"]));
        assert_eq!(json["container_links"], serde_json::json!(["shop_db_1"]));
        assert_eq!(
            json["links"]["c-db"]["endpoints"]["5432/tcp"],
            "tcp://shop_db_1:5432"
        );
        assert_eq!(json["links"]["c-db"]["env_vars"][0]["key"], "POSTGRES_DB");
    }

    #[test]
    fn renders_empty_resolutions() {
        let resolution = Resolution::default();
        let json: serde_json::Value =
            serde_json::from_slice(&Output::new(&resolution).to_vec().unwrap()).unwrap();
        assert_eq!(json["mode"], "auto");
        assert_eq!(json["links"], serde_json::json!({}));
        assert_eq!(json["service_links"], serde_json::json!([]));
    }
}
