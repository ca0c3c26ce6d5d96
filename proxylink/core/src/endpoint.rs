use std::collections::BTreeMap;

/// A backend's reachable URLs, keyed by `port/protocol`.
pub type Endpoints = BTreeMap<String, String>;

const DEFAULT_PROTOCOL: &str = "tcp";

/// Builds endpoints for a backend reachable at `host`.
///
/// Each entry is an endpoint key (`port/protocol` or a bare port, which implies `tcp`) and an
/// optional URL. A non-empty URL is used verbatim; otherwise `protocol://host:port` is
/// synthesized. Entries with an empty key are skipped.
pub fn derive<K, V>(ports: impl IntoIterator<Item = (K, Option<V>)>, host: &str) -> Endpoints
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut endpoints = Endpoints::new();
    for (key, url) in ports {
        let key = key.as_ref();
        if key.is_empty() {
            continue;
        }

        let url: Option<&str> = url.as_ref().map(|url| url.as_ref());
        let url = match url {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => {
                let (port, protocol) = key.split_once('/').unwrap_or((key, DEFAULT_PROTOCOL));
                format!("{}://{}:{}", protocol, host, port)
            }
        };
        endpoints.insert(key.to_string(), url);
    }
    endpoints
}

/// Builds `port/tcp` endpoints from a list of bare port numbers. Empty ports are skipped.
pub fn tcp<S: AsRef<str>>(ports: impl IntoIterator<Item = S>, host: &str) -> Endpoints {
    ports
        .into_iter()
        .filter(|port| !port.as_ref().is_empty())
        .map(|port| {
            let port = port.as_ref();
            (
                format!("{}/{}", port, DEFAULT_PROTOCOL),
                format!("{}://{}:{}", DEFAULT_PROTOCOL, host, port),
            )
        })
        .collect()
}
