//! One-shot, best-effort peer discovery from a bootstrap node.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::effects::http::{HttpClient, get_json};
use crate::effects::registry::NodeRegistry;

/// Extends a [`NodeRegistry`] with the peer list of a bootstrap node, at most
/// once per instance.
///
/// The query runs as a detached task. Selection never waits for it, so a
/// `select()` racing the task simply sees the pre-discovery node set.
pub struct PeerDiscovery<C: HttpClient> {
    client:        Arc<C>,
    registry:      NodeRegistry,
    bootstrap_url: String,
    started:       AtomicBool,
}

impl<C: HttpClient + 'static> PeerDiscovery<C> {
    pub fn new(client: Arc<C>, registry: NodeRegistry, bootstrap_url: impl Into<String>) -> Self {
        Self {
            client,
            registry,
            bootstrap_url: bootstrap_url.into().trim_end_matches('/').to_string(),
            started: AtomicBool::new(false),
        }
    }

    /// Spawn the discovery task on the first call.
    ///
    /// Returns the task handle when this call started it, `None` otherwise.
    /// Callers are free to drop the handle; failures are logged and swallowed.
    pub fn discover_once(&self) -> Option<JoinHandle<()>> {
        if self.started.swap(true, Ordering::SeqCst) {
            return None;
        }

        let Ok(runtime) = Handle::try_current() else {
            warn!("no async runtime available, skipping peer discovery");
            return None;
        };

        let client = Arc::clone(&self.client);
        let registry = self.registry.clone();
        let url = format!("{}/peers", self.bootstrap_url);

        Some(runtime.spawn(async move {
            match get_json::<C, Vec<String>>(&*client, &url).await {
                Ok(peers) => {
                    let added = registry.merge(peers.iter().map(|p| normalize_endpoint(p)));
                    info!(added, total = registry.len(), "merged bootstrap peers");
                }
                Err(e) => debug!(error = %e, "peer discovery failed"),
            }
        }))
    }

    pub fn has_started(&self) -> bool { self.started.load(Ordering::SeqCst) }
}

/// Peers are advertised as bare `host:port`; give them a scheme so they can be
/// joined with request paths.
pub fn normalize_endpoint(peer: &str) -> String {
    let peer = peer.trim().trim_end_matches('/');
    if peer.contains("://") {
        peer.to_string()
    } else {
        format!("http://{peer}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_peers_get_http_scheme() {
        assert_eq!(normalize_endpoint("10.0.0.1:1984"), "http://10.0.0.1:1984");
        assert_eq!(normalize_endpoint(" 10.0.0.1:1984 "), "http://10.0.0.1:1984");
    }

    #[test]
    fn urls_are_kept() {
        assert_eq!(normalize_endpoint("https://arweave.net/"), "https://arweave.net");
        assert_eq!(normalize_endpoint("http://lon-1:1984"), "http://lon-1:1984");
    }
}
