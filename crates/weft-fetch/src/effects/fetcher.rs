use std::future::Future;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::core::retry_delay;
use crate::data::RetryOptions;
use crate::effects::registry::NodeRegistry;
use crate::error::{Error, Result};

/// Hook run before every node selection.
pub type SelectHook = Arc<dyn Fn() + Send + Sync>;

/// Runs one logical request against registry-selected nodes until it succeeds
/// or the retry policy gives up.
///
/// Every outcome is fed back into the registry: successes warm the node that
/// served the request, failures cool it.
#[derive(Clone)]
pub struct RetryingFetcher {
    registry:      NodeRegistry,
    before_select: Option<SelectHook>,
}

impl std::fmt::Debug for RetryingFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingFetcher")
            .field("registry", &self.registry)
            .field("before_select", &self.before_select.as_ref().map(|_| "{ ... }"))
            .finish()
    }
}

impl RetryingFetcher {
    pub fn new(registry: NodeRegistry) -> Self {
        Self {
            registry,
            before_select: None,
        }
    }

    /// Install a hook invoked before each selection, e.g. to kick off discovery.
    #[must_use]
    pub fn before_select(mut self, hook: SelectHook) -> Self {
        self.before_select = Some(hook);
        self
    }

    pub fn registry(&self) -> &NodeRegistry { &self.registry }

    /// Pick a node for a request.
    pub fn select(&self) -> Result<String> {
        if let Some(ref hook) = self.before_select {
            hook();
        }
        self.registry.select()
    }

    /// Call `request` with a selected endpoint until it returns `Ok`.
    ///
    /// Between failures the loop sleeps `base_delay + per_retry_delay * n`.
    /// Once `max_retries` attempts have failed it either returns
    /// [`Error::RetriesExhausted`] or, when `require_eventual_success` is set,
    /// sleeps for `extended_backoff`, resets the count and carries on.
    ///
    /// An empty registry fails immediately and is never retried.
    pub async fn fetch<T, F, Fut>(&self, options: &RetryOptions, mut request: F) -> Result<T>
    where
        F: FnMut(String) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut retry_count: u32 = 0;

        loop {
            let endpoint = self.select()?;

            let err = match request(endpoint.clone()).await {
                Ok(value) => {
                    self.registry.record_success(&endpoint);
                    return Ok(value);
                }
                Err(err) => err,
            };

            self.registry.record_failure(&endpoint);
            debug!(endpoint = %endpoint, attempt = retry_count + 1, error = %err, "request failed");

            let delay = retry_delay(retry_count, options.base_delay, options.per_retry_delay);
            retry_count += 1;

            if retry_count >= options.max_retries {
                if !options.require_eventual_success {
                    return Err(Error::RetriesExhausted {
                        attempts:   retry_count,
                        last_error: Box::new(err),
                    });
                }

                warn!(
                    attempts = retry_count,
                    backoff_secs = options.extended_backoff.as_secs(),
                    "failed to reach any node, check the network status, trying again later"
                );
                tokio::time::sleep(options.extended_backoff).await;
                retry_count = 0;
                continue;
            }

            tokio::time::sleep(delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::time::Duration;

    fn fast() -> RetryOptions {
        RetryOptions::default()
            .base_delay(Duration::ZERO)
            .per_retry_delay(Duration::ZERO)
    }

    #[tokio::test]
    async fn success_warms_the_node() {
        let fetcher = RetryingFetcher::new(NodeRegistry::new(["http://a"]));
        let value = fetcher
            .fetch(&fast(), |endpoint| async move { Ok(format!("{endpoint}/info")) })
            .await
            .unwrap();

        assert_eq!(value, "http://a/info");
        assert_eq!(fetcher.registry().weight_of("http://a"), Some(2));
    }

    #[tokio::test]
    async fn recovers_after_transient_failures() {
        let fetcher = RetryingFetcher::new(NodeRegistry::new(["http://a"]));
        let calls = AtomicU32::new(0);

        let value = fetcher
            .fetch(&fast(), |endpoint| {
                let n = calls.fetch_add(1, Ordering::SeqCst);
                async move {
                    if n < 3 {
                        Err(Error::http(&endpoint, "connection reset"))
                    } else {
                        Ok(n)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(value, 3);
        assert_eq!(calls.load(Ordering::SeqCst), 4);
    }

    #[tokio::test]
    async fn empty_registry_is_not_retried() {
        let fetcher = RetryingFetcher::new(NodeRegistry::default());
        let calls = AtomicU32::new(0);

        let result: Result<()> = fetcher
            .fetch(&fast(), |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok(()) }
            })
            .await;

        assert!(matches!(result, Err(Error::NoNodes)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn zero_max_retries_still_attempts_once() {
        let fetcher = RetryingFetcher::new(NodeRegistry::new(["http://a"]));
        let calls = AtomicU32::new(0);

        let result: Result<()> = fetcher
            .fetch(&fast().max_retries(0), |endpoint| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Err(Error::http(&endpoint, "down")) }
            })
            .await;

        assert!(matches!(result, Err(Error::RetriesExhausted { attempts: 1, .. })));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn hook_runs_before_each_selection() {
        let hooks = Arc::new(AtomicU32::new(0));
        let counter = Arc::clone(&hooks);
        let fetcher = RetryingFetcher::new(NodeRegistry::new(["http://a"])).before_select(Arc::new(
            move || {
                counter.fetch_add(1, Ordering::SeqCst);
            },
        ));

        let result: Result<()> = fetcher
            .fetch(&fast().max_retries(3), |endpoint| async move {
                Err(Error::http(&endpoint, "down"))
            })
            .await;

        assert!(result.is_err());
        assert_eq!(hooks.load(Ordering::SeqCst), 3);
    }
}
