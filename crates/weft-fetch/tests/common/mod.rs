//! Shared test fixtures: an in-memory gateway network.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use bytes::Bytes;
use tokio::time::Instant;
use weft_fetch::{BoxStream, GatewayConfig, HttpClient};

#[derive(Debug)]
pub struct MockError(pub String);

impl std::fmt::Display for MockError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "{}", self.0) }
}

impl std::error::Error for MockError {}

#[derive(Default)]
struct Inner {
    routes:       Mutex<HashMap<String, Bytes>>,
    down:         Mutex<HashSet<String>>,
    fail_first:   AtomicU32,
    stream_chunk: AtomicU32,
    requests:     Mutex<Vec<(String, Instant)>>,
}

/// Gateway network held in memory. Clones share routes and the request log.
#[derive(Clone)]
pub struct MockClient {
    inner: Arc<Inner>,
}

impl MockClient {
    pub fn new() -> Self {
        let client = Self {
            inner: Arc::new(Inner::default()),
        };
        client.inner.stream_chunk.store(3, Ordering::SeqCst);
        client
    }

    pub fn route(self, url: &str, body: impl Into<Bytes>) -> Self {
        self.inner.routes.lock().unwrap().insert(url.to_string(), body.into());
        self
    }

    pub fn route_json(self, url: &str, value: serde_json::Value) -> Self {
        self.route(url, serde_json::to_vec(&value).unwrap())
    }

    /// Every request whose URL starts with `endpoint` fails.
    pub fn down(self, endpoint: &str) -> Self {
        self.inner.down.lock().unwrap().insert(endpoint.to_string());
        self
    }

    /// The next `n` requests fail regardless of URL.
    pub fn fail_first(self, n: u32) -> Self {
        self.inner.fail_first.store(n, Ordering::SeqCst);
        self
    }

    /// Size of the pieces streamed bodies are split into.
    pub fn stream_chunk(self, size: u32) -> Self {
        self.inner.stream_chunk.store(size, Ordering::SeqCst);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.inner.requests.lock().unwrap().iter().map(|(url, _)| url.clone()).collect()
    }

    pub fn request_times(&self) -> Vec<Instant> {
        self.inner.requests.lock().unwrap().iter().map(|(_, at)| *at).collect()
    }

    pub fn request_count(&self) -> usize { self.inner.requests.lock().unwrap().len() }

    fn respond(&self, url: &str) -> Result<Bytes, MockError> {
        self.inner.requests.lock().unwrap().push((url.to_string(), Instant::now()));

        let failing = self
            .inner
            .fail_first
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok();
        if failing {
            return Err(MockError(format!("{url}: connection reset")));
        }

        if self.inner.down.lock().unwrap().iter().any(|d| url.starts_with(d.as_str())) {
            return Err(MockError(format!("{url}: connection refused")));
        }

        self.inner
            .routes
            .lock()
            .unwrap()
            .get(url)
            .cloned()
            .ok_or_else(|| MockError(format!("{url}: 404 Not Found")))
    }
}

impl HttpClient for MockClient {
    type Error = MockError;

    async fn get(&self, url: &str) -> Result<Bytes, Self::Error> { self.respond(url) }

    async fn stream(
        &self,
        url: &str,
    ) -> Result<BoxStream<'static, Result<Bytes, Self::Error>>, Self::Error> {
        let body = self.respond(url)?;
        let size = self.inner.stream_chunk.load(Ordering::SeqCst).max(1) as usize;
        let pieces: Vec<Result<Bytes, MockError>> = body
            .chunks(size)
            .map(|c| Ok(Bytes::copy_from_slice(c)))
            .collect();
        Ok(Box::pin(futures_util::stream::iter(pieces)))
    }
}

/// Config for tests: no discovery, cache in `cache_dir`.
pub fn config(nodes: &[&str], cache_dir: &std::path::Path) -> GatewayConfig {
    GatewayConfig::default()
        .nodes(nodes.iter().copied())
        .cache_dir(cache_dir)
        .discovery(false)
}
