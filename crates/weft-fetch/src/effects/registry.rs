//! Shared, weighted set of gateway nodes.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use rand::Rng;
use tracing::trace;

use crate::core::{cool, pick_weighted, total_weight, warm};
use crate::data::Node;
use crate::error::{Error, Result};

/// Ordered collection of unique nodes, cheap to clone and shared between the
/// fetcher and background discovery.
///
/// The lock is only held for short synchronous sections and never across an
/// `.await`.
#[derive(Clone, Debug, Default)]
pub struct NodeRegistry {
    nodes: Arc<Mutex<Vec<Node>>>,
}

impl NodeRegistry {
    /// Seed the registry, dropping duplicate endpoints.
    pub fn new<I, S>(endpoints: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let registry = Self::default();
        registry.merge(endpoints);
        registry
    }

    /// Weighted random choice over all nodes.
    pub fn select(&self) -> Result<String> { self.select_with(&mut rand::thread_rng()) }

    /// [`select`](Self::select) with a caller supplied random source.
    pub fn select_with<R: Rng>(&self, rng: &mut R) -> Result<String> {
        let nodes = self.lock();
        let total = total_weight(&nodes);
        if total == 0 {
            return Err(Error::NoNodes);
        }

        let roll = rng.gen_range(0..total);
        let index = pick_weighted(&nodes, roll).ok_or(Error::NoNodes)?;
        Ok(nodes[index].endpoint.clone())
    }

    /// Raise the weight of `endpoint`. Unknown endpoints are ignored.
    pub fn record_success(&self, endpoint: &str) { self.adjust(endpoint, warm) }

    /// Lower the weight of `endpoint`. Unknown endpoints are ignored.
    pub fn record_failure(&self, endpoint: &str) { self.adjust(endpoint, cool) }

    /// Add endpoints not yet known at the neutral weight, leaving known ones
    /// untouched. Returns how many were added.
    pub fn merge<I, S>(&self, endpoints: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut nodes = self.lock();
        let mut added = 0;
        for endpoint in endpoints {
            let endpoint = endpoint.into();
            if !nodes.iter().any(|n| n.endpoint == endpoint) {
                nodes.push(Node::new(endpoint));
                added += 1;
            }
        }
        added
    }

    pub fn weight_of(&self, endpoint: &str) -> Option<u32> {
        self.lock()
            .iter()
            .find(|n| n.endpoint == endpoint)
            .map(|n| n.weight)
    }

    /// Copy of the current nodes, in insertion order.
    pub fn snapshot(&self) -> Vec<Node> { self.lock().clone() }

    pub fn len(&self) -> usize { self.lock().len() }

    pub fn is_empty(&self) -> bool { self.lock().is_empty() }

    fn adjust(&self, endpoint: &str, feedback: fn(u32) -> u32) {
        let mut nodes = self.lock();
        if let Some(node) = nodes.iter_mut().find(|n| n.endpoint == endpoint) {
            node.weight = feedback(node.weight);
            trace!(endpoint, weight = node.weight, "adjusted node weight");
        }
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Node>> {
        self.nodes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
