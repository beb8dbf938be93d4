//! Adaptive fetching from a network of HTTP gateway nodes of varying reliability.
//!
//! # Architecture
//!
//! This crate follows the three-layer pattern:
//! - [`data`] - Immutable configuration and types
//! - [`core`](crate::core) - Pure transformations (weight clamping, weighted picks, backoff, base64url)
//! - [`effects`] - I/O operations with trait abstraction
//!
//! # Key Features
//!
//! - **Adaptive Selection**: nodes are picked proportionally to a weight that
//!   successes raise and failures lower, saturating in `[1, 99]`
//! - **Two Exhaustion Policies**: give up after `max_retries`, or back off for a
//!   minute and keep trying forever
//! - **Chunk Reconstruction**: large payloads are assembled from sequential
//!   offset-addressed chunks
//! - **Streaming Decoding**: base64url bodies are decoded chunk by chunk without
//!   buffering the whole payload

pub mod config;
pub mod core;
pub mod data;
pub mod effects;
mod error;

pub use config::GatewayConfig;
pub use crate::core::{Base64UrlDecoder, retry_delay};
pub use data::{ChunkRange, ChunkRecord, Node, NodeInfo, RetryOptions};
pub use effects::{
    BoxStream, ChunkReconstructor, ChunkSource, Gateway, GatewayChunkSource, HttpClient,
    ListingCache, NodeRegistry, PeerDiscovery, RetryingFetcher, decode_base64url_stream,
};

#[cfg(feature = "reqwest")]
pub use effects::ReqwestClient;

pub use error::{Error, Result};
