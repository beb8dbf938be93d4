//! I/O operations and effectful computations for gateway fetching.
//!
//! Everything that touches the network, the filesystem, a clock or a random
//! source lives here, behind the [`HttpClient`] and [`ChunkSource`] seams.

mod cache;
mod chunks;
mod discovery;
mod fetcher;
mod gateway;
mod http;
mod registry;
mod stream;

pub use cache::{HASH_LIST_FILE, ListingCache};
pub use chunks::{ChunkReconstructor, ChunkSource, GatewayChunkSource};
pub use discovery::{PeerDiscovery, normalize_endpoint};
pub use fetcher::{RetryingFetcher, SelectHook};
pub use gateway::Gateway;
pub use http::{BoxStream, HttpClient};
pub use registry::NodeRegistry;
pub use stream::decode_base64url_stream;

#[cfg(feature = "reqwest")]
pub use http::ReqwestClient;
