//! Immutable data types for gateway fetching.
//!
//! This module contains the node, chunk and option types that are passed
//! between the pure core and the effectful layer.

pub mod chunk;
pub mod info;
pub mod node;
pub mod options;

pub use chunk::{ChunkRange, ChunkRecord};
pub use info::NodeInfo;
pub use node::{MAX_WEIGHT, MIN_WEIGHT, NEUTRAL_WEIGHT, Node};
pub use options::RetryOptions;
