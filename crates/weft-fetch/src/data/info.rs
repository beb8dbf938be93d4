use serde::{Deserialize, Serialize};

/// Status reported by `GET <node>/info`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeInfo {
    pub network:            String,
    pub version:            u64,
    pub release:            u64,
    pub height:             u64,
    pub current:            String,
    pub blocks:             u64,
    pub peers:              u64,
    pub queue_length:       u64,
    pub node_state_latency: u64,
}
