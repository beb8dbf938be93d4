/// Lowest weight a node can fall to.
pub const MIN_WEIGHT: u32 = 1;

/// Highest weight a node can climb to.
pub const MAX_WEIGHT: u32 = 99;

/// Weight given to seeded and newly discovered nodes.
pub const NEUTRAL_WEIGHT: u32 = 1;

/// One gateway endpoint tracked with an adaptive weight.
///
/// The weight is always within `[MIN_WEIGHT, MAX_WEIGHT]`; repeated successes
/// or failures past a bound saturate instead of moving it further.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Node {
    /// Base URL of the node, without a trailing slash.
    pub endpoint: String,

    /// Relative selection weight.
    pub weight: u32,
}

impl Node {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            weight:   NEUTRAL_WEIGHT,
        }
    }

    pub fn weight(mut self, weight: u32) -> Self {
        self.weight = weight.clamp(MIN_WEIGHT, MAX_WEIGHT);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_starts_neutral() {
        assert_eq!(Node::new("http://a").weight, NEUTRAL_WEIGHT);
    }

    #[test]
    fn weight_builder_clamps() {
        assert_eq!(Node::new("http://a").weight(0).weight, MIN_WEIGHT);
        assert_eq!(Node::new("http://a").weight(500).weight, MAX_WEIGHT);
        assert_eq!(Node::new("http://a").weight(42).weight, 42);
    }
}
