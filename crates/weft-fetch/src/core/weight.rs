use crate::data::{MAX_WEIGHT, MIN_WEIGHT, Node};

/// Weight after a successful request.
pub fn warm(weight: u32) -> u32 { weight.saturating_add(1).clamp(MIN_WEIGHT, MAX_WEIGHT) }

/// Weight after a failed request.
pub fn cool(weight: u32) -> u32 { weight.saturating_sub(1).clamp(MIN_WEIGHT, MAX_WEIGHT) }

pub fn total_weight(nodes: &[Node]) -> u64 { nodes.iter().map(|n| u64::from(n.weight)).sum() }

/// Map a roll in `[0, total_weight)` onto the node owning that slice of the
/// cumulative weight line.
///
/// Returns `None` for an empty slice or an out-of-range roll.
pub fn pick_weighted(nodes: &[Node], roll: u64) -> Option<usize> {
    let mut upper = 0u64;
    for (index, node) in nodes.iter().enumerate() {
        upper += u64::from(node.weight);
        if roll < upper {
            return Some(index);
        }
    }
    None
}
