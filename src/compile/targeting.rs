use crate::scene::model::LayerNode;
use std::borrow::Borrow;

/// Sibling indices a processor applies to, in sibling order.
///
/// At the root a processor targets only the node directly before it, and nothing when that node
/// is itself a processor. Inside a group it targets every node back to the previous processor
/// (exclusive) or the start of the group. Index 0, out-of-range indices and non-processor nodes
/// have no targets.
pub fn targets<N: Borrow<LayerNode>>(siblings: &[N], index: usize, is_root: bool) -> Vec<usize> {
    if index == 0 || index >= siblings.len() || !siblings[index].borrow().is_processor() {
        return Vec::new();
    }
    if is_root {
        let prev = index - 1;
        if siblings[prev].borrow().is_processor() {
            return Vec::new();
        }
        return vec![prev];
    }
    let start = siblings[..index]
        .iter()
        .rposition(|n| n.borrow().is_processor())
        .map_or(0, |p| p + 1);
    (start..index).collect()
}

#[cfg(test)]
#[path = "../../tests/unit/compile/targeting.rs"]
mod tests;
