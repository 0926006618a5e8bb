//! Reachable-sum frontier: one witness combination per distinct subset-sum.
//!
//! Witnesses are stored as a backpointer arena (each node holds one item
//! position plus its parent), so extending a combination is O(1) and the full
//! index list is reconstructed once, at the end. Nodes referenced only by
//! pruned entries stay in the arena; the map, not the arena, defines what is
//! still reachable.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

/// Subset-sum value. Total-ordered wrapper so sums can key the ordered map;
/// weights are validated finite before they ever reach the frontier.
pub type Weight = OrderedFloat<f64>;

pub type NodeId = usize;

#[derive(Debug, Clone, Copy)]
struct Node {
    position: usize,
    parent: Option<NodeId>,
}

/// One frontier witness: the tail node of its backpointer chain plus the
/// chain length. `node: None` is the empty combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Entry {
    pub node: Option<NodeId>,
    pub len: usize,
}

/// Memory-economy rule: per distinct sum, keep the witness with fewer items.
/// Does not affect which sums are reachable, only which combination is
/// reported for a given sum.
pub fn shorter_witness(candidate: &Entry, incumbent: &Entry) -> bool {
    candidate.len < incumbent.len
}

/// Merge one candidate into a sum-keyed map under the shorter-witness rule.
pub fn merge_entry(map: &mut BTreeMap<Weight, Entry>, sum: Weight, candidate: Entry) {
    match map.get(&sum) {
        Some(incumbent) if !shorter_witness(&candidate, incumbent) => {}
        _ => {
            map.insert(sum, candidate);
        }
    }
}

#[derive(Debug)]
pub struct Frontier {
    nodes: Vec<Node>,
    sums: BTreeMap<Weight, Entry>,
}

impl Frontier {
    /// Start from the zero-sum, empty-combination entry.
    pub fn new() -> Self {
        let mut sums = BTreeMap::new();
        sums.insert(OrderedFloat(0.0), Entry { node: None, len: 0 });
        Self {
            nodes: Vec::new(),
            sums,
        }
    }

    /// Current entries in ascending sum order. Snapshot, so the caller can
    /// extend the arena while iterating.
    pub fn snapshot(&self) -> Vec<(Weight, Entry)> {
        self.sums.iter().map(|(s, e)| (*s, *e)).collect()
    }

    /// Extend a witness by one item position.
    pub fn extend(&mut self, parent: Entry, position: usize) -> Entry {
        let id = self.nodes.len();
        self.nodes.push(Node {
            position,
            parent: parent.node,
        });
        Entry {
            node: Some(id),
            len: parent.len + 1,
        }
    }

    /// Merge a staged batch of candidates into the frontier.
    pub fn absorb(&mut self, staged: BTreeMap<Weight, Entry>) {
        for (sum, entry) in staged {
            merge_entry(&mut self.sums, sum, entry);
        }
    }

    /// Drop entries that fail `keep`; returns how many were removed.
    pub fn prune<F>(&mut self, mut keep: F) -> u64
    where
        F: FnMut(Weight) -> bool,
    {
        let before = self.sums.len();
        self.sums.retain(|sum, _| keep(*sum));
        (before - self.sums.len()) as u64
    }

    /// Reconstruct the item positions of a witness, in the order the items
    /// were added to the combination.
    pub fn combination(&self, entry: Entry) -> Vec<usize> {
        let mut positions = Vec::with_capacity(entry.len);
        let mut cursor = entry.node;
        while let Some(id) = cursor {
            let node = self.nodes[id];
            positions.push(node.position);
            cursor = node.parent;
        }
        positions.reverse();
        positions
    }
}

impl Default for Frontier {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn w(v: f64) -> Weight {
        OrderedFloat(v)
    }

    #[test]
    fn starts_with_empty_combination() {
        let frontier = Frontier::new();
        let snap = frontier.snapshot();
        assert_eq!(snap.len(), 1);
        assert_eq!(snap[0].0, w(0.0));
        assert_eq!(snap[0].1, Entry { node: None, len: 0 });
    }

    #[test]
    fn extend_and_reconstruct() {
        let mut frontier = Frontier::new();
        let root = Entry { node: None, len: 0 };
        let a = frontier.extend(root, 3);
        let b = frontier.extend(a, 1);
        let c = frontier.extend(b, 7);
        assert_eq!(c.len, 3);
        assert_eq!(frontier.combination(c), vec![3, 1, 7]);
        // Sibling chains share the prefix but not the tail.
        let d = frontier.extend(a, 5);
        assert_eq!(frontier.combination(d), vec![3, 5]);
    }

    #[test]
    fn shorter_witness_wins_merge() {
        let mut map = BTreeMap::new();
        let long = Entry { node: Some(0), len: 3 };
        let short = Entry { node: Some(1), len: 2 };
        merge_entry(&mut map, w(10.0), long);
        merge_entry(&mut map, w(10.0), short);
        assert_eq!(map[&w(10.0)], short);
        // Equal length does not displace the incumbent.
        let other_short = Entry { node: Some(2), len: 2 };
        merge_entry(&mut map, w(10.0), other_short);
        assert_eq!(map[&w(10.0)], short);
    }

    #[test]
    fn prune_counts_removed() {
        let mut frontier = Frontier::new();
        let root = Entry { node: None, len: 0 };
        let a = frontier.extend(root, 0);
        let mut staged = BTreeMap::new();
        staged.insert(w(5.0), a);
        frontier.absorb(staged);
        let removed = frontier.prune(|sum| sum.into_inner() > 1.0);
        assert_eq!(removed, 1);
        assert_eq!(frontier.snapshot().len(), 1);
        // Pruned entries stay reconstructable through the arena.
        assert_eq!(frontier.combination(a), vec![0]);
    }
}
