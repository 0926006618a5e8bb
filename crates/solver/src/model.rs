use serde::Serialize;

/// The best subset found for one search.
///
/// `combination` borrows the caller's items by identity, so callers may read
/// any other field on the originals. Invariants: `sum` is the weight total of
/// `combination` and `difference == |target - sum|`.
#[derive(Debug, Clone, Serialize)]
pub struct Selection<'a, T> {
    pub sum: f64,
    pub combination: Vec<&'a T>,
    pub difference: f64,
    pub proof: SearchProof,
}

/// How the search arrived at its answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchProof {
    /// Candidate extensions examined.
    pub nodes_visited: u64,
    /// Frontier entries discarded by the envelope bound.
    pub nodes_pruned: u64,
    /// Search stopped because the budget ran out; the result is best-effort.
    pub cap_hit: bool,
    /// The result came from the heaviest-single-item fallback rather than a
    /// combination that beat the initial bound.
    pub fallback: bool,
}
