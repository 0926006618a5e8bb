use serde::Deserialize;

/// Cap on search effort. Subset-sum is exponential in the worst case; the
/// budget turns a runaway search into a best-effort result with
/// `proof.cap_hit = true` instead of an unbounded call.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchBudget {
    /// Maximum number of candidate extensions to examine.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: u64,
}

fn default_max_nodes() -> u64 {
    500_000
}

impl Default for SearchBudget {
    fn default() -> Self {
        Self {
            max_nodes: default_max_nodes(),
        }
    }
}
