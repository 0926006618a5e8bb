//! `sumfit-solver`: bounded closest-subset-sum search engine.
//!
//! Pure engine crate: receives caller-owned items and a target, returns the
//! subset whose weight total lands closest to the target. No CLI or IO
//! dependencies.

pub mod config;
pub mod error;
pub mod frontier;
pub mod model;
pub mod search;

pub use config::SearchBudget;
pub use error::SolverError;
pub use model::{SearchProof, Selection};
pub use search::closest;
