//! Bounded reachable-sum search for the closest subset sum.

use std::collections::BTreeMap;

use ordered_float::OrderedFloat;

use crate::config::SearchBudget;
use crate::error::SolverError;
use crate::frontier::{merge_entry, Entry, Frontier, Weight};
use crate::model::{SearchProof, Selection};

struct WeightedItem {
    position: usize,
    weight: Weight,
}

/// Best difference still reachable from `sum` given the weights not yet
/// processed. The envelope of reachable extensions is
/// `[sum, sum + remaining]`: entirely below target means the gap to the
/// envelope top is the floor, entirely above means the gap from the envelope
/// bottom, otherwise an exact match is still possible.
pub fn best_possible_difference(sum: f64, remaining: f64, target: f64) -> f64 {
    let max_reachable = sum + remaining;
    if max_reachable < target {
        target - max_reachable
    } else if sum > target {
        sum - target
    } else {
        0.0
    }
}

/// Tie-break rule: a strictly closer difference wins; among equally close
/// candidates, the larger sum wins.
pub fn improves(diff: f64, sum: Weight, best_diff: f64, best_sum: Weight) -> bool {
    diff < best_diff || (diff == best_diff && sum > best_sum)
}

/// Find the subset of `items` whose weights sum closest to `target`.
///
/// `weight_of` is the caller-supplied field selector; it must yield a finite
/// weight for every item. The returned combination borrows items from the
/// input by identity.
///
/// The zero-sum empty subset seeds the initial best-known difference as a
/// pruning bound but is never reported: if no non-empty combination beats
/// that bound, the heaviest single item is returned instead
/// (`proof.fallback`). Empty input returns an empty combination with
/// difference `|target|`.
///
/// The search is deterministic: identical input and target yield identical
/// output. When `budget.max_nodes` runs out the best result so far is
/// returned with `proof.cap_hit` set.
pub fn closest<'a, T, F>(
    items: &'a [T],
    target: f64,
    weight_of: F,
    budget: &SearchBudget,
) -> Result<Selection<'a, T>, SolverError>
where
    F: Fn(&T) -> Option<f64>,
{
    if !target.is_finite() {
        return Err(SolverError::NonFiniteTarget(target));
    }

    // Validate every weight up front. A NaN or infinity slipping into the
    // sums would corrupt every later comparison and bound.
    let mut sorted: Vec<WeightedItem> = Vec::with_capacity(items.len());
    for (position, item) in items.iter().enumerate() {
        let value = weight_of(item).ok_or(SolverError::MissingWeight { position })?;
        if !value.is_finite() {
            return Err(SolverError::NonFiniteWeight { position, value });
        }
        sorted.push(WeightedItem { position, weight: OrderedFloat(value) });
    }

    let mut proof = SearchProof {
        nodes_visited: 0,
        nodes_pruned: 0,
        cap_hit: false,
        fallback: false,
    };

    if sorted.is_empty() {
        return Ok(Selection {
            sum: 0.0,
            combination: Vec::new(),
            difference: target.abs(),
            proof,
        });
    }

    // Largest weights first: shrinks the remaining-weight envelope fastest,
    // which tightens the bound earliest. Ties fall back to input order so the
    // search stays deterministic. Purely an optimization, never correctness.
    sorted.sort_by(|a, b| b.weight.cmp(&a.weight).then_with(|| a.position.cmp(&b.position)));

    let zero = OrderedFloat(0.0);
    let total = sorted.iter().fold(zero, |acc, item| acc + item.weight);
    let mut remaining = total;

    let mut frontier = Frontier::new();

    // The empty subset seeds the bound; `best_entry` stays None until a
    // non-empty combination improves on it.
    let mut best_sum = zero;
    let mut best_diff = target.abs();
    let mut best_entry: Option<Entry> = None;

    'items: for item in &sorted {
        remaining = remaining - item.weight;

        let mut staged: BTreeMap<Weight, Entry> = BTreeMap::new();

        for (sum, entry) in frontier.snapshot() {
            if proof.nodes_visited >= budget.max_nodes {
                proof.cap_hit = true;
                break 'items;
            }
            proof.nodes_visited += 1;

            let candidate_sum = sum + item.weight;
            let candidate = frontier.extend(entry, item.position);

            // The bound gates best-known updates only. Equal-bound branches
            // are admitted: a branch whose floor ties the best can still win
            // on the larger-sum rule. Either way the candidate is a genuinely
            // reachable sum, so it stays in the frontier for later items to
            // extend.
            let bound = best_possible_difference(
                candidate_sum.into_inner(),
                remaining.into_inner(),
                target,
            );
            if bound <= best_diff {
                let diff = (target - candidate_sum.into_inner()).abs();
                if improves(diff, candidate_sum, best_diff, best_sum) {
                    best_sum = candidate_sum;
                    best_diff = diff;
                    best_entry = Some(candidate);
                }
            }

            merge_entry(&mut staged, candidate_sum, candidate);
        }

        frontier.absorb(staged);

        // Drop entries whose whole envelope can no longer beat or tie the
        // best; an entry that can still realize the best-known difference may
        // yet win the tie-break with a larger sum.
        if best_diff != 0.0 {
            let rem = remaining.into_inner();
            proof.nodes_pruned += frontier
                .prune(|sum| best_possible_difference(sum.into_inner(), rem, target) <= best_diff);
        }

        // Nothing beats an exact match.
        if best_diff == 0.0 {
            break;
        }
    }

    let (sum, positions, difference) = match best_entry {
        Some(entry) => (best_sum.into_inner(), frontier.combination(entry), best_diff),
        None => {
            // No non-empty combination beat the initial bound; report the
            // heaviest single item rather than an empty selection.
            proof.fallback = true;
            let heaviest = &sorted[0];
            let sum = heaviest.weight.into_inner();
            (sum, vec![heaviest.position], (target - sum).abs())
        }
    };

    let combination = positions.iter().map(|&p| &items[p]).collect();

    Ok(Selection {
        sum,
        combination,
        difference,
        proof,
    })
}
