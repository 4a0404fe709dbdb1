use std::collections::VecDeque;

use crate::foods::Food;

use super::scorer::ScoredFood;

const DEFAULT_CATEGORY: &str = "other";

/// Round-robin selection across food categories.
///
/// Candidates are ranked by score, then bucketed by category in the order
/// categories first appear in that ranking. Each round visits the surviving
/// categories in that fixed order and takes the best remaining item from
/// each; exhausted categories drop out. Stops at `n` items or when every
/// bucket is empty. No category can dominate the result, and within a
/// category higher scores always come first.
pub fn diversify(mut scored: Vec<ScoredFood>, n: usize) -> Vec<Food> {
    scored.sort_by(|a, b| b.score.total_cmp(&a.score));

    let mut buckets: Vec<(String, VecDeque<Food>)> = Vec::new();
    for entry in scored {
        let category = entry
            .food
            .category
            .clone()
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        match buckets.iter_mut().find(|(c, _)| *c == category) {
            Some((_, bucket)) => bucket.push_back(entry.food),
            None => buckets.push((category, VecDeque::from([entry.food]))),
        }
    }

    let mut selected = Vec::new();
    while selected.len() < n && !buckets.is_empty() {
        let mut survivors = Vec::with_capacity(buckets.len());
        for (category, mut bucket) in buckets {
            if selected.len() < n {
                if let Some(best) = bucket.pop_front() {
                    selected.push(best);
                }
            }
            if !bucket.is_empty() {
                survivors.push((category, bucket));
            }
        }
        buckets = survivors;
    }
    selected
}
