//! Layout solving for page element trees
//!
//! Elements live in a [`Tree`]. Each carries a list of [`Condition`]s that
//! relate its box to its parent and prior siblings. The [`Solver`] relaxes
//! those conditions pass by pass and returns a [`Score`].

pub mod conditions;
pub mod config;
pub mod element;
pub mod error;
pub mod frame;
pub mod lint;
pub mod score;
pub mod solver;
pub mod tree;
pub mod types;
pub mod units;

pub use conditions::{Anchor, BaselineAnchor, Condition, ParseRuleError, Rounding, Rule, KNOWN_RULES};
pub use config::SolverConfig;
pub use element::Element;
pub use error::LayoutError;
pub use frame::Frame;
pub use score::{Failure, Overflow, Score};
pub use solver::Solver;
pub use tree::{ElementId, Tree};
pub use types::*;
pub use units::{Base, Length, ParseLengthError};

/// Calculate Levenshtein distance between two strings
fn levenshtein_distance(a: &str, b: &str) -> usize {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (m, n) = (a_chars.len(), b_chars.len());

    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    // Two rolling rows are enough
    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];
    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            let cost = usize::from(a_chars[i - 1] != b_chars[j - 1]);
            curr[j] = (prev[j] + 1).min(curr[j - 1] + 1).min(prev[j - 1] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }
    prev[n]
}

/// Names from `known` within `max_distance` edits of `target`, closest first
///
/// Comparison ignores case, underscores, dashes and spaces so that
/// `Left_2_Lft` still finds `left2left`.
pub fn find_similar<'a, I>(known: I, target: &str, max_distance: usize) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let normalized = normalize(target);
    let mut candidates: Vec<(&str, usize)> = known
        .into_iter()
        .filter_map(|name| {
            let dist = levenshtein_distance(&normalize(name), &normalized);
            (dist <= max_distance && dist > 0).then_some((name, dist))
        })
        .collect();

    candidates.sort_by_key(|(_, d)| *d);
    candidates
        .into_iter()
        .map(|(name, _)| name.to_string())
        .take(3)
        .collect()
}

fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}
