//! Solver results

use std::fmt;

use super::conditions::Condition;
use super::tree::ElementId;

/// A condition that did not hold after solving
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub element: ElementId,
    pub element_name: Option<String>,
    pub condition: Condition,
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} on {}",
            self.condition,
            self.element_name.as_deref().unwrap_or("<anon>")
        )
    }
}

/// An element that left its parent's padded box and could not be routed
#[derive(Debug, Clone, PartialEq)]
pub struct Overflow {
    pub element: ElementId,
    pub element_name: Option<String>,
    /// The `next` target the element asked for, if any
    pub next: Option<String>,
}

impl fmt::Display for Overflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.element_name.as_deref().unwrap_or("<anon>");
        match &self.next {
            Some(next) => write!(f, "{} overflows (next: '{}')", name, next),
            None => write!(f, "{} overflows", name),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Score {
    /// Sum of condition values, penalties included
    pub result: f64,
    /// Failing conditions in traversal order
    pub fails: Vec<Failure>,
    pub overflows: Vec<Overflow>,
    /// Passes the solver ran
    pub passes: usize,
    /// Calls to `solve` across all passes
    pub solved: usize,
    /// Whether the last pass found nothing to solve
    pub converged: bool,
    /// Whether the loop stopped because a pass left the geometry unchanged
    pub plateaued: bool,
    reroutes: Vec<ElementId>,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, value: f64) {
        self.result += value;
    }

    /// Ask the solver to move `id` to its `next` target between passes
    pub fn request_reroute(&mut self, id: ElementId) {
        if !self.reroutes.contains(&id) {
            self.reroutes.push(id);
        }
    }

    pub fn take_reroutes(&mut self) -> Vec<ElementId> {
        std::mem::take(&mut self.reroutes)
    }

    /// No condition failed
    pub fn is_ok(&self) -> bool {
        self.fails.is_empty()
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Score: {} Fails: {}", self.result, self.fails.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let mut score = Score::new();
        score.add(4.0);
        assert_eq!(score.to_string(), "Score: 4 Fails: 0");
        assert!(score.is_ok());
    }

    #[test]
    fn test_negative_display() {
        let mut score = Score::new();
        score.add(1.0);
        score.add(-10.0);
        assert_eq!(score.to_string(), "Score: -9 Fails: 0");
    }

    #[test]
    fn test_overflow_display() {
        let mut tree = crate::layout::Tree::new();
        let id = tree.add_root(crate::layout::Element::named("item"));
        let routed = Overflow { element: id, element_name: Some("item".into()), next: Some("more".into()) };
        assert_eq!(routed.to_string(), "item overflows (next: 'more')");
        let bare = Overflow { element: id, element_name: None, next: None };
        assert_eq!(bare.to_string(), "<anon> overflows");
    }

    #[test]
    fn test_reroutes_are_deduplicated() {
        let mut tree = crate::layout::Tree::new();
        let id = tree.add_root(crate::layout::Element::named("item"));
        let mut score = Score::new();
        score.request_reroute(id);
        score.request_reroute(id);
        assert_eq!(score.take_reroutes(), vec![id]);
        assert!(score.take_reroutes().is_empty());
    }
}
