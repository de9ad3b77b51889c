//! Fixed-point relaxation solver
//!
//! Each pass walks the tree depth-first, parents before children and children
//! in insertion order. Every condition of every element is tested in
//! attachment order and solved when it fails. Solving one condition may break
//! another, so passes repeat until nothing needs solving, a pass leaves the
//! geometry untouched, or the pass ceiling is reached. The traversal order is
//! fixed at the start of each pass; elements routed by overflow conditions
//! move between passes.
//!
//! The returned [`Score`] always comes from a final read-only evaluation, so
//! it describes the geometry the caller actually gets.

use tracing::{debug, trace, warn};

use super::conditions::Rule;
use super::config::SolverConfig;
use super::error::LayoutError;
use super::score::{Failure, Overflow, Score};
use super::tree::{ElementId, Tree};
use super::types::{Axis, Reference};

#[derive(Debug, Clone, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Relax the subtree under `root` until its conditions settle
    ///
    /// Layout problems never produce an error: they show up in
    /// [`Score::fails`]. Errors are reserved for malformed input, such as an
    /// unknown root or a parent-requiring condition on a root element.
    pub fn solve(&self, tree: &mut Tree, root: ElementId) -> Result<Score, LayoutError> {
        tree.validate(root)?;

        let max_passes = self.config.max_passes.max(1);
        let mut passes = 0;
        let mut solved_total = 0;
        let mut converged = false;
        let mut plateaued = false;

        while passes < max_passes {
            passes += 1;
            let before = tree.geometry(root);
            let mut scratch = Score::new();

            let solved = self.run_pass(tree, root, &mut scratch);
            solved_total += solved;
            let rerouted = self.apply_reroutes(tree, root, scratch.take_reroutes());
            debug!(pass = passes, solved, rerouted, running = scratch.result, "solver pass");

            if solved == 0 {
                converged = true;
                break;
            }
            if rerouted == 0 && tree.geometry(root) == before {
                debug!(pass = passes, "geometry plateau");
                plateaued = true;
                break;
            }
        }

        if !converged && !plateaued {
            warn!(max_passes, "solver stopped at the pass ceiling");
        }

        let mut score = self.evaluate(tree, root)?;
        score.passes = passes;
        score.solved = solved_total;
        score.converged = converged;
        score.plateaued = plateaued;
        Ok(score)
    }

    /// Test every condition without changing the tree
    pub fn evaluate(&self, tree: &Tree, root: ElementId) -> Result<Score, LayoutError> {
        tree.validate(root)?;

        let mut score = Score::new();
        for id in tree.preorder(root) {
            let Some(element) = tree.get(id) else {
                continue;
            };
            for condition in &element.conditions {
                let passed = condition.test(tree, id);
                score.add(condition.weight(passed));
                if passed {
                    continue;
                }
                score.fails.push(Failure {
                    element: id,
                    element_name: element.name.clone(),
                    condition: condition.clone(),
                });
                if condition.rule.is_overflow() && !Rule::OverflowToNext.test(tree, id, condition.tolerance) {
                    score.overflows.push(Overflow {
                        element: id,
                        element_name: element.name.clone(),
                        next: element.next.clone(),
                    });
                }
            }
        }
        Ok(score)
    }

    /// One depth-first pass; returns the number of `solve` calls
    fn run_pass(&self, tree: &mut Tree, root: ElementId, score: &mut Score) -> usize {
        let mut solved = 0;
        for id in tree.preorder(root) {
            // Conditions never read their own element's condition list
            let Some(conditions) = tree.get_mut(id).map(|e| std::mem::take(&mut e.conditions)) else {
                continue;
            };
            for condition in &conditions {
                if !condition.test(tree, id) {
                    trace!(element = %id, condition = %condition, "solve");
                    condition.solve(tree, id, score);
                    solved += 1;
                }
            }
            if let Some(element) = tree.get_mut(id) {
                element.conditions = conditions;
            }
        }
        solved
    }

    fn apply_reroutes(&self, tree: &mut Tree, root: ElementId, requests: Vec<ElementId>) -> usize {
        requests
            .into_iter()
            .filter(|&id| self.reroute(tree, root, id))
            .count()
    }

    /// Move `id` to the element named by its `next` attribute, placed at the
    /// target's padding origin
    fn reroute(&self, tree: &mut Tree, root: ElementId, id: ElementId) -> bool {
        let Some(next) = tree.get(id).and_then(|e| e.next.clone()) else {
            return false;
        };
        let Some(target) = tree.find(root, &next) else {
            debug!(element = %id, next = %next, "overflow target not found");
            return false;
        };
        if tree.parent(id) == Some(target) {
            return false;
        }
        if let Err(err) = tree.move_to(id, target) {
            debug!(element = %id, error = %err, "overflow reroute rejected");
            return false;
        }

        if let (Some(mut frame), Some(parent)) = (tree.frame(id), tree.frame(target)) {
            let x = parent.reference_extent(Reference::Padding, Axis::X, frame.origin_top);
            let y = parent.reference_extent(Reference::Padding, Axis::Y, frame.origin_top);
            frame.set_margin_min(Axis::X, x.min);
            if frame.origin_top {
                frame.set_margin_min(Axis::Y, y.min);
            } else {
                frame.set_margin_max(Axis::Y, y.max);
            }
            tree.set_frame(id, &frame);
        }
        trace!(element = %id, target = %next, "rerouted overflow");
        true
    }
}
