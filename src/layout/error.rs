//! Error types for the layout solver
//!
//! Layout problems (unsatisfiable or conflicting conditions) are never errors:
//! they show up as failures in the [`Score`](super::score::Score). The errors
//! here are programmer mistakes caught by tree operations and by the solver's
//! upfront validation.

use thiserror::Error;

use super::tree::ElementId;

#[derive(Debug, Error, PartialEq)]
pub enum LayoutError {
    /// An id that does not refer to a live element
    #[error("unknown element {id}")]
    UnknownElement { id: ElementId },

    /// A condition that measures against a parent, attached to a root
    #[error("condition '{condition}' on '{element}' needs a parent, but the element is a root")]
    RootCondition { element: String, condition: String },

    /// A condition whose parameters make no sense
    #[error("invalid condition '{condition}' on '{element}': {reason}")]
    InvalidCondition {
        element: String,
        condition: String,
        reason: String,
    },

    /// The parent link of a node disagrees with its container
    #[error("malformed tree at '{element}': {reason}")]
    MalformedTree { element: String, reason: String },

    /// Moving an element below itself
    #[error("cannot move '{element}' into its own subtree")]
    MoveIntoDescendant { element: String },
}

impl LayoutError {
    pub fn unknown(id: ElementId) -> Self {
        Self::UnknownElement { id }
    }

    pub fn root_condition(element: impl Into<String>, condition: impl Into<String>) -> Self {
        Self::RootCondition {
            element: element.into(),
            condition: condition.into(),
        }
    }

    pub fn invalid_condition(
        element: impl Into<String>,
        condition: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidCondition {
            element: element.into(),
            condition: condition.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(element: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedTree {
            element: element.into(),
            reason: reason.into(),
        }
    }

    pub fn move_into_descendant(element: impl Into<String>) -> Self {
        Self::MoveIntoDescendant {
            element: element.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_condition_display() {
        let err = LayoutError::root_condition("page", "Left2Left");
        assert_eq!(
            err.to_string(),
            "condition 'Left2Left' on 'page' needs a parent, but the element is a root"
        );
    }

    #[test]
    fn test_invalid_condition_display() {
        let err = LayoutError::invalid_condition("box", "Left2Top", "anchor and target on different axes");
        assert!(err.to_string().contains("different axes"));
    }

    #[test]
    fn test_move_into_descendant_display() {
        let err = LayoutError::move_into_descendant("column");
        assert!(err.to_string().contains("own subtree"));
    }
}
