//! Error types for loading page documents

use thiserror::Error;

use crate::layout::{LayoutError, ParseLengthError};

#[derive(Error, Debug)]
pub enum DocumentError {
    #[error("failed to read document: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse document TOML: {0}")]
    Toml(#[from] toml::de::Error),

    /// A condition name that matches no rule
    #[error("unknown condition '{name}' on '{element}'{}", format_suggestions(.suggestions))]
    UnknownCondition {
        element: String,
        name: String,
        suggestions: Vec<String>,
    },

    /// A known condition with arguments that do not fit it
    #[error("bad condition on '{element}': {reason}")]
    BadCondition { element: String, reason: String },

    #[error("invalid {field} on '{element}': {source}")]
    InvalidLength {
        element: String,
        field: &'static str,
        source: ParseLengthError,
    },

    /// A value with the wrong shape, such as three padding sides
    #[error("invalid {field} on '{element}': {reason}")]
    InvalidValue {
        element: String,
        field: &'static str,
        reason: String,
    },

    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

impl DocumentError {
    pub fn unknown_condition(element: impl Into<String>, name: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self::UnknownCondition {
            element: element.into(),
            name: name.into(),
            suggestions,
        }
    }

    pub fn bad_condition(element: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::BadCondition {
            element: element.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_value(element: impl Into<String>, field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            element: element.into(),
            field,
            reason: reason.into(),
        }
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    match suggestions {
        [] => String::new(),
        [one] => format!(" (did you mean '{}'?)", one),
        many => {
            let quoted: Vec<String> = many.iter().map(|s| format!("'{}'", s)).collect();
            format!(" (did you mean one of {}?)", quoted.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_condition_message() {
        let err = DocumentError::unknown_condition("box", "left2lft", vec!["left2left".to_string()]);
        assert_eq!(
            err.to_string(),
            "unknown condition 'left2lft' on 'box' (did you mean 'left2left'?)"
        );
    }

    #[test]
    fn test_unknown_condition_without_suggestions() {
        let err = DocumentError::unknown_condition("box", "zzz", vec![]);
        assert_eq!(err.to_string(), "unknown condition 'zzz' on 'box'");
    }

    #[test]
    fn test_several_suggestions() {
        let err = DocumentError::unknown_condition(
            "box",
            "fit2",
            vec!["fit".to_string(), "fit2top".to_string()],
        );
        assert!(err.to_string().ends_with("(did you mean one of 'fit', 'fit2top'?)"));
    }
}
