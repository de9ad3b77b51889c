//! Configuration for the outline view

/// Configuration options for outline output
#[derive(Debug, Clone, PartialEq)]
pub struct OutlineConfig {
    /// Spaces per tree level
    pub indent: usize,

    /// Decimal places for coordinates
    pub precision: usize,

    /// Whether to list each element's conditions after its box
    pub show_conditions: bool,
}

impl Default for OutlineConfig {
    fn default() -> Self {
        Self {
            indent: 2,
            precision: 1,
            show_conditions: false,
        }
    }
}

impl OutlineConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the indentation per level
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Set the number of decimals
    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    /// Set whether conditions are printed
    pub fn with_conditions(mut self, show: bool) -> Self {
        self.show_conditions = show;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = OutlineConfig::default();
        assert_eq!(config.indent, 2);
        assert_eq!(config.precision, 1);
        assert!(!config.show_conditions);
    }

    #[test]
    fn test_builder_pattern() {
        let config = OutlineConfig::new()
            .with_indent(4)
            .with_precision(0)
            .with_conditions(true);

        assert_eq!(config.indent, 4);
        assert_eq!(config.precision, 0);
        assert!(config.show_conditions);
    }
}
