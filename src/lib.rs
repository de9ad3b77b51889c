//! Page Solver - a condition-driven layout solver for page elements
//!
//! Elements form a tree of boxes. Conditions attached to each element
//! ("left edge on the parent's padding", "float below the previous sibling",
//! "snap the first baseline to a 24pt grid") are relaxed pass by pass until
//! they all hold or the layout stops changing.
//!
//! # Example
//!
//! ```rust
//! use page_solver::run;
//!
//! let report = run(r#"
//! [[pages]]
//! name = "page"
//! w = 200
//! h = 100
//!
//! [[pages.elements]]
//! name = "box"
//! x = 30
//! w = 50
//! h = 20
//! conditions = ["left2left"]
//! "#).unwrap();
//!
//! assert!(report.is_ok());
//! assert!(report.to_string().contains("[box] x=0.0 y=80.0"));
//! ```

pub mod document;
pub mod error;
pub mod layout;
pub mod renderer;

use std::fmt;

pub use document::{Document, Page};
pub use error::DocumentError;
pub use layout::{
    Condition, Element, ElementId, LayoutError, Length, Rule, Score, Solver, SolverConfig, Tree,
};
pub use renderer::{draw, outline, DrawNode, OutlineConfig, View};

use layout::lint::LintWarning;
use thiserror::Error;
use tracing::info;

/// Errors that can occur during the solve pipeline
#[derive(Debug, Error)]
pub enum RunError {
    /// Error while loading the document
    #[error("{0}")]
    Document(#[from] DocumentError),

    /// Error while drawing a solved page
    #[error("layout error: {0}")]
    Layout(#[from] LayoutError),
}

/// Configuration for the complete solve pipeline
#[derive(Debug, Clone, Default)]
pub struct RunConfig {
    /// Replaces the document's pass ceiling
    pub max_passes: Option<usize>,
    /// Outline output configuration
    pub outline: OutlineConfig,
    /// Run lint checks on every page after solving
    pub lint: bool,
    /// Score the pages as written, without solving
    pub evaluate_only: bool,
}

impl RunConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_max_passes(mut self, max_passes: usize) -> Self {
        self.max_passes = Some(max_passes);
        self
    }

    pub fn with_outline(mut self, config: OutlineConfig) -> Self {
        self.outline = config;
        self
    }

    pub fn with_lint(mut self, lint: bool) -> Self {
        self.lint = lint;
        self
    }

    pub fn with_evaluate_only(mut self, evaluate_only: bool) -> Self {
        self.evaluate_only = evaluate_only;
        self
    }
}

/// Outcome of one page
#[derive(Debug, Clone)]
pub struct PageReport {
    pub name: String,
    pub score: Score,
    pub outline: String,
    pub lints: Vec<LintWarning>,
}

impl fmt::Display for PageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "== {} ==", self.name)?;
        write!(f, "{}", self.outline)?;
        writeln!(f, "{}", self.score)?;
        for fail in &self.score.fails {
            writeln!(f, "fail: {}", fail)?;
        }
        for overflow in &self.score.overflows {
            writeln!(f, "overflow: {}", overflow)?;
        }
        for lint in &self.lints {
            writeln!(f, "lint: {}", lint)?;
        }
        Ok(())
    }
}

/// Outcome of a whole document, pages in document order
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub pages: Vec<PageReport>,
}

impl Report {
    /// No condition failed on any page
    pub fn is_ok(&self) -> bool {
        self.pages.iter().all(|p| p.score.is_ok())
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, page) in self.pages.iter().enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", page)?;
        }
        Ok(())
    }
}

/// Solve a TOML page document with default configuration
pub fn run(source: &str) -> Result<Report, RunError> {
    run_with_config(source, RunConfig::default())
}

/// Solve a TOML page document with custom configuration
///
/// # Example
///
/// ```rust
/// use page_solver::{run_with_config, OutlineConfig, RunConfig};
///
/// let config = RunConfig::new()
///     .with_max_passes(4)
///     .with_outline(OutlineConfig::new().with_precision(0));
///
/// let report = run_with_config("[[pages]]\nname = \"empty\"\nw = 10\nh = 10", config).unwrap();
/// assert_eq!(report.pages[0].outline, "[empty] x=0 y=0 w=10 h=10\n");
/// ```
pub fn run_with_config(source: &str, config: RunConfig) -> Result<Report, RunError> {
    let mut doc: Document = source.parse()?;
    if let Some(max_passes) = config.max_passes {
        doc.solver = doc.solver.with_max_passes(max_passes);
    }

    let scores = if config.evaluate_only {
        doc.evaluate()?
    } else {
        doc.solve()?
    };

    let mut pages = Vec::with_capacity(doc.pages.len());
    for (page, score) in doc.pages.iter().zip(scores) {
        info!(page = page.name(), result = score.result, fails = score.fails.len(), "page done");
        let lints = if config.lint {
            layout::lint::check(&page.tree, page.root)
        } else {
            vec![]
        };
        pages.push(PageReport {
            name: page.name().to_string(),
            outline: outline(&page.tree, page.root, &config.outline)?,
            score,
            lints,
        });
    }
    Ok(Report { pages })
}
