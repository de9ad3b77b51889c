//! TOML page documents
//!
//! A document is an optional `[solver]` table and a list of `[[pages]]`. Each
//! page is the root of an element tree; children nest under `elements`.
//! Lengths are numbers (points) or strings with a unit. Conditions are rule
//! names or tables carrying rule arguments and scoring overrides:
//!
//! ```toml
//! [solver]
//! max_passes = 12
//!
//! [[pages]]
//! name = "page"
//! w = "210mm"
//! h = "297mm"
//! origin_top = true
//! padding = "20mm"
//!
//! [[pages.elements]]
//! name = "title"
//! h = 40
//! conditions = ["fit2width", "top2top", { rule = "baseline", unit = 24, rounding = "down" }]
//! ```

use std::path::Path;
use std::str::FromStr;

use rayon::prelude::*;
use serde::Deserialize;
use tracing::debug;

use crate::error::DocumentError;
use crate::layout::{
    find_similar, Align, Condition, Element, ElementId, Grid, Gutter, Length, ParseRuleError, Rule, Score, Sides,
    Solver, SolverConfig, Track, Tree, KNOWN_RULES, MAX_TRACKS,
};

/// Pages and the solver settings they share
#[derive(Debug, Clone)]
pub struct Document {
    pub solver: SolverConfig,
    pub pages: Vec<Page>,
}

/// One independent element tree
#[derive(Debug, Clone)]
pub struct Page {
    pub tree: Tree,
    pub root: ElementId,
}

impl Page {
    pub fn name(&self) -> &str {
        self.tree.get(self.root).map(Element::display_name).unwrap_or("<anon>")
    }
}

impl Document {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let source = std::fs::read_to_string(path)?;
        source.parse()
    }

    /// Solve every page, in parallel; scores come back in page order
    pub fn solve(&mut self) -> Result<Vec<Score>, DocumentError> {
        let solver = Solver::new(self.solver.clone());
        let scores = self
            .pages
            .par_iter_mut()
            .map(|page| solver.solve(&mut page.tree, page.root))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(scores)
    }

    /// Score every page without moving anything
    pub fn evaluate(&self) -> Result<Vec<Score>, DocumentError> {
        let solver = Solver::new(self.solver.clone());
        let scores = self
            .pages
            .par_iter()
            .map(|page| solver.evaluate(&page.tree, page.root))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(scores)
    }
}

impl FromStr for Document {
    type Err = DocumentError;

    fn from_str(source: &str) -> Result<Self, Self::Err> {
        let raw: RawDocument = toml::from_str(source)?;
        let solver = raw.solver.unwrap_or_default();
        let pages = raw
            .pages
            .into_iter()
            .map(|page| build_page(page, &solver))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(pages = pages.len(), "loaded document");
        Ok(Self { solver, pages })
    }
}

// ============================================================================
// Raw TOML shapes
// ============================================================================

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDocument {
    solver: Option<SolverConfig>,
    #[serde(default)]
    pages: Vec<RawElement>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawLength {
    Number(f64),
    Text(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawSides {
    Uniform(RawLength),
    List(Vec<RawLength>),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGutter {
    Uniform(RawLength),
    Axes {
        x: Option<RawLength>,
        y: Option<RawLength>,
        z: Option<RawLength>,
    },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawGrid {
    Count(usize),
    Tracks(Vec<RawTrack>),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTrack {
    size: RawLength,
    gutter: Option<RawLength>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawCondition {
    Name(String),
    Table(RawConditionTable),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConditionTable {
    rule: String,
    unit: Option<f64>,
    start: Option<f64>,
    rounding: Option<String>,
    anchor: Option<String>,
    col: Option<usize>,
    row: Option<usize>,
    span: Option<usize>,
    value: Option<RawLength>,
    tolerance: Option<f64>,
    score: Option<f64>,
    error_factor: Option<f64>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawElement {
    name: Option<String>,
    x: Option<RawLength>,
    y: Option<RawLength>,
    #[serde(default)]
    z: f64,
    w: Option<RawLength>,
    h: Option<RawLength>,
    padding: Option<RawSides>,
    margin: Option<RawSides>,
    bleed: Option<RawSides>,
    gutter: Option<RawGutter>,
    #[serde(default)]
    x_align: Align,
    #[serde(default)]
    y_align: Align,
    #[serde(default)]
    origin_top: bool,
    font_size: Option<f64>,
    baseline: Option<RawLength>,
    columns: Option<RawGrid>,
    rows: Option<RawGrid>,
    next: Option<String>,
    #[serde(default)]
    conditions: Vec<RawCondition>,
    #[serde(default)]
    elements: Vec<RawElement>,
}

// ============================================================================
// Conversion
// ============================================================================

/// Converts raw values for one element, naming it in errors
struct Builder<'a> {
    element: String,
    config: &'a SolverConfig,
}

impl Builder<'_> {
    fn length(&self, field: &'static str, raw: RawLength) -> Result<Length, DocumentError> {
        match raw {
            RawLength::Number(n) => Ok(Length::Pt(n)),
            RawLength::Text(text) => text.parse().map_err(|source| DocumentError::InvalidLength {
                element: self.element.clone(),
                field,
                source,
            }),
        }
    }

    fn optional(&self, field: &'static str, raw: Option<RawLength>) -> Result<Length, DocumentError> {
        raw.map_or(Ok(Length::ZERO), |r| self.length(field, r))
    }

    /// One value for all sides, two for vertical/horizontal, or four clockwise from the top
    fn sides(&self, field: &'static str, raw: Option<RawSides>) -> Result<Sides, DocumentError> {
        let values = match raw {
            None => return Ok(Sides::zero()),
            Some(RawSides::Uniform(one)) => vec![one],
            Some(RawSides::List(list)) => list,
        };
        let lengths = values
            .into_iter()
            .map(|v| self.length(field, v))
            .collect::<Result<Vec<_>, _>>()?;
        match lengths.as_slice() {
            [all] => Ok(Sides::uniform(*all)),
            [v, h] => Ok(Sides::new(*v, *h, *v, *h)),
            [t, r, b, l] => Ok(Sides::new(*t, *r, *b, *l)),
            other => Err(DocumentError::invalid_value(
                &self.element,
                field,
                format!("expected 1, 2 or 4 values, got {}", other.len()),
            )),
        }
    }

    fn gutter(&self, raw: Option<RawGutter>) -> Result<Gutter, DocumentError> {
        match raw {
            None => Ok(Gutter::default()),
            Some(RawGutter::Uniform(v)) => Ok(Gutter::uniform(self.length("gutter", v)?)),
            Some(RawGutter::Axes { x, y, z }) => Ok(Gutter {
                x: self.optional("gutter", x)?,
                y: self.optional("gutter", y)?,
                z: self.optional("gutter", z)?,
            }),
        }
    }

    fn grid(&self, field: &'static str, raw: Option<RawGrid>) -> Result<Grid, DocumentError> {
        match raw {
            None => Ok(Grid::default()),
            Some(RawGrid::Count(0)) => Err(DocumentError::invalid_value(&self.element, field, "needs at least one track")),
            Some(RawGrid::Count(n)) if n > MAX_TRACKS => Err(self.too_many_tracks(field)),
            Some(RawGrid::Count(n)) => Ok(Grid::Even(n)),
            Some(RawGrid::Tracks(tracks)) if tracks.len() > MAX_TRACKS => Err(self.too_many_tracks(field)),
            Some(RawGrid::Tracks(tracks)) => tracks
                .into_iter()
                .map(|t| Ok(Track::new(self.length(field, t.size)?, self.optional(field, t.gutter)?)))
                .collect::<Result<Vec<_>, DocumentError>>()
                .map(Grid::Tracks),
        }
    }

    fn too_many_tracks(&self, field: &'static str) -> DocumentError {
        DocumentError::invalid_value(&self.element, field, format!("more than {} tracks", MAX_TRACKS))
    }

    /// A condition carrying the document's scoring defaults
    fn scored(&self, rule: Rule) -> Condition {
        Condition::new(rule)
            .with_tolerance(self.config.default_tolerance)
            .with_value(self.config.default_value)
            .with_error_factor(self.config.default_error_factor)
    }

    fn condition(&self, raw: RawCondition) -> Result<Condition, DocumentError> {
        match raw {
            RawCondition::Name(name) => Ok(self.scored(self.rule(&name)?)),
            RawCondition::Table(table) => {
                let mut condition = self.scored(self.rule(&self.call_text(&table)?)?);
                if let Some(tolerance) = table.tolerance {
                    condition.tolerance = tolerance;
                }
                if let Some(score) = table.score {
                    condition.value = score;
                }
                if let Some(error_factor) = table.error_factor {
                    condition.error_factor = error_factor;
                }
                Ok(condition)
            }
        }
    }

    fn rule(&self, text: &str) -> Result<Rule, DocumentError> {
        text.parse::<Rule>().map_err(|err| match err {
            ParseRuleError::Unknown(name) => {
                let suggestions = find_similar(KNOWN_RULES.iter().copied(), &name, 2);
                DocumentError::unknown_condition(&self.element, name, suggestions)
            }
            ParseRuleError::Arguments { .. } => DocumentError::bad_condition(&self.element, err.to_string()),
        })
    }

    /// Spell a condition table as a rule call, e.g. `fit2colspan(1, 2)`
    fn call_text(&self, table: &RawConditionTable) -> Result<String, DocumentError> {
        let mut head = table.rule.trim().to_string();
        if table.rounding.is_some() || table.anchor.is_some() {
            let base = head.to_ascii_lowercase();
            if base != "baseline" && base != "origin" {
                return Err(DocumentError::bad_condition(
                    &self.element,
                    format!("'{}' takes no rounding or anchor", table.rule),
                ));
            }
            let anchor = table.anchor.as_deref().unwrap_or(base.as_str());
            let anchor = match anchor {
                "baseline" | "first_baseline" => "baseline",
                "origin" => "origin",
                other => {
                    return Err(DocumentError::bad_condition(
                        &self.element,
                        format!("unknown baseline anchor '{}'", other),
                    ))
                }
            };
            let rounding = match table.rounding.as_deref() {
                None | Some("nearest") => "",
                Some("down") => "down",
                Some("up") => "up",
                Some(other) => {
                    return Err(DocumentError::bad_condition(
                        &self.element,
                        format!("unknown rounding '{}'", other),
                    ))
                }
            };
            head = format!("{}{}2grid", anchor, rounding);
        } else if matches!(head.to_ascii_lowercase().as_str(), "baseline" | "origin") {
            head.push_str("2grid");
        }

        let mut args: Vec<String> = Vec::new();
        if let Some(unit) = table.unit {
            args.push(unit.to_string());
            if let Some(start) = table.start {
                args.push(start.to_string());
            }
        }
        args.extend(table.col.or(table.row).map(|i| i.to_string()));
        args.extend(table.span.map(|s| s.to_string()));
        if let Some(value) = &table.value {
            args.push(match value {
                RawLength::Number(n) => n.to_string(),
                RawLength::Text(t) => t.clone(),
            });
        }

        Ok(if args.is_empty() {
            head
        } else {
            format!("{}({})", head, args.join(", "))
        })
    }
}

fn build_page(raw: RawElement, config: &SolverConfig) -> Result<Page, DocumentError> {
    let mut tree = Tree::new();
    let (element, children) = build_element(raw, config)?;
    let root = tree.add_root(element);
    add_children(&mut tree, root, children, config)?;
    Ok(Page { tree, root })
}

fn add_children(
    tree: &mut Tree,
    parent: ElementId,
    children: Vec<RawElement>,
    config: &SolverConfig,
) -> Result<(), DocumentError> {
    for raw in children {
        let (element, grandchildren) = build_element(raw, config)?;
        let id = tree.add_child(parent, element)?;
        add_children(tree, id, grandchildren, config)?;
    }
    Ok(())
}

fn build_element(raw: RawElement, config: &SolverConfig) -> Result<(Element, Vec<RawElement>), DocumentError> {
    let b = Builder {
        element: raw.name.clone().unwrap_or_else(|| "<anon>".to_string()),
        config,
    };
    let conditions = raw
        .conditions
        .into_iter()
        .map(|c| b.condition(c))
        .collect::<Result<Vec<_>, _>>()?;

    let element = Element {
        name: raw.name,
        x: b.optional("x", raw.x)?,
        y: b.optional("y", raw.y)?,
        z: raw.z,
        w: b.optional("w", raw.w)?,
        h: b.optional("h", raw.h)?,
        padding: b.sides("padding", raw.padding)?,
        margin: b.sides("margin", raw.margin)?,
        bleed: b.sides("bleed", raw.bleed)?,
        gutter: b.gutter(raw.gutter)?,
        x_align: raw.x_align,
        y_align: raw.y_align,
        origin_top: raw.origin_top,
        font_size: raw.font_size,
        baseline: b.optional("baseline", raw.baseline)?,
        columns: b.grid("columns", raw.columns)?,
        rows: b.grid("rows", raw.rows)?,
        next: raw.next,
        conditions,
    };
    Ok((element, raw.elements))
}
