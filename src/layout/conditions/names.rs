//! Rule names
//!
//! Rules parse from the names their `Display` produces, case-insensitively:
//! `Left2Left`, `fit2width`, `Float2LeftSide`, `Left2Col(1)`,
//! `BaselineDown2Grid(24, 12)`, `Width(50%)`. A `Side`/`Sides` or `Bleed`
//! suffix selects the reference lines; rules joined with `+` form a
//! composite.

use std::str::FromStr;

use thiserror::Error;

use super::{Anchor, BaselineAnchor, Rounding, Rule};
use crate::layout::types::{Axis, Reference, Side};
use crate::layout::units::Length;

/// Base names accepted by the parser, for suggestions
pub const KNOWN_RULES: &[&str] = &[
    "left2left",
    "right2right",
    "center2center",
    "top2top",
    "bottom2bottom",
    "middle2middle",
    "left2right",
    "right2left",
    "top2bottom",
    "bottom2top",
    "origin2left",
    "origin2top",
    "center",
    "fit",
    "fit2width",
    "fit2height",
    "fit2left",
    "fit2right",
    "fit2top",
    "fit2bottom",
    "fit2sides",
    "fit2bleed",
    "scale2width",
    "float2left",
    "float2right",
    "float2top",
    "float2bottom",
    "float2lefttop",
    "float2righttop",
    "float2leftbottom",
    "float2rightbottom",
    "shrink2block",
    "shrink2blockwidth",
    "shrink2blockheight",
    "overflow2next",
    "left2col",
    "right2col",
    "fit2colspan",
    "top2row",
    "bottom2row",
    "fit2rowspan",
    "baseline2grid",
    "baselinedown2grid",
    "baselineup2grid",
    "origin2grid",
    "origindown2grid",
    "originup2grid",
    "width",
    "height",
];

#[derive(Debug, Error, PartialEq)]
pub enum ParseRuleError {
    #[error("unknown condition '{0}'")]
    Unknown(String),

    #[error("bad arguments for '{rule}': {reason}")]
    Arguments { rule: String, reason: String },
}

impl ParseRuleError {
    fn arguments(rule: &str, reason: impl Into<String>) -> Self {
        Self::Arguments {
            rule: rule.to_string(),
            reason: reason.into(),
        }
    }

    /// The name that failed to parse
    pub fn name(&self) -> &str {
        match self {
            Self::Unknown(name) => name,
            Self::Arguments { rule, .. } => rule,
        }
    }
}

impl FromStr for Rule {
    type Err = ParseRuleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('+').map(str::trim).collect();
        if parts.len() > 1 {
            return parts
                .into_iter()
                .map(parse_atom)
                .collect::<Result<Vec<_>, _>>()
                .map(Rule::All);
        }
        parse_atom(s.trim())
    }
}

/// Lowercase and drop separators, so `Fit2Width`, `fit2width` and
/// `fit_2_width` name the same rule
fn normalize(name: &str) -> String {
    name.chars()
        .filter(|c| !matches!(c, '_' | '-' | ' '))
        .flat_map(char::to_lowercase)
        .collect()
}

fn parse_atom(text: &str) -> Result<Rule, ParseRuleError> {
    match text.find('(') {
        Some(open) => {
            let close = text
                .rfind(')')
                .filter(|&close| close > open && close == text.len() - 1)
                .ok_or_else(|| ParseRuleError::arguments(text, "unbalanced parentheses"))?;
            let key = normalize(&text[..open]);
            let args: Vec<&str> = text[open + 1..close]
                .split(',')
                .map(str::trim)
                .filter(|a| !a.is_empty())
                .collect();
            parse_call(&key, &args, text)
        }
        None => parse_name(&normalize(text)).ok_or_else(|| ParseRuleError::Unknown(text.to_string())),
    }
}

fn side(word: &str) -> Option<Side> {
    match word {
        "left" => Some(Side::Left),
        "right" => Some(Side::Right),
        "top" => Some(Side::Top),
        "bottom" => Some(Side::Bottom),
        _ => None,
    }
}

fn anchor(word: &str) -> Option<Anchor> {
    match word {
        "left" => Some(Anchor::Left),
        "center" => Some(Anchor::Center),
        "right" => Some(Anchor::Right),
        "top" => Some(Anchor::Top),
        "middle" => Some(Anchor::Middle),
        "bottom" => Some(Anchor::Bottom),
        _ => None,
    }
}

fn split_reference(key: &str) -> (&str, Reference) {
    for (suffix, reference) in [
        ("bleed", Reference::Bleed),
        ("sides", Reference::Side),
        ("side", Reference::Side),
    ] {
        if let Some(base) = key.strip_suffix(suffix) {
            return (base, reference);
        }
    }
    (key, Reference::Padding)
}

/// Two sides written back to back, e.g. `lefttop`
fn side_pair(word: &str) -> Option<(Side, Side)> {
    ["left", "right", "top", "bottom"].iter().find_map(|first| {
        let rest = word.strip_prefix(first)?;
        let a = side(first)?;
        let b = side(rest)?;
        (a.axis() != b.axis()).then_some((a, b))
    })
}

fn parse_name(key: &str) -> Option<Rule> {
    match key {
        "overflow2next" => return Some(Rule::OverflowToNext),
        "shrink2blockwidth" => return Some(Rule::Shrink { axis: Axis::X }),
        "shrink2blockheight" => return Some(Rule::Shrink { axis: Axis::Y }),
        "shrink2block" => {
            return Some(Rule::All(vec![
                Rule::Shrink { axis: Axis::X },
                Rule::Shrink { axis: Axis::Y },
            ]))
        }
        _ => {}
    }

    let (base, reference) = split_reference(key);
    match base {
        "fit" | "fit2" => return Some(Rule::fit_all(reference)),
        "fit2width" => return Some(Rule::fit_to_width(reference)),
        "fit2height" => return Some(Rule::fit_to_height(reference)),
        "center" | "center2" => return Some(Rule::center(reference)),
        "scale2width" => return Some(Rule::ScaleToWidth { reference }),
        _ => {}
    }

    let (head, tail) = base.split_once('2')?;
    match head {
        "fit" => side(tail).map(|s| Rule::fit(s, reference)),
        "float" => match side(tail) {
            Some(s) => Some(Rule::float(s, reference)),
            None => {
                let (a, b) = side_pair(tail)?;
                Some(Rule::All(vec![Rule::float(a, reference), Rule::float(b, reference)]))
            }
        },
        "origin" => {
            let target = anchor(tail)?;
            let origin = match target.axis() {
                Axis::X => Anchor::OriginX,
                Axis::Y => Anchor::OriginY,
            };
            Some(Rule::align(origin, target, reference))
        }
        _ => {
            let a = anchor(head)?;
            let t = anchor(tail)?;
            (a.axis() == t.axis()).then(|| Rule::align(a, t, reference))
        }
    }
}

fn index(rule: &str, arg: &str) -> Result<usize, ParseRuleError> {
    arg.parse()
        .map_err(|_| ParseRuleError::arguments(rule, format!("'{}' is not a track index", arg)))
}

fn number(rule: &str, arg: &str) -> Result<f64, ParseRuleError> {
    arg.parse()
        .map_err(|_| ParseRuleError::arguments(rule, format!("'{}' is not a number", arg)))
}

fn expect_args(rule: &str, args: &[&str], min: usize, max: usize) -> Result<(), ParseRuleError> {
    if args.len() < min || args.len() > max {
        let expected = if min == max {
            format!("{}", min)
        } else {
            format!("{} to {}", min, max)
        };
        return Err(ParseRuleError::arguments(
            rule,
            format!("expected {} arguments, got {}", expected, args.len()),
        ));
    }
    Ok(())
}

/// Baseline rule spelled `{origin|baseline}{|down|up}2grid`
fn baseline_kind(key: &str) -> Option<(BaselineAnchor, Rounding)> {
    let head = key.strip_suffix("2grid")?;
    let (anchor, direction) = if let Some(d) = head.strip_prefix("baseline") {
        (BaselineAnchor::FirstBaseline, d)
    } else if let Some(d) = head.strip_prefix("origin") {
        (BaselineAnchor::Origin, d)
    } else {
        return None;
    };
    let rounding = match direction {
        "" => Rounding::Nearest,
        "down" => Rounding::Down,
        "up" => Rounding::Up,
        _ => return None,
    };
    Some((anchor, rounding))
}

fn parse_call(key: &str, args: &[&str], text: &str) -> Result<Rule, ParseRuleError> {
    match key {
        "left2col" | "right2col" => {
            expect_args(text, args, 1, 1)?;
            let edge = if key == "left2col" { Side::Left } else { Side::Right };
            Ok(Rule::Column {
                edge,
                col: index(text, args[0])?,
            })
        }
        "top2row" | "bottom2row" => {
            expect_args(text, args, 1, 1)?;
            let edge = if key == "top2row" { Side::Top } else { Side::Bottom };
            Ok(Rule::Row {
                edge,
                row: index(text, args[0])?,
            })
        }
        "fit2colspan" => {
            expect_args(text, args, 2, 2)?;
            Ok(Rule::ColumnSpan {
                col: index(text, args[0])?,
                span: index(text, args[1])?,
            })
        }
        "fit2rowspan" => {
            expect_args(text, args, 2, 2)?;
            Ok(Rule::RowSpan {
                row: index(text, args[0])?,
                span: index(text, args[1])?,
            })
        }
        "width" | "height" => {
            expect_args(text, args, 1, 1)?;
            let length: Length = args[0]
                .parse()
                .map_err(|e: crate::layout::units::ParseLengthError| ParseRuleError::arguments(text, e.to_string()))?;
            let axis = if key == "width" { Axis::X } else { Axis::Y };
            Ok(Rule::Size { axis, length })
        }
        _ => {
            let (anchor, rounding) = baseline_kind(key).ok_or_else(|| ParseRuleError::Unknown(text.to_string()))?;
            expect_args(text, args, 1, 2)?;
            let unit = number(text, args[0])?;
            let start = match args.get(1) {
                Some(arg) => number(text, arg)?,
                None => 0.0,
            };
            Ok(Rule::Baseline {
                unit,
                start,
                rounding,
                anchor,
            })
        }
    }
}
