//! Lengths with an explicit unit
//!
//! Every geometric attribute of an element is stored as a [`Length`]. Absolute
//! lengths convert to points; relative lengths (percentages, em) only become
//! numbers when resolved against a [`Base`]. Resolution is a pure function of
//! the length and the base, so the solver may call it as often as it likes.
//!
//! A relative value without a resolvable base resolves to zero:
//!
//! ```rust
//! use page_solver::layout::{Base, Length};
//!
//! assert_eq!(Length::percent(50.0).resolve(Base::new(Some(300.0), None)), 150.0);
//! assert_eq!(Length::percent(50.0).resolve(Base::none()), 0.0);
//! ```

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use thiserror::Error;

/// Points per inch
pub const INCH: f64 = 72.0;

/// Points per millimeter
pub const MM: f64 = INCH / 25.4;

/// Points per pixel (pixels and points are the same size)
pub const PX: f64 = 1.0;

/// A distance tagged with its unit
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Length {
    Pt(f64),
    Mm(f64),
    Inch(f64),
    Px(f64),
    /// Percentage of the base reference length
    Percent(f64),
    /// Multiple of the base font size
    Em(f64),
    /// Sum of mixed absolute and relative parts
    Calc { pt: f64, percent: f64, em: f64 },
}

/// What relative lengths resolve against
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Base {
    /// Reference length for percentages (usually a parent or own size)
    pub reference: Option<f64>,
    /// Font size for em lengths
    pub font_size: Option<f64>,
}

impl Base {
    pub fn new(reference: Option<f64>, font_size: Option<f64>) -> Self {
        Self {
            reference,
            font_size,
        }
    }

    /// A base with nothing to resolve against
    pub fn none() -> Self {
        Self::default()
    }
}

#[derive(Debug, Error, PartialEq)]
#[error("invalid length '{0}'")]
pub struct ParseLengthError(pub String);

impl Length {
    pub const ZERO: Length = Length::Pt(0.0);

    pub fn pt(value: f64) -> Self {
        Length::Pt(value)
    }

    pub fn mm(value: f64) -> Self {
        Length::Mm(value)
    }

    pub fn inch(value: f64) -> Self {
        Length::Inch(value)
    }

    pub fn px(value: f64) -> Self {
        Length::Px(value)
    }

    pub fn percent(value: f64) -> Self {
        Length::Percent(value)
    }

    pub fn em(value: f64) -> Self {
        Length::Em(value)
    }

    /// True when the length never needs a base
    pub fn is_absolute(&self) -> bool {
        match self {
            Length::Pt(_) | Length::Mm(_) | Length::Inch(_) | Length::Px(_) => true,
            Length::Percent(_) | Length::Em(_) => false,
            Length::Calc { percent, em, .. } => *percent == 0.0 && *em == 0.0,
        }
    }

    /// Split into (points, percent, em) parts
    fn parts(&self) -> (f64, f64, f64) {
        match *self {
            Length::Pt(v) => (v, 0.0, 0.0),
            Length::Mm(v) => (v * MM, 0.0, 0.0),
            Length::Inch(v) => (v * INCH, 0.0, 0.0),
            Length::Px(v) => (v * PX, 0.0, 0.0),
            Length::Percent(v) => (0.0, v, 0.0),
            Length::Em(v) => (0.0, 0.0, v),
            Length::Calc { pt, percent, em } => (pt, percent, em),
        }
    }

    /// Resolve to points. Missing bases contribute zero.
    pub fn resolve(&self, base: Base) -> f64 {
        match *self {
            Length::Pt(v) => v,
            Length::Mm(v) => v * MM,
            Length::Inch(v) => v * INCH,
            Length::Px(v) => v * PX,
            _ => {
                let (pt, percent, em) = self.parts();
                let relative = base.reference.map_or(0.0, |r| r * percent / 100.0);
                let font = base.font_size.map_or(0.0, |f| f * em);
                pt + relative + font
            }
        }
    }

    /// The value in points, if the length is absolute
    pub fn as_points(&self) -> Option<f64> {
        if self.is_absolute() {
            Some(self.parts().0)
        } else {
            None
        }
    }
}

impl Default for Length {
    fn default() -> Self {
        Length::ZERO
    }
}

impl From<f64> for Length {
    fn from(value: f64) -> Self {
        Length::Pt(value)
    }
}

impl Add for Length {
    type Output = Length;

    fn add(self, rhs: Length) -> Length {
        match (self, rhs) {
            (Length::Pt(a), Length::Pt(b)) => Length::Pt(a + b),
            (Length::Mm(a), Length::Mm(b)) => Length::Mm(a + b),
            (Length::Inch(a), Length::Inch(b)) => Length::Inch(a + b),
            (Length::Px(a), Length::Px(b)) => Length::Px(a + b),
            (Length::Percent(a), Length::Percent(b)) => Length::Percent(a + b),
            (Length::Em(a), Length::Em(b)) => Length::Em(a + b),
            (a, b) if a.is_absolute() && b.is_absolute() => Length::Pt(a.parts().0 + b.parts().0),
            (a, b) => {
                let (pa, ra, ea) = a.parts();
                let (pb, rb, eb) = b.parts();
                Length::Calc {
                    pt: pa + pb,
                    percent: ra + rb,
                    em: ea + eb,
                }
            }
        }
    }
}

impl Neg for Length {
    type Output = Length;

    fn neg(self) -> Length {
        self * -1.0
    }
}

impl Sub for Length {
    type Output = Length;

    fn sub(self, rhs: Length) -> Length {
        self + (-rhs)
    }
}

impl Mul<f64> for Length {
    type Output = Length;

    fn mul(self, factor: f64) -> Length {
        match self {
            Length::Pt(v) => Length::Pt(v * factor),
            Length::Mm(v) => Length::Mm(v * factor),
            Length::Inch(v) => Length::Inch(v * factor),
            Length::Px(v) => Length::Px(v * factor),
            Length::Percent(v) => Length::Percent(v * factor),
            Length::Em(v) => Length::Em(v * factor),
            Length::Calc { pt, percent, em } => Length::Calc {
                pt: pt * factor,
                percent: percent * factor,
                em: em * factor,
            },
        }
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Pt(v) => write!(f, "{}pt", v),
            Length::Mm(v) => write!(f, "{}mm", v),
            Length::Inch(v) => write!(f, "{}in", v),
            Length::Px(v) => write!(f, "{}px", v),
            Length::Percent(v) => write!(f, "{}%", v),
            Length::Em(v) => write!(f, "{}em", v),
            Length::Calc { pt, percent, em } => {
                write!(f, "calc({}pt + {}% + {}em)", pt, percent, em)
            }
        }
    }
}

/// Byte offset where the unit suffix begins; an `e` followed by a digit or
/// sign is an exponent, not the start of `em`
fn unit_start(text: &str) -> usize {
    let bytes = text.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'%' {
            return i;
        }
        if !b.is_ascii_alphabetic() {
            continue;
        }
        let exponent = matches!(b, b'e' | b'E')
            && i > 0
            && (bytes[i - 1].is_ascii_digit() || bytes[i - 1] == b'.')
            && matches!(bytes.get(i + 1), Some(n) if n.is_ascii_digit() || *n == b'+' || *n == b'-');
        if !exponent {
            return i;
        }
    }
    text.len()
}

impl FromStr for Length {
    type Err = ParseLengthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let (number, unit) = text.split_at(unit_start(text));
        let value: f64 = number
            .trim()
            .parse()
            .map_err(|_| ParseLengthError(s.to_string()))?;

        match unit.trim().to_ascii_lowercase().as_str() {
            "" | "pt" => Ok(Length::Pt(value)),
            "mm" => Ok(Length::Mm(value)),
            "in" | "inch" => Ok(Length::Inch(value)),
            "px" => Ok(Length::Px(value)),
            "%" => Ok(Length::Percent(value)),
            "em" => Ok(Length::Em(value)),
            _ => Err(ParseLengthError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_resolution_ignores_base() {
        assert_eq!(Length::pt(12.0).resolve(Base::none()), 12.0);
        assert_eq!(Length::inch(1.0).resolve(Base::new(Some(10.0), None)), 72.0);
        assert!((Length::mm(25.4).resolve(Base::none()) - 72.0).abs() < 1e-9);
    }

    #[test]
    fn test_relative_resolution() {
        let base = Base::new(Some(200.0), Some(12.0));
        assert_eq!(Length::percent(25.0).resolve(base), 50.0);
        assert_eq!(Length::em(2.0).resolve(base), 24.0);
    }

    #[test]
    fn test_missing_base_resolves_to_zero() {
        assert_eq!(Length::percent(80.0).resolve(Base::none()), 0.0);
        assert_eq!(Length::em(3.0).resolve(Base::new(Some(100.0), None)), 0.0);
    }

    #[test]
    fn test_add_same_unit_keeps_unit() {
        assert_eq!(Length::mm(2.0) + Length::mm(3.0), Length::mm(5.0));
        assert_eq!(Length::percent(10.0) - Length::percent(4.0), Length::percent(6.0));
    }

    #[test]
    fn test_add_mixed_absolute_gives_points() {
        let sum = Length::inch(1.0) + Length::pt(8.0);
        assert_eq!(sum, Length::pt(80.0));
    }

    #[test]
    fn test_add_relative_and_absolute_gives_calc() {
        let sum = Length::percent(50.0) + Length::pt(10.0);
        assert!(!sum.is_absolute());
        assert_eq!(sum.resolve(Base::new(Some(100.0), None)), 60.0);
        assert_eq!(sum.resolve(Base::none()), 10.0);
    }

    #[test]
    fn test_parse_units() {
        assert_eq!("12".parse::<Length>().unwrap(), Length::pt(12.0));
        assert_eq!("12pt".parse::<Length>().unwrap(), Length::pt(12.0));
        assert_eq!("20mm".parse::<Length>().unwrap(), Length::mm(20.0));
        assert_eq!("0.5in".parse::<Length>().unwrap(), Length::inch(0.5));
        assert_eq!("50%".parse::<Length>().unwrap(), Length::percent(50.0));
        assert_eq!("1.5em".parse::<Length>().unwrap(), Length::em(1.5));
        assert_eq!("-4px".parse::<Length>().unwrap(), Length::px(-4.0));
    }

    #[test]
    fn test_parse_exponent() {
        assert_eq!("1e3".parse::<Length>().unwrap(), Length::pt(1000.0));
        assert_eq!("2.5E-1mm".parse::<Length>().unwrap(), Length::mm(0.25));
        assert_eq!("1e+2%".parse::<Length>().unwrap(), Length::percent(100.0));
        assert_eq!("2em".parse::<Length>().unwrap(), Length::em(2.0));
        assert!("1e".parse::<Length>().is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("wide".parse::<Length>().is_err());
        assert!("12furlong".parse::<Length>().is_err());
        assert!("".parse::<Length>().is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Length::mm(20.0).to_string(), "20mm");
        assert_eq!(Length::percent(50.0).to_string(), "50%");
    }
}
