//! Position directives: `P` or `P.S`.
//!
//! `P` is a signed primary position. Positive values insert before the
//! original element at that 1-based position; zero and negative values
//! insert after the element at `len + P`. The optional unsigned `S` breaks
//! ties between elements injected at the same place.

use crate::error::{Result, RibbonError};
use ribbon_source_map::SourceInfo;
use serde::{Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A parsed order directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OrderDirective {
    pub primary: i32,
    pub secondary: Option<u32>,
}

impl OrderDirective {
    /// `"0"`: after the last original element.
    pub const APPEND: OrderDirective = OrderDirective {
        primary: 0,
        secondary: None,
    };

    pub fn new(primary: i32, secondary: Option<u32>) -> Self {
        Self { primary, secondary }
    }

    /// Parse a directive, attaching `source_info` to the error.
    ///
    /// Surrounding whitespace is ignored. A leading `+` or `-` is accepted on
    /// the primary part only.
    ///
    /// ```
    /// use ribbon_config::OrderDirective;
    ///
    /// let d = OrderDirective::parse("-1.3", None).unwrap();
    /// assert_eq!((d.primary, d.secondary), (-1, Some(3)));
    /// assert!(OrderDirective::parse("1.-3", None).is_err());
    /// ```
    pub fn parse(value: &str, source_info: Option<&SourceInfo>) -> Result<Self> {
        let malformed = || RibbonError::MalformedDirective {
            value: value.to_string(),
            source_info: source_info.cloned(),
        };

        let trimmed = value.trim();
        let (primary, secondary) = match trimmed.split_once('.') {
            Some((primary, secondary)) => (primary, Some(secondary)),
            None => (trimmed, None),
        };

        let digits = primary.strip_prefix(['+', '-']).unwrap_or(primary);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed());
        }
        let primary = primary.parse::<i32>().map_err(|_| malformed())?;

        let secondary = match secondary {
            None => None,
            Some(s) if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) => {
                Some(s.parse::<u32>().map_err(|_| malformed())?)
            }
            Some(_) => return Err(malformed()),
        };

        Ok(Self { primary, secondary })
    }
}

impl FromStr for OrderDirective {
    type Err = RibbonError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s, None)
    }
}

impl fmt::Display for OrderDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.secondary {
            Some(secondary) => write!(f, "{}.{}", self.primary, secondary),
            None => write!(f, "{}", self.primary),
        }
    }
}

impl Serialize for OrderDirective {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
