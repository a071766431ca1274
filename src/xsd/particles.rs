//! Occurrence bounds of XSD particles
//!
//! Reference: https://www.w3.org/TR/xmlschema11-1/#p

use crate::error::{ParseError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Occurrence bounds for a particle (minOccurs, maxOccurs)
/// None for max means unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Occurs {
    /// Minimum number of occurrences (default 1)
    pub min: u32,
    /// Maximum number of occurrences (None = unbounded, default 1)
    pub max: Option<u32>,
}

impl Occurs {
    /// Create new occurrence bounds
    pub fn new(min: u32, max: Option<u32>) -> Self {
        Self { min, max }
    }

    /// Default occurrence (1, 1)
    pub fn once() -> Self {
        Self { min: 1, max: Some(1) }
    }

    /// Optional occurrence (0, 1)
    pub fn optional() -> Self {
        Self { min: 0, max: Some(1) }
    }

    /// Zero or more (0, unbounded)
    pub fn zero_or_more() -> Self {
        Self { min: 0, max: None }
    }

    /// Parse `minOccurs` / `maxOccurs` attribute values
    pub fn parse(min: Option<&str>, max: Option<&str>) -> Result<Self> {
        let min = match min {
            Some(s) => s.trim().parse::<u32>().map_err(|_| {
                ParseError::new(format!("Invalid minOccurs value: '{}'", s))
            })?,
            None => 1,
        };

        let max = match max.map(str::trim) {
            Some("unbounded") => None,
            Some(s) => Some(s.parse::<u32>().map_err(|_| {
                ParseError::new(format!("Invalid maxOccurs value: '{}'", s))
            })?),
            None => Some(1),
        };

        if let Some(max) = max {
            if max < min {
                return Err(ParseError::new(format!(
                    "maxOccurs {} is lower than minOccurs {}",
                    max, min
                ))
                .into());
            }
        }

        Ok(Self { min, max })
    }

    /// Whether more than one occurrence is allowed
    pub fn is_multiple(&self) -> bool {
        self.max.map_or(true, |max| max > 1)
    }
}

impl Default for Occurs {
    fn default() -> Self {
        Self::once()
    }
}

impl fmt::Display for Occurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) => write!(f, "{}..{}", self.min, max),
            None => write!(f, "{}..unbounded", self.min),
        }
    }
}
