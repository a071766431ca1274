//! Value constraints extracted from restriction facets
//!
//! Only `maxLength` and `enumeration` are interpreted; every other facet is
//! ignored.

use crate::error::BindError;
use crate::xsd::FacetSet;
use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

const MAX_LENGTH: &str = "maxLength";
const ENUMERATION: &str = "enumeration";

/// Restriction on the legal values of a simple type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Constraint {
    /// Bounds on the length of a string value
    StringLength {
        /// Minimum length
        min: u32,
        /// Maximum length
        max: u32,
    },
    /// Allowed values, in declaration order
    Enum {
        /// Allowed values
        values: IndexSet<String>,
    },
}

impl Constraint {
    /// Maximum string length, for length constraints
    pub fn max_length(&self) -> Option<u32> {
        match self {
            Constraint::StringLength { max, .. } => Some(*max),
            Constraint::Enum { .. } => None,
        }
    }

    /// Allowed values, for enumeration constraints
    pub fn enum_values(&self) -> Option<&IndexSet<String>> {
        match self {
            Constraint::Enum { values } => Some(values),
            Constraint::StringLength { .. } => None,
        }
    }
}

/// Length constraint from a `maxLength` facet; the minimum is always 0
pub fn extract_string_length(facets: &FacetSet) -> Result<Option<Constraint>, BindError> {
    let Some(facet) = facets.facet(MAX_LENGTH) else {
        return Ok(None);
    };
    let max = facet
        .value
        .trim()
        .parse::<u32>()
        .map_err(|_| BindError::InvalidFacet {
            facet: MAX_LENGTH.to_string(),
            value: facet.value.clone(),
        })?;
    Ok(Some(Constraint::StringLength { min: 0, max }))
}

/// Enumeration constraint from the `enumeration` facets, if there are any
pub fn extract_enum(facets: &FacetSet) -> Option<Constraint> {
    let values: IndexSet<String> = facets
        .facets(ENUMERATION)
        .map(|f| f.value.clone())
        .collect();
    if values.is_empty() {
        None
    } else {
        Some(Constraint::Enum { values })
    }
}

/// All constraints of a restriction: the length bound first, then the enumeration
pub fn extract_constraints(facets: &FacetSet) -> Result<Vec<Constraint>, BindError> {
    let mut constraints = Vec::new();
    constraints.extend(extract_string_length(facets)?);
    constraints.extend(extract_enum(facets));
    Ok(constraints)
}
