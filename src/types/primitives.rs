//! Primitive type table
//!
//! Built-in XSD datatypes collapse onto a handful of primitive repository
//! types. Types with no sensible primitive (`anyType`, `QName`, `NOTATION`)
//! are deliberately absent, so using them as a field type is an error.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Built-in leaf type of the repository type system
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveType {
    /// Character data
    String,
    /// true / false
    Boolean,
    /// 32-bit and arbitrary precision integers
    Integer,
    /// 64-bit integers
    Long,
    /// Floating point and decimal numbers
    Double,
    /// Dates, times and durations
    Date,
    /// Binary content
    Binary,
}

static XSD_ALIASES: Lazy<HashMap<&'static str, PrimitiveType>> = Lazy::new(|| {
    use PrimitiveType::*;
    HashMap::from([
        ("string", String),
        ("normalizedString", String),
        ("token", String),
        ("language", String),
        ("Name", String),
        ("NCName", String),
        ("ID", String),
        ("IDREF", String),
        ("IDREFS", String),
        ("ENTITY", String),
        ("ENTITIES", String),
        ("NMTOKEN", String),
        ("NMTOKENS", String),
        ("anyURI", String),
        ("anySimpleType", String),
        ("boolean", Boolean),
        ("integer", Integer),
        ("int", Integer),
        ("short", Integer),
        ("byte", Integer),
        ("nonNegativeInteger", Integer),
        ("positiveInteger", Integer),
        ("nonPositiveInteger", Integer),
        ("negativeInteger", Integer),
        ("unsignedInt", Integer),
        ("unsignedShort", Integer),
        ("unsignedByte", Integer),
        ("long", Long),
        ("unsignedLong", Long),
        ("float", Double),
        ("double", Double),
        ("decimal", Double),
        ("date", Date),
        ("dateTime", Date),
        ("time", Date),
        ("duration", Date),
        ("gYearMonth", Date),
        ("gYear", Date),
        ("gMonthDay", Date),
        ("gDay", Date),
        ("gMonth", Date),
        ("hexBinary", Binary),
        ("base64Binary", Binary),
    ])
});

impl PrimitiveType {
    /// Primitive for a built-in type of the XML Schema namespace
    pub fn from_xsd_name(local_name: &str) -> Option<Self> {
        XSD_ALIASES.get(local_name).copied()
    }

    /// Type name
    pub fn name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Integer => "integer",
            Self::Long => "long",
            Self::Double => "double",
            Self::Date => "date",
            Self::Binary => "binary",
        }
    }
}

impl fmt::Display for PrimitiveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
