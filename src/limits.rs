//! Limits for schema loading and compilation
//!
//! These bound the resources a single schema source may consume: the size of
//! the source text, the nesting depth of its element tree, how deep
//! include/import chains may go and how many components it may declare.

use crate::error::{Error, Result};

/// Resource limits applied while reading and compiling a schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Limits {
    /// Maximum nesting depth of the schema document's element tree
    pub max_xml_depth: usize,

    /// Maximum schema source size in bytes
    pub max_xml_size: usize,

    /// Maximum include/import nesting
    pub max_schema_depth: usize,

    /// Maximum number of parsed components (types, elements, attributes)
    pub max_schema_components: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_xml_depth: 1000,
            max_xml_size: 64 * 1024 * 1024,
            max_schema_depth: 100,
            max_schema_components: 100_000,
        }
    }
}

impl Limits {
    /// Tighter limits for sources that are not trusted
    pub fn strict() -> Self {
        Self {
            max_xml_depth: 100,
            max_xml_size: 4 * 1024 * 1024,
            max_schema_depth: 20,
            max_schema_components: 10_000,
        }
    }

    /// Element tree depth
    pub fn check_xml_depth(&self, depth: usize) -> Result<()> {
        check("element nesting depth", depth, self.max_xml_depth)
    }

    /// Source size in bytes
    pub fn check_xml_size(&self, size: usize) -> Result<()> {
        check("schema source size", size, self.max_xml_size)
    }

    /// Include/import chain depth
    pub fn check_schema_depth(&self, depth: usize) -> Result<()> {
        check("include/import depth", depth, self.max_schema_depth)
    }

    /// Number of top-level components across a schema set
    pub fn check_schema_components(&self, count: usize) -> Result<()> {
        check("schema component count", count, self.max_schema_components)
    }
}

fn check(what: &str, value: usize, max: usize) -> Result<()> {
    if value > max {
        return Err(Error::LimitExceeded(format!(
            "{} {} exceeds maximum {}",
            what, value, max
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = Limits::default();
        assert!(limits.check_xml_depth(1000).is_ok());
        assert!(limits.check_xml_depth(1001).is_err());
    }

    #[test]
    fn test_strict_is_tighter() {
        let strict = Limits::strict();
        let default = Limits::default();
        assert!(strict.max_xml_depth < default.max_xml_depth);
        assert!(strict.max_xml_size < default.max_xml_size);
        assert!(strict.check_schema_depth(21).is_err());
    }

    #[test]
    fn test_limit_message() {
        let err = Limits::strict().check_schema_components(10_001).unwrap_err();
        assert!(matches!(err, Error::LimitExceeded(_)));
        assert!(err.to_string().contains("schema component count 10001"));
    }

    #[test]
    fn test_check_xml_size() {
        let limits = Limits::default();
        assert!(limits.check_xml_size(1024).is_ok());
        assert!(limits.check_xml_size(100 * 1024 * 1024).is_err());
    }
}
