//! Name validation and synthesized names
//!
//! Declared schema component names must be NCNames. Types that XSD leaves
//! anonymous receive names derived from the declaration that contains them,
//! so compiling the same source twice yields the same names.

use crate::error::{Error, Result};
use once_cell::sync::Lazy;
use regex::Regex;

/// Suffix marking a type synthesized for an anonymous definition
pub const ANONYMOUS_TYPE_SUFFIX: &str = "#anonymousType";

/// Suffix of the list type wrapping repeated content
pub const ANONYMOUS_LIST_TYPE_SUFFIX: &str = "#anonymousListType";

/// Suffix of the complex type holding one occurrence of a repeated group
pub const ANONYMOUS_LIST_ITEM_SUFFIX: &str = "#anonymousListItem";

/// Suffix of the field holding a repeated group
pub const ANONYMOUS_LIST_FIELD_SUFFIX: &str = "#anonymousList";

// Simplified to Latin-1 name characters
static NCNAME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}][A-Z_a-z\u{C0}-\u{D6}\u{D8}-\u{F6}\u{F8}-\u{2FF}\-\.0-9\u{B7}]*$")
        .expect("NCName pattern is valid")
});

/// Check if a string is a valid NCName (non-colonized name)
pub fn is_valid_ncname(name: &str) -> bool {
    NCNAME.is_match(name)
}

/// Validate an NCName and return an error if invalid
pub fn validate_ncname(name: &str) -> Result<()> {
    if is_valid_ncname(name) {
        Ok(())
    } else {
        Err(Error::Name(format!("Invalid NCName: '{}'", name)))
    }
}

/// Name of the type synthesized for an anonymous definition inside `owner`
pub fn anonymous_type_name(owner: &str) -> String {
    format!("{}{}", owner, ANONYMOUS_TYPE_SUFFIX)
}

/// Name of the list type synthesized for repeated content of `owner`
pub fn anonymous_list_type_name(owner: &str) -> String {
    format!("{}{}", owner, ANONYMOUS_LIST_TYPE_SUFFIX)
}

/// Name of the complex type synthesized for one occurrence of a repeated group
pub fn anonymous_list_item_name(owner: &str) -> String {
    format!("{}{}", owner, ANONYMOUS_LIST_ITEM_SUFFIX)
}

/// Name of the field synthesized for a repeated group of `owner`
pub fn anonymous_list_field_name(owner: &str) -> String {
    format!("{}{}", owner, ANONYMOUS_LIST_FIELD_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_ncname() {
        assert!(is_valid_ncname("element"));
        assert!(is_valid_ncname("my-element"));
        assert!(is_valid_ncname("my_element"));
        assert!(is_valid_ncname("element123"));
        assert!(is_valid_ncname("_element"));
        assert!(is_valid_ncname("dc.title"));

        assert!(!is_valid_ncname(""));
        assert!(!is_valid_ncname("123element"));
        assert!(!is_valid_ncname("-element"));
        assert!(!is_valid_ncname("prefix:element"));
        assert!(!is_valid_ncname("title#anonymousType"));
    }

    #[test]
    fn test_validate_ncname() {
        assert!(validate_ncname("element").is_ok());
        assert!(matches!(validate_ncname("123"), Err(Error::Name(_))));
    }

    #[test]
    fn test_synthesized_names() {
        assert_eq!(anonymous_type_name("title"), "title#anonymousType");
        assert_eq!(anonymous_list_type_name("tags"), "tags#anonymousListType");
        assert_eq!(anonymous_list_item_name("note"), "note#anonymousListItem");
        assert_eq!(anonymous_list_field_name("note"), "note#anonymousList");
    }
}
