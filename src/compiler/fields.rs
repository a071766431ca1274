//! Field records for element and attribute declarations
//!
//! A declaration's default value wins over its fixed value; a fixed value
//! becomes the default and marks the field constant.

use crate::types::{Field, FieldFlags, Type};
use crate::xsd::{AttributeDecl, ElementDecl};

fn default_and_flags(default_value: &Option<String>, fixed_value: &Option<String>) -> (Option<String>, FieldFlags) {
    match (default_value, fixed_value) {
        (Some(default), _) => (Some(default.clone()), FieldFlags::NONE),
        (None, Some(fixed)) => (Some(fixed.clone()), FieldFlags::CONSTANT),
        (None, None) => (None, FieldFlags::NONE),
    }
}

/// Field for an element declaration
///
/// Captures the default or fixed value, nillability and, for simple field
/// types, the maximum length of a length constraint.
pub fn element_field(decl: &ElementDecl, field_type: Type) -> Field {
    let (default_value, mut flags) = default_and_flags(&decl.default_value, &decl.fixed_value);
    if decl.nillable {
        flags |= FieldFlags::NILLABLE;
    }
    let max_length = field_type.as_simple().and_then(|simple| simple.max_length());

    Field::new(decl.name.as_str(), field_type)
        .with_default_value(default_value)
        .with_flags(flags)
        .with_max_length(max_length)
}

/// Field for an attribute declaration
pub fn attribute_field(decl: &AttributeDecl, field_type: Type) -> Field {
    let (default_value, flags) = default_and_flags(&decl.default_value, &decl.fixed_value);
    Field::new(decl.name.as_str(), field_type)
        .with_default_value(default_value)
        .with_flags(flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Constraint, PrimitiveType, SimpleType};
    use crate::xsd::TypeId;

    fn element(name: &str) -> ElementDecl {
        ElementDecl {
            name: name.to_string(),
            target_namespace: "urn:test".to_string(),
            type_id: TypeId(1),
            default_value: None,
            fixed_value: None,
            nillable: false,
            is_global: true,
        }
    }

    #[test]
    fn test_fixed_value_is_constant() {
        let mut decl = element("version");
        decl.fixed_value = Some("1.0".to_string());
        let field = element_field(&decl, PrimitiveType::String.into());
        assert_eq!(field.default_value(), Some("1.0"));
        assert!(field.is_constant());
        assert!(!field.is_nillable());
    }

    #[test]
    fn test_default_value_wins_over_fixed() {
        let mut decl = element("status");
        decl.default_value = Some("draft".to_string());
        decl.fixed_value = Some("final".to_string());
        decl.nillable = true;
        let field = element_field(&decl, PrimitiveType::String.into());
        assert_eq!(field.default_value(), Some("draft"));
        assert!(!field.is_constant());
        assert!(field.is_nillable());
    }

    #[test]
    fn test_max_length_from_simple_type() {
        let title: Type = SimpleType::new(
            "title#anonymousType",
            "note",
            Some(PrimitiveType::String.into()),
            vec![Constraint::StringLength { min: 0, max: 120 }],
        )
        .into();
        let field = element_field(&element("title"), title);
        assert_eq!(field.max_length(), Some(120));

        let field = element_field(&element("body"), PrimitiveType::String.into());
        assert_eq!(field.max_length(), None);
    }

    #[test]
    fn test_attribute_field() {
        let decl = AttributeDecl {
            name: "lang".to_string(),
            target_namespace: String::new(),
            type_id: TypeId(1),
            default_value: None,
            fixed_value: Some("en".to_string()),
            is_global: false,
        };
        let field = attribute_field(&decl, PrimitiveType::String.into());
        assert_eq!(field.name(), "lang");
        assert_eq!(field.default_value(), Some("en"));
        assert_eq!(field.flags(), FieldFlags::CONSTANT);
        assert_eq!(field.max_length(), None);
    }
}
