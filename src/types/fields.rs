//! Fields of complex types and schemas

use super::Type;
use std::fmt;
use std::ops::{BitOr, BitOrAssign};

/// Field flag set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FieldFlags(u8);

impl FieldFlags {
    /// No flags
    pub const NONE: FieldFlags = FieldFlags(0);
    /// The default value is fixed and cannot be changed
    pub const CONSTANT: FieldFlags = FieldFlags(1);
    /// The field accepts an explicit nil value
    pub const NILLABLE: FieldFlags = FieldFlags(1 << 1);

    /// Raw flag bits
    pub fn bits(&self) -> u8 {
        self.0
    }

    /// Whether no flag is set
    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Whether every flag of `other` is set
    pub fn contains(&self, other: FieldFlags) -> bool {
        self.0 & other.0 == other.0
    }

    /// Set the flags of `other`
    pub fn insert(&mut self, other: FieldFlags) {
        self.0 |= other.0;
    }
}

impl BitOr for FieldFlags {
    type Output = FieldFlags;

    fn bitor(self, rhs: FieldFlags) -> FieldFlags {
        FieldFlags(self.0 | rhs.0)
    }
}

impl BitOrAssign for FieldFlags {
    fn bitor_assign(&mut self, rhs: FieldFlags) {
        self.insert(rhs);
    }
}

impl fmt::Display for FieldFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names = Vec::new();
        if self.contains(FieldFlags::CONSTANT) {
            names.push("constant");
        }
        if self.contains(FieldFlags::NILLABLE) {
            names.push("nillable");
        }
        write!(f, "{}", names.join("|"))
    }
}

/// A named, typed member of a complex type or schema
#[derive(Debug, Clone)]
pub struct Field {
    name: String,
    field_type: Type,
    default_value: Option<String>,
    flags: FieldFlags,
    max_length: Option<u32>,
}

impl Field {
    /// Create a field with no default, no flags and no length bound
    pub fn new(name: impl Into<String>, field_type: Type) -> Self {
        Self {
            name: name.into(),
            field_type,
            default_value: None,
            flags: FieldFlags::NONE,
            max_length: None,
        }
    }

    /// Set the default value
    pub fn with_default_value(mut self, default_value: Option<String>) -> Self {
        self.default_value = default_value;
        self
    }

    /// Set the flags
    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Set the maximum value length
    pub fn with_max_length(mut self, max_length: Option<u32>) -> Self {
        self.max_length = max_length;
        self
    }

    /// Field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type
    pub fn field_type(&self) -> &Type {
        &self.field_type
    }

    /// Default (or fixed) value
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Flags
    pub fn flags(&self) -> FieldFlags {
        self.flags
    }

    /// Maximum value length
    pub fn max_length(&self) -> Option<u32> {
        self.max_length
    }

    /// Whether the default value is fixed
    pub fn is_constant(&self) -> bool {
        self.flags.contains(FieldFlags::CONSTANT)
    }

    /// Whether the field is nillable
    pub fn is_nillable(&self) -> bool {
        self.flags.contains(FieldFlags::NILLABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PrimitiveType;

    #[test]
    fn test_flags() {
        let mut flags = FieldFlags::NONE;
        assert!(flags.is_empty());
        flags |= FieldFlags::NILLABLE;
        assert!(flags.contains(FieldFlags::NILLABLE));
        assert!(!flags.contains(FieldFlags::CONSTANT));

        let both = FieldFlags::CONSTANT | FieldFlags::NILLABLE;
        assert_eq!(both.bits(), 3);
        assert_eq!(both.to_string(), "constant|nillable");
    }

    #[test]
    fn test_field_builder() {
        let field = Field::new("title", Type::Primitive(PrimitiveType::String))
            .with_default_value(Some("untitled".to_string()))
            .with_flags(FieldFlags::CONSTANT)
            .with_max_length(Some(64));

        assert_eq!(field.name(), "title");
        assert_eq!(field.field_type().name(), "string");
        assert_eq!(field.default_value(), Some("untitled"));
        assert!(field.is_constant());
        assert!(!field.is_nillable());
        assert_eq!(field.max_length(), Some(64));
    }
}
