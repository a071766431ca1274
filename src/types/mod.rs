//! Repository type model
//!
//! Compiled schemas are made of four kinds of types: shared primitives,
//! constrained simple types, complex types with ordered fields, and list
//! types wrapping an item type. Types are reference counted and may form
//! cycles through complex type fields: a complex type is created and
//! published before its fields are known, and its field list is filled in
//! afterwards.
//!
//! Cyclic graphs are never freed; compiled schemas are expected to live for
//! the life of the process.

mod constraints;
mod fields;
mod primitives;
mod schema;

pub use constraints::{extract_constraints, extract_enum, extract_string_length, Constraint};
pub use fields::{Field, FieldFlags};
pub use primitives::PrimitiveType;
pub use schema::Schema;

use crate::xsd::Occurs;
use parking_lot::RwLock;
use std::fmt;
use std::sync::Arc;

/// A resolved type
#[derive(Debug, Clone)]
pub enum Type {
    /// Built-in leaf type
    Primitive(PrimitiveType),
    /// Scalar type with constraints
    Simple(Arc<SimpleType>),
    /// Structured type with fields
    Complex(Arc<ComplexType>),
    /// Repeated occurrences of an item type
    List(Arc<ListType>),
}

impl Type {
    /// Type name
    pub fn name(&self) -> &str {
        match self {
            Type::Primitive(p) => p.name(),
            Type::Simple(t) => t.name(),
            Type::Complex(t) => t.name(),
            Type::List(t) => t.name(),
        }
    }

    /// Name of the owning schema; primitives belong to none
    pub fn schema(&self) -> Option<&str> {
        match self {
            Type::Primitive(_) => None,
            Type::Simple(t) => Some(t.schema()),
            Type::Complex(t) => Some(t.schema()),
            Type::List(t) => Some(t.schema()),
        }
    }

    /// Kind of type, for display
    pub fn kind(&self) -> &'static str {
        match self {
            Type::Primitive(_) => "primitive",
            Type::Simple(_) => "simple",
            Type::Complex(_) => "complex",
            Type::List(_) => "list",
        }
    }

    /// Reference identity: the same primitive, or the same allocated type
    pub fn ptr_eq(a: &Type, b: &Type) -> bool {
        match (a, b) {
            (Type::Primitive(a), Type::Primitive(b)) => a == b,
            (Type::Simple(a), Type::Simple(b)) => Arc::ptr_eq(a, b),
            (Type::Complex(a), Type::Complex(b)) => Arc::ptr_eq(a, b),
            (Type::List(a), Type::List(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// Primitive, if this is one
    pub fn as_primitive(&self) -> Option<PrimitiveType> {
        match self {
            Type::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// Simple type, if this is one
    pub fn as_simple(&self) -> Option<&Arc<SimpleType>> {
        match self {
            Type::Simple(t) => Some(t),
            _ => None,
        }
    }

    /// Complex type, if this is one
    pub fn as_complex(&self) -> Option<&Arc<ComplexType>> {
        match self {
            Type::Complex(t) => Some(t),
            _ => None,
        }
    }

    /// List type, if this is one
    pub fn as_list(&self) -> Option<&Arc<ListType>> {
        match self {
            Type::List(t) => Some(t),
            _ => None,
        }
    }

    /// Whether this is a complex type
    pub fn is_complex(&self) -> bool {
        matches!(self, Type::Complex(_))
    }

    /// Whether this is a list type
    pub fn is_list(&self) -> bool {
        matches!(self, Type::List(_))
    }
}

impl From<PrimitiveType> for Type {
    fn from(primitive: PrimitiveType) -> Self {
        Type::Primitive(primitive)
    }
}

impl From<SimpleType> for Type {
    fn from(simple: SimpleType) -> Self {
        Type::Simple(Arc::new(simple))
    }
}

impl From<ListType> for Type {
    fn from(list: ListType) -> Self {
        Type::List(Arc::new(list))
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.name())
    }
}

/// Scalar type derived from a primitive or another simple type
#[derive(Debug, Clone)]
pub struct SimpleType {
    name: String,
    schema: String,
    super_type: Option<Type>,
    constraints: Vec<Constraint>,
}

impl SimpleType {
    /// Create a simple type
    pub fn new(
        name: impl Into<String>,
        schema: impl Into<String>,
        super_type: Option<Type>,
        constraints: Vec<Constraint>,
    ) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            super_type,
            constraints,
        }
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning schema name
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Primitive or simple type this one restricts
    pub fn super_type(&self) -> Option<&Type> {
        self.super_type.as_ref()
    }

    /// Constraints declared on this type (not inherited ones)
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    /// Maximum length from a length constraint
    pub fn max_length(&self) -> Option<u32> {
        self.constraints.iter().find_map(Constraint::max_length)
    }

    /// Primitive at the root of the super type chain
    pub fn primitive(&self) -> Option<PrimitiveType> {
        let mut current = self.super_type.as_ref()?;
        loop {
            match current {
                Type::Primitive(p) => return Some(*p),
                Type::Simple(simple) => current = simple.super_type.as_ref()?,
                _ => return None,
            }
        }
    }
}

/// Structured type with an ordered list of fields
///
/// The field list is behind a lock so the type can be shared before it is
/// complete.
pub struct ComplexType {
    name: String,
    schema: String,
    super_type: Option<Arc<ComplexType>>,
    fields: RwLock<Vec<Field>>,
}

impl ComplexType {
    /// Create a complex type with no fields
    pub fn new(
        name: impl Into<String>,
        schema: impl Into<String>,
        super_type: Option<Arc<ComplexType>>,
    ) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            super_type,
            fields: RwLock::new(Vec::new()),
        }
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning schema name
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Complex type this one extends
    pub fn super_type(&self) -> Option<&Arc<ComplexType>> {
        self.super_type.as_ref()
    }

    /// Append a field
    pub fn add_field(&self, field: Field) {
        self.fields.write().push(field);
    }

    /// Fields declared on this type, in order
    pub fn fields(&self) -> Vec<Field> {
        self.fields.read().clone()
    }

    /// Fields of the super type chain followed by this type's own
    pub fn all_fields(&self) -> Vec<Field> {
        let mut fields = self
            .super_type
            .as_ref()
            .map(|s| s.all_fields())
            .unwrap_or_default();
        fields.extend(self.fields());
        fields
    }

    /// Declared field by name
    pub fn field(&self, name: &str) -> Option<Field> {
        self.fields.read().iter().find(|f| f.name() == name).cloned()
    }

    /// Number of declared fields
    pub fn field_count(&self) -> usize {
        self.fields.read().len()
    }
}

// Field types may point back at this type
impl fmt::Debug for ComplexType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fields: Vec<(String, String)> = self
            .fields
            .read()
            .iter()
            .map(|field| (field.name().to_string(), field.field_type().name().to_string()))
            .collect();
        f.debug_struct("ComplexType")
            .field("name", &self.name)
            .field("schema", &self.schema)
            .field("super_type", &self.super_type.as_ref().map(|s| s.name()))
            .field("fields", &fields)
            .finish()
    }
}

/// Repeated occurrences of an item type
#[derive(Debug, Clone)]
pub struct ListType {
    name: String,
    schema: String,
    item_type: Type,
    element_name: String,
    default_value: Option<String>,
    min_occurs: u32,
    max_occurs: Option<u32>,
}

impl ListType {
    /// Element name used for occurrences unless one is given
    pub const DEFAULT_ELEMENT_NAME: &'static str = "item";

    /// Create a list of any number of `item` elements
    pub fn new(name: impl Into<String>, schema: impl Into<String>, item_type: Type) -> Self {
        Self {
            name: name.into(),
            schema: schema.into(),
            item_type,
            element_name: Self::DEFAULT_ELEMENT_NAME.to_string(),
            default_value: None,
            min_occurs: 0,
            max_occurs: None,
        }
    }

    /// Set the element name of occurrences
    pub fn with_element_name(mut self, element_name: impl Into<String>) -> Self {
        self.element_name = element_name.into();
        self
    }

    /// Set the default value
    pub fn with_default_value(mut self, default_value: Option<String>) -> Self {
        self.default_value = default_value;
        self
    }

    /// Set the occurrence bounds
    pub fn with_bounds(mut self, occurs: Occurs) -> Self {
        self.min_occurs = occurs.min;
        self.max_occurs = occurs.max;
        self
    }

    /// Type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Owning schema name
    pub fn schema(&self) -> &str {
        &self.schema
    }

    /// Type of each occurrence
    pub fn item_type(&self) -> &Type {
        &self.item_type
    }

    /// Element name of occurrences
    pub fn element_name(&self) -> &str {
        &self.element_name
    }

    /// Default value
    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// Minimum number of occurrences
    pub fn min_occurs(&self) -> u32 {
        self.min_occurs
    }

    /// Maximum number of occurrences; `None` is unbounded
    pub fn max_occurs(&self) -> Option<u32> {
        self.max_occurs
    }

    /// Whether the number of occurrences is unbounded
    pub fn is_unbounded(&self) -> bool {
        self.max_occurs.is_none()
    }
}
