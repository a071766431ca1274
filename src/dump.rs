//! Serializable summary of a compiled schema
//!
//! Types are referred to by name, so a dump of a cyclic type graph is a
//! flat, finite document. The CLI prints it as JSON.

use crate::types::{Constraint, Field, Schema, Type};
use serde::{Deserialize, Serialize};

/// Complete dump of a compiled schema
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SchemaDump {
    /// Schema name
    pub name: String,

    /// Namespace URI
    pub namespace: String,

    /// Namespace prefix
    pub prefix: String,

    /// Top-level fields
    pub fields: Vec<FieldInfo>,

    /// Types owned by the schema, in registration order
    pub types: Vec<TypeInfo>,
}

impl SchemaDump {
    /// Summarize a compiled schema
    pub fn from_schema(schema: &Schema) -> Self {
        Self {
            name: schema.name().to_string(),
            namespace: schema.namespace().uri.clone(),
            prefix: schema.namespace().prefix.clone(),
            fields: schema.fields().iter().map(FieldInfo::from_field).collect(),
            types: schema.types().map(TypeInfo::from_type).collect(),
        }
    }

    /// Type by name
    pub fn type_info(&self, name: &str) -> Option<&TypeInfo> {
        self.types.iter().find(|t| t.name == name)
    }

    /// Pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Field information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FieldInfo {
    /// Field name
    pub name: String,

    /// Type name
    #[serde(rename = "type")]
    pub field_type: String,

    /// Default value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Whether the default value is fixed
    pub constant: bool,

    /// Whether the field is nillable
    pub nillable: bool,

    /// Maximum value length
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u32>,
}

impl FieldInfo {
    fn from_field(field: &Field) -> Self {
        Self {
            name: field.name().to_string(),
            field_type: field.field_type().name().to_string(),
            default: field.default_value().map(str::to_string),
            constant: field.is_constant(),
            nillable: field.is_nillable(),
            max_length: field.max_length(),
        }
    }
}

/// Type information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeInfo {
    /// Type name
    pub name: String,

    /// primitive, simple, complex or list
    pub kind: String,

    /// Super type name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub super_type: Option<String>,

    /// Constraints of simple types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub constraints: Option<Vec<Constraint>>,

    /// Declared fields of complex types
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fields: Option<Vec<FieldInfo>>,

    /// List details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list: Option<ListInfo>,
}

impl TypeInfo {
    fn from_type(type_: &Type) -> Self {
        let mut info = Self {
            name: type_.name().to_string(),
            kind: type_.kind().to_string(),
            super_type: None,
            constraints: None,
            fields: None,
            list: None,
        };
        match type_ {
            Type::Primitive(_) => {}
            Type::Simple(simple) => {
                info.super_type = simple.super_type().map(|t| t.name().to_string());
                info.constraints = Some(simple.constraints().to_vec());
            }
            Type::Complex(complex) => {
                info.super_type = complex.super_type().map(|t| t.name().to_string());
                info.fields = Some(complex.fields().iter().map(FieldInfo::from_field).collect());
            }
            Type::List(list) => {
                info.list = Some(ListInfo {
                    item_type: list.item_type().name().to_string(),
                    element_name: list.element_name().to_string(),
                    default: list.default_value().map(str::to_string),
                    min_occurs: list.min_occurs(),
                    max_occurs: list.max_occurs(),
                });
            }
        }
        info
    }
}

/// List type information
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ListInfo {
    /// Item type name
    pub item_type: String,

    /// Element name of occurrences
    pub element_name: String,

    /// Default value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,

    /// Minimum occurrences
    pub min_occurs: u32,

    /// Maximum occurrences (None means unbounded)
    pub max_occurs: Option<u32>,
}
