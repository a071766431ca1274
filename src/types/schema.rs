//! Compiled schemas

use super::{Field, Type};
use crate::namespaces::Namespace;
use indexmap::IndexMap;

/// A named, namespaced collection of top-level fields and owned types
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    namespace: Namespace,
    fields: Vec<Field>,
    types: IndexMap<String, Type>,
}

impl Schema {
    /// Create an empty schema
    pub fn new(name: impl Into<String>, namespace: Namespace) -> Self {
        Self {
            name: name.into(),
            namespace,
            fields: Vec::new(),
            types: IndexMap::new(),
        }
    }

    /// Schema name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Namespace the schema is bound to
    pub fn namespace(&self) -> &Namespace {
        &self.namespace
    }

    /// Top-level fields, in declaration order
    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// Top-level field by name
    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Append a top-level field
    pub fn add_field(&mut self, field: Field) {
        self.fields.push(field);
    }

    /// Types owned by this schema, in registration order
    pub fn types(&self) -> impl Iterator<Item = &Type> {
        self.types.values()
    }

    /// Owned type by name
    pub fn get_type(&self, name: &str) -> Option<&Type> {
        self.types.get(name)
    }

    /// Names of the owned types, in registration order
    pub fn type_names(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Number of owned types
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    pub(crate) fn add_type(&mut self, type_: Type) {
        self.types.insert(type_.name().to_string(), type_);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ListType, PrimitiveType};

    #[test]
    fn test_schema_fields_and_types() {
        let mut schema = Schema::new("note", Namespace::new("urn:note", "nxs"));
        let tags: Type = ListType::new("tags#anonymousListType", "note", PrimitiveType::String.into())
            .into();
        schema.add_type(tags.clone());
        schema.add_field(Field::new("tags", tags));

        assert_eq!(schema.name(), "note");
        assert_eq!(schema.namespace().prefix, "nxs");
        assert_eq!(schema.fields().len(), 1);
        assert!(schema.field("tags").unwrap().field_type().is_list());
        assert!(schema.get_type("tags#anonymousListType").is_some());
        assert_eq!(schema.type_names().collect::<Vec<_>>(), vec!["tags#anonymousListType"]);
    }
}
