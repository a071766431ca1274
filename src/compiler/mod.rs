//! Schema compiler
//!
//! [`XsdLoader`] compiles a parsed [`SchemaSet`] into a [`Schema`] and
//! registers it. Every top-level element and attribute declaration becomes
//! a field of the schema; the types they use, and everything those types
//! reach, become the schema's types.
//!
//! Compilation is forgiving: a declaration whose type cannot be bound is
//! left out and reported as a [`Diagnostic`], and the rest of the schema is
//! still registered. Only parse failures abort before anything is
//! registered.
//!
//! ```rust,ignore
//! let loader = XsdLoader::new();
//! let schema = loader
//!     .load_schema_file("note", "nxs", "note.xsd", false)?
//!     .expect("note.xsd has a target namespace");
//! for field in schema.fields() {
//!     println!("{}: {}", field.name(), field.field_type());
//! }
//! ```

mod builder;
mod fields;
mod groups;

pub use fields::{attribute_field, element_field};

use crate::error::{BindError, Result};
use crate::limits::Limits;
use crate::loaders::Loader;
use crate::locations::Location;
use crate::namespaces::Namespace;
use crate::registry::{SchemaRegistry, TypeScope};
use crate::types::Schema;
use crate::xsd::{SchemaSet, XsdSchema};
use builder::TypeBuilder;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

/// A declaration left out of a compiled schema
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Declaration path: a top-level name, or `type/field`
    pub declaration: String,
    /// Why it was left out
    pub error: BindError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.declaration, self.error)
    }
}

/// Outcome of a compilation
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    /// Registered schema; `None` when the set has no schema to compile
    pub schema: Option<Arc<Schema>>,
    /// Declarations left out of the schema
    pub diagnostics: Vec<Diagnostic>,
}

/// Compiles XML Schemas into registered repository schemas
#[derive(Debug, Clone)]
pub struct XsdLoader {
    registry: Arc<SchemaRegistry>,
    limits: Limits,
}

impl Default for XsdLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl XsdLoader {
    /// Create a loader with its own empty registry
    pub fn new() -> Self {
        Self::with_registry(Arc::new(SchemaRegistry::new()))
    }

    /// Create a loader registering into a shared registry
    pub fn with_registry(registry: Arc<SchemaRegistry>) -> Self {
        Self {
            registry,
            limits: Limits::default(),
        }
    }

    /// Set the limits applied to schema sources
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// Registry compiled schemas are registered into
    pub fn registry(&self) -> &Arc<SchemaRegistry> {
        &self.registry
    }

    /// Limits applied to schema sources
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Parse a schema file and compile it under `name`
    pub fn load_schema_file(
        &self,
        name: &str,
        prefix: &str,
        path: impl AsRef<Path>,
        override_existing: bool,
    ) -> Result<Option<Arc<Schema>>> {
        let set = self.parse(&Location::Path(path.as_ref().to_path_buf()))?;
        self.compile(name, prefix, &set, override_existing)
    }

    /// Parse a schema held in memory and compile it under `name`
    pub fn load_schema_str(
        &self,
        name: &str,
        prefix: &str,
        xsd: &str,
        override_existing: bool,
    ) -> Result<Option<Arc<Schema>>> {
        let set = self.parse(&Location::String(xsd.to_string()))?;
        self.compile(name, prefix, &set, override_existing)
    }

    fn parse(&self, location: &Location) -> Result<SchemaSet> {
        let loader = Loader::new().with_limits(self.limits.clone());
        SchemaSet::parse(location, &loader)
    }

    /// Compile a parsed schema set under `name`
    ///
    /// The first schema of the set with a target namespace other than the
    /// XML Schema namespace is compiled. A schema already registered under
    /// `name` is returned as is unless `override_existing` is set.
    pub fn compile(
        &self,
        name: &str,
        prefix: &str,
        set: &SchemaSet,
        override_existing: bool,
    ) -> Result<Option<Arc<Schema>>> {
        Ok(self
            .compile_with_diagnostics(name, prefix, set, override_existing)?
            .schema)
    }

    /// Compile a parsed schema set, reporting the declarations left out
    pub fn compile_with_diagnostics(
        &self,
        name: &str,
        prefix: &str,
        set: &SchemaSet,
        override_existing: bool,
    ) -> Result<Compilation> {
        self.limits.check_schema_components(set.component_count())?;

        let Some(source) = set
            .schemas()
            .iter()
            .find(|s| !s.target_namespace.is_empty() && !s.is_meta_schema())
        else {
            info!("no schema with a target namespace to compile as {}", name);
            return Ok(Compilation::default());
        };

        let lock = self.registry.compile_lock(name);
        let compilation = {
            let _guard = lock.lock();
            self.compile_locked(name, prefix, set, source, override_existing)
        };
        self.registry.release_compile_lock(name, lock);
        Ok(compilation)
    }

    fn compile_locked(
        &self,
        name: &str,
        prefix: &str,
        set: &SchemaSet,
        source: &XsdSchema,
        override_existing: bool,
    ) -> Compilation {
        if !override_existing {
            if let Some(existing) = self.registry.get_schema(name) {
                debug!("schema {} is already registered", name);
                return Compilation {
                    schema: Some(existing),
                    diagnostics: Vec::new(),
                };
            }
        }

        debug!("compiling schema {} from {}", name, source.target_namespace);
        let mut schema = Schema::new(name, Namespace::new(source.target_namespace.as_str(), prefix));
        let mut builder = TypeBuilder::new(set, TypeScope::new(&self.registry, name));

        for (element_name, id) in &source.element_decls {
            let decl = set.element(*id);
            match builder.load_type(decl.type_id, &decl.name) {
                Ok(field_type) => schema.add_field(element_field(decl, field_type)),
                Err(err) => builder.skip(element_name.as_str(), err),
            }
        }
        for (attribute_name, id) in &source.attribute_decls {
            let decl = set.attribute(*id);
            match builder.load_type(decl.type_id, &decl.name) {
                Ok(field_type) => schema.add_field(attribute_field(decl, field_type)),
                Err(err) => builder.skip(attribute_name.as_str(), err),
            }
        }

        let (scope, diagnostics) = builder.finish();
        for type_ in scope.into_types() {
            schema.add_type(type_);
        }
        if !diagnostics.is_empty() {
            info!(
                "schema {} compiled with {} declarations left out",
                name,
                diagnostics.len()
            );
        }

        let schema = self.registry.register_schema(schema, override_existing);
        Compilation {
            schema: Some(schema),
            diagnostics,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Constraint, FieldFlags, Type};

    const NOTE: &str = r#"<?xml version="1.0"?>
        <xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                   targetNamespace="urn:note">
          <xs:element name="title">
            <xs:simpleType>
              <xs:restriction base="xs:string">
                <xs:maxLength value="255"/>
              </xs:restriction>
            </xs:simpleType>
          </xs:element>
          <xs:element name="version" type="xs:string" fixed="1"/>
          <xs:element name="body" type="xs:string" nillable="true"/>
          <xs:element name="anything"/>
          <xs:attribute name="lang" type="xs:language" default="en"/>
        </xs:schema>"#;

    #[test]
    fn test_compile_top_level_fields() {
        let loader = XsdLoader::new();
        let set = SchemaSet::from_string(NOTE).unwrap();
        let compilation = loader
            .compile_with_diagnostics("note", "nxs", &set, false)
            .unwrap();
        let schema = compilation.schema.unwrap();

        assert_eq!(schema.namespace(), &Namespace::new("urn:note", "nxs"));
        let names: Vec<_> = schema.fields().iter().map(|f| f.name().to_string()).collect();
        assert_eq!(names, vec!["title", "version", "body", "lang"]);

        let title = schema.field("title").unwrap();
        assert_eq!(title.field_type().name(), "title#anonymousType");
        assert_eq!(title.max_length(), Some(255));
        assert!(schema.get_type("title#anonymousType").is_some());

        assert_eq!(schema.field("version").unwrap().flags(), FieldFlags::CONSTANT);
        assert!(schema.field("body").unwrap().is_nillable());
        assert_eq!(schema.field("lang").unwrap().default_value(), Some("en"));

        assert_eq!(compilation.diagnostics.len(), 1);
        assert_eq!(compilation.diagnostics[0].declaration, "anything");
        assert_eq!(
            compilation.diagnostics[0].error,
            BindError::UnknownPrimitive("anyType".to_string())
        );
    }

    #[test]
    fn test_no_target_namespace() {
        let loader = XsdLoader::new();
        let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
              <xs:element name="a" type="xs:string"/>
            </xs:schema>"#;
        assert!(loader.load_schema_str("a", "a", xsd, false).unwrap().is_none());
        assert!(loader.registry().schema_names().is_empty());
    }

    #[test]
    fn test_parse_failure_registers_nothing() {
        let loader = XsdLoader::new();
        let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:x">
              <xs:element name="a" type="missing"/>
            </xs:schema>"#;
        assert!(loader.load_schema_str("x", "x", xsd, false).is_err());
        assert!(loader.registry().get_schema("x").is_none());
    }

    #[test]
    fn test_component_limit() {
        let set = SchemaSet::from_string(NOTE).unwrap();
        let limits = Limits {
            max_schema_components: 10,
            ..Limits::default()
        };
        let loader = XsdLoader::new().with_limits(limits);
        assert!(loader.compile("note", "nxs", &set, false).is_err());
    }

    #[test]
    fn test_diagnostic_display() {
        let diagnostic = Diagnostic {
            declaration: "note/ref".to_string(),
            error: BindError::UnnamedType,
        };
        assert_eq!(diagnostic.to_string(), "note/ref: unable to load type: no name found");
    }

    #[test]
    fn test_anonymous_base_of_anonymous_type() {
        let loader = XsdLoader::new();
        let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:note">
              <xs:element name="title">
                <xs:simpleType>
                  <xs:restriction>
                    <xs:simpleType>
                      <xs:restriction base="xs:string">
                        <xs:maxLength value="10"/>
                      </xs:restriction>
                    </xs:simpleType>
                    <xs:enumeration value="A"/>
                  </xs:restriction>
                </xs:simpleType>
              </xs:element>
            </xs:schema>"#;
        let set = SchemaSet::from_string(xsd).unwrap();
        let compilation = loader
            .compile_with_diagnostics("note", "nxs", &set, false)
            .unwrap();
        assert!(compilation.diagnostics.is_empty());

        let schema = compilation.schema.unwrap();
        let title = schema.field("title").unwrap();
        let title_type = title.field_type().as_simple().unwrap();
        assert_eq!(title_type.name(), "title#anonymousType");
        assert!(title_type.constraints()[0].enum_values().is_some());

        let base = title_type.super_type().unwrap().as_simple().unwrap();
        assert_eq!(base.name(), "title#anonymousType#anonymousType");
        assert_eq!(base.constraints(), &[Constraint::StringLength { min: 0, max: 10 }]);
        assert!(schema.get_type("title#anonymousType#anonymousType").is_some());
    }

    #[test]
    fn test_failed_type_takes_dependent_types_with_it() {
        let loader = XsdLoader::new();
        let xsd = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                       xmlns:t="urn:t" targetNamespace="urn:t">
              <xs:complexType name="a">
                <xs:sequence>
                  <xs:element name="b" type="t:b"/>
                </xs:sequence>
                <xs:attribute name="q" type="xs:QName"/>
              </xs:complexType>
              <xs:complexType name="b">
                <xs:sequence>
                  <xs:element name="a" type="t:a"/>
                </xs:sequence>
              </xs:complexType>
              <xs:element name="first" type="t:a"/>
              <xs:element name="second" type="t:b"/>
            </xs:schema>"#;
        let set = SchemaSet::from_string(xsd).unwrap();
        let compilation = loader.compile_with_diagnostics("t", "t", &set, false).unwrap();

        let skipped: Vec<_> = compilation
            .diagnostics
            .iter()
            .map(|d| d.declaration.as_str())
            .collect();
        assert_eq!(skipped, vec!["first", "b/a"]);

        // b was rebuilt without the field pointing at the failed a
        let schema = compilation.schema.unwrap();
        assert_eq!(schema.type_names().collect::<Vec<_>>(), vec!["b"]);
        let b = schema.get_type("b").unwrap();
        assert_eq!(b.as_complex().unwrap().field_count(), 0);
        assert!(Type::ptr_eq(schema.field("second").unwrap().field_type(), b));
    }

    #[test]
    fn test_compile_lock_is_released() {
        let loader = XsdLoader::new();
        let set = SchemaSet::from_string(NOTE).unwrap();
        loader.compile("note", "nxs", &set, false).unwrap();
        loader.compile("note", "nxs", &set, false).unwrap();
        assert_eq!(loader.registry().compile_lock_count(), 0);
    }
}
