//! Parsed schema object model
//!
//! A [`SchemaSet`] is everything reachable from one schema source: the
//! documents it includes and imports, grouped by target namespace, plus the
//! XML Schema meta-schema holding the built-in types. Components live in
//! arenas owned by the set and refer to each other through [`TypeId`],
//! [`ElementId`] and [`AttributeId`].
//!
//! ```rust,ignore
//! let set = SchemaSet::from_string(xsd)?;
//! for schema in set.schemas() {
//!     for (name, id) in &schema.element_decls {
//!         println!("{} -> {}", name, set.type_def(set.element(*id).type_id).display_name());
//!     }
//! }
//! ```

pub mod builtins;
pub mod components;
pub mod particles;
mod parsing;

pub use components::{
    AttributeDecl, AttributeId, AttributeUse, ComplexTypeDef, ContentType, Derivation,
    ElementDecl, ElementId, Facet, FacetSet, ModelGroup, ModelType, Particle, SimpleTypeDef,
    SimpleVariety, Term, TypeId, XsdType, XsdTypeKind,
};
pub use particles::Occurs;

use crate::error::Result;
use crate::loaders::Loader;
use crate::locations::Location;
use builtins::{XSD_ANY_SIMPLE_TYPE, XSD_ANY_TYPE, XSD_ATOMIC_TYPES, XSD_LIST_TYPES, XSD_NAMESPACE};
use indexmap::IndexMap;
use std::path::Path;

/// Components of one target namespace
#[derive(Debug, Clone, Default)]
pub struct XsdSchema {
    /// Target namespace (empty for none)
    pub target_namespace: String,
    /// Top-level element declarations, in declaration order
    pub element_decls: IndexMap<String, ElementId>,
    /// Top-level attribute declarations, in declaration order
    pub attribute_decls: IndexMap<String, AttributeId>,
    /// Named type definitions, in declaration order
    pub type_defs: IndexMap<String, TypeId>,
    /// Locations of the documents contributing to this namespace
    pub locations: Vec<String>,
}

impl XsdSchema {
    /// Create an empty schema for a namespace
    pub fn new(target_namespace: impl Into<String>) -> Self {
        Self {
            target_namespace: target_namespace.into(),
            ..Self::default()
        }
    }

    /// Whether this is the XML Schema meta-schema
    pub fn is_meta_schema(&self) -> bool {
        self.target_namespace == XSD_NAMESPACE
    }
}

/// A parsed set of schemas
#[derive(Debug, Clone)]
pub struct SchemaSet {
    pub(crate) schemas: Vec<XsdSchema>,
    pub(crate) types: Vec<XsdType>,
    pub(crate) elements: Vec<ElementDecl>,
    pub(crate) attributes: Vec<AttributeDecl>,
}

impl SchemaSet {
    /// Create a set holding only the meta-schema and its built-in types
    pub(crate) fn with_builtins() -> Self {
        let mut set = Self {
            schemas: Vec::new(),
            types: Vec::new(),
            elements: Vec::new(),
            attributes: Vec::new(),
        };
        let mut meta = XsdSchema::new(XSD_NAMESPACE);

        // anyType: mixed, any content, its own base
        let any_type = TypeId(0);
        let mut any_def = ComplexTypeDef::empty(None);
        let mut any_group = ModelGroup::new(ModelType::Sequence);
        any_group
            .particles
            .push(Particle::new(Occurs::zero_or_more(), Term::Wildcard));
        any_def.content = ContentType::Particle(Particle::new(
            Occurs::once(),
            Term::ModelGroup(any_group),
        ));
        any_def.mixed = true;
        set.push_builtin(&mut meta, XSD_ANY_TYPE, any_type, XsdTypeKind::Complex(any_def));

        let any_simple = set.push_builtin(
            &mut meta,
            XSD_ANY_SIMPLE_TYPE,
            any_type,
            XsdTypeKind::Simple(SimpleTypeDef::restriction(FacetSet::new())),
        );

        for name in XSD_ATOMIC_TYPES {
            set.push_builtin(
                &mut meta,
                name,
                any_simple,
                XsdTypeKind::Simple(SimpleTypeDef::restriction(FacetSet::new())),
            );
        }

        for (name, item) in XSD_LIST_TYPES {
            let item_type = meta.type_defs[*item];
            set.push_builtin(
                &mut meta,
                name,
                any_simple,
                XsdTypeKind::Simple(SimpleTypeDef {
                    variety: SimpleVariety::List { item_type },
                    facets: FacetSet::new(),
                }),
            );
        }

        set.schemas.push(meta);
        set
    }

    fn push_builtin(
        &mut self,
        meta: &mut XsdSchema,
        name: &str,
        base: TypeId,
        kind: XsdTypeKind,
    ) -> TypeId {
        let id = self.add_type(XsdType {
            name: Some(name.to_string()),
            target_namespace: XSD_NAMESPACE.to_string(),
            base,
            kind,
        });
        meta.type_defs.insert(name.to_string(), id);
        id
    }

    /// Parse a schema held in memory
    ///
    /// Relative `schemaLocation`s of includes and imports resolve against
    /// the working directory.
    pub fn from_string(xsd: &str) -> Result<Self> {
        Self::parse(&Location::String(xsd.to_string()), &Loader::new())
    }

    /// Parse a schema file and everything it includes or imports
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        Self::parse(&Location::Path(path.as_ref().to_path_buf()), &Loader::new())
    }

    /// Parse the schema at a location using the given loader
    pub fn parse(location: &Location, loader: &Loader) -> Result<Self> {
        parsing::SchemaParser::new(loader).parse(location)
    }

    /// Schemas in the set; the meta-schema comes first
    pub fn schemas(&self) -> &[XsdSchema] {
        &self.schemas
    }

    /// Schema for a target namespace
    pub fn schema(&self, namespace: &str) -> Option<&XsdSchema> {
        self.schemas
            .iter()
            .find(|s| s.target_namespace == namespace)
    }

    /// Type definition by id
    pub fn type_def(&self, id: TypeId) -> &XsdType {
        &self.types[id.0]
    }

    /// Element declaration by id
    pub fn element(&self, id: ElementId) -> &ElementDecl {
        &self.elements[id.0]
    }

    /// Attribute declaration by id
    pub fn attribute(&self, id: AttributeId) -> &AttributeDecl {
        &self.attributes[id.0]
    }

    /// The `anyType` definition rooting the type hierarchy
    pub fn any_type(&self) -> TypeId {
        TypeId(0)
    }

    /// Look up a named type definition
    pub fn find_type(&self, namespace: &str, local_name: &str) -> Option<TypeId> {
        self.schema(namespace)
            .and_then(|s| s.type_defs.get(local_name).copied())
    }

    /// Number of parsed components, built-ins included
    pub fn component_count(&self) -> usize {
        self.types.len() + self.elements.len() + self.attributes.len()
    }

    /// Attribute uses of a complex type including those inherited from its
    /// base types; a redeclared attribute replaces the inherited one
    pub fn attribute_uses(&self, id: TypeId) -> Vec<AttributeUse> {
        let mut chain = vec![id];
        let mut current = id;
        loop {
            let base = self.type_def(current).base;
            if base == current || chain.contains(&base) {
                break;
            }
            chain.push(base);
            current = base;
        }

        let mut uses: Vec<AttributeUse> = Vec::new();
        for type_id in chain.into_iter().rev() {
            let Some(def) = self.type_def(type_id).as_complex() else {
                continue;
            };
            for attr_use in &def.attribute_uses {
                let name = &self.attribute(attr_use.decl).name;
                uses.retain(|u| &self.attribute(u.decl).name != name);
                uses.push(*attr_use);
            }
        }
        uses
    }

    pub(crate) fn add_type(&mut self, xsd_type: XsdType) -> TypeId {
        self.types.push(xsd_type);
        TypeId(self.types.len() - 1)
    }

    pub(crate) fn add_element(&mut self, decl: ElementDecl) -> ElementId {
        self.elements.push(decl);
        ElementId(self.elements.len() - 1)
    }

    pub(crate) fn add_attribute(&mut self, decl: AttributeDecl) -> AttributeId {
        self.attributes.push(decl);
        AttributeId(self.attributes.len() - 1)
    }

    pub(crate) fn schema_mut(&mut self, namespace: &str) -> &mut XsdSchema {
        let index = match self
            .schemas
            .iter()
            .position(|s| s.target_namespace == namespace)
        {
            Some(index) => index,
            None => {
                self.schemas.push(XsdSchema::new(namespace));
                self.schemas.len() - 1
            }
        };
        &mut self.schemas[index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_bootstrap() {
        let set = SchemaSet::with_builtins();
        assert_eq!(set.schemas().len(), 1);
        assert!(set.schemas()[0].is_meta_schema());

        let any = set.type_def(set.any_type());
        assert_eq!(any.name.as_deref(), Some("anyType"));
        assert_eq!(any.base, set.any_type());
        assert!(any.is_complex());

        let string = set.find_type(XSD_NAMESPACE, "string").unwrap();
        let any_simple = set.find_type(XSD_NAMESPACE, "anySimpleType").unwrap();
        assert_eq!(set.type_def(string).base, any_simple);
        assert_eq!(set.type_def(any_simple).base, set.any_type());
    }

    #[test]
    fn test_builtin_list_types() {
        let set = SchemaSet::with_builtins();
        let nmtokens = set.find_type(XSD_NAMESPACE, "NMTOKENS").unwrap();
        let nmtoken = set.find_type(XSD_NAMESPACE, "NMTOKEN").unwrap();
        let item = set
            .type_def(nmtokens)
            .as_simple()
            .and_then(|st| st.item_type());
        assert_eq!(item, Some(nmtoken));
    }

    #[test]
    fn test_schema_mut_creates_once() {
        let mut set = SchemaSet::with_builtins();
        set.schema_mut("urn:a");
        set.schema_mut("urn:a");
        assert_eq!(set.schemas().len(), 2);
        assert!(set.schema("urn:a").is_some());
    }
}
