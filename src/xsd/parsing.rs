//! XSD document parsing
//!
//! Parsing runs in phases over every document reachable from the root
//! source, so that top-level components may be referenced before they are
//! declared:
//!
//! 1. load the root document and, recursively, its includes and imports
//! 2. declare every global component, allocating its arena slot
//! 3. parse component bodies, resolving references against the globals
//! 4. reject circular base type derivations
//! 5. merge content inherited along base type chains

use std::collections::{HashMap, HashSet};

use tracing::{debug, trace};

use super::builtins::{XSD_ANY_SIMPLE_TYPE, XSD_NAMESPACE};
use super::components::{
    AttributeDecl, AttributeId, AttributeUse, ComplexTypeDef, ContentType, Derivation,
    ElementDecl, ElementId, FacetSet, ModelGroup, ModelType, Particle, SimpleTypeDef,
    SimpleVariety, Term, TypeId, XsdType, XsdTypeKind,
};
use super::particles::Occurs;
use super::SchemaSet;
use crate::documents::{Document, Element};
use crate::error::{Error, ParseError, Result};
use crate::loaders::Loader;
use crate::locations::Location;
use crate::names::validate_ncname;
use crate::namespaces::QName;

/// XSD element local names
mod xsd_elements {
    pub const SCHEMA: &str = "schema";
    pub const ELEMENT: &str = "element";
    pub const COMPLEX_TYPE: &str = "complexType";
    pub const SIMPLE_TYPE: &str = "simpleType";
    pub const ATTRIBUTE: &str = "attribute";
    pub const ATTRIBUTE_GROUP: &str = "attributeGroup";
    pub const GROUP: &str = "group";
    pub const SEQUENCE: &str = "sequence";
    pub const CHOICE: &str = "choice";
    pub const ALL: &str = "all";
    pub const ANNOTATION: &str = "annotation";
    pub const IMPORT: &str = "import";
    pub const INCLUDE: &str = "include";
    pub const REDEFINE: &str = "redefine";
    pub const RESTRICTION: &str = "restriction";
    pub const EXTENSION: &str = "extension";
    pub const LIST: &str = "list";
    pub const UNION: &str = "union";
    pub const COMPLEX_CONTENT: &str = "complexContent";
    pub const SIMPLE_CONTENT: &str = "simpleContent";
    pub const ANY: &str = "any";
    pub const ANY_ATTRIBUTE: &str = "anyAttribute";
    pub const NOTATION: &str = "notation";
}

/// XSD attribute names
mod xsd_attrs {
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const REF: &str = "ref";
    pub const TARGET_NAMESPACE: &str = "targetNamespace";
    pub const ELEMENT_FORM_DEFAULT: &str = "elementFormDefault";
    pub const ATTRIBUTE_FORM_DEFAULT: &str = "attributeFormDefault";
    pub const FORM: &str = "form";
    pub const NILLABLE: &str = "nillable";
    pub const DEFAULT: &str = "default";
    pub const FIXED: &str = "fixed";
    pub const BASE: &str = "base";
    pub const VALUE: &str = "value";
    pub const MIXED: &str = "mixed";
    pub const NAMESPACE: &str = "namespace";
    pub const SCHEMA_LOCATION: &str = "schemaLocation";
    pub const ITEM_TYPE: &str = "itemType";
    pub const MEMBER_TYPES: &str = "memberTypes";
    pub const MIN_OCCURS: &str = "minOccurs";
    pub const MAX_OCCURS: &str = "maxOccurs";
    pub const USE: &str = "use";
}

/// Constraining facet element names
const FACETS: &[&str] = &[
    "length",
    "minLength",
    "maxLength",
    "pattern",
    "enumeration",
    "whiteSpace",
    "maxInclusive",
    "maxExclusive",
    "minInclusive",
    "minExclusive",
    "totalDigits",
    "fractionDigits",
];

/// How a document was reached from the root source
#[derive(Debug, Clone)]
enum Inclusion {
    Root,
    /// `xs:include` from a document with this target namespace
    Include(String),
    /// `xs:import` of this namespace
    Import(String),
}

/// Per-document settings needed to name and resolve components
#[derive(Debug, Clone)]
struct DocContext {
    target_namespace: String,
    /// Included without a target namespace; unqualified references adopt
    /// the including document's namespace
    chameleon: bool,
    elements_qualified: bool,
    attributes_qualified: bool,
    location: String,
}

impl DocContext {
    fn qname(&self, local_name: &str) -> QName {
        if self.target_namespace.is_empty() {
            QName::local(local_name)
        } else {
            QName::namespaced(self.target_namespace.as_str(), local_name)
        }
    }

    fn resolve(&self, elem: &Element, reference: &str) -> Result<QName> {
        let mut qname = elem.namespaces.resolve(reference.trim())?;
        if qname.namespace.is_none() && self.chameleon {
            qname.namespace = Some(self.target_namespace.clone());
        }
        Ok(qname)
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::Parse(ParseError::new(message).with_location(self.location.clone()))
    }
}

struct SchemaDocument {
    root: Element,
    ctx: DocContext,
}

/// Content that can only be computed once the base type is complete
#[derive(Debug, Clone, Copy)]
enum PendingContent {
    /// complexContent extension: base content followed by the type's own
    Extension,
    /// simpleContent derived from a complex type with simple content
    SimpleFromBase,
}

pub(super) struct SchemaParser<'a> {
    loader: &'a Loader,
    set: SchemaSet,
    documents: Vec<SchemaDocument>,
    visited: HashSet<String>,
    types: HashMap<QName, TypeId>,
    elements: HashMap<QName, ElementId>,
    attributes: HashMap<QName, AttributeId>,
    groups: HashMap<QName, (Element, DocContext)>,
    attribute_groups: HashMap<QName, (Element, DocContext)>,
    /// Named groups and attribute groups being expanded
    expanding: Vec<QName>,
    pending: Vec<(TypeId, PendingContent)>,
}

impl<'a> SchemaParser<'a> {
    pub(super) fn new(loader: &'a Loader) -> Self {
        let set = SchemaSet::with_builtins();
        let types = set.schemas[0]
            .type_defs
            .iter()
            .map(|(name, id)| (QName::namespaced(XSD_NAMESPACE, name.as_str()), *id))
            .collect();

        Self {
            loader,
            set,
            documents: Vec::new(),
            visited: HashSet::new(),
            types,
            elements: HashMap::new(),
            attributes: HashMap::new(),
            groups: HashMap::new(),
            attribute_groups: HashMap::new(),
            expanding: Vec::new(),
            pending: Vec::new(),
        }
    }

    pub(super) fn parse(mut self, location: &Location) -> Result<SchemaSet> {
        self.load_document(location.clone(), Inclusion::Root, 0)?;

        let documents = std::mem::take(&mut self.documents);
        for doc in &documents {
            self.declare_globals(doc)?;
        }
        for doc in &documents {
            self.parse_globals(doc)?;
        }

        self.check_base_cycles()?;
        self.merge_derived_content()?;
        self.loader
            .limits()
            .check_schema_components(self.set.component_count())?;

        debug!(
            documents = documents.len(),
            components = self.set.component_count(),
            "parsed schema set from {}",
            location.as_str()
        );
        Ok(self.set)
    }

    fn load_document(&mut self, location: Location, inclusion: Inclusion, depth: usize) -> Result<()> {
        self.loader.limits().check_schema_depth(depth)?;

        let key = match &location {
            Location::Path(path) => path
                .canonicalize()
                .unwrap_or_else(|_| path.clone())
                .to_string_lossy()
                .to_string(),
            other => other.as_str(),
        };
        if !self.visited.insert(key.clone()) {
            trace!("skipping already loaded schema document {}", key);
            return Ok(());
        }

        let content = self.loader.load(&location)?;
        let doc = Document::parse(content.as_bytes(), self.loader.limits())?;
        let root = doc
            .root
            .ok_or_else(|| ParseError::new("Empty document").with_location(key.clone()))?;

        if root.local_name() != xsd_elements::SCHEMA || root.namespace() != Some(XSD_NAMESPACE) {
            return Err(ParseError::new(format!(
                "Expected xs:schema root element, got {}",
                root.qname
            ))
            .with_location(key)
            .into());
        }

        let declared = root
            .get_attribute(xsd_attrs::TARGET_NAMESPACE)
            .map(str::to_string);
        let (target_namespace, chameleon) = match (declared, &inclusion) {
            (Some(ns), Inclusion::Include(parent)) if &ns != parent => {
                return Err(ParseError::new(format!(
                    "Included schema has different targetNamespace '{}', expected '{}'",
                    ns, parent
                ))
                .with_location(key)
                .into());
            }
            (declared, Inclusion::Import(expected))
                if declared.as_deref().unwrap_or("") != expected.as_str() =>
            {
                return Err(ParseError::new(format!(
                    "Imported schema has targetNamespace '{}', expected '{}'",
                    declared.unwrap_or_default(),
                    expected
                ))
                .with_location(key)
                .into());
            }
            (Some(ns), _) => (ns, false),
            (None, Inclusion::Include(parent)) => (parent.clone(), !parent.is_empty()),
            (None, _) => (String::new(), false),
        };

        let ctx = DocContext {
            elements_qualified: root.get_attribute(xsd_attrs::ELEMENT_FORM_DEFAULT)
                == Some("qualified"),
            attributes_qualified: root.get_attribute(xsd_attrs::ATTRIBUTE_FORM_DEFAULT)
                == Some("qualified"),
            target_namespace,
            chameleon,
            location: key,
        };

        let mut references = Vec::new();
        for child in &root.children {
            match child.local_name() {
                xsd_elements::INCLUDE => {
                    let schema_location = child
                        .get_attribute(xsd_attrs::SCHEMA_LOCATION)
                        .ok_or_else(|| ctx.error("xs:include missing 'schemaLocation' attribute"))?;
                    references.push((
                        schema_location.to_string(),
                        Inclusion::Include(ctx.target_namespace.clone()),
                    ));
                }
                xsd_elements::IMPORT => {
                    let namespace = child.get_attribute(xsd_attrs::NAMESPACE).unwrap_or("");
                    if namespace == ctx.target_namespace {
                        return Err(ctx.error(format!(
                            "Cannot import the importing schema's own namespace '{}'",
                            namespace
                        )));
                    }
                    match child.get_attribute(xsd_attrs::SCHEMA_LOCATION) {
                        Some(schema_location) => references.push((
                            schema_location.to_string(),
                            Inclusion::Import(namespace.to_string()),
                        )),
                        None => debug!("import of '{}' has no schemaLocation", namespace),
                    }
                }
                xsd_elements::REDEFINE => {
                    return Err(ctx.error("xs:redefine is not supported"));
                }
                _ => {}
            }
        }

        self.set
            .schema_mut(&ctx.target_namespace)
            .locations
            .push(ctx.location.clone());
        self.documents.push(SchemaDocument { root, ctx });

        for (reference, inclusion) in references {
            let resolved = location.resolve(&reference)?;
            self.load_document(resolved, inclusion, depth + 1)?;
        }

        Ok(())
    }

    fn declare_globals(&mut self, doc: &SchemaDocument) -> Result<()> {
        let ctx = &doc.ctx;
        let any_type = self.set.any_type();

        for child in &doc.root.children {
            match child.local_name() {
                xsd_elements::ELEMENT => {
                    let name = required_name(child, ctx)?;
                    let qname = ctx.qname(name);
                    if self.elements.contains_key(&qname) {
                        return Err(ctx.error(format!("Duplicate element declaration '{}'", qname)));
                    }
                    let id = self.set.add_element(ElementDecl {
                        name: name.to_string(),
                        target_namespace: ctx.target_namespace.clone(),
                        type_id: any_type,
                        default_value: None,
                        fixed_value: None,
                        nillable: false,
                        is_global: true,
                    });
                    self.elements.insert(qname, id);
                    self.set
                        .schema_mut(&ctx.target_namespace)
                        .element_decls
                        .insert(name.to_string(), id);
                }
                xsd_elements::ATTRIBUTE => {
                    let name = required_name(child, ctx)?;
                    let qname = ctx.qname(name);
                    if self.attributes.contains_key(&qname) {
                        return Err(ctx.error(format!("Duplicate attribute declaration '{}'", qname)));
                    }
                    let id = self.set.add_attribute(AttributeDecl {
                        name: name.to_string(),
                        target_namespace: ctx.target_namespace.clone(),
                        type_id: any_type,
                        default_value: None,
                        fixed_value: None,
                        is_global: true,
                    });
                    self.attributes.insert(qname, id);
                    self.set
                        .schema_mut(&ctx.target_namespace)
                        .attribute_decls
                        .insert(name.to_string(), id);
                }
                local @ (xsd_elements::COMPLEX_TYPE | xsd_elements::SIMPLE_TYPE) => {
                    let name = required_name(child, ctx)?;
                    let qname = ctx.qname(name);
                    if self.types.contains_key(&qname) {
                        return Err(ctx.error(format!("Duplicate type definition '{}'", qname)));
                    }
                    // Placeholder with the right kind, filled in by parse_globals
                    let kind = if local == xsd_elements::COMPLEX_TYPE {
                        XsdTypeKind::Complex(ComplexTypeDef::empty(None))
                    } else {
                        XsdTypeKind::Simple(SimpleTypeDef::restriction(FacetSet::new()))
                    };
                    let id = self.new_type(Some(name.to_string()), ctx, kind);
                    self.types.insert(qname, id);
                    self.set
                        .schema_mut(&ctx.target_namespace)
                        .type_defs
                        .insert(name.to_string(), id);
                }
                xsd_elements::GROUP => {
                    let name = required_name(child, ctx)?;
                    let qname = ctx.qname(name);
                    if self.groups.contains_key(&qname) {
                        return Err(ctx.error(format!("Duplicate group definition '{}'", qname)));
                    }
                    self.groups.insert(qname, (child.clone(), ctx.clone()));
                }
                xsd_elements::ATTRIBUTE_GROUP => {
                    let name = required_name(child, ctx)?;
                    let qname = ctx.qname(name);
                    if self.attribute_groups.contains_key(&qname) {
                        return Err(ctx.error(format!(
                            "Duplicate attribute group definition '{}'",
                            qname
                        )));
                    }
                    self.attribute_groups
                        .insert(qname, (child.clone(), ctx.clone()));
                }
                xsd_elements::NOTATION => trace!("ignoring notation declaration"),
                xsd_elements::INCLUDE | xsd_elements::IMPORT | xsd_elements::ANNOTATION => {}
                other => {
                    return Err(ctx.error(format!("Unknown schema child element: {}", other)));
                }
            }
        }

        Ok(())
    }

    fn parse_globals(&mut self, doc: &SchemaDocument) -> Result<()> {
        let ctx = &doc.ctx;

        for child in &doc.root.children {
            match child.local_name() {
                xsd_elements::ELEMENT => {
                    let qname = ctx.qname(required_name(child, ctx)?);
                    let id = self.elements.get(&qname).copied().ok_or_else(|| {
                        ctx.error(format!("Element '{}' was not declared", qname))
                    })?;
                    self.parse_element_body(child, ctx, id)?;
                }
                xsd_elements::ATTRIBUTE => {
                    let qname = ctx.qname(required_name(child, ctx)?);
                    let id = self.attributes.get(&qname).copied().ok_or_else(|| {
                        ctx.error(format!("Attribute '{}' was not declared", qname))
                    })?;
                    self.parse_attribute_body(child, ctx, id)?;
                }
                xsd_elements::COMPLEX_TYPE => {
                    let id = self.declared_type(child, ctx)?;
                    self.parse_complex_type(child, ctx, id, None)?;
                }
                xsd_elements::SIMPLE_TYPE => {
                    let id = self.declared_type(child, ctx)?;
                    self.parse_simple_type(child, ctx, id)?;
                }
                _ => {}
            }
        }

        Ok(())
    }

    fn declared_type(&self, elem: &Element, ctx: &DocContext) -> Result<TypeId> {
        let qname = ctx.qname(required_name(elem, ctx)?);
        self.types
            .get(&qname)
            .copied()
            .ok_or_else(|| ctx.error(format!("Type '{}' was not declared", qname)))
    }

    fn new_type(&mut self, name: Option<String>, ctx: &DocContext, kind: XsdTypeKind) -> TypeId {
        let base = self.set.any_type();
        self.set.add_type(XsdType {
            name,
            target_namespace: ctx.target_namespace.clone(),
            base,
            kind,
        })
    }

    fn resolve_type(&self, elem: &Element, ctx: &DocContext, reference: &str) -> Result<TypeId> {
        let qname = ctx.resolve(elem, reference)?;
        self.types
            .get(&qname)
            .copied()
            .ok_or_else(|| ctx.error(format!("Unknown type reference '{}'", qname)))
    }

    fn resolve_simple_type(&self, elem: &Element, ctx: &DocContext, reference: &str) -> Result<TypeId> {
        let id = self.resolve_type(elem, ctx, reference)?;
        if !self.set.type_def(id).is_simple() {
            return Err(ctx.error(format!(
                "<xs:{}> requires a simple type, '{}' is complex",
                elem.local_name(),
                reference
            )));
        }
        Ok(id)
    }

    fn any_simple_type(&self) -> Result<TypeId> {
        self.types
            .get(&QName::namespaced(XSD_NAMESPACE, XSD_ANY_SIMPLE_TYPE))
            .copied()
            .ok_or_else(|| Error::Parse(ParseError::new("Built-in anySimpleType is missing")))
    }

    fn parse_element_body(&mut self, elem: &Element, ctx: &DocContext, id: ElementId) -> Result<()> {
        let type_id = match elem.get_attribute(xsd_attrs::TYPE) {
            Some(reference) => self.resolve_type(elem, ctx, reference)?,
            None => match inline_type(elem) {
                Some(child) if child.local_name() == xsd_elements::COMPLEX_TYPE => {
                    let type_id = self.new_type(
                        None,
                        ctx,
                        XsdTypeKind::Complex(ComplexTypeDef::empty(Some(id))),
                    );
                    self.parse_complex_type(child, ctx, type_id, Some(id))?;
                    type_id
                }
                Some(child) => self.anonymous_simple_type(child, ctx)?,
                None => self.set.any_type(),
            },
        };

        let default_value = elem.get_attribute(xsd_attrs::DEFAULT).map(str::to_string);
        let fixed_value = elem.get_attribute(xsd_attrs::FIXED).map(str::to_string);
        if default_value.is_some() && fixed_value.is_some() {
            return Err(ctx.error(format!(
                "Element '{}' cannot have both 'default' and 'fixed'",
                self.set.element(id).name
            )));
        }
        let nillable = parse_bool(elem, xsd_attrs::NILLABLE, ctx)?;

        let decl = &mut self.set.elements[id.0];
        decl.type_id = type_id;
        decl.default_value = default_value;
        decl.fixed_value = fixed_value;
        decl.nillable = nillable;
        Ok(())
    }

    fn parse_attribute_body(&mut self, elem: &Element, ctx: &DocContext, id: AttributeId) -> Result<()> {
        let type_id = match elem.get_attribute(xsd_attrs::TYPE) {
            Some(reference) => self.resolve_simple_type(elem, ctx, reference)?,
            None => match elem.find_child(xsd_elements::SIMPLE_TYPE) {
                Some(child) => self.anonymous_simple_type(child, ctx)?,
                None => self.any_simple_type()?,
            },
        };

        let default_value = elem.get_attribute(xsd_attrs::DEFAULT).map(str::to_string);
        let fixed_value = elem.get_attribute(xsd_attrs::FIXED).map(str::to_string);
        if default_value.is_some() && fixed_value.is_some() {
            return Err(ctx.error(format!(
                "Attribute '{}' cannot have both 'default' and 'fixed'",
                self.set.attribute(id).name
            )));
        }

        let decl = &mut self.set.attributes[id.0];
        decl.type_id = type_id;
        decl.default_value = default_value;
        decl.fixed_value = fixed_value;
        Ok(())
    }

    fn anonymous_simple_type(&mut self, elem: &Element, ctx: &DocContext) -> Result<TypeId> {
        let id = self.new_type(
            None,
            ctx,
            XsdTypeKind::Simple(SimpleTypeDef::restriction(FacetSet::new())),
        );
        self.parse_simple_type(elem, ctx, id)?;
        Ok(id)
    }

    fn parse_simple_type(&mut self, elem: &Element, ctx: &DocContext, id: TypeId) -> Result<()> {
        let derivation = first_component(elem).ok_or_else(|| {
            ctx.error("xs:simpleType requires a restriction, list or union")
        })?;

        let (base, def) = match derivation.local_name() {
            xsd_elements::RESTRICTION => {
                let base = match derivation.get_attribute(xsd_attrs::BASE) {
                    Some(reference) => self.resolve_simple_type(derivation, ctx, reference)?,
                    None => match derivation.find_child(xsd_elements::SIMPLE_TYPE) {
                        Some(inline) => self.anonymous_simple_type(inline, ctx)?,
                        None => {
                            return Err(ctx.error("xs:restriction requires a 'base' attribute or a simple type"));
                        }
                    },
                };
                (base, SimpleTypeDef::restriction(parse_facets(derivation, ctx)?))
            }
            xsd_elements::LIST => {
                let item_type = match derivation.get_attribute(xsd_attrs::ITEM_TYPE) {
                    Some(reference) => self.resolve_simple_type(derivation, ctx, reference)?,
                    None => match derivation.find_child(xsd_elements::SIMPLE_TYPE) {
                        Some(inline) => self.anonymous_simple_type(inline, ctx)?,
                        None => {
                            return Err(ctx.error("xs:list requires an 'itemType' attribute or a simple type"));
                        }
                    },
                };
                (
                    self.any_simple_type()?,
                    SimpleTypeDef {
                        variety: SimpleVariety::List { item_type },
                        facets: FacetSet::new(),
                    },
                )
            }
            xsd_elements::UNION => {
                let mut member_types = Vec::new();
                if let Some(members) = derivation.get_attribute(xsd_attrs::MEMBER_TYPES) {
                    for reference in members.split_whitespace() {
                        member_types.push(self.resolve_simple_type(derivation, ctx, reference)?);
                    }
                }
                for inline in derivation.find_children(xsd_elements::SIMPLE_TYPE) {
                    member_types.push(self.anonymous_simple_type(inline, ctx)?);
                }
                if member_types.is_empty() {
                    return Err(ctx.error("xs:union requires at least one member type"));
                }
                (
                    self.any_simple_type()?,
                    SimpleTypeDef {
                        variety: SimpleVariety::Union { member_types },
                        facets: FacetSet::new(),
                    },
                )
            }
            other => {
                return Err(ctx.error(format!("Unexpected <xs:{}> in xs:simpleType", other)));
            }
        };

        let xsd_type = &mut self.set.types[id.0];
        xsd_type.base = base;
        xsd_type.kind = XsdTypeKind::Simple(def);
        Ok(())
    }

    fn parse_complex_type(
        &mut self,
        elem: &Element,
        ctx: &DocContext,
        id: TypeId,
        scope: Option<ElementId>,
    ) -> Result<()> {
        let mut def = ComplexTypeDef::empty(scope);
        def.mixed = parse_bool(elem, xsd_attrs::MIXED, ctx)?;
        let mut base = self.set.any_type();

        let content_elem = elem.children.iter().find(|c| {
            matches!(
                c.local_name(),
                xsd_elements::SIMPLE_CONTENT | xsd_elements::COMPLEX_CONTENT
            )
        });

        match content_elem {
            Some(content_elem) => {
                let derivation_elem = first_component(content_elem).ok_or_else(|| {
                    ctx.error(format!(
                        "xs:{} requires an extension or restriction",
                        content_elem.local_name()
                    ))
                })?;
                def.derivation = match derivation_elem.local_name() {
                    xsd_elements::EXTENSION => Derivation::Extension,
                    xsd_elements::RESTRICTION => Derivation::Restriction,
                    other => {
                        return Err(ctx.error(format!(
                            "Unexpected <xs:{}> in xs:{}",
                            other,
                            content_elem.local_name()
                        )));
                    }
                };
                let reference = derivation_elem.get_attribute(xsd_attrs::BASE).ok_or_else(|| {
                    ctx.error(format!(
                        "xs:{} requires a 'base' attribute",
                        derivation_elem.local_name()
                    ))
                })?;
                base = self.resolve_type(derivation_elem, ctx, reference)?;
                let base_is_complex = self.set.type_def(base).is_complex();

                if content_elem.local_name() == xsd_elements::SIMPLE_CONTENT {
                    if base_is_complex {
                        self.pending.push((id, PendingContent::SimpleFromBase));
                    } else if def.derivation == Derivation::Extension {
                        def.content = ContentType::Simple(base);
                    } else {
                        return Err(ctx.error(format!(
                            "simpleContent restriction requires a complex base, '{}' is simple",
                            reference
                        )));
                    }
                } else {
                    if !base_is_complex {
                        return Err(ctx.error(format!(
                            "complexContent base '{}' must be a complex type",
                            reference
                        )));
                    }
                    if content_elem.get_attribute(xsd_attrs::MIXED).is_some() {
                        def.mixed = parse_bool(content_elem, xsd_attrs::MIXED, ctx)?;
                    }
                    let own = self.parse_content(derivation_elem, ctx)?;
                    if def.derivation == Derivation::Extension {
                        def.explicit_content = Some(own.clone());
                        self.pending.push((id, PendingContent::Extension));
                    }
                    def.content = own;
                }

                self.parse_attribute_uses(derivation_elem, ctx, &mut def.attribute_uses)?;
            }
            None => {
                def.content = self.parse_content(elem, ctx)?;
                self.parse_attribute_uses(elem, ctx, &mut def.attribute_uses)?;
            }
        }

        let xsd_type = &mut self.set.types[id.0];
        xsd_type.base = base;
        xsd_type.kind = XsdTypeKind::Complex(def);
        Ok(())
    }

    fn parse_content(&mut self, elem: &Element, ctx: &DocContext) -> Result<ContentType> {
        for child in &elem.children {
            match child.local_name() {
                xsd_elements::SEQUENCE | xsd_elements::CHOICE | xsd_elements::ALL => {
                    return Ok(ContentType::Particle(self.parse_model_group(child, ctx)?));
                }
                xsd_elements::GROUP => {
                    return Ok(ContentType::Particle(self.parse_group_ref(child, ctx)?));
                }
                _ => {}
            }
        }
        Ok(ContentType::Empty)
    }

    fn parse_model_group(&mut self, elem: &Element, ctx: &DocContext) -> Result<Particle> {
        let model = ModelType::from_tag(elem.local_name()).ok_or_else(|| {
            ctx.error(format!("<xs:{}> is not a model group", elem.local_name()))
        })?;
        let occurs = parse_occurs(elem, ctx)?;
        let mut group = ModelGroup::new(model);

        for child in &elem.children {
            let particle = match child.local_name() {
                xsd_elements::ELEMENT => self.parse_local_element(child, ctx)?,
                xsd_elements::SEQUENCE | xsd_elements::CHOICE | xsd_elements::ALL => {
                    self.parse_model_group(child, ctx)?
                }
                xsd_elements::GROUP => self.parse_group_ref(child, ctx)?,
                xsd_elements::ANY => Particle::new(parse_occurs(child, ctx)?, Term::Wildcard),
                xsd_elements::ANNOTATION => continue,
                other => {
                    return Err(ctx.error(format!("Unexpected <xs:{}> in xs:{}", other, model)));
                }
            };
            group.particles.push(particle);
        }

        Ok(Particle::new(occurs, Term::ModelGroup(group)))
    }

    fn parse_group_ref(&mut self, elem: &Element, ctx: &DocContext) -> Result<Particle> {
        let reference = elem
            .get_attribute(xsd_attrs::REF)
            .ok_or_else(|| ctx.error("Local xs:group requires a 'ref' attribute"))?;
        let qname = ctx.resolve(elem, reference)?;
        if self.expanding.contains(&qname) {
            return Err(ctx.error(format!("Circular group reference '{}'", qname)));
        }
        let (definition, def_ctx) = self
            .groups
            .get(&qname)
            .cloned()
            .ok_or_else(|| ctx.error(format!("Unknown group reference '{}'", qname)))?;
        let occurs = parse_occurs(elem, ctx)?;

        let model_elem = definition
            .children
            .iter()
            .find(|c| ModelType::from_tag(c.local_name()).is_some())
            .ok_or_else(|| def_ctx.error(format!("Group '{}' has no model group", qname)))?;

        self.expanding.push(qname);
        let result = self.parse_model_group(model_elem, &def_ctx);
        self.expanding.pop();

        Ok(Particle::new(occurs, result?.term))
    }

    fn parse_local_element(&mut self, elem: &Element, ctx: &DocContext) -> Result<Particle> {
        let occurs = parse_occurs(elem, ctx)?;

        if let Some(reference) = elem.get_attribute(xsd_attrs::REF) {
            let qname = ctx.resolve(elem, reference)?;
            let id = self
                .elements
                .get(&qname)
                .copied()
                .ok_or_else(|| ctx.error(format!("Unknown element reference '{}'", qname)))?;
            return Ok(Particle::new(occurs, Term::Element(id)));
        }

        let name = required_name(elem, ctx)?;
        let qualified = match elem.get_attribute(xsd_attrs::FORM) {
            Some(form) => form == "qualified",
            None => ctx.elements_qualified,
        };
        let id = self.set.add_element(ElementDecl {
            name: name.to_string(),
            target_namespace: if qualified {
                ctx.target_namespace.clone()
            } else {
                String::new()
            },
            type_id: self.set.any_type(),
            default_value: None,
            fixed_value: None,
            nillable: false,
            is_global: false,
        });
        self.parse_element_body(elem, ctx, id)?;

        Ok(Particle::new(occurs, Term::Element(id)))
    }

    fn parse_attribute_uses(
        &mut self,
        elem: &Element,
        ctx: &DocContext,
        uses: &mut Vec<AttributeUse>,
    ) -> Result<()> {
        for child in &elem.children {
            match child.local_name() {
                xsd_elements::ATTRIBUTE => {
                    if let Some(attr_use) = self.parse_attribute_use(child, ctx)? {
                        uses.push(attr_use);
                    }
                }
                xsd_elements::ATTRIBUTE_GROUP => {
                    self.expand_attribute_group(child, ctx, uses)?;
                }
                xsd_elements::ANY_ATTRIBUTE => trace!("ignoring xs:anyAttribute"),
                _ => {}
            }
        }
        Ok(())
    }

    fn parse_attribute_use(&mut self, elem: &Element, ctx: &DocContext) -> Result<Option<AttributeUse>> {
        let required = match elem.get_attribute(xsd_attrs::USE).unwrap_or("optional") {
            "optional" => false,
            "required" => true,
            "prohibited" => return Ok(None),
            other => {
                return Err(ctx.error(format!("Invalid attribute use '{}'", other)));
            }
        };

        let decl = match elem.get_attribute(xsd_attrs::REF) {
            Some(reference) => {
                let qname = ctx.resolve(elem, reference)?;
                self.attributes.get(&qname).copied().ok_or_else(|| {
                    ctx.error(format!("Unknown attribute reference '{}'", qname))
                })?
            }
            None => {
                let name = required_name(elem, ctx)?;
                let qualified = match elem.get_attribute(xsd_attrs::FORM) {
                    Some(form) => form == "qualified",
                    None => ctx.attributes_qualified,
                };
                let id = self.set.add_attribute(AttributeDecl {
                    name: name.to_string(),
                    target_namespace: if qualified {
                        ctx.target_namespace.clone()
                    } else {
                        String::new()
                    },
                    type_id: self.set.any_type(),
                    default_value: None,
                    fixed_value: None,
                    is_global: false,
                });
                self.parse_attribute_body(elem, ctx, id)?;
                id
            }
        };

        Ok(Some(AttributeUse { decl, required }))
    }

    fn expand_attribute_group(
        &mut self,
        elem: &Element,
        ctx: &DocContext,
        uses: &mut Vec<AttributeUse>,
    ) -> Result<()> {
        let reference = elem
            .get_attribute(xsd_attrs::REF)
            .ok_or_else(|| ctx.error("Local xs:attributeGroup requires a 'ref' attribute"))?;
        let qname = ctx.resolve(elem, reference)?;
        if self.expanding.contains(&qname) {
            return Err(ctx.error(format!("Circular attribute group reference '{}'", qname)));
        }
        let (definition, def_ctx) = self
            .attribute_groups
            .get(&qname)
            .cloned()
            .ok_or_else(|| ctx.error(format!("Unknown attribute group reference '{}'", qname)))?;

        self.expanding.push(qname);
        let result = self.parse_attribute_uses(&definition, &def_ctx, uses);
        self.expanding.pop();
        result
    }

    fn check_base_cycles(&self) -> Result<()> {
        for (index, xsd_type) in self.set.types.iter().enumerate() {
            let mut seen = HashSet::new();
            let mut current = TypeId(index);
            loop {
                let base = self.set.type_def(current).base;
                if base == current {
                    break;
                }
                if !seen.insert(current) {
                    return Err(ParseError::new(format!(
                        "Circular base type derivation of '{}'",
                        xsd_type.display_name()
                    ))
                    .into());
                }
                current = base;
            }
        }
        Ok(())
    }

    fn base_depth(&self, id: TypeId) -> usize {
        let mut depth = 0;
        let mut current = id;
        loop {
            let base = self.set.type_def(current).base;
            if base == current {
                return depth;
            }
            depth += 1;
            current = base;
        }
    }

    fn merge_derived_content(&mut self) -> Result<()> {
        let mut pending = std::mem::take(&mut self.pending);
        // Bases first, so inherited content is already merged
        pending.sort_by_key(|(id, _)| self.base_depth(*id));

        let any_type = self.set.any_type();
        for (id, kind) in pending {
            let base = self.set.type_def(id).base;
            let base_content = self
                .set
                .type_def(base)
                .as_complex()
                .map(|def| def.content.clone())
                .unwrap_or(ContentType::Empty);
            let name = self.set.type_def(id).display_name().to_string();

            let XsdTypeKind::Complex(def) = &mut self.set.types[id.0].kind else {
                continue;
            };
            match kind {
                PendingContent::Extension => {
                    if base == any_type {
                        continue;
                    }
                    let own = def.explicit_content.clone().unwrap_or(ContentType::Empty);
                    def.content = merge_content(base_content, own);
                }
                PendingContent::SimpleFromBase => match base_content {
                    ContentType::Simple(simple) => def.content = ContentType::Simple(simple),
                    _ => {
                        return Err(ParseError::new(format!(
                            "simpleContent of '{}' derives from a type without simple content",
                            name
                        ))
                        .into());
                    }
                },
            }
        }
        Ok(())
    }
}

/// Content of an extension: the base content followed by the added content
fn merge_content(base: ContentType, own: ContentType) -> ContentType {
    match (base, own) {
        (ContentType::Particle(base), ContentType::Particle(own)) => {
            let mut group = ModelGroup::new(ModelType::Sequence);
            group.particles.push(base);
            group.particles.push(own);
            ContentType::Particle(Particle::new(Occurs::once(), Term::ModelGroup(group)))
        }
        (base, ContentType::Empty) => base,
        (_, own) => own,
    }
}

fn required_name<'e>(elem: &'e Element, ctx: &DocContext) -> Result<&'e str> {
    let name = elem.get_attribute(xsd_attrs::NAME).ok_or_else(|| {
        ctx.error(format!("<xs:{}> missing 'name' attribute", elem.local_name()))
    })?;
    validate_ncname(name)?;
    Ok(name)
}

fn parse_occurs(elem: &Element, ctx: &DocContext) -> Result<Occurs> {
    Occurs::parse(
        elem.get_attribute(xsd_attrs::MIN_OCCURS),
        elem.get_attribute(xsd_attrs::MAX_OCCURS),
    )
    .map_err(|e| match e {
        Error::Parse(pe) => Error::Parse(pe.with_location(ctx.location.clone())),
        other => other,
    })
}

fn parse_bool(elem: &Element, attr: &str, ctx: &DocContext) -> Result<bool> {
    match elem.get_attribute(attr).map(str::trim) {
        None | Some("false") | Some("0") => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some(other) => Err(ctx.error(format!("Invalid boolean '{}' for '{}'", other, attr))),
    }
}

fn parse_facets(restriction: &Element, ctx: &DocContext) -> Result<FacetSet> {
    let mut facets = FacetSet::new();
    for child in &restriction.children {
        let local = child.local_name();
        if FACETS.contains(&local) {
            let value = child.get_attribute(xsd_attrs::VALUE).ok_or_else(|| {
                ctx.error(format!("Facet xs:{} missing 'value' attribute", local))
            })?;
            facets.push(local, value);
        } else if local != xsd_elements::SIMPLE_TYPE && local != xsd_elements::ANNOTATION {
            return Err(ctx.error(format!("Unknown facet xs:{}", local)));
        }
    }
    Ok(facets)
}

/// First child that is not an annotation
fn first_component(elem: &Element) -> Option<&Element> {
    elem.children
        .iter()
        .find(|c| c.local_name() != xsd_elements::ANNOTATION)
}

fn inline_type(elem: &Element) -> Option<&Element> {
    elem.children.iter().find(|c| {
        matches!(
            c.local_name(),
            xsd_elements::COMPLEX_TYPE | xsd_elements::SIMPLE_TYPE
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const NOTE_XSD: &str = r#"<?xml version="1.0"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
           xmlns:nxs="urn:note"
           targetNamespace="urn:note">
  <xs:element name="note" type="nxs:noteType"/>
  <xs:element name="title">
    <xs:simpleType>
      <xs:restriction base="xs:string">
        <xs:maxLength value="255"/>
      </xs:restriction>
    </xs:simpleType>
  </xs:element>
  <xs:attribute name="lang" type="xs:language" default="en"/>
  <xs:complexType name="noteType">
    <xs:sequence>
      <xs:element name="to" type="xs:string"/>
      <xs:element name="tags" type="xs:string" minOccurs="0" maxOccurs="unbounded"/>
      <xs:element name="parent" type="nxs:noteType" minOccurs="0"/>
    </xs:sequence>
    <xs:attribute name="id" type="xs:ID" use="required"/>
  </xs:complexType>
</xs:schema>"#;

    fn note_set() -> SchemaSet {
        SchemaSet::from_string(NOTE_XSD).unwrap()
    }

    #[test]
    fn test_parse_globals_in_order() {
        let set = note_set();
        let schema = set.schema("urn:note").unwrap();
        let names: Vec<_> = schema.element_decls.keys().cloned().collect();
        assert_eq!(names, vec!["note", "title"]);
        assert!(schema.attribute_decls.contains_key("lang"));
        assert!(schema.type_defs.contains_key("noteType"));
    }

    #[test]
    fn test_forward_type_reference() {
        let set = note_set();
        let schema = set.schema("urn:note").unwrap();
        let note = set.element(schema.element_decls["note"]);
        assert_eq!(note.type_id, schema.type_defs["noteType"]);
    }

    #[test]
    fn test_anonymous_simple_type_facets() {
        let set = note_set();
        let schema = set.schema("urn:note").unwrap();
        let title = set.element(schema.element_decls["title"]);
        let title_type = set.type_def(title.type_id);
        assert!(title_type.is_local());

        let facets = &title_type.as_simple().unwrap().facets;
        assert_eq!(facets.facet("maxLength").map(|f| f.value.as_str()), Some("255"));
        assert_eq!(title_type.base, set.find_type(XSD_NAMESPACE, "string").unwrap());
    }

    #[test]
    fn test_complex_content_particles() {
        let set = note_set();
        let schema = set.schema("urn:note").unwrap();
        let note_type = set.type_def(schema.type_defs["noteType"]);
        let def = note_type.as_complex().unwrap();
        assert!(def.explicit_content.is_none());

        let particle = def.content.as_particle().unwrap();
        let group = particle.term.as_model_group().unwrap();
        assert_eq!(group.model, ModelType::Sequence);
        assert_eq!(group.children().len(), 3);

        let tags = &group.children()[1];
        assert_eq!(tags.occurs, Occurs::zero_or_more());
        let parent = set.element(group.children()[2].term.as_element_decl().unwrap());
        assert_eq!(parent.type_id, schema.type_defs["noteType"]);
        assert!(!parent.is_global);

        assert_eq!(def.attribute_uses.len(), 1);
        assert!(def.attribute_uses[0].required);
    }

    #[test]
    fn test_attribute_default() {
        let set = note_set();
        let schema = set.schema("urn:note").unwrap();
        let lang = set.attribute(schema.attribute_decls["lang"]);
        assert_eq!(lang.default_value.as_deref(), Some("en"));
        assert!(set.type_def(lang.type_id).is_simple());
    }

    #[test]
    fn test_element_without_type_is_any_type() {
        let set = SchemaSet::from_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:t">
                 <xs:element name="anything"/>
               </xs:schema>"#,
        )
        .unwrap();
        let schema = set.schema("urn:t").unwrap();
        assert_eq!(set.element(schema.element_decls["anything"]).type_id, set.any_type());
    }

    #[test]
    fn test_extension_merges_base_content() {
        let set = SchemaSet::from_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                          xmlns:t="urn:t" targetNamespace="urn:t">
                 <xs:complexType name="derived">
                   <xs:complexContent>
                     <xs:extension base="t:base">
                       <xs:sequence><xs:element name="extra" type="xs:int"/></xs:sequence>
                     </xs:extension>
                   </xs:complexContent>
                 </xs:complexType>
                 <xs:complexType name="base">
                   <xs:sequence><xs:element name="id" type="xs:string"/></xs:sequence>
                   <xs:attribute name="version" type="xs:int"/>
                 </xs:complexType>
               </xs:schema>"#,
        )
        .unwrap();
        let schema = set.schema("urn:t").unwrap();
        let derived_id = schema.type_defs["derived"];
        let derived = set.type_def(derived_id);
        assert_eq!(derived.base, schema.type_defs["base"]);

        let def = derived.as_complex().unwrap();
        assert_eq!(def.derivation, Derivation::Extension);
        let explicit = def.explicit_content.as_ref().unwrap().as_particle().unwrap();
        assert_eq!(explicit.term.as_model_group().unwrap().children().len(), 1);

        let full = def.content.as_particle().unwrap();
        assert_eq!(full.term.as_model_group().unwrap().children().len(), 2);

        // Inherited attribute uses come through the base chain
        assert!(def.attribute_uses.is_empty());
        assert_eq!(set.attribute_uses(derived_id).len(), 1);
    }

    #[test]
    fn test_simple_content_extension() {
        let set = SchemaSet::from_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:t">
                 <xs:complexType name="price">
                   <xs:simpleContent>
                     <xs:extension base="xs:decimal">
                       <xs:attribute name="currency" type="xs:string"/>
                     </xs:extension>
                   </xs:simpleContent>
                 </xs:complexType>
               </xs:schema>"#,
        )
        .unwrap();
        let schema = set.schema("urn:t").unwrap();
        let def = set.type_def(schema.type_defs["price"]).as_complex().unwrap();
        assert!(matches!(def.content, ContentType::Simple(_)));
        assert!(def.explicit_content.is_none());
        assert_eq!(def.attribute_uses.len(), 1);
    }

    #[test]
    fn test_group_and_attribute_group_refs() {
        let set = SchemaSet::from_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                          xmlns:t="urn:t" targetNamespace="urn:t">
                 <xs:complexType name="person">
                   <xs:group ref="t:names"/>
                   <xs:attributeGroup ref="t:common"/>
                 </xs:complexType>
                 <xs:group name="names">
                   <xs:choice>
                     <xs:element name="first" type="xs:string"/>
                     <xs:element name="last" type="xs:string"/>
                   </xs:choice>
                 </xs:group>
                 <xs:attributeGroup name="common">
                   <xs:attribute name="id" type="xs:ID"/>
                   <xs:attribute name="hidden" type="xs:boolean" use="prohibited"/>
                 </xs:attributeGroup>
               </xs:schema>"#,
        )
        .unwrap();
        let schema = set.schema("urn:t").unwrap();
        let def = set.type_def(schema.type_defs["person"]).as_complex().unwrap();
        let group = def.content.as_particle().unwrap().term.as_model_group().unwrap();
        assert_eq!(group.model, ModelType::Choice);
        assert_eq!(group.children().len(), 2);
        assert_eq!(def.attribute_uses.len(), 1);
    }

    #[test]
    fn test_list_and_union_types() {
        let set = SchemaSet::from_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                          xmlns:t="urn:t" targetNamespace="urn:t">
                 <xs:simpleType name="codes">
                   <xs:list itemType="t:code"/>
                 </xs:simpleType>
                 <xs:simpleType name="code">
                   <xs:restriction base="xs:string">
                     <xs:enumeration value="A"/>
                     <xs:enumeration value="B"/>
                   </xs:restriction>
                 </xs:simpleType>
                 <xs:simpleType name="either">
                   <xs:union memberTypes="xs:int t:code"/>
                 </xs:simpleType>
               </xs:schema>"#,
        )
        .unwrap();
        let schema = set.schema("urn:t").unwrap();
        let codes = set.type_def(schema.type_defs["codes"]).as_simple().unwrap();
        assert_eq!(codes.item_type(), Some(schema.type_defs["code"]));

        let either = set.type_def(schema.type_defs["either"]).as_simple().unwrap();
        assert!(matches!(&either.variety, SimpleVariety::Union { member_types } if member_types.len() == 2));
    }

    #[test]
    fn test_unknown_type_reference_fails() {
        let result = SchemaSet::from_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:t">
                 <xs:element name="broken" type="missingType"/>
               </xs:schema>"#,
        );
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_duplicate_declaration_fails() {
        let result = SchemaSet::from_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:t">
                 <xs:element name="twice" type="xs:string"/>
                 <xs:element name="twice" type="xs:int"/>
               </xs:schema>"#,
        );
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_invalid_name_fails() {
        let result = SchemaSet::from_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:t">
                 <xs:element name="1bad" type="xs:string"/>
               </xs:schema>"#,
        );
        assert!(matches!(result, Err(Error::Name(_))));
    }

    #[test]
    fn test_circular_base_fails() {
        let result = SchemaSet::from_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                          xmlns:t="urn:t" targetNamespace="urn:t">
                 <xs:complexType name="a">
                   <xs:complexContent><xs:extension base="t:b"/></xs:complexContent>
                 </xs:complexType>
                 <xs:complexType name="b">
                   <xs:complexContent><xs:extension base="t:a"/></xs:complexContent>
                 </xs:complexType>
               </xs:schema>"#,
        );
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_circular_group_fails() {
        let result = SchemaSet::from_string(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                          xmlns:t="urn:t" targetNamespace="urn:t">
                 <xs:group name="loop">
                   <xs:sequence><xs:group ref="t:loop"/></xs:sequence>
                 </xs:group>
                 <xs:complexType name="user"><xs:group ref="t:loop"/></xs:complexType>
               </xs:schema>"#,
        );
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_non_schema_root_fails() {
        let result = SchemaSet::from_string("<root/>");
        assert!(matches!(result, Err(Error::Parse(_))));
    }

    #[test]
    fn test_chameleon_include() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("common.xsd"),
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema">
                 <xs:simpleType name="code">
                   <xs:restriction base="xs:string"><xs:maxLength value="8"/></xs:restriction>
                 </xs:simpleType>
                 <xs:element name="shared" type="code"/>
               </xs:schema>"#,
        )
        .unwrap();
        let main = dir.path().join("main.xsd");
        fs::write(
            &main,
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                          xmlns:t="urn:t" targetNamespace="urn:t">
                 <xs:include schemaLocation="common.xsd"/>
                 <xs:element name="local" type="t:code"/>
               </xs:schema>"#,
        )
        .unwrap();

        let set = SchemaSet::from_file(&main).unwrap();
        let schema = set.schema("urn:t").unwrap();
        assert!(schema.type_defs.contains_key("code"));
        assert!(schema.element_decls.contains_key("shared"));
        assert_eq!(schema.locations.len(), 2);
        let shared = set.element(schema.element_decls["shared"]);
        assert_eq!(shared.type_id, schema.type_defs["code"]);
    }

    #[test]
    fn test_import_and_circular_include() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("types.xsd"),
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:types">
                 <xs:complexType name="address">
                   <xs:sequence><xs:element name="city" type="xs:string"/></xs:sequence>
                 </xs:complexType>
               </xs:schema>"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("part.xsd"),
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:main">
                 <xs:include schemaLocation="main.xsd"/>
               </xs:schema>"#,
        )
        .unwrap();
        let main = dir.path().join("main.xsd");
        fs::write(
            &main,
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema"
                          xmlns:ty="urn:types" targetNamespace="urn:main">
                 <xs:import namespace="urn:types" schemaLocation="types.xsd"/>
                 <xs:include schemaLocation="part.xsd"/>
                 <xs:element name="home" type="ty:address"/>
               </xs:schema>"#,
        )
        .unwrap();

        let set = SchemaSet::from_file(&main).unwrap();
        assert_eq!(set.schemas().len(), 3);
        let address = set.find_type("urn:types", "address").unwrap();
        let main_schema = set.schema("urn:main").unwrap();
        assert_eq!(set.element(main_schema.element_decls["home"]).type_id, address);
    }

    #[test]
    fn test_include_namespace_mismatch_fails() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("other.xsd"),
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:other"/>"#,
        )
        .unwrap();
        let main = dir.path().join("main.xsd");
        fs::write(
            &main,
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" targetNamespace="urn:main">
                 <xs:include schemaLocation="other.xsd"/>
               </xs:schema>"#,
        )
        .unwrap();

        assert!(matches!(SchemaSet::from_file(&main), Err(Error::Parse(_))));
    }

    #[test]
    fn test_component_limit() {
        let loader = Loader::new().with_limits(crate::limits::Limits {
            max_schema_components: 10,
            ..crate::limits::Limits::default()
        });
        let result = SchemaSet::parse(&Location::String(NOTE_XSD.to_string()), &loader);
        assert!(matches!(result, Err(Error::LimitExceeded(_))));
    }
}
