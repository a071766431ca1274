//! Parsed schema components
//!
//! Components reference each other through arena indices owned by the
//! [`SchemaSet`](super::SchemaSet): a type's base type, an element's type,
//! a particle's element declaration. This is what lets the model express
//! `anyType` being its own base and complex types that contain themselves.

use super::particles::Occurs;

/// Index of a type definition in its schema set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub(crate) usize);

/// Index of an element declaration in its schema set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub(crate) usize);

/// Index of an attribute declaration in its schema set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AttributeId(pub(crate) usize);

/// A simple or complex type definition
#[derive(Debug, Clone)]
pub struct XsdType {
    /// Declared name; `None` for anonymous types
    pub name: Option<String>,
    /// Target namespace of the defining schema (empty for none)
    pub target_namespace: String,
    /// Base type; `anyType` is its own base
    pub base: TypeId,
    /// Simple or complex definition
    pub kind: XsdTypeKind,
}

impl XsdType {
    /// Whether the type is locally scoped (anonymous)
    pub fn is_local(&self) -> bool {
        self.name.is_none()
    }

    /// Check if this is a simple type
    pub fn is_simple(&self) -> bool {
        matches!(self.kind, XsdTypeKind::Simple(_))
    }

    /// Check if this is a complex type
    pub fn is_complex(&self) -> bool {
        matches!(self.kind, XsdTypeKind::Complex(_))
    }

    /// Get as simple type
    pub fn as_simple(&self) -> Option<&SimpleTypeDef> {
        match &self.kind {
            XsdTypeKind::Simple(st) => Some(st),
            XsdTypeKind::Complex(_) => None,
        }
    }

    /// Get as complex type
    pub fn as_complex(&self) -> Option<&ComplexTypeDef> {
        match &self.kind {
            XsdTypeKind::Simple(_) => None,
            XsdTypeKind::Complex(ct) => Some(ct),
        }
    }

    /// Name for diagnostics
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<anonymous>")
    }
}

/// The two kinds of type definition
#[derive(Debug, Clone)]
pub enum XsdTypeKind {
    /// Simple type
    Simple(SimpleTypeDef),
    /// Complex type
    Complex(ComplexTypeDef),
}

/// Simple type variety
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SimpleVariety {
    /// Derived by restriction from its base type
    Atomic,
    /// Whitespace-separated list of an item type
    List {
        /// Item type
        item_type: TypeId,
    },
    /// Union of member types
    Union {
        /// Member types
        member_types: Vec<TypeId>,
    },
}

/// Simple type definition
#[derive(Debug, Clone)]
pub struct SimpleTypeDef {
    /// Variety of the type
    pub variety: SimpleVariety,
    /// Restriction facets in declaration order
    pub facets: FacetSet,
}

impl SimpleTypeDef {
    /// Simple type derived by restriction
    pub fn restriction(facets: FacetSet) -> Self {
        Self {
            variety: SimpleVariety::Atomic,
            facets,
        }
    }

    /// Whether the type derives from its base by restriction
    pub fn is_restriction(&self) -> bool {
        matches!(self.variety, SimpleVariety::Atomic)
    }

    /// Item type of a list type
    pub fn item_type(&self) -> Option<TypeId> {
        match self.variety {
            SimpleVariety::List { item_type } => Some(item_type),
            _ => None,
        }
    }
}

/// Complex type derivation method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Derivation {
    /// Restriction (the default for types without complexContent)
    #[default]
    Restriction,
    /// Extension
    Extension,
}

/// Complex type definition
#[derive(Debug, Clone)]
pub struct ComplexTypeDef {
    /// Element declaration an anonymous type is defined in
    pub scope: Option<ElementId>,
    /// How the type derives from its base
    pub derivation: Derivation,
    /// Content added by an extension of a complex base, without the base's
    pub explicit_content: Option<ContentType>,
    /// Full content, including inherited content
    pub content: ContentType,
    /// Attribute uses declared on the type (attribute groups expanded)
    pub attribute_uses: Vec<AttributeUse>,
    /// Whether character data may appear between child elements
    pub mixed: bool,
}

impl ComplexTypeDef {
    pub(crate) fn empty(scope: Option<ElementId>) -> Self {
        Self {
            scope,
            derivation: Derivation::Restriction,
            explicit_content: None,
            content: ContentType::Empty,
            attribute_uses: Vec::new(),
            mixed: false,
        }
    }
}

/// Content of a complex type
#[derive(Debug, Clone)]
pub enum ContentType {
    /// No element content
    Empty,
    /// Character content of the given simple type
    Simple(TypeId),
    /// Element content
    Particle(Particle),
}

impl ContentType {
    /// Element content particle, if any
    pub fn as_particle(&self) -> Option<&Particle> {
        match self {
            ContentType::Particle(p) => Some(p),
            _ => None,
        }
    }
}

/// A term with occurrence bounds
#[derive(Debug, Clone)]
pub struct Particle {
    /// Occurrence bounds
    pub occurs: Occurs,
    /// What occurs
    pub term: Term,
}

impl Particle {
    /// Create a particle
    pub fn new(occurs: Occurs, term: Term) -> Self {
        Self { occurs, term }
    }

    /// Whether the particle may occur more than once
    pub fn is_repeated(&self) -> bool {
        self.occurs.is_multiple()
    }
}

/// Particle term
#[derive(Debug, Clone)]
pub enum Term {
    /// Element declaration (local, or a reference to a global one)
    Element(ElementId),
    /// Nested model group (inline, or a named group reference)
    ModelGroup(ModelGroup),
    /// Element wildcard (`xs:any`)
    Wildcard,
}

impl Term {
    /// Element declaration, if the term is one
    pub fn as_element_decl(&self) -> Option<ElementId> {
        match self {
            Term::Element(id) => Some(*id),
            _ => None,
        }
    }

    /// Model group, if the term is one
    pub fn as_model_group(&self) -> Option<&ModelGroup> {
        match self {
            Term::ModelGroup(mg) => Some(mg),
            _ => None,
        }
    }
}

/// Model group compositor type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModelType {
    /// Ordered sequence of particles
    #[default]
    Sequence,
    /// One of multiple alternatives
    Choice,
    /// Unordered set of particles
    All,
}

impl ModelType {
    /// Parse from element tag name
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "sequence" => Some(Self::Sequence),
            "choice" => Some(Self::Choice),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

impl std::fmt::Display for ModelType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sequence => write!(f, "sequence"),
            Self::Choice => write!(f, "choice"),
            Self::All => write!(f, "all"),
        }
    }
}

/// Model group: a compositor over child particles
#[derive(Debug, Clone, Default)]
pub struct ModelGroup {
    /// Compositor
    pub model: ModelType,
    /// Child particles in declaration order
    pub particles: Vec<Particle>,
}

impl ModelGroup {
    /// Create an empty group
    pub fn new(model: ModelType) -> Self {
        Self {
            model,
            particles: Vec::new(),
        }
    }

    /// Child particles
    pub fn children(&self) -> &[Particle] {
        &self.particles
    }
}

/// Element declaration
#[derive(Debug, Clone)]
pub struct ElementDecl {
    /// Element name
    pub name: String,
    /// Target namespace of the declaring schema
    pub target_namespace: String,
    /// Declared (or anonymous) type
    pub type_id: TypeId,
    /// Default value
    pub default_value: Option<String>,
    /// Fixed value
    pub fixed_value: Option<String>,
    /// Whether the element is nillable
    pub nillable: bool,
    /// Whether the declaration is top-level
    pub is_global: bool,
}

/// Attribute declaration
#[derive(Debug, Clone)]
pub struct AttributeDecl {
    /// Attribute name
    pub name: String,
    /// Target namespace of the declaring schema
    pub target_namespace: String,
    /// Declared (or anonymous) simple type
    pub type_id: TypeId,
    /// Default value
    pub default_value: Option<String>,
    /// Fixed value
    pub fixed_value: Option<String>,
    /// Whether the declaration is top-level
    pub is_global: bool,
}

/// Use of an attribute declaration by a complex type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AttributeUse {
    /// Declaration used
    pub decl: AttributeId,
    /// Whether the attribute is required
    pub required: bool,
}

/// A constraining facet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Facet {
    /// Facet name (`maxLength`, `enumeration`, ...)
    pub name: String,
    /// Facet value as written
    pub value: String,
}

/// Facets of a restriction, in declaration order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSet {
    facets: Vec<Facet>,
}

impl FacetSet {
    /// Create an empty facet set
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a facet
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.facets.push(Facet {
            name: name.into(),
            value: value.into(),
        });
    }

    /// First facet with the given name
    pub fn facet(&self, name: &str) -> Option<&Facet> {
        self.facets.iter().find(|f| f.name == name)
    }

    /// All facets with the given name, in declaration order
    pub fn facets<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Facet> + 'a {
        self.facets.iter().filter(move |f| f.name == name)
    }

    /// Whether the set is empty
    pub fn is_empty(&self) -> bool {
        self.facets.is_empty()
    }

    /// Number of facets
    pub fn len(&self) -> usize {
        self.facets.len()
    }
}
