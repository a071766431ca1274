//! Type model builder
//!
//! Resolves parsed type definitions to repository types. Every type is
//! looked up by name before it is built, and a complex type is registered
//! in the compilation's scope before its content is processed, so a content
//! model that refers back to the type being built resolves to that same
//! instance instead of recursing.

use super::fields::attribute_field;
use super::Diagnostic;
use crate::error::BindError;
use crate::names::anonymous_type_name;
use crate::registry::TypeScope;
use crate::types::{extract_constraints, ComplexType, ListType, PrimitiveType, SimpleType, Type};
use crate::xsd::builtins::XSD_NAMESPACE;
use crate::xsd::{
    ComplexTypeDef, ContentType, SchemaSet, SimpleTypeDef, SimpleVariety, Term, TypeId, XsdType,
    XsdTypeKind,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Builds the types of one compilation into its scope
pub(crate) struct TypeBuilder<'a> {
    pub(super) set: &'a SchemaSet,
    pub(super) scope: TypeScope<'a>,
    diagnostics: Vec<Diagnostic>,
}

impl<'a> TypeBuilder<'a> {
    pub(crate) fn new(set: &'a SchemaSet, scope: TypeScope<'a>) -> Self {
        Self {
            set,
            scope,
            diagnostics: Vec::new(),
        }
    }

    pub(super) fn schema_name(&self) -> &str {
        self.scope.schema_name()
    }

    /// Record a declaration that was left out of the model
    pub(crate) fn skip(&mut self, declaration: impl Into<String>, error: BindError) {
        let declaration = declaration.into();
        if error.is_recoverable() {
            warn!("skipping {}: {}", declaration, error);
        } else {
            warn!("skipping {}, its type could not be built: {}", declaration, error);
        }
        self.diagnostics.push(Diagnostic { declaration, error });
    }

    pub(crate) fn finish(self) -> (TypeScope<'a>, Vec<Diagnostic>) {
        (self.scope, self.diagnostics)
    }

    /// Resolve a type definition, building and registering it if needed
    ///
    /// `field_name` names the declaration using the type; anonymous simple
    /// types are named after it.
    pub(crate) fn load_type(&mut self, type_id: TypeId, field_name: &str) -> Result<Type, BindError> {
        let set = self.set;
        let xsd_type = set.type_def(type_id);
        let name = self.type_name(xsd_type, field_name)?;

        if let Some(found) = self.scope.lookup(&name) {
            return Ok(found);
        }
        if xsd_type.target_namespace == XSD_NAMESPACE {
            return PrimitiveType::from_xsd_name(&name)
                .map(Type::Primitive)
                .ok_or(BindError::UnknownPrimitive(name));
        }

        let loaded = match &xsd_type.kind {
            XsdTypeKind::Simple(def) => match def.variety {
                SimpleVariety::List { item_type } => self.load_list_type(xsd_type, item_type)?,
                _ => self.load_simple_type(type_id, name, def)?,
            },
            XsdTypeKind::Complex(def) => self.load_complex_type(type_id, &name, def)?,
        };
        self.scope.register(loaded.clone())?;
        Ok(loaded)
    }

    fn type_name(&self, xsd_type: &XsdType, field_name: &str) -> Result<String, BindError> {
        if let Some(name) = &xsd_type.name {
            return Ok(name.clone());
        }
        match &xsd_type.kind {
            XsdTypeKind::Complex(def) => def
                .scope
                .map(|element| anonymous_type_name(&self.set.element(element).name))
                .ok_or(BindError::UnnamedType),
            XsdTypeKind::Simple(_) if field_name.is_empty() => Err(BindError::UnnamedType),
            XsdTypeKind::Simple(_) => Ok(anonymous_type_name(field_name)),
        }
    }

    fn load_simple_type(
        &mut self,
        type_id: TypeId,
        name: String,
        def: &SimpleTypeDef,
    ) -> Result<Type, BindError> {
        let base = self.set.type_def(type_id).base;
        let super_type = if base == type_id {
            None
        } else {
            // An anonymous base is named after the type deriving from it
            match self.load_type(base, &name) {
                Ok(super_type @ (Type::Primitive(_) | Type::Simple(_))) => Some(super_type),
                Ok(other) => {
                    warn!("simple type {} cannot derive from {}, ignoring its base", name, other);
                    None
                }
                Err(err) => {
                    warn!("base of simple type {} not loaded: {}", name, err);
                    None
                }
            }
        };

        let constraints = if def.is_restriction() {
            extract_constraints(&def.facets)?
        } else {
            Vec::new()
        };
        Ok(SimpleType::new(name, self.schema_name(), super_type, constraints).into())
    }

    /// Build a list type; its item type must already be known
    fn load_list_type(&mut self, xsd_type: &XsdType, item_type: TypeId) -> Result<Type, BindError> {
        let name = xsd_type.name.clone().ok_or(BindError::UnnamedType)?;
        let item = self.set.type_def(item_type);
        let item_name = item.display_name();

        let resolved = if item.target_namespace == XSD_NAMESPACE {
            PrimitiveType::from_xsd_name(item_name).map(Type::Primitive)
        } else {
            self.scope.lookup(item_name)
        };
        let item = resolved.ok_or_else(|| BindError::MissingItemType {
            list: name.clone(),
            item: item_name.to_string(),
        })?;
        Ok(ListType::new(name, self.schema_name(), item).into())
    }

    fn load_complex_type(
        &mut self,
        type_id: TypeId,
        name: &str,
        def: &'a ComplexTypeDef,
    ) -> Result<Type, BindError> {
        let super_type = self.load_super_type(type_id, name);
        let has_super_type = super_type.is_some();

        // Everything registered from here on may point at the stub
        let mark = self.scope.len();
        let stub = Arc::new(ComplexType::new(name, self.schema_name(), super_type));
        self.scope.register(Type::Complex(Arc::clone(&stub)))?;

        let built = self.fill_complex_type(type_id, def, &stub, has_super_type);
        if built.is_err() {
            let dropped = self.scope.truncate(mark);
            debug!("complex type {} failed, dropping {} types built for it", name, dropped);
        }
        built
    }

    fn load_super_type(&mut self, type_id: TypeId, name: &str) -> Option<Arc<ComplexType>> {
        let set = self.set;
        let base = set.type_def(type_id).base;
        // anyType is its own base and stands for no super type
        if base == type_id || set.type_def(base).base == base {
            return None;
        }
        match self.load_type(base, name) {
            Ok(Type::Complex(super_type)) => Some(super_type),
            Ok(other) => {
                debug!("complex type {} has non-complex super type {}, ignoring it", name, other);
                None
            }
            Err(err) => {
                warn!("super type of complex type {} not loaded: {}", name, err);
                None
            }
        }
    }

    fn fill_complex_type(
        &mut self,
        type_id: TypeId,
        def: &'a ComplexTypeDef,
        stub: &Arc<ComplexType>,
        has_super_type: bool,
    ) -> Result<Type, BindError> {
        // The explicit content leaves out what the super type already holds
        let content = def.explicit_content.as_ref().unwrap_or(&def.content);

        if let ContentType::Particle(particle) = content {
            let group = match &particle.term {
                Term::ModelGroup(group) => group,
                Term::Element(_) | Term::Wildcard => {
                    return Err(BindError::UnsupportedContent(stub.name().to_string()));
                }
            };
            let built = self.process_content_group(stub, has_super_type, group)?;
            if built.is_list() {
                if !def.attribute_uses.is_empty() {
                    warn!(
                        "complex type {} became a list, dropping its {} attributes",
                        stub.name(),
                        def.attribute_uses.len()
                    );
                }
                return Ok(built);
            }
        }

        self.load_attributes(type_id, def, stub, has_super_type)?;
        Ok(Type::Complex(Arc::clone(stub)))
    }

    fn load_attributes(
        &mut self,
        type_id: TypeId,
        def: &ComplexTypeDef,
        target: &ComplexType,
        has_super_type: bool,
    ) -> Result<(), BindError> {
        let set = self.set;
        // Inherited attributes are fields of the super type already
        let uses = if has_super_type {
            def.attribute_uses.clone()
        } else {
            set.attribute_uses(type_id)
        };

        for attr_use in uses {
            let decl = set.attribute(attr_use.decl);
            let field_type = self.load_type(decl.type_id, &decl.name).map_err(|err| {
                BindError::AttributeTypeUnresolved {
                    type_name: target.name().to_string(),
                    attribute: decl.name.clone(),
                    source: Box::new(err),
                }
            })?;
            target.add_field(attribute_field(decl, field_type));
        }
        Ok(())
    }
}
