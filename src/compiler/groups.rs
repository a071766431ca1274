//! Model group processing
//!
//! Turns the particles of a content model into fields of the complex type
//! being built. Repeated content is wrapped in list types, and a content
//! model made of a single repeated element turns the whole complex type
//! into a list. Choices are flattened like sequences: each alternative
//! becomes an independent field.

use super::builder::TypeBuilder;
use super::fields::element_field;
use crate::error::BindError;
use crate::names::{anonymous_list_field_name, anonymous_list_item_name, anonymous_list_type_name};
use crate::types::{ComplexType, Field, ListType, Type};
use crate::xsd::{ElementDecl, ElementId, ModelGroup, Occurs, Particle, Term};
use std::sync::Arc;
use tracing::{debug, warn};

impl<'a> TypeBuilder<'a> {
    /// Process the content group of a complex type
    ///
    /// Returns the promoted list type when the group is a single repeated
    /// element and the type has no super type, otherwise the filled target.
    pub(super) fn process_content_group(
        &mut self,
        target: &Arc<ComplexType>,
        has_super_type: bool,
        group: &'a ModelGroup,
    ) -> Result<Type, BindError> {
        if let [only] = group.children() {
            if let Term::Element(element) = only.term {
                if only.is_repeated() && !has_super_type {
                    return self.promote_to_list(target, only, element);
                }
            }
        }
        self.process_model_group(target, group);
        Ok(Type::Complex(Arc::clone(target)))
    }

    /// Replace the target by a list of its only child element
    fn promote_to_list(
        &mut self,
        target: &ComplexType,
        particle: &Particle,
        element: ElementId,
    ) -> Result<Type, BindError> {
        let decl = self.set.element(element);
        let item_type = self.load_type(decl.type_id, &decl.name)?;
        debug!("complex type {} is a list of {}", target.name(), decl.name);

        let list: Type = ListType::new(target.name(), self.schema_name(), item_type)
            .with_element_name(decl.name.as_str())
            .with_default_value(decl.default_value.clone())
            .with_bounds(particle.occurs)
            .into();
        self.scope.replace(list.clone());
        Ok(list)
    }

    /// Add a field to `target` for each particle of `group`
    ///
    /// A field that cannot be resolved is skipped.
    pub(super) fn process_model_group(&mut self, target: &Arc<ComplexType>, group: &'a ModelGroup) {
        let set = self.set;
        for child in group.children() {
            match &child.term {
                Term::Element(element) => {
                    let decl = set.element(*element);
                    let field = if child.is_repeated() {
                        self.repeated_element_field(decl, child.occurs)
                    } else {
                        self.load_type(decl.type_id, &decl.name)
                            .map(|field_type| element_field(decl, field_type))
                    };
                    match field {
                        Ok(field) => target.add_field(field),
                        Err(err) => self.skip(format!("{}/{}", target.name(), decl.name), err),
                    }
                }
                Term::ModelGroup(nested) if child.is_repeated() => {
                    match self.repeated_group_field(target, child.occurs, nested) {
                        Ok(field) => target.add_field(field),
                        Err(err) => self.skip(
                            format!("{}/{}", target.name(), anonymous_list_field_name(target.name())),
                            err,
                        ),
                    }
                }
                Term::ModelGroup(nested) => self.process_model_group(target, nested),
                Term::Wildcard => {
                    warn!("ignoring wildcard content of complex type {}", target.name());
                }
            }
        }
    }

    /// Field holding the occurrences of a repeated element
    fn repeated_element_field(&mut self, decl: &ElementDecl, occurs: Occurs) -> Result<Field, BindError> {
        let item_type = self.load_type(decl.type_id, &decl.name)?;
        let list = ListType::new(
            anonymous_list_type_name(&decl.name),
            self.schema_name(),
            item_type,
        )
        .with_element_name(decl.name.as_str())
        .with_bounds(Occurs::new(0, occurs.max));
        Ok(Field::new(decl.name.as_str(), list.into()))
    }

    /// Field holding the occurrences of a repeated nested group
    ///
    /// Each occurrence becomes an instance of a synthesized complex type
    /// sharing the target's super type, so it is only promoted to a list when
    /// the target has none.
    fn repeated_group_field(
        &mut self,
        target: &ComplexType,
        occurs: Occurs,
        group: &'a ModelGroup,
    ) -> Result<Field, BindError> {
        let item_name = anonymous_list_item_name(target.name());
        let super_type = target.super_type().cloned();
        let has_super_type = super_type.is_some();

        let mark = self.scope.len();
        let item = Arc::new(ComplexType::new(item_name.as_str(), self.schema_name(), super_type));
        self.scope.register(Type::Complex(Arc::clone(&item)))?;

        let item_type = match self.process_content_group(&item, has_super_type, group) {
            Ok(item_type) => item_type,
            Err(err) => {
                self.scope.truncate(mark);
                return Err(err);
            }
        };

        let list = ListType::new(
            anonymous_list_type_name(target.name()),
            self.schema_name(),
            item_type,
        )
        .with_bounds(Occurs::new(0, occurs.max));
        Ok(Field::new(anonymous_list_field_name(target.name()), list.into()))
    }
}
