//! Schema and type registry
//!
//! The [`SchemaRegistry`] holds every committed schema and the types they
//! own, keyed by name. It is shared between compilations and only written
//! when a compilation commits. Each compilation works against a
//! [`TypeScope`]: a private overlay for the types it creates, which lets a
//! complex type be registered before it is complete without ever exposing
//! the incomplete type to other readers.

use crate::error::BindError;
use crate::types::{Schema, Type};
use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Default)]
struct RegistryState {
    schemas: IndexMap<String, Arc<Schema>>,
    types: IndexMap<String, Type>,
}

impl RegistryState {
    fn remove_types_owned_by(&mut self, schema_name: &str) {
        self.types.retain(|_, t| t.schema() != Some(schema_name));
    }
}

/// Registered schemas and their types
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    state: RwLock<RegistryState>,
    compile_locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl SchemaRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Registered schema by name
    pub fn get_schema(&self, name: &str) -> Option<Arc<Schema>> {
        self.state.read().schemas.get(name).cloned()
    }

    /// Registered type by name
    pub fn get_type(&self, name: &str) -> Option<Type> {
        self.state.read().types.get(name).cloned()
    }

    /// Names of the registered schemas, in registration order
    pub fn schema_names(&self) -> Vec<String> {
        self.state.read().schemas.keys().cloned().collect()
    }

    /// Names of the registered types, in registration order
    pub fn type_names(&self) -> Vec<String> {
        self.state.read().types.keys().cloned().collect()
    }

    /// Register a schema and publish the types it owns
    ///
    /// An existing schema of the same name is only replaced when
    /// `override_existing` is set, in which case the types it owned are
    /// dropped. A type name already owned by another schema keeps its
    /// current type unless `override_existing` is set.
    pub fn register_schema(&self, schema: Schema, override_existing: bool) -> Arc<Schema> {
        let mut state = self.state.write();

        if let Some(existing) = state.schemas.get(schema.name()) {
            if !override_existing {
                debug!("schema {} is already registered and will not be overridden", schema.name());
                return Arc::clone(existing);
            }
            info!("replacing registered schema {}", schema.name());
            let name = schema.name().to_string();
            state.remove_types_owned_by(&name);
        }

        for type_ in schema.types() {
            if let Some(existing) = state.types.get(type_.name()) {
                let owner = existing.schema().unwrap_or_default();
                if owner != schema.name() {
                    warn!(
                        "type {} of schema {} collides with the type registered by schema {}",
                        type_.name(),
                        schema.name(),
                        owner
                    );
                    if !override_existing {
                        continue;
                    }
                }
            }
            state
                .types
                .insert(type_.name().to_string(), type_.clone());
        }

        let schema = Arc::new(schema);
        state
            .schemas
            .insert(schema.name().to_string(), Arc::clone(&schema));
        info!(
            "registered schema {} ({}) with {} fields and {} types",
            schema.name(),
            schema.namespace(),
            schema.fields().len(),
            schema.type_count()
        );
        schema
    }

    /// Remove a schema and the types it owns
    pub fn remove_schema(&self, name: &str) -> Option<Arc<Schema>> {
        let mut state = self.state.write();
        let removed = state.schemas.shift_remove(name);
        if removed.is_some() {
            state.remove_types_owned_by(name);
        }
        removed
    }

    /// Remove every schema and type
    pub fn clear(&self) {
        let mut state = self.state.write();
        state.schemas.clear();
        state.types.clear();
    }

    /// Global type visible to a compilation of `schema_name`
    ///
    /// Types owned by the schema being compiled are hidden so a rebuild sees
    /// its own new definitions.
    fn visible_type(&self, name: &str, schema_name: &str) -> Option<Type> {
        self.state
            .read()
            .types
            .get(name)
            .filter(|t| t.schema() != Some(schema_name))
            .cloned()
    }

    /// Lock serializing compilations of one schema name
    pub(crate) fn compile_lock(&self, schema_name: &str) -> Arc<Mutex<()>> {
        Arc::clone(
            self.compile_locks
                .lock()
                .entry(schema_name.to_string())
                .or_default(),
        )
    }

    /// Hand back a lock taken with [`compile_lock`](Self::compile_lock),
    /// dropping its table entry when no other compilation holds or waits
    /// on it
    pub(crate) fn release_compile_lock(&self, schema_name: &str, lock: Arc<Mutex<()>>) {
        let mut locks = self.compile_locks.lock();
        // One reference in the table, one here
        if Arc::strong_count(&lock) == 2 {
            locks.remove(schema_name);
        }
    }

    #[cfg(test)]
    pub(crate) fn compile_lock_count(&self) -> usize {
        self.compile_locks.lock().len()
    }
}

/// Types created by one compilation, layered over the registry
pub struct TypeScope<'r> {
    registry: &'r SchemaRegistry,
    schema_name: String,
    local: IndexMap<String, Type>,
}

impl<'r> TypeScope<'r> {
    /// Create an empty scope for compiling `schema_name`
    pub fn new(registry: &'r SchemaRegistry, schema_name: impl Into<String>) -> Self {
        Self {
            registry,
            schema_name: schema_name.into(),
            local: IndexMap::new(),
        }
    }

    /// Name of the schema being compiled
    pub fn schema_name(&self) -> &str {
        &self.schema_name
    }

    /// Look a type up: registered types first, then this scope's own
    pub fn lookup(&self, name: &str) -> Option<Type> {
        self.lookup_global(name).or_else(|| self.lookup_local(name))
    }

    /// Registered type visible to this compilation
    pub fn lookup_global(&self, name: &str) -> Option<Type> {
        self.registry.visible_type(name, &self.schema_name)
    }

    /// Type created by this compilation
    pub fn lookup_local(&self, name: &str) -> Option<Type> {
        self.local.get(name).cloned()
    }

    /// Register a type under its name
    ///
    /// Registering the same type again is a no-op; registering a different
    /// type under a taken name fails.
    pub fn register(&mut self, type_: Type) -> Result<(), BindError> {
        match self.local.get(type_.name()) {
            Some(existing) if Type::ptr_eq(existing, &type_) => Ok(()),
            Some(_) => Err(BindError::TypeCollision(type_.name().to_string())),
            None => {
                self.local.insert(type_.name().to_string(), type_);
                Ok(())
            }
        }
    }

    /// Register a type, replacing whatever is registered under its name
    pub fn replace(&mut self, type_: Type) {
        self.local.insert(type_.name().to_string(), type_);
    }

    /// Drop a type from this scope
    pub fn remove(&mut self, name: &str) -> Option<Type> {
        self.local.shift_remove(name)
    }

    /// Drop every type registered after the first `len`, returning how many
    /// were dropped
    pub fn truncate(&mut self, len: usize) -> usize {
        let dropped = self.local.len().saturating_sub(len);
        self.local.truncate(len);
        dropped
    }

    /// Number of types created by this compilation
    pub fn len(&self) -> usize {
        self.local.len()
    }

    /// Whether this compilation created no types
    pub fn is_empty(&self) -> bool {
        self.local.is_empty()
    }

    /// Types created by this compilation, in registration order
    pub fn into_types(self) -> Vec<Type> {
        self.local.into_values().collect()
    }
}
