//! The loaded runtime image: an instrumented module plus its runtime state.

use std::sync::Arc;

use dashmap::DashMap;

use crate::metadata::{generics::TypeInstance, module::Module, token::Token};
use crate::runtime::{interpreter, registry::DispatchRegistry, statics::StaticStore, value::Value};
use crate::{Error, Result};

/// An instrumented module loaded for execution.
///
/// Owns the module's static storage and its dispatch registry. The registry
/// starts empty at load; it is populated incrementally as each eligible
/// type's initializer first runs, and consumed repeatedly and
/// non-destructively by the reload orchestrator.
#[derive(Debug)]
pub struct RuntimeImage {
    module: Module,
    statics: StaticStore,
    registry: DispatchRegistry,
    initialized: DashMap<TypeInstance, ()>,
}

impl RuntimeImage {
    /// Loads an instrumented module.
    #[must_use]
    pub fn load(module: Module) -> Arc<Self> {
        Arc::new(Self {
            module,
            statics: StaticStore::new(),
            registry: DispatchRegistry::new(),
            initialized: DashMap::new(),
        })
    }

    /// The loaded module.
    #[must_use]
    pub fn module(&self) -> &Module {
        &self.module
    }

    /// The module's dispatch registry.
    #[must_use]
    pub fn registry(&self) -> &DispatchRegistry {
        &self.registry
    }

    /// Runs the type initializer for a closed instantiation, exactly once per
    /// distinct instantiation.
    ///
    /// Safe to call concurrently for the same or different instantiations;
    /// losers of the race observe the winner's completed initialization.
    /// Types without an initializer are marked initialized with blank slots.
    ///
    /// # Errors
    ///
    /// - [`Error::TypeNotFound`] when the instantiation names an unknown type
    /// - [`Error::GenericContext`] when the argument count does not match the
    ///   type's declared parameters
    /// - Any error raised by the initializer body itself; initialization can
    ///   then be retried.
    pub fn ensure_initialized(self: &Arc<Self>, instance: TypeInstance) -> Result<()> {
        if self.initialized.contains_key(&instance) {
            return Ok(());
        }

        let type_def = self
            .module
            .type_def(instance.def)
            .ok_or(Error::TypeNotFound(instance.def))?;
        if type_def.generic_params.len() != instance.args.len() {
            return Err(Error::GenericContext {
                declaring: instance.def,
                message: format!(
                    "instantiation carries {} argument(s), type declares {}",
                    instance.args.len(),
                    type_def.generic_params.len()
                ),
            });
        }

        let initializer = type_def.initializer().map(|m| m.token);

        match self.initialized.entry(instance.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Ok(()),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                self.statics.ensure_slots(&instance, type_def);
                if let Some(initializer) = initializer {
                    interpreter::execute(self, initializer, &instance)?;
                }
                entry.insert(());
                Ok(())
            }
        }
    }

    /// Reads a static field of an initialized instantiation by field name.
    ///
    /// Returns `None` when the type, field or instantiation is unknown.
    /// Intended for hosts and tests observing reset behavior.
    #[must_use]
    pub fn static_value(&self, instance: &TypeInstance, field_name: &str) -> Option<Value> {
        let type_def = self.module.type_def(instance.def)?;
        let index = type_def.field_index(type_def.field_by_name(field_name)?.token)?;
        self.statics.read(instance, index)
    }

    /// Writes a static field of an initialized instantiation by field name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TypeNotFound`] / [`Error::FieldNotFound`] when the
    /// target does not resolve or its slots were never created.
    pub fn set_static_value(
        &self,
        instance: &TypeInstance,
        field_name: &str,
        value: Value,
    ) -> Result<()> {
        let type_def = self
            .module
            .type_def(instance.def)
            .ok_or(Error::TypeNotFound(instance.def))?;
        let field = type_def
            .field_by_name(field_name)
            .ok_or(Error::FieldNotFound {
                field: Token::new(0),
                declaring: instance.def,
            })?;
        let index = type_def.field_index(field.token).ok_or(Error::FieldNotFound {
            field: field.token,
            declaring: instance.def,
        })?;
        if self.statics.write(instance, index, value) {
            Ok(())
        } else {
            Err(Error::FieldNotFound {
                field: field.token,
                declaring: instance.def,
            })
        }
    }

    /// Reads a static slot by field token, creating blank slots on first
    /// touch. Used by the interpreter.
    pub(crate) fn read_static_slot(&self, instance: &TypeInstance, field: Token) -> Result<Value> {
        let type_def = self
            .module
            .type_def(instance.def)
            .ok_or(Error::TypeNotFound(instance.def))?;
        let index = type_def.field_index(field).ok_or(Error::FieldNotFound {
            field,
            declaring: instance.def,
        })?;
        self.statics.ensure_slots(instance, type_def);
        self.statics
            .read(instance, index)
            .ok_or(Error::FieldNotFound {
                field,
                declaring: instance.def,
            })
    }

    /// Writes a static slot by field token, creating blank slots on first
    /// touch. Used by the interpreter.
    pub(crate) fn write_static_slot(
        &self,
        instance: &TypeInstance,
        field: Token,
        value: Value,
    ) -> Result<()> {
        let type_def = self
            .module
            .type_def(instance.def)
            .ok_or(Error::TypeNotFound(instance.def))?;
        let index = type_def.field_index(field).ok_or(Error::FieldNotFound {
            field,
            declaring: instance.def,
        })?;
        self.statics.ensure_slots(instance, type_def);
        if self.statics.write(instance, index, value) {
            Ok(())
        } else {
            Err(Error::FieldNotFound {
                field,
                declaring: instance.def,
            })
        }
    }
}
