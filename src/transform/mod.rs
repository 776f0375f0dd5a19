//! The metadata transformation engine.
//!
//! Runs once per module, single-threaded, ahead of any execution. For each
//! eligible type it duplicates the original initializer, synthesizes the
//! unload and load units, re-qualifies generic member references, and splices
//! dispatcher registration calls into the original initializer. Output is
//! all-or-nothing per module: every type's edits are staged first and applied
//! only after the whole module has been analyzed successfully, so no
//! partially-instrumented module is ever emitted.
//!
//! # Pipeline
//!
//! 1. **Inventory** ([`inventory`]) — enumerate eligible static storage
//! 2. **Callbacks** ([`callbacks`]) — find and sort pre-reset hooks
//! 3. **Eligibility** ([`eligibility`]) — decide participation
//! 4. **Copier** ([`copier`]) — duplicate the original initializer
//! 5. **Synthesis** ([`synthesis`]) — build the unload and load units
//! 6. **Generic rewrite** ([`generics`]) — identity-instantiate references
//! 7. **Instrumentation** ([`instrument`]) — splice registration calls

pub mod callbacks;
pub mod copier;
pub mod eligibility;
pub mod generics;
pub mod instrument;
pub mod inventory;
pub mod synthesis;

use std::sync::Arc;

use crate::assembly::{Instruction, MethodBody};
use crate::diagnostics::{DiagnosticCategory, Diagnostics};
use crate::metadata::{method::Method, module::Module, token::Token};
use crate::{Error, Result};

/// Summary of one transformation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransformStats {
    /// Types examined by the eligibility analysis.
    pub types_analyzed: usize,
    /// Types that received instrumentation.
    pub types_instrumented: usize,
    /// Synthesized units attached to the module (copied initializers plus
    /// unload and load units).
    pub units_synthesized: usize,
}

/// Staged edits for one eligible type, applied only after the whole module
/// has been analyzed.
struct TypeEdits {
    type_token: Token,
    copied_initializer: Option<Method>,
    unload_unit: Option<Method>,
    load_unit: Option<Method>,
    registration_tail: Vec<Instruction>,
    /// Token for a fresh initializer when the type had none.
    new_initializer_token: Option<Token>,
}

/// The reset transformation engine.
///
/// # Examples
///
/// ```rust
/// use cilreset::diagnostics::Diagnostics;
/// use cilreset::metadata::module::Module;
/// use cilreset::transform::ResetTransformer;
/// use std::sync::Arc;
///
/// let diagnostics = Arc::new(Diagnostics::new());
/// let transformer = ResetTransformer::new(Arc::clone(&diagnostics));
///
/// let mut module = Module::new("Game.Core");
/// let stats = transformer.transform(&mut module)?;
/// assert_eq!(stats.types_instrumented, 0);
/// # Ok::<(), cilreset::Error>(())
/// ```
pub struct ResetTransformer {
    diagnostics: Arc<Diagnostics>,
}

impl ResetTransformer {
    /// Creates a transformer reporting analysis diagnostics to the given
    /// sink.
    #[must_use]
    pub fn new(diagnostics: Arc<Diagnostics>) -> Self {
        Self { diagnostics }
    }

    /// Transforms a module for static-state reset.
    ///
    /// # Errors
    ///
    /// - [`Error::AlreadyInstrumented`] when the module has been transformed
    ///   before; the transformation is single-pass only.
    /// - [`Error::GenericContext`] when a declaring type's parameters cannot
    ///   be resolved during reference re-qualification. The module is left
    ///   untouched.
    pub fn transform(&self, module: &mut Module) -> Result<TransformStats> {
        if module.reset_instrumented {
            self.diagnostics.error(
                DiagnosticCategory::Transform,
                format!("Module '{}' is already reset-instrumented", module.name),
            );
            return Err(Error::AlreadyInstrumented(module.name.clone()));
        }

        let mut stats = TransformStats::default();
        let mut staged: Vec<TypeEdits> = Vec::new();

        for type_token in module.type_tokens() {
            let Some(type_def) = module.type_def(type_token) else {
                continue;
            };
            // Work on a snapshot so fresh tokens can be allocated while the
            // staged edits are built.
            let type_def = type_def.clone();
            stats.types_analyzed += 1;

            let Some(eligibility) = eligibility::analyze(&type_def, &self.diagnostics) else {
                continue;
            };

            let mut copied_initializer = None;
            if type_def.initializer().is_some() {
                let token = module.alloc_method_token();
                copied_initializer = copier::copy_initializer(&type_def, token);
            }

            let unload_unit = if eligibility.callbacks.is_empty() {
                None
            } else {
                let token = module.alloc_method_token();
                Some(synthesis::synthesize_unload_unit(
                    &type_def,
                    &eligibility.callbacks,
                    token,
                ))
            };

            let load_unit = if eligibility.inventory.is_empty() && copied_initializer.is_none() {
                None
            } else {
                let token = module.alloc_method_token();
                Some(synthesis::synthesize_load_unit(
                    &type_def,
                    &eligibility.inventory,
                    copied_initializer.as_ref().map(|m| m.token),
                    token,
                )?)
            };

            if unload_unit.is_none() && load_unit.is_none() {
                continue;
            }

            let registration_tail = instrument::registration_tail(
                type_token,
                unload_unit.as_ref().map(|m| m.token),
                load_unit.as_ref().map(|m| m.token),
            );
            let mut edits = TypeEdits {
                type_token,
                copied_initializer,
                unload_unit,
                load_unit,
                registration_tail,
                new_initializer_token: None,
            };

            if type_def.initializer().is_none() {
                edits.new_initializer_token = Some(module.alloc_method_token());
            }

            for unit in [
                edits.copied_initializer.as_mut(),
                edits.unload_unit.as_mut(),
                edits.load_unit.as_mut(),
            ]
            .into_iter()
            .flatten()
            {
                if let Some(body) = unit.body.as_mut() {
                    generics::rewrite_body(body, module)?;
                }
            }
            generics::rewrite_instructions(&mut edits.registration_tail, module)?;

            stats.types_instrumented += 1;
            stats.units_synthesized += usize::from(edits.copied_initializer.is_some())
                + usize::from(edits.unload_unit.is_some())
                + usize::from(edits.load_unit.is_some());
            staged.push(edits);
        }

        for edits in staged {
            apply_edits(module, edits);
        }
        module.reset_instrumented = true;

        Ok(stats)
    }
}

fn apply_edits(module: &mut Module, edits: TypeEdits) {
    let Some(type_def) = module.type_def_mut(edits.type_token) else {
        return;
    };

    if let Some(unit) = edits.copied_initializer {
        type_def.methods.push(unit);
    }
    if let Some(unit) = edits.unload_unit {
        type_def.methods.push(unit);
    }
    if let Some(unit) = edits.load_unit {
        type_def.methods.push(unit);
    }

    if let Some(token) = edits.new_initializer_token {
        // Degenerate case: the type had no initializer; create one holding
        // nothing but the registrations.
        let mut body = MethodBody {
            max_stack: 0,
            locals: Vec::new(),
            instructions: Vec::new(),
            exception_regions: Vec::new(),
        };
        instrument::append_registrations(&mut body, edits.registration_tail);
        type_def.methods.push(Method::new_initializer(token, body));
    } else if let Some(initializer) = type_def.initializer_mut() {
        match initializer.body.as_mut() {
            Some(body) => instrument::append_registrations(body, edits.registration_tail),
            None => {
                let mut body = MethodBody {
                    max_stack: 0,
                    locals: Vec::new(),
                    instructions: Vec::new(),
                    exception_regions: Vec::new(),
                };
                instrument::append_registrations(&mut body, edits.registration_tail);
                initializer.body = Some(body);
            }
        }
    }
}
