//! Eligibility analysis: does a type participate in the reset lifecycle.

use crate::diagnostics::Diagnostics;
use crate::metadata::{token::Token, typedef::TypeDefinition};
use crate::transform::{
    callbacks::{collect_callbacks, UnloadCallback},
    inventory::build_inventory,
};

/// The analysis result for an eligible type.
#[derive(Debug, Clone)]
pub struct Eligibility {
    /// Static storage items to reset, in inventory order.
    pub inventory: Vec<Token>,
    /// Unload callbacks, sorted ascending by order value.
    pub callbacks: Vec<UnloadCallback>,
}

/// Decides whether a type participates in static-state reset.
///
/// A type is eligible when it is not explicitly opted out and has a non-empty
/// static-state inventory or at least one unload callback. Returns `None` for
/// ineligible types, which every downstream component must leave completely
/// untouched: no synthesized units, no instrumentation, zero runtime
/// overhead.
#[must_use]
pub fn analyze(type_def: &TypeDefinition, diagnostics: &Diagnostics) -> Option<Eligibility> {
    if type_def.is_opted_out() {
        return None;
    }

    let inventory = build_inventory(type_def);
    let callbacks = collect_callbacks(type_def, diagnostics);

    if inventory.is_empty() && callbacks.is_empty() {
        return None;
    }

    Some(Eligibility {
        inventory,
        callbacks,
    })
}
