//! Synthesis of the unload and load units.

use crate::assembly::BodyBuilder;
use crate::metadata::{
    method::{Method, MethodFlags},
    refs::{FieldRef, MethodRef},
    token::Token,
    typedef::TypeDefinition,
};
use crate::transform::callbacks::UnloadCallback;
use crate::{Error, Result};

/// Name of the synthesized unload unit.
pub const UNLOAD_UNIT_NAME: &str = "<Reset>g__Unload";
/// Name of the synthesized load unit.
pub const LOAD_UNIT_NAME: &str = "<Reset>g__Load";

/// Builds the unload unit: a generated static unit that invokes each ordered
/// callback in sequence, then returns.
///
/// Only called when the callback list is non-empty; the caller skips
/// synthesis entirely otherwise.
#[must_use]
pub fn synthesize_unload_unit(
    type_def: &TypeDefinition,
    callbacks: &[UnloadCallback],
    token: Token,
) -> Method {
    let mut builder = BodyBuilder::new();
    for callback in callbacks {
        builder = builder.call(MethodRef::user(type_def.token, callback.method));
    }
    let body = builder.ret().build();

    Method::new_static(token, UNLOAD_UNIT_NAME, body)
        .with_flags(MethodFlags::PRIVATE | MethodFlags::GENERATED)
}

/// Builds the load unit: a generated static unit that first resets every
/// inventoried storage item to its storage type's zero/default representation
/// (in inventory order), then invokes the copied initializer when one exists.
///
/// Only called when the inventory is non-empty or a copied initializer
/// exists.
///
/// # Errors
///
/// Returns [`Error::FieldNotFound`] if an inventory token does not resolve on
/// the type; the inventory is built from the same type, so this indicates a
/// malformed module.
pub fn synthesize_load_unit(
    type_def: &TypeDefinition,
    inventory: &[Token],
    copied_initializer: Option<Token>,
    token: Token,
) -> Result<Method> {
    let mut builder = BodyBuilder::new();

    for field_token in inventory {
        let field = type_def
            .field(*field_token)
            .ok_or(Error::FieldNotFound {
                field: *field_token,
                declaring: type_def.token,
            })?;
        builder = builder
            .ld_default(field.storage)
            .stsfld(FieldRef::new(type_def.token, *field_token));
    }

    if let Some(initializer_copy) = copied_initializer {
        builder = builder.call(MethodRef::user(type_def.token, initializer_copy));
    }

    let body = builder.ret().build();

    Ok(Method::new_static(token, LOAD_UNIT_NAME, body)
        .with_flags(MethodFlags::PRIVATE | MethodFlags::GENERATED))
}
