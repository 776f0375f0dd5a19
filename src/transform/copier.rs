//! Duplication of a type's original initializer into an independently
//! callable unit.

use crate::metadata::{
    method::{Method, MethodFlags},
    token::Token,
    typedef::TypeDefinition,
};

/// Name of the copied-initializer unit.
pub const INITIALIZER_COPY_NAME: &str = "<Reset>g__InitializerCopy";

/// Clones a type's original initializer body verbatim into a new private
/// static unit owned by the same type.
///
/// The full executable body is duplicated: instruction sequence, local
/// variable declarations and exception handling regions. The copy is marked
/// as generated so it is never visible to ordinary callers and never
/// re-analyzed as eligible state. Returns `None` when the type has no
/// initializer, which downstream components treat as "no re-initialization
/// step".
#[must_use]
pub fn copy_initializer(type_def: &TypeDefinition, token: Token) -> Option<Method> {
    let initializer = type_def.initializer()?;
    let body = initializer.body.as_ref()?.clone();

    Some(
        Method::new_static(token, INITIALIZER_COPY_NAME, body)
            .with_flags(MethodFlags::PRIVATE | MethodFlags::GENERATED),
    )
}
