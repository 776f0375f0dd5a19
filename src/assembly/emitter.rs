//! Fluent builder for executable bodies.
//!
//! [`BodyBuilder`] is how the unit synthesizer (and tests) author method
//! bodies: instructions are appended fluently and `max_stack` is tracked from
//! each instruction's stack effect as it is added, so no separate
//! verification pass is needed.
//!
//! # Examples
//!
//! ```rust
//! use cilreset::assembly::BodyBuilder;
//! use cilreset::metadata::refs::FieldRef;
//! use cilreset::metadata::token::Token;
//!
//! let body = BodyBuilder::new()
//!     .ldc_i4(60)
//!     .stsfld(FieldRef::new(Token::type_def(1), Token::field(1)))
//!     .ret()
//!     .build();
//!
//! assert_eq!(body.max_stack, 1);
//! assert_eq!(body.instructions.len(), 3);
//! ```

use crate::assembly::{
    body::{ExceptionRegion, MethodBody},
    instruction::Instruction,
};
use crate::metadata::{
    field::StorageType,
    refs::{FieldRef, MethodRef},
};

/// Builder for creating executable bodies.
#[derive(Debug, Default)]
pub struct BodyBuilder {
    /// Explicit stack depth override (None = computed from instructions)
    max_stack: Option<u16>,
    locals: Vec<StorageType>,
    instructions: Vec<Instruction>,
    exception_regions: Vec<ExceptionRegion>,
    current_depth: i32,
    observed_max: i32,
}

impl BodyBuilder {
    /// Creates a new empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum stack depth explicitly instead of computing it.
    #[must_use]
    pub fn max_stack(mut self, depth: u16) -> Self {
        self.max_stack = Some(depth);
        self
    }

    /// Declares a local variable slot. Slots are indexed in declaration order.
    #[must_use]
    pub fn local(mut self, storage: StorageType) -> Self {
        self.locals.push(storage);
        self
    }

    /// Appends an arbitrary instruction.
    #[must_use]
    pub fn emit(mut self, instruction: Instruction) -> Self {
        self.current_depth += instruction.stack_delta();
        if self.current_depth > self.observed_max {
            self.observed_max = self.current_depth;
        }
        self.instructions.push(instruction);
        self
    }

    /// Appends `ldc.i4`.
    #[must_use]
    pub fn ldc_i4(self, value: i32) -> Self {
        self.emit(Instruction::LdcI4(value))
    }

    /// Appends `ldc.i8`.
    #[must_use]
    pub fn ldc_i8(self, value: i64) -> Self {
        self.emit(Instruction::LdcI8(value))
    }

    /// Appends `ldstr`.
    #[must_use]
    pub fn ld_str(self, value: impl Into<String>) -> Self {
        self.emit(Instruction::LdStr(value.into()))
    }

    /// Appends `ldnull`.
    #[must_use]
    pub fn ld_null(self) -> Self {
        self.emit(Instruction::LdNull)
    }

    /// Appends a default-value push for the given storage type.
    #[must_use]
    pub fn ld_default(self, storage: StorageType) -> Self {
        self.emit(Instruction::LdDefault(storage))
    }

    /// Appends `ldsfld`.
    #[must_use]
    pub fn ldsfld(self, field: FieldRef) -> Self {
        self.emit(Instruction::Ldsfld(field))
    }

    /// Appends `stsfld`.
    #[must_use]
    pub fn stsfld(self, field: FieldRef) -> Self {
        self.emit(Instruction::Stsfld(field))
    }

    /// Appends `ldloc`.
    #[must_use]
    pub fn ldloc(self, slot: u16) -> Self {
        self.emit(Instruction::Ldloc(slot))
    }

    /// Appends `stloc`.
    #[must_use]
    pub fn stloc(self, slot: u16) -> Self {
        self.emit(Instruction::Stloc(slot))
    }

    /// Appends `call`.
    #[must_use]
    pub fn call(self, callee: MethodRef) -> Self {
        self.emit(Instruction::Call(callee))
    }

    /// Appends `ldftn`.
    #[must_use]
    pub fn ldftn(self, target: MethodRef) -> Self {
        self.emit(Instruction::Ldftn(target))
    }

    /// Appends `throw` with the given message.
    #[must_use]
    pub fn throw(self, message: impl Into<String>) -> Self {
        self.emit(Instruction::Throw(message.into()))
    }

    /// Appends `ret`.
    #[must_use]
    pub fn ret(self) -> Self {
        self.emit(Instruction::Ret)
    }

    /// Adds an exception handling region over instruction indices.
    #[must_use]
    pub fn exception_region(mut self, region: ExceptionRegion) -> Self {
        self.exception_regions.push(region);
        self
    }

    /// Finalizes the body.
    #[must_use]
    pub fn build(self) -> MethodBody {
        #[allow(clippy::cast_sign_loss, clippy::cast_possible_truncation)]
        let computed = self.observed_max.max(0) as u16;
        MethodBody {
            max_stack: self.max_stack.unwrap_or(computed),
            locals: self.locals,
            instructions: self.instructions,
            exception_regions: self.exception_regions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::refs::Intrinsic;
    use crate::metadata::token::Token;

    #[test]
    fn test_max_stack_computation() {
        let ty = Token::type_def(1);
        let body = BodyBuilder::new()
            .ldftn(MethodRef::user(ty, Token::method(1)))
            .call(MethodRef::Intrinsic(Intrinsic::RegisterUnload))
            .ldftn(MethodRef::user(ty, Token::method(2)))
            .call(MethodRef::Intrinsic(Intrinsic::RegisterLoad))
            .ret()
            .build();

        assert_eq!(body.max_stack, 1);
    }

    #[test]
    fn test_explicit_max_stack() {
        let body = BodyBuilder::new().max_stack(8).ret().build();
        assert_eq!(body.max_stack, 8);
    }

    #[test]
    fn test_locals_in_order() {
        let body = BodyBuilder::new()
            .local(StorageType::I4)
            .local(StorageType::String)
            .ret()
            .build();
        assert_eq!(body.locals, vec![StorageType::I4, StorageType::String]);
    }
}
