//! The instruction set of executable bodies.
//!
//! This is a deliberately small, CIL-flavored op set: exactly what type
//! initializers, unload callbacks and the synthesized reset units need. The
//! engine never analyzes or simplifies control flow; it only duplicates
//! instruction sequences and splices calls, so the set has no branches.

use crate::metadata::{
    field::StorageType,
    refs::{FieldRef, MethodRef},
};

/// One instruction of an executable body.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    /// No operation.
    Nop,
    /// Push a 32-bit integer constant.
    LdcI4(i32),
    /// Push a 64-bit integer constant.
    LdcI8(i64),
    /// Push a 32-bit float constant.
    LdcR4(f32),
    /// Push a 64-bit float constant.
    LdcR8(f64),
    /// Push a string literal.
    LdStr(String),
    /// Push a null reference.
    LdNull,
    /// Push the zero/default representation of a storage type.
    ///
    /// This is the blank value the runtime assigns before any initializer
    /// ever ran, used by load units to reset inventoried storage.
    LdDefault(StorageType),
    /// Push the value of a static field.
    Ldsfld(FieldRef),
    /// Pop a value and store it into a static field.
    Stsfld(FieldRef),
    /// Push the value of a local variable.
    Ldloc(u16),
    /// Pop a value and store it into a local variable.
    Stloc(u16),
    /// Call a static, zero-argument, void method.
    ///
    /// Intrinsic callees additionally pop their callable-handle operand (see
    /// [`crate::metadata::refs::Intrinsic`]).
    Call(MethodRef),
    /// Push a callable handle bound to no instance.
    Ldftn(MethodRef),
    /// Discard the top of the stack.
    Pop,
    /// Raise an error with the given message.
    Throw(String),
    /// Return from the body.
    Ret,
}

impl Instruction {
    /// Net stack effect of the instruction (pushes minus pops).
    ///
    /// Used by the body builder to compute `max_stack` without a separate
    /// verification pass.
    #[must_use]
    pub fn stack_delta(&self) -> i32 {
        match self {
            Instruction::Nop | Instruction::Ret | Instruction::Throw(_) => 0,
            Instruction::LdcI4(_)
            | Instruction::LdcI8(_)
            | Instruction::LdcR4(_)
            | Instruction::LdcR8(_)
            | Instruction::LdStr(_)
            | Instruction::LdNull
            | Instruction::LdDefault(_)
            | Instruction::Ldsfld(_)
            | Instruction::Ldloc(_)
            | Instruction::Ldftn(_) => 1,
            Instruction::Stsfld(_) | Instruction::Stloc(_) | Instruction::Pop => -1,
            Instruction::Call(callee) => match callee {
                // Intrinsics consume the callable handle below them.
                MethodRef::Intrinsic(_) => -1,
                MethodRef::User { .. } => 0,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::refs::Intrinsic;
    use crate::metadata::token::Token;

    #[test]
    fn test_stack_delta() {
        assert_eq!(Instruction::LdcI4(7).stack_delta(), 1);
        assert_eq!(
            Instruction::Stsfld(FieldRef::new(Token::type_def(1), Token::field(1))).stack_delta(),
            -1
        );
        assert_eq!(
            Instruction::Call(MethodRef::user(Token::type_def(1), Token::method(1))).stack_delta(),
            0
        );
        assert_eq!(
            Instruction::Call(MethodRef::Intrinsic(Intrinsic::RegisterUnload)).stack_delta(),
            -1
        );
    }
}
