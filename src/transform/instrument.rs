//! Initializer instrumentation: splicing registration calls.
//!
//! For every eligible type that produced at least one synthesized unit, two
//! registration calls are appended to the end of the original type
//! initializer (either call omitted when its unit was not synthesized). Each
//! call wraps the unit as a callable handle bound to no instance and hands it
//! to the module-wide dispatcher. Because the calls sit inside the
//! initializer, registration happens exactly once per type identity — for a
//! generic type, once per distinct instantiation encountered at run time.

use crate::assembly::{Instruction, MethodBody};
use crate::metadata::{
    refs::{Intrinsic, MethodRef},
    token::Token,
};

/// Builds the registration instruction tail for a type's synthesized units.
///
/// Unload registration precedes load registration; either pair is omitted
/// when the corresponding unit does not exist. An empty tail means the type
/// needs no instrumentation at all.
#[must_use]
pub fn registration_tail(
    declaring: Token,
    unload_unit: Option<Token>,
    load_unit: Option<Token>,
) -> Vec<Instruction> {
    let mut tail = Vec::new();

    if let Some(unit) = unload_unit {
        tail.push(Instruction::Ldftn(MethodRef::user(declaring, unit)));
        tail.push(Instruction::Call(MethodRef::Intrinsic(
            Intrinsic::RegisterUnload,
        )));
    }

    if let Some(unit) = load_unit {
        tail.push(Instruction::Ldftn(MethodRef::user(declaring, unit)));
        tail.push(Instruction::Call(MethodRef::Intrinsic(
            Intrinsic::RegisterLoad,
        )));
    }

    tail
}

/// Appends the registration tail to an initializer body.
///
/// The tail is spliced in front of the trailing `Ret` so the registrations
/// run after all original initialization. Bodies whose last instruction is
/// not `Ret` get the tail plus a fresh `Ret` appended.
pub fn append_registrations(body: &mut MethodBody, tail: Vec<Instruction>) {
    if tail.is_empty() {
        return;
    }

    // The ldftn operand occupies one stack slot.
    body.max_stack = body.max_stack.max(1);

    match body.instructions.last() {
        Some(Instruction::Ret) => {
            let ret_index = body.instructions.len() - 1;
            body.instructions.splice(ret_index..ret_index, tail);
        }
        _ => {
            body.instructions.extend(tail);
            body.instructions.push(Instruction::Ret);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::BodyBuilder;
    use crate::metadata::refs::FieldRef;

    #[test]
    fn test_tail_both_units() {
        let ty = Token::type_def(1);
        let tail = registration_tail(ty, Some(Token::method(10)), Some(Token::method(11)));
        assert_eq!(tail.len(), 4);
        assert_eq!(
            tail[1],
            Instruction::Call(MethodRef::Intrinsic(Intrinsic::RegisterUnload))
        );
        assert_eq!(
            tail[3],
            Instruction::Call(MethodRef::Intrinsic(Intrinsic::RegisterLoad))
        );
    }

    #[test]
    fn test_tail_unload_only() {
        let tail = registration_tail(Token::type_def(1), Some(Token::method(10)), None);
        assert_eq!(tail.len(), 2);
    }

    #[test]
    fn test_tail_empty_when_no_units() {
        assert!(registration_tail(Token::type_def(1), None, None).is_empty());
    }

    #[test]
    fn test_append_before_trailing_ret() {
        let ty = Token::type_def(1);
        let mut body = BodyBuilder::new()
            .ldc_i4(1)
            .stsfld(FieldRef::new(ty, Token::field(1)))
            .ret()
            .build();

        let tail = registration_tail(ty, Some(Token::method(10)), None);
        append_registrations(&mut body, tail);

        assert_eq!(body.instructions.len(), 5);
        assert_eq!(body.instructions.last(), Some(&Instruction::Ret));
        assert!(matches!(body.instructions[2], Instruction::Ldftn(_)));
    }

    #[test]
    fn test_append_to_empty_body() {
        let mut body = MethodBody {
            max_stack: 0,
            locals: Vec::new(),
            instructions: Vec::new(),
            exception_regions: Vec::new(),
        };

        let tail = registration_tail(Token::type_def(1), None, Some(Token::method(11)));
        append_registrations(&mut body, tail);

        assert_eq!(body.instructions.len(), 3);
        assert_eq!(body.instructions.last(), Some(&Instruction::Ret));
        assert_eq!(body.max_stack, 1);
    }
}
