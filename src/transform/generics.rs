//! Generic context rewriting: identity instantiation of declaring types.
//!
//! Raw references to members of an open generic declaration are only valid
//! inside the declaring type's own body. Every reference emitted by the
//! copier, the unit synthesizer or the instrumentation must therefore be
//! re-qualified with the declaring type's own parameters as type arguments
//! (the identity instantiation) before it lands in the module. The
//! qualification is applied at the exact declaring type — for a member of a
//! nested type under a generic enclosing type, the nested type carries the
//! flattened parameter list and is qualified itself.
//!
//! Failing to apply this step would produce a module that loads but faults at
//! run time; an *unresolvable* declaring type is caught here instead and
//! aborts transformation of the whole module.

use crate::assembly::{Instruction, MethodBody};
use crate::metadata::{module::Module, refs::MethodRef, refs::TypeRef, token::Token};
use crate::{Error, Result};

/// Re-qualifies every member reference in the instruction slice whose
/// declaring type has its own generic parameters.
///
/// References that are already instantiations are left alone. Intrinsic
/// callees have no declaring type and are skipped.
///
/// # Errors
///
/// Returns [`Error::GenericContext`] when a referenced declaring type is not
/// part of the module, which makes the required parameter list unresolvable.
pub fn rewrite_instructions(instructions: &mut [Instruction], module: &Module) -> Result<()> {
    for instruction in instructions {
        match instruction {
            Instruction::Ldsfld(field_ref) | Instruction::Stsfld(field_ref) => {
                qualify(&mut field_ref.declaring, module)?;
            }
            Instruction::Call(method_ref) | Instruction::Ldftn(method_ref) => {
                if let MethodRef::User { declaring, .. } = method_ref {
                    qualify(declaring, module)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Re-qualifies every member reference in a body.
///
/// # Errors
///
/// Returns [`Error::GenericContext`] when a declaring type cannot be
/// resolved; see [`rewrite_instructions`].
pub fn rewrite_body(body: &mut MethodBody, module: &Module) -> Result<()> {
    rewrite_instructions(&mut body.instructions, module)
}

fn qualify(declaring: &mut TypeRef, module: &Module) -> Result<()> {
    let TypeRef::Def(token) = declaring else {
        return Ok(());
    };
    let token: Token = *token;

    let type_def = module.type_def(token).ok_or(Error::GenericContext {
        declaring: token,
        message: "declaring type is not part of the module".to_string(),
    })?;

    if type_def.is_generic() {
        #[allow(clippy::cast_possible_truncation)]
        let param_count = type_def.generic_params.len() as u16;
        *declaring = TypeRef::identity(token, param_count);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        generics::{GenericParam, TypeArg},
        refs::FieldRef,
        typedef::TypeDefinition,
    };

    fn module_with_generic_type() -> Module {
        let mut module = Module::new("Game.Core");
        let mut generic = TypeDefinition::new(Token::type_def(1), "Game", "Counter");
        generic.generic_params.push(GenericParam::new("T", 0));
        module.add_type(generic).unwrap();
        module
            .add_type(TypeDefinition::new(Token::type_def(2), "Game", "Plain"))
            .unwrap();
        module
    }

    #[test]
    fn test_generic_declaring_type_gets_identity_args() {
        let module = module_with_generic_type();
        let mut instructions = vec![Instruction::Stsfld(FieldRef::new(
            Token::type_def(1),
            Token::field(1),
        ))];

        rewrite_instructions(&mut instructions, &module).unwrap();

        match &instructions[0] {
            Instruction::Stsfld(field_ref) => match &field_ref.declaring {
                TypeRef::GenericInst { def, args } => {
                    assert_eq!(*def, Token::type_def(1));
                    assert_eq!(args, &vec![TypeArg::Param(0)]);
                }
                TypeRef::Def(_) => panic!("reference was not re-qualified"),
            },
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_non_generic_declaring_type_untouched() {
        let module = module_with_generic_type();
        let original = Instruction::Ldsfld(FieldRef::new(Token::type_def(2), Token::field(1)));
        let mut instructions = vec![original.clone()];

        rewrite_instructions(&mut instructions, &module).unwrap();
        assert_eq!(instructions[0], original);
    }

    #[test]
    fn test_method_references_rewritten() {
        let module = module_with_generic_type();
        let mut instructions = vec![Instruction::Ldftn(MethodRef::user(
            Token::type_def(1),
            Token::method(3),
        ))];

        rewrite_instructions(&mut instructions, &module).unwrap();

        match &instructions[0] {
            Instruction::Ldftn(MethodRef::User { declaring, .. }) => {
                assert!(matches!(declaring, TypeRef::GenericInst { .. }));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_unresolvable_declaring_type_is_fatal() {
        let module = module_with_generic_type();
        let mut instructions = vec![Instruction::Stsfld(FieldRef::new(
            Token::type_def(99),
            Token::field(1),
        ))];

        let result = rewrite_instructions(&mut instructions, &module);
        assert!(matches!(result, Err(Error::GenericContext { .. })));
    }
}
