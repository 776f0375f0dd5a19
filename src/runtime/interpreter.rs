//! Execution of instrumented method bodies.
//!
//! A small synchronous stack interpreter, sufficient for the bodies this
//! crate produces and consumes: type initializers, unload callbacks and
//! synthesized reset units. Generic member references are closed against the
//! executing instantiation; the dispatcher registration intrinsics capture
//! callable handles as closures over the runtime image.
//!
//! Exception regions are carried through copying verbatim but are not
//! simulated; an error raised inside a body propagates to the caller, which
//! is the containment model the reload orchestrator expects.

use std::sync::Arc;

use crate::assembly::Instruction;
use crate::metadata::{
    generics::{TypeArg, TypeInstance},
    refs::{Intrinsic, MethodRef, TypeRef},
    token::Token,
};
use crate::runtime::{
    image::RuntimeImage,
    registry::{Channel, ResetAction},
    value::{MethodHandle, Value},
};
use crate::{Error, Result};

/// Executes a static, zero-argument, void method on a closed instantiation
/// of its declaring type.
///
/// # Errors
///
/// - [`Error::MethodNotFound`] / [`Error::MissingBody`] on resolution failures
/// - [`Error::GenericContext`] when a reference the transformation failed to
///   qualify is encountered at run time
/// - [`Error::CallbackFailed`] when the body raises
/// - [`Error::Malformed`] on structural faults (stack underflow, bad operand)
pub fn execute(image: &Arc<RuntimeImage>, method: Token, declaring: &TypeInstance) -> Result<()> {
    let type_def = image
        .module()
        .type_def(declaring.def)
        .ok_or(Error::TypeNotFound(declaring.def))?;
    let method_def = type_def.method(method).ok_or(Error::MethodNotFound {
        method,
        declaring: declaring.def,
    })?;
    let body = method_def.body.as_ref().ok_or(Error::MissingBody(method))?;

    let mut stack: Vec<Value> = Vec::with_capacity(usize::from(body.max_stack));
    let mut locals: Vec<Value> = body.locals.iter().map(|s| Value::default_for(*s)).collect();

    for instruction in &body.instructions {
        match instruction {
            Instruction::Nop => {}
            Instruction::LdcI4(v) => stack.push(Value::I4(*v)),
            Instruction::LdcI8(v) => stack.push(Value::I8(*v)),
            Instruction::LdcR4(v) => stack.push(Value::R4(*v)),
            Instruction::LdcR8(v) => stack.push(Value::R8(*v)),
            Instruction::LdStr(v) => stack.push(Value::String(v.clone())),
            Instruction::LdNull => stack.push(Value::Null),
            Instruction::LdDefault(storage) => stack.push(Value::default_for(*storage)),
            Instruction::Ldsfld(field_ref) => {
                let target = close_type_ref(image, &field_ref.declaring, declaring)?;
                let value = image.read_static_slot(&target, field_ref.field)?;
                stack.push(value);
            }
            Instruction::Stsfld(field_ref) => {
                let value = pop(&mut stack, method)?;
                let target = close_type_ref(image, &field_ref.declaring, declaring)?;
                image.write_static_slot(&target, field_ref.field, value)?;
            }
            Instruction::Ldloc(slot) => {
                let value = locals
                    .get(usize::from(*slot))
                    .cloned()
                    .ok_or_else(|| malformed_error!("undefined local {} in {}", slot, method))?;
                stack.push(value);
            }
            Instruction::Stloc(slot) => {
                let value = pop(&mut stack, method)?;
                let target = locals
                    .get_mut(usize::from(*slot))
                    .ok_or_else(|| malformed_error!("undefined local {} in {}", slot, method))?;
                *target = value;
            }
            Instruction::Ldftn(target) => match target {
                MethodRef::User {
                    declaring: target_type,
                    method: target_method,
                } => {
                    let closed = close_type_ref(image, target_type, declaring)?;
                    stack.push(Value::Method(MethodHandle {
                        declaring: closed,
                        method: *target_method,
                    }));
                }
                MethodRef::Intrinsic(_) => {
                    return Err(malformed_error!(
                        "ldftn of a dispatcher intrinsic in {}",
                        method
                    ));
                }
            },
            Instruction::Call(callee) => match callee {
                MethodRef::User {
                    declaring: target_type,
                    method: target_method,
                } => {
                    let closed = close_type_ref(image, target_type, declaring)?;
                    execute(image, *target_method, &closed)?;
                }
                MethodRef::Intrinsic(intrinsic) => {
                    let handle = match pop(&mut stack, method)? {
                        Value::Method(handle) => handle,
                        other => {
                            return Err(malformed_error!(
                                "dispatcher registration expects a callable handle, found {:?}",
                                other
                            ));
                        }
                    };
                    let channel = match intrinsic {
                        Intrinsic::RegisterUnload => Channel::Unload,
                        Intrinsic::RegisterLoad => Channel::Load,
                    };
                    let action: ResetAction = {
                        let image = Arc::clone(image);
                        Arc::new(move || execute(&image, handle.method, &handle.declaring))
                    };
                    image.registry().register(channel, action);
                }
            },
            Instruction::Pop => {
                pop(&mut stack, method)?;
            }
            Instruction::Throw(message) => {
                return Err(Error::CallbackFailed {
                    message: message.clone(),
                });
            }
            Instruction::Ret => return Ok(()),
        }
    }

    Ok(())
}

fn pop(stack: &mut Vec<Value>, method: Token) -> Result<Value> {
    stack
        .pop()
        .ok_or_else(|| malformed_error!("evaluation stack underflow in {}", method))
}

/// Closes a type reference against the executing instantiation.
///
/// Bare references to a generic type definition are only valid from the
/// declaring type's own body (where the executing instantiation supplies the
/// arguments); anywhere else they mark a reference the transformation failed
/// to qualify and are rejected.
fn close_type_ref(
    image: &Arc<RuntimeImage>,
    type_ref: &TypeRef,
    current: &TypeInstance,
) -> Result<TypeInstance> {
    match type_ref {
        TypeRef::Def(token) => {
            if *token == current.def {
                return Ok(current.clone());
            }
            let type_def = image
                .module()
                .type_def(*token)
                .ok_or(Error::TypeNotFound(*token))?;
            if type_def.is_generic() {
                return Err(Error::GenericContext {
                    declaring: *token,
                    message: "unqualified reference to a generic type declaration".to_string(),
                });
            }
            Ok(TypeInstance::non_generic(*token))
        }
        TypeRef::GenericInst { def, args } => {
            let closed = args
                .iter()
                .map(|arg| match arg {
                    TypeArg::Primitive(storage) => Ok(*storage),
                    TypeArg::Param(index) => current
                        .args
                        .get(usize::from(*index))
                        .copied()
                        .ok_or(Error::GenericContext {
                            declaring: *def,
                            message: format!(
                                "parameter {index} is not bound in the executing context"
                            ),
                        }),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(TypeInstance::new(*def, closed))
        }
    }
}
