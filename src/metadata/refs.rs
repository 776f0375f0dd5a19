//! Member references: the open/closed distinction driving generic rewriting.
//!
//! A reference to a member of a generic type is only valid inside that type's
//! own body while it names the bare definition ([`TypeRef::Def`]). Everywhere
//! else it must be qualified with type arguments ([`TypeRef::GenericInst`]) —
//! for synthesized units this is the identity instantiation (the declaring
//! type's own parameters). Modeling the two states as variants makes the
//! rewrite step explicit and lets the runtime reject references the
//! transformation failed to qualify.

use crate::metadata::{generics::TypeArg, token::Token};

/// A reference to a type, either the bare definition or an instantiation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// The bare type definition.
    ///
    /// Valid as a declaring context only for non-generic types, or from
    /// within the declaring type's own body.
    Def(Token),

    /// An instantiation of a generic type definition.
    GenericInst {
        /// Token of the type definition being instantiated.
        def: Token,
        /// Type arguments, one per declared parameter. May themselves be the
        /// declaring type's own parameters (the identity instantiation).
        args: Vec<TypeArg>,
    },
}

impl TypeRef {
    /// Returns the token of the underlying type definition.
    #[must_use]
    pub fn token(&self) -> Token {
        match self {
            TypeRef::Def(token) => *token,
            TypeRef::GenericInst { def, .. } => *def,
        }
    }

    /// Returns the identity instantiation of a type with `param_count` own
    /// parameters, or the bare definition when the count is zero.
    #[must_use]
    pub fn identity(def: Token, param_count: u16) -> Self {
        if param_count == 0 {
            TypeRef::Def(def)
        } else {
            TypeRef::GenericInst {
                def,
                args: (0..param_count).map(TypeArg::Param).collect(),
            }
        }
    }
}

/// A reference to a field, qualified by its declaring type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    /// Declaring type of the field.
    pub declaring: TypeRef,
    /// Token of the field definition.
    pub field: Token,
}

impl FieldRef {
    /// Creates a field reference on the bare declaring type.
    #[must_use]
    pub fn new(declaring: Token, field: Token) -> Self {
        Self {
            declaring: TypeRef::Def(declaring),
            field,
        }
    }
}

/// Runtime services callable from instrumented initializers.
///
/// These model the module-wide dispatcher's registration entry points; the
/// instrumentation splices calls to them at the end of each eligible type's
/// initializer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Intrinsic {
    /// Registers the callable on the stack into the unload channel.
    RegisterUnload,
    /// Registers the callable on the stack into the load channel.
    RegisterLoad,
}

/// A reference to a callable method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodRef {
    /// A static method defined in the module.
    User {
        /// Declaring type of the method.
        declaring: TypeRef,
        /// Token of the method definition.
        method: Token,
    },
    /// A runtime dispatcher service.
    Intrinsic(Intrinsic),
}

impl MethodRef {
    /// Creates a user method reference on the bare declaring type.
    #[must_use]
    pub fn user(declaring: Token, method: Token) -> Self {
        MethodRef::User {
            declaring: TypeRef::Def(declaring),
            method,
        }
    }
}
