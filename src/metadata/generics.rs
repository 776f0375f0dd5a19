//! Generic parameters, type arguments and closed instantiation keys.
//!
//! A type's own parameters form its generic context: the set of arguments
//! every reference to the type's members must carry to be valid outside the
//! type's own body. The transformation engine works with open arguments
//! ([`TypeArg::Param`]); the runtime closes them against the executing
//! instantiation to form [`TypeInstance`] keys.

use crate::metadata::{field::StorageType, token::Token};

/// One generic parameter declared by a type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenericParam {
    /// Declared parameter name (`T`, `TKey`, ...). Informational only.
    pub name: String,
    /// Zero-based position within the declaring type's parameter list.
    pub index: u16,
}

impl GenericParam {
    /// Creates a generic parameter.
    #[must_use]
    pub fn new(name: impl Into<String>, index: u16) -> Self {
        Self {
            name: name.into(),
            index,
        }
    }
}

/// A type argument inside a (possibly open) generic instantiation.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeArg {
    /// The declaring type's own parameter at this position.
    ///
    /// An instantiation whose arguments are all `Param(0..n)` is the identity
    /// instantiation the generic-context rewriter produces.
    Param(u16),
    /// A concrete primitive/reference storage type.
    Primitive(StorageType),
}

/// A closed generic instantiation of a type definition.
///
/// This is the runtime identity under which static storage is allocated and
/// type initializers run once: `Counter<int>` and `Counter<long>` are two
/// distinct instances with independent static slots and independent
/// registrations. Non-generic types use an empty argument list.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeInstance {
    /// Token of the type definition.
    pub def: Token,
    /// Concrete type arguments, one per declared parameter.
    pub args: Vec<StorageType>,
}

impl TypeInstance {
    /// Creates a closed instantiation.
    #[must_use]
    pub fn new(def: Token, args: Vec<StorageType>) -> Self {
        Self { def, args }
    }

    /// Creates the instantiation of a non-generic type.
    #[must_use]
    pub fn non_generic(def: Token) -> Self {
        Self {
            def,
            args: Vec::new(),
        }
    }
}
