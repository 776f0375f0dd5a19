//! Runtime value representation for executing instrumented bodies.

use crate::metadata::{field::StorageType, generics::TypeInstance, token::Token};

/// A callable handle bound to no instance: a static method on a closed
/// instantiation of its declaring type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodHandle {
    /// Closed instantiation of the declaring type.
    pub declaring: TypeInstance,
    /// Token of the method definition.
    pub method: Token,
}

/// A runtime value on the evaluation stack, in a local slot or in static
/// storage.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Null reference. The blank value of reference-typed storage.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 16-bit Unicode character.
    Char(char),
    /// 32-bit signed integer.
    I4(i32),
    /// 64-bit signed integer.
    I8(i64),
    /// 32-bit floating point.
    R4(f32),
    /// 64-bit floating point.
    R8(f64),
    /// String reference.
    String(String),
    /// A callable handle produced by `ldftn`.
    Method(MethodHandle),
}

impl Value {
    /// The zero/default representation of a storage type: the value the
    /// runtime assigns before any initializer ever ran.
    #[must_use]
    pub fn default_for(storage: StorageType) -> Value {
        match storage {
            StorageType::Bool => Value::Bool(false),
            StorageType::Char => Value::Char('\0'),
            StorageType::I4 => Value::I4(0),
            StorageType::I8 => Value::I8(0),
            StorageType::R4 => Value::R4(0.0),
            StorageType::R8 => Value::R8(0.0),
            StorageType::String | StorageType::Object => Value::Null,
        }
    }

    /// Returns `true` for the null reference.
    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_blank() {
        assert_eq!(Value::default_for(StorageType::I4), Value::I4(0));
        assert_eq!(Value::default_for(StorageType::Bool), Value::Bool(false));
        assert_eq!(Value::default_for(StorageType::Char), Value::Char('\0'));
        assert!(Value::default_for(StorageType::String).is_null());
        assert!(Value::default_for(StorageType::Object).is_null());
    }
}
