//! Field definitions and static storage typing.

use bitflags::bitflags;

use crate::metadata::{
    marker::{has_marker, Marker, MarkerKind},
    token::Token,
};

/// The storage type of a static state item.
///
/// This is the small slice of the type system the reset engine needs: enough
/// to know each item's zero/default representation (the value the runtime
/// assigns before any initializer ever ran) and to key generic
/// instantiations. Reference-typed storage is collapsed to [`StorageType::Object`]
/// and [`StorageType::String`]; the reset semantics only depend on the blank
/// value, not on the full type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageType {
    /// Boolean, blanks to `false`.
    Bool,
    /// 16-bit Unicode character, blanks to `'\0'`.
    Char,
    /// 32-bit signed integer, blanks to 0.
    I4,
    /// 64-bit signed integer, blanks to 0.
    I8,
    /// 32-bit floating point, blanks to 0.0.
    R4,
    /// 64-bit floating point, blanks to 0.0.
    R8,
    /// String reference, blanks to null.
    String,
    /// Any other object reference, blanks to null.
    Object,
}

bitflags! {
    /// Attribute flags for a field definition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct FieldFlags: u16 {
        /// Field is static (type-scoped rather than instance-scoped).
        const STATIC = 0x0001;
        /// Field is private.
        const PRIVATE = 0x0002;
        /// Field is compiler-owned backing storage.
        const GENERATED = 0x0004;
    }
}

/// A field definition owned by a [`crate::metadata::typedef::TypeDefinition`].
#[derive(Debug, Clone)]
pub struct Field {
    /// Token identifying this field within the module.
    pub token: Token,
    /// Declared name. Backing fields follow the compiler naming convention
    /// (`<Prop>k__BackingField` for properties, the event name for events).
    pub name: String,
    /// Declared storage type.
    pub storage: StorageType,
    /// Attribute flags.
    pub flags: FieldFlags,
    /// Declarative markers attached to the field.
    pub markers: Vec<Marker>,
}

impl Field {
    /// Creates a static field with the given token, name and storage type.
    #[must_use]
    pub fn new_static(token: Token, name: impl Into<String>, storage: StorageType) -> Self {
        Self {
            token,
            name: name.into(),
            storage,
            flags: FieldFlags::STATIC,
            markers: Vec::new(),
        }
    }

    /// Adds a marker to the field.
    #[must_use]
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    /// Adds flags to the field.
    #[must_use]
    pub fn with_flags(mut self, flags: FieldFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Returns `true` if the field is static.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(FieldFlags::STATIC)
    }

    /// Returns `true` if the field is compiler-owned backing storage.
    ///
    /// Both the GENERATED flag and the [`MarkerKind::CompilerGenerated`]
    /// marker qualify; compilers differ in which one they emit.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.flags.contains(FieldFlags::GENERATED)
            || has_marker(&self.markers, MarkerKind::CompilerGenerated)
    }

    /// Returns `true` if the field is individually opted out of reset.
    #[must_use]
    pub fn is_opted_out(&self) -> bool {
        has_marker(&self.markers, MarkerKind::ResetOptOut)
    }
}
