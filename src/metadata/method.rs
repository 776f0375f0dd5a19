//! Method definitions.

use bitflags::bitflags;

use crate::assembly::MethodBody;
use crate::metadata::{
    marker::{find_marker, has_marker, Marker, MarkerKind},
    token::Token,
};

/// Name of a type initializer.
pub const TYPE_INITIALIZER_NAME: &str = ".cctor";

bitflags! {
    /// Attribute flags for a method definition.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MethodFlags: u16 {
        /// Method is static.
        const STATIC = 0x0001;
        /// Method is private.
        const PRIVATE = 0x0002;
        /// Method is a synthesized artifact of the reset engine.
        ///
        /// Generated units are invisible to ordinary callers and are never
        /// themselves re-analyzed as eligible state.
        const GENERATED = 0x0004;
        /// Method has a special name recognized by the runtime (`.cctor`).
        const RT_SPECIAL_NAME = 0x0008;
    }
}

/// A method definition owned by a [`crate::metadata::typedef::TypeDefinition`].
#[derive(Debug, Clone)]
pub struct Method {
    /// Token identifying this method within the module.
    pub token: Token,
    /// Declared name.
    pub name: String,
    /// Attribute flags.
    pub flags: MethodFlags,
    /// Number of generic parameters the method itself declares.
    pub generic_arity: u16,
    /// Number of declared parameters.
    pub param_count: u8,
    /// `true` when the method returns a value.
    pub returns_value: bool,
    /// Declarative markers attached to the method.
    pub markers: Vec<Marker>,
    /// Executable body, if the method has one.
    pub body: Option<MethodBody>,
}

impl Method {
    /// Creates a static, void, zero-parameter method with the given body.
    ///
    /// This shape covers everything the reset engine touches: type
    /// initializers, unload callbacks and synthesized units.
    #[must_use]
    pub fn new_static(token: Token, name: impl Into<String>, body: MethodBody) -> Self {
        Self {
            token,
            name: name.into(),
            flags: MethodFlags::STATIC,
            generic_arity: 0,
            param_count: 0,
            returns_value: false,
            markers: Vec::new(),
            body: Some(body),
        }
    }

    /// Creates a type initializer with the given body.
    #[must_use]
    pub fn new_initializer(token: Token, body: MethodBody) -> Self {
        let mut method = Self::new_static(token, TYPE_INITIALIZER_NAME, body);
        method.flags |= MethodFlags::PRIVATE | MethodFlags::RT_SPECIAL_NAME;
        method
    }

    /// Adds a marker to the method.
    #[must_use]
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    /// Adds flags to the method.
    #[must_use]
    pub fn with_flags(mut self, flags: MethodFlags) -> Self {
        self.flags |= flags;
        self
    }

    /// Returns `true` if the method is static.
    #[must_use]
    pub fn is_static(&self) -> bool {
        self.flags.contains(MethodFlags::STATIC)
    }

    /// Returns `true` if this is the type initializer.
    #[must_use]
    pub fn is_initializer(&self) -> bool {
        self.name == TYPE_INITIALIZER_NAME
    }

    /// Returns `true` if the method is a synthesized artifact.
    #[must_use]
    pub fn is_generated(&self) -> bool {
        self.flags.contains(MethodFlags::GENERATED)
    }

    /// Returns `true` if the method qualifies as an unload callback: static,
    /// no own generic parameters, no parameters, void return, and carrying
    /// the pre-reset marker.
    #[must_use]
    pub fn is_unload_callback(&self) -> bool {
        self.is_static()
            && self.generic_arity == 0
            && self.param_count == 0
            && !self.returns_value
            && has_marker(&self.markers, MarkerKind::ResetOnUnload)
    }

    /// Returns the pre-reset marker, if present.
    #[must_use]
    pub fn unload_marker(&self) -> Option<&Marker> {
        find_marker(&self.markers, MarkerKind::ResetOnUnload)
    }
}
