//! Type definitions: the unit of analysis for the reset engine.

use crate::metadata::{
    field::Field,
    generics::GenericParam,
    marker::{has_marker, Marker, MarkerKind},
    method::Method,
    property::{Event, Property},
    token::Token,
};

/// A named type, possibly generic, possibly nested inside another type.
///
/// Owns its static storage, methods, properties and events, and at most one
/// type initializer. The invariant "at most one initializer" is enforced when
/// the type is added to a [`crate::metadata::module::Module`].
#[derive(Debug, Clone)]
pub struct TypeDefinition {
    /// Token identifying this type within the module.
    pub token: Token,
    /// Namespace, empty for nested types.
    pub namespace: String,
    /// Declared name.
    pub name: String,
    /// Token of the enclosing type when this type is nested.
    pub enclosing: Option<Token>,
    /// The type's own generic parameters. Parameters inherited from an
    /// enclosing generic type are included here, matching how compilers
    /// flatten nested generic contexts.
    pub generic_params: Vec<GenericParam>,
    /// Field definitions in declaration order.
    pub fields: Vec<Field>,
    /// Property definitions.
    pub properties: Vec<Property>,
    /// Event definitions.
    pub events: Vec<Event>,
    /// Method definitions, including the initializer when present.
    pub methods: Vec<Method>,
    /// Declarative markers attached to the type.
    pub markers: Vec<Marker>,
}

impl TypeDefinition {
    /// Creates an empty type definition.
    #[must_use]
    pub fn new(token: Token, namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            token,
            namespace: namespace.into(),
            name: name.into(),
            enclosing: None,
            generic_params: Vec::new(),
            fields: Vec::new(),
            properties: Vec::new(),
            events: Vec::new(),
            methods: Vec::new(),
            markers: Vec::new(),
        }
    }

    /// Returns the namespace-qualified name.
    #[must_use]
    pub fn full_name(&self) -> String {
        if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        }
    }

    /// Returns `true` if the type has its own generic parameters.
    #[must_use]
    pub fn is_generic(&self) -> bool {
        !self.generic_params.is_empty()
    }

    /// Returns `true` if the type is explicitly opted out of reset.
    #[must_use]
    pub fn is_opted_out(&self) -> bool {
        has_marker(&self.markers, MarkerKind::ResetOptOut)
    }

    /// Returns the type initializer, if the type has one.
    #[must_use]
    pub fn initializer(&self) -> Option<&Method> {
        self.methods.iter().find(|m| m.is_initializer())
    }

    /// Returns a mutable reference to the type initializer.
    pub fn initializer_mut(&mut self) -> Option<&mut Method> {
        self.methods.iter_mut().find(|m| m.is_initializer())
    }

    /// Looks up a field by token.
    #[must_use]
    pub fn field(&self, token: Token) -> Option<&Field> {
        self.fields.iter().find(|f| f.token == token)
    }

    /// Returns the slot index of a field within this type's declaration order.
    #[must_use]
    pub fn field_index(&self, token: Token) -> Option<usize> {
        self.fields.iter().position(|f| f.token == token)
    }

    /// Looks up a field by name.
    #[must_use]
    pub fn field_by_name(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Looks up a method by token.
    #[must_use]
    pub fn method(&self, token: Token) -> Option<&Method> {
        self.methods.iter().find(|m| m.token == token)
    }

    /// Looks up a method by name.
    #[must_use]
    pub fn method_by_name(&self, name: &str) -> Option<&Method> {
        self.methods.iter().find(|m| m.name == name)
    }
}
