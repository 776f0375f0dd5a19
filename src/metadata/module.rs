//! The module: the compiled unit the transformation engine operates on.

use std::collections::BTreeMap;

use crate::metadata::{token::Token, typedef::TypeDefinition};
use crate::{Error, Result};

/// A compiled module owning a tree of type definitions.
///
/// The transformation engine owns and mutates the module for exactly one
/// pass; afterwards the module is handed to the host (loaded into a
/// [`crate::runtime::RuntimeImage`]) and the engine holds no further
/// reference. Nested types are stored flat and linked through
/// [`TypeDefinition::enclosing`].
#[derive(Debug, Clone)]
pub struct Module {
    /// Module name.
    pub name: String,
    /// Set once the reset transformation has run. A module with this flag is
    /// invalid input for a second pass.
    pub reset_instrumented: bool,
    types: BTreeMap<Token, TypeDefinition>,
    next_method_row: u32,
}

impl Module {
    /// Creates an empty module.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reset_instrumented: false,
            types: BTreeMap::new(),
            next_method_row: 1,
        }
    }

    /// Adds a type definition to the module.
    ///
    /// # Errors
    ///
    /// Returns [`Error::DuplicateInitializer`] if the type declares more than
    /// one type initializer, the one structural invariant the engine relies
    /// on.
    pub fn add_type(&mut self, type_def: TypeDefinition) -> Result<()> {
        let initializers = type_def
            .methods
            .iter()
            .filter(|m| m.is_initializer())
            .count();
        if initializers > 1 {
            return Err(Error::DuplicateInitializer {
                type_name: type_def.full_name(),
            });
        }

        for method in &type_def.methods {
            if method.token.row() >= self.next_method_row {
                self.next_method_row = method.token.row() + 1;
            }
        }

        self.types.insert(type_def.token, type_def);
        Ok(())
    }

    /// Allocates a fresh method token for a synthesized unit.
    pub fn alloc_method_token(&mut self) -> Token {
        let token = Token::method(self.next_method_row);
        self.next_method_row += 1;
        token
    }

    /// Looks up a type by token.
    #[must_use]
    pub fn type_def(&self, token: Token) -> Option<&TypeDefinition> {
        self.types.get(&token)
    }

    /// Looks up a type by token, mutably.
    pub fn type_def_mut(&mut self, token: Token) -> Option<&mut TypeDefinition> {
        self.types.get_mut(&token)
    }

    /// Looks up a type by namespace-qualified name.
    #[must_use]
    pub fn type_by_name(&self, full_name: &str) -> Option<&TypeDefinition> {
        self.types.values().find(|t| t.full_name() == full_name)
    }

    /// Iterates over all type definitions in token order.
    pub fn types(&self) -> impl Iterator<Item = &TypeDefinition> {
        self.types.values()
    }

    /// Tokens of all type definitions, in token order.
    #[must_use]
    pub fn type_tokens(&self) -> Vec<Token> {
        self.types.keys().copied().collect()
    }

    /// Number of type definitions in the module.
    #[must_use]
    pub fn type_count(&self) -> usize {
        self.types.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assembly::MethodBody;
    use crate::metadata::method::Method;

    #[test]
    fn test_duplicate_initializer_rejected() {
        let mut module = Module::new("Game.Core");
        let mut ty = TypeDefinition::new(Token::type_def(1), "Game", "Session");
        ty.methods
            .push(Method::new_initializer(Token::method(1), MethodBody::empty()));
        ty.methods
            .push(Method::new_initializer(Token::method(2), MethodBody::empty()));

        match module.add_type(ty) {
            Err(Error::DuplicateInitializer { type_name }) => {
                assert_eq!(type_name, "Game.Session");
            }
            other => panic!("expected DuplicateInitializer, got {other:?}"),
        }
    }

    #[test]
    fn test_method_token_allocation_skips_existing() {
        let mut module = Module::new("Game.Core");
        let mut ty = TypeDefinition::new(Token::type_def(1), "Game", "Session");
        ty.methods
            .push(Method::new_initializer(Token::method(5), MethodBody::empty()));
        module.add_type(ty).unwrap();

        assert_eq!(module.alloc_method_token(), Token::method(6));
        assert_eq!(module.alloc_method_token(), Token::method(7));
    }

    #[test]
    fn test_type_lookup() {
        let mut module = Module::new("Game.Core");
        module
            .add_type(TypeDefinition::new(Token::type_def(1), "Game", "Session"))
            .unwrap();

        assert!(module.type_def(Token::type_def(1)).is_some());
        assert!(module.type_by_name("Game.Session").is_some());
        assert_eq!(module.type_count(), 1);
    }
}
