//! Static state inventory: which storage items a type resets.
//!
//! Pure analysis with no side effects. An empty inventory is a valid, common
//! result, not an error.

use crate::metadata::{token::Token, typedef::TypeDefinition};

/// Enumerates a type's static storage eligible for reset, in declaration
/// order.
///
/// Includes every static field not individually opted out. For static
/// properties and events that are opted out as a unit, the compiler-owned
/// backing field is removed from the inventory — matched by the backing-field
/// naming convention *and* the generated marker, so a user-declared field
/// that happens to share the name survives.
#[must_use]
pub fn build_inventory(type_def: &TypeDefinition) -> Vec<Token> {
    let mut items: Vec<Token> = type_def
        .fields
        .iter()
        .filter(|f| f.is_static() && !f.is_opted_out())
        .map(|f| f.token)
        .collect();

    let mut excluded_backing_names: Vec<String> = Vec::new();

    for property in &type_def.properties {
        if property.accessors_static && property.is_opted_out() {
            excluded_backing_names.push(property.backing_field_name());
        }
    }

    for event in &type_def.events {
        if event.accessors_static && event.is_opted_out() {
            excluded_backing_names.push(event.backing_field_name());
        }
    }

    if !excluded_backing_names.is_empty() {
        items.retain(|token| {
            let Some(field) = type_def.field(*token) else {
                return true;
            };
            !(field.is_generated() && excluded_backing_names.iter().any(|n| *n == field.name))
        });
    }

    items
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::{
        field::{Field, FieldFlags, StorageType},
        marker::{Marker, MarkerKind},
        property::{Event, Property},
    };

    fn session_type() -> TypeDefinition {
        let mut ty = TypeDefinition::new(Token::type_def(1), "Game", "Session");
        ty.fields
            .push(Field::new_static(Token::field(1), "counter", StorageType::I4));
        ty.fields
            .push(Field::new_static(Token::field(2), "label", StorageType::String));
        ty
    }

    #[test]
    fn test_static_fields_included() {
        let inventory = build_inventory(&session_type());
        assert_eq!(inventory, vec![Token::field(1), Token::field(2)]);
    }

    #[test]
    fn test_opted_out_field_excluded() {
        let mut ty = session_type();
        ty.fields.push(
            Field::new_static(Token::field(3), "cache", StorageType::Object)
                .with_marker(Marker::new(MarkerKind::ResetOptOut)),
        );

        let inventory = build_inventory(&ty);
        assert!(!inventory.contains(&Token::field(3)));
        assert_eq!(inventory.len(), 2);
    }

    #[test]
    fn test_opted_out_property_removes_backing_field() {
        let mut ty = session_type();
        ty.fields.push(
            Field::new_static(
                Token::field(3),
                "<Count>k__BackingField",
                StorageType::I4,
            )
            .with_flags(FieldFlags::GENERATED),
        );
        ty.properties
            .push(Property::new_static("Count").with_marker(Marker::new(MarkerKind::ResetOptOut)));

        let inventory = build_inventory(&ty);
        assert!(!inventory.contains(&Token::field(3)));
    }

    #[test]
    fn test_user_field_sharing_backing_name_survives() {
        // Not generated, so the naming convention alone must not remove it.
        let mut ty = session_type();
        ty.fields.push(Field::new_static(
            Token::field(3),
            "<Count>k__BackingField",
            StorageType::I4,
        ));
        ty.properties
            .push(Property::new_static("Count").with_marker(Marker::new(MarkerKind::ResetOptOut)));

        let inventory = build_inventory(&ty);
        assert!(inventory.contains(&Token::field(3)));
    }

    #[test]
    fn test_opted_out_event_removes_backing_field() {
        let mut ty = session_type();
        ty.fields.push(
            Field::new_static(Token::field(3), "OnChanged", StorageType::Object)
                .with_flags(FieldFlags::GENERATED),
        );
        ty.events
            .push(Event::new_static("OnChanged").with_marker(Marker::new(MarkerKind::ResetOptOut)));

        let inventory = build_inventory(&ty);
        assert!(!inventory.contains(&Token::field(3)));
    }

    #[test]
    fn test_retained_property_keeps_backing_field() {
        let mut ty = session_type();
        ty.fields.push(
            Field::new_static(
                Token::field(3),
                "<Count>k__BackingField",
                StorageType::I4,
            )
            .with_flags(FieldFlags::GENERATED),
        );
        ty.properties.push(Property::new_static("Count"));

        let inventory = build_inventory(&ty);
        assert!(inventory.contains(&Token::field(3)));
    }

    #[test]
    fn test_empty_inventory_is_valid() {
        let ty = TypeDefinition::new(Token::type_def(1), "Game", "Empty");
        assert!(build_inventory(&ty).is_empty());
    }
}
