//! Property and event definitions.
//!
//! Properties and events matter to the reset engine only through their
//! compiler-owned backing fields: opting a property or event out removes its
//! backing field from the static-state inventory as a unit. The backing field
//! is matched by the compiler naming convention plus the generated marker, so
//! a user-declared field that happens to share the name is never removed.

use crate::metadata::marker::{has_marker, Marker, MarkerKind};

/// A property definition owned by a [`crate::metadata::typedef::TypeDefinition`].
#[derive(Debug, Clone)]
pub struct Property {
    /// Declared name.
    pub name: String,
    /// `true` when every accessor of the property is static.
    ///
    /// Only fully static properties participate in inventory filtering;
    /// instance properties have no static backing storage.
    pub accessors_static: bool,
    /// Declarative markers attached to the property.
    pub markers: Vec<Marker>,
}

impl Property {
    /// Creates a property whose accessors are all static.
    #[must_use]
    pub fn new_static(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accessors_static: true,
            markers: Vec::new(),
        }
    }

    /// Adds a marker to the property.
    #[must_use]
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    /// Returns the compiler backing-field name for this property.
    #[must_use]
    pub fn backing_field_name(&self) -> String {
        format!("<{}>k__BackingField", self.name)
    }

    /// Returns `true` if the property is opted out of reset as a unit.
    #[must_use]
    pub fn is_opted_out(&self) -> bool {
        has_marker(&self.markers, MarkerKind::ResetOptOut)
    }
}

/// An event definition owned by a [`crate::metadata::typedef::TypeDefinition`].
#[derive(Debug, Clone)]
pub struct Event {
    /// Declared name. The compiler backing field is named identically.
    pub name: String,
    /// `true` when every accessor of the event is static.
    pub accessors_static: bool,
    /// Declarative markers attached to the event.
    pub markers: Vec<Marker>,
}

impl Event {
    /// Creates an event whose accessors are all static.
    #[must_use]
    pub fn new_static(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            accessors_static: true,
            markers: Vec::new(),
        }
    }

    /// Adds a marker to the event.
    #[must_use]
    pub fn with_marker(mut self, marker: Marker) -> Self {
        self.markers.push(marker);
        self
    }

    /// Returns the compiler backing-field name for this event.
    ///
    /// Events back onto a field carrying the event's own name.
    #[must_use]
    pub fn backing_field_name(&self) -> String {
        self.name.clone()
    }

    /// Returns `true` if the event is opted out of reset as a unit.
    #[must_use]
    pub fn is_opted_out(&self) -> bool {
        has_marker(&self.markers, MarkerKind::ResetOptOut)
    }
}
