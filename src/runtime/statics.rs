//! Per-instantiation static storage.
//!
//! Static storage is keyed by closed type instantiation: each distinct
//! instantiation of a generic type owns an independent slot vector, exactly
//! as the runtime allocates independent statics per instantiation. Slot
//! indices follow the declaring type's field declaration order.

use dashmap::DashMap;

use crate::metadata::{generics::TypeInstance, typedef::TypeDefinition};
use crate::runtime::value::Value;

/// Concurrent store of static slot vectors, one per closed instantiation.
#[derive(Debug, Default)]
pub struct StaticStore {
    slots: DashMap<TypeInstance, Vec<Value>>,
}

impl StaticStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the slot vector for an instantiation if it does not exist,
    /// filling every slot with its field's blank value.
    pub fn ensure_slots(&self, instance: &TypeInstance, type_def: &TypeDefinition) {
        if !self.slots.contains_key(instance) {
            let defaults: Vec<Value> = type_def
                .fields
                .iter()
                .map(|f| Value::default_for(f.storage))
                .collect();
            self.slots.entry(instance.clone()).or_insert(defaults);
        }
    }

    /// Reads a slot value.
    #[must_use]
    pub fn read(&self, instance: &TypeInstance, slot: usize) -> Option<Value> {
        self.slots
            .get(instance)
            .and_then(|slots| slots.get(slot).cloned())
    }

    /// Writes a slot value. Returns `false` when the instantiation or slot
    /// does not exist.
    pub fn write(&self, instance: &TypeInstance, slot: usize, value: Value) -> bool {
        match self.slots.get_mut(instance) {
            Some(mut slots) => match slots.get_mut(slot) {
                Some(target) => {
                    *target = value;
                    true
                }
                None => false,
            },
            None => false,
        }
    }

    /// Number of instantiations holding slots.
    #[must_use]
    pub fn instantiation_count(&self) -> usize {
        self.slots.len()
    }
}
