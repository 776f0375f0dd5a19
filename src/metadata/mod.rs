//! The module/type model the reset engine analyzes and mutates.
//!
//! This mirrors the slice of compiled-module metadata the reset lifecycle
//! cares about: type definitions with static storage (fields plus the backing
//! storage of properties and events), methods with executable bodies, the
//! per-type initializer, declarative markers, and generic contexts. Members
//! reference each other by [`token::Token`], keeping the mutable graph free
//! of aliasing.

pub mod field;
pub mod generics;
pub mod marker;
pub mod method;
pub mod module;
pub mod property;
pub mod refs;
/// Metadata tokens identifying rows in the definition tables.
pub mod token;
pub mod typedef;
