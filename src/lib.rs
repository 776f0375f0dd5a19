// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]

//! # cilreset
//!
//! Static-state reset instrumentation for CIL-style modules.
//!
//! `cilreset` gives statically-scoped program state a reset lifecycle: it
//! transforms a compiled module so that, on a host-triggered reload event,
//! every eligible type's static storage is restored to its original startup
//! values without destroying and reloading the whole process. The crate
//! covers both halves of that lifecycle:
//!
//! - **Transformation** ([`transform`]) — runs once per module, ahead of
//!   execution. For each eligible type it duplicates the original type
//!   initializer into an independently callable unit, synthesizes an unload
//!   unit (ordered pre-reset callbacks) and a load unit (blank all
//!   inventoried storage, then re-run the copied initializer), re-qualifies
//!   references on generic declaring types with identity instantiations, and
//!   splices dispatcher registration calls into the original initializer.
//! - **Runtime** ([`runtime`]) — a per-module [`runtime::DispatchRegistry`]
//!   with lock-free registration, populated as each eligible type's
//!   initializer first runs (once per generic instantiation), and the
//!   [`runtime::ReloadOrchestrator`] that drains the unload and load
//!   channels once per reload event with failure containment.
//!
//! ## Quick Start
//!
//! ```rust
//! use cilreset::prelude::*;
//! use std::sync::Arc;
//!
//! # fn main() -> cilreset::Result<()> {
//! // Author a module with one stateful type.
//! let ty_token = Token::type_def(1);
//! let field = Token::field(1);
//! let mut session = TypeDefinition::new(ty_token, "Game", "Session");
//! session
//!     .fields
//!     .push(Field::new_static(field, "seconds_left", StorageType::I4));
//! session.methods.push(Method::new_initializer(
//!     Token::method(1),
//!     BodyBuilder::new()
//!         .ldc_i4(60)
//!         .stsfld(FieldRef::new(ty_token, field))
//!         .ret()
//!         .build(),
//! ));
//!
//! let mut module = Module::new("Game.Core");
//! module.add_type(session)?;
//!
//! // Instrument, load, initialize, then run a reload cycle.
//! let diagnostics = Arc::new(Diagnostics::new());
//! ResetTransformer::new(Arc::clone(&diagnostics)).transform(&mut module)?;
//!
//! let image = RuntimeImage::load(module);
//! let instance = TypeInstance::non_generic(ty_token);
//! image.ensure_initialized(instance.clone())?;
//!
//! image.set_static_value(&instance, "seconds_left", Value::I4(3))?;
//!
//! let mut orchestrator = ReloadOrchestrator::new(diagnostics);
//! orchestrator.add_image(Arc::clone(&image));
//! assert_eq!(orchestrator.reload_dirty_types(), ReloadOutcome::Completed);
//! assert_eq!(
//!     image.static_value(&instance, "seconds_left"),
//!     Some(Value::I4(60))
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Scope
//!
//! The engine handles static state only; instance state is untouched. It
//! never reorders or infers dependencies between different types, and it
//! never reconstructs control flow — it only duplicates executable units and
//! splices calls. Transforming an already-transformed module is invalid
//! input and rejected.

#[macro_use]
pub(crate) mod error;

pub mod assembly;
pub mod diagnostics;
pub mod metadata;
pub mod runtime;
pub mod transform;

pub use error::Error;

/// Convenient Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Commonly used types, importable in one line.
pub mod prelude {
    pub use crate::assembly::{BodyBuilder, Instruction, MethodBody};
    pub use crate::diagnostics::{DiagnosticCategory, Diagnostics};
    pub use crate::metadata::{
        field::{Field, FieldFlags, StorageType},
        generics::{GenericParam, TypeArg, TypeInstance},
        marker::{Marker, MarkerArg, MarkerKind},
        method::{Method, MethodFlags},
        module::Module,
        property::{Event, Property},
        refs::{FieldRef, Intrinsic, MethodRef, TypeRef},
        token::Token,
        typedef::TypeDefinition,
    };
    pub use crate::runtime::{
        Channel, CollectionBarrier, DispatchRegistry, NoopBarrier, ReloadOrchestrator,
        ReloadOutcome, ReloadPhase, RuntimeImage, Value,
    };
    pub use crate::transform::{ResetTransformer, TransformStats};
    pub use crate::{Error, Result};
}
