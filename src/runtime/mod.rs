//! The runtime half of the reset lifecycle.
//!
//! An instrumented module is loaded into a [`RuntimeImage`], which owns the
//! module's per-instantiation static storage and its [`DispatchRegistry`].
//! Running a type's initializer (once per closed instantiation) executes the
//! spliced registration calls, populating the registry; the
//! [`ReloadOrchestrator`] later drains both channels, once per reload event,
//! with failure containment at the cycle boundary.

pub mod image;
pub mod interpreter;
pub mod orchestrator;
pub mod registry;
pub mod statics;
pub mod value;

pub use image::RuntimeImage;
pub use orchestrator::{
    CollectionBarrier, NoopBarrier, ReloadOrchestrator, ReloadOutcome, ReloadPhase,
};
pub use registry::{Channel, DispatchRegistry, ResetAction};
pub use statics::StaticStore;
pub use value::{MethodHandle, Value};
