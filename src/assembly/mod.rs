//! Executable body model: instruction set, bodies and the body builder.
//!
//! The reset engine treats method bodies as editable instruction sequences
//! plus a symbol table (locals and exception regions). It never reconstructs
//! or simplifies control flow; it only duplicates existing sequences and
//! splices calls, so the representation stays deliberately small.

mod body;
mod emitter;
mod instruction;

pub use body::{ExceptionRegion, MethodBody, RegionKind};
pub use emitter::BodyBuilder;
pub use instruction::Instruction;
