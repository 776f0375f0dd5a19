//! Executable body representation: instructions, locals, exception regions.

use crate::assembly::instruction::Instruction;
use crate::metadata::field::StorageType;

/// Kind of an exception handling region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Catch handler.
    Catch,
    /// Finally handler.
    Finally,
}

/// One exception handling region of a body.
///
/// Offsets are instruction indices. The initializer copier clones regions
/// verbatim alongside the instruction sequence; the engine never restructures
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionRegion {
    /// Kind of the handler.
    pub kind: RegionKind,
    /// First instruction of the protected range.
    pub try_start: u32,
    /// One past the last instruction of the protected range.
    pub try_end: u32,
    /// First instruction of the handler.
    pub handler_start: u32,
    /// One past the last instruction of the handler.
    pub handler_end: u32,
}

/// An executable body owned by a method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodBody {
    /// Maximum evaluation stack depth.
    pub max_stack: u16,
    /// Local variable slots, in declaration order.
    pub locals: Vec<StorageType>,
    /// Instruction sequence.
    pub instructions: Vec<Instruction>,
    /// Exception handling regions.
    pub exception_regions: Vec<ExceptionRegion>,
}

impl MethodBody {
    /// Creates an empty body containing a single `Ret`.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            max_stack: 0,
            locals: Vec::new(),
            instructions: vec![Instruction::Ret],
            exception_regions: Vec::new(),
        }
    }

    /// Number of instructions in the body.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// Returns `true` if the body holds no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
