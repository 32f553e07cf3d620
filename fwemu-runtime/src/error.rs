//! Runtime error types

use fwemu_spec::ConfigError;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Invalid machine geometry: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Got {requested} size program while {available} slots are available")]
    CapacityExceeded { requested: usize, available: usize },

    #[error("Got {found} size command at slot {slot} while expecting {expected} size command")]
    WidthMismatch {
        slot: usize,
        expected: usize,
        found: usize,
    },

    #[error("Pop from empty stack at PC {pc}")]
    EmptyStack { pc: usize },

    #[error("{region} index {index} out of bounds (size {size})")]
    OutOfBounds {
        region: &'static str,
        index: usize,
        size: usize,
    },

    #[error("Instruction pointer {pc} is past the end of program memory ({size} slots)")]
    PcOutOfRange { pc: usize, size: usize },
}

impl RuntimeError {
    /// Errors raised while the engine is running, as opposed to program loading
    pub fn is_execution_error(&self) -> bool {
        matches!(
            self,
            RuntimeError::EmptyStack { .. }
                | RuntimeError::OutOfBounds { .. }
                | RuntimeError::PcOutOfRange { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
