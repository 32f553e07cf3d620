//! # Error Types for the Instruction-Set Definition

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum IsaError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    #[error("Malformed instruction-set document: {0}")]
    Json(#[from] serde_json::Error),

    // Catalog errors
    #[error("{count} commands do not fit in a {cop_size}-bit opcode")]
    TooManyCommands { count: usize, cop_size: u32 },

    #[error("Command {command} needs {bits} bits but command_size is {command_size}")]
    ShapeTooWide {
        command: String,
        bits: u64,
        command_size: u32,
    },

    #[error("Field {field} of {command} has invalid width {width} (valid range: 1-64)")]
    FieldWidth {
        command: String,
        field: String,
        width: u32,
    },

    #[error("Field {field} declared twice in {command}")]
    DuplicateField { command: String, field: String },

    #[error("Command {command} must declare exactly the fields [{expected}]")]
    ShapeMismatch { command: String, expected: String },
}

pub type Result<T> = std::result::Result<T, IsaError>;
