//! Assembler errors

use fwemu_runtime::RuntimeError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum AssemblerError {
    #[error("Syntax error at line {line}: {message}")]
    SyntaxError { line: usize, message: String },

    #[error("Unknown instruction at line {line}: {mnemonic}")]
    UnknownInstruction { line: usize, mnemonic: String },

    #[error("Line {line}: {mnemonic} expects {expected} arguments, {found} were given")]
    ArgumentCount {
        line: usize,
        mnemonic: String,
        expected: usize,
        found: usize,
    },

    #[error("Line {line}: argument {value} does not fit in {width} bits")]
    FieldOverflow {
        line: usize,
        value: String,
        width: u32,
    },

    #[error("Line {line}: label {label} already defined at instruction {previous}")]
    DuplicateLabel {
        line: usize,
        label: String,
        previous: usize,
    },

    #[error("Failed to load program: {0}")]
    Load(#[from] RuntimeError),
}

impl AssemblerError {
    /// Attach a source line number
    pub(crate) fn at_line(self, at: usize) -> Self {
        match self {
            AssemblerError::SyntaxError { message, .. } => {
                AssemblerError::SyntaxError { line: at, message }
            }
            AssemblerError::UnknownInstruction { mnemonic, .. } => {
                AssemblerError::UnknownInstruction { line: at, mnemonic }
            }
            AssemblerError::ArgumentCount { mnemonic, expected, found, .. } => {
                AssemblerError::ArgumentCount { line: at, mnemonic, expected, found }
            }
            AssemblerError::FieldOverflow { value, width, .. } => {
                AssemblerError::FieldOverflow { line: at, value, width }
            }
            AssemblerError::DuplicateLabel { label, previous, .. } => {
                AssemblerError::DuplicateLabel { line: at, label, previous }
            }
            other => other,
        }
    }

    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        AssemblerError::SyntaxError {
            line,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
