//! # Machine Configuration
//!
//! The six scalar parameters that size the emulated machine. Sizes of the
//! program memory, data memory, and register file are given as log2 of the
//! slot count; widths are given in bits.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::bits::MAX_UINT_BITS;

/// Largest log2 size accepted for any storage array
pub const MAX_ADDRESS_BITS: u32 = 24;

/// Widest instruction word
pub const MAX_COMMAND_BITS: u32 = 1024;

/// Upper bound on program memory plus data memory plus registers, in bits
pub const MAX_STORAGE_BITS: u64 = 1 << 32;

/// Machine geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Config {
    /// log2 of the number of program-memory slots
    pub commands_size: u32,
    /// Width of one instruction word in bits
    pub command_size: u32,
    /// Width of the opcode field in bits
    pub cop_size: u32,
    /// log2 of the number of data-memory cells
    pub memory_size: u32,
    /// log2 of the number of registers
    pub register_file: u32,
    /// Width of a memory cell, register, stack entry, and literal
    pub literal_size: u32,
}

impl Config {
    /// Create a new configuration with validation
    pub fn new(
        commands_size: u32,
        command_size: u32,
        cop_size: u32,
        memory_size: u32,
        register_file: u32,
        literal_size: u32,
    ) -> Result<Self, ConfigError> {
        let config = Self {
            commands_size,
            command_size,
            cop_size,
            memory_size,
            register_file,
            literal_size,
        };
        config.validate()?;
        Ok(config)
    }

    /// Number of program-memory slots
    #[inline]
    pub const fn program_slots(&self) -> usize {
        1 << self.commands_size
    }

    /// Number of data-memory cells
    #[inline]
    pub const fn memory_cells(&self) -> usize {
        1 << self.memory_size
    }

    /// Number of registers
    #[inline]
    pub const fn register_count(&self) -> usize {
        1 << self.register_file
    }

    /// Number of distinct opcodes the opcode field can hold
    #[inline]
    pub const fn opcode_capacity(&self) -> u128 {
        1u128 << self.cop_size
    }

    /// Total bits held by program memory, data memory and registers.
    ///
    /// Only meaningful once the log2 sizes are within [`MAX_ADDRESS_BITS`].
    pub fn storage_bits(&self) -> u64 {
        let program = (self.program_slots() as u64) * self.command_size as u64;
        let cells = (self.memory_cells() + self.register_count()) as u64;
        program + cells * self.literal_size as u64
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.literal_size == 0 || self.literal_size as usize > MAX_UINT_BITS {
            return Err(ConfigError::InvalidLiteralSize(self.literal_size));
        }
        if self.cop_size as usize > MAX_UINT_BITS {
            return Err(ConfigError::InvalidCopSize(self.cop_size));
        }
        if self.command_size > MAX_COMMAND_BITS {
            return Err(ConfigError::CommandTooWide(self.command_size));
        }
        if self.cop_size > self.command_size {
            return Err(ConfigError::CopWiderThanCommand {
                cop_size: self.cop_size,
                command_size: self.command_size,
            });
        }

        for (name, value) in [
            ("commands_size", self.commands_size),
            ("memory_size", self.memory_size),
            ("register_file", self.register_file),
        ] {
            if value > MAX_ADDRESS_BITS {
                return Err(ConfigError::AddressSpaceTooLarge { name, value });
            }
        }

        let bits = self.storage_bits();
        if bits > MAX_STORAGE_BITS {
            return Err(ConfigError::StorageTooLarge { bits });
        }

        Ok(())
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "commands_size={}, command_size={}, cop_size={}, memory_size={}, register_file={}, literal_size={}",
            self.commands_size,
            self.command_size,
            self.cop_size,
            self.memory_size,
            self.register_file,
            self.literal_size,
        )
    }
}

/// Configuration error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// literal_size must be in range [1, 64]
    InvalidLiteralSize(u32),
    /// cop_size must be at most 64
    InvalidCopSize(u32),
    /// The opcode field must fit inside the instruction word
    CopWiderThanCommand { cop_size: u32, command_size: u32 },
    /// command_size must be at most MAX_COMMAND_BITS
    CommandTooWide(u32),
    /// A log2 storage size exceeds MAX_ADDRESS_BITS
    AddressSpaceTooLarge { name: &'static str, value: u32 },
    /// The machine as a whole would exceed MAX_STORAGE_BITS
    StorageTooLarge { bits: u64 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidLiteralSize(bits) => {
                write!(f, "literal_size must be in range [1, 64], got {}", bits)
            }
            ConfigError::InvalidCopSize(bits) => {
                write!(f, "cop_size must be at most 64, got {}", bits)
            }
            ConfigError::CommandTooWide(bits) => {
                write!(f, "command_size must be at most {}, got {}", MAX_COMMAND_BITS, bits)
            }
            ConfigError::CopWiderThanCommand { cop_size, command_size } => {
                write!(
                    f,
                    "cop_size {} exceeds command_size {}",
                    cop_size, command_size
                )
            }
            ConfigError::AddressSpaceTooLarge { name, value } => {
                write!(
                    f,
                    "{} must be at most {}, got {}",
                    name, MAX_ADDRESS_BITS, value
                )
            }
            ConfigError::StorageTooLarge { bits } => {
                write!(f, "machine needs {} bits of storage, limit is {}", bits, MAX_STORAGE_BITS)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
