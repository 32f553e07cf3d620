//! # fwemu Instruction-Set Model
//!
//! Data model shared by the fwemu assembler and runtime: a configurable,
//! fixed-width instruction set described entirely by data.
//!
//! ## Key Features
//! - Every machine value is a [`BitVector`]
//! - Instruction widths, opcode width, and storage sizes come from [`Config`]
//! - Opcode value = position of the instruction shape in the catalog
//! - Operand fields are laid out in catalog declaration order
//!
//! ## Example
//!
//! ```rust
//! use fwemu_spec::{Instruction, InstructionSet};
//!
//! let isa = InstructionSet::from_json(r#"{
//!     "commands": [{"NOP": {}}, {"DECR": {"register_address": 2}}],
//!     "commands_size": 3, "command_size": 8, "cop_size": 2,
//!     "memory_size": 2, "register_file": 2, "literal_size": 4
//! }"#).unwrap();
//!
//! let word = "01100000".parse().unwrap();
//! assert_eq!(isa.decode(&word), Instruction::Decr { register_address: 2 });
//! ```

pub mod bits;
pub mod config;
pub mod error;
pub mod instruction;
pub mod isa;

pub use bits::{BitVector, ParseBitsError, MAX_UINT_BITS};
pub use config::{Config, ConfigError, MAX_ADDRESS_BITS, MAX_COMMAND_BITS, MAX_STORAGE_BITS};
pub use error::{IsaError, Result};
pub use instruction::{Instruction, InstructionKind};
pub use isa::{Field, InstructionSet, Shape};
