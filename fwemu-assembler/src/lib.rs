//! fwemu Assembler
//!
//! Translate mnemonic assembly into packed instruction words for a given
//! instruction set.
//!
//! ## Example
//!
//! ```rust
//! use fwemu_assembler::assemble;
//! use fwemu_spec::InstructionSet;
//!
//! let isa = InstructionSet::from_json(r#"{
//!     "commands": [{"NOP": {}}, {"DECR": {"register_address": 2}}, {"JMP": {"command_address": 3}}],
//!     "commands_size": 3, "command_size": 8, "cop_size": 2,
//!     "memory_size": 2, "register_file": 2, "literal_size": 4
//! }"#).unwrap();
//!
//! let program = assemble("L0: DECR 0\nJMP L0", &isa, 0).unwrap();
//! assert_eq!(program.words[0].to_string(), "01000000");
//! assert_eq!(program.words[1].to_string(), "10000000");
//! ```

pub mod assembler;
pub mod encoder;
pub mod error;
pub mod lexer;
pub mod parser;

pub use assembler::{assemble, load_source, Program};
pub use encoder::encode;
pub use error::{AssemblerError, Result};
pub use parser::{parse_line, Argument, Line};
