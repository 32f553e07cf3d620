//! # fwemu Runtime
//!
//! Processor state and the fetch-decode-execute engine for fwemu programs.
//!
//! The engine fetches a word from program memory, reads its opcode field,
//! looks up the instruction shape at that catalog position, decodes the
//! operands, and applies the transition. There is no halt instruction: a run
//! ends when the instruction pointer reaches the end of program memory.
//!
//! ## Example
//!
//! ```rust
//! use fwemu_runtime::{Processor, VM, VMConfig, HaltReason};
//! use fwemu_spec::InstructionSet;
//!
//! let isa = InstructionSet::from_json(r#"{
//!     "commands": [{"NOP": {}}, {"DECR": {"register_address": 2}}],
//!     "commands_size": 2, "command_size": 4, "cop_size": 1,
//!     "memory_size": 1, "register_file": 2, "literal_size": 4
//! }"#).unwrap();
//!
//! let mut processor = Processor::from_config(&isa.config).unwrap();
//! processor.load_prog(&["1000".parse().unwrap()]).unwrap();
//! processor.set_register(0, &"0101".parse().unwrap()).unwrap();
//!
//! let result = VM::new(&isa, &mut processor, VMConfig::default()).run().unwrap();
//! assert_eq!(result.halt_reason, HaltReason::EndOfProgram);
//! assert_eq!(processor.registers()[0].to_uint(), 4);
//! ```

pub mod error;
pub mod execute;
pub mod state;
pub mod vm;

pub use error::{Result, RuntimeError};
pub use execute::execute;
pub use state::{HaltReason, Processor};
pub use vm::{ExecutionResult, StepOutcome, VMConfig, VM};

/// Run a loaded processor from slot 0 until the end of program memory
pub fn run(isa: &fwemu_spec::InstructionSet, state: &mut Processor) -> Result<ExecutionResult> {
    VM::new(isa, state, VMConfig::default()).run()
}
