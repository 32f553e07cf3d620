//! Instruction kinds and decoded instructions
//!
//! A catalog entry's name selects its [`InstructionKind`]; the kind fixes the
//! set of operand fields the entry must declare. The bit layout of those
//! fields comes from the catalog, in declaration order.

use crate::bits::BitVector;
use std::fmt;

pub const MEMORY_ADDRESS: &str = "memory_address";
pub const REGISTER_ADDRESS: &str = "register_address";
pub const COMMAND_ADDRESS: &str = "command_address";
pub const LITERAL: &str = "literal";
pub const FIRST_OPERAND: &str = "first_operand";
pub const SECOND_OPERAND: &str = "second_operand";
pub const FIRST_REGISTER: &str = "first_register";
pub const SECOND_REGISTER: &str = "second_register";

/// Behaviour bound to a catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstructionKind {
    Nop,
    Ltm,
    Mtr,
    Jmpif,
    Mult,
    Rtm,
    Decr,
    Jmp,
    Push,
    Pop,
    Ltra,
    Ret,
    Pushra,
    Popra,
    Rtr,
    /// Name with no bound behaviour; executes as a no-op
    Unknown,
}

impl InstructionKind {
    pub const ALL: [InstructionKind; 15] = [
        InstructionKind::Nop,
        InstructionKind::Ltm,
        InstructionKind::Mtr,
        InstructionKind::Jmpif,
        InstructionKind::Mult,
        InstructionKind::Rtm,
        InstructionKind::Decr,
        InstructionKind::Jmp,
        InstructionKind::Push,
        InstructionKind::Pop,
        InstructionKind::Ltra,
        InstructionKind::Ret,
        InstructionKind::Pushra,
        InstructionKind::Popra,
        InstructionKind::Rtr,
    ];

    pub fn from_mnemonic(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|kind| kind.mnemonic() == name)
            .unwrap_or(InstructionKind::Unknown)
    }

    pub fn mnemonic(&self) -> &'static str {
        match self {
            InstructionKind::Nop => "NOP",
            InstructionKind::Ltm => "LTM",
            InstructionKind::Mtr => "MTR",
            InstructionKind::Jmpif => "JMPIF",
            InstructionKind::Mult => "MULT",
            InstructionKind::Rtm => "RTM",
            InstructionKind::Decr => "DECR",
            InstructionKind::Jmp => "JMP",
            InstructionKind::Push => "PUSH",
            InstructionKind::Pop => "POP",
            InstructionKind::Ltra => "LTRA",
            InstructionKind::Ret => "RET",
            InstructionKind::Pushra => "PUSHRA",
            InstructionKind::Popra => "POPRA",
            InstructionKind::Rtr => "RTR",
            InstructionKind::Unknown => "?",
        }
    }

    /// Field names a catalog entry of this kind must declare.
    ///
    /// `None` for [`InstructionKind::Unknown`], which accepts any fields.
    pub fn required_fields(&self) -> Option<&'static [&'static str]> {
        let fields: &'static [&'static str] = match self {
            InstructionKind::Nop
            | InstructionKind::Ret
            | InstructionKind::Pushra
            | InstructionKind::Popra => &[],
            InstructionKind::Ltm => &[MEMORY_ADDRESS, LITERAL],
            InstructionKind::Mtr | InstructionKind::Rtm => &[MEMORY_ADDRESS, REGISTER_ADDRESS],
            InstructionKind::Jmpif | InstructionKind::Jmp => &[COMMAND_ADDRESS],
            InstructionKind::Mult => &[FIRST_OPERAND, SECOND_OPERAND, REGISTER_ADDRESS],
            InstructionKind::Decr | InstructionKind::Push | InstructionKind::Pop => {
                &[REGISTER_ADDRESS]
            }
            InstructionKind::Ltra => &[LITERAL],
            InstructionKind::Rtr => &[FIRST_REGISTER, SECOND_REGISTER],
            InstructionKind::Unknown => return None,
        };
        Some(fields)
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

/// Decoded instruction with typed operands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// NOP: no operation
    Nop,

    /// LTM: memory[memory_address] = literal bits
    Ltm { memory_address: usize, literal: BitVector },

    /// MTR: registers[register_address] = memory[memory_address]
    Mtr { memory_address: usize, register_address: usize },

    /// JMPIF: jump to command_address when registers[0] > 1
    Jmpif { command_address: usize },

    /// MULT: registers[register_address] = registers[first_operand] * registers[second_operand]
    Mult {
        first_operand: usize,
        second_operand: usize,
        register_address: usize,
    },

    /// RTM: memory[memory_address] = registers[register_address]
    Rtm { memory_address: usize, register_address: usize },

    /// DECR: registers[register_address] -= 1 (wrapping)
    Decr { register_address: usize },

    /// JMP: jump to command_address
    Jmp { command_address: usize },

    /// PUSH: push registers[register_address]
    Push { register_address: usize },

    /// POP: registers[register_address] = pop
    Pop { register_address: usize },

    /// LTRA: ra = literal bits
    Ltra { literal: BitVector },

    /// RET: jump to ra
    Ret,

    /// PUSHRA: push ra
    Pushra,

    /// POPRA: ra = pop
    Popra,

    /// RTR: registers[second_register] = registers[first_register]
    Rtr { first_register: usize, second_register: usize },

    /// Opcode outside the catalog, or a catalog entry with no bound behaviour
    Unknown { opcode: u64 },
}

impl Instruction {
    pub fn kind(&self) -> InstructionKind {
        match self {
            Instruction::Nop => InstructionKind::Nop,
            Instruction::Ltm { .. } => InstructionKind::Ltm,
            Instruction::Mtr { .. } => InstructionKind::Mtr,
            Instruction::Jmpif { .. } => InstructionKind::Jmpif,
            Instruction::Mult { .. } => InstructionKind::Mult,
            Instruction::Rtm { .. } => InstructionKind::Rtm,
            Instruction::Decr { .. } => InstructionKind::Decr,
            Instruction::Jmp { .. } => InstructionKind::Jmp,
            Instruction::Push { .. } => InstructionKind::Push,
            Instruction::Pop { .. } => InstructionKind::Pop,
            Instruction::Ltra { .. } => InstructionKind::Ltra,
            Instruction::Ret => InstructionKind::Ret,
            Instruction::Pushra => InstructionKind::Pushra,
            Instruction::Popra => InstructionKind::Popra,
            Instruction::Rtr { .. } => InstructionKind::Rtr,
            Instruction::Unknown { .. } => InstructionKind::Unknown,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Ltm { memory_address, literal } => {
                write!(f, "LTM {},{}", memory_address, literal.to_uint())
            }
            Instruction::Mtr { memory_address, register_address } => {
                write!(f, "MTR {},{}", memory_address, register_address)
            }
            Instruction::Jmpif { command_address } => write!(f, "JMPIF {}", command_address),
            Instruction::Mult { first_operand, second_operand, register_address } => write!(
                f,
                "MULT {},{},{}",
                first_operand, second_operand, register_address
            ),
            Instruction::Rtm { memory_address, register_address } => {
                write!(f, "RTM {},{}", memory_address, register_address)
            }
            Instruction::Decr { register_address } => write!(f, "DECR {}", register_address),
            Instruction::Jmp { command_address } => write!(f, "JMP {}", command_address),
            Instruction::Push { register_address } => write!(f, "PUSH {}", register_address),
            Instruction::Pop { register_address } => write!(f, "POP {}", register_address),
            Instruction::Ltra { literal } => write!(f, "LTRA {}", literal.to_uint()),
            Instruction::Rtr { first_register, second_register } => {
                write!(f, "RTR {},{}", first_register, second_register)
            }
            Instruction::Unknown { opcode } => write!(f, "<unknown opcode {}>", opcode),
            other => f.write_str(other.kind().mnemonic()),
        }
    }
}
