//! Processor state: program memory, data memory, registers, stack, and the
//! return-address cell.

use fwemu_spec::{BitVector, Config};
use std::fmt;

use crate::error::{Result, RuntimeError};

/// Mutable machine storage
///
/// Array lengths are fixed by [`Processor::init`]; nothing afterwards resizes
/// them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processor {
    /// Program memory, one instruction word per slot
    commands: Vec<BitVector>,

    /// Data memory
    memory: Vec<BitVector>,

    /// Register file
    registers: Vec<BitVector>,

    /// Shared register / return-address stack
    stack: Vec<BitVector>,

    /// Active return address
    ra: BitVector,

    /// Next free program slot
    command_idx: usize,

    command_size: usize,
    literal_size: usize,
}

impl Default for Processor {
    fn default() -> Self {
        Self::new()
    }
}

impl Processor {
    /// Unsized processor; call [`Processor::init`] before loading or running.
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
            memory: Vec::new(),
            registers: Vec::new(),
            stack: Vec::new(),
            ra: BitVector::zeros(1),
            command_idx: 0,
            command_size: 0,
            literal_size: 0,
        }
    }

    /// Processor sized for a machine configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let mut processor = Self::new();
        processor.init(
            config.command_size,
            config.literal_size,
            config.commands_size,
            config.memory_size,
            config.register_file,
        )?;
        Ok(processor)
    }

    /// Allocate every array zero-filled.
    ///
    /// Sizes are checked against the same bounds as [`Config::validate`];
    /// on failure the processor is left untouched. Calling this again
    /// discards all program and data content.
    pub fn init(
        &mut self,
        command_size: u32,
        literal_size: u32,
        commands_size: u32,
        memory_size: u32,
        register_file: u32,
    ) -> Result<()> {
        let geometry = Config {
            commands_size,
            command_size,
            cop_size: 0,
            memory_size,
            register_file,
            literal_size,
        };
        geometry.validate()?;

        self.command_size = command_size as usize;
        self.literal_size = literal_size as usize;
        self.commands = vec![BitVector::zeros(self.command_size); geometry.program_slots()];
        self.memory = vec![BitVector::zeros(self.literal_size); geometry.memory_cells()];
        self.registers = vec![BitVector::zeros(self.literal_size); geometry.register_count()];
        self.stack.clear();
        self.ra = BitVector::zeros(1);
        self.command_idx = 0;
        Ok(())
    }

    /// Append a program at the load cursor.
    ///
    /// On a width mismatch, every slot written by this call is zeroed again
    /// before the error is returned.
    pub fn load_prog(&mut self, program: &[BitVector]) -> Result<()> {
        let available = self.available_slots();
        if program.len() > available {
            return Err(RuntimeError::CapacityExceeded {
                requested: program.len(),
                available,
            });
        }

        let start = self.command_idx;
        for (slot, command) in (start..).zip(program) {
            if command.len() != self.command_size {
                for written in &mut self.commands[start..slot] {
                    written.clear();
                }
                return Err(RuntimeError::WidthMismatch {
                    slot,
                    expected: self.command_size,
                    found: command.len(),
                });
            }
            self.commands[slot] = command.clone();
        }

        self.command_idx += program.len();
        tracing::debug!(start, len = program.len(), "loaded program");
        Ok(())
    }

    /// Zero program memory and rewind the load cursor
    pub fn clear_prog(&mut self) {
        for command in &mut self.commands {
            command.clear();
        }
        self.command_idx = 0;
    }

    /// Zero data memory and registers, empty the stack, reset `ra`
    pub fn clear(&mut self) {
        for cell in &mut self.memory {
            cell.clear();
        }
        for reg in &mut self.registers {
            reg.clear();
        }
        self.stack.clear();
        self.ra = BitVector::zeros(1);
    }

    /// Slots left after the load cursor
    #[inline]
    pub fn available_slots(&self) -> usize {
        self.commands.len() - self.command_idx
    }

    #[inline]
    pub fn command_idx(&self) -> usize {
        self.command_idx
    }

    #[inline]
    pub fn literal_size(&self) -> usize {
        self.literal_size
    }

    pub fn commands(&self) -> &[BitVector] {
        &self.commands
    }

    pub fn memory(&self) -> &[BitVector] {
        &self.memory
    }

    pub fn registers(&self) -> &[BitVector] {
        &self.registers
    }

    pub fn stack(&self) -> &[BitVector] {
        &self.stack
    }

    pub fn ra(&self) -> &BitVector {
        &self.ra
    }

    /// Instruction word at a program slot
    pub fn command(&self, index: usize) -> Result<&BitVector> {
        self.commands.get(index).ok_or(RuntimeError::OutOfBounds {
            region: "command",
            index,
            size: self.commands.len(),
        })
    }

    pub fn register(&self, index: usize) -> Result<&BitVector> {
        self.registers.get(index).ok_or(RuntimeError::OutOfBounds {
            region: "register",
            index,
            size: self.registers.len(),
        })
    }

    /// Store into a register, resized to `literal_size`
    pub fn set_register(&mut self, index: usize, value: &BitVector) -> Result<()> {
        let size = self.registers.len();
        let width = self.literal_size;
        let slot = self.registers.get_mut(index).ok_or(RuntimeError::OutOfBounds {
            region: "register",
            index,
            size,
        })?;
        *slot = value.resized(width);
        Ok(())
    }

    pub fn memory_cell(&self, index: usize) -> Result<&BitVector> {
        self.memory.get(index).ok_or(RuntimeError::OutOfBounds {
            region: "memory",
            index,
            size: self.memory.len(),
        })
    }

    /// Store into a memory cell, resized to `literal_size`
    pub fn set_memory_cell(&mut self, index: usize, value: &BitVector) -> Result<()> {
        let size = self.memory.len();
        let width = self.literal_size;
        let slot = self.memory.get_mut(index).ok_or(RuntimeError::OutOfBounds {
            region: "memory",
            index,
            size,
        })?;
        *slot = value.resized(width);
        Ok(())
    }

    pub fn push(&mut self, value: BitVector) {
        self.stack.push(value);
    }

    pub fn pop(&mut self) -> Option<BitVector> {
        self.stack.pop()
    }

    pub fn set_ra(&mut self, value: BitVector) {
        self.ra = value;
    }
}

impl fmt::Display for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Processor(commands=[")?;
        for (i, command) in self.commands.iter().enumerate() {
            writeln!(f, "\t\t{:03}: {}", i, command)?;
        }
        writeln!(f, "\t],")?;

        writeln!(f, "\tmemory=[")?;
        for (i, cell) in self.memory.iter().enumerate() {
            writeln!(f, "\t\t{:03}: {}", i, cell)?;
        }
        writeln!(f, "\t],")?;

        writeln!(f, "\tregisters=[")?;
        for (i, reg) in self.registers.iter().enumerate() {
            writeln!(f, "\t\t{}: {}", i, reg)?;
        }
        writeln!(f, "\t],")?;

        if self.stack.is_empty() {
            writeln!(f, "\tstack=[],")?;
        } else {
            writeln!(f, "\tstack=[")?;
            for (i, entry) in self.stack.iter().enumerate() {
                writeln!(f, "\t\t{}: {}", i, entry)?;
            }
            writeln!(f, "\t],")?;
        }

        writeln!(f, "\tra={},", self.ra)?;
        write!(f, "\tcommand_idx={})", self.command_idx)
    }
}

/// Why the engine stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HaltReason {
    /// Instruction pointer reached the end of program memory
    EndOfProgram,
    /// Configured cycle limit reached
    CycleLimit,
}
