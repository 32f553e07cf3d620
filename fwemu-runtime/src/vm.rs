//! Fetch-decode-execute loop

use fwemu_spec::{Instruction, InstructionSet};

use crate::error::{Result, RuntimeError};
use crate::execute::execute;
use crate::state::{HaltReason, Processor};

/// VM configuration
#[derive(Debug, Clone, Default)]
pub struct VMConfig {
    /// Stop after this many instructions.
    ///
    /// `None` runs until the instruction pointer reaches the end of program
    /// memory, which never happens for a program that loops forever.
    pub max_cycles: Option<u64>,

    /// Log every executed instruction
    pub trace: bool,
}

/// Execution result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionResult {
    /// Number of instructions executed
    pub cycles: u64,

    /// Instruction pointer when execution stopped
    pub pc: usize,

    /// Reason for halting
    pub halt_reason: HaltReason,
}

/// Outcome of a single step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// An instruction was executed
    Executed(Instruction),
    /// The instruction pointer is at the end of program memory
    Finished,
}

/// Execution engine over a borrowed processor
///
/// Execution always begins at slot 0, independent of the processor's load
/// cursor, and ends the moment the instruction pointer equals the number of
/// program slots.
pub struct VM<'a> {
    isa: &'a InstructionSet,
    state: &'a mut Processor,
    config: VMConfig,
    pc: usize,
    cycles: u64,
}

impl<'a> VM<'a> {
    pub fn new(isa: &'a InstructionSet, state: &'a mut Processor, config: VMConfig) -> Self {
        Self {
            isa,
            state,
            config,
            pc: 0,
            cycles: 0,
        }
    }

    /// Current instruction pointer
    #[inline]
    pub fn pc(&self) -> usize {
        self.pc
    }

    #[inline]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn state(&self) -> &Processor {
        &*self.state
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.pc == self.state.commands().len()
    }

    /// Execute one instruction
    pub fn step(&mut self) -> Result<StepOutcome> {
        if self.is_finished() {
            return Ok(StepOutcome::Finished);
        }

        let inst = self.fetch_and_decode()?;

        if self.config.trace {
            tracing::debug!(cycle = self.cycles, pc = self.pc, "{}", inst);
        }

        self.pc = execute(&inst, self.state, self.pc)?;
        self.cycles += 1;

        Ok(StepOutcome::Executed(inst))
    }

    /// Run until the end of program memory or the configured cycle limit
    pub fn run(&mut self) -> Result<ExecutionResult> {
        let halt_reason = loop {
            if self.is_finished() {
                break HaltReason::EndOfProgram;
            }
            if let Some(limit) = self.config.max_cycles {
                if self.cycles >= limit {
                    break HaltReason::CycleLimit;
                }
            }
            self.step()?;
        };

        tracing::debug!(cycles = self.cycles, pc = self.pc, ?halt_reason, "halted");

        Ok(ExecutionResult {
            cycles: self.cycles,
            pc: self.pc,
            halt_reason,
        })
    }

    fn fetch_and_decode(&self) -> Result<Instruction> {
        let size = self.state.commands().len();
        let word = self
            .state
            .command(self.pc)
            .map_err(|_| RuntimeError::PcOutOfRange { pc: self.pc, size })?;
        Ok(self.isa.decode(word))
    }
}
