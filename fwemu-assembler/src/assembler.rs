//! Two-pass assembly driver

use std::collections::HashMap;

use fwemu_runtime::Processor;
use fwemu_spec::{BitVector, InstructionSet};

use crate::encoder::encode;
use crate::error::{AssemblerError, Result};
use crate::parser::{parse_line, Argument, Line};

/// Assembled program, positioned at an absolute start slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    /// Slot of the first word
    pub start: usize,
    /// Encoded instruction words
    pub words: Vec<BitVector>,
    /// Label name to absolute instruction index
    pub labels: HashMap<String, usize>,
}

impl Program {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// One past the last slot this program occupies
    pub fn end(&self) -> usize {
        self.start + self.words.len()
    }
}

/// Assemble `source` as if its first instruction lands at slot `start`.
///
/// Blank lines are skipped and do not occupy a slot. Every line is checked
/// and every label recorded before any word is encoded, so a syntax error
/// anywhere in the source aborts before encoding begins.
pub fn assemble(source: &str, isa: &InstructionSet, start: usize) -> Result<Program> {
    let mut lines: Vec<(usize, Line)> = Vec::new();
    let mut labels: HashMap<String, usize> = HashMap::new();

    // Pass 1: grammar and label table
    for (idx, text) in source.lines().enumerate() {
        if text.trim().is_empty() {
            continue;
        }
        let line_no = idx + 1;
        let line = parse_line(text, line_no)?;

        if let Some(label) = &line.label {
            let address = start + lines.len();
            if let Some(&previous) = labels.get(label) {
                return Err(AssemblerError::DuplicateLabel {
                    line: line_no,
                    label: label.clone(),
                    previous,
                });
            }
            labels.insert(label.clone(), address);
        }
        lines.push((line_no, line));
    }

    // Pass 2: encoding
    let mut words = Vec::with_capacity(lines.len());
    for (line_no, line) in &lines {
        let (_, shape) = isa.get_command_by_name(&line.mnemonic).ok_or_else(|| {
            AssemblerError::UnknownInstruction {
                line: *line_no,
                mnemonic: line.mnemonic.clone(),
            }
        })?;

        if line.args.len() != shape.arity() {
            return Err(AssemblerError::ArgumentCount {
                line: *line_no,
                mnemonic: line.mnemonic.clone(),
                expected: shape.arity(),
                found: line.args.len(),
            });
        }

        let values = shape
            .fields
            .iter()
            .zip(&line.args)
            .map(|(field, arg)| resolve(arg, &labels, field.width, *line_no))
            .collect::<Result<Vec<u64>>>()?;

        let word = encode(isa, &line.mnemonic, &values).map_err(|e| e.at_line(*line_no))?;
        words.push(word);
    }

    tracing::debug!(start, words = words.len(), labels = labels.len(), "assembled program");

    Ok(Program { start, words, labels })
}

fn resolve(arg: &Argument, labels: &HashMap<String, usize>, width: u32, line: usize) -> Result<u64> {
    match arg {
        Argument::Literal(digits) => {
            digits
                .parse::<u64>()
                .map_err(|_| AssemblerError::FieldOverflow {
                    line,
                    value: digits.clone(),
                    width,
                })
        }
        Argument::Label(name) => match labels.get(name) {
            Some(&address) => Ok(address as u64),
            None => {
                tracing::warn!(line, label = %name, "unresolved label, encoding as 0");
                Ok(0)
            }
        },
    }
}

/// Assemble `source` at the processor's load cursor and append it.
///
/// Returns the slot the program was loaded at.
pub fn load_source(source: &str, isa: &InstructionSet, state: &mut Processor) -> Result<usize> {
    let program = assemble(source, isa, state.command_idx())?;
    state.load_prog(&program.words)?;
    Ok(program.start)
}
