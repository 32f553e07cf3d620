//! Instruction word encoding
//!
//! Format: | opcode (cop_size) | fields in declared order | zero padding |

use fwemu_spec::{BitVector, InstructionSet};

use crate::error::{AssemblerError, Result};

/// Encode a mnemonic and its numeric arguments into one instruction word
pub fn encode(isa: &InstructionSet, mnemonic: &str, args: &[u64]) -> Result<BitVector> {
    let (opcode, shape) = isa.get_command_by_name(mnemonic).ok_or_else(|| {
        AssemblerError::UnknownInstruction {
            line: 0,
            mnemonic: mnemonic.to_string(),
        }
    })?;

    if shape.arity() != args.len() {
        return Err(AssemblerError::ArgumentCount {
            line: 0,
            mnemonic: mnemonic.to_string(),
            expected: shape.arity(),
            found: args.len(),
        });
    }

    let config = &isa.config;
    let mut word = BitVector::from_uint_wrapping(opcode as u64, config.cop_size as usize);
    for (field, &value) in shape.fields.iter().zip(args) {
        let bits = BitVector::from_uint(value, field.width as usize).ok_or_else(|| {
            AssemblerError::FieldOverflow {
                line: 0,
                value: value.to_string(),
                width: field.width,
            }
        })?;
        word.extend(&bits);
    }

    let padding = config.command_size as usize - word.len();
    word.extend(&BitVector::zeros(padding));
    Ok(word)
}
