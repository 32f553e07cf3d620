//! Instruction execution

use fwemu_spec::{BitVector, Instruction};

use crate::error::{Result, RuntimeError};
use crate::state::Processor;

/// Integer value of a register
#[inline]
fn read_uint(state: &Processor, index: usize) -> Result<u64> {
    Ok(state.register(index)?.to_uint())
}

/// Re-encode an integer in `literal_size` bits, dropping overflow
#[inline]
fn to_literal(state: &Processor, value: u64) -> BitVector {
    BitVector::from_uint_wrapping(value, state.literal_size())
}

/// Execute a single instruction fetched from `pc`.
///
/// Returns the next value of the instruction pointer.
pub fn execute(instr: &Instruction, state: &mut Processor, pc: usize) -> Result<usize> {
    let next = pc + 1;

    match instr {
        Instruction::Nop => {}

        Instruction::Ltm { memory_address, literal } => {
            state.set_memory_cell(*memory_address, literal)?;
        }

        Instruction::Mtr { memory_address, register_address } => {
            let value = state.memory_cell(*memory_address)?.clone();
            state.set_register(*register_address, &value)?;
        }

        // Branches only when r0 is strictly greater than one
        Instruction::Jmpif { command_address } => {
            if read_uint(state, 0)? > 1 {
                return Ok(*command_address);
            }
        }

        Instruction::Mult { first_operand, second_operand, register_address } => {
            let a = read_uint(state, *first_operand)? as u128;
            let b = read_uint(state, *second_operand)? as u128;
            let product = to_literal(state, (a * b) as u64);
            state.set_register(*register_address, &product)?;
        }

        Instruction::Rtm { memory_address, register_address } => {
            let value = state.register(*register_address)?.clone();
            state.set_memory_cell(*memory_address, &value)?;
        }

        Instruction::Decr { register_address } => {
            let value = read_uint(state, *register_address)?.wrapping_sub(1);
            let value = to_literal(state, value);
            state.set_register(*register_address, &value)?;
        }

        Instruction::Jmp { command_address } => return Ok(*command_address),

        Instruction::Push { register_address } => {
            let value = state.register(*register_address)?.clone();
            state.push(value);
        }

        Instruction::Pop { register_address } => {
            // Bounds-check before popping so a bad index leaves the stack intact
            state.register(*register_address)?;
            let value = state.pop().ok_or(RuntimeError::EmptyStack { pc })?;
            state.set_register(*register_address, &value)?;
        }

        Instruction::Ltra { literal } => state.set_ra(literal.clone()),

        Instruction::Ret => {
            return Ok(usize::try_from(state.ra().to_uint()).unwrap_or(usize::MAX));
        }

        Instruction::Pushra => {
            let value = state.ra().clone();
            state.push(value);
        }

        Instruction::Popra => {
            let value = state.pop().ok_or(RuntimeError::EmptyStack { pc })?;
            state.set_ra(value);
        }

        Instruction::Rtr { first_register, second_register } => {
            let value = state.register(*first_register)?.clone();
            state.set_register(*second_register, &value)?;
        }

        Instruction::Unknown { .. } => {}
    }

    Ok(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bits(s: &str) -> BitVector {
        s.parse().unwrap()
    }

    fn state() -> Processor {
        let mut p = Processor::new();
        p.init(16, 4, 3, 2, 2).unwrap();
        p
    }

    #[test]
    fn test_nop_and_unknown_advance() {
        let mut p = state();
        assert_eq!(execute(&Instruction::Nop, &mut p, 3).unwrap(), 4);
        assert_eq!(execute(&Instruction::Unknown { opcode: 12 }, &mut p, 4).unwrap(), 5);
        assert_eq!(p, state());
    }

    #[test]
    fn test_ltm_writes_literal_bits() {
        let mut p = state();
        let instr = Instruction::Ltm { memory_address: 2, literal: bits("1001") };
        assert_eq!(execute(&instr, &mut p, 0).unwrap(), 1);
        assert_eq!(p.memory()[2], bits("1001"));
    }

    #[test]
    fn test_mtr_and_rtm() {
        let mut p = state();
        p.set_memory_cell(1, &bits("0110")).unwrap();
        execute(&Instruction::Mtr { memory_address: 1, register_address: 3 }, &mut p, 0).unwrap();
        assert_eq!(p.registers()[3], bits("0110"));

        execute(&Instruction::Rtm { memory_address: 0, register_address: 3 }, &mut p, 1).unwrap();
        assert_eq!(p.memory()[0], bits("0110"));
    }

    #[test]
    fn test_jmpif_requires_greater_than_one() {
        let mut p = state();
        let instr = Instruction::Jmpif { command_address: 6 };

        p.set_register(0, &bits("0000")).unwrap();
        assert_eq!(execute(&instr, &mut p, 2).unwrap(), 3);

        // A value of exactly one does not branch
        p.set_register(0, &bits("0001")).unwrap();
        assert_eq!(execute(&instr, &mut p, 2).unwrap(), 3);

        p.set_register(0, &bits("0010")).unwrap();
        assert_eq!(execute(&instr, &mut p, 2).unwrap(), 6);
    }

    #[test]
    fn test_mult_wraps() {
        let mut p = state();
        p.set_register(0, &bits("0011")).unwrap();
        p.set_register(1, &bits("0100")).unwrap();
        let instr = Instruction::Mult { first_operand: 0, second_operand: 1, register_address: 2 };
        execute(&instr, &mut p, 0).unwrap();
        assert_eq!(p.registers()[2], bits("1100"));

        // 12 * 4 = 48 = 0b110000, low four bits kept
        let instr = Instruction::Mult { first_operand: 2, second_operand: 1, register_address: 2 };
        execute(&instr, &mut p, 0).unwrap();
        assert_eq!(p.registers()[2], bits("0000"));
    }

    #[test]
    fn test_decr_wraps_from_zero() {
        let mut p = state();
        p.set_register(1, &bits("0001")).unwrap();
        let instr = Instruction::Decr { register_address: 1 };
        execute(&instr, &mut p, 0).unwrap();
        assert_eq!(p.registers()[1], bits("0000"));
        execute(&instr, &mut p, 0).unwrap();
        assert_eq!(p.registers()[1], bits("1111"));
    }

    #[test]
    fn test_jmp() {
        let mut p = state();
        assert_eq!(execute(&Instruction::Jmp { command_address: 0 }, &mut p, 5).unwrap(), 0);
    }

    #[test]
    fn test_push_pop() {
        let mut p = state();
        p.set_register(1, &bits("1010")).unwrap();
        execute(&Instruction::Push { register_address: 1 }, &mut p, 0).unwrap();
        assert_eq!(p.stack(), &[bits("1010")]);

        execute(&Instruction::Pop { register_address: 2 }, &mut p, 1).unwrap();
        assert_eq!(p.registers()[2], bits("1010"));
        assert!(p.stack().is_empty());

        let err = execute(&Instruction::Pop { register_address: 2 }, &mut p, 7).unwrap_err();
        assert_eq!(err, RuntimeError::EmptyStack { pc: 7 });
    }

    #[test]
    fn test_return_address_ops() {
        let mut p = state();
        execute(&Instruction::Ltra { literal: bits("0101") }, &mut p, 0).unwrap();
        assert_eq!(p.ra(), &bits("0101"));
        assert_eq!(execute(&Instruction::Ret, &mut p, 1).unwrap(), 5);

        execute(&Instruction::Pushra, &mut p, 2).unwrap();
        execute(&Instruction::Ltra { literal: bits("0001") }, &mut p, 3).unwrap();
        execute(&Instruction::Popra, &mut p, 4).unwrap();
        assert_eq!(p.ra(), &bits("0101"));

        let err = execute(&Instruction::Popra, &mut p, 9).unwrap_err();
        assert_eq!(err, RuntimeError::EmptyStack { pc: 9 });
    }

    #[test]
    fn test_rtr() {
        let mut p = state();
        p.set_register(0, &bits("0111")).unwrap();
        execute(&Instruction::Rtr { first_register: 0, second_register: 3 }, &mut p, 0).unwrap();
        assert_eq!(p.registers()[3], bits("0111"));
        assert_eq!(p.registers()[0], bits("0111"));
    }

    #[test]
    fn test_out_of_range_indices() {
        let mut p = state();
        let err = execute(&Instruction::Decr { register_address: 4 }, &mut p, 0).unwrap_err();
        assert!(matches!(err, RuntimeError::OutOfBounds { region: "register", index: 4, .. }));

        let err = execute(&Instruction::Ltm { memory_address: 9, literal: bits("0001") }, &mut p, 0)
            .unwrap_err();
        assert!(matches!(err, RuntimeError::OutOfBounds { region: "memory", .. }));

        p.push(bits("0001"));
        assert!(execute(&Instruction::Pop { register_address: 8 }, &mut p, 0).is_err());
        assert_eq!(p.stack().len(), 1);
    }
}
