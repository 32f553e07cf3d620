//! Property tests across the assembler and the engine

use fwemu_assembler::{assemble, load_source, AssemblerError};
use fwemu_runtime::{run, Processor, RuntimeError};
use fwemu_spec::InstructionSet;
use proptest::prelude::*;

fn isa() -> InstructionSet {
    InstructionSet::from_json(include_str!("../demos/config.json")).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_factorial_matches_wrapping_product(n in 2u64..=10) {
        let isa = isa();
        let mut state = Processor::from_config(&isa.config).unwrap();
        let source = include_str!("../demos/fact.asm").replacen("LTM 0,5", &format!("LTM 0,{n}"), 1);
        load_source(&source, &isa, &mut state).unwrap();
        run(&isa, &mut state).unwrap();

        let expected = (1..=n).fold(1u64, |acc, k| (acc * k) % 256);
        prop_assert_eq!(state.memory()[2].to_uint(), expected);
    }

    #[test]
    fn prop_load_cursor_never_exceeds_capacity(sizes in prop::collection::vec(0usize..12, 1..8)) {
        let isa = isa();
        let mut state = Processor::from_config(&isa.config).unwrap();
        let capacity = state.commands().len();

        for size in sizes {
            let before = state.command_idx();
            let source = "NOP\n".repeat(size);
            match load_source(&source, &isa, &mut state) {
                Ok(start) => {
                    prop_assert_eq!(start, before);
                    prop_assert_eq!(state.command_idx(), before + size);
                }
                Err(AssemblerError::Load(RuntimeError::CapacityExceeded { requested, available })) => {
                    prop_assert_eq!(requested, size);
                    prop_assert_eq!(available, capacity - before);
                    prop_assert!(size > available);
                    prop_assert_eq!(state.command_idx(), before);
                }
                Err(other) => prop_assert!(false, "unexpected error {}", other),
            }
            prop_assert!(state.command_idx() <= capacity);
        }
    }

    #[test]
    fn prop_labels_shift_with_start(start in 0usize..24, pad in 0usize..6) {
        let isa = isa();
        let source = format!("{}L1: NOP\nJMP L1", "NOP\n".repeat(pad));
        let program = assemble(&source, &isa, start).unwrap();
        prop_assert_eq!(program.labels["L1"], start + pad);
        prop_assert_eq!(
            isa.operand_values(&program.words[pad + 1]),
            Some((7, vec![(start + pad) as u64]))
        );
    }

    #[test]
    fn prop_clear_keeps_geometry(values in prop::collection::vec(0u64..256, 8)) {
        let isa = isa();
        let mut state = Processor::from_config(&isa.config).unwrap();
        let source: String = values
            .iter()
            .enumerate()
            .map(|(cell, v)| format!("LTM {cell},{v}\n"))
            .collect();
        load_source(&source, &isa, &mut state).unwrap();
        run(&isa, &mut state).unwrap();
        for (cell, v) in values.iter().enumerate() {
            prop_assert_eq!(state.memory()[cell].to_uint(), *v);
        }

        state.clear();
        state.clear();
        prop_assert_eq!(state.memory().len(), 8);
        prop_assert_eq!(state.registers().len(), 4);
        prop_assert!(state.memory().iter().all(|m| m.is_zero() && m.len() == 8));
        prop_assert_eq!(state.command_idx(), 8);
    }
}
