//! End-to-end tests for the fwemu toolchain
//!
//! These tests run the complete workflow:
//! 1. Load an instruction set from its JSON document
//! 2. Assemble source programs into the processor
//! 3. Execute and inspect the final machine state

use fwemu_assembler::{assemble, load_source};
use fwemu_runtime::{run, HaltReason, Processor, StepOutcome, VMConfig, VM};
use fwemu_spec::{BitVector, Instruction, InstructionSet};

const DEMO_CONFIG: &str = include_str!("../demos/config.json");
const FACT: &str = include_str!("../demos/fact.asm");
const CALL: &str = include_str!("../demos/call.asm");

const SMALL_CONFIG: &str = r#"{
    "commands": [
        {"NOP": {}},
        {"DECR": {"register_address": 2}},
        {"JMP": {"command_address": 3}}
    ],
    "commands_size": 3,
    "command_size": 8,
    "cop_size": 2,
    "memory_size": 2,
    "register_file": 2,
    "literal_size": 4
}"#;

fn demo() -> (InstructionSet, Processor) {
    let isa = InstructionSet::from_json(DEMO_CONFIG).expect("demo config");
    let state = Processor::from_config(&isa.config).unwrap();
    (isa, state)
}

fn bits(s: &str) -> BitVector {
    s.parse().unwrap()
}

// ============================================================================
// Countdown with wraparound
// ============================================================================

#[test]
fn test_decrement_loop_wraps() {
    let isa = InstructionSet::from_json(SMALL_CONFIG).unwrap();
    let mut state = Processor::from_config(&isa.config).unwrap();

    let program = assemble("L0: DECR 0\nJMP L0", &isa, 0).unwrap();
    assert_eq!(program.words, vec![bits("01000000"), bits("10000000")]);

    state.load_prog(&program.words).unwrap();
    state.set_register(0, &bits("0100")).unwrap();

    let mut vm = VM::new(&isa, &mut state, VMConfig::default());
    let mut seen = Vec::new();
    for _ in 0..5 {
        assert_eq!(
            vm.step().unwrap(),
            StepOutcome::Executed(Instruction::Decr { register_address: 0 })
        );
        seen.push(vm.state().registers()[0].to_string());
        assert_eq!(
            vm.step().unwrap(),
            StepOutcome::Executed(Instruction::Jmp { command_address: 0 })
        );
        assert_eq!(vm.pc(), 0);
    }
    assert_eq!(seen, vec!["0011", "0010", "0001", "0000", "1111"]);
}

#[test]
fn test_decrement_loop_never_terminates() {
    let isa = InstructionSet::from_json(SMALL_CONFIG).unwrap();
    let mut state = Processor::from_config(&isa.config).unwrap();
    load_source("L0: DECR 0\nJMP L0", &isa, &mut state).unwrap();

    let config = VMConfig {
        max_cycles: Some(10_000),
        trace: true,
    };
    let result = VM::new(&isa, &mut state, config).run().unwrap();
    assert_eq!(result.halt_reason, HaltReason::CycleLimit);
    // 5000 decrements from zero, modulo 16
    assert_eq!(state.registers()[0].to_uint(), (16 - 5000 % 16) % 16);
}

// ============================================================================
// Demo programs
// ============================================================================

#[test]
fn test_factorial() {
    let (isa, mut state) = demo();
    load_source(FACT, &isa, &mut state).unwrap();

    let result = run(&isa, &mut state).unwrap();
    assert_eq!(result.halt_reason, HaltReason::EndOfProgram);
    assert_eq!(result.pc, 32);
    assert_eq!(state.memory()[2].to_uint(), 120);
    assert_eq!(state.registers()[0].to_uint(), 1);
}

#[test]
fn test_subroutine_call() {
    let (isa, mut state) = demo();
    load_source(CALL, &isa, &mut state).unwrap();
    run(&isa, &mut state).unwrap();

    // RTR copies 7 into r3, DECR leaves 6, RET lands on RTM
    assert_eq!(state.memory()[1].to_uint(), 6);
    assert_eq!(state.registers()[2].to_uint(), 7);
    assert_eq!(state.ra().to_uint(), 8);
}

#[test]
fn test_factorial_overflow_wraps() {
    // 6! = 720 = 2*256 + 208
    let (isa, mut state) = demo();
    load_source(&FACT.replacen("LTM 0,5", "LTM 0,6", 1), &isa, &mut state).unwrap();
    run(&isa, &mut state).unwrap();
    assert_eq!(state.memory()[2].to_uint(), 208);
}

// ============================================================================
// Conditional jump threshold
// ============================================================================

#[test]
fn test_jmpif_requires_more_than_one() {
    let source = "LTM 0,1\nMTR 0,0\nJMPIF L4\nLTM 1,1\nL4: NOP";
    for (r0, skipped) in [(0, false), (1, false), (2, true), (255, true)] {
        let (isa, mut state) = demo();
        let source = source.replacen("LTM 0,1", &format!("LTM 0,{r0}"), 1);
        load_source(&source, &isa, &mut state).unwrap();
        run(&isa, &mut state).unwrap();
        assert_eq!(state.memory()[1].is_zero(), skipped, "r0 = {r0}");
    }
}

// ============================================================================
// Multiple programs
// ============================================================================

#[test]
fn test_jump_across_program_seam() {
    let (isa, mut state) = demo();
    // first program jumps past itself into the second one's label
    let first = "LTM 0,3\nMTR 0,0\nJMP 4\nLTM 7,99";
    let second = "L4: DECR 0\nJMPIF L4\nRTM 5,0";

    assert_eq!(load_source(first, &isa, &mut state).unwrap(), 0);
    assert_eq!(load_source(second, &isa, &mut state).unwrap(), 4);
    run(&isa, &mut state).unwrap();

    assert!(state.memory()[7].is_zero());
    assert_eq!(state.memory()[5].to_uint(), 1);
}

#[test]
fn test_execution_starts_at_zero_after_loads() {
    let (isa, mut state) = demo();
    load_source("LTM 0,1", &isa, &mut state).unwrap();
    load_source("LTM 1,2", &isa, &mut state).unwrap();
    assert_eq!(state.command_idx(), 2);

    run(&isa, &mut state).unwrap();
    assert_eq!(state.memory()[0].to_uint(), 1);
    assert_eq!(state.memory()[1].to_uint(), 2);
    // running does not move the load cursor
    assert_eq!(state.command_idx(), 2);
}

#[test]
fn test_clear_then_run_again() {
    let (isa, mut state) = demo();
    load_source(FACT, &isa, &mut state).unwrap();
    run(&isa, &mut state).unwrap();

    state.clear();
    assert!(state.registers().iter().all(|r| r.is_zero()));
    assert_eq!(state.ra().len(), 1);

    run(&isa, &mut state).unwrap();
    assert_eq!(state.memory()[2].to_uint(), 120);
}

#[test]
fn test_pop_without_push_fails() {
    let (isa, mut state) = demo();
    load_source("PUSH 0\nPOP 1\nPOP 2", &isa, &mut state).unwrap();
    let err = run(&isa, &mut state).unwrap_err();
    assert_eq!(err.to_string(), "Pop from empty stack at PC 2");
}

#[test]
fn test_state_dump() {
    let (isa, mut state) = demo();
    load_source("LTM 0,5", &isa, &mut state).unwrap();
    run(&isa, &mut state).unwrap();

    let dump = state.to_string();
    assert!(dump.starts_with("Processor(commands=["));
    assert!(dump.contains("\t\t000: 0001000000001010\n"));
    assert!(dump.contains("\t\t000: 00000101\n"));
    assert!(dump.contains("\tstack=[],\n"));
    assert!(dump.ends_with("\tcommand_idx=1)"));
}
