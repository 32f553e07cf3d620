use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use fwemu_assembler::load_source;
use fwemu_runtime::{HaltReason, Processor, VMConfig, VM};
use fwemu_spec::InstructionSet;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Assemble and run programs on a configurable fixed-width processor"
)]
struct Opts {
    /// Instruction-set document (JSON)
    #[arg(short, long, value_name = "ISA")]
    config: PathBuf,

    /// Stop after this many instructions
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Log every executed instruction (enable with RUST_LOG=debug)
    #[arg(long)]
    trace: bool,

    /// Print the instruction catalog before running
    #[arg(long)]
    print_isa: bool,

    /// Print a listing of the loaded program instead of running it
    #[arg(long)]
    disassemble: bool,

    /// Programs, loaded one after another
    #[arg(value_name = "PROGRAM", required = true)]
    programs: Vec<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let opts = Opts::parse();

    let text = std::fs::read_to_string(&opts.config)
        .with_context(|| format!("reading {}", opts.config.display()))?;
    let isa = InstructionSet::from_json(&text)
        .with_context(|| format!("loading instruction set from {}", opts.config.display()))?;

    if opts.print_isa {
        print!("{isa}");
    }

    let mut processor = Processor::from_config(&isa.config).context("sizing processor")?;
    for path in &opts.programs {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let start = load_source(&source, &isa, &mut processor)
            .with_context(|| format!("assembling {}", path.display()))?;
        tracing::info!(program = %path.display(), start, "loaded");
    }

    if opts.disassemble {
        for (slot, word) in processor.commands()[..processor.command_idx()].iter().enumerate() {
            println!("{slot:03}: {word}  {}", isa.decode(word));
        }
        return Ok(());
    }

    let config = VMConfig {
        max_cycles: opts.max_cycles,
        trace: opts.trace,
    };
    let result = VM::new(&isa, &mut processor, config)
        .run()
        .context("execution failed")?;

    if result.halt_reason == HaltReason::CycleLimit {
        eprintln!("stopped after {} cycles at slot {}", result.cycles, result.pc);
    }
    println!("{processor}");

    Ok(())
}
