//! Command-line front end for the simulator.
//!
//! Loads an RV32 ELF executable, runs it to completion (or for a bounded
//! number of steps), and prints the final architectural state. It performs:
//! 1. **Configuration:** Reads simulator options from an optional JSON file.
//! 2. **Execution:** Full asynchronous runs or bounded stepping.
//! 3. **Reporting:** Final state, cycle count, and a register dump.

use std::fs;
use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use vcsim_core::isa::abi;
use vcsim_core::{ExecutionState, Simulator, SimulatorOptions};

#[derive(Parser, Debug)]
#[command(
    name = "vcsim",
    version,
    about = "RV32 vector-core instruction-set simulator",
    long_about = "Runs an RV32 ELF executable on the simulated core.\n\n\
        The program runs until it executes mpause (or ebreak, when configured\n\
        to exit on breakpoints) or until the step limit is reached.\n\n\
        Examples:\n  vcsim program.elf\n  vcsim --config soc.json --steps 10000 program.elf"
)]
struct Cli {
    /// RV32 ELF executable to run.
    elf: String,

    /// JSON file with simulator options (memory layout, misa, ebreak policy).
    #[arg(short, long)]
    config: Option<String>,

    /// Execute at most this many instructions instead of running to a halt.
    #[arg(short, long)]
    steps: Option<u64>,

    /// Entry point override, e.g. 0x100 (defaults to the ELF entry).
    #[arg(short, long, value_parser = parse_address)]
    entry: Option<u32>,

    /// Dump all integer registers after execution.
    #[arg(long)]
    dump_registers: bool,
}

fn parse_address(s: &str) -> Result<u32, std::num::ParseIntError> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => s.parse(),
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let options = match &cli.config {
        Some(path) => {
            let text = fs::read_to_string(path)?;
            serde_json::from_str::<SimulatorOptions>(&text)?
        }
        None => SimulatorOptions::default(),
    };

    let mut sim = Simulator::new(&options)?;
    sim.load_program(&cli.elf, cli.entry)?;

    let state = match cli.steps {
        Some(n) => {
            let consumed = sim.step(n)?;
            println!("[*] Consumed {consumed} of {n} requested steps");
            sim.state()
        }
        None => {
            sim.run()?;
            sim.wait()?
        }
    };

    println!("[*] Final state: {state}, cycles: {}", sim.cycle_count());
    if state == ExecutionState::Faulted {
        println!(
            "    mcause={:#x} mtval={:#010x} mepc={:#010x}",
            sim.read_register("mcause")?,
            sim.read_register("mtval")?,
            sim.read_register("mepc")?
        );
    }

    if cli.dump_registers {
        println!("    pc ={:#010x}", sim.read_register("pc")?);
        for (i, name) in abi::NAMES.iter().enumerate() {
            let value = sim.read_register(name)?;
            print!("    {name:<4}={value:#010x}");
            if i % 4 == 3 {
                println!();
            }
        }
    }

    Ok(match state {
        ExecutionState::Faulted => ExitCode::FAILURE,
        _ => ExitCode::SUCCESS,
    })
}
