use binsearch_bench::{bench::save_results, init_trace, run, Burst, PerCall, Timer};
use clap::{Parser, ValueEnum};
use log::info;
use std::{error::Error, path::PathBuf};

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Strategy {
    PerCall,
    Burst,
    All,
}

#[derive(Parser)]
struct Args {
    /// Number of timed calls (per-call) or bursts (burst) per array size.
    #[clap(value_parser = clap::value_parser!(u64).range(1..))]
    executions: u64,

    #[clap(short, long, value_enum, default_value_t = Strategy::All)]
    strategy: Strategy,

    /// Also write the results as JSON files into this directory.
    #[clap(long)]
    json: Option<PathBuf>,

    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    init_trace(1 + args.verbose as usize)?;
    let executions = args.executions as usize;

    let burst = Burst::new();
    let timers: Vec<&dyn Timer> = match args.strategy {
        Strategy::PerCall => vec![&PerCall as &dyn Timer],
        Strategy::Burst => vec![&burst as &dyn Timer],
        Strategy::All => vec![&PerCall as &dyn Timer, &burst],
    };

    println!("\nRunning Binary Search Performance Tests");
    println!("Executions per test: {executions}\n");

    for timer in timers {
        println!("Running {} benchmark...", timer.name());
        let results = run(timer, executions);
        if let Some(dir) = &args.json {
            save_results(&results, dir, timer.name())?;
            info!("Saved {} results to {}", timer.name(), dir.display());
        }
        println!();
    }
    Ok(())
}
