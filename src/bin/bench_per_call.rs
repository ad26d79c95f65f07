use binsearch_bench::{init_trace, run, PerCall};
use clap::Parser;

/// Average time of a single unsuccessful binary search, per array size.
#[derive(Parser)]
struct Args {
    /// Number of timed calls per array size.
    #[clap(value_parser = clap::value_parser!(u64).range(1..))]
    executions: u64,
}

fn main() -> Result<(), log::SetLoggerError> {
    let args = Args::parse();
    init_trace(1)?;
    run(&PerCall, args.executions as usize);
    Ok(())
}
