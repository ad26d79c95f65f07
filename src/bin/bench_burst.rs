use binsearch_bench::{init_trace, run, Burst};
use clap::Parser;

/// Average time of a burst of 30,000,000 unsuccessful binary searches, per
/// array size.
#[derive(Parser)]
struct Args {
    /// Number of timed bursts per array size.
    #[clap(value_parser = clap::value_parser!(u64).range(1..))]
    executions: u64,
}

fn main() -> Result<(), log::SetLoggerError> {
    let args = Args::parse();
    init_trace(1)?;
    run(&Burst::new(), args.executions as usize);
    Ok(())
}
