use std::time::Instant;

use itertools::Itertools;
use log::info;

/// The ascending sequence `0, 1, ..., size-1`.
pub fn sorted_sequence(size: usize) -> Vec<u32> {
    assert!(size < u32::MAX as usize);
    (0..size as u32).collect_vec()
}

/// A query that is guaranteed not to occur in `sorted_sequence(size)`.
pub fn absent_target(size: usize) -> u32 {
    assert!(size < u32::MAX as usize);
    size as u32 + 1
}

/// Format `n` with `,` between groups of three digits.
pub fn fmt_thousands(n: usize) -> String {
    let digits = n.to_string();
    digits
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(String::from_utf8_lossy)
        .join(",")
}

pub fn time<T>(t: &str, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let r = f();
    info!("{t}: took {:?}", start.elapsed());
    r
}

/// Set up `stderrlog`. 0 only shows errors, 4 and up shows everything.
pub fn init_trace(verbosity: usize) -> Result<(), log::SetLoggerError> {
    stderrlog::new()
        .color(stderrlog::ColorChoice::Auto)
        .verbosity(verbosity)
        .show_level(true)
        .init()
}

/// Return the current CPU frequency in Hz.
pub fn get_cpu_freq() -> Option<f64> {
    let cur_cpu = get_cpu()?;
    let khz = std::fs::read_to_string(format!(
        "/sys/devices/system/cpu/cpu{cur_cpu}/cpufreq/scaling_cur_freq"
    ))
    .ok()?;
    khz.trim().parse::<f64>().ok().map(|khz| khz * 1000.)
}

fn get_cpu() -> Option<i32> {
    #[cfg(target_os = "linux")]
    {
        let cpu = unsafe { libc::sched_getcpu() };
        (cpu >= 0).then_some(cpu)
    }
    #[cfg(not(target_os = "linux"))]
    {
        None
    }
}
