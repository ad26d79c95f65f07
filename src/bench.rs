use crate::{binary_search::binary_search, index_or_sentinel, util::*, SearchFn};
use log::{debug, info};
use std::{
    fs::File,
    hint::black_box,
    io::{BufWriter, Write},
    path::Path,
    time::{Duration, Instant},
};

/// Array sizes, in elements.
pub static SIZES: [usize; 9] = [
    100, 400, 1600, 6400, 25600, 102400, 409600, 1638400, 6553600,
];

/// Minimum number of untimed calls before measuring.
pub const WARMUP: usize = 10_000;

/// Number of searches timed as one unit by [`Burst`].
pub const BURST: usize = 30_000_000;

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    Ns,
    S,
}

#[derive(Debug)]
pub struct Measurement {
    /// Result of the last search call.
    pub index: Option<usize>,
    /// Total time spent in the timed phase.
    pub duration: Duration,
    /// The reported average, in the unit of the timer.
    pub average: f64,
}

/// A way of timing repeated calls of a search function.
pub trait Timer {
    fn name(&self) -> &'static str;
    /// The array sizes this timer is run on.
    fn sizes(&self) -> &'static [usize];
    fn unit(&self) -> Unit;
    fn measure(&self, f: SearchFn, vals: &[u32], q: u32, executions: usize) -> Measurement;
    /// The line printed for one array size.
    fn report(&self, size: usize, m: &Measurement) -> String;
}

#[inline(always)]
fn call(f: SearchFn, vals: &[u32], q: &u32) -> Option<usize> {
    black_box(f(black_box(vals), black_box(q)))
}

/// Call `f` `max(WARMUP, executions)` times and return the last result.
fn warmup(f: SearchFn, vals: &[u32], q: u32, executions: usize) -> Option<usize> {
    let mut index = None;
    for _ in 0..WARMUP.max(executions) {
        index = call(f, vals, &q);
    }
    index
}

/// Average time of a single call, in nanoseconds.
pub struct PerCall;

impl Timer for PerCall {
    fn name(&self) -> &'static str {
        "per-call"
    }

    fn sizes(&self) -> &'static [usize] {
        &SIZES
    }

    fn unit(&self) -> Unit {
        Unit::Ns
    }

    fn measure(&self, f: SearchFn, vals: &[u32], q: u32, executions: usize) -> Measurement {
        let mut index = warmup(f, vals, q, executions);

        let start = Instant::now();
        for _ in 0..executions {
            index = call(f, vals, &q);
        }
        let duration = start.elapsed();

        Measurement {
            index,
            duration,
            average: duration.as_nanos() as f64 / executions as f64,
        }
    }

    fn report(&self, size: usize, m: &Measurement) -> String {
        let outcome = if m.index.is_none() {
            "Unsuccessful"
        } else {
            "Successful"
        };
        format!(
            "Array size: {size}, Binary Search: {outcome}, Average execution time: {:.3} (ns)",
            m.average
        )
    }
}

/// Average time of a burst of `len` calls per trial, in seconds.
pub struct Burst {
    len: usize,
}

impl Burst {
    pub const fn new() -> Self {
        Self::with_len(BURST)
    }

    pub const fn with_len(len: usize) -> Self {
        Burst { len }
    }
}

impl Default for Burst {
    fn default() -> Self {
        Self::new()
    }
}

impl Timer for Burst {
    fn name(&self) -> &'static str {
        "burst"
    }

    /// Skips the largest size: one burst there takes too long.
    fn sizes(&self) -> &'static [usize] {
        &SIZES[..SIZES.len() - 1]
    }

    fn unit(&self) -> Unit {
        Unit::S
    }

    fn measure(&self, f: SearchFn, vals: &[u32], q: u32, executions: usize) -> Measurement {
        let mut index = warmup(f, vals, q, executions);

        let mut duration = Duration::ZERO;
        for _ in 0..executions {
            let start = Instant::now();
            for _ in 0..self.len {
                index = call(f, vals, &q);
            }
            duration += start.elapsed();
        }

        Measurement {
            index,
            duration,
            average: duration.as_nanos() as f64 / executions as f64 / 1e9,
        }
    }

    fn report(&self, size: usize, m: &Measurement) -> String {
        format!(
            "Array Size: {size}, Average Execution Time for {} Unsuccessful Searches: {:.3} (s)",
            fmt_thousands(self.len),
            m.average
        )
    }
}

/// Benchmark `timer` on each of its sizes, printing one line per size.
pub fn run(timer: &dyn Timer, executions: usize) -> Vec<Record> {
    assert!(executions > 0, "executions must be positive");
    let mut results = vec![];
    for &size in timer.sizes() {
        let sz = size::Size::from_bytes(size * std::mem::size_of::<u32>());
        info!("Benchmarking {} on {size} elements ({sz})", timer.name());

        let vals = time("Building sequence", || sorted_sequence(size));
        let q = absent_target(size);
        let m = timer.measure(binary_search::<u32>, &vals, q, executions);
        debug!(
            "{}: {:?} in total over {executions} executions",
            timer.name(),
            m.duration
        );

        println!("{}", timer.report(size, &m));
        results.push(Record::new(timer, size, executions, &m));
    }
    results
}

/// One measured array size, as written to the JSON results.
#[derive(Debug, serde::Serialize)]
pub struct Record {
    /// Timer name.
    pub strategy: String,
    /// Array size in elements.
    pub size: usize,
    pub executions: usize,
    /// Index of the last search, -1 when not found.
    pub index: isize,
    /// Total duration of the timed phase.
    pub duration: Duration,
    pub average: f64,
    pub unit: Unit,
    /// CPU frequency in Hz.
    pub freq: Option<f64>,
}

impl Record {
    pub fn new(timer: &dyn Timer, size: usize, executions: usize, m: &Measurement) -> Record {
        Record {
            strategy: timer.name().to_string(),
            size,
            executions,
            index: index_or_sentinel(m.index),
            duration: m.duration,
            average: m.average,
            unit: timer.unit(),
            freq: get_cpu_freq(),
        }
    }
}

/// Write `results` to `dir/name.json`.
pub fn save_results(results: &[Record], dir: &Path, name: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    let f = dir.join(name).with_extension("json");
    let mut f = BufWriter::new(File::create(f)?);
    serde_json::to_writer(&mut f, results)?;
    f.flush()
}

#[cfg(test)]
mod test {
    use super::*;
    use std::cell::Cell;

    thread_local! {
        static CALLS: Cell<usize> = const { Cell::new(0) };
    }

    fn counting_search(vals: &[u32], q: &u32) -> Option<usize> {
        CALLS.with(|c| c.set(c.get() + 1));
        binary_search(vals, q)
    }

    fn calls_during(f: impl FnOnce()) -> usize {
        CALLS.with(|c| c.set(0));
        f();
        CALLS.with(|c| c.get())
    }

    #[test]
    fn per_call_single_execution() {
        let vals = sorted_sequence(100);
        let m = PerCall.measure(binary_search, &vals, absent_target(100), 1);
        assert_eq!(m.index, None);
        assert!(m.average.is_finite());
        assert!(m.average >= 0.);

        let line = PerCall.report(100, &m);
        assert!(line.starts_with("Array size: 100, Binary Search: Unsuccessful,"));
        assert!(line.ends_with(" (ns)"));
    }

    #[test]
    fn per_call_reports_found_index() {
        let vals = sorted_sequence(5);
        let m = PerCall.measure(binary_search, &vals, 3, 10);
        assert_eq!(m.index, Some(3));
        assert!(PerCall
            .report(5, &m)
            .contains("Binary Search: Successful, Average execution time: "));
    }

    #[test]
    fn report_has_three_decimals() {
        let m = Measurement {
            index: None,
            duration: Duration::from_nanos(12345),
            average: 12.3456,
        };
        assert_eq!(
            PerCall.report(400, &m),
            "Array size: 400, Binary Search: Unsuccessful, Average execution time: 12.346 (ns)"
        );
        assert_eq!(
            Burst::new().report(400, &m),
            "Array Size: 400, Average Execution Time for 30,000,000 Unsuccessful Searches: 12.346 (s)"
        );
    }

    #[test]
    fn warmup_then_timed_calls() {
        let vals = sorted_sequence(64);
        let q = absent_target(64);

        let n = calls_during(|| {
            PerCall.measure(counting_search, &vals, q, 3);
        });
        assert_eq!(n, WARMUP + 3);

        let n = calls_during(|| {
            PerCall.measure(counting_search, &vals, q, 2 * WARMUP);
        });
        assert_eq!(n, 4 * WARMUP);

        let n = calls_during(|| {
            Burst::with_len(10).measure(counting_search, &vals, q, 2);
        });
        assert_eq!(n, WARMUP + 20);
    }

    #[test]
    fn burst_single_execution() {
        let vals = sorted_sequence(100);
        let m = Burst::new().measure(binary_search, &vals, absent_target(100), 1);
        assert_eq!(m.index, None);
        assert!(m.average.is_finite());
        assert!(m.average >= 0.);
        assert!((m.average - m.duration.as_secs_f64()).abs() < 1e-9);
    }

    #[test]
    fn burst_averages_over_trials() {
        let vals = sorted_sequence(1000);
        let m = Burst::with_len(1000).measure(binary_search, &vals, absent_target(1000), 4);
        let expected = m.duration.as_secs_f64() / 4.;
        assert!((m.average - expected).abs() < 1e-9);
        assert!(Burst::with_len(1000)
            .report(1000, &m)
            .contains("for 1,000 Unsuccessful Searches"));
    }

    #[test]
    fn sizes() {
        assert_eq!(PerCall.sizes().len(), 9);
        assert_eq!(PerCall.sizes().last(), Some(&6553600));
        assert_eq!(Burst::new().sizes().len(), 8);
        assert_eq!(Burst::new().sizes().last(), Some(&1638400));
        assert!(PerCall.sizes().windows(2).all(|w| w[0] < w[1]));
    }

    /// Small timer so that `run` finishes quickly.
    struct Tiny;

    impl Timer for Tiny {
        fn name(&self) -> &'static str {
            "tiny"
        }
        fn sizes(&self) -> &'static [usize] {
            &[0, 5, 100]
        }
        fn unit(&self) -> Unit {
            Unit::Ns
        }
        fn measure(&self, f: SearchFn, vals: &[u32], q: u32, executions: usize) -> Measurement {
            PerCall.measure(f, vals, q, executions)
        }
        fn report(&self, size: usize, m: &Measurement) -> String {
            PerCall.report(size, m)
        }
    }

    #[test]
    fn run_records_every_size() {
        let results = run(&Tiny, 5);
        assert_eq!(results.len(), 3);
        for (r, &size) in results.iter().zip(Tiny.sizes()) {
            assert_eq!(r.strategy, "tiny");
            assert_eq!(r.size, size);
            assert_eq!(r.executions, 5);
            assert_eq!(r.index, -1);
            assert_eq!(r.unit, Unit::Ns);
        }
    }

    #[test]
    #[should_panic(expected = "executions must be positive")]
    fn run_rejects_zero_executions() {
        run(&Tiny, 0);
    }

    #[test]
    fn save_results_writes_json() {
        let dir = std::env::temp_dir().join(format!("binsearch-bench-{}", std::process::id()));
        let results = run(&Tiny, 1);
        save_results(&results, &dir, "tiny").unwrap();

        let json = std::fs::read_to_string(dir.join("tiny.json")).unwrap();
        let v: serde_json::Value = serde_json::from_str(&json).unwrap();
        let rows = v.as_array().unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[1]["size"], 5);
        assert_eq!(rows[1]["index"], -1);
        assert_eq!(rows[1]["unit"], "ns");
        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn save_results_reports_full_disk() {
        let dir = std::env::temp_dir().join(format!("binsearch-bench-full-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let link = dir.join("full.json");
        let _ = std::fs::remove_file(&link);
        std::os::unix::fs::symlink("/dev/full", &link).unwrap();

        let results = run(&Tiny, 1);
        assert!(save_results(&results, &dir, "full").is_err());
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
