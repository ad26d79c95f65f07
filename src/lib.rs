pub mod bench;
pub mod binary_search;
pub mod util;

pub use bench::{run, Burst, Measurement, PerCall, Record, Timer};
pub use binary_search::{binary_search, index_or_sentinel, NOT_FOUND};
pub use util::*;

#[ctor::ctor]
fn init_color_backtrace() {
    color_backtrace::install();
}

/// Signature of the search routine under measurement.
pub type SearchFn = fn(&[u32], &u32) -> Option<usize>;
