//! Keyword-based spam scanner.
//!
//! A message is normalized, every trigger phrase is counted in it, and the
//! summed count is mapped to one of four likelihood ratings. Overlapping
//! triggers are counted independently: "free trial" adds to both "free" and
//! "free trial".

pub mod report;
mod scanner;
mod triggers;

pub use scanner::{Rating, ScanResult, TriggerScanner, count_occurrences, normalize, rate, scan};
pub use triggers::{DEFAULT_TRIGGERS, TriggerList};
