use std::str::FromStr;
use std::thread;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StrategyError {
    #[error("Unknown parallelism level `{0}` (expected inner, outer or both)")]
    UnknownLevel(String),
}

/// Where the parallelism budget is spent: inside each decomposition,
/// across decompositions, or deliberately oversubscribed at both levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParallelismLevel {
    Inner,
    Outer,
    Both,
}

impl FromStr for ParallelismLevel {
    type Err = StrategyError;

    fn from_str(s: &str) -> Result<ParallelismLevel, StrategyError> {
        match s {
            "inner" => Ok(ParallelismLevel::Inner),
            "outer" => Ok(ParallelismLevel::Outer),
            "both" => Ok(ParallelismLevel::Both),
            other => Err(StrategyError::UnknownLevel(other.to_string())),
        }
    }
}

/// Concrete thread counts for one grid point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreadBudget {
    pub inner_threads: usize,
    pub n_jobs: usize,
}

/// Map a total parallelism budget `n` (-1 means all available processing
/// units) and a level to concrete thread counts.
pub fn resolve_thread_counts(n: i64, level: ParallelismLevel) -> ThreadBudget {
    assert!(n == -1 || n >= 1, "Parallelism budget must be -1 or >= 1, got {}", n);
    let n = if n == -1 { available_units() } else { n as usize };

    match level {
        ParallelismLevel::Inner => ThreadBudget { inner_threads: n, n_jobs: 1 },
        ParallelismLevel::Outer => ThreadBudget { inner_threads: 1, n_jobs: n },
        ParallelismLevel::Both => ThreadBudget { inner_threads: n, n_jobs: n },
    }
}

pub fn available_units() -> usize {
    thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
}
