use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::Command;

use thiserror::Error;

use crate::strategy::{resolve_thread_counts, ParallelismLevel, ThreadBudget};

pub const LEVELS: [ParallelismLevel; 3] = [
    ParallelismLevel::Inner,
    ParallelismLevel::Outer,
    ParallelismLevel::Both,
];

pub const CALL_COUNTS: [usize; 6] = [1, 4, 8, 16, 24, 48];

#[derive(Error, Debug)]
pub enum SweepError {
    #[error("Could not launch worker `{0}`: {1}")]
    WorkerLaunch(String, #[source] std::io::Error),
    #[error("Could not write results to `{0}`: {1}")]
    CsvWrite(String, #[source] std::io::Error),
}

/// One measured grid point. The elapsed time is kept as the worker's
/// stdout text, never parsed to a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    pub inner_threads: usize,
    pub n_jobs: usize,
    pub n_calls: usize,
    pub time: String,
}

/// The full sweep grid in iteration order: level outer loop, call count
/// inner loop.
pub fn grid() -> Vec<(ParallelismLevel, usize)> {
    let mut points = Vec::with_capacity(LEVELS.len() * CALL_COUNTS.len());
    for level in LEVELS {
        for n_calls in CALL_COUNTS {
            points.push((level, n_calls));
        }
    }
    points
}

/// Launch the worker for one grid point and capture its printed time.
///
/// The exit status is not inspected and stderr is discarded: a failed
/// worker just shows up as an empty or garbled time cell.
pub fn run_worker(worker: &Path, n_calls: usize, budget: ThreadBudget) -> Result<ResultRow, SweepError> {
    let output = Command::new(worker)
        .arg(n_calls.to_string())
        .arg(budget.n_jobs.to_string())
        .arg(budget.inner_threads.to_string())
        .output()
        .map_err(|e| SweepError::WorkerLaunch(worker.display().to_string(), e))?;

    let time = String::from_utf8_lossy(&output.stdout).trim().to_string();

    Ok(ResultRow {
        inner_threads: budget.inner_threads,
        n_jobs: budget.n_jobs,
        n_calls,
        time,
    })
}

/// Run the whole grid against `worker`, one child process at a time, and
/// export the rows to `out_path`.
pub fn run_sweep(worker: &Path, out_path: &Path) -> Result<Vec<ResultRow>, SweepError> {
    let mut all_results = Vec::new();

    for (level, n_calls) in grid() {
        let budget = resolve_thread_counts(-1, level);
        let row = run_worker(worker, n_calls, budget)?;
        println!("{:?}", row);
        all_results.push(row);
    }

    write_csv(&all_results, out_path)?;
    Ok(all_results)
}

/// Write the result rows as CSV with a leading index column.
pub fn write_csv(rows: &[ResultRow], path: &Path) -> Result<(), SweepError> {
    write_csv_inner(rows, path).map_err(|e| SweepError::CsvWrite(path.display().to_string(), e))
}

fn write_csv_inner(rows: &[ResultRow], path: &Path) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    writeln!(file, ",inner_threads,n_jobs,n_calls,time")?;
    for (idx, row) in rows.iter().enumerate() {
        writeln!(file, "{},{},{},{},{}", idx, row.inner_threads, row.n_jobs, row.n_calls, row.time)?;
    }
    Ok(())
}
