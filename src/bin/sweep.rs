use std::env;
use std::path::{Path, PathBuf};

use svd_parbench::sweep::{run_sweep, SweepError};

fn main() -> Result<(), SweepError> {
    let rows = run_sweep(&worker_path(), Path::new("results.csv"))?;
    println!("Benchmark results written to results.csv ({} rows)", rows.len());
    Ok(())
}

// The worker ships as a sibling binary of the sweep driver.
fn worker_path() -> PathBuf {
    env::current_exe()
        .expect("Cannot locate the sweep executable")
        .with_file_name("run_svds")
}
