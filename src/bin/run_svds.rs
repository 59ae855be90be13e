use std::env;
use std::hint::black_box;
use std::time::Instant;

use rayon::prelude::*;
use rayon::ThreadPoolBuilder;

use svd_parbench::svd::run_svd;

const DEFAULT_SIZE: usize = 2000;

fn main() {
    let args: Vec<String> = env::args().collect();
    assert!(
        args.len() >= 3 && args.len() <= 5,
        "Usage: run_svds <n_calls> <n_jobs> [inner_threads] [size]"
    );

    let n_calls: usize = args[1].parse().expect("n_calls must be an integer");
    let n_jobs: usize = args[2].parse().expect("n_jobs must be an integer");
    let inner_threads: usize = match args.get(3) {
        Some(raw) => raw.parse().expect("inner_threads must be an integer"),
        None => 1,
    };
    let size: usize = match args.get(4) {
        Some(raw) => raw.parse().expect("size must be an integer"),
        None => DEFAULT_SIZE,
    };
    assert!(n_calls > 0, "n_calls must be > 0");
    assert!(n_jobs > 0, "n_jobs must be > 0");
    assert!(inner_threads > 0, "inner_threads must be > 0");
    assert!(size > 0, "size must be > 0");

    let pool = ThreadPoolBuilder::new()
        .num_threads(n_jobs)
        .build()
        .expect("Thread pool must be initializable");

    let t0 = Instant::now();
    let res: Vec<f64> = pool.install(|| {
        (0..n_calls)
            .into_par_iter()
            .map(|i| run_svd(i as u64, size, inner_threads))
            .collect()
    });
    black_box(res);
    println!("{}", t0.elapsed().as_secs_f64());
}
