use std::thread;

use crate::matrix::Matrix;

const MAX_SWEEPS: usize = 30;
const CONVERGENCE_TOL: f64 = 1e-10;

/// Full decomposition A = U * diag(singular_values) * V^T,
/// with the singular values sorted in decreasing order.
#[derive(Debug, Clone)]
pub struct Svd {
    pub u: Matrix,
    pub singular_values: Vec<f64>,
    pub v: Matrix,
}

impl Svd {

    /// Decompose a square matrix, splitting the internal work across `nb_threads`.
    ///
    /// Singular values are the square roots of the eigenvalues of A^T*A;
    /// the left vectors are recovered as U = A*V*Sigma^-1. Columns whose
    /// singular value is negligible get a zero left vector.
    pub fn decompose(a: &Matrix, nb_threads: usize) -> Svd {
        assert_eq!(a.rows, a.cols,
            "SVD expects a square matrix, got {}x{}", a.rows, a.cols);
        let n = a.rows;

        let gram = a.transpose().mul_par(a, nb_threads);
        let (eigvals, eigvecs) = symmetric_eigen(&gram, nb_threads);

        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&i, &j| eigvals[j].total_cmp(&eigvals[i]));

        // Small negative eigenvalues are roundoff noise
        let singular_values: Vec<f64> = order
            .iter()
            .map(|&i| eigvals[i].max(0.0).sqrt())
            .collect();

        let mut v = Matrix::zeros(n, n);
        for (new_col, &old_col) in order.iter().enumerate() {
            for r in 0..n {
                v.data[r * n + new_col] = eigvecs.data[r * n + old_col];
            }
        }

        let av = a.mul_par(&v, nb_threads);
        let cutoff = singular_values[0] * 1e-12;
        let mut u = Matrix::zeros(n, n);
        for j in 0..n {
            let sigma = singular_values[j];
            if sigma > cutoff {
                for r in 0..n {
                    u.data[r * n + j] = av.data[r * n + j] / sigma;
                }
            }
        }

        Svd { u, singular_values, v }
    }
}

/// Run one randomized decomposition: seed a generator with `seed`, draw a
/// `size`x`size` standard-normal matrix and return its largest singular value.
pub fn run_svd(seed: u64, size: usize, nb_threads: usize) -> f64 {
    let matrix = Matrix::standard_normal(size, size, seed);
    let svd = Svd::decompose(&matrix, nb_threads);
    svd.singular_values[0]
}

/// Eigendecomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Each sweep walks a round-robin tournament of index pairs; the rotations
/// of one round touch disjoint rows and columns, so the round is applied as
/// one exact orthogonal update in two row-parallel phases (rows of G^T*A,
/// then columns of (G^T*A)*G). Returns the eigenvalues (unsorted) and the
/// matrix whose columns are the matching eigenvectors.
pub fn symmetric_eigen(m: &Matrix, nb_threads: usize) -> (Vec<f64>, Matrix) {
    assert_eq!(m.rows, m.cols,
        "Eigendecomposition expects a square matrix, got {}x{}", m.rows, m.cols);
    assert!(nb_threads >= 1, "Thread count must be >= 1, got {}", nb_threads);
    let n = m.rows;

    let mut a = m.data.clone();
    let mut scratch = vec![0.0; n * n];
    let mut v = Matrix::identity(n).data;

    let fro: f64 = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let tol = CONVERGENCE_TOL * fro;

    // Round-robin tournament over a padded even player count; pairs with the
    // padding index are skipped.
    let padded = n + n % 2;

    for _sweep in 0..MAX_SWEEPS {
        if off_diagonal_norm(&a, n) <= tol {
            break;
        }

        let mut players: Vec<usize> = (0..padded).collect();
        for _round in 0..padded - 1 {
            let mut rots: Vec<(usize, usize, f64, f64)> = Vec::with_capacity(padded / 2);
            for i in 0..padded / 2 {
                let p = players[i].min(players[padded - 1 - i]);
                let q = players[i].max(players[padded - 1 - i]);
                if q >= n {
                    continue;
                }
                let apq = a[p * n + q];
                if apq == 0.0 {
                    continue;
                }
                let app = a[p * n + p];
                let aqq = a[q * n + q];
                let tau = (aqq - app) / (2.0 * apq);
                let t = if tau >= 0.0 {
                    1.0 / (tau + (1.0 + tau * tau).sqrt())
                } else {
                    -1.0 / (-tau + (1.0 + tau * tau).sqrt())
                };
                let c = 1.0 / (1.0 + t * t).sqrt();
                let s = t * c;
                rots.push((p, q, c, s));
            }
            players[1..].rotate_right(1);

            if rots.is_empty() {
                continue;
            }

            // (partner row, c, s, this row is p)
            let mut rot_for_row: Vec<Option<(usize, f64, f64, bool)>> = vec![None; n];
            for &(p, q, c, s) in &rots {
                rot_for_row[p] = Some((q, c, s, true));
                rot_for_row[q] = Some((p, c, s, false));
            }

            // Row phase: scratch = G^T * a
            {
                let a = &a;
                let rot_for_row = &rot_for_row;
                for_each_row_par(&mut scratch, n, nb_threads, move |i, out| {
                    match rot_for_row[i] {
                        Some((j, c, s, true)) => {
                            let rp = &a[i * n..(i + 1) * n];
                            let rq = &a[j * n..(j + 1) * n];
                            for k in 0..n {
                                out[k] = c * rp[k] - s * rq[k];
                            }
                        }
                        Some((j, c, s, false)) => {
                            let rp = &a[j * n..(j + 1) * n];
                            let rq = &a[i * n..(i + 1) * n];
                            for k in 0..n {
                                out[k] = s * rp[k] + c * rq[k];
                            }
                        }
                        None => out.copy_from_slice(&a[i * n..(i + 1) * n]),
                    }
                });
            }

            // Column phase: scratch = scratch * G, one row at a time
            {
                let rots = &rots;
                for_each_row_par(&mut scratch, n, nb_threads, move |_i, row| {
                    for &(p, q, c, s) in rots {
                        let xp = row[p];
                        let xq = row[q];
                        row[p] = c * xp - s * xq;
                        row[q] = s * xp + c * xq;
                    }
                });
            }
            std::mem::swap(&mut a, &mut scratch);

            // Accumulate the eigenvectors: v = v * G
            {
                let rots = &rots;
                for_each_row_par(&mut v, n, nb_threads, move |_i, row| {
                    for &(p, q, c, s) in rots {
                        let xp = row[p];
                        let xq = row[q];
                        row[p] = c * xp - s * xq;
                        row[q] = s * xp + c * xq;
                    }
                });
            }
        }
    }

    let eigvals: Vec<f64> = (0..n).map(|i| a[i * n + i]).collect();
    (eigvals, Matrix::new(v, n, n))
}

fn off_diagonal_norm(a: &[f64], n: usize) -> f64 {
    let mut sum = 0.0;
    for i in 0..n {
        for j in 0..n {
            if i != j {
                sum += a[i * n + j] * a[i * n + j];
            }
        }
    }
    sum.sqrt()
}

/// Apply `op` to every row of a row-major buffer, with the rows chunked
/// across `nb_threads` scoped threads.
fn for_each_row_par<F>(data: &mut [f64], cols: usize, nb_threads: usize, op: F)
where
    F: Fn(usize, &mut [f64]) + Send + Sync,
{
    let rows = data.len() / cols;
    let chunk_rows = (rows + nb_threads - 1) / nb_threads;
    let op = &op;

    thread::scope(|s| {
        for (chunk_idx, chunk) in data.chunks_mut(chunk_rows * cols).enumerate() {
            s.spawn(move || {
                for (local_i, row) in chunk.chunks_mut(cols).enumerate() {
                    op(chunk_idx * chunk_rows + local_i, row);
                }
            });
        }
    });
}
