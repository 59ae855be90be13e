use std::thread;

use rand::SeedableRng;
use rand_distr::{Distribution, StandardNormal};
use rand_pcg::Pcg64;

#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    pub data: Vec<f64>,
    pub rows: usize,
    pub cols: usize,
}

impl Matrix {

    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Matrix {
        assert_eq!(data.len(), rows * cols,
            "Data length {} doesn't match dimensions {}x{}", data.len(), rows, cols);
        Matrix { data, rows, cols }
    }

    /// Create matrix filled with zeros
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix::new(vec![0.0; rows * cols], rows, cols)
    }

    pub fn identity(n: usize) -> Matrix {
        let mut data = vec![0.0; n * n];
        for i in 0..n {
            data[i * n + i] = 1.0;
        }
        Matrix::new(data, n, n)
    }

    /// Draw independent standard-normal entries from a generator seeded with `seed`.
    /// The same seed always produces the same matrix.
    pub fn standard_normal(rows: usize, cols: usize, seed: u64) -> Matrix {
        let mut rng = Pcg64::seed_from_u64(seed);
        let data = (0..rows * cols)
            .map(|_| StandardNormal.sample(&mut rng))
            .collect::<Vec<f64>>();
        Matrix::new(data, rows, cols)
    }

    pub fn at(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn dims(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Transpose the matrix
    pub fn transpose(&self) -> Matrix {
        let mut data = vec![0.0; self.rows * self.cols];
        for i in 0..self.rows {
            for j in 0..self.cols {
                data[j * self.rows + i] = self.data[i * self.cols + j];
            }
        }
        Matrix::new(data, self.cols, self.rows)
    }

    pub fn mul_seq(&self, other: &Matrix) -> Matrix {
        self.mul_par(other, 1)
    }

    /// Multiply with the rows of the result split across `nb_threads` scoped threads.
    pub fn mul_par(&self, other: &Matrix, nb_threads: usize) -> Matrix {
        let r1 = self.rows;
        let c1 = self.cols;
        let r2 = other.rows;
        let c2 = other.cols;

        assert_eq!(c1, r2, "Matrix dimensions don't match: {}x{} * {}x{}", r1, c1, r2, c2);
        assert!(nb_threads >= 1, "Thread count must be >= 1, got {}", nb_threads);

        let mut result = vec![0.0; r1 * c2];
        let chunk_rows = (r1 + nb_threads - 1) / nb_threads;

        thread::scope(|s| {
            for (chunk_idx, chunk) in result.chunks_mut(chunk_rows * c2).enumerate() {
                let a = &self.data;
                let b = &other.data;

                s.spawn(move || {
                    let start_row = chunk_idx * chunk_rows;
                    for (local_i, out_row) in chunk.chunks_mut(c2).enumerate() {
                        let i = start_row + local_i;
                        for j in 0..c2 {
                            let mut sum = 0.0;
                            for k in 0..c1 {
                                sum += a[i * c1 + k] * b[k * c2 + j];
                            }
                            out_row[j] = sum;
                        }
                    }
                });
            }
        });

        Matrix::new(result, r1, c2)
    }
}
