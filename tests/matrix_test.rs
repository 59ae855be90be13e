use svd_parbench::Matrix;

// Helper function to compare matrices with floating point tolerance
fn matrices_equal(a: &Matrix, b: &Matrix, tolerance: f64) -> bool {
    if a.rows != b.rows || a.cols != b.cols {
        return false;
    }

    for i in 0..a.data.len() {
        if (a.data[i] - b.data[i]).abs() > tolerance {
            return false;
        }
    }
    true
}

#[test]
fn test_basic_matrix_multiplication() {
    // Test 2x2 * 2x2 matrix multiplication
    let a = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
    let b = Matrix::new(vec![5.0, 6.0, 7.0, 8.0], 2, 2);

    // Expected result: [[19, 22], [43, 50]]
    let expected = Matrix::new(vec![19.0, 22.0, 43.0, 50.0], 2, 2);

    let result_seq = a.mul_seq(&b);
    let result_par = a.mul_par(&b, 2);

    assert!(matrices_equal(&result_seq, &expected, f64::EPSILON));
    assert!(matrices_equal(&result_par, &expected, f64::EPSILON));
}

#[test]
fn test_identity_matrix_multiplication() {
    let a = Matrix::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
    let identity = Matrix::identity(3);

    let result_seq = a.mul_seq(&identity);
    let result_par = a.mul_par(&identity, 2);

    assert!(matrices_equal(&result_seq, &a, f64::EPSILON));
    assert!(matrices_equal(&result_par, &a, f64::EPSILON));
}

#[test]
fn test_parallel_matches_sequential_for_every_thread_count() {
    let a = Matrix::standard_normal(17, 23, 7);
    let b = Matrix::standard_normal(23, 11, 8);

    let baseline = a.mul_seq(&b);
    for nb_threads in 1..=8 {
        let parallel = a.mul_par(&b, nb_threads);
        assert!(
            matrices_equal(&baseline, &parallel, 0.0),
            "Mismatch between sequential and parallel({})",
            nb_threads
        );
    }
}

#[test]
fn test_more_threads_than_rows() {
    let a = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
    let b = Matrix::new(vec![5.0, 6.0, 7.0, 8.0], 2, 2);

    let result = a.mul_par(&b, 16);
    assert!(matrices_equal(&result, &a.mul_seq(&b), f64::EPSILON));
}

#[test]
#[should_panic]
fn test_dimension_mismatch_panics() {
    let a = Matrix::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2);
    let b = Matrix::new(vec![1.0, 2.0, 3.0], 3, 1);
    let _ = b.mul_seq(&a);
}

#[test]
fn test_standard_normal_is_reproducible() {
    // Same seed => bit-for-bit identical matrix
    let a = Matrix::standard_normal(20, 20, 42);
    let b = Matrix::standard_normal(20, 20, 42);
    assert_eq!(a, b);

    let c = Matrix::standard_normal(20, 20, 43);
    assert_ne!(a, c);
}

#[test]
fn test_standard_normal_entries_look_centered() {
    // Crude sanity check: the sample mean of 10_000 standard-normal draws
    // should be near zero and the spread near one.
    let m = Matrix::standard_normal(100, 100, 0);
    let mean = m.data.iter().sum::<f64>() / m.data.len() as f64;
    let var = m.data.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / m.data.len() as f64;

    assert!(mean.abs() < 0.05, "mean {} too far from 0", mean);
    assert!((var - 1.0).abs() < 0.1, "variance {} too far from 1", var);
}

#[test]
fn test_transpose() {
    let a = Matrix::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
    let t = a.transpose();

    assert_eq!(t.dims(), (3, 2));
    for i in 0..2 {
        for j in 0..3 {
            assert_eq!(a.at(i, j), t.at(j, i));
        }
    }
}
