pub fn assert_near(actual: f64, expected: f64, tolerance: f64) {
    let diff = (actual - expected).abs();
    assert!(
        diff <= tolerance,
        "expected {} ± {}, got {}",
        expected,
        tolerance,
        actual
    );
}

pub fn assert_vec_near(actual: &[f64], expected: &[f64], tolerance: f64) {
    assert_eq!(actual.len(), expected.len(), "length mismatch");
    for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
        assert!(
            (a - e).abs() <= tolerance,
            "index {i}: expected {e} ± {tolerance}, got {a}"
        );
    }
}

pub fn assert_sums_to_one(probabilities: &[f64]) {
    let sum: f64 = probabilities.iter().sum();
    assert!(
        (sum - 1.0).abs() < 1e-9,
        "probabilities sum to {sum}: {probabilities:?}"
    );
}
