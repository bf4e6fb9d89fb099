use crate::slope;
use common::sample::Sample;
use common::test_helper::flight::sample_with_t;

fn get_samples(n: usize, dt: f64) -> Vec<Sample> {
    (0..n).map(|i| sample_with_t(i as f64 * dt)).collect()
}

#[test]
fn slope_is_exact_on_linear_data() {
    let samples = get_samples(12, 0.2);
    for center in 0..samples.len() {
        let k = slope(&samples, center, |s| 2.5 * s.t - 1.0);
        assert!(
            (k - 2.5).abs() < 1e-9,
            "slope at center {center} was {k}, expected 2.5"
        );
    }
}

#[test]
fn slope_of_quadratic_matches_center_derivative() {
    // over a window symmetric in t the regression slope of t^2 is exactly 2t
    let samples = get_samples(20, 1.0);
    for center in 4..samples.len() - 4 {
        let k = slope(&samples, center, |s| s.t * s.t);
        assert!((k - 2.0 * samples[center].t).abs() < 1e-9);
    }
}

#[test]
fn slope_window_is_truncated_at_the_boundary() {
    // five points t = 0..4 of t^2 give slope 4; a nine point window would give 8
    let samples = get_samples(9, 1.0);
    let k = slope(&samples, 0, |s| s.t * s.t);
    assert!((k - 4.0).abs() < 1e-9);
}

#[test]
fn slope_with_duplicate_timestamps_is_nan() {
    let samples: Vec<Sample> = (0..5).map(|_| sample_with_t(1.0)).collect();
    assert!(slope(&samples, 2, |s| s.t).is_nan());
}

#[test]
fn slope_on_a_single_sample_is_nan() {
    let samples = get_samples(1, 1.0);
    assert!(slope(&samples, 0, |s| s.t).is_nan());
}
