use common::test_helper::flight::{constant_velocity_records, modern_record};
use track::Track;

fn get_track() -> Track {
    let records = vec![
        modern_record(0.0, 0.0, 0.0, 3000.0, 0.0, 10.0, 5.0),
        modern_record(1.0, 0.0, 0.0001, 2995.0, 0.0, 10.0, 5.0),
        modern_record(2.0, 0.0, 0.0002, 2990.0, 0.0, 10.0, 5.0),
        modern_record(3.0, 0.0, 0.0003, 2985.0, 0.0, 10.0, 5.0),
    ];
    let mut track = Track::new();
    track.import(&records).unwrap();
    track.derive_all().unwrap();
    track
}

#[test]
fn index_search_brackets_the_query_time() {
    let track = get_track();
    assert_eq!(track.find_index_below_t(1.5), Some(1));
    assert_eq!(track.find_index_above_t(1.5), Some(2));

    // an exact hit is excluded from both sides
    assert_eq!(track.find_index_below_t(1.0), Some(0));
    assert_eq!(track.find_index_above_t(1.0), Some(2));

    assert_eq!(track.find_index_below_t(0.0), None);
    assert_eq!(track.find_index_above_t(3.0), None);
    assert_eq!(track.find_index_below_t(-2.0), None);
    assert_eq!(track.find_index_above_t(99.0), None);
}

#[test]
fn queries_outside_the_range_clamp_to_the_ends() {
    let track = get_track();
    let first = &track.samples()[0];
    let last = &track.samples()[track.samples().len() - 1];

    let before = track.interpolate_at_t(-10.0).unwrap();
    assert_eq!(before.t, first.t);
    assert_eq!(before.time, first.time);

    let after = track.interpolate_at_t(100.0).unwrap();
    assert_eq!(after.t, last.t);
    assert_eq!(after.time, last.time);
}

#[test]
fn interpolating_an_empty_track_yields_none() {
    let track = Track::new();
    assert!(track.interpolate_at_t(0.0).is_none());
}

#[test]
fn interpolation_round_trips_the_samples_of_a_linear_track() {
    let mut track = Track::new();
    track
        .import(&constant_velocity_records(30, 0.5, 6.0, 18.0, 25.0))
        .unwrap();
    track.derive_all().unwrap();
    let samples = track.samples();

    for i in 1..samples.len() - 1 {
        let sample = &samples[i];
        let interpolated = track.interpolate_at_t(sample.t).unwrap();
        assert!((interpolated.t - sample.t).abs() < 1e-9);
        assert!((interpolated.h_msl - sample.h_msl).abs() < 1e-9);
        assert!((interpolated.z - sample.z).abs() < 1e-9);
        assert!((interpolated.vx - sample.vx).abs() < 1e-9);
        assert!((interpolated.vy - sample.vy).abs() < 1e-9);
        assert!((interpolated.heading - sample.heading).abs() < 1e-9);
        // positional fields are linear only up to the spherical curvature
        assert!((interpolated.x - sample.x).abs() < 1e-3);
        assert!((interpolated.y - sample.y).abs() < 1e-3);
        assert!((interpolated.dist_2d - sample.dist_2d).abs() < 1e-3);
        assert!((interpolated.dist_3d - sample.dist_3d).abs() < 1e-3);
    }
}

#[test]
fn interpolation_stays_finite_around_closely_spaced_fixes() {
    // one millisecond is the finest spacing the logger can produce; the
    // strict brackets keep the weight denominator away from zero there
    let records = vec![
        modern_record(0.0, 0.0, 0.0, 3000.0, 0.0, 10.0, 5.0),
        modern_record(1.0, 0.0, 0.0001, 2995.0, 0.0, 10.0, 5.0),
        modern_record(1.001, 0.0, 0.000_100_1, 2994.995, 0.0, 10.0, 5.0),
        modern_record(2.0, 0.0, 0.0002, 2990.0, 0.0, 10.0, 5.0),
    ];
    let mut track = Track::new();
    track.import(&records).unwrap();
    track.derive_all().unwrap();

    for t in [1.0, 1.0005, 1.001] {
        let sample = track.interpolate_at_t(t).unwrap();
        assert!(sample.t.is_finite(), "t query {t} yielded {}", sample.t);
        assert!(sample.h_msl.is_finite());
        assert!(sample.x.is_finite());
        assert!(sample.vx.is_finite());
    }
    // an exact hit on the first of the pair blends across it
    let hit = track.interpolate_at_t(1.0).unwrap();
    assert!((hit.t - 1.0).abs() < 1e-9);
}

#[test]
fn interpolation_blends_between_samples() {
    let track = get_track();
    let mid = track.interpolate_at_t(0.5).unwrap();
    assert!((mid.t - 0.5).abs() < 1e-12);
    assert!((mid.h_msl - 2997.5).abs() < 1e-9);
    let position = mid.position.unwrap();
    assert!((position.longitude - 0.00005).abs() < 1e-12);
}
