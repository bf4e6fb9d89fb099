use crate::position::Position;
use crate::sample::Sample;
use crate::test_helper::flight::{base_time, sample_with_t};
use chrono::TimeDelta;

fn get_sample(t: f64) -> Sample {
    let mut sample = sample_with_t(t);
    sample.position = Some(Position::new(47.0 + t * 0.001, 8.0));
    sample.h_msl = 1000.0 + t * 10.0;
    sample.vx = 3.0 + t;
    sample.vy = 4.0;
    sample.vel_d = 5.0;
    sample.num_sv = 8 + t as u8;
    sample
}

#[test]
fn velocity_accessors() {
    let sample = get_sample(0.0);
    assert!((sample.vh() - 5.0).abs() < 1e-12);
    assert!((sample.total_speed() - 50.0_f64.sqrt()).abs() < 1e-12);
    assert!((sample.dive_angle() - 45.0).abs() < 1e-12);
    assert!((sample.glide_ratio() - 1.0).abs() < 1e-12);
}

#[test]
fn interpolate_blends_every_field() {
    let s1 = get_sample(0.0);
    let s2 = get_sample(2.0);
    let mid = Sample::interpolate(&s1, &s2, 0.5);

    assert_eq!(mid.time, base_time() + TimeDelta::seconds(1));
    assert!((mid.t - 1.0).abs() < 1e-12);
    assert!((mid.h_msl - 1010.0).abs() < 1e-12);
    assert!((mid.vx - 4.0).abs() < 1e-12);
    let position = mid.position.expect("both endpoints are geodetic");
    assert!((position.latitude - 47.001).abs() < 1e-12);
    assert_eq!(mid.num_sv, 9);
}

#[test]
fn interpolate_at_endpoint_weights() {
    let s1 = get_sample(0.0);
    let s2 = get_sample(2.0);
    let left = Sample::interpolate(&s1, &s2, 0.0);
    assert_eq!(left.time, s1.time);
    assert_eq!(left.t, s1.t);
    assert_eq!(left.vx, s1.vx);
    let right = Sample::interpolate(&s1, &s2, 1.0);
    assert_eq!(right.time, s2.time);
    assert_eq!(right.t, s2.t);
    assert_eq!(right.vx, s2.vx);
}

#[test]
fn interpolate_drops_position_in_dead_reckoned_mode() {
    let s1 = get_sample(0.0);
    let mut s2 = get_sample(2.0);
    s2.position = None;
    assert!(Sample::interpolate(&s1, &s2, 0.5).position.is_none());
}

#[test]
fn new_sample_has_unset_derived_fields() {
    let sample = Sample::new(
        base_time(),
        None,
        1000.0,
        1.0,
        2.0,
        3.0,
        0.0,
        0.0,
        0.0,
        7,
    );
    assert!(!sample.has_geodetic());
    assert!(sample.t.is_nan());
    assert!(sample.x.is_nan());
    assert!(sample.lift.is_nan());
}
