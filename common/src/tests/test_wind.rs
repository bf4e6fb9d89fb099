use crate::wind::Wind;

#[test]
fn wind_from_due_north() {
    let polar = Wind::new(0.0, -5.0).speed_direction();
    assert!((polar.speed - 5.0).abs() < 1e-12);
    assert!(polar.direction.abs() < 1e-12);
}

#[test]
fn wind_blowing_east_comes_from_the_west() {
    // an east-blowing wind vector means the wind comes from 270 degrees
    let polar = Wind::new(5.0, 0.0).speed_direction();
    assert!((polar.speed - 5.0).abs() < 1e-12);
    assert!((polar.direction - 270.0).abs() < 1e-9);
}

#[test]
fn wind_from_south_west() {
    let polar = Wind::new(3.0, 4.0).speed_direction();
    assert!((polar.speed - 5.0).abs() < 1e-12);
    assert!((polar.direction - 216.869_897_645_844_02).abs() < 1e-9);
}

#[test]
fn calm_wind_has_zero_speed() {
    let polar = Wind::new(0.0, 0.0).speed_direction();
    assert_eq!(polar.speed, 0.0);
    assert!(polar.direction.is_finite());
}
