//! Synthetic flight fixtures shared by the crate test suites.

use crate::raw::{ModernRecord, RawRecord};
use crate::sample::Sample;
use chrono::{DateTime, TimeDelta, Utc};

/// Metres of arc per degree on the mean-radius sphere.
pub const M_PER_DEG: f64 = 111_194.926_644_558_73;

/// Fixed start instant for synthetic tracks.
pub fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2022-04-10T10:00:00Z")
        .unwrap()
        .with_timezone(&Utc)
}

/// A modern-schema record `secs` after [`base_time`].
pub fn modern_record(
    secs: f64,
    lat: f64,
    lon: f64,
    h_msl: f64,
    vel_n: f64,
    vel_e: f64,
    vel_d: f64,
) -> RawRecord {
    RawRecord::Modern(ModernRecord {
        time: base_time() + TimeDelta::milliseconds((secs * 1000.0).round() as i64),
        lat,
        lon,
        h_msl,
        vel_n,
        vel_e,
        vel_d,
        h_acc: 1.0,
        v_acc: 1.5,
        s_acc: 0.5,
        gps_fix: 3,
        num_sv: 9,
    })
}

/// Records of a straight constant-velocity flight starting on the equator at
/// (0, 0), 3000 m MSL, sampled every `dt` seconds.
///
/// Positions are obtained by integrating the velocity on the mean-radius
/// sphere, so the geodetic distance between consecutive fixes matches the
/// travelled path to well below a millimetre at this scale.
pub fn constant_velocity_records(
    n: usize,
    dt: f64,
    vel_n: f64,
    vel_e: f64,
    vel_d: f64,
) -> Vec<RawRecord> {
    (0..n)
        .map(|i| {
            let t = i as f64 * dt;
            modern_record(
                t,
                vel_n * t / M_PER_DEG,
                vel_e * t / M_PER_DEG,
                3000.0 - vel_d * t,
                vel_n,
                vel_e,
                vel_d,
            )
        })
        .collect()
}

/// A bare sample with only the normalized time set, for exercising the
/// numerical helpers without running the pipeline.
pub fn sample_with_t(t: f64) -> Sample {
    let mut sample = Sample::new(
        base_time() + TimeDelta::milliseconds((t * 1000.0).round() as i64),
        None,
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
        0.0,
        0,
    );
    sample.t = t;
    sample
}
