// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Numerical helpers for the track derivation pipeline
//!
//! Provides the local least-squares regression used for differentiating the
//! noisy sample series and the geodesy routines used for positioning samples
//! relative to the exit point.

use common::sample::Sample;

/// Mean Earth radius in meters, matching the spherical default of common
/// geodesy libraries.
pub const EARTH_MEAN_RADIUS: f64 = 6_371_008.8;

/// Ordinary least-squares slope of a per-sample value against normalized time
/// over a symmetric window around `center`.
///
/// The window covers up to nine samples, `[center - 4, center + 4]`, clamped
/// at the array boundaries without mirroring or padding. This is the
/// numerical-differentiation primitive behind acceleration, curvature and
/// heading-rate: fitting a line through the window is far less noise
/// sensitive than differencing adjacent fixes.
///
/// When every `t` in the window is identical (duplicate timestamps) the
/// denominator collapses to zero and the result is NaN; callers tolerate the
/// NaN instead of aborting the derivation.
///
/// # Parameters
/// - `samples`: The full sample array; only the window around `center` is read.
/// - `center`: Index of the sample the slope is evaluated at.
/// - `value`: Accessor extracting the regressed quantity from a sample.
///
/// # Returns
/// The slope in units of `value` per second, or NaN for a degenerate window.
pub fn slope<F>(samples: &[Sample], center: usize, value: F) -> f64
where
    F: Fn(&Sample) -> f64,
{
    debug_assert!(!samples.is_empty());
    let min = center.saturating_sub(4);
    let max = usize::min(samples.len() - 1, center + 4);

    let mut sum_x = 0.0;
    let mut sum_y = 0.0;
    let mut sum_xx = 0.0;
    let mut sum_xy = 0.0;

    for sample in &samples[min..=max] {
        let y = value(sample);
        sum_x += sample.t;
        sum_y += y;
        sum_xx += sample.t * sample.t;
        sum_xy += sample.t * y;
    }

    let n = (max - min + 1) as f64;
    (sum_xy - sum_x * sum_y / n) / (sum_xx - sum_x * sum_x / n)
}

/// Great-circle distance between two points on the mean-radius sphere, both
/// given in decimal degrees.
fn haversine(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let dlat = (lat2 - lat1).to_radians();
    let dlon = (lon2 - lon1).to_radians();
    let a = (dlat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_MEAN_RADIUS * a.sqrt().asin()
}

/// Distance in meters between two samples.
///
/// Uses the great-circle distance when both samples carry a geodetic fix and
/// falls back to the planar distance over the derived `(x, y)` offsets in
/// dead-reckoned mode.
pub fn distance(s1: &Sample, s2: &Sample) -> f64 {
    match (s1.position, s2.position) {
        (Some(p1), Some(p2)) => haversine(p1.latitude, p1.longitude, p2.latitude, p2.longitude),
        _ => (s2.x - s1.x).hypot(s2.y - s1.y),
    }
}

/// Bearing in radians, clockwise from north, from `s1` to `s2`.
///
/// In geodetic mode this decomposes the bearing into two independent
/// single-axis great-circle arcs, one varying only the latitude and one
/// varying only the longitude (measured on the equator), signed by the
/// coordinate deltas and combined with `atan2`. That is not the true initial
/// bearing: the longitude arc ignores the latitude scaling, so the angle
/// drifts away from the spherical solution as the track moves poleward. The
/// formula is kept for numerical parity with the tool this pipeline derives
/// from; see DESIGN.md before changing it.
///
/// In dead-reckoned mode the bearing is `atan2(dx, dy)` over the planar
/// offsets.
pub fn bearing(s1: &Sample, s2: &Sample) -> f64 {
    match (s1.position, s2.position) {
        (Some(p1), Some(p2)) => {
            let north =
                haversine(p1.latitude, 0.0, p2.latitude, 0.0).copysign(p2.latitude - p1.latitude);
            let east =
                haversine(0.0, p1.longitude, 0.0, p2.longitude).copysign(p2.longitude - p1.longitude);
            east.atan2(north)
        }
        _ => (s2.x - s1.x).atan2(s2.y - s1.y),
    }
}

#[cfg(test)]
mod tests;
