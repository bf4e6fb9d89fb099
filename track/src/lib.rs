// SPDX-FileCopyrightText: 2025 All contributors
//
// SPDX-License-Identifier: GPL-2.0-or-later

//! Track derivation pipeline
//!
//! Turns a batch of raw GNSS/IMU fix records into a fully derived flight
//! trajectory: normalized time, ground-relative altitude, smoothed
//! accelerations, wind-corrected position and velocity, cumulative distances,
//! unwrapped heading and aerodynamic coefficients, plus a binary-search
//! interpolation facility over the derived series.

use algorithm::{bearing, distance, slope};
use common::constants::{A_GRAVITY, GAS_CONST, LAPSE_RATE, MM_AIR, SL_PRESSURE, SL_TEMP};
use common::raw::RawRecord;
use common::sample::Sample;
use common::wind::{Wind, WindSpeedDirection};
use std::fmt;
use tracing::{debug, info};

/// Errors reported by the import and derivation path.
///
/// Numerical degeneracies (duplicate timestamps in a regression window, zero
/// horizontal or total speed) are deliberately not errors: they propagate NaN
/// through the affected derived fields so a single bad fix cannot abort the
/// derivation of a whole track.
#[derive(Debug)]
pub enum TrackError {
    /// The track holds no samples, so there is no first or last fix to
    /// reference. Raised before any derivation stage runs.
    EmptyTrack,
    /// A raw record carried a date/time that could not be parsed.
    InvalidTimestamp(chrono::ParseError),
}

impl fmt::Display for TrackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackError::EmptyTrack => write!(f, "track holds no samples"),
            TrackError::InvalidTimestamp(e) => {
                write!(f, "raw record holds an invalid timestamp: {e}")
            }
        }
    }
}

impl std::error::Error for TrackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrackError::EmptyTrack => None,
            TrackError::InvalidTimestamp(e) => Some(e),
        }
    }
}

/// Selects how the ground altitude is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroundReference {
    /// Ground is the MSL altitude of the last sample, assuming the track
    /// ends on the ground.
    Automatic,
    /// Ground is the fixed value configured in [`TrackOptions`].
    Manual,
}

/// Pipeline configuration, set before [`Track::derive_all`] runs.
///
/// Changing a field and re-deriving is the only mutation path of a track.
/// Note that the resolved ground, wind and course are cached across
/// re-derivations (see [`Track::invalidate_origins`]), so toggling
/// `wind_adjustment` keeps the established origin.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackOptions {
    pub ground_reference: GroundReference,
    /// Ground altitude in meters MSL, used with [`GroundReference::Manual`].
    pub fixed_reference: f64,
    /// Subtract the wind vector from horizontal position and velocity.
    pub wind_adjustment: bool,
    /// Manual wind east component (m/s).
    pub wind_e: f64,
    /// Manual wind north component (m/s).
    pub wind_n: f64,
    /// Vehicle mass (kg), used by the aerodynamics stage.
    pub mass: f64,
    /// Wing planform area (m^2), used by the aerodynamics stage.
    pub planform_area: f64,
}

impl Default for TrackOptions {
    fn default() -> Self {
        TrackOptions {
            ground_reference: GroundReference::Manual,
            fixed_reference: 0.0,
            wind_adjustment: false,
            wind_e: 0.0,
            wind_n: 0.0,
            mass: 90.0,
            planform_area: 2.0,
        }
    }
}

/// A flight track: the ordered sample array, the pipeline configuration and
/// the cached origins resolved on first derivation.
///
/// Lifecycle: created empty, populated by one bulk [`import`](Track::import),
/// derived by [`derive_all`](Track::derive_all) and read-only afterwards,
/// except for explicit re-derivation after a configuration change.
///
/// The track is the single owner of its samples; no derivation state is
/// shared. `derive_all` must not be called concurrently with reads of the
/// derived fields on the same track.
#[derive(Debug, Default)]
pub struct Track {
    pub options: TrackOptions,
    samples: Vec<Sample>,
    ground: Option<f64>,
    wind: Option<Wind>,
    course: Option<f64>,
    derived: bool,
}

impl Track {
    pub fn new() -> Self {
        Track::default()
    }

    /// Bulk-imports raw records, replacing any previous samples.
    ///
    /// Records without a usable fix are filtered out before sample
    /// construction. The remaining records must already be in strictly
    /// increasing timestamp order; that precondition belongs to the upstream
    /// log reader and is only debug-asserted here.
    ///
    /// # Errors
    ///
    /// [`TrackError::InvalidTimestamp`] when a legacy record holds an
    /// unparsable date/time.
    pub fn import(&mut self, records: &[RawRecord]) -> Result<(), TrackError> {
        let mut samples = Vec::with_capacity(records.len());
        for record in records {
            if !record.has_fix() {
                continue;
            }
            let sample = record.normalize().map_err(TrackError::InvalidTimestamp)?;
            samples.push(sample);
        }
        debug_assert!(
            samples.windows(2).all(|w| w[0].time < w[1].time),
            "raw records must arrive in strictly increasing timestamp order"
        );
        if samples.len() < records.len() {
            debug!(
                "Filtered {} raw records without a usable fix",
                records.len() - samples.len()
            );
        }
        info!(
            "Imported {} samples from {} raw records",
            samples.len(),
            records.len()
        );
        self.samples = samples;
        self.derived = false;
        Ok(())
    }

    /// Read-only access to the ordered sample array.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Returns `true` when the last derivation ran to completion. Readers of
    /// derived fields must check this before rendering.
    pub fn is_derived(&self) -> bool {
        self.derived
    }

    /// The ground altitude resolved by the last derivation, if any.
    pub fn ground(&self) -> Option<f64> {
        self.ground
    }

    /// The reference course resolved by the last derivation, if any.
    pub fn course(&self) -> Option<f64> {
        self.course
    }

    /// Clears the cached ground, wind and course so the next derivation
    /// resolves them from the current options again.
    ///
    /// Without this call a re-derivation reuses the cached values bit for
    /// bit, which keeps the established origin stable across configuration
    /// tweaks such as a wind-adjustment toggle.
    pub fn invalidate_origins(&mut self) {
        self.ground = None;
        self.wind = None;
        self.course = None;
        self.derived = false;
    }

    /// The wind vector used by the pipeline: the cached resolved wind if a
    /// derivation has run, the manually configured vector otherwise.
    pub fn get_wind(&self) -> Wind {
        self.wind
            .unwrap_or(Wind::new(self.options.wind_e, self.options.wind_n))
    }

    /// Wind in polar form (speed and meteorological "from" direction) for
    /// display.
    pub fn get_wind_speed_direction(&self) -> WindSpeedDirection {
        self.get_wind().speed_direction()
    }

    /// Runs the full derivation over the sample array.
    ///
    /// The eight stages run strictly in order, each a complete pass: time
    /// normalization, altitude referencing, raw-velocity acceleration,
    /// wind-adjusted position/velocity, cumulative distance with exit
    /// re-zeroing, heading resolution, velocity-dependent rates and
    /// aerodynamics. Each stage populates exactly the fields later stages
    /// consume.
    ///
    /// Re-running after a configuration change repeats all stages but reuses
    /// the cached ground, wind and course unless
    /// [`invalidate_origins`](Track::invalidate_origins) was called.
    ///
    /// # Errors
    ///
    /// [`TrackError::EmptyTrack`] when no samples survived the import filter;
    /// checked before any stage touches the array.
    pub fn derive_all(&mut self) -> Result<(), TrackError> {
        if self.samples.is_empty() {
            return Err(TrackError::EmptyTrack);
        }
        self.derived = false;
        self.init_time();
        self.init_altitude();
        self.init_acceleration();
        self.init_position_velocity()?;
        self.init_distance()?;
        self.init_heading();
        self.init_rates();
        self.init_aerodynamics();
        self.derived = true;
        info!("Derived {} samples", self.samples.len());
        Ok(())
    }

    /// Stage 1: seconds since track start, millisecond resolution.
    fn init_time(&mut self) {
        let start = self.samples[0].time;
        for sample in &mut self.samples {
            sample.t = (sample.time - start).num_milliseconds() as f64 / 1000.0;
        }
    }

    /// Stage 2: height above the resolved ground reference.
    fn init_altitude(&mut self) {
        let ground = match self.ground {
            Some(ground) => ground,
            None => match self.options.ground_reference {
                GroundReference::Automatic => {
                    self.samples[self.samples.len() - 1].h_msl
                }
                GroundReference::Manual => self.options.fixed_reference,
            },
        };
        self.ground = Some(ground);
        debug!("Using ground reference {ground} m MSL");
        for sample in &mut self.samples {
            sample.z = sample.h_msl - ground;
        }
    }

    /// Stage 3: acceleration from the raw velocity slopes, decomposed along
    /// and across the raw track direction. Wind independent by design, so a
    /// wind-adjustment toggle does not change these fields.
    fn init_acceleration(&mut self) {
        for i in 0..self.samples.len() {
            let accel_n = slope(&self.samples, i, |s| s.vel_n);
            let accel_e = slope(&self.samples, i, |s| s.vel_e);
            let accel_d = slope(&self.samples, i, |s| s.vel_d);

            let sample = &mut self.samples[i];
            // zero horizontal speed leaves ax/ay as NaN
            let vh = sample.ground_speed();
            sample.ax = (accel_n * sample.vel_n + accel_e * sample.vel_e) / vh;
            sample.ay = (accel_e * sample.vel_n - accel_n * sample.vel_e) / vh;
            sample.az = accel_d;
            sample.amag =
                (accel_n * accel_n + accel_e * accel_e + accel_d * accel_d).sqrt();
        }
    }

    /// Stage 4: planar position relative to the exit and horizontal velocity,
    /// both shifted by the wind vector when wind adjustment is enabled.
    fn init_position_velocity(&mut self) -> Result<(), TrackError> {
        let wind = self.get_wind();
        self.wind = Some(wind);
        debug!(
            "Using wind east {} m/s, north {} m/s (adjustment {})",
            wind.east, wind.north, self.options.wind_adjustment
        );
        let exit = self
            .interpolate_at_t(0.0)
            .ok_or(TrackError::EmptyTrack)?;
        for i in 0..self.samples.len() {
            let d = distance(&exit, &self.samples[i]);
            let b = bearing(&exit, &self.samples[i]);
            let sample = &mut self.samples[i];
            if self.options.wind_adjustment {
                sample.x = d * b.sin() - wind.east * sample.t;
                sample.y = d * b.cos() - wind.north * sample.t;
                sample.vx = sample.vel_e - wind.east;
                sample.vy = sample.vel_n - wind.north;
            } else {
                sample.x = d * b.sin();
                sample.y = d * b.cos();
                sample.vx = sample.vel_e;
                sample.vy = sample.vel_n;
            }
        }
        Ok(())
    }

    /// Stage 5: cumulative 2D/3D path length, then re-zeroing of position and
    /// distance at the interpolated `t = 0` sample so every positional field
    /// is exit relative.
    fn init_distance(&mut self) -> Result<(), TrackError> {
        let mut dist_2d = 0.0;
        let mut dist_3d = 0.0;
        self.samples[0].dist_2d = 0.0;
        self.samples[0].dist_3d = 0.0;
        for i in 1..self.samples.len() {
            let dh = distance(&self.samples[i - 1], &self.samples[i]);
            let dz = self.samples[i].h_msl - self.samples[i - 1].h_msl;
            dist_2d += dh;
            dist_3d += dh.hypot(dz);
            self.samples[i].dist_2d = dist_2d;
            self.samples[i].dist_3d = dist_3d;
        }

        let exit = self
            .interpolate_at_t(0.0)
            .ok_or(TrackError::EmptyTrack)?;
        for sample in &mut self.samples {
            sample.x -= exit.x;
            sample.y -= exit.y;
            sample.dist_2d -= exit.dist_2d;
            sample.dist_3d -= exit.dist_3d;
        }
        Ok(())
    }

    /// Stage 6: absolute heading with ±180° unwrap against the previous
    /// sample, course relative to the resolved reference and heading
    /// accuracy.
    fn init_heading(&mut self) {
        let course = self.course.unwrap_or(0.0);
        self.course = Some(course);
        let mut prev_heading: Option<f64> = None;
        for sample in &mut self.samples {
            let mut heading = sample.vx.atan2(sample.vy).to_degrees();
            if let Some(prev) = prev_heading {
                while heading < prev - 180.0 {
                    heading += 360.0;
                }
                while heading >= prev + 180.0 {
                    heading -= 360.0;
                }
            }
            prev_heading = Some(heading);
            sample.heading = heading;
            sample.theta = heading - course;
            let total_speed = sample.total_speed();
            sample.c_acc = if total_speed == 0.0 {
                0.0
            } else {
                sample.s_acc / total_speed
            };
        }
    }

    /// Stage 7: smoothed rates of the velocity-dependent quantities.
    fn init_rates(&mut self) {
        for i in 0..self.samples.len() {
            let curv = slope(&self.samples, i, Sample::dive_angle);
            let accel = slope(&self.samples, i, Sample::total_speed);
            let omega = slope(&self.samples, i, |s| s.theta);
            let sample = &mut self.samples[i];
            sample.curv = curv;
            sample.accel = accel;
            sample.omega = omega;
        }
    }

    /// Stage 8: lift and drag coefficients.
    ///
    /// The smoothed wind-adjusted acceleration, with gravity removed from the
    /// vertical component, is split into a drag part along the velocity
    /// vector and a lift part orthogonal to it. Dividing by the dynamic
    /// pressure (standard-atmosphere density at the sample's MSL altitude)
    /// and the wing loading yields the non-dimensional coefficients.
    fn init_aerodynamics(&mut self) {
        for i in 0..self.samples.len() {
            let accel_n = slope(&self.samples, i, |s| s.vy);
            let accel_e = slope(&self.samples, i, |s| s.vx);
            let accel_d = slope(&self.samples, i, |s| s.vel_d) - A_GRAVITY;

            let sample = &mut self.samples[i];
            let v_total = sample.total_speed();
            let accel_drag = (accel_n * sample.vy
                + accel_e * sample.vx
                + accel_d * sample.vel_d)
                / v_total;
            let accel_lift = (accel_n * accel_n + accel_e * accel_e + accel_d * accel_d
                - accel_drag * accel_drag)
                .sqrt();

            let temperature = SL_TEMP - LAPSE_RATE * sample.h_msl;
            let pressure = SL_PRESSURE
                * (1.0 - LAPSE_RATE * sample.h_msl / SL_TEMP)
                    .powf(A_GRAVITY * MM_AIR / GAS_CONST / LAPSE_RATE);
            let air_density = pressure * MM_AIR / GAS_CONST / temperature;
            let dynamic_pressure = air_density * v_total * v_total / 2.0;

            sample.lift =
                self.options.mass * accel_lift / dynamic_pressure / self.options.planform_area;
            sample.drag = self.options.mass * accel_drag.abs()
                / dynamic_pressure
                / self.options.planform_area;
        }
    }

    /// Largest index whose normalized time is strictly below `t`, or `None`
    /// when `t` is at or before the first sample.
    pub fn find_index_below_t(&self, t: f64) -> Option<usize> {
        let mut below: i64 = -1;
        let mut above = self.samples.len() as i64;
        while below + 1 != above {
            let mid = (below + above) / 2;
            if self.samples[mid as usize].t < t {
                below = mid;
            } else {
                above = mid;
            }
        }
        (below >= 0).then_some(below as usize)
    }

    /// Smallest index whose normalized time is strictly above `t`, or `None`
    /// when `t` is at or past the last sample.
    pub fn find_index_above_t(&self, t: f64) -> Option<usize> {
        let mut below: i64 = -1;
        let mut above = self.samples.len() as i64;
        while below + 1 != above {
            let mid = (below + above + 1) / 2;
            if self.samples[mid as usize].t > t {
                above = mid;
            } else {
                below = mid;
            }
        }
        (above < self.samples.len() as i64).then_some(above as usize)
    }

    /// The derived sample at an arbitrary track time `t`.
    ///
    /// Queries outside the recorded range clamp to the first respectively
    /// last sample; in between, every numeric field is linearly interpolated
    /// between the nearest samples strictly below and above `t`. This is the
    /// same mechanism the pipeline uses internally to locate the exit
    /// reference at `t = 0`.
    ///
    /// Returns `None` only for an empty track. The strict below/above
    /// brackets always select two samples with distinct times on a track
    /// honoring the import ordering precondition, so the interpolation weight
    /// stays finite even for fixes a single millisecond apart.
    pub fn interpolate_at_t(&self, t: f64) -> Option<Sample> {
        let below = self.find_index_below_t(t);
        let above = self.find_index_above_t(t);
        match (below, above) {
            (None, _) => self.samples.first().cloned(),
            (_, None) => self.samples.last().cloned(),
            (Some(i1), Some(i2)) => {
                let s1 = &self.samples[i1];
                let s2 = &self.samples[i2];
                let a = (t - s1.t) / (s2.t - s1.t);
                Some(Sample::interpolate(s1, s2, a))
            }
        }
    }
}
