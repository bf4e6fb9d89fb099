use crate::position::Position;
use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// One fix of a flight track: the raw GNSS/IMU fields plus every quantity the
/// derivation pipeline computes for this instant.
///
/// The raw fields are immutable after construction. The derived fields start
/// out as NaN and are populated stage by stage while a track is derived; a
/// field is only meaningful once the stage that owns it has run.
///
/// Velocity components follow the NED convention: `vel_n` points north,
/// `vel_e` east and `vel_d` down (positive while descending).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// UTC timestamp of the fix.
    pub time: DateTime<Utc>,

    /// Geodetic position, `None` for dead-reckoned fixes.
    pub position: Option<Position>,

    /// Height above mean sea level (m).
    pub h_msl: f64,

    pub vel_n: f64,
    pub vel_e: f64,
    pub vel_d: f64,

    /// Horizontal accuracy estimate (m).
    pub h_acc: f64,
    /// Vertical accuracy estimate (m).
    pub v_acc: f64,
    /// Speed accuracy estimate (m/s).
    pub s_acc: f64,

    /// Number of satellites used in the fix.
    pub num_sv: u8,

    /// Seconds since track start.
    pub t: f64,
    /// Height above the resolved ground reference (m).
    pub z: f64,

    /// Along-track acceleration (m/s^2).
    pub ax: f64,
    /// Cross-track acceleration (m/s^2).
    pub ay: f64,
    /// Vertical acceleration (m/s^2).
    pub az: f64,
    /// Total acceleration magnitude (m/s^2).
    pub amag: f64,

    /// Planar east offset from the exit (m), wind adjusted when enabled.
    pub x: f64,
    /// Planar north offset from the exit (m), wind adjusted when enabled.
    pub y: f64,
    /// Horizontal east velocity (m/s), wind adjusted when enabled.
    pub vx: f64,
    /// Horizontal north velocity (m/s), wind adjusted when enabled.
    pub vy: f64,

    /// Cumulative horizontal path length from the exit (m).
    pub dist_2d: f64,
    /// Cumulative 3D path length from the exit (m).
    pub dist_3d: f64,

    /// Unwrapped absolute heading (deg).
    pub heading: f64,
    /// Heading relative to the reference course (deg).
    pub theta: f64,
    /// Heading accuracy (rad), `s_acc` over total speed.
    pub c_acc: f64,

    /// Rate of change of the dive angle (deg/s).
    pub curv: f64,
    /// Rate of change of the total speed (m/s^2).
    pub accel: f64,
    /// Rate of change of the course (deg/s).
    pub omega: f64,

    /// Non-dimensional lift coefficient.
    pub lift: f64,
    /// Non-dimensional drag coefficient.
    pub drag: f64,
}

impl Sample {
    /// Creates a sample from raw fix data with all derived fields unset (NaN).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        time: DateTime<Utc>,
        position: Option<Position>,
        h_msl: f64,
        vel_n: f64,
        vel_e: f64,
        vel_d: f64,
        h_acc: f64,
        v_acc: f64,
        s_acc: f64,
        num_sv: u8,
    ) -> Self {
        Sample {
            time,
            position,
            h_msl,
            vel_n,
            vel_e,
            vel_d,
            h_acc,
            v_acc,
            s_acc,
            num_sv,
            t: f64::NAN,
            z: f64::NAN,
            ax: f64::NAN,
            ay: f64::NAN,
            az: f64::NAN,
            amag: f64::NAN,
            x: f64::NAN,
            y: f64::NAN,
            vx: f64::NAN,
            vy: f64::NAN,
            dist_2d: f64::NAN,
            dist_3d: f64::NAN,
            heading: f64::NAN,
            theta: f64::NAN,
            c_acc: f64::NAN,
            curv: f64::NAN,
            accel: f64::NAN,
            omega: f64::NAN,
            lift: f64::NAN,
            drag: f64::NAN,
        }
    }

    /// Returns `true` when the fix carries a geodetic position.
    pub fn has_geodetic(&self) -> bool {
        self.position.is_some()
    }

    /// Horizontal speed over the wind-adjusted velocity (m/s).
    ///
    /// Only meaningful after the position/velocity stage has run.
    pub fn vh(&self) -> f64 {
        self.vx.hypot(self.vy)
    }

    /// Total air-relative speed (m/s).
    pub fn total_speed(&self) -> f64 {
        (self.vx * self.vx + self.vy * self.vy + self.vel_d * self.vel_d).sqrt()
    }

    /// Angle of the velocity vector below the horizontal plane (deg).
    pub fn dive_angle(&self) -> f64 {
        self.vel_d.atan2(self.vh()).to_degrees()
    }

    /// Horizontal speed divided by descent speed.
    pub fn glide_ratio(&self) -> f64 {
        self.vh() / self.vel_d
    }

    /// Horizontal speed over the raw ground velocity (m/s).
    pub fn ground_speed(&self) -> f64 {
        self.vel_n.hypot(self.vel_e)
    }

    /// Linearly interpolates every field between two samples.
    ///
    /// `a` is the fractional weight towards `s2`; 0 yields `s1`, 1 yields
    /// `s2`. The timestamp is blended on the millisecond offset between the
    /// two fixes, the geodetic position only when both samples carry one, and
    /// the satellite count rounds to the nearest integer. Values of `a`
    /// outside `[0, 1]` extrapolate.
    pub fn interpolate(s1: &Sample, s2: &Sample, a: f64) -> Sample {
        let millis = (s2.time - s1.time).num_milliseconds() as f64;
        let time = s1.time + TimeDelta::milliseconds((millis * a).round() as i64);
        let position = match (s1.position, s2.position) {
            (Some(p1), Some(p2)) => Some(Position {
                latitude: lerp(p1.latitude, p2.latitude, a),
                longitude: lerp(p1.longitude, p2.longitude, a),
            }),
            _ => None,
        };
        Sample {
            time,
            position,
            h_msl: lerp(s1.h_msl, s2.h_msl, a),
            vel_n: lerp(s1.vel_n, s2.vel_n, a),
            vel_e: lerp(s1.vel_e, s2.vel_e, a),
            vel_d: lerp(s1.vel_d, s2.vel_d, a),
            h_acc: lerp(s1.h_acc, s2.h_acc, a),
            v_acc: lerp(s1.v_acc, s2.v_acc, a),
            s_acc: lerp(s1.s_acc, s2.s_acc, a),
            num_sv: lerp(f64::from(s1.num_sv), f64::from(s2.num_sv), a).round() as u8,
            t: lerp(s1.t, s2.t, a),
            z: lerp(s1.z, s2.z, a),
            ax: lerp(s1.ax, s2.ax, a),
            ay: lerp(s1.ay, s2.ay, a),
            az: lerp(s1.az, s2.az, a),
            amag: lerp(s1.amag, s2.amag, a),
            x: lerp(s1.x, s2.x, a),
            y: lerp(s1.y, s2.y, a),
            vx: lerp(s1.vx, s2.vx, a),
            vy: lerp(s1.vy, s2.vy, a),
            dist_2d: lerp(s1.dist_2d, s2.dist_2d, a),
            dist_3d: lerp(s1.dist_3d, s2.dist_3d, a),
            heading: lerp(s1.heading, s2.heading, a),
            theta: lerp(s1.theta, s2.theta, a),
            c_acc: lerp(s1.c_acc, s2.c_acc, a),
            curv: lerp(s1.curv, s2.curv, a),
            accel: lerp(s1.accel, s2.accel, a),
            omega: lerp(s1.omega, s2.omega, a),
            lift: lerp(s1.lift, s2.lift, a),
            drag: lerp(s1.drag, s2.drag, a),
        }
    }
}

fn lerp(v1: f64, v2: f64, a: f64) -> f64 {
    v1 + (v2 - v1) * a
}
