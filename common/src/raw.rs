use crate::position::Position;
use crate::sample::Sample;
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// Raw log row of the legacy firmware generation.
///
/// Lat/lon are integers in 1e-7 degrees, the MSL altitude is in millimetres
/// and the ground speed in mm/s. The logger records no velocity components;
/// north/east velocity is reconstructed from ground speed and heading during
/// normalization, the vertical channel and the accuracy estimates are not
/// available in this schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LegacyRecord {
    #[serde(rename = "rtcDate")]
    pub rtc_date: String,
    #[serde(rename = "rtcTime")]
    pub rtc_time: String,
    #[serde(rename = "gps_Date")]
    pub gps_date: String,
    #[serde(rename = "gps_Time")]
    pub gps_time: String,
    #[serde(rename = "gps_Lat")]
    pub gps_lat: i64,
    #[serde(rename = "gps_Long")]
    pub gps_long: i64,
    #[serde(rename = "gps_AltMSL")]
    pub gps_alt_msl: f64,
    #[serde(rename = "gps_SIV")]
    pub gps_siv: u8,
    #[serde(rename = "gps_FixType")]
    pub gps_fix_type: u8,
    #[serde(rename = "gps_GroundSpeed")]
    pub gps_ground_speed: f64,
    #[serde(rename = "gps_Heading")]
    pub gps_heading: f64,
}

/// Raw log row of the modern firmware generation, already in SI units with an
/// RFC 3339 timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModernRecord {
    pub time: DateTime<Utc>,
    pub lat: f64,
    pub lon: f64,
    #[serde(rename = "hMSL")]
    pub h_msl: f64,
    #[serde(rename = "velN")]
    pub vel_n: f64,
    #[serde(rename = "velE")]
    pub vel_e: f64,
    #[serde(rename = "velD")]
    pub vel_d: f64,
    #[serde(rename = "hAcc")]
    pub h_acc: f64,
    #[serde(rename = "vAcc")]
    pub v_acc: f64,
    #[serde(rename = "sAcc")]
    pub s_acc: f64,
    #[serde(rename = "gpsFix")]
    pub gps_fix: u8,
    #[serde(rename = "numSV")]
    pub num_sv: u8,
}

/// A raw fix record of either firmware generation.
///
/// The schema distinction exists only at the ingestion boundary. Both
/// variants normalize into the canonical [`Sample`] representation and the
/// pipeline never sees which generation a fix came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawRecord {
    Legacy(LegacyRecord),
    Modern(ModernRecord),
}

impl RawRecord {
    /// Returns `true` when the record carries a usable fix.
    ///
    /// Legacy loggers report a fix type of 0 when there is no fix at all;
    /// modern loggers report the fix dimension, where only a 3D fix (3 or
    /// better) carries a valid vertical channel.
    pub fn has_fix(&self) -> bool {
        match self {
            RawRecord::Legacy(record) => record.gps_fix_type != 0,
            RawRecord::Modern(record) => record.gps_fix >= 3,
        }
    }

    /// Converts the record into the canonical [`Sample`] representation.
    ///
    /// Legacy records scale their integer fields into SI units and
    /// reconstruct the north/east velocity from ground speed and heading.
    /// Parsing the legacy date/time strings is the only fallible step.
    pub fn normalize(&self) -> Result<Sample, chrono::ParseError> {
        match self {
            RawRecord::Legacy(record) => {
                let datetime = format!("{} {}", record.gps_date, record.gps_time);
                let time = NaiveDateTime::parse_from_str(&datetime, "%Y-%m-%d %H:%M:%S%.f")?
                    .and_utc();
                let position = Position {
                    latitude: record.gps_lat as f64 / 10_000_000.0,
                    longitude: record.gps_long as f64 / 10_000_000.0,
                };
                let ground_speed = record.gps_ground_speed / 1000.0;
                let heading = record.gps_heading.to_radians();
                Ok(Sample::new(
                    time,
                    Some(position),
                    record.gps_alt_msl / 1000.0,
                    ground_speed * heading.cos(),
                    ground_speed * heading.sin(),
                    0.0,
                    0.0,
                    0.0,
                    0.0,
                    record.gps_siv,
                ))
            }
            RawRecord::Modern(record) => Ok(Sample::new(
                record.time,
                Some(Position {
                    latitude: record.lat,
                    longitude: record.lon,
                }),
                record.h_msl,
                record.vel_n,
                record.vel_e,
                record.vel_d,
                record.h_acc,
                record.v_acc,
                record.s_acc,
                record.num_sv,
            )),
        }
    }
}
