//! Physical constants used by the altitude and aerodynamics stages.

/// Standard acceleration due to gravity (m/s^2)
pub const A_GRAVITY: f64 = 9.80665;

/// Sea level pressure (Pa)
pub const SL_PRESSURE: f64 = 101_325.0;

/// Temperature lapse rate (K/m)
pub const LAPSE_RATE: f64 = 0.0065;

/// Sea level temperature (K)
pub const SL_TEMP: f64 = 288.15;

/// Molar mass of dry air (kg/mol)
pub const MM_AIR: f64 = 0.028_964_4;

/// Universal gas constant (J/mol/K)
pub const GAS_CONST: f64 = 8.31447;
