//! Physical constants and radar parameters.

/// Radar reference clock frequency, Hz.
///
/// Timing fields in the secondary header (SWST, SWL, PRI, TX pulse length)
/// count cycles of this clock; divide the raw count by `F_REF` for seconds.
pub const F_REF: f64 = 37.534_722_24e6;

pub const SPEED_OF_LIGHT_MPS: f64 = 299_792_458.0;

/// Instrument carrier frequency, Hz (C-band).
pub const TX_FREQ_HZ: f64 = 5.405e9;

pub const TX_WAVELENGTH_M: f64 = SPEED_OF_LIGHT_MPS / TX_FREQ_HZ;
