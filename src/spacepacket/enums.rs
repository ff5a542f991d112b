//! Typed views of the secondary header code fields.
//!
//! Every enum converts from its raw code with `From<u8>` and back with
//! `code()`. Codes outside the defined set are kept in a `Reserved` variant so
//! parsing never loses the raw value.

use serde::{Deserialize, Serialize};

use crate::constants::F_REF;

/// BAQ compression mode of the sample payload.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum BaqMode {
    Bypass,
    Baq3Bit,
    Baq4Bit,
    Baq5Bit,
    Fdbaq0,
    Fdbaq1,
    Fdbaq2,
    Reserved(u8),
}

impl From<u8> for BaqMode {
    fn from(code: u8) -> Self {
        match code {
            0 => BaqMode::Bypass,
            3 => BaqMode::Baq3Bit,
            4 => BaqMode::Baq4Bit,
            5 => BaqMode::Baq5Bit,
            12 => BaqMode::Fdbaq0,
            13 => BaqMode::Fdbaq1,
            14 => BaqMode::Fdbaq2,
            v => BaqMode::Reserved(v),
        }
    }
}

impl BaqMode {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            BaqMode::Bypass => 0,
            BaqMode::Baq3Bit => 3,
            BaqMode::Baq4Bit => 4,
            BaqMode::Baq5Bit => 5,
            BaqMode::Fdbaq0 => 12,
            BaqMode::Fdbaq1 => 13,
            BaqMode::Fdbaq2 => 14,
            BaqMode::Reserved(v) => v,
        }
    }

    #[must_use]
    pub fn is_fdbaq(self) -> bool {
        matches!(self, BaqMode::Fdbaq0 | BaqMode::Fdbaq1 | BaqMode::Fdbaq2)
    }
}

/// Range decimation filter selection.
///
/// Code 2 is absent from the instrument tables and parses as `Reserved(2)`.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RangeDecimation {
    Rgdec0,
    Rgdec1,
    Rgdec3,
    Rgdec4,
    Rgdec5,
    Rgdec6,
    Rgdec7,
    Rgdec8,
    Rgdec9,
    Rgdec10,
    Rgdec11,
    Reserved(u8),
}

impl From<u8> for RangeDecimation {
    fn from(code: u8) -> Self {
        match code {
            0 => RangeDecimation::Rgdec0,
            1 => RangeDecimation::Rgdec1,
            3 => RangeDecimation::Rgdec3,
            4 => RangeDecimation::Rgdec4,
            5 => RangeDecimation::Rgdec5,
            6 => RangeDecimation::Rgdec6,
            7 => RangeDecimation::Rgdec7,
            8 => RangeDecimation::Rgdec8,
            9 => RangeDecimation::Rgdec9,
            10 => RangeDecimation::Rgdec10,
            11 => RangeDecimation::Rgdec11,
            v => RangeDecimation::Reserved(v),
        }
    }
}

impl RangeDecimation {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            RangeDecimation::Rgdec0 => 0,
            RangeDecimation::Rgdec1 => 1,
            RangeDecimation::Rgdec3 => 3,
            RangeDecimation::Rgdec4 => 4,
            RangeDecimation::Rgdec5 => 5,
            RangeDecimation::Rgdec6 => 6,
            RangeDecimation::Rgdec7 => 7,
            RangeDecimation::Rgdec8 => 8,
            RangeDecimation::Rgdec9 => 9,
            RangeDecimation::Rgdec10 => 10,
            RangeDecimation::Rgdec11 => 11,
            RangeDecimation::Reserved(v) => v,
        }
    }

    /// Decimation ratio L/M applied to the 4·F_REF ADC rate.
    #[must_use]
    pub fn decimation_ratio(self) -> Option<(u32, u32)> {
        match self {
            RangeDecimation::Rgdec0 => Some((3, 4)),
            RangeDecimation::Rgdec1 => Some((2, 3)),
            RangeDecimation::Rgdec3 => Some((5, 9)),
            RangeDecimation::Rgdec4 => Some((4, 9)),
            RangeDecimation::Rgdec5 => Some((3, 8)),
            RangeDecimation::Rgdec6 => Some((1, 3)),
            RangeDecimation::Rgdec7 => Some((1, 6)),
            RangeDecimation::Rgdec8 => Some((3, 7)),
            RangeDecimation::Rgdec9 => Some((5, 16)),
            RangeDecimation::Rgdec10 => Some((3, 26)),
            RangeDecimation::Rgdec11 => Some((4, 11)),
            RangeDecimation::Reserved(_) => None,
        }
    }

    /// Sample rate after decimation: (L/M) · 4 · F_REF, Hz.
    #[must_use]
    pub fn sample_rate_hz(self) -> Option<f64> {
        self.decimation_ratio()
            .map(|(l, m)| f64::from(l) / f64::from(m) * 4.0 * F_REF)
    }

    /// Decimation filter length NF in samples.
    #[must_use]
    pub fn filter_length(self) -> Option<u32> {
        match self {
            RangeDecimation::Rgdec0 | RangeDecimation::Rgdec1 => Some(28),
            RangeDecimation::Rgdec3 => Some(32),
            RangeDecimation::Rgdec4 => Some(40),
            RangeDecimation::Rgdec5 => Some(48),
            RangeDecimation::Rgdec6 => Some(52),
            RangeDecimation::Rgdec7 => Some(92),
            RangeDecimation::Rgdec8 => Some(36),
            RangeDecimation::Rgdec9 => Some(68),
            RangeDecimation::Rgdec10 => Some(120),
            RangeDecimation::Rgdec11 => Some(44),
            RangeDecimation::Reserved(_) => None,
        }
    }
}

/// Signal type carried by the packet (4-bit SIGTYP code).
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SignalType {
    Echo,
    Noise,
    TxCal,
    RxCal,
    EpdnCal,
    TaCal,
    ApdnCal,
    TxHCalIso,
    Reserved(u8),
}

impl From<u8> for SignalType {
    fn from(code: u8) -> Self {
        match code {
            0 => SignalType::Echo,
            1 => SignalType::Noise,
            8 => SignalType::TxCal,
            9 => SignalType::RxCal,
            10 => SignalType::EpdnCal,
            11 => SignalType::TaCal,
            12 => SignalType::ApdnCal,
            15 => SignalType::TxHCalIso,
            v => SignalType::Reserved(v),
        }
    }
}

impl SignalType {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            SignalType::Echo => 0,
            SignalType::Noise => 1,
            SignalType::TxCal => 8,
            SignalType::RxCal => 9,
            SignalType::EpdnCal => 10,
            SignalType::TaCal => 11,
            SignalType::ApdnCal => 12,
            SignalType::TxHCalIso => 15,
            SignalType::Reserved(v) => v,
        }
    }

    #[must_use]
    pub fn is_echo(self) -> bool {
        self == SignalType::Echo
    }
}

/// Transmit/receive polarisation configuration (3-bit code, all values defined).
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum Polarisation {
    TxH,
    TxHRxH,
    TxHRxV,
    TxHRxVH,
    TxV,
    TxVRxH,
    TxVRxV,
    TxVRxVH,
}

impl From<u8> for Polarisation {
    fn from(code: u8) -> Self {
        match code & 0x7 {
            0 => Polarisation::TxH,
            1 => Polarisation::TxHRxH,
            2 => Polarisation::TxHRxV,
            3 => Polarisation::TxHRxVH,
            4 => Polarisation::TxV,
            5 => Polarisation::TxVRxH,
            6 => Polarisation::TxVRxV,
            _ => Polarisation::TxVRxVH,
        }
    }
}

impl Polarisation {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Polarisation::TxH => 0,
            Polarisation::TxHRxH => 1,
            Polarisation::TxHRxV => 2,
            Polarisation::TxHRxVH => 3,
            Polarisation::TxV => 4,
            Polarisation::TxVRxH => 5,
            Polarisation::TxVRxV => 6,
            Polarisation::TxVRxVH => 7,
        }
    }
}

/// Front-end / tile-amplifier temperature compensation (2-bit code).
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TemperatureComp {
    FeOffTaOff,
    FeOnTaOff,
    FeOffTaOn,
    FeOnTaOn,
}

impl From<u8> for TemperatureComp {
    fn from(code: u8) -> Self {
        match code & 0x3 {
            0 => TemperatureComp::FeOffTaOff,
            1 => TemperatureComp::FeOnTaOff,
            2 => TemperatureComp::FeOffTaOn,
            _ => TemperatureComp::FeOnTaOn,
        }
    }
}

impl TemperatureComp {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            TemperatureComp::FeOffTaOff => 0,
            TemperatureComp::FeOnTaOff => 1,
            TemperatureComp::FeOffTaOn => 2,
            TemperatureComp::FeOnTaOn => 3,
        }
    }
}

/// SAS SSB flag: selects the imaging or calibration interpretation of the
/// beam-address fields.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SsbFlag {
    Imaging,
    Calibration,
}

impl From<u8> for SsbFlag {
    fn from(code: u8) -> Self {
        if code & 1 == 0 {
            SsbFlag::Imaging
        } else {
            SsbFlag::Calibration
        }
    }
}

/// Instrument test mode (3-bit TSTMOD code; 1..=3 are not defined).
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TestMode {
    Default,
    ContingencyRxmOperational,
    ContingencyRxmBypassed,
    Oper,
    Bypass,
    Reserved(u8),
}

impl From<u8> for TestMode {
    fn from(code: u8) -> Self {
        match code {
            0 => TestMode::Default,
            4 => TestMode::ContingencyRxmOperational,
            5 => TestMode::ContingencyRxmBypassed,
            6 => TestMode::Oper,
            7 => TestMode::Bypass,
            v => TestMode::Reserved(v),
        }
    }
}

impl TestMode {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            TestMode::Default => 0,
            TestMode::ContingencyRxmOperational => 4,
            TestMode::ContingencyRxmBypassed => 5,
            TestMode::Oper => 6,
            TestMode::Bypass => 7,
            TestMode::Reserved(v) => v,
        }
    }
}

/// Receive channel identifier.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum RxChannelId {
    VPol,
    HPol,
    Reserved(u8),
}

impl From<u8> for RxChannelId {
    fn from(code: u8) -> Self {
        match code {
            0 => RxChannelId::VPol,
            1 => RxChannelId::HPol,
            v => RxChannelId::Reserved(v),
        }
    }
}

/// SAS test mode, only meaningful for calibration packets.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum SasTestMode {
    Active,
    NormalCalibration,
}

impl From<u8> for SasTestMode {
    fn from(code: u8) -> Self {
        if code & 1 == 0 {
            SasTestMode::Active
        } else {
            SasTestMode::NormalCalibration
        }
    }
}

/// Calibration signal type (3-bit CALTYP code, calibration packets only).
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CalType {
    TxCal,
    RxCal,
    EpdnCal,
    TaCal,
    ApdnCal,
    TxHCalIso,
    Reserved(u8),
}

impl From<u8> for CalType {
    fn from(code: u8) -> Self {
        match code {
            0 => CalType::TxCal,
            1 => CalType::RxCal,
            2 => CalType::EpdnCal,
            3 => CalType::TaCal,
            4 => CalType::ApdnCal,
            7 => CalType::TxHCalIso,
            v => CalType::Reserved(v),
        }
    }
}

/// Internal calibration sequencing mode (2-bit CALMOD code).
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum CalibrationMode {
    InterleavedPcc2,
    PreamblePostamblePcc2,
    Pcc32,
    Rf672,
}

impl From<u8> for CalibrationMode {
    fn from(code: u8) -> Self {
        match code & 0x3 {
            0 => CalibrationMode::InterleavedPcc2,
            1 => CalibrationMode::PreamblePostamblePcc2,
            2 => CalibrationMode::Pcc32,
            _ => CalibrationMode::Rf672,
        }
    }
}

/// ECC number: the instrument measurement mode.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub enum EccNumber {
    Stripmap1,
    Stripmap2,
    Stripmap3,
    Stripmap4,
    Stripmap5North,
    Stripmap6,
    InterferometricWideSwath,
    WaveMode,
    Stripmap5South,
    Stripmap1NoInterleavedCal,
    Stripmap2NoInterleavedCal,
    Stripmap3NoInterleavedCal,
    Stripmap4NoInterleavedCal,
    RfcMode,
    TestMode,
    ElevationNotchS3,
    AzimuthNotchS1,
    AzimuthNotchS2,
    AzimuthNotchS3,
    AzimuthNotchS4,
    AzimuthNotchS5North,
    AzimuthNotchS5South,
    AzimuthNotchS6,
    Stripmap5NorthNoInterleavedCal,
    Stripmap5SouthNoInterleavedCal,
    Stripmap6NoInterleavedCal,
    ElevationNotchS3NoInterleavedCal,
    ExtraWideSwath,
    AzimuthNotchS1NoInterleavedCal,
    AzimuthNotchS3NoInterleavedCal,
    AzimuthNotchS6NoInterleavedCal,
    NoiseCharacterisationS1,
    NoiseCharacterisationS2,
    NoiseCharacterisationS3,
    NoiseCharacterisationS4,
    NoiseCharacterisationS5North,
    NoiseCharacterisationS5South,
    NoiseCharacterisationS6,
    NoiseCharacterisationEws,
    NoiseCharacterisationIws,
    NoiseCharacterisationWave,
    /// Codes reserved for ground testing or mode upgrades.
    Contingency(u8),
}

impl From<u8> for EccNumber {
    fn from(code: u8) -> Self {
        match code {
            1 => EccNumber::Stripmap1,
            2 => EccNumber::Stripmap2,
            3 => EccNumber::Stripmap3,
            4 => EccNumber::Stripmap4,
            5 => EccNumber::Stripmap5North,
            6 => EccNumber::Stripmap6,
            8 => EccNumber::InterferometricWideSwath,
            9 => EccNumber::WaveMode,
            10 => EccNumber::Stripmap5South,
            11 => EccNumber::Stripmap1NoInterleavedCal,
            12 => EccNumber::Stripmap2NoInterleavedCal,
            13 => EccNumber::Stripmap3NoInterleavedCal,
            14 => EccNumber::Stripmap4NoInterleavedCal,
            15 => EccNumber::RfcMode,
            16 => EccNumber::TestMode,
            17 => EccNumber::ElevationNotchS3,
            18 => EccNumber::AzimuthNotchS1,
            19 => EccNumber::AzimuthNotchS2,
            20 => EccNumber::AzimuthNotchS3,
            21 => EccNumber::AzimuthNotchS4,
            22 => EccNumber::AzimuthNotchS5North,
            23 => EccNumber::AzimuthNotchS5South,
            24 => EccNumber::AzimuthNotchS6,
            25 => EccNumber::Stripmap5NorthNoInterleavedCal,
            26 => EccNumber::Stripmap5SouthNoInterleavedCal,
            27 => EccNumber::Stripmap6NoInterleavedCal,
            31 => EccNumber::ElevationNotchS3NoInterleavedCal,
            32 => EccNumber::ExtraWideSwath,
            33 => EccNumber::AzimuthNotchS1NoInterleavedCal,
            34 => EccNumber::AzimuthNotchS3NoInterleavedCal,
            35 => EccNumber::AzimuthNotchS6NoInterleavedCal,
            37 => EccNumber::NoiseCharacterisationS1,
            38 => EccNumber::NoiseCharacterisationS2,
            39 => EccNumber::NoiseCharacterisationS3,
            40 => EccNumber::NoiseCharacterisationS4,
            41 => EccNumber::NoiseCharacterisationS5North,
            42 => EccNumber::NoiseCharacterisationS5South,
            43 => EccNumber::NoiseCharacterisationS6,
            44 => EccNumber::NoiseCharacterisationEws,
            45 => EccNumber::NoiseCharacterisationIws,
            46 => EccNumber::NoiseCharacterisationWave,
            v => EccNumber::Contingency(v),
        }
    }
}

impl EccNumber {
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            EccNumber::Stripmap1 => 1,
            EccNumber::Stripmap2 => 2,
            EccNumber::Stripmap3 => 3,
            EccNumber::Stripmap4 => 4,
            EccNumber::Stripmap5North => 5,
            EccNumber::Stripmap6 => 6,
            EccNumber::InterferometricWideSwath => 8,
            EccNumber::WaveMode => 9,
            EccNumber::Stripmap5South => 10,
            EccNumber::Stripmap1NoInterleavedCal => 11,
            EccNumber::Stripmap2NoInterleavedCal => 12,
            EccNumber::Stripmap3NoInterleavedCal => 13,
            EccNumber::Stripmap4NoInterleavedCal => 14,
            EccNumber::RfcMode => 15,
            EccNumber::TestMode => 16,
            EccNumber::ElevationNotchS3 => 17,
            EccNumber::AzimuthNotchS1 => 18,
            EccNumber::AzimuthNotchS2 => 19,
            EccNumber::AzimuthNotchS3 => 20,
            EccNumber::AzimuthNotchS4 => 21,
            EccNumber::AzimuthNotchS5North => 22,
            EccNumber::AzimuthNotchS5South => 23,
            EccNumber::AzimuthNotchS6 => 24,
            EccNumber::Stripmap5NorthNoInterleavedCal => 25,
            EccNumber::Stripmap5SouthNoInterleavedCal => 26,
            EccNumber::Stripmap6NoInterleavedCal => 27,
            EccNumber::ElevationNotchS3NoInterleavedCal => 31,
            EccNumber::ExtraWideSwath => 32,
            EccNumber::AzimuthNotchS1NoInterleavedCal => 33,
            EccNumber::AzimuthNotchS3NoInterleavedCal => 34,
            EccNumber::AzimuthNotchS6NoInterleavedCal => 35,
            EccNumber::NoiseCharacterisationS1 => 37,
            EccNumber::NoiseCharacterisationS2 => 38,
            EccNumber::NoiseCharacterisationS3 => 39,
            EccNumber::NoiseCharacterisationS4 => 40,
            EccNumber::NoiseCharacterisationS5North => 41,
            EccNumber::NoiseCharacterisationS5South => 42,
            EccNumber::NoiseCharacterisationS6 => 43,
            EccNumber::NoiseCharacterisationEws => 44,
            EccNumber::NoiseCharacterisationIws => 45,
            EccNumber::NoiseCharacterisationWave => 46,
            EccNumber::Contingency(v) => v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baq_roundtrip() {
        for code in 0u8..32 {
            assert_eq!(BaqMode::from(code).code(), code);
        }
        assert!(BaqMode::from(12).is_fdbaq());
        assert!(!BaqMode::from(0).is_fdbaq());
        assert_eq!(BaqMode::from(7), BaqMode::Reserved(7));
    }

    #[test]
    fn rgdec_two_is_reserved() {
        let r = RangeDecimation::from(2);
        assert_eq!(r, RangeDecimation::Reserved(2));
        assert_eq!(r.sample_rate_hz(), None);
        assert_eq!(r.code(), 2);
    }

    #[test]
    fn rgdec_sample_rates() {
        let r = RangeDecimation::from(0);
        let rate = r.sample_rate_hz().unwrap();
        assert!((rate - 3.0 * F_REF).abs() < 1e-6);
        let r = RangeDecimation::from(10);
        let rate = r.sample_rate_hz().unwrap();
        assert!((rate - 6.0 / 13.0 * F_REF).abs() < 1e-6);
    }

    #[test]
    fn signal_type_roundtrip() {
        for code in 0u8..16 {
            assert_eq!(SignalType::from(code).code(), code);
        }
        assert!(SignalType::from(0).is_echo());
        assert_eq!(SignalType::from(5), SignalType::Reserved(5));
    }

    #[test]
    fn ecc_roundtrip() {
        for code in 0u8..48 {
            assert_eq!(EccNumber::from(code).code(), code);
        }
        assert_eq!(EccNumber::from(8), EccNumber::InterferometricWideSwath);
        assert_eq!(EccNumber::from(0), EccNumber::Contingency(0));
    }
}
