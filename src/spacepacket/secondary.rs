//! The 62-byte SAR secondary header.

use hifitime::Epoch;
use serde::{Deserialize, Serialize};

use super::enums::{
    BaqMode, CalType, CalibrationMode, EccNumber, Polarisation, RangeDecimation, RxChannelId,
    SasTestMode, SignalType, SsbFlag, TemperatureComp, TestMode,
};
use crate::bits::BitReader;
use crate::constants::F_REF;
use crate::{Error, Result};

/// Raw secondary header fields, one per packet.
///
/// Fields hold the native bit-field values; the scaled and enum views are
/// provided by accessor methods and are pure functions of the raw values.
/// The beam-address fields share storage with the calibration fields, so each
/// side is `Option` depending on [`SecondaryHeader::ssb_flag`].
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct SecondaryHeader {
    // Datation service
    pub coarse_time: u32,
    pub fine_time: u16,

    // Fixed ancillary data service
    pub sync_marker: u32,
    pub data_take_id: u32,
    pub ecc_number: u8,
    pub test_mode: u8,
    pub rx_channel_id: u8,
    pub instrument_config_id: u32,

    // Sub-commutated ancillary data service
    pub subcom_word_index: u8,
    pub subcom_word: u16,

    // Counters service
    pub space_packet_count: u32,
    pub pri_count: u32,

    // Radar configuration support service
    pub error_flag: bool,
    pub baq_mode: u8,
    pub baq_block_len: u8,
    pub range_decimation: u8,
    pub rx_gain: u8,
    pub tx_ramp_rate: u16,
    pub tx_pulse_start_freq: u16,
    pub tx_pulse_len: u32,
    pub rank: u8,
    pub pri: u32,
    pub swst: u32,
    pub swl: u32,
    pub ssb_flag: u8,
    pub polarisation: u8,
    pub temperature_comp: u8,
    pub elevation_beam_address: Option<u8>,
    pub azimuth_beam_address: Option<u16>,
    pub sas_test_mode: Option<u8>,
    pub cal_type: Option<u8>,
    pub cal_beam_address: Option<u16>,
    pub cal_mode: u8,
    pub tx_pulse_number: u8,
    pub signal_type: u8,
    pub swap_flag: bool,
    pub swath_number: u8,

    // Radar sample count service
    pub num_quads: u16,
}

impl SecondaryHeader {
    /// Size of a `SecondaryHeader` on the wire.
    pub const LEN: usize = 62;

    /// Decode from the first 62 bytes of the packet data field.
    ///
    /// # Errors
    /// [`Error::NotEnoughData`] if `buf` holds fewer than 62 bytes.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < Self::LEN {
            return Err(Error::NotEnoughData {
                actual: buf.len(),
                minimum: Self::LEN,
            });
        }
        let mut b = BitReader::new(&buf[..Self::LEN]);

        let coarse_time = b.read_u32(32)?;
        let fine_time = b.read_u32(16)? as u16;

        let sync_marker = b.read_u32(32)?;
        let data_take_id = b.read_u32(32)?;
        let ecc_number = b.read_u32(8)? as u8;
        b.advance(1)?; // unused
        let test_mode = b.read_u32(3)? as u8;
        let rx_channel_id = b.read_u32(4)? as u8;
        let instrument_config_id = b.read_u32(32)?;

        let subcom_word_index = b.read_u32(8)? as u8;
        let subcom_word = b.read_u32(16)? as u16;

        let space_packet_count = b.read_u32(32)?;
        let pri_count = b.read_u32(32)?;

        let error_flag = b.read_u32(1)? == 1;
        b.advance(2)?; // unused
        let baq_mode = b.read_u32(5)? as u8;
        let baq_block_len = b.read_u32(8)? as u8;
        b.advance(8)?; // unused
        let range_decimation = b.read_u32(8)? as u8;
        let rx_gain = b.read_u32(8)? as u8;
        let tx_ramp_rate = b.read_u32(16)? as u16;
        let tx_pulse_start_freq = b.read_u32(16)? as u16;
        let tx_pulse_len = b.read_u32(24)?;
        b.advance(3)?; // unused
        let rank = b.read_u32(5)? as u8;
        let pri = b.read_u32(24)?;
        let swst = b.read_u32(24)?;
        let swl = b.read_u32(24)?;

        let ssb_flag = b.read_u32(1)? as u8;
        let polarisation = b.read_u32(3)? as u8;
        let temperature_comp = b.read_u32(2)? as u8;
        b.advance(2)?; // unused

        // The next 16 bits carry beam addresses for imaging packets and the
        // calibration descriptor for calibration packets.
        let (elevation_beam_address, azimuth_beam_address, sas_test_mode, cal_type, cal_beam_address) =
            if ssb_flag == 0 {
                let ebadr = b.read_u32(4)? as u8;
                b.advance(2)?; // unused
                let abadr = b.read_u32(10)? as u16;
                (Some(ebadr), Some(abadr), None, None, None)
            } else {
                let sastm = b.read_u32(1)? as u8;
                let caltyp = b.read_u32(3)? as u8;
                b.advance(2)?; // unused
                let cbadr = b.read_u32(10)? as u16;
                (None, None, Some(sastm), Some(caltyp), Some(cbadr))
            };

        let cal_mode = b.read_u32(2)? as u8;
        b.advance(1)?; // unused
        let tx_pulse_number = b.read_u32(5)? as u8;
        let signal_type = b.read_u32(4)? as u8;
        b.advance(3)?; // unused
        let swap_flag = b.read_u32(1)? == 1;
        let swath_number = b.read_u32(8)? as u8;

        let num_quads = b.read_u32(16)? as u16;
        b.advance(8)?; // unused

        debug_assert_eq!(b.remaining(), 0);

        Ok(SecondaryHeader {
            coarse_time,
            fine_time,
            sync_marker,
            data_take_id,
            ecc_number,
            test_mode,
            rx_channel_id,
            instrument_config_id,
            subcom_word_index,
            subcom_word,
            space_packet_count,
            pri_count,
            error_flag,
            baq_mode,
            baq_block_len,
            range_decimation,
            rx_gain,
            tx_ramp_rate,
            tx_pulse_start_freq,
            tx_pulse_len,
            rank,
            pri,
            swst,
            swl,
            ssb_flag,
            polarisation,
            temperature_comp,
            elevation_beam_address,
            azimuth_beam_address,
            sas_test_mode,
            cal_type,
            cal_beam_address,
            cal_mode,
            tx_pulse_number,
            signal_type,
            swap_flag,
            swath_number,
            num_quads,
        })
    }

    /// Fractional-second part of the datation time, seconds.
    ///
    /// The raw counter quantizes to 2^-16 s; the half-LSB offset centers the
    /// value in its quantization bin.
    #[must_use]
    pub fn fine_time_secs(&self) -> f64 {
        (f64::from(self.fine_time) + 0.5) * 2f64.powi(-16)
    }

    /// Packet datation as seconds since the GPS epoch.
    #[must_use]
    pub fn time_secs(&self) -> f64 {
        f64::from(self.coarse_time) + self.fine_time_secs()
    }

    /// Packet datation as an epoch on the GPS timescale.
    #[must_use]
    pub fn epoch(&self) -> Epoch {
        Epoch::from_gpst_seconds(self.time_secs())
    }

    /// Sampling window start time, seconds.
    #[must_use]
    pub fn swst_secs(&self) -> f64 {
        f64::from(self.swst) / F_REF
    }

    /// Sampling window length, seconds.
    #[must_use]
    pub fn swl_secs(&self) -> f64 {
        f64::from(self.swl) / F_REF
    }

    /// Pulse repetition interval, seconds.
    #[must_use]
    pub fn pri_secs(&self) -> f64 {
        f64::from(self.pri) / F_REF
    }

    #[must_use]
    pub fn tx_pulse_len_secs(&self) -> f64 {
        f64::from(self.tx_pulse_len) / F_REF
    }

    #[must_use]
    pub fn rx_gain_db(&self) -> f64 {
        f64::from(self.rx_gain) * -0.5
    }

    /// TX pulse (chirp) ramp rate, Hz/s.
    ///
    /// Sign-magnitude with the sign bit set meaning positive.
    #[must_use]
    pub fn tx_ramp_rate_hz_per_sec(&self) -> f64 {
        let sign = if self.tx_ramp_rate >> 15 == 1 { 1.0 } else { -1.0 };
        sign * f64::from(self.tx_ramp_rate & 0x7fff) * F_REF * F_REF / 2f64.powi(21)
    }

    /// TX pulse start frequency, Hz, including the ramp-rate offset term.
    #[must_use]
    pub fn tx_pulse_start_freq_hz(&self) -> f64 {
        let sign = if self.tx_pulse_start_freq >> 15 == 1 {
            1.0
        } else {
            -1.0
        };
        self.tx_ramp_rate_hz_per_sec() / (4.0 * F_REF)
            + sign * f64::from(self.tx_pulse_start_freq & 0x7fff) * F_REF / 2f64.powi(14)
    }

    #[must_use]
    pub fn baq_mode(&self) -> BaqMode {
        BaqMode::from(self.baq_mode)
    }

    #[must_use]
    pub fn range_decimation(&self) -> RangeDecimation {
        RangeDecimation::from(self.range_decimation)
    }

    #[must_use]
    pub fn ecc_number(&self) -> EccNumber {
        EccNumber::from(self.ecc_number)
    }

    #[must_use]
    pub fn test_mode(&self) -> TestMode {
        TestMode::from(self.test_mode)
    }

    #[must_use]
    pub fn rx_channel_id(&self) -> RxChannelId {
        RxChannelId::from(self.rx_channel_id)
    }

    #[must_use]
    pub fn ssb_flag(&self) -> SsbFlag {
        SsbFlag::from(self.ssb_flag)
    }

    #[must_use]
    pub fn polarisation(&self) -> Polarisation {
        Polarisation::from(self.polarisation)
    }

    #[must_use]
    pub fn temperature_comp(&self) -> TemperatureComp {
        TemperatureComp::from(self.temperature_comp)
    }

    #[must_use]
    pub fn signal_type(&self) -> SignalType {
        SignalType::from(self.signal_type)
    }

    #[must_use]
    pub fn sas_test_mode(&self) -> Option<SasTestMode> {
        self.sas_test_mode.map(SasTestMode::from)
    }

    #[must_use]
    pub fn cal_type(&self) -> Option<CalType> {
        self.cal_type.map(CalType::from)
    }

    /// Calibration mode, or `None` when the field is don't-care (imaging
    /// packets carrying echo or noise data).
    #[must_use]
    pub fn cal_mode(&self) -> Option<CalibrationMode> {
        if self.ssb_flag() == SsbFlag::Imaging
            && matches!(self.signal_type(), SignalType::Echo | SignalType::Noise)
        {
            None
        } else {
            Some(CalibrationMode::from(self.cal_mode))
        }
    }
}
