//! Sub-commutated ephemeris reassembly.
//!
//! Each packet carries one 16-bit word of a 64-word ancillary block, with a
//! counter cycling 1..=64 across consecutive packets. A complete cycle
//! yields the satellite state: ECEF position and velocity, attitude
//! quaternions, angular rates, and the fixed-point POD/attitude timestamps.
//! Runs broken by counter gaps, or that never reach word 64, are skipped.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::spacepacket::MetadataTable;

/// Number of sub-commutated words in a full ancillary cycle.
const WORDS_PER_CYCLE: usize = 64;

/// One reassembled ancillary block.
#[derive(Serialize, Deserialize, Debug, Clone, Copy)]
pub struct EphemerisRecord {
    /// Row index of the packet carrying word 1.
    pub start_row: usize,
    /// Datation of the first packet of the cycle, seconds on the GPS scale.
    pub time_secs: f64,
    /// ECEF position, metres.
    pub position_m: [f64; 3],
    /// ECEF velocity, metres per second.
    pub velocity_mps: [f32; 3],
    /// POD position/velocity solution timestamp, seconds.
    pub pod_timestamp_secs: f64,
    /// Attitude quaternion Q0..Q3.
    pub quaternion: [f32; 4],
    /// Body angular rates, radians per second.
    pub angular_rate_rps: [f32; 3],
    /// Attitude solution timestamp, seconds.
    pub attitude_timestamp_secs: f64,
}

/// All ephemeris records recovered from a file.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct EphemerisTable {
    pub records: Vec<EphemerisRecord>,
    /// Cycles that started (word index 1 seen) but were broken or ran past
    /// the end of the file.
    pub skipped_runs: usize,
}

/// Scan the metadata stream and decode every complete sub-commutated cycle.
///
/// A cycle must start at counter value 1 and progress 1, 2, ..., 64 over 64
/// consecutive packets. Anything else is skipped silently apart from the
/// [`EphemerisTable::skipped_runs`] count; a partial stream before the first
/// counter 1 is not counted.
#[must_use]
pub fn decode_ephemeris(table: &MetadataTable) -> EphemerisTable {
    let packets = table.packets();
    let mut out = EphemerisTable::default();

    let mut row = 0;
    while row < packets.len() {
        let Some(first) = &packets[row].secondary else {
            row += 1;
            continue;
        };
        if first.subcom_word_index != 1 {
            row += 1;
            continue;
        }

        let mut words = [0u16; WORDS_PER_CYCLE];
        let mut complete = true;
        for step in 0..WORDS_PER_CYCLE {
            match packets.get(row + step).and_then(|p| p.secondary.as_ref()) {
                Some(hdr) if usize::from(hdr.subcom_word_index) == step + 1 => {
                    words[step] = hdr.subcom_word;
                }
                _ => {
                    complete = false;
                    break;
                }
            }
        }

        if complete {
            out.records.push(decode_cycle(row, first.time_secs(), &words));
            row += WORDS_PER_CYCLE;
        } else {
            trace!(row, "broken sub-commutated cycle");
            out.skipped_runs += 1;
            row += 1;
        }
    }

    debug!(
        records = out.records.len(),
        skipped = out.skipped_runs,
        "reassembled sub-commutated ephemeris"
    );
    out
}

/// Decode the known fields of a 64-word block.
///
/// Word offsets (0-based): position X/Y/Z as big-endian f64 at 0..12,
/// velocity X/Y/Z as f32 at 12..18, POD timestamp at 18..22, quaternions at
/// 22..30, angular rates at 30..36, attitude timestamp at 36..40. The
/// remaining words are not decoded.
fn decode_cycle(start_row: usize, time_secs: f64, words: &[u16; WORDS_PER_CYCLE]) -> EphemerisRecord {
    EphemerisRecord {
        start_row,
        time_secs,
        position_m: [
            f64_from_words(&words[0..4]),
            f64_from_words(&words[4..8]),
            f64_from_words(&words[8..12]),
        ],
        velocity_mps: [
            f32_from_words(&words[12..14]),
            f32_from_words(&words[14..16]),
            f32_from_words(&words[16..18]),
        ],
        pod_timestamp_secs: timestamp_from_words(&words[18..22]),
        quaternion: [
            f32_from_words(&words[22..24]),
            f32_from_words(&words[24..26]),
            f32_from_words(&words[26..28]),
            f32_from_words(&words[28..30]),
        ],
        angular_rate_rps: [
            f32_from_words(&words[30..32]),
            f32_from_words(&words[32..34]),
            f32_from_words(&words[34..36]),
        ],
        attitude_timestamp_secs: timestamp_from_words(&words[36..40]),
    }
}

fn f64_from_words(words: &[u16]) -> f64 {
    let bits = u64::from(words[0]) << 48
        | u64::from(words[1]) << 32
        | u64::from(words[2]) << 16
        | u64::from(words[3]);
    f64::from_bits(bits)
}

fn f32_from_words(words: &[u16]) -> f32 {
    f32::from_bits(u32::from(words[0]) << 16 | u32::from(words[1]))
}

/// Fixed-point timestamp: 32 integer and 32 fractional bits split over four
/// words.
fn timestamp_from_words(words: &[u16]) -> f64 {
    f64::from(words[0]) * 2f64.powi(24)
        + f64::from(words[1]) * 2f64.powi(8)
        + f64::from(words[2]) * 2f64.powi(-8)
        + f64::from(words[3]) * 2f64.powi(-24)
}

/// Split a value into the sub-commutated words it would occupy on the wire.
#[cfg(test)]
pub(crate) fn words_of_f64(v: f64) -> [u16; 4] {
    let bits = v.to_bits();
    [
        (bits >> 48) as u16,
        (bits >> 32) as u16,
        (bits >> 16) as u16,
        bits as u16,
    ]
}

#[cfg(test)]
pub(crate) fn words_of_f32(v: f32) -> [u16; 2] {
    let bits = v.to_bits();
    [(bits >> 16) as u16, bits as u16]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_assembly_roundtrip() {
        assert_eq!(f64_from_words(&words_of_f64(1.0)), 1.0);
        assert_eq!(f64_from_words(&words_of_f64(-7_000_123.5)), -7_000_123.5);
        assert_eq!(f32_from_words(&words_of_f32(2.5)), 2.5);
        assert_eq!(f32_from_words(&words_of_f32(-0.25)), -0.25);
    }

    #[test]
    fn timestamp_fixed_point() {
        // 1 * 2^24 + 2 * 2^8 + 256 * 2^-8 + 0 = 16777728 + 1.0...
        let t = timestamp_from_words(&[1, 2, 256, 0]);
        assert!((t - (16_777_216.0 + 512.0 + 1.0)).abs() < 1e-9);
    }

    #[test]
    fn cycle_layout() {
        let mut words = [0u16; WORDS_PER_CYCLE];
        words[0..4].copy_from_slice(&words_of_f64(1.0));
        words[4..8].copy_from_slice(&words_of_f64(2.0));
        words[8..12].copy_from_slice(&words_of_f64(3.0));
        words[12..14].copy_from_slice(&words_of_f32(4.0));
        words[14..16].copy_from_slice(&words_of_f32(5.0));
        words[16..18].copy_from_slice(&words_of_f32(6.0));
        words[22..24].copy_from_slice(&words_of_f32(0.5));
        words[24..26].copy_from_slice(&words_of_f32(-0.5));
        words[26..28].copy_from_slice(&words_of_f32(0.25));
        words[28..30].copy_from_slice(&words_of_f32(-0.25));
        words[30..32].copy_from_slice(&words_of_f32(0.001));
        words[32..34].copy_from_slice(&words_of_f32(0.002));
        words[34..36].copy_from_slice(&words_of_f32(0.003));

        let rec = decode_cycle(10, 123.5, &words);
        assert_eq!(rec.start_row, 10);
        assert_eq!(rec.position_m, [1.0, 2.0, 3.0]);
        assert_eq!(rec.velocity_mps, [4.0, 5.0, 6.0]);
        assert_eq!(rec.quaternion, [0.5, -0.5, 0.25, -0.25]);
        assert_eq!(rec.angular_rate_rps, [0.001, 0.002, 0.003]);
        assert_eq!(rec.pod_timestamp_secs, 0.0);
    }
}
