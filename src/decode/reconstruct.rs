//! Sample value reconstruction for FDBAQ payloads.
//!
//! A decoded symbol is a sign and a magnitude code; the reconstruction level
//! also depends on the block's bit-rate code and threshold index. When the
//! threshold index is at or below the per-BRC simple limit the magnitude code
//! is (mostly) the value itself; otherwise the normalized reconstruction
//! levels are scaled by the threshold's sigma factor. The full
//! (BRC, THIDX, mcode) space is expanded once into a flat table so the per
//! sample cost is one load and a sign flip.

use std::sync::LazyLock;

use super::huffman::MCODES_PER_BRC;

/// Highest THIDX using simple reconstruction, per BRC.
const SIMPLE_THIDX_MAX: [u8; 5] = [3, 3, 5, 6, 8];

/// Saturated magnitude code (the last code of each alphabet), per BRC.
const MCODE_SATURATION: [u8; 5] = [3, 4, 6, 9, 15];

// Reconstruction levels for the saturated code under simple reconstruction,
// indexed by THIDX.
const B0: [f32; 4] = [
    3.0, 3.0, 3.16, 3.53,
];

const B1: [f32; 4] = [
    4.0, 4.0, 4.08, 4.37,
];

const B2: [f32; 6] = [
    6.0, 6.0, 6.0, 6.15, 6.5, 6.88,
];

const B3: [f32; 7] = [
    9.0, 9.0, 9.0, 9.0, 9.36, 9.5, 10.1,
];

const B4: [f32; 9] = [
    15.0, 15.0, 15.0, 15.0, 15.0, 15.0, 15.22, 15.5,
    16.05,
];

const NRL_B0: [f32; 4] = [
    0.3637, 1.0915, 1.8208, 2.6406,
];

const NRL_B1: [f32; 5] = [
    0.3042, 0.9127, 1.5216, 2.1313, 2.8426,
];

const NRL_B2: [f32; 7] = [
    0.2305, 0.6916, 1.1528, 1.614, 2.0754, 2.5369, 3.1191,
];

const NRL_B3: [f32; 10] = [
    0.1702, 0.5107, 0.8511, 1.1916, 1.5321, 1.8726, 2.2131, 2.5536,
    2.8942, 3.3744,
];

const NRL_B4: [f32; 16] = [
    0.113, 0.3389, 0.5649, 0.7908, 1.0167, 1.2428, 1.4687, 1.6947,
    1.9206, 2.1466, 2.3725, 2.5985, 2.8244, 3.0504, 3.2764, 3.6623,
];

const SF: [f32; 256] = [
    0.0, 0.63, 1.25, 1.88, 2.51, 3.13, 3.76, 4.39,
    5.01, 5.64, 6.27, 6.89, 7.52, 8.15, 8.77, 9.4,
    10.03, 10.65, 11.28, 11.91, 12.53, 13.16, 13.79, 14.41,
    15.04, 15.67, 16.29, 16.92, 17.55, 18.17, 18.8, 19.43,
    20.05, 20.68, 21.31, 21.93, 22.56, 23.19, 23.81, 24.44,
    25.07, 25.69, 26.32, 26.95, 27.57, 28.2, 28.83, 29.45,
    30.08, 30.71, 31.33, 31.96, 32.59, 33.21, 33.84, 34.47,
    35.09, 35.72, 36.35, 36.97, 37.6, 38.23, 38.85, 39.48,
    40.11, 40.73, 41.36, 41.99, 42.61, 43.24, 43.87, 44.49,
    45.12, 45.75, 46.37, 47.0, 47.63, 48.25, 48.88, 49.51,
    50.13, 50.76, 51.39, 52.01, 52.64, 53.27, 53.89, 54.52,
    55.15, 55.77, 56.4, 57.03, 57.65, 58.28, 58.91, 59.53,
    60.16, 60.79, 61.41, 62.04, 62.98, 64.24, 65.49, 66.74,
    68.0, 69.25, 70.5, 71.76, 73.01, 74.26, 75.52, 76.77,
    78.02, 79.28, 80.53, 81.78, 83.04, 84.29, 85.54, 86.8,
    88.05, 89.3, 90.56, 91.81, 93.06, 94.32, 95.57, 96.82,
    98.08, 99.33, 100.58, 101.84, 103.09, 104.34, 105.6, 106.85,
    108.1, 109.35, 110.61, 111.86, 113.11, 114.37, 115.62, 116.87,
    118.13, 119.38, 120.63, 121.89, 123.14, 124.39, 125.65, 126.9,
    128.15, 129.41, 130.66, 131.91, 133.17, 134.42, 135.67, 136.93,
    138.18, 139.43, 140.69, 141.94, 143.19, 144.45, 145.7, 146.95,
    148.21, 149.46, 150.71, 151.97, 153.22, 154.47, 155.73, 156.98,
    158.23, 159.49, 160.74, 161.99, 163.25, 164.5, 165.75, 167.01,
    168.26, 169.51, 170.77, 172.02, 173.27, 174.53, 175.78, 177.03,
    178.29, 179.54, 180.79, 182.05, 183.3, 184.55, 185.81, 187.06,
    188.31, 189.57, 190.82, 192.07, 193.33, 194.58, 195.83, 197.09,
    198.34, 199.59, 200.85, 202.1, 203.35, 204.61, 205.86, 207.11,
    208.37, 209.62, 210.87, 212.13, 213.38, 214.63, 215.89, 217.14,
    218.39, 219.65, 220.9, 222.15, 223.41, 224.66, 225.91, 227.17,
    228.42, 229.67, 230.93, 232.18, 233.43, 234.69, 235.94, 237.19,
    238.45, 239.7, 240.95, 242.21, 243.46, 244.71, 245.97, 247.22,
    248.47, 249.73, 250.98, 252.23, 253.49, 254.74, 255.99, 255.99,
];

fn unsigned_value(brc: usize, thidx: u8, mcode: u8) -> f32 {
    let nrl: &[f32] = match brc {
        0 => &NRL_B0,
        1 => &NRL_B1,
        2 => &NRL_B2,
        3 => &NRL_B3,
        _ => &NRL_B4,
    };
    let b: &[f32] = match brc {
        0 => &B0,
        1 => &B1,
        2 => &B2,
        3 => &B3,
        _ => &B4,
    };
    if thidx <= SIMPLE_THIDX_MAX[brc] {
        if mcode < MCODE_SATURATION[brc] {
            f32::from(mcode)
        } else {
            b[usize::from(thidx)]
        }
    } else {
        nrl[usize::from(mcode)] * SF[usize::from(thidx)]
    }
}

// Flat (BRC, THIDX, mcode) -> level table; BRC blocks are laid out back to
// back, each holding 256 THIDX strides of that BRC's alphabet size.
static LEVELS: LazyLock<Vec<f32>> = LazyLock::new(|| {
    let mut table = Vec::with_capacity(256 * MCODES_PER_BRC.iter().sum::<usize>());
    for brc in 0..5 {
        for thidx in 0..=255u8 {
            for mcode in 0..MCODES_PER_BRC[brc] as u8 {
                table.push(unsigned_value(brc, thidx, mcode));
            }
        }
    }
    table
});

fn brc_offset(brc: u8) -> usize {
    256 * MCODES_PER_BRC[..usize::from(brc)].iter().sum::<usize>()
}

/// Reconstruct one sample from its decoded symbol and block parameters.
///
/// `brc` must be 0..=4 and `mcode` within the BRC's alphabet; both are
/// guaranteed by the Huffman decoder.
#[inline]
pub(crate) fn reconstruct(brc: u8, thidx: u8, sign: bool, mcode: u8) -> f32 {
    let idx = brc_offset(brc)
        + usize::from(thidx) * MCODES_PER_BRC[usize::from(brc)]
        + usize::from(mcode);
    let value = LEVELS[idx];
    if sign {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_reconstruction_is_the_magnitude() {
        for brc in 0..5u8 {
            for mcode in 0..MCODE_SATURATION[usize::from(brc)] {
                assert_eq!(reconstruct(brc, 0, false, mcode), f32::from(mcode));
                assert_eq!(reconstruct(brc, 0, true, mcode), -f32::from(mcode));
            }
        }
    }

    #[test]
    fn saturated_code_uses_the_b_tables() {
        assert_eq!(reconstruct(0, 0, false, 3), 3.0);
        assert_eq!(reconstruct(0, 3, false, 3), 3.53);
        assert_eq!(reconstruct(1, 2, true, 4), -4.08);
        assert_eq!(reconstruct(4, 8, false, 15), 16.05);
    }

    #[test]
    fn high_thidx_scales_normalized_levels() {
        // THIDX above the simple limit: level = NRL[mcode] * SF[thidx]
        let v = reconstruct(0, 4, false, 2);
        assert!((v - 1.8208 * 2.51).abs() < 1e-4);
        let v = reconstruct(4, 255, true, 15);
        assert!((v + 3.6623 * 255.99).abs() < 1e-2);
        let v = reconstruct(2, 6, false, 0);
        assert!((v - 0.2305 * 3.76).abs() < 1e-4);
    }

    #[test]
    fn zero_keeps_its_sign_bit() {
        assert!(reconstruct(3, 0, true, 0).is_sign_negative());
        assert!(reconstruct(3, 0, false, 0).is_sign_positive());
    }
}
