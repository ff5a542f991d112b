//! FDBAQ payload decoding.
//!
//! The payload carries four channels in order IE, IO, QE, QO, each holding
//! `num_quads` Huffman-coded samples split into blocks of 128. Block
//! parameters are shared between channels: the 3-bit BRC opens each IE block
//! and applies to the matching block of all four channels; the 8-bit THIDX
//! opens each QE block. Every channel is zero-padded up to a 16-bit word
//! boundary.

use num_complex::Complex32;

use super::huffman::table_for;
use super::reconstruct::reconstruct;
use crate::bits::BitReader;
use crate::{Error, Result};

/// Samples per BAQ block.
const BLOCK_LEN: usize = 128;

/// Which block parameter a channel reads at the start of each block.
#[derive(Clone, Copy, PartialEq, Eq)]
enum BlockParam {
    /// IE blocks open with the bit-rate code.
    Brc,
    /// QE blocks open with the threshold index.
    Thidx,
    /// IO and QO blocks reuse both.
    None,
}

/// Extract one channel's `(sign, mcode)` symbols, reading block parameters
/// as dictated by `param`.
fn decode_channel(
    reader: &mut BitReader,
    num_quads: usize,
    brcs: &mut Vec<u8>,
    thidxs: &mut Vec<u8>,
    param: BlockParam,
) -> Result<Vec<(bool, u8)>> {
    let num_blocks = num_quads.div_ceil(BLOCK_LEN);
    let mut symbols = Vec::with_capacity(num_quads);

    for block in 0..num_blocks {
        match param {
            BlockParam::Brc => {
                let brc = reader.read_u32(3)? as u8;
                if brc > 4 {
                    return Err(Error::InvalidBrc(brc));
                }
                brcs.push(brc);
            }
            BlockParam::Thidx => {
                thidxs.push(reader.read_u32(8)? as u8);
            }
            BlockParam::None => {}
        }
        let table = table_for(brcs[block])?;

        let block_quads = BLOCK_LEN.min(num_quads - block * BLOCK_LEN);
        for _ in 0..block_quads {
            symbols.push(table.decode_symbol(reader)?);
        }
    }

    reader.align_to_word();
    Ok(symbols)
}

/// Map a channel's symbols to sample values using its block parameters.
fn reconstruct_channel(symbols: &[(bool, u8)], brcs: &[u8], thidxs: &[u8]) -> Vec<f32> {
    symbols
        .iter()
        .enumerate()
        .map(|(i, &(sign, mcode))| {
            let block = i / BLOCK_LEN;
            reconstruct(brcs[block], thidxs[block], sign, mcode)
        })
        .collect()
}

/// Decode an FDBAQ payload into `2 * num_quads` interleaved complex samples:
/// `IE0+jQE0, IO0+jQO0, IE1+jQE1, ...`.
///
/// # Errors
/// [`Error::TruncatedPayload`] when the payload is shorter than its sample
/// count requires and [`Error::InvalidBrc`] on a corrupt bit-rate code.
pub fn decode_fdbaq_payload(data: &[u8], num_quads: usize) -> Result<Vec<Complex32>> {
    let mut reader = BitReader::new(data);
    let mut brcs: Vec<u8> = Vec::new();
    let mut thidxs: Vec<u8> = Vec::new();

    let s_ie = decode_channel(&mut reader, num_quads, &mut brcs, &mut thidxs, BlockParam::Brc)?;
    let s_io = decode_channel(&mut reader, num_quads, &mut brcs, &mut thidxs, BlockParam::None)?;
    let s_qe = decode_channel(&mut reader, num_quads, &mut brcs, &mut thidxs, BlockParam::Thidx)?;
    let s_qo = decode_channel(&mut reader, num_quads, &mut brcs, &mut thidxs, BlockParam::None)?;

    let ie = reconstruct_channel(&s_ie, &brcs, &thidxs);
    let io = reconstruct_channel(&s_io, &brcs, &thidxs);
    let qe = reconstruct_channel(&s_qe, &brcs, &thidxs);
    let qo = reconstruct_channel(&s_qo, &brcs, &thidxs);

    let mut samples = Vec::with_capacity(2 * num_quads);
    for i in 0..num_quads {
        samples.push(Complex32::new(ie[i], qe[i]));
        samples.push(Complex32::new(io[i], qo[i]));
    }
    Ok(samples)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Bit-level payload builder for hand-assembled FDBAQ streams.
    struct PayloadBuilder {
        bytes: Vec<u8>,
        bit: usize,
    }

    impl PayloadBuilder {
        fn new() -> Self {
            PayloadBuilder {
                bytes: Vec::new(),
                bit: 0,
            }
        }

        fn push(&mut self, value: u32, n: usize) {
            for i in (0..n).rev() {
                if self.bit % 8 == 0 {
                    self.bytes.push(0);
                }
                let b = (value >> i) & 1;
                let last = self.bytes.last_mut().unwrap();
                *last |= (b as u8) << (7 - self.bit % 8);
                self.bit += 1;
            }
        }

        fn align_word(&mut self) {
            while self.bit % 16 != 0 {
                self.push(0, 1);
            }
        }
    }

    #[test]
    fn single_quad_brc0() {
        // IE: BRC=0, sign 0 code "0" mag 0; IO: sign 1 code "10" mag 1;
        // QE: THIDX=0, sign 0 code "110" mag 2; QO: sign 1 code "111" mag 3.
        let mut b = PayloadBuilder::new();
        b.push(0b000, 3); // BRC
        b.push(0b00, 2); // IE sample
        b.align_word();
        b.push(0b110, 3); // IO sample
        b.align_word();
        b.push(0, 8); // THIDX
        b.push(0b0110, 4); // QE sample
        b.align_word();
        b.push(0b1111, 4); // QO sample
        b.align_word();

        let samples = decode_fdbaq_payload(&b.bytes, 1).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0], Complex32::new(0.0, 2.0));
        assert_eq!(samples[1], Complex32::new(-1.0, -3.0));
    }

    #[test]
    fn high_thidx_uses_scaled_levels() {
        // One quad, BRC=1, THIDX=200: level = NRL_B1[mcode] * SF[200]
        let mut b = PayloadBuilder::new();
        b.push(0b001, 3); // BRC=1
        b.push(0b1110, 4); // IE: sign 1, mag 2
        b.align_word();
        b.push(0b00, 2); // IO: sign 0, mag 0
        b.align_word();
        b.push(200, 8); // THIDX
        b.push(0b01111, 5); // QE: sign 0, mag 4
        b.align_word();
        b.push(0b010, 3); // QO: sign 0, mag 1
        b.align_word();

        let samples = decode_fdbaq_payload(&b.bytes, 1).unwrap();
        let sf200 = 188.31f32;
        assert!((samples[0].re + 1.5216 * sf200).abs() < 1e-2);
        assert!((samples[0].im - 2.8426 * sf200).abs() < 1e-2);
        assert!((samples[1].re - 0.3042 * sf200).abs() < 1e-2);
        assert!((samples[1].im - 0.9127 * sf200).abs() < 1e-2);
    }

    #[test]
    fn multi_block_reads_one_brc_and_thidx_per_block() {
        // 130 quads: two blocks. All samples are the 2-bit zero code, so
        // each channel block is 2*n bits of zeros plus its parameter bits.
        let num_quads = 130;
        let mut b = PayloadBuilder::new();
        for channel in 0..4 {
            for block in 0..2 {
                let n = if block == 0 { 128 } else { 2 };
                if channel == 0 {
                    b.push(0b000, 3);
                }
                if channel == 2 {
                    b.push(0, 8);
                }
                for _ in 0..n {
                    b.push(0b00, 2);
                }
            }
            b.align_word();
        }

        let samples = decode_fdbaq_payload(&b.bytes, num_quads).unwrap();
        assert_eq!(samples.len(), 2 * num_quads);
        assert!(samples.iter().all(|s| s.re == 0.0 && s.im == 0.0));
    }

    #[test]
    fn truncated_payload_is_reported() {
        let mut b = PayloadBuilder::new();
        b.push(0b000, 3);
        b.push(0b00, 2);
        // stream ends before the other channels
        let err = decode_fdbaq_payload(&b.bytes, 2).unwrap_err();
        assert!(matches!(err, Error::TruncatedPayload { .. }));
    }

    #[test]
    fn invalid_brc_is_rejected() {
        let mut b = PayloadBuilder::new();
        b.push(0b111, 3);
        b.push(0, 13);
        let err = decode_fdbaq_payload(&b.bytes, 1).unwrap_err();
        assert!(matches!(err, Error::InvalidBrc(7)));
    }

    #[test]
    fn zero_quads_decodes_to_nothing() {
        assert!(decode_fdbaq_payload(&[], 0).unwrap().is_empty());
    }
}
