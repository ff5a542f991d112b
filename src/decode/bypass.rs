//! Bypass (uncompressed) payload decoding.
//!
//! Bypass payloads store each sample as a 10-bit sign-magnitude word: one
//! sign bit (set meaning negative) and 9 magnitude bits. The four channels
//! appear in order IE, IO, QE, QO, each padded up to a 16-bit word boundary,
//! so every channel occupies `2 * ceil(10 * num_quads / 16)` bytes.

use num_complex::Complex32;

use crate::bits::BitReader;
use crate::Result;

fn decode_channel(reader: &mut BitReader, num_quads: usize) -> Result<Vec<f32>> {
    let mut samples = Vec::with_capacity(num_quads);
    for _ in 0..num_quads {
        let (sign, magnitude) = reader.read_sign_magnitude(10)?;
        let value = magnitude as f32;
        samples.push(if sign { -value } else { value });
    }
    reader.align_to_word();
    Ok(samples)
}

/// Decode a bypass payload into `2 * num_quads` interleaved complex samples:
/// `IE0+jQE0, IO0+jQO0, IE1+jQE1, ...`.
///
/// # Errors
/// [`crate::Error::TruncatedPayload`] when the payload is shorter than the
/// four channels require.
pub fn decode_bypass_payload(data: &[u8], num_quads: usize) -> Result<Vec<Complex32>> {
    let mut reader = BitReader::new(data);
    let ie = decode_channel(&mut reader, num_quads)?;
    let io = decode_channel(&mut reader, num_quads)?;
    let qe = decode_channel(&mut reader, num_quads)?;
    let qo = decode_channel(&mut reader, num_quads)?;

    let mut samples = Vec::with_capacity(2 * num_quads);
    for i in 0..num_quads {
        samples.push(Complex32::new(ie[i], qe[i]));
        samples.push(Complex32::new(io[i], qo[i]));
    }
    Ok(samples)
}
