//! FDBAQ Huffman code tables and the flat lookup-table decoder.
//!
//! Each of the five bit-rate codes selects a fixed prefix code over sample
//! magnitudes. An encoded sample is one sign bit followed by a magnitude
//! code. Rather than walking the code tree bit by bit, each table is expanded
//! once into a flat array indexed by the next `max_len` bits of the stream,
//! yielding the magnitude and the number of bits to consume in a single load.

use std::sync::LazyLock;

use crate::bits::BitReader;
use crate::{Error, Result};

/// Magnitude codes per BRC as `(bits, bit_len, magnitude)`, sign bit excluded.
///
/// Values follow the SAR Space Protocol Data Unit code trees.
const BRC0_CODES: &[(u16, u8, u8)] = &[
    (0b0, 1, 0),
    (0b10, 2, 1),
    (0b110, 3, 2),
    (0b111, 3, 3),
];

const BRC1_CODES: &[(u16, u8, u8)] = &[
    (0b0, 1, 0),
    (0b10, 2, 1),
    (0b110, 3, 2),
    (0b1110, 4, 3),
    (0b1111, 4, 4),
];

const BRC2_CODES: &[(u16, u8, u8)] = &[
    (0b0, 1, 0),
    (0b10, 2, 1),
    (0b110, 3, 2),
    (0b1110, 4, 3),
    (0b11110, 5, 4),
    (0b111110, 6, 5),
    (0b111111, 6, 6),
];

const BRC3_CODES: &[(u16, u8, u8)] = &[
    (0b00, 2, 0),
    (0b01, 2, 1),
    (0b10, 2, 2),
    (0b110, 3, 3),
    (0b1110, 4, 4),
    (0b11110, 5, 5),
    (0b111110, 6, 6),
    (0b1111110, 7, 7),
    (0b11111110, 8, 8),
    (0b11111111, 8, 9),
];

const BRC4_CODES: &[(u16, u8, u8)] = &[
    (0b00, 2, 0),
    (0b010, 3, 1),
    (0b011, 3, 2),
    (0b100, 3, 3),
    (0b101, 3, 4),
    (0b1100, 4, 5),
    (0b1101, 4, 6),
    (0b1110, 4, 7),
    (0b11110, 5, 8),
    (0b111110, 6, 9),
    (0b11111100, 8, 10),
    (0b11111101, 8, 11),
    (0b111111100, 9, 12),
    (0b111111101, 9, 13),
    (0b111111110, 9, 14),
    (0b111111111, 9, 15),
];

/// Alphabet size (number of magnitude codes) per BRC.
pub(crate) const MCODES_PER_BRC: [usize; 5] = [
    BRC0_CODES.len(),
    BRC1_CODES.len(),
    BRC2_CODES.len(),
    BRC3_CODES.len(),
    BRC4_CODES.len(),
];

#[derive(Clone, Copy, Default)]
struct LutEntry {
    magnitude: u8,
    /// Total code length in bits, sign included. Zero marks a pattern no
    /// code covers.
    len: u8,
}

pub(crate) struct CodeTable {
    brc: u8,
    /// Longest full code in bits, sign included.
    max_len: u32,
    entries: Vec<LutEntry>,
}

impl CodeTable {
    fn build(brc: u8, codes: &[(u16, u8, u8)]) -> Self {
        let max_len = u32::from(codes.iter().map(|&(_, len, _)| len).max().unwrap()) + 1;
        let mut entries = vec![LutEntry::default(); 1 << max_len];
        for sign in 0..2u32 {
            for &(bits, len, magnitude) in codes {
                let total = u32::from(len) + 1;
                let prefix = sign << len | u32::from(bits);
                let fill = max_len - total;
                for low in 0..(1u32 << fill) {
                    entries[(prefix << fill | low) as usize] = LutEntry {
                        magnitude,
                        len: total as u8,
                    };
                }
            }
        }
        CodeTable {
            brc,
            max_len,
            entries,
        }
    }

    /// Decode one `(sign, magnitude)` sample from the stream.
    ///
    /// # Errors
    /// [`Error::TruncatedPayload`] when the stream ends mid-symbol and
    /// [`Error::HuffmanOverflow`] when no code covers the peeked pattern.
    pub(crate) fn decode_symbol(&self, reader: &mut BitReader) -> Result<(bool, u8)> {
        let pattern = reader.peek(self.max_len);
        let entry = self.entries[pattern as usize];
        if entry.len == 0 {
            return Err(Error::HuffmanOverflow {
                brc: self.brc,
                pattern,
            });
        }
        reader.advance(u32::from(entry.len))?;
        let sign = pattern >> (self.max_len - 1) == 1;
        Ok((sign, entry.magnitude))
    }
}

static TABLES: LazyLock<[CodeTable; 5]> = LazyLock::new(|| {
    [
        CodeTable::build(0, BRC0_CODES),
        CodeTable::build(1, BRC1_CODES),
        CodeTable::build(2, BRC2_CODES),
        CodeTable::build(3, BRC3_CODES),
        CodeTable::build(4, BRC4_CODES),
    ]
});

/// Look up the code table for a bit-rate code.
///
/// # Errors
/// [`Error::InvalidBrc`] for values outside 0..=4.
pub(crate) fn table_for(brc: u8) -> Result<&'static CodeTable> {
    if brc > 4 {
        return Err(Error::InvalidBrc(brc));
    }
    Ok(&TABLES[usize::from(brc)])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expected_max_code_lengths() {
        let max_lens: Vec<u32> = (0..5).map(|brc| table_for(brc).unwrap().max_len).collect();
        assert_eq!(max_lens, [4, 5, 7, 9, 10]);
    }

    #[test]
    fn codes_form_complete_prefix_codes() {
        // Every possible max_len bit pattern must map to exactly one code.
        for brc in 0..5 {
            let table = table_for(brc).unwrap();
            for (pattern, entry) in table.entries.iter().enumerate() {
                assert!(
                    entry.len > 0,
                    "BRC {brc} leaves pattern {pattern:#b} unreachable"
                );
            }
        }
    }

    #[test]
    fn decode_brc0_sequence() {
        // sign 0 + "0" (mag 0), sign 1 + "10" (mag 1), sign 0 + "111" (mag 3),
        // sign 1 + "110" (mag 2) = 00 110 0111 1110 -> 0011_0011_1111_0000
        let dat = [0b0011_0011, 0b1111_0000];
        let mut r = BitReader::new(&dat);
        let table = table_for(0).unwrap();
        assert_eq!(table.decode_symbol(&mut r).unwrap(), (false, 0));
        assert_eq!(table.decode_symbol(&mut r).unwrap(), (true, 1));
        assert_eq!(table.decode_symbol(&mut r).unwrap(), (false, 3));
        assert_eq!(table.decode_symbol(&mut r).unwrap(), (true, 2));
        assert_eq!(r.position(), 13);
    }

    #[test]
    fn decode_brc4_longest_code() {
        // sign 1 + "111111111" (mag 15)
        let dat = [0b1111_1111, 0b1100_0000];
        let mut r = BitReader::new(&dat);
        let table = table_for(4).unwrap();
        assert_eq!(table.decode_symbol(&mut r).unwrap(), (true, 15));
        assert_eq!(r.position(), 10);
    }

    #[test]
    fn symbol_truncated_mid_code_fails() {
        // One byte only: sign 1 + "1111111..." needs 10 bits
        let dat = [0b1111_1111];
        let mut r = BitReader::new(&dat);
        let table = table_for(4).unwrap();
        let err = table.decode_symbol(&mut r).unwrap_err();
        assert!(matches!(err, Error::TruncatedPayload { .. }));
    }

    #[test]
    fn brc_out_of_range() {
        assert!(matches!(table_for(5), Err(Error::InvalidBrc(5))));
    }
}
