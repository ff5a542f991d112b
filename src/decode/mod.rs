//! Radar sample decoding.
//!
//! Per-packet decoders for the two supported payload encodings plus a
//! parallel batch executor assembling decoded rows into a dense matrix.

mod bypass;
mod fdbaq;
mod huffman;
mod reconstruct;

use ndarray::Array2;
use num_complex::Complex32;
use rayon::prelude::*;
use tracing::{debug, warn};

pub use bypass::decode_bypass_payload;
pub use fdbaq::decode_fdbaq_payload;

use crate::spacepacket::{BaqMode, MetadataTable};
use crate::{Error, Result};

/// Default number of packets decoded per parallel batch.
///
/// Bounds the in-flight row buffers when a selection is large.
pub const DEFAULT_BATCH_SIZE: usize = 256;

/// Decode one packet payload according to its BAQ mode.
///
/// # Errors
/// [`Error::UnsupportedBaq`] for the reserved BAQ 3/4/5-bit modes,
/// [`Error::ReservedEnumValue`] for BAQ codes outside the defined set, plus
/// any error from the underlying decoder.
pub fn decode_payload(data: &[u8], num_quads: usize, baq: BaqMode) -> Result<Vec<Complex32>> {
    match baq {
        BaqMode::Bypass => decode_bypass_payload(data, num_quads),
        BaqMode::Fdbaq0 | BaqMode::Fdbaq1 | BaqMode::Fdbaq2 => {
            decode_fdbaq_payload(data, num_quads)
        }
        BaqMode::Baq3Bit | BaqMode::Baq4Bit | BaqMode::Baq5Bit => {
            Err(Error::UnsupportedBaq(baq.code()))
        }
        BaqMode::Reserved(code) => Err(Error::ReservedEnumValue {
            field: "baq_mode",
            value: code,
        }),
    }
}

/// Result of decoding a selection of packets.
#[derive(Debug)]
pub struct DecodedSelection {
    /// `(selection_len, 2 * num_quads)` matrix; row `i` holds the samples of
    /// the `i`-th selected packet. Failed rows stay zeroed.
    pub samples: Array2<Complex32>,
    /// Selection-relative indices of rows that failed to decode, with causes.
    pub failures: Vec<(usize, Error)>,
}

impl DecodedSelection {
    /// True when every requested row decoded.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Decode the payloads of the selected metadata rows into a dense complex
/// matrix.
///
/// All selected packets must share one `num_quads` value; output row order
/// follows `indices` regardless of task completion order. Per-row decode
/// errors do not abort the batch: the row stays zeroed and is reported in
/// [`DecodedSelection::failures`].
///
/// # Errors
/// [`Error::RowOutOfBounds`] for indices past the table,
/// [`Error::MissingSecondaryHeader`] if the first selected packet has no
/// secondary header, [`Error::InconsistentChunk`] when `num_quads` differs
/// within the selection, or any I/O error reading the source file.
pub fn decode_selection(
    table: &MetadataTable,
    indices: &[usize],
    batch_size: usize,
) -> Result<DecodedSelection> {
    let batch_size = batch_size.max(1);

    // Validate the selection before touching the file.
    let mut num_quads: Option<u16> = None;
    for &index in indices {
        let packet = table.get(index).ok_or(Error::RowOutOfBounds {
            index,
            len: table.len(),
        })?;
        let Some(secondary) = &packet.secondary else {
            // Rows without a secondary header fail individually below, but
            // the selection width must come from a real header.
            continue;
        };
        match num_quads {
            None => num_quads = Some(secondary.num_quads),
            Some(first) if first != secondary.num_quads => {
                return Err(Error::InconsistentChunk {
                    first,
                    other: secondary.num_quads,
                });
            }
            Some(_) => {}
        }
    }
    let num_quads = match (num_quads, indices.first()) {
        (Some(nq), _) => nq,
        (None, Some(&index)) => return Err(Error::MissingSecondaryHeader { index }),
        (None, None) => 0,
    };

    let file = table.read_file()?;
    let width = 2 * usize::from(num_quads);
    let mut samples = Array2::zeros((indices.len(), width));
    let mut failures: Vec<(usize, Error)> = Vec::new();

    for (batch_index, batch) in indices.chunks(batch_size).enumerate() {
        let base = batch_index * batch_size;
        let rows: Vec<(usize, Result<Vec<Complex32>>)> = batch
            .par_iter()
            .enumerate()
            .map(|(offset, &index)| (base + offset, decode_row(table, &file, index, num_quads)))
            .collect();

        for (row, zult) in rows {
            match zult {
                Ok(values) => {
                    debug_assert_eq!(values.len(), width);
                    for (dst, src) in samples.row_mut(row).iter_mut().zip(values) {
                        *dst = src;
                    }
                }
                Err(err) => {
                    warn!(row, %err, "packet payload failed to decode");
                    failures.push((row, err));
                }
            }
        }
    }

    debug!(
        rows = indices.len(),
        width,
        failed = failures.len(),
        "decoded selection"
    );
    Ok(DecodedSelection { samples, failures })
}

fn decode_row(
    table: &MetadataTable,
    file: &[u8],
    index: usize,
    num_quads: u16,
) -> Result<Vec<Complex32>> {
    // Bounds were checked before the fan-out.
    let packet = &table.packets()[index];
    let secondary = packet
        .secondary
        .as_ref()
        .ok_or(Error::MissingSecondaryHeader { index })?;

    let start = packet.payload.offset as usize;
    let end = start + packet.payload.len;
    let data = file
        .get(start..end)
        .ok_or(Error::TruncatedFile {
            offset: packet.payload.offset,
        })?;

    decode_payload(data, usize::from(num_quads), secondary.baq_mode())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baq_dispatch_rejects_reserved_modes() {
        let err = decode_payload(&[], 0, BaqMode::Baq4Bit).unwrap_err();
        assert!(matches!(err, Error::UnsupportedBaq(4)));
        let err = decode_payload(&[], 0, BaqMode::Reserved(9)).unwrap_err();
        assert!(matches!(
            err,
            Error::ReservedEnumValue {
                field: "baq_mode",
                value: 9
            }
        ));
    }
}
