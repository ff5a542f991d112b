//! Acquisition chunk grouping.
//!
//! An acquisition chunk is a maximal run of consecutive packets acquired
//! under one instrument configuration: constant signal type, swath number,
//! number of quads, BAQ mode, SWST, SWL, PRI and elevation beam address, a
//! PRI count incrementing by exactly one (wrapping at 2^32 - 1) and a
//! strictly increasing azimuth beam address.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::spacepacket::{MetadataTable, SecondaryHeader};

/// A contiguous `[start, end)` row range forming one acquisition chunk.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct ChunkRange {
    /// Chunk ids count up from 0 in file order.
    pub id: usize,
    pub start: usize,
    /// Exclusive end row.
    pub end: usize,
}

impl ChunkRange {
    #[must_use]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// The row indices of this chunk's packets.
    pub fn rows(&self) -> impl Iterator<Item = usize> {
        self.start..self.end
    }
}

/// The fields that must stay constant within a chunk.
#[derive(PartialEq, Eq)]
struct ChunkKey {
    signal_type: u8,
    swath_number: u8,
    num_quads: u16,
    baq_mode: u8,
    swst: u32,
    swl: u32,
    pri: u32,
    elevation_beam_address: Option<u8>,
}

impl ChunkKey {
    fn of(hdr: &SecondaryHeader) -> Self {
        ChunkKey {
            signal_type: hdr.signal_type,
            swath_number: hdr.swath_number,
            num_quads: hdr.num_quads,
            baq_mode: hdr.baq_mode,
            swst: hdr.swst,
            swl: hdr.swl,
            pri: hdr.pri,
            elevation_beam_address: hdr.elevation_beam_address,
        }
    }
}

/// Partition the packet stream into acquisition chunks.
///
/// Single pass, deterministic, and idempotent: the returned ranges cover
/// `[0, table.len())` without gaps or overlap. A packet lacking a secondary
/// header always forms a chunk of its own.
#[must_use]
pub fn group_chunks(table: &MetadataTable) -> Vec<ChunkRange> {
    let packets = table.packets();
    let mut chunks: Vec<ChunkRange> = Vec::new();
    let mut start = 0usize;
    let mut current: Option<ChunkKey> = None;
    let mut prev: Option<&SecondaryHeader> = None;

    for (row, packet) in packets.iter().enumerate() {
        let boundary = match (&packet.secondary, &current) {
            (Some(hdr), Some(key)) => {
                let prev = prev.expect("previous header exists while a chunk is open");
                ChunkKey::of(hdr) != *key
                    || hdr.pri_count != prev.pri_count.wrapping_add(1)
                    || hdr.azimuth_beam_address <= prev.azimuth_beam_address
            }
            // First packet, or a transition to/from header-less packets.
            _ => true,
        };

        if boundary && row > 0 {
            chunks.push(ChunkRange {
                id: chunks.len(),
                start,
                end: row,
            });
            start = row;
        }
        current = packet.secondary.as_ref().map(ChunkKey::of);
        prev = packet.secondary.as_ref();
    }

    if !packets.is_empty() {
        chunks.push(ChunkRange {
            id: chunks.len(),
            start,
            end: packets.len(),
        });
    }

    debug!(packets = packets.len(), chunks = chunks.len(), "grouped acquisition chunks");
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_range_rows() {
        let c = ChunkRange {
            id: 0,
            start: 3,
            end: 7,
        };
        assert_eq!(c.len(), 4);
        assert_eq!(c.rows().collect::<Vec<_>>(), [3, 4, 5, 6]);
    }
}
