//! The per-file metadata table produced by a full scan.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{decode_packets, PrimaryHeader, SecondaryHeader};
use crate::Result;

/// Location of a packet's compressed sample payload inside the source file.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct PayloadRef {
    /// Absolute byte offset in the file.
    pub offset: u64,
    /// Payload length in bytes.
    pub len: usize,
}

/// One record per space packet: decoded headers plus the payload location.
#[derive(Serialize, Deserialize, Debug, Copy, Clone)]
pub struct PacketMetadata {
    pub primary: PrimaryHeader,
    /// `None` for packets without a secondary header.
    pub secondary: Option<SecondaryHeader>,
    pub payload: PayloadRef,
}

/// Tracks stats over a packet scan.
#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub struct Summary {
    pub count: usize,
    pub bytes: usize,
    /// Gaps detected in the 14-bit packet sequence counter.
    pub missing: usize,

    last_sequence: Option<u16>,
}

impl Summary {
    pub fn add(&mut self, packet: &PacketMetadata) {
        self.count += 1;
        self.bytes += packet.primary.packet_len();

        let seq = packet.primary.sequence_count;
        if let Some(last) = self.last_sequence {
            self.missing += usize::from(missing_packets(seq, last));
        }
        self.last_sequence = Some(seq);
    }
}

/// Calculate the number of sequence counts missing between consecutive
/// packets, accounting for the wrap at [`PrimaryHeader::SEQ_MAX`].
#[must_use]
pub fn missing_packets(cur: u16, last: u16) -> u16 {
    let expected = if last == PrimaryHeader::SEQ_MAX {
        0
    } else {
        last + 1
    };
    if cur == expected {
        0
    } else if cur > expected {
        cur - expected
    } else {
        cur + PrimaryHeader::SEQ_MAX + 1 - expected
    }
}

/// Metadata for every packet in a Level 0 file, in file order.
///
/// Produced once by [`parse_metadata`]; records are immutable afterwards.
/// The table remembers its source path so sample decoding can re-read
/// payload bytes on demand.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct MetadataTable {
    path: PathBuf,
    packets: Vec<PacketMetadata>,
    summary: Summary,
}

impl MetadataTable {
    #[must_use]
    pub fn packets(&self) -> &[PacketMetadata] {
        &self.packets
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&PacketMetadata> {
        self.packets.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packets.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packets.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole source file into memory.
    ///
    /// Payload [`PayloadRef`]s index into the returned buffer.
    ///
    /// # Errors
    /// Any I/O error from reading the file.
    pub fn read_file(&self) -> Result<Vec<u8>> {
        Ok(std::fs::read(&self.path)?)
    }
}

/// Scan a Level 0 file and decode every packet's headers.
///
/// Sample payloads are not decoded; each record carries the payload's file
/// offset and length for later decoding.
///
/// # Errors
/// [`crate::Error::TruncatedFile`] when the file ends inside a packet, or any
/// I/O error from reading.
pub fn parse_metadata<P: AsRef<Path>>(path: P) -> Result<MetadataTable> {
    let path = path.as_ref();
    let reader = BufReader::new(File::open(path)?);

    let mut summary = Summary::default();
    let packets: Vec<PacketMetadata> = decode_packets(reader)
        .map(|zult| {
            zult.inspect(|p| {
                summary.add(p);
            })
        })
        .collect::<Result<_>>()?;

    debug!(
        path = %path.display(),
        count = summary.count,
        bytes = summary.bytes,
        missing = summary.missing,
        "scanned level 0 file"
    );

    Ok(MetadataTable {
        path: path.to_path_buf(),
        packets,
        summary,
    })
}
