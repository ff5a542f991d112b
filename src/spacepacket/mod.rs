//! Space packet walking and header decoding.
//!
//! A Level 0 file is a concatenation of variable-length CCSDS space packets:
//! a 6-byte primary header, then a data field whose first 62 bytes are the
//! SAR secondary header and whose remainder is the compressed sample payload.
//!
//! # Example
//! ```
//! use s1l0::spacepacket::decode_packets;
//!
//! let dat: &[u8] = &[]; // empty file: no packets
//! assert_eq!(decode_packets(dat).count(), 0);
//! ```

mod enums;
mod metadata;
mod secondary;

use std::io::Read;

use serde::{Deserialize, Serialize};
use tracing::warn;

pub use enums::*;
pub use metadata::*;
pub use secondary::*;

use crate::{Error, Result};

/// CCSDS space packet primary header.
#[derive(Serialize, Deserialize, Debug, Copy, Clone, PartialEq, Eq)]
pub struct PrimaryHeader {
    pub version: u8,
    pub packet_type: u8,
    pub has_secondary_header: bool,
    /// Process identifier, the upper 7 bits of the APID.
    pub process_id: u8,
    /// Packet category, the lower 4 bits of the APID.
    pub packet_category: u8,
    pub sequence_flags: u8,
    /// 14-bit packet sequence counter.
    pub sequence_count: u16,
    /// Length of the packet data field minus one.
    pub data_len_minus1: u16,
}

impl PrimaryHeader {
    /// Size of a `PrimaryHeader` on the wire.
    pub const LEN: usize = 6;
    /// Maximum sequence counter value before wrap.
    pub const SEQ_MAX: u16 = 16383;

    /// Decode from bytes.
    ///
    /// # Errors
    /// [`Error::NotEnoughData`] if `buf` holds fewer than 6 bytes.
    pub fn decode(buf: &[u8]) -> Result<Self> {
        if buf.len() < Self::LEN {
            return Err(Error::NotEnoughData {
                actual: buf.len(),
                minimum: Self::LEN,
            });
        }
        let d1 = u16::from_be_bytes([buf[0], buf[1]]);
        let d2 = u16::from_be_bytes([buf[2], buf[3]]);
        let d3 = u16::from_be_bytes([buf[4], buf[5]]);

        Ok(PrimaryHeader {
            version: (d1 >> 13 & 0x7) as u8,
            packet_type: (d1 >> 12 & 0x1) as u8,
            has_secondary_header: (d1 >> 11 & 0x1) == 1,
            process_id: (d1 >> 4 & 0x7f) as u8,
            packet_category: (d1 & 0xf) as u8,
            sequence_flags: (d2 >> 14 & 0x3) as u8,
            sequence_count: d2 & 0x3fff,
            data_len_minus1: d3,
        })
    }

    /// The full 11-bit application process identifier.
    #[must_use]
    pub fn apid(&self) -> u16 {
        u16::from(self.process_id) << 4 | u16::from(self.packet_category)
    }

    /// Total packet length in bytes, primary header included.
    #[must_use]
    pub fn packet_len(&self) -> usize {
        Self::LEN + self.data_len_minus1 as usize + 1
    }
}

/// Return an iterator of [`PacketMetadata`] decoded from a packet stream.
///
/// Headers are decoded in place; sample payloads are described by offset and
/// length only, so walking a file never materializes echo data. Iteration
/// ends at EOF on a packet boundary; EOF inside a packet yields
/// [`Error::TruncatedFile`].
pub fn decode_packets<R>(reader: R) -> impl Iterator<Item = Result<PacketMetadata>> + Send
where
    R: Read + Send,
{
    PacketReaderIter {
        reader,
        offset: 0,
        done: false,
    }
}

struct PacketReaderIter<R>
where
    R: Read + Send,
{
    reader: R,
    offset: u64,
    done: bool,
}

impl<R> PacketReaderIter<R>
where
    R: Read + Send,
{
    fn read_packet(&mut self) -> Result<Option<PacketMetadata>> {
        let mut header_bytes = [0u8; PrimaryHeader::LEN];
        let n = read_full(&mut self.reader, &mut header_bytes)?;
        if n == 0 {
            return Ok(None);
        }
        if n < PrimaryHeader::LEN {
            return Err(Error::TruncatedFile {
                offset: self.offset,
            });
        }
        let primary = PrimaryHeader::decode(&header_bytes)?;

        if primary.packet_len() % 4 != 0 {
            warn!(
                offset = self.offset,
                len = primary.packet_len(),
                "packet length is not a multiple of 4 bytes"
            );
        }

        let data_len = primary.data_len_minus1 as usize + 1;
        let mut data = vec![0u8; data_len];
        let n = read_full(&mut self.reader, &mut data)?;
        if n < data_len {
            return Err(Error::TruncatedFile {
                offset: self.offset,
            });
        }

        let (secondary, payload) = if primary.has_secondary_header && data_len >= SecondaryHeader::LEN
        {
            let secondary = SecondaryHeader::decode(&data[..SecondaryHeader::LEN])?;
            let payload = PayloadRef {
                offset: self.offset + (PrimaryHeader::LEN + SecondaryHeader::LEN) as u64,
                len: data_len - SecondaryHeader::LEN,
            };
            (Some(secondary), payload)
        } else {
            if primary.has_secondary_header {
                warn!(
                    offset = self.offset,
                    data_len, "data field too short for a secondary header"
                );
            }
            let payload = PayloadRef {
                offset: self.offset + PrimaryHeader::LEN as u64,
                len: data_len,
            };
            (None, payload)
        };

        let packet = PacketMetadata {
            primary,
            secondary,
            payload,
        };
        self.offset += primary.packet_len() as u64;
        Ok(Some(packet))
    }
}

impl<R> Iterator for PacketReaderIter<R>
where
    R: Read + Send,
{
    type Item = Result<PacketMetadata>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.read_packet() {
            Ok(Some(packet)) => Some(Ok(packet)),
            Ok(None) => {
                self.done = true;
                None
            }
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}

/// Read until `buf` is full or EOF; returns the number of bytes read.
fn read_full<R: Read>(reader: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut n = 0;
    while n < buf.len() {
        match reader.read(&mut buf[n..]) {
            Ok(0) => break,
            Ok(m) => n += m,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => {}
            Err(err) => return Err(err.into()),
        }
    }
    Ok(n)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn packet_bytes(seq: u16, payload_len: usize) -> Vec<u8> {
        let data_len = SecondaryHeader::LEN + payload_len;
        let mut out = Vec::with_capacity(PrimaryHeader::LEN + data_len);
        out.extend_from_slice(&(0x0800u16 | 0x41 << 4 | 0xc).to_be_bytes());
        out.extend_from_slice(&(0xc000u16 | seq).to_be_bytes());
        out.extend_from_slice(&((data_len - 1) as u16).to_be_bytes());
        out.extend_from_slice(&[0u8; SecondaryHeader::LEN]);
        out.extend_from_slice(&vec![0xffu8; payload_len]);
        out
    }

    #[test]
    fn decode_header() {
        let dat = packet_bytes(4779, 10);
        let ph = PrimaryHeader::decode(&dat).unwrap();
        assert_eq!(ph.version, 0);
        assert_eq!(ph.packet_type, 0);
        assert!(ph.has_secondary_header);
        assert_eq!(ph.process_id, 0x41);
        assert_eq!(ph.packet_category, 0xc);
        assert_eq!(ph.apid(), 0x41c);
        assert_eq!(ph.sequence_flags, 3);
        assert_eq!(ph.sequence_count, 4779);
        assert_eq!(ph.data_len_minus1, 71);
        assert_eq!(ph.packet_len(), 78);
    }

    #[test]
    fn walk_two_packets() {
        let mut dat = packet_bytes(1, 6);
        dat.extend_from_slice(&packet_bytes(2, 10));

        let packets: Vec<PacketMetadata> =
            decode_packets(&dat[..]).map(|z| z.unwrap()).collect();

        assert_eq!(packets.len(), 2);
        assert_eq!(packets[0].primary.sequence_count, 1);
        assert_eq!(packets[0].payload.offset, 68);
        assert_eq!(packets[0].payload.len, 6);
        assert_eq!(packets[1].primary.sequence_count, 2);
        assert_eq!(packets[1].payload.offset, 74 + 68);
        assert_eq!(packets[1].payload.len, 10);
    }

    #[test]
    fn boundary_closure() {
        let mut dat = packet_bytes(1, 2);
        dat.extend_from_slice(&packet_bytes(2, 30));
        dat.extend_from_slice(&packet_bytes(3, 14));
        let total: usize = decode_packets(&dat[..])
            .map(|z| z.unwrap().primary.packet_len())
            .sum();
        assert_eq!(total, dat.len());
    }

    #[test]
    fn eof_mid_packet_is_truncation() {
        let dat = packet_bytes(1, 10);
        let zults: Vec<_> = decode_packets(&dat[..dat.len() - 3]).collect();
        assert_eq!(zults.len(), 1);
        assert!(matches!(
            zults[0].as_ref().unwrap_err(),
            Error::TruncatedFile { offset: 0 }
        ));
    }

    #[test]
    fn eof_mid_primary_header_is_truncation() {
        let dat = packet_bytes(1, 10);
        let zults: Vec<_> = decode_packets(&dat[..4]).collect();
        assert_eq!(zults.len(), 1);
        assert!(matches!(
            zults[0].as_ref().unwrap_err(),
            Error::TruncatedFile { .. }
        ));
    }

    #[test]
    fn empty_input_yields_nothing() {
        assert_eq!(decode_packets(&[][..]).count(), 0);
    }
}
