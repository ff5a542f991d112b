#![doc = include_str!("../README.md")]

mod bits;
mod error;

pub mod chunk;
pub mod constants;
pub mod decode;
pub mod ephemeris;
pub mod spacepacket;

pub use bits::BitReader;
pub use error::{Error, Result};

pub use chunk::{group_chunks, ChunkRange};
pub use decode::{decode_selection, DecodedSelection, DEFAULT_BATCH_SIZE};
pub use ephemeris::{decode_ephemeris, EphemerisRecord, EphemerisTable};
pub use spacepacket::{parse_metadata, MetadataTable, PacketMetadata};
