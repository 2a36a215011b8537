//! MOSS readout stream decoding.
//!
//! Decodes the raw byte stream emitted by a MOSS pixel-detector readout
//! chain into per-event [`MossPacket`]s. Each event is framed by a unit
//! frame header and trailer; between them, region headers select the region
//! and three-byte data words carry hit positions. See [`words`] for the
//! marker byte layout.
//!
//! The decoder is a single linear pass over a fully materialized buffer.
//! It never fails on malformed content: unrecognized bytes are skipped,
//! frames cut short end up as [`PacketStatus::Incomplete`] packets, and the
//! offset of the last recognized trailer lets callers inspect the undecoded
//! tail.
//!
//! ```
//! let stream = [
//!     0xD3, 0xC1, 0x01, 0x48, 0x82, 0xE0, // unit 3, one hit in region 1
//!     0xFA, // delimiter
//!     0xD3, 0xC2, 0x02, 0x50, 0x83, 0xE0, // unit 3, one hit in region 2
//! ];
//!
//! let zult = moss_decoder::decode(&stream);
//! assert_eq!(zult.packets.len(), 2);
//! assert!(zult.packets.iter().all(|p| p.is_complete()));
//! assert_eq!(zult.last_trailer, Some(stream.len() - 1));
//! ```

mod bytes;
mod decoder;
mod error;
mod files;
mod packet;
mod summary;
pub mod words;

pub use bytes::Cursor;
pub use decoder::{decode, iter_packets, FrameDecoder, PacketIter};
pub use error::{Error, Result};
pub use files::{decode_file, decode_files};
pub use packet::{DecodeResult, MossHit, MossPacket, PacketStatus};
pub use summary::{Summary, UnitSummary};
