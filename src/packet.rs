use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// A single pixel hit, positioned within its readout unit.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MossHit {
    /// Region selected by the last region header before this hit.
    pub region: u8,
    pub row: u16,
    pub column: u16,
}

impl Display for MossHit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "reg: {reg} row: {row} col: {col}",
            reg = self.region,
            row = self.row,
            col = self.column,
        )
    }
}

/// Framing status of a decoded packet.
///
/// Incomplete packets are kept in the result rather than dropped so callers
/// can audit data loss.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum PacketStatus {
    #[default]
    Complete,
    /// The frame was opened by a header but never closed by a trailer, either
    /// because the buffer ended or because another header superseded it.
    Incomplete,
}

impl Display for PacketStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PacketStatus::Complete => write!(f, "complete"),
            PacketStatus::Incomplete => write!(f, "incomplete"),
        }
    }
}

/// One decoded readout event.
///
/// Hits appear in stream order, exactly as the data words were observed
/// between this packet's header and trailer.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct MossPacket {
    /// Unit id from the low nibble of the unit frame header.
    pub unit_id: u8,
    pub hits: Vec<MossHit>,
    pub status: PacketStatus,
}

impl MossPacket {
    #[must_use]
    pub fn new(unit_id: u8) -> Self {
        MossPacket {
            unit_id,
            hits: Vec::new(),
            status: PacketStatus::Complete,
        }
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == PacketStatus::Complete
    }
}

impl Display for MossPacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unit {id} [{status}] hits: {cnt}",
            id = self.unit_id,
            status = self.status,
            cnt = self.hits.len(),
        )
    }
}

/// Everything produced by one decode pass.
///
/// Owns its packets; the input buffer may be released as soon as the pass
/// returns.
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct DecodeResult {
    /// Packets in the order their headers were encountered.
    pub packets: Vec<MossPacket>,
    /// Offset of the trailer closing the last complete packet, or `None` if
    /// the buffer contained no complete frame.
    pub last_trailer: Option<usize>,
}

impl DecodeResult {
    /// The undecoded tail of `buf`: every byte after the last recognized
    /// trailer. The whole buffer when no trailer was seen.
    ///
    /// `buf` should be the same buffer this result was decoded from.
    #[must_use]
    pub fn remainder<'a>(&self, buf: &'a [u8]) -> &'a [u8] {
        match self.last_trailer {
            Some(offset) if offset < buf.len() => &buf[offset + 1..],
            Some(_) => &[],
            None => buf,
        }
    }
}
