//! Byte-level word classification for the MOSS readout protocol.
//!
//! Every byte of the stream belongs to exactly one word class, identified by
//! its high bits. Field widths follow the chip readout specification: a hit
//! position is spread over a `DATA_0`/`DATA_1`/`DATA_2` triple and the region
//! it belongs to is set by the most recent region header.

use std::ops::RangeInclusive;

/// Unit frame header, `0b1101_uuuu` where `uuuu` is the unit id.
pub const UNIT_FRAME_HEADER_RANGE: RangeInclusive<u8> = 0xD0..=0xDF;
/// Unit frame trailer, closes the event opened by the last header.
pub const UNIT_FRAME_TRAILER: u8 = 0xE0;
/// Region header, `0b1100_00rr` where `rr` is the region id.
pub const REGION_HEADER_RANGE: RangeInclusive<u8> = 0xC0..=0xC3;
/// First data byte, `0b00rr_rrrr`: row bits [8:3].
pub const DATA_0_RANGE: RangeInclusive<u8> = 0x00..=0x3F;
/// Second data byte, `0b01rr_rccc`: row bits [2:0], column bits [8:6].
pub const DATA_1_RANGE: RangeInclusive<u8> = 0x40..=0x7F;
/// Third data byte, `0b10cc_cccc`: column bits [5:0].
pub const DATA_2_RANGE: RangeInclusive<u8> = 0x80..=0xBF;
/// Idle/filler byte, permitted anywhere between words.
pub const IDLE: u8 = 0xFF;
/// Event delimiter emitted by the readout chain between frames.
pub const DELIMITER: u8 = 0xFA;

/// One classified byte of the readout stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MossWord {
    /// Opens an event; carries the unit id in the low nibble.
    UnitFrameHeader,
    /// Closes the current event.
    UnitFrameTrailer,
    /// Selects the region for the data words that follow.
    RegionHeader,
    Data0,
    Data1,
    Data2,
    Idle,
    Delimiter,
    /// No known marker pattern matches.
    Noise,
}

impl MossWord {
    /// Classify a single stream byte.
    #[must_use]
    pub fn from_byte(b: u8) -> Self {
        match b {
            b if DATA_0_RANGE.contains(&b) => MossWord::Data0,
            b if DATA_1_RANGE.contains(&b) => MossWord::Data1,
            b if DATA_2_RANGE.contains(&b) => MossWord::Data2,
            b if REGION_HEADER_RANGE.contains(&b) => MossWord::RegionHeader,
            b if UNIT_FRAME_HEADER_RANGE.contains(&b) => MossWord::UnitFrameHeader,
            UNIT_FRAME_TRAILER => MossWord::UnitFrameTrailer,
            IDLE => MossWord::Idle,
            DELIMITER => MossWord::Delimiter,
            _ => MossWord::Noise,
        }
    }
}

/// Unit id from a unit frame header byte.
#[must_use]
pub(crate) fn unit_id(header: u8) -> u8 {
    header & 0x0F
}

/// Region id from a region header byte.
#[must_use]
pub(crate) fn region_id(region_header: u8) -> u8 {
    region_header & 0x03
}

/// Row bits [8:3] from a `DATA_0` byte.
#[must_use]
pub(crate) fn data0_row(data0: u8) -> u16 {
    u16::from(data0 & 0x3F) << 3
}

/// Row bits [2:0] from a `DATA_1` byte.
#[must_use]
pub(crate) fn data1_row(data1: u8) -> u16 {
    u16::from(data1 & 0x38) >> 3
}

/// Column bits [8:6] from a `DATA_1` byte.
#[must_use]
pub(crate) fn data1_column(data1: u8) -> u16 {
    u16::from(data1 & 0x07) << 6
}

/// Column bits [5:0] from a `DATA_2` byte.
#[must_use]
pub(crate) fn data2_column(data2: u8) -> u16 {
    u16::from(data2 & 0x3F)
}
