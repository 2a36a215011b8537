//! The readout frame decoder.
//!
//! [`FrameDecoder`] walks a buffer one byte at a time, classifying each byte
//! against the marker patterns in [`words`](crate::words) and assembling the
//! data words between a unit frame header and its trailer into hits. Local
//! stream malformation never aborts a pass: unrecognized bytes are skipped
//! and frames cut short by the end of the buffer or by an unexpected header
//! are emitted with [`PacketStatus::Incomplete`].

use tracing::{debug, trace};

use crate::bytes::Cursor;
use crate::words::{self, MossWord};
use crate::{DecodeResult, MossHit, MossPacket, PacketStatus};

/// Assembly phase for the three-byte data word of the current hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WordPhase {
    /// Expecting `DATA_0` (or a region header / trailer).
    Start,
    /// `DATA_0` seen, expecting `DATA_1`.
    Row,
    /// `DATA_1` seen, expecting `DATA_2`.
    Col,
}

#[derive(Debug)]
enum State {
    /// Between frames.
    Idle,
    /// A header has been seen and its packet is still open.
    InEvent {
        packet: MossPacket,
        region: u8,
        phase: WordPhase,
    },
}

/// Stateful single-pass decoder over one input buffer.
///
/// Most callers want [`decode`] or [`iter_packets`]; the decoder itself is
/// public for callers that need packet-at-a-time control with access to the
/// running trailer offset.
#[derive(Debug)]
pub struct FrameDecoder<'a> {
    cursor: Cursor<'a>,
    state: State,
    last_trailer: Option<usize>,
    desync_skips: usize,
}

impl<'a> FrameDecoder<'a> {
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        FrameDecoder {
            cursor: Cursor::new(buf),
            state: State::Idle,
            last_trailer: None,
            desync_skips: 0,
        }
    }

    /// Offset of the trailer closing the last complete packet so far.
    #[must_use]
    pub fn last_trailer(&self) -> Option<usize> {
        self.last_trailer
    }

    /// Count of bytes skipped as stream noise so far. A large value is a
    /// signal of stream corruption.
    #[must_use]
    pub fn desync_skips(&self) -> usize {
        self.desync_skips
    }

    /// Decode up to the next finalized packet, complete or not. Returns
    /// `None` once the buffer is exhausted with no frame open.
    pub fn next_packet(&mut self) -> Option<MossPacket> {
        loop {
            let offset = self.cursor.offset();
            let Ok(b) = self.cursor.advance() else {
                // End of buffer. A still-open frame is emitted as incomplete
                // and does not move the trailer offset.
                match std::mem::replace(&mut self.state, State::Idle) {
                    State::InEvent { mut packet, .. } => {
                        packet.status = PacketStatus::Incomplete;
                        debug!(unit_id = packet.unit_id, "buffer ended mid-frame");
                        return Some(packet);
                    }
                    State::Idle => return None,
                }
            };
            if let Some(packet) = self.step(b, offset) {
                return Some(packet);
            }
        }
    }

    /// Consume one classified byte, producing a packet when one closes.
    fn step(&mut self, b: u8, offset: usize) -> Option<MossPacket> {
        let word = MossWord::from_byte(b);
        match std::mem::replace(&mut self.state, State::Idle) {
            State::Idle => {
                match word {
                    MossWord::UnitFrameHeader => {
                        self.state = State::InEvent {
                            packet: MossPacket::new(words::unit_id(b)),
                            region: 0,
                            phase: WordPhase::Start,
                        };
                    }
                    // Filler between frames, consumed without effect.
                    MossWord::Idle | MossWord::Delimiter => (),
                    _ => self.skip_desync(b, offset),
                }
                None
            }
            State::InEvent {
                mut packet,
                mut region,
                mut phase,
            } => match word {
                MossWord::UnitFrameTrailer => {
                    self.last_trailer = Some(offset);
                    Some(packet)
                }
                MossWord::UnitFrameHeader => {
                    // Implicit trailer-missing: close the open packet as
                    // incomplete and start over at this header.
                    packet.status = PacketStatus::Incomplete;
                    debug!(
                        unit_id = packet.unit_id,
                        offset, "header while frame open, packet incomplete"
                    );
                    self.state = State::InEvent {
                        packet: MossPacket::new(words::unit_id(b)),
                        region: 0,
                        phase: WordPhase::Start,
                    };
                    Some(packet)
                }
                other => {
                    match other {
                        MossWord::RegionHeader => {
                            region = words::region_id(b);
                            phase = WordPhase::Start;
                        }
                        MossWord::Data0 => {
                            if phase != WordPhase::Start {
                                trace!(offset, "data word restarted mid-assembly");
                            }
                            packet.hits.push(MossHit {
                                region,
                                row: words::data0_row(b),
                                column: 0,
                            });
                            phase = WordPhase::Row;
                        }
                        MossWord::Data1 if phase == WordPhase::Row => {
                            if let Some(hit) = packet.hits.last_mut() {
                                hit.row |= words::data1_row(b);
                                hit.column = words::data1_column(b);
                            }
                            phase = WordPhase::Col;
                        }
                        MossWord::Data2 if phase == WordPhase::Col => {
                            if let Some(hit) = packet.hits.last_mut() {
                                hit.column |= words::data2_column(b);
                            }
                            phase = WordPhase::Start;
                        }
                        MossWord::Idle => (),
                        // Out-of-order data word, delimiter, or noise inside
                        // a frame: skip the byte, keep the frame.
                        _ => self.skip_desync(b, offset),
                    }
                    self.state = State::InEvent {
                        packet,
                        region,
                        phase,
                    };
                    None
                }
            },
        }
    }

    fn skip_desync(&mut self, b: u8, offset: usize) {
        self.desync_skips += 1;
        trace!(
            offset,
            byte = format_args!("{b:#04X}"),
            "skipping desynchronized byte"
        );
    }
}

/// Decode every frame in `buf`.
///
/// The result holds the packets in header order plus the offset of the last
/// recognized trailer; bytes past that offset were not consumed into any
/// packet and can be inspected with [`DecodeResult::remainder`].
///
/// Content-level malformation never fails the pass, it only shows up as
/// incomplete packets and a non-empty remainder.
///
/// # Examples
/// ```
/// // One frame with a single hit, then a stray filler byte.
/// let stream = [0xD3, 0xC1, 0x01, 0x48, 0x88, 0xE0, 0xFF];
/// let zult = moss_decoder::decode(&stream);
///
/// assert_eq!(zult.packets.len(), 1);
/// assert_eq!(zult.packets[0].unit_id, 3);
/// assert_eq!(zult.last_trailer, Some(5));
/// assert_eq!(zult.remainder(&stream), [0xFF]);
/// ```
#[must_use]
pub fn decode(buf: &[u8]) -> DecodeResult {
    let mut decoder = FrameDecoder::new(buf);
    let mut packets = Vec::new();
    while let Some(packet) = decoder.next_packet() {
        packets.push(packet);
    }
    if decoder.desync_skips() > 0 {
        debug!(
            skipped = decoder.desync_skips(),
            len = buf.len(),
            "desynchronized bytes in buffer"
        );
    }
    DecodeResult {
        packets,
        last_trailer: decoder.last_trailer(),
    }
}

/// Iterate packets one at a time without collecting them.
///
/// Yields incomplete packets as well; check [`MossPacket::status`]. After the
/// iterator is exhausted [`PacketIter::last_trailer`] reports the same offset
/// [`decode`] would have.
#[must_use]
pub fn iter_packets(buf: &[u8]) -> PacketIter<'_> {
    PacketIter {
        decoder: FrameDecoder::new(buf),
    }
}

/// Iterator over the packets of one buffer. Created by [`iter_packets`].
#[derive(Debug)]
pub struct PacketIter<'a> {
    decoder: FrameDecoder<'a>,
}

impl PacketIter<'_> {
    /// Offset of the last recognized trailer so far.
    #[must_use]
    pub fn last_trailer(&self) -> Option<usize> {
        self.decoder.last_trailer()
    }
}

impl Iterator for PacketIter<'_> {
    type Item = MossPacket;

    fn next(&mut self) -> Option<Self::Item> {
        self.decoder.next_packet()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Unit 1, region 1, one hit at row 9 col 2: header, region header,
    // DATA_0 (row[8:3]=1), DATA_1 (row[2:0]=1, col[8:6]=0), DATA_2 (col=2),
    // trailer.
    const ONE_HIT_FRAME: [u8; 6] = [0xD1, 0xC1, 0x01, 0x48, 0x82, 0xE0];

    #[test]
    fn empty_buffer() {
        let zult = decode(&[]);
        assert!(zult.packets.is_empty());
        assert_eq!(zult.last_trailer, None);
    }

    #[test]
    fn single_frame() {
        let zult = decode(&ONE_HIT_FRAME);

        assert_eq!(zult.packets.len(), 1);
        let packet = &zult.packets[0];
        assert_eq!(packet.unit_id, 1);
        assert!(packet.is_complete());
        assert_eq!(
            packet.hits,
            vec![MossHit {
                region: 1,
                row: 9,
                column: 2
            }]
        );
        assert_eq!(zult.last_trailer, Some(5));
        assert!(zult.remainder(&ONE_HIT_FRAME).is_empty());
    }

    #[test]
    fn back_to_back_frames() {
        let mut buf = ONE_HIT_FRAME.to_vec();
        buf.extend_from_slice(&ONE_HIT_FRAME);
        buf.extend_from_slice(&ONE_HIT_FRAME);

        let zult = decode(&buf);
        assert_eq!(zult.packets.len(), 3);
        assert!(zult.packets.iter().all(MossPacket::is_complete));
        assert_eq!(zult.last_trailer, Some(buf.len() - 1));
    }

    #[test]
    fn idle_and_delimiter_between_frames() {
        let mut buf = vec![0xFF, 0xFA];
        buf.extend_from_slice(&ONE_HIT_FRAME);
        buf.extend_from_slice(&[0xFA, 0xFF, 0xFF]);
        buf.extend_from_slice(&ONE_HIT_FRAME);

        let zult = decode(&buf);
        assert_eq!(zult.packets.len(), 2);
        assert!(zult.packets.iter().all(MossPacket::is_complete));
        assert_eq!(zult.last_trailer, Some(buf.len() - 1));
    }

    #[test]
    fn truncated_tail_is_incomplete() {
        // Header and region header, then nothing.
        let buf = [0xD4, 0xC0];
        let zult = decode(&buf);

        assert_eq!(zult.packets.len(), 1);
        assert_eq!(zult.packets[0].unit_id, 4);
        assert_eq!(zult.packets[0].status, PacketStatus::Incomplete);
        assert!(zult.packets[0].hits.is_empty());
        assert_eq!(zult.last_trailer, None);
        assert_eq!(zult.remainder(&buf), &buf);
    }

    #[test]
    fn truncated_tail_does_not_advance_trailer() {
        let mut buf = ONE_HIT_FRAME.to_vec();
        buf.extend_from_slice(&[0xD2, 0xC0, 0x01]);

        let zult = decode(&buf);
        assert_eq!(zult.packets.len(), 2);
        assert!(zult.packets[0].is_complete());
        assert_eq!(zult.packets[1].status, PacketStatus::Incomplete);
        assert_eq!(
            zult.last_trailer,
            Some(ONE_HIT_FRAME.len() - 1),
            "incomplete tail must not move the trailer offset"
        );
    }

    #[test]
    fn header_supersedes_open_frame() {
        // Unit 2 opens but unit 5 starts before any trailer.
        let mut buf = vec![0xD2, 0xC1, 0x01];
        buf.extend_from_slice(&[0xD5, 0xC1, 0x01, 0x48, 0x82, 0xE0]);

        let zult = decode(&buf);
        assert_eq!(zult.packets.len(), 2);

        assert_eq!(zult.packets[0].unit_id, 2);
        assert_eq!(zult.packets[0].status, PacketStatus::Incomplete);
        assert_eq!(zult.packets[0].hits.len(), 1, "partial hit is kept");

        assert_eq!(zult.packets[1].unit_id, 5);
        assert!(zult.packets[1].is_complete());
        assert_eq!(zult.last_trailer, Some(buf.len() - 1));
    }

    #[test]
    fn noise_before_first_frame_is_skipped() {
        // 0xE1 and 0xC7 match no marker pattern; a lone trailer in idle state
        // is desynchronized noise as well.
        let mut buf = vec![0xE1, 0xC7, 0xE0];
        buf.extend_from_slice(&ONE_HIT_FRAME);

        let zult = decode(&buf);
        assert_eq!(zult.packets.len(), 1);
        assert!(zult.packets[0].is_complete());
        assert_eq!(zult.last_trailer, Some(buf.len() - 1));
    }

    #[test]
    fn region_header_sequence_assigns_regions() {
        // Hits in regions 0, 2, 3 of unit 0.
        let buf = [
            0xD0, 0xC0, 0x01, 0x48, 0x82, // region 0
            0xC2, 0x01, 0x48, 0x82, // region 2
            0xC3, 0x01, 0x48, 0x82, // region 3
            0xE0,
        ];
        let zult = decode(&buf);

        assert_eq!(zult.packets.len(), 1);
        let regions: Vec<u8> = zult.packets[0].hits.iter().map(|h| h.region).collect();
        assert_eq!(regions, vec![0, 2, 3]);
    }

    #[test]
    fn out_of_order_data_word_is_skipped() {
        // DATA_1 with no DATA_0 in flight, then a well-formed hit.
        let buf = [0xD1, 0xC0, 0x48, 0x01, 0x48, 0x82, 0xE0];
        let zult = decode(&buf);

        assert_eq!(zult.packets.len(), 1);
        assert!(zult.packets[0].is_complete());
        assert_eq!(
            zult.packets[0].hits,
            vec![MossHit {
                region: 0,
                row: 9,
                column: 2
            }]
        );
    }

    #[test]
    fn packet_iter_matches_decode() {
        let mut buf = ONE_HIT_FRAME.to_vec();
        buf.extend_from_slice(&ONE_HIT_FRAME);
        buf.push(0xFF);

        let mut iter = iter_packets(&buf);
        let packets: Vec<MossPacket> = iter.by_ref().collect();
        let zult = decode(&buf);

        assert_eq!(packets, zult.packets);
        assert_eq!(iter.last_trailer(), zult.last_trailer);
    }

    #[test]
    fn deterministic() {
        let mut buf = vec![0xAB, 0x13];
        buf.extend_from_slice(&ONE_HIT_FRAME);
        buf.extend_from_slice(&[0xD2, 0x01]);

        assert_eq!(decode(&buf), decode(&buf));
    }
}
