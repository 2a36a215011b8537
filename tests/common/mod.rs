//! Shared helpers for building raw readout streams.

/// Encode one well-formed event frame.
///
/// `hits` are `(region, row, column)` triples in the order they should
/// appear; a region header is emitted whenever the region changes.
pub fn encode_event(unit_id: u8, hits: &[(u8, u16, u16)]) -> Vec<u8> {
    let mut out = vec![0xD0 | (unit_id & 0x0F)];
    let mut current_region = None;
    for &(region, row, column) in hits {
        if current_region != Some(region) {
            out.push(0xC0 | (region & 0x03));
            current_region = Some(region);
        }
        out.push(((row >> 3) & 0x3F) as u8);
        out.push(0x40 | (((row & 0x07) << 3) as u8) | (((column >> 6) & 0x07) as u8));
        out.push(0x80 | ((column & 0x3F) as u8));
    }
    out.push(0xE0);
    out
}
