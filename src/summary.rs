use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::MossPacket;

#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct UnitSummary {
    pub packets: usize,
    pub hits: usize,
    pub incomplete: usize,
}

/// Tracks stats over decoded packets, per readout unit and in total.
///
/// # Example
/// ```
/// use moss_decoder::{iter_packets, Summary};
///
/// let stream = [0xD3, 0xC1, 0x01, 0x48, 0x88, 0xE0];
/// let mut summary = Summary::default();
/// for packet in iter_packets(&stream) {
///     summary.add(&packet);
/// }
/// assert_eq!(summary.packets, 1);
/// assert_eq!(summary.hits, 1);
/// ```
#[derive(Serialize, Deserialize, Debug, Default, Clone, PartialEq, Eq)]
pub struct Summary {
    pub packets: usize,
    pub hits: usize,
    pub incomplete: usize,
    pub units: HashMap<u8, UnitSummary>,
}

impl Summary {
    pub fn add(&mut self, packet: &MossPacket) {
        self.packets += 1;
        self.hits += packet.hits.len();

        let unit = self.units.entry(packet.unit_id).or_default();
        unit.packets += 1;
        unit.hits += packet.hits.len();

        if !packet.is_complete() {
            self.incomplete += 1;
            unit.incomplete += 1;
        }
    }
}
