use core::fmt;

use crate::ChannelId;

/// Slots per carrier for the channel types announced in a TDMA identifier update
const SLOTS_PER_CARRIER: [u8; 6] = [1, 1, 1, 2, 4, 2];

/// Splits a 16-bit channel identifier into (table index, channel number)
pub fn split_channel_id(id: ChannelId) -> (u8, u16) {
    ((id >> 12) as u8 & 0xF, id & 0xFFF)
}

/// Formats a frequency in Hz as MHz with six decimals
pub fn fmt_mhz(freq_hz: u64) -> String {
    format!("{:.6}", freq_hz as f64 / 1e6)
}

/// One band plan entry, as installed by an identifier update broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdenEntry {
    /// Frequency of channel number 0, in Hz
    pub base_hz: u64,
    /// Channel spacing in Hz
    pub step_hz: u64,
    /// Uplink minus downlink, in Hz
    pub offset_hz: i64,
    /// Slots per carrier. None for FDMA plans
    pub tdma_slots: Option<u8>,
}

impl IdenEntry {
    /// Build from IDEN_UP fields: 9-bit transmit offset (sign bit 8, magnitude in 250 kHz units),
    /// 10-bit spacing in 125 Hz units, 32-bit base frequency in 5 Hz units.
    pub fn from_iden_up(toff0: u64, spac: u64, base: u64) -> Self {
        let magnitude = (toff0 & 0xFF) as i64 * 250_000;
        let positive = (toff0 >> 8) & 1 == 1;
        IdenEntry {
            base_hz: base * 5,
            step_hz: spac * 125,
            offset_hz: if positive { magnitude } else { -magnitude },
            tdma_slots: None,
        }
    }

    /// Build from IDEN_UP_VU fields: 14-bit transmit offset (sign bit 13, magnitude in spacing units)
    pub fn from_iden_up_vu(toff0: u64, spac: u64, base: u64) -> Self {
        IdenEntry {
            base_hz: base * 5,
            step_hz: spac * 125,
            offset_hz: Self::spacing_offset(toff0, spac),
            tdma_slots: None,
        }
    }

    /// Build from IDEN_UP_TDMA fields. Returns None for channel types outside the known table.
    /// Single-slot channel types describe FDMA carriers and install as such.
    pub fn from_iden_up_tdma(channel_type: u64, toff0: u64, spac: u64, base: u64) -> Option<Self> {
        let slots = *SLOTS_PER_CARRIER.get(channel_type as usize)?;
        Some(IdenEntry {
            base_hz: base * 5,
            step_hz: spac * 125,
            offset_hz: Self::spacing_offset(toff0, spac),
            tdma_slots: if slots > 1 { Some(slots) } else { None },
        })
    }

    fn spacing_offset(toff0: u64, spac: u64) -> i64 {
        let magnitude = (toff0 & 0x1FFF) as i64 * spac as i64 * 125;
        if (toff0 >> 13) & 1 == 1 { magnitude } else { -magnitude }
    }

    /// Downlink frequency and, for TDMA plans, the slot of a channel number
    pub fn channel_freq(&self, channel: u16) -> (u64, Option<u8>) {
        match self.tdma_slots {
            Some(slots) => {
                let slots = slots.max(1) as u64;
                (self.base_hz + self.step_hz * (channel as u64 / slots), Some((channel as u64 % slots) as u8))
            }
            None => (self.base_hz + self.step_hz * channel as u64, None),
        }
    }
}

impl fmt::Display for IdenEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "base {} step {} offset {}", fmt_mhz(self.base_hz), self.step_hz, self.offset_hz)?;
        if let Some(slots) = self.tdma_slots {
            write!(f, " tdma {}", slots)?;
        }
        Ok(())
    }
}

/// Band plan of one network, indexed by the upper 4 bits of a channel identifier.
#[derive(Debug, Clone, Default)]
pub struct FreqTable {
    entries: [Option<IdenEntry>; 16],
}

impl FreqTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry for `index` wholesale. Indices above 15 are ignored.
    pub fn install(&mut self, index: u8, entry: IdenEntry) {
        if let Some(slot) = self.entries.get_mut(index as usize) {
            *slot = Some(entry);
        }
    }

    pub fn get(&self, index: u8) -> Option<&IdenEntry> {
        self.entries.get(index as usize).and_then(|e| e.as_ref())
    }

    /// Resolve a channel identifier to (downlink Hz, TDMA slot).
    /// None while the referenced table entry is unknown.
    pub fn resolve(&self, id: ChannelId) -> Option<(u64, Option<u8>)> {
        let (table, channel) = split_channel_id(id);
        self.get(table).map(|entry| entry.channel_freq(channel))
    }

    /// Resolve to a downlink frequency only, treating 0 Hz as unresolved
    pub fn resolve_freq(&self, id: ChannelId) -> Option<u64> {
        self.resolve(id).map(|(f, _)| f).filter(|&f| f != 0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &IdenEntry)> {
        self.entries.iter().enumerate().filter_map(|(i, e)| e.as_ref().map(|e| (i as u8, e)))
    }
}
