use core::fmt;

use p25_core::{BitBuffer, IdenEntry, PduParseErr};
use p25_core::freqs::fmt_mhz;

/// Representation of IDEN_UP (opcode 0x3D). Band plan entry for 700/800/900 MHz FDMA channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdenUp {
    /// 4 bits, Table index
    pub iden: u8,
    /// 9 bits, Bandwidth in 125 Hz units
    pub bandwidth: u16,
    /// 9 bits, Transmit offset, sign bit then magnitude in 250 kHz units
    pub tx_offset: u16,
    /// 10 bits, Channel spacing in 125 Hz units
    pub spacing: u16,
    /// 32 bits, Base frequency in 5 Hz units
    pub base_freq: u32,
}

impl IdenUp {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let iden = buffer.read_field(4, "iden")? as u8;
        let bandwidth = buffer.read_field(9, "bandwidth")? as u16;
        let tx_offset = buffer.read_field(9, "tx_offset")? as u16;
        let spacing = buffer.read_field(10, "spacing")? as u16;
        let base_freq = buffer.read_field(32, "base_freq")? as u32;
        Ok(IdenUp { iden, bandwidth, tx_offset, spacing, base_freq })
    }

    pub fn to_entry(&self) -> IdenEntry {
        IdenEntry::from_iden_up(self.tx_offset as u64, self.spacing as u64, self.base_freq as u64)
    }
}

impl fmt::Display for IdenUp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let e = self.to_entry();
        write!(f, "IdenUp {{ iden: {} base: {} spacing: {} offset: {} bw: {} }}",
            self.iden, fmt_mhz(e.base_hz), e.step_hz, e.offset_hz, self.bandwidth as u32 * 125)
    }
}

/// Representation of IDEN_UP_VU (opcode 0x34). Band plan entry for VHF/UHF FDMA channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdenUpVu {
    /// 4 bits, Table index
    pub iden: u8,
    /// 4 bits, Bandwidth code
    pub bandwidth_vu: u8,
    /// 14 bits, Transmit offset, sign bit then magnitude in channel spacings
    pub tx_offset: u16,
    /// 10 bits, Channel spacing in 125 Hz units
    pub spacing: u16,
    /// 32 bits, Base frequency in 5 Hz units
    pub base_freq: u32,
}

impl IdenUpVu {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let iden = buffer.read_field(4, "iden")? as u8;
        let bandwidth_vu = buffer.read_field(4, "bandwidth_vu")? as u8;
        let tx_offset = buffer.read_field(14, "tx_offset")? as u16;
        let spacing = buffer.read_field(10, "spacing")? as u16;
        let base_freq = buffer.read_field(32, "base_freq")? as u32;
        Ok(IdenUpVu { iden, bandwidth_vu, tx_offset, spacing, base_freq })
    }

    pub fn to_entry(&self) -> IdenEntry {
        IdenEntry::from_iden_up_vu(self.tx_offset as u64, self.spacing as u64, self.base_freq as u64)
    }

    /// Bandwidth in Hz, for the two defined codes
    pub fn bandwidth_hz(&self) -> Option<u32> {
        match self.bandwidth_vu {
            4 => Some(6_250),
            5 => Some(12_500),
            _ => None,
        }
    }
}

impl fmt::Display for IdenUpVu {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let e = self.to_entry();
        write!(f, "IdenUpVu {{ iden: {} base: {} spacing: {} offset: {} bw: {:?} }}",
            self.iden, fmt_mhz(e.base_hz), e.step_hz, e.offset_hz, self.bandwidth_hz())
    }
}

/// Representation of IDEN_UP_TDMA (opcode 0x33, also sent as Motorola opcode 0x0D).
/// The channel type selects access method and slots per carrier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdenUpTdma {
    /// 4 bits, Table index
    pub iden: u8,
    /// 4 bits, Channel type
    pub channel_type: u8,
    /// 14 bits, Transmit offset, sign bit then magnitude in channel spacings
    pub tx_offset: u16,
    /// 10 bits, Channel spacing in 125 Hz units
    pub spacing: u16,
    /// 32 bits, Base frequency in 5 Hz units
    pub base_freq: u32,
}

impl IdenUpTdma {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let iden = buffer.read_field(4, "iden")? as u8;
        let channel_type = buffer.read_field(4, "channel_type")? as u8;
        let tx_offset = buffer.read_field(14, "tx_offset")? as u16;
        let spacing = buffer.read_field(10, "spacing")? as u16;
        let base_freq = buffer.read_field(32, "base_freq")? as u32;
        Ok(IdenUpTdma { iden, channel_type, tx_offset, spacing, base_freq })
    }

    /// None when the channel type is unknown
    pub fn to_entry(&self) -> Option<IdenEntry> {
        IdenEntry::from_iden_up_tdma(self.channel_type as u64, self.tx_offset as u64, self.spacing as u64, self.base_freq as u64)
    }
}

impl fmt::Display for IdenUpTdma {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.to_entry() {
            Some(e) => write!(f, "IdenUpTdma {{ iden: {} type: {} {} }}", self.iden, self.channel_type, e),
            None => write!(f, "IdenUpTdma {{ iden: {} type: {} (unknown) }}", self.iden, self.channel_type),
        }
    }
}
