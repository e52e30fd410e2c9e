use core::fmt;

use p25_core::{BitBuffer, PduParseErr};

use crate::tsbk::fields::service_options::{DataServiceOptions, ServiceOptions};

/// Representation of IND_DATA_CH_GRANT (opcode 0x10)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndDataChGrant {
    /// 16 bits, Channel
    pub channel: u16,
    /// 24 bits, Target address
    pub target_address: u32,
    /// 24 bits, Source address
    pub source_address: u32,
}

impl IndDataChGrant {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let channel = buffer.read_field(16, "channel")? as u16;
        let target_address = buffer.read_field(24, "target_address")? as u32;
        let source_address = buffer.read_field(24, "source_address")? as u32;
        Ok(IndDataChGrant { channel, target_address, source_address })
    }
}

impl fmt::Display for IndDataChGrant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "IndDataChGrant {{ channel: 0x{:04X} target_address: {} source_address: {} }}",
            self.channel, self.target_address, self.source_address)
    }
}

/// Representation of GRP_DATA_CH_GRANT (opcode 0x11)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrpDataChGrant {
    /// 8 bits, Service options
    pub service_options: ServiceOptions,
    /// 16 bits, Channel
    pub channel: u16,
    /// 16 bits, Group address
    pub group_address: u16,
    /// 24 bits, Source address
    pub source_address: u32,
}

impl GrpDataChGrant {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let service_options = ServiceOptions::from_raw(buffer.read_field(8, "service_options")?);
        let channel = buffer.read_field(16, "channel")? as u16;
        let group_address = buffer.read_field(16, "group_address")? as u16;
        let source_address = buffer.read_field(24, "source_address")? as u32;
        Ok(GrpDataChGrant { service_options, channel, group_address, source_address })
    }
}

impl fmt::Display for GrpDataChGrant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "GrpDataChGrant {{ service_options: {} channel: 0x{:04X} group_address: {} source_address: {} }}",
            self.service_options, self.channel, self.group_address, self.source_address)
    }
}

/// Representation of GRP_DATA_CH_ANN (opcode 0x12)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrpDataChAnn {
    pub channel_a: u16,
    pub group_address_a: u16,
    pub channel_b: u16,
    pub group_address_b: u16,
}

impl GrpDataChAnn {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let channel_a = buffer.read_field(16, "channel_a")? as u16;
        let group_address_a = buffer.read_field(16, "group_address_a")? as u16;
        let channel_b = buffer.read_field(16, "channel_b")? as u16;
        let group_address_b = buffer.read_field(16, "group_address_b")? as u16;
        Ok(GrpDataChAnn { channel_a, group_address_a, channel_b, group_address_b })
    }
}

impl fmt::Display for GrpDataChAnn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "GrpDataChAnn {{ channel_a: 0x{:04X} group_address_a: {} channel_b: 0x{:04X} group_address_b: {} }}",
            self.channel_a, self.group_address_a, self.channel_b, self.group_address_b)
    }
}

/// Representation of GRP_DATA_CH_ANN_EXP (opcode 0x13)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrpDataChAnnExp {
    /// 8 bits, Service options
    pub service_options: ServiceOptions,
    /// 16 bits, Downlink channel
    pub channel_t: u16,
    /// 16 bits, Uplink channel
    pub channel_r: u16,
    /// 16 bits, Group address
    pub group_address: u16,
}

impl GrpDataChAnnExp {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let service_options = ServiceOptions::from_raw(buffer.read_field(8, "service_options")?);
        buffer.skip_field(8, "reserved")?;
        let channel_t = buffer.read_field(16, "channel_t")? as u16;
        let channel_r = buffer.read_field(16, "channel_r")? as u16;
        let group_address = buffer.read_field(16, "group_address")? as u16;
        Ok(GrpDataChAnnExp { service_options, channel_t, channel_r, group_address })
    }
}

impl fmt::Display for GrpDataChAnnExp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "GrpDataChAnnExp {{ service_options: {} channel_t: 0x{:04X} channel_r: 0x{:04X} group_address: {} }}",
            self.service_options, self.channel_t, self.channel_r, self.group_address)
    }
}

/// Representation of SN_DATA_CH_GRANT (opcode 0x14).
/// Assigns an SNDCP packet data channel to a unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnDataChGrant {
    /// 8 bits, Data service options
    pub data_service_options: DataServiceOptions,
    /// 16 bits, Downlink channel
    pub channel_t: u16,
    /// 16 bits, Uplink channel
    pub channel_r: u16,
    /// 24 bits, Target address
    pub target_address: u32,
}

impl SnDataChGrant {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let data_service_options = DataServiceOptions::from_raw(buffer.read_field(8, "data_service_options")?);
        let channel_t = buffer.read_field(16, "channel_t")? as u16;
        let channel_r = buffer.read_field(16, "channel_r")? as u16;
        let target_address = buffer.read_field(24, "target_address")? as u32;
        Ok(SnDataChGrant { data_service_options, channel_t, channel_r, target_address })
    }
}

impl fmt::Display for SnDataChGrant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SnDataChGrant {{ dso: {} channel_t: 0x{:04X} channel_r: 0x{:04X} target_address: {} }}",
            self.data_service_options, self.channel_t, self.channel_r, self.target_address)
    }
}

/// Representation of SN_DATA_PAGE_REQ (opcode 0x15)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnDataPageReq {
    /// 8 bits, Data service options
    pub data_service_options: DataServiceOptions,
    /// 16 bits, Data access control
    pub data_access_control: u16,
    /// 24 bits, Target address
    pub target_address: u32,
}

impl SnDataPageReq {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let data_service_options = DataServiceOptions::from_raw(buffer.read_field(8, "data_service_options")?);
        buffer.skip_field(16, "reserved")?;
        let data_access_control = buffer.read_field(16, "data_access_control")? as u16;
        let target_address = buffer.read_field(24, "target_address")? as u32;
        Ok(SnDataPageReq { data_service_options, data_access_control, target_address })
    }
}

impl fmt::Display for SnDataPageReq {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SnDataPageReq {{ dso: {} dac: 0x{:04X} target_address: {} }}",
            self.data_service_options, self.data_access_control, self.target_address)
    }
}

/// Representation of SN_DATA_CH_ANN_EXP (opcode 0x16)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnDataChAnnExp {
    /// 8 bits, Data service options
    pub data_service_options: DataServiceOptions,
    /// 1 bit, Autonomous access
    pub autonomous_access: bool,
    /// 1 bit, Requested access
    pub requested_access: bool,
    /// 16 bits, Downlink channel
    pub channel_t: u16,
    /// 16 bits, Uplink channel
    pub channel_r: u16,
    /// 16 bits, Data access control
    pub data_access_control: u16,
}

impl SnDataChAnnExp {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let data_service_options = DataServiceOptions::from_raw(buffer.read_field(8, "data_service_options")?);
        let autonomous_access = buffer.read_flag("autonomous_access")?;
        let requested_access = buffer.read_flag("requested_access")?;
        buffer.skip_field(6, "reserved")?;
        let channel_t = buffer.read_field(16, "channel_t")? as u16;
        let channel_r = buffer.read_field(16, "channel_r")? as u16;
        let data_access_control = buffer.read_field(16, "data_access_control")? as u16;
        Ok(SnDataChAnnExp {
            data_service_options,
            autonomous_access,
            requested_access,
            channel_t,
            channel_r,
            data_access_control,
        })
    }
}

impl fmt::Display for SnDataChAnnExp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SnDataChAnnExp {{ dso: {} aa: {} ra: {} channel_t: 0x{:04X} channel_r: 0x{:04X} dac: 0x{:04X} }}",
            self.data_service_options,
            self.autonomous_access as u8,
            self.requested_access as u8,
            self.channel_t,
            self.channel_r,
            self.data_access_control,
        )
    }
}
