use core::fmt;

use p25_core::{BitBuffer, PduParseErr};

use crate::mbt::mbt_header::MbtHeader;
use crate::tsbk::fields::service_options::ServiceOptions;

/// Representation of the explicit GRP_V_CH_GRANT MBT (opcode 0x00).
/// Carries separate transmit and receive channels. Service options travel in header field A.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MbtGrpVChGrant {
    /// Header field A, Service options
    pub service_options: ServiceOptions,
    /// 16 bits, Transmit channel
    pub channel_t: u16,
    /// 16 bits, Receive channel
    pub channel_r: u16,
    /// 16 bits, Group address
    pub group_address: u16,
}

impl MbtGrpVChGrant {
    pub fn from_bitbuf(header: &MbtHeader, buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        buffer.skip_field(16, "reserved")?;
        let channel_t = buffer.read_field(16, "channel_t")? as u16;
        let channel_r = buffer.read_field(16, "channel_r")? as u16;
        let group_address = buffer.read_field(16, "group_address")? as u16;
        Ok(MbtGrpVChGrant {
            service_options: ServiceOptions::from_raw(header.field_a as u64),
            channel_t,
            channel_r,
            group_address,
        })
    }
}

impl fmt::Display for MbtGrpVChGrant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MbtGrpVChGrant {{ service_options: {} channel_t: 0x{:04X} channel_r: 0x{:04X} group_address: {} }}",
            self.service_options,
            self.channel_t,
            self.channel_r,
            self.group_address,
        )
    }
}
