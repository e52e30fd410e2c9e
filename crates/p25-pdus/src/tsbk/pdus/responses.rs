use core::fmt;

use p25_core::{BitBuffer, PduParseErr};

/// Representation of ACK_RSP_FNE (opcode 0x20).
/// With the extended flag set the source is replaced by a full WACN/system/unit triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckRspFne {
    /// 1 bit, Additional information valid
    pub aiv: bool,
    /// 1 bit, Extended addressing
    pub extended: bool,
    /// 6 bits, Opcode of the service being acknowledged
    pub service_type: u8,
    pub address: AckAddress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AckAddress {
    Unit {
        /// 24 bits
        source_address: u32,
        /// 24 bits
        target_address: u32,
    },
    Extended {
        /// 20 bits
        wacn: u32,
        /// 12 bits
        sysid: u16,
        /// 24 bits
        target_id: u32,
    },
}

impl AckRspFne {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let aiv = buffer.read_flag("aiv")?;
        let extended = buffer.read_flag("extended")?;
        let service_type = buffer.read_field(6, "service_type")? as u8;
        let address = if extended {
            let wacn = buffer.read_field(20, "wacn")? as u32;
            let sysid = buffer.read_field(12, "sysid")? as u16;
            let target_id = buffer.read_field(24, "target_id")? as u32;
            AckAddress::Extended { wacn, sysid, target_id }
        } else {
            buffer.skip_field(8, "reserved")?;
            let source_address = buffer.read_field(24, "source_address")? as u32;
            let target_address = buffer.read_field(24, "target_address")? as u32;
            AckAddress::Unit { source_address, target_address }
        };
        Ok(AckRspFne { aiv, extended, service_type, address })
    }
}

impl fmt::Display for AckRspFne {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AckRspFne {{ aiv: {} service_type: 0x{:02X} ", self.aiv as u8, self.service_type)?;
        match &self.address {
            AckAddress::Unit { source_address, target_address } => {
                write!(f, "source_address: {} target_address: {} }}", source_address, target_address)
            }
            AckAddress::Extended { wacn, sysid, target_id } => {
                write!(f, "wacn: 0x{:05X} sysid: 0x{:03X} target_id: {} }}", wacn, sysid, target_id)
            }
        }
    }
}

/// Representation of QUE_RSP (opcode 0x21) and DENY_RSP (opcode 0x27), which share a layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceResponse {
    /// 1 bit, Additional information valid
    pub aiv: bool,
    /// 6 bits, Opcode of the service being answered
    pub service_type: u8,
    /// 8 bits, Reason code
    pub reason: u8,
    /// 24 bits, Additional information
    pub additional: u32,
    /// 24 bits, Target address
    pub target_address: u32,
}

impl ServiceResponse {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let aiv = buffer.read_flag("aiv")?;
        buffer.skip_field(1, "reserved")?;
        let service_type = buffer.read_field(6, "service_type")? as u8;
        let reason = buffer.read_field(8, "reason")? as u8;
        let additional = buffer.read_field(24, "additional")? as u32;
        let target_address = buffer.read_field(24, "target_address")? as u32;
        Ok(ServiceResponse { aiv, service_type, reason, additional, target_address })
    }

    /// For group services the additional info carries call options and the group address
    pub fn group_info(&self) -> Option<(u8, u16)> {
        if self.aiv {
            None
        } else {
            Some((((self.additional >> 16) & 0xFF) as u8, (self.additional & 0xFFFF) as u16))
        }
    }

    /// For unit-to-unit services the additional info carries the second unit
    pub fn unit_info(&self) -> Option<u32> {
        if self.aiv { Some(self.additional) } else { None }
    }
}

impl fmt::Display for ServiceResponse {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ServiceResponse {{ service_type: 0x{:02X} reason: 0x{:02X} ", self.service_type, self.reason)?;
        match self.group_info() {
            Some((opts, ga)) => write!(f, "call_options: 0x{:02X} group_address: {} ", opts, ga)?,
            None => write!(f, "source_address: {} ", self.additional)?,
        }
        write!(f, "target_address: {} }}", self.target_address)
    }
}
