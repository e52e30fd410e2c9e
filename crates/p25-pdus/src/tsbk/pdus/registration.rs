use core::fmt;

use p25_core::{BitBuffer, PduParseErr};

use crate::tsbk::enums::registration_response::RegistrationResponse;

/// Representation of GRP_AFF_RSP (opcode 0x28)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrpAffRsp {
    /// 1 bit, Local/global affiliation
    pub global: bool,
    /// 2 bits, Group affiliation value
    pub affiliation_value: RegistrationResponse,
    /// 16 bits, Announcement group address
    pub announcement_group: u16,
    /// 16 bits, Group address
    pub group_address: u16,
    /// 24 bits, Target address
    pub target_address: u32,
}

impl GrpAffRsp {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let global = buffer.read_flag("global")?;
        buffer.skip_field(5, "reserved")?;
        let affiliation_value = RegistrationResponse::from_bits(buffer.read_field(2, "affiliation_value")?);
        let announcement_group = buffer.read_field(16, "announcement_group")? as u16;
        let group_address = buffer.read_field(16, "group_address")? as u16;
        let target_address = buffer.read_field(24, "target_address")? as u32;
        Ok(GrpAffRsp { global, affiliation_value, announcement_group, group_address, target_address })
    }
}

impl fmt::Display for GrpAffRsp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "GrpAffRsp {{ lg: {} gav: {:?} aga: {} ga: {} target_address: {} }}",
            self.global as u8,
            self.affiliation_value,
            self.announcement_group,
            self.group_address,
            self.target_address,
        )
    }
}

/// Representation of LOC_REG_RSP (opcode 0x2B)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocRegRsp {
    /// 2 bits, Registration value
    pub registration_value: RegistrationResponse,
    /// 16 bits, Group address
    pub group_address: u16,
    /// 8 bits, RFSS id
    pub rfss_id: u8,
    /// 8 bits, Site id
    pub site_id: u8,
    /// 24 bits, Target address
    pub target_address: u32,
}

impl LocRegRsp {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        buffer.skip_field(6, "reserved")?;
        let registration_value = RegistrationResponse::from_bits(buffer.read_field(2, "registration_value")?);
        let group_address = buffer.read_field(16, "group_address")? as u16;
        let rfss_id = buffer.read_field(8, "rfss_id")? as u8;
        let site_id = buffer.read_field(8, "site_id")? as u8;
        let target_address = buffer.read_field(24, "target_address")? as u32;
        Ok(LocRegRsp { registration_value, group_address, rfss_id, site_id, target_address })
    }
}

impl fmt::Display for LocRegRsp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "LocRegRsp {{ rv: {:?} ga: {} rfss: {} site: {} target_address: {} }}",
            self.registration_value, self.group_address, self.rfss_id, self.site_id, self.target_address)
    }
}

/// Representation of U_REG_RSP (opcode 0x2C)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct URegRsp {
    /// 2 bits, Registration value
    pub registration_value: RegistrationResponse,
    /// 12 bits, System id
    pub sysid: u16,
    /// 24 bits, Source id
    pub source_id: u32,
    /// 24 bits, Source address
    pub source_address: u32,
}

impl URegRsp {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        buffer.skip_field(2, "reserved")?;
        let registration_value = RegistrationResponse::from_bits(buffer.read_field(2, "registration_value")?);
        let sysid = buffer.read_field(12, "sysid")? as u16;
        let source_id = buffer.read_field(24, "source_id")? as u32;
        let source_address = buffer.read_field(24, "source_address")? as u32;
        Ok(URegRsp { registration_value, sysid, source_id, source_address })
    }
}

impl fmt::Display for URegRsp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "URegRsp {{ rv: {:?} sysid: 0x{:03X} source_id: {} source_address: {} }}",
            self.registration_value, self.sysid, self.source_id, self.source_address)
    }
}

/// Body shared by AUTH_CMD (0x2E) and U_DE_REG_ACK (0x2F): a fully qualified unit id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullUnitId {
    /// 20 bits, WACN
    pub wacn: u32,
    /// 12 bits, System id
    pub sysid: u16,
    /// 24 bits, Unit id
    pub unit_id: u32,
}

impl FullUnitId {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        buffer.skip_field(8, "reserved")?;
        let wacn = buffer.read_field(20, "wacn")? as u32;
        let sysid = buffer.read_field(12, "sysid")? as u16;
        let unit_id = buffer.read_field(24, "unit_id")? as u32;
        Ok(FullUnitId { wacn, sysid, unit_id })
    }
}

impl fmt::Display for FullUnitId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "FullUnitId {{ wacn: 0x{:05X} sysid: 0x{:03X} unit_id: {} }}", self.wacn, self.sysid, self.unit_id)
    }
}

/// Representation of AUTH_FNE_RESP (opcode 0x32)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthFneResp {
    /// 32 bits, Response value
    pub response: u32,
    /// 24 bits, Target id
    pub target_id: u32,
}

impl AuthFneResp {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        buffer.skip_field(8, "reserved")?;
        let response = buffer.read_field(32, "response")? as u32;
        let target_id = buffer.read_field(24, "target_id")? as u32;
        Ok(AuthFneResp { response, target_id })
    }
}

impl fmt::Display for AuthFneResp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AuthFneResp {{ response: 0x{:08X} target_id: {} }}", self.response, self.target_id)
    }
}

/// Representation of P_PARM_UPDT (opcode 0x3F)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PParmUpdt {
    /// 8 bits, Algorithm id
    pub algorithm_id: u8,
    /// 16 bits, Key id
    pub key_id: u16,
    /// 24 bits, Target id
    pub target_id: u32,
}

impl PParmUpdt {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        buffer.skip_field(16, "reserved")?;
        let algorithm_id = buffer.read_field(8, "algorithm_id")? as u8;
        let key_id = buffer.read_field(16, "key_id")? as u16;
        let target_id = buffer.read_field(24, "target_id")? as u32;
        Ok(PParmUpdt { algorithm_id, key_id, target_id })
    }
}

impl fmt::Display for PParmUpdt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "PParmUpdt {{ algid: 0x{:02X} keyid: 0x{:04X} target_id: {} }}",
            self.algorithm_id, self.key_id, self.target_id)
    }
}
