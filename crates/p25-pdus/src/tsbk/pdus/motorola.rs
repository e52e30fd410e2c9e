//! Motorola (manufacturer id 0x90) outbound TSBK messages.
//! Layouts are partly reverse engineered; fields of unknown meaning are kept raw.

use core::fmt;

use p25_core::{BitBuffer, PduParseErr};

use crate::tsbk::fields::service_options::ServiceOptions;

/// Reads eight 6-bit characters offset by `base`, as used by call sign broadcasts
pub(crate) fn read_call_sign(buffer: &mut BitBuffer, base: u8) -> Result<String, PduParseErr> {
    let mut s = String::with_capacity(8);
    for _ in 0..8 {
        let c = buffer.read_field(6, "call_sign")? as u8;
        s.push((c + base) as char);
    }
    Ok(s)
}

/// Representation of MOT_GRG_ADD_CMD (0x00) and MOT_GRG_DEL_CMD (0x01).
/// Adds or removes up to three talkgroups to or from a patch supergroup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotGrgCmd {
    /// 16 bits, Supergroup
    pub supergroup: u16,
    /// 3 x 16 bits, Patched group addresses
    pub groups: [u16; 3],
}

impl MotGrgCmd {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let supergroup = buffer.read_field(16, "supergroup")? as u16;
        let mut groups = [0u16; 3];
        for g in groups.iter_mut() {
            *g = buffer.read_field(16, "group_address")? as u16;
        }
        Ok(MotGrgCmd { supergroup, groups })
    }
}

impl fmt::Display for MotGrgCmd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MotGrgCmd {{ sg: {} ga: {:?} }}", self.supergroup, self.groups)
    }
}

/// Representation of MOT_GRG_CN_GRANT (0x02). Voice grant for a patch supergroup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotGrgCnGrant {
    /// 8 bits, Service options
    pub service_options: ServiceOptions,
    /// 16 bits, Channel
    pub channel: u16,
    /// 16 bits, Supergroup
    pub supergroup: u16,
    /// 24 bits, Source address
    pub source_address: u32,
}

impl MotGrgCnGrant {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let service_options = ServiceOptions::from_raw(buffer.read_field(8, "service_options")?);
        let channel = buffer.read_field(16, "channel")? as u16;
        let supergroup = buffer.read_field(16, "supergroup")? as u16;
        let source_address = buffer.read_field(24, "source_address")? as u32;
        Ok(MotGrgCnGrant { service_options, channel, supergroup, source_address })
    }
}

impl fmt::Display for MotGrgCnGrant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MotGrgCnGrant {{ service_options: {} channel: 0x{:04X} sg: {} source_address: {} }}",
            self.service_options, self.channel, self.supergroup, self.source_address)
    }
}

/// Representation of MOT_GRG_CN_GRANT_UPDT (0x03)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotGrgCnGrantUpdt {
    pub channel_a: u16,
    pub supergroup_a: u16,
    pub channel_b: u16,
    pub supergroup_b: u16,
}

impl MotGrgCnGrantUpdt {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let channel_a = buffer.read_field(16, "channel_a")? as u16;
        let supergroup_a = buffer.read_field(16, "supergroup_a")? as u16;
        let channel_b = buffer.read_field(16, "channel_b")? as u16;
        let supergroup_b = buffer.read_field(16, "supergroup_b")? as u16;
        Ok(MotGrgCnGrantUpdt { channel_a, supergroup_a, channel_b, supergroup_b })
    }
}

impl fmt::Display for MotGrgCnGrantUpdt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MotGrgCnGrantUpdt {{ channel_a: 0x{:04X} sg_a: {} channel_b: 0x{:04X} sg_b: {} }}",
            self.channel_a, self.supergroup_a, self.channel_b, self.supergroup_b)
    }
}

/// Representation of MOT_EXT_FNCT_CMD (0x04)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotExtFnctCmd {
    /// 8 bits, Class (unit/group control, dynamic, tone signalling)
    pub class: u8,
    /// 8 bits, Operand (radio check, inhibit, ...)
    pub operand: u8,
    /// 24 bits, Arguments, a group address or a source unit
    pub arguments: u32,
    /// 24 bits, Target address
    pub target_address: u32,
}

impl MotExtFnctCmd {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let class = buffer.read_field(8, "class")? as u8;
        let operand = buffer.read_field(8, "operand")? as u8;
        let arguments = buffer.read_field(24, "arguments")? as u32;
        let target_address = buffer.read_field(24, "target_address")? as u32;
        Ok(MotExtFnctCmd { class, operand, arguments, target_address })
    }

    /// Group address interpretation of the arguments
    pub fn group_address(&self) -> u16 {
        (self.arguments >> 8) as u16
    }
}

impl fmt::Display for MotExtFnctCmd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MotExtFnctCmd {{ class: 0x{:02X} operand: 0x{:02X} ga: {} st: {} target_address: {} }}",
            self.class, self.operand, self.group_address(), self.arguments, self.target_address)
    }
}

/// Representation of MOT_SYS_BCST (0x05). Random hold-off timers for site failure recovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotSysBcst {
    /// 6 bits, Failure random hold-off timer, group
    pub frhot_group: u8,
    /// 6 bits, Failure random hold-off timer, individual
    pub frhot_unit: u8,
    /// 6 bits, Recovery random hold-off timer
    pub rrhot: u8,
    /// 3 x 8 bits, meaning unknown
    pub unknown: [u8; 3],
}

impl MotSysBcst {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        buffer.skip_field(2, "reserved")?;
        let frhot_group = buffer.read_field(6, "frhot_group")? as u8;
        buffer.skip_field(2, "reserved")?;
        let frhot_unit = buffer.read_field(6, "frhot_unit")? as u8;
        buffer.skip_field(2, "reserved")?;
        let rrhot = buffer.read_field(6, "rrhot")? as u8;
        let mut unknown = [0u8; 3];
        for b in unknown.iter_mut() {
            *b = buffer.read_field(8, "unknown")? as u8;
        }
        buffer.skip_field(16, "reserved")?;
        Ok(MotSysBcst { frhot_group, frhot_unit, rrhot, unknown })
    }
}

impl fmt::Display for MotSysBcst {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MotSysBcst {{ frhot_g: {} frhot_iu: {} rrhot: {} unknown: {:02X?} }}",
            self.frhot_group, self.frhot_unit, self.rrhot, self.unknown)
    }
}

/// Representation of MOT_DENY_RSP (0x07)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotDenyRsp {
    /// 2 x 8 bits, reason related, meaning not fully known
    pub other: [u8; 2],
    /// 24 bits, Additional information
    pub additional: u32,
    /// 24 bits, Target address
    pub target_address: u32,
}

impl MotDenyRsp {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let other = [
            buffer.read_field(8, "other1")? as u8,
            buffer.read_field(8, "other2")? as u8,
        ];
        let additional = buffer.read_field(24, "additional")? as u32;
        let target_address = buffer.read_field(24, "target_address")? as u32;
        Ok(MotDenyRsp { other, additional, target_address })
    }
}

impl fmt::Display for MotDenyRsp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MotDenyRsp {{ other: {:02X?} additional: 0x{:06X} target_address: {} }}",
            self.other, self.additional, self.target_address)
    }
}

/// Representation of MOT_ACK_RSP_FNE (0x08)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotAckRspFne {
    /// 6 bits, Service type
    pub service_type: u8,
    /// 24 bits, Source address
    pub source_address: u32,
    /// 24 bits, Target address
    pub target_address: u32,
}

impl MotAckRspFne {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        buffer.skip_field(2, "reserved")?;
        let service_type = buffer.read_field(6, "service_type")? as u8;
        buffer.skip_field(8, "reserved")?;
        let source_address = buffer.read_field(24, "source_address")? as u32;
        let target_address = buffer.read_field(24, "target_address")? as u32;
        Ok(MotAckRspFne { service_type, source_address, target_address })
    }
}

impl fmt::Display for MotAckRspFne {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MotAckRspFne {{ service_type: 0x{:02X} source_address: {} target_address: {} }}",
            self.service_type, self.source_address, self.target_address)
    }
}

/// Representation of MOT_SCN_MRK (0x09). Scan marker carrying the microslot count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotScnMrk {
    /// 10 bits, Microslot count, 7.5 ms units
    pub microslot_count: u16,
    /// 54 bits, not decoded
    pub rest: u64,
}

impl MotScnMrk {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let microslot_count = buffer.read_field(10, "microslot_count")? as u16;
        let rest = buffer.read_field(54, "rest")?;
        Ok(MotScnMrk { microslot_count, rest })
    }
}

impl fmt::Display for MotScnMrk {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MotScnMrk {{ microslot_count: {} }}", self.microslot_count)
    }
}

/// Representation of MOT_EMR_ALRM (0x0A)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotEmrAlrm {
    /// 16 bits, Group address
    pub group_address: u16,
    /// 24 bits, Source address
    pub source_address: u32,
}

impl MotEmrAlrm {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        buffer.skip_field(24, "reserved")?;
        let group_address = buffer.read_field(16, "group_address")? as u16;
        let source_address = buffer.read_field(24, "source_address")? as u32;
        Ok(MotEmrAlrm { group_address, source_address })
    }
}

impl fmt::Display for MotEmrAlrm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MotEmrAlrm {{ ga: {} source_address: {} }}", self.group_address, self.source_address)
    }
}

/// Call sign broadcast: MOT_BSI_GRANT (0x0B), and the Harris equivalent sent with opcode 0x33.
/// The two vendors use different character offsets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallSignBcst {
    /// 8 x 6 bits, Call sign characters
    pub call_sign: String,
    /// 16 bits, Channel
    pub channel: u16,
}

impl CallSignBcst {
    /// Character offset of the Motorola encoding
    pub const MOT_CHAR_BASE: u8 = 0x2B;
    /// Character offset of the Harris encoding
    pub const HARRIS_CHAR_BASE: u8 = 0x2E;

    pub fn from_bitbuf(buffer: &mut BitBuffer, char_base: u8) -> Result<Self, PduParseErr> {
        let call_sign = read_call_sign(buffer, char_base)?;
        let channel = buffer.read_field(16, "channel")? as u16;
        Ok(CallSignBcst { call_sign, channel })
    }

    /// Call sign without the trailing fill characters
    pub fn trimmed(&self) -> &str {
        self.call_sign.trim_end_matches(['+', '.'])
    }
}

impl fmt::Display for CallSignBcst {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "CallSignBcst {{ call_sign: '{}' channel: 0x{:04X} }}", self.call_sign, self.channel)
    }
}

/// Representation of MOT_ADPT_PWR_CNTRL (0x0C)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotAdptPwrCntrl {
    /// 4 bits, Received signal level
    pub rf_level: u8,
    /// 4 bits, Bit error rate
    pub ber: u8,
    /// 24 bits, Target address
    pub target_address: u32,
}

impl MotAdptPwrCntrl {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        buffer.skip_field(32, "reserved")?;
        let rf_level = buffer.read_field(4, "rf_level")? as u8;
        let ber = buffer.read_field(4, "ber")? as u8;
        let target_address = buffer.read_field(24, "target_address")? as u32;
        Ok(MotAdptPwrCntrl { rf_level, ber, target_address })
    }
}

impl fmt::Display for MotAdptPwrCntrl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MotAdptPwrCntrl {{ rf_level: {} ber: {} target_address: {} }}",
            self.rf_level, self.ber, self.target_address)
    }
}

/// Representation of MOT_SYSTEM_EVENT (0x0E)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotSystemEvent {
    /// 8 bits, Reason code
    pub reason: u8,
}

impl MotSystemEvent {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let reason = buffer.read_field(8, "reason")? as u8;
        buffer.skip_field(56, "unknown")?;
        Ok(MotSystemEvent { reason })
    }
}

impl fmt::Display for MotSystemEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MotSystemEvent {{ reason: {} }}", self.reason)
    }
}

/// Representation of MOT_ADJ_STS_BCST_SHRT_EXP (0x3C). Neighbour site with explicit channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MotAdjStsBcst {
    /// 8 bits, Location registration area
    pub lra: u8,
    /// 16 bits, Downlink channel
    pub channel_t: u16,
    /// 8 bits, RFSS id
    pub rfss_id: u8,
    /// 8 bits, Site id
    pub site_id: u8,
    /// 16 bits, Uplink channel
    pub channel_r: u16,
    /// 8 bits, System service class
    pub ssc: u8,
}

impl MotAdjStsBcst {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let lra = buffer.read_field(8, "lra")? as u8;
        let channel_t = buffer.read_field(16, "channel_t")? as u16;
        let rfss_id = buffer.read_field(8, "rfss_id")? as u8;
        let site_id = buffer.read_field(8, "site_id")? as u8;
        let channel_r = buffer.read_field(16, "channel_r")? as u16;
        let ssc = buffer.read_field(8, "ssc")? as u8;
        Ok(MotAdjStsBcst { lra, channel_t, rfss_id, site_id, channel_r, ssc })
    }
}

impl fmt::Display for MotAdjStsBcst {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MotAdjStsBcst {{ rfss: {} site: {} channel_t: 0x{:04X} channel_r: 0x{:04X} ssc: 0x{:02X} }}",
            self.rfss_id, self.site_id, self.channel_t, self.channel_r, self.ssc)
    }
}
