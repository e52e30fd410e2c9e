use core::fmt;

use p25_core::{BitBuffer, PduParseErr};

use crate::tsbk::fields::service_options::ServiceOptions;

/// Representation of GRP_V_CH_GRANT (opcode 0x00).
/// Assigns a voice channel to a talkgroup call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrpVChGrant {
    /// 8 bits, Service options
    pub service_options: ServiceOptions,
    /// 16 bits, Channel
    pub channel: u16,
    /// 16 bits, Group address
    pub group_address: u16,
    /// 24 bits, Source address
    pub source_address: u32,
}

impl GrpVChGrant {
    /// Parse the 64-bit body from BitBuffer
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let service_options = ServiceOptions::from_raw(buffer.read_field(8, "service_options")?);
        let channel = buffer.read_field(16, "channel")? as u16;
        let group_address = buffer.read_field(16, "group_address")? as u16;
        let source_address = buffer.read_field(24, "source_address")? as u32;
        Ok(GrpVChGrant { service_options, channel, group_address, source_address })
    }
}

impl fmt::Display for GrpVChGrant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "GrpVChGrant {{ service_options: {} channel: 0x{:04X} group_address: {} source_address: {} }}",
            self.service_options,
            self.channel,
            self.group_address,
            self.source_address,
        )
    }
}

/// Representation of GRP_V_CH_GRANT_UPDT (opcode 0x02).
/// Late-entry reminder of up to two ongoing group calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrpVChGrantUpdt {
    /// 16 bits, Channel A
    pub channel_a: u16,
    /// 16 bits, Group address A
    pub group_address_a: u16,
    /// 16 bits, Channel B
    pub channel_b: u16,
    /// 16 bits, Group address B
    pub group_address_b: u16,
}

impl GrpVChGrantUpdt {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let channel_a = buffer.read_field(16, "channel_a")? as u16;
        let group_address_a = buffer.read_field(16, "group_address_a")? as u16;
        let channel_b = buffer.read_field(16, "channel_b")? as u16;
        let group_address_b = buffer.read_field(16, "group_address_b")? as u16;
        Ok(GrpVChGrantUpdt { channel_a, group_address_a, channel_b, group_address_b })
    }
}

impl fmt::Display for GrpVChGrantUpdt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "GrpVChGrantUpdt {{ channel_a: 0x{:04X} group_address_a: {} channel_b: 0x{:04X} group_address_b: {} }}",
            self.channel_a,
            self.group_address_a,
            self.channel_b,
            self.group_address_b,
        )
    }
}

/// Representation of GRP_V_CH_GRANT_UPDT_EXP (opcode 0x03).
/// Grant update with explicit transmit and receive channels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrpVChGrantUpdtExp {
    /// 8 bits, Service options
    pub service_options: ServiceOptions,
    /// 16 bits, Channel the units listen on (downlink)
    pub channel_t: u16,
    /// 16 bits, Channel the units transmit on (uplink)
    pub channel_r: u16,
    /// 16 bits, Group address
    pub group_address: u16,
}

impl GrpVChGrantUpdtExp {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let service_options = ServiceOptions::from_raw(buffer.read_field(8, "service_options")?);
        buffer.skip_field(8, "reserved")?;
        let channel_t = buffer.read_field(16, "channel_t")? as u16;
        let channel_r = buffer.read_field(16, "channel_r")? as u16;
        let group_address = buffer.read_field(16, "group_address")? as u16;
        Ok(GrpVChGrantUpdtExp { service_options, channel_t, channel_r, group_address })
    }
}

impl fmt::Display for GrpVChGrantUpdtExp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "GrpVChGrantUpdtExp {{ service_options: {} channel_t: 0x{:04X} channel_r: 0x{:04X} group_address: {} }}",
            self.service_options,
            self.channel_t,
            self.channel_r,
            self.group_address,
        )
    }
}

/// Representation of UU_V_CH_GRANT (opcode 0x04) and UU_V_CH_GRANT_UPDT (opcode 0x06),
/// which share a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UuVChGrant {
    /// 16 bits, Channel
    pub channel: u16,
    /// 24 bits, Target address
    pub target_address: u32,
    /// 24 bits, Source address
    pub source_address: u32,
}

impl UuVChGrant {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let channel = buffer.read_field(16, "channel")? as u16;
        let target_address = buffer.read_field(24, "target_address")? as u32;
        let source_address = buffer.read_field(24, "source_address")? as u32;
        Ok(UuVChGrant { channel, target_address, source_address })
    }
}

impl fmt::Display for UuVChGrant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UuVChGrant {{ channel: 0x{:04X} target_address: {} source_address: {} }}",
            self.channel,
            self.target_address,
            self.source_address,
        )
    }
}

/// Representation of UU_ANS_REQ (opcode 0x05)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UuAnsReq {
    /// 8 bits, Service options
    pub service_options: ServiceOptions,
    /// 24 bits, Target address
    pub target_address: u32,
    /// 24 bits, Source id
    pub source_id: u32,
}

impl UuAnsReq {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let service_options = ServiceOptions::from_raw(buffer.read_field(8, "service_options")?);
        buffer.skip_field(8, "reserved")?;
        let target_address = buffer.read_field(24, "target_address")? as u32;
        let source_id = buffer.read_field(24, "source_id")? as u32;
        Ok(UuAnsReq { service_options, target_address, source_id })
    }
}

impl fmt::Display for UuAnsReq {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UuAnsReq {{ service_options: {} target_address: {} source_id: {} }}",
            self.service_options,
            self.target_address,
            self.source_id,
        )
    }
}

/// Representation of TELE_INT_CH_GRANT (opcode 0x08) and TELE_INT_CH_GRANT_UPDT (opcode 0x09),
/// which share a layout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeleIntChGrant {
    /// 8 bits, Service options
    pub service_options: ServiceOptions,
    /// 16 bits, Channel
    pub channel: u16,
    /// 16 bits, Call timer, in 100 ms units
    pub call_timer: u16,
    /// 24 bits, Source/target address
    pub address: u32,
}

impl TeleIntChGrant {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let service_options = ServiceOptions::from_raw(buffer.read_field(8, "service_options")?);
        let channel = buffer.read_field(16, "channel")? as u16;
        let call_timer = buffer.read_field(16, "call_timer")? as u16;
        let address = buffer.read_field(24, "address")? as u32;
        Ok(TeleIntChGrant { service_options, channel, call_timer, address })
    }
}

impl fmt::Display for TeleIntChGrant {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TeleIntChGrant {{ service_options: {} channel: 0x{:04X} call_timer: {} address: {} }}",
            self.service_options,
            self.channel,
            self.call_timer,
            self.address,
        )
    }
}

/// Representation of TELE_INT_ANS_REQ (opcode 0x0A).
/// Announces an incoming telephone call with the first ten dialled digits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeleIntAnsReq {
    /// 10 x 4 bits, Digits, BCD-like with 0xA..0xF as non-digit symbols
    pub digits: [u8; 10],
    /// 24 bits, Target address
    pub target_address: u32,
}

impl TeleIntAnsReq {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let mut digits = [0u8; 10];
        for d in digits.iter_mut() {
            *d = buffer.read_field(4, "digit")? as u8;
        }
        let target_address = buffer.read_field(24, "target_address")? as u32;
        Ok(TeleIntAnsReq { digits, target_address })
    }

    pub fn digit_string(&self) -> String {
        self.digits.iter().map(|d| format!("{:X}", d)).collect()
    }
}

impl fmt::Display for TeleIntAnsReq {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TeleIntAnsReq {{ digits: {} target_address: {} }}",
            self.digit_string(),
            self.target_address,
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::tsbk::tsbk_header::pack_body;

    fn body(fields: &[(u64, usize)]) -> BitBuffer {
        BitBuffer::from_bytes(&pack_body(fields).to_be_bytes())
    }

    #[test]
    fn test_grp_v_ch_grant() {
        let mut buf = body(&[(0x40, 8), (0x1099, 16), (1082, 16), (0x123456, 24)]);
        let pdu = GrpVChGrant::from_bitbuf(&mut buf).unwrap();
        assert!(pdu.service_options.protected);
        assert_eq!(pdu.channel, 0x1099);
        assert_eq!(pdu.group_address, 1082);
        assert_eq!(pdu.source_address, 0x123456);
        assert_eq!(buf.get_len_remaining(), 0);
    }

    #[test]
    fn test_grp_v_ch_grant_updt_exp_skips_reserved() {
        let mut buf = body(&[(0x00, 8), (0xFF, 8), (0x1001, 16), (0x1002, 16), (77, 16)]);
        let pdu = GrpVChGrantUpdtExp::from_bitbuf(&mut buf).unwrap();
        assert_eq!(pdu.channel_t, 0x1001);
        assert_eq!(pdu.channel_r, 0x1002);
        assert_eq!(pdu.group_address, 77);
    }

    #[test]
    fn test_tele_int_ans_req_digits() {
        let mut buf = body(&[(0x5551234567, 40), (42, 24)]);
        let pdu = TeleIntAnsReq::from_bitbuf(&mut buf).unwrap();
        assert_eq!(pdu.digit_string(), "5551234567");
        assert_eq!(pdu.target_address, 42);
    }

    #[test]
    fn test_truncated_body() {
        let mut buf = BitBuffer::from_bytes(&[0x00, 0x10, 0x99]);
        assert_eq!(
            GrpVChGrant::from_bitbuf(&mut buf),
            Err(PduParseErr::BufferEnded { field: Some("group_address") })
        );
    }
}
