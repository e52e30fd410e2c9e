use core::fmt;

use p25_core::{BitBuffer, PduParseErr};

use crate::mbt::mbt_header::MbtHeader;

/// Representation of the explicit ADJ_STS_BCST MBT (opcode 0x3C).
/// RFSS and site id travel in header fields A and B, the system id in the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MbtAdjStsBcst {
    /// Header, System id
    pub sysid: u16,
    /// Header field A, RFSS id
    pub rfss_id: u8,
    /// Header field B, Site id
    pub site_id: u8,
    /// 16 bits, Transmit (downlink) channel
    pub channel_t: u16,
    /// 16 bits, Receive (uplink) channel
    pub channel_r: u16,
}

impl MbtAdjStsBcst {
    pub fn from_bitbuf(header: &MbtHeader, buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let channel_t = buffer.read_field(16, "channel_t")? as u16;
        let channel_r = buffer.read_field(16, "channel_r")? as u16;
        Ok(MbtAdjStsBcst {
            sysid: header.sysid,
            rfss_id: header.field_a,
            site_id: header.field_b,
            channel_t,
            channel_r,
        })
    }
}

impl fmt::Display for MbtAdjStsBcst {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MbtAdjStsBcst {{ sysid: 0x{:03X} rfss: {} site: {} channel_t: 0x{:04X} channel_r: 0x{:04X} }}",
            self.sysid, self.rfss_id, self.site_id, self.channel_t, self.channel_r)
    }
}

/// Representation of the explicit NET_STS_BCST MBT (opcode 0x3B)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MbtNetStsBcst {
    /// Header, System id
    pub sysid: u16,
    /// 20 bits, Wide area communications network id
    pub wacn: u32,
    /// 16 bits, Transmit (downlink) channel
    pub channel_t: u16,
    /// 16 bits, Receive (uplink) channel
    pub channel_r: u16,
}

impl MbtNetStsBcst {
    pub fn from_bitbuf(header: &MbtHeader, buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let wacn = buffer.read_field(20, "wacn")? as u32;
        buffer.skip_field(4, "reserved")?;
        let channel_t = buffer.read_field(16, "channel_t")? as u16;
        let channel_r = buffer.read_field(16, "channel_r")? as u16;
        Ok(MbtNetStsBcst { sysid: header.sysid, wacn, channel_t, channel_r })
    }
}

impl fmt::Display for MbtNetStsBcst {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MbtNetStsBcst {{ wacn: 0x{:05X} sysid: 0x{:03X} channel_t: 0x{:04X} channel_r: 0x{:04X} }}",
            self.wacn, self.sysid, self.channel_t, self.channel_r)
    }
}

/// Representation of the explicit RFSS_STS_BCST MBT (opcode 0x3A)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MbtRfssStsBcst {
    /// Header, System id
    pub sysid: u16,
    /// 8 bits, RFSS id
    pub rfss_id: u8,
    /// 8 bits, Site id
    pub site_id: u8,
    /// 16 bits, Transmit (downlink) channel
    pub channel_t: u16,
    /// 16 bits, Receive (uplink) channel
    pub channel_r: u16,
}

impl MbtRfssStsBcst {
    pub fn from_bitbuf(header: &MbtHeader, buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let rfss_id = buffer.read_field(8, "rfss_id")? as u8;
        let site_id = buffer.read_field(8, "site_id")? as u8;
        let channel_t = buffer.read_field(16, "channel_t")? as u16;
        let channel_r = buffer.read_field(16, "channel_r")? as u16;
        Ok(MbtRfssStsBcst { sysid: header.sysid, rfss_id, site_id, channel_t, channel_r })
    }
}

impl fmt::Display for MbtRfssStsBcst {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MbtRfssStsBcst {{ sysid: 0x{:03X} rfss: {} site: {} channel_t: 0x{:04X} channel_r: 0x{:04X} }}",
            self.sysid, self.rfss_id, self.site_id, self.channel_t, self.channel_r)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::mbt::mbt_header::assemble_mbt;

    fn parse_header(mbt: &[u8]) -> (MbtHeader, BitBuffer) {
        let mut buf = BitBuffer::from_bytes(mbt);
        let hdr = MbtHeader::from_bitbuf(&mut buf).unwrap();
        (hdr, buf)
    }

    #[test]
    fn test_net_sts_bcst() {
        let data: u128 = (0xBEE00u128 << 76) | (0x016Bu128 << 56) | (0x316Bu128 << 40);
        let (hdr, mut buf) = parse_header(&assemble_mbt(0x3B, 0x3BA, 0, 0, data));
        let pdu = MbtNetStsBcst::from_bitbuf(&hdr, &mut buf).unwrap();
        assert_eq!(pdu.wacn, 0xBEE00);
        assert_eq!(pdu.sysid, 0x3BA);
        assert_eq!(pdu.channel_t, 0x016B);
        assert_eq!(pdu.channel_r, 0x316B);
    }

    #[test]
    fn test_rfss_sts_bcst() {
        let data: u128 = (1u128 << 88) | (7u128 << 80) | (0x1010u128 << 64) | (0x2010u128 << 48);
        let (hdr, mut buf) = parse_header(&assemble_mbt(0x3A, 0x2AE, 0, 0, data));
        let pdu = MbtRfssStsBcst::from_bitbuf(&hdr, &mut buf).unwrap();
        assert_eq!((pdu.rfss_id, pdu.site_id), (1, 7));
        assert_eq!((pdu.channel_t, pdu.channel_r), (0x1010, 0x2010));
    }

    #[test]
    fn test_adj_sts_bcst_ids_from_header() {
        let data: u128 = (0x1020u128 << 80) | (0x2020u128 << 64);
        let (hdr, mut buf) = parse_header(&assemble_mbt(0x3C, 0x2AE, 3, 9, data));
        let pdu = MbtAdjStsBcst::from_bitbuf(&hdr, &mut buf).unwrap();
        assert_eq!((pdu.rfss_id, pdu.site_id, pdu.sysid), (3, 9, 0x2AE));
        assert_eq!(pdu.channel_t, 0x1020);
    }
}
