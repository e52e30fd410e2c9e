pub mod mbt_header;
pub mod pdus;

use core::fmt;

use p25_core::{BitBuffer, PduParseErr};

use mbt_header::MbtHeader;
use pdus::mbt_grants::MbtGrpVChGrant;
use pdus::mbt_status::{MbtAdjStsBcst, MbtNetStsBcst, MbtRfssStsBcst};

use crate::tsbk::enums::tsbk_opcode::TsbkOpcode;

/// A decoded MBT data block. Only the standard messages with follow-relevant
/// content are broken out; everything else is kept as Unknown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MbtPdu {
    GrpVChGrant(MbtGrpVChGrant),
    RfssStsBcst(MbtRfssStsBcst),
    NetStsBcst(MbtNetStsBcst),
    AdjStsBcst(MbtAdjStsBcst),
    Unknown,
}

impl MbtPdu {
    /// Parse the first data block following an already parsed header
    pub fn from_bitbuf(header: &MbtHeader, buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        if header.mfid != 0x00 {
            return Ok(MbtPdu::Unknown);
        }
        let Ok(opcode) = TsbkOpcode::try_from(header.opcode as u64) else {
            return Ok(MbtPdu::Unknown);
        };
        Ok(match opcode {
            TsbkOpcode::GrpVChGrant => MbtPdu::GrpVChGrant(MbtGrpVChGrant::from_bitbuf(header, buffer)?),
            TsbkOpcode::RfssStsBcst => MbtPdu::RfssStsBcst(MbtRfssStsBcst::from_bitbuf(header, buffer)?),
            TsbkOpcode::NetStsBcst => MbtPdu::NetStsBcst(MbtNetStsBcst::from_bitbuf(header, buffer)?),
            TsbkOpcode::AdjStsBcst => MbtPdu::AdjStsBcst(MbtAdjStsBcst::from_bitbuf(header, buffer)?),
            _ => MbtPdu::Unknown,
        })
    }

    pub fn name(&self) -> &'static str {
        match self {
            MbtPdu::GrpVChGrant(_) => "GRP_V_CH_GRANT",
            MbtPdu::RfssStsBcst(_) => "RFSS_STS_BCST",
            MbtPdu::NetStsBcst(_) => "NET_STS_BCST",
            MbtPdu::AdjStsBcst(_) => "ADJ_STS_BCST",
            MbtPdu::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for MbtPdu {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            MbtPdu::GrpVChGrant(p) => write!(f, "{}", p),
            MbtPdu::RfssStsBcst(p) => write!(f, "{}", p),
            MbtPdu::NetStsBcst(p) => write!(f, "{}", p),
            MbtPdu::AdjStsBcst(p) => write!(f, "{}", p),
            MbtPdu::Unknown => write!(f, "Unknown"),
        }
    }
}

/// Header plus decoded first data block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mbt {
    pub header: MbtHeader,
    pub pdu: MbtPdu,
}

impl Mbt {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let header = MbtHeader::from_bitbuf(buffer)?;
        let pdu = MbtPdu::from_bitbuf(&header, buffer)?;
        Ok(Mbt { header, pdu })
    }

    pub fn from_bytes(data: &[u8]) -> Result<Self, PduParseErr> {
        Self::from_bitbuf(&mut BitBuffer::from_bytes(data))
    }
}

impl fmt::Display for Mbt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} {}: {}", self.header, self.pdu.name(), self.pdu)
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use mbt_header::assemble_mbt;

    #[test]
    fn test_dispatch() {
        let mbt = Mbt::from_bytes(&assemble_mbt(0x3B, 0x3BA, 0, 0, 0xBEE00u128 << 76)).unwrap();
        assert_eq!(mbt.pdu.name(), "NET_STS_BCST");
        let mbt = Mbt::from_bytes(&assemble_mbt(0x1C, 0x3BA, 0, 0, 0)).unwrap();
        assert_eq!(mbt.pdu, MbtPdu::Unknown);
    }

    #[test]
    fn test_missing_data_block() {
        let mbt = assemble_mbt(0x3A, 0x2AE, 0, 0, 0);
        assert!(Mbt::from_bytes(&mbt[..12]).is_err());
        // Opcodes without a broken-out layout never look at the data
        let mbt = assemble_mbt(0x05, 0x2AE, 0, 0, 0);
        assert!(Mbt::from_bytes(&mbt[..12]).is_ok());
    }
}
