/// Opcodes of the standard (manufacturer id 0x00) outbound TSBK message set
/// Bits: 6
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum TsbkOpcode {
    /// Group voice channel grant
    GrpVChGrant = 0x00,
    /// Group voice channel grant update
    GrpVChGrantUpdt = 0x02,
    /// Group voice channel grant update, explicit
    GrpVChGrantUpdtExp = 0x03,
    /// Unit to unit voice channel grant
    UuVChGrant = 0x04,
    /// Unit to unit answer request
    UuAnsReq = 0x05,
    /// Unit to unit voice channel grant update
    UuVChGrantUpdt = 0x06,
    /// Telephone interconnect voice channel grant
    TeleIntChGrant = 0x08,
    /// Telephone interconnect voice channel grant update
    TeleIntChGrantUpdt = 0x09,
    /// Telephone interconnect answer request
    TeleIntAnsReq = 0x0A,
    /// Individual data channel grant (obsolete)
    IndDataChGrant = 0x10,
    /// Group data channel grant (obsolete)
    GrpDataChGrant = 0x11,
    /// Group data channel announcement (obsolete)
    GrpDataChAnn = 0x12,
    /// Group data channel announcement, explicit (obsolete)
    GrpDataChAnnExp = 0x13,
    /// SNDCP data channel grant
    SnDataChGrant = 0x14,
    /// SNDCP data page request
    SnDataPageReq = 0x15,
    /// SNDCP data channel announcement, explicit
    SnDataChAnnExp = 0x16,
    /// Status update
    StsUpdt = 0x18,
    /// Status query
    StsQ = 0x1A,
    /// Message update
    MsgUpdt = 0x1C,
    /// Radio unit monitor command
    RadMonCmd = 0x1D,
    /// Radio unit monitor enhanced command
    RadMonEnhCmd = 0x1E,
    /// Call alert
    CallAlrt = 0x1F,
    /// Acknowledge response, FNE
    AckRspFne = 0x20,
    /// Queued response
    QueRsp = 0x21,
    /// Extended function command
    ExtFnctCmd = 0x24,
    /// Deny response
    DenyRsp = 0x27,
    /// Group affiliation response
    GrpAffRsp = 0x28,
    /// Secondary control channel broadcast, explicit
    SccbExp = 0x29,
    /// Group affiliation query
    GrpAffQ = 0x2A,
    /// Location registration response
    LocRegRsp = 0x2B,
    /// Unit registration response
    URegRsp = 0x2C,
    /// Unit registration command
    URegCmd = 0x2D,
    /// Authentication command (obsolete)
    AuthCmd = 0x2E,
    /// De-registration acknowledge
    UDeRegAck = 0x2F,
    /// Synchronization broadcast
    SyncBcst = 0x30,
    /// Authentication demand
    AuthDmd = 0x31,
    /// Authentication FNE response
    AuthFneResp = 0x32,
    /// Identifier update for TDMA
    IdenUpTdma = 0x33,
    /// Identifier update for VHF/UHF bands
    IdenUpVu = 0x34,
    /// Time and date announcement
    TimeDateAnn = 0x35,
    /// Roaming address command
    RoamAddrCmd = 0x36,
    /// Roaming address update
    RoamAddrUpdt = 0x37,
    /// System service broadcast
    SysSrvBcst = 0x38,
    /// Secondary control channel broadcast
    Sccb = 0x39,
    /// RFSS status broadcast
    RfssStsBcst = 0x3A,
    /// Network status broadcast
    NetStsBcst = 0x3B,
    /// Adjacent status broadcast
    AdjStsBcst = 0x3C,
    /// Identifier update
    IdenUp = 0x3D,
    /// Protection parameter update (obsolete)
    PParmUpdt = 0x3F,
}

impl std::convert::TryFrom<u64> for TsbkOpcode {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0x00 => Ok(TsbkOpcode::GrpVChGrant),
            0x02 => Ok(TsbkOpcode::GrpVChGrantUpdt),
            0x03 => Ok(TsbkOpcode::GrpVChGrantUpdtExp),
            0x04 => Ok(TsbkOpcode::UuVChGrant),
            0x05 => Ok(TsbkOpcode::UuAnsReq),
            0x06 => Ok(TsbkOpcode::UuVChGrantUpdt),
            0x08 => Ok(TsbkOpcode::TeleIntChGrant),
            0x09 => Ok(TsbkOpcode::TeleIntChGrantUpdt),
            0x0A => Ok(TsbkOpcode::TeleIntAnsReq),
            0x10 => Ok(TsbkOpcode::IndDataChGrant),
            0x11 => Ok(TsbkOpcode::GrpDataChGrant),
            0x12 => Ok(TsbkOpcode::GrpDataChAnn),
            0x13 => Ok(TsbkOpcode::GrpDataChAnnExp),
            0x14 => Ok(TsbkOpcode::SnDataChGrant),
            0x15 => Ok(TsbkOpcode::SnDataPageReq),
            0x16 => Ok(TsbkOpcode::SnDataChAnnExp),
            0x18 => Ok(TsbkOpcode::StsUpdt),
            0x1A => Ok(TsbkOpcode::StsQ),
            0x1C => Ok(TsbkOpcode::MsgUpdt),
            0x1D => Ok(TsbkOpcode::RadMonCmd),
            0x1E => Ok(TsbkOpcode::RadMonEnhCmd),
            0x1F => Ok(TsbkOpcode::CallAlrt),
            0x20 => Ok(TsbkOpcode::AckRspFne),
            0x21 => Ok(TsbkOpcode::QueRsp),
            0x24 => Ok(TsbkOpcode::ExtFnctCmd),
            0x27 => Ok(TsbkOpcode::DenyRsp),
            0x28 => Ok(TsbkOpcode::GrpAffRsp),
            0x29 => Ok(TsbkOpcode::SccbExp),
            0x2A => Ok(TsbkOpcode::GrpAffQ),
            0x2B => Ok(TsbkOpcode::LocRegRsp),
            0x2C => Ok(TsbkOpcode::URegRsp),
            0x2D => Ok(TsbkOpcode::URegCmd),
            0x2E => Ok(TsbkOpcode::AuthCmd),
            0x2F => Ok(TsbkOpcode::UDeRegAck),
            0x30 => Ok(TsbkOpcode::SyncBcst),
            0x31 => Ok(TsbkOpcode::AuthDmd),
            0x32 => Ok(TsbkOpcode::AuthFneResp),
            0x33 => Ok(TsbkOpcode::IdenUpTdma),
            0x34 => Ok(TsbkOpcode::IdenUpVu),
            0x35 => Ok(TsbkOpcode::TimeDateAnn),
            0x36 => Ok(TsbkOpcode::RoamAddrCmd),
            0x37 => Ok(TsbkOpcode::RoamAddrUpdt),
            0x38 => Ok(TsbkOpcode::SysSrvBcst),
            0x39 => Ok(TsbkOpcode::Sccb),
            0x3A => Ok(TsbkOpcode::RfssStsBcst),
            0x3B => Ok(TsbkOpcode::NetStsBcst),
            0x3C => Ok(TsbkOpcode::AdjStsBcst),
            0x3D => Ok(TsbkOpcode::IdenUp),
            0x3F => Ok(TsbkOpcode::PParmUpdt),
            _ => Err(()),
        }
    }
}

impl TsbkOpcode {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        self as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_roundtrip_and_gaps() {
        assert_eq!(TsbkOpcode::try_from(0x3A), Ok(TsbkOpcode::RfssStsBcst));
        assert_eq!(TsbkOpcode::IdenUp.into_raw(), 0x3D);
        for reserved in [0x01u64, 0x07, 0x0B, 0x0F, 0x17, 0x19, 0x1B, 0x22, 0x23, 0x25, 0x26, 0x3E] {
            assert!(TsbkOpcode::try_from(reserved).is_err());
        }
    }
}
