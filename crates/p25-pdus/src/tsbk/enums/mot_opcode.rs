/// Opcodes of the Motorola (manufacturer id 0x90) outbound TSBK message set
/// Bits: 6
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MotOpcode {
    /// Patch supergroup add command
    GrgAddCmd = 0x00,
    /// Patch supergroup delete command
    GrgDelCmd = 0x01,
    /// Patch supergroup voice channel grant
    GrgCnGrant = 0x02,
    /// Patch supergroup voice channel grant update
    GrgCnGrantUpdt = 0x03,
    /// Extended function command
    ExtFnctCmd = 0x04,
    /// System broadcast
    SysBcst = 0x05,
    /// Queued response
    QueRsp = 0x06,
    /// Deny response
    DenyRsp = 0x07,
    /// Acknowledge response, FNE
    AckRspFne = 0x08,
    /// Scan marker
    ScnMrk = 0x09,
    /// Emergency alarm
    EmrAlrm = 0x0A,
    /// Base station identification (call sign)
    BsiGrant = 0x0B,
    /// Adaptive power control
    AdptPwrCntrl = 0x0C,
    /// Identifier update for TDMA
    IdenUpTdma = 0x0D,
    /// System event
    SystemEvent = 0x0E,
    /// Adjacent status broadcast, short explicit
    AdjStsBcst = 0x3C,
}

impl std::convert::TryFrom<u64> for MotOpcode {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0x00 => Ok(MotOpcode::GrgAddCmd),
            0x01 => Ok(MotOpcode::GrgDelCmd),
            0x02 => Ok(MotOpcode::GrgCnGrant),
            0x03 => Ok(MotOpcode::GrgCnGrantUpdt),
            0x04 => Ok(MotOpcode::ExtFnctCmd),
            0x05 => Ok(MotOpcode::SysBcst),
            0x06 => Ok(MotOpcode::QueRsp),
            0x07 => Ok(MotOpcode::DenyRsp),
            0x08 => Ok(MotOpcode::AckRspFne),
            0x09 => Ok(MotOpcode::ScnMrk),
            0x0A => Ok(MotOpcode::EmrAlrm),
            0x0B => Ok(MotOpcode::BsiGrant),
            0x0C => Ok(MotOpcode::AdptPwrCntrl),
            0x0D => Ok(MotOpcode::IdenUpTdma),
            0x0E => Ok(MotOpcode::SystemEvent),
            0x3C => Ok(MotOpcode::AdjStsBcst),
            _ => Err(()),
        }
    }
}

impl MotOpcode {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        self as u64
    }
}
