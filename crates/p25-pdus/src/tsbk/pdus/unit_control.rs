use core::fmt;

use p25_core::{BitBuffer, PduParseErr};

/// Body shared by STS_Q (0x1A), CALL_ALRT (0x1F), GRP_AFF_Q (0x2A) and U_REG_CMD (0x2D):
/// 16 reserved bits followed by a target and a source address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitCommand {
    /// 24 bits, Target address
    pub target_address: u32,
    /// 24 bits, Source address
    pub source_address: u32,
}

impl UnitCommand {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        buffer.skip_field(16, "reserved")?;
        let target_address = buffer.read_field(24, "target_address")? as u32;
        let source_address = buffer.read_field(24, "source_address")? as u32;
        Ok(UnitCommand { target_address, source_address })
    }
}

impl fmt::Display for UnitCommand {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "UnitCommand {{ target_address: {} source_address: {} }}",
            self.target_address, self.source_address)
    }
}

/// Representation of STS_UPDT (opcode 0x18)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StsUpdt {
    /// 8 bits, Unit status
    pub unit_status: u8,
    /// 8 bits, User status
    pub user_status: u8,
    /// 24 bits, Target address
    pub target_address: u32,
    /// 24 bits, Source address
    pub source_address: u32,
}

impl StsUpdt {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let unit_status = buffer.read_field(8, "unit_status")? as u8;
        let user_status = buffer.read_field(8, "user_status")? as u8;
        let target_address = buffer.read_field(24, "target_address")? as u32;
        let source_address = buffer.read_field(24, "source_address")? as u32;
        Ok(StsUpdt { unit_status, user_status, target_address, source_address })
    }
}

impl fmt::Display for StsUpdt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "StsUpdt {{ unit_status: 0x{:02X} user_status: 0x{:02X} target_address: {} source_address: {} }}",
            self.unit_status, self.user_status, self.target_address, self.source_address)
    }
}

/// Representation of MSG_UPDT (opcode 0x1C)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MsgUpdt {
    /// 16 bits, Short message
    pub message: u16,
    /// 24 bits, Target address
    pub target_address: u32,
    /// 24 bits, Source address
    pub source_address: u32,
}

impl MsgUpdt {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let message = buffer.read_field(16, "message")? as u16;
        let target_address = buffer.read_field(24, "target_address")? as u32;
        let source_address = buffer.read_field(24, "source_address")? as u32;
        Ok(MsgUpdt { message, target_address, source_address })
    }
}

impl fmt::Display for MsgUpdt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MsgUpdt {{ message: 0x{:04X} target_address: {} source_address: {} }}",
            self.message, self.target_address, self.source_address)
    }
}

/// Representation of RAD_MON_CMD (opcode 0x1D)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RadMonCmd {
    /// 8 bits, Transmit time in seconds
    pub tx_time: u8,
    /// 1 bit, Silent mode
    pub silent_mode: bool,
    /// 2 bits, Transmit multiplier
    pub tx_multiplier: u8,
    /// 24 bits, Source address
    pub source_address: u32,
    /// 24 bits, Target address
    pub target_address: u32,
}

impl RadMonCmd {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let tx_time = buffer.read_field(8, "tx_time")? as u8;
        let silent_mode = buffer.read_flag("silent_mode")?;
        buffer.skip_field(5, "reserved")?;
        let tx_multiplier = buffer.read_field(2, "tx_multiplier")? as u8;
        let source_address = buffer.read_field(24, "source_address")? as u32;
        let target_address = buffer.read_field(24, "target_address")? as u32;
        Ok(RadMonCmd { tx_time, silent_mode, tx_multiplier, source_address, target_address })
    }
}

impl fmt::Display for RadMonCmd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RadMonCmd {{ tx_time: {} sm: {} tx_mult: {} source_address: {} target_address: {} }}",
            self.tx_time, self.silent_mode as u8, self.tx_multiplier, self.source_address, self.target_address)
    }
}

/// Representation of EXT_FNCT_CMD (opcode 0x24)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtFnctCmd {
    /// 16 bits, Extended function class and operand
    pub function: u16,
    /// 24 bits, Function arguments
    pub arguments: u32,
    /// 24 bits, Target address
    pub target_address: u32,
}

impl ExtFnctCmd {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let function = buffer.read_field(16, "function")? as u16;
        let arguments = buffer.read_field(24, "arguments")? as u32;
        let target_address = buffer.read_field(24, "target_address")? as u32;
        Ok(ExtFnctCmd { function, arguments, target_address })
    }
}

impl fmt::Display for ExtFnctCmd {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ExtFnctCmd {{ function: 0x{:04X} arguments: 0x{:06X} target_address: {} }}",
            self.function, self.arguments, self.target_address)
    }
}
