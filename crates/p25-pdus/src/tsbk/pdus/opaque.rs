use core::fmt;

use p25_core::{BitBuffer, PduParseErr};

/// Body kept as raw bits. Used for RAD_MON_ENH_CMD (0x1E), AUTH_DMD (0x31),
/// ROAM_ADDR_CMD (0x36) and ROAM_ADDR_UPDT (0x37), which span multiple blocks
/// or carry nothing the receiver acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpaqueBody {
    /// 64 bits
    pub body: u64,
}

impl OpaqueBody {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let body = buffer.read_field(64, "body")?;
        Ok(OpaqueBody { body })
    }
}

impl fmt::Display for OpaqueBody {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "OpaqueBody {{ 0x{:016X} }}", self.body)
    }
}
