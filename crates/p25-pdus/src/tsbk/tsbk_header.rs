use core::fmt;

use p25_core::{BitBuffer, PduParseErr, crc16};

/// Length of a TSBK including its CRC
pub const TSBK_LEN_BYTES: usize = 12;
pub const TSBK_LEN_BITS: usize = TSBK_LEN_BYTES * 8;

/// First octet and manufacturer id of a TSBK. The 64-bit body follows, then a 16-bit CRC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TsbkHeader {
    /// 1 bit, Last block in this transmission
    pub last_block: bool,
    /// 1 bit, Protected (encrypted) block
    pub protected: bool,
    /// 6 bits, Opcode
    pub opcode: u8,
    /// 8 bits, Manufacturer id
    pub mfid: u8,
}

impl TsbkHeader {
    /// Parse from BitBuffer, leaving the buffer positioned at the body
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        if buffer.get_len_remaining() < TSBK_LEN_BITS {
            return Err(PduParseErr::InconsistentLength { expected: TSBK_LEN_BITS, found: buffer.get_len_remaining() });
        }
        let last_block = buffer.read_flag("last_block")?;
        let protected = buffer.read_flag("protected")?;
        let opcode = buffer.read_field(6, "opcode")? as u8;
        let mfid = buffer.read_field(8, "mfid")? as u8;
        Ok(TsbkHeader { last_block, protected, opcode, mfid })
    }
}

impl fmt::Display for TsbkHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TSBK {{ lb: {} p: {} opcode: 0x{:02X} mfid: 0x{:02X} }}",
            self.last_block as u8,
            self.protected as u8,
            self.opcode,
            self.mfid,
        )
    }
}

/// True when the trailing CRC of a complete TSBK checks out
pub fn tsbk_crc_ok(tsbk: &[u8]) -> bool {
    tsbk.len() >= TSBK_LEN_BYTES && crc16(tsbk, TSBK_LEN_BYTES) == 0
}

/// Builds a TSBK from header fields and a 64-bit body, appending a valid CRC.
/// Used by the diagnostic tooling and by tests.
pub fn assemble_tsbk(last_block: bool, opcode: u8, mfid: u8, body: u64) -> [u8; TSBK_LEN_BYTES] {
    let mut out = [0u8; TSBK_LEN_BYTES];
    out[0] = ((last_block as u8) << 7) | (opcode & 0x3F);
    out[1] = mfid;
    out[2..10].copy_from_slice(&body.to_be_bytes());
    // With a zeroed CRC field the register ends up holding exactly the check value
    let crc = crc16(&out, TSBK_LEN_BYTES);
    out[10..12].copy_from_slice(&crc.to_be_bytes());
    out
}

/// Packs (value, width) pairs MSB first into a TSBK body, padding the tail with zeroes.
/// Panics if the widths exceed 64 bits.
pub fn pack_body(fields: &[(u64, usize)]) -> u64 {
    let mut buf = BitBuffer::new(64);
    for &(value, bits) in fields {
        buf.write_bits(value, bits);
    }
    buf.seek(0);
    buf.peek_bits(64).unwrap_or(0)
}
