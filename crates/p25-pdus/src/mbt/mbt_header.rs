use core::fmt;

use p25_core::{BitBuffer, PduParseErr, crc16};

/// Length of the MBT header block including its CRC
pub const MBT_HEADER_LEN_BYTES: usize = 12;
pub const MBT_HEADER_LEN_BITS: usize = MBT_HEADER_LEN_BYTES * 8;
/// Length of one MBT data block
pub const MBT_BLOCK_LEN_BYTES: usize = 12;

/// Header block of an alternate-format multi-block trunking message.
/// The data blocks follow directly after the 16-bit header CRC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MbtHeader {
    /// 8 bits, Confirmation, direction and packet format
    pub format: u8,
    /// 8 bits, Service access point
    pub sap: u8,
    /// 8 bits, Manufacturer id
    pub mfid: u8,
    /// 8 bits, Location registration area
    pub lra: u8,
    /// 12 bits, System id
    pub sysid: u16,
    /// 8 bits, Blocks to follow
    pub blocks: u8,
    /// 6 bits, Opcode
    pub opcode: u8,
    /// 8 bits, Opcode specific
    pub field_a: u8,
    /// 8 bits, Opcode specific
    pub field_b: u8,
}

impl MbtHeader {
    /// Parse from BitBuffer, leaving the buffer positioned at the first data block
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        if buffer.get_len_remaining() < MBT_HEADER_LEN_BITS {
            return Err(PduParseErr::InconsistentLength { expected: MBT_HEADER_LEN_BITS, found: buffer.get_len_remaining() });
        }
        let format = buffer.read_field(8, "format")? as u8;
        let sap = buffer.read_field(8, "sap")? as u8;
        let mfid = buffer.read_field(8, "mfid")? as u8;
        let lra = buffer.read_field(8, "lra")? as u8;
        buffer.skip_field(4, "reserved")?;
        let sysid = buffer.read_field(12, "sysid")? as u16;
        let blocks = buffer.read_field(8, "blocks")? as u8;
        buffer.skip_field(2, "reserved")?;
        let opcode = buffer.read_field(6, "opcode")? as u8;
        let field_a = buffer.read_field(8, "field_a")? as u8;
        let field_b = buffer.read_field(8, "field_b")? as u8;
        buffer.skip_field(16, "header_crc")?;
        Ok(MbtHeader { format, sap, mfid, lra, sysid, blocks, opcode, field_a, field_b })
    }
}

impl fmt::Display for MbtHeader {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "MBT {{ opcode: 0x{:02X} mfid: 0x{:02X} sysid: 0x{:03X} blocks: {} a: 0x{:02X} b: 0x{:02X} }}",
            self.opcode,
            self.mfid,
            self.sysid,
            self.blocks,
            self.field_a,
            self.field_b,
        )
    }
}

/// True when the header block CRC checks out
pub fn mbt_header_crc_ok(mbt: &[u8]) -> bool {
    mbt.len() >= MBT_HEADER_LEN_BYTES && crc16(mbt, MBT_HEADER_LEN_BYTES) == 0
}

/// Builds a single-data-block MBT: a header with a valid CRC followed by the 96-bit data block.
/// Used by the diagnostic tooling and by tests.
pub fn assemble_mbt(opcode: u8, sysid: u16, field_a: u8, field_b: u8, data: u128) -> Vec<u8> {
    let mut header = BitBuffer::new(MBT_HEADER_LEN_BITS);
    header.write_bits(0x17, 8);
    header.write_bits(0x3D, 8);
    header.write_bits(0x00, 8);
    header.write_bits(0x00, 8);
    header.write_bits(0, 4);
    header.write_bits(sysid as u64 & 0xFFF, 12);
    header.write_bits(1, 8);
    header.write_bits(0, 2);
    header.write_bits(opcode as u64 & 0x3F, 6);
    header.write_bits(field_a as u64, 8);
    header.write_bits(field_b as u64, 8);
    header.write_bits(0, 16);

    let mut out = Vec::with_capacity(MBT_HEADER_LEN_BYTES + MBT_BLOCK_LEN_BYTES);
    header.seek(0);
    for _ in 0..MBT_HEADER_LEN_BYTES {
        out.push(header.read_bits(8).unwrap_or(0) as u8);
    }
    let crc = crc16(&out, MBT_HEADER_LEN_BYTES);
    out[10..12].copy_from_slice(&crc.to_be_bytes());
    out.extend_from_slice(&data.to_be_bytes()[4..]);
    out
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_fields() {
        let mbt = assemble_mbt(0x3B, 0x3BA, 0x12, 0x34, 0);
        assert_eq!(mbt.len(), 24);
        assert!(mbt_header_crc_ok(&mbt));
        let mut buf = BitBuffer::from_bytes(&mbt);
        let hdr = MbtHeader::from_bitbuf(&mut buf).unwrap();
        assert_eq!(hdr.opcode, 0x3B);
        assert_eq!(hdr.sysid, 0x3BA);
        assert_eq!(hdr.field_a, 0x12);
        assert_eq!(hdr.field_b, 0x34);
        assert_eq!(hdr.blocks, 1);
        assert_eq!(buf.get_pos(), MBT_HEADER_LEN_BITS);
    }

    #[test]
    fn test_opcode_position() {
        // Opcode sits in bits 37..32 of the header counted from the LSB
        let mbt = assemble_mbt(0x3A, 0, 0, 0, 0);
        let header = u128::from_be_bytes({
            let mut b = [0u8; 16];
            b[4..].copy_from_slice(&mbt[..12]);
            b
        });
        assert_eq!((header >> 32) & 0x3F, 0x3A);
    }

    #[test]
    fn test_short_header_rejected() {
        let mut buf = BitBuffer::from_bytes(&[0u8; 8]);
        assert!(matches!(MbtHeader::from_bitbuf(&mut buf), Err(PduParseErr::InconsistentLength { .. })));
    }

    #[test]
    fn test_corrupted_header_crc() {
        let mut mbt = assemble_mbt(0x00, 0x2AE, 0, 0, 0);
        mbt[5] ^= 0x01;
        assert!(!mbt_header_crc_ok(&mbt));
    }
}
