/// Generator x^12 + x^5 + 1, applied to a 17-bit shift register
const CRC16_POLY: u32 = (1 << 12) | (1 << 5) | 1;

/// CRC-CCITT as used on P25 trunking blocks, over the first `len` bytes of `data`.
/// Bytes are fed MSB first into a zero-initialised register and the result is inverted.
/// A block that carries its own valid CRC in the trailing two bytes yields 0.
pub fn crc16(data: &[u8], len: usize) -> u16 {
    let mut crc: u32 = 0;
    for &byte in &data[..len.min(data.len())] {
        for bit in (0..8).rev() {
            crc = ((crc << 1) | ((byte >> bit) & 1) as u32) & 0x1FFFF;
            if crc & 0x10000 != 0 {
                crc = (crc & 0xFFFF) ^ CRC16_POLY;
            }
        }
    }
    (crc ^ 0xFFFF) as u16
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_tsbk_checks_to_zero() {
        let tsbk = [0x3A, 0x00, 0x00, 0x12, 0xAE, 0x01, 0x01, 0x33, 0x48, 0x70, 0x4A, 0x54];
        assert_eq!(crc16(&tsbk, 12), 0);
    }

    #[test]
    fn test_single_bit_error_detected() {
        let tsbk = [0x3A, 0x00, 0x10, 0x12, 0xAE, 0x01, 0x01, 0x33, 0x48, 0x70, 0x4A, 0x54];
        assert_ne!(crc16(&tsbk, 12), 0);
    }

    #[test]
    fn test_len_limits_input() {
        let tsbk = [0x3A, 0x00, 0x00, 0x12, 0xAE, 0x01, 0x01, 0x33, 0x48, 0x70, 0x4A, 0x54, 0xFF];
        assert_eq!(crc16(&tsbk, 12), 0);
        assert_eq!(crc16(&[], 0), 0xFFFF);
    }
}
