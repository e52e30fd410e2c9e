/// Number of dibits in one TDMA superframe scrambling sequence
pub const SCRAMBLE_SEQ_DIBITS: usize = 4320;

const LFSR_MASK: u64 = (1 << 44) - 1;

/// TDMA traffic channel scrambling sequence generator.
/// 44-bit Fibonacci LFSR, p(x) = x^44 + x^38 + x^27 + x^15 + 1, seeded with
/// WACN (20 bits), system id (12 bits) and NAC (12 bits).
pub struct Scrambler {
    reg: u64,
}

impl Scrambler {
    pub fn new(nac: u16, sysid: u16, wacn: u32) -> Self {
        let reg = ((wacn as u64 & 0xF_FFFF) << 24) | ((sysid as u64 & 0xFFF) << 12) | (nac as u64 & 0xFFF);
        Scrambler { reg }
    }

    /// Output the register MSB and clock once
    fn next_bit(&mut self) -> u8 {
        let out = ((self.reg >> 43) & 1) as u8;
        let feedback = (self.reg >> 43) ^ (self.reg >> 37) ^ (self.reg >> 26) ^ (self.reg >> 14);
        self.reg = ((self.reg << 1) | (feedback & 1)) & LFSR_MASK;
        out
    }

    /// One dibit (0..=3), first generated bit in the high position
    pub fn next_dibit(&mut self) -> u8 {
        let hi = self.next_bit();
        let lo = self.next_bit();
        (hi << 1) | lo
    }

    /// Full superframe sequence, one dibit per byte
    pub fn sequence(mut self) -> Vec<u8> {
        (0..SCRAMBLE_SEQ_DIBITS).map(|_| self.next_dibit()).collect()
    }
}

/// Descrambling key for one network identity
pub fn descrambling_key(nac: u16, sysid: u16, wacn: u32) -> Vec<u8> {
    Scrambler::new(nac, sysid, wacn).sequence()
}
