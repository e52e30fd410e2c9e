use std::fmt;

use crate::pdu_parse_error::PduParseErr;

/// MSB-first bit reader over a received protocol word.
/// Bit 0 of the window is the most significant bit of the first byte, which matches
/// the on-air transmission order of TSBK and MBT blocks.
pub struct BitBuffer {
    buffer: Vec<u8>,
    start: usize,       // bits before this are out of window
    pos: usize,         // next bit offset for read/write (absolute)
    end: usize,         // bits at or after this are out of window
}

impl BitBuffer {
    /// Create a zeroed buffer capable of holding exactly `len_bits` bits.
    pub fn new(len_bits: usize) -> Self {
        BitBuffer {
            buffer: vec![0; len_bits.div_ceil(8)],
            start: 0,
            pos: 0,
            end: len_bits,
        }
    }

    pub fn from_bytes(data: &[u8]) -> Self {
        BitBuffer {
            buffer: data.to_vec(),
            start: 0,
            pos: 0,
            end: data.len() * 8,
        }
    }

    /// Parse a hex string such as `3A000012AE01013348704A54` (optionally prefixed by `0x`,
    /// whitespace ignored). Returns None on an odd digit count or a non-hex character.
    pub fn from_hex(hex: &str) -> Option<Self> {
        hex_to_bytes(hex).map(|bytes| Self::from_bytes(&bytes))
    }

    /// Construct a BitBuffer directly from a string of '0'/'1' characters.
    /// Panics if any other character is encountered.
    pub fn from_bitstr(bitstr: &str) -> Self {
        let mut buf = BitBuffer::new(bitstr.len());
        for c in bitstr.chars() {
            match c {
                '0' => buf.write_bits(0, 1),
                '1' => buf.write_bits(1, 1),
                other => panic!("from_bitstr: invalid character `{}`; only '0' or '1' allowed", other),
            }
        }
        buf.pos = buf.start;
        buf
    }

    /// Peek `num_bits` at the current pos, without advancing.
    /// Returns None on overflow or if `num_bits>64`.
    pub fn peek_bits(&self, num_bits: usize) -> Option<u64> {
        self.peek_bits_startoffset(self.pos - self.start, num_bits)
    }

    /// Peek `num_bits` with offset from window start, without advancing.
    /// Returns None on overflow or if `num_bits>64`.
    pub fn peek_bits_startoffset(&self, offset: usize, num_bits: usize) -> Option<u64> {
        if num_bits > 64 || self.start + offset + num_bits > self.end {
            return None;
        }
        Some(self.read_bits_at_unchecked(self.start + offset, num_bits))
    }

    /// Read `num_bits` at the current pos, advancing on success.
    pub fn read_bits(&mut self, num_bits: usize) -> Option<u64> {
        let v = self.peek_bits(num_bits)?;
        self.pos += num_bits;
        Some(v)
    }

    /// Similar to read_bits, but returns a PduParseErr::BufferEnded naming the field if not enough bits are available.
    pub fn read_field(&mut self, num_bits: usize, field: &'static str) -> Result<u64, PduParseErr> {
        self.read_bits(num_bits).ok_or(PduParseErr::BufferEnded { field: Some(field) })
    }

    /// Single-bit flag as bool
    pub fn read_flag(&mut self, field: &'static str) -> Result<bool, PduParseErr> {
        Ok(self.read_field(1, field)? == 1)
    }

    /// Skip reserved or unused bits, failing if the buffer is too short
    pub fn skip_field(&mut self, num_bits: usize, field: &'static str) -> Result<(), PduParseErr> {
        if self.pos + num_bits > self.end {
            return Err(PduParseErr::BufferEnded { field: Some(field) });
        }
        self.pos += num_bits;
        Ok(())
    }

    /// Write up to 64 bits at pos, advancing pos. Panics when exceeding the window end.
    pub fn write_bits(&mut self, value: u64, num_bits: usize) {
        assert!(num_bits <= 64, "can only write up to 64 bits");
        assert!(num_bits == 64 || value >> num_bits == 0, "value exceeds num_bits {} {}", value, num_bits);
        assert!(self.pos + num_bits <= self.end, "write would exceed buffer end");

        for i in 0..num_bits {
            let bit = ((value >> (num_bits - 1 - i)) & 1) as u8;
            let idx = self.pos / 8;
            let shift = 7 - (self.pos % 8);
            self.buffer[idx] = (self.buffer[idx] & !(1 << shift)) | (bit << shift);
            self.pos += 1;
        }
    }

    /// Active window length (bits), from start to end
    pub fn get_len(&self) -> usize {
        self.end - self.start
    }

    /// Number of bits left in the window (bits), from pos to end.
    pub fn get_len_remaining(&self) -> usize {
        self.end - self.pos
    }

    /// Get the current position, relative to window
    pub fn get_pos(&self) -> usize {
        self.pos - self.start
    }

    /// Seek `pos` to `offset` (relative to window start).
    pub fn seek(&mut self, offset: usize) {
        let abs = self.start + offset;
        assert!(abs <= self.end, "seek out of window: got {}, allowed [{},{}]", abs, self.start, self.end);
        self.pos = abs;
    }

    /// Split off the window [pos, pos + num_bits) into a new buffer and advance past it.
    /// Used to hand the header and data block of a multi-block message to separate parsers.
    pub fn take_window(&mut self, num_bits: usize, field: &'static str) -> Result<BitBuffer, PduParseErr> {
        if self.pos + num_bits > self.end {
            return Err(PduParseErr::BufferEnded { field: Some(field) });
        }
        let mut out = BitBuffer::new(num_bits);
        let mut remaining = num_bits;
        while remaining > 0 {
            let chunk = remaining.min(64);
            let v = self.read_bits_at_unchecked(self.pos, chunk);
            out.write_bits(v, chunk);
            self.pos += chunk;
            remaining -= chunk;
        }
        out.pos = out.start;
        Ok(out)
    }

    /// Dumps the [start..end) window in hex, uppercase, last nibble padded with zeroes
    pub fn dump_hex(&self) -> String {
        let len = self.end - self.start;
        let mut s = String::with_capacity(len.div_ceil(4));
        for i in 0..len.div_ceil(4) {
            let take = usize::min(4, len - i * 4);
            let v = self.read_bits_at_unchecked(self.start + i * 4, take) as u8;
            s.push_str(&format!("{:X}", v << (4 - take)));
        }
        s
    }

    /// Dump bits in window [start, end) as a binary string of '0'/'1'.
    /// Adds a ^ marker before the current pos.
    pub fn dump_bin(&self) -> String {
        let mut s = String::with_capacity(self.get_len() + 1);
        for i in self.start..self.end {
            if i == self.pos { s.push('^'); }
            s.push(if self.read_bits_at_unchecked(i, 1) != 0 { '1' } else { '0' });
        }
        if self.pos == self.end { s.push('^'); }
        s
    }

    /// Reads `num_bits` bits starting at absolute `bit_pos`, no bounds checks.
    /// Caller must ensure `num_bits <= 64` and `bit_pos + num_bits <= end`.
    fn read_bits_at_unchecked(&self, mut bit_pos: usize, num_bits: usize) -> u64 {
        let mut result = 0u64;
        let mut bits_remaining = num_bits;

        // head bits up to the next byte boundary
        let head = bit_pos % 8;
        if head != 0 && bits_remaining > 0 {
            let take = usize::min(8 - head, bits_remaining);
            let byte = self.buffer[bit_pos / 8];
            let mask = ((1u16 << take) - 1) as u8;
            result = ((byte >> (8 - head - take)) & mask) as u64;
            bit_pos += take;
            bits_remaining -= take;
        }

        while bits_remaining >= 8 {
            result = (result << 8) | self.buffer[bit_pos / 8] as u64;
            bit_pos += 8;
            bits_remaining -= 8;
        }

        if bits_remaining > 0 {
            let byte = self.buffer[bit_pos / 8];
            result = (result << bits_remaining) | (byte >> (8 - bits_remaining)) as u64;
        }

        result
    }
}

/// Hex digits to bytes, two digits per byte. An optional `0x` prefix and whitespace are
/// ignored. None on an odd digit count or any non-hex character.
pub fn hex_to_bytes(hex: &str) -> Option<Vec<u8>> {
    let hex = hex.trim();
    let hex = hex.strip_prefix("0x").or_else(|| hex.strip_prefix("0X")).unwrap_or(hex);
    let digits: Vec<u8> = hex.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    if digits.len() % 2 != 0 {
        return None;
    }
    digits
        .chunks(2)
        .map(|pair| {
            let hi = (pair[0] as char).to_digit(16)?;
            let lo = (pair[1] as char).to_digit(16)?;
            Some((hi << 4 | lo) as u8)
        })
        .collect()
}

impl fmt::Debug for BitBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BitBuffer {{ <{} ^{} >{} {} }}", self.start, self.pos, self.end, self.dump_hex())
    }
}
