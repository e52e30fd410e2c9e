/// Manufacturer id, 8 bits. Selects the opcode namespace of a TSBK or MBT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Mfid {
    /// Standard (open) message set
    Standard = 0x00,
    Motorola = 0x90,
    Harris = 0xA4,
}

impl std::convert::TryFrom<u64> for Mfid {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0x00 => Ok(Mfid::Standard),
            0x90 => Ok(Mfid::Motorola),
            0xA4 => Ok(Mfid::Harris),
            _ => Err(()),
        }
    }
}

impl Mfid {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        self as u64
    }
}
