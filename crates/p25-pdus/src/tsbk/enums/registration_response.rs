/// Registration response value, carried by location and unit registration responses
/// Bits: 2
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum RegistrationResponse {
    Accept = 0,
    Fail = 1,
    Deny = 2,
    Refused = 3,
}

impl std::convert::TryFrom<u64> for RegistrationResponse {
    type Error = ();
    fn try_from(x: u64) -> Result<Self, Self::Error> {
        match x {
            0 => Ok(RegistrationResponse::Accept),
            1 => Ok(RegistrationResponse::Fail),
            2 => Ok(RegistrationResponse::Deny),
            3 => Ok(RegistrationResponse::Refused),
            _ => Err(()),
        }
    }
}

impl RegistrationResponse {
    /// Convert this enum back into the raw integer value
    pub fn into_raw(self) -> u64 {
        self as u64
    }

    /// Two-bit fields always map to a variant
    pub fn from_bits(x: u64) -> Self {
        match x & 0x3 {
            0 => RegistrationResponse::Accept,
            1 => RegistrationResponse::Fail,
            2 => RegistrationResponse::Deny,
            _ => RegistrationResponse::Refused,
        }
    }
}
