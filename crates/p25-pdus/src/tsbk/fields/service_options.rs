use core::fmt;

/// Service options octet of voice and data grants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServiceOptions {
    /// 1 bit, Emergency
    pub emergency: bool,
    /// 1 bit, Protected (encrypted) traffic
    pub protected: bool,
    /// 1 bit, Full duplex
    pub duplex: bool,
    /// 1 bit, Packet mode (0 = circuit)
    pub packet_mode: bool,
    /// 3 bits, Priority
    pub priority: u8,
}

impl ServiceOptions {
    pub fn from_raw(opts: u64) -> Self {
        ServiceOptions {
            emergency: (opts >> 7) & 1 == 1,
            protected: (opts >> 6) & 1 == 1,
            duplex: (opts >> 5) & 1 == 1,
            packet_mode: (opts >> 4) & 1 == 1,
            priority: (opts & 0x7) as u8,
        }
    }

    pub fn into_raw(self) -> u64 {
        (self.emergency as u64) << 7
            | (self.protected as u64) << 6
            | (self.duplex as u64) << 5
            | (self.packet_mode as u64) << 4
            | self.priority as u64 & 0x7
    }
}

impl fmt::Display for ServiceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:02X} (E{} P{} D{} M{} PRI{})",
            self.into_raw(),
            self.emergency as u8,
            self.protected as u8,
            self.duplex as u8,
            self.packet_mode as u8,
            self.priority,
        )
    }
}

/// Data service options octet of SNDCP messages. Same flag layout as the voice
/// service options, with the low nibble carrying the NSAPI instead of a priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataServiceOptions {
    pub emergency: bool,
    pub protected: bool,
    pub duplex: bool,
    pub packet_mode: bool,
    /// 4 bits, Network service access point identifier
    pub nsapi: u8,
}

impl DataServiceOptions {
    pub fn from_raw(opts: u64) -> Self {
        DataServiceOptions {
            emergency: (opts >> 7) & 1 == 1,
            protected: (opts >> 6) & 1 == 1,
            duplex: (opts >> 5) & 1 == 1,
            packet_mode: (opts >> 4) & 1 == 1,
            nsapi: (opts & 0xF) as u8,
        }
    }
}

impl fmt::Display for DataServiceOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NSAPI {} (E{} P{} D{} M{})",
            self.nsapi,
            self.emergency as u8,
            self.protected as u8,
            self.duplex as u8,
            self.packet_mode as u8,
        )
    }
}
