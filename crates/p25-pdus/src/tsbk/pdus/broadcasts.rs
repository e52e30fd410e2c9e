use core::fmt;

use chrono::{NaiveDate, NaiveDateTime};
use p25_core::{BitBuffer, PduParseErr};

/// Representation of SYNC_BCST (opcode 0x30).
/// Network time with microslot resolution, also carries the TDMA sync state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncBcst {
    /// 1 bit, TDMA traffic channels not synchronized with the FDMA control channel
    pub unsynced: bool,
    /// 1 bit, System time not locked to an external reference
    pub invalid_time: bool,
    /// 1 bit, Microslot-minute boundary not locked
    pub mm_unlocked: bool,
    /// 2 bits, Leap-second minute correction
    pub minute_correction: u8,
    /// 1 bit, Local time offset valid
    pub lto_valid: bool,
    /// 1 bit, Local time offset sign, set means subtract
    pub lto_negative: bool,
    /// 5 bits, Local time offset in half hours
    pub lto_half_hours: u8,
    /// 7 bits, Year since 2000
    pub year: u8,
    /// 4 bits
    pub month: u8,
    /// 5 bits
    pub day: u8,
    /// 5 bits
    pub hours: u8,
    /// 6 bits
    pub minutes: u8,
    /// 13 bits, 7.5 ms slots into the current minute
    pub microslots: u16,
}

impl SyncBcst {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        buffer.skip_field(12, "reserved")?;
        let unsynced = buffer.read_flag("unsynced")?;
        let invalid_time = buffer.read_flag("invalid_time")?;
        let mm_unlocked = buffer.read_flag("mm_unlocked")?;
        let minute_correction = buffer.read_field(2, "minute_correction")? as u8;
        let lto_valid = buffer.read_flag("lto_valid")?;
        let lto_negative = buffer.read_flag("lto_negative")?;
        let lto_half_hours = buffer.read_field(5, "lto")? as u8;
        let year = buffer.read_field(7, "year")? as u8;
        let month = buffer.read_field(4, "month")? as u8;
        let day = buffer.read_field(5, "day")? as u8;
        let hours = buffer.read_field(5, "hours")? as u8;
        let minutes = buffer.read_field(6, "minutes")? as u8;
        let microslots = buffer.read_field(13, "microslots")? as u16;
        Ok(SyncBcst {
            unsynced,
            invalid_time,
            mm_unlocked,
            minute_correction,
            lto_valid,
            lto_negative,
            lto_half_hours,
            year,
            month,
            day,
            hours,
            minutes,
            microslots,
        })
    }

    /// Whole seconds into the minute
    pub fn seconds(&self) -> u32 {
        self.microslots as u32 * 75 / 10_000
    }

    /// Local time offset in minutes, signed
    pub fn lto_minutes(&self) -> i32 {
        let m = self.lto_half_hours as i32 * 30;
        if self.lto_negative { -m } else { m }
    }

    /// Broadcast UTC time, None if the fields do not form a valid date
    pub fn datetime(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(2000 + self.year as i32, self.month as u32, self.day as u32)?
            .and_hms_opt(self.hours as u32, self.minutes as u32, self.seconds())
    }
}

impl fmt::Display for SyncBcst {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SyncBcst {{ us: {} ist: {} mmu: {} mc: {} vl: {} ",
            self.unsynced as u8,
            self.invalid_time as u8,
            self.mm_unlocked as u8,
            self.minute_correction,
            self.lto_valid as u8,
        )?;
        match self.datetime() {
            Some(dt) => write!(f, "time: {} (UTC)", dt.format("%m/%d/%Y %H:%M:%S"))?,
            None => write!(f, "time: invalid")?,
        }
        write!(f, " lto: {:+}m }}", self.lto_minutes())
    }
}

/// Representation of TIME_DATE_ANN (opcode 0x35)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeDateAnn {
    /// 1 bit, Date fields valid
    pub date_valid: bool,
    /// 1 bit, Time fields valid
    pub time_valid: bool,
    /// 1 bit, Local time offset valid
    pub offset_valid: bool,
    /// 1 bit, Offset sign, set means subtract
    pub offset_negative: bool,
    /// 11 bits, Local time offset in minutes
    pub offset_minutes: u16,
    /// 4 bits
    pub month: u8,
    /// 5 bits
    pub day: u8,
    /// 13 bits
    pub year: u16,
    /// 5 bits
    pub hours: u8,
    /// 6 bits
    pub minutes: u8,
    /// 6 bits
    pub seconds: u8,
}

impl TimeDateAnn {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let date_valid = buffer.read_flag("date_valid")?;
        let time_valid = buffer.read_flag("time_valid")?;
        let offset_valid = buffer.read_flag("offset_valid")?;
        buffer.skip_field(1, "reserved")?;
        let offset_negative = buffer.read_flag("offset_negative")?;
        let offset_minutes = buffer.read_field(11, "offset_minutes")? as u16;
        let month = buffer.read_field(4, "month")? as u8;
        let day = buffer.read_field(5, "day")? as u8;
        let year = buffer.read_field(13, "year")? as u16;
        buffer.skip_field(2, "reserved")?;
        let hours = buffer.read_field(5, "hours")? as u8;
        let minutes = buffer.read_field(6, "minutes")? as u8;
        let seconds = buffer.read_field(6, "seconds")? as u8;
        buffer.skip_field(7, "reserved")?;
        Ok(TimeDateAnn {
            date_valid,
            time_valid,
            offset_valid,
            offset_negative,
            offset_minutes,
            month,
            day,
            year,
            hours,
            minutes,
            seconds,
        })
    }

    pub fn datetime(&self) -> Option<NaiveDateTime> {
        NaiveDate::from_ymd_opt(self.year as i32, self.month as u32, self.day as u32)?
            .and_hms_opt(self.hours as u32, self.minutes as u32, self.seconds as u32)
    }
}

impl fmt::Display for TimeDateAnn {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "TimeDateAnn {{ vd: {} vt: {} vl: {} ",
            self.date_valid as u8, self.time_valid as u8, self.offset_valid as u8)?;
        match self.datetime() {
            Some(dt) => write!(f, "time: {} }}", dt.format("%m/%d/%Y %H:%M:%S")),
            None => write!(f, "time: invalid }}"),
        }
    }
}

/// Representation of SYS_SRV_BCST (opcode 0x38)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SysSrvBcst {
    /// 8 bits, Two-way unit id request flags
    pub twuid_validity: u8,
    /// 24 bits, Services available
    pub services_available: u32,
    /// 24 bits, Services supported
    pub services_supported: u32,
    /// 8 bits, Request priority level
    pub request_priority: u8,
}

impl SysSrvBcst {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let twuid_validity = buffer.read_field(8, "twuid_validity")? as u8;
        let services_available = buffer.read_field(24, "services_available")? as u32;
        let services_supported = buffer.read_field(24, "services_supported")? as u32;
        let request_priority = buffer.read_field(8, "request_priority")? as u8;
        Ok(SysSrvBcst { twuid_validity, services_available, services_supported, request_priority })
    }
}

impl fmt::Display for SysSrvBcst {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SysSrvBcst {{ twuid: 0x{:02X} avail: 0x{:06X} supp: 0x{:06X} pri: 0x{:02X} }}",
            self.twuid_validity, self.services_available, self.services_supported, self.request_priority)
    }
}

/// Representation of SCCB (opcode 0x39).
/// Announces up to two secondary control channels of this site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sccb {
    /// 8 bits, RFSS id
    pub rfss_id: u8,
    /// 8 bits, Site id
    pub site_id: u8,
    /// 16 bits, Channel A
    pub channel_a: u16,
    /// 8 bits, System service class of channel A
    pub ssc_a: u8,
    /// 16 bits, Channel B
    pub channel_b: u16,
    /// 8 bits, System service class of channel B
    pub ssc_b: u8,
}

impl Sccb {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let rfss_id = buffer.read_field(8, "rfss_id")? as u8;
        let site_id = buffer.read_field(8, "site_id")? as u8;
        let channel_a = buffer.read_field(16, "channel_a")? as u16;
        let ssc_a = buffer.read_field(8, "ssc_a")? as u8;
        let channel_b = buffer.read_field(16, "channel_b")? as u16;
        let ssc_b = buffer.read_field(8, "ssc_b")? as u8;
        Ok(Sccb { rfss_id, site_id, channel_a, ssc_a, channel_b, ssc_b })
    }
}

impl fmt::Display for Sccb {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Sccb {{ rfss: {} site: {} channel_a: 0x{:04X} ssc_a: 0x{:02X} channel_b: 0x{:04X} ssc_b: 0x{:02X} }}",
            self.rfss_id, self.site_id, self.channel_a, self.ssc_a, self.channel_b, self.ssc_b)
    }
}

/// Representation of SCCB_EXP (opcode 0x29). Explicit transmit and receive channels of one
/// secondary control channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SccbExp {
    pub rfss_id: u8,
    pub site_id: u8,
    /// 16 bits, Downlink channel
    pub channel_t: u16,
    /// 16 bits, Uplink channel
    pub channel_r: u16,
    /// 8 bits, System service class
    pub ssc: u8,
}

impl SccbExp {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let rfss_id = buffer.read_field(8, "rfss_id")? as u8;
        let site_id = buffer.read_field(8, "site_id")? as u8;
        let channel_t = buffer.read_field(16, "channel_t")? as u16;
        buffer.skip_field(8, "reserved")?;
        let channel_r = buffer.read_field(16, "channel_r")? as u16;
        let ssc = buffer.read_field(8, "ssc")? as u8;
        Ok(SccbExp { rfss_id, site_id, channel_t, channel_r, ssc })
    }
}

impl fmt::Display for SccbExp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "SccbExp {{ rfss: {} site: {} channel_t: 0x{:04X} channel_r: 0x{:04X} ssc: 0x{:02X} }}",
            self.rfss_id, self.site_id, self.channel_t, self.channel_r, self.ssc)
    }
}

/// Representation of RFSS_STS_BCST (opcode 0x3A). Identity and control channel of the current site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RfssStsBcst {
    /// 8 bits, Location registration area
    pub lra: u8,
    /// 1 bit, Roaming restricted
    pub roaming: bool,
    /// 1 bit, Active network connection to the RFSS controller
    pub active: bool,
    /// 12 bits, System id
    pub sysid: u16,
    /// 8 bits, RFSS id
    pub rfss_id: u8,
    /// 8 bits, Site id
    pub site_id: u8,
    /// 16 bits, Control channel
    pub channel: u16,
    /// 8 bits, System service class
    pub ssc: u8,
}

impl RfssStsBcst {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let lra = buffer.read_field(8, "lra")? as u8;
        buffer.skip_field(2, "reserved")?;
        let roaming = buffer.read_flag("roaming")?;
        let active = buffer.read_flag("active")?;
        let sysid = buffer.read_field(12, "sysid")? as u16;
        let rfss_id = buffer.read_field(8, "rfss_id")? as u8;
        let site_id = buffer.read_field(8, "site_id")? as u8;
        let channel = buffer.read_field(16, "channel")? as u16;
        let ssc = buffer.read_field(8, "ssc")? as u8;
        Ok(RfssStsBcst { lra, roaming, active, sysid, rfss_id, site_id, channel, ssc })
    }
}

impl fmt::Display for RfssStsBcst {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "RfssStsBcst {{ lra: 0x{:02X} sysid: 0x{:03X} rfss: {} site: {} channel: 0x{:04X} ssc: 0x{:02X} }}",
            self.lra, self.sysid, self.rfss_id, self.site_id, self.channel, self.ssc)
    }
}

/// Representation of NET_STS_BCST (opcode 0x3B). Network identity of the current site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetStsBcst {
    /// 8 bits, Location registration area
    pub lra: u8,
    /// 20 bits, Wide area communications network id
    pub wacn: u32,
    /// 12 bits, System id
    pub sysid: u16,
    /// 16 bits, Control channel
    pub channel: u16,
    /// 8 bits, System service class
    pub ssc: u8,
}

impl NetStsBcst {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let lra = buffer.read_field(8, "lra")? as u8;
        let wacn = buffer.read_field(20, "wacn")? as u32;
        let sysid = buffer.read_field(12, "sysid")? as u16;
        let channel = buffer.read_field(16, "channel")? as u16;
        let ssc = buffer.read_field(8, "ssc")? as u8;
        Ok(NetStsBcst { lra, wacn, sysid, channel, ssc })
    }
}

impl fmt::Display for NetStsBcst {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NetStsBcst {{ lra: 0x{:02X} wacn: 0x{:05X} sysid: 0x{:03X} channel: 0x{:04X} ssc: 0x{:02X} }}",
            self.lra, self.wacn, self.sysid, self.channel, self.ssc)
    }
}

/// Representation of ADJ_STS_BCST (opcode 0x3C). Describes a neighbouring site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjStsBcst {
    /// 8 bits, Location registration area
    pub lra: u8,
    /// 1 bit, Conventional channel
    pub conventional: bool,
    /// 1 bit, Site failure condition
    pub failure: bool,
    /// 1 bit, Information is current (not last known)
    pub valid: bool,
    /// 1 bit, Active network connection to the RFSS controller
    pub active: bool,
    /// 12 bits, System id
    pub sysid: u16,
    /// 8 bits, RFSS id
    pub rfss_id: u8,
    /// 8 bits, Site id
    pub site_id: u8,
    /// 16 bits, Control channel of the neighbour
    pub channel: u16,
    /// 8 bits, System service class
    pub ssc: u8,
}

impl AdjStsBcst {
    pub fn from_bitbuf(buffer: &mut BitBuffer) -> Result<Self, PduParseErr> {
        let lra = buffer.read_field(8, "lra")? as u8;
        let conventional = buffer.read_flag("conventional")?;
        let failure = buffer.read_flag("failure")?;
        let valid = buffer.read_flag("valid")?;
        let active = buffer.read_flag("active")?;
        let sysid = buffer.read_field(12, "sysid")? as u16;
        let rfss_id = buffer.read_field(8, "rfss_id")? as u8;
        let site_id = buffer.read_field(8, "site_id")? as u8;
        let channel = buffer.read_field(16, "channel")? as u16;
        let ssc = buffer.read_field(8, "ssc")? as u8;
        Ok(AdjStsBcst { lra, conventional, failure, valid, active, sysid, rfss_id, site_id, channel, ssc })
    }
}

impl fmt::Display for AdjStsBcst {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "AdjStsBcst {{ lra: 0x{:02X} cfva: {}{}{}{} sysid: 0x{:03X} rfss: {} site: {} channel: 0x{:04X} ssc: 0x{:02X} }}",
            self.lra,
            self.conventional as u8,
            self.failure as u8,
            self.valid as u8,
            self.active as u8,
            self.sysid,
            self.rfss_id,
            self.site_id,
            self.channel,
            self.ssc,
        )
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    /// Body of a TSBK word, skipping opcode and mfid octets
    fn body(hex: &str) -> BitBuffer {
        let mut buf = BitBuffer::from_hex(hex).unwrap();
        buf.seek(16);
        buf
    }

    #[test]
    fn test_rfss_sts_bcst() {
        let pdu = RfssStsBcst::from_bitbuf(&mut body("3A000012AE01013348704A54")).unwrap();
        assert_eq!(pdu.sysid, 0x2AE);
        assert_eq!(pdu.rfss_id, 1);
        assert_eq!(pdu.site_id, 1);
        assert_eq!(pdu.channel, 0x3348);
        assert_eq!(pdu.ssc, 0x70);
    }

    #[test]
    fn test_net_sts_bcst() {
        let pdu = NetStsBcst::from_bitbuf(&mut body("BB0000BEE003BA016B70EFCF")).unwrap();
        assert_eq!(pdu.lra, 0);
        assert_eq!(pdu.wacn, 0xBEE00);
        assert_eq!(pdu.sysid, 0x3BA);
        assert_eq!(pdu.channel, 0x016B);
        assert_eq!(pdu.ssc, 0x70);
    }

    #[test]
    fn test_sync_bcst_time() {
        let pdu = SyncBcst::from_bitbuf(&mut body("300000042C1E432C053C0000")).unwrap();
        assert!(!pdu.unsynced);
        assert!(pdu.invalid_time);
        assert_eq!(pdu.year, 15);
        assert_eq!(pdu.month, 2);
        assert_eq!(pdu.day, 3);
        assert_eq!(pdu.hours, 5);
        assert_eq!(pdu.minutes, 32);
        assert_eq!(pdu.microslots, 1340);
        assert_eq!(pdu.seconds(), 10);
        assert_eq!(pdu.lto_minutes(), -360);
        let dt = pdu.datetime().unwrap();
        assert_eq!(dt.format("%Y-%m-%d %H:%M:%S").to_string(), "2015-02-03 05:32:10");
    }

    #[test]
    fn test_sync_bcst_invalid_date() {
        // Month 0 never forms a date
        let mut buf = BitBuffer::from_bytes(&[0u8; 8]);
        let pdu = SyncBcst::from_bitbuf(&mut buf).unwrap();
        assert!(pdu.datetime().is_none());
        assert!(pdu.to_string().contains("time: invalid"));
    }
}
