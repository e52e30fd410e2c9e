use core::fmt;
use std::collections::{BTreeMap, BTreeSet, HashMap};

use p25_config::{CfgNetwork, CfgTiming};
use p25_core::freqs::fmt_mhz;
use p25_core::{ChannelId, FreqTable, Modulation, Nac, TalkgroupId, Timestamp};

/// Consecutive control channel misses before hunting moves on to the next candidate
pub const CC_HUNT_THRESHOLD: u32 = 6;

/// Identity and control channel of the site we are listening to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SiteIdentity {
    pub sysid: u16,
    pub rfss_id: u8,
    pub site_id: u8,
    /// Hz
    pub downlink: u64,
    /// Hz
    pub uplink: u64,
}

/// Network identity, needed to derive TDMA descrambling keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetworkIdentity {
    /// 20 bits
    pub wacn: u32,
    /// 12 bits
    pub sysid: u16,
    /// Hz
    pub control_freq: u64,
}

/// A frequency carrying voice traffic, with the talkgroup seen on each slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceFrequency {
    pub tgids: [Option<TalkgroupId>; 2],
    pub updated: Timestamp,
    pub counter: u32,
}

/// Last known channel assignment of a talkgroup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TalkgroupActivity {
    pub updated: Timestamp,
    /// Hz
    pub frequency: u64,
    pub slot: Option<u8>,
    /// Value of the network's update sequence when this entry was last written
    pub seq: u64,
    pub counter: u32,
}

/// Neighbour site advertisement, keyed by its downlink frequency
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjacentSite {
    pub sysid: u16,
    pub rfss_id: u8,
    pub site_id: u8,
    /// Hz
    pub uplink: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeStats {
    pub tsbks: u64,
    pub mbts: u64,
    pub malformed: u64,
    pub unknown: u64,
    pub crc_errors: u64,
}

/// Everything learned about one trunked network, identified by its NAC.
/// Decoding mutates this state; the follow controller reads it.
#[derive(Debug, Clone)]
pub struct TrunkedSystem {
    pub nac: Nac,
    pub sysname: String,
    pub freq_table: FreqTable,
    pub rfss: Option<SiteIdentity>,
    pub net: Option<NetworkIdentity>,
    pub voice_frequencies: BTreeMap<u64, VoiceFrequency>,
    pub talkgroups: BTreeMap<TalkgroupId, TalkgroupActivity>,
    pub secondary: BTreeSet<u64>,
    pub adjacent: BTreeMap<u64, AdjacentSite>,
    pub encrypted: BTreeSet<TalkgroupId>,
    pub whitelist: Option<BTreeSet<TalkgroupId>>,
    /// Talkgroup to expiry. None never expires
    pub blacklist: BTreeMap<TalkgroupId, Option<Timestamp>>,
    pub stats: DecodeStats,

    pub cc_list: Vec<u64>,
    cc_index: usize,
    /// Control channel currently in use, Hz
    pub trunk_cc: u64,
    /// Timeouts seen on the control channel since the last decoded message
    pub cc_timeouts: u32,
    pub last_tsbk: Option<Timestamp>,

    pub tgid_tags: HashMap<TalkgroupId, String>,
    pub offset: i64,
    pub center_frequency: Option<u64>,
    pub modulation: Modulation,

    /// A talkgroup counts as active when updated no longer than this many ms ago
    active_window: i64,
    /// Bumped on every talkgroup table write
    seq: u64,
}

impl TrunkedSystem {
    /// Network without static configuration, as created for a previously unseen NAC
    pub fn new(nac: Nac) -> Self {
        TrunkedSystem {
            nac,
            sysname: format!("{:03x}", nac),
            freq_table: FreqTable::new(),
            rfss: None,
            net: None,
            voice_frequencies: BTreeMap::new(),
            talkgroups: BTreeMap::new(),
            secondary: BTreeSet::new(),
            adjacent: BTreeMap::new(),
            encrypted: BTreeSet::new(),
            whitelist: None,
            blacklist: BTreeMap::new(),
            stats: DecodeStats::default(),
            cc_list: Vec::new(),
            cc_index: 0,
            trunk_cc: 0,
            cc_timeouts: 0,
            last_tsbk: None,
            tgid_tags: HashMap::new(),
            offset: 0,
            center_frequency: None,
            modulation: Modulation::default(),
            active_window: CfgTiming::default().active_window,
            seq: 0,
        }
    }

    pub fn from_config(cfg: &CfgNetwork, timing: &CfgTiming) -> Self {
        let mut tsys = Self::new(cfg.nac);
        tsys.sysname = cfg.sysname.clone();
        tsys.cc_list = cfg.cc_list.clone();
        tsys.trunk_cc = cfg.cc_list.first().copied().unwrap_or(0);
        tsys.whitelist = cfg.whitelist.clone();
        tsys.blacklist = cfg.blacklist.iter().map(|&tg| (tg, None)).collect();
        tsys.tgid_tags = cfg.tgid_tags.clone();
        tsys.offset = cfg.offset;
        tsys.center_frequency = cfg.center_frequency;
        tsys.modulation = cfg.modulation;
        tsys.active_window = timing.active_window;
        tsys
    }

    /// Current value of the talkgroup update sequence
    pub fn seq(&self) -> u64 {
        self.seq
    }

    /// Called for every decoded control channel message
    pub fn note_cc_activity(&mut self, now: Timestamp) {
        self.cc_timeouts = 0;
        self.last_tsbk = Some(now);
    }

    /// Uplink frequency for a downlink frequency on the given channel, using the table offset
    pub fn uplink_for(&self, channel: ChannelId, downlink: u64) -> Option<u64> {
        let (table, _) = p25_core::freqs::split_channel_id(channel);
        let entry = self.freq_table.get(table)?;
        u64::try_from(downlink as i64 + entry.offset_hz).ok()
    }

    /// Record a talkgroup on a voice frequency. A zero frequency is ignored.
    pub fn update_voice_frequency(&mut self, frequency: u64, tgid: TalkgroupId, slot: Option<u8>, now: Timestamp) {
        if frequency == 0 {
            return;
        }
        self.seq += 1;
        let tg = self.talkgroups.entry(tgid).or_insert(TalkgroupActivity {
            updated: now,
            frequency,
            slot,
            seq: self.seq,
            counter: 0,
        });
        tg.updated = now;
        tg.frequency = frequency;
        tg.slot = slot;
        tg.seq = self.seq;
        tg.counter += 1;

        let vf = self.voice_frequencies.entry(frequency).or_insert(VoiceFrequency {
            tgids: [None, None],
            updated: now,
            counter: 0,
        });
        if let Some(entry) = vf.tgids.get_mut(slot.unwrap_or(0) as usize) {
            *entry = Some(tgid);
        }
        vf.updated = now;
        vf.counter += 1;
    }

    /// Apply a single channel assignment for a talkgroup.
    /// Returns the number of follow-relevant updates (0 or 1).
    pub fn apply_grant(&mut self, channel: ChannelId, tgid: TalkgroupId, protected: bool, now: Timestamp) -> u8 {
        if protected && self.encrypted.insert(tgid) {
            tracing::debug!("tgid {} marked encrypted", tgid);
        }
        if self.encrypted.contains(&tgid) {
            return 0;
        }
        match self.freq_table.resolve(channel) {
            Some((frequency, slot)) if frequency != 0 => {
                self.update_voice_frequency(frequency, tgid, slot, now);
                1
            }
            _ => 0,
        }
    }

    /// Apply a two-channel grant update. The second assignment is only applied when
    /// it resolves to a different frequency than the first, but every resolved
    /// assignment of a clear talkgroup counts as an update.
    pub fn apply_grant_pair(&mut self, ch1: ChannelId, tg1: TalkgroupId, ch2: ChannelId, tg2: TalkgroupId, now: Timestamp) -> u8 {
        let f1 = self.freq_table.resolve_freq(ch1);
        let f2 = self.freq_table.resolve_freq(ch2);
        let mut updated = self.apply_grant(ch1, tg1, false, now);
        if f2 != f1 {
            updated += self.apply_grant(ch2, tg2, false, now);
        } else if f2.is_some() && !self.encrypted.contains(&tg2) {
            updated += 1;
        }
        updated
    }

    /// Drop deny-list entries whose expiry lies before `now`
    pub fn purge_blacklist(&mut self, now: Timestamp) {
        self.blacklist.retain(|_, until| match until {
            Some(t) => *t >= now,
            None => true,
        });
    }

    /// Deny-list a talkgroup until `until`, or permanently. Talkgroup 0 is ignored.
    pub fn add_blacklist(&mut self, tgid: TalkgroupId, until: Option<Timestamp>) {
        if tgid == 0 {
            return;
        }
        self.blacklist.insert(tgid, until);
    }

    /// Not denied, allowed by the allow-list if one exists, and not encrypted
    pub fn is_followable(&self, tgid: TalkgroupId) -> bool {
        if self.blacklist.contains_key(&tgid) || self.encrypted.contains(&tgid) {
            return false;
        }
        match &self.whitelist {
            Some(wl) => wl.contains(&tgid),
            None => true,
        }
    }

    fn is_active(&self, tg: &TalkgroupActivity, now: Timestamp) -> bool {
        tg.updated.age(now) <= self.active_window
    }

    /// Pick a talkgroup to follow: the preferred one if it is still active, else the
    /// lowest-numbered active and followable one. Returns (frequency, talkgroup, slot).
    pub fn find_talkgroup(&mut self, now: Timestamp, preferred: Option<TalkgroupId>) -> Option<(u64, TalkgroupId, Option<u8>)> {
        self.purge_blacklist(now);

        if let Some(tgid) = preferred {
            if let Some(tg) = self.talkgroups.get(&tgid) {
                if self.is_active(tg, now) && self.is_followable(tgid) {
                    return Some((tg.frequency, tgid, tg.slot));
                }
            }
        }

        for (&tgid, tg) in &self.talkgroups {
            if !self.is_active(tg, now) || !self.is_followable(tgid) {
                continue;
            }
            // The descrambling key needs the network identity
            if tg.slot.is_some() && self.net.is_none() {
                continue;
            }
            return Some((tg.frequency, tgid, tg.slot));
        }
        None
    }

    /// Followable talkgroups written after sequence number `since`
    pub fn updated_talkgroups(&self, since: u64) -> Vec<TalkgroupId> {
        self.talkgroups
            .iter()
            .filter(|(tgid, tg)| tg.seq > since && self.is_followable(**tgid))
            .map(|(tgid, _)| *tgid)
            .collect()
    }

    /// Display tag for a talkgroup
    pub fn tag(&self, tgid: Option<TalkgroupId>) -> String {
        match tgid {
            None | Some(0) => String::new(),
            Some(tg) => match self.tgid_tags.get(&tg) {
                Some(name) => name.clone(),
                None => format!("Talkgroup ID {} [0x{:x}]", tg, tg),
            },
        }
    }

    /// Move to the next configured control channel after too many misses.
    /// Returns true when the control channel changed.
    pub fn hunt_cc(&mut self, now: Timestamp) -> bool {
        if self.cc_timeouts < CC_HUNT_THRESHOLD || self.cc_list.is_empty() {
            return false;
        }
        self.cc_timeouts = 0;
        self.cc_index = (self.cc_index + 1) % self.cc_list.len();
        let previous = self.trunk_cc;
        self.trunk_cc = self.cc_list[self.cc_index];
        tracing::info!(ts = %now, "nac 0x{:03x}: control channel {} -> {}", self.nac, fmt_mhz(previous), fmt_mhz(self.trunk_cc));
        previous != self.trunk_cc
    }
}

impl fmt::Display for TrunkedSystem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.rfss {
            Some(rf) => writeln!(f, "rf: syid {:x} rfid {} stid {} frequency {} uplink {}",
                rf.sysid, rf.rfss_id, rf.site_id, fmt_mhz(rf.downlink), fmt_mhz(rf.uplink))?,
            None => writeln!(f, "rf: unknown")?,
        }
        match &self.net {
            Some(net) => writeln!(f, "net: syid {:x} wacn {:x} frequency {}", net.sysid, net.wacn, fmt_mhz(net.control_freq))?,
            None => writeln!(f, "net: unknown")?,
        }
        let secondary: Vec<String> = self.secondary.iter().map(|&freq| fmt_mhz(freq)).collect();
        writeln!(f, "secondary control channel(s): {}", secondary.join(","))?;
        writeln!(f, "stats: tsbks {} mbts {} crc {} malformed {} unknown {}",
            self.stats.tsbks, self.stats.mbts, self.stats.crc_errors, self.stats.malformed, self.stats.unknown)?;
        for (&freq, vf) in &self.voice_frequencies {
            let tgs: Vec<String> = vf.tgids.iter()
                .map(|tg| tg.map_or("-".to_string(), |tg| tg.to_string()))
                .collect();
            writeln!(f, "voice frequency {} tgid(s) {} at {} count {}", fmt_mhz(freq), tgs.join(" "), vf.updated, vf.counter)?;
        }
        for (index, entry) in self.freq_table.iter() {
            writeln!(f, "tbl-id: {:x} {}", index, entry)?;
        }
        for (&freq, adj) in &self.adjacent {
            writeln!(f, "adjacent {}: syid {:x} rfid {} stid {} uplink {}",
                fmt_mhz(freq), adj.sysid, adj.rfss_id, adj.site_id, fmt_mhz(adj.uplink))?;
        }
        Ok(())
    }
}
