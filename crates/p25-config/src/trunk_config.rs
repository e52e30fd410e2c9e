use std::collections::{BTreeSet, HashMap};

use p25_core::{Modulation, Nac, TalkgroupId};

/// One trunked network to follow, identified by its NAC
#[derive(Debug, Clone)]
pub struct CfgNetwork {
    /// 12 bits, must be nonzero and unique across the configuration
    pub nac: Nac,
    /// Display name, defaults to the NAC in hex
    pub sysname: String,
    /// Control channel candidates in Hz, hunted in order
    pub cc_list: Vec<u64>,
    /// Tuning offset in Hz passed through with every tuning command
    pub offset: i64,
    pub modulation: Modulation,
    /// Receiver center frequency in Hz, needed when recording with a worker pool
    pub center_frequency: Option<u64>,
    /// When present, only these talkgroups are followed
    pub whitelist: Option<BTreeSet<TalkgroupId>>,
    /// Talkgroups that are never followed
    pub blacklist: BTreeSet<TalkgroupId>,
    /// Talkgroup display names
    pub tgid_tags: HashMap<TalkgroupId, String>,
}

impl CfgNetwork {
    pub fn new(nac: Nac, cc_list: Vec<u64>) -> Self {
        CfgNetwork {
            nac,
            sysname: format!("{:03x}", nac),
            cc_list,
            offset: 0,
            modulation: Modulation::default(),
            center_frequency: None,
            whitelist: None,
            blacklist: BTreeSet::new(),
            tgid_tags: HashMap::new(),
        }
    }
}

/// Receiver worker pool for recording several voice channels at once
#[derive(Debug, Clone)]
pub struct CfgReceiver {
    /// Complex sample rate of the wideband input, bounds how far from center a channel may lie
    pub input_rate: u32,
    /// Number of demodulation workers
    pub workers: usize,
}

/// Hold and grace times, in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CfgTiming {
    /// Keep following a talkgroup this long after its last voice frame
    pub tgid_hold_time: i64,
    /// Deny-list duration for a skipped talkgroup
    pub tgid_skip_time: i64,
    /// Stay on a network this long before rotating to the next one
    pub tsys_hold_time: i64,
    /// Tolerated silence on a TDMA voice channel before returning to the control channel
    pub p2_grace_time: i64,
    /// A talkgroup counts as active if updated no longer ago than this
    pub active_window: i64,
    /// Minimum interval between idle-resource sweeps
    pub gc_interval: i64,
}

impl Default for CfgTiming {
    fn default() -> Self {
        Self {
            tgid_hold_time: 2000,
            tgid_skip_time: 1000,
            tsys_hold_time: 3000,
            p2_grace_time: 1000,
            active_window: 0,
            gc_interval: 1000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct TrunkConfig {
    pub debug_log: Option<String>,
    pub receiver: Option<CfgReceiver>,
    pub timing: CfgTiming,
    /// Networks in configuration order; rotation follows this order
    pub networks: Vec<CfgNetwork>,
}

impl TrunkConfig {
    pub fn new(networks: Vec<CfgNetwork>) -> Self {
        TrunkConfig {
            debug_log: None,
            receiver: None,
            timing: CfgTiming::default(),
            networks,
        }
    }

    /// Validate that all networks are usable and uniquely identified.
    pub fn validate(&self) -> Result<(), String> {
        let mut seen = BTreeSet::new();
        for net in &self.networks {
            if net.nac == 0 {
                return Err(format!("network {}: nac must be nonzero", net.sysname));
            }
            if net.nac > 0xFFF {
                return Err(format!("network {}: nac 0x{:x} exceeds 12 bits", net.sysname, net.nac));
            }
            if !seen.insert(net.nac) {
                return Err(format!("duplicate nac 0x{:03x}", net.nac));
            }
            if net.cc_list.is_empty() {
                return Err(format!("network {}: control_channel_list is empty", net.sysname));
            }
        }
        if let Some(rx) = &self.receiver {
            if rx.workers == 0 {
                return Err("receiver.workers must be at least 1".to_string());
            }
            if rx.input_rate == 0 {
                return Err("receiver.input_rate must be nonzero".to_string());
            }
        }
        let t = &self.timing;
        if [t.tgid_hold_time, t.tgid_skip_time, t.tsys_hold_time, t.p2_grace_time, t.active_window, t.gc_interval]
            .iter()
            .any(|&v| v < 0)
        {
            return Err("timing values must not be negative".to_string());
        }
        Ok(())
    }
}
