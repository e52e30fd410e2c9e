use core::fmt;
use std::collections::BTreeMap;

use p25_config::{CfgTiming, TrunkConfig};
use p25_core::freqs::fmt_mhz;
use p25_core::{Nac, TalkgroupId, Timestamp};

use crate::rxctl::rx_msg::{FrameKind, RxMessage, TDMA_NAC};
use crate::rxctl::scheduler::Scheduler;
use crate::rxctl::tuning::{FrequencySetter, TuneCmd};
use crate::rxctl::worker::WorkerPool;
use crate::trunk::network_state::TrunkedSystem;

/// A hold set by the operator lasts for all practical purposes forever
const INDEFINITE_HOLD_MS: i64 = 86_400 * 10_000 * 1000;

/// Follow state of the main receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxState {
    /// Initial state before any network is selected. Behaves like `ControlChannel`.
    Acquire,
    /// Listening to the control channel of the current network
    ControlChannel,
    /// Tuned to a voice channel, waiting for the first voice frame
    TransitionToVoice,
    Voice,
}

impl RxState {
    fn on_control_channel(self) -> bool {
        matches!(self, RxState::Acquire | RxState::ControlChannel)
    }
}

/// Events driving the follow state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RxEvent {
    /// Nothing decoded within the expected window
    Timeout,
    /// A grant produced a usable assignment
    Update,
    /// Trunking message without follow-relevant content
    Decoded,
    VoiceFrameValid { tdma: bool },
    /// Terminator frame, the call is over
    ControlFrameValid,
    Hold,
    Unhold,
    Skip,
    Lockout,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RxStats {
    pub transport_errors: u64,
    /// Trunking words from networks absent from the configuration
    pub ignored_words: u64,
}

/// Channel-following controller. Owns the state of every known network and decides
/// where the main receiver (or, with a worker pool attached, the workers) should listen.
pub struct RxCtl {
    state: RxState,
    systems: BTreeMap<Nac, TrunkedSystem>,
    /// Configured networks in rotation order. Empty in manual mode.
    nacs: Vec<Nac>,
    nac_index: usize,
    current_nac: Option<Nac>,
    current_tgid: Option<TalkgroupId>,
    tgid_hold: Option<TalkgroupId>,
    tgid_hold_until: Timestamp,
    /// Earliest time to rotate to the next network
    wait_until: Timestamp,
    last_tdma_vf: Option<Timestamp>,
    timing: CfgTiming,
    setter: Option<Box<dyn FrequencySetter>>,
    scheduler: Option<Scheduler>,
    stats: RxStats,
}

impl RxCtl {
    /// Builds the controller and tunes to the first control channel of the first network.
    /// Without configured networks the controller runs in manual mode: networks are
    /// created as they appear and nothing is ever tuned.
    pub fn new(cfg: &TrunkConfig, setter: Option<Box<dyn FrequencySetter>>, now: Timestamp) -> Self {
        let systems = cfg
            .networks
            .iter()
            .map(|net| (net.nac, TrunkedSystem::from_config(net, &cfg.timing)))
            .collect();
        let nacs: Vec<Nac> = cfg.networks.iter().map(|net| net.nac).collect();
        let current_nac = nacs.first().copied();

        let mut rxctl = RxCtl {
            state: if current_nac.is_some() { RxState::ControlChannel } else { RxState::Acquire },
            systems,
            nacs,
            nac_index: 0,
            current_nac,
            current_tgid: None,
            tgid_hold: None,
            tgid_hold_until: now,
            wait_until: now,
            last_tdma_vf: None,
            timing: cfg.timing,
            setter,
            scheduler: None,
            stats: RxStats::default(),
        };

        let start = rxctl.current_system().map(|tsys| {
            tracing::info!(ts = %now, "starting on nac 0x{:03x} ({}) control channel {}", tsys.nac, tsys.sysname, fmt_mhz(tsys.trunk_cc));
            tsys.trunk_cc
        });
        match start {
            Some(freq) => rxctl.tune(freq, None),
            None => tracing::info!("no networks configured, running in manual mode"),
        }
        rxctl
    }

    /// Hand voice following over to a pool of workers. The main receiver stays on the control channel.
    pub fn attach_workers(&mut self, mut pool: WorkerPool, input_rate: u32) {
        if let Some(tsys) = self.current_system() {
            pool.set_modulation(tsys.modulation);
        }
        tracing::info!("{} workers attached, input rate {}", pool.len(), input_rate);
        self.scheduler = Some(Scheduler::new(pool, input_rate, &self.timing));
    }

    pub fn state(&self) -> RxState {
        self.state
    }

    pub fn current_nac(&self) -> Option<Nac> {
        self.current_nac
    }

    pub fn current_tgid(&self) -> Option<TalkgroupId> {
        self.current_tgid
    }

    pub fn tgid_hold(&self) -> Option<TalkgroupId> {
        self.tgid_hold
    }

    pub fn is_manual(&self) -> bool {
        self.nacs.is_empty()
    }

    pub fn stats(&self) -> RxStats {
        self.stats
    }

    pub fn system(&self, nac: Nac) -> Option<&TrunkedSystem> {
        self.systems.get(&nac)
    }

    pub fn system_mut(&mut self, nac: Nac) -> Option<&mut TrunkedSystem> {
        self.systems.get_mut(&nac)
    }

    pub fn systems(&self) -> impl Iterator<Item = &TrunkedSystem> {
        self.systems.values()
    }

    pub fn current_system(&self) -> Option<&TrunkedSystem> {
        self.current_nac.and_then(|nac| self.systems.get(&nac))
    }

    pub fn scheduler(&self) -> Option<&Scheduler> {
        self.scheduler.as_ref()
    }

    /// Entry point for everything the frame source and the operator deliver
    pub fn process_message(&mut self, msg: RxMessage, now: Timestamp) {
        match msg {
            RxMessage::ProtocolWord { nac, kind, payload } => self.process_word(nac, kind, &payload, now),
            RxMessage::Timeout => {
                tracing::debug!(ts = %now, "timeout");
                self.update_state(RxEvent::Timeout, now);
                self.run_scheduler(now);
            }
            RxMessage::Command(cmd) => {
                tracing::info!(ts = %now, "command {:?}", cmd);
                self.update_state(cmd.event(), now);
            }
            RxMessage::TransportError(e) => {
                tracing::warn!(ts = %now, "transport error: {}", e);
                self.stats.transport_errors += 1;
            }
        }
    }

    fn process_word(&mut self, nac: Nac, kind: FrameKind, payload: &[u8], now: Timestamp) {
        if nac == TDMA_NAC {
            self.update_state(kind.event(), now);
            return;
        }

        if kind.is_trunking() && !self.systems.contains_key(&nac) {
            if !self.is_manual() {
                tracing::trace!("ignoring {} from unconfigured nac 0x{:03x}", kind, nac);
                self.stats.ignored_words += 1;
                return;
            }
            tracing::info!("new network nac 0x{:03x}", nac);
            self.systems.insert(nac, TrunkedSystem::new(nac));
        }

        let updated = match (kind, self.systems.get_mut(&nac)) {
            (FrameKind::Tsbk, Some(tsys)) => tsys.decode_tsbk(payload, now),
            (FrameKind::Mbt, Some(tsys)) => tsys.decode_mbt(payload, now),
            _ => 0,
        };

        if Some(nac) != self.current_nac {
            return;
        }
        if self.scheduler.is_some() {
            self.run_scheduler(now);
            return;
        }
        let event = if updated > 0 { RxEvent::Update } else { kind.event() };
        self.update_state(event, now);
    }

    fn run_scheduler(&mut self, now: Timestamp) {
        let tsys = self.current_nac.and_then(|nac| self.systems.get(&nac));
        if let (Some(scheduler), Some(tsys)) = (self.scheduler.as_mut(), tsys) {
            scheduler.run(tsys, now);
        }
    }

    /// Run one event through the follow state machine. Inert in manual mode.
    pub fn update_state(&mut self, event: RxEvent, now: Timestamp) {
        if self.is_manual() {
            return;
        }
        let Some(nac) = self.current_nac else {
            return;
        };
        let Some(tsys) = self.systems.get_mut(&nac) else {
            return;
        };
        tracing::debug!(ts = %now, "event {:?} in {:?}", event, self.state);

        let mut new_state = None;
        let mut new_frequency = None;
        let mut new_slot = None;

        match event {
            RxEvent::Timeout => {
                if self.state == RxState::ControlChannel {
                    tsys.cc_timeouts += 1;
                } else if self.last_tdma_vf.map_or(true, |t| now.diff(t) > self.timing.p2_grace_time) {
                    new_state = Some(RxState::ControlChannel);
                    new_frequency = Some(tsys.trunk_cc);
                }
            }
            RxEvent::Update => {
                if self.state.on_control_channel() {
                    let preferred = if self.tgid_hold_until > now { self.tgid_hold } else { None };
                    if let Some((freq, tgid, slot)) = tsys.find_talkgroup(now, preferred) {
                        new_state = Some(RxState::TransitionToVoice);
                        self.current_tgid = Some(tgid);
                        new_frequency = Some(freq);
                        new_slot = slot;
                    }
                }
            }
            RxEvent::Decoded => {}
            RxEvent::VoiceFrameValid { tdma } => {
                if self.state == RxState::TransitionToVoice {
                    new_state = Some(RxState::Voice);
                }
                self.tgid_hold = self.current_tgid;
                self.tgid_hold_until = self.tgid_hold_until.max(now.add_millis(self.timing.tgid_hold_time));
                self.wait_until = now.add_millis(self.timing.tsys_hold_time);
                if tdma {
                    self.last_tdma_vf = Some(now);
                }
            }
            RxEvent::ControlFrameValid => {
                if !self.state.on_control_channel() {
                    new_state = Some(RxState::ControlChannel);
                    new_frequency = Some(tsys.trunk_cc);
                }
            }
            RxEvent::Hold => {
                if let Some(tgid) = self.current_tgid {
                    self.tgid_hold = Some(tgid);
                    self.tgid_hold_until = now.add_millis(INDEFINITE_HOLD_MS);
                    tracing::info!(ts = %now, "hold on tgid {}", tgid);
                }
            }
            RxEvent::Unhold => {
                if self.current_tgid.is_some() {
                    self.current_tgid = None;
                    self.tgid_hold = None;
                    self.tgid_hold_until = now;
                }
            }
            RxEvent::Skip | RxEvent::Lockout => {
                if let Some(tgid) = self.current_tgid {
                    let until = match event {
                        RxEvent::Skip => Some(now.add_millis(self.timing.tgid_skip_time)),
                        _ => None,
                    };
                    tracing::info!(ts = %now, "{:?} tgid {}", event, tgid);
                    tsys.add_blacklist(tgid, until);
                    self.current_tgid = None;
                    self.tgid_hold = None;
                    self.tgid_hold_until = now;
                    if !self.state.on_control_channel() {
                        new_state = Some(RxState::ControlChannel);
                        new_frequency = Some(tsys.trunk_cc);
                    }
                }
            }
        }

        if tsys.hunt_cc(now) && new_frequency.is_none() && new_state.is_none() && self.state.on_control_channel() {
            new_frequency = Some(tsys.trunk_cc);
        }

        if self.wait_until <= now && self.tgid_hold_until <= now && new_state.is_none() {
            self.wait_until = now.add_millis(self.timing.tsys_hold_time);
            self.nac_index = (self.nac_index + 1) % self.nacs.len();
            let next = self.nacs[self.nac_index];
            if next != nac {
                tracing::info!(ts = %now, "rotating to nac 0x{:03x}", next);
            }
            self.current_nac = Some(next);
            self.current_tgid = None;
            new_state = Some(RxState::ControlChannel);
            new_frequency = self.systems.get(&next).map(|t| t.trunk_cc);
        }

        if let Some(freq) = new_frequency {
            self.tune(freq, new_slot);
        }
        if let Some(state) = new_state {
            if state != self.state {
                tracing::info!(ts = %now, "{:?} -> {:?}", self.state, state);
            }
            self.state = state;
        }
    }

    /// Emit a tuning instruction for the current network. A zero frequency is not forwarded.
    fn tune(&mut self, freq: u64, slot: Option<u8>) {
        if freq == 0 {
            return;
        }
        let Some(tsys) = self.current_nac.and_then(|nac| self.systems.get(&nac)) else {
            return;
        };
        let cmd = TuneCmd {
            freq,
            tgid: self.current_tgid,
            offset: tsys.offset,
            tag: tsys.tag(self.current_tgid),
            nac: tsys.nac,
            system: tsys.sysname.clone(),
            center_frequency: tsys.center_frequency,
            tdma_slot: slot,
            wacn: tsys.net.map(|n| n.wacn),
            sysid: tsys.net.map(|n| n.sysid),
        };
        tracing::debug!("{}", cmd);
        if let Some(setter) = self.setter.as_mut() {
            setter.set_frequency(&cmd);
        }
    }
}

impl fmt::Display for RxCtl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for tsys in self.systems.values() {
            writeln!(f, "====== NAC 0x{:03x} ====== {} ======", tsys.nac, tsys.sysname)?;
            write!(f, "{}", tsys)?;
        }
        if let Some(scheduler) = &self.scheduler {
            for (freq, binding) in scheduler.bindings() {
                let tgids: Vec<String> = binding.tgids.keys().map(|t| t.to_string()).collect();
                writeln!(f, "worker {} {} tgids [{}]", binding.worker, fmt_mhz(*freq), tgids.join(","))?;
            }
        }
        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::rxctl::rx_msg::UserCmd;
    use p25_config::CfgNetwork;

    struct Recorder(Rc<RefCell<Vec<TuneCmd>>>);

    impl FrequencySetter for Recorder {
        fn set_frequency(&mut self, cmd: &TuneCmd) {
            self.0.borrow_mut().push(cmd.clone());
        }
    }

    fn t(ms: i64) -> Timestamp {
        Timestamp::from_millis(ms)
    }

    fn rxctl(networks: Vec<CfgNetwork>) -> (RxCtl, Rc<RefCell<Vec<TuneCmd>>>) {
        let tuned = Rc::new(RefCell::new(Vec::new()));
        let rx = RxCtl::new(&TrunkConfig::new(networks), Some(Box::new(Recorder(tuned.clone()))), t(0));
        (rx, tuned)
    }

    #[test]
    fn test_initial_tune() {
        let (rx, tuned) = rxctl(vec![CfgNetwork::new(0x293, vec![851_012_500])]);
        assert_eq!(rx.state(), RxState::ControlChannel);
        let tuned = tuned.borrow();
        assert_eq!(tuned.len(), 1);
        assert_eq!(tuned[0].freq, 851_012_500);
        assert_eq!(tuned[0].tgid, None);
        assert_eq!(tuned[0].nac, 0x293);
    }

    #[test]
    fn test_manual_mode_is_inert() {
        let (mut rx, tuned) = rxctl(vec![]);
        assert!(rx.is_manual());
        assert_eq!(rx.state(), RxState::Acquire);
        rx.process_message(RxMessage::parse_line("293 tsbk 3A000012AE01013348704A54").unwrap().unwrap(), t(10));
        rx.process_message(RxMessage::Timeout, t(20));
        assert_eq!(rx.system(0x293).map(|s| s.stats.tsbks), Some(1));
        assert_eq!(rx.state(), RxState::Acquire);
        assert!(tuned.borrow().is_empty());
    }

    #[test]
    fn test_unconfigured_nac_ignored() {
        let (mut rx, _) = rxctl(vec![CfgNetwork::new(0x293, vec![851_012_500])]);
        rx.process_message(RxMessage::parse_line("111 tsbk 3A000012AE01013348704A54").unwrap().unwrap(), t(10));
        assert!(rx.system(0x111).is_none());
        assert_eq!(rx.stats().ignored_words, 1);
    }

    #[test]
    fn test_network_rotation_after_hold() {
        let (mut rx, tuned) = rxctl(vec![
            CfgNetwork::new(0x293, vec![851_012_500]),
            CfgNetwork::new(0x1A1, vec![852_000_000]),
        ]);
        // Hold timers start expired, so the first event already rotates
        rx.update_state(RxEvent::Decoded, t(100));
        assert_eq!(rx.current_nac(), Some(0x1A1));
        assert_eq!(tuned.borrow().last().map(|c| c.freq), Some(852_000_000));

        // Network hold keeps us here for 3 s
        rx.update_state(RxEvent::Decoded, t(3000));
        assert_eq!(rx.current_nac(), Some(0x1A1));
        rx.update_state(RxEvent::Decoded, t(3100));
        assert_eq!(rx.current_nac(), Some(0x293));
    }

    #[test]
    fn test_transport_error_counted() {
        let (mut rx, _) = rxctl(vec![CfgNetwork::new(0x293, vec![851_012_500])]);
        rx.process_message(RxMessage::TransportError("sync lost".to_string()), t(1));
        assert_eq!(rx.stats().transport_errors, 1);
        rx.process_message(RxMessage::Command(UserCmd::Hold), t(2));
        assert_eq!(rx.tgid_hold(), None);
    }
}
