use std::collections::{BTreeMap, HashMap};

use p25_config::CfgTiming;
use p25_core::freqs::fmt_mhz;
use p25_core::scrambler::descrambling_key;
use p25_core::{Nac, TalkgroupId, Timestamp};

use crate::rxctl::worker::{WorkerId, WorkerPool};
use crate::trunk::network_state::TrunkedSystem;

/// Symbol rate of an FDMA voice carrier
pub const FDMA_SYMBOL_RATE: u32 = 4800;
/// Symbol rate of a TDMA voice carrier
pub const TDMA_SYMBOL_RATE: u32 = 6000;

/// A talkgroup riding a bound frequency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TgBinding {
    pub updated: Timestamp,
    pub slot: Option<u8>,
}

/// A frequency with a worker tuned to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FreqBinding {
    pub worker: WorkerId,
    pub tgids: BTreeMap<TalkgroupId, TgBinding>,
}

/// Binds talkgroup activity to pool workers and releases idle bindings.
///
/// After every pass, each worker is bound to at most one frequency and no frequency
/// holds a worker without at least one talkgroup, apart from a binding created in the
/// same pass.
pub struct Scheduler {
    pool: WorkerPool,
    /// Receiver sample rate. Carriers further than half of it from the center are out of reach.
    input_rate: u32,
    working: BTreeMap<u64, FreqBinding>,
    key_cache: HashMap<(Nac, u16, u32), Vec<u8>>,
    last_gc: Option<Timestamp>,
    /// Talkgroup table sequence number seen by the previous pass, per network
    last_seq: HashMap<Nac, u64>,
    /// Talkgroup binding lifetime without refresh, ms
    hold: i64,
    gc_interval: i64,
}

impl Scheduler {
    pub fn new(pool: WorkerPool, input_rate: u32, timing: &CfgTiming) -> Self {
        Self {
            pool,
            input_rate,
            working: BTreeMap::new(),
            key_cache: HashMap::new(),
            last_gc: None,
            last_seq: HashMap::new(),
            hold: timing.tgid_hold_time,
            gc_interval: timing.gc_interval,
        }
    }

    pub fn pool(&self) -> &WorkerPool {
        &self.pool
    }

    pub fn pool_mut(&mut self) -> &mut WorkerPool {
        &mut self.pool
    }

    pub fn bindings(&self) -> &BTreeMap<u64, FreqBinding> {
        &self.working
    }

    /// Frequency a talkgroup is currently bound to
    pub fn frequency_of(&self, tgid: TalkgroupId) -> Option<u64> {
        self.working.iter().find(|(_, b)| b.tgids.contains_key(&tgid)).map(|(f, _)| *f)
    }

    pub fn cached_keys(&self) -> usize {
        self.key_cache.len()
    }

    /// One scheduling pass over the talkgroups of `tsys` written since the previous pass,
    /// followed by garbage collection when the interval has elapsed.
    pub fn run(&mut self, tsys: &TrunkedSystem, now: Timestamp) {
        let since = self.last_seq.get(&tsys.nac).copied().unwrap_or(0);
        for tgid in tsys.updated_talkgroups(since) {
            if let Some(activity) = tsys.talkgroups.get(&tgid) {
                self.assign(tsys, tgid, activity.frequency, activity.slot, now);
            }
        }
        self.last_seq.insert(tsys.nac, tsys.seq());

        let due = match self.last_gc {
            Some(last) => last.add_millis(self.gc_interval) <= now,
            None => true,
        };
        if due {
            self.last_gc = Some(now);
            self.collect_garbage(now);
        }
    }

    fn assign(&mut self, tsys: &TrunkedSystem, tgid: TalkgroupId, freq: u64, slot: Option<u8>, now: Timestamp) {
        // A talkgroup never rides two frequencies
        let others: Vec<u64> = self
            .working
            .iter()
            .filter(|(f, b)| **f != freq && b.tgids.contains_key(&tgid))
            .map(|(f, _)| *f)
            .collect();
        for other in others {
            tracing::info!(ts = %now, "tgid {} moved from {} to {}", tgid, fmt_mhz(other), fmt_mhz(freq));
            self.free_talkgroup(other, tgid, now);
            if self.working.get(&other).is_some_and(|b| b.tgids.is_empty()) {
                self.free_frequency(other, now);
            }
        }

        let Some(center) = tsys.center_frequency else {
            tracing::debug!("nac 0x{:03x}: no center frequency, tgid {} not bound", tsys.nac, tgid);
            return;
        };
        let delta = center as i64 - freq as i64;
        if delta.unsigned_abs() > (self.input_rate / 2) as u64 {
            tracing::debug!("tgid {} at {} outside receive bandwidth", tgid, fmt_mhz(freq));
            return;
        }
        let net = match (slot, tsys.net) {
            (Some(_), None) => {
                tracing::debug!("tgid {} on tdma carrier {} before network identity is known", tgid, fmt_mhz(freq));
                return;
            }
            (_, net) => net,
        };

        let update = match self.working.get(&freq) {
            Some(binding) => match binding.tgids.get(&tgid) {
                Some(b) if b.slot == slot => false,
                Some(b) => {
                    tracing::info!(ts = %now, "tgid {} slot switch {:?} -> {:?} on {}", tgid, b.slot, slot, fmt_mhz(freq));
                    true
                }
                None => {
                    tracing::info!(ts = %now, "tgid {} slot {:?} joins active frequency {}", tgid, slot, fmt_mhz(freq));
                    true
                }
            },
            None => {
                let Some(worker) = self.pool.acquire_worker() else {
                    tracing::warn!("no free demodulators, freq {} tgid {}", fmt_mhz(freq), tgid);
                    return;
                };
                if let Some(w) = self.pool.worker_mut(worker) {
                    w.set_relative_frequency(delta);
                }
                tracing::info!(ts = %now, "worker {} starts on {} tgid {} slot {:?}", worker, fmt_mhz(freq), tgid, slot);
                self.working.insert(freq, FreqBinding { worker, tgids: BTreeMap::new() });
                true
            }
        };

        let Some(binding) = self.working.get_mut(&freq) else {
            return;
        };
        if update {
            // The new sink supersedes whatever else was routed from this slot
            binding.tgids.retain(|t, b| *t == tgid || b.slot != slot);
        }
        binding.tgids.insert(tgid, TgBinding { updated: now, slot });
        if !update {
            return;
        }

        let worker_id = binding.worker;
        let Some(worker) = self.pool.worker_mut(worker_id) else {
            return;
        };
        let index = slot.unwrap_or(0);
        let sink = format!("tgid-{}-{}.wav", tgid, now);
        tracing::info!(ts = %now, "worker {} {} tgid {} slot {} -> {}", worker_id, fmt_mhz(freq), tgid, index, sink);
        worker.set_output(&sink, index);
        if let (Some(_), Some(net)) = (slot, net) {
            worker.set_symbol_rate(TDMA_SYMBOL_RATE);
            let key = self
                .key_cache
                .entry((tsys.nac, net.sysid, net.wacn))
                .or_insert_with(|| descrambling_key(tsys.nac, net.sysid, net.wacn));
            let tag = format!("{:x}{:x}{:x}", tsys.nac, net.sysid, net.wacn);
            worker.set_descrambling_key(key, &tag, index);
        } else {
            worker.set_symbol_rate(FDMA_SYMBOL_RATE);
        }
    }

    /// Release talkgroups not refreshed within the hold time, then every frequency left empty
    pub fn collect_garbage(&mut self, now: Timestamp) {
        let mut stale_tgids = Vec::new();
        let mut stale_freqs = Vec::new();
        for (freq, binding) in &self.working {
            let inactive: Vec<TalkgroupId> = binding
                .tgids
                .iter()
                .filter(|(_, b)| b.updated.add_millis(self.hold) < now)
                .map(|(t, _)| *t)
                .collect();
            if inactive.len() == binding.tgids.len() {
                stale_freqs.push(*freq);
            }
            stale_tgids.extend(inactive.into_iter().map(|t| (*freq, t)));
        }
        for (freq, tgid) in stale_tgids {
            self.free_talkgroup(freq, tgid, now);
        }
        for freq in stale_freqs {
            self.free_frequency(freq, now);
        }
    }

    fn free_talkgroup(&mut self, freq: u64, tgid: TalkgroupId, now: Timestamp) {
        let Some(binding) = self.working.get_mut(&freq) else {
            return;
        };
        let Some(tg) = binding.tgids.remove(&tgid) else {
            return;
        };
        let index = tg.slot.unwrap_or(0);
        if let Some(worker) = self.pool.worker_mut(binding.worker) {
            worker.set_output(&format!("idle-channel-{}-{}-{}.wav", freq, index, now), index);
        }
        tracing::info!(ts = %now, "release tgid {} frequency {}", tgid, fmt_mhz(freq));
    }

    fn free_frequency(&mut self, freq: u64, now: Timestamp) {
        let Some(binding) = self.working.remove(&freq) else {
            return;
        };
        assert!(binding.tgids.is_empty(), "freeing frequency {} with live talkgroups {:?}", freq, binding.tgids);
        if let Some(worker) = self.pool.worker_mut(binding.worker) {
            worker.set_relative_frequency(0);
        }
        self.pool.release(binding.worker);
        tracing::info!(ts = %now, "release worker {} frequency {}", binding.worker, fmt_mhz(freq));
    }
}
