use p25_core::Modulation;

/// Index of a worker in its pool
pub type WorkerId = usize;

/// A demodulator chain that can be pointed at one carrier inside the receive bandwidth.
/// Calls are fire-and-forget commands; the controller never reads state back.
pub trait DemodWorker {
    /// Shift from the receiver center frequency to the carrier, in Hz. 0 parks the worker.
    fn set_relative_frequency(&mut self, delta_hz: i64);

    /// Symbol rate of the carrier: 4800 for FDMA voice, 6000 for TDMA
    fn set_symbol_rate(&mut self, rate: u32);

    /// Install a TDMA descrambling sequence on a slot. `tag` identifies the key for caching.
    fn set_descrambling_key(&mut self, key: &[u8], tag: &str, slot: u8);

    /// Route the audio of a slot to a named sink
    fn set_output(&mut self, sink: &str, slot: u8);

    /// Select the demodulator chain
    fn set_modulation(&mut self, modulation: Modulation);
}

struct PoolEntry {
    worker: Box<dyn DemodWorker>,
    busy: bool,
}

/// Fixed set of demodulator workers. Each worker is either idle or bound to exactly one frequency.
pub struct WorkerPool {
    entries: Vec<PoolEntry>,
}

impl WorkerPool {
    pub fn new(workers: Vec<Box<dyn DemodWorker>>) -> Self {
        Self {
            entries: workers.into_iter().map(|worker| PoolEntry { worker, busy: false }).collect(),
        }
    }

    /// First idle worker, marked busy. None when the pool is exhausted.
    pub fn acquire_worker(&mut self) -> Option<WorkerId> {
        let (id, entry) = self.entries.iter_mut().enumerate().find(|(_, e)| !e.busy)?;
        entry.busy = true;
        Some(id)
    }

    /// Return a worker to the idle set
    pub fn release(&mut self, id: WorkerId) {
        match self.entries.get_mut(id) {
            Some(entry) => {
                p25_core::assert_warn!(entry.busy, "worker {} released while idle", id);
                entry.busy = false;
            }
            None => tracing::warn!("release of unknown worker {}", id),
        }
    }

    pub fn worker_mut(&mut self, id: WorkerId) -> Option<&mut (dyn DemodWorker + 'static)> {
        self.entries.get_mut(id).map(|e| e.worker.as_mut())
    }

    pub fn is_busy(&self, id: WorkerId) -> bool {
        self.entries.get(id).is_some_and(|e| e.busy)
    }

    pub fn set_modulation(&mut self, modulation: Modulation) {
        for entry in self.entries.iter_mut() {
            entry.worker.set_modulation(modulation);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn idle_count(&self) -> usize {
        self.entries.iter().filter(|e| !e.busy).count()
    }

    pub fn busy_count(&self) -> usize {
        self.len() - self.idle_count()
    }
}

/// Worker that only logs its commands, for replay runs without a radio
pub struct LoggingWorker {
    pub name: String,
}

impl LoggingWorker {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl DemodWorker for LoggingWorker {
    fn set_relative_frequency(&mut self, delta_hz: i64) {
        tracing::info!("{}: relative frequency {}", self.name, delta_hz);
    }

    fn set_symbol_rate(&mut self, rate: u32) {
        tracing::info!("{}: symbol rate {}", self.name, rate);
    }

    fn set_descrambling_key(&mut self, key: &[u8], tag: &str, slot: u8) {
        tracing::info!("{}: descrambling key {} ({} dibits) slot {}", self.name, tag, key.len(), slot);
    }

    fn set_output(&mut self, sink: &str, slot: u8) {
        tracing::info!("{}: slot {} -> {}", self.name, slot, sink);
    }

    fn set_modulation(&mut self, modulation: Modulation) {
        tracing::debug!("{}: modulation {:?}", self.name, modulation);
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    fn pool(n: usize) -> WorkerPool {
        WorkerPool::new((0..n).map(|i| Box::new(LoggingWorker::new(format!("w{}", i))) as Box<dyn DemodWorker>).collect())
    }

    #[test]
    fn test_acquire_until_exhausted() {
        let mut pool = pool(2);
        assert_eq!(pool.acquire_worker(), Some(0));
        assert_eq!(pool.acquire_worker(), Some(1));
        assert_eq!(pool.acquire_worker(), None);
        assert_eq!(pool.busy_count(), 2);
    }

    #[test]
    fn test_release_returns_first_idle() {
        let mut pool = pool(3);
        pool.acquire_worker();
        pool.acquire_worker();
        pool.release(0);
        assert!(!pool.is_busy(0));
        assert_eq!(pool.acquire_worker(), Some(0));
        assert_eq!(pool.acquire_worker(), Some(2));
        assert_eq!(pool.idle_count(), 0);
    }

    #[test]
    fn test_release_unknown_is_harmless() {
        let mut pool = pool(1);
        pool.release(5);
        pool.release(0);
        assert_eq!(pool.idle_count(), 1);
        assert!(pool.worker_mut(5).is_none());
    }
}
