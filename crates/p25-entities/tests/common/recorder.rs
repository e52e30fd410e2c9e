use std::cell::RefCell;
use std::rc::Rc;

use p25_core::Modulation;
use p25_entities::{DemodWorker, FrequencySetter, TuneCmd};

/// A call made on a worker, tagged with the worker's index in the pool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerCall {
    RelativeFrequency(usize, i64),
    SymbolRate(usize, u32),
    DescramblingKey { worker: usize, tag: String, slot: u8, len: usize },
    Output(usize, String, u8),
    Modulation(usize, Modulation),
}

/// Worker that records every command for later inspection
pub struct RecordingWorker {
    index: usize,
    calls: Rc<RefCell<Vec<WorkerCall>>>,
}

impl RecordingWorker {
    /// A pool of `n` workers sharing one call log
    pub fn pool(n: usize) -> (Vec<Box<dyn DemodWorker>>, Rc<RefCell<Vec<WorkerCall>>>) {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let workers = (0..n)
            .map(|index| Box::new(RecordingWorker { index, calls: calls.clone() }) as Box<dyn DemodWorker>)
            .collect();
        (workers, calls)
    }
}

impl DemodWorker for RecordingWorker {
    fn set_relative_frequency(&mut self, delta_hz: i64) {
        self.calls.borrow_mut().push(WorkerCall::RelativeFrequency(self.index, delta_hz));
    }

    fn set_symbol_rate(&mut self, rate: u32) {
        self.calls.borrow_mut().push(WorkerCall::SymbolRate(self.index, rate));
    }

    fn set_descrambling_key(&mut self, key: &[u8], tag: &str, slot: u8) {
        self.calls.borrow_mut().push(WorkerCall::DescramblingKey {
            worker: self.index,
            tag: tag.to_string(),
            slot,
            len: key.len(),
        });
    }

    fn set_output(&mut self, sink: &str, slot: u8) {
        self.calls.borrow_mut().push(WorkerCall::Output(self.index, sink.to_string(), slot));
    }

    fn set_modulation(&mut self, modulation: Modulation) {
        self.calls.borrow_mut().push(WorkerCall::Modulation(self.index, modulation));
    }
}

/// Frequency setter that collects all tuning commands
pub struct RecordingSetter {
    tuned: Rc<RefCell<Vec<TuneCmd>>>,
}

impl RecordingSetter {
    pub fn new() -> (Self, Rc<RefCell<Vec<TuneCmd>>>) {
        let tuned = Rc::new(RefCell::new(Vec::new()));
        (Self { tuned: tuned.clone() }, tuned)
    }
}

impl FrequencySetter for RecordingSetter {
    fn set_frequency(&mut self, cmd: &TuneCmd) {
        tracing::debug!("set_frequency: {}", cmd);
        self.tuned.borrow_mut().push(cmd.clone());
    }
}
