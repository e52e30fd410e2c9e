pub mod rxctl;
pub mod trunk;

// Re-export commonly used items
pub use rxctl::rx_ctl::{RxCtl, RxEvent, RxState};
pub use rxctl::rx_msg::{FrameKind, RxMessage, UserCmd};
pub use rxctl::scheduler::Scheduler;
pub use rxctl::tuning::{FrequencySetter, LoggingSetter, TuneCmd};
pub use rxctl::worker::{DemodWorker, LoggingWorker, WorkerId, WorkerPool};
pub use trunk::network_state::TrunkedSystem;
