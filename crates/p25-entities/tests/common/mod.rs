#![allow(dead_code)]

pub mod recorder;
pub mod scenario;

pub use recorder::{RecordingSetter, RecordingWorker, WorkerCall};
pub use scenario::*;
