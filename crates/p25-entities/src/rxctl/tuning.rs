use core::fmt;

use p25_core::freqs::fmt_mhz;
use p25_core::{Nac, TalkgroupId};

/// Tuning instruction for the main receiver
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuneCmd {
    /// Target frequency in Hz. Never 0 when delivered.
    pub freq: u64,
    pub tgid: Option<TalkgroupId>,
    /// Per-network tuning correction in Hz
    pub offset: i64,
    /// Display tag of the talkgroup, empty when none is selected
    pub tag: String,
    pub nac: Nac,
    /// Site name
    pub system: String,
    pub center_frequency: Option<u64>,
    pub tdma_slot: Option<u8>,
    pub wacn: Option<u32>,
    pub sysid: Option<u16>,
}

impl fmt::Display for TuneCmd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "tune {} nac 0x{:03x} ({})", fmt_mhz(self.freq), self.nac, self.system)?;
        if let Some(tgid) = self.tgid {
            write!(f, " tgid {} '{}'", tgid, self.tag)?;
        }
        if let Some(slot) = self.tdma_slot {
            write!(f, " slot {}", slot)?;
        }
        if self.offset != 0 {
            write!(f, " offset {}", self.offset)?;
        }
        Ok(())
    }
}

/// Receives tuning instructions for the main receiver
pub trait FrequencySetter {
    fn set_frequency(&mut self, cmd: &TuneCmd);
}

/// Setter that only logs, for replay runs without a radio
#[derive(Debug, Default)]
pub struct LoggingSetter {
    pub count: usize,
}

impl FrequencySetter for LoggingSetter {
    fn set_frequency(&mut self, cmd: &TuneCmd) {
        self.count += 1;
        tracing::info!("{}", cmd);
    }
}
