use core::fmt;
use std::str::FromStr;

use p25_core::Nac;
use p25_core::bitbuffer::hex_to_bytes;

use crate::rxctl::rx_ctl::RxEvent;

/// NAC value the frame source uses to flag a TDMA frame
pub const TDMA_NAC: Nac = 0xFFFF;

/// Kind of protocol word delivered by the frame source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Header data unit, starts a voice transmission
    Hdu,
    /// Terminator without link control
    Tdu,
    Ldu1,
    Ldu2,
    /// Single-block trunking message
    Tsbk,
    /// Multi-block trunking message
    Mbt,
    /// Terminator with link control
    Tdulc,
    TdmaVoice,
    TdmaTerm,
}

impl FrameKind {
    /// Follow event for frames that carry no trunking payload.
    /// TSBK and MBT map to `Decoded`; the caller upgrades that to `Update` when the decode yields one.
    pub fn event(self) -> RxEvent {
        match self {
            FrameKind::Tdulc => RxEvent::Timeout,
            FrameKind::Tdu | FrameKind::TdmaTerm => RxEvent::ControlFrameValid,
            FrameKind::Hdu | FrameKind::Ldu1 | FrameKind::Ldu2 => RxEvent::VoiceFrameValid { tdma: false },
            FrameKind::TdmaVoice => RxEvent::VoiceFrameValid { tdma: true },
            FrameKind::Tsbk | FrameKind::Mbt => RxEvent::Decoded,
        }
    }

    pub fn is_trunking(self) -> bool {
        matches!(self, FrameKind::Tsbk | FrameKind::Mbt)
    }
}

impl FromStr for FrameKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hdu" => Ok(FrameKind::Hdu),
            "tdu" => Ok(FrameKind::Tdu),
            "ldu1" => Ok(FrameKind::Ldu1),
            "ldu2" => Ok(FrameKind::Ldu2),
            "tsbk" => Ok(FrameKind::Tsbk),
            "mbt" => Ok(FrameKind::Mbt),
            "tdulc" => Ok(FrameKind::Tdulc),
            "tdma-voice" => Ok(FrameKind::TdmaVoice),
            "tdma-term" => Ok(FrameKind::TdmaTerm),
            other => Err(format!("unknown frame kind '{}'", other)),
        }
    }
}

impl fmt::Display for FrameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FrameKind::Hdu => "hdu",
            FrameKind::Tdu => "tdu",
            FrameKind::Ldu1 => "ldu1",
            FrameKind::Ldu2 => "ldu2",
            FrameKind::Tsbk => "tsbk",
            FrameKind::Mbt => "mbt",
            FrameKind::Tdulc => "tdulc",
            FrameKind::TdmaVoice => "tdma-voice",
            FrameKind::TdmaTerm => "tdma-term",
        };
        write!(f, "{}", s)
    }
}

/// Operator command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserCmd {
    /// Pin the current talkgroup
    Hold,
    /// Release the pin
    Unhold,
    /// Deny the current talkgroup for the configured skip time
    Skip,
    /// Deny the current talkgroup permanently
    Lockout,
}

impl UserCmd {
    pub fn event(self) -> RxEvent {
        match self {
            UserCmd::Hold => RxEvent::Hold,
            UserCmd::Unhold => RxEvent::Unhold,
            UserCmd::Skip => RxEvent::Skip,
            UserCmd::Lockout => RxEvent::Lockout,
        }
    }
}

impl FromStr for UserCmd {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hold" => Ok(UserCmd::Hold),
            "unhold" => Ok(UserCmd::Unhold),
            "skip" => Ok(UserCmd::Skip),
            "lockout" => Ok(UserCmd::Lockout),
            other => Err(format!("unknown command '{}'", other)),
        }
    }
}

/// Inbound message to the controller
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RxMessage {
    /// Frame-synchronized protocol word. The payload is the raw bit-packed message.
    ProtocolWord { nac: Nac, kind: FrameKind, payload: Vec<u8> },
    /// Nothing decoded within the expected window
    Timeout,
    Command(UserCmd),
    /// Frame source reported a problem
    TransportError(String),
}

impl RxMessage {
    /// Parses one capture line: `<nac-hex> <kind> [<hex-payload>]` or `cmd <command>`.
    /// Empty lines and `#` comments yield `Ok(None)`.
    pub fn parse_line(line: &str) -> Result<Option<RxMessage>, String> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(None);
        }
        let mut parts = line.split_whitespace();
        let first = parts.next().unwrap_or_default();
        if first.eq_ignore_ascii_case("cmd") {
            let cmd = parts.next().ok_or_else(|| "missing command".to_string())?;
            return Ok(Some(RxMessage::Command(cmd.parse()?)));
        }
        if first.eq_ignore_ascii_case("timeout") {
            return Ok(Some(RxMessage::Timeout));
        }

        let digits = first.trim_start_matches("0x").trim_start_matches("0X");
        let nac = Nac::from_str_radix(digits, 16).map_err(|e| format!("invalid nac '{}': {}", first, e))?;
        let kind: FrameKind = parts.next().ok_or_else(|| "missing frame kind".to_string())?.parse()?;
        let payload = match parts.next() {
            Some(hex) => parse_hex(hex)?,
            None => Vec::new(),
        };
        Ok(Some(RxMessage::ProtocolWord { nac, kind, payload }))
    }
}

/// Hex string to bytes. Accepts an optional `0x` prefix.
pub fn parse_hex(hex: &str) -> Result<Vec<u8>, String> {
    hex_to_bytes(hex).ok_or_else(|| format!("invalid hex string '{}'", hex))
}
