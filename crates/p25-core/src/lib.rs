//! Core utilities for the P25 trunking receiver
//!
//! This crate provides fundamental types and utilities used across the receiver:
//! - BitBuffer for bit-level protocol word parsing
//! - FreqTable for channel identifier to frequency resolution
//! - Timestamp for caller-supplied event time
//! - CRC16 and the TDMA scrambling sequence
//! - Logging setup and debug macros

pub mod bitbuffer;
pub mod crc16;
pub mod debug;
pub mod freqs;
pub mod pdu_parse_error;
pub mod scrambler;
pub mod timestamp;

pub use bitbuffer::BitBuffer;
pub use crc16::crc16;
pub use freqs::{FreqTable, IdenEntry};
pub use pdu_parse_error::PduParseErr;
pub use timestamp::Timestamp;

use serde::Deserialize;

/// 12-bit Network Access Code. 0xFFFF is used on the input side to flag TDMA frames.
pub type Nac = u16;

/// 16-bit group address
pub type TalkgroupId = u16;

/// 16-bit channel identifier: 4-bit band plan index, 12-bit channel number
pub type ChannelId = u16;

/// Demodulator chain needed for a network's carriers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modulation {
    #[default]
    Cqpsk,
    C4fm,
}
