//! Bit-exact layouts of P25 trunking signaling messages
//!
//! - `tsbk`: single-block trunking messages, standard and vendor opcode sets
//! - `mbt`: alternate-format multi-block trunking messages

pub mod mbt;
pub mod tsbk;
