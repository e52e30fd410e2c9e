use p25_config::{CfgNetwork, TrunkConfig};
use p25_core::{Nac, Timestamp};
use p25_entities::{FrameKind, RxMessage};
use p25_pdus::tsbk::tsbk_header::{assemble_tsbk, pack_body};

pub const NAC: Nac = 0x293;
pub const CC1: u64 = 851_012_500;
pub const CC2: u64 = 851_512_500;
/// Band plan index used by the grant helpers, 6.25 kHz steps from 851.00625 MHz
pub const IDEN: u16 = 1;
/// Channel 153 of the band plan
pub const VOICE_FREQ: u64 = 851_962_500;

pub fn t(ms: i64) -> Timestamp {
    Timestamp::from_millis(ms)
}

pub fn config(networks: Vec<CfgNetwork>) -> TrunkConfig {
    TrunkConfig::new(networks)
}

/// Single network on NAC 0x293 with two control channels and a center frequency
pub fn default_network() -> CfgNetwork {
    let mut net = CfgNetwork::new(NAC, vec![CC1, CC2]);
    net.sysname = "County".to_string();
    net.center_frequency = Some(851_500_000);
    net
}

pub fn channel(iden: u16, number: u16) -> u16 {
    (iden << 12) | number
}

/// IDEN_UP installing an FDMA plan with a -45 MHz uplink offset
pub fn iden_up_word(iden: u8, spacing_hz: u64, base_hz: u64) -> Vec<u8> {
    let body = pack_body(&[(iden as u64, 4), (0x64, 9), (180, 9), (spacing_hz / 125, 10), (base_hz / 5, 32)]);
    assemble_tsbk(false, 0x3D, 0x00, body).to_vec()
}

/// IDEN_UP_TDMA; channel type 3 gives two slots per carrier
pub fn iden_up_tdma_word(iden: u8, channel_type: u8, spacing_hz: u64, base_hz: u64) -> Vec<u8> {
    let body = pack_body(&[(iden as u64, 4), (channel_type as u64, 4), (0, 14), (spacing_hz / 125, 10), (base_hz / 5, 32)]);
    assemble_tsbk(false, 0x33, 0x00, body).to_vec()
}

/// The plan behind `VOICE_FREQ`
pub fn default_plan_word() -> Vec<u8> {
    iden_up_word(IDEN as u8, 6250, 851_006_250)
}

pub fn grant_word(protected: bool, channel: u16, tgid: u16) -> Vec<u8> {
    let opts = if protected { 0x40 } else { 0x00 };
    let body = pack_body(&[(opts, 8), (channel as u64, 16), (tgid as u64, 16), (1_234_567, 24)]);
    assemble_tsbk(true, 0x00, 0x00, body).to_vec()
}

pub fn net_sts_word(wacn: u32, sysid: u16, channel: u16) -> Vec<u8> {
    let body = pack_body(&[(0, 8), (wacn as u64, 20), (sysid as u64, 12), (channel as u64, 16), (0x70, 8)]);
    assemble_tsbk(true, 0x3B, 0x00, body).to_vec()
}

pub fn tsbk(nac: Nac, word: Vec<u8>) -> RxMessage {
    RxMessage::ProtocolWord { nac, kind: FrameKind::Tsbk, payload: word }
}

pub fn frame(nac: Nac, kind: FrameKind) -> RxMessage {
    RxMessage::ProtocolWord { nac, kind, payload: Vec::new() }
}
