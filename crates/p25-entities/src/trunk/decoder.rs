use p25_core::{BitBuffer, PduParseErr, Timestamp};
use p25_pdus::mbt::mbt_header::{MbtHeader, mbt_header_crc_ok};
use p25_pdus::mbt::pdus::mbt_grants::MbtGrpVChGrant;
use p25_pdus::mbt::pdus::mbt_status::{MbtAdjStsBcst, MbtNetStsBcst, MbtRfssStsBcst};
use p25_pdus::tsbk::enums::mfid::Mfid;
use p25_pdus::tsbk::enums::mot_opcode::MotOpcode;
use p25_pdus::tsbk::enums::tsbk_opcode::TsbkOpcode;
use p25_pdus::tsbk::pdus::broadcasts::{AdjStsBcst, NetStsBcst, RfssStsBcst, Sccb, SccbExp};
use p25_pdus::tsbk::pdus::iden_up::{IdenUp, IdenUpTdma, IdenUpVu};
use p25_pdus::tsbk::pdus::motorola::{MotGrgCnGrant, MotGrgCnGrantUpdt};
use p25_pdus::tsbk::pdus::voice_grants::{GrpVChGrant, GrpVChGrantUpdt, GrpVChGrantUpdtExp};
use p25_pdus::tsbk::tsbk_header::{TsbkHeader, tsbk_crc_ok};
use p25_pdus::tsbk::{TsbkPdu, HARRIS_CALL_SIGN_OPCODE};

use crate::trunk::network_state::{AdjacentSite, NetworkIdentity, SiteIdentity, TrunkedSystem};

/// Applies one TSBK body to the network state. Returns the number of follow-relevant updates.
pub type TsbkHandler = fn(&mut BitBuffer, &mut TrunkedSystem, &TsbkHeader, Timestamp) -> Result<u8, PduParseErr>;

/// Applies the first data block of an MBT to the network state
pub type MbtHandler = fn(&mut BitBuffer, &mut TrunkedSystem, &MbtHeader, Timestamp) -> Result<u8, PduParseErr>;

/// Total dispatch on the (manufacturer, opcode) pair
pub fn tsbk_handler(mfid: u8, opcode: u8) -> TsbkHandler {
    match Mfid::try_from(mfid as u64) {
        Ok(Mfid::Standard) => match TsbkOpcode::try_from(opcode as u64) {
            Ok(TsbkOpcode::GrpVChGrant) => rx_grp_v_ch_grant,
            Ok(TsbkOpcode::GrpVChGrantUpdt) => rx_grp_v_ch_grant_updt,
            Ok(TsbkOpcode::GrpVChGrantUpdtExp) => rx_grp_v_ch_grant_updt_exp,
            Ok(TsbkOpcode::SccbExp) => rx_sccb_exp,
            Ok(TsbkOpcode::IdenUpTdma) => rx_iden_up_tdma,
            Ok(TsbkOpcode::IdenUpVu) => rx_iden_up_vu,
            Ok(TsbkOpcode::Sccb) => rx_sccb,
            Ok(TsbkOpcode::RfssStsBcst) => rx_rfss_sts_bcst,
            Ok(TsbkOpcode::NetStsBcst) => rx_net_sts_bcst,
            Ok(TsbkOpcode::AdjStsBcst) => rx_adj_sts_bcst,
            Ok(TsbkOpcode::IdenUp) => rx_iden_up,
            Ok(_) => rx_decode_only,
            Err(_) => rx_unknown,
        },
        Ok(Mfid::Motorola) => match MotOpcode::try_from(opcode as u64) {
            Ok(MotOpcode::GrgCnGrant) => rx_mot_grg_cn_grant,
            Ok(MotOpcode::GrgCnGrantUpdt) => rx_mot_grg_cn_grant_updt,
            Ok(_) => rx_decode_only,
            Err(_) => rx_unknown,
        },
        Ok(Mfid::Harris) if opcode == HARRIS_CALL_SIGN_OPCODE => rx_decode_only,
        _ => rx_unknown,
    }
}

/// MBT dispatch. Only the standard message set carries follow-relevant content.
pub fn mbt_handler(mfid: u8, opcode: u8) -> MbtHandler {
    if mfid != Mfid::Standard.into_raw() as u8 {
        return rx_mbt_unknown;
    }
    match TsbkOpcode::try_from(opcode as u64) {
        Ok(TsbkOpcode::GrpVChGrant) => rx_mbt_grp_v_ch_grant,
        Ok(TsbkOpcode::RfssStsBcst) => rx_mbt_rfss_sts_bcst,
        Ok(TsbkOpcode::NetStsBcst) => rx_mbt_net_sts_bcst,
        Ok(TsbkOpcode::AdjStsBcst) => rx_mbt_adj_sts_bcst,
        _ => rx_mbt_unknown,
    }
}

impl TrunkedSystem {
    /// Decode one 12-byte TSBK. Never fails: parse errors are counted and yield 0.
    pub fn decode_tsbk(&mut self, data: &[u8], now: Timestamp) -> u8 {
        self.note_cc_activity(now);
        self.stats.tsbks += 1;

        let mut buffer = BitBuffer::from_bytes(data);
        let header = match TsbkHeader::from_bitbuf(&mut buffer) {
            Ok(header) => header,
            Err(e) => {
                tracing::warn!("Failed parsing TSBK header: {:?} {}", e, buffer.dump_hex());
                self.stats.malformed += 1;
                return 0;
            }
        };
        if !tsbk_crc_ok(data) {
            self.stats.crc_errors += 1;
            tracing::trace!("TSBK crc mismatch {}", buffer.dump_hex());
        }

        let handler = tsbk_handler(header.mfid, header.opcode);
        match handler(&mut buffer, self, &header, now) {
            Ok(updated) => updated,
            Err(e) => {
                tracing::warn!("Failed parsing TSBK body {}: {:?}", header, e);
                self.stats.malformed += 1;
                0
            }
        }
    }

    /// Decode an MBT: 12-byte header block followed by the data block(s)
    pub fn decode_mbt(&mut self, data: &[u8], now: Timestamp) -> u8 {
        self.note_cc_activity(now);
        self.stats.mbts += 1;

        let mut buffer = BitBuffer::from_bytes(data);
        let header = match MbtHeader::from_bitbuf(&mut buffer) {
            Ok(header) => header,
            Err(e) => {
                tracing::warn!("Failed parsing MBT header: {:?} {}", e, buffer.dump_hex());
                self.stats.malformed += 1;
                return 0;
            }
        };
        if !mbt_header_crc_ok(data) {
            self.stats.crc_errors += 1;
        }

        let handler = mbt_handler(header.mfid, header.opcode);
        match handler(&mut buffer, self, &header, now) {
            Ok(updated) => updated,
            Err(e) => {
                tracing::warn!("Failed parsing MBT data {}: {:?}", header, e);
                self.stats.malformed += 1;
                0
            }
        }
    }
}

fn rx_unknown(buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, hdr: &TsbkHeader, _now: Timestamp) -> Result<u8, PduParseErr> {
    tracing::debug!("<- unknown {} {}", hdr, buffer.dump_hex());
    tsys.stats.unknown += 1;
    Ok(0)
}

/// Known message without state effects
fn rx_decode_only(buffer: &mut BitBuffer, _tsys: &mut TrunkedSystem, hdr: &TsbkHeader, _now: Timestamp) -> Result<u8, PduParseErr> {
    let pdu = TsbkPdu::from_bitbuf(hdr, buffer)?;
    tracing::debug!("<- {}: {}", pdu.name(), pdu);
    Ok(0)
}

fn rx_grp_v_ch_grant(buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, _hdr: &TsbkHeader, now: Timestamp) -> Result<u8, PduParseErr> {
    let pdu = GrpVChGrant::from_bitbuf(buffer)?;
    tracing::debug!("<- {} ({})", pdu, tsys.tag(Some(pdu.group_address)));
    Ok(tsys.apply_grant(pdu.channel, pdu.group_address, pdu.service_options.protected, now))
}

fn rx_grp_v_ch_grant_updt(buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, _hdr: &TsbkHeader, now: Timestamp) -> Result<u8, PduParseErr> {
    let pdu = GrpVChGrantUpdt::from_bitbuf(buffer)?;
    tracing::debug!("<- {}", pdu);
    Ok(tsys.apply_grant_pair(pdu.channel_a, pdu.group_address_a, pdu.channel_b, pdu.group_address_b, now))
}

fn rx_grp_v_ch_grant_updt_exp(buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, _hdr: &TsbkHeader, now: Timestamp) -> Result<u8, PduParseErr> {
    let pdu = GrpVChGrantUpdtExp::from_bitbuf(buffer)?;
    tracing::debug!("<- {} ({})", pdu, tsys.tag(Some(pdu.group_address)));
    Ok(tsys.apply_grant(pdu.channel_t, pdu.group_address, pdu.service_options.protected, now))
}

fn rx_mot_grg_cn_grant(buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, _hdr: &TsbkHeader, now: Timestamp) -> Result<u8, PduParseErr> {
    let pdu = MotGrgCnGrant::from_bitbuf(buffer)?;
    tracing::debug!("<- {}", pdu);
    Ok(tsys.apply_grant(pdu.channel, pdu.supergroup, pdu.service_options.protected, now))
}

fn rx_mot_grg_cn_grant_updt(buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, _hdr: &TsbkHeader, now: Timestamp) -> Result<u8, PduParseErr> {
    let pdu = MotGrgCnGrantUpdt::from_bitbuf(buffer)?;
    tracing::debug!("<- {}", pdu);
    Ok(tsys.apply_grant_pair(pdu.channel_a, pdu.supergroup_a, pdu.channel_b, pdu.supergroup_b, now))
}

fn rx_sccb(buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, _hdr: &TsbkHeader, _now: Timestamp) -> Result<u8, PduParseErr> {
    let pdu = Sccb::from_bitbuf(buffer)?;
    tracing::debug!("<- {}", pdu);
    add_secondary(tsys, pdu.channel_a, pdu.channel_b);
    Ok(0)
}

fn rx_sccb_exp(buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, _hdr: &TsbkHeader, _now: Timestamp) -> Result<u8, PduParseErr> {
    let pdu = SccbExp::from_bitbuf(buffer)?;
    tracing::debug!("<- {}", pdu);
    add_secondary(tsys, pdu.channel_t, pdu.channel_r);
    Ok(0)
}

fn add_secondary(tsys: &mut TrunkedSystem, ch1: u16, ch2: u16) {
    if let (Some(f1), Some(f2)) = (tsys.freq_table.resolve_freq(ch1), tsys.freq_table.resolve_freq(ch2)) {
        tsys.secondary.insert(f1);
        tsys.secondary.insert(f2);
    }
}

fn rx_rfss_sts_bcst(buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, _hdr: &TsbkHeader, _now: Timestamp) -> Result<u8, PduParseErr> {
    let pdu = RfssStsBcst::from_bitbuf(buffer)?;
    tracing::debug!("<- {}", pdu);
    if let Some(downlink) = tsys.freq_table.resolve_freq(pdu.channel) {
        if let Some(uplink) = tsys.uplink_for(pdu.channel, downlink) {
            tsys.rfss = Some(SiteIdentity {
                sysid: pdu.sysid,
                rfss_id: pdu.rfss_id,
                site_id: pdu.site_id,
                downlink,
                uplink,
            });
        }
    }
    Ok(0)
}

fn rx_net_sts_bcst(buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, _hdr: &TsbkHeader, _now: Timestamp) -> Result<u8, PduParseErr> {
    let pdu = NetStsBcst::from_bitbuf(buffer)?;
    tracing::debug!("<- {}", pdu);
    if let Some(control_freq) = tsys.freq_table.resolve_freq(pdu.channel) {
        tsys.net = Some(NetworkIdentity { wacn: pdu.wacn, sysid: pdu.sysid, control_freq });
    }
    Ok(0)
}

fn rx_adj_sts_bcst(buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, _hdr: &TsbkHeader, _now: Timestamp) -> Result<u8, PduParseErr> {
    let pdu = AdjStsBcst::from_bitbuf(buffer)?;
    tracing::debug!("<- {}", pdu);
    if let Some(downlink) = tsys.freq_table.resolve_freq(pdu.channel) {
        if let Some(uplink) = tsys.uplink_for(pdu.channel, downlink) {
            tsys.adjacent.insert(downlink, AdjacentSite {
                sysid: pdu.sysid,
                rfss_id: pdu.rfss_id,
                site_id: pdu.site_id,
                uplink,
            });
        }
    }
    Ok(0)
}

fn rx_iden_up(buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, _hdr: &TsbkHeader, _now: Timestamp) -> Result<u8, PduParseErr> {
    let pdu = IdenUp::from_bitbuf(buffer)?;
    tracing::debug!("<- {}", pdu);
    tsys.freq_table.install(pdu.iden, pdu.to_entry());
    Ok(0)
}

fn rx_iden_up_vu(buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, _hdr: &TsbkHeader, _now: Timestamp) -> Result<u8, PduParseErr> {
    let pdu = IdenUpVu::from_bitbuf(buffer)?;
    tracing::debug!("<- {}", pdu);
    tsys.freq_table.install(pdu.iden, pdu.to_entry());
    Ok(0)
}

fn rx_iden_up_tdma(buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, _hdr: &TsbkHeader, _now: Timestamp) -> Result<u8, PduParseErr> {
    let pdu = IdenUpTdma::from_bitbuf(buffer)?;
    tracing::debug!("<- {}", pdu);
    match pdu.to_entry() {
        Some(entry) => tsys.freq_table.install(pdu.iden, entry),
        None => p25_core::unimplemented_log!("IdenUpTdma channel type {} for iden {}, not installed", pdu.channel_type, pdu.iden),
    }
    Ok(0)
}

fn rx_mbt_unknown(_buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, hdr: &MbtHeader, _now: Timestamp) -> Result<u8, PduParseErr> {
    tracing::debug!("<- unknown {}", hdr);
    tsys.stats.unknown += 1;
    Ok(0)
}

fn rx_mbt_grp_v_ch_grant(buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, hdr: &MbtHeader, now: Timestamp) -> Result<u8, PduParseErr> {
    let pdu = MbtGrpVChGrant::from_bitbuf(hdr, buffer)?;
    tracing::debug!("<- {} ({})", pdu, tsys.tag(Some(pdu.group_address)));
    Ok(tsys.apply_grant(pdu.channel_t, pdu.group_address, pdu.service_options.protected, now))
}

fn rx_mbt_rfss_sts_bcst(buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, hdr: &MbtHeader, _now: Timestamp) -> Result<u8, PduParseErr> {
    let pdu = MbtRfssStsBcst::from_bitbuf(hdr, buffer)?;
    tracing::debug!("<- {}", pdu);
    if let (Some(downlink), Some(uplink)) = (tsys.freq_table.resolve_freq(pdu.channel_t), tsys.freq_table.resolve_freq(pdu.channel_r)) {
        tsys.rfss = Some(SiteIdentity {
            sysid: pdu.sysid,
            rfss_id: pdu.rfss_id,
            site_id: pdu.site_id,
            downlink,
            uplink,
        });
    }
    Ok(0)
}

fn rx_mbt_net_sts_bcst(buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, hdr: &MbtHeader, _now: Timestamp) -> Result<u8, PduParseErr> {
    let pdu = MbtNetStsBcst::from_bitbuf(hdr, buffer)?;
    tracing::debug!("<- {}", pdu);
    if let (Some(control_freq), Some(_)) = (tsys.freq_table.resolve_freq(pdu.channel_t), tsys.freq_table.resolve_freq(pdu.channel_r)) {
        tsys.net = Some(NetworkIdentity { wacn: pdu.wacn, sysid: pdu.sysid, control_freq });
    }
    Ok(0)
}

fn rx_mbt_adj_sts_bcst(buffer: &mut BitBuffer, tsys: &mut TrunkedSystem, hdr: &MbtHeader, _now: Timestamp) -> Result<u8, PduParseErr> {
    let pdu = MbtAdjStsBcst::from_bitbuf(hdr, buffer)?;
    tracing::debug!("<- {}", pdu);
    if let (Some(downlink), Some(uplink)) = (tsys.freq_table.resolve_freq(pdu.channel_t), tsys.freq_table.resolve_freq(pdu.channel_r)) {
        tsys.adjacent.insert(downlink, AdjacentSite {
            sysid: pdu.sysid,
            rfss_id: pdu.rfss_id,
            site_id: pdu.site_id,
            uplink,
        });
    }
    Ok(0)
}


#[cfg(test)]
mod tests {
    use super::*;
    use p25_core::IdenEntry;
    use p25_pdus::mbt::mbt_header::assemble_mbt;
    use p25_pdus::tsbk::tsbk_header::{assemble_tsbk, pack_body};

    fn hex(s: &str) -> Vec<u8> {
        (0..s.len()).step_by(2).map(|i| u8::from_str_radix(&s[i..i + 2], 16).unwrap()).collect()
    }

    fn t(secs: f64) -> Timestamp {
        Timestamp::from_secs_f64(secs)
    }

    /// Band plan with table 3 at 851.0125 MHz, 12.5 kHz spacing
    fn tsys_with_plan() -> TrunkedSystem {
        let mut tsys = TrunkedSystem::new(0x293);
        let iden = pack_body(&[(3, 4), (0x64, 9), (0x0B4, 9), (100, 10), (170_202_500, 32)]);
        tsys.decode_tsbk(&assemble_tsbk(false, 0x3D, 0x00, iden), t(0.0));
        tsys
    }

    #[test]
    fn test_iden_up_installs_entry() {
        let tsys = tsys_with_plan();
        let e = tsys.freq_table.get(3).unwrap();
        assert_eq!(e.base_hz, 851_012_500);
        assert_eq!(e.offset_hz, -45_000_000);
        assert_eq!(tsys.stats.tsbks, 1);
    }

    #[test]
    fn test_rfss_sts_bcst_vector() {
        let mut tsys = TrunkedSystem::new(0x293);
        tsys.freq_table.install(3, IdenEntry { base_hz: 851_012_500, step_hz: 12_500, offset_hz: -45_000_000, tdma_slots: None });
        assert_eq!(tsys.decode_tsbk(&hex("3A000012AE01013348704A54"), t(1.0)), 0);
        let rf = tsys.rfss.unwrap();
        assert_eq!((rf.sysid, rf.rfss_id, rf.site_id), (0x2AE, 1, 1));
        assert_eq!(rf.downlink, 851_012_500 + 0x348 * 12_500);
        assert_eq!(rf.uplink, rf.downlink - 45_000_000);
        assert_eq!(tsys.stats.crc_errors, 0);
    }

    #[test]
    fn test_site_status_without_plan_is_ignored() {
        let mut tsys = TrunkedSystem::new(0x293);
        tsys.decode_tsbk(&hex("3A000012AE01013348704A54"), t(1.0));
        assert!(tsys.rfss.is_none());
        tsys.decode_tsbk(&hex("BB0000BEE003BA016B70EFCF"), t(1.0));
        assert!(tsys.net.is_none());
    }

    #[test]
    fn test_net_sts_bcst_vector() {
        let mut tsys = TrunkedSystem::new(0x293);
        tsys.freq_table.install(0, IdenEntry { base_hz: 851_006_250, step_hz: 6250, offset_hz: -45_000_000, tdma_slots: None });
        tsys.decode_tsbk(&hex("BB0000BEE003BA016B70EFCF"), t(1.0));
        let net = tsys.net.unwrap();
        assert_eq!(net.wacn, 0xBEE00);
        assert_eq!(net.sysid, 0x3BA);
        assert_eq!(net.control_freq, 851_006_250 + 0x16B * 6250);
    }

    #[test]
    fn test_grant_returns_update_count() {
        let mut tsys = tsys_with_plan();
        let grant = pack_body(&[(0, 8), (0x3000 | 76, 16), (1082, 16), (7_560_940, 24)]);
        assert_eq!(tsys.decode_tsbk(&assemble_tsbk(true, 0x00, 0x00, grant), t(2.0)), 1);
        assert_eq!(tsys.talkgroups[&1082].frequency, 851_962_500);
    }

    #[test]
    fn test_protected_grant() {
        let mut tsys = tsys_with_plan();
        let grant = pack_body(&[(0x40, 8), (0x3000 | 76, 16), (1082, 16), (1, 24)]);
        assert_eq!(tsys.decode_tsbk(&assemble_tsbk(true, 0x00, 0x00, grant), t(2.0)), 0);
        assert!(tsys.encrypted.contains(&1082));
        assert!(tsys.talkgroups.is_empty());
    }

    #[test]
    fn test_vendor_grant_keyed_on_mfid() {
        let mut tsys = tsys_with_plan();
        // Standard 0x02 is a two-channel update; Motorola 0x02 is a supergroup grant
        let std_updt = pack_body(&[(0x3001, 16), (10, 16), (0x3002, 16), (11, 16)]);
        assert_eq!(tsys.decode_tsbk(&assemble_tsbk(false, 0x02, 0x00, std_updt), t(1.0)), 2);
        let mot_grant = pack_body(&[(0, 8), (0x3003, 16), (12, 16), (1, 24)]);
        assert_eq!(tsys.decode_tsbk(&assemble_tsbk(false, 0x02, 0x90, mot_grant), t(1.0)), 1);
        assert_eq!(tsys.talkgroups.keys().copied().collect::<Vec<_>>(), vec![10, 11, 12]);
    }

    #[test]
    fn test_unknown_pair_counts_only() {
        let mut tsys = tsys_with_plan();
        let before = tsys.clone();
        assert_eq!(tsys.decode_tsbk(&assemble_tsbk(false, 0x3E, 0x00, 0x1234), t(1.0)), 0);
        assert_eq!(tsys.decode_tsbk(&assemble_tsbk(false, 0x20, 0x90, 0), t(1.0)), 0);
        assert_eq!(tsys.decode_tsbk(&assemble_tsbk(false, 0x00, 0x55, 0), t(1.0)), 0);
        assert_eq!(tsys.stats.unknown, 3);
        assert_eq!(tsys.stats.malformed, 0);
        assert_eq!(tsys.stats.tsbks, before.stats.tsbks + 3);
        assert!(tsys.talkgroups.is_empty());
    }

    #[test]
    fn test_short_word_is_malformed() {
        let mut tsys = tsys_with_plan();
        assert_eq!(tsys.decode_tsbk(&[0x00, 0x00, 0x01], t(1.0)), 0);
        assert_eq!(tsys.stats.malformed, 1);
        assert_eq!(tsys.decode_mbt(&assemble_mbt(0x3A, 0x2AE, 0, 0, 0)[..12], t(1.0)), 0);
        assert_eq!(tsys.stats.malformed, 2);
    }

    #[test]
    fn test_crc_mismatch_counted_not_gating() {
        let mut tsys = TrunkedSystem::new(0x293);
        tsys.freq_table.install(3, IdenEntry { base_hz: 851_012_500, step_hz: 12_500, offset_hz: -45_000_000, tdma_slots: None });
        tsys.decode_tsbk(&hex("3A001012AE01013348704A54"), t(1.0));
        assert_eq!(tsys.stats.crc_errors, 1);
        assert!(tsys.rfss.is_some());
    }

    #[test]
    fn test_decode_only_messages() {
        let mut tsys = tsys_with_plan();
        assert_eq!(tsys.decode_tsbk(&hex("B3A4A60A231070800236C038"), t(1.0)), 0);
        assert_eq!(tsys.decode_tsbk(&hex("300000042C1E432C053C0000"), t(1.0)), 0);
        assert_eq!(tsys.stats.unknown, 0);
        assert_eq!(tsys.stats.malformed, 0);
    }

    #[test]
    fn test_sccb_secondary_channels() {
        let mut tsys = tsys_with_plan();
        let body = pack_body(&[(1, 8), (1, 8), (0x3010, 16), (0x70, 8), (0x3002, 16), (0x70, 8)]);
        tsys.decode_tsbk(&assemble_tsbk(false, 0x39, 0x00, body), t(1.0));
        let freqs: Vec<u64> = tsys.secondary.iter().copied().collect();
        assert_eq!(freqs, vec![851_012_500 + 2 * 12_500, 851_012_500 + 16 * 12_500]);
    }

    #[test]
    fn test_adj_sts_bcst() {
        let mut tsys = tsys_with_plan();
        let body = pack_body(&[(0, 8), (0b0010, 4), (0x2AE, 12), (2, 8), (5, 8), (0x3004, 16), (0x70, 8)]);
        tsys.decode_tsbk(&assemble_tsbk(false, 0x3C, 0x00, body), t(1.0));
        let adj = &tsys.adjacent[&(851_012_500 + 4 * 12_500)];
        assert_eq!((adj.rfss_id, adj.site_id), (2, 5));
        assert_eq!(adj.uplink, 851_012_500 + 4 * 12_500 - 45_000_000);
    }

    #[test]
    fn test_iden_up_tdma_unknown_type_not_installed() {
        let mut tsys = TrunkedSystem::new(0x293);
        let body = pack_body(&[(4, 4), (9, 4), (0, 14), (100, 10), (170_202_500, 32)]);
        tsys.decode_tsbk(&assemble_tsbk(false, 0x33, 0x00, body), t(1.0));
        assert!(tsys.freq_table.get(4).is_none());
        // Vendor variant is decoded only
        let body = pack_body(&[(4, 4), (3, 4), (0, 14), (100, 10), (170_202_500, 32)]);
        tsys.decode_tsbk(&assemble_tsbk(false, 0x0D, 0x90, body), t(1.0));
        assert!(tsys.freq_table.get(4).is_none());
    }

    #[test]
    fn test_mbt_net_and_grant() {
        let mut tsys = tsys_with_plan();
        let data: u128 = (0xBEE00u128 << 76) | (0x3001u128 << 56) | (0x3001u128 << 40);
        assert_eq!(tsys.decode_mbt(&assemble_mbt(0x3B, 0x3BA, 0, 0, data), t(1.0)), 0);
        assert_eq!(tsys.net.unwrap().wacn, 0xBEE00);
        assert_eq!(tsys.stats.mbts, 1);

        let data: u128 = (0x3005u128 << 64) | (0x3005u128 << 48) | (500u128 << 32);
        assert_eq!(tsys.decode_mbt(&assemble_mbt(0x00, 0x3BA, 0x00, 0, data), t(1.0)), 1);
        assert_eq!(tsys.talkgroups[&500].frequency, 851_012_500 + 5 * 12_500);

        let data: u128 = (0x3006u128 << 64) | (0x3006u128 << 48) | (501u128 << 32);
        assert_eq!(tsys.decode_mbt(&assemble_mbt(0x00, 0x3BA, 0x40, 0, data), t(1.0)), 0);
        assert!(tsys.encrypted.contains(&501));
    }

    #[test]
    fn test_mbt_status_needs_both_channels() {
        let mut tsys = tsys_with_plan();
        let data: u128 = (1u128 << 88) | (2u128 << 80) | (0x3001u128 << 64) | (0x7001u128 << 48);
        tsys.decode_mbt(&assemble_mbt(0x3A, 0x2AE, 0, 0, data), t(1.0));
        assert!(tsys.rfss.is_none());
        let data: u128 = (1u128 << 88) | (2u128 << 80) | (0x3001u128 << 64) | (0x3002u128 << 48);
        tsys.decode_mbt(&assemble_mbt(0x3A, 0x2AE, 0, 0, data), t(1.0));
        assert_eq!(tsys.rfss.unwrap().uplink, 851_012_500 + 2 * 12_500);

        let data: u128 = (0x3007u128 << 80) | (0x3008u128 << 64);
        tsys.decode_mbt(&assemble_mbt(0x3C, 0x2AE, 4, 6, data), t(1.0));
        assert_eq!(tsys.adjacent[&(851_012_500 + 7 * 12_500)].site_id, 6);

        tsys.decode_mbt(&assemble_mbt(0x15, 0x2AE, 0, 0, 0), t(1.0));
        assert_eq!(tsys.stats.unknown, 1);
    }

    #[test]
    fn test_regrant_is_idempotent() {
        let mut tsys = tsys_with_plan();
        let grant = assemble_tsbk(true, 0x00, 0x00, pack_body(&[(0, 8), (0x3000 | 76, 16), (1082, 16), (1, 24)]));
        tsys.decode_tsbk(&grant, t(2.0));
        let first = tsys.talkgroups[&1082].clone();
        let first_vf = tsys.voice_frequencies.clone();
        tsys.decode_tsbk(&grant, t(2.0));
        let second = &tsys.talkgroups[&1082];
        assert_eq!((second.updated, second.frequency, second.slot), (first.updated, first.frequency, first.slot));
        assert_eq!(tsys.voice_frequencies.keys().collect::<Vec<_>>(), first_vf.keys().collect::<Vec<_>>());
        assert_eq!(tsys.voice_frequencies[&851_962_500].tgids, first_vf[&851_962_500].tgids);
    }

    #[test]
    fn test_decode_resets_cc_misses() {
        let mut tsys = tsys_with_plan();
        tsys.cc_timeouts = 4;
        tsys.decode_tsbk(&assemble_tsbk(false, 0x3E, 0x00, 0), t(3.0));
        assert_eq!(tsys.cc_timeouts, 0);
        assert_eq!(tsys.last_tsbk, Some(t(3.0)));
    }
}
