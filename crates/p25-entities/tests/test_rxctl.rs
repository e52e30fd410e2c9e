mod common;

use std::collections::BTreeSet;

use p25_core::debug;
use p25_entities::{FrameKind, RxCtl, RxEvent, RxMessage, RxState, UserCmd};
use p25_pdus::tsbk::tsbk_header::{assemble_tsbk, pack_body};
use common::*;

fn follower(networks: Vec<p25_config::CfgNetwork>) -> (RxCtl, std::rc::Rc<std::cell::RefCell<Vec<p25_entities::TuneCmd>>>) {
    let (setter, tuned) = RecordingSetter::new();
    let rx = RxCtl::new(&config(networks), Some(Box::new(setter)), t(0));
    (rx, tuned)
}

/// Installs the band plan and follows talkgroup 1082 onto `VOICE_FREQ`
fn follow_1082(rx: &mut RxCtl, at: i64) {
    rx.process_message(tsbk(NAC, default_plan_word()), t(at - 10));
    rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 153), 1082)), t(at));
}

#[test]
fn test_cc_miss_rotation() {
    debug::setup_logging_verbose();
    let (mut rx, tuned) = follower(vec![default_network()]);
    assert_eq!(tuned.borrow()[0].freq, CC1);

    for i in 1..=5 {
        rx.process_message(RxMessage::Timeout, t(100 * i));
    }
    assert_eq!(rx.state(), RxState::ControlChannel);
    assert_eq!(rx.system(NAC).unwrap().cc_timeouts, 5);
    assert_eq!(rx.system(NAC).unwrap().trunk_cc, CC1);

    rx.process_message(RxMessage::Timeout, t(600));
    let tsys = rx.system(NAC).unwrap();
    assert_eq!(tsys.trunk_cc, CC2);
    assert_eq!(tsys.cc_timeouts, 0);
    assert_eq!(tuned.borrow().last().map(|c| c.freq), Some(CC2));
}

#[test]
fn test_cc_rotation_wraps() {
    let (mut rx, _) = follower(vec![default_network()]);
    for i in 1..=12 {
        rx.process_message(RxMessage::Timeout, t(100 * i));
    }
    assert_eq!(rx.system(NAC).unwrap().trunk_cc, CC1);
}

#[test]
fn test_decoded_word_resets_misses() {
    let (mut rx, _) = follower(vec![default_network()]);
    for i in 1..=5 {
        rx.process_message(RxMessage::Timeout, t(100 * i));
    }
    rx.process_message(tsbk(NAC, default_plan_word()), t(550));
    rx.process_message(RxMessage::Timeout, t(600));
    assert_eq!(rx.system(NAC).unwrap().cc_timeouts, 1);
    assert_eq!(rx.system(NAC).unwrap().trunk_cc, CC1);
}

#[test]
fn test_grant_voice_and_return() {
    let (mut rx, tuned) = follower(vec![default_network()]);
    follow_1082(&mut rx, 20);

    assert_eq!(rx.state(), RxState::TransitionToVoice);
    assert_eq!(rx.current_tgid(), Some(1082));
    {
        let tuned = tuned.borrow();
        let cmd = tuned.last().unwrap();
        assert_eq!(cmd.freq, VOICE_FREQ);
        assert_eq!(cmd.tgid, Some(1082));
        assert_eq!(cmd.tag, "Talkgroup ID 1082 [0x43a]");
        assert_eq!(cmd.system, "County");
        assert_eq!(cmd.tdma_slot, None);
    }

    rx.process_message(frame(NAC, FrameKind::Ldu1), t(30));
    assert_eq!(rx.state(), RxState::Voice);
    assert_eq!(rx.tgid_hold(), Some(1082));

    rx.process_message(frame(NAC, FrameKind::Tdu), t(40));
    assert_eq!(rx.state(), RxState::ControlChannel);
    assert_eq!(tuned.borrow().last().map(|c| c.freq), Some(CC1));
}

#[test]
fn test_voice_timeout_returns_to_cc() {
    let (mut rx, tuned) = follower(vec![default_network()]);
    follow_1082(&mut rx, 20);
    rx.process_message(frame(NAC, FrameKind::Hdu), t(30));
    rx.process_message(RxMessage::Timeout, t(1500));
    assert_eq!(rx.state(), RxState::ControlChannel);
    assert_eq!(tuned.borrow().last().map(|c| c.freq), Some(CC1));
}

#[test]
fn test_tdma_grace_period() {
    let (mut rx, _) = follower(vec![default_network()]);
    follow_1082(&mut rx, 20);
    rx.process_message(frame(0xFFFF, FrameKind::TdmaVoice), t(30));
    assert_eq!(rx.state(), RxState::Voice);

    rx.process_message(RxMessage::Timeout, t(900));
    assert_eq!(rx.state(), RxState::Voice);
    rx.process_message(RxMessage::Timeout, t(1100));
    assert_eq!(rx.state(), RxState::ControlChannel);
}

#[test]
fn test_tdulc_counts_as_timeout() {
    let (mut rx, _) = follower(vec![default_network()]);
    rx.process_message(frame(NAC, FrameKind::Tdulc), t(10));
    assert_eq!(rx.system(NAC).unwrap().cc_timeouts, 1);
}

#[test]
fn test_encrypted_never_followed() {
    let (mut rx, tuned) = follower(vec![default_network()]);
    rx.process_message(tsbk(NAC, default_plan_word()), t(10));
    let before = tuned.borrow().len();

    rx.process_message(tsbk(NAC, grant_word(true, channel(IDEN, 153), 1082)), t(20));
    assert_eq!(rx.state(), RxState::ControlChannel);
    let tsys = rx.system(NAC).unwrap();
    assert!(tsys.encrypted.contains(&1082));
    assert!(!tsys.talkgroups.contains_key(&1082));

    // The encrypted mark is sticky, a later clear grant is ignored too
    rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 153), 1082)), t(30));
    assert_eq!(rx.state(), RxState::ControlChannel);
    assert!(!rx.system(NAC).unwrap().talkgroups.contains_key(&1082));
    assert_eq!(tuned.borrow().len(), before);
}

#[test]
fn test_allow_list() {
    let mut net = default_network();
    net.whitelist = Some(BTreeSet::from([5]));
    let (mut rx, _) = follower(vec![net]);
    follow_1082(&mut rx, 20);
    assert_eq!(rx.state(), RxState::ControlChannel);
    assert!(rx.system(NAC).unwrap().talkgroups.contains_key(&1082));

    rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 160), 5)), t(30));
    assert_eq!(rx.state(), RxState::TransitionToVoice);
    assert_eq!(rx.current_tgid(), Some(5));
}

#[test]
fn test_deny_list() {
    let mut net = default_network();
    net.blacklist = BTreeSet::from([1082]);
    let (mut rx, _) = follower(vec![net]);
    follow_1082(&mut rx, 20);
    assert_eq!(rx.state(), RxState::ControlChannel);
    assert_eq!(rx.current_tgid(), None);
}

#[test]
fn test_skip_expires() {
    let (mut rx, tuned) = follower(vec![default_network()]);
    follow_1082(&mut rx, 20);
    rx.process_message(RxMessage::Command(UserCmd::Skip), t(30));
    assert_eq!(rx.state(), RxState::ControlChannel);
    assert_eq!(rx.current_tgid(), None);
    assert_eq!(tuned.borrow().last().map(|c| c.freq), Some(CC1));
    assert_eq!(rx.system(NAC).unwrap().blacklist.get(&1082), Some(&Some(t(1030))));

    rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 153), 1082)), t(500));
    assert_eq!(rx.state(), RxState::ControlChannel);

    rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 153), 1082)), t(1100));
    assert_eq!(rx.state(), RxState::TransitionToVoice);
    assert!(rx.system(NAC).unwrap().blacklist.is_empty());
}

#[test]
fn test_lockout_is_permanent() {
    let (mut rx, _) = follower(vec![default_network()]);
    follow_1082(&mut rx, 20);
    rx.process_message(RxMessage::Command(UserCmd::Lockout), t(30));
    assert_eq!(rx.system(NAC).unwrap().blacklist.get(&1082), Some(&None));

    rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 153), 1082)), t(100_000));
    assert_eq!(rx.state(), RxState::ControlChannel);
    assert_eq!(rx.current_tgid(), None);
}

#[test]
fn test_skip_without_selection_is_noop() {
    let (mut rx, _) = follower(vec![default_network()]);
    rx.process_message(RxMessage::Command(UserCmd::Lockout), t(30));
    assert!(rx.system(NAC).unwrap().blacklist.is_empty());
}

#[test]
fn test_hold_prefers_pinned_talkgroup() {
    let (mut rx, _) = follower(vec![default_network()]);
    follow_1082(&mut rx, 20);
    rx.process_message(frame(NAC, FrameKind::Ldu2), t(30));
    rx.process_message(RxMessage::Command(UserCmd::Hold), t(40));
    rx.process_message(frame(NAC, FrameKind::Tdu), t(50));
    assert_eq!(rx.state(), RxState::ControlChannel);

    // Two-channel update naming a lower talkgroup first; the pin wins
    let body = pack_body(&[(channel(IDEN, 160) as u64, 16), (5, 16), (channel(IDEN, 153) as u64, 16), (1082, 16)]);
    rx.process_message(tsbk(NAC, assemble_tsbk(true, 0x02, 0x00, body).to_vec()), t(60_000));
    assert_eq!(rx.state(), RxState::TransitionToVoice);
    assert_eq!(rx.current_tgid(), Some(1082));

    rx.process_message(RxMessage::Command(UserCmd::Unhold), t(60_010));
    assert_eq!(rx.tgid_hold(), None);
    assert_eq!(rx.current_tgid(), None);
}

#[test]
fn test_without_hold_lowest_talkgroup_wins() {
    let (mut rx, _) = follower(vec![default_network()]);
    rx.process_message(tsbk(NAC, default_plan_word()), t(10));
    let body = pack_body(&[(channel(IDEN, 153) as u64, 16), (1082, 16), (channel(IDEN, 160) as u64, 16), (5, 16)]);
    rx.process_message(tsbk(NAC, assemble_tsbk(true, 0x02, 0x00, body).to_vec()), t(20));
    assert_eq!(rx.current_tgid(), Some(5));
}

#[test]
fn test_network_round_robin() {
    let mut second = p25_config::CfgNetwork::new(0x1A1, vec![852_000_000]);
    second.sysname = "City".to_string();
    let (mut rx, tuned) = follower(vec![default_network(), second]);

    rx.process_message(tsbk(NAC, default_plan_word()), t(10));
    assert_eq!(rx.current_nac(), Some(0x1A1));
    let cmd = tuned.borrow().last().cloned().unwrap();
    assert_eq!((cmd.freq, cmd.nac, cmd.system.as_str()), (852_000_000, 0x1A1, "City"));

    // Words for the other network still update its state
    rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 153), 1082)), t(20));
    assert_eq!(rx.state(), RxState::ControlChannel);
    assert!(rx.system(NAC).unwrap().talkgroups.contains_key(&1082));

    rx.process_message(RxMessage::Timeout, t(3010));
    assert_eq!(rx.current_nac(), Some(NAC));
}

#[test]
fn test_voice_holds_network() {
    let mut second = p25_config::CfgNetwork::new(0x1A1, vec![852_000_000]);
    second.sysname = "City".to_string();
    let (mut rx, _) = follower(vec![default_network(), second]);
    // First event rotates away and back is 3 s later; follow a call on the second lap
    rx.process_message(RxMessage::Timeout, t(10));
    rx.process_message(RxMessage::Timeout, t(3010));
    assert_eq!(rx.current_nac(), Some(NAC));
    follow_1082(&mut rx, 3100);
    rx.process_message(frame(NAC, FrameKind::Ldu1), t(3200));
    for ms in [4000, 5000, 6000] {
        rx.process_message(frame(NAC, FrameKind::Ldu2), t(ms));
        assert_eq!(rx.current_nac(), Some(NAC));
        assert_eq!(rx.state(), RxState::Voice);
    }
}

#[test]
fn test_update_event_outside_cc_ignored() {
    let (mut rx, _) = follower(vec![default_network()]);
    follow_1082(&mut rx, 20);
    rx.update_state(RxEvent::Update, t(25));
    assert_eq!(rx.state(), RxState::TransitionToVoice);
}

#[test]
fn test_status_dump() {
    let (mut rx, _) = follower(vec![default_network()]);
    follow_1082(&mut rx, 20);
    let dump = rx.to_string();
    assert!(dump.contains("NAC 0x293"));
    assert!(dump.contains("County"));
}
