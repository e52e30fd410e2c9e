mod common;

use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

use p25_config::CfgNetwork;
use p25_core::{debug, Modulation};
use p25_entities::{FrameKind, RxCtl, RxEvent, RxMessage, RxState, TuneCmd, WorkerPool};
use common::*;

const INPUT_RATE: u32 = 2_400_000;

fn recorder(networks: Vec<CfgNetwork>, workers: usize) -> (RxCtl, Rc<RefCell<Vec<TuneCmd>>>, Rc<RefCell<Vec<WorkerCall>>>) {
    let (setter, tuned) = RecordingSetter::new();
    let mut rx = RxCtl::new(&config(networks), Some(Box::new(setter)), t(0));
    let (pool, calls) = RecordingWorker::pool(workers);
    rx.attach_workers(WorkerPool::new(pool), INPUT_RATE);
    (rx, tuned, calls)
}

/// No two bindings share a worker, no binding is empty, and busy workers match the bindings
fn assert_pool_invariants(rx: &RxCtl) {
    let sched = rx.scheduler().unwrap();
    let workers: Vec<usize> = sched.bindings().values().map(|b| b.worker).collect();
    let unique: BTreeSet<usize> = workers.iter().copied().collect();
    assert_eq!(unique.len(), workers.len());
    assert!(sched.bindings().values().all(|b| !b.tgids.is_empty()));
    assert_eq!(sched.pool().busy_count(), workers.len());
}

#[test]
fn test_grant_hold_and_release() {
    debug::setup_logging_verbose();
    let (mut rx, tuned, calls) = recorder(vec![default_network()], 1);

    rx.process_message(tsbk(NAC, default_plan_word()), t(10));
    rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 153), 1082)), t(1000));
    {
        let sched = rx.scheduler().unwrap();
        assert_eq!(sched.frequency_of(1082), Some(VOICE_FREQ));
        assert_eq!(sched.pool().idle_count(), 0);
    }
    assert_eq!(
        *calls.borrow(),
        vec![
            WorkerCall::Modulation(0, Modulation::Cqpsk),
            WorkerCall::RelativeFrequency(0, 851_500_000 - VOICE_FREQ as i64),
            WorkerCall::Output(0, "tgid-1082-1.000.wav".to_string(), 0),
            WorkerCall::SymbolRate(0, 4800),
        ]
    );
    assert_pool_invariants(&rx);

    // The follow state machine still tracks the call
    rx.update_state(RxEvent::Update, t(1000));
    assert_eq!(rx.state(), RxState::TransitionToVoice);
    assert_eq!(rx.current_tgid(), Some(1082));
    rx.update_state(RxEvent::VoiceFrameValid { tdma: false }, t(1100));
    assert_eq!(rx.state(), RxState::Voice);

    // Past the talkgroup hold without refresh
    rx.process_message(RxMessage::Timeout, t(2500));
    assert_eq!(rx.scheduler().unwrap().bindings().len(), 1);
    rx.process_message(RxMessage::Timeout, t(3500));
    let sched = rx.scheduler().unwrap();
    assert!(sched.bindings().is_empty());
    assert_eq!(sched.pool().idle_count(), 1);
    assert_eq!(rx.state(), RxState::ControlChannel);
    assert_eq!(tuned.borrow().last().map(|c| c.freq), Some(CC1));

    let calls = calls.borrow();
    let n = calls.len();
    assert_eq!(calls[n - 2], WorkerCall::Output(0, format!("idle-channel-{}-0-3.500.wav", VOICE_FREQ), 0));
    assert_eq!(calls[n - 1], WorkerCall::RelativeFrequency(0, 0));
}

#[test]
fn test_refresh_keeps_binding() {
    let (mut rx, _, calls) = recorder(vec![default_network()], 1);
    rx.process_message(tsbk(NAC, default_plan_word()), t(10));
    for ms in [1000, 2000, 3000, 4000] {
        rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 153), 1082)), t(ms));
        rx.process_message(RxMessage::Timeout, t(ms + 500));
    }
    assert_eq!(rx.scheduler().unwrap().frequency_of(1082), Some(VOICE_FREQ));
    // One binding, one sink: repeated grants only refresh
    let outputs = calls.borrow().iter().filter(|c| matches!(c, WorkerCall::Output(..))).count();
    assert_eq!(outputs, 1);
}

#[test]
fn test_pool_exhaustion_retries_next_pass() {
    let (mut rx, _, _) = recorder(vec![default_network()], 1);
    rx.process_message(tsbk(NAC, default_plan_word()), t(10));
    rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 153), 1082)), t(1000));
    rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 160), 5)), t(1000));
    {
        let sched = rx.scheduler().unwrap();
        assert_eq!(sched.frequency_of(1082), Some(VOICE_FREQ));
        assert_eq!(sched.frequency_of(5), None);
    }
    assert_pool_invariants(&rx);

    rx.process_message(RxMessage::Timeout, t(3500));
    assert!(rx.scheduler().unwrap().bindings().is_empty());
    rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 160), 5)), t(3600));
    assert_eq!(rx.scheduler().unwrap().frequency_of(5), Some(851_006_250 + 160 * 6250));
    assert_pool_invariants(&rx);
}

#[test]
fn test_pool_size_bounds_bindings() {
    let (mut rx, _, _) = recorder(vec![default_network()], 2);
    rx.process_message(tsbk(NAC, default_plan_word()), t(10));
    rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 153), 1082)), t(1000));
    rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 160), 5)), t(1000));
    rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 170), 6)), t(1000));
    let sched = rx.scheduler().unwrap();
    assert_eq!(sched.bindings().len(), 2);
    assert_eq!(sched.frequency_of(6), None);
    assert_pool_invariants(&rx);
}

#[test]
fn test_encrypted_and_denied_never_bound() {
    let mut net = default_network();
    net.blacklist = BTreeSet::from([5]);
    let (mut rx, _, _) = recorder(vec![net], 2);
    rx.process_message(tsbk(NAC, default_plan_word()), t(10));
    rx.process_message(tsbk(NAC, grant_word(true, channel(IDEN, 153), 1082)), t(1000));
    rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 160), 5)), t(1000));
    let sched = rx.scheduler().unwrap();
    assert!(sched.bindings().is_empty());
    assert_eq!(sched.pool().idle_count(), 2);
}

#[test]
fn test_tdma_descrambling_key() {
    let (mut rx, _, calls) = recorder(vec![default_network()], 2);
    rx.process_message(tsbk(NAC, default_plan_word()), t(10));
    rx.process_message(tsbk(NAC, iden_up_tdma_word(2, 3, 12_500, 851_006_250)), t(20));

    // Without the network identity the TDMA binding waits
    rx.process_message(tsbk(NAC, grant_word(false, channel(2, 21), 300)), t(1000));
    assert!(rx.scheduler().unwrap().bindings().is_empty());

    rx.process_message(tsbk(NAC, net_sts_word(0xBEE00, 0x2AE, channel(IDEN, 2))), t(1010));
    rx.process_message(tsbk(NAC, grant_word(false, channel(2, 21), 300)), t(1020));
    rx.process_message(tsbk(NAC, grant_word(false, channel(2, 20), 301)), t(1030));

    let carrier = 851_006_250 + 10 * 12_500;
    let sched = rx.scheduler().unwrap();
    assert_eq!(sched.bindings().len(), 1);
    assert_eq!(sched.bindings()[&carrier].tgids[&300].slot, Some(1));
    assert_eq!(sched.bindings()[&carrier].tgids[&301].slot, Some(0));
    assert_eq!(sched.cached_keys(), 1);

    let calls = calls.borrow();
    let keys: Vec<&WorkerCall> = calls.iter().filter(|c| matches!(c, WorkerCall::DescramblingKey { .. })).collect();
    assert_eq!(keys.len(), 2);
    assert_eq!(*keys[0], WorkerCall::DescramblingKey { worker: 0, tag: "2932aebee00".to_string(), slot: 1, len: 4320 });
    assert_eq!(*keys[1], WorkerCall::DescramblingKey { worker: 0, tag: "2932aebee00".to_string(), slot: 0, len: 4320 });
    assert!(calls.contains(&WorkerCall::SymbolRate(0, 6000)));
}

/// Recorder with a TDMA band plan (iden 2, two slots) and a known network identity
fn tdma_recorder() -> (RxCtl, Rc<RefCell<Vec<WorkerCall>>>) {
    let (mut rx, _, calls) = recorder(vec![default_network()], 2);
    rx.process_message(tsbk(NAC, default_plan_word()), t(10));
    rx.process_message(tsbk(NAC, iden_up_tdma_word(2, 3, 12_500, 851_006_250)), t(20));
    rx.process_message(tsbk(NAC, net_sts_word(0xBEE00, 0x2AE, channel(IDEN, 2))), t(30));
    (rx, calls)
}

#[test]
fn test_tdma_slot_switch_reroutes_output_and_key() {
    let (mut rx, calls) = tdma_recorder();
    let carrier = 851_006_250 + 10 * 12_500;

    rx.process_message(tsbk(NAC, grant_word(false, channel(2, 21), 300)), t(1000));
    assert_eq!(rx.scheduler().unwrap().bindings()[&carrier].tgids[&300].slot, Some(1));
    let before = calls.borrow().len();

    // Same carrier, other slot
    rx.process_message(tsbk(NAC, grant_word(false, channel(2, 20), 300)), t(1020));
    {
        let sched = rx.scheduler().unwrap();
        assert_eq!(sched.bindings().len(), 1);
        assert_eq!(sched.bindings()[&carrier].tgids.len(), 1);
        assert_eq!(sched.bindings()[&carrier].tgids[&300].slot, Some(0));
    }
    assert_pool_invariants(&rx);

    let calls = calls.borrow();
    let switched = &calls[before..];
    assert!(switched.contains(&WorkerCall::Output(0, "tgid-300-1.020.wav".to_string(), 0)));
    assert!(switched.contains(&WorkerCall::DescramblingKey { worker: 0, tag: "2932aebee00".to_string(), slot: 0, len: 4320 }));
    assert!(switched.contains(&WorkerCall::SymbolRate(0, 6000)));
    // The carrier stays where it was
    assert!(!switched.iter().any(|c| matches!(c, WorkerCall::RelativeFrequency(..))));
}

#[test]
fn test_new_talkgroup_supersedes_slot() {
    let (mut rx, calls) = tdma_recorder();
    let carrier = 851_006_250 + 10 * 12_500;

    rx.process_message(tsbk(NAC, grant_word(false, channel(2, 21), 300)), t(1000));
    rx.process_message(tsbk(NAC, grant_word(false, channel(2, 20), 301)), t(1010));
    rx.process_message(tsbk(NAC, grant_word(false, channel(2, 21), 302)), t(1030));

    let sched = rx.scheduler().unwrap();
    let tgids = &sched.bindings()[&carrier].tgids;
    assert!(!tgids.contains_key(&300));
    assert_eq!(tgids[&301].slot, Some(0));
    assert_eq!(tgids[&302].slot, Some(1));
    assert_eq!(sched.frequency_of(300), None);
    assert_eq!(sched.pool().busy_count(), 1);
    assert_pool_invariants(&rx);

    let calls = calls.borrow();
    assert!(calls.contains(&WorkerCall::Output(0, "tgid-302-1.030.wav".to_string(), 1)));
    assert!(calls.contains(&WorkerCall::DescramblingKey { worker: 0, tag: "2932aebee00".to_string(), slot: 1, len: 4320 }));
}

#[test]
fn test_talkgroup_never_on_two_frequencies() {
    let (mut rx, _, calls) = recorder(vec![default_network()], 2);
    rx.process_message(tsbk(NAC, default_plan_word()), t(10));
    rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 153), 1082)), t(1000));
    rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 160), 1082)), t(1200));
    let sched = rx.scheduler().unwrap();
    assert_eq!(sched.bindings().len(), 1);
    assert_eq!(sched.frequency_of(1082), Some(851_006_250 + 160 * 6250));
    assert_pool_invariants(&rx);
    assert!(calls.borrow().contains(&WorkerCall::RelativeFrequency(0, 0)));
}

#[test]
fn test_words_from_other_networks_do_not_schedule() {
    let other = CfgNetwork::new(0x1A1, vec![852_000_000]);
    let (mut rx, _, _) = recorder(vec![default_network(), other], 1);
    rx.process_message(tsbk(0x1A1, default_plan_word()), t(10));
    rx.process_message(tsbk(0x1A1, grant_word(false, channel(IDEN, 153), 1082)), t(1000));
    assert!(rx.scheduler().unwrap().bindings().is_empty());
    assert!(rx.system(0x1A1).unwrap().talkgroups.contains_key(&1082));
}

#[test]
fn test_voice_frames_do_not_retune_in_worker_mode() {
    let (mut rx, tuned, _) = recorder(vec![default_network()], 1);
    let before = tuned.borrow().len();
    rx.process_message(tsbk(NAC, default_plan_word()), t(10));
    rx.process_message(tsbk(NAC, grant_word(false, channel(IDEN, 153), 1082)), t(1000));
    rx.process_message(frame(NAC, FrameKind::Ldu1), t(1010));
    assert_eq!(rx.state(), RxState::ControlChannel);
    assert_eq!(tuned.borrow().len(), before);
}
