//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;
use std::str::FromStr;
use std::sync::Arc;

use bytes::{Bytes, BytesMut};
use maplit::btreemap;
use ospf_gr_helper::collections::NeighborKey;
use ospf_gr_helper::debug::GrRejectReason;
use ospf_gr_helper::error::Error;
use ospf_gr_helper::events;
use ospf_gr_helper::gr::GrExitReason;
use ospf_gr_helper::instance::{Instance, InstanceChannelsRx};
use ospf_gr_helper::lsdb::LsaEntryFlags;
use ospf_gr_helper::neighbor::nsm;
use ospf_gr_helper::northbound::notification::{
    NbrRestartHelperStatus, Notification,
};
use ospf_gr_helper::northbound::state::gr_helper_state;
use ospf_gr_helper::packet::lsa::{Lsa, LsaGrace, LsaHdr, LsaType};
use ospf_gr_helper::packet::tlv::{GrReason, GrReasonTlv, GracePeriodTlv};

//
// Helper functions.
//

fn router_id(addr: &str) -> Ipv4Addr {
    Ipv4Addr::from_str(addr).unwrap()
}

fn setup() -> (Instance, InstanceChannelsRx) {
    let (mut instance, rx) = Instance::new("test".to_owned());
    instance.system.router_id = Some(router_id("1.1.1.1"));
    instance.gr_helper_enabled_set(true);
    instance.update();
    (instance, rx)
}

fn add_full_neighbor(instance: &mut Instance, router_id: Ipv4Addr) {
    let (_, nbr) = instance.arenas.neighbors.insert(router_id);
    nbr.state = nsm::State::Full;
}

fn grace_lsa(
    adv_rtr: Ipv4Addr,
    age: u16,
    grace_period: u32,
    reason: GrReason,
) -> Lsa {
    let grace = LsaGrace {
        grace_period: GracePeriodTlv::new(grace_period),
        gr_reason: GrReasonTlv::new(reason),
        unknown_tlvs: vec![],
    };
    let mut body = BytesMut::new();
    grace.encode(&mut body);

    let hdr = LsaHdr::new(
        age,
        LsaGrace::lsa_type(),
        router_id("0.0.0.3"),
        adv_rtr,
        0x80000001,
        0,
        20 + body.len() as u16,
    );
    Lsa {
        hdr,
        body: body.freeze(),
    }
}

fn process_grace_lsa(instance: &mut Instance, lsa: &Lsa) -> Result<(), Error> {
    let (mut instance, arenas) = instance.as_up().unwrap();
    events::process_grace_lsa(&mut instance, arenas, lsa)
}

fn process_grace_period_timeout(instance: &mut Instance, router_id: Ipv4Addr) {
    let (mut instance, arenas) = instance.as_up().unwrap();
    events::process_grace_period_timeout(
        &mut instance,
        arenas,
        NeighborKey::Value(router_id),
    )
    .unwrap();
}

fn helper_count(instance: &Instance) -> u32 {
    instance.state.as_ref().unwrap().gr_helper_count
}

fn last_exit_reason(instance: &Instance) -> Option<GrExitReason> {
    instance.state.as_ref().unwrap().gr_last_exit_reason
}

fn is_helping(instance: &Instance, router_id: Ipv4Addr) -> bool {
    let (_, nbr) =
        instance.arenas.neighbors.get_by_router_id(router_id).unwrap();
    nbr.gr.is_some()
}

fn rejected_reason(
    instance: &Instance,
    router_id: Ipv4Addr,
) -> Option<GrRejectReason> {
    let (_, nbr) =
        instance.arenas.neighbors.get_by_router_id(router_id).unwrap();
    nbr.gr_rejected_reason
}

fn last_notification(rx: &mut InstanceChannelsRx) -> Notification {
    let mut notification = None;
    while let Ok(msg) = rx.notification.try_recv() {
        notification = Some(msg);
    }
    notification.expect("no notification received")
}

//
// Tests.
//

#[test]
fn test_helper_enter() {
    let (mut instance, mut rx) = setup();
    let restarter = router_id("2.2.2.2");
    add_full_neighbor(&mut instance, restarter);

    let lsa = grace_lsa(restarter, 5, 120, GrReason::SoftwareRestart);
    process_grace_lsa(&mut instance, &lsa).unwrap();

    assert!(is_helping(&instance, restarter));
    assert_eq!(helper_count(&instance), 1);
    let Notification::NbrRestartHelperStatusChange(msg) =
        last_notification(&mut rx);
    assert_eq!(msg.neighbor_router_id, restarter);
    assert_eq!(msg.status, NbrRestartHelperStatus::Helping { age: 120 });
}

#[test]
fn test_helper_grace_period_capping() {
    let (mut instance, mut rx) = setup();
    instance.gr_supported_grace_period_set(1200);
    let restarter = router_id("2.2.2.2");
    add_full_neighbor(&mut instance, restarter);

    let lsa = grace_lsa(restarter, 0, 1800, GrReason::SoftwareRestart);
    process_grace_lsa(&mut instance, &lsa).unwrap();

    assert!(is_helping(&instance, restarter));
    let Notification::NbrRestartHelperStatusChange(msg) =
        last_notification(&mut rx);
    assert_eq!(msg.status, NbrRestartHelperStatus::Helping { age: 1200 });

    // Both the advertised and the capped grace periods are reported.
    let state = gr_helper_state(&instance).unwrap();
    let nbr = &state.neighbors[0];
    assert_eq!(nbr.router_id, restarter);
    assert_eq!(nbr.received_grace_period, Some(1800));
    assert_eq!(nbr.actual_grace_period, Some(1200));
}

#[test]
fn test_helper_rearm_is_idempotent() {
    let (mut instance, _rx) = setup();
    let restarter = router_id("2.2.2.2");
    add_full_neighbor(&mut instance, restarter);

    let lsa = grace_lsa(restarter, 5, 120, GrReason::SoftwareRestart);
    process_grace_lsa(&mut instance, &lsa).unwrap();
    process_grace_lsa(&mut instance, &lsa).unwrap();

    assert!(is_helping(&instance, restarter));
    assert_eq!(helper_count(&instance), 1);

    // A refreshed Grace-LSA updates the recorded restart parameters in place.
    let lsa = grace_lsa(restarter, 5, 300, GrReason::SoftwareUpgrade);
    process_grace_lsa(&mut instance, &lsa).unwrap();
    assert_eq!(helper_count(&instance), 1);
    let state = gr_helper_state(&instance).unwrap();
    let nbr = &state.neighbors[0];
    assert_eq!(nbr.received_grace_period, Some(300));
    assert_eq!(nbr.actual_grace_period, Some(300));
    assert_eq!(nbr.restart_reason, Some(GrReason::SoftwareUpgrade));
}

#[test]
fn test_helper_registry_gating() {
    let (mut instance, mut rx) = setup();
    instance.gr_helper_enabled_set(false);
    let restarter = router_id("2.2.2.2");
    add_full_neighbor(&mut instance, restarter);

    // Helper support is globally disabled and the restarter isn't registered.
    let lsa = grace_lsa(restarter, 5, 120, GrReason::SoftwareRestart);
    process_grace_lsa(&mut instance, &lsa).unwrap();
    assert!(!is_helping(&instance, restarter));
    assert_eq!(
        rejected_reason(&instance, restarter),
        Some(GrRejectReason::HelperDisabled)
    );
    let Notification::NbrRestartHelperStatusChange(msg) =
        last_notification(&mut rx);
    assert_eq!(
        msg.status,
        NbrRestartHelperStatus::Rejected {
            reject_reason: GrRejectReason::HelperDisabled
        }
    );

    // Registering the restarter grants helper support for it alone.
    instance.gr_enabled_router_add(restarter);
    process_grace_lsa(&mut instance, &lsa).unwrap();
    assert!(is_helping(&instance, restarter));
    assert_eq!(rejected_reason(&instance, restarter), None);
}

#[test]
fn test_helper_reject_not_full() {
    let (mut instance, _rx) = setup();
    let restarter = router_id("2.2.2.2");
    let (_, nbr) = instance.arenas.neighbors.insert(restarter);
    nbr.state = nsm::State::Exchange;

    let lsa = grace_lsa(restarter, 5, 120, GrReason::SoftwareRestart);
    process_grace_lsa(&mut instance, &lsa).unwrap();

    assert!(!is_helping(&instance, restarter));
    assert_eq!(helper_count(&instance), 0);
    assert_eq!(
        rejected_reason(&instance, restarter),
        Some(GrRejectReason::NeighborNotFull)
    );
}

#[test]
fn test_helper_reject_unplanned() {
    let (mut instance, _rx) = setup();
    instance.gr_helper_planned_only_set(true);
    let restarter = router_id("2.2.2.2");
    add_full_neighbor(&mut instance, restarter);

    let lsa = grace_lsa(restarter, 5, 120, GrReason::SoftwareUpgrade);
    process_grace_lsa(&mut instance, &lsa).unwrap();
    assert!(!is_helping(&instance, restarter));
    assert_eq!(
        rejected_reason(&instance, restarter),
        Some(GrRejectReason::UnplannedRestart)
    );

    // An operator-initiated restart is acceptable.
    let lsa = grace_lsa(restarter, 5, 120, GrReason::SoftwareRestart);
    process_grace_lsa(&mut instance, &lsa).unwrap();
    assert!(is_helping(&instance, restarter));
}

#[test]
fn test_helper_reject_topology_change() {
    let (mut instance, _rx) = setup();
    let restarter = router_id("2.2.2.2");
    add_full_neighbor(&mut instance, restarter);

    // Install an LSA that is still awaiting acknowledgment from the
    // restarting neighbor.
    let pending = grace_lsa(router_id("3.3.3.3"), 1, 60, GrReason::Unknown);
    let pending = Arc::new(pending);
    instance
        .state
        .as_mut()
        .unwrap()
        .lsdb
        .install(pending.clone(), LsaEntryFlags::PENDING_ACK);
    let (_, nbr) = instance
        .arenas
        .neighbors
        .get_mut_by_router_id(restarter)
        .unwrap();
    nbr.lists.ls_rxmt = btreemap! { pending.hdr.key() => pending.clone() };

    let lsa = grace_lsa(restarter, 5, 120, GrReason::SoftwareRestart);
    process_grace_lsa(&mut instance, &lsa).unwrap();
    assert!(!is_helping(&instance, restarter));
    assert_eq!(
        rejected_reason(&instance, restarter),
        Some(GrRejectReason::TopologyChange)
    );

    // The same retransmission list is harmless without strict LSA checking.
    instance.gr_helper_strict_lsa_checking_set(false);
    process_grace_lsa(&mut instance, &lsa).unwrap();
    assert!(is_helping(&instance, restarter));
}

#[test]
fn test_helper_reject_grace_period_expired() {
    let (mut instance, _rx) = setup();
    let restarter = router_id("2.2.2.2");
    add_full_neighbor(&mut instance, restarter);

    let lsa = grace_lsa(restarter, 120, 120, GrReason::SoftwareRestart);
    process_grace_lsa(&mut instance, &lsa).unwrap();

    assert!(!is_helping(&instance, restarter));
    assert_eq!(
        rejected_reason(&instance, restarter),
        Some(GrRejectReason::GracePeriodExpired)
    );
}

#[test]
fn test_helper_reject_first_failed_check_wins() {
    let (mut instance, _rx) = setup();
    let restarter = router_id("2.2.2.2");
    let (_, nbr) = instance.arenas.neighbors.insert(restarter);
    nbr.state = nsm::State::Exchange;

    // Both the adjacency check and the grace period check fail. The
    // adjacency check comes first, so it determines the rejection reason.
    let lsa = grace_lsa(restarter, 120, 120, GrReason::SoftwareRestart);
    process_grace_lsa(&mut instance, &lsa).unwrap();

    assert!(!is_helping(&instance, restarter));
    assert_eq!(
        rejected_reason(&instance, restarter),
        Some(GrRejectReason::NeighborNotFull)
    );
}

#[test]
fn test_helper_discontinuity_time() {
    let (mut instance, _rx) = setup();
    let restarter = router_id("2.2.2.2");
    add_full_neighbor(&mut instance, restarter);
    let t0 = instance.state.as_ref().unwrap().discontinuity_time;

    // Entering helper mode updates the statistics discontinuity time.
    std::thread::sleep(std::time::Duration::from_millis(5));
    let lsa = grace_lsa(restarter, 5, 120, GrReason::SoftwareRestart);
    process_grace_lsa(&mut instance, &lsa).unwrap();
    let t1 = instance.state.as_ref().unwrap().discontinuity_time;
    assert!(t1 > t0);

    // So does exiting helper mode.
    std::thread::sleep(std::time::Duration::from_millis(5));
    process_grace_period_timeout(&mut instance, restarter);
    let t2 = instance.state.as_ref().unwrap().discontinuity_time;
    assert!(t2 > t1);
}

#[test]
fn test_helper_timeout() {
    let (mut instance, mut rx) = setup();
    let restarter = router_id("2.2.2.2");
    add_full_neighbor(&mut instance, restarter);

    let lsa = grace_lsa(restarter, 5, 120, GrReason::SoftwareRestart);
    process_grace_lsa(&mut instance, &lsa).unwrap();
    assert_eq!(helper_count(&instance), 1);

    process_grace_period_timeout(&mut instance, restarter);
    assert!(!is_helping(&instance, restarter));
    assert_eq!(helper_count(&instance), 0);
    assert_eq!(last_exit_reason(&instance), Some(GrExitReason::TimedOut));
    let Notification::NbrRestartHelperStatusChange(msg) =
        last_notification(&mut rx);
    assert_eq!(
        msg.status,
        NbrRestartHelperStatus::NotHelping {
            exit_reason: GrExitReason::TimedOut
        }
    );

    // A stale timeout for a neighbor we're no longer helping is a no-op.
    process_grace_period_timeout(&mut instance, restarter);
    assert_eq!(helper_count(&instance), 0);
}

#[test]
fn test_helper_completed() {
    let (mut instance, _rx) = setup();
    let restarter = router_id("2.2.2.2");
    add_full_neighbor(&mut instance, restarter);

    let lsa = grace_lsa(restarter, 5, 120, GrReason::SoftwareRestart);
    process_grace_lsa(&mut instance, &lsa).unwrap();
    assert!(is_helping(&instance, restarter));

    // A flushed Grace-LSA means the neighbor restarted successfully.
    let lsa = grace_lsa(restarter, 3600, 120, GrReason::SoftwareRestart);
    process_grace_lsa(&mut instance, &lsa).unwrap();
    assert!(!is_helping(&instance, restarter));
    assert_eq!(helper_count(&instance), 0);
    assert_eq!(last_exit_reason(&instance), Some(GrExitReason::Completed));
}

#[test]
fn test_helper_decode_failure() {
    let (mut instance, _rx) = setup();
    let restarter = router_id("2.2.2.2");
    add_full_neighbor(&mut instance, restarter);

    // Grace-LSA with a truncated TLV.
    let mut lsa = grace_lsa(restarter, 5, 120, GrReason::SoftwareRestart);
    lsa.body = Bytes::from_static(&[0x00, 0x01, 0x00, 0x08]);
    let result = process_grace_lsa(&mut instance, &lsa);

    assert!(matches!(result, Err(Error::GraceLsaDecodeError(..))));
    assert!(!is_helping(&instance, restarter));
    // A malformed LSA isn't a policy rejection.
    assert_eq!(rejected_reason(&instance, restarter), None);
}

#[test]
fn test_helper_unknown_neighbor() {
    let (mut instance, _rx) = setup();

    let lsa = grace_lsa(router_id("2.2.2.2"), 5, 120, GrReason::SoftwareRestart);
    let result = process_grace_lsa(&mut instance, &lsa);

    assert!(matches!(result, Err(Error::NeighborNotFound(..))));
}

#[test]
fn test_helper_ignores_other_lsa_types() {
    let (mut instance, _rx) = setup();
    let restarter = router_id("2.2.2.2");
    add_full_neighbor(&mut instance, restarter);

    let mut lsa = grace_lsa(restarter, 5, 120, GrReason::SoftwareRestart);
    lsa.hdr.lsa_type = LsaType(0x2001);
    process_grace_lsa(&mut instance, &lsa).unwrap();

    assert!(!is_helping(&instance, restarter));
}

#[test]
fn test_helper_instance_stop() {
    let (mut instance, mut rx) = setup();
    let restarter = router_id("2.2.2.2");
    add_full_neighbor(&mut instance, restarter);

    let lsa = grace_lsa(restarter, 5, 120, GrReason::SoftwareRestart);
    process_grace_lsa(&mut instance, &lsa).unwrap();
    assert_eq!(helper_count(&instance), 1);

    // Stopping the instance cancels all active helper sessions.
    instance.system.router_id = None;
    instance.update();
    assert!(!instance.is_active());
    assert!(!is_helping(&instance, restarter));
    let Notification::NbrRestartHelperStatusChange(msg) =
        last_notification(&mut rx);
    assert_eq!(
        msg.status,
        NbrRestartHelperStatus::NotHelping {
            exit_reason: GrExitReason::TopologyChanged
        }
    );
}
