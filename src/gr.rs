//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::debug::{Debug, GrRejectReason};
use crate::instance::{InstanceArenas, InstanceUpView};
use crate::lsdb::{LsaEntryFlags, Lsdb};
use crate::neighbor::{Neighbor, NeighborGrHelper, nsm};
use crate::northbound::notification;
use crate::packet::lsa::{LsaGrace, LsaHdr};
use crate::packet::tlv::GrReason;
use crate::tasks;

// OSPF Graceful Restart exit reason.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum GrExitReason {
    Completed,
    TimedOut,
    TopologyChanged,
}

// ===== impl GrExitReason =====

impl std::fmt::Display for GrExitReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GrExitReason::Completed => {
                write!(f, "completed")
            }
            GrExitReason::TimedOut => {
                write!(f, "timed out")
            }
            GrExitReason::TopologyChanged => {
                write!(f, "topology changed")
            }
        }
    }
}

// ===== global functions =====

pub(crate) fn helper_process_grace_lsa(
    nbr: &mut Neighbor,
    lsa_hdr: &LsaHdr,
    grace_lsa: &LsaGrace,
    instance: &mut InstanceUpView<'_>,
) {
    let grace_period = grace_lsa.grace_period.get();
    let restart_reason = grace_lsa.gr_reason.get();

    // Check if helper mode is enabled in the configuration. Individual
    // routers can be granted helper support even when the global knob is
    // disabled.
    if !instance.config.gr.helper_enabled
        && !instance.config.gr.enabled_routers.contains(&nbr.router_id)
    {
        helper_reject(nbr, GrRejectReason::HelperDisabled, instance);
        return;
    }

    // Check if the neighbor is fully adjacent.
    if nbr.state != nsm::State::Full {
        helper_reject(nbr, GrRejectReason::NeighborNotFull, instance);
        return;
    }

    // Check if only planned restarts are allowed.
    if instance.config.gr.helper_planned_only && !restart_reason.is_planned() {
        helper_reject(nbr, GrRejectReason::UnplannedRestart, instance);
        return;
    }

    // Check for topology changes in the LSDB since the neighbor restarted.
    if instance.config.gr.helper_strict_lsa_checking
        && topology_change_pending(nbr, &instance.state.lsdb)
    {
        helper_reject(nbr, GrRejectReason::TopologyChange, instance);
        return;
    }

    // Check if the grace period has already expired.
    if lsa_hdr.age as u32 >= grace_period {
        helper_reject(nbr, GrRejectReason::GracePeriodExpired, instance);
        return;
    }

    // Cap the grace period to the locally supported maximum.
    let actual_grace_period =
        std::cmp::min(grace_period, instance.config.gr.supported_grace_period);

    // All checks have passed. Enter helper mode.
    helper_enter(
        nbr,
        grace_period,
        actual_grace_period,
        restart_reason,
        instance,
    );
}

pub fn helper_process_topology_change(
    instance: &mut InstanceUpView<'_>,
    arenas: &mut InstanceArenas,
) {
    // Iterate over all neighbors undergoing a graceful restart.
    let router_ids = arenas
        .neighbors
        .iter()
        .filter(|nbr| nbr.gr.is_some())
        .map(|nbr| nbr.router_id)
        .collect::<Vec<_>>();
    for router_id in router_ids {
        if let Some((_, nbr)) = arenas.neighbors.get_mut_by_router_id(router_id)
        {
            // Exit from the helper mode for this neighbor.
            helper_exit(nbr, GrExitReason::TopologyChanged, instance);
        }
    }
}

pub(crate) fn helper_exit(
    nbr: &mut Neighbor,
    reason: GrExitReason,
    instance: &mut InstanceUpView<'_>,
) {
    Debug::GrHelperExit(nbr.router_id, reason).log();
    notification::nbr_restart_helper_exit(instance, nbr, reason);

    // Stop the grace period timeout.
    nbr.gr = None;

    // Record the exit reason for external reporting.
    instance.state.gr_last_exit_reason = Some(reason);

    // Decrement the count of neighbors performing a graceful restart.
    instance.state.gr_helper_count -= 1;
    instance.state.discontinuity_time = Utc::now();
}

// ===== helper functions =====

fn helper_enter(
    nbr: &mut Neighbor,
    received_grace_period: u32,
    actual_grace_period: u32,
    restart_reason: GrReason,
    instance: &mut InstanceUpView<'_>,
) {
    Debug::GrHelperEnter(nbr.router_id, restart_reason, actual_grace_period)
        .log();
    notification::nbr_restart_helper_enter(instance, nbr, actual_grace_period);

    if let Some(gr) = &mut nbr.gr {
        // A new Grace-LSA from a neighbor we're already helping restarts the
        // grace period timeout without touching the counter.
        gr.restart_reason = restart_reason;
        gr.received_grace_period = received_grace_period;
        gr.actual_grace_period = actual_grace_period;
        gr.grace_period
            .reset(Some(Duration::from_secs(actual_grace_period.into())));
    } else {
        // Start the grace period timeout.
        let grace_period =
            tasks::grace_period_timer(nbr, instance, actual_grace_period);

        // Store information that this neighbor is undergoing a graceful
        // restart.
        nbr.gr = Some(NeighborGrHelper {
            restart_reason,
            received_grace_period,
            actual_grace_period,
            grace_period,
        });

        // Increment the count of neighbors performing a graceful restart.
        instance.state.gr_helper_count += 1;
        instance.state.discontinuity_time = Utc::now();
    }
    nbr.gr_rejected_reason = None;
}

fn helper_reject(
    nbr: &mut Neighbor,
    reason: GrRejectReason,
    instance: &mut InstanceUpView<'_>,
) {
    Debug::GrHelperReject(nbr.router_id, reason).log();
    notification::nbr_restart_helper_reject(instance, nbr, reason);
    nbr.gr_rejected_reason = Some(reason);
}

// Checks whether any LSA awaiting acknowledgment from the neighbor changed
// in the LSDB since the neighbor's last acknowledgment cycle began.
fn topology_change_pending(nbr: &Neighbor, lsdb: &Lsdb) -> bool {
    nbr.lists.ls_rxmt.keys().any(|lsa_key| {
        lsdb.get(lsa_key)
            .is_some_and(|lse| lse.flags.contains(LsaEntryFlags::PENDING_ACK))
    })
}
