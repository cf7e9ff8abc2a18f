//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};

use crate::debug::GrRejectReason;
use crate::gr::GrExitReason;
use crate::instance::Instance;
use crate::packet::tlv::GrReason;

// Operational snapshot of the helper subsystem.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct GrHelperState {
    pub helper_count: u32,
    pub last_exit_reason: Option<GrExitReason>,
    pub neighbors: Vec<NeighborGrState>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct NeighborGrState {
    pub router_id: Ipv4Addr,
    pub helping: bool,
    // Seconds left on the grace timer while helping.
    pub remaining_time: Option<u64>,
    // Grace period advertised by the neighbor and the capped value in effect.
    pub received_grace_period: Option<u32>,
    pub actual_grace_period: Option<u32>,
    pub restart_reason: Option<GrReason>,
    pub rejected_reason: Option<GrRejectReason>,
}

// ===== global functions =====

// Renders the snapshot for external reporting.
pub fn gr_helper_state_json(
    instance: &Instance,
) -> Option<serde_json::Value> {
    let state = gr_helper_state(instance)?;
    serde_json::to_value(state).ok()
}

pub fn gr_helper_state(instance: &Instance) -> Option<GrHelperState> {
    let state = instance.state.as_ref()?;

    let neighbors = instance
        .arenas
        .neighbors
        .iter()
        .map(|nbr| NeighborGrState {
            router_id: nbr.router_id,
            helping: nbr.gr.is_some(),
            remaining_time: nbr
                .gr
                .as_ref()
                .map(|gr| gr.grace_period.remaining().as_secs()),
            received_grace_period: nbr
                .gr
                .as_ref()
                .map(|gr| gr.received_grace_period),
            actual_grace_period: nbr
                .gr
                .as_ref()
                .map(|gr| gr.actual_grace_period),
            restart_reason: nbr.gr.as_ref().map(|gr| gr.restart_reason),
            rejected_reason: nbr.gr_rejected_reason,
        })
        .collect();

    Some(GrHelperState {
        helper_count: state.gr_helper_count,
        last_exit_reason: state.gr_last_exit_reason,
        neighbors,
    })
}
