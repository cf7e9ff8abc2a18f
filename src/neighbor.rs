//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;
use std::net::Ipv4Addr;
use std::sync::Arc;

use crate::collections::NeighborId;
use crate::debug::GrRejectReason;
use crate::packet::lsa::{Lsa, LsaKey};
use crate::packet::tlv::GrReason;
use crate::task::TimeoutTask;

#[derive(Debug)]
pub struct Neighbor {
    pub id: NeighborId,
    pub router_id: Ipv4Addr,
    pub state: nsm::State,
    pub lists: NeighborLsaLists,
    // Graceful restart helper state, present while acting as a helper for
    // this neighbor.
    pub gr: Option<NeighborGrHelper>,
    // Reason why the last attempt to enter helper mode was rejected.
    pub gr_rejected_reason: Option<GrRejectReason>,
}

#[derive(Debug, Default)]
pub struct NeighborLsaLists {
    // LSAs waiting to be acknowledged.
    pub ls_rxmt: BTreeMap<LsaKey, Arc<Lsa>>,
}

#[derive(Debug)]
pub struct NeighborGrHelper {
    pub restart_reason: GrReason,
    // Grace period advertised by the restarting neighbor.
    pub received_grace_period: u32,
    // Grace period actually granted, capped to the local maximum.
    pub actual_grace_period: u32,
    pub grace_period: TimeoutTask,
}

// Neighbor state machine.
pub mod nsm {
    use serde::{Deserialize, Serialize};

    #[derive(Clone, Copy, Debug, Default, Eq, Ord, PartialEq, PartialOrd)]
    #[derive(Deserialize, Serialize)]
    pub enum State {
        #[default]
        Down,
        Attempt,
        Init,
        TwoWay,
        ExStart,
        Exchange,
        Loading,
        Full,
    }
}

// ===== impl Neighbor =====

impl Neighbor {
    pub(crate) fn new(id: NeighborId, router_id: Ipv4Addr) -> Neighbor {
        Neighbor {
            id,
            router_id,
            state: nsm::State::Down,
            lists: Default::default(),
            gr: None,
            gr_rejected_reason: None,
        }
    }
}
