//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;

use crate::debug::GrRejectReason;
use crate::gr::GrExitReason;
use crate::instance::InstanceUpView;
use crate::neighbor::Neighbor;

// Northbound notifications.
#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum Notification {
    NbrRestartHelperStatusChange(NbrRestartHelperStatusChange),
}

#[derive(Clone, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub struct NbrRestartHelperStatusChange {
    pub protocol_name: String,
    pub neighbor_router_id: Ipv4Addr,
    pub status: NbrRestartHelperStatus,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[derive(Deserialize, Serialize)]
pub enum NbrRestartHelperStatus {
    Helping { age: u32 },
    NotHelping { exit_reason: GrExitReason },
    Rejected { reject_reason: GrRejectReason },
}

// ===== global functions =====

pub(crate) fn nbr_restart_helper_enter(
    instance: &InstanceUpView<'_>,
    nbr: &Neighbor,
    age: u32,
) {
    let notification =
        Notification::NbrRestartHelperStatusChange(NbrRestartHelperStatusChange {
            protocol_name: instance.name.to_owned(),
            neighbor_router_id: nbr.router_id,
            status: NbrRestartHelperStatus::Helping { age },
        });
    send(&instance.tx.notification, notification);
}

pub(crate) fn nbr_restart_helper_exit(
    instance: &InstanceUpView<'_>,
    nbr: &Neighbor,
    reason: GrExitReason,
) {
    let notification =
        Notification::NbrRestartHelperStatusChange(NbrRestartHelperStatusChange {
            protocol_name: instance.name.to_owned(),
            neighbor_router_id: nbr.router_id,
            status: NbrRestartHelperStatus::NotHelping {
                exit_reason: reason,
            },
        });
    send(&instance.tx.notification, notification);
}

pub(crate) fn nbr_restart_helper_reject(
    instance: &InstanceUpView<'_>,
    nbr: &Neighbor,
    reason: GrRejectReason,
) {
    let notification =
        Notification::NbrRestartHelperStatusChange(NbrRestartHelperStatusChange {
            protocol_name: instance.name.to_owned(),
            neighbor_router_id: nbr.router_id,
            status: NbrRestartHelperStatus::Rejected {
                reject_reason: reason,
            },
        });
    send(&instance.tx.notification, notification);
}

// ===== helper functions =====

fn send(
    notification_tx: &UnboundedSender<Notification>,
    notification: Notification,
) {
    // The receiver might be gone during shutdown.
    let _ = notification_tx.send(notification);
}
