//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{Receiver, Sender, UnboundedReceiver, UnboundedSender};

use crate::collections::Neighbors;
use crate::debug::{Debug, InstanceInactiveReason};
use crate::events;
use crate::gr::{self, GrExitReason};
use crate::lsdb::Lsdb;
use crate::northbound::configuration::InstanceCfg;
use crate::northbound::notification::Notification;
use crate::tasks::messages::ProtocolInputMsg;
use crate::tasks::messages::input::GracePeriodMsg;

pub struct Instance {
    // Instance name.
    pub name: String,
    // Instance system data.
    pub system: InstanceSys,
    // Instance configuration data.
    pub config: InstanceCfg,
    // Instance state data.
    pub state: Option<InstanceState>,
    // Instance arenas.
    pub arenas: InstanceArenas,
    // Instance Tx channels.
    pub tx: InstanceChannelsTx,
}

#[derive(Debug, Default)]
pub struct InstanceSys {
    pub router_id: Option<Ipv4Addr>,
}

#[derive(Debug)]
pub struct InstanceState {
    // Instance Router ID.
    pub router_id: Ipv4Addr,
    // LSDB of AS-scope LSAs.
    pub lsdb: Lsdb,
    // Statistics.
    pub discontinuity_time: DateTime<Utc>,
    // Number of neighbors performing a graceful restart.
    pub gr_helper_count: u32,
    // Reason for the last exit from helper mode.
    pub gr_last_exit_reason: Option<GrExitReason>,
}

#[derive(Debug, Default)]
pub struct InstanceArenas {
    pub neighbors: Neighbors,
}

#[derive(Clone, Debug)]
pub struct InstanceChannelsTx {
    // Protocol input channels.
    pub protocol_input: ProtocolInputChannelsTx,
    // Northbound notifications channel.
    pub notification: UnboundedSender<Notification>,
}

#[derive(Debug)]
pub struct InstanceChannelsRx {
    // Protocol input channels.
    pub protocol_input: ProtocolInputChannelsRx,
    // Northbound notifications channel.
    pub notification: UnboundedReceiver<Notification>,
}

#[derive(Clone, Debug)]
pub struct ProtocolInputChannelsTx {
    // Grace period timeout.
    pub grace_period: Sender<GracePeriodMsg>,
}

#[derive(Debug)]
pub struct ProtocolInputChannelsRx {
    // Grace period timeout.
    pub grace_period: Receiver<GracePeriodMsg>,
}

pub struct InstanceUpView<'a> {
    pub name: &'a str,
    pub system: &'a InstanceSys,
    pub config: &'a InstanceCfg,
    pub state: &'a mut InstanceState,
    pub tx: &'a InstanceChannelsTx,
}

// ===== impl Instance =====

impl Instance {
    pub fn new(name: String) -> (Instance, InstanceChannelsRx) {
        Debug::InstanceCreate.log();

        let (grace_period_tx, grace_period_rx) = mpsc::channel(4);
        let (notification_tx, notification_rx) = mpsc::unbounded_channel();

        let instance = Instance {
            name,
            system: Default::default(),
            config: Default::default(),
            state: None,
            arenas: Default::default(),
            tx: InstanceChannelsTx {
                protocol_input: ProtocolInputChannelsTx {
                    grace_period: grace_period_tx,
                },
                notification: notification_tx,
            },
        };
        let rx = InstanceChannelsRx {
            protocol_input: ProtocolInputChannelsRx {
                grace_period: grace_period_rx,
            },
            notification: notification_rx,
        };

        (instance, rx)
    }

    // Checks if the instance needs to be started or stopped in response to a
    // northbound or southbound event.
    pub fn update(&mut self) {
        match self.system.router_id {
            Some(router_id) if !self.is_active() => {
                self.start(router_id);
            }
            None if self.is_active() => {
                self.stop(InstanceInactiveReason::MissingRouterId);
            }
            _ => (),
        }
    }

    fn start(&mut self, router_id: Ipv4Addr) {
        Debug::InstanceStart.log();

        self.state = Some(InstanceState::new(router_id));
    }

    pub fn stop(&mut self, reason: InstanceInactiveReason) {
        if !self.is_active() {
            return;
        }

        Debug::InstanceStop(reason).log();

        // Cancel all active helper sessions before tearing down the state.
        if let Some((mut instance, arenas)) = self.as_up() {
            gr::helper_process_topology_change(&mut instance, arenas);
        }
        self.state = None;
    }

    pub fn is_active(&self) -> bool {
        self.state.is_some()
    }

    pub fn process_protocol_msg(&mut self, msg: ProtocolInputMsg) {
        // Ignore event if the instance isn't active.
        let Some((mut instance, arenas)) = self.as_up() else {
            return;
        };

        if let Err(error) = match msg {
            // Grace period timeout event.
            ProtocolInputMsg::GracePeriod(msg) => {
                events::process_grace_period_timeout(
                    &mut instance,
                    arenas,
                    msg.nbr_key,
                )
            }
        } {
            error.log();
        }
    }

    pub fn as_up(
        &mut self,
    ) -> Option<(InstanceUpView<'_>, &mut InstanceArenas)> {
        if let Some(state) = &mut self.state {
            let instance = InstanceUpView {
                name: &self.name,
                system: &self.system,
                config: &self.config,
                state,
                tx: &self.tx,
            };
            Some((instance, &mut self.arenas))
        } else {
            None
        }
    }
}

impl Drop for Instance {
    fn drop(&mut self) {
        Debug::InstanceDelete.log();
    }
}

// ===== impl InstanceState =====

impl InstanceState {
    fn new(router_id: Ipv4Addr) -> InstanceState {
        InstanceState {
            router_id,
            lsdb: Default::default(),
            discontinuity_time: Utc::now(),
            gr_helper_count: 0,
            gr_last_exit_reason: None,
        }
    }
}
