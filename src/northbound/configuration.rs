//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::HashSet;
use std::net::Ipv4Addr;

use crate::instance::Instance;
use crate::packet::tlv::GRACE_PERIOD_MAX;

// Instance configuration data.
#[derive(Clone, Debug, Default)]
pub struct InstanceCfg {
    pub gr: GrCfg,
}

// Graceful restart helper configuration.
#[derive(Clone, Debug)]
pub struct GrCfg {
    // Global helper support.
    pub helper_enabled: bool,
    // Reject helping when a pending topology change is detected.
    pub helper_strict_lsa_checking: bool,
    // Help planned restarts only.
    pub helper_planned_only: bool,
    // Maximum grace period granted to a restarting neighbor.
    pub supported_grace_period: u32,
    // Routers allowed to be helped regardless of the global knob.
    pub enabled_routers: HashSet<Ipv4Addr>,
}

// ===== impl GrCfg =====

impl Default for GrCfg {
    fn default() -> GrCfg {
        GrCfg {
            helper_enabled: false,
            helper_strict_lsa_checking: true,
            helper_planned_only: false,
            supported_grace_period: GRACE_PERIOD_MAX,
            enabled_routers: Default::default(),
        }
    }
}

// ===== impl Instance =====

// Configuration mutators.
//
// None of these take effect on helper sessions that are already active (an
// armed grace timer keeps its original duration).
impl Instance {
    pub fn gr_helper_enabled_set(&mut self, enabled: bool) {
        self.config.gr.helper_enabled = enabled;
    }

    pub fn gr_helper_strict_lsa_checking_set(&mut self, enabled: bool) {
        self.config.gr.helper_strict_lsa_checking = enabled;
    }

    pub fn gr_helper_planned_only_set(&mut self, enabled: bool) {
        self.config.gr.helper_planned_only = enabled;
    }

    pub fn gr_supported_grace_period_set(&mut self, grace_period: u32) {
        self.config.gr.supported_grace_period = grace_period;
    }

    pub fn gr_enabled_router_add(&mut self, router_id: Ipv4Addr) {
        self.config.gr.enabled_routers.insert(router_id);
    }

    pub fn gr_enabled_router_remove(&mut self, router_id: Ipv4Addr) {
        self.config.gr.enabled_routers.remove(&router_id);
    }
}
