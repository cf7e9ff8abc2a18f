//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::time::Duration;

use crate::instance::InstanceUpView;
use crate::neighbor::Neighbor;
use crate::task::TimeoutTask;

//
// GR helper tasks diagram:
//
//                       +--------------+
//                       |  northbound  |
//                       +--------------+
//                             | ^
//                             | |
//          northbound_rx (1x) V | (1x) northbound_tx
//                       +--------------+
// grace_period_timer -> |   instance   |
//               (Nx)    +--------------+
//

// GR helper inter-task message types.
pub mod messages {
    use serde::{Deserialize, Serialize};

    use crate::collections::NeighborKey;

    // Type aliases.
    pub type ProtocolInputMsg = input::ProtocolMsg;

    // Input messages (child task -> main task).
    pub mod input {
        use super::*;

        #[derive(Debug, Deserialize, Serialize)]
        pub enum ProtocolMsg {
            GracePeriod(GracePeriodMsg),
        }

        #[derive(Debug, Deserialize, Serialize)]
        pub struct GracePeriodMsg {
            pub nbr_key: NeighborKey,
        }
    }
}

// ===== GR helper tasks =====

// Grace period timer task.
pub(crate) fn grace_period_timer(
    nbr: &Neighbor,
    instance: &InstanceUpView<'_>,
    grace_period: u32,
) -> TimeoutTask {
    #[cfg(not(feature = "testing"))]
    {
        let nbr_id = nbr.id;
        let grace_periodp = instance.tx.protocol_input.grace_period.clone();

        TimeoutTask::new(
            Duration::from_secs(grace_period.into()),
            move || async move {
                let _ = grace_periodp
                    .send(messages::input::GracePeriodMsg {
                        nbr_key: nbr_id.into(),
                    })
                    .await;
            },
        )
    }
    #[cfg(feature = "testing")]
    {
        TimeoutTask {}
    }
}
