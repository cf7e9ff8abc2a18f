//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use crate::collections::NeighborKey;
use crate::error::Error;
use crate::gr::{self, GrExitReason};
use crate::instance::{InstanceArenas, InstanceUpView};
use crate::packet::lsa::{Lsa, LsaGrace};

// ===== Grace-LSA reception =====

pub fn process_grace_lsa(
    instance: &mut InstanceUpView<'_>,
    arenas: &mut InstanceArenas,
    lsa: &Lsa,
) -> Result<(), Error> {
    // Ignore LSAs other than Grace-LSAs.
    if !lsa.hdr.lsa_type.is_grace() {
        return Ok(());
    }

    // The restarting router is identified by the advertising router field.
    let router_id = lsa.hdr.adv_rtr;
    let (_, nbr) = arenas
        .neighbors
        .get_mut_by_router_id(router_id)
        .ok_or(Error::NeighborNotFound(router_id))?;

    // A flushed Grace-LSA signals that the neighbor restarted successfully.
    if lsa.hdr.is_maxage() {
        if nbr.gr.is_some() {
            gr::helper_exit(nbr, GrExitReason::Completed, instance);
        }
        return Ok(());
    }

    // Decode the Grace-LSA body.
    let grace_lsa = LsaGrace::decode(&mut lsa.body.clone())
        .map_err(|error| Error::GraceLsaDecodeError(router_id, error))?;

    // Run the helper eligibility checks.
    gr::helper_process_grace_lsa(nbr, &lsa.hdr, &grace_lsa, instance);

    Ok(())
}

// ===== Grace period timeout =====

pub fn process_grace_period_timeout(
    instance: &mut InstanceUpView<'_>,
    arenas: &mut InstanceArenas,
    nbr_key: NeighborKey,
) -> Result<(), Error> {
    // Lookup neighbor.
    let (_, nbr) = arenas.neighbors.get_mut_by_key(&nbr_key)?;

    // A timeout for a neighbor we're no longer helping is a stale callback.
    if nbr.gr.is_some() {
        // Exit from the helper mode.
        gr::helper_exit(nbr, GrExitReason::TimedOut, instance);
    }

    Ok(())
}
