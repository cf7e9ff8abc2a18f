//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::net::Ipv4Addr;

use tracing::{warn, warn_span};

use crate::collections::NeighborId;
use crate::packet::error::DecodeError;

// GR helper errors.
#[derive(Debug)]
pub enum Error {
    // Inter-task communication
    NeighborIdNotFound(NeighborId),
    NeighborNotFound(Ipv4Addr),
    // LSA input
    GraceLsaDecodeError(Ipv4Addr, DecodeError),
}

// ===== impl Error =====

impl Error {
    pub(crate) fn log(&self) {
        match self {
            Error::NeighborIdNotFound(nbr_id) => {
                warn!(?nbr_id, "{}", self);
            }
            Error::NeighborNotFound(router_id) => {
                warn!(%router_id, "{}", self);
            }
            Error::GraceLsaDecodeError(router_id, error) => {
                warn_span!("neighbor", %router_id).in_scope(|| {
                    warn!(%error, "{}", self);
                })
            }
        }
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::NeighborIdNotFound(..) => {
                write!(f, "neighbor ID not found")
            }
            Error::NeighborNotFound(..) => {
                write!(f, "neighbor not found")
            }
            Error::GraceLsaDecodeError(..) => {
                write!(f, "failed to decode Grace-LSA")
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::GraceLsaDecodeError(_, error) => Some(error),
            _ => None,
        }
    }
}
