//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::BTreeMap;
use std::sync::Arc;

use bitflags::bitflags;

use crate::packet::lsa::{Lsa, LsaKey};

// Link state database.
//
// Only the slice of the LSDB relevant to the GR helper is modeled here: a
// keyed view of installed LSAs plus the per-LSA acknowledgment-pending flag
// consulted by the strict LSA check.
#[derive(Debug, Default)]
pub struct Lsdb {
    tree: BTreeMap<LsaKey, LsaEntry>,
}

#[derive(Debug)]
pub struct LsaEntry {
    // LSA data.
    pub data: Arc<Lsa>,
    // LSA entry flags.
    pub flags: LsaEntryFlags,
}

bitflags! {
    #[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
    pub struct LsaEntryFlags: u8 {
        const RECEIVED = 0x01;
        const SELF_ORIGINATED = 0x02;
        // Set while the LSA awaits acknowledgment from at least one neighbor.
        const PENDING_ACK = 0x04;
    }
}

// ===== impl Lsdb =====

impl Lsdb {
    // Installs an LSA, replacing any previous instance under the same key.
    pub fn install(&mut self, lsa: Arc<Lsa>, flags: LsaEntryFlags) {
        let lsa_key = lsa.hdr.key();
        self.tree.insert(lsa_key, LsaEntry { data: lsa, flags });
    }

    pub fn remove(&mut self, lsa_key: &LsaKey) -> Option<LsaEntry> {
        self.tree.remove(lsa_key)
    }

    pub fn get(&self, lsa_key: &LsaKey) -> Option<&LsaEntry> {
        self.tree.get(lsa_key)
    }

    pub fn get_mut(&mut self, lsa_key: &LsaKey) -> Option<&mut LsaEntry> {
        self.tree.get_mut(lsa_key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&LsaKey, &LsaEntry)> {
        self.tree.iter()
    }

    pub fn lsa_count(&self) -> u32 {
        self.tree.len() as u32
    }
}
