//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

use std::collections::{BTreeMap, HashMap};
use std::net::Ipv4Addr;

use generational_arena::Index;
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::neighbor::Neighbor;

pub type ObjectId = u32;

#[derive(Clone, Debug)]
#[derive(Deserialize, Serialize)]
pub enum ObjectKey<T> {
    Id(ObjectId),
    Value(T),
}

pub type NeighborId = ObjectId;
pub type NeighborIndex = Index;
pub type NeighborKey = ObjectKey<Ipv4Addr>;

#[derive(Debug)]
pub struct Arena<T>(generational_arena::Arena<T>);

#[derive(Debug, Default)]
pub struct Neighbors {
    arena: Arena<Neighbor>,
    id_tree: HashMap<NeighborId, NeighborIndex>,
    router_id_tree: BTreeMap<Ipv4Addr, NeighborIndex>,
    next_id: NeighborId,
}

// ===== impl ObjectKey =====

impl<T> From<ObjectId> for ObjectKey<T> {
    fn from(id: ObjectId) -> ObjectKey<T> {
        ObjectKey::Id(id)
    }
}

// ===== impl Arena =====

impl<T> Arena<T> {
    pub(crate) fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<T> Default for Arena<T> {
    fn default() -> Arena<T> {
        Arena(Default::default())
    }
}

impl<T> std::ops::Index<Index> for Arena<T> {
    type Output = T;

    fn index(&self, index: Index) -> &Self::Output {
        &self.0[index]
    }
}

impl<T> std::ops::IndexMut<Index> for Arena<T> {
    fn index_mut(&mut self, index: Index) -> &mut Self::Output {
        &mut self.0[index]
    }
}

// ===== impl Neighbors =====

impl Neighbors {
    pub fn insert(
        &mut self,
        router_id: Ipv4Addr,
    ) -> (NeighborIndex, &mut Neighbor) {
        // Create and insert neighbor into the arena.
        self.next_id += 1;
        let nbr = Neighbor::new(self.next_id, router_id);
        let nbr_idx = self.arena.0.insert(nbr);

        // Link neighbor to different collections.
        let nbr = &mut self.arena[nbr_idx];
        self.id_tree.insert(nbr.id, nbr_idx);
        self.router_id_tree.insert(nbr.router_id, nbr_idx);

        (nbr_idx, nbr)
    }

    pub fn delete(&mut self, nbr_idx: NeighborIndex) {
        let nbr = &mut self.arena[nbr_idx];

        // Unlink neighbor from different collections.
        self.id_tree.remove(&nbr.id);
        self.router_id_tree.remove(&nbr.router_id);

        // Remove neighbor from the arena.
        self.arena.0.remove(nbr_idx);
    }

    // Returns a mutable reference to the neighbor corresponding to the given
    // ID.
    pub(crate) fn get_mut_by_id(
        &mut self,
        id: NeighborId,
    ) -> Result<(NeighborIndex, &mut Neighbor), Error> {
        self.id_tree
            .get(&id)
            .copied()
            .map(move |nbr_idx| (nbr_idx, &mut self.arena[nbr_idx]))
            .filter(|(_, nbr)| nbr.id == id)
            .ok_or(Error::NeighborIdNotFound(id))
    }

    // Returns a reference to the neighbor corresponding to the given Router ID.
    pub fn get_by_router_id(
        &self,
        router_id: Ipv4Addr,
    ) -> Option<(NeighborIndex, &Neighbor)> {
        self.router_id_tree
            .get(&router_id)
            .copied()
            .map(|nbr_idx| (nbr_idx, &self.arena[nbr_idx]))
    }

    // Returns a mutable reference to the neighbor corresponding to the given
    // Router ID.
    pub fn get_mut_by_router_id(
        &mut self,
        router_id: Ipv4Addr,
    ) -> Option<(NeighborIndex, &mut Neighbor)> {
        self.router_id_tree
            .get(&router_id)
            .copied()
            .map(move |nbr_idx| (nbr_idx, &mut self.arena[nbr_idx]))
    }

    // Returns a mutable reference to the neighbor corresponding to the given
    // object key.
    pub(crate) fn get_mut_by_key(
        &mut self,
        key: &NeighborKey,
    ) -> Result<(NeighborIndex, &mut Neighbor), Error> {
        match key {
            NeighborKey::Id(id) => self.get_mut_by_id(*id),
            NeighborKey::Value(router_id) => self
                .get_mut_by_router_id(*router_id)
                .ok_or(Error::NeighborNotFound(*router_id)),
        }
    }

    // Returns an iterator visiting all neighbors.
    //
    // Neighbors are ordered by their Router IDs.
    pub fn iter(&self) -> impl Iterator<Item = &Neighbor> + '_ {
        self.router_id_tree
            .values()
            .map(|nbr_idx| &self.arena[*nbr_idx])
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }
}
