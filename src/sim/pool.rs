//! Fixed-kind object pools
//!
//! Members are pre-allocated and recycled through their `active` flag.
//! `spawn` both claims and initializes a member, so a caller can never hold
//! an active member carrying stale state from its previous life.

use serde::{Deserialize, Serialize};

use super::entity::Body;

/// An entity kind that can live in a `Pool`
pub trait Poolable: Default {
    /// Everything `reset` needs to build a fresh, valid member
    type Params;

    /// Reinitialize from scratch and mark active
    fn reset(&mut self, params: Self::Params);

    fn body(&self) -> &Body;
    fn body_mut(&mut self) -> &mut Body;

    #[inline]
    fn is_active(&self) -> bool {
        self.body().active
    }
}

/// Index of a member inside its pool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Slot(usize);

impl Slot {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Growable pool of one entity kind
#[derive(Debug, Clone)]
pub struct Pool<T> {
    members: Vec<T>,
}

impl<T: Poolable> Default for Pool<T> {
    fn default() -> Self {
        Self::with_capacity(0)
    }
}

impl<T: Poolable> Pool<T> {
    /// Pre-warm `size` inactive members (a hint, not a cap)
    pub fn with_capacity(size: usize) -> Self {
        let mut members = Vec::with_capacity(size);
        members.resize_with(size, || {
            let mut member = T::default();
            member.body_mut().active = false;
            member
        });
        Self { members }
    }

    /// Claim the first inactive member (growing by one if none) and initialize it
    pub fn spawn(&mut self, params: T::Params) -> Slot {
        let index = match self.members.iter().position(|m| !m.is_active()) {
            Some(i) => i,
            None => {
                self.members.push(T::default());
                self.members.len() - 1
            }
        };
        let member = &mut self.members[index];
        member.reset(params);
        member.body_mut().active = true;
        Slot(index)
    }

    /// Return a member to the pool; releasing twice is a no-op
    pub fn release(&mut self, slot: Slot) {
        if let Some(member) = self.members.get_mut(slot.0) {
            member.body_mut().active = false;
        }
    }

    /// Active member at `slot`
    pub fn get(&self, slot: Slot) -> Option<&T> {
        self.members.get(slot.0).filter(|m| m.is_active())
    }

    /// Mutable active member at `slot`
    pub fn get_mut(&mut self, slot: Slot) -> Option<&mut T> {
        self.members.get_mut(slot.0).filter(|m| m.is_active())
    }

    /// Active members in backing-collection order
    pub fn iter_active(&self) -> impl Iterator<Item = &T> {
        self.members.iter().filter(|m| m.is_active())
    }

    pub fn iter_active_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.members.iter_mut().filter(|m| m.is_active())
    }

    /// Active members with their slots
    pub fn iter_active_slots(&self) -> impl Iterator<Item = (Slot, &T)> {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, m)| m.is_active())
            .map(|(i, m)| (Slot(i), m))
    }

    /// Fill `buf` with the slots active right now.
    ///
    /// Callers iterate the buffer and re-check `get`, so a member released
    /// partway through a pass is skipped for the rest of it.
    pub fn snapshot_active(&self, buf: &mut Vec<Slot>) {
        buf.clear();
        buf.extend(
            self.members
                .iter()
                .enumerate()
                .filter(|(_, m)| m.is_active())
                .map(|(i, _)| Slot(i)),
        );
    }

    /// Deactivate everything, keeping the allocated members
    pub fn clear(&mut self) {
        for member in &mut self.members {
            member.body_mut().active = false;
        }
    }

    pub fn active_count(&self) -> usize {
        self.members.iter().filter(|m| m.is_active()).count()
    }

    /// Number of allocated members, active or not
    pub fn capacity(&self) -> usize {
        self.members.len()
    }
}
