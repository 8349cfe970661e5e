//! Fixed-capacity bullet pool
//!
//! Slots are allocated once and recycled by flipping their `active` flag.
//! Handles are plain slot indices, so there is nothing to dangle.

use glam::Vec2;

use super::entity::{Bullet, Owner, Simulate, TickContext};

/// Index of a slot in a `BulletPool`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BulletHandle(usize);

impl BulletHandle {
    pub fn index(&self) -> usize {
        self.0
    }
}

/// Reusable bullets for one owner
#[derive(Debug, Clone)]
pub struct BulletPool {
    owner: Owner,
    slots: Vec<Bullet>,
}

impl BulletPool {
    pub fn new(owner: Owner, capacity: usize) -> Self {
        Self {
            owner,
            slots: (0..capacity).map(|_| Bullet::inactive(owner)).collect(),
        }
    }

    pub fn owner(&self) -> Owner {
        self.owner
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// First inactive slot, or `None` when every slot is live. Exhaustion
    /// is an admission decision: the caller drops the shot.
    pub fn acquire(&self) -> Option<BulletHandle> {
        self.slots.iter().position(|b| !b.active).map(BulletHandle)
    }

    /// Place a bullet and mark it live
    pub fn reset(&mut self, handle: BulletHandle, x: f32, y: f32, speed: f32) {
        if let Some(slot) = self.slots.get_mut(handle.0) {
            slot.pos = Vec2::new(x, y);
            slot.speed = speed;
            slot.active = true;
        }
    }

    /// `acquire` + `reset` in one step
    pub fn fire(&mut self, origin: Vec2, speed: f32) -> Option<BulletHandle> {
        let handle = self.acquire()?;
        self.reset(handle, origin.x, origin.y, speed);
        Some(handle)
    }

    /// Return a slot to the pool. Idempotent.
    pub fn deactivate(&mut self, handle: BulletHandle) {
        if let Some(slot) = self.slots.get_mut(handle.0) {
            slot.active = false;
        }
    }

    pub fn get(&self, handle: BulletHandle) -> Option<&Bullet> {
        self.slots.get(handle.0)
    }

    /// Live bullets only
    pub fn active_iter(&self) -> impl Iterator<Item = &Bullet> {
        self.slots.iter().filter(|b| b.active)
    }

    /// Handles of live bullets, in slot order
    pub fn active_handles(&self) -> Vec<BulletHandle> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, b)| b.active)
            .map(|(i, _)| BulletHandle(i))
            .collect()
    }

    pub fn active_count(&self) -> usize {
        self.active_iter().count()
    }

    /// Advance every live bullet
    pub fn update(&mut self, ctx: &TickContext) {
        for bullet in self.slots.iter_mut().filter(|b| b.active) {
            bullet.update(ctx);
        }
    }

    /// Deactivate live bullets that left the screen; returns how many
    pub fn prune_off_screen(&mut self, screen_height: f32) -> usize {
        let mut pruned = 0;
        for bullet in self.slots.iter_mut().filter(|b| b.active) {
            if bullet.is_off_screen(screen_height) {
                bullet.active = false;
                pruned += 1;
            }
        }
        pruned
    }

    /// Deactivate everything
    pub fn clear(&mut self) {
        for bullet in &mut self.slots {
            bullet.active = false;
        }
    }
}
