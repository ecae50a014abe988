//! Ordered follow column of captured zombies.

use sanctuary_core::{FollowSlot, ZombieId};

/// Zombies in the order they were captured.
#[derive(Clone, Debug, Default)]
pub(crate) struct CaptureQueue {
    order: Vec<ZombieId>,
}

impl CaptureQueue {
    /// Appends `zombie` and returns its slot. Repeated calls return the
    /// first slot it was given without appending.
    pub(crate) fn on_capture(&mut self, zombie: ZombieId) -> FollowSlot {
        if let Some(slot) = self.slot_of(zombie) {
            return slot;
        }
        let slot = FollowSlot::new(self.order.len());
        self.order.push(zombie);
        slot
    }

    pub(crate) fn slot_of(&self, zombie: ZombieId) -> Option<FollowSlot> {
        self.order
            .iter()
            .position(|candidate| *candidate == zombie)
            .map(FollowSlot::new)
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = ZombieId> + '_ {
        self.order.iter().copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.order.len()
    }

    pub(crate) fn clear(&mut self) {
        self.order.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slots_follow_capture_order() {
        let mut queue = CaptureQueue::default();
        assert_eq!(queue.on_capture(ZombieId::new(7)), FollowSlot::new(0));
        assert_eq!(queue.on_capture(ZombieId::new(2)), FollowSlot::new(1));
        assert_eq!(queue.on_capture(ZombieId::new(5)), FollowSlot::new(2));

        let order: Vec<u32> = queue.iter().map(|id| id.get()).collect();
        assert_eq!(order, vec![7, 2, 5]);
    }

    #[test]
    fn repeated_capture_is_ignored() {
        let mut queue = CaptureQueue::default();
        let _ = queue.on_capture(ZombieId::new(1));
        let first = queue.on_capture(ZombieId::new(4));

        assert_eq!(queue.on_capture(ZombieId::new(4)), first);
        assert_eq!(queue.len(), 2);
        assert_eq!(queue.slot_of(ZombieId::new(9)), None);
    }

    #[test]
    fn clear_empties_the_column() {
        let mut queue = CaptureQueue::default();
        let _ = queue.on_capture(ZombieId::new(1));
        queue.clear();
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.on_capture(ZombieId::new(1)), FollowSlot::new(0));
    }
}
