//! Battle events - cosmetic and lifecycle notifications for the
//! presentation layer, drained once per frame.

use hecs::Entity;

use crate::components::{Team, Vec3};

/// Something the presentation layer may want to react to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BattleEvent {
    /// Damage was applied at this position (hit flash, particles, ...)
    HitLanded { position: Vec3 },
    /// A unit just died
    UnitDied {
        unit: Entity,
        team: Team,
        position: Vec3,
    },
    /// The battle is over
    BattleEnded {
        winner: Team,
        duration_seconds: f32,
    },
}

/// Frame-scoped event buffer
#[derive(Debug, Default)]
pub struct EventQueue {
    events: Vec<BattleEvent>,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: BattleEvent) {
        self.events.push(event);
    }

    /// Take all pending events, leaving the queue empty
    pub fn drain(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn iter(&self) -> impl Iterator<Item = &BattleEvent> {
        self.events.iter()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_empties_queue() {
        let mut queue = EventQueue::new();
        queue.push(BattleEvent::HitLanded {
            position: Vec3::ZERO,
        });
        assert_eq!(queue.len(), 1);
        let drained = queue.drain();
        assert_eq!(drained.len(), 1);
        assert!(queue.is_empty());
    }
}
