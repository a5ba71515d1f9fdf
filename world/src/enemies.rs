//! Enemy entities that walk a precomputed path towards the goal.

use glam::Vec2;
use waypoint_defence_core::{CellCoord, CellPoint, EnemyId, EnemySnapshot, Path};

/// Enemy following its own copy of a path computed when it spawned.
///
/// Movement and damage only mutate the entity. Detecting deaths and goal
/// arrivals, and removing the enemy afterwards, is the world's job.
#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    id: EnemyId,
    path: Path,
    waypoint_index: usize,
    position: Vec2,
    speed: f32,
    health: u32,
    max_health: u32,
}

impl Enemy {
    /// Creates an enemy standing on the centre of the path's first cell.
    pub(crate) fn spawn(id: EnemyId, path: Path, speed: f32, health: u32) -> Self {
        let position = cell_center(path.first());
        Self {
            id,
            path,
            waypoint_index: 0,
            position,
            speed,
            health,
            max_health: health,
        }
    }

    pub(crate) const fn id(&self) -> EnemyId {
        self.id
    }

    pub(crate) const fn position(&self) -> Vec2 {
        self.position
    }

    /// Moves towards the next waypoint by `speed * dt` cells.
    ///
    /// When the waypoint is closer than the distance covered this tick the
    /// enemy snaps onto it and the waypoint index advances.
    pub(crate) fn advance(&mut self, dt: u32) {
        let Some(next) = self.path.get(self.waypoint_index + 1) else {
            return;
        };

        let target = cell_center(next);
        let offset = target - self.position;
        let remaining = offset.length();
        let step = self.speed * dt as f32;

        if remaining <= step {
            self.position = target;
            self.waypoint_index += 1;
        } else {
            self.position += offset / remaining * step;
        }
    }

    /// Removes health, clamping at zero.
    pub(crate) fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    pub(crate) const fn is_dead(&self) -> bool {
        self.health == 0
    }

    pub(crate) fn has_reached_goal(&self) -> bool {
        self.waypoint_index + 1 >= self.path.len()
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            position: CellPoint::new(self.position.x, self.position.y),
            health: self.health,
            max_health: self.max_health,
            waypoint_index: self.waypoint_index,
            path_len: self.path.len(),
        }
    }
}

pub(crate) fn cell_center(cell: CellCoord) -> Vec2 {
    let center = cell.center();
    Vec2::new(center.x(), center.y())
}
