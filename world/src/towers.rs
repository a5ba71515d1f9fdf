//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use glam::Vec2;
use waypoint_defence_core::{CellCoord, CellPoint, EnemyId, Rules, TowerId, TowerSnapshot};

use crate::enemies::{cell_center, Enemy};

/// Stationary tower that fires at the first enemy inside its range.
#[derive(Clone, Debug)]
pub(crate) struct Tower {
    id: TowerId,
    cell: CellCoord,
    center: Vec2,
    range: f32,
    damage: u32,
    fire_interval: u32,
    cooldown: u32,
}

impl Tower {
    /// Creates a ready-to-fire tower on the provided cell.
    pub(crate) fn new(id: TowerId, cell: CellCoord, rules: &Rules) -> Self {
        Self {
            id,
            cell,
            center: cell_center(cell),
            range: rules.tower_range_cells,
            damage: rules.tower_damage,
            fire_interval: rules.tower_fire_interval_ticks,
            cooldown: 0,
        }
    }

    pub(crate) const fn id(&self) -> TowerId {
        self.id
    }

    pub(crate) const fn damage(&self) -> u32 {
        self.damage
    }

    /// Counts the cooldown down by `dt` ticks, stopping at zero.
    pub(crate) fn update(&mut self, dt: u32) {
        self.cooldown = self.cooldown.saturating_sub(dt);
    }

    /// Fires at the first enemy, in iteration order, whose distance to the
    /// tower centre is within range.
    ///
    /// Targeting deliberately ignores proximity and health: the first match
    /// wins. Nothing happens while the tower cools down or when no enemy is in
    /// range.
    pub(crate) fn try_fire(&mut self, enemies: &mut [Enemy]) -> Option<EnemyId> {
        if self.cooldown > 0 {
            return None;
        }

        let center = self.center;
        let range = self.range;
        let target = enemies
            .iter_mut()
            .find(|enemy| center.distance(enemy.position()) <= range)?;

        target.take_damage(self.damage);
        self.cooldown = self.fire_interval;
        Some(target.id())
    }

    pub(crate) fn snapshot(&self) -> TowerSnapshot {
        TowerSnapshot {
            id: self.id,
            cell: self.cell,
            center: CellPoint::new(self.center.x, self.center.y),
            range: self.range,
            cooldown: self.cooldown,
        }
    }
}

/// Registry that stores towers and manages identifier allocation.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    entries: BTreeMap<TowerId, Tower>,
    cells: BTreeMap<CellCoord, TowerId>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty tower registry with a reset identifier counter.
    pub(crate) fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
            cells: BTreeMap::new(),
            next_tower_id: TowerId::new(0),
        }
    }

    /// Removes every tower and restarts identifier allocation.
    pub(crate) fn clear(&mut self) {
        self.entries.clear();
        self.cells.clear();
        self.next_tower_id = TowerId::new(0);
    }

    /// Tower occupying the provided cell, if any.
    pub(crate) fn tower_at(&self, cell: CellCoord) -> Option<TowerId> {
        self.cells.get(&cell).copied()
    }

    pub(crate) fn is_occupied(&self, cell: CellCoord) -> bool {
        self.cells.contains_key(&cell)
    }

    /// Stores a new tower on the cell. Callers validate the cell beforehand.
    pub(crate) fn insert(&mut self, cell: CellCoord, rules: &Rules) -> TowerId {
        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        let _ = self.entries.insert(id, Tower::new(id, cell, rules));
        let _ = self.cells.insert(cell, id);
        id
    }

    /// Towers in placement order.
    pub(crate) fn iter(&self) -> impl Iterator<Item = &Tower> {
        self.entries.values()
    }

    /// Mutable towers in placement order.
    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Tower> {
        self.entries.values_mut()
    }
}
