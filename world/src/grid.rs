//! Walkability matrix and the rules that govern obstacle edits.

use waypoint_defence_core::{CellCoord, GridView, Layout, ObstacleError, Walkability};

/// Dense walkability matrix with two reserved cells, `start` and `goal`.
///
/// The grid never changes size after construction and the reserved cells are
/// never blocked. Paths computed against an earlier state of the grid are not
/// corrected when obstacles change; only new enemies observe edits.
#[derive(Clone, Debug)]
pub struct GridMap {
    columns: u32,
    rows: u32,
    start: CellCoord,
    goal: CellCoord,
    cells: Vec<Walkability>,
}

impl GridMap {
    /// Builds the grid described by an already validated layout.
    pub(crate) fn from_layout(layout: &Layout) -> Self {
        let capacity_u64 = u64::from(layout.columns) * u64::from(layout.rows);
        let capacity = usize::try_from(capacity_u64).unwrap_or(0);
        let mut grid = Self {
            columns: layout.columns,
            rows: layout.rows,
            start: layout.start,
            goal: layout.goal,
            cells: vec![Walkability::Walkable; capacity],
        };
        grid.reset(layout);
        grid
    }

    /// Restores the obstacles described by the layout.
    pub(crate) fn reset(&mut self, layout: &Layout) {
        self.cells.fill(Walkability::Walkable);
        for &cell in &layout.obstacles {
            if self.is_reserved(cell) {
                continue;
            }
            let index = self.view().index(cell);
            if let Some(slot) = index.and_then(|index| self.cells.get_mut(index)) {
                *slot = Walkability::Blocked;
            }
        }
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Cell where enemies enter the grid.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Cell enemies try to reach.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    /// Read-only view used by pathfinding and renderers.
    #[must_use]
    pub fn view(&self) -> GridView<'_> {
        GridView::new(&self.cells, self.columns, self.rows)
    }

    /// Reports whether enemies may route through the cell. Out-of-bounds
    /// cells are never walkable.
    #[must_use]
    pub fn is_walkable(&self, cell: CellCoord) -> bool {
        self.view().is_walkable(cell)
    }

    /// Walkability of the cell, if it lies inside the grid.
    #[must_use]
    pub fn walkability(&self, cell: CellCoord) -> Option<Walkability> {
        self.view().walkability(cell)
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.view().contains(cell)
    }

    /// Reports whether the cell is the start or the goal.
    #[must_use]
    pub fn is_reserved(&self, cell: CellCoord) -> bool {
        cell == self.start || cell == self.goal
    }

    /// Validates an edit without applying it, returning the walkability the
    /// cell would have afterwards.
    fn check_toggle<F>(&self, cell: CellCoord, is_occupied: F) -> Result<Walkability, ObstacleError>
    where
        F: FnOnce(CellCoord) -> bool,
    {
        let current = self.walkability(cell).ok_or(ObstacleError::OutOfBounds)?;
        if self.is_reserved(cell) {
            return Err(ObstacleError::Reserved);
        }
        if is_occupied(cell) {
            return Err(ObstacleError::Occupied);
        }
        Ok(current.toggled())
    }

    /// Flips the cell between walkable and blocked.
    ///
    /// `charge` receives the walkability the cell is about to take and may
    /// veto the edit; the grid is only written once both the cell checks and
    /// the charge succeed.
    pub(crate) fn toggle_obstacle<F, C>(
        &mut self,
        cell: CellCoord,
        is_occupied: F,
        charge: C,
    ) -> Result<Walkability, ObstacleError>
    where
        F: FnOnce(CellCoord) -> bool,
        C: FnOnce(Walkability) -> Result<(), ObstacleError>,
    {
        let next = self.check_toggle(cell, is_occupied)?;
        let index = self.view().index(cell).ok_or(ObstacleError::OutOfBounds)?;
        charge(next)?;
        if let Some(slot) = self.cells.get_mut(index) {
            *slot = next;
        }
        Ok(next)
    }
}
