#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stateless A* search that routes enemies from the start cell to the goal.

use std::{cmp::Reverse, collections::BinaryHeap};

use waypoint_defence_core::{CellCoord, GridView, Path};

/// A* search over the four-connected walkability grid.
///
/// Every step costs one and the heuristic is the Manhattan distance to the
/// goal, so returned paths are shortest paths. Among equally short routes the
/// result is fixed: open entries with equal `f` are expanded in insertion order
/// and neighbours are generated in the order +x, -x, +y, -y.
#[derive(Clone, Copy, Debug, Default)]
pub struct PathFinder;

impl PathFinder {
    /// Creates a new path finder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Computes a shortest route from `start` to `goal`, both inclusive.
    ///
    /// Returns `None` when either endpoint is blocked or outside the grid, or
    /// when obstacles separate the two cells.
    #[must_use]
    pub fn find_path(&self, grid: GridView<'_>, start: CellCoord, goal: CellCoord) -> Option<Path> {
        let start_index = grid.index(start)?;
        if !grid.is_walkable(start) || !grid.is_walkable(goal) {
            return None;
        }

        let (columns, rows) = grid.dimensions();
        let cell_count = usize::try_from(u64::from(columns) * u64::from(rows)).ok()?;
        let mut closed = vec![false; cell_count];
        let mut best_open_f: Vec<Option<u32>> = vec![None; cell_count];
        let mut nodes = vec![PathNode {
            cell: start,
            parent: None,
            g: 0,
            h: start.manhattan_distance(goal),
        }];
        let mut open = BinaryHeap::new();
        let mut sequence: u64 = 0;
        open.push(Reverse((nodes[0].f(), sequence, 0_usize)));
        best_open_f[start_index] = Some(nodes[0].f());

        while let Some(Reverse((_, _, node_index))) = open.pop() {
            let node = nodes[node_index];
            let Some(cell_index) = grid.index(node.cell) else {
                continue;
            };
            if closed[cell_index] {
                continue;
            }
            if node.cell == goal {
                return Path::new(reconstruct(&nodes, node_index));
            }
            closed[cell_index] = true;

            for neighbor in neighbors(node.cell, columns, rows) {
                let Some(neighbor_index) = grid.index(neighbor) else {
                    continue;
                };
                if closed[neighbor_index] || !grid.is_walkable(neighbor) {
                    continue;
                }

                let candidate = PathNode {
                    cell: neighbor,
                    parent: Some(node_index),
                    g: node.g + 1,
                    h: neighbor.manhattan_distance(goal),
                };
                let f = candidate.f();
                if best_open_f[neighbor_index].is_some_and(|best| best <= f) {
                    continue;
                }

                best_open_f[neighbor_index] = Some(f);
                sequence += 1;
                nodes.push(candidate);
                open.push(Reverse((f, sequence, nodes.len() - 1)));
            }
        }

        None
    }
}

/// Search node owned by a single run and discarded once the path is rebuilt.
#[derive(Clone, Copy, Debug)]
struct PathNode {
    cell: CellCoord,
    parent: Option<usize>,
    g: u32,
    h: u32,
}

impl PathNode {
    const fn f(&self) -> u32 {
        self.g + self.h
    }
}

fn reconstruct(nodes: &[PathNode], goal_index: usize) -> Vec<CellCoord> {
    let mut cells = Vec::new();
    let mut cursor = Some(goal_index);
    while let Some(index) = cursor {
        let node = nodes[index];
        cells.push(node.cell);
        cursor = node.parent;
    }
    cells.reverse();
    cells
}

fn neighbors(cell: CellCoord, columns: u32, rows: u32) -> impl Iterator<Item = CellCoord> {
    let column = cell.column();
    let row = cell.row();
    [
        (column + 1 < columns).then(|| CellCoord::new(column + 1, row)),
        column.checked_sub(1).map(|left| CellCoord::new(left, row)),
        (row + 1 < rows).then(|| CellCoord::new(column, row + 1)),
        row.checked_sub(1).map(|up| CellCoord::new(column, up)),
    ]
    .into_iter()
    .flatten()
}
