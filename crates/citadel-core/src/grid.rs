//! Spatial occupancy grid.
//!
//! The [`SpatialGrid`] holds every grid-resident object (terrain and
//! vehicles). Each cell references at most one object; a multi-cell object
//! references itself from every cell of its footprint. Projectiles,
//! explosions and floor power-ups never live here.
//!
//! # Invariants
//!
//! - No two distinct objects share a cell.
//! - An object is either fully placed (all footprint cells reference it) or
//!   absent.
//! - An object's anchor is its top-left cell, which is also the first cell
//!   holding it in row-major order.
//!
//! ```
//! use citadel_core::entity::{EntityId, Footprint};
//! use citadel_core::grid::SpatialGrid;
//!
//! let mut grid = SpatialGrid::new(4, 4);
//! let tank = EntityId::new(1);
//! grid.place(tank, Footprint::LARGE, 1, 1).unwrap();
//!
//! assert_eq!(grid.get(2, 2), Some(tank));
//! assert!(grid.place(EntityId::new(2), Footprint::UNIT, 2, 1).is_err());
//! assert_eq!(grid.scan(0..4, 0..4), vec![tank]);
//! ```

use std::collections::BTreeMap;
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, Footprint};
use crate::error::GridError;

/// Where an object sits in the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
struct Placement {
    row: usize,
    col: usize,
    footprint: Footprint,
}

/// Fixed-size occupancy grid with one object per cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialGrid {
    rows: usize,
    cols: usize,
    cells: Vec<Option<EntityId>>,
    placements: BTreeMap<EntityId, Placement>,
}

impl SpatialGrid {
    /// Creates an empty grid.
    #[must_use]
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![None; rows * cols],
            placements: BTreeMap::new(),
        }
    }

    /// Number of rows.
    #[must_use]
    pub const fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns.
    #[must_use]
    pub const fn cols(&self) -> usize {
        self.cols
    }

    /// Number of placed objects.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Returns `true` if nothing is placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Removes every object.
    pub fn clear(&mut self) {
        self.cells.fill(None);
        self.placements.clear();
    }

    /// Object occupying a cell, if any. Out-of-range cells are empty.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<EntityId> {
        if row < self.rows && col < self.cols {
            self.cells[row * self.cols + col]
        } else {
            None
        }
    }

    /// Returns `true` if `id` is placed.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.placements.contains_key(&id)
    }

    /// Footprint of a placed object.
    #[must_use]
    pub fn footprint(&self, id: EntityId) -> Option<Footprint> {
        self.placements.get(&id).map(|p| p.footprint)
    }

    /// Places `id` with its anchor at (`row`, `col`).
    ///
    /// # Errors
    ///
    /// - [`GridError::OutOfBounds`] if any footprint cell lies outside the grid.
    /// - [`GridError::OccupiedCell`] if any footprint cell is taken, including
    ///   by `id` itself when it is already placed.
    pub fn place(
        &mut self,
        id: EntityId,
        footprint: Footprint,
        row: i64,
        col: i64,
    ) -> Result<(), GridError> {
        let (row, col) = self.check_bounds(footprint, row, col)?;
        if let Some(existing) = self.placements.get(&id) {
            return Err(GridError::OccupiedCell {
                row: existing.row,
                col: existing.col,
            });
        }
        for (dr, dc) in footprint.offsets() {
            if self.cells[(row + dr) * self.cols + col + dc].is_some() {
                return Err(GridError::OccupiedCell {
                    row: row + dr,
                    col: col + dc,
                });
            }
        }

        for (dr, dc) in footprint.offsets() {
            self.cells[(row + dr) * self.cols + col + dc] = Some(id);
        }
        self.placements.insert(
            id,
            Placement {
                row,
                col,
                footprint,
            },
        );
        Ok(())
    }

    /// Removes `id` from every cell it covers.
    ///
    /// # Errors
    ///
    /// [`GridError::NotFound`] if `id` is not placed.
    pub fn remove(&mut self, id: EntityId) -> Result<(), GridError> {
        let placement = self.placements.remove(&id).ok_or(GridError::NotFound(id))?;
        for (dr, dc) in placement.footprint.offsets() {
            self.cells[(placement.row + dr) * self.cols + placement.col + dc] = None;
        }
        Ok(())
    }

    /// Moves `id` so its anchor lands on (`row`, `col`).
    ///
    /// Cells currently held by `id` itself do not block the move. On failure
    /// the object stays where it was.
    ///
    /// # Errors
    ///
    /// [`GridError::NotFound`] if `id` is not placed, otherwise any error
    /// from [`SpatialGrid::place`].
    #[allow(clippy::cast_possible_wrap)]
    pub fn relocate(&mut self, id: EntityId, row: i64, col: i64) -> Result<(), GridError> {
        let previous = *self.placements.get(&id).ok_or(GridError::NotFound(id))?;
        self.remove(id)?;
        if let Err(err) = self.place(id, previous.footprint, row, col) {
            // The old cells were just vacated, so restoring cannot collide.
            self.place(
                id,
                previous.footprint,
                previous.row as i64,
                previous.col as i64,
            )?;
            return Err(err);
        }
        Ok(())
    }

    /// Anchor cell of `id`.
    ///
    /// # Errors
    ///
    /// [`GridError::NotFound`] if `id` is not placed.
    pub fn locate(&self, id: EntityId) -> Result<(usize, usize), GridError> {
        self.placements
            .get(&id)
            .map(|p| (p.row, p.col))
            .ok_or(GridError::NotFound(id))
    }

    /// Distinct objects intersecting the given cell ranges, in order of first
    /// encounter during a row-major scan. Ranges are clipped to the grid.
    #[must_use]
    pub fn scan(&self, rows: Range<i64>, cols: Range<i64>) -> Vec<EntityId> {
        let rows = clip(rows, self.rows);
        let cols = clip(cols, self.cols);
        let mut found = Vec::new();
        for row in rows {
            for col in cols.clone() {
                if let Some(id) = self.cells[row * self.cols + col] {
                    if !found.contains(&id) {
                        found.push(id);
                    }
                }
            }
        }
        found
    }

    /// Every placed object with its anchor cell, in row-major anchor order.
    pub fn enumerate(&self) -> impl Iterator<Item = (EntityId, usize, usize)> + '_ {
        self.cells.iter().enumerate().filter_map(move |(index, cell)| {
            let id = (*cell)?;
            let (row, col) = (index / self.cols, index % self.cols);
            let placement = self.placements.get(&id)?;
            (placement.row == row && placement.col == col).then_some((id, row, col))
        })
    }

    fn check_bounds(
        &self,
        footprint: Footprint,
        row: i64,
        col: i64,
    ) -> Result<(usize, usize), GridError> {
        let fits = |start: i64, span: usize, limit: usize| {
            usize::try_from(start)
                .ok()
                .filter(|s| s + span <= limit)
        };
        match (
            fits(row, footprint.rows, self.rows),
            fits(col, footprint.cols, self.cols),
        ) {
            (Some(r), Some(c)) => Ok((r, c)),
            _ => Err(GridError::OutOfBounds { row, col }),
        }
    }
}

fn clip(range: Range<i64>, limit: usize) -> Range<usize> {
    let clamp = |v: i64| usize::try_from(v.max(0)).unwrap_or(0).min(limit);
    clamp(range.start)..clamp(range.end)
}
