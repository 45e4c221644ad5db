//! Dense terrain grid owned by the world.

use thiserror::Error;
use tokyo_core::{Cell, CellCoord, CellKind, TerrainView, VisitState};

use crate::layout::Layout;

/// Reasons a terrain mutation may be refused.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum TerrainError {
    /// The coordinate lies outside the grid.
    #[error("cell ({column}, {row}) lies outside the grid")]
    OutOfBounds {
        /// Requested column.
        column: u32,
        /// Requested row.
        row: u32,
    },
    /// Only standing buildings can be destroyed.
    #[error("cell ({column}, {row}) holds no standing building")]
    NotResidential {
        /// Requested column.
        column: u32,
        /// Requested row.
        row: u32,
    },
}

/// Fixed-size row-major terrain matrix plus the running destruction tally.
#[derive(Clone, Debug)]
pub(crate) struct Grid {
    columns: u32,
    rows: u32,
    cells: Vec<Cell>,
    destroyed: u32,
}

impl Grid {
    pub(crate) fn from_layout(layout: &Layout) -> Self {
        let threat = layout.threat();
        let cells = layout
            .iter()
            .map(|(coord, kind)| {
                let visit = if coord == threat {
                    VisitState::Current
                } else {
                    VisitState::Untouched
                };
                Cell::new(kind, visit)
            })
            .collect();

        Self {
            columns: layout.columns(),
            rows: layout.rows(),
            cells,
            destroyed: 0,
        }
    }

    pub(crate) fn view(&self) -> TerrainView<'_> {
        TerrainView::new(&self.cells, self.columns, self.rows)
    }

    pub(crate) fn destroyed(&self) -> u32 {
        self.destroyed
    }

    /// Flattens the building at `cell` and returns the updated tally.
    pub(crate) fn destroy(&mut self, cell: CellCoord) -> Result<u32, TerrainError> {
        let index = self.index(cell).ok_or(TerrainError::OutOfBounds {
            column: cell.column(),
            row: cell.row(),
        })?;
        let slot = &mut self.cells[index];
        if slot.kind() != CellKind::Residential {
            return Err(TerrainError::NotResidential {
                column: cell.column(),
                row: cell.row(),
            });
        }

        *slot = slot.with_kind(CellKind::Destroyed);
        self.destroyed = self.destroyed.saturating_add(1);
        Ok(self.destroyed)
    }

    /// Moves the `Current` mark from `from` to `to`, leaving `from` visited.
    pub(crate) fn hand_over(&mut self, from: CellCoord, to: CellCoord) {
        if let Some(index) = self.index(from) {
            self.cells[index] = self.cells[index].with_visit(VisitState::Visited);
        }
        if let Some(index) = self.index(to) {
            self.cells[index] = self.cells[index].with_visit(VisitState::Current);
        }
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}
