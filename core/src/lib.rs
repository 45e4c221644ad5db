#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Tokyo rampage simulation.
//!
//! This crate defines the message surface that connects the driver, the
//! authoritative world, and pure systems. The driver submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems read immutable views such as
//! [`TerrainView`] and respond exclusively with new command batches.

use serde::{Deserialize, Serialize};

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    /// Scans the blast zone from scratch around the threat's starting cell.
    Begin,
    /// Stores the cell the threat will enter on its next advance.
    PlanThreatStep {
        /// Proposed neighbor of the threat, or `None` when no move exists.
        next: Option<CellCoord>,
    },
    /// Commits the threat's pending step, destroying a building if present.
    AdvanceThreat,
    /// Recomputes the blast zone around the threat's current cell.
    RefreshBlastZone {
        /// Whether every arm is rescanned or only the arms affected by movement.
        mode: ScanMode,
    },
    /// Replaces the plan followed by an evader.
    SetEvaderPlan {
        /// Identifier of the evader receiving the plan.
        evader: EvaderId,
        /// Cell the plan leads to, cached until it leaves the blast zone.
        goal: Option<CellCoord>,
        /// Ordered cells to visit, excluding the evader's current cell.
        path: Vec<CellCoord>,
    },
    /// Advances every evader by one planned step.
    StepEvaders,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that the simulation was primed at the threat's start.
    Started {
        /// Cell the threat occupies when the simulation begins.
        threat: CellCoord,
    },
    /// Confirms that the threat moved between two neighboring cells.
    ThreatAdvanced {
        /// Cell the threat left.
        from: CellCoord,
        /// Cell the threat entered.
        to: CellCoord,
    },
    /// Reports that the threat flattened a building while advancing.
    BuildingDestroyed {
        /// Cell that held the building.
        cell: CellCoord,
        /// Running number of buildings destroyed so far.
        destroyed: u32,
    },
    /// Reports that the threat had no pending step to commit.
    ThreatStalled {
        /// Cell the threat remains on.
        cell: CellCoord,
    },
    /// Announces that the blast zone changed shape or anchor.
    BlastZoneChanged {
        /// Zone that became active.
        zone: BlastZone,
    },
    /// Confirms that an evader accepted a new plan.
    EvaderPlanned {
        /// Identifier of the evader.
        evader: EvaderId,
        /// Goal the plan leads to, if any.
        goal: Option<CellCoord>,
        /// Number of steps queued.
        steps: usize,
    },
    /// Reports that a plan was refused because it crossed impassable terrain.
    EvaderPlanRejected {
        /// Identifier of the evader whose plan was refused.
        evader: EvaderId,
    },
    /// Confirms that an evader moved one step along its plan.
    EvaderAdvanced {
        /// Identifier of the evader that moved.
        evader: EvaderId,
        /// Cell the evader occupied before moving.
        from: CellCoord,
        /// Cell the evader occupies after moving.
        to: CellCoord,
    },
}

/// Cardinal movement directions on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    North,
    /// Movement toward increasing column indices.
    East,
    /// Movement toward increasing row indices.
    South,
    /// Movement toward decreasing column indices.
    West,
}

impl Direction {
    /// Neighbor priority shared by the threat walk and the evader search.
    ///
    /// Tie-breaks in both depend on this exact order: up, right, down, left.
    pub const PRIORITY: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    /// Reports whether the direction travels along the row axis.
    #[must_use]
    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::North | Self::South)
    }
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Moves one cell in `direction`, returning `None` when leaving the grid.
    #[must_use]
    pub fn step(self, direction: Direction, columns: u32, rows: u32) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::North => (Some(self.column), self.row.checked_sub(1)),
            Direction::East => (self.column.checked_add(1), Some(self.row)),
            Direction::South => (Some(self.column), self.row.checked_add(1)),
            Direction::West => (self.column.checked_sub(1), Some(self.row)),
        };
        let (column, row) = (column?, row?);
        (column < columns && row < rows).then_some(CellCoord::new(column, row))
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }
}

/// Enumerates the in-bounds neighbors of `cell` in [`Direction::PRIORITY`] order.
pub fn neighbors(cell: CellCoord, columns: u32, rows: u32) -> impl Iterator<Item = CellCoord> {
    Direction::PRIORITY
        .into_iter()
        .filter_map(move |direction| cell.step(direction, columns, rows))
}

/// Terrain occupying a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CellKind {
    /// Open ground.
    Empty,
    /// Standing building. Impassable for evaders and the only destructible kind.
    Residential,
    /// Rubble left after a building was flattened.
    Destroyed,
}

/// Mark left by the threat's walk on a cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisitState {
    /// The threat has never stood on the cell.
    Untouched,
    /// The threat currently stands on the cell.
    Current,
    /// The threat stood on the cell earlier in the run.
    Visited,
}

/// Terrain and walk state of a single grid cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    kind: CellKind,
    visit: VisitState,
}

impl Cell {
    /// Creates a cell with the provided terrain and visitation mark.
    #[must_use]
    pub const fn new(kind: CellKind, visit: VisitState) -> Self {
        Self { kind, visit }
    }

    /// Terrain currently occupying the cell.
    #[must_use]
    pub const fn kind(&self) -> CellKind {
        self.kind
    }

    /// Visitation mark recorded by the threat.
    #[must_use]
    pub const fn visit(&self) -> VisitState {
        self.visit
    }

    /// Copy of the cell carrying different terrain.
    #[must_use]
    pub const fn with_kind(self, kind: CellKind) -> Self {
        Self { kind, ..self }
    }

    /// Copy of the cell carrying a different visitation mark.
    #[must_use]
    pub const fn with_visit(self, visit: VisitState) -> Self {
        Self { visit, ..self }
    }
}

/// Read-only view into the dense row-major terrain grid.
#[derive(Clone, Copy, Debug)]
pub struct TerrainView<'a> {
    cells: &'a [Cell],
    columns: u32,
    rows: u32,
}

impl<'a> TerrainView<'a> {
    /// Captures a new terrain view backed by the provided cell slice.
    #[must_use]
    pub fn new(cells: &'a [Cell], columns: u32, rows: u32) -> Self {
        Self {
            cells,
            columns,
            rows,
        }
    }

    /// Reports whether the cell lies inside the grid.
    #[must_use]
    pub const fn position_valid(&self, cell: CellCoord) -> bool {
        cell.column() < self.columns && cell.row() < self.rows
    }

    /// Returns the cell stored at the provided coordinate, if it is in bounds.
    #[must_use]
    pub fn cell(&self, cell: CellCoord) -> Option<Cell> {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
    }

    /// Terrain stored at the provided coordinate, if it is in bounds.
    #[must_use]
    pub fn kind(&self, cell: CellCoord) -> Option<CellKind> {
        self.cell(cell).map(|cell| cell.kind())
    }

    /// Threat visit mark stored at the provided coordinate, if it is in bounds.
    #[must_use]
    pub fn visit(&self, cell: CellCoord) -> Option<VisitState> {
        self.cell(cell).map(|cell| cell.visit())
    }

    /// Reports whether the coordinate holds a standing building.
    #[must_use]
    pub fn is_residential(&self, cell: CellCoord) -> bool {
        self.kind(cell) == Some(CellKind::Residential)
    }

    /// Neighbor of `cell` in `direction`, if it lies inside the grid.
    #[must_use]
    pub fn neighbor(&self, cell: CellCoord, direction: Direction) -> Option<CellCoord> {
        cell.step(direction, self.columns, self.rows)
    }

    /// In-bounds neighbors of `cell` in priority order.
    pub fn neighbors(&self, cell: CellCoord) -> impl Iterator<Item = CellCoord> {
        neighbors(cell, self.columns, self.rows)
    }

    /// Counts the buildings still standing.
    #[must_use]
    pub fn residential_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.kind() == CellKind::Residential)
            .count()
    }

    /// Iterates over every cell together with its coordinate in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Cell)> + 'a {
        let columns = self.columns.max(1);
        self.cells.iter().enumerate().map(move |(index, cell)| {
            let index = u32::try_from(index).unwrap_or(u32::MAX);
            (CellCoord::new(index % columns, index / columns), *cell)
        })
    }

    /// Provides the dimensions of the underlying grid as `(columns, rows)`.
    #[must_use]
    pub const fn dimensions(&self) -> (u32, u32) {
        (self.columns, self.rows)
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if self.position_valid(cell) {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Inclusive range of coordinates along one axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Span {
    start: u32,
    end: u32,
}

impl Span {
    /// Creates a span covering `start..=end`. The bounds are swapped if reversed.
    #[must_use]
    pub const fn new(start: u32, end: u32) -> Self {
        if start <= end {
            Self { start, end }
        } else {
            Self {
                start: end,
                end: start,
            }
        }
    }

    /// Span covering a single coordinate.
    #[must_use]
    pub const fn point(value: u32) -> Self {
        Self {
            start: value,
            end: value,
        }
    }

    /// Lowest coordinate covered.
    #[must_use]
    pub const fn start(&self) -> u32 {
        self.start
    }

    /// Highest coordinate covered.
    #[must_use]
    pub const fn end(&self) -> u32 {
        self.end
    }

    /// Reports whether `value` lies inside the span.
    #[must_use]
    pub const fn contains(&self, value: u32) -> bool {
        self.start <= value && value <= self.end
    }
}

/// Whether a blast-zone refresh rescans every arm or only the arms that moved.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScanMode {
    /// Rescan all four arms.
    Full,
    /// Rescan only the arms whose previous bound may be stale.
    Incremental,
}

/// Cross-shaped danger region anchored at the threat's position.
///
/// The vertical arm runs along the anchor's column and covers `rows`; the
/// horizontal arm runs along the anchor's row and covers `columns`. Each arm
/// stops at the grid edge or at the first standing building, which it
/// includes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlastZone {
    anchor: CellCoord,
    rows: Span,
    columns: Span,
}

impl BlastZone {
    /// Degenerate zone covering only the anchor.
    #[must_use]
    pub const fn at(anchor: CellCoord) -> Self {
        Self {
            anchor,
            rows: Span::point(anchor.row()),
            columns: Span::point(anchor.column()),
        }
    }

    /// Creates a zone from explicit arm bounds.
    #[must_use]
    pub const fn new(anchor: CellCoord, rows: Span, columns: Span) -> Self {
        Self {
            anchor,
            rows,
            columns,
        }
    }

    /// Cell the cross is centred on.
    #[must_use]
    pub const fn anchor(&self) -> CellCoord {
        self.anchor
    }

    /// Row bounds of the vertical arm.
    #[must_use]
    pub const fn rows(&self) -> Span {
        self.rows
    }

    /// Column bounds of the horizontal arm.
    #[must_use]
    pub const fn columns(&self) -> Span {
        self.columns
    }

    /// Cross test: the cell lies on either arm within that arm's bounds.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        (cell.column() == self.anchor.column() && self.rows.contains(cell.row()))
            || (cell.row() == self.anchor.row() && self.columns.contains(cell.column()))
    }
}

/// Unique identifier assigned to an evader.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EvaderId(u32);

impl EvaderId {
    /// Creates a new evader identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Immutable representation of the threat used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThreatSnapshot {
    /// Cell the threat currently occupies.
    pub cell: CellCoord,
    /// Step selected for the next advance, if any.
    pub pending: Option<CellCoord>,
}

/// Immutable representation of a single evader's state used for queries.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EvaderSnapshot {
    /// Unique identifier assigned to the evader.
    pub id: EvaderId,
    /// Grid cell currently occupied by the evader.
    pub cell: CellCoord,
    /// Goal cached from the most recent successful search.
    pub goal: Option<CellCoord>,
    /// Number of planned steps not yet taken.
    pub remaining_steps: usize,
}

/// Read-only snapshot describing all evaders.
#[derive(Clone, Debug, Default)]
pub struct EvaderView {
    snapshots: Vec<EvaderSnapshot>,
}

impl EvaderView {
    /// Creates a new evader view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EvaderSnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured evader snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EvaderSnapshot> {
        self.snapshots.iter()
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EvaderSnapshot> {
        self.snapshots
    }
}

/// Terminal state reached by a simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Terminal {
    /// An evader stood inside the blast zone.
    Caught {
        /// Lowest-numbered evader found inside the zone.
        evader: EvaderId,
        /// Cell the evader occupied.
        cell: CellCoord,
    },
    /// The threat ran out of untouched neighbors and nothing was caught.
    Stalled {
        /// Cell the threat is stuck on.
        cell: CellCoord,
    },
}

/// Result of a completed simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Outcome {
    /// How the run ended.
    pub terminal: Terminal,
    /// Buildings destroyed before the run ended.
    pub destroyed: u32,
    /// Ticks executed, including the terminal one.
    pub ticks: u64,
}
