//! Blast-zone tracker used by the world crate.

use tokyo_core::{BlastZone, CellCoord, Direction, ScanMode, Span, TerrainView};

/// Keeps the cross-shaped blast zone anchored on the threat.
///
/// Each arm extends from the anchor through open ground and rubble and stops
/// on the first standing building, which it includes, or on the grid edge.
/// Incremental refreshes reuse an arm's previous bound when the anchor neither
/// left that arm's line nor travelled along it in the arm's direction; the
/// only cell whose terrain changes between refreshes is the one the threat
/// just entered, so such a bound cannot have moved.
#[derive(Clone, Debug)]
pub(crate) struct BlastZoneTracker {
    zone: BlastZone,
}

impl BlastZoneTracker {
    pub(crate) fn new(anchor: CellCoord) -> Self {
        Self {
            zone: BlastZone::at(anchor),
        }
    }

    pub(crate) fn zone(&self) -> BlastZone {
        self.zone
    }

    /// Re-anchors the zone on `anchor`. Returns whether the zone changed.
    pub(crate) fn refresh(
        &mut self,
        terrain: TerrainView<'_>,
        anchor: CellCoord,
        mode: ScanMode,
    ) -> bool {
        let previous = self.zone;
        self.zone = match mode {
            ScanMode::Full => scan(terrain, anchor, None),
            ScanMode::Incremental => scan(terrain, anchor, Some(&previous)),
        };
        self.zone != previous
    }
}

/// Computes the zone around `anchor`, reusing arms of `previous` where valid.
pub(crate) fn scan(
    terrain: TerrainView<'_>,
    anchor: CellCoord,
    previous: Option<&BlastZone>,
) -> BlastZone {
    let arm = |direction: Direction| -> u32 {
        previous
            .filter(|previous| !needs_rescan(previous.anchor(), anchor, direction))
            .map(|previous| bound_of(previous, direction))
            .filter(|bound| covers(*bound, anchor, direction))
            .unwrap_or_else(|| reach(terrain, anchor, direction))
    };

    let north = arm(Direction::North);
    let east = arm(Direction::East);
    let south = arm(Direction::South);
    let west = arm(Direction::West);

    BlastZone::new(anchor, Span::new(north, south), Span::new(west, east))
}

fn needs_rescan(previous: CellCoord, anchor: CellCoord, direction: Direction) -> bool {
    match direction {
        Direction::North => {
            anchor.column() != previous.column() || anchor.row() < previous.row()
        }
        Direction::South => {
            anchor.column() != previous.column() || anchor.row() > previous.row()
        }
        Direction::West => {
            anchor.row() != previous.row() || anchor.column() < previous.column()
        }
        Direction::East => {
            anchor.row() != previous.row() || anchor.column() > previous.column()
        }
    }
}

fn bound_of(zone: &BlastZone, direction: Direction) -> u32 {
    match direction {
        Direction::North => zone.rows().start(),
        Direction::South => zone.rows().end(),
        Direction::West => zone.columns().start(),
        Direction::East => zone.columns().end(),
    }
}

fn covers(bound: u32, anchor: CellCoord, direction: Direction) -> bool {
    match direction {
        Direction::North => bound <= anchor.row(),
        Direction::South => bound >= anchor.row(),
        Direction::West => bound <= anchor.column(),
        Direction::East => bound >= anchor.column(),
    }
}

fn reach(terrain: TerrainView<'_>, anchor: CellCoord, direction: Direction) -> u32 {
    let mut cursor = anchor;
    while let Some(next) = terrain.neighbor(cursor, direction) {
        cursor = next;
        if terrain.is_residential(next) {
            break;
        }
    }

    if direction.is_vertical() {
        cursor.row()
    } else {
        cursor.column()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokyo_core::{Cell, CellKind, VisitState};

    fn terrain_cells(rows: &[&str]) -> (Vec<Cell>, u32, u32) {
        let columns = rows[0].len() as u32;
        let cells = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|glyph| {
                let kind = match glyph {
                    'R' => CellKind::Residential,
                    'X' => CellKind::Destroyed,
                    _ => CellKind::Empty,
                };
                Cell::new(kind, VisitState::Untouched)
            })
            .collect();
        (cells, columns, rows.len() as u32)
    }

    #[test]
    fn arms_stop_on_first_building_inclusive() {
        let (cells, columns, rows) = terrain_cells(&[
            "..R..", //
            ".....", //
            "R.X.R", //
            ".....", //
            ".....", //
        ]);
        let terrain = TerrainView::new(&cells, columns, rows);
        let anchor = CellCoord::new(2, 3);

        let zone = scan(terrain, anchor, None);

        assert_eq!(zone.rows(), Span::new(0, 4));
        assert_eq!(zone.columns(), Span::new(0, 4));

        let zone = scan(terrain, CellCoord::new(1, 2), None);
        assert_eq!(zone.rows(), Span::new(0, 4));
        assert_eq!(zone.columns(), Span::new(0, 4));

        let zone = scan(terrain, CellCoord::new(4, 1), None);
        assert_eq!(zone.rows(), Span::new(0, 2));
        assert_eq!(zone.columns(), Span::new(0, 4));
    }

    #[test]
    fn building_blocks_further_reach() {
        let (cells, columns, rows) = terrain_cells(&[
            "...", //
            ".R.", //
            "...", //
            ".R.", //
            "...", //
        ]);
        let terrain = TerrainView::new(&cells, columns, rows);

        let zone = scan(terrain, CellCoord::new(1, 2), None);

        assert_eq!(zone.rows(), Span::new(1, 3));
        assert_eq!(zone.columns(), Span::new(0, 2));
        assert!(zone.contains(CellCoord::new(1, 1)));
        assert!(!zone.contains(CellCoord::new(1, 0)));
    }

    #[test]
    fn incremental_refresh_without_movement_matches_full_scan() {
        let (cells, columns, rows) = terrain_cells(&[
            "R....", //
            "..R..", //
            ".....", //
            "...R.", //
        ]);
        let terrain = TerrainView::new(&cells, columns, rows);
        let anchor = CellCoord::new(2, 2);
        let mut tracker = BlastZoneTracker::new(anchor);

        assert!(tracker.refresh(terrain, anchor, ScanMode::Full));
        let full = tracker.zone();
        assert!(!tracker.refresh(terrain, anchor, ScanMode::Incremental));

        assert_eq!(tracker.zone(), full);
    }

    #[test]
    fn incremental_refresh_skips_arm_behind_the_anchor() {
        let (mut cells, columns, rows) = terrain_cells(&[
            ".....", //
            "..R..", //
            ".....", //
            ".....", //
        ]);
        let start = CellCoord::new(2, 2);
        let mut tracker = BlastZoneTracker::new(start);
        assert!(tracker.refresh(TerrainView::new(&cells, columns, rows), start, ScanMode::Full));
        assert_eq!(tracker.zone().rows(), Span::new(1, 3));

        // The threat flattens the building above and steps into it.
        cells[7] = cells[7].with_kind(CellKind::Destroyed);
        let terrain = TerrainView::new(&cells, columns, rows);
        let moved = CellCoord::new(2, 1);
        assert!(tracker.refresh(terrain, moved, ScanMode::Incremental));

        assert_eq!(tracker.zone().rows(), Span::new(0, 3));
        assert_eq!(tracker.zone().columns(), Span::new(0, 4));
        assert_eq!(tracker.zone(), scan(terrain, moved, None));
    }

    #[test]
    fn zone_always_contains_anchor() {
        let (cells, columns, rows) = terrain_cells(&["RRR", "R.R", "RRR"]);
        let terrain = TerrainView::new(&cells, columns, rows);
        let anchor = CellCoord::new(1, 1);

        let zone = scan(terrain, anchor, None);

        assert!(zone.contains(anchor));
        assert_eq!(zone.rows(), Span::new(0, 2));
        assert_eq!(zone.columns(), Span::new(0, 2));
    }
}
