#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Evader path planner that steers mobile units onto the blast zone's arms.

use tokyo_core::{BlastZone, CellCoord, Command, EvaderSnapshot, EvaderView, TerrainView};

/// Pure system that emits evader plans whenever a cached goal goes stale.
#[derive(Debug, Default)]
pub struct Evasion {
    search: DepthFirstSearch,
}

impl Evasion {
    /// Plans for every evader whose cached goal has been overtaken by the zone.
    ///
    /// Evaders that fail to find any reachable zone cell receive an empty plan
    /// so they stay put; an evader that already has no plan is left alone.
    pub fn handle(
        &mut self,
        evaders: &EvaderView,
        terrain: TerrainView<'_>,
        zone: &BlastZone,
        out: &mut Vec<Command>,
    ) {
        for evader in evaders.iter() {
            if !needs_plan(evader, zone) {
                continue;
            }

            match self
                .search
                .run(terrain, evader.cell, |cell| zone.contains(cell))
            {
                Some(path) => out.push(Command::SetEvaderPlan {
                    evader: evader.id,
                    goal: path.last().copied(),
                    path,
                }),
                None if evader.goal.is_some() || evader.remaining_steps > 0 => {
                    out.push(Command::SetEvaderPlan {
                        evader: evader.id,
                        goal: None,
                        path: Vec::new(),
                    });
                }
                None => {}
            }
        }
    }
}

/// Reports whether the evader's cached goal must be recomputed.
///
/// A plan is followed until the blast zone covers its goal or its steps run
/// out. Evaders without a goal always search.
#[must_use]
pub fn needs_plan(evader: &EvaderSnapshot, zone: &BlastZone) -> bool {
    match evader.goal {
        Some(goal) => zone.contains(goal) || evader.remaining_steps == 0,
        None => true,
    }
}

/// Depth-first search with reusable scratch buffers.
///
/// The frontier is a stack and neighbors are discovered in priority order, so
/// the goal found is the first one discovered in that order rather than the
/// nearest. Goal tests happen when a cell is discovered, not when it is popped.
#[derive(Debug, Default)]
struct DepthFirstSearch {
    discovered: Vec<bool>,
    predecessors: Vec<Option<CellCoord>>,
    stack: Vec<CellCoord>,
}

impl DepthFirstSearch {
    /// Returns the path from `start` (exclusive) to the first discovered goal.
    fn run<F>(
        &mut self,
        terrain: TerrainView<'_>,
        start: CellCoord,
        is_goal: F,
    ) -> Option<Vec<CellCoord>>
    where
        F: Fn(CellCoord) -> bool,
    {
        let (columns, rows) = terrain.dimensions();
        self.prepare(columns, rows);
        let width = usize::try_from(columns).ok()?;

        let start_index = index(width, start)?;
        self.discovered[start_index] = true;
        self.stack.push(start);

        let mut goal = None;
        'search: while let Some(cell) = self.stack.pop() {
            for neighbor in terrain.neighbors(cell) {
                let Some(neighbor_index) = index(width, neighbor) else {
                    continue;
                };
                if self.discovered[neighbor_index] || terrain.is_residential(neighbor) {
                    continue;
                }

                self.discovered[neighbor_index] = true;
                self.predecessors[neighbor_index] = Some(cell);
                if is_goal(neighbor) {
                    goal = Some(neighbor);
                    break 'search;
                }
                self.stack.push(neighbor);
            }
        }

        let goal = goal?;
        let mut path = vec![goal];
        let mut cursor = goal;
        while let Some(previous) = index(width, cursor).and_then(|at| self.predecessors[at]) {
            if previous == start {
                break;
            }
            path.push(previous);
            cursor = previous;
        }
        path.reverse();
        Some(path)
    }

    fn prepare(&mut self, columns: u32, rows: u32) {
        let cell_count = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        self.discovered.clear();
        self.discovered.resize(cell_count, false);
        self.predecessors.clear();
        self.predecessors.resize(cell_count, None);
        self.stack.clear();
    }
}

fn index(width: usize, cell: CellCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokyo_core::{Cell, CellKind, EvaderId, Span, VisitState};

    fn terrain_cells(rows: &[&str]) -> (Vec<Cell>, u32, u32) {
        let columns = rows[0].len() as u32;
        let cells = rows
            .iter()
            .flat_map(|row| row.chars())
            .map(|glyph| {
                let kind = if glyph == 'R' {
                    CellKind::Residential
                } else {
                    CellKind::Empty
                };
                Cell::new(kind, VisitState::Untouched)
            })
            .collect();
        (cells, columns, rows.len() as u32)
    }

    fn snapshot(
        cell: CellCoord,
        goal: Option<CellCoord>,
        remaining_steps: usize,
    ) -> EvaderSnapshot {
        EvaderSnapshot {
            id: EvaderId::new(0),
            cell,
            goal,
            remaining_steps,
        }
    }

    #[test]
    fn search_follows_stack_order_not_shortest_distance() {
        let (cells, columns, rows) = terrain_cells(&["....", "...."]);
        let terrain = TerrainView::new(&cells, columns, rows);
        let goal = CellCoord::new(3, 0);
        let mut search = DepthFirstSearch::default();

        let path = search
            .run(terrain, CellCoord::new(1, 0), |cell| cell == goal)
            .expect("goal reachable");

        assert_eq!(
            path,
            vec![
                CellCoord::new(1, 1),
                CellCoord::new(2, 1),
                CellCoord::new(3, 1),
                goal,
            ]
        );
    }

    #[test]
    fn search_routes_around_buildings() {
        let (cells, columns, rows) = terrain_cells(&["..R.", ".RR.", "...."]);
        let terrain = TerrainView::new(&cells, columns, rows);
        let goal = CellCoord::new(3, 0);
        let mut search = DepthFirstSearch::default();

        let path = search
            .run(terrain, CellCoord::new(0, 0), |cell| cell == goal)
            .expect("goal reachable");

        assert_eq!(path.last(), Some(&goal));
        assert!(path.iter().all(|cell| !terrain.is_residential(*cell)));
        let mut previous = CellCoord::new(0, 0);
        for step in &path {
            assert_eq!(previous.manhattan_distance(*step), 1);
            previous = *step;
        }
    }

    #[test]
    fn search_fails_when_walled_in() {
        let (cells, columns, rows) = terrain_cells(&[".R.", "RR.", "..."]);
        let terrain = TerrainView::new(&cells, columns, rows);
        let mut search = DepthFirstSearch::default();

        assert_eq!(
            search.run(terrain, CellCoord::new(0, 0), |cell| cell == CellCoord::new(2, 2)),
            None
        );
    }

    #[test]
    fn cached_goal_is_kept_until_the_zone_covers_it() {
        let zone = BlastZone::new(CellCoord::new(2, 2), Span::new(0, 4), Span::new(0, 4));
        let covered = CellCoord::new(2, 0);
        let outside = CellCoord::new(1, 0);
        let start = CellCoord::new(0, 0);

        assert!(needs_plan(&snapshot(start, Some(covered), 2), &zone));
        assert!(!needs_plan(&snapshot(start, Some(outside), 1), &zone));
        assert!(needs_plan(&snapshot(start, Some(outside), 0), &zone));
        assert!(needs_plan(&snapshot(start, None, 0), &zone));
    }

    #[test]
    fn handle_plans_only_stale_evaders() {
        let (cells, columns, rows) = terrain_cells(&["...", "...", "..."]);
        let terrain = TerrainView::new(&cells, columns, rows);
        let zone = BlastZone::new(CellCoord::new(2, 2), Span::new(2, 2), Span::new(2, 2));
        let fresh = EvaderSnapshot {
            id: EvaderId::new(0),
            cell: CellCoord::new(0, 0),
            goal: None,
            remaining_steps: 0,
        };
        let settled = EvaderSnapshot {
            id: EvaderId::new(1),
            cell: CellCoord::new(2, 0),
            goal: Some(CellCoord::new(0, 2)),
            remaining_steps: 2,
        };
        let view = EvaderView::from_snapshots(vec![settled, fresh]);
        let mut evasion = Evasion::default();
        let mut commands = Vec::new();

        evasion.handle(&view, terrain, &zone, &mut commands);

        assert_eq!(commands.len(), 1);
        let Command::SetEvaderPlan { evader, goal, path } = &commands[0] else {
            panic!("expected a plan command");
        };
        assert_eq!(*evader, EvaderId::new(0));
        assert_eq!(*goal, Some(CellCoord::new(2, 2)));
        assert_eq!(path.last(), Some(&CellCoord::new(2, 2)));
    }
}
