#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the Tokyo rampage simulation.

mod blast_zone;
mod grid;
mod layout;

use std::collections::VecDeque;

use tokyo_core::{CellCoord, Command, EvaderId, Event, ScanMode, TerrainView, VisitState};
use tracing::{trace, warn};

use crate::{blast_zone::BlastZoneTracker, grid::Grid};

pub use grid::TerrainError;
pub use layout::{Layout, LayoutError};

/// Represents the authoritative state of one simulation run.
#[derive(Clone, Debug)]
pub struct World {
    grid: Grid,
    threat: Threat,
    blast_zone: BlastZoneTracker,
    evaders: Vec<Evader>,
}

impl World {
    /// Creates a world from a decoded layout. The threat starts with no
    /// pending step and the blast zone covers only its starting cell until
    /// [`Command::Begin`] is applied.
    #[must_use]
    pub fn new(layout: &Layout) -> Self {
        let start = layout.threat();
        let evaders = layout
            .evaders()
            .iter()
            .zip(0..)
            .map(|(&cell, id)| Evader::new(EvaderId::new(id), cell))
            .collect();

        Self {
            grid: Grid::from_layout(layout),
            threat: Threat {
                cell: start,
                pending: None,
            },
            blast_zone: BlastZoneTracker::new(start),
            evaders,
        }
    }

    fn advance_threat(&mut self, out_events: &mut Vec<Event>) {
        let from = self.threat.cell;
        let Some(to) = self.threat.pending.take() else {
            out_events.push(Event::ThreatStalled { cell: from });
            return;
        };

        self.grid.hand_over(from, to);
        self.threat.cell = to;
        out_events.push(Event::ThreatAdvanced { from, to });

        if !self.grid.view().is_residential(to) {
            return;
        }
        match self.grid.destroy(to) {
            Ok(destroyed) => {
                trace!(
                    column = to.column(),
                    row = to.row(),
                    destroyed,
                    "building destroyed"
                );
                out_events.push(Event::BuildingDestroyed {
                    cell: to,
                    destroyed,
                });
            }
            Err(error) => warn!(%error, "threat could not flatten its cell"),
        }
    }

    fn step_evaders(&mut self, out_events: &mut Vec<Event>) {
        let terrain = self.grid.view();
        for evader in &mut self.evaders {
            let Some(next) = evader.next_step() else {
                continue;
            };

            if terrain.is_residential(next) || evader.cell.manhattan_distance(next) != 1 {
                evader.clear_plan();
                continue;
            }

            let from = evader.cell;
            evader.advance(next);
            out_events.push(Event::EvaderAdvanced {
                evader: evader.id,
                from,
                to: next,
            });
        }
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::Begin => {
            let anchor = world.threat.cell;
            let _ = world
                .blast_zone
                .refresh(world.grid.view(), anchor, ScanMode::Full);
            out_events.push(Event::Started { threat: anchor });
            out_events.push(Event::BlastZoneChanged {
                zone: world.blast_zone.zone(),
            });
        }
        Command::PlanThreatStep { next } => {
            let terrain = world.grid.view();
            let from = world.threat.cell;
            world.threat.pending = next.filter(|cell| {
                from.manhattan_distance(*cell) == 1
                    && terrain.visit(*cell) == Some(VisitState::Untouched)
            });
        }
        Command::AdvanceThreat => world.advance_threat(out_events),
        Command::RefreshBlastZone { mode } => {
            let anchor = world.threat.cell;
            if world.blast_zone.refresh(world.grid.view(), anchor, mode) {
                out_events.push(Event::BlastZoneChanged {
                    zone: world.blast_zone.zone(),
                });
            }
        }
        Command::SetEvaderPlan { evader, goal, path } => {
            let terrain = world.grid.view();
            let Some(target) = world
                .evaders
                .iter_mut()
                .find(|candidate| candidate.id == evader)
            else {
                return;
            };

            if target.assign_plan(goal, path, terrain) {
                out_events.push(Event::EvaderPlanned {
                    evader,
                    goal: target.goal,
                    steps: target.path.len(),
                });
            } else {
                out_events.push(Event::EvaderPlanRejected { evader });
            }
        }
        Command::StepEvaders => world.step_evaders(out_events),
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use tokyo_core::{
        BlastZone, CellCoord, EvaderId, EvaderSnapshot, EvaderView, TerrainView, ThreatSnapshot,
    };

    use super::World;

    /// Exposes a read-only view of the terrain grid.
    #[must_use]
    pub fn terrain_view(world: &World) -> TerrainView<'_> {
        world.grid.view()
    }

    /// Captures the threat's position and pending step.
    #[must_use]
    pub fn threat(world: &World) -> ThreatSnapshot {
        ThreatSnapshot {
            cell: world.threat.cell,
            pending: world.threat.pending,
        }
    }

    /// Blast zone as of the most recent refresh.
    #[must_use]
    pub fn blast_zone(world: &World) -> BlastZone {
        world.blast_zone.zone()
    }

    /// Blast zone recomputed from scratch around the threat's current cell.
    ///
    /// The stored zone is left untouched; callers use this as ground truth for
    /// the incremental refresh.
    #[must_use]
    pub fn rescanned_blast_zone(world: &World) -> BlastZone {
        super::blast_zone::scan(world.grid.view(), world.threat.cell, None)
    }

    /// Buildings destroyed so far.
    #[must_use]
    pub fn destroyed_count(world: &World) -> u32 {
        world.grid.destroyed()
    }

    /// Captures a read-only view of every evader.
    #[must_use]
    pub fn evader_view(world: &World) -> EvaderView {
        EvaderView::from_snapshots(
            world
                .evaders
                .iter()
                .map(|evader| EvaderSnapshot {
                    id: evader.id,
                    cell: evader.cell,
                    goal: evader.goal,
                    remaining_steps: evader.path.len(),
                })
                .collect(),
        )
    }

    /// Lowest-numbered evader standing inside the current blast zone.
    #[must_use]
    pub fn exposed_evader(world: &World) -> Option<(EvaderId, CellCoord)> {
        let zone = world.blast_zone.zone();
        world
            .evaders
            .iter()
            .find(|evader| zone.contains(evader.cell))
            .map(|evader| (evader.id, evader.cell))
    }
}

#[derive(Clone, Copy, Debug)]
struct Threat {
    cell: CellCoord,
    pending: Option<CellCoord>,
}

#[derive(Clone, Debug)]
struct Evader {
    id: EvaderId,
    cell: CellCoord,
    path: VecDeque<CellCoord>,
    goal: Option<CellCoord>,
}

impl Evader {
    fn new(id: EvaderId, cell: CellCoord) -> Self {
        Self {
            id,
            cell,
            path: VecDeque::new(),
            goal: None,
        }
    }

    /// Installs a plan if every step is an in-bounds, non-residential move to
    /// an adjacent cell. A refused plan leaves the evader with no plan at all.
    fn assign_plan(
        &mut self,
        goal: Option<CellCoord>,
        path: Vec<CellCoord>,
        terrain: TerrainView<'_>,
    ) -> bool {
        let mut previous = self.cell;
        for &step in &path {
            if !terrain.position_valid(step)
                || terrain.is_residential(step)
                || previous.manhattan_distance(step) != 1
            {
                self.clear_plan();
                return false;
            }
            previous = step;
        }

        self.path = path.into();
        self.goal = goal;
        true
    }

    fn next_step(&self) -> Option<CellCoord> {
        self.path.front().copied()
    }

    fn advance(&mut self, destination: CellCoord) {
        let _ = self.path.pop_front();
        self.cell = destination;
    }

    fn clear_plan(&mut self) {
        self.path.clear();
        self.goal = None;
    }
}
