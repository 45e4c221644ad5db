#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Pure threat-walk system that picks the threat's next cell.

use tokyo_core::{CellCoord, CellKind, Command, Event, TerrainView, VisitState};

/// Reacts to threat movement by proposing the next step of the walk.
#[derive(Debug, Default)]
pub struct Rampage;

impl Rampage {
    /// Emits a [`Command::PlanThreatStep`] whenever the threat has just been
    /// placed or has just moved.
    pub fn handle(
        &self,
        events: &[Event],
        terrain: TerrainView<'_>,
        threat: CellCoord,
        out: &mut Vec<Command>,
    ) {
        let moved = events.iter().any(|event| {
            matches!(
                event,
                Event::Started { .. } | Event::ThreatAdvanced { .. }
            )
        });
        if !moved {
            return;
        }

        out.push(Command::PlanThreatStep {
            next: choose_next(terrain, threat),
        });
    }
}

/// Selects the threat's next cell among the untouched neighbors of `from`.
///
/// Neighbors are scanned up, right, down, left. The first untouched building
/// wins outright; otherwise the first untouched neighbor of any kind is used.
/// Returns `None` when every in-bounds neighbor has already been visited.
#[must_use]
pub fn choose_next(terrain: TerrainView<'_>, from: CellCoord) -> Option<CellCoord> {
    let mut first_untouched = None;
    for neighbor in terrain.neighbors(from) {
        let Some(cell) = terrain.cell(neighbor) else {
            continue;
        };
        if cell.visit() != VisitState::Untouched {
            continue;
        }
        if cell.kind() == CellKind::Residential {
            return Some(neighbor);
        }
        if first_untouched.is_none() {
            first_untouched = Some(neighbor);
        }
    }

    first_untouched
}
