use tokyo_core::{CellCoord, CellKind, EvaderId, Outcome, Terminal};
use tokyo_system_simulation::{simulate, Simulation, SimulationState};
use tokyo_world::{query, Layout};

fn layout(source: &str) -> Layout {
    source.parse().expect("layout parses")
}

fn evader_cell(simulation: &Simulation) -> CellCoord {
    query::evader_view(simulation.world()).into_vec()[0].cell
}

#[test]
fn evader_beside_the_threat_is_caught_on_the_first_tick() {
    let outcome = simulate(&layout("2 1\nGM"));

    assert_eq!(
        outcome,
        Outcome {
            terminal: Terminal::Caught {
                evader: EvaderId::new(0),
                cell: CellCoord::new(1, 0),
            },
            destroyed: 0,
            ticks: 1,
        }
    );
}

#[test]
fn evader_already_in_the_zone_is_caught_before_anything_burns() {
    let outcome = simulate(&layout("3 3\nR..\n.GM\n..R"));

    assert_eq!(outcome.destroyed, 0);
    assert_eq!(outcome.ticks, 1);
    assert_eq!(
        outcome.terminal,
        Terminal::Caught {
            evader: EvaderId::new(0),
            cell: CellCoord::new(2, 1),
        }
    );
}

#[test]
fn ring_of_buildings_is_destroyed_then_the_threat_stalls_in_a_corner() {
    let outcome = simulate(&layout(
        "5 5\n\
         .....\n\
         .RRR.\n\
         .RGR.\n\
         .RRR.\n\
         .....",
    ));

    // Eight buildings, then sixteen open cells around the rim.
    assert_eq!(
        outcome,
        Outcome {
            terminal: Terminal::Stalled {
                cell: CellCoord::new(0, 0)
            },
            destroyed: 8,
            ticks: 25,
        }
    );
}

#[test]
fn evader_keeps_its_route_until_the_zone_covers_the_goal() {
    let mut simulation = Simulation::new(&layout(
        "6 4\n\
         M.R...\n\
         .RR...\n\
         ......\n\
         ..RRRG",
    ));
    let goal = Some(CellCoord::new(4, 2));

    assert_eq!(simulation.tick(), SimulationState::Running);
    assert_eq!(query::destroyed_count(simulation.world()), 1);
    let snapshot = query::evader_view(simulation.world()).into_vec().remove(0);
    assert_eq!(snapshot.cell, CellCoord::new(0, 1));
    assert_eq!(snapshot.goal, goal);
    assert_eq!(snapshot.remaining_steps, 5);

    // The zone slides west along the bottom row, away from the goal, so the
    // original route is followed.
    assert_eq!(simulation.tick(), SimulationState::Running);
    assert_eq!(query::destroyed_count(simulation.world()), 2);
    assert_eq!(evader_cell(&simulation), CellCoord::new(0, 2));

    assert_eq!(simulation.tick(), SimulationState::Running);
    assert_eq!(query::destroyed_count(simulation.world()), 3);
    let snapshot = query::evader_view(simulation.world()).into_vec().remove(0);
    assert_eq!(snapshot.cell, CellCoord::new(1, 2));
    assert_eq!(snapshot.goal, goal);
    assert_eq!(snapshot.remaining_steps, 3);

    // The threat steps north onto row 2, the zone covers the goal and the
    // fresh search ends on the threat's own row.
    assert_eq!(
        simulation.tick(),
        SimulationState::Finished(Outcome {
            terminal: Terminal::Caught {
                evader: EvaderId::new(0),
                cell: CellCoord::new(2, 2),
            },
            destroyed: 3,
            ticks: 4,
        })
    );
    assert_eq!(simulation.state(), simulation.tick());
    let terrain = query::terrain_view(simulation.world());
    for column in 2..5 {
        assert_eq!(
            terrain.kind(CellCoord::new(column, 3)),
            Some(CellKind::Destroyed)
        );
    }
}

#[test]
fn lowest_numbered_exposed_evader_is_reported() {
    let outcome = simulate(&layout("3 1\nMGM"));

    assert_eq!(
        outcome.terminal,
        Terminal::Caught {
            evader: EvaderId::new(0),
            cell: CellCoord::new(0, 0),
        }
    );
}
