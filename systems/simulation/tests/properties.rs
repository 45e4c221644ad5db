use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tokyo_core::CellKind;
use tokyo_system_simulation::{simulate, Simulation, SimulationState};
use tokyo_world::{query, Layout};

const SEEDS: u64 = 200;

fn random_layout(seed: u64) -> Layout {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let columns: u32 = rng.gen_range(1..=9);
    let rows: u32 = rng.gen_range(1..=9);
    let threat = (rng.gen_range(0..columns), rng.gen_range(0..rows));

    let mut source = format!("{columns} {rows}\n");
    for row in 0..rows {
        for column in 0..columns {
            let glyph = if (column, row) == threat {
                'G'
            } else {
                match rng.gen_range(0..20) {
                    0..=5 => 'R',
                    6..=7 => 'X',
                    8 => 'M',
                    _ => '.',
                }
            };
            source.push(glyph);
        }
        source.push('\n');
    }

    source.parse().expect("generated layout parses")
}

#[test]
fn random_runs_respect_world_invariants() {
    for seed in 0..SEEDS {
        let layout = random_layout(seed);
        let standing = u32::try_from(layout.residential_count()).expect("small grid");
        let mut simulation = Simulation::new(&layout);
        assert_eq!(simulation.state(), SimulationState::Running);
        let mut destroyed = 0;
        let mut previous: Vec<CellKind> = query::terrain_view(simulation.world())
            .iter()
            .map(|(_, cell)| cell.kind())
            .collect();

        let outcome = loop {
            let state = simulation.tick();
            let world = simulation.world();
            let terrain = query::terrain_view(world);

            let now = query::destroyed_count(world);
            assert!(now >= destroyed, "seed {seed}: tally went backwards");
            assert!(now <= standing, "seed {seed}: destroyed more than existed");
            destroyed = now;

            for ((_, cell), before) in terrain.iter().zip(&previous) {
                match before {
                    CellKind::Destroyed => assert_eq!(cell.kind(), CellKind::Destroyed),
                    CellKind::Empty => assert_eq!(cell.kind(), CellKind::Empty),
                    CellKind::Residential => {}
                }
            }
            previous = terrain.iter().map(|(_, cell)| cell.kind()).collect();

            for evader in query::evader_view(world).iter() {
                assert!(
                    !terrain.is_residential(evader.cell),
                    "seed {seed}: evader {:?} stands on a building",
                    evader.id
                );
            }

            match state {
                SimulationState::Running => {
                    let zone = query::blast_zone(world);
                    assert!(zone.contains(query::threat(world).cell), "seed {seed}");
                    assert_eq!(
                        zone,
                        query::rescanned_blast_zone(world),
                        "seed {seed}: incremental zone diverged from a full scan"
                    );
                }
                SimulationState::Finished(outcome) => break outcome,
            }
        };

        assert_eq!(outcome.destroyed, destroyed, "seed {seed}");
        assert_eq!(simulation.state(), SimulationState::Finished(outcome));
    }
}

#[test]
fn identical_layouts_produce_identical_outcomes() {
    for seed in 0..SEEDS {
        let layout = random_layout(seed);
        assert_eq!(simulate(&layout), simulate(&layout), "seed {seed}");
    }
}

#[test]
fn every_run_terminates_within_one_tick_per_cell() {
    for seed in 0..SEEDS {
        let layout = random_layout(seed);
        let cells = u64::from(layout.columns()) * u64::from(layout.rows());

        let outcome = simulate(&layout);

        assert!(outcome.ticks <= cells, "seed {seed}: {} ticks", outcome.ticks);
    }
}
