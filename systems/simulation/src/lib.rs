#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Simulation driver that runs one Tokyo grid to completion.
//!
//! Each tick advances the threat, checks whether an evader stands in the
//! blast zone, refreshes the zone and the threat's next step, lets every
//! evader replan and take one step, and checks again. The run ends when an
//! evader is caught or, after a tick in which the threat could not move, when
//! nothing was caught.

use tokyo_core::{Command, Event, Outcome, ScanMode, Terminal};
use tokyo_system_evasion::Evasion;
use tokyo_system_rampage::Rampage;
use tokyo_world::{self as world, query, Layout, World};
use tracing::{debug, info};

/// Lifecycle of a simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SimulationState {
    /// More ticks are required.
    Running,
    /// The run reached a terminal state.
    Finished(Outcome),
}

/// Owns one world and the systems that drive it.
#[derive(Debug)]
pub struct Simulation {
    world: World,
    rampage: Rampage,
    evasion: Evasion,
    ticks: u64,
    state: SimulationState,
}

impl Simulation {
    /// Loads the layout, scans the initial blast zone and picks the threat's
    /// first step.
    #[must_use]
    pub fn new(layout: &Layout) -> Self {
        let mut simulation = Self {
            world: World::new(layout),
            rampage: Rampage,
            evasion: Evasion::default(),
            ticks: 0,
            state: SimulationState::Running,
        };

        let mut events = Vec::new();
        world::apply(&mut simulation.world, Command::Begin, &mut events);
        simulation.plan_threat(&events);
        simulation
    }

    /// Read-only access to the world being simulated.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Current lifecycle state.
    #[must_use]
    pub fn state(&self) -> SimulationState {
        self.state
    }

    /// Runs a single tick. Finished simulations are left untouched.
    pub fn tick(&mut self) -> SimulationState {
        if let SimulationState::Finished(_) = self.state {
            return self.state;
        }
        self.ticks += 1;

        let mut events = Vec::new();
        world::apply(&mut self.world, Command::AdvanceThreat, &mut events);
        let moved = events
            .iter()
            .any(|event| matches!(event, Event::ThreatAdvanced { .. }));

        if moved {
            if let Some(terminal) = self.caught() {
                return self.finish(terminal);
            }
            world::apply(
                &mut self.world,
                Command::RefreshBlastZone {
                    mode: ScanMode::Incremental,
                },
                &mut events,
            );
            self.plan_threat(&events);
        }

        self.move_evaders();
        if let Some(terminal) = self.caught() {
            return self.finish(terminal);
        }

        if !moved {
            let cell = query::threat(&self.world).cell;
            return self.finish(Terminal::Stalled { cell });
        }

        debug!(
            tick = self.ticks,
            destroyed = query::destroyed_count(&self.world),
            "tick complete"
        );
        self.state
    }

    /// Ticks until the run finishes.
    pub fn run(mut self) -> Outcome {
        loop {
            if let SimulationState::Finished(outcome) = self.tick() {
                return outcome;
            }
        }
    }

    fn plan_threat(&mut self, events: &[Event]) {
        let mut commands = Vec::new();
        self.rampage.handle(
            events,
            query::terrain_view(&self.world),
            query::threat(&self.world).cell,
            &mut commands,
        );
        self.submit(commands);
    }

    fn move_evaders(&mut self) {
        let mut commands = Vec::new();
        self.evasion.handle(
            &query::evader_view(&self.world),
            query::terrain_view(&self.world),
            &query::blast_zone(&self.world),
            &mut commands,
        );
        commands.push(Command::StepEvaders);
        self.submit(commands);
    }

    fn submit(&mut self, commands: Vec<Command>) {
        let mut events = Vec::new();
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }
    }

    fn caught(&self) -> Option<Terminal> {
        query::exposed_evader(&self.world).map(|(evader, cell)| Terminal::Caught { evader, cell })
    }

    fn finish(&mut self, terminal: Terminal) -> SimulationState {
        let outcome = Outcome {
            terminal,
            destroyed: query::destroyed_count(&self.world),
            ticks: self.ticks,
        };
        info!(
            ticks = outcome.ticks,
            destroyed = outcome.destroyed,
            ?terminal,
            "simulation finished"
        );
        self.state = SimulationState::Finished(outcome);
        self.state
    }
}

/// Runs the layout to completion and reports the outcome.
#[must_use]
pub fn simulate(layout: &Layout) -> Outcome {
    Simulation::new(layout).run()
}
