#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Host-facing match session for Hunters.
//!
//! A [`Session`] wires the authoritative world to the pure systems. Hosts
//! register a player, call [`Session::step`] once per tick and forward player
//! input through [`Session::apply_input`]. When a match ends, its final score
//! is handed to a [`ScoreSink`] exactly once.

use std::time::Duration;

use hunters_core::{
    CellCoord, Command, Difficulty, Direction, EnemySnapshot, Event, GameMode, MatchOutcome,
    MatchPhase, MatchRules, PlayerSnapshot, TerrainGrid, TrapRejection, TrapSnapshot,
};
use hunters_system_enemy_ai::EnemyAi;
use hunters_system_map_generation as map_generation;
use hunters_system_scoring::Scoring;
use hunters_system_spawning::{Config as SpawningConfig, Spawning};
use hunters_world::{self as world, query, World};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use tracing::{debug, info, warn};

pub use hunters_core::ScoreSink;
pub use hunters_world::Tally;

/// Smallest grid that still has room for distinct start and exit cells.
const MIN_GRID_SIDE: u32 = 4;

/// Errors raised while registering a match.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The player name was empty or only whitespace.
    #[error("player name must not be empty")]
    EmptyName,
    /// The configured grid cannot hold a playable map.
    #[error("grid of {columns}x{rows} tiles is too small; both sides need at least 4")]
    GridTooSmall {
        /// Configured number of columns.
        columns: u32,
        /// Configured number of rows.
        rows: u32,
    },
    /// A zero tick would never advance the match clock.
    #[error("tick length must be positive")]
    ZeroTick,
}

/// Explicit player input accepted by a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerCommand {
    /// Walk one tile, or sprint two when `sprint` is set.
    Move {
        /// Direction of travel.
        direction: Direction,
        /// Whether to sprint.
        sprint: bool,
    },
    /// Lay a trap on the player's cell.
    PlaceTrap,
    /// Give up the match.
    Forfeit,
}

/// Optional knobs for a registration.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchOptions {
    /// Seed for map generation and enemy placement.
    pub seed: u64,
    /// Constants governing the match.
    pub rules: MatchRules,
}

/// Status of a session after a step or an input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StepStatus {
    /// The match is still running.
    Continue,
    /// The player reached the exit.
    Victory,
    /// An enemy caught the player.
    Defeat,
    /// The player gave up.
    Forfeited,
}

impl StepStatus {
    fn from_phase(phase: MatchPhase) -> Self {
        match phase {
            MatchPhase::Registering | MatchPhase::Running => Self::Continue,
            MatchPhase::Ended(MatchOutcome::Victory) => Self::Victory,
            MatchPhase::Ended(MatchOutcome::Defeat) => Self::Defeat,
            MatchPhase::Ended(MatchOutcome::Forfeit) => Self::Forfeited,
        }
    }

    /// Whether the match is over.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !matches!(self, Self::Continue)
    }
}

/// Summary returned by [`Session::step`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepReport {
    /// Status after the step.
    pub status: StepStatus,
    /// Running score.
    pub score: i64,
    /// Simulated time since the match started.
    pub elapsed: Duration,
    /// Player energy as a fraction of its maximum.
    pub energy_fraction: f64,
    /// Enemies caught so far.
    pub captures: u32,
    /// Enemies that fled through the exit so far.
    pub escapes: u32,
}

/// Final result of a finished match.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchSummary {
    /// Reason the match ended.
    pub outcome: MatchOutcome,
    /// Final score.
    pub score: i64,
    /// Whole seconds the match lasted.
    pub seconds: u64,
}

/// Everything a host needs to draw the match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionSnapshot {
    /// Registered player name.
    pub name: String,
    /// Mode of the match.
    pub mode: GameMode,
    /// Difficulty of the match.
    pub difficulty: Difficulty,
    /// Lifecycle phase.
    pub phase: MatchPhase,
    /// Generated map.
    pub terrain: TerrainGrid,
    /// Player state.
    pub player: PlayerSnapshot,
    /// Every enemy, dead ones included, ordered by identifier.
    pub enemies: Vec<EnemySnapshot>,
    /// Live traps in placement order.
    pub traps: Vec<TrapSnapshot>,
    /// Running score.
    pub score: i64,
    /// Simulated time since the match started.
    pub elapsed: Duration,
    /// Capture, escape and trap-kill counters.
    pub tally: Tally,
}

/// A registered match and the systems that drive it.
#[derive(Debug)]
pub struct Session<S: ScoreSink> {
    name: String,
    world: World,
    enemy_ai: EnemyAi,
    spawning: Spawning,
    scoring: Scoring,
    sink: S,
    settled: bool,
}

/// Registers `name` for a new match and starts it.
///
/// The map and the initial enemy cells are derived from `options.seed`, so two
/// registrations with the same arguments replay identically.
pub fn register<S: ScoreSink>(
    name: &str,
    difficulty: Difficulty,
    mode: GameMode,
    options: MatchOptions,
    sink: S,
) -> Result<Session<S>, RegistrationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(RegistrationError::EmptyName);
    }
    let MatchOptions { seed, rules } = options;
    if rules.columns < MIN_GRID_SIDE || rules.rows < MIN_GRID_SIDE {
        return Err(RegistrationError::GridTooSmall {
            columns: rules.columns,
            rows: rules.rows,
        });
    }
    if rules.tick_ms == 0 {
        return Err(RegistrationError::ZeroTick);
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let spawn_seed: u64 = rng.gen();
    let terrain =
        map_generation::generate(rules.columns, rules.rows, rules.start(), rules.exit(), &mut rng);

    let mut spawning = Spawning::new(SpawningConfig::new(rules.respawn_delay(), spawn_seed));
    let enemy_cells = spawning.initial_cells(&terrain, difficulty.enemy_count());
    if enemy_cells.is_empty() {
        warn!(seed, "generated map offers no enemy spawn cell");
    }

    let mut session = Session {
        name: name.to_owned(),
        world: World::with_rules(rules),
        enemy_ai: EnemyAi::new(),
        spawning,
        scoring: Scoring::new(),
        sink,
        settled: false,
    };

    let mut events = Vec::new();
    world::apply(
        &mut session.world,
        Command::StartMatch {
            mode,
            difficulty,
            terrain,
            enemy_cells,
        },
        &mut events,
    );
    let mut ignored = Vec::new();
    let view = query::enemy_view(&session.world);
    session.enemy_ai.handle(
        &events,
        &view,
        query::player(&session.world).cell,
        query::terrain(&session.world),
        &mut ignored,
    );
    session.scoring.handle(&events, &mut ignored);
    debug_assert!(ignored.is_empty(), "match start emits no follow-up commands");

    info!(
        player = %session.name,
        %mode,
        %difficulty,
        seed,
        enemies = view.iter().count(),
        "match started"
    );
    Ok(session)
}

impl<S: ScoreSink> Session<S> {
    /// Name the player registered with.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Rules governing the match.
    #[must_use]
    pub fn rules(&self) -> &MatchRules {
        query::rules(&self.world)
    }

    /// Advances the match by one tick.
    ///
    /// A finished match is left untouched and keeps reporting its terminal
    /// status.
    pub fn step(&mut self) -> StepReport {
        if query::phase(&self.world) != MatchPhase::Running {
            return self.report();
        }

        let mut events = Vec::new();
        let dt = query::rules(&self.world).tick();
        world::apply(&mut self.world, Command::Tick { dt }, &mut events);

        let mut commands = Vec::new();
        {
            let view = query::enemy_view(&self.world);
            let terrain = query::terrain(&self.world);
            self.spawning.handle(&events, &view, terrain, &mut commands);
            self.enemy_ai.handle(
                &events,
                &view,
                query::player(&self.world).cell,
                terrain,
                &mut commands,
            );
        }
        commands.push(Command::ResolveContacts);
        commands.push(Command::ResolveTraps);
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        let _ = self.conclude(events);
        self.report()
    }

    /// Moves the player one tile, or two when sprinting.
    pub fn move_player(&mut self, direction: Direction, sprint: bool) -> StepStatus {
        let _ = self.dispatch(Command::MovePlayer { direction, sprint });
        self.status()
    }

    /// Lays a trap on the player's cell.
    ///
    /// Refusals leave the match unchanged and report why.
    pub fn place_trap(&mut self) -> Result<CellCoord, TrapRejection> {
        let events = self.dispatch(Command::PlaceTrap);
        events
            .iter()
            .find_map(|event| match event {
                Event::TrapPlaced { cell } => Some(Ok(*cell)),
                Event::TrapRejected { reason } => Some(Err(*reason)),
                _ => None,
            })
            .unwrap_or(Err(TrapRejection::NotRunning))
    }

    /// Gives up the match, recording the current score.
    pub fn forfeit(&mut self) -> StepReport {
        let _ = self.dispatch(Command::Forfeit);
        self.report()
    }

    /// Applies one player command and returns the resulting status.
    pub fn apply_input(&mut self, input: PlayerCommand) -> StepStatus {
        match input {
            PlayerCommand::Move { direction, sprint } => self.move_player(direction, sprint),
            PlayerCommand::PlaceTrap => {
                if let Err(reason) = self.place_trap() {
                    debug!(?reason, "trap refused");
                }
                self.status()
            }
            PlayerCommand::Forfeit => self.forfeit().status,
        }
    }

    /// Current status of the match.
    #[must_use]
    pub fn status(&self) -> StepStatus {
        StepStatus::from_phase(query::phase(&self.world))
    }

    /// Report describing the match right now.
    #[must_use]
    pub fn report(&self) -> StepReport {
        let tally = query::tally(&self.world);
        StepReport {
            status: self.status(),
            score: query::score(&self.world),
            elapsed: query::elapsed(&self.world),
            energy_fraction: query::player(&self.world).energy_fraction(),
            captures: tally.captures,
            escapes: tally.escapes,
        }
    }

    /// Final result, available once the match has ended.
    #[must_use]
    pub fn summary(&self) -> Option<MatchSummary> {
        let MatchPhase::Ended(outcome) = query::phase(&self.world) else {
            return None;
        };
        Some(MatchSummary {
            outcome,
            score: query::score(&self.world),
            seconds: query::elapsed(&self.world).as_secs(),
        })
    }

    /// Copies the state a host needs to draw the match.
    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            name: self.name.clone(),
            mode: query::mode(&self.world),
            difficulty: query::difficulty(&self.world),
            phase: query::phase(&self.world),
            terrain: query::terrain(&self.world).clone(),
            player: query::player(&self.world),
            enemies: query::enemy_view(&self.world).into_vec(),
            traps: query::traps(&self.world),
            score: query::score(&self.world),
            elapsed: query::elapsed(&self.world),
            tally: query::tally(&self.world),
        }
    }

    fn dispatch(&mut self, command: Command) -> Vec<Event> {
        let mut events = Vec::new();
        world::apply(&mut self.world, command, &mut events);
        self.conclude(events)
    }

    fn conclude(&mut self, mut events: Vec<Event>) -> Vec<Event> {
        let mut commands = Vec::new();
        self.scoring.handle(&events, &mut commands);
        for command in commands {
            world::apply(&mut self.world, command, &mut events);
        }

        for event in &events {
            match event {
                Event::EnemyCaptured { enemy, cell } => {
                    debug!(enemy = enemy.get(), ?cell, "enemy captured");
                }
                Event::EnemyEscaped { enemy } => debug!(enemy = enemy.get(), "enemy escaped"),
                Event::EnemyTrapped { enemy, cell } => {
                    debug!(enemy = enemy.get(), ?cell, "enemy trapped");
                }
                Event::EnemyRespawned { enemy, cell } => {
                    debug!(enemy = enemy.get(), ?cell, "enemy respawned");
                }
                _ => {}
            }
        }

        if !self.settled {
            if let Some(summary) = self.summary() {
                self.settle(summary);
            }
        }
        events
    }

    fn settle(&mut self, summary: MatchSummary) {
        self.settled = true;
        let mode = query::mode(&self.world);
        info!(
            player = %self.name,
            %mode,
            outcome = ?summary.outcome,
            score = summary.score,
            seconds = summary.seconds,
            "match ended"
        );
        if let Err(error) = self.sink.record(mode, &self.name, summary.score) {
            warn!(%error, "final score could not be saved");
        }
    }
}
