#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative match state for Hunters.
//!
//! The world owns the terrain, the player, the enemies and the traps of a
//! single match. It only changes through [`apply`], which validates each
//! [`Command`] against the current state and reports what happened as
//! [`Event`] values. Time never flows implicitly: the clock advances solely
//! through [`Command::Tick`], which keeps every replay deterministic.

mod actors;

use std::time::Duration;

use hunters_core::{
    ActorClass, CellCoord, Command, Difficulty, EnemyId, Event, GameMode, MatchOutcome,
    MatchPhase, MatchRules, Terrain, TerrainGrid, TrapRejection,
};

use self::actors::{Enemy, Player, Trap};

/// Represents the authoritative Hunters world state.
#[derive(Debug)]
pub struct World {
    rules: MatchRules,
    phase: MatchPhase,
    mode: GameMode,
    difficulty: Difficulty,
    terrain: TerrainGrid,
    player: Player,
    enemies: Vec<Enemy>,
    traps: Vec<Trap>,
    last_trap_at: Option<Duration>,
    clock: Duration,
    score: i64,
    tally: Tally,
}

/// Running counters of the match's enemy interactions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Tally {
    /// Enemies caught by the player.
    pub captures: u32,
    /// Enemies that fled through the exit.
    pub escapes: u32,
    /// Enemies killed by traps.
    pub trap_kills: u32,
}

impl World {
    /// Creates an idle world using the default match rules.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rules(MatchRules::default())
    }

    /// Creates an idle world governed by the provided rules.
    #[must_use]
    pub fn with_rules(rules: MatchRules) -> Self {
        let start = rules.start();
        let exit = rules.exit();
        let terrain = TerrainGrid::filled(rules.columns, rules.rows, Terrain::Wall, start, exit);
        let player = Player::spawn(start, rules.energy_max, Duration::ZERO);
        Self {
            rules,
            phase: MatchPhase::Registering,
            mode: GameMode::Escape,
            difficulty: Difficulty::default(),
            terrain,
            player,
            enemies: Vec::new(),
            traps: Vec::new(),
            last_trap_at: None,
            clock: Duration::ZERO,
            score: 0,
            tally: Tally::default(),
        }
    }

    fn is_running(&self) -> bool {
        self.phase == MatchPhase::Running
    }

    fn start_match(
        &mut self,
        mode: GameMode,
        difficulty: Difficulty,
        terrain: TerrainGrid,
        enemy_cells: Vec<CellCoord>,
    ) {
        let step_interval = self.rules.enemy_step_interval(difficulty.factor());
        self.mode = mode;
        self.difficulty = difficulty;
        self.clock = Duration::ZERO;
        self.player = Player::spawn(terrain.start(), self.rules.energy_max, self.clock);
        self.enemies = (0u32..)
            .zip(enemy_cells)
            .map(|(index, cell)| Enemy::spawn(EnemyId::new(index), cell, step_interval, self.clock))
            .collect();
        self.terrain = terrain;
        self.traps.clear();
        self.last_trap_at = None;
        self.score = 0;
        self.tally = Tally::default();
        self.phase = MatchPhase::Running;
    }

    fn end_match(&mut self, outcome: MatchOutcome, out_events: &mut Vec<Event>) {
        self.phase = MatchPhase::Ended(outcome);
        out_events.push(Event::MatchEnded {
            outcome,
            elapsed: self.clock,
        });
    }

    fn enemy_mut(&mut self, enemy: EnemyId) -> Option<&mut Enemy> {
        self.enemies.iter_mut().find(|candidate| candidate.id == enemy)
    }

    fn trap_rejection(&self) -> Option<TrapRejection> {
        if !self.is_running() {
            return Some(TrapRejection::NotRunning);
        }
        if self.mode != GameMode::Escape {
            return Some(TrapRejection::WrongMode);
        }
        if self.traps.len() >= self.rules.max_traps {
            return Some(TrapRejection::AtCapacity);
        }
        let cooling = self
            .last_trap_at
            .is_some_and(|placed| self.clock.saturating_sub(placed) < self.rules.trap_cooldown());
        cooling.then_some(TrapRejection::CoolingDown)
    }

    fn resolve_contacts(&mut self, out_events: &mut Vec<Event>) {
        let player_cell = self.player.cell;
        match self.mode {
            GameMode::Escape => {
                let caught = self
                    .enemies
                    .iter()
                    .any(|enemy| enemy.is_alive() && enemy.cell == player_cell);
                if caught {
                    self.end_match(MatchOutcome::Defeat, out_events);
                }
            }
            GameMode::Hunter => {
                let now = self.clock;
                let exit = self.terrain.exit();
                for enemy in &mut self.enemies {
                    if enemy.is_alive() && enemy.cell == player_cell {
                        enemy.kill(now);
                        self.tally.captures += 1;
                        out_events.push(Event::EnemyCaptured {
                            enemy: enemy.id,
                            cell: player_cell,
                        });
                    }
                    if enemy.is_alive() && enemy.cell == exit {
                        enemy.kill(now);
                        self.tally.escapes += 1;
                        out_events.push(Event::EnemyEscaped { enemy: enemy.id });
                    }
                }
            }
        }
    }

    fn resolve_traps(&mut self, out_events: &mut Vec<Event>) {
        if self.mode != GameMode::Escape {
            return;
        }
        let now = self.clock;
        for enemy in &mut self.enemies {
            if !enemy.is_alive() {
                continue;
            }
            let Some(index) = self.traps.iter().position(|trap| trap.cell == enemy.cell) else {
                continue;
            };
            let trap = self.traps.remove(index);
            enemy.kill(now);
            self.tally.trap_kills += 1;
            out_events.push(Event::EnemyTrapped {
                enemy: enemy.id,
                cell: trap.cell,
            });
        }
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}

/// Applies the provided command to the world, mutating state deterministically.
pub fn apply(world: &mut World, command: Command, out_events: &mut Vec<Event>) {
    match command {
        Command::StartMatch {
            mode,
            difficulty,
            terrain,
            enemy_cells,
        } => {
            world.start_match(mode, difficulty, terrain, enemy_cells);
            out_events.push(Event::MatchStarted { mode, difficulty });
        }
        Command::Tick { dt } => {
            if !world.is_running() {
                return;
            }
            world.clock = world.clock.saturating_add(dt);
            out_events.push(Event::TimeAdvanced {
                dt,
                elapsed: world.clock,
            });
            if let Some(energy) = world.player.regenerate(world.clock) {
                out_events.push(Event::EnergyRegenerated { energy });
            }
        }
        Command::MovePlayer { direction, sprint } => {
            if !world.is_running() {
                return;
            }
            let stride = world.player.stride(
                direction,
                sprint,
                world.rules.sprint_cost,
                &world.terrain,
            );
            if stride.from != stride.to || stride.sprinted {
                out_events.push(Event::PlayerMoved {
                    from: stride.from,
                    to: stride.to,
                    sprinted: stride.sprinted,
                });
            }
            if world.mode == GameMode::Escape && stride.to == world.terrain.exit() {
                world.end_match(MatchOutcome::Victory, out_events);
            }
        }
        Command::PlaceTrap => {
            if let Some(reason) = world.trap_rejection() {
                out_events.push(Event::TrapRejected { reason });
                return;
            }
            let cell = world.player.cell;
            world.traps.push(Trap::new(cell, world.clock));
            world.last_trap_at = Some(world.clock);
            out_events.push(Event::TrapPlaced { cell });
        }
        Command::RespawnEnemy { enemy, cell } => {
            if !world.is_running() || !world.terrain.is_passable(cell, ActorClass::Enemy) {
                return;
            }
            let now = world.clock;
            let delay = world.rules.respawn_delay();
            if let Some(target) = world.enemy_mut(enemy) {
                if target.can_respawn(now, delay) {
                    target.revive(cell);
                    out_events.push(Event::EnemyRespawned { enemy, cell });
                }
            }
        }
        Command::StepEnemy { enemy, direction } => {
            if !world.is_running() {
                return;
            }
            let now = world.clock;
            let terrain = &world.terrain;
            let Some(target) = world.enemies.iter_mut().find(|candidate| candidate.id == enemy)
            else {
                return;
            };
            if !target.ready_for_step(now) {
                return;
            }
            target.consume_turn(now);

            let Some(next) = direction.and_then(|direction| target.cell.step(direction)) else {
                return;
            };
            if terrain.is_passable(next, ActorClass::Enemy) {
                let from = target.cell;
                target.cell = next;
                out_events.push(Event::EnemyMoved {
                    enemy,
                    from,
                    to: next,
                });
            }
        }
        Command::ResolveContacts => {
            if world.is_running() {
                world.resolve_contacts(out_events);
            }
        }
        Command::ResolveTraps => {
            if world.is_running() {
                world.resolve_traps(out_events);
            }
        }
        Command::AdjustScore { delta } => {
            if world.phase == MatchPhase::Registering {
                return;
            }
            world.score = world.score.saturating_add(delta);
            out_events.push(Event::ScoreChanged { score: world.score });
        }
        Command::SetScore { score } => {
            if world.phase == MatchPhase::Registering {
                return;
            }
            world.score = score;
            out_events.push(Event::ScoreChanged { score });
        }
        Command::Forfeit => {
            if world.is_running() {
                world.end_match(MatchOutcome::Forfeit, out_events);
            }
        }
    }
}

/// Query functions that provide read-only access to the world state.
pub mod query {
    use std::time::Duration;

    use super::{Tally, World};
    use hunters_core::{
        Difficulty, EnemySnapshot, EnemyView, GameMode, MatchPhase, MatchRules, PlayerSnapshot,
        TerrainGrid, TrapSnapshot,
    };

    /// Rules the world was created with.
    #[must_use]
    pub fn rules(world: &World) -> &MatchRules {
        &world.rules
    }

    /// Lifecycle phase of the current match.
    #[must_use]
    pub fn phase(world: &World) -> MatchPhase {
        world.phase
    }

    /// Mode of the current match.
    #[must_use]
    pub fn mode(world: &World) -> GameMode {
        world.mode
    }

    /// Difficulty of the current match.
    #[must_use]
    pub fn difficulty(world: &World) -> Difficulty {
        world.difficulty
    }

    /// Provides read-only access to the match terrain.
    #[must_use]
    pub fn terrain(world: &World) -> &TerrainGrid {
        &world.terrain
    }

    /// Captures the player's state.
    #[must_use]
    pub fn player(world: &World) -> PlayerSnapshot {
        world.player.snapshot()
    }

    /// Captures a read-only view of the enemies of the match.
    #[must_use]
    pub fn enemy_view(world: &World) -> EnemyView {
        let snapshots: Vec<EnemySnapshot> = world
            .enemies
            .iter()
            .map(|enemy| enemy.snapshot(world.clock))
            .collect();
        EnemyView::from_snapshots(snapshots)
    }

    /// Captures the live traps in placement order.
    #[must_use]
    pub fn traps(world: &World) -> Vec<TrapSnapshot> {
        world.traps.iter().map(|trap| trap.snapshot()).collect()
    }

    /// Simulated time elapsed since the match started.
    #[must_use]
    pub fn elapsed(world: &World) -> Duration {
        world.clock
    }

    /// Running score of the match.
    #[must_use]
    pub fn score(world: &World) -> i64 {
        world.score
    }

    /// Counters of captures, escapes and trap kills.
    #[must_use]
    pub fn tally(world: &World) -> Tally {
        world.tally
    }
}
