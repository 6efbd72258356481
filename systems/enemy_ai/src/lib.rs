#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic enemy decision system that proposes one step per ready enemy.
//!
//! Enemies look only one tile ahead. Each ready enemy scores its passable
//! neighbours by Manhattan distance to the player and keeps the best one: the
//! closest when hunting, the farthest when fleeing. Neighbours are visited in
//! [`Direction::SCAN_ORDER`] and only a strictly better candidate replaces the
//! current one, so ties always resolve to the earliest direction.

use hunters_core::{
    ActorClass, CellCoord, Command, Direction, EnemySnapshot, EnemyView, Event, GameMode,
    TerrainGrid,
};

/// What enemies try to do relative to the player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Intent {
    /// Close the distance to the player.
    Pursue,
    /// Open the distance to the player.
    Flee,
}

impl Intent {
    /// Enemies hunt in escape mode and flee in hunter mode.
    #[must_use]
    pub const fn for_mode(mode: GameMode) -> Self {
        match mode {
            GameMode::Escape => Self::Pursue,
            GameMode::Hunter => Self::Flee,
        }
    }
}

/// Pure system that reacts to world events and emits enemy step commands.
#[derive(Debug)]
pub struct EnemyAi {
    intent: Intent,
}

impl EnemyAi {
    /// Creates a system whose enemies pursue until a match announces its mode.
    #[must_use]
    pub fn new() -> Self {
        Self {
            intent: Intent::Pursue,
        }
    }

    /// Intent currently driving enemy decisions.
    #[must_use]
    pub const fn intent(&self) -> Intent {
        self.intent
    }

    /// Consumes world events and immutable views to emit step commands.
    ///
    /// Nothing is emitted unless the events include a clock advance. Every
    /// ready, living enemy receives exactly one [`Command::StepEnemy`], with
    /// `direction: None` when all of its neighbours are blocked.
    pub fn handle(
        &mut self,
        events: &[Event],
        enemy_view: &EnemyView,
        player_cell: CellCoord,
        terrain: &TerrainGrid,
        out: &mut Vec<Command>,
    ) {
        for event in events {
            if let Event::MatchStarted { mode, .. } = event {
                self.intent = Intent::for_mode(*mode);
            }
        }

        if !events
            .iter()
            .any(|event| matches!(event, Event::TimeAdvanced { .. }))
        {
            return;
        }

        for enemy in enemy_view.alive() {
            if !enemy.ready_for_step {
                continue;
            }
            out.push(Command::StepEnemy {
                enemy: enemy.id,
                direction: choose_direction(self.intent, enemy, player_cell, terrain),
            });
        }
    }
}

impl Default for EnemyAi {
    fn default() -> Self {
        Self::new()
    }
}

/// Picks the neighbour that best serves `intent`, if any is passable.
#[must_use]
pub fn choose_direction(
    intent: Intent,
    enemy: &EnemySnapshot,
    player_cell: CellCoord,
    terrain: &TerrainGrid,
) -> Option<Direction> {
    let mut best: Option<Candidate> = None;

    for direction in Direction::SCAN_ORDER {
        let Some(neighbor) = enemy.cell.step(direction) else {
            continue;
        };
        if !terrain.is_passable(neighbor, ActorClass::Enemy) {
            continue;
        }

        let candidate = Candidate {
            direction,
            distance: neighbor.manhattan_distance(player_cell),
        };
        best = Some(match best {
            Some(existing) if !candidate.is_better_than(existing, intent) => existing,
            _ => candidate,
        });
    }

    best.map(|candidate| candidate.direction)
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    direction: Direction,
    distance: u32,
}

impl Candidate {
    fn is_better_than(self, other: Candidate, intent: Intent) -> bool {
        match intent {
            Intent::Pursue => self.distance < other.distance,
            Intent::Flee => self.distance > other.distance,
        }
    }
}
