#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic spawning system responsible for placing and reviving enemies.

use std::time::Duration;

use hunters_core::{ActorClass, CellCoord, Command, EnemyView, Event, TerrainGrid};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Configuration parameters required to construct the spawning system.
#[derive(Clone, Copy, Debug)]
pub struct Config {
    respawn_delay: Duration,
    rng_seed: u64,
}

impl Config {
    /// Creates a new configuration using the provided respawn delay and seed.
    #[must_use]
    pub const fn new(respawn_delay: Duration, rng_seed: u64) -> Self {
        Self {
            respawn_delay,
            rng_seed,
        }
    }
}

/// Pure system that picks spawn cells and emits respawn commands.
#[derive(Debug)]
pub struct Spawning {
    respawn_delay: Duration,
    rng: ChaCha8Rng,
}

impl Spawning {
    /// Creates a new spawning system using the supplied configuration.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            respawn_delay: config.respawn_delay,
            rng: ChaCha8Rng::seed_from_u64(config.rng_seed),
        }
    }

    /// Samples starting cells for `count` enemies.
    ///
    /// Cells are drawn independently, so two enemies may share a cell. The
    /// result is shorter than `count` only when the map offers no spawn cell
    /// at all.
    pub fn initial_cells(&mut self, terrain: &TerrainGrid, count: usize) -> Vec<CellCoord> {
        let sites = spawn_sites(terrain);
        if sites.is_empty() {
            return Vec::new();
        }
        (0..count).map(|_| self.pick(&sites)).collect()
    }

    /// Consumes events and the enemy view to emit respawn commands.
    ///
    /// Only a clock advance can make an enemy eligible, so the system stays
    /// silent for event batches without [`Event::TimeAdvanced`].
    pub fn handle(
        &mut self,
        events: &[Event],
        enemy_view: &EnemyView,
        terrain: &TerrainGrid,
        out: &mut Vec<Command>,
    ) {
        let Some(now) = events.iter().rev().find_map(|event| match event {
            Event::TimeAdvanced { elapsed, .. } => Some(*elapsed),
            _ => None,
        }) else {
            return;
        };

        let mut sites: Option<Vec<CellCoord>> = None;
        for enemy in enemy_view.iter() {
            let Some(died_at) = enemy.died_at else {
                continue;
            };
            if now.saturating_sub(died_at) < self.respawn_delay {
                continue;
            }

            let sites = sites.get_or_insert_with(|| spawn_sites(terrain));
            if sites.is_empty() {
                return;
            }
            let cell = self.pick(sites);
            out.push(Command::RespawnEnemy {
                enemy: enemy.id,
                cell,
            });
        }
    }

    fn pick(&mut self, sites: &[CellCoord]) -> CellCoord {
        debug_assert!(!sites.is_empty(), "pick requires spawn sites");
        sites[self.rng.gen_range(0..sites.len())]
    }
}

/// Interior cells where an enemy may appear: enemy terrain, never the start
/// or the exit.
#[must_use]
pub fn spawn_sites(terrain: &TerrainGrid) -> Vec<CellCoord> {
    terrain
        .iter()
        .map(|(cell, _)| cell)
        .filter(|cell| {
            terrain.is_interior(*cell)
                && *cell != terrain.start()
                && *cell != terrain.exit()
                && terrain.is_passable(*cell, ActorClass::Enemy)
        })
        .collect()
}
