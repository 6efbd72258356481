//! Mutable actor records owned by the world.

use std::time::Duration;

use hunters_core::{
    ActorClass, CellCoord, Direction, EnemyId, EnemySnapshot, PlayerSnapshot, TerrainGrid,
    TrapSnapshot,
};

/// Player-controlled runner.
#[derive(Clone, Debug)]
pub(crate) struct Player {
    pub(crate) cell: CellCoord,
    energy: u32,
    energy_max: u32,
    last_regen: Duration,
}

/// Outcome of a single movement request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Stride {
    pub(crate) from: CellCoord,
    pub(crate) to: CellCoord,
    pub(crate) sprinted: bool,
}

impl Player {
    pub(crate) fn spawn(cell: CellCoord, energy_max: u32, now: Duration) -> Self {
        Self {
            cell,
            energy: energy_max,
            energy_max,
            last_regen: now,
        }
    }

    /// Walks one tile, or sprints two when requested and affordable.
    ///
    /// A blocked attempt cancels the remaining ones. The sprint cost is paid
    /// whenever two attempts were planned, even if the second was blocked.
    pub(crate) fn stride(
        &mut self,
        direction: Direction,
        sprint: bool,
        sprint_cost: u32,
        terrain: &TerrainGrid,
    ) -> Stride {
        let from = self.cell;
        let sprinted = sprint && self.energy >= sprint_cost;
        let attempts = if sprinted { 2 } else { 1 };

        for _ in 0..attempts {
            let Some(candidate) = self.cell.step(direction) else {
                break;
            };
            if !terrain.is_passable(candidate, ActorClass::Player) {
                break;
            }
            self.cell = candidate;
        }

        if sprinted {
            self.energy = self.energy.saturating_sub(sprint_cost);
        }

        Stride {
            from,
            to: self.cell,
            sprinted,
        }
    }

    /// Restores one point per whole second since the last regeneration.
    ///
    /// Returns the new energy when at least one point was restored.
    pub(crate) fn regenerate(&mut self, now: Duration) -> Option<u32> {
        let since = now.saturating_sub(self.last_regen);
        let whole_seconds = since.as_secs();
        if whole_seconds == 0 {
            return None;
        }
        self.last_regen += Duration::from_secs(whole_seconds);

        if self.energy >= self.energy_max {
            return None;
        }
        let gained = u32::try_from(whole_seconds).unwrap_or(u32::MAX);
        self.energy = self.energy.saturating_add(gained).min(self.energy_max);
        Some(self.energy)
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: self.cell,
            energy: self.energy,
            energy_max: self.energy_max,
        }
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Enemy {
    pub(crate) id: EnemyId,
    pub(crate) cell: CellCoord,
    died_at: Option<Duration>,
    step_interval: Duration,
    last_step: Duration,
}

impl Enemy {
    pub(crate) fn spawn(id: EnemyId, cell: CellCoord, step_interval: Duration, now: Duration) -> Self {
        Self {
            id,
            cell,
            died_at: None,
            step_interval,
            last_step: now,
        }
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.died_at.is_none()
    }

    pub(crate) fn kill(&mut self, now: Duration) {
        self.died_at = Some(now);
    }

    pub(crate) fn can_respawn(&self, now: Duration, delay: Duration) -> bool {
        self.died_at
            .is_some_and(|died_at| now.saturating_sub(died_at) >= delay)
    }

    pub(crate) fn revive(&mut self, cell: CellCoord) {
        self.cell = cell;
        self.died_at = None;
    }

    pub(crate) fn ready_for_step(&self, now: Duration) -> bool {
        self.is_alive() && now.saturating_sub(self.last_step) >= self.step_interval
    }

    /// Spends the enemy's turn, restarting its cadence clock.
    pub(crate) fn consume_turn(&mut self, now: Duration) {
        self.last_step = now;
    }

    pub(crate) fn snapshot(&self, now: Duration) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            cell: self.cell,
            alive: self.is_alive(),
            died_at: self.died_at,
            ready_for_step: self.ready_for_step(now),
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub(crate) struct Trap {
    pub(crate) cell: CellCoord,
    placed_at: Duration,
}

impl Trap {
    pub(crate) fn new(cell: CellCoord, placed_at: Duration) -> Self {
        Self { cell, placed_at }
    }

    pub(crate) fn snapshot(&self) -> TrapSnapshot {
        TrapSnapshot {
            cell: self.cell,
            placed_at: self.placed_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corridor() -> TerrainGrid {
        TerrainGrid::from_rows(
            &["#######", "#....=#", "#.#####", "#######"],
            CellCoord::new(1, 1),
            CellCoord::new(5, 1),
        )
    }

    #[test]
    fn sprint_moves_two_tiles_and_costs_energy() {
        let terrain = corridor();
        let mut player = Player::spawn(CellCoord::new(1, 1), 100, Duration::ZERO);

        let stride = player.stride(Direction::Right, true, 10, &terrain);

        assert_eq!(stride.to, CellCoord::new(3, 1));
        assert!(stride.sprinted);
        assert_eq!(player.snapshot().energy, 90);
    }

    #[test]
    fn blocked_second_sprint_step_still_costs_energy() {
        let terrain = corridor();
        let mut player = Player::spawn(CellCoord::new(1, 1), 100, Duration::ZERO);

        let stride = player.stride(Direction::Down, true, 10, &terrain);

        assert_eq!(stride.to, CellCoord::new(1, 2), "partial sprint stops at the wall");
        assert_eq!(player.snapshot().energy, 90);
    }

    #[test]
    fn blocked_first_sprint_step_still_costs_energy() {
        let terrain = corridor();
        let mut player = Player::spawn(CellCoord::new(1, 1), 100, Duration::ZERO);

        let stride = player.stride(Direction::Up, true, 10, &terrain);

        assert_eq!(stride.to, CellCoord::new(1, 1), "wall blocks the first step");
        assert_eq!(stride.to, stride.from);
        assert!(stride.sprinted);
        assert_eq!(player.snapshot().energy, 90);
    }

    #[test]
    fn sprint_without_energy_walks_one_tile_for_free() {
        let terrain = corridor();
        let mut player = Player::spawn(CellCoord::new(1, 1), 100, Duration::ZERO);
        player.energy = 9;

        let stride = player.stride(Direction::Right, true, 10, &terrain);

        assert_eq!(stride.to, CellCoord::new(2, 1));
        assert!(!stride.sprinted);
        assert_eq!(player.snapshot().energy, 9);
    }

    #[test]
    fn player_enters_tunnels() {
        let terrain = corridor();
        let mut player = Player::spawn(CellCoord::new(4, 1), 100, Duration::ZERO);

        let stride = player.stride(Direction::Right, false, 10, &terrain);

        assert_eq!(stride.to, CellCoord::new(5, 1));
    }

    #[test]
    fn regeneration_counts_whole_seconds_and_caps() {
        let mut player = Player::spawn(CellCoord::new(1, 1), 100, Duration::ZERO);
        player.energy = 97;

        assert_eq!(player.regenerate(Duration::from_millis(900)), None);
        assert_eq!(player.regenerate(Duration::from_millis(1_000)), Some(98));
        assert_eq!(player.regenerate(Duration::from_millis(1_900)), None);
        assert_eq!(player.regenerate(Duration::from_millis(6_000)), Some(100));
        assert_eq!(player.snapshot().energy, 100);
    }

    #[test]
    fn enemy_respawn_waits_for_delay() {
        let mut enemy = Enemy::spawn(
            EnemyId::new(0),
            CellCoord::new(2, 2),
            Duration::from_millis(600),
            Duration::ZERO,
        );
        enemy.kill(Duration::from_secs(3));

        assert!(!enemy.can_respawn(Duration::from_millis(12_900), Duration::from_secs(10)));
        assert!(enemy.can_respawn(Duration::from_secs(13), Duration::from_secs(10)));
        assert!(!enemy.ready_for_step(Duration::from_secs(13)), "dead enemies never step");
    }
}
