#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hunters engine.
//!
//! This crate defines the message surface that connects the session, the
//! authoritative world, and pure systems. The session submits [`Command`]
//! values describing desired mutations, the world executes those commands via
//! its `apply` entry point, and then broadcasts [`Event`] values for systems to
//! react to deterministically. Systems consume event streams, query immutable
//! snapshots, and respond exclusively with new command batches.

use std::{fmt, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Canonical banner emitted when the experience boots.
pub const WELCOME_BANNER: &str = "Welcome to Hunters.";

/// Describes which side of the chase the player is on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum GameMode {
    /// The player runs for the exit while enemies hunt them down.
    #[serde(rename = "ESCAPA")]
    Escape,
    /// The player chases enemies that flee toward the exit.
    #[serde(rename = "CAZADOR")]
    Hunter,
}

impl GameMode {
    /// Key used for the mode inside the persisted score file.
    #[must_use]
    pub const fn ledger_key(self) -> &'static str {
        match self {
            Self::Escape => "ESCAPA",
            Self::Hunter => "CAZADOR",
        }
    }
}

impl fmt::Display for GameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ledger_key())
    }
}

/// Difficulty preset chosen at registration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    /// "Fácil": factor 1.0, three enemies.
    Easy,
    /// "Normal": factor 1.5, four enemies.
    Normal,
    /// "Difícil": factor 2.0, five enemies.
    Hard,
}

impl Difficulty {
    /// Every preset in ascending order.
    pub const ALL: [Difficulty; 3] = [Self::Easy, Self::Normal, Self::Hard];

    /// Multiplier applied to enemy speed and score magnitudes.
    #[must_use]
    pub const fn factor(self) -> f64 {
        match self {
            Self::Easy => 1.0,
            Self::Normal => 1.5,
            Self::Hard => 2.0,
        }
    }

    /// Number of enemies that take part in a match.
    #[must_use]
    pub const fn enemy_count(self) -> usize {
        match self {
            Self::Easy => 3,
            Self::Normal => 4,
            Self::Hard => 5,
        }
    }

    /// Display label of the preset.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Fácil",
            Self::Normal => "Normal",
            Self::Hard => "Difícil",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Normal
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a difficulty label matches no preset.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown difficulty `{0}`; expected one of Fácil, Normal, Difícil")]
pub struct DifficultyParseError(String);

impl FromStr for Difficulty {
    type Err = DifficultyParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        match trimmed.to_lowercase().as_str() {
            "fácil" | "facil" | "easy" => Ok(Self::Easy),
            "normal" => Ok(Self::Normal),
            "difícil" | "dificil" | "hard" => Ok(Self::Hard),
            _ => Err(DifficultyParseError(trimmed.to_owned())),
        }
    }
}

/// Class of actor asking whether a tile may be occupied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ActorClass {
    /// The human-controlled player.
    Player,
    /// An AI-controlled enemy.
    Enemy,
}

/// Kind of terrain occupying a single tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Terrain {
    /// Open ground walkable by everyone.
    Path,
    /// Solid rock that blocks everyone.
    Wall,
    /// Overgrowth that only enemies can slip through.
    Vine,
    /// Narrow passage that only the player fits through.
    Tunnel,
}

impl Terrain {
    /// Reports whether the provided actor class may occupy this terrain.
    #[must_use]
    pub const fn passable_by(self, actor: ActorClass) -> bool {
        matches!(
            (self, actor),
            (Self::Path, _) | (Self::Vine, ActorClass::Enemy) | (Self::Tunnel, ActorClass::Player)
        )
    }
}

/// Cardinal movement directions, listed in the order enemies scan them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward decreasing row indices.
    Up,
    /// Movement toward increasing row indices.
    Down,
    /// Movement toward decreasing column indices.
    Left,
    /// Movement toward increasing column indices.
    Right,
}

impl Direction {
    /// Fixed scan order used whenever directions are evaluated in sequence.
    pub const SCAN_ORDER: [Direction; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];
}

/// Location of a single grid cell expressed as column and row coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    column: u32,
    row: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(column: u32, row: u32) -> Self {
        Self { column, row }
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Computes the Manhattan distance between two cell coordinates.
    #[must_use]
    pub fn manhattan_distance(self, other: CellCoord) -> u32 {
        self.column().abs_diff(other.column()) + self.row().abs_diff(other.row())
    }

    /// Neighbouring cell one step away in `direction`.
    ///
    /// Returns `None` when the step would leave the non-negative quadrant; the
    /// caller treats such cells as lying outside the grid.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<CellCoord> {
        let (column, row) = match direction {
            Direction::Up => (Some(self.column), self.row.checked_sub(1)),
            Direction::Down => (Some(self.column), self.row.checked_add(1)),
            Direction::Left => (self.column.checked_sub(1), Some(self.row)),
            Direction::Right => (self.column.checked_add(1), Some(self.row)),
        };
        Some(CellCoord::new(column?, row?))
    }
}

/// Dense rectangular terrain grid with its fixed start and exit cells.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TerrainGrid {
    columns: u32,
    rows: u32,
    cells: Vec<Terrain>,
    start: CellCoord,
    exit: CellCoord,
}

impl TerrainGrid {
    /// Creates a grid in which every cell holds `fill`.
    #[must_use]
    pub fn filled(columns: u32, rows: u32, fill: Terrain, start: CellCoord, exit: CellCoord) -> Self {
        let capacity = usize::try_from(u64::from(columns) * u64::from(rows)).unwrap_or(0);
        Self {
            columns,
            rows,
            cells: vec![fill; capacity],
            start,
            exit,
        }
    }

    /// Builds a grid from rows of ASCII glyphs.
    ///
    /// `.` is Path, `#` Wall, `~` Vine and `=` Tunnel. Unknown glyphs and short
    /// rows are filled with Wall.
    #[must_use]
    pub fn from_rows(rows: &[&str], start: CellCoord, exit: CellCoord) -> Self {
        let columns = rows
            .iter()
            .map(|row| row.chars().count())
            .max()
            .unwrap_or(0);
        let columns = u32::try_from(columns).unwrap_or(0);
        let row_count = u32::try_from(rows.len()).unwrap_or(0);
        let mut grid = Self::filled(columns, row_count, Terrain::Wall, start, exit);
        for (row_index, row) in (0..row_count).zip(rows) {
            for (column_index, glyph) in (0..columns).zip(row.chars()) {
                let terrain = match glyph {
                    '.' => Terrain::Path,
                    '~' => Terrain::Vine,
                    '=' => Terrain::Tunnel,
                    _ => Terrain::Wall,
                };
                grid.set(CellCoord::new(column_index, row_index), terrain);
            }
        }
        grid
    }

    /// Number of columns contained in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows contained in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Cell where the player enters the map.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Cell that ends the match for whoever is racing toward it.
    #[must_use]
    pub const fn exit(&self) -> CellCoord {
        self.exit
    }

    /// Terrain at `cell`; anything outside the grid reads as [`Terrain::Wall`].
    #[must_use]
    pub fn terrain(&self, cell: CellCoord) -> Terrain {
        self.index(cell)
            .and_then(|index| self.cells.get(index).copied())
            .unwrap_or(Terrain::Wall)
    }

    /// Reports whether `actor` may occupy `cell`.
    #[must_use]
    pub fn is_passable(&self, cell: CellCoord, actor: ActorClass) -> bool {
        self.terrain(cell).passable_by(actor)
    }

    /// Reports whether the cell lies strictly inside the outer border ring.
    #[must_use]
    pub fn is_interior(&self, cell: CellCoord) -> bool {
        cell.column() > 0
            && cell.row() > 0
            && cell.column().saturating_add(1) < self.columns
            && cell.row().saturating_add(1) < self.rows
    }

    /// Overwrites the terrain at `cell`. Out-of-bounds writes are ignored.
    pub fn set(&mut self, cell: CellCoord, terrain: Terrain) {
        if let Some(index) = self.index(cell) {
            if let Some(slot) = self.cells.get_mut(index) {
                *slot = terrain;
            }
        }
    }

    /// Iterates over every cell in row-major order together with its terrain.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Terrain)> + '_ {
        let columns = self.columns.max(1);
        (0u32..).zip(self.cells.iter()).map(move |(index, terrain)| {
            (CellCoord::new(index % columns, index / columns), *terrain)
        })
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        if cell.column() < self.columns && cell.row() < self.rows {
            let row = usize::try_from(cell.row()).ok()?;
            let column = usize::try_from(cell.column()).ok()?;
            let width = usize::try_from(self.columns).ok()?;
            Some(row * width + column)
        } else {
            None
        }
    }
}

/// Tunable constants that govern a match.
///
/// Durations are stored as milliseconds so the struct deserializes cleanly from
/// TOML; the accessors convert them into [`Duration`] values.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchRules {
    /// Number of tile columns in generated maps.
    pub columns: u32,
    /// Number of tile rows in generated maps.
    pub rows: u32,
    /// Cadence at which the host advances the simulation.
    pub tick_ms: u64,
    /// Minimum time between two trap placements.
    pub trap_cooldown_ms: u64,
    /// Maximum number of live traps.
    pub max_traps: usize,
    /// Time a dead enemy waits before respawning.
    pub respawn_delay_ms: u64,
    /// Upper bound of the player's energy.
    pub energy_max: u32,
    /// Energy spent by a sprint, which is also the minimum needed to sprint.
    pub sprint_cost: u32,
    /// Enemy step interval at speed factor 1.0.
    pub enemy_base_interval_ms: u64,
    /// Lower bound of the enemy step interval.
    pub enemy_min_interval_ms: u64,
}

impl MatchRules {
    /// Cell where the player starts.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        CellCoord::new(1, 1)
    }

    /// Exit cell tucked into the far corner of the interior.
    #[must_use]
    pub const fn exit(&self) -> CellCoord {
        CellCoord::new(self.columns.saturating_sub(2), self.rows.saturating_sub(2))
    }

    /// Tick cadence as a duration.
    #[must_use]
    pub const fn tick(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }

    /// Trap cooldown as a duration.
    #[must_use]
    pub const fn trap_cooldown(&self) -> Duration {
        Duration::from_millis(self.trap_cooldown_ms)
    }

    /// Respawn delay as a duration.
    #[must_use]
    pub const fn respawn_delay(&self) -> Duration {
        Duration::from_millis(self.respawn_delay_ms)
    }

    /// Step interval for an enemy moving at `speed_factor`.
    ///
    /// Faster enemies move more often; the interval never drops below the
    /// configured floor.
    #[must_use]
    pub fn enemy_step_interval(&self, speed_factor: f64) -> Duration {
        let base = self.enemy_base_interval_ms as f64;
        let scaled = if speed_factor > 0.0 {
            (base / speed_factor).round() as u64
        } else {
            self.enemy_base_interval_ms
        };
        Duration::from_millis(scaled.max(self.enemy_min_interval_ms))
    }
}

impl Default for MatchRules {
    fn default() -> Self {
        Self {
            columns: 20,
            rows: 15,
            tick_ms: 100,
            trap_cooldown_ms: 5_000,
            max_traps: 3,
            respawn_delay_ms: 10_000,
            energy_max: 100,
            sprint_cost: 10,
            enemy_base_interval_ms: 600,
            enemy_min_interval_ms: 200,
        }
    }
}

/// Destination for the final score of a finished match.
pub trait ScoreSink {
    /// Failure raised when a score cannot be stored.
    type Error: std::error::Error;

    /// Records the final score of a match played in `mode` by `name`.
    fn record(&mut self, mode: GameMode, name: &str, score: i64) -> Result<(), Self::Error>;
}

impl<S: ScoreSink + ?Sized> ScoreSink for &mut S {
    type Error = S::Error;

    fn record(&mut self, mode: GameMode, name: &str, score: i64) -> Result<(), Self::Error> {
        (**self).record(mode, name, score)
    }
}

/// Unique identifier assigned to an enemy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EnemyId(u32);

impl EnemyId {
    /// Creates a new enemy identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> u32 {
        self.0
    }
}

/// Lifecycle phase of a match.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchPhase {
    /// No match has been configured yet.
    Registering,
    /// The match is live and accepts input and ticks.
    Running,
    /// The match finished with the provided outcome.
    Ended(MatchOutcome),
}

/// Reason a match ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MatchOutcome {
    /// The player escaped through the exit.
    Victory,
    /// An enemy caught the player.
    Defeat,
    /// The player gave up.
    Forfeit,
}

/// Reasons a trap placement request may be refused.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrapRejection {
    /// The match is not running.
    NotRunning,
    /// Traps exist only in escape mode.
    WrongMode,
    /// The live-trap cap has been reached.
    AtCapacity,
    /// The placement cooldown has not elapsed.
    CoolingDown,
}

/// Commands that express all permissible world mutations.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Starts a fresh match on the supplied terrain.
    StartMatch {
        /// Side of the chase the player takes.
        mode: GameMode,
        /// Difficulty preset governing speed and scoring.
        difficulty: Difficulty,
        /// Generated map the match is played on.
        terrain: TerrainGrid,
        /// Initial cells of the enemies, one per enemy.
        enemy_cells: Vec<CellCoord>,
    },
    /// Advances the simulation clock by the provided delta time.
    Tick {
        /// Duration of simulated time that elapsed since the previous tick.
        dt: Duration,
    },
    /// Requests that the player walk or sprint in a direction.
    MovePlayer {
        /// Direction of travel.
        direction: Direction,
        /// Whether the player asked to sprint two tiles.
        sprint: bool,
    },
    /// Requests a trap on the player's current cell.
    PlaceTrap,
    /// Brings a dead enemy back to life on the provided cell.
    RespawnEnemy {
        /// Identifier of the enemy to revive.
        enemy: EnemyId,
        /// Cell the enemy reappears on.
        cell: CellCoord,
    },
    /// Consumes a ready enemy's turn, optionally stepping in a direction.
    StepEnemy {
        /// Identifier of the enemy taking its turn.
        enemy: EnemyId,
        /// Direction of the step, or `None` when the enemy stays in place.
        direction: Option<Direction>,
    },
    /// Resolves player contact and exit escapes for every live enemy.
    ResolveContacts,
    /// Springs traps under live enemies.
    ResolveTraps,
    /// Adds a signed delta to the running score.
    AdjustScore {
        /// Points to add; negative values deduct.
        delta: i64,
    },
    /// Overwrites the running score.
    SetScore {
        /// New score value.
        score: i64,
    },
    /// Ends the match at the player's request.
    Forfeit,
}

/// Events broadcast by the world after processing commands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Announces that a new match began.
    MatchStarted {
        /// Mode of the match.
        mode: GameMode,
        /// Difficulty of the match.
        difficulty: Difficulty,
    },
    /// Indicates that the simulation clock advanced.
    TimeAdvanced {
        /// Duration of simulated time that elapsed in the tick.
        dt: Duration,
        /// Total simulated time since the match started.
        elapsed: Duration,
    },
    /// Reports that the player's energy regenerated.
    EnergyRegenerated {
        /// Energy after regeneration.
        energy: u32,
    },
    /// Confirms that the player moved between two cells.
    PlayerMoved {
        /// Cell the player occupied before moving.
        from: CellCoord,
        /// Cell the player occupies after moving.
        to: CellCoord,
        /// Whether the move was a sprint that spent energy.
        sprinted: bool,
    },
    /// Confirms that a trap was laid.
    TrapPlaced {
        /// Cell holding the trap.
        cell: CellCoord,
    },
    /// Reports that a trap placement request was refused.
    TrapRejected {
        /// Specific reason the placement failed.
        reason: TrapRejection,
    },
    /// Confirms that a dead enemy came back.
    EnemyRespawned {
        /// Identifier of the revived enemy.
        enemy: EnemyId,
        /// Cell the enemy reappeared on.
        cell: CellCoord,
    },
    /// Confirms that an enemy stepped between two cells.
    EnemyMoved {
        /// Identifier of the enemy that moved.
        enemy: EnemyId,
        /// Cell the enemy occupied before moving.
        from: CellCoord,
        /// Cell the enemy occupies after moving.
        to: CellCoord,
    },
    /// Reports that the player caught an enemy.
    EnemyCaptured {
        /// Identifier of the captured enemy.
        enemy: EnemyId,
        /// Cell where the capture happened.
        cell: CellCoord,
    },
    /// Reports that a fleeing enemy slipped out through the exit.
    EnemyEscaped {
        /// Identifier of the escaped enemy.
        enemy: EnemyId,
    },
    /// Reports that a trap killed an enemy.
    EnemyTrapped {
        /// Identifier of the trapped enemy.
        enemy: EnemyId,
        /// Cell of the trap that fired.
        cell: CellCoord,
    },
    /// Reports the running score after a change.
    ScoreChanged {
        /// Score after the change.
        score: i64,
    },
    /// Announces that the match reached a terminal state.
    MatchEnded {
        /// Reason the match ended.
        outcome: MatchOutcome,
        /// Total simulated time the match lasted.
        elapsed: Duration,
    },
}

/// Immutable representation of a single enemy's state used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EnemySnapshot {
    /// Unique identifier assigned to the enemy.
    pub id: EnemyId,
    /// Grid cell currently occupied (or last occupied, when dead).
    pub cell: CellCoord,
    /// Whether the enemy is alive.
    pub alive: bool,
    /// Simulated time of death, present only while dead.
    pub died_at: Option<Duration>,
    /// Indicates whether enough time passed since the last step to move again.
    pub ready_for_step: bool,
}

/// Read-only snapshot describing all enemies of a match.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnemyView {
    snapshots: Vec<EnemySnapshot>,
}

impl EnemyView {
    /// Creates a new enemy view from the provided snapshots.
    #[must_use]
    pub fn from_snapshots(mut snapshots: Vec<EnemySnapshot>) -> Self {
        snapshots.sort_by_key(|snapshot| snapshot.id);
        Self { snapshots }
    }

    /// Iterator over the captured enemy snapshots in deterministic order.
    pub fn iter(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter()
    }

    /// Iterator over the enemies that are currently alive.
    pub fn alive(&self) -> impl Iterator<Item = &EnemySnapshot> {
        self.snapshots.iter().filter(|snapshot| snapshot.alive)
    }

    /// Consumes the view, yielding the underlying snapshots.
    #[must_use]
    pub fn into_vec(self) -> Vec<EnemySnapshot> {
        self.snapshots
    }
}

/// Immutable representation of the player used for queries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlayerSnapshot {
    /// Cell the player occupies.
    pub cell: CellCoord,
    /// Current energy.
    pub energy: u32,
    /// Upper bound of the energy.
    pub energy_max: u32,
}

impl PlayerSnapshot {
    /// Energy as a fraction of the maximum, in `0.0..=1.0`.
    #[must_use]
    pub fn energy_fraction(&self) -> f64 {
        if self.energy_max == 0 {
            return 0.0;
        }
        f64::from(self.energy) / f64::from(self.energy_max)
    }
}

/// Immutable representation of a live trap.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TrapSnapshot {
    /// Cell the trap sits on.
    pub cell: CellCoord,
    /// Simulated time the trap was placed.
    pub placed_at: Duration,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manhattan_distance_matches_expectation() {
        let origin = CellCoord::new(1, 1);
        let destination = CellCoord::new(4, 3);
        assert_eq!(origin.manhattan_distance(destination), 5);
        assert_eq!(destination.manhattan_distance(origin), 5);
    }

    #[test]
    fn passability_follows_terrain_table() {
        use ActorClass::{Enemy, Player};

        assert!(Terrain::Path.passable_by(Player));
        assert!(Terrain::Path.passable_by(Enemy));
        assert!(!Terrain::Wall.passable_by(Player));
        assert!(!Terrain::Wall.passable_by(Enemy));
        assert!(!Terrain::Vine.passable_by(Player));
        assert!(Terrain::Vine.passable_by(Enemy));
        assert!(Terrain::Tunnel.passable_by(Player));
        assert!(!Terrain::Tunnel.passable_by(Enemy));
    }

    #[test]
    fn out_of_bounds_cells_read_as_wall() {
        let grid = TerrainGrid::filled(3, 3, Terrain::Path, CellCoord::new(1, 1), CellCoord::new(1, 1));
        assert_eq!(grid.terrain(CellCoord::new(3, 0)), Terrain::Wall);
        assert_eq!(grid.terrain(CellCoord::new(0, 3)), Terrain::Wall);
        assert_eq!(grid.terrain(CellCoord::new(u32::MAX, 0)), Terrain::Wall);
        assert_eq!(grid.terrain(CellCoord::new(2, 2)), Terrain::Path);
    }

    #[test]
    fn step_refuses_negative_coordinates() {
        let corner = CellCoord::new(0, 0);
        assert_eq!(corner.step(Direction::Up), None);
        assert_eq!(corner.step(Direction::Left), None);
        assert_eq!(corner.step(Direction::Down), Some(CellCoord::new(0, 1)));
        assert_eq!(corner.step(Direction::Right), Some(CellCoord::new(1, 0)));
    }

    #[test]
    fn from_rows_parses_glyphs() {
        let grid = TerrainGrid::from_rows(&["#.~", "=#"], CellCoord::new(1, 0), CellCoord::new(0, 1));
        assert_eq!(grid.columns(), 3);
        assert_eq!(grid.rows(), 2);
        assert_eq!(grid.terrain(CellCoord::new(1, 0)), Terrain::Path);
        assert_eq!(grid.terrain(CellCoord::new(2, 0)), Terrain::Vine);
        assert_eq!(grid.terrain(CellCoord::new(0, 1)), Terrain::Tunnel);
        assert_eq!(grid.terrain(CellCoord::new(2, 1)), Terrain::Wall);
    }

    #[test]
    fn interior_excludes_border_ring() {
        let grid = TerrainGrid::filled(4, 4, Terrain::Wall, CellCoord::new(1, 1), CellCoord::new(2, 2));
        assert!(grid.is_interior(CellCoord::new(1, 1)));
        assert!(grid.is_interior(CellCoord::new(2, 2)));
        assert!(!grid.is_interior(CellCoord::new(0, 2)));
        assert!(!grid.is_interior(CellCoord::new(3, 1)));
    }

    #[test]
    fn difficulty_parses_labels_and_aliases() {
        assert_eq!("Fácil".parse::<Difficulty>(), Ok(Difficulty::Easy));
        assert_eq!("normal".parse::<Difficulty>(), Ok(Difficulty::Normal));
        assert_eq!(" Difícil ".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!("hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert!("nightmare".parse::<Difficulty>().is_err());
    }

    #[test]
    fn difficulty_presets_match_table() {
        let factors: Vec<f64> = Difficulty::ALL.iter().map(|d| d.factor()).collect();
        assert_eq!(factors, vec![1.0, 1.5, 2.0]);
        let counts: Vec<usize> = Difficulty::ALL.iter().map(|d| d.enemy_count()).collect();
        assert_eq!(counts, vec![3, 4, 5]);
    }

    #[test]
    fn enemy_interval_scales_inversely_with_speed() {
        let rules = MatchRules::default();
        assert_eq!(rules.enemy_step_interval(1.0), Duration::from_millis(600));
        assert_eq!(rules.enemy_step_interval(1.5), Duration::from_millis(400));
        assert_eq!(rules.enemy_step_interval(2.0), Duration::from_millis(300));
        assert_eq!(rules.enemy_step_interval(10.0), Duration::from_millis(200));
    }

    #[test]
    fn default_rules_place_exit_in_far_corner() {
        let rules = MatchRules::default();
        assert_eq!(rules.start(), CellCoord::new(1, 1));
        assert_eq!(rules.exit(), CellCoord::new(18, 13));
    }

    #[test]
    fn game_mode_serializes_with_ledger_keys() {
        let json = serde_json::to_string(&GameMode::Hunter).expect("serialize");
        assert_eq!(json, "\"CAZADOR\"");
        assert_eq!(GameMode::Escape.ledger_key(), "ESCAPA");
    }
}
