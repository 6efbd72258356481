#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Procedural map generation that guarantees a walkable route to the exit.
//!
//! Generation runs in two passes. A carving pass walks from the start toward
//! the exit, only ever taking steps that shrink the remaining Manhattan
//! distance, and marks every visited cell as Path. A fill pass then rolls the
//! terrain of every interior cell the carver did not touch. The outer border
//! ring always stays Wall.

use hunters_core::{CellCoord, Direction, Terrain, TerrainGrid};
use rand::Rng;

/// Cumulative thresholds used by the fill pass, in declaration order.
const TERRAIN_WEIGHTS: [(f64, Terrain); 4] = [
    (0.55, Terrain::Path),
    (0.70, Terrain::Wall),
    (0.85, Terrain::Vine),
    (1.0, Terrain::Tunnel),
];

/// Result of the carving pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CarvedRoute {
    cells: Vec<CellCoord>,
    reached_exit: bool,
}

impl CarvedRoute {
    /// Cells visited by the carver, starting with the start cell.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Whether the carver arrived at the exit before running out of moves.
    #[must_use]
    pub const fn reached_exit(&self) -> bool {
        self.reached_exit
    }
}

/// Generates a fresh map of `columns` by `rows` tiles.
///
/// The start and exit cells are always Path. When the carver reaches the exit
/// a Path-only route joins the two; otherwise carving stops early and the
/// remainder of the grid is still filled.
pub fn generate<R: Rng + ?Sized>(
    columns: u32,
    rows: u32,
    start: CellCoord,
    exit: CellCoord,
    rng: &mut R,
) -> TerrainGrid {
    let mut grid = TerrainGrid::filled(columns, rows, Terrain::Wall, start, exit);

    let route = carve_route(&grid, rng);
    for cell in route.cells() {
        grid.set(*cell, Terrain::Path);
    }

    fill_interior(&mut grid, &route, rng);

    grid.set(start, Terrain::Path);
    grid.set(exit, Terrain::Path);
    grid
}

/// Walks from the grid's start toward its exit without touching the border.
///
/// Each step picks uniformly among the directions that point toward the exit
/// and keep the walker inside the interior. The walk stops at the exit or as
/// soon as no such direction exists.
pub fn carve_route<R: Rng + ?Sized>(grid: &TerrainGrid, rng: &mut R) -> CarvedRoute {
    let exit = grid.exit();
    let mut current = grid.start();
    let mut cells = vec![current];

    while current != exit {
        let options = eligible_directions(grid, current, exit);
        if options.is_empty() {
            return CarvedRoute {
                cells,
                reached_exit: false,
            };
        }

        let direction = options[rng.gen_range(0..options.len())];
        let Some(next) = current.step(direction) else {
            break;
        };
        current = next;
        cells.push(current);
    }

    CarvedRoute {
        reached_exit: current == exit,
        cells,
    }
}

fn eligible_directions(grid: &TerrainGrid, from: CellCoord, exit: CellCoord) -> Vec<Direction> {
    let mut options = Vec::with_capacity(2);
    if exit.column() > from.column() {
        options.push(Direction::Right);
    }
    if exit.column() < from.column() {
        options.push(Direction::Left);
    }
    if exit.row() > from.row() {
        options.push(Direction::Down);
    }
    if exit.row() < from.row() {
        options.push(Direction::Up);
    }

    options.retain(|direction| {
        from.step(*direction)
            .is_some_and(|candidate| grid.is_interior(candidate))
    });
    options
}

fn fill_interior<R: Rng + ?Sized>(grid: &mut TerrainGrid, route: &CarvedRoute, rng: &mut R) {
    let mut carved = vec![false; cell_count(grid)];
    for cell in route.cells() {
        if let Some(index) = index_of(grid, *cell) {
            carved[index] = true;
        }
    }

    for row in 1..grid.rows().saturating_sub(1) {
        for column in 1..grid.columns().saturating_sub(1) {
            let cell = CellCoord::new(column, row);
            if index_of(grid, cell).is_some_and(|index| carved[index]) {
                continue;
            }
            grid.set(cell, roll_terrain(rng.gen::<f64>()));
        }
    }
}

/// Maps a uniform draw in `0.0..1.0` onto a terrain kind.
#[must_use]
pub fn roll_terrain(draw: f64) -> Terrain {
    TERRAIN_WEIGHTS
        .iter()
        .find(|(threshold, _)| draw < *threshold)
        .map_or(Terrain::Tunnel, |(_, terrain)| *terrain)
}

fn cell_count(grid: &TerrainGrid) -> usize {
    usize::try_from(u64::from(grid.columns()) * u64::from(grid.rows())).unwrap_or(0)
}

fn index_of(grid: &TerrainGrid, cell: CellCoord) -> Option<usize> {
    if cell.column() >= grid.columns() || cell.row() >= grid.rows() {
        return None;
    }
    let width = usize::try_from(grid.columns()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    let column = usize::try_from(cell.column()).ok()?;
    Some(row * width + column)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roll_terrain_respects_thresholds() {
        assert_eq!(roll_terrain(0.0), Terrain::Path);
        assert_eq!(roll_terrain(0.549), Terrain::Path);
        assert_eq!(roll_terrain(0.55), Terrain::Wall);
        assert_eq!(roll_terrain(0.699), Terrain::Wall);
        assert_eq!(roll_terrain(0.70), Terrain::Vine);
        assert_eq!(roll_terrain(0.85), Terrain::Tunnel);
        assert_eq!(roll_terrain(0.999), Terrain::Tunnel);
    }

    #[test]
    fn eligible_directions_point_toward_exit() {
        let grid = TerrainGrid::filled(10, 10, Terrain::Wall, CellCoord::new(1, 1), CellCoord::new(8, 8));
        let options = eligible_directions(&grid, CellCoord::new(4, 4), CellCoord::new(8, 8));
        assert_eq!(options, vec![Direction::Right, Direction::Down]);

        let aligned = eligible_directions(&grid, CellCoord::new(8, 4), CellCoord::new(8, 8));
        assert_eq!(aligned, vec![Direction::Down]);
    }

    #[test]
    fn eligible_directions_reject_border_ring() {
        let grid = TerrainGrid::filled(5, 5, Terrain::Wall, CellCoord::new(3, 3), CellCoord::new(4, 4));
        let options = eligible_directions(&grid, CellCoord::new(3, 3), CellCoord::new(4, 4));
        assert!(options.is_empty(), "steps onto the border must be rejected");
    }
}
