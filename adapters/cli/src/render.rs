use std::fmt::Write as _;

use hunters_core::{CellCoord, GameMode, MatchOutcome, Terrain};
use hunters_ledger::{format_ranking, ScoreLedger};
use hunters_session::{MatchSummary, SessionSnapshot, StepReport};

const ENERGY_BAR_WIDTH: usize = 10;

/// Draws the board as one line of glyphs per row.
///
/// Actors cover terrain in the order player, enemy, trap, exit.
pub(crate) fn board(snapshot: &SessionSnapshot) -> String {
    let terrain = &snapshot.terrain;
    let mut out = String::with_capacity(((terrain.columns() + 1) * terrain.rows()) as usize);
    for row in 0..terrain.rows() {
        for column in 0..terrain.columns() {
            out.push(glyph(snapshot, CellCoord::new(column, row)));
        }
        out.push('\n');
    }
    out
}

fn glyph(snapshot: &SessionSnapshot, cell: CellCoord) -> char {
    if snapshot.player.cell == cell {
        return 'P';
    }
    if snapshot
        .enemies
        .iter()
        .any(|enemy| enemy.alive && enemy.cell == cell)
    {
        return 'X';
    }
    if snapshot.traps.iter().any(|trap| trap.cell == cell) {
        return '^';
    }
    if snapshot.terrain.exit() == cell {
        return 'E';
    }
    match snapshot.terrain.terrain(cell) {
        Terrain::Path => '.',
        Terrain::Wall => '#',
        Terrain::Vine => '~',
        Terrain::Tunnel => '=',
    }
}

/// Fixed-width energy gauge such as `[#####-----]`.
pub(crate) fn energy_bar(fraction: f64) -> String {
    let filled = (fraction.clamp(0.0, 1.0) * ENERGY_BAR_WIDTH as f64).round() as usize;
    format!(
        "[{}{}]",
        "#".repeat(filled),
        "-".repeat(ENERGY_BAR_WIDTH - filled)
    )
}

/// One-line summary printed under the board.
pub(crate) fn status_line(snapshot: &SessionSnapshot, report: &StepReport) -> String {
    let mut line = format!(
        "{} | {} | {} | time {}s | score {} | energy {}",
        snapshot.mode,
        snapshot.name,
        snapshot.difficulty,
        report.elapsed.as_secs(),
        report.score,
        energy_bar(report.energy_fraction),
    );
    match snapshot.mode {
        GameMode::Escape => {
            let _ = write!(
                line,
                " | traps {} | trapped {}",
                snapshot.traps.len(),
                snapshot.tally.trap_kills
            );
        }
        GameMode::Hunter => {
            let _ = write!(
                line,
                " | caught {} | escaped {}",
                report.captures, report.escapes
            );
        }
    }
    line
}

/// Closing message for a finished match.
pub(crate) fn summary(summary: &MatchSummary) -> String {
    let headline = match summary.outcome {
        MatchOutcome::Victory => "You escaped in time!",
        MatchOutcome::Defeat => "A hunter caught you.",
        MatchOutcome::Forfeit => "You gave up.",
    };
    format!(
        "{headline}\nFinal score: {}\nTime: {}s",
        summary.score, summary.seconds
    )
}

/// Both top-five lists, one per line.
pub(crate) fn rankings(ledger: &ScoreLedger) -> String {
    format!(
        "Top {}: {}\nTop {}: {}",
        GameMode::Escape,
        format_ranking(ledger.top5(GameMode::Escape)),
        GameMode::Hunter,
        format_ranking(ledger.top5(GameMode::Hunter)),
    )
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use hunters_core::{
        Difficulty, EnemyId, EnemySnapshot, MatchPhase, PlayerSnapshot, TerrainGrid,
        TrapSnapshot,
    };
    use hunters_session::{StepStatus, Tally};

    use super::*;

    fn snapshot() -> SessionSnapshot {
        let terrain = TerrainGrid::from_rows(
            &["######", "#..~=#", "#....#", "######"],
            CellCoord::new(1, 1),
            CellCoord::new(4, 2),
        );
        SessionSnapshot {
            name: "ana".to_owned(),
            mode: GameMode::Escape,
            difficulty: Difficulty::Normal,
            phase: MatchPhase::Running,
            terrain,
            player: PlayerSnapshot {
                cell: CellCoord::new(1, 1),
                energy: 50,
                energy_max: 100,
            },
            enemies: vec![
                EnemySnapshot {
                    id: EnemyId::new(0),
                    cell: CellCoord::new(3, 1),
                    alive: true,
                    died_at: None,
                    ready_for_step: false,
                },
                EnemySnapshot {
                    id: EnemyId::new(1),
                    cell: CellCoord::new(2, 2),
                    alive: false,
                    died_at: Some(Duration::from_secs(1)),
                    ready_for_step: false,
                },
            ],
            traps: vec![TrapSnapshot {
                cell: CellCoord::new(1, 2),
                placed_at: Duration::ZERO,
            }],
            score: 985,
            elapsed: Duration::from_millis(1_500),
            tally: Tally {
                trap_kills: 2,
                ..Tally::default()
            },
        }
    }

    #[test]
    fn board_layers_actors_over_terrain() {
        assert_eq!(
            board(&snapshot()),
            "######\n#P.X=#\n#^..E#\n######\n",
            "dead enemies are hidden"
        );
    }

    #[test]
    fn energy_bar_rounds_to_width() {
        assert_eq!(energy_bar(0.0), "[----------]");
        assert_eq!(energy_bar(0.5), "[#####-----]");
        assert_eq!(energy_bar(1.0), "[##########]");
        assert_eq!(energy_bar(1.7), "[##########]");
    }

    #[test]
    fn status_line_shows_mode_specific_counters() {
        let snapshot = snapshot();
        let report = StepReport {
            status: StepStatus::Continue,
            score: 985,
            elapsed: snapshot.elapsed,
            energy_fraction: 0.5,
            captures: 0,
            escapes: 0,
        };
        assert_eq!(
            status_line(&snapshot, &report),
            "ESCAPA | ana | Normal | time 1s | score 985 | energy [#####-----] | traps 1 | trapped 2"
        );

        let hunter = SessionSnapshot {
            mode: GameMode::Hunter,
            ..snapshot
        };
        let report = StepReport {
            captures: 3,
            escapes: 1,
            ..report
        };
        assert_eq!(
            status_line(&hunter, &report),
            "CAZADOR | ana | Normal | time 1s | score 985 | energy [#####-----] | caught 3 | escaped 1"
        );
    }

    #[test]
    fn rankings_show_dash_for_empty_lists() {
        let mut ledger = ScoreLedger::in_memory();
        ledger
            .add_score(GameMode::Hunter, "luis", 300)
            .expect("in-memory insert");
        assert_eq!(rankings(&ledger), "Top ESCAPA: -\nTop CAZADOR: 1) luis(300)");
    }
}
