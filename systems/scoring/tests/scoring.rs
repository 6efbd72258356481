use std::time::Duration;

use hunters_core::{
    CellCoord, Command, Difficulty, EnemyId, Event, GameMode, MatchOutcome,
};
use hunters_system_scoring::Scoring;

fn started(mode: GameMode, difficulty: Difficulty) -> Scoring {
    let mut scoring = Scoring::new();
    let mut out = Vec::new();
    scoring.handle(&[Event::MatchStarted { mode, difficulty }], &mut out);
    assert!(out.is_empty(), "starting a match scores nothing");
    scoring
}

fn tick_at(elapsed: Duration) -> Event {
    Event::TimeAdvanced {
        dt: Duration::from_millis(100),
        elapsed,
    }
}

#[test]
fn escape_first_tick_on_easy_scores_one_thousand() {
    let mut scoring = started(GameMode::Escape, Difficulty::Easy);
    let mut out = Vec::new();

    scoring.handle(&[tick_at(Duration::from_millis(100))], &mut out);

    assert_eq!(out, vec![Command::SetScore { score: 1_000 }]);
}

#[test]
fn escape_recompute_overwrites_trap_bonus() {
    let mut scoring = started(GameMode::Escape, Difficulty::Normal);
    let mut out = Vec::new();

    scoring.handle(
        &[
            tick_at(Duration::from_secs(10)),
            Event::EnemyTrapped {
                enemy: EnemyId::new(2),
                cell: CellCoord::new(4, 4),
            },
        ],
        &mut out,
    );

    assert_eq!(
        out,
        vec![
            Command::AdjustScore { delta: 45 },
            Command::SetScore { score: 1_350 },
        ],
        "the recomputed score is applied after the trap award"
    );
}

#[test]
fn escape_defeat_keeps_previous_score() {
    let mut scoring = started(GameMode::Escape, Difficulty::Hard);
    let mut out = Vec::new();

    scoring.handle(
        &[
            tick_at(Duration::from_secs(3)),
            Event::MatchEnded {
                outcome: MatchOutcome::Defeat,
                elapsed: Duration::from_secs(3),
            },
        ],
        &mut out,
    );

    assert!(out.is_empty());
}

#[test]
fn escape_ignores_batches_without_time() {
    let mut scoring = started(GameMode::Escape, Difficulty::Easy);
    let mut out = Vec::new();

    scoring.handle(
        &[Event::PlayerMoved {
            from: CellCoord::new(1, 1),
            to: CellCoord::new(2, 1),
            sprinted: false,
        }],
        &mut out,
    );

    assert!(out.is_empty());
}

#[test]
fn hunter_capture_on_hard_awards_four_hundred() {
    let mut scoring = started(GameMode::Hunter, Difficulty::Hard);
    let mut out = Vec::new();

    scoring.handle(
        &[
            tick_at(Duration::from_secs(1)),
            Event::EnemyCaptured {
                enemy: EnemyId::new(0),
                cell: CellCoord::new(3, 3),
            },
        ],
        &mut out,
    );

    assert_eq!(out, vec![Command::AdjustScore { delta: 400 }]);
}

#[test]
fn hunter_escape_deducts_and_end_grants_time_bonus() {
    let mut scoring = started(GameMode::Hunter, Difficulty::Normal);
    let mut out = Vec::new();

    scoring.handle(
        &[
            tick_at(Duration::from_secs(20)),
            Event::EnemyEscaped {
                enemy: EnemyId::new(1),
            },
        ],
        &mut out,
    );
    scoring.handle(
        &[Event::MatchEnded {
            outcome: MatchOutcome::Forfeit,
            elapsed: Duration::from_millis(20_500),
        }],
        &mut out,
    );

    assert_eq!(
        out,
        vec![
            Command::AdjustScore { delta: -75 },
            Command::AdjustScore { delta: 600 },
        ]
    );
}

#[test]
fn new_match_resets_capture_count() {
    let mut scoring = started(GameMode::Hunter, Difficulty::Easy);
    let mut out = Vec::new();
    scoring.handle(
        &[Event::EnemyCaptured {
            enemy: EnemyId::new(0),
            cell: CellCoord::new(2, 2),
        }],
        &mut out,
    );

    out.clear();
    scoring.handle(
        &[
            Event::MatchStarted {
                mode: GameMode::Escape,
                difficulty: Difficulty::Easy,
            },
            tick_at(Duration::from_secs(10)),
        ],
        &mut out,
    );

    assert_eq!(out, vec![Command::SetScore { score: 900 }]);
}
