#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Scoring system that turns match events into score commands.
//!
//! The two modes keep score differently. Escape mode recomputes the score from
//! the elapsed time after every tick, so bonuses granted earlier in the same
//! tick are overwritten. Hunter mode accumulates captures and escapes as they
//! happen and receives a time bonus when the match ends.

use std::time::Duration;

use hunters_core::{Command, Difficulty, Event, GameMode};

/// Point values scaled by the difficulty factor.
///
/// Every scaled value is truncated toward zero after multiplication.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScoreRules {
    factor: f64,
}

impl ScoreRules {
    /// Rules for an arbitrary difficulty factor.
    #[must_use]
    pub const fn with_factor(factor: f64) -> Self {
        Self { factor }
    }

    /// Rules for a difficulty preset.
    #[must_use]
    pub const fn for_difficulty(difficulty: Difficulty) -> Self {
        Self::with_factor(difficulty.factor())
    }

    /// Points for catching an enemy in hunter mode.
    #[must_use]
    pub fn capture_award(&self) -> i64 {
        scale(100 * 2, self.factor)
    }

    /// Points lost when an enemy flees through the exit.
    #[must_use]
    pub fn escape_penalty(&self) -> i64 {
        scale(50, self.factor)
    }

    /// Points for an enemy killed by a trap.
    #[must_use]
    pub fn trap_award(&self) -> i64 {
        scale(30, self.factor)
    }

    /// Escape-mode score after `elapsed` with `captures` enemies caught.
    #[must_use]
    pub fn escape_score(&self, elapsed: Duration, captures: u32) -> i64 {
        let seconds = whole_seconds(elapsed);
        let base = (1_000 - seconds.saturating_mul(10)).max(0);
        scale(base, self.factor) + i64::from(captures) * 30
    }

    /// Hunter-mode bonus granted when a match lasting `elapsed` ends.
    #[must_use]
    pub fn hunter_time_bonus(&self, elapsed: Duration) -> i64 {
        let seconds = whole_seconds(elapsed);
        let base = (500 - seconds.saturating_mul(5)).max(0);
        scale(base, self.factor)
    }
}

impl Default for ScoreRules {
    fn default() -> Self {
        Self::for_difficulty(Difficulty::default())
    }
}

fn whole_seconds(elapsed: Duration) -> i64 {
    i64::try_from(elapsed.as_secs()).unwrap_or(i64::MAX)
}

fn scale(points: i64, factor: f64) -> i64 {
    (points as f64 * factor) as i64
}

/// Pure system that reacts to world events and emits score commands.
#[derive(Debug, Default)]
pub struct Scoring {
    mode: Option<GameMode>,
    rules: ScoreRules,
    captures: u32,
}

impl Scoring {
    /// Creates a scoring system that waits for a match to start.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules of the match currently being scored.
    #[must_use]
    pub const fn rules(&self) -> ScoreRules {
        self.rules
    }

    /// Consumes one batch of world events and emits the resulting score commands.
    ///
    /// The batch should hold everything the world reported for one tick or one
    /// input, in order. In escape mode the recomputed score is emitted last and
    /// skipped when the batch ends the match.
    pub fn handle(&mut self, events: &[Event], out: &mut Vec<Command>) {
        let mut elapsed = None;
        let mut ended = false;

        for event in events {
            match event {
                Event::MatchStarted { mode, difficulty } => {
                    self.mode = Some(*mode);
                    self.rules = ScoreRules::for_difficulty(*difficulty);
                    self.captures = 0;
                }
                Event::TimeAdvanced { elapsed: now, .. } => elapsed = Some(*now),
                Event::EnemyCaptured { .. } => {
                    self.captures += 1;
                    out.push(Command::AdjustScore {
                        delta: self.rules.capture_award(),
                    });
                }
                Event::EnemyEscaped { .. } => out.push(Command::AdjustScore {
                    delta: -self.rules.escape_penalty(),
                }),
                Event::EnemyTrapped { .. } => out.push(Command::AdjustScore {
                    delta: self.rules.trap_award(),
                }),
                Event::MatchEnded { elapsed: total, .. } => {
                    ended = true;
                    if self.mode == Some(GameMode::Hunter) {
                        out.push(Command::AdjustScore {
                            delta: self.rules.hunter_time_bonus(*total),
                        });
                    }
                }
                _ => {}
            }
        }

        if ended || self.mode != Some(GameMode::Escape) {
            return;
        }
        if let Some(elapsed) = elapsed {
            out.push(Command::SetScore {
                score: self.rules.escape_score(elapsed, self.captures),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_score_at_start_is_scaled_base() {
        let rules = ScoreRules::for_difficulty(Difficulty::Easy);
        assert_eq!(rules.escape_score(Duration::ZERO, 0), 1_000);
    }

    #[test]
    fn escape_score_with_time_and_capture() {
        let rules = ScoreRules::for_difficulty(Difficulty::Normal);
        assert_eq!(rules.escape_score(Duration::from_secs(10), 1), 1_380);
    }

    #[test]
    fn escape_score_truncates_partial_seconds() {
        let rules = ScoreRules::for_difficulty(Difficulty::Easy);
        assert_eq!(rules.escape_score(Duration::from_millis(10_999), 0), 900);
    }

    #[test]
    fn escape_score_floors_time_component_at_zero() {
        let rules = ScoreRules::for_difficulty(Difficulty::Hard);
        assert_eq!(rules.escape_score(Duration::from_secs(250), 2), 60);
    }

    #[test]
    fn hunter_awards_scale_with_difficulty() {
        let hard = ScoreRules::for_difficulty(Difficulty::Hard);
        assert_eq!(hard.capture_award(), 400);
        assert_eq!(hard.escape_penalty(), 100);
        assert_eq!(hard.trap_award(), 60);

        let normal = ScoreRules::for_difficulty(Difficulty::Normal);
        assert_eq!(normal.capture_award(), 300);
        assert_eq!(normal.escape_penalty(), 75);
        assert_eq!(normal.trap_award(), 45);
    }

    #[test]
    fn hunter_time_bonus_decays_to_zero() {
        let rules = ScoreRules::for_difficulty(Difficulty::Normal);
        assert_eq!(rules.hunter_time_bonus(Duration::ZERO), 750);
        assert_eq!(rules.hunter_time_bonus(Duration::from_secs(40)), 450);
        assert_eq!(rules.hunter_time_bonus(Duration::from_secs(100)), 0);
        assert_eq!(rules.hunter_time_bonus(Duration::from_secs(1_000)), 0);
    }
}
