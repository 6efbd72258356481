#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Persistent top-five score ledger, one list per game mode.
//!
//! The ledger is stored as a pretty-printed JSON object with the keys
//! `"ESCAPA"` and `"CAZADOR"`, each holding up to five
//! `{"nombre": .., "puntaje": ..}` entries sorted from best to worst.
//! Reading never fails: a missing or malformed file yields empty lists.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use hunters_core::{GameMode, ScoreSink};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

/// Maximum number of entries retained per mode.
pub const LEDGER_CAPACITY: usize = 5;

/// A single ranked score.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    /// Name the player registered with.
    #[serde(rename = "nombre")]
    pub name: String,
    /// Final score of the match.
    #[serde(rename = "puntaje")]
    pub score: i64,
}

impl ScoreEntry {
    /// Creates an entry for the provided player and score.
    #[must_use]
    pub fn new(name: impl Into<String>, score: i64) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Errors raised while persisting the ledger.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The ledger could not be encoded as JSON.
    #[error("could not encode score ledger: {0}")]
    Encode(#[from] serde_json::Error),
    /// The ledger file could not be written.
    #[error("could not write score ledger '{path}': {source}")]
    Write {
        /// File the ledger was written to.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
struct Lists {
    #[serde(rename = "ESCAPA", default)]
    escape: Vec<ScoreEntry>,
    #[serde(rename = "CAZADOR", default)]
    hunter: Vec<ScoreEntry>,
}

impl Lists {
    fn for_mode(&self, mode: GameMode) -> &[ScoreEntry] {
        match mode {
            GameMode::Escape => &self.escape,
            GameMode::Hunter => &self.hunter,
        }
    }

    fn for_mode_mut(&mut self, mode: GameMode) -> &mut Vec<ScoreEntry> {
        match mode {
            GameMode::Escape => &mut self.escape,
            GameMode::Hunter => &mut self.hunter,
        }
    }
}

/// Bounded high-score table, optionally backed by a JSON file.
#[derive(Clone, Debug, Default)]
pub struct ScoreLedger {
    path: Option<PathBuf>,
    lists: Lists,
}

impl ScoreLedger {
    /// Opens the ledger stored at `path`.
    ///
    /// A missing file starts an empty ledger. An unreadable or malformed file
    /// is logged and also treated as empty; it is overwritten on the next
    /// insertion.
    #[must_use]
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let lists = load(&path);
        Self {
            path: Some(path),
            lists,
        }
    }

    /// Creates a ledger that is never written to disk.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Ranked entries for `mode`, best first.
    #[must_use]
    pub fn top5(&self, mode: GameMode) -> &[ScoreEntry] {
        self.lists.for_mode(mode)
    }

    /// Inserts a score and persists the ledger.
    ///
    /// The list is re-sorted from best to worst and cut to
    /// [`LEDGER_CAPACITY`] entries. A new score that ties the fifth place is
    /// ranked after the existing entry and therefore dropped. The in-memory
    /// lists are updated even when writing the file fails.
    pub fn add_score(
        &mut self,
        mode: GameMode,
        name: &str,
        score: i64,
    ) -> Result<(), LedgerError> {
        let list = self.lists.for_mode_mut(mode);
        list.push(ScoreEntry::new(name, score));
        list.sort_by(|left, right| right.score.cmp(&left.score));
        list.truncate(LEDGER_CAPACITY);
        debug!(mode = %mode, name, score, "score recorded");
        self.save()
    }

    fn save(&self) -> Result<(), LedgerError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(&self.lists)?;
        fs::write(path, json).map_err(|source| LedgerError::Write {
            path: path.clone(),
            source,
        })
    }
}

impl ScoreSink for ScoreLedger {
    type Error = LedgerError;

    fn record(&mut self, mode: GameMode, name: &str, score: i64) -> Result<(), LedgerError> {
        self.add_score(mode, name, score)
    }
}

fn load(path: &Path) -> Lists {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(error) if error.kind() == io::ErrorKind::NotFound => return Lists::default(),
        Err(error) => {
            warn!(path = %path.display(), %error, "score ledger unreadable, starting empty");
            return Lists::default();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(lists) => lists,
        Err(error) => {
            warn!(path = %path.display(), %error, "score ledger malformed, starting empty");
            Lists::default()
        }
    }
}

/// Formats a ranking as `1) name(score), 2) ...`, or `-` when empty.
#[must_use]
pub fn format_ranking(entries: &[ScoreEntry]) -> String {
    if entries.is_empty() {
        return "-".to_owned();
    }
    entries
        .iter()
        .enumerate()
        .map(|(index, entry)| format!("{}) {}({})", index + 1, entry.name, entry.score))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn in_memory_ledger_keeps_best_five() {
        let mut ledger = ScoreLedger::in_memory();
        for (index, score) in [10, 50, 30, 90, 20, 5].into_iter().enumerate() {
            ledger
                .add_score(GameMode::Escape, &format!("p{index}"), score)
                .expect("in-memory ledger never fails");
        }

        let scores: Vec<i64> = ledger
            .top5(GameMode::Escape)
            .iter()
            .map(|entry| entry.score)
            .collect();
        assert_eq!(scores, vec![90, 50, 30, 20, 10]);
        assert!(ledger.top5(GameMode::Hunter).is_empty());
    }

    #[test]
    fn new_entry_loses_ties_at_the_cut() {
        let mut ledger = ScoreLedger::in_memory();
        for name in ["a", "b", "c", "d", "e"] {
            ledger.add_score(GameMode::Hunter, name, 100).expect("insert");
        }
        ledger.add_score(GameMode::Hunter, "late", 100).expect("insert");

        let names: Vec<&str> = ledger
            .top5(GameMode::Hunter)
            .iter()
            .map(|entry| entry.name.as_str())
            .collect();
        assert_eq!(names, vec!["a", "b", "c", "d", "e"]);
    }

    #[test]
    fn ledger_records_scores_as_a_sink() {
        fn finish<S: ScoreSink>(mut sink: S) -> Result<(), S::Error> {
            sink.record(GameMode::Escape, "ana", 640)
        }

        let mut ledger = ScoreLedger::in_memory();
        finish(&mut ledger).expect("in-memory ledger never fails");

        assert_eq!(ledger.top5(GameMode::Escape), &[ScoreEntry::new("ana", 640)]);
    }

    #[test]
    fn ranking_format() {
        assert_eq!(format_ranking(&[]), "-");
        assert_eq!(
            format_ranking(&[ScoreEntry::new("ana", 90), ScoreEntry::new("luis", 40)]),
            "1) ana(90), 2) luis(40)"
        );
    }
}
