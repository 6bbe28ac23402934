//! Undo/redo history over reversible changes, persisted as a JSON-lines log.
//!
//! Each applied change becomes a [`HistoryEntry`]. Undo reverts the most recent
//! done entry and moves it to the redo stack; performing a new change discards
//! the redo stack. Every apply and revert runs under the grid's write guard.
//!
//! The log lists entries in timeline order, one per line: done entries oldest
//! first, then undone entries starting with the next one to redo.
//!
//! ```text
//! {"id":1,"description":"...","time":"...","state":"done","type":"extract-terms","change":{...}}
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use entigrid_grid::Grid;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::change::Change;
use crate::error::ChangeError;
use crate::registry::ChangeRegistry;

#[derive(Debug, Error)]
pub enum HistoryError {
    #[error("nothing to undo")]
    NothingToUndo,

    #[error("nothing to redo")]
    NothingToRedo,

    #[error("change log line {line}: {source}")]
    Line {
        line: usize,
        #[source]
        source: ChangeError,
    },

    #[error(transparent)]
    Change(#[from] ChangeError),

    #[error("change log I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Clone, Default)]
pub struct HistoryConfig {
    /// Maximum number of done entries kept; the oldest are dropped first.
    pub max_entries: Option<usize>,
}

#[derive(Debug)]
pub struct HistoryEntry {
    pub id: u64,
    pub description: String,
    pub time: DateTime<Utc>,
    change: Box<dyn Change>,
}

impl HistoryEntry {
    pub fn change(&self) -> &dyn Change {
        self.change.as_ref()
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
enum EntryState {
    Done,
    Undone,
}

#[derive(Serialize, Deserialize, Debug)]
struct LogLine {
    id: u64,
    description: String,
    time: DateTime<Utc>,
    state: EntryState,
    #[serde(rename = "type")]
    tag: String,
    change: serde_json::Value,
}

#[derive(Debug)]
pub struct History {
    config: HistoryConfig,
    done: Vec<HistoryEntry>,
    undone: Vec<HistoryEntry>,
    next_id: u64,
}

impl Default for History {
    fn default() -> Self {
        Self::new()
    }
}

impl History {
    pub fn new() -> Self {
        Self::with_config(HistoryConfig::default())
    }

    pub fn with_config(config: HistoryConfig) -> Self {
        Self {
            config,
            done: Vec::new(),
            undone: Vec::new(),
            next_id: 1,
        }
    }

    pub fn config(&self) -> &HistoryConfig {
        &self.config
    }

    /// Entries that can be undone, oldest first.
    pub fn done_entries(&self) -> &[HistoryEntry] {
        &self.done
    }

    /// Entries that can be redone; the last element is redone first.
    pub fn undone_entries(&self) -> &[HistoryEntry] {
        &self.undone
    }

    pub fn can_undo(&self) -> bool {
        !self.done.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.undone.is_empty()
    }

    /// Apply `change` to the grid and record it. Returns the new entry's id.
    ///
    /// A change that fails to apply is not recorded. The grid may be left in an
    /// intermediate shape in that case and must not be reverted with it.
    pub fn perform<G: Grid>(
        &mut self,
        grid: &RwLock<G>,
        description: impl Into<String>,
        mut change: Box<dyn Change>,
    ) -> Result<u64, HistoryError> {
        {
            let mut guard = grid.write();
            change.apply(&mut *guard)?;
        }
        let id = self.next_id;
        self.next_id += 1;
        self.done.push(HistoryEntry {
            id,
            description: description.into(),
            time: Utc::now(),
            change,
        });
        self.undone.clear();
        self.enforce_limit();

        #[cfg(feature = "tracing")]
        tracing::info!(id, "performed change");
        Ok(id)
    }

    /// Revert the most recent done entry. On a precondition failure the entry
    /// stays on the done stack.
    pub fn undo<G: Grid>(&mut self, grid: &RwLock<G>) -> Result<u64, HistoryError> {
        let mut entry = self.done.pop().ok_or(HistoryError::NothingToUndo)?;
        let result = {
            let mut guard = grid.write();
            entry.change.revert(&mut *guard)
        };
        if let Err(err) = result {
            self.done.push(entry);
            return Err(err.into());
        }
        let id = entry.id;
        self.undone.push(entry);

        #[cfg(feature = "tracing")]
        tracing::info!(id, "undid change");
        Ok(id)
    }

    pub fn redo<G: Grid>(&mut self, grid: &RwLock<G>) -> Result<u64, HistoryError> {
        let mut entry = self.undone.pop().ok_or(HistoryError::NothingToRedo)?;
        let result = {
            let mut guard = grid.write();
            entry.change.apply(&mut *guard)
        };
        if let Err(err) = result {
            self.undone.push(entry);
            return Err(err.into());
        }
        let id = entry.id;
        self.done.push(entry);

        #[cfg(feature = "tracing")]
        tracing::info!(id, "redid change");
        Ok(id)
    }

    fn enforce_limit(&mut self) {
        if let Some(max) = self.config.max_entries {
            if self.done.len() > max {
                let excess = self.done.len() - max;
                self.done.drain(..excess);
            }
        }
    }

    pub fn save<W: Write + ?Sized>(&self, writer: &mut W) -> Result<(), HistoryError> {
        let timeline = self
            .done
            .iter()
            .map(|e| (e, EntryState::Done))
            .chain(self.undone.iter().rev().map(|e| (e, EntryState::Undone)));
        for (entry, state) in timeline {
            let line = LogLine {
                id: entry.id,
                description: entry.description.clone(),
                time: entry.time,
                state,
                tag: entry.change.type_tag().to_string(),
                change: entry.change.to_record()?,
            };
            let text = serde_json::to_string(&line).map_err(ChangeError::malformed)?;
            writer.write_all(text.as_bytes())?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// Rebuild a history from a log written by [`History::save`]. Blank lines
    /// are ignored.
    pub fn load<R: BufRead>(
        reader: R,
        registry: &ChangeRegistry,
        config: HistoryConfig,
    ) -> Result<Self, HistoryError> {
        let mut history = Self::with_config(config);
        let mut undone = Vec::new();
        for (index, line) in reader.lines().enumerate() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let line_no = index + 1;
            let at_line = |source: ChangeError| HistoryError::Line {
                line: line_no,
                source,
            };
            let parsed: LogLine =
                serde_json::from_str(&line).map_err(|e| at_line(ChangeError::malformed(e)))?;
            let change = registry
                .instantiate(&parsed.tag, parsed.change)
                .map_err(at_line)?;
            let entry = HistoryEntry {
                id: parsed.id,
                description: parsed.description,
                time: parsed.time,
                change,
            };
            let after = parsed
                .id
                .checked_add(1)
                .ok_or_else(|| at_line(ChangeError::malformed("entry id is out of range")))?;
            history.next_id = history.next_id.max(after);
            match parsed.state {
                EntryState::Done if !undone.is_empty() => {
                    return Err(at_line(ChangeError::malformed(
                        "done entry follows an undone entry",
                    )));
                }
                EntryState::Done => history.done.push(entry),
                EntryState::Undone => undone.push(entry),
            }
        }
        undone.reverse();
        history.undone = undone;

        #[cfg(feature = "tracing")]
        tracing::debug!(
            done = history.done.len(),
            undone = history.undone.len(),
            "loaded change log"
        );
        Ok(history)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, path: P) -> Result<(), HistoryError> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.save(&mut writer)
    }

    pub fn load_from_path<P: AsRef<Path>>(
        path: P,
        registry: &ChangeRegistry,
        config: HistoryConfig,
    ) -> Result<Self, HistoryError> {
        let reader = BufReader::new(File::open(path)?);
        Self::load(reader, registry, config)
    }
}
