use serde::{Deserialize, Deserializer, Serialize};

/// Number of level counters on every row
pub const LEVEL_COUNT: usize = 3;

/// Highest level value. A level at this value earns a star.
pub const LEVEL_MAX: u8 = 100;

/// Plain snapshot of a row, used for persistence and for shifting rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowData {
    #[serde(default)]
    pub task: String,
    /// Persisted as a JSON array of integers. Out-of-range values are clamped
    /// and missing entries default to 0 when reading.
    #[serde(default, deserialize_with = "lenient_levels")]
    pub levels: [u8; LEVEL_COUNT],
}

impl RowData {
    pub fn new(task: impl Into<String>, levels: [u8; LEVEL_COUNT]) -> Self {
        RowData {
            task: task.into(),
            levels,
        }
    }
}

fn lenient_levels<'de, D>(deserializer: D) -> Result<[u8; LEVEL_COUNT], D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Vec<i64> = Vec::deserialize(deserializer)?;
    let mut levels = [0u8; LEVEL_COUNT];
    for (slot, value) in levels.iter_mut().zip(raw) {
        *slot = clamp_level(value);
    }
    Ok(levels)
}

/// Clamp an arbitrary integer into the valid level range
pub fn clamp_level(value: i64) -> u8 {
    value.clamp(0, LEVEL_MAX as i64) as u8
}

/// Result of changing one level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelChange {
    /// The value was already what was asked for (or the index was invalid)
    Unchanged,
    /// The value changed and the row's completion state did not flip on
    Changed,
    /// This change moved the row into the all-stars state
    Completed,
}

/// Why a directly typed level value was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LevelInputError {
    #[error("'{0}' is not a number")]
    NotANumber(String),
    #[error("{0} is outside 0-{max}", max = LEVEL_MAX)]
    OutOfRange(i64),
}

/// One task with its three level counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Row {
    task: String,
    levels: [u8; LEVEL_COUNT],
}

impl Row {
    pub fn task(&self) -> &str {
        &self.task
    }

    pub fn set_task(&mut self, task: impl Into<String>) {
        self.task = task.into();
    }

    pub fn levels(&self) -> [u8; LEVEL_COUNT] {
        self.levels
    }

    pub fn level(&self, index: usize) -> Option<u8> {
        self.levels.get(index).copied()
    }

    pub fn star(&self, index: usize) -> bool {
        self.level(index).is_some_and(|v| v >= LEVEL_MAX)
    }

    pub fn stars(&self) -> [bool; LEVEL_COUNT] {
        self.levels.map(|v| v >= LEVEL_MAX)
    }

    pub fn is_complete(&self) -> bool {
        self.stars().iter().all(|&s| s)
    }

    pub fn is_empty(&self) -> bool {
        self.task.is_empty() && self.levels.iter().all(|&v| v == 0)
    }

    /// Set a level, clamping into range. Reports `Completed` only on the
    /// transition into the all-stars state.
    pub fn set_level(&mut self, index: usize, value: i64) -> LevelChange {
        let was_complete = self.is_complete();
        let Some(slot) = self.levels.get_mut(index) else {
            return LevelChange::Unchanged;
        };
        let value = clamp_level(value);
        if *slot == value {
            return LevelChange::Unchanged;
        }
        *slot = value;
        if !was_complete && self.is_complete() {
            LevelChange::Completed
        } else {
            LevelChange::Changed
        }
    }

    pub fn increment(&mut self, index: usize) -> LevelChange {
        match self.level(index) {
            Some(v) => self.set_level(index, v as i64 + 1),
            None => LevelChange::Unchanged,
        }
    }

    pub fn decrement(&mut self, index: usize) -> LevelChange {
        match self.level(index) {
            Some(v) => self.set_level(index, v as i64 - 1),
            None => LevelChange::Unchanged,
        }
    }

    /// Apply a typed level value. Unlike `set_level`, values outside the
    /// range are refused rather than clamped.
    pub fn enter_level_text(
        &mut self,
        index: usize,
        text: &str,
    ) -> Result<LevelChange, LevelInputError> {
        let trimmed = text.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| LevelInputError::NotANumber(trimmed.to_string()))?;
        if !(0..=LEVEL_MAX as i64).contains(&value) {
            return Err(LevelInputError::OutOfRange(value));
        }
        Ok(self.set_level(index, value))
    }

    pub fn clear(&mut self) {
        self.task.clear();
        self.levels = [0; LEVEL_COUNT];
    }

    pub fn data(&self) -> RowData {
        RowData {
            task: self.task.clone(),
            levels: self.levels,
        }
    }

    /// Restore from a snapshot. Never reports completion.
    pub fn set_data(&mut self, data: &RowData) {
        self.task = data.task.clone();
        self.levels = data.levels.map(|v| v.min(LEVEL_MAX));
    }
}

impl From<&RowData> for Row {
    fn from(data: &RowData) -> Self {
        let mut row = Row::default();
        row.set_data(data);
        row
    }
}
