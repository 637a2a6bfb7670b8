//! Level records and their persistence.
//!
//! Levels are hand-authored JSON files named `NN.json` in the levels
//! directory. The only thing ever written back is the `unlocked` flag of the
//! level following one the player has just won, as a whole-file rewrite.

use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::GameError;

fn is_false(value: &bool) -> bool {
    !*value
}

/// Construction parameters for the player or one enemy.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub name: String,
    pub lives: u32,
    /// Weapon key, `"normal"` or `"triple"` (case-insensitive).
    pub weapon: String,
    /// Enemy key: `"default"`, `"shrinker"` or `"invisible"`. Unused for the player.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Enemies only fire when their record opts in.
    #[serde(default, skip_serializing_if = "is_false")]
    pub shoots: bool,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LevelRecord {
    /// Zero-based; the file is named `{id + 1:02}.json`.
    pub id: u32,
    pub name: String,
    /// Map file name inside the maps directory.
    pub map: String,
    pub player: EntityRecord,
    pub enemies: Vec<EntityRecord>,
    pub unlocked: bool,
    /// Anything else the author put in the file survives a rewrite.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl LevelRecord {
    pub fn file_name(&self) -> String {
        format!("{:02}.json", self.id + 1)
    }
}

// ── JSON helpers ──────────────────────────────────────────────────────────────

pub fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, GameError> {
    let text = fs::read_to_string(path).map_err(|e| GameError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| GameError::json(path, e))
}

/// Pretty-printed with four-space indentation.
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), GameError> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    value
        .serialize(&mut ser)
        .map_err(|e| GameError::json(path, e))?;
    buf.push(b'\n');
    fs::write(path, buf).map_err(|e| GameError::io(path, e))
}

fn is_level_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return false;
    };
    match name.strip_suffix(".json") {
        Some(stem) => stem.len() == 2 && stem.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}

// ── Level manager ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct LevelManager {
    dir: PathBuf,
    levels: Vec<LevelRecord>,
}

impl LevelManager {
    /// Read every `NN.json` in `dir`, in file-name order.
    pub fn load(dir: impl Into<PathBuf>) -> Result<Self, GameError> {
        let dir = dir.into();
        let entries = fs::read_dir(&dir).map_err(|e| GameError::io(&dir, e))?;

        let mut paths = Vec::new();
        for entry in entries {
            let path = entry.map_err(|e| GameError::io(&dir, e))?.path();
            if is_level_file(&path) {
                paths.push(path);
            }
        }
        paths.sort();

        if paths.is_empty() {
            return Err(GameError::NoLevels(dir));
        }

        let levels = paths
            .iter()
            .map(|p| read_json::<LevelRecord>(p))
            .collect::<Result<Vec<_>, _>>()?;
        info!("loaded {} levels from {}", levels.len(), dir.display());

        Ok(LevelManager { dir, levels })
    }

    pub fn levels(&self) -> &[LevelRecord] {
        &self.levels
    }

    pub fn level(&self, index: usize) -> Option<&LevelRecord> {
        self.levels.get(index)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Unlock the level after `current_id` and rewrite its file.
    ///
    /// Returns the id of the newly unlocked level, or `None` when
    /// `current_id` was the last level.
    pub fn unlock_next_level(&mut self, current_id: u32) -> Result<Option<u32>, GameError> {
        let next = current_id as usize + 1;
        if next >= self.levels.len() {
            return Ok(None);
        }

        let record = &mut self.levels[next];
        record.unlocked = true;
        let path = self.dir.join(record.file_name());
        write_json(&path, record)?;
        debug!("unlocked level {} ({})", record.id, path.display());
        Ok(Some(record.id))
    }
}
