//! Runtime configuration for the front-end: where assets live, frame pacing
//! and how simulation pixels map onto terminal cells.

use std::path::PathBuf;
use std::time::Duration;

/// Overrides the asset directory.
pub const ASSETS_ENV: &str = "PLATFORM_SHOOTER_ASSETS";

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub assets_dir: PathBuf,
    /// One simulation step per rendered frame.
    pub frame: Duration,
    /// Simulation pixels per terminal column.
    pub cell_width: f32,
    /// Simulation pixels per terminal row.
    pub cell_height: f32,
    pub log_file: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        GameConfig {
            assets_dir: PathBuf::from("assets"),
            frame: Duration::from_millis(16), // ≈60 FPS
            cell_width: 16.0,
            cell_height: 32.0,
            log_file: PathBuf::from("platform_shooter.log"),
        }
    }
}

impl GameConfig {
    pub fn from_env() -> Self {
        let mut config = GameConfig::default();
        if let Ok(dir) = std::env::var(ASSETS_ENV) {
            if !dir.trim().is_empty() {
                config.assets_dir = PathBuf::from(dir);
            }
        }
        config
    }

    pub fn levels_dir(&self) -> PathBuf {
        self.assets_dir.join("levels")
    }

    pub fn maps_dir(&self) -> PathBuf {
        self.assets_dir.join("maps")
    }

    /// Play-field size in simulation pixels for a terminal of `cols` x `rows` cells.
    pub fn field_size(&self, cols: u16, rows: u16) -> (f32, f32) {
        (cols as f32 * self.cell_width, rows as f32 * self.cell_height)
    }
}
