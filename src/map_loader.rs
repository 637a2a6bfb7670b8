//! Map files → `MapData`.
//!
//! A map is a JSON document with a character grid; `#` marks a platform
//! tile. The grid is stretched to the requested play-field size. Loaded maps
//! are cached per loader by (path, width, height), so restarting a level on
//! the same terminal does not touch the disk again.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::debug;
use serde::Deserialize;

use crate::entities::Rect;
use crate::error::GameError;
use crate::levels::read_json;
use crate::map::MapData;

pub const PLATFORM_TILE: char = '#';

#[derive(Clone, Debug, Deserialize)]
pub struct MapFile {
    pub layout: Vec<String>,
}

/// Cache key. Sizes are whole pixels so the key stays hashable.
type MapKey = (PathBuf, u32, u32);

#[derive(Debug, Default)]
pub struct MapLoader {
    cache: HashMap<MapKey, Rc<MapData>>,
}

impl MapLoader {
    pub fn new() -> Self {
        MapLoader::default()
    }

    pub fn load(&mut self, path: &Path, width: u32, height: u32) -> Result<Rc<MapData>, GameError> {
        let key = (path.to_path_buf(), width, height);
        if let Some(map) = self.cache.get(&key) {
            return Ok(Rc::clone(map));
        }

        let file: MapFile = read_json(path)?;
        let map = Rc::new(build_map(path, &file, width as f32, height as f32)?);
        debug!(
            "map {} loaded at {}x{}: {} platform tiles",
            path.display(),
            width,
            height,
            map.tile_count()
        );
        self.cache.insert(key, Rc::clone(&map));
        Ok(map)
    }
}

/// Scale the tile grid to `width` x `height` and bucket platform tiles by column.
pub fn build_map(path: &Path, file: &MapFile, width: f32, height: f32) -> Result<MapData, GameError> {
    let rows = file.layout.len();
    let cols = file.layout.iter().map(|r| r.chars().count()).max().unwrap_or(0);
    if rows == 0 || cols == 0 {
        return Err(GameError::InvalidMap {
            path: path.to_path_buf(),
            reason: "empty layout".to_string(),
        });
    }

    let scale_x = width / cols as f32;
    let scale_y = height / rows as f32;

    let mut map = MapData {
        rows,
        cols,
        width,
        height,
        platforms: Default::default(),
    };

    // Row-major walk keeps every column's tiles in top-to-bottom order.
    for (row, line) in file.layout.iter().enumerate() {
        for (col, ch) in line.chars().enumerate() {
            if ch != PLATFORM_TILE {
                continue;
            }
            let rect = Rect::new(
                (col as f32 * scale_x).floor(),
                (row as f32 * scale_y).floor(),
                scale_x.floor(),
                scale_y.floor(),
            );
            map.platforms.entry(col).or_default().push(rect);
        }
    }

    Ok(map)
}
