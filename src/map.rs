//! Level geometry: platform rectangles bucketed by map column.

use std::collections::BTreeMap;

use crate::entities::Rect;

/// Immutable after load, shared by every entity in a level.
#[derive(Clone, Debug, PartialEq)]
pub struct MapData {
    pub rows: usize,
    pub cols: usize,
    pub width: f32,
    pub height: f32,
    /// Column index → tiles in that column, top to bottom.
    pub platforms: BTreeMap<usize, Vec<Rect>>,
}

impl MapData {
    /// Column bucket for a horizontal position. Truncates toward zero, so
    /// positions just left of the map still land in column 0.
    pub fn column_of(&self, x: f32) -> Option<usize> {
        let col = ((x / self.width) * self.cols as f32) as i64;
        usize::try_from(col).ok()
    }

    /// Tiles in the column containing `x`, top to bottom. Empty off the map.
    pub fn tiles_at(&self, x: f32) -> &[Rect] {
        self.column_of(x)
            .and_then(|col| self.platforms.get(&col))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn center_x(&self) -> f32 {
        (self.width / 2.0).floor()
    }

    pub fn tile_count(&self) -> usize {
        self.platforms.values().map(Vec::len).sum()
    }
}
