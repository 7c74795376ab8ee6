//! Tile content identifiers with a shadow copy of the authored layout.

use tower_defense_core::{MapSchema, TileCoord, WALKABLE_CID};
use tracing::warn;

/// Dense per-tile content identifiers stored in row-major order.
///
/// The original identifiers are kept alongside the live ones so a tile can
/// always be reverted to its authored terrain once a tower leaves it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TileMap {
    columns: u32,
    rows: u32,
    cids: Vec<u32>,
    original: Vec<u32>,
}

impl TileMap {
    /// Creates a map of the given size where every tile is walkable.
    #[must_use]
    pub fn blank(columns: u32, rows: u32) -> Self {
        let count = usize::try_from(columns)
            .ok()
            .zip(usize::try_from(rows).ok())
            .and_then(|(columns, rows)| columns.checked_mul(rows))
            .unwrap_or(0);
        let cids = vec![WALKABLE_CID; count];
        Self {
            columns,
            rows,
            original: cids.clone(),
            cids,
        }
    }

    /// Builds a map from an authored schema.
    ///
    /// Tiles lying outside the declared dimensions are skipped.
    #[must_use]
    pub fn from_schema(schema: &MapSchema) -> Self {
        let mut map = Self::blank(schema.columns, schema.rows);
        for tile in &schema.tiles {
            let coord = TileCoord::new(tile.column, tile.row);
            let Some(index) = map.index(coord) else {
                warn!(
                    map = %schema.name,
                    column = tile.column,
                    row = tile.row,
                    "ignoring tile outside the map"
                );
                continue;
            };
            map.cids[index] = tile.cid;
            map.original[index] = tile.cid;
        }
        map
    }

    /// Number of columns in the map.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of rows in the map.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Reports whether the tile lies inside the map.
    #[must_use]
    pub const fn contains(&self, tile: TileCoord) -> bool {
        tile.column() < self.columns && tile.row() < self.rows
    }

    /// Live content identifier of a tile.
    #[must_use]
    pub fn cid(&self, tile: TileCoord) -> Option<u32> {
        self.index(tile).map(|index| self.cids[index])
    }

    /// Content identifier the tile had when the map was loaded.
    #[must_use]
    pub fn original_cid(&self, tile: TileCoord) -> Option<u32> {
        self.index(tile).map(|index| self.original[index])
    }

    /// Writes a content identifier, returning the previous one.
    pub fn set_cid(&mut self, tile: TileCoord, cid: u32) -> Option<u32> {
        let index = self.index(tile)?;
        Some(std::mem::replace(&mut self.cids[index], cid))
    }

    /// Restores the authored content identifier of a tile.
    pub fn revert_to_original(&mut self, tile: TileCoord) {
        if let Some(index) = self.index(tile) {
            self.cids[index] = self.original[index];
        }
    }

    /// Reports whether monsters may walk across the tile.
    #[must_use]
    pub fn is_walkable(&self, tile: TileCoord) -> bool {
        self.cid(tile) == Some(WALKABLE_CID)
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        if !self.contains(tile) {
            return None;
        }
        let width = usize::try_from(self.columns).ok()?;
        let column = usize::try_from(tile.column()).ok()?;
        let row = usize::try_from(tile.row()).ok()?;
        row.checked_mul(width)?.checked_add(column)
    }
}
