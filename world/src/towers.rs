//! Authoritative tower state management utilities.

use std::collections::BTreeMap;

use tower_defense_core::{PlacedTower, TileCoord, TowerId};
use tower_defense_system_tower_behaviors::Tower;

/// Registry that stores towers and the grid of handles pointing at them.
///
/// The grid holds at most one handle per tile; the towers themselves live in
/// the id-keyed map so removal never leaves a dangling reference behind.
#[derive(Debug)]
pub(crate) struct TowerRegistry {
    columns: u32,
    entries: BTreeMap<TowerId, Tower>,
    grid: Vec<Option<TowerId>>,
    next_tower_id: TowerId,
}

impl TowerRegistry {
    /// Creates an empty registry sized for the map with a reset id counter.
    pub(crate) fn new(columns: u32, rows: u32) -> Self {
        let count = usize::try_from(columns)
            .ok()
            .zip(usize::try_from(rows).ok())
            .and_then(|(columns, rows)| columns.checked_mul(rows))
            .unwrap_or(0);
        Self {
            columns,
            entries: BTreeMap::new(),
            grid: vec![None; count],
            next_tower_id: TowerId::new(0),
        }
    }

    /// Handle stored in the tile, if any.
    pub(crate) fn id_at(&self, tile: TileCoord) -> Option<TowerId> {
        self.index(tile).and_then(|index| self.grid[index])
    }

    /// Tower occupying the tile, if any.
    pub(crate) fn at(&self, tile: TileCoord) -> Option<&Tower> {
        self.id_at(tile).and_then(|id| self.entries.get(&id))
    }

    /// Tower with the given handle.
    pub(crate) fn get_mut(&mut self, id: TowerId) -> Option<&mut Tower> {
        self.entries.get_mut(&id)
    }

    /// Stores a tower in its tile. The tile must be vacant and inside the map.
    pub(crate) fn insert(&mut self, tower: Tower) -> Option<TowerId> {
        let index = self.index(tower.tile())?;
        if self.grid[index].is_some() {
            return None;
        }

        let id = self.next_tower_id;
        self.next_tower_id = TowerId::new(id.get().saturating_add(1));
        self.grid[index] = Some(id);
        let _ = self.entries.insert(id, tower);
        Some(id)
    }

    /// Removes the tower occupying the tile.
    pub(crate) fn remove_at(&mut self, tile: TileCoord) -> Option<(TowerId, Tower)> {
        let index = self.index(tile)?;
        let id = self.grid[index].take()?;
        self.entries.remove(&id).map(|tower| (id, tower))
    }

    /// Handles in row-major tile order.
    pub(crate) fn row_major_ids(&self) -> Vec<TowerId> {
        self.grid.iter().flatten().copied().collect()
    }

    /// Towers paired with their handles in row-major tile order.
    pub(crate) fn iter_row_major(&self) -> impl Iterator<Item = (TowerId, &Tower)> {
        self.grid
            .iter()
            .flatten()
            .filter_map(|id| self.entries.get(id).map(|tower| (*id, tower)))
    }

    /// Records every tower by tile and schema name in row-major order.
    pub(crate) fn placed(&self) -> Vec<PlacedTower> {
        self.iter_row_major()
            .map(|(_, tower)| PlacedTower {
                tile: tower.tile(),
                name: tower.name().to_owned(),
            })
            .collect()
    }

    /// Number of towers stored.
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    fn index(&self, tile: TileCoord) -> Option<usize> {
        let width = usize::try_from(self.columns).ok()?;
        if tile.column() >= self.columns {
            return None;
        }
        let column = usize::try_from(tile.column()).ok()?;
        let row = usize::try_from(tile.row()).ok()?;
        let index = row.checked_mul(width)?.checked_add(column)?;
        (index < self.grid.len()).then_some(index)
    }
}
