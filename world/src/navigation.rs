//! Deterministic shortest-path search over the tile map.

use std::collections::VecDeque;

use tower_defense_core::TileCoord;

use crate::map::TileMap;

/// Dense distance-to-exit field built by a reverse breadth-first search.
///
/// Distances default to `u32::MAX` for blocked or unreachable tiles so
/// callers can distinguish walls from traversable tiles.
#[derive(Clone, Debug, Default)]
pub(crate) struct NavigationField {
    width: u32,
    height: u32,
    distances: Vec<u32>,
}

impl NavigationField {
    /// Rebuilds the distances towards `exit`.
    pub(crate) fn rebuild_with<F>(
        &mut self,
        width: u32,
        height: u32,
        exit: TileCoord,
        mut is_blocked: F,
    ) where
        F: FnMut(TileCoord) -> bool,
    {
        let width_usize = usize::try_from(width).unwrap_or(0);
        let height_usize = usize::try_from(height).unwrap_or(0);
        let cell_count = width_usize.checked_mul(height_usize).unwrap_or(0);

        self.width = width;
        self.height = height;
        if cell_count == 0 {
            self.distances.clear();
            return;
        }

        if self.distances.len() != cell_count {
            self.distances = vec![u32::MAX; cell_count];
        } else {
            self.distances.fill(u32::MAX);
        }

        if exit.column() >= width || exit.row() >= height || is_blocked(exit) {
            return;
        }

        let mut queue = VecDeque::new();
        if let Some(exit_index) = index(width_usize, exit) {
            self.distances[exit_index] = 0;
            queue.push_back(exit);
        }

        while let Some(cell) = queue.pop_front() {
            let Some(current_index) = index(width_usize, cell) else {
                continue;
            };
            let next_distance = self.distances[current_index].saturating_add(1);

            for neighbor in neighbors(cell, width, height) {
                if is_blocked(neighbor) {
                    continue;
                }

                let Some(neighbor_index) = index(width_usize, neighbor) else {
                    continue;
                };

                if self.distances[neighbor_index] <= next_distance {
                    continue;
                }

                self.distances[neighbor_index] = next_distance;
                queue.push_back(neighbor);
            }
        }
    }

    /// Distance captured for the provided cell, if it lies within the field.
    #[must_use]
    pub(crate) fn distance(&self, cell: TileCoord) -> Option<u32> {
        if cell.column() >= self.width || cell.row() >= self.height {
            return None;
        }

        let width = usize::try_from(self.width).ok()?;
        index(width, cell).and_then(|offset| self.distances.get(offset).copied())
    }

    /// Walks downhill from `start`, preferring North, East, South, West.
    ///
    /// The returned route excludes `start` and ends on the exit.
    fn descend(&self, start: TileCoord) -> Option<Vec<TileCoord>> {
        let mut remaining = self.distance(start).filter(|distance| *distance != u32::MAX)?;
        let mut route = Vec::with_capacity(usize::try_from(remaining).unwrap_or(0));
        let mut current = start;

        while remaining > 0 {
            let wanted = remaining - 1;
            current = neighbors(current, self.width, self.height)
                .find(|neighbor| self.distance(*neighbor) == Some(wanted))?;
            route.push(current);
            remaining = wanted;
        }

        Some(route)
    }
}

/// Shortest 4-connected route finder over walkable tiles.
///
/// Identical maps always produce identical routes: the distance field is
/// seeded at the exit and the descent scans neighbours in a fixed order.
#[derive(Clone, Debug, Default)]
pub struct Pathfinder {
    field: NavigationField,
}

impl Pathfinder {
    /// Creates a pathfinder with an empty scratch field.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the distance field towards `exit`.
    pub fn rebuild(&mut self, map: &TileMap, exit: TileCoord) {
        self.field
            .rebuild_with(map.columns(), map.rows(), exit, |tile| !map.is_walkable(tile));
    }

    /// Route from `start` to the exit of the last rebuild.
    ///
    /// Returns `None` when `start` is blocked, outside the map, or cut off.
    #[must_use]
    pub fn route(&self, start: TileCoord) -> Option<Vec<TileCoord>> {
        self.field.descend(start)
    }

    /// Rebuilds the field and returns the route from `from` to `to`.
    pub fn find_path(
        &mut self,
        map: &TileMap,
        from: TileCoord,
        to: TileCoord,
    ) -> Option<Vec<TileCoord>> {
        self.rebuild(map, to);
        self.route(from)
    }
}

fn neighbors(cell: TileCoord, width: u32, height: u32) -> impl Iterator<Item = TileCoord> {
    let mut candidates = [None; 4];
    let mut count = 0;

    if let Some(row) = cell.row().checked_sub(1) {
        candidates[count] = Some(TileCoord::new(cell.column(), row));
        count += 1;
    }

    if let Some(column) = cell.column().checked_add(1) {
        if column < width {
            candidates[count] = Some(TileCoord::new(column, cell.row()));
            count += 1;
        }
    }

    if let Some(row) = cell.row().checked_add(1) {
        if row < height {
            candidates[count] = Some(TileCoord::new(cell.column(), row));
            count += 1;
        }
    }

    if let Some(column) = cell.column().checked_sub(1) {
        candidates[count] = Some(TileCoord::new(column, cell.row()));
        count += 1;
    }

    candidates.into_iter().take(count).flatten()
}

fn index(width: usize, cell: TileCoord) -> Option<usize> {
    let column = usize::try_from(cell.column()).ok()?;
    let row = usize::try_from(cell.row()).ok()?;
    row.checked_mul(width)?.checked_add(column)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_defense_core::TOWER_CID;

    #[test]
    fn rebuild_with_sets_exit_cells_to_zero() {
        let mut field = NavigationField::default();
        field.rebuild_with(3, 4, TileCoord::new(1, 2), |_| false);

        assert_eq!(field.distance(TileCoord::new(1, 2)), Some(0));
        assert_eq!(field.distance(TileCoord::new(1, 1)), Some(1));
        assert_eq!(field.distance(TileCoord::new(1, 0)), Some(2));
        assert_eq!(field.distance(TileCoord::new(0, 0)), Some(3));
    }

    #[test]
    fn rebuild_with_respects_walls() {
        let mut field = NavigationField::default();
        let wall = TileCoord::new(1, 1);
        field.rebuild_with(3, 4, TileCoord::new(1, 2), |cell| cell == wall);

        assert_eq!(field.distance(wall), Some(u32::MAX));
        assert_eq!(field.distance(TileCoord::new(1, 0)), Some(4));
        assert_eq!(field.distance(TileCoord::new(0, 1)), Some(2));
    }

    #[test]
    fn route_excludes_start_and_ends_on_exit() {
        let map = TileMap::blank(4, 1);
        let mut pathfinder = Pathfinder::new();
        let route = pathfinder.find_path(&map, TileCoord::new(0, 0), TileCoord::new(3, 0));

        assert_eq!(
            route,
            Some(vec![
                TileCoord::new(1, 0),
                TileCoord::new(2, 0),
                TileCoord::new(3, 0),
            ])
        );
    }

    #[test]
    fn ties_prefer_north_then_east() {
        let map = TileMap::blank(3, 3);
        let mut pathfinder = Pathfinder::new();
        let route = pathfinder.find_path(&map, TileCoord::new(0, 2), TileCoord::new(2, 0));

        assert_eq!(
            route,
            Some(vec![
                TileCoord::new(0, 1),
                TileCoord::new(0, 0),
                TileCoord::new(1, 0),
                TileCoord::new(2, 0),
            ])
        );
    }

    #[test]
    fn blocked_endpoints_have_no_route() {
        let mut map = TileMap::blank(3, 1);
        let _ = map.set_cid(TileCoord::new(1, 0), TOWER_CID);
        let mut pathfinder = Pathfinder::new();

        assert!(pathfinder
            .find_path(&map, TileCoord::new(0, 0), TileCoord::new(2, 0))
            .is_none());
        assert!(pathfinder
            .find_path(&map, TileCoord::new(1, 0), TileCoord::new(2, 0))
            .is_none());
        assert_eq!(
            pathfinder.find_path(&map, TileCoord::new(2, 0), TileCoord::new(2, 0)),
            Some(Vec::new())
        );
    }
}
