//! BFS distance maps over the stage grid.

use std::collections::VecDeque;

use crate::traits::{Cell, Field, Item, Move};

/// Shortest hop counts from a single source cell.
///
/// Stored flat, indexed `y * width + x`. `-1` marks cells the search never
/// reached: walls, and cells outside the source's connected component.
#[derive(Debug, Clone)]
pub struct DistanceMap {
    width: usize,
    height: usize,
    cells: Vec<i32>,
}

impl DistanceMap {
    /// Runs a breadth-first search from `source` over 4-connected non-wall
    /// cells. Frontier expansion guarantees every reached cell holds its true
    /// shortest hop count.
    pub fn from_source<F: Field>(field: &F, source: Cell) -> Self {
        let (width, height) = (field.width(), field.height());
        let mut map = Self {
            width,
            height,
            cells: vec![-1; width * height],
        };
        map.set(source, 0);
        let mut frontier = VecDeque::new();
        frontier.push_back(source);
        while let Some(cell) = frontier.pop_front() {
            let dist = map.get(cell);
            for step in Move::ALL {
                let Some(next) = step.apply(cell, width, height) else {
                    continue;
                };
                if !field.is_wall(next.x, next.y) && map.get(next) == -1 {
                    map.set(next, dist + 1);
                    frontier.push_back(next);
                }
            }
        }
        map
    }

    #[inline]
    pub fn get(&self, cell: Cell) -> i32 {
        self.cells[cell.y * self.width + cell.x]
    }

    #[inline]
    fn set(&mut self, cell: Cell, value: i32) {
        self.cells[cell.y * self.width + cell.x] = value;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }
}

/// One distance map per item destination, plus one for the depot.
#[derive(Debug, Clone)]
pub struct DistanceIndex {
    item_maps: Vec<DistanceMap>,
    depot_map: DistanceMap,
}

impl DistanceIndex {
    /// Builds every map for a stage. O(items x cells).
    pub fn build<F: Field, I: Item>(field: &F, items: &[I]) -> Self {
        let item_maps = items
            .iter()
            .map(|item| DistanceMap::from_source(field, item.destination()))
            .collect();
        let depot_map = DistanceMap::from_source(field, field.depot());
        Self {
            item_maps,
            depot_map,
        }
    }

    /// Distance map sourced at item `item`'s destination.
    pub fn item_map(&self, item: usize) -> &DistanceMap {
        &self.item_maps[item]
    }

    /// Distance map sourced at the depot.
    pub fn depot_map(&self) -> &DistanceMap {
        &self.depot_map
    }

    pub fn item_count(&self) -> usize {
        self.item_maps.len()
    }
}
