//! Pairwise destination distances derived from the BFS maps.

use crate::error::PlanError;
use crate::grid::DistanceIndex;
use crate::traits::{Cell, Field, Item};

/// Destination-to-destination and destination-to-depot grid distances.
///
/// Pure indexing into the BFS maps, kept so route scoring never re-reads a
/// map. `between` is symmetric by construction: both directions read a
/// single-source BFS of the same undirected grid.
#[derive(Debug, Clone)]
pub struct DistanceTable {
    between: Vec<Vec<i32>>,
    depot: Vec<i32>,
}

impl DistanceTable {
    /// Derives the table for a stage.
    ///
    /// This is also the stage's fail-fast reachability check: any `-1` left
    /// at a needed cell means the depot and the destinations do not share a
    /// connected component, and planning stops with
    /// [`PlanError::Unreachable`] before any route is committed.
    pub fn build<F: Field, I: Item>(
        field: &F,
        items: &[I],
        index: &DistanceIndex,
    ) -> Result<Self, PlanError> {
        let n = items.len();
        let depot_cell = field.depot();
        let mut between = vec![vec![0; n]; n];
        let mut depot = vec![0; n];
        for i in 0..n {
            let dest = items[i].destination();
            depot[i] = reached(index.item_map(i).get(depot_cell), depot_cell)?;
            for j in 0..n {
                between[i][j] = reached(index.item_map(j).get(dest), dest)?;
            }
        }
        Ok(Self { between, depot })
    }

    /// Grid distance between item `i`'s and item `j`'s destinations.
    #[inline]
    pub fn between(&self, i: usize, j: usize) -> i32 {
        self.between[i][j]
    }

    /// Grid distance between the depot and item `i`'s destination.
    #[inline]
    pub fn to_depot(&self, i: usize) -> i32 {
        self.depot[i]
    }

    pub fn len(&self) -> usize {
        self.depot.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depot.is_empty()
    }
}

#[cfg(test)]
impl DistanceTable {
    /// Builds a table directly from raw distances, for unit tests that do
    /// not want to set up a grid.
    pub(crate) fn from_parts(between: Vec<Vec<i32>>, depot: Vec<i32>) -> Self {
        Self { between, depot }
    }
}

fn reached(dist: i32, cell: Cell) -> Result<i32, PlanError> {
    if dist < 0 {
        Err(PlanError::Unreachable { cell })
    } else {
        Ok(dist)
    }
}
