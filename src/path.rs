//! Primitive move reconstruction along shortest paths.

use crate::error::PlanError;
use crate::grid::{DistanceIndex, DistanceMap};
use crate::traits::{Cell, Move, PERIOD_COUNT};

/// Builds the four per-period action queues for planned visiting orders.
///
/// Each period starts at the depot, walks one leg per item in route order,
/// then walks the return leg to the depot.
pub fn build_actions(
    depot: Cell,
    index: &DistanceIndex,
    period_items: &[Vec<usize>; PERIOD_COUNT],
) -> Result<[Vec<Move>; PERIOD_COUNT], PlanError> {
    let mut queues: [Vec<Move>; PERIOD_COUNT] = Default::default();
    for (period, route) in period_items.iter().enumerate() {
        let mut pos = depot;
        for &item in route {
            trace_leg(index.item_map(item), &mut pos, &mut queues[period])?;
        }
        trace_leg(index.depot_map(), &mut pos, &mut queues[period])?;
    }
    Ok(queues)
}

/// Walks one leg by descending `map` from `pos` to the map's source cell,
/// appending one move per step.
///
/// At every cell the four neighbors are scanned in `Move::ALL` order and the
/// first one exactly one hop closer is taken, so the reconstructed path is
/// some shortest path, and always the same one. Walls can never be entered:
/// their map value is -1, never `dist - 1`.
pub(crate) fn trace_leg(
    map: &DistanceMap,
    pos: &mut Cell,
    out: &mut Vec<Move>,
) -> Result<(), PlanError> {
    let mut dist = map.get(*pos);
    if dist < 0 {
        return Err(PlanError::Unreachable { cell: *pos });
    }
    while dist != 0 {
        let mut stepped = false;
        for step in Move::ALL {
            let Some(next) = step.apply(*pos, map.width(), map.height()) else {
                continue;
            };
            if map.get(next) == dist - 1 {
                *pos = next;
                dist -= 1;
                out.push(step);
                stepped = true;
                break;
            }
        }
        if !stepped {
            return Err(PlanError::Unreachable { cell: *pos });
        }
    }
    Ok(())
}
