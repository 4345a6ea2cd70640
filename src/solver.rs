//! Stage planning: period partitioning and plan assembly.

use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::PlanError;
use crate::grid::DistanceIndex;
use crate::itemset::ItemSet;
use crate::matrix::DistanceTable;
use crate::path::build_actions;
use crate::route::RouteOptimizer;
use crate::traits::{Field, Item, Move, PERIOD_COUNT};

#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Maximum total item weight the truck may carry in one period, as
    /// declared by the harness.
    pub truck_capacity: i32,
    /// Weight of the empty truck, carried on every leg.
    pub truck_base_weight: i32,
    /// Upper bound on free-item clusters entering the assignment search.
    /// Each cluster can land in any of the four periods, so the search
    /// space is 4^max_clusters.
    pub max_clusters: usize,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            truck_capacity: 15,
            truck_base_weight: 3,
            max_clusters: 8,
        }
    }
}

/// The finished plan for one stage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StagePlan {
    /// Item ids per period, in visiting order.
    pub period_items: [Vec<usize>; PERIOD_COUNT],
    /// Primitive move queue per period, ending back at the depot.
    pub period_actions: [Vec<Move>; PERIOD_COUNT],
    /// Load-weighted travel cost summed over the four period routes.
    pub total_cost: i32,
    /// False when no assignment satisfied the capacity limit and the
    /// least-overweight fallback was used.
    pub capacity_respected: bool,
}

/// Plans one stage in a single synchronous pass: distance maps, period
/// partition, visiting orders, and per-period action queues.
pub fn plan_stage<F: Field, I: Item>(
    field: &F,
    items: &[I],
    options: &SolveOptions,
) -> Result<StagePlan, PlanError> {
    validate_periods(items)?;

    let index = DistanceIndex::build(field, items);
    let table = DistanceTable::build(field, items, &index)?;
    debug!(items = items.len(), "distance maps and table built");

    let weights: Vec<i32> = items.iter().map(Item::weight).collect();
    let mut optimizer = RouteOptimizer::new(&table, &weights, options.truck_base_weight);

    let partition = partition_periods(items, &table, &weights, &mut optimizer, options);

    let mut period_items: [Vec<usize>; PERIOD_COUNT] = Default::default();
    let mut total_cost = 0;
    for (period, set) in partition.sets.iter().enumerate() {
        let (order, cost) = optimizer.best_order(set);
        total_cost += cost;
        period_items[period] = order;
    }

    let period_actions = build_actions(field.depot(), &index, &period_items)?;
    debug!(
        total_cost,
        capacity_respected = partition.feasible,
        "stage plan ready"
    );

    Ok(StagePlan {
        period_items,
        period_actions,
        total_cost,
        capacity_respected: partition.feasible,
    })
}

struct Partition {
    sets: [ItemSet; PERIOD_COUNT],
    feasible: bool,
}

/// Splits the stage's items over the four periods.
///
/// Pinned items keep their period. Free items are clustered by proximity to
/// bound the search, then every cluster-to-period assignment is scored with
/// the route optimizer and the cheapest one that fits the truck capacity in
/// every period wins.
fn partition_periods<I: Item>(
    items: &[I],
    table: &DistanceTable,
    weights: &[i32],
    optimizer: &mut RouteOptimizer<'_>,
    options: &SolveOptions,
) -> Partition {
    let mut fixed_sets: [ItemSet; PERIOD_COUNT] = Default::default();
    let mut fixed_weights = [0i32; PERIOD_COUNT];
    let mut free = Vec::new();
    for (i, item) in items.iter().enumerate() {
        match item.fixed_period() {
            Some(period) => {
                fixed_sets[period].insert(i);
                fixed_weights[period] += weights[i];
            }
            None => free.push(i),
        }
    }

    let clusters = cluster_free_items(&free, table, options.max_clusters);
    let cluster_weights: Vec<i32> = clusters
        .iter()
        .map(|c| c.iter().map(|i| weights[i]).sum())
        .collect();
    debug!(
        free = free.len(),
        clusters = clusters.len(),
        "free items clustered"
    );

    let combos = 4usize.pow(clusters.len() as u32);
    let mut best: Option<(i32, usize)> = None; // (cost, code)
    let mut fallback: Option<(i32, i32, usize)> = None; // (overweight, cost, code)

    for code in 0..combos {
        let mut period_weights = fixed_weights;
        for (j, &weight) in cluster_weights.iter().enumerate() {
            period_weights[assigned_period(code, j)] += weight;
        }
        let overweight: i32 = period_weights
            .iter()
            .map(|&w| (w - options.truck_capacity).max(0))
            .sum();

        if overweight == 0 {
            let cost = assignment_cost(code, &clusters, &fixed_sets, optimizer);
            if best.is_none_or(|(c, _)| cost < c) {
                best = Some((cost, code));
            }
        } else if best.is_none() {
            // Tracked only while no feasible assignment has shown up:
            // least total overweight, ties broken by route cost.
            let cost = assignment_cost(code, &clusters, &fixed_sets, optimizer);
            let better = fallback
                .is_none_or(|(ow, c, _)| overweight < ow || (overweight == ow && cost < c));
            if better {
                fallback = Some((overweight, cost, code));
            }
        }
    }

    let (code, feasible) = if let Some((cost, code)) = best {
        debug!(cost, combos, "assignment search done");
        (code, true)
    } else if let Some((overweight, cost, code)) = fallback {
        warn!(
            overweight,
            cost, "no assignment fits the truck capacity; using least-overweight plan"
        );
        (code, false)
    } else {
        // combos >= 1 and every code lands in one branch above.
        unreachable!("assignment scan examined no candidates")
    };

    Partition {
        sets: materialize(code, &clusters, &fixed_sets),
        feasible,
    }
}

/// Period the cluster at position `j` is assigned under `code`, reading the
/// code as a base-4 number with one digit per cluster.
#[inline]
fn assigned_period(code: usize, j: usize) -> usize {
    (code >> (2 * j)) & 3
}

fn materialize(
    code: usize,
    clusters: &[ItemSet],
    fixed_sets: &[ItemSet; PERIOD_COUNT],
) -> [ItemSet; PERIOD_COUNT] {
    let mut sets = fixed_sets.clone();
    for (j, cluster) in clusters.iter().enumerate() {
        sets[assigned_period(code, j)].union_with(cluster);
    }
    sets
}

fn assignment_cost(
    code: usize,
    clusters: &[ItemSet],
    fixed_sets: &[ItemSet; PERIOD_COUNT],
    optimizer: &mut RouteOptimizer<'_>,
) -> i32 {
    materialize(code, clusters, fixed_sets)
        .iter()
        .map(|set| optimizer.best_cost(set))
        .sum()
}

/// Groups free items by proximity: repeatedly merges the pair of groups
/// containing the two closest items (single linkage over pairwise grid
/// distances) until at most `max_clusters` groups remain. Items that end up
/// in the same cluster are always assigned to the same period.
fn cluster_free_items(free: &[usize], table: &DistanceTable, max_clusters: usize) -> Vec<ItemSet> {
    let n = free.len();
    let mut dsu = DisjointSet::new(n);

    let mut pairs = BinaryHeap::new();
    for a in 0..n {
        for b in (a + 1)..n {
            pairs.push(Reverse((table.between(free[a], free[b]), a, b)));
        }
    }
    while dsu.groups() > max_clusters {
        let Some(Reverse((_, a, b))) = pairs.pop() else {
            break;
        };
        dsu.union(a, b);
    }

    // Clusters in first-seen member order.
    let mut root_to_cluster: HashMap<usize, usize> = HashMap::new();
    let mut clusters: Vec<ItemSet> = Vec::new();
    for i in 0..n {
        let root = dsu.find(i);
        let next = clusters.len();
        let idx = *root_to_cluster.entry(root).or_insert(next);
        if idx == clusters.len() {
            clusters.push(ItemSet::new());
        }
        clusters[idx].insert(free[i]);
    }
    clusters
}

fn validate_periods<I: Item>(items: &[I]) -> Result<(), PlanError> {
    for (i, item) in items.iter().enumerate() {
        if let Some(period) = item.fixed_period()
            && period >= PERIOD_COUNT
        {
            return Err(PlanError::InvalidPeriod { item: i, period });
        }
    }
    Ok(())
}

/// Disjoint-set forest with path compression and union by size.
struct DisjointSet {
    parent: Vec<usize>,
    size: Vec<usize>,
    groups: usize,
}

impl DisjointSet {
    fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
            groups: n,
        }
    }

    fn find(&mut self, x: usize) -> usize {
        if self.parent[x] != x {
            let root = self.find(self.parent[x]);
            self.parent[x] = root;
        }
        self.parent[x]
    }

    fn union(&mut self, a: usize, b: usize) -> bool {
        let (ra, rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        let (big, small) = if self.size[ra] >= self.size[rb] {
            (ra, rb)
        } else {
            (rb, ra)
        };
        self.parent[small] = big;
        self.size[big] += self.size[small];
        self.groups -= 1;
        true
    }

    fn groups(&self) -> usize {
        self.groups
    }
}
