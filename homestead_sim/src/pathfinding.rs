// Best-first path search over the block grid.
//
// A*-family search parameterized by a `PathJob`: the job supplies the
// heuristic, the goal predicate, and a result score used to pick the
// best-effort node when the search is cut off. Nodes live in a flat arena
// (`Vec<PathNode>`) with parents stored as indices, so the whole search tree
// is reclaimed wholesale when the call returns — no parent pointers, no
// cycles, no shared state between searches.
//
// The frontier is a `BinaryHeap` min-heap via reversed ordering (same
// pattern as the protocol/event queues elsewhere in the project), keyed by
// `cost_so_far + heuristic` with `total_cmp` for floats. A best-known-cost
// map keyed by `BlockPos` guards against re-expanding cells that a cheaper
// path already closed.
//
// Termination: goal predicate hit → `Complete` with the reconstructed path;
// range bound or expansion budget exhausted → `Partial` path to the
// best-scored visited node; frontier drained → `Failed`. The caller decides
// whether to retry.
//
// See also: `path_jobs.rs` for the concrete job variants, `world.rs` for
// the walkability rules that generate neighbors.
//
// **Critical constraint: determinism.** A search is a pure function of grid
// state, start, and job parameters. Float ordering uses `total_cmp`; ties
// break on arena index.

use crate::types::BlockPos;
use crate::world::BlockGrid;
use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Cost of a lateral step.
pub const LATERAL_COST: f32 = 1.0;
/// Cost of a diagonal step (slightly more than sqrt(2) to prefer straight
/// runs on equal-length routes).
pub const DIAGONAL_COST: f32 = 1.415;

/// A search specialization: heuristic, goal test, and partial-result scoring.
pub trait PathJob {
    /// Estimated remaining cost from `pos` to the goal. Variants fold their
    /// tie-breaker constant in here.
    fn heuristic(&self, pos: BlockPos) -> f32;

    /// Goal predicate. `parent` is the position the search stepped from,
    /// `None` for the start node. Jobs that need a movement direction (the
    /// resource finder) reject parentless nodes.
    fn is_at_destination(&mut self, grid: &BlockGrid, pos: BlockPos, parent: Option<BlockPos>)
    -> bool;

    /// Desirability of `pos` as a best-effort result when the search is cut
    /// off before reaching a goal. Higher is better.
    fn node_result_score(&self, pos: BlockPos) -> f32;
}

/// Outcome classification of a search.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PathStatus {
    /// The goal predicate was satisfied; the path ends on a goal cell.
    Complete,
    /// Range or expansion budget ran out; the path ends on the best-scored
    /// visited cell.
    Partial,
    /// The frontier drained without reaching a goal; no useful path.
    Failed,
}

/// Result of one search call: waypoints from start to destination.
#[derive(Clone, Debug)]
pub struct PathResult {
    pub status: PathStatus,
    pub points: Vec<BlockPos>,
}

impl PathResult {
    pub fn is_complete(&self) -> bool {
        self.status == PathStatus::Complete
    }
}

/// A node in the per-call search arena.
struct PathNode {
    pos: BlockPos,
    /// Cost from the start along the cheapest known route.
    cost: f32,
    /// Arena index of the predecessor; `None` for the start node.
    parent: Option<u32>,
}

/// Frontier entry (min-heap via reversed ordering).
struct OpenEntry {
    node: u32,
    f_score: f32,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f_score.total_cmp(&other.f_score) == Ordering::Equal && self.node == other.node
    }
}

impl Eq for OpenEntry {}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reversed for min-heap: smallest f_score is "greatest".
        other
            .f_score
            .total_cmp(&self.f_score)
            .then_with(|| other.node.cmp(&self.node))
    }
}

/// Neighbor offsets: 4 lateral then 4 diagonal (dx, dz, step cost).
const NEIGHBOR_OFFSETS: [(i32, i32, f32); 8] = [
    (1, 0, LATERAL_COST),
    (-1, 0, LATERAL_COST),
    (0, 1, LATERAL_COST),
    (0, -1, LATERAL_COST),
    (1, 1, DIAGONAL_COST),
    (1, -1, DIAGONAL_COST),
    (-1, 1, DIAGONAL_COST),
    (-1, -1, DIAGONAL_COST),
];

/// Run a best-first search from `start`.
///
/// `range` bounds the exploration cost of any returned path; `max_expansions`
/// bounds worst-case tick latency regardless of range. The engine keeps no
/// state between calls.
pub fn search(
    grid: &BlockGrid,
    start: BlockPos,
    range: u32,
    max_expansions: u32,
    job: &mut dyn PathJob,
) -> PathResult {
    if job.is_at_destination(grid, start, None) {
        return PathResult {
            status: PathStatus::Complete,
            points: vec![start],
        };
    }

    let mut nodes: Vec<PathNode> = vec![PathNode {
        pos: start,
        cost: 0.0,
        parent: None,
    }];
    let mut best_cost: FxHashMap<BlockPos, f32> = FxHashMap::default();
    best_cost.insert(start, 0.0);

    let mut open = BinaryHeap::new();
    open.push(OpenEntry {
        node: 0,
        f_score: job.heuristic(start),
    });

    // Best-effort fallback node, preferred by result score then heuristic.
    let mut best_idx = 0usize;
    let mut best_score = job.node_result_score(start);
    let mut best_h = job.heuristic(start);

    let mut cut_off = false;
    let mut expansions = 0u32;

    while let Some(entry) = open.pop() {
        let idx = entry.node as usize;
        let pos = nodes[idx].pos;
        let cost = nodes[idx].cost;

        // A cheaper route to this cell was already closed.
        if best_cost.get(&pos).is_some_and(|&c| cost > c) {
            continue;
        }

        let parent_pos = nodes[idx].parent.map(|p| nodes[p as usize].pos);
        if job.is_at_destination(grid, pos, parent_pos) {
            return PathResult {
                status: PathStatus::Complete,
                points: reconstruct(&nodes, idx),
            };
        }

        let score = job.node_result_score(pos);
        let h = job.heuristic(pos);
        if score > best_score || (score == best_score && h < best_h) {
            best_idx = idx;
            best_score = score;
            best_h = h;
        }

        expansions += 1;
        if expansions >= max_expansions {
            cut_off = true;
            break;
        }
        if cost >= range as f32 {
            // Past the range bound; keep the node as a fallback candidate
            // but do not expand beyond it.
            cut_off = true;
            continue;
        }

        for &(dx, dz, step_cost) in &NEIGHBOR_OFFSETS {
            let npos = pos.offset(dx, 0, dz);
            if !grid.is_walkable(npos) {
                continue;
            }
            // No cutting corners: a diagonal move needs both lateral cells open.
            if dx != 0
                && dz != 0
                && !(grid.is_walkable(pos.offset(dx, 0, 0)) && grid.is_walkable(pos.offset(0, 0, dz)))
            {
                continue;
            }

            let tentative = cost + step_cost;
            if best_cost.get(&npos).is_none_or(|&c| tentative < c) {
                best_cost.insert(npos, tentative);
                nodes.push(PathNode {
                    pos: npos,
                    cost: tentative,
                    parent: Some(idx as u32),
                });
                open.push(OpenEntry {
                    node: (nodes.len() - 1) as u32,
                    f_score: tentative + job.heuristic(npos),
                });
            }
        }
    }

    if cut_off {
        PathResult {
            status: PathStatus::Partial,
            points: reconstruct(&nodes, best_idx),
        }
    } else {
        PathResult {
            status: PathStatus::Failed,
            points: Vec::new(),
        }
    }
}

/// Walk parent indices from `idx` back to the start, then reverse.
fn reconstruct(nodes: &[PathNode], idx: usize) -> Vec<BlockPos> {
    let mut points = Vec::new();
    let mut current = Some(idx as u32);
    while let Some(i) = current {
        let node = &nodes[i as usize];
        points.push(node.pos);
        current = node.parent;
    }
    points.reverse();
    points
}
