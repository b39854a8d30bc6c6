// Concrete path job variants for the search engine.
//
// Three specializations of `PathJob`:
//   - `MoveToJob`: walk to a specific cell (or right next to it).
//   - `MoveAwayJob`: put distance between the worker and a point, steering
//     toward a projected escape point so the search does not wander.
//   - `FindResourceJob`: wander outward until a block of the wanted kind is
//     found below an adjacent cell, skipping spots too close to ones the
//     worker already knows.
//
// Each variant folds its own tie-breaker constant into the heuristic. The
// constants differ on purpose: move jobs use ~1.001 (Manhattan with a
// 1/1000th tie-breaker), the resource finder uses ~0.501 (the same
// tie-breaker halved, which under-estimates and widens the sweep). They are
// carried in `ColonyConfig` and must not be unified.
//
// See also: `pathfinding.rs` for the engine, `config.rs` for the constants.

use crate::pathfinding::PathJob;
use crate::types::{BlockKind, BlockPos};
use crate::world::BlockGrid;

// ---------------------------------------------------------------------------
// MoveToJob
// ---------------------------------------------------------------------------

/// Path to a target cell. The destination test accepts the target itself or
/// any directly adjacent walkable cell, so workers can stand next to a block
/// they operate on.
pub struct MoveToJob {
    pub target: BlockPos,
    pub tie_breaker: f32,
}

impl MoveToJob {
    pub fn new(target: BlockPos, tie_breaker: f32) -> Self {
        Self { target, tie_breaker }
    }
}

impl PathJob for MoveToJob {
    fn heuristic(&self, pos: BlockPos) -> f32 {
        pos.manhattan_distance(self.target) as f32 * self.tie_breaker
    }

    fn is_at_destination(
        &mut self,
        _grid: &BlockGrid,
        pos: BlockPos,
        _parent: Option<BlockPos>,
    ) -> bool {
        (pos.x - self.target.x).abs() <= 1
            && (pos.y - self.target.y).abs() <= 1
            && (pos.z - self.target.z).abs() <= 1
    }

    fn node_result_score(&self, pos: BlockPos) -> f32 {
        // Closer to the target is better.
        -(pos.manhattan_distance(self.target) as f32)
    }
}

// ---------------------------------------------------------------------------
// MoveAwayJob
// ---------------------------------------------------------------------------

/// Path away from a point until the squared distance reaches
/// `avoid_distance²`. The heuristic steers toward a point projected on the
/// start→away direction, scaled to the required distance.
pub struct MoveAwayJob {
    pub avoid: BlockPos,
    pub avoid_distance: u32,
    pub tie_breaker: f32,
    heuristic_point: BlockPos,
}

impl MoveAwayJob {
    pub fn new(start: BlockPos, avoid: BlockPos, avoid_distance: u32, tie_breaker: f32) -> Self {
        let dx = f64::from(start.x - avoid.x);
        let dz = f64::from(start.z - avoid.z);
        let length = (dx * dx + dz * dz).sqrt();
        // Starting on top of the avoided point gives no direction; pick +X.
        let heuristic_point = if length == 0.0 {
            BlockPos::new(start.x + avoid_distance as i32, start.y, start.z)
        } else {
            let scalar = f64::from(avoid_distance) / length;
            BlockPos::new(
                start.x + (dx * scalar) as i32,
                start.y,
                start.z + (dz * scalar) as i32,
            )
        };
        Self {
            avoid,
            avoid_distance,
            tie_breaker,
            heuristic_point,
        }
    }
}

impl PathJob for MoveAwayJob {
    fn heuristic(&self, pos: BlockPos) -> f32 {
        pos.manhattan_distance(self.heuristic_point) as f32 * self.tie_breaker
    }

    fn is_at_destination(
        &mut self,
        _grid: &BlockGrid,
        pos: BlockPos,
        _parent: Option<BlockPos>,
    ) -> bool {
        pos.distance_sq(self.avoid) >= f64::from(self.avoid_distance) * f64::from(self.avoid_distance)
    }

    fn node_result_score(&self, pos: BlockPos) -> f32 {
        // Farther from the avoided point is better.
        pos.distance_sq(self.avoid) as f32
    }
}

// ---------------------------------------------------------------------------
// FindResourceJob
// ---------------------------------------------------------------------------

/// Wander outward from home looking for a block of `kind` below a cell
/// adjacent to the path, in the direction of travel. Spots within
/// `min_separation_sq` of an already-known location are skipped, and the
/// search never accepts a find beyond `max_range_sq` of home.
///
/// On success the job records the found block in `found`; `first_find` says
/// whether the known list was empty when the search ran.
pub struct FindResourceJob {
    pub kind: BlockKind,
    pub home: BlockPos,
    pub known: Vec<BlockPos>,
    pub min_separation_sq: f64,
    pub max_range_sq: f64,
    pub tie_breaker: f32,
    /// Set by the destination test when a new resource location is accepted.
    pub found: Option<BlockPos>,
    /// Whether this was the worker's first find (no known locations yet).
    pub first_find: bool,
}

impl FindResourceJob {
    pub fn new(
        kind: BlockKind,
        home: BlockPos,
        known: Vec<BlockPos>,
        min_separation_sq: f64,
        max_range_sq: f64,
        tie_breaker: f32,
    ) -> Self {
        Self {
            kind,
            home,
            known,
            min_separation_sq,
            max_range_sq,
            tie_breaker,
            found: None,
            first_find: false,
        }
    }

    /// Whether the cell below `probe` holds the wanted block and is far
    /// enough from every known location. Records the find on success.
    fn try_accept(&mut self, grid: &BlockGrid, probe: BlockPos) -> bool {
        let candidate = probe.down();
        if self.known.contains(&candidate) {
            return false;
        }
        if self
            .known
            .iter()
            .any(|k| k.distance_sq(candidate) < self.min_separation_sq)
        {
            return false;
        }
        if grid.get(candidate) != self.kind {
            return false;
        }
        self.found = Some(candidate);
        self.first_find = self.known.is_empty();
        true
    }
}

impl PathJob for FindResourceJob {
    fn heuristic(&self, pos: BlockPos) -> f32 {
        // Manhattan distance from home with the halved tie-breaker; the
        // under-estimate keeps the sweep broad instead of beelining.
        pos.manhattan_distance(self.home) as f32 * self.tie_breaker
    }

    fn is_at_destination(&mut self, grid: &BlockGrid, pos: BlockPos, parent: Option<BlockPos>) -> bool {
        // Direction of travel is needed to know which edge cells to probe.
        let Some(parent) = parent else {
            return false;
        };

        if self.home.distance_sq(pos) > self.max_range_sq {
            return false;
        }

        if pos.x != parent.x {
            let dx = if pos.x > parent.x { 1 } else { -1 };
            self.try_accept(grid, pos.offset(dx, 0, 0))
                || self.try_accept(grid, pos.offset(0, 0, -1))
                || self.try_accept(grid, pos.offset(0, 0, 1))
        } else {
            let dz = if pos.z > parent.z { 1 } else { -1 };
            self.try_accept(grid, pos.offset(0, 0, dz))
                || self.try_accept(grid, pos.offset(-1, 0, 0))
                || self.try_accept(grid, pos.offset(1, 0, 0))
        }
    }

    fn node_result_score(&self, _pos: BlockPos) -> f32 {
        // No node is a useful partial result; either the resource was found
        // or the search gives up.
        0.0
    }
}
