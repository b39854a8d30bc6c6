// Dense 3D block grid — the spatial query interface.
//
// The grid is stored as a flat `Vec<BlockKind>` indexed by
// `x + z * size_x + y * size_x * size_z`, giving O(1) read/write access.
// Out-of-bounds reads return `Air`; out-of-bounds writes are no-ops, so
// worker routines scanning near the world edge need no special cases.
//
// The grid is the only mutation surface the worker state machines and the
// path search touch: read a block, write a block, test walkability, collect
// harvest drops. Rendering, lighting, and chunk storage live outside this
// crate and consume the same interface.
//
// See also: `pathfinding.rs` which expands walkable neighbors through this
// grid, `farmer.rs`/`fisherman.rs` which till, plant, and clear blocks.
//
// **Critical constraint: determinism.** All grid mutations go through the
// single-threaded tick; no concurrent access.

use crate::types::{BlockKind, BlockPos, ItemStack};

/// Dense 3D block grid.
#[derive(Clone, Debug, Default)]
pub struct BlockGrid {
    /// Flat storage: index = x + z * size_x + y * size_x * size_z.
    blocks: Vec<BlockKind>,
    pub size_x: u32,
    pub size_y: u32,
    pub size_z: u32,
}

impl BlockGrid {
    /// Create a grid filled with `Air`.
    pub fn new(size_x: u32, size_y: u32, size_z: u32) -> Self {
        let total = (size_x as usize) * (size_y as usize) * (size_z as usize);
        Self {
            blocks: vec![BlockKind::Air; total],
            size_x,
            size_y,
            size_z,
        }
    }

    pub fn in_bounds(&self, pos: BlockPos) -> bool {
        pos.x >= 0
            && pos.y >= 0
            && pos.z >= 0
            && (pos.x as u32) < self.size_x
            && (pos.y as u32) < self.size_y
            && (pos.z as u32) < self.size_z
    }

    fn index(&self, pos: BlockPos) -> Option<usize> {
        if self.in_bounds(pos) {
            let sx = self.size_x as usize;
            let sz = self.size_z as usize;
            Some(pos.x as usize + pos.z as usize * sx + pos.y as usize * sx * sz)
        } else {
            None
        }
    }

    /// Read a block. Returns `Air` for out-of-bounds positions.
    pub fn get(&self, pos: BlockPos) -> BlockKind {
        self.index(pos)
            .map(|i| self.blocks[i])
            .unwrap_or(BlockKind::Air)
    }

    /// Write a block. No-op for out-of-bounds positions.
    pub fn set(&mut self, pos: BlockPos, kind: BlockKind) {
        if let Some(i) = self.index(pos) {
            self.blocks[i] = kind;
        }
    }

    pub fn is_air(&self, pos: BlockPos) -> bool {
        self.get(pos) == BlockKind::Air
    }

    /// Clear a block back to air.
    pub fn set_air(&mut self, pos: BlockPos) {
        self.set(pos, BlockKind::Air);
    }

    /// Whether a worker can stand at `pos`: a solid non-air floor directly
    /// below, and air at the cell and at head height.
    pub fn is_walkable(&self, pos: BlockPos) -> bool {
        self.get(pos.down()).is_solid() && self.is_air(pos) && self.is_air(pos.up())
    }

    /// What harvesting the block at `pos` yields. Only mature crops drop
    /// anything.
    pub fn block_drops(&self, pos: BlockPos) -> Vec<ItemStack> {
        match self.get(pos) {
            BlockKind::Crop { crop, mature: true } => crop.drops().to_vec(),
            _ => Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CropKind, ItemKind};

    #[test]
    fn new_grid_is_all_air() {
        let grid = BlockGrid::new(4, 4, 4);
        for x in 0..4 {
            for y in 0..4 {
                for z in 0..4 {
                    assert!(grid.is_air(BlockPos::new(x, y, z)));
                }
            }
        }
    }

    #[test]
    fn set_and_get() {
        let mut grid = BlockGrid::new(8, 8, 8);
        let pos = BlockPos::new(3, 5, 2);
        grid.set(pos, BlockKind::Dirt);
        assert_eq!(grid.get(pos), BlockKind::Dirt);
        assert_eq!(grid.get(BlockPos::new(3, 5, 3)), BlockKind::Air);
    }

    #[test]
    fn out_of_bounds_read_returns_air() {
        let grid = BlockGrid::new(4, 4, 4);
        assert_eq!(grid.get(BlockPos::new(-1, 0, 0)), BlockKind::Air);
        assert_eq!(grid.get(BlockPos::new(0, 4, 0)), BlockKind::Air);
        assert_eq!(grid.get(BlockPos::new(100, 100, 100)), BlockKind::Air);
    }

    #[test]
    fn out_of_bounds_write_is_noop() {
        let mut grid = BlockGrid::new(4, 4, 4);
        grid.set(BlockPos::new(-1, 0, 0), BlockKind::Stone);
        grid.set(BlockPos::new(100, 0, 0), BlockKind::Stone);
    }

    #[test]
    fn walkability_needs_solid_floor_and_clearance() {
        let mut grid = BlockGrid::new(8, 8, 8);
        let floor = BlockPos::new(4, 2, 4);
        let stand = floor.up();
        grid.set(floor, BlockKind::Grass);
        assert!(grid.is_walkable(stand));

        // Obstructed cell is not walkable.
        grid.set(stand, BlockKind::Stone);
        assert!(!grid.is_walkable(stand));

        // No floor, not walkable.
        assert!(!grid.is_walkable(BlockPos::new(1, 5, 1)));

        // Water is not a floor.
        grid.set(floor, BlockKind::Water);
        grid.set_air(stand);
        assert!(!grid.is_walkable(stand));
    }

    #[test]
    fn drops_only_from_mature_crops() {
        let mut grid = BlockGrid::new(8, 8, 8);
        let pos = BlockPos::new(1, 1, 1);

        grid.set(pos, BlockKind::Crop { crop: CropKind::Carrot, mature: false });
        assert!(grid.block_drops(pos).is_empty());

        grid.set(pos, BlockKind::Crop { crop: CropKind::Carrot, mature: true });
        let drops = grid.block_drops(pos);
        assert_eq!(drops.len(), 2);
        assert!(drops.iter().all(|d| d.kind == ItemKind::Carrot));

        grid.set(pos, BlockKind::Stone);
        assert!(grid.block_drops(pos).is_empty());
    }
}
