// Fisherman stage machine: find water, fish, unload.
//
// The same staged pattern as the farmer, driving the resource-finding path
// job instead of a field scan. Discovered ponds accumulate in a known list;
// the separation and range constraints live in the path job, so every new
// pond is automatically far enough from the old ones and close enough to
// the hut. When the search finds nothing new the fisherman rotates through
// ponds it already knows.
//
// Catches are a PRNG draw per cast, so fishing yield follows the colony
// seed like everything else.

use crate::citizen::CitizenData;
use crate::job::JobCtx;
use crate::path_jobs::FindResourceJob;
use crate::pathfinding::search;
use crate::types::{BlockKind, BlockPos, ItemKind, ItemStack};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FisherStage {
    Working,
    SearchingWater,
    Fishing,
    FullInventory,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FisherState {
    pub stage: FisherStage,
    /// Ponds this fisherman has discovered, in discovery order.
    pub ponds: Vec<BlockPos>,
    pub current_pond: Option<BlockPos>,
    /// Round-robin index into `ponds` for revisits.
    pub pond_rotation: usize,
    pub catch_counter: u32,
}

impl Default for FisherState {
    fn default() -> Self {
        Self {
            stage: FisherStage::Working,
            ponds: Vec::new(),
            current_pond: None,
            pond_rotation: 0,
            catch_counter: 0,
        }
    }
}

pub(crate) fn tick(
    state: &mut FisherState,
    delay: &mut u32,
    citizen: &mut CitizenData,
    ctx: &mut JobCtx<'_>,
    work_pos: BlockPos,
) {
    match state.stage {
        FisherStage::Working => {
            state.stage = if state.current_pond.is_some() {
                FisherStage::Fishing
            } else {
                FisherStage::SearchingWater
            };
        }
        FisherStage::SearchingWater => search_water(state, delay, citizen, ctx, work_pos),
        FisherStage::Fishing => fishing(state, delay, citizen, ctx),
        FisherStage::FullInventory => full_inventory(state, citizen, ctx, work_pos),
    }
}

/// Run the resource search for an unfished pond; fall back to rotating
/// through known ponds when nothing new is in range.
fn search_water(
    state: &mut FisherState,
    delay: &mut u32,
    citizen: &mut CitizenData,
    ctx: &mut JobCtx<'_>,
    work_pos: BlockPos,
) {
    let mut job = FindResourceJob::new(
        BlockKind::Water,
        work_pos,
        state.ponds.clone(),
        ctx.config.min_resource_separation_sq,
        ctx.config.max_resource_range_sq,
        ctx.config.find_resource_tie_breaker,
    );
    search(
        ctx.grid,
        citizen.pos,
        ctx.config.path_walk_range,
        ctx.config.path_max_expansions,
        &mut job,
    );

    if let Some(found) = job.found {
        if job.first_find {
            log::info!("{} found their first pond at {found}", citizen.id);
        }
        state.ponds.push(found);
        state.current_pond = Some(found);
        state.stage = FisherStage::Fishing;
    } else if !state.ponds.is_empty() {
        // Nothing new in range; revisit a known pond.
        let idx = state.pond_rotation % state.ponds.len();
        state.current_pond = Some(state.ponds[idx]);
        state.pond_rotation = state.pond_rotation.wrapping_add(1);
        state.stage = FisherStage::Fishing;
    } else {
        *delay = ctx.config.water_search_delay;
    }
}

/// Stand at the pond and cast. Dried-up ponds are forgotten.
fn fishing(state: &mut FisherState, delay: &mut u32, citizen: &mut CitizenData, ctx: &mut JobCtx<'_>) {
    let Some(pond) = state.current_pond else {
        state.stage = FisherStage::Working;
        return;
    };

    if !citizen.move_toward(pond, ctx.grid, ctx.config) {
        return;
    }

    if ctx.grid.get(pond) != BlockKind::Water {
        state.ponds.retain(|p| *p != pond);
        state.current_pond = None;
        state.stage = FisherStage::SearchingWater;
        return;
    }

    *delay = ctx.config.fishing_delay;
    if ctx.rng.chance(ctx.config.fish_catch_chance) {
        let _ = citizen.inventory.add(ItemStack::new(ItemKind::RawFish, 1));
        state.catch_counter += 1;
        if state.catch_counter >= ctx.config.fish_catch_limit {
            state.stage = FisherStage::FullInventory;
            state.catch_counter = 0;
        }
    }
}

/// Walk back to the hut and unload the catch.
fn full_inventory(
    state: &mut FisherState,
    citizen: &mut CitizenData,
    ctx: &mut JobCtx<'_>,
    work_pos: BlockPos,
) {
    if !citizen.move_toward(work_pos, ctx.grid, ctx.config) {
        return;
    }
    if let Some(building) = ctx.buildings.get_mut(&work_pos) {
        citizen.inventory.dump_non_tools_into(&mut building.storage);
    }
    state.stage = FisherStage::Working;
}
