// Farmer stage machine: scan, till, plant, harvest, unload.
//
// The farmer works the field around its farm building. One world action per
// tick; slower actions (tilling, planting, harvesting) charge the job delay
// so the work has a visible pace.
//
// Field cells are tracked in four caches, each holding stand-height
// positions (the block operated on is the cell below for soil, the cell
// itself for crops):
//   - `farm_able`: dirt/grass columns that can be tilled
//   - `plowed`: farmland with nothing growing on it
//   - `crops`: planted cells awaiting harvest
//   - `deferred_crops`: cells found immature at harvest time; promoted back
//     into `crops` once the main list drains, via a seed-stock check
//
// Stage transitions are total: every stage either acts or routes back to
// `Working`/`SearchingLand`, so the machine never wedges. An empty world
// costs one scan tick (`SearchingLand` -> `Working`) and settles.

use crate::citizen::CitizenData;
use crate::job::JobCtx;
use crate::types::{BlockKind, BlockPos};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum FarmerStage {
    Working,
    MakingLand,
    Planting,
    NeedSeeds,
    Harvesting,
    SearchingLand,
    FullInventory,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FarmerState {
    pub stage: FarmerStage,
    pub farm_able: Vec<BlockPos>,
    pub plowed: Vec<BlockPos>,
    pub crops: Vec<BlockPos>,
    pub deferred_crops: Vec<BlockPos>,
    /// The block currently being worked, for the cosmetic swing.
    pub current_target: Option<BlockPos>,
    pub harvest_counter: u32,
}

impl Default for FarmerState {
    fn default() -> Self {
        Self {
            stage: FarmerStage::Working,
            farm_able: Vec::new(),
            plowed: Vec::new(),
            crops: Vec::new(),
            deferred_crops: Vec::new(),
            current_target: None,
            harvest_counter: 0,
        }
    }
}

impl FarmerState {
    /// Once the main crop list drains, put the deferred cells back in play.
    /// Routing through `NeedSeeds` re-checks seed stock before the farmer
    /// commits to another planting round.
    pub fn promote_deferred(&mut self) {
        if self.crops.is_empty() && !self.deferred_crops.is_empty() {
            self.crops.append(&mut self.deferred_crops);
            self.stage = FarmerStage::NeedSeeds;
        }
    }

    fn has_seed(&self, citizen: &CitizenData) -> bool {
        citizen
            .inventory
            .first_slot_where(|s| s.kind.is_seed())
            .is_some()
    }

    /// Shared routing for stages whose cache ran dry.
    fn route_after_empty_cache(&mut self) {
        if self.plowed.is_empty() && self.crops.is_empty() {
            self.stage = FarmerStage::SearchingLand;
        } else {
            self.stage = FarmerStage::Working;
        }
    }
}

pub(crate) fn tick(
    state: &mut FarmerState,
    delay: &mut u32,
    citizen: &mut CitizenData,
    ctx: &mut JobCtx<'_>,
    work_pos: BlockPos,
) {
    match state.stage {
        FarmerStage::FullInventory => full_inventory(state, citizen, ctx, work_pos),
        FarmerStage::SearchingLand => search_land(state, ctx, work_pos),
        FarmerStage::MakingLand => make_land(state, delay, ctx),
        FarmerStage::NeedSeeds => need_seeds(state, delay, citizen, ctx, work_pos),
        FarmerStage::Working => working(state, citizen, ctx),
        FarmerStage::Planting => planting(state, delay, citizen, ctx),
        FarmerStage::Harvesting => harvesting(state, delay, citizen, ctx),
    }
}

/// Decide what to do next based on cache contents and seed stock.
fn working(state: &mut FarmerState, citizen: &CitizenData, ctx: &JobCtx<'_>) {
    let has_seed = state.has_seed(citizen);
    let backlog = state.crops.len() + state.deferred_crops.len();

    if state.farm_able.is_empty() && state.plowed.is_empty() && state.crops.is_empty() {
        state.stage = FarmerStage::SearchingLand;
    } else if !has_seed && backlog < ctx.config.crop_backlog_limit {
        state.stage = FarmerStage::NeedSeeds;
    } else if !state.farm_able.is_empty() {
        state.stage = FarmerStage::MakingLand;
    } else if has_seed && !state.plowed.is_empty() {
        state.stage = FarmerStage::Planting;
    } else if !state.crops.is_empty() {
        state.stage = FarmerStage::Harvesting;
    }
}

/// Scan the field around the farm and classify every column.
fn search_land(state: &mut FarmerState, ctx: &JobCtx<'_>, work_pos: BlockPos) {
    let Some(building) = ctx.buildings.get(&work_pos) else {
        return;
    };
    let radius = building.farm_radius(ctx.config) + 1;
    let loc = building.location;

    for x in (loc.x - radius)..=(loc.x + radius) {
        for z in (loc.z - radius)..=(loc.z + radius) {
            let cell = BlockPos::new(x, loc.y, z);
            match ctx.grid.get(cell.down()) {
                kind if kind.is_tillable() => {
                    if ctx.grid.is_air(cell) && !state.farm_able.contains(&cell) {
                        state.farm_able.push(cell);
                    }
                }
                BlockKind::Farmland => {
                    if matches!(ctx.grid.get(cell), BlockKind::Crop { .. }) {
                        if !state.crops.contains(&cell) {
                            state.crops.push(cell);
                        }
                    } else if !state.plowed.contains(&cell) {
                        state.plowed.push(cell);
                    }
                }
                _ => {}
            }
        }
    }
    state.stage = FarmerStage::Working;
}

/// Till the next farmable column into farmland.
fn make_land(state: &mut FarmerState, delay: &mut u32, ctx: &mut JobCtx<'_>) {
    if let Some(&cell) = state.farm_able.first() {
        if ctx.grid.get(cell.down()) != BlockKind::Farmland {
            *delay = ctx.config.make_land_delay;
            ctx.grid.set(cell.down(), BlockKind::Farmland);
            state.current_target = Some(cell.down());
        }
        if !state.plowed.contains(&cell) {
            state.plowed.push(cell);
        }
        state.farm_able.remove(0);
    } else {
        state.route_after_empty_cache();
    }
}

/// Wait at the farm for seeds, restocking from storage when possible.
fn need_seeds(
    state: &mut FarmerState,
    delay: &mut u32,
    citizen: &mut CitizenData,
    ctx: &mut JobCtx<'_>,
    work_pos: BlockPos,
) {
    if !citizen.move_toward(work_pos, ctx.grid, ctx.config) {
        return;
    }
    if state.has_seed(citizen) || take_seed_from_storage(citizen, ctx, work_pos) {
        state.stage = FarmerStage::Planting;
        return;
    }

    log::info!("{} is out of seeds", citizen.id);
    ctx.hooks
        .notifier
        .item_shortage(citizen.id, "message.worker.need_item", "seeds");
    *delay = ctx.config.need_seeds_delay;
}

/// Plant a seed on the next plowed cell.
fn planting(
    state: &mut FarmerState,
    delay: &mut u32,
    citizen: &mut CitizenData,
    ctx: &mut JobCtx<'_>,
) {
    let Some(&cell) = state.plowed.first() else {
        state.route_after_empty_cache();
        return;
    };

    if ctx.grid.get(cell.down()) != BlockKind::Farmland {
        // The soil reverted; send the column back through tilling.
        if !state.farm_able.contains(&cell) {
            state.farm_able.push(cell);
        }
        state.plowed.remove(0);
        return;
    }

    if ctx.grid.is_air(cell) {
        state.current_target = Some(cell.down());
        let Some(slot) = citizen
            .inventory
            .first_slot_where(|s| s.kind.is_seed())
        else {
            state.stage = FarmerStage::Working;
            return;
        };
        if let Some(seed) = citizen.inventory.get(slot)
            && let Some(crop) = seed.kind.crop_for_seed()
        {
            ctx.grid.set(cell, BlockKind::Crop { crop, mature: false });
            citizen.inventory.decrement(slot, 1);
            *delay = ctx.config.plant_delay;
        }
    }

    if !state.crops.contains(&cell) {
        state.crops.push(cell);
    }
    state.plowed.remove(0);
}

/// Walk to the next crop cell and harvest it if it is ready; immature
/// crops go to the deferred cache for a later pass.
fn harvesting(
    state: &mut FarmerState,
    delay: &mut u32,
    citizen: &mut CitizenData,
    ctx: &mut JobCtx<'_>,
) {
    if let Some(&cell) = state.crops.first() {
        if citizen.move_toward(cell, ctx.grid, ctx.config) {
            // The delay is the cost of the harvest action itself; walking
            // toward the crop stays free.
            *delay = ctx.config.harvest_delay;
            let mature = matches!(ctx.grid.get(cell), BlockKind::Crop { mature: true, .. });
            if mature {
                for drop in ctx.grid.block_drops(cell) {
                    // Overflow past a full inventory is lost, as dropped
                    // items would despawn in the world.
                    let _ = citizen.inventory.add(drop);
                }
                ctx.hooks.effects.block_break(citizen.id, cell);
                ctx.grid.set_air(cell);
                state.harvest_counter += 1;

                if !state.plowed.contains(&cell) {
                    state.plowed.push(cell);
                }
            } else {
                state.deferred_crops.push(cell);
            }
            state.crops.remove(0);
        }
    } else {
        state.route_after_empty_cache();
    }

    if state.harvest_counter >= ctx.config.harvest_limit {
        state.stage = FarmerStage::FullInventory;
        state.harvest_counter = 0;
    }
}

/// Walk home and unload everything except tools.
fn full_inventory(
    state: &mut FarmerState,
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
    state.stage = FarmerStage::Working;
}

/// Move one stack of seeds from farm storage into the citizen's inventory.
fn take_seed_from_storage(citizen: &mut CitizenData, ctx: &mut JobCtx<'_>, work_pos: BlockPos) -> bool {
    let Some(building) = ctx.buildings.get_mut(&work_pos) else {
        return false;
    };
    let Some(slot) = building.storage.first_slot_where(|s| s.kind.is_seed()) else {
        return false;
    };
    let Some(stack) = building.storage.get(slot) else {
        return false;
    };
    let rest = citizen.inventory.add(stack);
    let taken = stack.count - rest.map_or(0, |r| r.count);
    building.storage.decrement(slot, taken);
    taken > 0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::building::{Building, BuildingKind};
    use crate::config::ColonyConfig;
    use crate::hooks::Hooks;
    use crate::hooks::testing::RecordingNotifier;
    use crate::inventory::Inventory;
    use crate::types::{CitizenId, CropKind, ItemKind, ItemStack};
    use crate::world::BlockGrid;
    use homestead_prng::ColonyRng;
    use std::collections::BTreeMap;

    struct Fixture {
        grid: BlockGrid,
        buildings: BTreeMap<BlockPos, Building>,
        rng: ColonyRng,
        config: ColonyConfig,
        hooks: Hooks,
        work: BlockPos,
    }

    impl Fixture {
        /// 16x4x16 grass world with a level-0 farm in the middle and fast
        /// action delays.
        fn new() -> Self {
            let config = ColonyConfig {
                farm_radius_base: 1,
                make_land_delay: 0,
                plant_delay: 0,
                harvest_delay: 0,
                need_seeds_delay: 0,
                ..ColonyConfig::default()
            };

            let mut grid = BlockGrid::new(16, 4, 16);
            for x in 0..16 {
                for z in 0..16 {
                    grid.set(BlockPos::new(x, 0, z), BlockKind::Grass);
                }
            }
            let work = BlockPos::new(8, 1, 8);
            let mut buildings = BTreeMap::new();
            buildings.insert(work, Building::new(work, BuildingKind::Farm { level: 0 }, &config));
            Self {
                grid,
                buildings,
                rng: ColonyRng::new(5),
                config,
                hooks: Hooks::default(),
                work,
            }
        }

        fn ctx(&mut self) -> JobCtx<'_> {
            JobCtx {
                grid: &mut self.grid,
                buildings: &mut self.buildings,
                rng: &mut self.rng,
                config: &self.config,
                hooks: &mut self.hooks,
            }
        }

        fn worker(&self) -> CitizenData {
            let mut rng = ColonyRng::new(9);
            let mut citizen =
                CitizenData::generate(CitizenId(1), self.work, &mut rng, &self.config);
            citizen.work_building = Some(self.work);
            citizen.inventory = Inventory::new(self.config.citizen_inventory_size);
            citizen.inventory.set(0, Some(ItemStack::new(ItemKind::IronHoe, 1)));
            citizen.inventory.set(1, Some(ItemStack::new(ItemKind::IronShovel, 1)));
            citizen
        }
    }

    fn run_stage(fx: &mut Fixture, state: &mut FarmerState, citizen: &mut CitizenData) {
        let mut delay = 0;
        let work = fx.work;
        let mut ctx = fx.ctx();
        tick(state, &mut delay, citizen, &mut ctx, work);
    }

    #[test]
    fn scan_classifies_columns_and_returns_to_working() {
        let mut fx = Fixture::new();
        // One farmland column (bare) and one carrying a crop.
        fx.grid.set(BlockPos::new(7, 0, 7), BlockKind::Farmland);
        fx.grid.set(BlockPos::new(9, 0, 9), BlockKind::Farmland);
        fx.grid.set(
            BlockPos::new(9, 1, 9),
            BlockKind::Crop { crop: CropKind::Wheat, mature: false },
        );

        let mut citizen = fx.worker();
        let mut state = FarmerState { stage: FarmerStage::SearchingLand, ..FarmerState::default() };
        run_stage(&mut fx, &mut state, &mut citizen);

        assert_eq!(state.stage, FarmerStage::Working);
        // Radius 1 + 1 fringe = a 5x5 scan box, minus the two farmland
        // columns: 23 tillable columns.
        assert_eq!(state.farm_able.len(), 23);
        assert_eq!(state.plowed, vec![BlockPos::new(7, 1, 7)]);
        assert_eq!(state.crops, vec![BlockPos::new(9, 1, 9)]);
    }

    #[test]
    fn scan_is_deterministic_on_a_fixed_fixture() {
        let mut a = Fixture::new();
        let mut b = Fixture::new();
        for fx in [&mut a, &mut b] {
            fx.grid.set(BlockPos::new(7, 0, 7), BlockKind::Farmland);
        }
        let mut citizen_a = a.worker();
        let mut citizen_b = b.worker();
        let mut state_a = FarmerState { stage: FarmerStage::SearchingLand, ..FarmerState::default() };
        let mut state_b = FarmerState { stage: FarmerStage::SearchingLand, ..FarmerState::default() };
        run_stage(&mut a, &mut state_a, &mut citizen_a);
        run_stage(&mut b, &mut state_b, &mut citizen_b);
        assert_eq!(state_a.farm_able, state_b.farm_able);
        assert_eq!(state_a.plowed, state_b.plowed);
    }

    #[test]
    fn empty_world_settles_without_oscillation() {
        let mut fx = Fixture::new();
        // Stone everywhere: nothing tillable.
        for x in 0..16 {
            for z in 0..16 {
                fx.grid.set(BlockPos::new(x, 0, z), BlockKind::Stone);
            }
        }
        let mut citizen = fx.worker();
        let mut state = FarmerState::default();

        // Working -> SearchingLand -> Working, with every cache still empty.
        run_stage(&mut fx, &mut state, &mut citizen);
        assert_eq!(state.stage, FarmerStage::SearchingLand);
        run_stage(&mut fx, &mut state, &mut citizen);
        assert_eq!(state.stage, FarmerStage::Working);
        assert!(state.farm_able.is_empty());
        assert!(state.plowed.is_empty());
    }

    #[test]
    fn make_land_tills_and_promotes_to_plowed() {
        let mut fx = Fixture::new();
        let cell = BlockPos::new(7, 1, 8);
        let mut citizen = fx.worker();
        let mut state = FarmerState {
            stage: FarmerStage::MakingLand,
            farm_able: vec![cell],
            ..FarmerState::default()
        };

        let mut delay = 0;
        let work = fx.work;
        let mut ctx = fx.ctx();
        tick(&mut state, &mut delay, &mut citizen, &mut ctx, work);

        assert_eq!(fx.grid.get(cell.down()), BlockKind::Farmland);
        assert!(state.farm_able.is_empty());
        assert_eq!(state.plowed, vec![cell]);
        assert_eq!(state.current_target, Some(cell.down()));
    }

    #[test]
    fn planting_consumes_a_seed_and_maps_it_to_its_crop() {
        let mut fx = Fixture::new();
        let cell = BlockPos::new(7, 1, 8);
        fx.grid.set(cell.down(), BlockKind::Farmland);

        let mut citizen = fx.worker();
        citizen.inventory.set(2, Some(ItemStack::new(ItemKind::PumpkinSeeds, 3)));
        let mut state = FarmerState {
            stage: FarmerStage::Planting,
            plowed: vec![cell],
            ..FarmerState::default()
        };
        run_stage(&mut fx, &mut state, &mut citizen);

        assert_eq!(
            fx.grid.get(cell),
            BlockKind::Crop { crop: CropKind::Pumpkin, mature: false }
        );
        assert_eq!(citizen.inventory.count(ItemKind::PumpkinSeeds), 2);
        assert_eq!(state.crops, vec![cell]);
        assert!(state.plowed.is_empty());
    }

    #[test]
    fn planting_without_seeds_routes_to_working() {
        let mut fx = Fixture::new();
        let cell = BlockPos::new(7, 1, 8);
        fx.grid.set(cell.down(), BlockKind::Farmland);

        let mut citizen = fx.worker();
        let mut state = FarmerState {
            stage: FarmerStage::Planting,
            plowed: vec![cell],
            ..FarmerState::default()
        };
        run_stage(&mut fx, &mut state, &mut citizen);

        assert_eq!(state.stage, FarmerStage::Working);
        // The cell stays queued for when seeds arrive.
        assert_eq!(state.plowed, vec![cell]);
    }

    #[test]
    fn planting_on_reverted_soil_requeues_for_tilling() {
        let mut fx = Fixture::new();
        let cell = BlockPos::new(7, 1, 8);
        // Below is plain grass, not farmland.
        let mut citizen = fx.worker();
        citizen.inventory.set(2, Some(ItemStack::new(ItemKind::WheatSeeds, 1)));
        let mut state = FarmerState {
            stage: FarmerStage::Planting,
            plowed: vec![cell],
            ..FarmerState::default()
        };
        run_stage(&mut fx, &mut state, &mut citizen);

        assert!(state.plowed.is_empty());
        assert_eq!(state.farm_able, vec![cell]);
        assert_eq!(citizen.inventory.count(ItemKind::WheatSeeds), 1);
    }

    #[test]
    fn harvest_moves_drops_to_inventory_and_cell_to_plowed() {
        let mut fx = Fixture::new();
        let cell = BlockPos::new(8, 1, 7);
        fx.grid.set(cell.down(), BlockKind::Farmland);
        fx.grid.set(cell, BlockKind::Crop { crop: CropKind::Carrot, mature: true });

        let mut citizen = fx.worker();
        let mut state = FarmerState {
            stage: FarmerStage::Harvesting,
            crops: vec![cell],
            ..FarmerState::default()
        };
        run_stage(&mut fx, &mut state, &mut citizen);

        assert!(fx.grid.is_air(cell));
        assert_eq!(citizen.inventory.count(ItemKind::Carrot), 2);
        assert_eq!(state.plowed, vec![cell]);
        assert!(state.crops.is_empty());
        assert_eq!(state.harvest_counter, 1);
    }

    #[test]
    fn immature_crops_are_deferred() {
        let mut fx = Fixture::new();
        let cell = BlockPos::new(8, 1, 7);
        fx.grid.set(cell.down(), BlockKind::Farmland);
        fx.grid.set(cell, BlockKind::Crop { crop: CropKind::Wheat, mature: false });

        let mut citizen = fx.worker();
        let mut state = FarmerState {
            stage: FarmerStage::Harvesting,
            crops: vec![cell],
            ..FarmerState::default()
        };
        run_stage(&mut fx, &mut state, &mut citizen);

        assert!(state.crops.is_empty());
        assert_eq!(state.deferred_crops, vec![cell]);
        assert!(!fx.grid.is_air(cell));
        assert_eq!(state.harvest_counter, 0);
    }

    #[test]
    fn harvest_counter_limit_forces_inventory_dump() {
        let mut fx = Fixture::new();
        let cell = BlockPos::new(8, 1, 7);
        fx.grid.set(cell.down(), BlockKind::Farmland);
        fx.grid.set(cell, BlockKind::Crop { crop: CropKind::Wheat, mature: true });

        let mut citizen = fx.worker();
        let mut state = FarmerState {
            stage: FarmerStage::Harvesting,
            crops: vec![cell],
            harvest_counter: fx.config.harvest_limit - 1,
            ..FarmerState::default()
        };
        run_stage(&mut fx, &mut state, &mut citizen);

        assert_eq!(state.stage, FarmerStage::FullInventory);
        assert_eq!(state.harvest_counter, 0);
    }

    #[test]
    fn harvest_travel_does_not_charge_the_action_delay() {
        let mut fx = Fixture::new();
        fx.config.harvest_delay = 10;
        let cell = BlockPos::new(12, 1, 12);
        fx.grid.set(cell.down(), BlockKind::Farmland);
        fx.grid.set(cell, BlockKind::Crop { crop: CropKind::Wheat, mature: true });

        // Worker starts at the farm, out of working reach of the crop.
        let mut citizen = fx.worker();
        let mut state = FarmerState {
            stage: FarmerStage::Harvesting,
            crops: vec![cell],
            ..FarmerState::default()
        };

        let work = fx.work;
        let mut delay = 0;
        for _ in 0..20 {
            let mut ctx = fx.ctx();
            tick(&mut state, &mut delay, &mut citizen, &mut ctx, work);
            if state.crops.is_empty() {
                break;
            }
            // Still walking: no action happened, so no delay was charged.
            assert_eq!(delay, 0);
        }
        assert!(state.crops.is_empty());
        assert_eq!(delay, 10);
        assert!(fx.grid.is_air(cell));
    }

    #[test]
    fn need_seeds_without_stock_announces_a_shortage() {
        let mut fx = Fixture::new();
        fx.config.need_seeds_delay = 40;
        let recorder = RecordingNotifier::default();
        fx.hooks = Hooks {
            notifier: Box::new(recorder.clone()),
            ..Hooks::default()
        };

        // No seeds anywhere: neither on the worker nor in farm storage.
        let mut citizen = fx.worker();
        let mut state = FarmerState {
            stage: FarmerStage::NeedSeeds,
            ..FarmerState::default()
        };
        let work = fx.work;
        let mut delay = 0;
        let mut ctx = fx.ctx();
        tick(&mut state, &mut delay, &mut citizen, &mut ctx, work);

        assert_eq!(state.stage, FarmerStage::NeedSeeds);
        assert_eq!(delay, 40);
        let shortages = recorder.shortages.borrow();
        assert_eq!(shortages.len(), 1);
        assert_eq!(shortages[0].0, CitizenId(1));
        assert_eq!(shortages[0].2, "seeds");
    }

    #[test]
    fn need_seeds_with_stock_does_not_announce() {
        let mut fx = Fixture::new();
        let work = fx.work;
        if let Some(b) = fx.buildings.get_mut(&work) {
            b.storage.set(0, Some(ItemStack::new(ItemKind::WheatSeeds, 4)));
        }
        let recorder = RecordingNotifier::default();
        fx.hooks = Hooks {
            notifier: Box::new(recorder.clone()),
            ..Hooks::default()
        };

        let mut citizen = fx.worker();
        let mut state = FarmerState {
            stage: FarmerStage::NeedSeeds,
            ..FarmerState::default()
        };
        run_stage(&mut fx, &mut state, &mut citizen);

        assert_eq!(state.stage, FarmerStage::Planting);
        assert!(recorder.shortages.borrow().is_empty());
    }

    #[test]
    fn full_inventory_unloads_produce_but_keeps_tools() {
        let mut fx = Fixture::new();
        let mut citizen = fx.worker();
        citizen.inventory.set(2, Some(ItemStack::new(ItemKind::Wheat, 20)));
        let mut state = FarmerState {
            stage: FarmerStage::FullInventory,
            ..FarmerState::default()
        };
        run_stage(&mut fx, &mut state, &mut citizen);

        assert_eq!(state.stage, FarmerStage::Working);
        assert!(citizen.inventory.has_tool(crate::types::ToolClass::Hoe));
        assert!(!citizen.inventory.contains(ItemKind::Wheat));
        let farm = fx.buildings.get(&fx.work).unwrap();
        assert_eq!(farm.storage.count(ItemKind::Wheat), 20);
    }

    #[test]
    fn deferred_promotion_reroutes_through_seed_check() {
        let cell = BlockPos::new(8, 1, 7);
        let mut state = FarmerState {
            stage: FarmerStage::Working,
            deferred_crops: vec![cell],
            ..FarmerState::default()
        };
        state.promote_deferred();
        assert_eq!(state.stage, FarmerStage::NeedSeeds);
        assert_eq!(state.crops, vec![cell]);
        assert!(state.deferred_crops.is_empty());

        // With crops still pending, promotion does not fire.
        state.deferred_crops.push(BlockPos::new(9, 1, 7));
        state.stage = FarmerStage::Working;
        state.promote_deferred();
        assert_eq!(state.stage, FarmerStage::Working);
    }

    #[test]
    fn need_seeds_restocks_from_farm_storage() {
        let mut fx = Fixture::new();
        let work = fx.work;
        if let Some(b) = fx.buildings.get_mut(&work) {
            b.storage.set(0, Some(ItemStack::new(ItemKind::MelonSeeds, 6)));
        }
        let mut citizen = fx.worker();
        let mut state = FarmerState {
            stage: FarmerStage::NeedSeeds,
            ..FarmerState::default()
        };
        run_stage(&mut fx, &mut state, &mut citizen);

        assert_eq!(state.stage, FarmerStage::Planting);
        assert_eq!(citizen.inventory.count(ItemKind::MelonSeeds), 6);
        let farm = fx.buildings.get(&work).unwrap();
        assert_eq!(farm.storage.count(ItemKind::MelonSeeds), 0);
    }

    #[test]
    fn working_without_seeds_and_small_backlog_asks_for_seeds() {
        let mut fx = Fixture::new();
        let mut citizen = fx.worker();
        let mut state = FarmerState {
            stage: FarmerStage::Working,
            plowed: vec![BlockPos::new(7, 1, 8)],
            ..FarmerState::default()
        };
        run_stage(&mut fx, &mut state, &mut citizen);
        assert_eq!(state.stage, FarmerStage::NeedSeeds);

        // With the backlog at the limit, the farmer harvests instead of
        // waiting on seeds.
        let mut state = FarmerState {
            stage: FarmerStage::Working,
            crops: (0..fx.config.crop_backlog_limit as i32)
                .map(|i| BlockPos::new(i, 1, 3))
                .collect(),
            ..FarmerState::default()
        };
        run_stage(&mut fx, &mut state, &mut citizen);
        assert_eq!(state.stage, FarmerStage::Harvesting);
    }
}
