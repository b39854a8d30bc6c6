// Colony — the top-level simulation state and tick loop.
//
// Owns the block grid, the citizen and building registries, the work order
// queue, the PRNG, and the config. `step` advances one tick: every citizen's
// job runs in id order, then queue maintenance sweeps invalid orders and
// (on the fulfill interval) offers unclaimed orders to idle citizens.
//
// Persistence is serde JSON. The grid is not part of the save — it belongs
// to the host's world storage and is re-attached after load — and neither
// are the effect/notifier hooks, which the host passes into each `step`.
// `from_json` revalidates work-order claims so a save taken mid-removal
// never resurrects a claim on a missing citizen.
//
// **Critical constraint: determinism.** `(state, grid) -> state` per tick.
// Citizens tick in id order; registries are `BTreeMap`; all randomness is
// the colony PRNG.

use crate::building::{Building, BuildingKind};
use crate::citizen::CitizenData;
use crate::config::ColonyConfig;
use crate::hooks::Hooks;
use crate::job::{Job, JobCtx};
use crate::types::{BlockKind, BlockPos, CitizenId};
use crate::workorders::WorkOrderQueue;
use crate::world::BlockGrid;
use homestead_prng::ColonyRng;
use homestead_protocol::view::CitizenView;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Serialize, Deserialize)]
pub struct Colony {
    /// World blocks. Owned by the host's storage layer, re-attached after
    /// load; never serialized with the colony.
    #[serde(skip)]
    pub grid: BlockGrid,

    pub citizens: BTreeMap<CitizenId, CitizenData>,
    /// Keyed by location for lookups; saved as a sequence because JSON maps
    /// key on strings. Each `Building` carries its location, so the map is
    /// rebuilt from it on load.
    #[serde(with = "buildings_as_seq")]
    pub buildings: BTreeMap<BlockPos, Building>,
    pub workorders: WorkOrderQueue,
    pub rng: ColonyRng,
    pub config: ColonyConfig,
    pub tick: u64,
    next_citizen_id: u32,
}

impl Colony {
    pub fn new(grid: BlockGrid, config: ColonyConfig, seed: u64) -> Self {
        Self {
            grid,
            citizens: BTreeMap::new(),
            buildings: BTreeMap::new(),
            workorders: WorkOrderQueue::new(),
            rng: ColonyRng::new(seed),
            config,
            tick: 0,
            next_citizen_id: 0,
        }
    }

    /// Advance the simulation one tick.
    pub fn step(&mut self, hooks: &mut Hooks) {
        self.tick += 1;

        let ids: Vec<CitizenId> = self.citizens.keys().copied().collect();
        for id in ids {
            // Take the job out of the citizen so the tick can borrow both.
            let Some(mut job) = self.citizens.get_mut(&id).and_then(|c| c.job.take()) else {
                continue;
            };
            let mut ctx = JobCtx {
                grid: &mut self.grid,
                buildings: &mut self.buildings,
                rng: &mut self.rng,
                config: &self.config,
                hooks,
            };
            if let Some(citizen) = self.citizens.get_mut(&id) {
                job.tick(citizen, &mut ctx);
                citizen.job = Some(job);
            }
        }

        self.grow_crops();

        self.workorders.on_tick(
            self.tick,
            self.config.work_order_fulfill_interval,
            &self.buildings,
            &self.citizens,
        );
    }

    /// Random block ticks, matching the host engine's growth cadence: a few
    /// sampled cells per step, maturing any crop they land on.
    fn grow_crops(&mut self) {
        if self.grid.size_x == 0 || self.grid.size_y == 0 || self.grid.size_z == 0 {
            return;
        }
        for _ in 0..self.config.crop_growth_samples {
            let x = self.rng.range_i32(0, self.grid.size_x as i32);
            let y = self.rng.range_i32(0, self.grid.size_y as i32);
            let z = self.rng.range_i32(0, self.grid.size_z as i32);
            let pos = BlockPos::new(x, y, z);
            if let BlockKind::Crop { crop, mature: false } = self.grid.get(pos) {
                self.grid.set(pos, BlockKind::Crop { crop, mature: true });
            }
        }
    }

    // -----------------------------------------------------------------------
    // Citizens
    // -----------------------------------------------------------------------

    /// Spawn a citizen at `pos` with generated name and attributes.
    pub fn spawn_citizen(&mut self, pos: BlockPos) -> CitizenId {
        self.next_citizen_id += 1;
        let id = CitizenId(self.next_citizen_id);
        let citizen = CitizenData::generate(id, pos, &mut self.rng, &self.config);
        log::info!("{id} ({}) joined the colony", citizen.name);
        self.citizens.insert(id, citizen);
        id
    }

    /// Remove a citizen, releasing any work orders they claimed.
    pub fn remove_citizen(&mut self, id: CitizenId) {
        if self.citizens.remove(&id).is_some() {
            self.workorders.clear_claims_for(id);
        }
    }

    pub fn citizen(&self, id: CitizenId) -> Option<&CitizenData> {
        self.citizens.get(&id)
    }

    /// Public snapshot of a citizen for remote viewers.
    pub fn citizen_view(&self, id: CitizenId) -> Option<CitizenView> {
        self.citizens.get(&id).map(CitizenData::view)
    }

    // -----------------------------------------------------------------------
    // Buildings and employment
    // -----------------------------------------------------------------------

    pub fn add_building(&mut self, location: BlockPos, kind: BuildingKind) {
        self.buildings
            .insert(location, Building::new(location, kind, &self.config));
    }

    /// Tear a building down, clearing every citizen association with it.
    pub fn remove_building(&mut self, location: BlockPos) {
        if self.buildings.remove(&location).is_none() {
            return;
        }
        let affected: Vec<CitizenId> = self
            .citizens
            .values()
            .filter(|c| c.home_building == Some(location) || c.work_building == Some(location))
            .map(|c| c.id)
            .collect();
        for id in affected {
            if let Some(citizen) = self.citizens.get_mut(&id) {
                if citizen.home_building == Some(location) {
                    citizen.set_home_building(None);
                }
                if citizen.work_building == Some(location) {
                    citizen.set_work_building(None);
                    citizen.job = None;
                    self.workorders.clear_claims_for(id);
                }
            }
        }
    }

    /// House a citizen. Panics if the citizen already has a different home.
    pub fn assign_home(&mut self, id: CitizenId, location: BlockPos) -> bool {
        if !self.buildings.contains_key(&location) {
            return false;
        }
        match self.citizens.get_mut(&id) {
            Some(citizen) => {
                citizen.set_home_building(Some(location));
                true
            }
            None => false,
        }
    }

    /// Employ a citizen at a work site. Creates the site's job and resets
    /// any stale work-order claims. Panics if the citizen already works
    /// somewhere else.
    pub fn assign_work(&mut self, id: CitizenId, location: BlockPos) -> bool {
        let Some(kind) = self.buildings.get(&location).and_then(Building::create_job) else {
            return false;
        };
        let Some(citizen) = self.citizens.get_mut(&id) else {
            return false;
        };
        citizen.set_work_building(Some(location));
        if citizen.job.is_none() {
            citizen.job = Some(Job::new(kind));
        }
        self.workorders.clear_claims_for(id);
        true
    }

    /// End a citizen's employment: drop the job and release claims.
    pub fn clear_work(&mut self, id: CitizenId) {
        if let Some(citizen) = self.citizens.get_mut(&id) {
            citizen.set_work_building(None);
            citizen.job = None;
            self.workorders.clear_claims_for(id);
        }
    }

    // -----------------------------------------------------------------------
    // Persistence
    // -----------------------------------------------------------------------

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Restore a colony from a save, re-attaching the host-owned grid.
    pub fn from_json(json: &str, grid: BlockGrid) -> Result<Self, serde_json::Error> {
        let mut colony: Colony = serde_json::from_str(json)?;
        colony.grid = grid;
        colony.rebuild_transient_state();
        Ok(colony)
    }

    /// Fix up state that is derived rather than saved: stale work-order
    /// claims are cleared and the order id counter is restored.
    fn rebuild_transient_state(&mut self) {
        self.workorders.validate_claims(&self.citizens);
    }
}

mod buildings_as_seq {
    use super::{BlockPos, Building};
    use serde::ser::Serializer;
    use serde::{Deserialize, Deserializer};
    use std::collections::BTreeMap;

    pub fn serialize<S>(map: &BTreeMap<BlockPos, Building>, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ser.collect_seq(map.values())
    }

    pub fn deserialize<'de, D>(de: D) -> Result<BTreeMap<BlockPos, Building>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let buildings = Vec::<Building>::deserialize(de)?;
        Ok(buildings.into_iter().map(|b| (b.location, b)).collect())
    }
}
