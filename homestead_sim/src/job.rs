// The per-citizen job shell shared by every worker kind.
//
// A `Job` wraps the kind-specific state machine with the concerns every
// worker has: the action delay (one world action per tick, slower actions
// burn delay ticks), the items-needed list (missing tools or materials the
// worker requests and fetches from the work site), and tool gating (no
// stage logic runs until the worker holds its required tools).
//
// Tick order mirrors the worker AI contract:
//   1. deferred-crop promotion (farmer only, re-routes through seed check)
//   2. delay countdown (with a cosmetic swing at the block being worked)
//   3. items-needed resolution at the work site, announcing shortages
//   4. tool gate
//   5. the stage machine itself
//
// See also: `farmer.rs` and `fisherman.rs` for the stage machines,
// `colony.rs` which drives the tick.

use crate::building::Building;
use crate::citizen::CitizenData;
use crate::config::ColonyConfig;
use crate::farmer::{self, FarmerStage, FarmerState};
use crate::fisherman::{self, FisherState};
use crate::hooks::Hooks;
use crate::types::{BlockPos, ItemKind, ItemStack, ToolClass};
use crate::world::BlockGrid;
use homestead_prng::ColonyRng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::BTreeMap;

/// Everything a job tick may touch besides the citizen itself.
pub struct JobCtx<'a> {
    pub grid: &'a mut BlockGrid,
    pub buildings: &'a mut BTreeMap<BlockPos, Building>,
    pub rng: &'a mut ColonyRng,
    pub config: &'a ColonyConfig,
    pub hooks: &'a mut Hooks,
}

/// Kind-specific worker state, persisted as the variant's data.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub enum JobKind {
    Farmer(FarmerState),
    Fisherman(FisherState),
}

impl JobKind {
    pub fn new_farmer() -> Self {
        Self::Farmer(FarmerState::default())
    }

    pub fn new_fisherman() -> Self {
        Self::Fisherman(FisherState::default())
    }

    /// Display name carried into the citizen view.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Farmer(_) => "Farmer",
            Self::Fisherman(_) => "Fisherman",
        }
    }

    fn required_tools(&self) -> &'static [ToolClass] {
        match self {
            Self::Farmer(_) => &[ToolClass::Shovel, ToolClass::Hoe],
            Self::Fisherman(_) => &[ToolClass::FishingRod],
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Job {
    pub kind: JobKind,
    /// Items the worker is waiting on before it can continue.
    pub items_needed: SmallVec<[ItemStack; 4]>,
    /// Remaining ticks before the next action.
    pub delay: u32,
}

impl Job {
    pub fn new(kind: JobKind) -> Self {
        Self {
            kind,
            items_needed: SmallVec::new(),
            delay: 0,
        }
    }

    pub fn add_item_needed_if_absent(&mut self, kind: ItemKind) {
        if !self.items_needed.iter().any(|s| s.kind == kind) {
            self.items_needed.push(ItemStack::new(kind, 1));
        }
    }

    /// Advance the job one tick.
    pub fn tick(&mut self, citizen: &mut CitizenData, ctx: &mut JobCtx<'_>) {
        let Some(work_pos) = citizen.work_building else {
            return;
        };

        if let JobKind::Farmer(state) = &mut self.kind {
            state.promote_deferred();
        }

        if self.delay > 0 {
            self.delay -= 1;
            // Keep swinging at the block being worked while waiting.
            if let JobKind::Farmer(state) = &self.kind
                && state.stage == FarmerStage::MakingLand
                && let Some(target) = state.current_target
            {
                ctx.hooks.effects.block_hit(citizen.id, target);
            }
            return;
        }

        if !self.items_needed.is_empty() {
            self.resolve_items_needed(citizen, ctx, work_pos);
            return;
        }

        if !self.ensure_tools(citizen) {
            return;
        }

        let Job { kind, delay, .. } = self;
        match kind {
            JobKind::Farmer(state) => farmer::tick(state, delay, citizen, ctx, work_pos),
            JobKind::Fisherman(state) => fisherman::tick(state, delay, citizen, ctx, work_pos),
        }
    }

    /// Walk to the work site and try to satisfy the first outstanding need
    /// from on-site storage (or notice it is already satisfied). Unresolved
    /// needs are announced, then re-checked after the announce delay.
    fn resolve_items_needed(
        &mut self,
        citizen: &mut CitizenData,
        ctx: &mut JobCtx<'_>,
        work_pos: BlockPos,
    ) {
        if !citizen.move_toward(work_pos, ctx.grid, ctx.config) {
            return;
        }

        let storage = ctx.buildings.get_mut(&work_pos).map(|b| &mut b.storage);
        for i in 0..self.items_needed.len() {
            let needed = self.items_needed[i].kind;
            let already_have = citizen
                .inventory
                .first_slot_where(|s| satisfies(s.kind, needed))
                .is_some();
            if already_have {
                self.items_needed.remove(i);
                return;
            }
        }
        if let Some(storage) = storage {
            for i in 0..self.items_needed.len() {
                let needed = self.items_needed[i].kind;
                if take_from_storage(storage, citizen, needed) {
                    self.items_needed.remove(i);
                    return;
                }
            }
        }

        for stack in &self.items_needed {
            ctx.hooks.notifier.item_shortage(
                citizen.id,
                "message.worker.need_item",
                stack.kind.display_name(),
            );
        }
        self.delay = ctx.config.shortage_announce_delay;
    }

    /// Queue up requests for any missing tools. Returns whether the worker
    /// holds everything its job requires.
    fn ensure_tools(&mut self, citizen: &CitizenData) -> bool {
        let mut ready = true;
        for &class in self.kind.required_tools() {
            if !citizen.inventory.has_tool(class) {
                ready = false;
            }
        }
        if !ready {
            for &class in self.kind.required_tools() {
                if !citizen.inventory.has_tool(class) {
                    self.add_item_needed_if_absent(class.default_item());
                }
            }
        }
        ready
    }
}

/// Whether a held stack satisfies a needed item: exact kind, or any tool of
/// the same class.
fn satisfies(held: ItemKind, needed: ItemKind) -> bool {
    held == needed
        || (needed.tool_class().is_some() && held.tool_class() == needed.tool_class())
}

/// Move as much as fits of the first matching storage stack into the
/// citizen's inventory. Returns whether anything was transferred.
fn take_from_storage(
    storage: &mut crate::inventory::Inventory,
    citizen: &mut CitizenData,
    needed: ItemKind,
) -> bool {
    let Some(slot) = storage.first_slot_where(|s| satisfies(s.kind, needed)) else {
        return false;
    };
    let Some(stack) = storage.get(slot) else {
        return false;
    };
    let rest = citizen.inventory.add(stack);
    let taken = stack.count - rest.map_or(0, |r| r.count);
    storage.decrement(slot, taken);
    taken > 0
}
