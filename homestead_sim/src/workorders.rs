// Colony work order queue.
//
// Orders carry a monotonic id handed out by the queue (0 means "not yet
// assigned"), an optional claiming citizen, and a kind payload. The queue
// is a `BTreeMap` so iteration is ordered and deterministic. Ids strictly
// increase and are never reused while the queue lives.
//
// Maintenance runs once per fulfill interval: invalid orders are swept out,
// then unclaimed orders are offered to idle citizens. After a load, claims
// naming citizens that no longer exist are cleared as a failsafe.
//
// **Critical constraint: determinism.** Order iteration, claim assignment,
// and sweep order all follow id order.

use crate::building::Building;
use crate::citizen::CitizenData;
use crate::types::{BlockPos, CitizenId, WorkOrderId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkOrderKind {
    /// Construct or upgrade a building at `site` to `level`.
    Build { site: BlockPos, level: u32 },
    /// Refill the storage of the building at `building`.
    Restock { building: BlockPos },
}

impl WorkOrderKind {
    /// Whether this order still makes sense against the building registry.
    pub fn is_valid(&self, buildings: &BTreeMap<BlockPos, Building>) -> bool {
        match *self {
            Self::Build { site, level } => match buildings.get(&site) {
                // Upgrade orders are satisfied once the building reaches the
                // target level.
                Some(b) => b.kind.level() < level,
                // An empty site is a fresh construction order.
                None => true,
            },
            Self::Restock { building } => buildings.contains_key(&building),
        }
    }

    fn same_kind(&self, other: &WorkOrderKind) -> bool {
        matches!(
            (self, other),
            (Self::Build { .. }, Self::Build { .. }) | (Self::Restock { .. }, Self::Restock { .. })
        )
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkOrder {
    pub id: WorkOrderId,
    pub claimed_by: Option<CitizenId>,
    pub kind: WorkOrderKind,
}

impl WorkOrder {
    /// A fresh unassigned order; the queue assigns the id on `add`.
    pub fn new(kind: WorkOrderKind) -> Self {
        Self {
            id: WorkOrderId::default(),
            claimed_by: None,
            kind,
        }
    }

    pub fn is_claimed(&self) -> bool {
        self.claimed_by.is_some()
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WorkOrderQueue {
    orders: BTreeMap<WorkOrderId, WorkOrder>,
    top_id: u32,
}

impl WorkOrderQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an order, assigning a fresh id if it does not carry one.
    /// Returns the id under which the order is stored.
    pub fn add(&mut self, mut order: WorkOrder) -> WorkOrderId {
        if order.id.0 == 0 {
            self.top_id += 1;
            order.id = WorkOrderId(self.top_id);
        }
        let id = order.id;
        self.orders.insert(id, order);
        id
    }

    pub fn remove(&mut self, id: WorkOrderId) {
        self.orders.remove(&id);
    }

    pub fn get(&self, id: WorkOrderId) -> Option<&WorkOrder> {
        self.orders.get(&id)
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    /// Look up an order expected to be a build order. A kind mismatch is a
    /// caller bug worth noticing but never fatal.
    pub fn get_build(&self, id: WorkOrderId) -> Option<&WorkOrder> {
        let order = self.orders.get(&id)?;
        match order.kind {
            WorkOrderKind::Build { .. } => Some(order),
            _ => {
                log::warn!("work order {id} is not a build order");
                None
            }
        }
    }

    /// First unclaimed order of the same kind, in id order.
    pub fn get_unclaimed(&self, kind: &WorkOrderKind) -> Option<&WorkOrder> {
        self.orders
            .values()
            .find(|o| !o.is_claimed() && o.kind.same_kind(kind))
    }

    /// All orders of the same kind, in id order.
    pub fn all_of_kind(&self, kind: &WorkOrderKind) -> Vec<&WorkOrder> {
        self.orders
            .values()
            .filter(|o| o.kind.same_kind(kind))
            .collect()
    }

    /// Unclaim every order held by the citizen. Used when a citizen is
    /// removed or changes employment.
    pub fn clear_claims_for(&mut self, citizen: CitizenId) {
        for order in self.orders.values_mut() {
            if order.claimed_by == Some(citizen) {
                order.claimed_by = None;
            }
        }
    }

    /// Slow-tick maintenance, run once per fulfill interval: sweep invalid
    /// orders, then offer unclaimed orders to idle employed citizens in id
    /// order. An interval of 0 disables maintenance.
    pub fn on_tick(
        &mut self,
        tick: u64,
        fulfill_interval: u64,
        buildings: &BTreeMap<BlockPos, Building>,
        citizens: &BTreeMap<CitizenId, CitizenData>,
    ) {
        if fulfill_interval == 0 || tick % fulfill_interval != 0 {
            return;
        }

        self.orders.retain(|_, o| o.kind.is_valid(buildings));

        let mut claimed: Vec<CitizenId> = self
            .orders
            .values()
            .filter_map(|o| o.claimed_by)
            .collect();

        for order in self.orders.values_mut() {
            if order.is_claimed() {
                continue;
            }
            let taker = citizens
                .values()
                .find(|c| c.work_building.is_some() && !claimed.contains(&c.id));
            if let Some(citizen) = taker {
                order.claimed_by = Some(citizen.id);
                claimed.push(citizen.id);
            }
        }
    }

    /// Post-load failsafe: drop claims naming citizens that no longer
    /// exist, and restore the id counter from the live orders.
    pub fn validate_claims(&mut self, citizens: &BTreeMap<CitizenId, CitizenData>) {
        for order in self.orders.values_mut() {
            if let Some(claimant) = order.claimed_by
                && !citizens.contains_key(&claimant)
            {
                log::warn!("work order {} claimed by missing {claimant}, clearing", order.id);
                order.claimed_by = None;
            }
            self.top_id = self.top_id.max(order.id.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ColonyConfig;
    use homestead_prng::ColonyRng;

    fn build_order(x: i32) -> WorkOrder {
        WorkOrder::new(WorkOrderKind::Build {
            site: BlockPos::new(x, 1, 0),
            level: 1,
        })
    }

    fn citizen(id: u32, work: Option<BlockPos>, config: &ColonyConfig) -> CitizenData {
        let mut rng = ColonyRng::new(u64::from(id));
        let mut c = CitizenData::generate(CitizenId(id), BlockPos::new(0, 1, 0), &mut rng, config);
        if let Some(pos) = work {
            c.work_building = Some(pos);
        }
        c
    }

    #[test]
    fn ids_are_fresh_monotonic_and_never_reused() {
        let mut queue = WorkOrderQueue::new();
        let a = queue.add(build_order(0));
        let b = queue.add(build_order(1));
        let c = queue.add(build_order(2));
        assert!(a < b && b < c);

        queue.remove(b);
        let d = queue.add(build_order(3));
        assert!(d > c);
    }

    #[test]
    fn get_build_rejects_kind_mismatch() {
        let mut queue = WorkOrderQueue::new();
        let restock = queue.add(WorkOrder::new(WorkOrderKind::Restock {
            building: BlockPos::new(0, 1, 0),
        }));
        let build = queue.add(build_order(1));
        assert!(queue.get_build(restock).is_none());
        assert!(queue.get_build(build).is_some());
        assert!(queue.get_build(WorkOrderId(999)).is_none());
    }

    #[test]
    fn unclaimed_and_kind_filters() {
        let mut queue = WorkOrderQueue::new();
        let a = queue.add(build_order(0));
        let b = queue.add(build_order(1));
        queue.add(WorkOrder::new(WorkOrderKind::Restock {
            building: BlockPos::new(0, 1, 0),
        }));

        let probe = WorkOrderKind::Build {
            site: BlockPos::new(0, 0, 0),
            level: 1,
        };
        assert_eq!(queue.all_of_kind(&probe).len(), 2);

        // Claim the first; the unclaimed lookup skips to the second.
        if let Some(order) = queue.orders.get_mut(&a) {
            order.claimed_by = Some(CitizenId(7));
        }
        assert_eq!(queue.get_unclaimed(&probe).map(|o| o.id), Some(b));
    }

    #[test]
    fn clear_claims_leaves_no_orders_for_citizen() {
        let mut queue = WorkOrderQueue::new();
        for x in 0..4 {
            let id = queue.add(build_order(x));
            if let Some(order) = queue.orders.get_mut(&id) {
                order.claimed_by = Some(CitizenId(if x % 2 == 0 { 1 } else { 2 }));
            }
        }
        queue.clear_claims_for(CitizenId(1));
        assert!(queue.orders.values().all(|o| o.claimed_by != Some(CitizenId(1))));
        assert!(queue.orders.values().any(|o| o.claimed_by == Some(CitizenId(2))));
    }

    #[test]
    fn sweep_runs_on_the_fulfill_interval_only() {
        let mut queue = WorkOrderQueue::new();
        let site = BlockPos::new(2, 1, 0);
        queue.add(WorkOrder::new(WorkOrderKind::Restock { building: site }));
        queue.add(build_order(5));

        // No buildings exist: the restock order is invalid, the build order
        // (fresh construction) survives. Off the interval nothing is swept.
        let buildings = BTreeMap::new();
        let citizens = BTreeMap::new();
        queue.on_tick(13, 20, &buildings, &citizens);
        assert_eq!(queue.len(), 2);

        queue.on_tick(20, 20, &buildings, &citizens);
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn fulfillment_claims_by_first_idle_citizen() {
        let config = ColonyConfig::default();
        let mut queue = WorkOrderQueue::new();
        let a = queue.add(build_order(0));
        let b = queue.add(build_order(1));

        let mut citizens = BTreeMap::new();
        // Citizen 1 is unemployed, 2 and 3 are employed.
        citizens.insert(CitizenId(1), citizen(1, None, &config));
        citizens.insert(CitizenId(2), citizen(2, Some(BlockPos::new(9, 1, 0)), &config));
        citizens.insert(CitizenId(3), citizen(3, Some(BlockPos::new(9, 1, 4)), &config));
        let buildings = BTreeMap::new();

        // Off-interval tick does nothing.
        queue.on_tick(13, 20, &buildings, &citizens);
        assert!(!queue.get(a).unwrap().is_claimed());

        queue.on_tick(20, 20, &buildings, &citizens);
        assert_eq!(queue.get(a).unwrap().claimed_by, Some(CitizenId(2)));
        assert_eq!(queue.get(b).unwrap().claimed_by, Some(CitizenId(3)));
    }

    #[test]
    fn validate_claims_clears_missing_citizens_and_restores_top_id() {
        let config = ColonyConfig::default();
        let mut queue = WorkOrderQueue::new();
        let a = queue.add(build_order(0));
        let b = queue.add(build_order(1));
        if let Some(order) = queue.orders.get_mut(&a) {
            order.claimed_by = Some(CitizenId(1));
        }
        if let Some(order) = queue.orders.get_mut(&b) {
            order.claimed_by = Some(CitizenId(99));
        }

        // Simulate a reload that lost the counter.
        queue.top_id = 0;

        let mut citizens = BTreeMap::new();
        citizens.insert(CitizenId(1), citizen(1, None, &config));
        queue.validate_claims(&citizens);

        assert_eq!(queue.get(a).unwrap().claimed_by, Some(CitizenId(1)));
        assert_eq!(queue.get(b).unwrap().claimed_by, None);
        // New ids continue above the max live id.
        let c = queue.add(build_order(2));
        assert!(c > b);
    }
}
