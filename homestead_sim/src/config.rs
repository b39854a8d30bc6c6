// Colony tunables.
//
// Every constant the worker routines, path jobs, and queue maintenance
// consult lives here so scenarios can reshape behavior without code edits.
// Defaults reproduce the baseline game balance.
//
// Two oddities are kept on purpose:
//   - the per-variant path tie-breakers differ (move jobs ~1.001, resource
//     finder ~0.501) and must stay independent;
//   - `min_resource_separation_sq` / `max_resource_range_sq` are compared
//     against *squared* distances, so the effective radii are sqrt(40) ≈ 6.3
//     and sqrt(250) ≈ 15.8 cells. Changing them to linear distances would
//     silently rebalance resource discovery.

use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    // Farm field scanning.
    pub farm_radius_base: i32,
    pub farm_radius_per_level: i32,

    // Farmer stage delays, in ticks (20 ticks = 1 simulated second).
    pub make_land_delay: u32,
    pub plant_delay: u32,
    pub harvest_delay: u32,
    pub need_seeds_delay: u32,
    /// Re-announce interval for unresolved item shortages.
    pub shortage_announce_delay: u32,

    /// Random block ticks per step that can mature a crop.
    pub crop_growth_samples: u32,

    /// Harvests before the farmer walks produce back to the farm.
    pub harvest_limit: u32,
    /// Deferred-crop backlog that forces a harvesting detour.
    pub crop_backlog_limit: usize,

    // Fisherman.
    pub fish_catch_chance: f64,
    pub fish_catch_limit: u32,
    pub fishing_delay: u32,
    /// Back-off before retrying a failed water search.
    pub water_search_delay: u32,

    // Path search.
    pub path_walk_range: u32,
    pub path_max_expansions: u32,
    pub move_to_tie_breaker: f32,
    pub move_away_tie_breaker: f32,
    pub find_resource_tie_breaker: f32,
    /// Squared minimum separation between discovered resource spots.
    pub min_resource_separation_sq: f64,
    /// Squared maximum range of resource discovery from the work site.
    pub max_resource_range_sq: f64,
    /// How close a worker must stand to a block to operate on it.
    pub site_stand_distance: u32,

    // Work order queue.
    pub work_order_fulfill_interval: u64,

    // Citizens.
    pub attribute_level_cap: u32,
    pub max_health: f32,
    pub citizen_inventory_size: usize,
    pub building_storage_size: usize,
    pub male_first_names: Vec<String>,
    pub female_first_names: Vec<String>,
    pub last_names: Vec<String>,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            farm_radius_base: 3,
            farm_radius_per_level: 1,
            make_land_delay: 20,
            plant_delay: 10,
            harvest_delay: 10,
            need_seeds_delay: 200,
            shortage_announce_delay: 50,
            crop_growth_samples: 3,
            harvest_limit: 15,
            crop_backlog_limit: 10,
            fish_catch_chance: 0.05,
            fish_catch_limit: 10,
            fishing_delay: 10,
            water_search_delay: 100,
            path_walk_range: 128,
            path_max_expansions: 5000,
            move_to_tie_breaker: 1.001,
            move_away_tie_breaker: 1.001,
            find_resource_tie_breaker: 0.501,
            min_resource_separation_sq: 40.0,
            max_resource_range_sq: 250.0,
            site_stand_distance: 2,
            work_order_fulfill_interval: 20,
            attribute_level_cap: 5,
            max_health: 20.0,
            citizen_inventory_size: 27,
            building_storage_size: 27,
            male_first_names: default_names(&[
                "Aaron", "Bernard", "Cedric", "Declan", "Edwin", "Felix", "Gregor", "Harold",
                "Ivan", "Jonas", "Klaus", "Lionel", "Marcus", "Niall", "Oscar", "Peter",
            ]),
            female_first_names: default_names(&[
                "Ada", "Beatrice", "Clara", "Dora", "Edith", "Freya", "Greta", "Hazel", "Ingrid",
                "Jane", "Klara", "Lena", "Mara", "Nora", "Olive", "Petra",
            ]),
            last_names: default_names(&[
                "Ashdown", "Briggs", "Cartwright", "Dunmore", "Ellery", "Fairbairn", "Garrick",
                "Holloway", "Irons", "Jessop", "Kirkwood", "Lockhart", "Marsh", "Norwood",
                "Oakes", "Pembroke",
            ]),
        }
    }
}

fn default_names(names: &[&str]) -> Vec<String> {
    names.iter().map(|s| (*s).to_string()).collect()
}

impl ColonyConfig {
    /// Field radius a farm of the given level works.
    pub fn farm_radius(&self, level: u32) -> i32 {
        self.farm_radius_base + self.farm_radius_per_level * level as i32
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
