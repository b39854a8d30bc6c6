// Citizen data: identity, attributes, employment, movement, inventory.
//
// A citizen is generated once (name, gender, attributes) from the colony
// PRNG and then lives entirely in simulation state. Employment is a link to
// a work building; holding one implies holding the matching job, and the
// colony keeps work-order claims consistent when the link changes.
//
// Double assignment of a home or work building is a caller bug, not a
// recoverable condition, and panics. Clearing and re-assigning is the
// supported way to move a citizen.
//
// Movement is a stored path cursor: `move_toward` walks one waypoint per
// tick, re-planning when the target changes or the current path runs out.
//
// **Critical constraint: determinism.** Generation draws from the colony
// PRNG in a fixed order; movement re-plans from grid state only.

use crate::config::ColonyConfig;
use crate::inventory::Inventory;
use crate::job::Job;
use crate::path_jobs::{MoveAwayJob, MoveToJob};
use crate::pathfinding::search;
use crate::types::{BlockPos, CitizenId};
use crate::world::BlockGrid;
use homestead_prng::ColonyRng;
use homestead_protocol::view::{CitizenView, ViewPos};
use serde::{Deserialize, Serialize};

/// A path being walked: target, waypoints, and the next waypoint index.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PathCursor {
    pub target: BlockPos,
    pub points: Vec<BlockPos>,
    pub next: usize,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CitizenData {
    pub id: CitizenId,
    pub name: String,
    pub female: bool,
    pub texture_id: u32,

    pub level: i32,
    pub experience: f64,
    pub health: f32,
    pub max_health: f32,

    pub strength: i32,
    pub endurance: i32,
    pub charisma: i32,
    pub intelligence: i32,
    pub dexterity: i32,

    pub home_building: Option<BlockPos>,
    pub work_building: Option<BlockPos>,

    pub pos: BlockPos,
    pub path: Option<PathCursor>,
    pub job: Option<Job>,
    pub inventory: Inventory,
}

impl CitizenData {
    /// Generate a fresh citizen at `pos`. Gender first, then name, then
    /// attributes; the draw order is part of the save-compatible contract.
    pub fn generate(
        id: CitizenId,
        pos: BlockPos,
        rng: &mut ColonyRng,
        config: &ColonyConfig,
    ) -> Self {
        let female = rng.chance(0.5);
        let first = if female {
            pick_name(rng, &config.female_first_names)
        } else {
            pick_name(rng, &config.male_first_names)
        };
        let middle = (b'A' + rng.range_usize(0, 26) as u8) as char;
        let last = pick_name(rng, &config.last_names);
        let name = format!("{first} {middle}. {last}");

        let cap = config.attribute_level_cap.max(2) as usize;
        // Attributes land in 1..cap so none is ever zero.
        let intelligence = rng.range_usize(1, cap) as i32;
        let charisma = rng.range_usize(1, cap) as i32;
        let strength = rng.range_usize(1, cap) as i32;
        let endurance = rng.range_usize(1, cap) as i32;
        let dexterity = rng.range_usize(1, cap) as i32;

        Self {
            id,
            name,
            female,
            texture_id: rng.next_u32(),
            level: 0,
            experience: 0.0,
            health: config.max_health,
            max_health: config.max_health,
            strength,
            endurance,
            charisma,
            intelligence,
            dexterity,
            home_building: None,
            work_building: None,
            pos,
            path: None,
            job: None,
            inventory: Inventory::new(config.citizen_inventory_size),
        }
    }

    pub fn add_experience(&mut self, xp: f64) {
        self.experience += xp;
    }

    pub fn increase_level(&mut self) {
        self.level += 1;
    }

    /// Set or clear the home building. Assigning over an existing,
    /// different home is a caller bug.
    pub fn set_home_building(&mut self, building: Option<BlockPos>) {
        if let (Some(current), Some(new)) = (self.home_building, building)
            && current != new
        {
            panic!("{} already has a home building at {current}", self.id);
        }
        self.home_building = building;
    }

    /// Set or clear the work building link. The caller (the colony) pairs
    /// this with job creation/removal and claim cleanup; see
    /// `Colony::assign_work` / `Colony::clear_work`.
    pub fn set_work_building(&mut self, building: Option<BlockPos>) {
        if let (Some(current), Some(new)) = (self.work_building, building)
            && current != new
        {
            panic!("{} already has a work building at {current}", self.id);
        }
        self.work_building = building;
    }

    /// Walk one step toward `target`. Returns true once the citizen stands
    /// within working distance. Re-plans when the target changes or the
    /// current path is exhausted; an unreachable target leaves the citizen
    /// in place and returns false.
    pub fn move_toward(
        &mut self,
        target: BlockPos,
        grid: &BlockGrid,
        config: &ColonyConfig,
    ) -> bool {
        let reach_sq = f64::from(config.site_stand_distance * config.site_stand_distance);
        if self.pos.distance_sq(target) <= reach_sq {
            self.path = None;
            return true;
        }

        let needs_plan = match &self.path {
            Some(cursor) => cursor.target != target || cursor.next >= cursor.points.len(),
            None => true,
        };
        if needs_plan {
            let mut job = MoveToJob::new(target, config.move_to_tie_breaker);
            let result = search(
                grid,
                self.pos,
                config.path_walk_range,
                config.path_max_expansions,
                &mut job,
            );
            if result.points.is_empty() {
                self.path = None;
                return false;
            }
            self.path = Some(PathCursor {
                target,
                points: result.points,
                next: 0,
            });
        }

        if let Some(cursor) = &mut self.path
            && cursor.next < cursor.points.len()
        {
            self.pos = cursor.points[cursor.next];
            cursor.next += 1;
        }

        if self.pos.distance_sq(target) <= reach_sq {
            self.path = None;
            true
        } else {
            false
        }
    }

    /// Walk one step away from `avoid` until the squared distance reaches
    /// `avoid_distance²`. Plans an escape path when none is in progress;
    /// returns true once the citizen stands far enough away. With nowhere
    /// to go the citizen stays put and returns false.
    pub fn move_away_from(
        &mut self,
        avoid: BlockPos,
        avoid_distance: u32,
        grid: &BlockGrid,
        config: &ColonyConfig,
    ) -> bool {
        let escaped_sq = f64::from(avoid_distance) * f64::from(avoid_distance);
        if self.pos.distance_sq(avoid) >= escaped_sq {
            self.path = None;
            return true;
        }

        let needs_plan = match &self.path {
            Some(cursor) => cursor.next >= cursor.points.len(),
            None => true,
        };
        if needs_plan {
            let mut job =
                MoveAwayJob::new(self.pos, avoid, avoid_distance, config.move_away_tie_breaker);
            let result = search(
                grid,
                self.pos,
                config.path_walk_range,
                config.path_max_expansions,
                &mut job,
            );
            let Some(&target) = result.points.last() else {
                self.path = None;
                return false;
            };
            self.path = Some(PathCursor {
                target,
                points: result.points,
                next: 0,
            });
        }

        if let Some(cursor) = &mut self.path
            && cursor.next < cursor.points.len()
        {
            self.pos = cursor.points[cursor.next];
            cursor.next += 1;
        }

        if self.pos.distance_sq(avoid) >= escaped_sq {
            self.path = None;
            true
        } else {
            false
        }
    }

    /// Project the public snapshot sent to viewers.
    pub fn view(&self) -> CitizenView {
        CitizenView {
            id: self.id.0,
            name: self.name.clone(),
            female: self.female,
            home_building: self.home_building.map(view_pos),
            work_building: self.work_building.map(view_pos),
            level: self.level,
            experience: self.experience,
            health: self.health,
            max_health: self.max_health,
            strength: self.strength,
            endurance: self.endurance,
            charisma: self.charisma,
            intelligence: self.intelligence,
            dexterity: self.dexterity,
            job_name: self
                .job
                .as_ref()
                .map(|j| j.kind.name().to_string())
                .unwrap_or_default(),
        }
    }
}

fn view_pos(pos: BlockPos) -> ViewPos {
    ViewPos {
        x: pos.x,
        y: pos.y,
        z: pos.z,
    }
}

fn pick_name<'a>(rng: &mut ColonyRng, names: &'a [String]) -> &'a str {
    if names.is_empty() {
        return "Settler";
    }
    &names[rng.range_usize(0, names.len())]
}
