// Buildings: homes and work sites.
//
// A building is a location in the grid, a kind, and on-site storage that
// workers dump produce into. Work buildings decide which job their worker
// runs and how large a field or how distant a pond the worker may use
// (radius grows with building level).

use crate::config::ColonyConfig;
use crate::inventory::Inventory;
use crate::job::JobKind;
use crate::types::BlockPos;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BuildingKind {
    Home,
    Farm { level: u32 },
    FishingHut { level: u32 },
}

impl BuildingKind {
    pub fn level(self) -> u32 {
        match self {
            Self::Home => 0,
            Self::Farm { level } | Self::FishingHut { level } => level,
        }
    }

    /// Whether citizens can be employed here.
    pub fn is_work_site(self) -> bool {
        !matches!(self, Self::Home)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Building {
    pub location: BlockPos,
    pub kind: BuildingKind,
    pub storage: Inventory,
}

impl Building {
    pub fn new(location: BlockPos, kind: BuildingKind, config: &ColonyConfig) -> Self {
        Self {
            location,
            kind,
            storage: Inventory::new(config.building_storage_size),
        }
    }

    /// The job a citizen employed at this building runs, if any.
    pub fn create_job(&self) -> Option<JobKind> {
        match self.kind {
            BuildingKind::Home => None,
            BuildingKind::Farm { .. } => Some(JobKind::new_farmer()),
            BuildingKind::FishingHut { .. } => Some(JobKind::new_fisherman()),
        }
    }

    /// Radius of the field a farm of this level works.
    pub fn farm_radius(&self, config: &ColonyConfig) -> i32 {
        config.farm_radius(self.kind.level())
    }
}
