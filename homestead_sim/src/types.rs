// Core types shared across the colony simulation.
//
// Defines grid coordinates (`BlockPos`), entity identifiers (integer
// newtypes), and the block/item taxonomy the worker routines operate on.
// Everything derives `Serialize`/`Deserialize` for save/load.
//
// Work-order and citizen ids are plain monotonic integers rather than UUIDs:
// they are colony-local, assigned by the colony itself, and must survive
// save/load without a randomness source.
//
// **Critical constraint: determinism.** Ids are assigned sequentially in
// simulation order. No OS entropy, no system time.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// A position in the 3D block grid. Y is up.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BlockPos {
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl BlockPos {
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Offset by a delta on each axis.
    pub const fn offset(self, dx: i32, dy: i32, dz: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.z + dz)
    }

    /// The cell directly below.
    pub const fn down(self) -> Self {
        self.offset(0, -1, 0)
    }

    /// The cell directly above.
    pub const fn up(self) -> Self {
        self.offset(0, 1, 0)
    }

    /// Manhattan distance between two positions.
    pub fn manhattan_distance(self, other: Self) -> u32 {
        (self.x - other.x).unsigned_abs()
            + (self.y - other.y).unsigned_abs()
            + (self.z - other.z).unsigned_abs()
    }

    /// Squared Euclidean distance, in f64 like the original engine's
    /// `distanceSq`. Used for resource-separation and move-away checks.
    pub fn distance_sq(self, other: Self) -> f64 {
        let dx = f64::from(self.x - other.x);
        let dy = f64::from(self.y - other.y);
        let dz = f64::from(self.z - other.z);
        dx * dx + dy * dy + dz * dz
    }
}

impl fmt::Display for BlockPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

// ---------------------------------------------------------------------------
// Entity ids
// ---------------------------------------------------------------------------

/// Colony-local citizen id. Assigned sequentially by the colony.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CitizenId(pub u32);

impl fmt::Display for CitizenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "citizen#{}", self.0)
    }
}

/// Work-order id. Zero means "not yet assigned" — the queue hands out
/// strictly increasing ids starting at 1 and never reuses one while live.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorkOrderId(pub u32);

impl fmt::Display for WorkOrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "order#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Block taxonomy
// ---------------------------------------------------------------------------

/// The crop varieties a farmer can plant and harvest.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CropKind {
    Wheat,
    Pumpkin,
    Melon,
    Potato,
    Carrot,
}

/// The material of a single cell in the block grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockKind {
    Air,
    Dirt,
    Grass,
    Stone,
    Water,
    /// Tilled soil a crop can be planted on.
    Farmland,
    /// A growing or mature crop sitting on farmland.
    Crop { crop: CropKind, mature: bool },
}

impl BlockKind {
    /// Whether this block can serve as a floor to stand on.
    pub fn is_solid(self) -> bool {
        matches!(
            self,
            Self::Dirt | Self::Grass | Self::Stone | Self::Farmland
        )
    }

    /// Whether a farmer can till this block into farmland.
    pub fn is_tillable(self) -> bool {
        matches!(self, Self::Dirt | Self::Grass)
    }
}

impl Default for BlockKind {
    fn default() -> Self {
        Self::Air
    }
}

// ---------------------------------------------------------------------------
// Item taxonomy
// ---------------------------------------------------------------------------

/// Tool categories workers require for their job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolClass {
    Hoe,
    Shovel,
    FishingRod,
}

impl ToolClass {
    /// The item a worker requests when this tool class is missing.
    pub fn default_item(self) -> ItemKind {
        match self {
            Self::Hoe => ItemKind::IronHoe,
            Self::Shovel => ItemKind::IronShovel,
            Self::FishingRod => ItemKind::FishingRod,
        }
    }
}

/// The item catalog the worker routines touch.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ItemKind {
    // Seeds (anything a farmer can put in the ground).
    WheatSeeds,
    PumpkinSeeds,
    MelonSeeds,
    Potato,
    Carrot,
    // Produce.
    Wheat,
    Pumpkin,
    Melon,
    RawFish,
    // Tools.
    IronHoe,
    IronShovel,
    FishingRod,
}

impl ItemKind {
    pub fn is_seed(self) -> bool {
        matches!(
            self,
            Self::WheatSeeds | Self::PumpkinSeeds | Self::MelonSeeds | Self::Potato | Self::Carrot
        )
    }

    pub fn is_tool(self) -> bool {
        self.tool_class().is_some()
    }

    pub fn tool_class(self) -> Option<ToolClass> {
        match self {
            Self::IronHoe => Some(ToolClass::Hoe),
            Self::IronShovel => Some(ToolClass::Shovel),
            Self::FishingRod => Some(ToolClass::FishingRod),
            _ => None,
        }
    }

    /// The 5-way seed → planted-crop mapping.
    pub fn crop_for_seed(self) -> Option<CropKind> {
        match self {
            Self::WheatSeeds => Some(CropKind::Wheat),
            Self::PumpkinSeeds => Some(CropKind::Pumpkin),
            Self::MelonSeeds => Some(CropKind::Melon),
            Self::Potato => Some(CropKind::Potato),
            Self::Carrot => Some(CropKind::Carrot),
            _ => None,
        }
    }

    /// Human-readable name for shortage messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Self::WheatSeeds => "wheat seeds",
            Self::PumpkinSeeds => "pumpkin seeds",
            Self::MelonSeeds => "melon seeds",
            Self::Potato => "potato",
            Self::Carrot => "carrot",
            Self::Wheat => "wheat",
            Self::Pumpkin => "pumpkin",
            Self::Melon => "melon",
            Self::RawFish => "raw fish",
            Self::IronHoe => "iron hoe",
            Self::IronShovel => "iron shovel",
            Self::FishingRod => "fishing rod",
        }
    }
}

impl CropKind {
    /// What a mature crop drops when harvested: the produce plus a seed to
    /// replant. Potatoes and carrots are their own seed, so they drop two.
    pub fn drops(self) -> [ItemStack; 2] {
        match self {
            Self::Wheat => [
                ItemStack::new(ItemKind::Wheat, 1),
                ItemStack::new(ItemKind::WheatSeeds, 1),
            ],
            Self::Pumpkin => [
                ItemStack::new(ItemKind::Pumpkin, 1),
                ItemStack::new(ItemKind::PumpkinSeeds, 1),
            ],
            Self::Melon => [
                ItemStack::new(ItemKind::Melon, 1),
                ItemStack::new(ItemKind::MelonSeeds, 1),
            ],
            Self::Potato => [
                ItemStack::new(ItemKind::Potato, 1),
                ItemStack::new(ItemKind::Potato, 1),
            ],
            Self::Carrot => [
                ItemStack::new(ItemKind::Carrot, 1),
                ItemStack::new(ItemKind::Carrot, 1),
            ],
        }
    }
}

/// A countable pile of one item kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemStack {
    pub kind: ItemKind,
    pub count: u32,
}

impl ItemStack {
    pub const fn new(kind: ItemKind, count: u32) -> Self {
        Self { kind, count }
    }
}
