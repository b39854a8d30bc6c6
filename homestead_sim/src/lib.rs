// homestead_sim — pure Rust colony worker simulation library.
//
// This crate contains all simulation logic for Homestead's villagers: the
// block grid they work in, pathfinding, the work order queue, the worker
// job state machines, and colony-level orchestration. It has zero engine
// dependencies and can be tested and run headless.
//
// Module overview:
// - `colony.rs`:      Top-level Colony state, tick loop, persistence.
// - `world.rs`:       Dense 3D block grid (the spatial query interface).
// - `pathfinding.rs`: Best-first search engine over the grid, arena nodes.
// - `path_jobs.rs`:   Search specializations — move-to, move-away, find-resource.
// - `workorders.rs`:  Work order queue with monotonic ids and claim tracking.
// - `job.rs`:         Per-citizen job shell — delays, item needs, tool gating.
// - `farmer.rs`:      Farmer stage machine (scan, till, plant, harvest).
// - `fisherman.rs`:   Fisherman stage machine (find water, fish, unload).
// - `citizen.rs`:     Citizen data — identity, attributes, movement, view.
// - `building.rs`:    Homes and work sites with on-site storage.
// - `inventory.rs`:   Bounded slot container shared by citizens and buildings.
// - `hooks.rs`:       Injected effect/notification capabilities (no-op by default).
// - `config.rs`:      ColonyConfig — every tunable the sim consults.
// - `prng`:           Re-exported from `homestead_prng` — xoshiro256++ PRNG with SplitMix64 seeding.
// - `types.rs`:       BlockPos, entity ids, block/item taxonomy.
//
// The companion crate `homestead_protocol` carries the citizen view codec;
// hosts serialize snapshots from `Colony::citizen_view` over its framing.
//
// **Critical constraint: determinism.** The simulation is a pure function
// of state and grid. All randomness comes from a seeded xoshiro256++ PRNG
// (re-exported from `homestead_prng`). No `HashMap` in iteration-order-
// sensitive state, no system time, no OS entropy. Use `BTreeMap` for
// ordered collections.

pub mod building;
pub mod citizen;
pub mod colony;
pub mod config;
pub mod farmer;
pub mod fisherman;
pub mod hooks;
pub mod inventory;
pub mod job;
pub mod path_jobs;
pub mod pathfinding;
pub use homestead_prng as prng;
pub mod types;
pub mod workorders;
pub mod world;
