// Injected capabilities for cosmetic effects and player-facing messages.
//
// The worker routines emit swing animations, block-break particles, and
// item-shortage chat messages. None of those belong in this crate, and none
// may abort a tick. Hosts hand in trait objects; the defaults do nothing,
// so the simulation runs headless in tests and on servers.
//
// These are not serialized. Saves capture simulation state only; the host
// re-attaches its hooks after load.

use crate::types::{BlockPos, CitizenId};
use std::fmt;

/// Receiver for cosmetic world effects.
pub trait EffectSink {
    /// A worker swings at a block (animation cue, no world change).
    fn block_hit(&mut self, citizen: CitizenId, pos: BlockPos);

    /// A block breaks (particles/sound cue, world change already applied).
    fn block_break(&mut self, citizen: CitizenId, pos: BlockPos);
}

/// Receiver for player-facing notifications.
pub trait Notifier {
    /// A worker lacks items and wants them delivered.
    fn item_shortage(&mut self, citizen: CitizenId, message_key: &str, item_name: &str);
}

/// Effect sink that discards everything.
pub struct NullEffects;

impl EffectSink for NullEffects {
    fn block_hit(&mut self, _citizen: CitizenId, _pos: BlockPos) {}
    fn block_break(&mut self, _citizen: CitizenId, _pos: BlockPos) {}
}

/// Notifier that discards everything.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn item_shortage(&mut self, _citizen: CitizenId, _message_key: &str, _item_name: &str) {}
}

/// The capability bundle a tick runs with.
pub struct Hooks {
    pub effects: Box<dyn EffectSink>,
    pub notifier: Box<dyn Notifier>,
}

impl Default for Hooks {
    fn default() -> Self {
        Self {
            effects: Box::new(NullEffects),
            notifier: Box::new(NullNotifier),
        }
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks").finish_non_exhaustive()
    }
}
