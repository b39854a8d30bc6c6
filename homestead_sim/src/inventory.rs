// Bounded slot container for citizen inventories and work-site storage.
//
// Slots hold `Option<ItemStack>`; adding merges into existing stacks of the
// same kind up to `MAX_STACK`, then fills the first empty slot, and returns
// whatever did not fit. Workers query by predicate (`first_slot_where`) so
// the farming and fishing routines can find seeds or tools without caring
// about slot layout.

use crate::types::{ItemKind, ItemStack, ToolClass};
use serde::{Deserialize, Serialize};

/// Largest count a single slot holds.
pub const MAX_STACK: u32 = 64;

/// Fixed-size slot container.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<Option<ItemStack>>,
}

impl Inventory {
    pub fn new(size: usize) -> Self {
        Self {
            slots: vec![None; size],
        }
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }

    /// Whether every slot is occupied.
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(|s| s.is_some())
    }

    pub fn get(&self, slot: usize) -> Option<ItemStack> {
        self.slots.get(slot).copied().flatten()
    }

    pub fn set(&mut self, slot: usize, stack: Option<ItemStack>) {
        if let Some(s) = self.slots.get_mut(slot) {
            *s = stack.filter(|st| st.count > 0);
        }
    }

    /// Remove up to `n` items from a slot; clears the slot when it empties.
    /// Returns how many were actually removed.
    pub fn decrement(&mut self, slot: usize, n: u32) -> u32 {
        let Some(s) = self.slots.get_mut(slot) else {
            return 0;
        };
        let Some(stack) = s else {
            return 0;
        };
        let removed = stack.count.min(n);
        stack.count -= removed;
        if stack.count == 0 {
            *s = None;
        }
        removed
    }

    /// Add a stack: merge into same-kind slots first, then the first empty
    /// slot. Returns the remainder that did not fit, if any.
    pub fn add(&mut self, stack: ItemStack) -> Option<ItemStack> {
        let mut remaining = stack.count;
        if remaining == 0 {
            return None;
        }

        for slot in self.slots.iter_mut().flatten() {
            if slot.kind == stack.kind && slot.count < MAX_STACK {
                let space = MAX_STACK - slot.count;
                let moved = space.min(remaining);
                slot.count += moved;
                remaining -= moved;
                if remaining == 0 {
                    return None;
                }
            }
        }

        for slot in &mut self.slots {
            if slot.is_none() {
                let moved = MAX_STACK.min(remaining);
                *slot = Some(ItemStack::new(stack.kind, moved));
                remaining -= moved;
                if remaining == 0 {
                    return None;
                }
            }
        }

        Some(ItemStack::new(stack.kind, remaining))
    }

    /// First slot whose stack satisfies the predicate.
    pub fn first_slot_where(&self, mut pred: impl FnMut(&ItemStack) -> bool) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|st| pred(st)))
    }

    pub fn contains(&self, kind: ItemKind) -> bool {
        self.first_slot_where(|s| s.kind == kind).is_some()
    }

    /// Total count of a kind across all slots.
    pub fn count(&self, kind: ItemKind) -> u32 {
        self.slots
            .iter()
            .flatten()
            .filter(|s| s.kind == kind)
            .map(|s| s.count)
            .sum()
    }

    pub fn has_tool(&self, class: ToolClass) -> bool {
        self.first_slot_where(|s| s.kind.tool_class() == Some(class))
            .is_some()
    }

    /// Move every non-tool stack into `target`; stacks that do not fit stay
    /// behind. Used when a worker unloads at their work site.
    pub fn dump_non_tools_into(&mut self, target: &mut Inventory) {
        for slot in &mut self.slots {
            if let Some(stack) = *slot
                && !stack.kind.is_tool()
            {
                *slot = target.add(stack);
            }
        }
    }
}
