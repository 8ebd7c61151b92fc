//! Inventory
//!
//! A fixed number of slots, one stack per item id. Adding an item the
//! player already holds grows its stack instead of taking a new slot, so
//! the slot cap only bites on distinct items. Every mutation either fully
//! applies or fully fails; a rejected add leaves the inventory exactly as
//! it was.
//!
//! The inventory is silent. It reports what changed through return values
//! and the session layer turns those into bus events.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::item::ItemDef;

#[derive(Debug, Error, PartialEq)]
pub enum InventoryError {
    #[error("inventory is full ({0} slots)")]
    Full(usize),
    #[error("no item '{0}' in inventory")]
    Missing(String),
    #[error("only {have} of '{id}' held, tried to remove {want}")]
    ShortCount { id: String, have: u32, want: u32 },
    #[error("item '{0}' cannot be worn")]
    NotWearable(String),
    #[error("no slot {0}")]
    BadSlot(usize),
}

/// One occupied slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemStack {
    pub def: ItemDef,
    pub count: u32,
}

/// The player's item collection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inventory {
    slots: Vec<ItemStack>,
    capacity: usize,
    /// Index into `slots`, if anything is highlighted.
    selected: Option<usize>,
    /// Id of the worn item, if any. Always present in `slots`.
    worn: Option<String>,
}

impl Inventory {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: Vec::new(),
            capacity,
            selected: None,
            worn: None,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    pub fn is_full(&self) -> bool {
        self.slots.len() >= self.capacity
    }

    pub fn slots(&self) -> &[ItemStack] {
        &self.slots
    }

    pub fn count_of(&self, id: &str) -> u32 {
        self.slots
            .iter()
            .find(|s| s.def.id == id)
            .map_or(0, |s| s.count)
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_stack(&self) -> Option<&ItemStack> {
        self.selected.and_then(|i| self.slots.get(i))
    }

    pub fn worn_id(&self) -> Option<&str> {
        self.worn.as_deref()
    }

    /// Add `count` of an item. Merges into an existing stack when the id
    /// is already held; otherwise takes a fresh slot. Returns the stack
    /// size after the merge.
    pub fn add(&mut self, def: ItemDef, count: u32) -> Result<u32, InventoryError> {
        if let Some(stack) = self.slots.iter_mut().find(|s| s.def.id == def.id) {
            stack.count += count;
            return Ok(stack.count);
        }
        if self.is_full() {
            return Err(InventoryError::Full(self.capacity));
        }
        self.slots.push(ItemStack { def, count });
        Ok(count)
    }

    /// Remove `count` of item `id`. Returns how many remain. A stack
    /// drained to zero frees its slot; selection and the worn marker are
    /// fixed up when that slot goes away.
    pub fn remove(&mut self, id: &str, count: u32) -> Result<u32, InventoryError> {
        let index = self
            .slots
            .iter()
            .position(|s| s.def.id == id)
            .ok_or_else(|| InventoryError::Missing(id.to_string()))?;
        let have = self.slots[index].count;
        if have < count {
            return Err(InventoryError::ShortCount {
                id: id.to_string(),
                have,
                want: count,
            });
        }
        let remaining = have - count;
        if remaining > 0 {
            self.slots[index].count = remaining;
            return Ok(remaining);
        }
        self.slots.remove(index);
        self.selected = match self.selected {
            Some(sel) if sel == index => None,
            Some(sel) if sel > index => Some(sel - 1),
            other => other,
        };
        if self.worn.as_deref() == Some(id) {
            self.worn = None;
        }
        Ok(0)
    }

    /// Highlight the stack at `index`.
    pub fn select(&mut self, index: usize) -> Result<&ItemStack, InventoryError> {
        if index >= self.slots.len() {
            return Err(InventoryError::BadSlot(index));
        }
        self.selected = Some(index);
        Ok(&self.slots[index])
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    /// Wear item `id`. Replaces whatever was worn; the caller learns the
    /// displaced id from the return value.
    pub fn wear(&mut self, id: &str) -> Result<Option<String>, InventoryError> {
        let stack = self
            .slots
            .iter()
            .find(|s| s.def.id == id)
            .ok_or_else(|| InventoryError::Missing(id.to_string()))?;
        if !stack.def.is_wearable() {
            return Err(InventoryError::NotWearable(id.to_string()));
        }
        let previous = self.worn.take();
        self.worn = Some(id.to_string());
        Ok(previous.filter(|p| p != id))
    }

    /// Take off the worn item, returning its id.
    pub fn take_off(&mut self) -> Option<String> {
        self.worn.take()
    }
}
