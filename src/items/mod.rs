//! Item system

pub mod inventory;
pub mod item;

pub use inventory::{Inventory, InventoryError, ItemStack};
pub use item::{ItemDef, ItemKind};
