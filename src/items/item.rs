//! Item definitions
//!
//! Items are flavor objects scattered through the realms. Templates live
//! in game data; picking one up clones its [`ItemDef`] into an inventory
//! stack.

use serde::{Deserialize, Serialize};

/// What picking up or using an item does.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ItemKind {
    /// Pure collectible. Sits in the inventory and looks pretty.
    Keepsake,
    /// Can be worn. One worn item at a time.
    Wearable,
    /// Consumed on use, restoring `heal` health.
    Consumable { heal: i32 },
}

/// A catalog entry for one item. `id` is the stacking key: two pickups
/// with the same id merge into one inventory slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    pub description: String,
    /// Icon asset reference for the UI. Opaque to the core.
    #[serde(default)]
    pub icon: String,
    pub kind: ItemKind,
}

impl ItemDef {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        description: impl Into<String>,
        kind: ItemKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: description.into(),
            icon: String::new(),
            kind,
        }
    }

    pub fn with_icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = icon.into();
        self
    }

    pub fn is_wearable(&self) -> bool {
        matches!(self.kind, ItemKind::Wearable)
    }

    pub fn is_consumable(&self) -> bool {
        matches!(self.kind, ItemKind::Consumable { .. })
    }

    /// Health restored when consumed. Zero for anything not consumable.
    pub fn heal_amount(&self) -> i32 {
        match self.kind {
            ItemKind::Consumable { heal } => heal,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_predicates() {
        let tape = ItemDef::new("tape", "Cassette Tape", "Side B is blank.", ItemKind::Keepsake);
        let shades = ItemDef::new("shades", "Chrome Shades", "", ItemKind::Wearable);
        let soda = ItemDef::new("soda", "Melon Soda", "", ItemKind::Consumable { heal: 10 });

        assert!(!tape.is_wearable() && !tape.is_consumable());
        assert!(shades.is_wearable());
        assert!(soda.is_consumable());
        assert_eq!(soda.heal_amount(), 10);
        assert_eq!(shades.heal_amount(), 0);
    }
}
