//! Realm definitions
//!
//! A realm is a self-contained scene: a spawn point, two population
//! grids, and the residents standing on them. Templates reference
//! dialogue scripts and quiz banks by id; the cross-references are
//! checked when data loads.

use serde::{Deserialize, Serialize};

use crate::math::Vec3;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NpcTemplate {
    pub name: String,
    /// Dialogue script id.
    pub script: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FoeTemplate {
    pub name: String,
    /// Quiz bank id.
    pub quiz: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RealmDef {
    pub name: String,
    /// Sky gradient id, pure flavor for the stage.
    pub sky: String,
    #[serde(default)]
    pub spawn: Vec3,
    pub npc_origin: Vec3,
    pub foe_origin: Vec3,
    /// Grid spacing between neighbors, world units.
    pub spacing: f32,
    pub npcs: Vec<NpcTemplate>,
    pub foes: Vec<FoeTemplate>,
}

/// Collection of realms, indexed by position.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RealmCatalog {
    pub realms: Vec<RealmDef>,
}

impl RealmCatalog {
    pub fn get(&self, index: usize) -> Option<&RealmDef> {
        self.realms.get(index)
    }

    pub fn len(&self) -> usize {
        self.realms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.realms.is_empty()
    }
}

/// Create default realms (hardcoded fallback)
pub fn default_realms() -> RealmCatalog {
    fn npc(name: &str, script: &str) -> NpcTemplate {
        NpcTemplate {
            name: name.to_string(),
            script: script.to_string(),
        }
    }
    fn foe(name: &str, quiz: &str) -> FoeTemplate {
        FoeTemplate {
            name: name.to_string(),
            quiz: quiz.to_string(),
        }
    }

    RealmCatalog {
        realms: vec![
            RealmDef {
                name: "Mirror Beach".to_string(),
                sky: "pink-dusk".to_string(),
                spawn: Vec3::new(0.0, 0.0, 8.0),
                npc_origin: Vec3::new(-5.0, 0.0, -6.0),
                foe_origin: Vec3::new(6.0, 0.0, -14.0),
                spacing: 3.0,
                npcs: vec![
                    npc("Shore Greeter", "beach-greeter"),
                    npc("Boardwalk Poet", "plaza-poet"),
                ],
                foes: vec![
                    foe("Tidewatcher", "synth-basics"),
                    foe("Kiosk Shade", "mall-history"),
                ],
            },
            RealmDef {
                name: "Neon Arcade".to_string(),
                sky: "grid-violet".to_string(),
                spawn: Vec3::new(0.0, 0.0, 10.0),
                npc_origin: Vec3::new(-8.0, 0.0, -4.0),
                foe_origin: Vec3::new(-4.0, 0.0, -10.0),
                spacing: 3.0,
                npcs: vec![npc("Token Clerk", "arcade-clerk")],
                foes: vec![
                    foe("Cabinet Wraith", "arcade-lore"),
                    foe("High Score Ghost", "arcade-lore"),
                    foe("Crt Phantom", "synth-basics"),
                    foe("Coin-Op Specter", "arcade-lore"),
                    foe("Attract Mode", "mall-history"),
                ],
            },
            RealmDef {
                name: "Galleria Atrium".to_string(),
                sky: "teal-noon".to_string(),
                spawn: Vec3::new(0.0, 0.0, 12.0),
                npc_origin: Vec3::new(-6.0, 0.0, -8.0),
                foe_origin: Vec3::new(6.0, 0.0, -8.0),
                spacing: 3.0,
                npcs: vec![
                    npc("Fountain Keeper", "beach-greeter"),
                    npc("Escalator Poet", "plaza-poet"),
                    npc("Directory Spirit", "arcade-clerk"),
                ],
                foes: vec![
                    foe("Food Court Echo", "mall-history"),
                    foe("Skylight Gleam", "synth-basics"),
                    foe("Closing Announcement", "mall-history"),
                ],
            },
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_shape() {
        let catalog = default_realms();
        assert_eq!(catalog.len(), 3);
        assert_eq!(catalog.get(1).unwrap().name, "Neon Arcade");
        assert_eq!(catalog.get(1).unwrap().foes.len(), 5);
        assert!(catalog.get(9).is_none());
    }
}
