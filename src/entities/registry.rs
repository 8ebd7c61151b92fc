//! Entity registry
//!
//! Owns the `hecs` world holding every realm resident plus an id index
//! over it. A realm change is a full rebuild: release every stage avatar,
//! clear the world, spawn the new realm's population from its templates.
//! Rebuilding is the only way residents enter or leave, which keeps the
//! id index and the stage in lockstep with the world.

use std::collections::HashMap;

use hecs::{Entity, World};

use crate::data::realms::RealmDef;
use crate::math::Vec3;
use crate::stage::{RenderHandle, Stage};

use super::components::{Avatar, Awareness, EntityId, Foe, Identity, Name, Npc, Position};

/// Residents stand in rows of five.
pub const GRID_COLUMNS: usize = 5;

/// Where resident `index` stands on its kind's grid.
pub fn grid_position(origin: Vec3, spacing: f32, index: usize) -> Vec3 {
    let row = index / GRID_COLUMNS;
    let col = index % GRID_COLUMNS;
    Vec3::new(
        origin.x + col as f32 * spacing,
        origin.y,
        origin.z + row as f32 * spacing,
    )
}

/// What a rebuild produced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildReport {
    pub npcs: usize,
    pub foes: usize,
    /// Residents not created because the stage refused their avatar.
    pub avatar_failures: usize,
}

pub struct EntityRegistry {
    world: World,
    by_id: HashMap<EntityId, Entity>,
    realm: usize,
}

impl Default for EntityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityRegistry {
    pub fn new() -> Self {
        Self {
            world: World::new(),
            by_id: HashMap::new(),
            realm: 0,
        }
    }

    pub fn realm(&self) -> usize {
        self.realm
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn entity(&self, id: &EntityId) -> Option<Entity> {
        self.by_id.get(id).copied()
    }

    pub fn contains(&self, id: &EntityId) -> bool {
        self.by_id.contains_key(id)
    }

    pub fn population(&self) -> usize {
        self.by_id.len()
    }

    pub fn npc_count(&self) -> usize {
        self.world.query::<&Npc>().iter().count()
    }

    pub fn foe_count(&self) -> usize {
        self.world.query::<&Foe>().iter().count()
    }

    pub fn position_of(&self, id: &EntityId) -> Option<Vec3> {
        let entity = self.entity(id)?;
        self.world.get::<&Position>(entity).ok().map(|p| p.0)
    }

    pub fn avatar_of(&self, id: &EntityId) -> Option<RenderHandle> {
        let entity = self.entity(id)?;
        self.world.get::<&Avatar>(entity).ok().map(|a| a.0)
    }

    pub fn name_of(&self, id: &EntityId) -> Option<String> {
        let entity = self.entity(id)?;
        self.world.get::<&Name>(entity).ok().map(|n| n.0.clone())
    }

    /// Record a foe as beaten for the rest of this realm session.
    pub fn mark_defeated(&mut self, id: &EntityId) -> bool {
        let Some(entity) = self.entity(id) else {
            return false;
        };
        match self.world.get::<&mut Foe>(entity) {
            Ok(mut foe) => {
                foe.defeated = true;
                true
            }
            Err(_) => false,
        }
    }

    pub fn is_defeated(&self, id: &EntityId) -> bool {
        self.entity(id)
            .and_then(|e| self.world.get::<&Foe>(e).ok().map(|f| f.defeated))
            .unwrap_or(false)
    }

    /// Tear down the current population and spawn `def`'s residents.
    ///
    /// Old avatars are released before the world clears so the stage
    /// never holds a handle to a resident that no longer exists. A
    /// refused avatar skips that resident entirely; no record exists
    /// without its visual.
    pub fn rebuild(
        &mut self,
        realm_index: usize,
        def: &RealmDef,
        stage: &mut dyn Stage,
    ) -> RebuildReport {
        self.release_avatars(stage);
        self.world.clear();
        self.by_id.clear();
        self.realm = realm_index;

        let mut report = RebuildReport::default();
        for (index, template) in def.npcs.iter().enumerate() {
            let id = EntityId::npc(realm_index, index);
            let position = grid_position(def.npc_origin, def.spacing, index);
            let Some(handle) = Self::spawn_avatar(stage, &id, position, &mut report) else {
                continue;
            };
            let entity = self.world.spawn((
                Identity(id.clone()),
                Name(template.name.clone()),
                Position(position),
                Awareness::default(),
                Npc {
                    script: template.script.clone(),
                },
                Avatar(handle),
            ));
            self.by_id.insert(id, entity);
            report.npcs += 1;
        }
        for (index, template) in def.foes.iter().enumerate() {
            let id = EntityId::foe(realm_index, index);
            let position = grid_position(def.foe_origin, def.spacing, index);
            let Some(handle) = Self::spawn_avatar(stage, &id, position, &mut report) else {
                continue;
            };
            let entity = self.world.spawn((
                Identity(id.clone()),
                Name(template.name.clone()),
                Position(position),
                Awareness::default(),
                Foe {
                    quiz: template.quiz.clone(),
                    defeated: false,
                },
                Avatar(handle),
            ));
            self.by_id.insert(id, entity);
            report.foes += 1;
        }

        log::info!(
            "realm {} '{}' populated: {} npc(s), {} foe(s), {} avatar failure(s)",
            realm_index,
            def.name,
            report.npcs,
            report.foes,
            report.avatar_failures
        );
        report
    }

    /// Release everything. Used on teardown.
    pub fn clear(&mut self, stage: &mut dyn Stage) {
        self.release_avatars(stage);
        self.world.clear();
        self.by_id.clear();
    }

    fn spawn_avatar(
        stage: &mut dyn Stage,
        id: &EntityId,
        position: Vec3,
        report: &mut RebuildReport,
    ) -> Option<RenderHandle> {
        match stage.create_avatar(&id.to_string(), position) {
            Ok(handle) => Some(handle),
            Err(e) => {
                log::warn!("{} not spawned: {}", id, e);
                report.avatar_failures += 1;
                None
            }
        }
    }

    fn release_avatars(&mut self, stage: &mut dyn Stage) {
        let handles: Vec<RenderHandle> = self
            .world
            .query::<&Avatar>()
            .iter()
            .map(|(_, avatar)| avatar.0)
            .collect();
        for handle in handles {
            if let Err(e) = stage.release(handle) {
                log::warn!("stale avatar release failed: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::realms::{FoeTemplate, NpcTemplate};
    use crate::stage::HeadlessStage;

    fn test_realm(npcs: usize, foes: usize) -> RealmDef {
        RealmDef {
            name: "Test Plaza".into(),
            sky: "dusk".into(),
            spawn: Vec3::new(0.0, 0.0, 8.0),
            npc_origin: Vec3::new(0.0, 0.0, 0.0),
            foe_origin: Vec3::new(0.0, 0.0, 20.0),
            spacing: 2.0,
            npcs: (0..npcs)
                .map(|i| NpcTemplate {
                    name: format!("Greeter {}", i),
                    script: "beach-greeter".into(),
                })
                .collect(),
            foes: (0..foes)
                .map(|i| FoeTemplate {
                    name: format!("Quizzer {}", i),
                    quiz: "synth-basics".into(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_grid_wraps_every_five() {
        let origin = Vec3::new(10.0, 0.0, 10.0);
        assert_eq!(grid_position(origin, 2.0, 0), Vec3::new(10.0, 0.0, 10.0));
        assert_eq!(grid_position(origin, 2.0, 2), Vec3::new(14.0, 0.0, 10.0));
        assert_eq!(grid_position(origin, 2.0, 5), Vec3::new(10.0, 0.0, 12.0));
        assert_eq!(grid_position(origin, 2.0, 7), Vec3::new(14.0, 0.0, 12.0));
    }

    #[test]
    fn test_rebuild_spawns_exact_population() {
        let mut registry = EntityRegistry::new();
        let mut stage = HeadlessStage::new();
        let report = registry.rebuild(1, &test_realm(2, 5), &mut stage);

        assert_eq!(
            report,
            RebuildReport {
                npcs: 2,
                foes: 5,
                avatar_failures: 0
            }
        );
        assert_eq!(registry.population(), 7);
        assert_eq!(registry.foe_count(), 5);
        assert_eq!(registry.npc_count(), 2);
        assert_eq!(
            stage.labels(),
            vec![
                "foe-1-0", "foe-1-1", "foe-1-2", "foe-1-3", "foe-1-4", "npc-1-0", "npc-1-1",
            ]
        );
    }

    #[test]
    fn test_rebuild_releases_previous_realm() {
        let mut registry = EntityRegistry::new();
        let mut stage = HeadlessStage::new();
        registry.rebuild(0, &test_realm(3, 2), &mut stage);
        assert_eq!(stage.live_count(), 5);

        registry.rebuild(2, &test_realm(1, 1), &mut stage);
        // No handle from realm 0 survives.
        assert_eq!(stage.live_count(), 2);
        assert_eq!(stage.labels(), vec!["foe-2-0", "npc-2-0"]);
        assert!(!registry.contains(&EntityId::npc(0, 0)));
        assert!(registry.contains(&EntityId::npc(2, 0)));
    }

    #[test]
    fn test_refused_creates_leave_no_partial_entity() {
        let mut registry = EntityRegistry::new();
        let mut stage = HeadlessStage::new();
        stage.refuse_creates(true);
        let report = registry.rebuild(0, &test_realm(1, 2), &mut stage);

        assert_eq!(report.avatar_failures, 3);
        assert_eq!(report.npcs, 0);
        assert_eq!(report.foes, 0);
        assert_eq!(stage.live_count(), 0);
        assert_eq!(registry.population(), 0);
        assert!(!registry.contains(&EntityId::foe(0, 1)));

        // A later rebuild against a recovered stage works normally.
        stage.refuse_creates(false);
        registry.rebuild(0, &test_realm(1, 2), &mut stage);
        assert_eq!(registry.population(), 3);
        assert!(registry.avatar_of(&EntityId::foe(0, 1)).is_some());
    }

    #[test]
    fn test_defeat_marker_survives_until_rebuild() {
        let mut registry = EntityRegistry::new();
        let mut stage = HeadlessStage::new();
        registry.rebuild(1, &test_realm(0, 2), &mut stage);

        let foe = EntityId::foe(1, 0);
        assert!(!registry.is_defeated(&foe));
        assert!(registry.mark_defeated(&foe));
        assert!(registry.is_defeated(&foe));

        registry.rebuild(1, &test_realm(0, 2), &mut stage);
        assert!(!registry.is_defeated(&foe));
    }

    #[test]
    fn test_positions_land_on_the_grid() {
        let mut registry = EntityRegistry::new();
        let mut stage = HeadlessStage::new();
        let def = test_realm(0, 7);
        registry.rebuild(0, &def, &mut stage);

        let sixth = registry.position_of(&EntityId::foe(0, 6)).unwrap();
        assert_eq!(sixth, grid_position(def.foe_origin, def.spacing, 6));
        assert_eq!(sixth, Vec3::new(2.0, 0.0, 22.0));
    }
}
