use log::{debug, info};

use crate::config::SceneConfig;
use crate::entity::{EntityId, EntityKind, RenderableEntity, VisualTransform};
use crate::error::SceneError;
use crate::world::{BodyHandles, PhysicsWorld};

/// Immovable segment drawn as a line (the floor). Not an entity.
#[derive(Debug, Clone, Copy)]
pub struct StaticLine {
    pub handles: BodyHandles,
}

/// The physics world plus everything drawn on top of it.
///
/// Entities are kept in insertion order, which is also draw order: the last
/// entity is drawn on top.
pub struct Scene {
    config: SceneConfig,
    world: PhysicsWorld,
    entities: Vec<RenderableEntity>,
    static_lines: Vec<StaticLine>,
    next_id: u64,
}

impl Scene {
    /// Build the floor and the box stacks described by `config`.
    pub fn new(config: SceneConfig) -> Result<Self, SceneError> {
        config.validate()?;

        let world = PhysicsWorld::new(config.gravity, config.timestep);
        let mut scene = Self {
            config,
            world,
            entities: Vec::new(),
            static_lines: Vec::new(),
            next_id: 0,
        };

        let floor_y = scene.config.floor_height;
        let floor = scene.world.insert_static_segment(
            [0.0, floor_y],
            [scene.config.screen_width, floor_y],
            scene.config.floor_friction,
        );
        scene.static_lines.push(StaticLine { handles: floor });

        let size = scene.config.box_size;
        for x in 0..scene.config.columns {
            for y in 0..scene.config.rows {
                let center = [
                    scene.config.stack_origin_x + x as f32 * scene.config.box_spacing,
                    (floor_y + size / 2.0) + y as f32 * (size + scene.config.box_gap),
                ];
                scene.spawn_box(center);
            }
        }

        info!(
            "scene ready: {} boxes in {}x{} stacks, floor at y={}",
            scene.entities.len(),
            scene.config.columns,
            scene.config.rows,
            floor_y
        );
        Ok(scene)
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn world(&self) -> &PhysicsWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut PhysicsWorld {
        &mut self.world
    }

    pub fn entities(&self) -> &[RenderableEntity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&RenderableEntity> {
        self.entities.iter().find(|entity| entity.id == id)
    }

    pub fn static_lines(&self) -> &[StaticLine] {
        &self.static_lines
    }

    /// Add one stack box centred at `center`.
    pub fn spawn_box(&mut self, center: [f32; 2]) -> EntityId {
        let size = self.config.box_size;
        let handles = self.world.insert_dynamic_box(
            center,
            size,
            size,
            self.config.box_mass,
            self.config.box_friction,
        );
        self.insert_entity(
            EntityKind::Box {
                width: size,
                height: size,
            },
            handles,
        )
    }

    /// Shoot a coin from `position` with the configured horizontal speed.
    ///
    /// If the scene is at `max_entities`, the oldest entity other than
    /// `keep` is evicted first. Returns `None` when nothing can be evicted,
    /// in which case no coin is spawned.
    pub fn spawn_coin(
        &mut self,
        position: [f32; 2],
        keep: Option<EntityId>,
    ) -> Result<Option<EntityId>, SceneError> {
        while self.entities.len() >= self.config.max_entities {
            let Some(oldest) = self
                .entities
                .iter()
                .map(|entity| entity.id)
                .find(|id| Some(*id) != keep)
            else {
                debug!("entity cap reached and nothing evictable, coin not spawned");
                return Ok(None);
            };
            self.remove_entity(oldest)?;
            debug!("evicted entity {oldest} to stay under {}", self.config.max_entities);
        }

        let radius = self.config.coin_radius;
        let handles = self.world.insert_dynamic_ball(
            position,
            [self.config.coin_speed, 0.0],
            radius,
            self.config.coin_mass,
            self.config.coin_friction,
        );
        let id = self.insert_entity(EntityKind::Circle { radius }, handles);
        debug!("coin {id} shot from ({}, {})", position[0], position[1]);
        Ok(Some(id))
    }

    fn insert_entity(&mut self, kind: EntityKind, handles: BodyHandles) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        let transform = self
            .world
            .body_snapshot(handles.body)
            .map(|snapshot| VisualTransform::from_snapshot(&snapshot))
            .unwrap_or_default();
        self.entities.push(RenderableEntity {
            id,
            kind,
            body: handles.body,
            collider: handles.collider,
            transform,
        });
        id
    }

    /// Remove an entity and its body and collider from the world.
    pub fn remove_entity(&mut self, id: EntityId) -> Result<RenderableEntity, SceneError> {
        let index = self
            .entities
            .iter()
            .position(|entity| entity.id == id)
            .ok_or(SceneError::MissingBody(id))?;
        let entity = self.entities.remove(index);
        self.world.remove_body(entity.body)?;
        Ok(entity)
    }

    /// Remove every entity whose body is below `removal_threshold`.
    ///
    /// Returns the ids that were removed. Running it again without new
    /// fallen entities removes nothing.
    pub fn remove_fallen(&mut self) -> Result<Vec<EntityId>, SceneError> {
        let threshold = self.config.removal_threshold;
        let mut fallen = Vec::new();
        for entity in &self.entities {
            let snapshot = self
                .world
                .body_snapshot(entity.body)
                .ok_or(SceneError::MissingBody(entity.id))?;
            if snapshot.position[1] < threshold {
                fallen.push(entity.id);
            }
        }
        for id in &fallen {
            self.remove_entity(*id)?;
        }
        if !fallen.is_empty() {
            debug!("removed {} fallen entities", fallen.len());
        }
        Ok(fallen)
    }

    /// Copy every body's position and angle into its entity's sprite transform.
    pub fn sync_transforms(&mut self) -> Result<(), SceneError> {
        for entity in &mut self.entities {
            let snapshot = self
                .world
                .body_snapshot(entity.body)
                .ok_or(SceneError::MissingBody(entity.id))?;
            entity.transform = VisualTransform::from_snapshot(&snapshot);
        }
        Ok(())
    }

    /// Topmost entity (last in draw order) whose collider is within
    /// `tolerance` of `point`.
    pub fn entity_at(&self, point: [f32; 2], tolerance: f32) -> Option<EntityId> {
        let hits = self.world.point_query(point, tolerance);
        self.entities
            .iter()
            .rev()
            .find(|entity| hits.contains(&entity.collider))
            .map(|entity| entity.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    fn small_config() -> SceneConfig {
        SceneConfig {
            columns: 2,
            rows: 3,
            ..SceneConfig::default()
        }
    }

    #[test]
    fn test_default_scene_has_72_boxes_and_a_floor() {
        let scene = Scene::new(SceneConfig::default()).unwrap();
        assert_eq!(scene.entities().len(), 72);
        assert_eq!(scene.static_lines().len(), 1);
        // One body per box plus the floor.
        assert_eq!(scene.world().body_count(), 73);
        assert_eq!(scene.world().collider_count(), 73);
        assert!(scene.entities().iter().all(|e| !e.is_circle()));
    }

    #[test]
    fn test_box_layout() {
        let scene = Scene::new(small_config()).unwrap();
        let first = &scene.entities()[0];
        assert_eq!(first.transform.position, [300.0, 80.0 + 22.5]);
        // Second box of the first column sits one box plus a small gap higher.
        let second = &scene.entities()[1];
        assert!((second.transform.position[1] - (102.5 + 45.01)).abs() < 1e-3);
        // First box of the second column.
        let fourth = &scene.entities()[3];
        assert_eq!(fourth.transform.position[0], 350.0);
    }

    #[test]
    fn test_rejects_invalid_config() {
        let cfg = SceneConfig {
            box_friction: 0.0,
            ..SceneConfig::default()
        };
        assert!(matches!(
            Scene::new(cfg),
            Err(SceneError::Config(ConfigError::NonPositive { .. }))
        ));
    }

    #[test]
    fn test_rejects_grid_larger_than_entity_cap() {
        let cfg = SceneConfig {
            max_entities: 10,
            ..SceneConfig::default()
        };
        assert!(matches!(
            Scene::new(cfg),
            Err(SceneError::Config(ConfigError::GridExceedsCap { .. }))
        ));
    }

    #[test]
    fn test_entity_ids_are_not_reused() {
        let mut scene = Scene::new(small_config()).unwrap();
        let last = scene.entities().last().unwrap().id;
        scene.remove_entity(last).unwrap();
        let coin = scene.spawn_coin([100.0, 200.0], None).unwrap().unwrap();
        assert!(coin > last);
    }

    #[test]
    fn test_remove_unknown_entity_fails() {
        let mut scene = Scene::new(small_config()).unwrap();
        assert!(matches!(
            scene.remove_entity(EntityId(999)),
            Err(SceneError::MissingBody(EntityId(999)))
        ));
    }

    #[test]
    fn test_entity_at_prefers_topmost() {
        let mut scene = Scene::new(SceneConfig {
            columns: 0,
            rows: 0,
            ..SceneConfig::default()
        })
        .unwrap();
        let below = scene.spawn_box([600.0, 400.0]);
        let above = scene.spawn_box([600.0, 400.0]);
        assert_eq!(scene.entity_at([600.0, 400.0], 1.0), Some(above));
        scene.remove_entity(above).unwrap();
        assert_eq!(scene.entity_at([600.0, 400.0], 1.0), Some(below));
    }

    #[test]
    fn test_entity_at_ignores_floor() {
        let scene = Scene::new(small_config()).unwrap();
        assert_eq!(scene.entity_at([1000.0, 80.0], 1.0), None);
    }
}
