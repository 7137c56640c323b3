use rapier2d::{geometry::DefaultBroadPhase, prelude::*};

use crate::error::SceneError;
use crate::physics::{moment_for_box, moment_for_circle, BodySnapshot, LENGTH_UNIT};

/// Rigid body and its single collider, as inserted together.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BodyHandles {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}

/// Thin owner of the rapier pipeline and sets.
///
/// Everything the demo needs from the physics engine goes through here:
/// inserting and removing bodies, reading and overriding their state,
/// stepping, and point queries for picking.
pub struct PhysicsWorld {
    pipeline: PhysicsPipeline,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    time: f64,
    steps: u64,
}

impl PhysicsWorld {
    pub fn new(gravity: [Real; 2], dt: Real) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = dt;
        integration_parameters.length_unit = LENGTH_UNIT;

        Self {
            pipeline: PhysicsPipeline::new(),
            gravity: vector![gravity[0], gravity[1]],
            integration_parameters,
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            time: 0.0,
            steps: 0,
        }
    }

    /// Advance the simulation by exactly one fixed timestep.
    pub fn step(&mut self) {
        let physics_hooks = ();
        let event_handler = ();
        self.pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            &physics_hooks,
            &event_handler,
        );
        self.time += f64::from(self.integration_parameters.dt);
        self.steps += 1;
    }

    /// Insert a fixed body carrying a segment between two local points.
    pub fn insert_static_segment(
        &mut self,
        a: [Real; 2],
        b: [Real; 2],
        friction: Real,
    ) -> BodyHandles {
        let body = RigidBodyBuilder::fixed().build();
        let handle = self.rigid_body_set.insert(body);
        let collider = ColliderBuilder::segment(point![a[0], a[1]], point![b[0], b[1]])
            .friction(friction)
            .build();
        let collider = self
            .collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        BodyHandles {
            body: handle,
            collider,
        }
    }

    /// Insert a dynamic box whose moment is derived from its mass and size.
    pub fn insert_dynamic_box(
        &mut self,
        center: [Real; 2],
        width: Real,
        height: Real,
        mass: Real,
        friction: Real,
    ) -> BodyHandles {
        let moment = moment_for_box(mass, width, height);
        let collider = ColliderBuilder::cuboid(width / 2.0, height / 2.0);
        self.insert_dynamic(center, [0.0, 0.0], mass, moment, collider, friction)
    }

    /// Insert a dynamic disc with an initial linear velocity.
    pub fn insert_dynamic_ball(
        &mut self,
        center: [Real; 2],
        velocity: [Real; 2],
        radius: Real,
        mass: Real,
        friction: Real,
    ) -> BodyHandles {
        let moment = moment_for_circle(mass, 0.0, radius);
        let collider = ColliderBuilder::ball(radius);
        self.insert_dynamic(center, velocity, mass, moment, collider, friction)
    }

    fn insert_dynamic(
        &mut self,
        center: [Real; 2],
        velocity: [Real; 2],
        mass: Real,
        moment: Real,
        collider: ColliderBuilder,
        friction: Real,
    ) -> BodyHandles {
        // Mass comes entirely from the body so the collider carries no density.
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![center[0], center[1]])
            .linvel(vector![velocity[0], velocity[1]])
            .additional_mass_properties(MassProperties::new(Point::origin(), mass, moment))
            .build();
        let handle = self.rigid_body_set.insert(body);
        let collider = collider.density(0.0).friction(friction).build();
        let collider = self
            .collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        BodyHandles {
            body: handle,
            collider,
        }
    }

    /// Remove a body together with every collider attached to it.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) -> Result<(), SceneError> {
        self.rigid_body_set
            .remove(
                handle,
                &mut self.island_manager,
                &mut self.collider_set,
                &mut self.impulse_joint_set,
                &mut self.multibody_joint_set,
                true,
            )
            .map(|_| ())
            .ok_or(SceneError::UnknownBody(handle))
    }

    pub fn body_snapshot(&self, handle: RigidBodyHandle) -> Option<BodySnapshot> {
        self.rigid_body_set.get(handle).map(|body| BodySnapshot {
            position: [body.translation().x, body.translation().y],
            velocity: [body.linvel().x, body.linvel().y],
            rotation: body.rotation().angle(),
        })
    }

    pub fn set_body_position(
        &mut self,
        handle: RigidBodyHandle,
        position: [Real; 2],
    ) -> Result<(), SceneError> {
        let body = self
            .rigid_body_set
            .get_mut(handle)
            .ok_or(SceneError::UnknownBody(handle))?;
        body.set_translation(vector![position[0], position[1]], true);
        Ok(())
    }

    pub fn set_body_velocity(
        &mut self,
        handle: RigidBodyHandle,
        velocity: [Real; 2],
    ) -> Result<(), SceneError> {
        let body = self
            .rigid_body_set
            .get_mut(handle)
            .ok_or(SceneError::UnknownBody(handle))?;
        body.set_linvel(vector![velocity[0], velocity[1]], true);
        Ok(())
    }

    pub fn body_mass(&self, handle: RigidBodyHandle) -> Option<Real> {
        self.rigid_body_set.get(handle).map(|body| body.mass())
    }

    /// Colliders within `tolerance` of `point`, in collider-set order.
    ///
    /// A point inside a shape counts as distance zero.
    pub fn point_query(&self, point: [Real; 2], tolerance: Real) -> Vec<ColliderHandle> {
        let world_point = point![point[0], point[1]];
        self.collider_set
            .iter()
            .filter(|(_, collider)| {
                let proj = collider
                    .shape()
                    .project_point(collider.position(), &world_point, true);
                proj.is_inside || (proj.point - world_point).norm() <= tolerance
            })
            .map(|(handle, _)| handle)
            .collect()
    }

    /// World-space endpoints of a segment collider, using its body's transform.
    pub fn segment_endpoints(&self, handle: ColliderHandle) -> Option<([f32; 2], [f32; 2])> {
        let collider = self.collider_set.get(handle)?;
        let segment = collider.shape().as_segment()?;
        let body = self.rigid_body_set.get(collider.parent()?)?;
        let a = body.position() * segment.a;
        let b = body.position() * segment.b;
        Some(([a.x, a.y], [b.x, b.y]))
    }

    pub fn contains_body(&self, handle: RigidBodyHandle) -> bool {
        self.rigid_body_set.contains(handle)
    }

    pub fn contains_collider(&self, handle: ColliderHandle) -> bool {
        self.collider_set.contains(handle)
    }

    pub fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }

    /// Simulated seconds since creation.
    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }
}
