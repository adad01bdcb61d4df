//! Rigid-body world for dropped items
//!
//! The simulation only needs four operations from a physics engine, captured
//! by [`PhysicsBackend`]. [`RapierWorld`] is the production backend; tests
//! substitute a deterministic one.

use std::collections::HashMap;

use glam::Vec2;
use rapier2d::prelude::*;

use super::state::Stage;
use crate::consts::*;

/// Opaque handle for a body owned by a physics backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BodyId(pub u32);

/// Collision shape of a dynamic body
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyShape {
    Circle { radius: f32 },
    Rect { width: f32, height: f32 },
}

/// Material of a dynamic body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BodyMaterial {
    pub restitution: f32,
    pub friction: f32,
    /// Density, `None` keeps the engine default
    pub density: Option<f32>,
}

/// Minimal engine surface the drink model relies on
pub trait PhysicsBackend {
    /// Build the static cup walls for a stage. Replaces any previous walls.
    fn build_cup(&mut self, stage: &Stage);
    /// Insert a dynamic body at `pos` and return its handle
    fn add_body(&mut self, shape: BodyShape, material: BodyMaterial, pos: Vec2) -> BodyId;
    /// Remove a dynamic body; unknown handles are ignored
    fn remove_body(&mut self, id: BodyId) -> bool;
    /// Advance the world by `dt` seconds
    fn step(&mut self, dt: f32);
    /// Current centre of a body
    fn position(&self, id: BodyId) -> Option<Vec2>;
    /// Number of dynamic bodies currently alive
    fn body_count(&self) -> usize;
}

/// rapier2d world in screen space (pixels, +y down)
pub struct RapierWorld {
    gravity: Vector<Real>,
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: DefaultBroadPhase,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    query_pipeline: QueryPipeline,

    /// Static wall bodies of the current cup
    walls: Vec<RigidBodyHandle>,
    /// Dynamic bodies by our handle; ids are never reused
    bodies: HashMap<BodyId, RigidBodyHandle>,
    next_id: u32,
}

impl Default for RapierWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl RapierWorld {
    pub fn new() -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.length_unit = PIXELS_PER_UNIT;
        Self {
            gravity: vector![0.0, GRAVITY],
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
            walls: Vec::new(),
            bodies: HashMap::new(),
            next_id: 1,
        }
    }

    fn remove_handle(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }

    fn add_wall(&mut self, center: Vec2, width: f32, height: f32) {
        let body = RigidBodyBuilder::fixed()
            .translation(vector![center.x, center.y])
            .build();
        let handle = self.rigid_body_set.insert(body);
        let collider = ColliderBuilder::cuboid(width / 2.0, height / 2.0).build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);
        self.walls.push(handle);
    }
}

impl PhysicsBackend for RapierWorld {
    fn build_cup(&mut self, stage: &Stage) {
        for handle in std::mem::take(&mut self.walls) {
            self.remove_handle(handle);
        }

        let c = stage.cup_center;
        let (w, h) = (stage.cup_width, stage.cup_height);
        self.add_wall(Vec2::new(c.x - w / 2.0, c.y), WALL_THICKNESS, h);
        self.add_wall(Vec2::new(c.x + w / 2.0, c.y), WALL_THICKNESS, h);
        self.add_wall(Vec2::new(c.x, c.y + h / 2.0), w, WALL_THICKNESS);
        log::debug!("Cup walls built at ({}, {}) size {}x{}", c.x, c.y, w, h);
    }

    fn add_body(&mut self, shape: BodyShape, material: BodyMaterial, pos: Vec2) -> BodyId {
        let body = RigidBodyBuilder::dynamic()
            .translation(vector![pos.x, pos.y])
            .build();
        let handle = self.rigid_body_set.insert(body);

        let builder = match shape {
            BodyShape::Circle { radius } => ColliderBuilder::ball(radius),
            BodyShape::Rect { width, height } => ColliderBuilder::cuboid(width / 2.0, height / 2.0),
        };
        let mut builder = builder
            .restitution(material.restitution)
            .friction(material.friction);
        if let Some(density) = material.density {
            builder = builder.density(density);
        }
        self.collider_set
            .insert_with_parent(builder.build(), handle, &mut self.rigid_body_set);

        let id = BodyId(self.next_id);
        self.next_id += 1;
        self.bodies.insert(id, handle);
        id
    }

    fn remove_body(&mut self, id: BodyId) -> bool {
        match self.bodies.remove(&id) {
            Some(handle) => {
                self.remove_handle(handle);
                true
            }
            None => false,
        }
    }

    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.physics_pipeline.step(
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
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    fn position(&self, id: BodyId) -> Option<Vec2> {
        let handle = self.bodies.get(&id)?;
        let body = self.rigid_body_set.get(*handle)?;
        let t = body.translation();
        Some(Vec2::new(t.x, t.y))
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}

/// Deterministic backend for tests: every body settles at a fixed point on
/// the first step after it is added.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct SettlingWorld {
    pub rest_point: Vec2,
    bodies: std::collections::BTreeMap<BodyId, Vec2>,
    next_id: u32,
    pub steps: u64,
}

#[cfg(test)]
impl PhysicsBackend for SettlingWorld {
    fn build_cup(&mut self, stage: &Stage) {
        self.rest_point = stage.cup_center;
    }

    fn add_body(&mut self, _shape: BodyShape, _material: BodyMaterial, pos: Vec2) -> BodyId {
        self.next_id += 1;
        let id = BodyId(self.next_id);
        self.bodies.insert(id, pos);
        id
    }

    fn remove_body(&mut self, id: BodyId) -> bool {
        self.bodies.remove(&id).is_some()
    }

    fn step(&mut self, _dt: f32) {
        self.steps += 1;
        for pos in self.bodies.values_mut() {
            *pos = self.rest_point;
        }
    }

    fn position(&self, id: BodyId) -> Option<Vec2> {
        self.bodies.get(&id).copied()
    }

    fn body_count(&self) -> usize {
        self.bodies.len()
    }
}
