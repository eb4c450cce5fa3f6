//! Bevy plugin wiring the water simulation into a host app.
//!
//! The simulator lives as a resource and steps once per `Update` from the
//! app clock; buoyancy runs in `FixedUpdate` so its forces land in the same
//! cadence as the Rapier integrator that consumes them.

use bevy::prelude::*;
use bevy_log::warn;
use bevy_rapier2d::prelude::{Damping, ExternalForce};

use crate::water::{evaluate_buoyancy, BodyPose, BuoyancyParams, WaveConfig, WaveSimulator};

/// Marks a rigid body as floating on the water surface.
///
/// The entity also needs a Rapier `ExternalForce` and `Damping`, which the
/// buoyancy system overwrites every physics step.
#[derive(Component, Debug, Clone)]
pub struct Buoyant {
    /// Collider half-extents used for the submersion clip.
    pub half_extents: Vec2,
    pub params: BuoyancyParams,
}

impl Buoyant {
    pub fn new(half_extents: Vec2, params: BuoyancyParams) -> Self {
        Self {
            half_extents,
            params,
        }
    }
}

/// The body's horizontal offset into the water grid, updated per frame by
/// whatever system moves the body across the scene.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct WaterGridAnchor {
    pub grid_position: Vec2,
}

/// Request from an input collaborator to disturb the surface at a grid cell.
#[derive(Event, Debug, Clone, Copy)]
pub struct SplashEvent {
    pub x: usize,
    pub y: usize,
    pub height: f32,
}

/// Adds the water simulation and its buoyancy coupling to an app.
pub struct WaterSimPlugin {
    pub grid_width: usize,
    pub grid_depth: usize,
    pub config: WaveConfig,
}

impl Default for WaterSimPlugin {
    fn default() -> Self {
        Self {
            grid_width: 200,
            grid_depth: 100,
            config: WaveConfig::default(),
        }
    }
}

impl Plugin for WaterSimPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(WaveSimulator::new(
            self.grid_width,
            self.grid_depth,
            self.config,
        ))
        .register_type::<WaveConfig>()
        .add_event::<SplashEvent>()
        .add_systems(Update, (apply_splashes, step_wave_simulation).chain())
        .add_systems(FixedUpdate, apply_buoyancy_forces);
    }
}

/// Advances the solver with the app clock. The simulator gates itself to its
/// own tick interval, so running every frame is cheap between ticks.
fn step_wave_simulation(mut simulator: ResMut<WaveSimulator>, time: Res<Time>) {
    simulator.update(time.elapsed_secs());
}

/// Applies queued surface disturbances to the live buffer. Requests outside
/// the grid interior come from external input and are dropped with a warning
/// rather than taking the app down.
fn apply_splashes(mut simulator: ResMut<WaveSimulator>, mut events: EventReader<SplashEvent>) {
    for splash in events.read() {
        if simulator.grid().contains_interior(splash.x, splash.y) {
            simulator.splash(splash.x, splash.y, splash.height);
        } else {
            warn!(
                "ignoring splash outside the grid interior at ({}, {})",
                splash.x, splash.y
            );
        }
    }
}

/// Evaluates the submerged-body force model for every buoyant body and
/// writes the result into its Rapier force and damping components.
fn apply_buoyancy_forces(
    simulator: Res<WaveSimulator>,
    mut bodies: Query<(
        &Transform,
        &WaterGridAnchor,
        &Buoyant,
        &mut ExternalForce,
        &mut Damping,
    )>,
) {
    let sampler = simulator.sampler();

    for (transform, anchor, buoyant, mut force, mut damping) in bodies.iter_mut() {
        let rotation = transform.rotation.to_euler(EulerRot::ZYX).0;
        let pose = BodyPose::new(
            transform.translation.truncate(),
            rotation,
            buoyant.half_extents,
        );

        // The force model treats out-of-grid sampling as a hard precondition
        // failure; movement bugs should not crash the whole app, so bodies
        // that drift off the grid are skipped instead.
        let center_column =
            Vec2::new(anchor.grid_position.x + pose.position.x, anchor.grid_position.y);
        let leftmost = center_column - Vec2::new(buoyant.half_extents.x, 0.0);
        let rightmost = center_column + Vec2::new(buoyant.half_extents.x, 0.0);
        if sampler.height_at(leftmost).is_none() || sampler.height_at(rightmost).is_none() {
            warn!("buoyant body outside the water grid, skipping evaluation");
            continue;
        }

        let forces = evaluate_buoyancy(&pose, &buoyant.params, anchor.grid_position, &sampler);
        *force = ExternalForce::at_point(forces.force, forces.application_point, pose.position);
        damping.linear_damping = forces.linear_drag;
        damping.angular_damping = forces.angular_drag;
    }
}
