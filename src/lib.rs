//! 2D water surface simulation with rigid-body buoyancy.
//!
//! The surface is a height field advanced by a cellular automaton on a fixed
//! wave period, decoupled from the host's frame rate. A submerged-body force
//! model clips a rectangular collider against the sampled water line and
//! derives buoyant force, lateral force, and drag from the submerged area.
//!
//! The core types (`WaveSimulator`, `HeightSampler`, the buoyancy functions)
//! are plain values with no engine coupling; `plugin` wires them into a Bevy
//! app and a Rapier rigid-body integrator.

pub mod constants;
pub mod grid;
pub mod plugin;
pub mod utils;
pub mod water;

pub use constants::*;
pub use grid::SimGrid;
pub use plugin::{Buoyant, SplashEvent, WaterGridAnchor, WaterSimPlugin};
pub use water::{
    buoyancy::{evaluate_buoyancy, BodyPose, BuoyancyParams, Submersion, SubmersionForces},
    config::{WaveConfig, WavePreset},
    sampler::HeightSampler,
    simulator::WaveSimulator,
};
