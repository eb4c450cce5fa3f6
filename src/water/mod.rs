//! Water surface simulation and the forces it exerts on floating bodies.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                WaveSimulator (simulator.rs)               │
//! │  cellular-automaton height field, fixed-period ticking    │
//! └─────────────────────────┬────────────────────────────────┘
//!                           │ emitted height buffer
//!                           ▼
//!                 ┌───────────────────┐
//!                 │   HeightSampler   │  bilinear point queries
//!                 └─────────┬─────────┘
//!                           │ water height per corner column
//!                           ▼
//!                 ┌───────────────────┐
//!                 │ buoyancy module   │  submerged polygon → forces
//!                 └───────────────────┘
//! ```
//!
//! The simulator owns and exclusively mutates its buffers; the sampler and
//! the buoyancy model only ever see read-only views of the emitted snapshot.

pub mod buoyancy;
pub mod config;
pub mod sampler;
pub mod simulator;

pub use buoyancy::{evaluate_buoyancy, BodyPose, BuoyancyParams, Submersion, SubmersionForces};
pub use config::{WaveConfig, WavePreset};
pub use sampler::HeightSampler;
pub use simulator::WaveSimulator;
