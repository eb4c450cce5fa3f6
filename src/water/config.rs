//! Wave simulation configuration.
//!
//! All parameters are plain scalars supplied at session start and
//! serializable for save files. The documented ranges are a usage contract:
//! the solver performs no stability check, and values outside the ranges are
//! not guaranteed to stay bounded.

use bevy::prelude::Reflect;
use serde::{Deserialize, Serialize};

use crate::constants::TICKS_PER_WAVE_PERIOD;

/// Tunable parameters of the height-field solver.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Reflect)]
pub struct WaveConfig {
    /// How aggressively waves spread to neighbor cells. At values above 1,
    /// propagation is artificially encouraged. Stable range: `[1, 4]`.
    pub propagation_factor: f32,
    /// Strength of the oscillatory restoring term. At 0 there is no
    /// oscillation and so no waves. Stable range: `[0, 4]`.
    pub velocity_factor: f32,
    /// Global energy loss per tick. At 0, waves don't propagate at all; at 1
    /// they are undamped. Range: `[0, 1]`.
    pub damping_factor: f32,
    /// Period of waves in seconds. An artifact of the scheme is that all
    /// waves share the same period.
    pub wave_period: f32,
    /// If true, waves reaching one edge of the grid wrap around to the
    /// opposite side; if false they bounce back from the edges.
    pub wrap: bool,
}

impl WaveConfig {
    /// Seconds between solver ticks. A full oscillation spans
    /// [`TICKS_PER_WAVE_PERIOD`] ticks.
    #[inline]
    pub fn tick_interval(&self) -> f32 {
        self.wave_period / TICKS_PER_WAVE_PERIOD as f32
    }
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            propagation_factor: 2.0,
            velocity_factor: 1.0,
            damping_factor: 0.9,
            wave_period: 1.0,
            wrap: true,
        }
    }
}

/// Preset wave configurations for different water moods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum WavePreset {
    /// No oscillation; disturbances die immediately.
    Still,
    /// Slow, heavily damped ripples.
    Pond,
    /// Lively open-water waves.
    #[default]
    Sea,
    /// Fast, persistent, far-spreading waves.
    Storm,
}

impl WavePreset {
    /// Creates a [`WaveConfig`] from this preset.
    pub fn to_config(self) -> WaveConfig {
        match self {
            WavePreset::Still => WaveConfig {
                propagation_factor: 1.0,
                velocity_factor: 0.0,
                damping_factor: 0.0,
                ..WaveConfig::default()
            },
            WavePreset::Pond => WaveConfig {
                propagation_factor: 1.5,
                velocity_factor: 0.8,
                damping_factor: 0.85,
                wave_period: 1.4,
                wrap: false,
            },
            WavePreset::Sea => WaveConfig::default(),
            WavePreset::Storm => WaveConfig {
                propagation_factor: 3.0,
                velocity_factor: 2.0,
                damping_factor: 0.97,
                wave_period: 0.6,
                wrap: true,
            },
        }
    }
}
