/// Documented tunable range for [`crate::WaveConfig::propagation_factor`].
/// The solver is numerically stable only inside this range; nothing enforces
/// it at runtime.
pub const PROPAGATION_FACTOR_RANGE: (f32, f32) = (1.0, 4.0);
/// Documented tunable range for [`crate::WaveConfig::velocity_factor`].
pub const VELOCITY_FACTOR_RANGE: (f32, f32) = (0.0, 4.0);
/// Documented tunable range for [`crate::WaveConfig::damping_factor`].
pub const DAMPING_FACTOR_RANGE: (f32, f32) = (0.0, 1.0);

/// The solver computes a full oscillation over this many ticks, so the tick
/// interval is the wave period divided by this.
pub const TICKS_PER_WAVE_PERIOD: u32 = 4;

/// Height scale applied to the four neighbor cells of a splash center.
pub const SPLASH_NEIGHBOR_SCALE: f32 = 0.25;

/// Below this tangent magnitude a surface-crossing offset saturates at the
/// collider width instead of dividing toward infinity.
pub const MIN_TAN: f32 = 1e-4;

pub const CELL_OUT_OF_BOUNDS_ERROR: &str = "Height written outside the padded simulation grid";
pub const SPLASH_OUT_OF_BOUNDS_ERROR: &str = "Splash center outside the simulation grid interior";
pub const BODY_OUTSIDE_GRID_ERROR: &str = "Buoyant body corner sampled outside the water grid";
pub const ZERO_AREA_COLLIDER_ERROR: &str = "Buoyancy evaluated for a zero-area collider";
