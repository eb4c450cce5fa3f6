//! Cellular-automaton height-field solver.
//!
//! Each interior cell's new value is the mean of its four neighbors' values
//! one tick back (a smoothing that makes disturbances propagate outward),
//! scaled by a propagation factor, minus its own value two ticks back scaled
//! by a velocity factor (which makes the field oscillate with a period of
//! four ticks), all multiplied by a damping factor so waves lose energy over
//! time. This is a pragmatic approximation of the wave equation, not a
//! rigorous PDE solver.
//!
//! The solver advances on a fixed tick interval regardless of how often
//! [`WaveSimulator::update`] is called. Between ticks it publishes a buffer
//! interpolated between the last two solved snapshots so consumers see smooth
//! motion at any frame rate. At most one tick is solved per call; if calls
//! are infrequent, wave time silently lags the caller's clock.

use bevy_ecs::resource::Resource;
use bevy_log::debug;
use rand::Rng;

use super::config::WaveConfig;
use super::sampler::HeightSampler;
use crate::constants::{
    CELL_OUT_OF_BOUNDS_ERROR, SPLASH_NEIGHBOR_SCALE, SPLASH_OUT_OF_BOUNDS_ERROR,
};
use crate::grid::SimGrid;
use crate::utils::lerp;

/// Which buffer the most recent `update` call published.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Emitted {
    /// The interpolated snapshot written between solver ticks.
    Animation,
    /// The newest fully-solved snapshot, published on tick frames so the
    /// following idle frames always interpolate between two solved states.
    Previous1,
}

/// Owns and advances the water height field.
///
/// The three height buffers hold the field at the current solved tick, one
/// tick back, and two ticks back. The current value of a cell is determined
/// by its neighbors' values in `previous1` and its own value in `previous2`.
/// Buffer identities rotate each tick, recycling the two-tick-old allocation
/// as the new `current`, so no buffer is ever reallocated after construction.
#[derive(Resource)]
pub struct WaveSimulator {
    grid: SimGrid,
    config: WaveConfig,
    current: Vec<f32>,
    previous1: Vec<f32>,
    previous2: Vec<f32>,
    animation: Vec<f32>,
    intensity: Vec<f32>,
    next_update_time: f32,
    emitted: Emitted,
}

impl WaveSimulator {
    /// Allocates a zeroed simulation session over a `width x depth` interior
    /// grid (buffers span the padded `(width + 2) x (depth + 2)` region).
    pub fn new(width: usize, depth: usize, config: WaveConfig) -> Self {
        let grid = SimGrid::new(width, depth);
        let cells = grid.cell_count();
        debug!(
            "allocating wave buffers for a {}x{} grid ({} cells)",
            width, depth, cells
        );
        Self {
            grid,
            config,
            current: vec![0.0; cells],
            previous1: vec![0.0; cells],
            previous2: vec![0.0; cells],
            animation: vec![0.0; cells],
            intensity: vec![0.5; cells],
            next_update_time: 0.0,
            emitted: Emitted::Previous1,
        }
    }

    /// Discards all wave state and reallocates for new grid dimensions.
    pub fn reset(&mut self, width: usize, depth: usize) {
        *self = Self::new(width, depth, self.config);
    }

    /// Grid dimensions shared by every buffer of this session.
    pub fn grid(&self) -> SimGrid {
        self.grid
    }

    pub fn config(&self) -> &WaveConfig {
        &self.config
    }

    /// Replaces the tunable parameters; wave state is kept.
    pub fn set_config(&mut self, config: WaveConfig) {
        self.config = config;
    }

    /// Advances the simulation to `time` (the caller's clock, in seconds).
    ///
    /// If the scheduled tick time has not arrived, the published buffer is
    /// re-interpolated between the last two solved snapshots. Otherwise one
    /// solver tick runs and the schedule moves forward by a quarter wave
    /// period.
    pub fn update(&mut self, time: f32) {
        if time < self.next_update_time {
            self.interpolate_animation(time);
            self.emitted = Emitted::Animation;
        } else {
            self.solve_tick();
            self.emitted = Emitted::Previous1;
            self.next_update_time = time + self.config.tick_interval();
        }
        self.refresh_intensity();
    }

    /// The height buffer published by the most recent `update` call.
    pub fn heights(&self) -> &[f32] {
        match self.emitted {
            Emitted::Animation => &self.animation,
            Emitted::Previous1 => &self.previous1,
        }
    }

    /// The newest fully-solved buffer, halo included.
    pub fn current(&self) -> &[f32] {
        &self.current
    }

    /// The published heights rasterized to `[0, 1]` intensities, where 0.5 is
    /// rest height. Refreshed on every `update` call for display consumers.
    pub fn intensity(&self) -> &[f32] {
        &self.intensity
    }

    /// Point-query view over the published height buffer.
    pub fn sampler(&self) -> HeightSampler<'_> {
        HeightSampler::new(self.heights(), self.grid)
    }

    /// Writes `height` directly into the live buffer at `(x, y)`.
    ///
    /// The cell may be anywhere in the padded grid, halo included. Writing
    /// outside it is a precondition violation and panics.
    pub fn set_height_at_point(&mut self, x: usize, y: usize, height: f32) {
        assert!(self.grid.contains(x, y), "{}", CELL_OUT_OF_BOUNDS_ERROR);
        let index = self.grid.index(x, y);
        self.current[index] = height;
    }

    /// Seeds the standard ripple pattern: `height` at the center cell and a
    /// quarter of it at the four neighbors. The center must be an interior
    /// cell so the neighbors stay within the padded grid.
    pub fn splash(&mut self, x: usize, y: usize, height: f32) {
        assert!(
            self.grid.contains_interior(x, y),
            "{}",
            SPLASH_OUT_OF_BOUNDS_ERROR
        );
        let neighbor_height = SPLASH_NEIGHBOR_SCALE * height;
        self.set_height_at_point(x, y, height);
        self.set_height_at_point(x, y + 1, neighbor_height);
        self.set_height_at_point(x, y - 1, neighbor_height);
        self.set_height_at_point(x + 1, y, neighbor_height);
        self.set_height_at_point(x - 1, y, neighbor_height);
    }

    /// Seeds the splash pattern at a uniformly random interior cell.
    pub fn random_splash<R: Rng>(&mut self, rng: &mut R, height: f32) {
        let x = rng.gen_range(1..=self.grid.width());
        let y = rng.gen_range(1..=self.grid.depth());
        self.splash(x, y, height);
    }

    fn interpolate_animation(&mut self, time: f32) {
        let time_left = self.next_update_time - time;
        let normalized_time_left = time_left / self.config.tick_interval();

        for i in 0..self.animation.len() {
            self.animation[i] = lerp(self.current[i], self.previous1[i], normalized_time_left);
        }
    }

    fn solve_tick(&mut self) {
        self.rotate_buffers();

        let width = self.grid.width();
        let depth = self.grid.depth();
        for j in 1..=depth {
            for i in 1..=width {
                let neighbor_sum = self.previous1[self.grid.index(i - 1, j)]
                    + self.previous1[self.grid.index(i + 1, j)]
                    + self.previous1[self.grid.index(i, j - 1)]
                    + self.previous1[self.grid.index(i, j + 1)];

                self.current[self.grid.index(i, j)] = (0.25
                    * self.config.propagation_factor
                    * neighbor_sum
                    - self.config.velocity_factor * self.previous2[self.grid.index(i, j)])
                    * self.config.damping_factor;
            }
        }

        self.handle_edges();
    }

    /// Rotates buffer identities: the two-tick-old allocation is recycled as
    /// the new `current`, everything else ages by one tick.
    fn rotate_buffers(&mut self) {
        std::mem::swap(&mut self.previous2, &mut self.previous1);
        std::mem::swap(&mut self.previous1, &mut self.current);
    }

    /// With wrap enabled, copies interior edge cells into the opposite halo
    /// so neighbor lookups see a periodic boundary. Without wrap, halo cells
    /// keep their last values and act as an implicit reflective edge.
    fn handle_edges(&mut self) {
        if !self.config.wrap {
            return;
        }

        let width = self.grid.width();
        let depth = self.grid.depth();

        for i in 0..self.grid.padded_width() {
            self.current[self.grid.index(i, 0)] = self.current[self.grid.index(i, depth)];
            self.current[self.grid.index(i, depth + 1)] = self.current[self.grid.index(i, 1)];
        }
        for j in 1..=depth {
            self.current[self.grid.index(0, j)] = self.current[self.grid.index(width, j)];
            self.current[self.grid.index(width + 1, j)] = self.current[self.grid.index(1, j)];
        }
    }

    fn refresh_intensity(&mut self) {
        let source = match self.emitted {
            Emitted::Animation => &self.animation,
            Emitted::Previous1 => &self.previous1,
        };
        for (out, &height) in self.intensity.iter_mut().zip(source.iter()) {
            *out = (0.5 + 0.5 * height).clamp(0.0, 1.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn test_config(propagation: f32, velocity: f32, damping: f32, wrap: bool) -> WaveConfig {
        WaveConfig {
            propagation_factor: propagation,
            velocity_factor: velocity,
            damping_factor: damping,
            wave_period: 1.0,
            wrap,
        }
    }

    /// Forces one solver tick regardless of the current schedule.
    fn tick(simulator: &mut WaveSimulator, tick_counter: &mut u32) {
        *tick_counter += 1;
        // Any time at or past the schedule triggers exactly one solve; large
        // strides keep each call on the solve path.
        simulator.update(*tick_counter as f32 * 10.0);
    }

    fn interior_energy(simulator: &WaveSimulator, buffer: &[f32]) -> f32 {
        let grid = simulator.grid();
        let mut energy = 0.0;
        for j in 1..=grid.depth() {
            for i in 1..=grid.width() {
                let h = buffer[grid.index(i, j)];
                energy += h * h;
            }
        }
        energy
    }

    #[test]
    fn first_tick_matches_update_formula() {
        let mut simulator = WaveSimulator::new(4, 4, test_config(2.0, 1.0, 1.0, false));
        simulator.splash(2, 2, 1.0);

        simulator.update(0.0);

        // The splash rotated into previous1; previous2 is all zeros. The
        // center cell sees four neighbors of 0.25 each:
        // (0.25 * 2 * (4 * 0.25) - 1 * 0) * 1 = 0.5
        let grid = simulator.grid();
        let center = simulator.current()[grid.index(2, 2)];
        assert!((center - 0.5).abs() < 1e-6);

        // The published buffer on a tick frame is the promoted previous
        // snapshot, i.e. the seeded field itself.
        assert!((simulator.heights()[grid.index(2, 2)] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn idle_frames_interpolate_between_solved_snapshots() {
        let mut simulator = WaveSimulator::new(4, 4, test_config(2.0, 1.0, 1.0, false));
        simulator.splash(2, 2, 1.0);
        simulator.update(0.0); // solve; schedule moves to 0.25

        simulator.update(0.1);
        let grid = simulator.grid();
        // normalized time left = (0.25 - 0.1) / 0.25 = 0.6, so the published
        // value is current + (previous1 - current) * 0.6 = 0.5 + 0.5 * 0.6
        let center = simulator.heights()[grid.index(2, 2)];
        assert!((center - 0.8).abs() < 1e-5);

        // Solver state is untouched on idle frames.
        assert!((simulator.current()[grid.index(2, 2)] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn one_solve_per_call_even_after_a_long_stall() {
        let mut simulator = WaveSimulator::new(4, 4, test_config(2.0, 1.0, 1.0, false));
        simulator.splash(2, 2, 1.0);

        // 100 periods elapse, but a single call still solves exactly once:
        // the center cell holds the one-tick value.
        simulator.update(100.0);
        let grid = simulator.grid();
        assert!((simulator.current()[grid.index(2, 2)] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn wrap_copies_interior_edges_into_halo() {
        let mut simulator = WaveSimulator::new(5, 4, test_config(2.0, 1.0, 0.9, true));
        simulator.splash(2, 2, 1.0);
        let mut ticks = 0;

        for _ in 0..6 {
            tick(&mut simulator, &mut ticks);
            let grid = simulator.grid();
            let current = simulator.current();
            for j in 1..=grid.depth() {
                assert_eq!(
                    current[grid.index(0, j)],
                    current[grid.index(grid.width(), j)]
                );
                assert_eq!(
                    current[grid.index(grid.width() + 1, j)],
                    current[grid.index(1, j)]
                );
            }
            for i in 0..grid.padded_width() {
                assert_eq!(
                    current[grid.index(i, 0)],
                    current[grid.index(i, grid.depth())]
                );
                assert_eq!(
                    current[grid.index(i, grid.depth() + 1)],
                    current[grid.index(i, 1)]
                );
            }
        }
    }

    #[test]
    fn splash_spreads_symmetrically() {
        let mut simulator = WaveSimulator::new(9, 9, test_config(2.0, 1.0, 0.9, false));
        simulator.splash(5, 5, 1.0);
        let mut ticks = 0;

        for _ in 0..5 {
            tick(&mut simulator, &mut ticks);
        }

        let grid = simulator.grid();
        let current = simulator.current();
        for dy in 0..=3i32 {
            for dx in 0..=3i32 {
                let h = |ox: i32, oy: i32| {
                    current[grid.index((5 + ox) as usize, (5 + oy) as usize)]
                };
                let reference = h(dx, dy);
                assert!((reference - h(-dx, dy)).abs() < 1e-6);
                assert!((reference - h(dx, -dy)).abs() < 1e-6);
                assert!((reference - h(-dx, -dy)).abs() < 1e-6);
                // the update rule has no directional bias, so x and y swap too
                assert!((reference - h(dy, dx)).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn pure_averaging_never_gains_energy() {
        // propagation 1, velocity 0, damping 1: each cell becomes the plain
        // mean of its neighbors, which cannot increase the total square sum.
        let mut simulator = WaveSimulator::new(8, 8, test_config(1.0, 0.0, 1.0, false));
        simulator.splash(4, 4, 1.0);
        let mut ticks = 0;

        let mut energy = interior_energy(&simulator, simulator.current());
        for _ in 0..30 {
            tick(&mut simulator, &mut ticks);
            let next = interior_energy(&simulator, simulator.current());
            assert!(next <= energy + 1e-6);
            energy = next;
        }
    }

    #[test]
    fn damping_drains_the_field() {
        let mut simulator = WaveSimulator::new(8, 8, test_config(1.0, 1.0, 0.85, false));
        simulator.splash(4, 4, 1.0);
        let initial = interior_energy(&simulator, simulator.current());
        let mut ticks = 0;

        for _ in 0..60 {
            tick(&mut simulator, &mut ticks);
        }

        let remaining = interior_energy(&simulator, simulator.current())
            + interior_energy(&simulator, simulator.heights());
        assert!(remaining < 0.05 * initial);
    }

    #[test]
    fn intensity_maps_rest_height_to_half() {
        let mut simulator = WaveSimulator::new(4, 4, test_config(2.0, 1.0, 0.9, false));
        simulator.set_height_at_point(2, 2, 1.0);
        simulator.set_height_at_point(3, 2, -4.0);
        simulator.update(0.0); // publishes the seeded buffer

        let grid = simulator.grid();
        let intensity = simulator.intensity();
        assert!((intensity[grid.index(2, 2)] - 1.0).abs() < 1e-6);
        assert_eq!(intensity[grid.index(3, 2)], 0.0); // clamped
        assert!((intensity[grid.index(1, 1)] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn random_splash_lands_in_the_interior() {
        let mut simulator = WaveSimulator::new(6, 3, test_config(2.0, 1.0, 0.9, false));
        let mut rng = StdRng::seed_from_u64(7);

        for _ in 0..20 {
            simulator.random_splash(&mut rng, 1.0);
        }

        let grid = simulator.grid();
        let current = simulator.current();
        // halo corners are reachable only through neighbor writes, never as
        // a splash center, so the corner cells must remain untouched
        assert_eq!(current[grid.index(0, 0)], 0.0);
        assert_eq!(
            current[grid.index(grid.width() + 1, grid.depth() + 1)],
            0.0
        );
        assert!(current.iter().any(|&h| h != 0.0));
    }

    #[test]
    fn reset_discards_wave_state() {
        let mut simulator = WaveSimulator::new(4, 4, test_config(2.0, 1.0, 0.9, false));
        simulator.splash(2, 2, 1.0);
        simulator.update(0.0);

        simulator.reset(6, 5);
        assert_eq!(simulator.grid().width(), 6);
        assert_eq!(simulator.grid().depth(), 5);
        assert!(simulator.current().iter().all(|&h| h == 0.0));
        assert!(simulator.heights().iter().all(|&h| h == 0.0));
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_write_panics() {
        let mut simulator = WaveSimulator::new(4, 4, WaveConfig::default());
        simulator.set_height_at_point(6, 2, 1.0);
    }

    #[test]
    #[should_panic]
    fn splash_on_halo_panics() {
        let mut simulator = WaveSimulator::new(4, 4, WaveConfig::default());
        simulator.splash(0, 2, 1.0);
    }
}
