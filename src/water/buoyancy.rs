//! Submerged-body force model.
//!
//! Clips an axis-aligned rectangular collider against the locally sampled
//! water line and derives buoyant force, lateral force, and drag from the
//! submerged area. The water line under the body is approximated as a single
//! straight segment whose slope comes from the body's rotation, so the clip
//! reduces to a case split on how many of the four corners are underwater,
//! each case a pure function from (corners, rotation, extents) to
//! (area, centroid, slope).
//!
//! The corner positions themselves are deliberately axis-aligned even when
//! the body is rotated: they mirror a box collider whose bounds stay
//! axis-aligned under rotation. Rotation enters only through the
//! surface-crossing trigonometry.

use bevy::math::Vec2;
use serde::{Deserialize, Serialize};

use super::sampler::HeightSampler;
use crate::constants::{BODY_OUTSIDE_GRID_ERROR, MIN_TAN, ZERO_AREA_COLLIDER_ERROR};
use crate::utils::{normalized_angle, triangle_area, triangle_centroid};

/// Pose of the rigid body for one evaluation, owned by the external physics
/// integrator and read-only here.
#[derive(Debug, Clone, Copy)]
pub struct BodyPose {
    pub position: Vec2,
    /// Rotation in radians; normalized into `[-PI, PI]` before use.
    pub rotation: f32,
    /// Symmetric collider half-extents.
    pub half_extents: Vec2,
}

impl BodyPose {
    pub fn new(position: Vec2, rotation: f32, half_extents: Vec2) -> Self {
        Self {
            position,
            rotation,
            half_extents,
        }
    }

    /// Full collider size.
    #[inline]
    pub fn size(&self) -> Vec2 {
        2.0 * self.half_extents
    }

    /// World-space corners, clockwise from top-left, axis-aligned.
    pub fn corners(&self) -> [Vec2; 4] {
        let center = self.position;
        let extents = self.half_extents;
        [
            Vec2::new(center.x - extents.x, center.y + extents.y),
            Vec2::new(center.x + extents.x, center.y + extents.y),
            Vec2::new(center.x + extents.x, center.y - extents.y),
            Vec2::new(center.x - extents.x, center.y - extents.y),
        ]
    }
}

/// Force coefficients of a floating body.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BuoyancyParams {
    /// Upward force applied when the collider is fully submerged; partial
    /// submersion scales it by the submerged area fraction.
    pub buoyancy: f32,
    /// Linear drag contributed by the water, scaled by the submerged
    /// fraction and added on top of `linear_drag_air`.
    pub linear_drag: f32,
    pub linear_drag_air: f32,
    /// Angular drag contributed by the water, scaled like `linear_drag`.
    pub angular_drag: f32,
    pub angular_drag_air: f32,
    /// Scale of the horizontal restoring force proportional to the waterline
    /// slope; pushes the body toward level.
    pub lateral_force_factor: f32,
}

impl Default for BuoyancyParams {
    fn default() -> Self {
        Self {
            buoyancy: 30.0,
            linear_drag: 2.0,
            linear_drag_air: 0.05,
            angular_drag: 3.0,
            angular_drag_air: 0.05,
            lateral_force_factor: 1.0,
        }
    }
}

/// One of the body's corners found at or below the water line.
#[derive(Debug, Clone, Copy)]
struct UnderwaterCorner {
    position: Vec2,
    water_height: f32,
    /// Corner index 0..3, clockwise from top-left.
    index: usize,
}

impl UnderwaterCorner {
    /// How far below the water line the corner sits; never negative.
    #[inline]
    fn depth(&self) -> f32 {
        self.water_height - self.position.y
    }
}

/// Geometry of the submerged part of the body for one evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Submersion {
    Dry,
    Full,
    Partial {
        area: f32,
        centroid: Vec2,
        /// Slope of the surface segment between the outermost crossing
        /// points.
        slope: f32,
    },
}

/// Output of one buoyancy evaluation, consumed by the rigid-body integrator.
#[derive(Debug, Clone, Copy)]
pub struct SubmersionForces {
    /// Combined buoyant (vertical) and lateral (horizontal) force.
    pub force: Vec2,
    /// Point the force acts through: the submerged-region centroid, or the
    /// body center when fully submerged.
    pub application_point: Vec2,
    pub linear_drag: f32,
    pub angular_drag: f32,
    pub submerged_area: f32,
    /// `submerged_area / collider_area`, clamped to `[0, 1]`.
    pub submerged_fraction: f32,
    pub surface_slope: f32,
    pub corners_underwater: usize,
}

/// Computes the force and drag a partially submerged body receives from the
/// water surface under it.
///
/// `grid_offset` is the body's horizontal position in grid space; each corner
/// samples the water height at `(grid_offset.x + corner.x, grid_offset.y)`.
/// The body's horizontal extent must stay within the padded grid, and the
/// collider must have non-zero area; both are enforced loudly.
pub fn evaluate_buoyancy(
    pose: &BodyPose,
    params: &BuoyancyParams,
    grid_offset: Vec2,
    sampler: &HeightSampler<'_>,
) -> SubmersionForces {
    let size = pose.size();
    let collider_area = size.x * size.y;
    assert!(collider_area > 0.0, "{}", ZERO_AREA_COLLIDER_ERROR);

    let underwater = underwater_corners(pose, grid_offset, sampler);
    let corners_underwater = underwater.len();

    let submersion = match corners_underwater {
        0 => Submersion::Dry,
        4 => Submersion::Full,
        _ => {
            let rotation = normalized_angle(pose.rotation);
            partial_region(&underwater, rotation, size)
        }
    };

    match submersion {
        Submersion::Dry => SubmersionForces {
            force: Vec2::ZERO,
            application_point: pose.position,
            linear_drag: params.linear_drag_air,
            angular_drag: params.angular_drag_air,
            submerged_area: 0.0,
            submerged_fraction: 0.0,
            surface_slope: 0.0,
            corners_underwater,
        },
        Submersion::Full => SubmersionForces {
            force: params.buoyancy * Vec2::Y,
            application_point: pose.position,
            linear_drag: params.linear_drag_air + params.linear_drag,
            angular_drag: params.angular_drag_air + params.angular_drag,
            submerged_area: collider_area,
            submerged_fraction: 1.0,
            surface_slope: 0.0,
            corners_underwater,
        },
        Submersion::Partial {
            area,
            centroid,
            slope,
        } => {
            let area_ratio = area / collider_area;
            let fraction = area_ratio.clamp(0.0, 1.0);
            let buoyant_force = fraction * params.buoyancy * Vec2::Y;
            let lateral_force = -fraction * slope * params.lateral_force_factor * Vec2::X;
            SubmersionForces {
                force: buoyant_force + lateral_force,
                application_point: centroid,
                linear_drag: params.linear_drag_air + params.linear_drag * area_ratio,
                angular_drag: params.angular_drag_air + params.angular_drag * area_ratio,
                submerged_area: area,
                submerged_fraction: fraction,
                surface_slope: slope,
                corners_underwater,
            }
        }
    }
}

/// Samples the water height under each corner and keeps the corners at or
/// below it, in corner-index order.
fn underwater_corners(
    pose: &BodyPose,
    grid_offset: Vec2,
    sampler: &HeightSampler<'_>,
) -> Vec<UnderwaterCorner> {
    let mut underwater = Vec::with_capacity(4);
    for (index, position) in pose.corners().into_iter().enumerate() {
        let sample_point = Vec2::new(grid_offset.x + position.x, grid_offset.y);
        let water_height = sampler.height_at(sample_point).expect(BODY_OUTSIDE_GRID_ERROR);
        if position.y <= water_height {
            underwater.push(UnderwaterCorner {
                position,
                water_height,
                index,
            });
        }
    }
    underwater
}

fn partial_region(underwater: &[UnderwaterCorner], rotation: f32, size: Vec2) -> Submersion {
    match underwater.len() {
        1 => one_corner_region(underwater[0], rotation, size),
        2 => two_corner_region(underwater[0], underwater[1], rotation, size),
        3 => three_corner_region(underwater, rotation, size),
        count => unreachable!("partial submersion with {count} corners"),
    }
}

/// Crossing offset along a shallow edge (slope `tan`), clamped so the surface
/// point cannot escape the collider's horizontal span.
#[inline]
fn shallow_span(depth: f32, tan_abs: f32, width: f32) -> f32 {
    (depth * tan_abs).clamp(0.0, width)
}

/// Crossing offset along a steep edge (slope `1/tan`), saturating at the
/// collider width as the tilt approaches axis alignment.
#[inline]
fn steep_span(depth: f32, tan_abs: f32, width: f32) -> f32 {
    if tan_abs < MIN_TAN {
        width
    } else {
        (depth / tan_abs).clamp(0.0, width)
    }
}

/// Slope of the surface segment between two crossing points; vertical
/// segments count as level.
fn surface_slope(a: Vec2, b: Vec2) -> f32 {
    let dx = a.x - b.x;
    if dx.abs() < f32::EPSILON {
        0.0
    } else {
        (a.y - b.y) / dx
    }
}

/// Sums weighted triangles into a partial submersion. Degenerate zero-area
/// regions keep a finite centroid instead of dividing by zero.
fn weighted_region(triangles: &[(f32, Vec2)], fallback_centroid: Vec2, slope: f32) -> Submersion {
    let area: f32 = triangles.iter().map(|(area, _)| area).sum();
    let centroid = if area > f32::EPSILON {
        triangles
            .iter()
            .map(|(area, centroid)| *centroid * *area)
            .sum::<Vec2>()
            / area
    } else {
        fallback_centroid
    };
    Submersion::Partial {
        area,
        centroid,
        slope,
    }
}

/// Single submerged corner: the region is one triangle between the corner and
/// the two points where its adjacent edges cross the surface.
fn one_corner_region(corner: UnderwaterCorner, rotation: f32, size: Vec2) -> Submersion {
    let tan = rotation.tan();
    let tan_abs = tan.abs();
    let depth = corner.depth();

    // One adjacent edge is shallow, the other steep; which is which follows
    // the tilt sign.
    let shallow = shallow_span(depth, tan_abs, size.x).copysign(-tan);
    let steep = steep_span(depth, tan_abs, size.x).copysign(tan);

    let surface_a = Vec2::new(corner.position.x + shallow, corner.water_height);
    let surface_b = Vec2::new(corner.position.x + steep, corner.water_height);

    weighted_region(
        &[(
            triangle_area(corner.position, surface_a, surface_b),
            triangle_centroid(corner.position, surface_a, surface_b),
        )],
        corner.position,
        surface_slope(surface_a, surface_b),
    )
}

/// Two submerged corners: a quadrilateral split into two triangles sharing
/// the diagonal between the corners.
fn two_corner_region(
    first: UnderwaterCorner,
    second: UnderwaterCorner,
    rotation: f32,
    size: Vec2,
) -> Submersion {
    let tan = rotation.tan();

    let surface_a = Vec2::new(
        first.position.x - (first.depth() * tan).clamp(-size.x, size.x),
        first.water_height,
    );
    let surface_b = Vec2::new(
        second.position.x - (second.depth() * tan).clamp(-size.x, size.x),
        second.water_height,
    );

    let triangle_one = (
        triangle_area(surface_a, surface_b, first.position),
        triangle_centroid(surface_a, surface_b, first.position),
    );
    let triangle_two = (
        triangle_area(second.position, surface_b, first.position),
        triangle_centroid(second.position, surface_b, first.position),
    );

    weighted_region(
        &[triangle_one, triangle_two],
        (first.position + second.position) / 2.0,
        surface_slope(surface_a, surface_b),
    )
}

/// Three submerged corners: the pentagon is fanned into three triangles from
/// the corner diagonally opposite the dry one.
fn three_corner_region(underwater: &[UnderwaterCorner], rotation: f32, size: Vec2) -> Submersion {
    let tan = rotation.tan();
    let tan_abs = tan.abs();

    // The water line falls toward the side the body tilts away from, so the
    // tilt direction fixes which top corner stays dry; the fan apex is the
    // submerged corner diagonally opposite it. If wave curvature dried a
    // different corner, fall back to the first submerged one (the pentagon is
    // convex, so any vertex fans it correctly).
    let apex_index = if tan >= 0.0 { 2 } else { 3 };
    let mut apex = underwater[0];
    let mut left = underwater[1];
    let mut right = underwater[2];
    for i in 0..3 {
        if underwater[i].index == apex_index {
            apex = underwater[i];
            left = underwater[(i + 1) % 3];
            right = underwater[(i + 2) % 3];
        }
    }

    // The two crossings sit on the edges adjacent to the dry corner: one
    // shallow, one steep, swapping sides with the tilt sign.
    let (left_offset, right_offset) = if tan >= 0.0 {
        (
            shallow_span(left.depth(), tan_abs, size.x),
            -steep_span(right.depth(), tan_abs, size.x),
        )
    } else {
        (
            steep_span(left.depth(), tan_abs, size.x),
            -shallow_span(right.depth(), tan_abs, size.x),
        )
    };

    let left_surface = Vec2::new(left.position.x + left_offset, left.water_height);
    let right_surface = Vec2::new(right.position.x + right_offset, right.water_height);

    let triangles = [
        (
            triangle_area(apex.position, left.position, left_surface),
            triangle_centroid(apex.position, left.position, left_surface),
        ),
        (
            triangle_area(apex.position, left_surface, right_surface),
            triangle_centroid(apex.position, left_surface, right_surface),
        ),
        (
            triangle_area(apex.position, right_surface, right.position),
            triangle_centroid(apex.position, right_surface, right.position),
        ),
    ];

    weighted_region(
        &triangles,
        apex.position,
        surface_slope(left_surface, right_surface),
    )
}
