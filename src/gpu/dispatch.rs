//! Kernel dispatch planning - pure functions
//!
//! Computes points-per-triangle, thread-group dimensions, and the total
//! sampled-point count for the two kernel passes. The transform-pass
//! planner uses literal reciprocal constants instead of exact division;
//! the rounding drift they produce is part of the observed point-count
//! behavior and must not be "fixed" to exact fractions.

use crate::constants::sampling::{
    INV_INDEX_GROUP, INV_INDEX_STRIDE, INV_POINT_GROUP, KERNEL_GROUP_SIZE,
};

/// Derived dispatch dimensions, recomputed for every dispatch and never
/// persisted beyond it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchParams {
    pub points_per_triangle: u32,
    pub group_x: u32,
    pub group_y: u32,
    pub total_points: u32,
}

impl DispatchParams {
    /// Plan for an empty triangle buffer: zero groups, so dispatching it
    /// is a no-op instead of a division blowing up the group counts.
    pub const EMPTY: Self = Self {
        points_per_triangle: 0,
        group_x: 0,
        group_y: 0,
        total_points: 0,
    };
}

/// Plan the initial sampling pass.
///
/// `index_count` is the length of the triangle-index buffer (3 per
/// triangle). Groups tile triangles and points in batches of 10 to match
/// the kernel's declared workgroup size. The trailing `-1` keeps the
/// instanced draw off the last partially-written slot under worst-case
/// rounding.
pub fn plan_sampling(index_count: u32, resolution: u32) -> DispatchParams {
    if index_count == 0 {
        return DispatchParams::EMPTY;
    }

    let triangles = index_count as f32 / 3.0;
    let points_per_triangle = ((resolution * resolution) as f32 / triangles) as u32;
    let group_x = (triangles / KERNEL_GROUP_SIZE as f32).ceil() as u32;
    let group_y = (points_per_triangle as f32 / KERNEL_GROUP_SIZE as f32).ceil() as u32;
    let total_points = (points_per_triangle * (index_count / 3)).saturating_sub(1);

    DispatchParams {
        points_per_triangle,
        group_x,
        group_y,
        total_points,
    }
}

/// Plan a transform-pass dispatch during a transition.
///
/// Same group-of-10 tiling as the sampling pass, expressed through the
/// reciprocal-constant convention. `total_points` here is the candidate
/// count the point-count blend eases toward, not an immediately applied
/// value.
pub fn plan_transform(index_count: u32, resolution: u32) -> DispatchParams {
    if index_count == 0 {
        return DispatchParams::EMPTY;
    }

    let points_per_triangle =
        ((resolution * resolution) as f32 / (index_count as f32 * INV_INDEX_STRIDE)) as u32;
    let group_x = (index_count as f32 * INV_INDEX_GROUP).ceil() as u32;
    let group_y = (points_per_triangle as f32 * INV_POINT_GROUP).ceil() as u32;
    let candidate =
        points_per_triangle as f32 * (index_count as f32 * INV_INDEX_STRIDE) - 1.0;
    let total_points = candidate.max(0.0) as u32;

    DispatchParams {
        points_per_triangle,
        group_x,
        group_y,
        total_points,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sampling_plan_matches_reference_scenario() {
        // resolution 10, 4 triangles (12 indices)
        let plan = plan_sampling(12, 10);
        assert_eq!(plan.points_per_triangle, 25);
        assert_eq!(plan.group_x, 1);
        assert_eq!(plan.group_y, 3);
        assert_eq!(plan.total_points, 99);
    }

    #[test]
    fn sampling_plan_never_exceeds_buffer_capacity() {
        for resolution in [10u32, 50, 100, 500, 1000] {
            for index_count in [3u32, 12, 36, 300] {
                let plan = plan_sampling(index_count, resolution);
                assert!(plan.group_x >= 1, "group_x for ic={index_count} res={resolution}");
                assert!(plan.group_y >= 1, "group_y for ic={index_count} res={resolution}");
                assert!(
                    plan.total_points <= resolution * resolution,
                    "capacity exceeded for ic={index_count} res={resolution}"
                );
            }
        }
    }

    #[test]
    fn transform_plan_uses_reciprocal_constants() {
        // resolution 10, 12 indices: 100 / (12 * 0.33333) = 25.000...
        let plan = plan_transform(12, 10);
        assert_eq!(plan.points_per_triangle, 25);
        assert_eq!(plan.group_x, 1); // ceil(12 * 0.033333) = ceil(0.399996)
        assert_eq!(plan.group_y, 3); // ceil(25 * 0.1)
        // 25 * 3.99996 - 1 = 98.999, truncated
        assert_eq!(plan.total_points, 98);
    }

    #[test]
    fn transform_candidate_saturates_at_zero() {
        // More triangles than resolution^2 points: ppt is 0, candidate -1
        let plan = plan_transform(600, 10);
        assert_eq!(plan.points_per_triangle, 0);
        assert_eq!(plan.total_points, 0);
    }

    #[test]
    fn empty_index_buffer_plans_to_a_no_op_dispatch() {
        // No triangles must never turn into a huge group count; both
        // planners hand back the all-zero plan instead of dividing by it.
        for resolution in [10u32, 100, 1000] {
            assert_eq!(plan_sampling(0, resolution), DispatchParams::EMPTY);
            let plan = plan_transform(0, resolution);
            assert_eq!(plan, DispatchParams::EMPTY);
            assert!(plan.group_y <= 65_535);
        }
    }

    #[test]
    fn transform_plan_bounds_hold_across_range() {
        for resolution in [10u32, 100, 1000] {
            for index_count in [3u32, 12, 96, 300] {
                let plan = plan_transform(index_count, resolution);
                assert!(plan.group_x >= 1);
                assert!(plan.group_y >= 1);
                assert!(plan.total_points <= resolution * resolution);
            }
        }
    }
}
