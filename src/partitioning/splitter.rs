//! Splitting strategies driving the construction of a [`KdTree`](super::KdTree).

use crate::bounding_volume::Aabb;
use crate::math::{Real, DIM};

/// Number of candidate planes considered along each axis.
const NUM_BINS: usize = 33;
/// Axis extents below this length are considered degenerate and are never split.
const LENGTH_EPSILON: Real = 1.0e-8;
/// Estimated cost of descending one extra tree level.
const COST_TRAVERSAL: Real = 1.0;
/// Estimated cost of computing one point/item distance.
const COST_INTERSECTION: Real = 2.0;

/// The outcome of a successful splitting attempt.
///
/// The split plane is orthogonal to `axis` and crosses it at `position`.
/// Items overlapping the plane are assigned to both sides, so `num_left`
/// and `num_right` may sum to more than the number of items being split.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct SplitDecision {
    /// The index of the coordinate axis orthogonal to the split plane.
    pub axis: usize,
    /// The coordinate at which the split plane crosses `axis`.
    pub position: Real,
    /// The number of items assigned to the negative side of the plane.
    pub num_left: usize,
    /// The number of items assigned to the positive side of the plane.
    pub num_right: usize,
}

/// Trait implemented by strategies deciding where (and whether) a tree node is split.
pub trait Splitter {
    /// Selects a split plane for a node covering `node_aabb` and containing the
    /// items identified by `indices`, or `None` if the node should stay a leaf.
    ///
    /// `item_aabbs` is indexed by item id, not by position in `indices`.
    fn split(
        &self,
        node_aabb: &Aabb,
        item_aabbs: &[Aabb],
        indices: &[u32],
    ) -> Option<SplitDecision>;
}

/// A splitter based on the Surface Area Heuristic.
///
/// Candidate planes are placed on a regular grid of 33 slots per axis. The
/// plane minimizing the expected query cost is selected, and the
/// split is refused altogether whenever scanning the node linearly is
/// estimated to be cheaper than descending into two children.
#[derive(Copy, Clone, Debug, Default)]
pub struct SahSplitter;

impl Splitter for SahSplitter {
    fn split(
        &self,
        node_aabb: &Aabb,
        item_aabbs: &[Aabb],
        indices: &[u32],
    ) -> Option<SplitDecision> {
        let lengths = node_aabb.extents();

        for dim in 0..DIM {
            if lengths[dim] < LENGTH_EPSILON {
                return None;
            }
        }

        // Half-area terms of the node box, grouped by the axis a plane would cut.
        let len_mul = [
            lengths[1] * lengths[2],
            lengths[0] * lengths[2],
            lengths[0] * lengths[1],
        ];
        let len_sum = [
            lengths[1] + lengths[2],
            lengths[0] + lengths[2],
            lengths[0] + lengths[1],
        ];
        let half_area = len_mul[0] + len_mul[1] + len_mul[2];

        // One extra slot catches corners landing exactly on the upper bound.
        let mut bins_low = [[0usize; NUM_BINS + 1]; DIM];
        let mut bins_high = [[0usize; NUM_BINS + 1]; DIM];

        for id in indices {
            let aabb = &item_aabbs[*id as usize];

            for dim in 0..DIM {
                // Corners lying outside of the node box generate no event: the
                // item then counts as overlapping every candidate plane on the
                // side it sticks out of.
                if aabb.mins[dim] >= node_aabb.mins[dim] {
                    let bin = (((aabb.mins[dim] - node_aabb.mins[dim]) / lengths[dim])
                        * NUM_BINS as Real) as usize;
                    bins_low[dim][bin.min(NUM_BINS)] += 1;
                }

                if aabb.maxs[dim] <= node_aabb.maxs[dim] {
                    let bin = (((aabb.maxs[dim] - node_aabb.mins[dim]) / lengths[dim])
                        * NUM_BINS as Real) as usize;
                    bins_high[dim][bin.min(NUM_BINS)] += 1;
                }
            }
        }

        for dim in 0..DIM {
            bins_low[dim][NUM_BINS - 1] += bins_low[dim][NUM_BINS];
            bins_high[dim][NUM_BINS - 1] += bins_high[dim][NUM_BINS];

            // After these sums, `bins_low[dim][i]` counts the items lying
            // entirely on the positive side of plane `i`, and
            // `bins_high[dim][i]` the items lying entirely on the negative
            // side of plane `i + 1`.
            for i in (0..NUM_BINS - 1).rev() {
                bins_low[dim][i] += bins_low[dim][i + 1];
            }

            for i in 1..NUM_BINS {
                bins_high[dim][i] += bins_high[dim][i - 1];
            }
        }

        let num_items = indices.len();
        let mut best_cost = Real::MAX;
        let mut best_dim = 0;
        let mut best_plane = 1;

        for dim in 0..DIM {
            for plane in 1..NUM_BINS {
                let coef = plane as Real / NUM_BINS as Real;
                let area_left = coef * lengths[dim] * len_sum[dim] + len_mul[dim];
                let area_right = half_area + len_mul[dim] - area_left;
                let cost = area_left * (num_items - bins_low[dim][plane]) as Real
                    + area_right * (num_items - bins_high[dim][plane - 1]) as Real;

                if cost < best_cost {
                    best_cost = cost;
                    best_dim = dim;
                    best_plane = plane;
                }
            }
        }

        let leaf_cost = num_items as Real * COST_INTERSECTION;
        let split_cost = COST_INTERSECTION * best_cost / half_area + COST_TRAVERSAL;

        if leaf_cost < split_cost {
            return None;
        }

        let num_right_only = bins_low[best_dim][best_plane];
        let num_left_only = bins_high[best_dim][best_plane - 1];
        let num_both = num_items - num_left_only - num_right_only;
        let position = node_aabb.mins[best_dim]
            + lengths[best_dim] * (best_plane as Real / NUM_BINS as Real);

        Some(SplitDecision {
            axis: best_dim,
            position,
            num_left: num_left_only + num_both,
            num_right: num_right_only + num_both,
        })
    }
}

/// A splitter cutting nodes at the middle of their longest axis.
///
/// Cheaper to evaluate than [`SahSplitter`] but blind to the distribution of
/// the items, so the resulting trees are usually deeper and less balanced.
#[derive(Copy, Clone, Debug)]
pub struct MidpointSplitter {
    /// Nodes holding this many items or fewer are kept as leaves.
    pub max_leaf_items: usize,
}

impl MidpointSplitter {
    /// A midpoint splitter keeping nodes with up to `max_leaf_items` items as leaves.
    pub fn new(max_leaf_items: usize) -> Self {
        Self { max_leaf_items }
    }
}

impl Default for MidpointSplitter {
    fn default() -> Self {
        Self::new(32)
    }
}

impl Splitter for MidpointSplitter {
    fn split(
        &self,
        node_aabb: &Aabb,
        item_aabbs: &[Aabb],
        indices: &[u32],
    ) -> Option<SplitDecision> {
        if indices.len() <= self.max_leaf_items {
            return None;
        }

        let extents = node_aabb.extents();
        let mut axis = 0;

        for dim in 1..DIM {
            if extents[dim] > extents[axis] {
                axis = dim;
            }
        }

        if extents[axis] < LENGTH_EPSILON {
            return None;
        }

        let position = node_aabb.mins[axis] + extents[axis] * 0.5;
        let mut num_left = 0;
        let mut num_right = 0;

        for id in indices {
            let aabb = &item_aabbs[*id as usize];

            if aabb.maxs[axis] < position {
                num_left += 1;
            } else if aabb.mins[axis] >= position {
                num_right += 1;
            } else {
                num_left += 1;
                num_right += 1;
            }
        }

        Some(SplitDecision {
            axis,
            position,
            num_left,
            num_right,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Real};

    fn merged(aabbs: &[Aabb]) -> Aabb {
        let mut node_aabb = Aabb::new_invalid();
        for aabb in aabbs {
            node_aabb.merge(aabb);
        }
        node_aabb
    }

    fn all_indices(aabbs: &[Aabb]) -> Vec<u32> {
        (0..aabbs.len() as u32).collect()
    }

    #[test]
    fn sah_keeps_overlapping_items_together() {
        // Every item overlaps every candidate plane, so no split can reduce
        // the number of distance tests and the node must stay a leaf.
        let mut aabbs = Vec::new();
        for i in 0..40 {
            let jitter = i as Real * 1.0e-3;
            aabbs.push(Aabb::new(
                Point::new(-1.0 - jitter, -1.0, -1.0),
                Point::new(1.0 + jitter, 1.0, 1.0),
            ));
        }

        let node_aabb = merged(&aabbs);
        let indices = all_indices(&aabbs);
        assert!(SahSplitter.split(&node_aabb, &aabbs, &indices).is_none());
    }

    #[test]
    fn sah_separates_two_distant_clusters() {
        let mut aabbs = Vec::new();
        for _ in 0..25 {
            aabbs.push(Aabb::new(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 1.0)));
        }
        for _ in 0..25 {
            aabbs.push(Aabb::new(Point::new(9.0, 0.0, 0.0), Point::new(10.0, 1.0, 1.0)));
        }

        let node_aabb = merged(&aabbs);
        let indices = all_indices(&aabbs);
        let decision = SahSplitter
            .split(&node_aabb, &aabbs, &indices)
            .expect("two distant clusters must be split apart");

        assert_eq!(decision.axis, 0);
        assert!(decision.position > 1.0 && decision.position < 9.0);
        assert_eq!(decision.num_left, 25);
        assert_eq!(decision.num_right, 25);
    }

    #[test]
    fn sah_refuses_flat_nodes() {
        // Well-separated along x, but the node is completely flat along z.
        let mut aabbs = Vec::new();
        for i in 0..50 {
            let x = i as Real;
            aabbs.push(Aabb::new(Point::new(x, 0.0, 0.0), Point::new(x + 0.5, 1.0, 0.0)));
        }

        let node_aabb = merged(&aabbs);
        let indices = all_indices(&aabbs);
        assert!(SahSplitter.split(&node_aabb, &aabbs, &indices).is_none());
    }

    #[test]
    fn midpoint_splits_on_longest_axis() {
        let mut aabbs = Vec::new();
        for i in 0..40 {
            let y = i as Real * 0.5;
            aabbs.push(Aabb::new(Point::new(0.0, y, 0.0), Point::new(1.0, y + 0.25, 1.0)));
        }

        let node_aabb = merged(&aabbs);
        let indices = all_indices(&aabbs);
        let decision = MidpointSplitter::default()
            .split(&node_aabb, &aabbs, &indices)
            .expect("40 items exceed the default leaf capacity");

        assert_eq!(decision.axis, 1);
        assert_relative_eq!(decision.position, 9.875);
        assert_eq!(decision.num_left, 20);
        assert_eq!(decision.num_right, 20);
    }

    #[test]
    fn midpoint_respects_leaf_capacity() {
        let mut aabbs = Vec::new();
        for i in 0..30 {
            let x = i as Real;
            aabbs.push(Aabb::new(Point::new(x, 0.0, 0.0), Point::new(x + 0.5, 1.0, 1.0)));
        }

        let node_aabb = merged(&aabbs);
        let indices = all_indices(&aabbs);

        assert!(MidpointSplitter::default()
            .split(&node_aabb, &aabbs, &indices)
            .is_none());
        assert!(MidpointSplitter::new(8)
            .split(&node_aabb, &aabbs, &indices)
            .is_some());
    }
}
