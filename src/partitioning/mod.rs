//! Spatial partitioning tools.

pub use self::kd_tree::{
    BuildMode, KdNode, KdTree, LeafStats, Leaves, NearestItem, NodeId, NodeKind, QueryWorkspace,
    TreeBuildError, MAX_DEPTH,
};
pub use self::splitter::{MidpointSplitter, SahSplitter, SplitDecision, Splitter};

use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::shape::Triangle;

mod kd_tree;
mod splitter;

/// Trait implemented by shapes that can be stored in a [`KdTree`].
pub trait SpatialItem {
    /// The axis-aligned bounding box of this item.
    fn aabb(&self) -> Aabb;

    /// The squared distance between this item and `pt`.
    fn distance_squared_to_point(&self, pt: &Point<Real>) -> Real;

    /// The distance between this item and `pt`.
    #[inline]
    fn distance_to_point(&self, pt: &Point<Real>) -> Real {
        self.distance_squared_to_point(pt).sqrt()
    }
}

impl SpatialItem for Triangle {
    #[inline]
    fn aabb(&self) -> Aabb {
        self.local_aabb()
    }

    #[inline]
    fn distance_squared_to_point(&self, pt: &Point<Real>) -> Real {
        Triangle::distance_squared_to_point(self, pt)
    }
}
