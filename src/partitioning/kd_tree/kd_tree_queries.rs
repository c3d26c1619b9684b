use crate::math::{Point, Real};
use super::kd_tree::NodeId;
use crate::partitioning::{KdTree, NodeKind, SpatialItem};
use na;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Squared distances below this threshold are reported as exact hits.
const ZERO_DISTANCE_EPSILON: Real = 1.0e-14;

/// The result of a nearest-item query on a [`KdTree`].
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct NearestItem {
    /// The index of the nearest item.
    pub item: u32,
    /// The distance between the query point and the nearest item.
    ///
    /// Reported as exactly `0.0` when the point lies on the item, up to a
    /// small rounding threshold.
    pub distance: Real,
    /// The squared distance between the query point and the nearest item.
    pub distance_squared: Real,
}

impl NearestItem {
    fn from_squared(item: u32, distance_squared: Real) -> Self {
        if distance_squared < ZERO_DISTANCE_EPSILON {
            NearestItem {
                item,
                distance: 0.0,
                distance_squared: 0.0,
            }
        } else {
            NearestItem {
                item,
                distance: distance_squared.sqrt(),
                distance_squared,
            }
        }
    }
}

/// Scratch buffers reused across nearest-item queries.
///
/// Queries only allocate through their workspace, so reusing one across calls
/// makes repeated queries allocation-free. Any number of workspaces can be
/// used with the same tree (typically one per thread), and a single workspace
/// can serve trees of different sizes.
#[derive(Clone, Debug, Default)]
pub struct QueryWorkspace {
    visited: Vec<bool>,
    touched: Vec<u32>,
    traversal_stack: Vec<u32>,
}

impl QueryWorkspace {
    /// A new, empty workspace.
    pub fn new() -> Self {
        QueryWorkspace::default()
    }

    /// Are all the scratch marks of this workspace cleared?
    ///
    /// Queries always leave their workspace clean, including when they return
    /// early, so this only returns `false` if a query panicked halfway.
    pub fn is_empty(&self) -> bool {
        self.touched.is_empty()
            && self.traversal_stack.is_empty()
            && self.visited.iter().all(|visited| !visited)
    }

    fn prepare(&mut self, num_items: usize) {
        if self.visited.len() < num_items {
            self.visited.resize(num_items, false);
        }
    }

    fn reset(&mut self) {
        for item in self.touched.drain(..) {
            self.visited[item as usize] = false;
        }
    }
}

impl<T: SpatialItem> KdTree<T> {
    /// Finds the item nearest to `point`.
    ///
    /// The query first descends to a leaf close to `point` and scans it, then
    /// sweeps the rest of the tree with a search ball shrinking every time a
    /// closer item is found. Each item is evaluated at most once per query,
    /// even when it is referenced from several leaves.
    pub fn find_nearest(&self, point: &Point<Real>, workspace: &mut QueryWorkspace) -> NearestItem {
        workspace.prepare(self.items.len());

        let leaf_id = self.nearest_leaf(point);
        let mut best = NearestItem {
            item: u32::MAX,
            distance: Real::MAX,
            distance_squared: Real::MAX,
        };

        if let Some((item, distance_squared)) = self.scan_leaf(leaf_id, point, workspace) {
            best = NearestItem::from_squared(item, distance_squared);
        }

        // No other leaf can do better if the first one scored an exact hit, or
        // if its box contains the whole search ball.
        if best.distance_squared > ZERO_DISTANCE_EPSILON
            && !self.node(leaf_id).aabb().contains_ball(point, best.distance)
        {
            self.expand_search(point, &mut best, workspace);
        }

        workspace.reset();
        best
    }

    /// Finds the item nearest to `point` among those strictly closer than `radius`.
    ///
    /// Returns `None` if no item lies within that distance, or if `radius` is
    /// not positive (no distance is strictly smaller than a non-positive
    /// radius). The whole tree is swept with a search ball of radius `radius`,
    /// so the tighter the radius, the cheaper the query.
    pub fn find_nearest_in_radius(
        &self,
        point: &Point<Real>,
        radius: Real,
        workspace: &mut QueryWorkspace,
    ) -> Option<NearestItem> {
        if radius <= 0.0 {
            return None;
        }

        workspace.prepare(self.items.len());

        let mut best = NearestItem {
            item: u32::MAX,
            distance: radius,
            distance_squared: radius * radius,
        };

        self.expand_search(point, &mut best, workspace);
        workspace.reset();

        (best.item != u32::MAX).then_some(best)
    }

    /// Resolves one [`Self::find_nearest`] query per point on the rayon thread pool.
    ///
    /// The returned vector is in the same order as `points`, and each worker
    /// thread uses its own [`QueryWorkspace`].
    #[cfg(feature = "parallel")]
    pub fn par_find_nearest(&self, points: &[Point<Real>]) -> Vec<NearestItem>
    where
        T: Sync,
    {
        points
            .par_iter()
            .map_init(QueryWorkspace::new, |workspace, point| {
                self.find_nearest(point, workspace)
            })
            .collect()
    }

    /// Descends the tree towards `point` and returns the leaf reached.
    ///
    /// At each level the child whose box center is closest to `point` is
    /// entered. This is a heuristic: the leaf reached is a good first
    /// candidate, but is not guaranteed to contain the nearest item.
    pub fn nearest_leaf(&self, point: &Point<Real>) -> NodeId {
        let mut id = NodeId::ROOT;

        loop {
            match &self.node(id).kind {
                NodeKind::Leaf { .. } => return id,
                NodeKind::Internal { left, right } => match (left, right) {
                    (Some(left), None) => id = *left,
                    (None, Some(right)) => id = *right,
                    (Some(left), Some(right)) => {
                        let left_center = self.node(*left).aabb.center();
                        let right_center = self.node(*right).aabb.center();

                        if na::distance_squared(point, &left_center)
                            < na::distance_squared(point, &right_center)
                        {
                            id = *left;
                        } else {
                            id = *right;
                        }
                    }
                    (None, None) => unreachable!("internal nodes have at least one child"),
                },
            }
        }
    }

    /// Evaluates the unvisited items of the given leaf and returns the closest
    /// one, with its squared distance to `point`.
    ///
    /// Every item evaluated here is marked as visited, whether or not it ends
    /// up being the best candidate.
    fn scan_leaf(
        &self,
        id: NodeId,
        point: &Point<Real>,
        workspace: &mut QueryWorkspace,
    ) -> Option<(u32, Real)> {
        let mut best: Option<(u32, Real)> = None;

        if let Some(items) = self.node(id).leaf_items() {
            for item in items {
                if workspace.visited[*item as usize] {
                    continue;
                }

                workspace.visited[*item as usize] = true;
                workspace.touched.push(*item);

                let distance_squared = self.items[*item as usize].distance_squared_to_point(point);

                if best.map_or(true, |(_, best_dist2)| distance_squared < best_dist2) {
                    best = Some((*item, distance_squared));
                }
            }
        }

        best
    }

    /// Sweeps the whole tree, pruning every subtree whose box does not touch
    /// the ball centered at `point` with radius `best.distance`. The ball
    /// shrinks as better candidates are found.
    fn expand_search(
        &self,
        point: &Point<Real>,
        best: &mut NearestItem,
        workspace: &mut QueryWorkspace,
    ) {
        workspace.traversal_stack.clear();
        workspace.traversal_stack.push(NodeId::ROOT.0);

        while let Some(id) = workspace.traversal_stack.pop() {
            let node = &self.nodes[id as usize];

            if !node.aabb.intersects_ball(point, best.distance) {
                continue;
            }

            match &node.kind {
                NodeKind::Internal { left, right } => {
                    if let Some(right) = right {
                        workspace.traversal_stack.push(right.0);
                    }

                    if let Some(left) = left {
                        workspace.traversal_stack.push(left.0);
                    }
                }
                NodeKind::Leaf { .. } => {
                    if let Some((item, distance_squared)) =
                        self.scan_leaf(NodeId(id), point, workspace)
                    {
                        if distance_squared < best.distance_squared {
                            *best = NearestItem::from_squared(item, distance_squared);
                        }
                    }
                }
            }
        }
    }
}
