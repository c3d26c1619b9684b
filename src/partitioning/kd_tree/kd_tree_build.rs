use crate::bounding_volume::Aabb;
use super::kd_tree::NodeId;
use crate::partitioning::{
    KdNode, KdTree, NodeKind, SpatialItem, SplitDecision, Splitter, TreeBuildError, MAX_DEPTH,
};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Number of items below which [`BuildMode::Auto`] always builds sequentially.
#[cfg(feature = "parallel")]
const MIN_PARALLEL_ITEMS: usize = 1024;
/// Upper bound on the depth of the sequential phase of a parallel build.
#[cfg(feature = "parallel")]
const MAX_FRONTIER_DEPTH: u32 = 8;

/// Strategy controlling how [`KdTree`] construction is scheduled across threads.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum BuildMode {
    /// Build in parallel if the workload is large enough and the rayon thread
    /// pool has more than one thread. Falls back to a sequential build
    /// otherwise, or when the `parallel` feature is disabled.
    #[default]
    Auto,
    /// Build on the calling thread only.
    Sequential,
    /// Build on the rayon thread pool regardless of the workload size.
    #[cfg(feature = "parallel")]
    Parallel,
}

impl<T: SpatialItem> KdTree<T> {
    /// Builds a tree containing the given items.
    ///
    /// Equivalent to [`Self::with_mode`] with [`BuildMode::Auto`].
    ///
    /// Returns [`TreeBuildError::EmptyItems`] if `items` is empty.
    pub fn new<S: Splitter + Sync>(items: Vec<T>, splitter: &S) -> Result<Self, TreeBuildError> {
        Self::with_mode(items, splitter, BuildMode::default())
    }

    /// Builds a tree containing the given items, with an explicit scheduling mode.
    ///
    /// The splitting strategy decides both the structure of the tree and when
    /// nodes are kept as leaves. Whatever the mode, the resulting tree does not
    /// depend on the number of threads involved.
    ///
    /// Returns [`TreeBuildError::EmptyItems`] if `items` is empty.
    pub fn with_mode<S: Splitter + Sync>(
        items: Vec<T>,
        splitter: &S,
        mode: BuildMode,
    ) -> Result<Self, TreeBuildError> {
        if items.is_empty() {
            return Err(TreeBuildError::EmptyItems);
        }

        let item_aabbs: Vec<Aabb> = items.iter().map(|item| item.aabb()).collect();
        let mut root_aabb = Aabb::new_invalid();

        for aabb in &item_aabbs {
            root_aabb.merge(aabb);
        }

        let indices: Vec<u32> = (0..items.len() as u32).collect();
        let mut tree = KdTree {
            items,
            item_aabbs,
            nodes: Vec::new(),
            num_leaves: 0,
        };

        match mode {
            #[cfg(feature = "parallel")]
            BuildMode::Auto
                if tree.items.len() >= MIN_PARALLEL_ITEMS
                    && rayon::current_num_threads() > 1 =>
            {
                tree.build_parallel(root_aabb, indices, splitter)
            }
            #[cfg(feature = "parallel")]
            BuildMode::Parallel => tree.build_parallel(root_aabb, indices, splitter),
            _ => {
                let _ = build_node(
                    &mut tree.nodes,
                    &mut tree.num_leaves,
                    &tree.item_aabbs,
                    splitter,
                    root_aabb,
                    indices,
                    0,
                    MAX_DEPTH,
                );
            }
        }

        log::debug!(
            "built kd-tree: {} items, {} nodes, {} leaves",
            tree.items.len(),
            tree.nodes.len(),
            tree.num_leaves
        );

        Ok(tree)
    }
}

#[cfg(feature = "parallel")]
impl<T> KdTree<T> {
    /// Builds the upper levels of the tree sequentially, then hands each leaf of
    /// that partial tree to the thread pool and splices the resulting subtrees
    /// back into the node storage.
    fn build_parallel<S: Splitter + Sync>(
        &mut self,
        root_aabb: Aabb,
        indices: Vec<u32>,
        splitter: &S,
    ) {
        let phase_depth = parallel_phase_depth(rayon::current_num_threads());
        let mut phase_leaves = 0;
        let _ = build_node(
            &mut self.nodes,
            &mut phase_leaves,
            &self.item_aabbs,
            splitter,
            root_aabb,
            indices,
            0,
            phase_depth,
        );

        let mut frontier = Vec::new();

        for (i, node) in self.nodes.iter_mut().enumerate() {
            if node.is_leaf() {
                let items = node.take_leaf_items();
                frontier.push((NodeId(i as u32), node.aabb, node.depth, items));
            }
        }

        let item_aabbs = &self.item_aabbs;
        let subtrees: Vec<(NodeId, Vec<KdNode>, usize)> = frontier
            .into_par_iter()
            .map(|(frontier_id, aabb, depth, indices)| {
                let mut local_nodes = Vec::new();
                let mut local_leaves = 0;
                let _ = build_node(
                    &mut local_nodes,
                    &mut local_leaves,
                    item_aabbs,
                    splitter,
                    aabb,
                    indices,
                    depth,
                    MAX_DEPTH,
                );
                (frontier_id, local_nodes, local_leaves)
            })
            .collect();

        for (frontier_id, local_nodes, local_leaves) in subtrees {
            // Each subtree arena starts with its own root. That root replaces
            // the frontier leaf in-place while the rest is appended, hence the
            // `- 1` in the child index remapping.
            let base = self.nodes.len() as u32;
            let mut local_nodes = local_nodes.into_iter();

            if let Some(subtree_root) = local_nodes.next() {
                self.nodes[frontier_id.index()] = remap_children(subtree_root, base);
            }

            for node in local_nodes {
                self.nodes.push(remap_children(node, base));
            }

            self.num_leaves += local_leaves;
        }
    }
}

/// Appends the node covering `aabb` and containing `indices` to the arena,
/// recursively splitting it as long as the splitter keeps finding acceptable
/// split planes and `max_depth` is not reached.
///
/// A node is always pushed before its children, so a subtree occupies a
/// root-first range of the arena.
#[allow(clippy::too_many_arguments)]
fn build_node<S: Splitter>(
    nodes: &mut Vec<KdNode>,
    num_leaves: &mut usize,
    item_aabbs: &[Aabb],
    splitter: &S,
    aabb: Aabb,
    indices: Vec<u32>,
    depth: u32,
    max_depth: u32,
) -> NodeId {
    let id = NodeId(nodes.len() as u32);
    nodes.push(KdNode {
        aabb,
        depth,
        kind: NodeKind::Leaf { items: Vec::new() },
    });

    let decision = if depth < max_depth {
        splitter.split(&aabb, item_aabbs, &indices)
    } else {
        None
    };

    match decision {
        Some(decision) => {
            let (left_indices, right_indices) = partition_indices(item_aabbs, &indices, &decision);
            let (left_aabb, right_aabb) = split_aabb(&aabb, &decision);

            let left = if left_indices.is_empty() {
                None
            } else {
                Some(build_node(
                    nodes,
                    num_leaves,
                    item_aabbs,
                    splitter,
                    left_aabb,
                    left_indices,
                    depth + 1,
                    max_depth,
                ))
            };
            let right = if right_indices.is_empty() {
                None
            } else {
                Some(build_node(
                    nodes,
                    num_leaves,
                    item_aabbs,
                    splitter,
                    right_aabb,
                    right_indices,
                    depth + 1,
                    max_depth,
                ))
            };

            nodes[id.index()].kind = NodeKind::Internal { left, right };
        }
        None => {
            nodes[id.index()].kind = NodeKind::Leaf { items: indices };
            *num_leaves += 1;
        }
    }

    id
}

/// Distributes `indices` on both sides of the split plane. Items overlapping
/// the plane end up on both sides.
fn partition_indices(
    item_aabbs: &[Aabb],
    indices: &[u32],
    decision: &SplitDecision,
) -> (Vec<u32>, Vec<u32>) {
    // The counts reported by the splitter may be estimates: they are used as
    // capacity hints only.
    let mut left = Vec::with_capacity(decision.num_left);
    let mut right = Vec::with_capacity(decision.num_right);

    for id in indices {
        let aabb = &item_aabbs[*id as usize];

        if aabb.maxs[decision.axis] < decision.position {
            left.push(*id);
        } else if aabb.mins[decision.axis] >= decision.position {
            right.push(*id);
        } else {
            left.push(*id);
            right.push(*id);
        }
    }

    (left, right)
}

fn split_aabb(aabb: &Aabb, decision: &SplitDecision) -> (Aabb, Aabb) {
    let mut left = *aabb;
    let mut right = *aabb;
    left.maxs[decision.axis] = decision.position;
    right.mins[decision.axis] = decision.position;
    (left, right)
}

#[cfg(feature = "parallel")]
fn remap_children(mut node: KdNode, base: u32) -> KdNode {
    if let NodeKind::Internal { left, right } = &mut node.kind {
        if let Some(left) = left {
            left.0 += base - 1;
        }
        if let Some(right) = right {
            right.0 += base - 1;
        }
    }
    node
}

#[cfg(feature = "parallel")]
fn parallel_phase_depth(num_threads: usize) -> u32 {
    let floor_log2 = usize::BITS - 1 - num_threads.leading_zeros();
    floor_log2.min(MAX_FRONTIER_DEPTH)
}
