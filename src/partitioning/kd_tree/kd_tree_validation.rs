use crate::math::DIM;
use crate::partitioning::{KdTree, NodeId, NodeKind, MAX_DEPTH};
use std::collections::HashSet;

impl<T> KdTree<T> {
    /// Panics if the tree isn't well-formed.
    ///
    /// The tree is well-formed if it is topologically correct (every node is
    /// reachable from the root exactly once, internal nodes have at least one
    /// child, children sit exactly one level below their parent) and
    /// geometrically correct (child boxes are contained in their parent's box,
    /// every leaf holds at least one item, and the box of every item of a leaf
    /// intersects the leaf's box).
    ///
    /// This is mostly a utility for tests and debugging.
    pub fn assert_well_formed(&self) {
        assert!(!self.nodes.is_empty(), "a tree always has a root node");
        assert_eq!(self.root().depth(), 0);
        assert_eq!(self.items.len(), self.item_aabbs.len());

        let mut loop_detection = HashSet::new();
        let mut leaf_items = HashSet::new();
        let num_leaves =
            self.assert_well_formed_recurse(NodeId::ROOT, &mut loop_detection, &mut leaf_items);

        assert_eq!(
            loop_detection.len(),
            self.nodes.len(),
            "every node must be reachable from the root"
        );
        assert_eq!(num_leaves, self.num_leaves);
        assert_eq!(
            leaf_items.len(),
            self.items.len(),
            "every item must be referenced by at least one leaf"
        );
    }

    fn assert_well_formed_recurse(
        &self,
        id: NodeId,
        loop_detection: &mut HashSet<NodeId>,
        leaf_items: &mut HashSet<u32>,
    ) -> usize {
        let node = self.node(id);

        if !loop_detection.insert(id) {
            panic!("Detected loop. Node {} visited twice.", id.index());
        }

        for dim in 0..DIM {
            assert!(node.aabb.mins[dim] <= node.aabb.maxs[dim]);
        }

        match &node.kind {
            NodeKind::Leaf { items } => {
                assert!(node.depth <= MAX_DEPTH);
                assert!(!items.is_empty(), "leaves hold at least one item");

                for item in items {
                    assert!((*item as usize) < self.items.len());
                    assert!(self.item_aabbs[*item as usize].intersects(&node.aabb));
                    let _ = leaf_items.insert(*item);
                }

                1
            }
            NodeKind::Internal { left, right } => {
                assert!(
                    left.is_some() || right.is_some(),
                    "internal nodes have at least one child"
                );

                let mut num_leaves = 0;

                for child in [*left, *right].into_iter().flatten() {
                    let child_node = self.node(child);
                    assert_eq!(child_node.depth, node.depth + 1);

                    for dim in 0..DIM {
                        assert!(child_node.aabb.mins[dim] >= node.aabb.mins[dim]);
                        assert!(child_node.aabb.maxs[dim] <= node.aabb.maxs[dim]);
                    }

                    num_leaves += self.assert_well_formed_recurse(child, loop_detection, leaf_items);
                }

                num_leaves
            }
        }
    }
}
