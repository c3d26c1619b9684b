use crate::bounding_volume::Aabb;
use crate::math::Real;

/// The maximum depth of a [`KdTree`].
///
/// Splitting stops at this depth no matter what the splitting strategy decides,
/// so items clustered in a way the splitter cannot separate cannot degenerate
/// into an unbounded chain of nodes.
pub const MAX_DEPTH: u32 = 32;

/// The index of a node inside of a [`KdTree`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct NodeId(pub(super) u32);

impl NodeId {
    /// The index of the root node of any non-empty tree.
    pub const ROOT: NodeId = NodeId(0);

    /// This index as a `usize`, suitable for indexing the tree's node storage.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// The content of a single [`KdTree`] node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// A node with up to two children.
    ///
    /// A missing child means that no item was assigned to the corresponding
    /// half of the split. At least one of the children is always present.
    Internal {
        /// The child covering the negative side of the split plane.
        left: Option<NodeId>,
        /// The child covering the positive side of the split plane.
        right: Option<NodeId>,
    },
    /// A node holding the indices of the items overlapping its box.
    Leaf {
        /// Indices into the tree's item storage.
        items: Vec<u32>,
    },
}

/// A node of a [`KdTree`].
#[derive(Clone, Debug)]
pub struct KdNode {
    pub(super) aabb: Aabb,
    pub(super) depth: u32,
    pub(super) kind: NodeKind,
}

impl KdNode {
    /// The region of space covered by this node.
    ///
    /// Children partition their parent's box along the split plane, so sibling
    /// boxes never overlap. Note that an item assigned to a leaf only needs to
    /// intersect the leaf's box: items are not clipped and may extend past it.
    #[inline]
    pub fn aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// The depth of this node. The root is at depth 0.
    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// The content of this node.
    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Is this node a leaf?
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, NodeKind::Leaf { .. })
    }

    /// The indices of the items stored by this node, or `None` if it is internal.
    #[inline]
    pub fn leaf_items(&self) -> Option<&[u32]> {
        match &self.kind {
            NodeKind::Leaf { items } => Some(items),
            NodeKind::Internal { .. } => None,
        }
    }

    /// The children of this node. Both are `None` if this node is a leaf.
    #[inline]
    pub fn children(&self) -> (Option<NodeId>, Option<NodeId>) {
        match &self.kind {
            NodeKind::Internal { left, right } => (*left, *right),
            NodeKind::Leaf { .. } => (None, None),
        }
    }

    pub(super) fn take_leaf_items(&mut self) -> Vec<u32> {
        match &mut self.kind {
            NodeKind::Leaf { items } => std::mem::take(items),
            NodeKind::Internal { .. } => Vec::new(),
        }
    }
}

/// Error indicating that a [`KdTree`] could not be built.
#[derive(thiserror::Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum TreeBuildError {
    /// A tree cannot be built from an empty set of items.
    #[error("cannot build a tree from an empty set of items")]
    EmptyItems,
}

/// Summary of the leaves of a [`KdTree`], as reported by [`KdTree::leaf_stats`].
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct LeafStats {
    /// The total number of leaves.
    pub num_leaves: usize,
    /// The number of items of the most crowded leaf.
    pub max_items: usize,
    /// The average number of items per leaf.
    pub avg_items: Real,
}

/// A bounding-box tree for nearest-point queries on a fixed set of items.
///
/// The tree owns the items it was built from. Each leaf stores the indices of
/// the items whose bounding box overlaps the leaf's box; an item overlapping a
/// split plane is referenced from both sides, so the same index can appear in
/// several leaves.
///
/// The only way to obtain a tree is to build one with [`KdTree::new`] or
/// [`KdTree::with_mode`]; in particular trees are not deserializable, so
/// every tree in existence upholds the structural invariants checked by
/// [`KdTree::assert_well_formed`].
#[derive(Clone, Debug)]
pub struct KdTree<T> {
    pub(super) items: Vec<T>,
    pub(super) item_aabbs: Vec<Aabb>,
    pub(super) nodes: Vec<KdNode>,
    pub(super) num_leaves: usize,
}

impl<T> KdTree<T> {
    /// The items this tree was built from, in their original order.
    #[inline]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// The bounding boxes of [`Self::items`], computed once at construction time.
    #[inline]
    pub fn item_aabbs(&self) -> &[Aabb] {
        &self.item_aabbs
    }

    /// The root node of this tree.
    #[inline]
    pub fn root(&self) -> &KdNode {
        &self.nodes[NodeId::ROOT.index()]
    }

    /// The box containing all the items of this tree.
    #[inline]
    pub fn root_aabb(&self) -> &Aabb {
        self.root().aabb()
    }

    /// The node at the given index.
    ///
    /// Panics if `id` does not designate a node of this tree.
    #[inline]
    pub fn node(&self, id: NodeId) -> &KdNode {
        &self.nodes[id.index()]
    }

    /// The total number of nodes of this tree, leaves included.
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// The number of leaves of this tree.
    #[inline]
    pub fn num_leaves(&self) -> usize {
        self.num_leaves
    }

    /// Iterates through the leaves of this tree in depth-first order, left children first.
    pub fn leaves(&self) -> Leaves<'_, T> {
        Leaves {
            tree: self,
            stack: vec![NodeId::ROOT],
        }
    }

    /// Computes occupancy statistics over the leaves of this tree.
    pub fn leaf_stats(&self) -> LeafStats {
        let mut num_leaves = 0;
        let mut max_items = 0;
        let mut total_items = 0;

        for leaf in self.leaves() {
            let num_items = leaf.leaf_items().map(|items| items.len()).unwrap_or(0);
            num_leaves += 1;
            max_items = max_items.max(num_items);
            total_items += num_items;
        }

        LeafStats {
            num_leaves,
            max_items,
            avg_items: if num_leaves == 0 {
                0.0
            } else {
                total_items as Real / num_leaves as Real
            },
        }
    }
}

/// Iterator through the leaves of a [`KdTree`], in depth-first order.
pub struct Leaves<'a, T> {
    tree: &'a KdTree<T>,
    stack: Vec<NodeId>,
}

impl<'a, T> Iterator for Leaves<'a, T> {
    type Item = &'a KdNode;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let node = self.tree.node(id);

            if node.is_leaf() {
                return Some(node);
            }

            let (left, right) = node.children();

            if let Some(right) = right {
                self.stack.push(right);
            }

            if let Some(left) = left {
                self.stack.push(left);
            }
        }

        None
    }
}
