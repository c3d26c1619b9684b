pub use kd_tree::{KdNode, KdTree, LeafStats, Leaves, NodeId, NodeKind, TreeBuildError, MAX_DEPTH};
pub use kd_tree_build::BuildMode;
pub use kd_tree_queries::{NearestItem, QueryWorkspace};

mod kd_tree;
mod kd_tree_build;
mod kd_tree_queries;
mod kd_tree_validation;
