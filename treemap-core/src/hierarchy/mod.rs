mod generate;
mod tree;
mod types;

pub use generate::{Generator, MAX_WEIGHT, generate};
pub use tree::{Hierarchy, NodeId, TreeNode};
pub use types::{HierarchyError, HierarchyNode};
