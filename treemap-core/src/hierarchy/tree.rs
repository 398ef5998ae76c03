//
// Annotation step: HierarchyNode (input tree) -> Hierarchy (layout-friendly arena)
//
// What this does:
// - Flattens the nested tree into an indexed vector with parent pointers
// - Sums weights bottom-up (internal value = sum of its leaves)
// - Sorts every child list by descending value (stable, ties keep input order)
// - Sanitizes weights: negative or non-finite leaf values count as 0
//
// Layout writes its rectangles straight into the arena entries.

use serde::Serialize;

use super::HierarchyNode;
use crate::layout::LayoutRect;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct NodeId(pub usize);

#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub id: NodeId,
    pub name: String,
    /// Own weight for leaves, subtree sum for internal nodes.
    pub value: f64,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    pub rect: LayoutRect,
}

#[derive(Debug, Clone, Serialize)]
pub struct Hierarchy {
    pub root: NodeId,
    pub nodes: Vec<TreeNode>,
}

impl Hierarchy {
    pub fn from_node(root: &HierarchyNode) -> Self {
        let mut tree = Hierarchy { root: NodeId(0), nodes: Vec::new() };
        tree.root = tree.push(root, None);
        tree
    }

    fn push(&mut self, node: &HierarchyNode, parent: Option<NodeId>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let own = match node {
            HierarchyNode::Leaf { value, .. } if value.is_finite() => (*value).max(0.0),
            _ => 0.0,
        };
        self.nodes.push(TreeNode {
            id,
            name: node.name().to_string(),
            value: own,
            parent,
            children: Vec::new(),
            rect: LayoutRect::default(),
        });

        let mut children: Vec<NodeId> = node
            .children()
            .iter()
            .map(|child| self.push(child, Some(id)))
            .collect();
        children.sort_by(|a, b| self.nodes[b.0].value.total_cmp(&self.nodes[a.0].value));

        if !children.is_empty() {
            self.nodes[id.0].value = children.iter().map(|c| self.nodes[c.0].value).sum();
        }
        self.nodes[id.0].children = children;
        id
    }

    pub fn get(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut TreeNode {
        &mut self.nodes[id.0]
    }

    /// Total weight at the root.
    pub fn total(&self) -> f64 {
        self.get(self.root).value
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.get(id).children.is_empty()
    }

    /// Depth of a node, found by walking parent links up to the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = self.get(id).parent;
        while let Some(p) = cur {
            depth += 1;
            cur = self.get(p).parent;
        }
        depth
    }

    /// Leaves in pre-order over the sorted child lists.
    pub fn leaves(&self) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            let node = self.get(id);
            if node.children.is_empty() {
                out.push(id);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        out
    }
}
