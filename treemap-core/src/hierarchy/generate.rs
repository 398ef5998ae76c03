// Random hierarchy generation.
//
// Builds a tree `depth` levels deep (root at level 0). Terminal levels get a
// leaf with a random integer weight in [0, MAX_WEIGHT); every other level gets
// an internal node with 1..=max_children children.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::HierarchyNode;

/// Exclusive upper bound of generated leaf weights.
pub const MAX_WEIGHT: u32 = 500;

const NAME_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const NAME_SUFFIX_LEN: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Generator {
    pub depth: usize,
    pub max_children: usize,
}

impl Default for Generator {
    fn default() -> Self {
        Self { depth: 3, max_children: 4 }
    }
}

impl Generator {
    pub fn new(depth: usize, max_children: usize) -> Self {
        Self { depth, max_children }
    }

    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> HierarchyNode {
        generate(self.depth, self.max_children, rng)
    }
}

/// Generate a fresh random tree.
pub fn generate<R: Rng + ?Sized>(depth: usize, max_children: usize, rng: &mut R) -> HierarchyNode {
    create_node(0, depth, max_children.max(1), rng)
}

fn create_node<R: Rng + ?Sized>(level: usize, depth: usize, max_children: usize, rng: &mut R) -> HierarchyNode {
    if level >= depth {
        let value = rng.gen_range(0..MAX_WEIGHT);
        return HierarchyNode::leaf(random_name("Leaf", rng), f64::from(value));
    }

    let count = rng.gen_range(1..=max_children);
    let name = random_name("Node", rng);
    let children = (0..count)
        .map(|_| create_node(level + 1, depth, max_children, rng))
        .collect();
    HierarchyNode::internal(name, children)
}

fn random_name<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> String {
    let suffix: String = (0..NAME_SUFFIX_LEN)
        .map(|_| NAME_ALPHABET[rng.gen_range(0..NAME_ALPHABET.len())] as char)
        .collect();
    format!("{prefix}-{suffix}")
}
