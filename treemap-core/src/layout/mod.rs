// Treemap layout.
//
// Positions every node of an annotated Hierarchy inside the canvas:
// - the root covers the whole canvas
// - every node is inset by the padding share its parent hands down
//   (half the inner padding, 0 for the root)
// - a node with children tiles them inside its box inset by the outer padding
// - rectangles that would invert collapse onto their midpoint
// - coordinates are rounded (half up) when enabled, then clamped to the canvas
//
// Tiling itself is delegated to a TileStrategy (see algorithms/).

use serde::{Deserialize, Serialize};

use crate::hierarchy::{Hierarchy, HierarchyNode, NodeId};

mod algorithms;

pub use algorithms::{SliceDice, Squarify, TileMethod, TileStrategy};

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutRect {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
}

impl LayoutRect {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self { x0, y0, x1, y1 }
    }

    pub fn width(&self) -> f64 { self.x1 - self.x0 }
    pub fn height(&self) -> f64 { self.y1 - self.y0 }
    pub fn area(&self) -> f64 { self.width() * self.height() }

    /// Shrink by `p` on every side; an inverted axis collapses to its midpoint.
    pub fn inset(&self, p: f64) -> LayoutRect {
        let (mut x0, mut y0, mut x1, mut y1) = (self.x0 + p, self.y0 + p, self.x1 - p, self.y1 - p);
        if x1 < x0 {
            x0 = (x0 + x1) / 2.0;
            x1 = x0;
        }
        if y1 < y0 {
            y0 = (y0 + y1) / 2.0;
            y1 = y0;
        }
        LayoutRect { x0, y0, x1, y1 }
    }

    pub fn rounded(&self) -> LayoutRect {
        let r = |v: f64| (v + 0.5).floor();
        LayoutRect { x0: r(self.x0), y0: r(self.y0), x1: r(self.x1), y1: r(self.y1) }
    }

    pub fn clamped_to(&self, bounds: &LayoutRect) -> LayoutRect {
        let cx = |v: f64| v.clamp(bounds.x0, bounds.x1);
        let cy = |v: f64| v.clamp(bounds.y0, bounds.y1);
        LayoutRect { x0: cx(self.x0), y0: cy(self.y0), x1: cx(self.x1), y1: cy(self.y1) }
    }

    pub fn contains(&self, other: &LayoutRect) -> bool {
        other.x0 >= self.x0 && other.y0 >= self.y0 && other.x1 <= self.x1 && other.y1 <= self.y1
    }

    pub fn overlaps(&self, other: &LayoutRect) -> bool {
        self.x0 < other.x1 && self.x1 > other.x0 && self.y0 < other.y1 && self.y1 > other.y0
    }
}

/// User-facing layout knobs; the canvas size is only known at startup.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutSettings {
    /// Used for both the gap between siblings and the inset inside parents.
    pub padding: f64,
    pub round: bool,
    pub tile: TileMethod,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self { padding: 3.0, round: true, tile: TileMethod::Squarify }
    }
}

#[derive(Debug, Clone)]
pub struct LayoutConfig {
    pub width: f64,
    pub height: f64,
    /// Gap between sibling cells.
    pub padding_inner: f64,
    /// Inset between a parent's edge and its children.
    pub padding_outer: f64,
    pub round: bool,
    pub tile: TileMethod,
}

impl LayoutConfig {
    pub fn new(width: f64, height: f64, settings: &LayoutSettings) -> Self {
        Self {
            width,
            height,
            padding_inner: settings.padding,
            padding_outer: settings.padding,
            round: settings.round,
            tile: settings.tile,
        }
    }

    pub fn canvas(&self) -> LayoutRect {
        LayoutRect::new(0.0, 0.0, self.width.max(0.0), self.height.max(0.0))
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self::new(960.0, 500.0, &LayoutSettings::default())
    }
}

/// A positioned leaf, ready to be joined against the scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeafLayout {
    pub name: String,
    pub rect: LayoutRect,
    pub depth: usize,
}

/// Fill in `rect` for every node of the tree.
pub fn layout_hierarchy(tree: &mut Hierarchy, cfg: &LayoutConfig) {
    let canvas = cfg.canvas();
    let strategy = cfg.tile.strategy();
    let root = tree.root;
    tree.get_mut(root).rect = canvas;
    position_node(tree, root, 0, 0.0, cfg, strategy.as_ref());

    for node in &mut tree.nodes {
        let rect = if cfg.round { node.rect.rounded() } else { node.rect };
        node.rect = rect.clamped_to(&canvas);
    }
}

fn position_node(
    tree: &mut Hierarchy,
    id: NodeId,
    depth: usize,
    inset: f64,
    cfg: &LayoutConfig,
    strategy: &dyn TileStrategy,
) {
    let rect = tree.get(id).rect.inset(inset);
    tree.get_mut(id).rect = rect;

    let children = tree.get(id).children.clone();
    if children.is_empty() {
        return;
    }

    let half = cfg.padding_inner / 2.0;
    let area = rect.inset(cfg.padding_outer - half);
    let weights: Vec<f64> = children.iter().map(|c| tree.get(*c).value).collect();
    let rects = strategy.tile(&weights, depth, area);
    for (child, r) in children.iter().zip(rects) {
        tree.get_mut(*child).rect = r;
    }

    for child in children {
        position_node(tree, child, depth + 1, half, cfg, strategy);
    }
}

/// Annotate, lay out and collect the leaves of a tree in one go.
pub fn layout_leaves(root: &HierarchyNode, cfg: &LayoutConfig) -> Vec<LeafLayout> {
    let mut tree = Hierarchy::from_node(root);
    layout_hierarchy(&mut tree, cfg);
    tree.leaves()
        .into_iter()
        .map(|id| LeafLayout {
            name: tree.get(id).name.clone(),
            rect: tree.get(id).rect,
            depth: tree.depth(id),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hierarchy::generate;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn exact(width: f64, height: f64, tile: TileMethod) -> LayoutConfig {
        LayoutConfig::new(width, height, &LayoutSettings { padding: 0.0, round: false, tile })
    }

    #[test]
    fn test_single_leaf_fills_padded_canvas() {
        let root = HierarchyNode::internal("r", vec![HierarchyNode::leaf("only", 42.0)]);
        let leaves = layout_leaves(&root, &LayoutConfig::new(800.0, 600.0, &LayoutSettings::default()));
        assert_eq!(leaves.len(), 1);
        assert_eq!(leaves[0].rect, LayoutRect::new(3.0, 3.0, 797.0, 597.0));
        assert_eq!(leaves[0].depth, 1);
    }

    #[test]
    fn test_root_leaf_covers_canvas() {
        let root = HierarchyNode::leaf("alone", 5.0);
        let leaves = layout_leaves(&root, &LayoutConfig::new(300.0, 200.0, &LayoutSettings::default()));
        assert_eq!(leaves[0].rect, LayoutRect::new(0.0, 0.0, 300.0, 200.0));
        assert_eq!(leaves[0].depth, 0);
    }

    #[test]
    fn test_sibling_gap_matches_padding() {
        let root = HierarchyNode::internal(
            "r",
            vec![HierarchyNode::leaf("a", 1.0), HierarchyNode::leaf("b", 1.0)],
        );
        let leaves = layout_leaves(&root, &LayoutConfig::new(200.0, 100.0, &LayoutSettings::default()));
        let (a, b) = (leaves[0].rect, leaves[1].rect);
        assert!(!a.overlaps(&b));
        let gap = if a.x1 <= b.x0 { b.x0 - a.x1 } else { a.x0 - b.x1 };
        assert_eq!(gap, 3.0);
    }

    #[test]
    fn test_area_proportional_without_padding() {
        let root = HierarchyNode::internal(
            "r",
            vec![
                HierarchyNode::leaf("a", 6.0),
                HierarchyNode::leaf("b", 3.0),
                HierarchyNode::leaf("c", 2.0),
                HierarchyNode::leaf("d", 1.0),
            ],
        );
        for tile in [TileMethod::Squarify, TileMethod::SliceDice] {
            let cfg = exact(600.0, 400.0, tile);
            let leaves = layout_leaves(&root, &cfg);
            for leaf in &leaves {
                let weight = match leaf.name.as_str() {
                    "a" => 6.0,
                    "b" => 3.0,
                    "c" => 2.0,
                    _ => 1.0,
                };
                let expected = 600.0 * 400.0 * weight / 12.0;
                assert!((leaf.rect.area() - expected).abs() < 1e-6, "{tile:?} {leaf:?}");
            }
        }
    }

    #[test]
    fn test_zero_weight_tree_is_degenerate_not_broken() {
        let root = HierarchyNode::internal(
            "r",
            vec![HierarchyNode::leaf("a", 0.0), HierarchyNode::leaf("b", 0.0)],
        );
        let cfg = LayoutConfig::new(100.0, 100.0, &LayoutSettings::default());
        for leaf in layout_leaves(&root, &cfg) {
            assert!(leaf.rect.width() >= 0.0 && leaf.rect.height() >= 0.0);
            assert!(cfg.canvas().contains(&leaf.rect));
            assert_eq!(leaf.rect.area(), 0.0);
        }
    }

    #[test]
    fn test_layout_is_deterministic() {
        let root = generate(3, 4, &mut SmallRng::seed_from_u64(5));
        let cfg = LayoutConfig::default();
        assert_eq!(layout_leaves(&root, &cfg), layout_leaves(&root, &cfg));
    }

    #[test]
    fn test_inset_collapses_to_midpoint() {
        let r = LayoutRect::new(10.0, 10.0, 12.0, 30.0).inset(3.0);
        assert_eq!(r.x0, 11.0);
        assert_eq!(r.x1, 11.0);
        assert_eq!(r.y0, 13.0);
        assert_eq!(r.y1, 27.0);
    }

    proptest! {
        #[test]
        fn prop_rects_valid_and_inside_canvas(
            seed in any::<u64>(),
            depth in 0usize..4,
            max_children in 1usize..5,
            width in 1.0f64..2000.0,
            height in 1.0f64..2000.0,
        ) {
            let root = generate(depth, max_children, &mut SmallRng::seed_from_u64(seed));
            let cfg = LayoutConfig::new(width, height, &LayoutSettings::default());
            let canvas = cfg.canvas();
            let leaves = layout_leaves(&root, &cfg);
            prop_assert_eq!(leaves.len(), root.leaves().len());
            for leaf in &leaves {
                prop_assert!(leaf.rect.width() >= 0.0);
                prop_assert!(leaf.rect.height() >= 0.0);
                prop_assert!(canvas.contains(&leaf.rect));
            }
            for (i, a) in leaves.iter().enumerate() {
                for b in &leaves[i + 1..] {
                    prop_assert!(!a.rect.overlaps(&b.rect), "{:?} overlaps {:?}", a, b);
                }
            }
        }

        #[test]
        fn prop_leaf_sum_matches_total(seed in any::<u64>(), depth in 0usize..5) {
            let root = generate(depth, 4, &mut SmallRng::seed_from_u64(seed));
            let mut tree = Hierarchy::from_node(&root);
            layout_hierarchy(&mut tree, &LayoutConfig::default());
            let leaf_sum: f64 = tree.leaves().iter().map(|id| tree.get(*id).value).sum();
            prop_assert_eq!(leaf_sum, tree.total());
        }
    }
}
