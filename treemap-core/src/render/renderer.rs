// Renderer / transition controller.
//
// Joins laid-out leaves onto the scene by name and schedules the animations:
// - enter (render):     created at full size, corner radius `corner_radius`
// - enter (transition): created at 1/shrink scale centred in the cell,
//                       radius `regrow_corner_radius`, then grown to full size
// - update:             translate, size and label centre animate to the new cell
// - exit:               removed at once, pending tweens dropped
//
// All elements of one call are created before any transition is scheduled.
// Fill is chosen on creation only.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{
    Attr, Ease, ElementId, JoinPlan, JoinSummary, PointF, Scene, Shape, Timeline, TransitionId,
    VisualElement,
};
use crate::color::Palette;
use crate::hierarchy::HierarchyNode;
use crate::layout::{LayoutConfig, LeafLayout, layout_leaves};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Duration of update and regrow animations.
    pub update_ms: f64,
    /// Duration of the click shrink-to-circle animation.
    pub morph_ms: f64,
    /// Linear scale divisor for circles and regrowing cells.
    pub shrink_factor: f64,
    pub corner_radius: f64,
    pub regrow_corner_radius: f64,
    pub ease: Ease,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            update_ms: 1000.0,
            morph_ms: 800.0,
            shrink_factor: 10.0,
            corner_radius: 8.0,
            regrow_corner_radius: 10.0,
            ease: Ease::CubicInOut,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EnterMode {
    Immediate,
    Regrow,
}

#[derive(Debug, Clone)]
pub struct Renderer {
    cfg: RenderConfig,
    layout: LayoutConfig,
    palette: Palette,
    scene: Scene,
    timeline: Timeline,
}

impl Renderer {
    pub fn new(layout: LayoutConfig, palette: Palette, cfg: RenderConfig) -> Self {
        Self { cfg, layout, palette, scene: Scene::new(), timeline: Timeline::new() }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    pub fn layout_config(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    /// Initial entry path: new cells appear at full size.
    pub fn render<R: Rng + ?Sized>(&mut self, root: &HierarchyNode, now: f64, rng: &mut R) -> JoinSummary {
        self.join(root, now, rng, EnterMode::Immediate)
    }

    /// Transition entry path: new cells grow out of small circles.
    pub fn transition<R: Rng + ?Sized>(&mut self, root: &HierarchyNode, now: f64, rng: &mut R) -> JoinSummary {
        self.join(root, now, rng, EnterMode::Regrow)
    }

    fn join<R: Rng + ?Sized>(&mut self, root: &HierarchyNode, now: f64, rng: &mut R, mode: EnterMode) -> JoinSummary {
        let leaves = layout_leaves(root, &self.layout);
        let names: Vec<&str> = leaves.iter().map(|l| l.name.as_str()).collect();
        let plan = JoinPlan::by_key(self.scene.elements().iter().map(|e| (e.id, e.name.as_str())), &names);

        let entered: Vec<(ElementId, usize)> = plan
            .enter
            .iter()
            .map(|&i| (self.create(&leaves[i], mode, rng), i))
            .collect();
        for &(id, i) in &plan.update {
            if let Some(el) = self.scene.get_mut(id) {
                el.datum = leaves[i].rect;
            }
        }

        if mode == EnterMode::Regrow && !entered.is_empty() {
            let t = self.timeline.schedule(now, self.cfg.update_ms, self.cfg.ease);
            for &(id, i) in &entered {
                let rect = leaves[i].rect;
                self.timeline.tween(t, &self.scene, id, Attr::Width, rect.width());
                self.timeline.tween(t, &self.scene, id, Attr::Height, rect.height());
                self.timeline.tween(t, &self.scene, id, Attr::X, 0.0);
                self.timeline.tween(t, &self.scene, id, Attr::Y, 0.0);
            }
        }

        if !plan.update.is_empty() {
            let t = self.timeline.schedule(now, self.cfg.update_ms, self.cfg.ease);
            for &(id, i) in &plan.update {
                let rect = leaves[i].rect;
                let (w, h) = (rect.width(), rect.height());
                for (attr, to) in [
                    (Attr::TranslateX, rect.x0),
                    (Attr::TranslateY, rect.y0),
                    (Attr::Width, w),
                    (Attr::Height, h),
                    (Attr::LabelX, w / 2.0),
                    (Attr::LabelY, h / 2.0),
                ] {
                    self.timeline.tween(t, &self.scene, id, attr, to);
                }
            }
        }

        for &id in &plan.exit {
            self.scene.remove(id);
            self.timeline.forget_element(id);
        }

        let summary = plan.summary();
        log::debug!(
            "join: {} entered, {} updated, {} exited",
            summary.entered,
            summary.updated,
            summary.exited
        );
        summary
    }

    fn create<R: Rng + ?Sized>(&mut self, leaf: &LeafLayout, mode: EnterMode, rng: &mut R) -> ElementId {
        let id = self.scene.next_id();
        let (w, h) = (leaf.rect.width(), leaf.rect.height());
        let shape = match mode {
            EnterMode::Immediate => {
                let r = self.cfg.corner_radius;
                Shape { x: 0.0, y: 0.0, width: w, height: h, rx: r, ry: r }
            }
            EnterMode::Regrow => {
                let (sw, sh) = (w / self.cfg.shrink_factor, h / self.cfg.shrink_factor);
                let r = self.cfg.regrow_corner_radius;
                Shape { x: w / 2.0 - sw / 2.0, y: h / 2.0 - sh / 2.0, width: sw, height: sh, rx: r, ry: r }
            }
        };
        let fill = self.palette.color_for(leaf.depth, rng.r#gen::<f64>());
        self.scene.push(VisualElement {
            id,
            name: leaf.name.clone(),
            translate: PointF { x: leaf.rect.x0, y: leaf.rect.y0 },
            shape,
            label: PointF { x: w / 2.0, y: h / 2.0 },
            fill,
            datum: leaf.rect,
        });
        id
    }

    /// Shrink one cell into a circle 1/shrink of its size, centred in the cell.
    pub fn morph_to_circle(&mut self, element: ElementId, now: f64) -> Option<TransitionId> {
        let rect = self.scene.get(element)?.datum;
        let (w, h) = (rect.width(), rect.height());
        let (sw, sh) = (w / self.cfg.shrink_factor, h / self.cfg.shrink_factor);
        let radius = w.min(h) / 2.0;

        let t = self.timeline.schedule(now, self.cfg.morph_ms, self.cfg.ease);
        for (attr, to) in [
            (Attr::Rx, radius),
            (Attr::Ry, radius),
            (Attr::Width, sw),
            (Attr::Height, sh),
            (Attr::X, w / 2.0 - sw / 2.0),
            (Attr::Y, h / 2.0 - sh / 2.0),
        ] {
            self.timeline.tween(t, &self.scene, element, attr, to);
        }
        log::debug!("morph {} started for element {:?}", t.0, element);
        Some(t)
    }

    /// Step all animations to `now`; returns transitions that finished.
    pub fn advance(&mut self, now: f64) -> Vec<TransitionId> {
        self.timeline.advance(now, &mut self.scene)
    }

    pub fn interrupt(&mut self, id: TransitionId) -> bool {
        self.timeline.interrupt(id)
    }
}
