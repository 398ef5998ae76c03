//! Click handling and the generation loop.
//!
//! A click shrinks the clicked cell into a circle. When that morph ends, a
//! fresh hierarchy is generated and the whole view transitions to it. The
//! controller is `Morphing` while at least one such morph is pending.
//! Clicks are never suppressed: a click on another cell mid-animation starts
//! an overlapping morph, while a second click on the same cell restarts its
//! morph so that only the latest one regenerates. A new generation that
//! reuses a morphing cell's name takes that cell over with its update
//! animation, which cancels the morph.

use rand::Rng;
use rand::rngs::SmallRng;
use serde::Serialize;

use crate::hierarchy::{Generator, HierarchyNode};
use crate::render::{ElementId, JoinSummary, Renderer, Scene, TransitionId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionState {
    Idle,
    Morphing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PendingMorph {
    element: ElementId,
    transition: TransitionId,
}

/// What one frame did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    pub ended: Vec<TransitionId>,
    /// One entry per regeneration triggered this frame.
    pub regenerated: Vec<JoinSummary>,
}

#[derive(Debug, Clone)]
pub struct Controller<R: Rng = SmallRng> {
    renderer: Renderer,
    generator: Generator,
    rng: R,
    pending: Vec<PendingMorph>,
    generation: u64,
}

impl<R: Rng> Controller<R> {
    pub fn new(renderer: Renderer, generator: Generator, rng: R) -> Self {
        Self { renderer, generator, rng, pending: Vec::new(), generation: 0 }
    }

    /// Generate the first hierarchy and render it without animation.
    pub fn start(&mut self, now: f64) -> JoinSummary {
        let data = self.generator.generate(&mut self.rng);
        self.show(&data, now)
    }

    /// Render a given hierarchy through the initial entry path.
    pub fn show(&mut self, data: &HierarchyNode, now: f64) -> JoinSummary {
        self.generation += 1;
        let summary = self.renderer.render(data, now, &mut self.rng);
        self.cancel_morphs_of_updated();
        log::info!("generation {} rendered with {} cells", self.generation, self.renderer.scene().len());
        summary
    }

    /// Pointer activation on a rendered cell. Returns false for unknown ids.
    pub fn click(&mut self, element: ElementId, now: f64) -> bool {
        if let Some(idx) = self.pending.iter().position(|p| p.element == element) {
            let stale = self.pending.remove(idx);
            self.renderer.interrupt(stale.transition);
        }
        match self.renderer.morph_to_circle(element, now) {
            Some(transition) => {
                self.pending.push(PendingMorph { element, transition });
                true
            }
            None => {
                log::debug!("click on unknown element {:?} ignored", element);
                false
            }
        }
    }

    /// Advance animations to `now` and regenerate for every morph that ended.
    pub fn tick(&mut self, now: f64) -> TickReport {
        let ended = self.renderer.advance(now);
        let mut regenerated = Vec::new();
        for id in &ended {
            let Some(idx) = self.pending.iter().position(|p| p.transition == *id) else {
                continue;
            };
            self.pending.remove(idx);
            regenerated.push(self.regenerate(now));
        }
        TickReport { ended, regenerated }
    }

    fn regenerate(&mut self, now: f64) -> JoinSummary {
        let data = self.generator.generate(&mut self.rng);
        self.generation += 1;
        let summary = self.renderer.transition(&data, now, &mut self.rng);
        self.cancel_morphs_of_updated();
        log::info!(
            "generation {}: {} cells entered, {} kept, {} removed",
            self.generation,
            summary.entered,
            summary.updated,
            summary.exited
        );
        summary
    }

    // Exited cells are gone from the scene; a pending morph whose cell is
    // still there was just rebound and is now animating towards its new cell.
    fn cancel_morphs_of_updated(&mut self) {
        let (renderer, pending) = (&mut self.renderer, &mut self.pending);
        pending.retain(|p| {
            if renderer.scene().get(p.element).is_none() {
                return true;
            }
            renderer.interrupt(p.transition);
            log::debug!("morph {} cancelled, element {:?} was updated", p.transition.0, p.element);
            false
        });
    }

    pub fn state(&self) -> InteractionState {
        if self.pending.is_empty() { InteractionState::Idle } else { InteractionState::Morphing }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn scene(&self) -> &Scene {
        self.renderer.scene()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Palette;
    use crate::layout::{LayoutConfig, LayoutSettings};
    use crate::render::RenderConfig;
    use rand::SeedableRng;

    fn controller(generator: Generator, seed: u64) -> Controller {
        let renderer = Renderer::new(
            LayoutConfig::new(1000.0, 700.0, &LayoutSettings::default()),
            Palette::default(),
            RenderConfig::default(),
        );
        Controller::new(renderer, generator, SmallRng::seed_from_u64(seed))
    }

    #[test]
    fn test_start_renders_idle() {
        let mut c = controller(Generator::default(), 1);
        let summary = c.start(0.0);
        assert!(summary.entered >= 1);
        assert_eq!(summary.entered, c.scene().len());
        assert_eq!(c.state(), InteractionState::Idle);
        assert_eq!(c.generation(), 1);
    }

    #[test]
    fn test_click_morph_then_full_replacement() {
        let mut c = controller(Generator::new(1, 1), 2);
        c.start(0.0);
        let first = c.scene().elements()[0].clone();

        assert!(c.click(first.id, 0.0));
        assert_eq!(c.state(), InteractionState::Morphing);

        let report = c.tick(400.0);
        assert!(report.regenerated.is_empty());

        let report = c.tick(800.0);
        assert_eq!(report.regenerated.len(), 1);
        assert_eq!(c.state(), InteractionState::Idle);
        assert_eq!(c.generation(), 2);

        // The old cell is gone; its replacement starts small and centred.
        assert!(c.scene().get(first.id).is_none());
        assert_eq!(c.scene().len(), 1);
        let fresh = c.scene().elements()[0].clone();
        assert_ne!(fresh.name, first.name);
        assert_eq!(fresh.shape.width, fresh.datum.width() / 10.0);

        let report = c.tick(1800.0);
        assert_eq!(report.ended.len(), 1);
        let settled = &c.scene().elements()[0];
        assert_eq!(settled.shape.width, settled.datum.width());
        assert_eq!(settled.shape.height, settled.datum.height());
        assert_eq!((settled.shape.x, settled.shape.y), (0.0, 0.0));
        assert!(c.renderer().timeline().is_idle());
    }

    #[test]
    fn test_morph_reaches_circle_at_800ms() {
        let mut c = controller(Generator::new(1, 1), 3);
        c.start(0.0);
        let id = c.scene().elements()[0].id;
        let datum = c.scene().elements()[0].datum;
        c.click(id, 0.0);
        c.tick(799.9);
        let shape = c.scene().get(id).unwrap().shape;
        assert!((shape.width - datum.width() / 10.0).abs() < 0.01);
        assert!(shape.is_fully_rounded());
    }

    #[test]
    fn test_unknown_click_ignored() {
        let mut c = controller(Generator::default(), 4);
        c.start(0.0);
        assert!(!c.click(ElementId(10_000), 0.0));
        assert_eq!(c.state(), InteractionState::Idle);
    }

    #[test]
    fn test_reclick_restarts_single_morph() {
        let mut c = controller(Generator::new(1, 1), 5);
        c.start(0.0);
        let id = c.scene().elements()[0].id;
        c.click(id, 0.0);
        c.click(id, 500.0);
        assert!(c.tick(800.0).regenerated.is_empty());
        assert_eq!(c.tick(1300.0).regenerated.len(), 1);
        assert_eq!(c.generation(), 2);
    }

    #[test]
    fn test_update_of_morphing_cell_cancels_morph() {
        let mut c = controller(Generator::default(), 7);
        let data = HierarchyNode::internal(
            "root",
            vec![HierarchyNode::leaf("kept", 3.0), HierarchyNode::leaf("other", 1.0)],
        );
        c.show(&data, 0.0);
        let id = c.scene().by_name("kept").unwrap().id;
        assert!(c.click(id, 0.0));

        c.show(&data, 100.0);
        assert_eq!(c.scene().by_name("kept").map(|e| e.id), Some(id));
        assert_eq!(c.state(), InteractionState::Idle);
        assert!(c.tick(800.0).regenerated.is_empty());
        assert_eq!(c.generation(), 2);

        // The update animation wins and the cell settles back to full size.
        c.tick(1100.0);
        let el = c.scene().get(id).unwrap();
        assert_eq!(el.shape.width, el.datum.width());
        assert_eq!(el.shape.height, el.datum.height());
    }

    #[test]
    fn test_exited_morph_still_regenerates() {
        let mut c = controller(Generator::default(), 8);
        c.show(&HierarchyNode::internal("root", vec![HierarchyNode::leaf("gone", 1.0)]), 0.0);
        let id = c.scene().elements()[0].id;
        c.click(id, 0.0);
        c.show(&HierarchyNode::internal("root", vec![HierarchyNode::leaf("fresh", 1.0)]), 100.0);
        assert_eq!(c.state(), InteractionState::Morphing);
        assert_eq!(c.tick(800.0).regenerated.len(), 1);
    }

    #[test]
    fn test_overlapping_clicks_each_regenerate() {
        let mut c = controller(Generator::new(1, 4), 6);
        c.start(0.0);
        // Find a generation with at least two cells.
        while c.scene().len() < 2 {
            let id = c.scene().elements()[0].id;
            c.click(id, 0.0);
            c.tick(800.0);
            c.tick(2000.0);
        }
        let ids: Vec<ElementId> = c.scene().elements().iter().take(2).map(|e| e.id).collect();
        let before = c.generation();
        assert!(c.click(ids[0], 10_000.0));
        assert!(c.click(ids[1], 10_100.0));
        assert_eq!(c.tick(10_800.0).regenerated.len(), 1);
        assert_eq!(c.state(), InteractionState::Morphing);
        assert_eq!(c.tick(10_900.0).regenerated.len(), 1);
        assert_eq!(c.generation(), before + 2);
        assert_eq!(c.state(), InteractionState::Idle);
    }
}
