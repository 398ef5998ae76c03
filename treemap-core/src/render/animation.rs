// Time-driven tweening.
//
// A Transition groups tweens that share a start time, duration and easing.
// Each tween captures its start value when scheduled. `advance(now)` writes
// eased values into the scene in scheduling order, so a newer transition on
// the same attribute wins while both are live. Transitions end on time even
// when every element they touched has been removed.

use serde::{Deserialize, Serialize};

use super::{Attr, ElementId, Scene};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TransitionId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Ease {
    Linear,
    #[default]
    CubicInOut,
}

impl Ease {
    pub fn apply(&self, t: f64) -> f64 {
        match self {
            Ease::Linear => t,
            Ease::CubicInOut => {
                let t = t * 2.0;
                if t <= 1.0 {
                    t * t * t / 2.0
                } else {
                    let t = t - 2.0;
                    (t * t * t + 2.0) / 2.0
                }
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Tween {
    pub element: ElementId,
    pub attr: Attr,
    pub from: f64,
    pub to: f64,
}

#[derive(Debug, Clone)]
struct Transition {
    id: TransitionId,
    start: f64,
    duration: f64,
    ease: Ease,
    tweens: Vec<Tween>,
}

impl Transition {
    fn progress(&self, now: f64) -> f64 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        ((now - self.start) / self.duration).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Timeline {
    active: Vec<Transition>,
    next_id: u64,
}

impl Timeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a transition starting at `start`; attach tweens with [`Timeline::tween`].
    pub fn schedule(&mut self, start: f64, duration: f64, ease: Ease) -> TransitionId {
        let id = TransitionId(self.next_id);
        self.next_id += 1;
        self.active.push(Transition { id, start, duration: duration.max(0.0), ease, tweens: Vec::new() });
        id
    }

    /// Animate `attr` of `element` from its current scene value to `to`.
    /// Returns false when either the transition or the element is gone.
    pub fn tween(&mut self, id: TransitionId, scene: &Scene, element: ElementId, attr: Attr, to: f64) -> bool {
        let Some(el) = scene.get(element) else {
            return false;
        };
        let from = el.get(attr);
        match self.active.iter_mut().find(|t| t.id == id) {
            Some(transition) => {
                transition.tweens.push(Tween { element, attr, from, to });
                true
            }
            None => false,
        }
    }

    /// Apply every live tween at time `now`; returns the transitions that finished.
    pub fn advance(&mut self, now: f64, scene: &mut Scene) -> Vec<TransitionId> {
        let mut ended = Vec::new();
        for transition in &self.active {
            let t = transition.progress(now);
            for tween in &transition.tweens {
                if let Some(el) = scene.get_mut(tween.element) {
                    let value = if t >= 1.0 {
                        tween.to
                    } else {
                        tween.from + (tween.to - tween.from) * transition.ease.apply(t)
                    };
                    el.set(tween.attr, value);
                }
            }
            if t >= 1.0 {
                ended.push(transition.id);
            }
        }
        self.active.retain(|t| !ended.contains(&t.id));
        ended
    }

    /// Drop an element's tweens; its transitions keep running.
    pub fn forget_element(&mut self, element: ElementId) {
        for transition in &mut self.active {
            transition.tweens.retain(|tw| tw.element != element);
        }
    }

    /// Stop a transition where it stands, without reporting it as ended.
    pub fn interrupt(&mut self, id: TransitionId) -> bool {
        let before = self.active.len();
        self.active.retain(|t| t.id != id);
        self.active.len() != before
    }

    pub fn is_idle(&self) -> bool {
        self.active.is_empty()
    }

    /// Latest end time among live transitions.
    pub fn settles_at(&self) -> Option<f64> {
        self.active.iter().map(|t| t.start + t.duration).reduce(f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgb;
    use crate::layout::LayoutRect;
    use crate::render::{PointF, Shape, VisualElement};

    fn scene_with_one() -> (Scene, ElementId) {
        let mut scene = Scene::new();
        let id = scene.next_id();
        scene.push(VisualElement {
            id,
            name: "cell".into(),
            translate: PointF::default(),
            shape: Shape { width: 100.0, ..Shape::default() },
            label: PointF::default(),
            fill: Rgb::new(1.0, 2.0, 3.0),
            datum: LayoutRect::default(),
        });
        (scene, id)
    }

    #[test]
    fn test_cubic_in_out_endpoints() {
        let e = Ease::CubicInOut;
        assert_eq!(e.apply(0.0), 0.0);
        assert_eq!(e.apply(0.5), 0.5);
        assert_eq!(e.apply(1.0), 1.0);
        assert!(e.apply(0.25) < 0.25);
        assert!(e.apply(0.75) > 0.75);
    }

    #[test]
    fn test_linear_tween_midpoint_and_end() {
        let (mut scene, id) = scene_with_one();
        let mut timeline = Timeline::new();
        let t = timeline.schedule(0.0, 1000.0, Ease::Linear);
        assert!(timeline.tween(t, &scene, id, Attr::Width, 10.0));

        assert!(timeline.advance(500.0, &mut scene).is_empty());
        assert_eq!(scene.get(id).unwrap().shape.width, 55.0);

        assert_eq!(timeline.advance(1000.0, &mut scene), vec![t]);
        assert_eq!(scene.get(id).unwrap().shape.width, 10.0);
        assert!(timeline.is_idle());
    }

    #[test]
    fn test_transition_ends_after_element_removed() {
        let (mut scene, id) = scene_with_one();
        let mut timeline = Timeline::new();
        let t = timeline.schedule(0.0, 800.0, Ease::CubicInOut);
        timeline.tween(t, &scene, id, Attr::Rx, 50.0);
        scene.remove(id);
        timeline.forget_element(id);
        assert_eq!(timeline.advance(800.0, &mut scene), vec![t]);
    }

    #[test]
    fn test_newer_transition_wins() {
        let (mut scene, id) = scene_with_one();
        let mut timeline = Timeline::new();
        let a = timeline.schedule(0.0, 1000.0, Ease::Linear);
        timeline.tween(a, &scene, id, Attr::Width, 0.0);
        let b = timeline.schedule(0.0, 1000.0, Ease::Linear);
        timeline.tween(b, &scene, id, Attr::Width, 200.0);
        timeline.advance(500.0, &mut scene);
        assert_eq!(scene.get(id).unwrap().shape.width, 150.0);
        assert_eq!(timeline.settles_at(), Some(1000.0));
    }

    #[test]
    fn test_interrupt_does_not_report_end() {
        let (mut scene, id) = scene_with_one();
        let mut timeline = Timeline::new();
        let t = timeline.schedule(0.0, 100.0, Ease::Linear);
        timeline.tween(t, &scene, id, Attr::Height, 5.0);
        assert!(timeline.interrupt(t));
        assert!(timeline.advance(200.0, &mut scene).is_empty());
        assert_eq!(scene.get(id).unwrap().shape.height, 0.0);
    }

    #[test]
    fn test_zero_duration_ends_immediately() {
        let (mut scene, id) = scene_with_one();
        let mut timeline = Timeline::new();
        let t = timeline.schedule(10.0, 0.0, Ease::CubicInOut);
        timeline.tween(t, &scene, id, Attr::X, 7.0);
        assert_eq!(timeline.advance(10.0, &mut scene), vec![t]);
        assert_eq!(scene.get(id).unwrap().shape.x, 7.0);
    }
}
