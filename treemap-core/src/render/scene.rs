// Retained scene: one VisualElement per rendered leaf.
//
// Elements keep insertion order (later entries paint on top) and carry two
// identities: `id` is unique per created element, `name` is the join key
// and may repeat when a generation has duplicate names.

use serde::Serialize;

use crate::color::Rgb;
use crate::layout::LayoutRect;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ElementId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct PointF {
    pub x: f64,
    pub y: f64,
}

/// Rounded-rect shape, local to the element's translation.
#[derive(Debug, Copy, Clone, PartialEq, Default, Serialize)]
pub struct Shape {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub rx: f64,
    pub ry: f64,
}

impl Shape {
    /// Corner radii reach half the extent, so the shape draws as a circle or pill.
    pub fn is_fully_rounded(&self) -> bool {
        self.rx >= self.width / 2.0 && self.ry >= self.height / 2.0
    }
}

/// Animatable numeric attributes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
pub enum Attr {
    TranslateX,
    TranslateY,
    X,
    Y,
    Width,
    Height,
    Rx,
    Ry,
    LabelX,
    LabelY,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualElement {
    pub id: ElementId,
    pub name: String,
    pub translate: PointF,
    pub shape: Shape,
    /// Label anchor, local to the translation.
    pub label: PointF,
    /// Chosen once at creation.
    pub fill: Rgb,
    /// Layout rectangle of the datum currently bound to this element.
    pub datum: LayoutRect,
}

impl VisualElement {
    pub fn get(&self, attr: Attr) -> f64 {
        match attr {
            Attr::TranslateX => self.translate.x,
            Attr::TranslateY => self.translate.y,
            Attr::X => self.shape.x,
            Attr::Y => self.shape.y,
            Attr::Width => self.shape.width,
            Attr::Height => self.shape.height,
            Attr::Rx => self.shape.rx,
            Attr::Ry => self.shape.ry,
            Attr::LabelX => self.label.x,
            Attr::LabelY => self.label.y,
        }
    }

    pub fn set(&mut self, attr: Attr, value: f64) {
        let slot = match attr {
            Attr::TranslateX => &mut self.translate.x,
            Attr::TranslateY => &mut self.translate.y,
            Attr::X => &mut self.shape.x,
            Attr::Y => &mut self.shape.y,
            Attr::Width => &mut self.shape.width,
            Attr::Height => &mut self.shape.height,
            Attr::Rx => &mut self.shape.rx,
            Attr::Ry => &mut self.shape.ry,
            Attr::LabelX => &mut self.label.x,
            Attr::LabelY => &mut self.label.y,
        };
        *slot = value;
    }

    /// `translate(x,y)` as written into the group's transform.
    pub fn transform(&self) -> String {
        format!("translate({},{})", self.translate.x, self.translate.y)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    elements: Vec<VisualElement>,
    next_id: u64,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[VisualElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn next_id(&mut self) -> ElementId {
        let id = ElementId(self.next_id);
        self.next_id += 1;
        id
    }

    pub fn push(&mut self, element: VisualElement) {
        self.elements.push(element);
    }

    pub fn get(&self, id: ElementId) -> Option<&VisualElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn get_mut(&mut self, id: ElementId) -> Option<&mut VisualElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn by_name(&self, name: &str) -> Option<&VisualElement> {
        self.elements.iter().find(|e| e.name == name)
    }

    pub fn remove(&mut self, id: ElementId) -> Option<VisualElement> {
        let idx = self.elements.iter().position(|e| e.id == id)?;
        Some(self.elements.remove(idx))
    }
}
