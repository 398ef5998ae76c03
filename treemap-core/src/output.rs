//! Output types for the JavaScript host.
//!
//! These structs are serialized to JSON and returned from `snapshot()` and
//! `tick()` so a host page (or a test) can draw or inspect the current scene.

use rand::Rng;
use serde::Serialize;

use crate::interaction::{Controller, InteractionState};
use crate::render::{PointF, Shape, VisualElement};

/// One rendered cell
#[derive(Debug, Clone, Serialize)]
pub struct ElementOutput {
    pub id: u64,
    pub name: String,
    /// `translate(x,y)` for the cell's group
    pub transform: String,
    pub shape: Shape,
    /// CSS color, e.g. `rgb(70, 130, 180)`
    pub fill: String,
    /// Label anchor, local to the transform
    pub label: PointF,
}

impl From<&VisualElement> for ElementOutput {
    fn from(el: &VisualElement) -> Self {
        Self {
            id: el.id.0,
            name: el.name.clone(),
            transform: el.transform(),
            shape: el.shape,
            fill: el.fill.to_css(),
            label: el.label,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub message: String,
}

/// The combined output sent to the host
#[derive(Debug, Clone, Serialize)]
pub struct SceneOutput {
    pub width: f64,
    pub height: f64,
    pub generation: u64,
    pub state: InteractionState,
    pub elements: Vec<ElementOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorInfo>,
}

impl SceneOutput {
    pub fn from_controller<R: Rng>(controller: &Controller<R>) -> Self {
        let layout = controller.renderer().layout_config();
        Self {
            width: layout.width,
            height: layout.height,
            generation: controller.generation(),
            state: controller.state(),
            elements: controller.scene().elements().iter().map(ElementOutput::from).collect(),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            width: 0.0,
            height: 0.0,
            generation: 0,
            state: InteractionState::Idle,
            elements: Vec::new(),
            error: Some(ErrorInfo { message: message.into() }),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| format!("{{\"error\":{{\"message\":\"{e}\"}}}}"))
    }
}
