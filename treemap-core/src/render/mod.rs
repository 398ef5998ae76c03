mod animation;
mod join;
mod renderer;
mod scene;

pub use animation::{Ease, Timeline, TransitionId, Tween};
pub use join::{JoinPlan, JoinSummary};
pub use renderer::{RenderConfig, Renderer};
pub use scene::{Attr, ElementId, PointF, Scene, Shape, VisualElement};
