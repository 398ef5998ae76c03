pub mod color;
pub mod config;
pub mod hierarchy;
pub mod interaction;
pub mod layout;
pub mod output;
pub mod render;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod wasm;

pub use color::{ColorError, Palette, Rgb};
pub use config::{AppConfig, ConfigError};
pub use hierarchy::{Generator, HierarchyError, HierarchyNode, generate};
pub use interaction::{Controller, InteractionState, TickReport};
pub use layout::{LayoutConfig, LayoutRect, LayoutSettings, LeafLayout, TileMethod, layout_leaves};
pub use output::SceneOutput;
pub use render::{ElementId, Renderer, Scene};

#[cfg(target_arch = "wasm32")]
pub use wasm::{TreemapApp, run};
