// Application configuration.
//
// Every field has a default, so `{}` (or no JSON at all) is a complete
// configuration. Values are checked by `validate()` before anything is
// built from them; an unknown `log_level` only falls back to `info`.

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::color::{ColorError, DEFAULT_BASES, Palette, Rgb};
use crate::hierarchy::Generator;
use crate::interaction::Controller;
use crate::layout::{LayoutConfig, LayoutSettings};
use crate::render::{RenderConfig, Renderer};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Color(#[from] ColorError),
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Element id the svg is mounted into.
    pub container_id: String,
    /// Fraction of the viewport the canvas takes.
    pub viewport_scale: f64,
    pub svg_padding_px: f64,
    pub background: String,
    /// Fixed RNG seed; random when absent.
    pub seed: Option<u64>,
    pub log_level: String,
    pub generator: Generator,
    pub layout: LayoutSettings,
    pub render: RenderConfig,
    /// Base color per depth level.
    pub palette: Vec<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            container_id: "treemap".to_string(),
            viewport_scale: 0.95,
            svg_padding_px: 20.0,
            background: "#ffffff".to_string(),
            seed: None,
            log_level: "info".to_string(),
            generator: Generator::default(),
            layout: LayoutSettings::default(),
            render: RenderConfig::default(),
            palette: DEFAULT_BASES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Largest accepted `generator.depth`.
pub const MAX_GENERATOR_DEPTH: usize = 8;
/// Largest accepted `generator.max_children`.
pub const MAX_GENERATOR_CHILDREN: usize = 16;
/// Cap on `max_children^depth`, the most leaves a generation can have.
pub const MAX_GENERATED_LEAVES: usize = 4096;

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field, reason: reason.into() }
}

fn non_negative(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, format!("expected a finite non-negative number, got {value}")))
    }
}

impl AppConfig {
    /// Parse and validate. Missing fields take their defaults.
    pub fn from_json(input: &str) -> Result<Self, ConfigError> {
        let cfg: AppConfig = serde_json::from_str(input)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.viewport_scale > 0.0 && self.viewport_scale <= 1.0) {
            return Err(invalid("viewport_scale", format!("must be in (0, 1], got {}", self.viewport_scale)));
        }
        non_negative("svg_padding_px", self.svg_padding_px)?;
        non_negative("layout.padding", self.layout.padding)?;
        non_negative("render.update_ms", self.render.update_ms)?;
        non_negative("render.morph_ms", self.render.morph_ms)?;
        non_negative("render.corner_radius", self.render.corner_radius)?;
        non_negative("render.regrow_corner_radius", self.render.regrow_corner_radius)?;
        if !(self.render.shrink_factor.is_finite() && self.render.shrink_factor >= 1.0) {
            return Err(invalid("render.shrink_factor", format!("must be at least 1, got {}", self.render.shrink_factor)));
        }
        if self.generator.depth > MAX_GENERATOR_DEPTH {
            return Err(invalid(
                "generator.depth",
                format!("must be at most {MAX_GENERATOR_DEPTH}, got {}", self.generator.depth),
            ));
        }
        if !(1..=MAX_GENERATOR_CHILDREN).contains(&self.generator.max_children) {
            return Err(invalid(
                "generator.max_children",
                format!("must be in 1..={MAX_GENERATOR_CHILDREN}, got {}", self.generator.max_children),
            ));
        }
        let worst = u32::try_from(self.generator.depth)
            .ok()
            .and_then(|d| self.generator.max_children.checked_pow(d))
            .unwrap_or(usize::MAX);
        if worst > MAX_GENERATED_LEAVES {
            return Err(invalid(
                "generator",
                format!("up to {worst} leaves per generation, limit is {MAX_GENERATED_LEAVES}"),
            ));
        }
        if self.container_id.trim().is_empty() {
            return Err(invalid("container_id", "must not be empty"));
        }
        Rgb::from_hex(&self.background)?;
        self.palette()?;
        Ok(())
    }

    pub fn palette(&self) -> Result<Palette, ConfigError> {
        Ok(Palette::from_hex(self.palette.as_slice())?)
    }

    pub fn log_level(&self) -> log::LevelFilter {
        match self.log_level.parse() {
            Ok(level) => level,
            Err(_) => {
                log::warn!("unknown log level '{}', using info", self.log_level);
                log::LevelFilter::Info
            }
        }
    }

    /// Canvas size for a viewport, read once at startup.
    pub fn canvas_size(&self, viewport_width: f64, viewport_height: f64) -> (f64, f64) {
        (
            (viewport_width * self.viewport_scale).max(0.0),
            (viewport_height * self.viewport_scale).max(0.0),
        )
    }

    pub fn layout_config(&self, width: f64, height: f64) -> LayoutConfig {
        LayoutConfig::new(width, height, &self.layout)
    }

    pub fn build_controller<R: Rng>(&self, width: f64, height: f64, rng: R) -> Result<Controller<R>, ConfigError> {
        let renderer = Renderer::new(self.layout_config(width, height), self.palette()?, self.render);
        Ok(Controller::new(renderer, self.generator, rng))
    }
}
