//! Configuration types for graph generation.
//!
//! All types implement [`serde::Deserialize`] and default every field, so a
//! TOML file only needs to name the settings it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining every section.
//! - [`CanvasConfig`] - Output image dimensions.
//! - [`LayoutConfig`] - Force simulation parameters and the node cap.
//! - [`StyleConfig`] - Colors, sizes and label placement.
//! - [`PipelineConfig`] - Input limits and retry policy.
//! - [`PipelineOptions`] - Per-request overrides layered over an [`AppConfig`].
//!
//! # Example
//!
//! ```
//! # use textgraph::config::{AppConfig, PipelineOptions};
//! let config = AppConfig::default();
//! assert_eq!(config.canvas().width(), 800);
//! assert_eq!(config.layout().max_nodes(), 500);
//!
//! let options: PipelineOptions = serde_json::from_str(r#"{"canvasWidth": 400, "seed": 7}"#).unwrap();
//! let config = options.apply(config);
//! assert_eq!(config.canvas().width(), 400);
//! assert_eq!(config.layout().seed(), Some(7));
//! assert!(config.validate().is_ok());
//! ```

use serde::Deserialize;

use textgraph_core::{color::Color, geometry::Size};
use textgraph_extract::ModelConfig;

use crate::error::ConfigError;

/// Largest accepted canvas edge in pixels
pub const MAX_CANVAS_DIMENSION: u32 = 8192;

/// Largest accepted simulation tick limit
pub const MAX_SIMULATION_TICKS: usize = 10_000;

/// Largest accepted node cap
pub const MAX_NODE_CAP: usize = 2_000;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Output canvas section.
    #[serde(default)]
    canvas: CanvasConfig,

    /// Force simulation section.
    #[serde(default)]
    layout: LayoutConfig,

    /// Visual style section.
    #[serde(default)]
    style: StyleConfig,

    /// Model service section.
    #[serde(default)]
    model: ModelConfig,

    /// Request handling section.
    #[serde(default)]
    pipeline: PipelineConfig,
}

impl AppConfig {
    pub fn canvas(&self) -> &CanvasConfig {
        &self.canvas
    }

    pub fn layout(&self) -> &LayoutConfig {
        &self.layout
    }

    pub fn style(&self) -> &StyleConfig {
        &self.style
    }

    pub fn model(&self) -> &ModelConfig {
        &self.model
    }

    pub fn pipeline(&self) -> &PipelineConfig {
        &self.pipeline
    }

    /// Replaces the model section, e.g. with command-line overrides
    pub fn with_model(mut self, model: ModelConfig) -> Self {
        self.model = model;
        self
    }

    /// Checks every numeric bound and parses every configured color.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.canvas.validate()?;
        self.layout.validate()?;
        self.style.validate()?;
        self.pipeline.validate()
    }
}

/// Output canvas dimensions in pixels.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    width: u32,
    height: u32,
}

impl CanvasConfig {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Canvas dimensions as a [`Size`]
    pub fn size(&self) -> Size {
        Size::new(self.width as f32, self.height as f32)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let in_range = |value: u32| (1..=MAX_CANVAS_DIMENSION).contains(&value);
        if in_range(self.width) && in_range(self.height) {
            Ok(())
        } else {
            Err(ConfigError::Canvas {
                width: self.width,
                height: self.height,
                max: MAX_CANVAS_DIMENSION,
            })
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Force simulation parameters.
///
/// | Field | Default | Meaning |
/// |-------|---------|---------|
/// | `max_nodes` | 500 | Entities beyond this are truncated (at most 2000) |
/// | `ticks` | 300 | Upper bound on simulation steps |
/// | `seed` | none | Uniform seeded placement instead of the spiral |
/// | `repulsion` | 1500 | Pairwise repulsion strength |
/// | `link_distance` | 60 | Rest length of edge springs |
/// | `link_strength` | 0.05 | Spring stiffness |
/// | `gravity` | 0.02 | Pull toward the canvas center |
/// | `velocity_decay` | 0.6 | Velocity multiplier per tick |
/// | `max_velocity` | 40 | Per-tick displacement limit |
/// | `energy_epsilon` | 0.01 | Kinetic energy below which the run stops |
/// | `margin` | 20 | Inset keeping nodes off the canvas edge |
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    max_nodes: usize,
    ticks: usize,
    seed: Option<u64>,
    repulsion: f32,
    link_distance: f32,
    link_strength: f32,
    gravity: f32,
    velocity_decay: f32,
    max_velocity: f32,
    energy_epsilon: f32,
    margin: f32,
}

impl LayoutConfig {
    pub fn max_nodes(&self) -> usize {
        self.max_nodes
    }

    pub fn ticks(&self) -> usize {
        self.ticks
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn repulsion(&self) -> f32 {
        self.repulsion
    }

    pub fn link_distance(&self) -> f32 {
        self.link_distance
    }

    pub fn link_strength(&self) -> f32 {
        self.link_strength
    }

    pub fn gravity(&self) -> f32 {
        self.gravity
    }

    pub fn velocity_decay(&self) -> f32 {
        self.velocity_decay
    }

    pub fn max_velocity(&self) -> f32 {
        self.max_velocity
    }

    pub fn energy_epsilon(&self) -> f32 {
        self.energy_epsilon
    }

    pub fn margin(&self) -> f32 {
        self.margin
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_NODE_CAP).contains(&self.max_nodes) {
            return Err(ConfigError::out_of_range(
                "max_nodes",
                "between 1 and 2000",
                self.max_nodes,
            ));
        }
        if self.ticks > MAX_SIMULATION_TICKS {
            return Err(ConfigError::out_of_range(
                "ticks",
                "at most 10000",
                self.ticks,
            ));
        }
        if !(self.velocity_decay > 0.0 && self.velocity_decay < 1.0) {
            return Err(ConfigError::out_of_range(
                "velocity_decay",
                "strictly between 0 and 1",
                self.velocity_decay,
            ));
        }

        let non_negative = [
            ("repulsion", self.repulsion),
            ("link_distance", self.link_distance),
            ("link_strength", self.link_strength),
            ("gravity", self.gravity),
            ("energy_epsilon", self.energy_epsilon),
            ("margin", self.margin),
        ];
        for (field, value) in non_negative {
            if !(value.is_finite() && value >= 0.0) {
                return Err(ConfigError::out_of_range(
                    field,
                    "a finite non-negative number",
                    value,
                ));
            }
        }

        if !(self.max_velocity.is_finite() && self.max_velocity > 0.0) {
            return Err(ConfigError::out_of_range(
                "max_velocity",
                "a finite positive number",
                self.max_velocity,
            ));
        }
        Ok(())
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            max_nodes: 500,
            ticks: 300,
            seed: None,
            repulsion: 1500.0,
            link_distance: 60.0,
            link_strength: 0.05,
            gravity: 0.02,
            velocity_decay: 0.6,
            max_velocity: 40.0,
            energy_epsilon: 0.01,
            margin: 20.0,
        }
    }
}

/// Visual styling of the rendered graph. Colors are CSS color strings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    background: String,
    node_color: String,
    node_radius: f32,
    edge_color: String,
    edge_opacity: f32,
    edge_width: f32,
    label_color: String,
    font_family: String,
    font_size: f32,
    label_offset_x: f32,
    label_offset_y: f32,
}

impl StyleConfig {
    /// Returns the parsed background [`Color`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configured color string cannot be parsed.
    pub fn background(&self) -> Result<Color, ConfigError> {
        Ok(Color::new(&self.background)?)
    }

    pub fn node_color(&self) -> Result<Color, ConfigError> {
        Ok(Color::new(&self.node_color)?)
    }

    /// Edge color with the configured opacity applied
    pub fn edge_color(&self) -> Result<Color, ConfigError> {
        Ok(Color::new(&self.edge_color)?.with_alpha(self.edge_opacity))
    }

    pub fn label_color(&self) -> Result<Color, ConfigError> {
        Ok(Color::new(&self.label_color)?)
    }

    pub fn node_radius(&self) -> f32 {
        self.node_radius
    }

    pub fn edge_width(&self) -> f32 {
        self.edge_width
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    /// Label position relative to its node center
    pub fn label_offset(&self) -> (f32, f32) {
        (self.label_offset_x, self.label_offset_y)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.background()?;
        self.node_color()?;
        self.edge_color()?;
        self.label_color()?;

        if !(0.0..=1.0).contains(&self.edge_opacity) {
            return Err(ConfigError::out_of_range(
                "edge_opacity",
                "between 0 and 1",
                self.edge_opacity,
            ));
        }
        let positive = [
            ("node_radius", self.node_radius),
            ("edge_width", self.edge_width),
            ("font_size", self.font_size),
        ];
        for (field, value) in positive {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::out_of_range(
                    field,
                    "a finite positive number",
                    value,
                ));
            }
        }
        if !(self.label_offset_x.is_finite() && self.label_offset_y.is_finite()) {
            return Err(ConfigError::out_of_range(
                "label_offset",
                "finite",
                format!("({}, {})", self.label_offset_x, self.label_offset_y),
            ));
        }
        Ok(())
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            background: "white".to_string(),
            node_color: "#69b3a2".to_string(),
            node_radius: 5.0,
            edge_color: "#999".to_string(),
            edge_opacity: 0.6,
            edge_width: 2.0,
            label_color: "black".to_string(),
            font_family: "sans-serif".to_string(),
            font_size: 10.0,
            label_offset_x: 8.0,
            label_offset_y: 3.0,
        }
    }
}

/// Request handling policy.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Retry extraction once when the failure is transient.
    retry_transient: bool,

    /// Longest accepted input, in characters.
    max_input_chars: usize,
}

impl PipelineConfig {
    pub fn retry_transient(&self) -> bool {
        self.retry_transient
    }

    pub fn max_input_chars(&self) -> usize {
        self.max_input_chars
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_input_chars == 0 {
            return Err(ConfigError::out_of_range(
                "max_input_chars",
                "at least 1",
                self.max_input_chars,
            ));
        }
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            retry_transient: false,
            max_input_chars: 100_000,
        }
    }
}

/// Per-request overrides, as sent by API callers.
///
/// Field names are camelCase on the wire. Unset fields keep the value of the
/// configuration they are applied to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct PipelineOptions {
    pub canvas_width: Option<u32>,
    pub canvas_height: Option<u32>,
    pub max_nodes: Option<usize>,
    pub simulation_ticks: Option<usize>,
    pub seed: Option<u64>,
}

impl PipelineOptions {
    /// Returns `config` with every set option applied.
    ///
    /// The result is not validated; call [`AppConfig::validate`] afterwards.
    pub fn apply(&self, mut config: AppConfig) -> AppConfig {
        if let Some(width) = self.canvas_width {
            config.canvas.width = width;
        }
        if let Some(height) = self.canvas_height {
            config.canvas.height = height;
        }
        if let Some(max_nodes) = self.max_nodes {
            config.layout.max_nodes = max_nodes;
        }
        if let Some(ticks) = self.simulation_ticks {
            config.layout.ticks = ticks;
        }
        if let Some(seed) = self.seed {
            config.layout.seed = Some(seed);
        }
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.canvas().size(), Size::new(800.0, 600.0));
        assert_eq!(config.layout().ticks(), 300);
        assert_eq!(config.layout().seed(), None);
        assert!(!config.pipeline().retry_transient());
        assert_eq!(config.style().label_offset(), (8.0, 3.0));
    }

    #[test]
    fn test_edge_color_carries_opacity() {
        let color = StyleConfig::default().edge_color().unwrap();
        assert!((color.alpha() - 0.6).abs() < 0.001);
    }

    #[test]
    fn test_options_override_only_set_fields() {
        let options = PipelineOptions {
            canvas_height: Some(300),
            max_nodes: Some(10),
            ..Default::default()
        };
        let config = options.apply(AppConfig::default());
        assert_eq!(config.canvas().width(), 800);
        assert_eq!(config.canvas().height(), 300);
        assert_eq!(config.layout().max_nodes(), 10);
        assert_eq!(config.layout().ticks(), 300);
    }

    #[test]
    fn test_options_deserialize_camel_case() {
        let options: PipelineOptions = serde_json::from_str(
            r#"{"canvasWidth": 1, "canvasHeight": 2, "maxNodes": 3, "simulationTicks": 4, "seed": 5}"#,
        )
        .unwrap();
        assert_eq!(
            options,
            PipelineOptions {
                canvas_width: Some(1),
                canvas_height: Some(2),
                max_nodes: Some(3),
                simulation_ticks: Some(4),
                seed: Some(5),
            }
        );
        assert!(serde_json::from_str::<PipelineOptions>(r#"{"canvas_width": 1}"#).is_err());
    }

    #[test]
    fn test_rejects_zero_canvas() {
        let options = PipelineOptions {
            canvas_width: Some(0),
            ..Default::default()
        };
        let err = options.apply(AppConfig::default()).validate().unwrap_err();
        assert!(matches!(err, ConfigError::Canvas { width: 0, .. }));
    }

    #[test]
    fn test_rejects_oversized_canvas() {
        let options = PipelineOptions {
            canvas_height: Some(MAX_CANVAS_DIMENSION + 1),
            ..Default::default()
        };
        assert!(options.apply(AppConfig::default()).validate().is_err());
    }

    #[test]
    fn test_rejects_zero_node_cap_and_excess_ticks() {
        let zero_cap = PipelineOptions {
            max_nodes: Some(0),
            ..Default::default()
        };
        assert!(zero_cap.apply(AppConfig::default()).validate().is_err());

        let many_ticks = PipelineOptions {
            simulation_ticks: Some(MAX_SIMULATION_TICKS + 1),
            ..Default::default()
        };
        assert!(many_ticks.apply(AppConfig::default()).validate().is_err());
    }

    #[test]
    fn test_rejects_unbounded_node_cap() {
        let options: PipelineOptions = serde_json::from_str(
            r#"{"maxNodes": 18446744073709551615, "simulationTicks": 10000}"#,
        )
        .unwrap();
        let err = options.apply(AppConfig::default()).validate().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                field: "max_nodes",
                ..
            }
        ));

        let at_cap = PipelineOptions {
            max_nodes: Some(MAX_NODE_CAP),
            ..Default::default()
        };
        assert!(at_cap.apply(AppConfig::default()).validate().is_ok());
    }

    #[test]
    fn test_invalid_color_is_reported() {
        let style = StyleConfig {
            node_color: "not-a-color".to_string(),
            ..StyleConfig::default()
        };
        let err = style.validate().unwrap_err();
        assert!(matches!(err, ConfigError::Color(_)));
        assert!(err.to_string().contains("not-a-color"));
    }

    #[test]
    fn test_velocity_decay_bounds() {
        let layout = LayoutConfig {
            velocity_decay: 1.0,
            ..LayoutConfig::default()
        };
        assert!(layout.validate().is_err());

        let layout = LayoutConfig {
            velocity_decay: f32::NAN,
            ..LayoutConfig::default()
        };
        assert!(layout.validate().is_err());
    }
}
