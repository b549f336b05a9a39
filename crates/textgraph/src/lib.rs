//! Textgraph - turn free text into an entity-relationship graph image.
//!
//! A language model extracts entities and the relationships between them,
//! a force simulation lays the graph out, and the layout is rendered to a
//! PNG. The structured graph and the base64 image are returned together.
//!
//! - [`config`] - TOML-loadable settings and per-request options
//! - [`layout`] - the force-directed layout engine
//! - [`render`] - layout to [`Scene`](textgraph_core::scene::Scene) mapping
//! - [`export`] - SVG serialization of scenes
//! - [`raster`] - the [`Rasterizer`](raster::Rasterizer) seam and PNG output
//! - [`Pipeline`] - runs all stages and tags failures with their stage
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use textgraph::{Pipeline, PipelineOptions, config::AppConfig, raster::PngRasterizer};
//! use textgraph_extract::OpenAiChatModel;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::default();
//! let model = Arc::new(OpenAiChatModel::new(config.model().clone())?);
//! let rasterizer = Arc::new(PngRasterizer::new());
//!
//! let options = PipelineOptions {
//!     seed: Some(42),
//!     ..Default::default()
//! };
//! let pipeline = Pipeline::new(config, model, rasterizer).with_options(&options);
//!
//! let result = pipeline.run("Marie Curie worked with Pierre Curie in Paris.").await?;
//! println!("{}", serde_json::to_string(&result)?);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod export;
pub mod layout;
pub mod raster;
pub mod render;

mod error;
mod pipeline;

pub use textgraph_core::{color, geometry, graph, scene};

pub use config::PipelineOptions;
pub use error::{ConfigError, LayoutError, PipelineError, RenderError, Stage};
pub use pipeline::{CancelToken, Generated, GraphResult, Pipeline};
