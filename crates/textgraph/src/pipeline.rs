//! The text-to-graph pipeline.
//!
//! A [`Pipeline`] runs the stages in order:
//!
//! ```text
//! text ─► extract ─► validate ─► layout ─► scene ─► rasterize ─► GraphResult
//! ```
//!
//! Only extraction performs I/O and suspends. The remaining stages are
//! synchronous; a [`CancelToken`] is checked between them.

use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use tokio::sync::Notify;

use textgraph_core::{
    graph::{Edge, Graph},
    scene::Scene,
};
use textgraph_extract::{ChatModel, ExtractionClient, validate};

use crate::{
    config::{AppConfig, PipelineOptions},
    error::PipelineError,
    layout::ForceLayout,
    raster::{Rasterizer, encode_base64},
    render::SceneRenderer,
};

/// Cooperative cancellation signal shared between a caller and a run.
///
/// Clones share the same state; cancelling any clone cancels all of them.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    inner: Arc<CancelState>,
}

#[derive(Debug, Default)]
struct CancelState {
    cancelled: AtomicBool,
    notify: Notify,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signals cancellation and wakes every waiter
    pub fn cancel(&self) {
        self.inner.cancelled.store(true, Ordering::SeqCst);
        self.inner.notify.notify_waiters();
    }

    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Completes once [`CancelToken::cancel`] has been called
    pub async fn cancelled(&self) {
        loop {
            // Register before reading the flag
            let notified = self.inner.notify.notified();
            if self.is_cancelled() {
                return;
            }
            notified.await;
        }
    }

    fn check(&self) -> Result<(), PipelineError> {
        if self.is_cancelled() {
            Err(PipelineError::Cancelled)
        } else {
            Ok(())
        }
    }
}

/// Final output of a pipeline run.
///
/// Serialized as `{ entities, edges, graph_image, entity_count, edge_count }`
/// where `graph_image` is a base64 PNG. The counts always equal the lengths
/// of the lists, and every edge references two listed entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphResult {
    entities: Vec<String>,
    edges: Vec<Edge>,
    graph_image: String,
    entity_count: usize,
    edge_count: usize,
}

impl GraphResult {
    fn new(graph: Graph, graph_image: String) -> Self {
        let entity_count = graph.entity_count();
        let edge_count = graph.edge_count();
        let (entities, edges) = graph.into_parts();
        Self {
            entities,
            edges,
            graph_image,
            entity_count,
            edge_count,
        }
    }

    pub fn entities(&self) -> &[String] {
        &self.entities
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Base64-encoded PNG image
    pub fn graph_image(&self) -> &str {
        &self.graph_image
    }

    pub fn entity_count(&self) -> usize {
        self.entity_count
    }

    pub fn edge_count(&self) -> usize {
        self.edge_count
    }
}

/// A [`GraphResult`] together with the scene it was rasterized from and the
/// raw image bytes
#[derive(Debug, Clone)]
pub struct Generated {
    result: GraphResult,
    scene: Scene,
    image: Vec<u8>,
}

impl Generated {
    pub fn result(&self) -> &GraphResult {
        &self.result
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Encoded image, before base64
    pub fn image(&self) -> &[u8] {
        &self.image
    }

    pub fn into_result(self) -> GraphResult {
        self.result
    }
}

/// Runs text through extraction, validation, layout, rendering and
/// rasterization.
///
/// A pipeline is cheap to build: the model client and rasterizer are shared
/// behind `Arc`s, so servers construct one per request with that request's
/// options.
///
/// # Examples
///
/// ```rust,no_run
/// use std::sync::Arc;
///
/// use textgraph::{Pipeline, config::AppConfig, raster::PngRasterizer};
/// use textgraph_extract::{ModelConfig, OpenAiChatModel};
///
/// # async fn run() -> Result<(), Box<dyn std::error::Error>> {
/// let config = AppConfig::default();
/// let model = OpenAiChatModel::new(ModelConfig::default())?;
/// let pipeline = Pipeline::new(config, Arc::new(model), Arc::new(PngRasterizer::new()));
///
/// let result = pipeline.run("Alice knows Bob.").await?;
/// println!("{} entities, {} edges", result.entity_count(), result.edge_count());
/// # Ok(())
/// # }
/// ```
pub struct Pipeline {
    config: AppConfig,
    extractor: ExtractionClient,
    rasterizer: Arc<dyn Rasterizer>,
}

impl Pipeline {
    pub fn new(
        config: AppConfig,
        model: Arc<dyn ChatModel>,
        rasterizer: Arc<dyn Rasterizer>,
    ) -> Self {
        Self {
            config,
            extractor: ExtractionClient::new(model),
            rasterizer,
        }
    }

    /// Layers per-request options over the configuration
    pub fn with_options(mut self, options: &PipelineOptions) -> Self {
        self.config = options.apply(self.config);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Runs the pipeline on `text`.
    ///
    /// # Errors
    ///
    /// Returns a [`PipelineError`] tagged with the failing stage.
    pub async fn run(&self, text: &str) -> Result<GraphResult, PipelineError> {
        self.run_with_cancel(text, &CancelToken::new()).await
    }

    /// Runs the pipeline on `text`, stopping early if `cancel` fires.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Cancelled`] if cancelled, or a
    /// [`PipelineError`] tagged with the failing stage.
    pub async fn run_with_cancel(
        &self,
        text: &str,
        cancel: &CancelToken,
    ) -> Result<GraphResult, PipelineError> {
        self.generate(text, cancel).await.map(Generated::into_result)
    }

    /// Like [`Pipeline::run_with_cancel`], but also returns the rendered
    /// scene and the raw image bytes.
    ///
    /// # Errors
    ///
    /// Same as [`Pipeline::run_with_cancel`].
    pub async fn generate(
        &self,
        text: &str,
        cancel: &CancelToken,
    ) -> Result<Generated, PipelineError> {
        match self.generate_inner(text, cancel).await {
            Ok(generated) => {
                info!(
                    entity_count = generated.result.entity_count(),
                    edge_count = generated.result.edge_count();
                    "Graph generated successfully"
                );
                Ok(generated)
            }
            Err(err) => {
                warn!(stage:? = err.stage(), err:err; "Graph generation failed");
                Err(err)
            }
        }
    }

    async fn generate_inner(
        &self,
        text: &str,
        cancel: &CancelToken,
    ) -> Result<Generated, PipelineError> {
        self.config.validate()?;

        let limit = self.config.pipeline().max_input_chars();
        let actual = text.chars().count();
        if actual > limit {
            return Err(PipelineError::InputTooLarge { actual, limit });
        }

        let raw = self.extract(text, cancel).await?;
        let (entities, edges) = raw.into_parts();
        let graph = validate::validate(entities, edges).into_graph();
        debug!(
            entity_count = graph.entity_count(),
            edge_count = graph.edge_count();
            "Graph validated"
        );
        cancel.check()?;

        let layout =
            ForceLayout::from_configs(self.config.canvas(), self.config.layout()).layout(&graph)?;
        cancel.check()?;

        let scene = SceneRenderer::from_style(self.config.style())?.render_layout(&layout);
        cancel.check()?;

        let image = self.rasterizer.rasterize(&scene)?;
        let result = GraphResult::new(layout.to_graph(), encode_base64(&image));

        Ok(Generated {
            result,
            scene,
            image,
        })
    }

    /// Extraction raced against cancellation, with at most one retry of a
    /// transient failure when enabled.
    async fn extract(&self, text: &str, cancel: &CancelToken) -> Result<Graph, PipelineError> {
        match self.extract_once(text, cancel).await {
            Err(err) if err.is_transient() && self.config.pipeline().retry_transient() => {
                warn!(err:err; "Transient extraction failure, retrying once");
                self.extract_once(text, cancel).await
            }
            other => other,
        }
    }

    async fn extract_once(&self, text: &str, cancel: &CancelToken) -> Result<Graph, PipelineError> {
        tokio::select! {
            biased;
            () = cancel.cancelled() => Err(PipelineError::Cancelled),
            result = self.extractor.extract(text) => result.map_err(PipelineError::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_cancel_token_wakes_waiter() {
        let token = CancelToken::new();
        let waiter = {
            let token = token.clone();
            tokio::spawn(async move { token.cancelled().await })
        };

        tokio::task::yield_now().await;
        token.cancel();

        tokio::time::timeout(std::time::Duration::from_secs(5), waiter)
            .await
            .unwrap()
            .unwrap();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_cancelled_resolves_immediately_when_already_cancelled() {
        let token = CancelToken::new();
        token.cancel();
        token.cancelled().await;
        assert!(matches!(token.check(), Err(PipelineError::Cancelled)));
    }

    #[test]
    fn test_graph_result_counts_match_lists() {
        let graph = Graph::new(
            vec!["A".to_string(), "B".to_string()],
            vec![Edge::new("A", "B")],
        );
        let result = GraphResult::new(graph, "aW1n".to_string());
        assert_eq!(result.entity_count(), result.entities().len());
        assert_eq!(result.edge_count(), result.edges().len());
    }

    #[test]
    fn test_graph_result_wire_format() {
        let graph = Graph::new(
            vec!["Alice".to_string(), "Bob".to_string()],
            vec![Edge::new("Alice", "Bob")],
        );
        let json = serde_json::to_value(GraphResult::new(graph, "aW1n".to_string())).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "entities": ["Alice", "Bob"],
                "edges": [["Alice", "Bob"]],
                "graph_image": "aW1n",
                "entity_count": 2,
                "edge_count": 1,
            })
        );
    }
}
