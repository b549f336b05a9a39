//! Entity and relationship extraction for textgraph.
//!
//! This crate is the front end of the pipeline: it turns free text into a
//! [`Graph`](textgraph_core::graph::Graph) by asking a language model, then
//! checks the result against the graph invariants.
//!
//! - [`client`] - the [`ChatModel`] seam and the [`ExtractionClient`] that
//!   drives one extraction request
//! - [`openai`] - an OpenAI-compatible HTTP implementation of [`ChatModel`]
//! - [`reply`] - locating and decoding the JSON object in a model reply
//! - [`validate`] - deduplication and dangling-edge filtering
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use textgraph_extract::{ExtractionClient, ModelConfig, OpenAiChatModel, validate};
//!
//! # async fn run() -> Result<(), textgraph_extract::ExtractionError> {
//! let model = OpenAiChatModel::new(ModelConfig::default())?;
//! let client = ExtractionClient::new(Arc::new(model));
//!
//! let raw = client.extract("Alice knows Bob.").await?;
//! let (entities, edges) = raw.into_parts();
//! let validation = validate::validate(entities, edges);
//! println!("{} entities", validation.graph().entity_count());
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod openai;
pub mod reply;
pub mod validate;

mod error;

pub use client::{ChatMessage, ChatModel, ChatRequest, ExtractionClient, Role};
pub use error::ExtractionError;
pub use openai::{ModelConfig, OpenAiChatModel};
