//! Extraction requests against a chat model.
//!
//! The model service sits behind [`ChatModel`], a narrow async seam that takes
//! a list of chat messages and returns the assistant's text. Everything
//! protocol-specific (HTTP, authentication, payload shape) lives in the
//! implementation; [`ExtractionClient`] only builds the prompt and decodes the
//! reply.

use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, trace};

use textgraph_core::graph::Graph;

use crate::{error::ExtractionError, reply};

/// Instruction sent as the system message of every extraction request.
pub const SYSTEM_PROMPT: &str = "You are a helpful assistant that extracts entities and their \
relationships from text. Return the result as a JSON object with 'entities' and 'edges' keys. \
'entities' should be an array of strings, and 'edges' should be an array of arrays, where each \
inner array contains two strings representing a relationship from the first entity to the \
second. Every entity used in an edge must also appear in 'entities'. Respond with the JSON \
object only.";

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    /// Wire name used by chat-completion APIs
    pub fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    role: Role,
    content: String,
}

impl ChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// A single chat-completion request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatRequest {
    messages: Vec<ChatMessage>,
}

impl ChatRequest {
    pub fn new(messages: Vec<ChatMessage>) -> Self {
        Self { messages }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

/// A language-model service that answers chat requests.
///
/// Implementations perform exactly one outbound call per [`complete`]
/// invocation and never retry on their own; retry policy belongs to the
/// caller.
///
/// [`complete`]: ChatModel::complete
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Sends the request and returns the assistant's reply text.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] when the service cannot be reached, answers
    /// with a non-success status, or sends a response without reply text.
    async fn complete(&self, request: &ChatRequest) -> Result<String, ExtractionError>;
}

/// Sends text to a [`ChatModel`] and decodes the entity/edge reply.
pub struct ExtractionClient {
    model: Arc<dyn ChatModel>,
}

impl ExtractionClient {
    pub fn new(model: Arc<dyn ChatModel>) -> Self {
        Self { model }
    }

    /// Builds the fixed two-message request for `text`.
    ///
    /// ```
    /// # use textgraph_extract::{ExtractionClient, Role};
    /// let request = ExtractionClient::request_for("Alice knows Bob.");
    /// assert_eq!(request.messages().len(), 2);
    /// assert_eq!(request.messages()[0].role(), Role::System);
    /// assert_eq!(request.messages()[1].content(), "Alice knows Bob.");
    /// ```
    pub fn request_for(text: &str) -> ChatRequest {
        ChatRequest::new(vec![
            ChatMessage::new(Role::System, SYSTEM_PROMPT),
            ChatMessage::new(Role::User, text),
        ])
    }

    /// Extracts the raw (unvalidated) graph described by `text`.
    ///
    /// # Errors
    ///
    /// Returns [`ExtractionError`] if the model call fails or if the reply is
    /// not a JSON object with string `entities` and string-pair `edges`.
    pub async fn extract(&self, text: &str) -> Result<Graph, ExtractionError> {
        debug!(text_len = text.len(); "Requesting entity extraction");

        let request = Self::request_for(text);
        let reply = self.model.complete(&request).await?;
        trace!(reply = reply.as_str(); "Model reply");

        let graph = reply::parse_graph(&reply)?;
        debug!(
            entity_count = graph.entity_count(),
            edge_count = graph.edge_count();
            "Extraction reply decoded"
        );

        Ok(graph)
    }
}
