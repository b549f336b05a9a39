//! Decoding model replies.
//!
//! Models often wrap the requested JSON in prose or Markdown fences. The
//! reply is therefore scanned for the first balanced `{...}` span, and only
//! that span is decoded. The scanner understands JSON string literals, so
//! braces inside entity names do not confuse it.

use serde::Deserialize;

use textgraph_core::graph::{Edge, Graph};

use crate::error::ExtractionError;

#[derive(Debug, Deserialize)]
struct ReplyPayload {
    entities: Vec<String>,
    edges: Vec<Edge>,
}

/// Decodes a model reply into a raw graph.
///
/// # Errors
///
/// - [`ExtractionError::EmptyReply`] if the reply is blank
/// - [`ExtractionError::MissingJson`] if no balanced object is present
/// - [`ExtractionError::MalformedGraph`] if the object lacks `entities` or
///   `edges`, or either has the wrong shape
///
/// # Examples
///
/// ```
/// # use textgraph_extract::reply::parse_graph;
/// let reply = "Sure! Here it is:\n```json\n{\"entities\": [\"Alice\", \"Bob\"], \"edges\": [[\"Alice\", \"Bob\"]]}\n```";
/// let graph = parse_graph(reply).unwrap();
/// assert_eq!(graph.entity_count(), 2);
/// assert_eq!(graph.edge_count(), 1);
/// ```
pub fn parse_graph(reply: &str) -> Result<Graph, ExtractionError> {
    if reply.trim().is_empty() {
        return Err(ExtractionError::EmptyReply);
    }

    let object = find_json_object(reply).ok_or(ExtractionError::MissingJson)?;
    let payload: ReplyPayload = serde_json::from_str(object)?;

    Ok(Graph::new(payload.entities, payload.edges))
}

/// Returns the first balanced `{...}` span of `text`.
///
/// Each `{` is tried as a starting point in order; the first one whose
/// closing brace is found wins. Braces inside double-quoted strings are
/// ignored, honouring backslash escapes.
///
/// ```
/// # use textgraph_extract::reply::find_json_object;
/// assert_eq!(find_json_object("x {\"a\": {\"b\": 1}} y"), Some("{\"a\": {\"b\": 1}}"));
/// assert_eq!(find_json_object("{\"a\": \"}\"}"), Some("{\"a\": \"}\"}"));
/// assert_eq!(find_json_object("no object here"), None);
/// ```
pub fn find_json_object(text: &str) -> Option<&str> {
    text.match_indices('{')
        .find_map(|(start, _)| balanced_span_end(&text[start..]).map(|end| &text[start..start + end]))
}

/// Length of the balanced object at the start of `text`, if it closes.
fn balanced_span_end(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(offset + ch.len_utf8());
                }
            }
            _ => {}
        }
    }

    None
}
