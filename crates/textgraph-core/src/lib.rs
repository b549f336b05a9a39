//! Textgraph Core Types and Definitions
//!
//! This crate provides the foundational types shared by the textgraph
//! pipeline. It includes:
//!
//! - **Graph**: Entities, directed edges and validated graphs ([`graph`] module)
//! - **Colors**: Color handling with CSS color support ([`color::Color`])
//! - **Geometry**: Basic geometric types ([`geometry`] module)
//! - **Scene**: Backend-agnostic drawing primitives ([`scene`] module)
//! - **Text**: Label measurement backed by real font metrics ([`text`] module)

pub mod color;
pub mod geometry;
pub mod graph;
pub mod scene;
pub mod text;
