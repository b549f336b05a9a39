//! Vector export of rendered scenes.

pub mod svg;
