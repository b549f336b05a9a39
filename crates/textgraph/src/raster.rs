//! Rasterization of scenes to PNG.
//!
//! [`Rasterizer`] is the seam between the vector scene and pixel output.
//! [`PngRasterizer`] implements it by serializing the scene to SVG, parsing
//! that with `usvg` and painting it with `resvg` into a pixmap of exactly the
//! canvas size.

use std::sync::Arc;

use base64::Engine as _;
use log::{debug, info};
use resvg::{
    tiny_skia::{Pixmap, Transform},
    usvg::{self, fontdb},
};

use textgraph_core::scene::Scene;

use crate::{error::RenderError, export::svg::render_svg};

/// Turns a [`Scene`] into encoded image bytes.
///
/// Implementations must be shareable between concurrent pipeline runs.
pub trait Rasterizer: Send + Sync {
    /// Renders `scene` and returns the encoded image
    fn rasterize(&self, scene: &Scene) -> Result<Vec<u8>, RenderError>;
}

/// PNG rasterizer backed by `resvg`.
///
/// The system font database is loaded once at construction and shared by
/// every render.
#[derive(Clone)]
pub struct PngRasterizer {
    fontdb: Arc<fontdb::Database>,
}

impl PngRasterizer {
    /// Creates a rasterizer using the fonts installed on the host
    pub fn new() -> Self {
        let mut fontdb = fontdb::Database::new();
        fontdb.load_system_fonts();
        info!(faces = fontdb.len(); "Loaded system fonts for rasterization");
        Self::with_fontdb(Arc::new(fontdb))
    }

    /// Creates a rasterizer with an explicit font database
    pub fn with_fontdb(fontdb: Arc<fontdb::Database>) -> Self {
        Self { fontdb }
    }
}

impl Default for PngRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for PngRasterizer {
    fn rasterize(&self, scene: &Scene) -> Result<Vec<u8>, RenderError> {
        let svg = render_svg(scene);

        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&self.fontdb);
        let tree = usvg::Tree::from_str(&svg, &options)?;

        let width = scene.size().width().round() as u32;
        let height = scene.size().height().round() as u32;
        let mut pixmap = Pixmap::new(width, height).ok_or(RenderError::Pixmap { width, height })?;

        resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());

        let png = pixmap
            .encode_png()
            .map_err(|err| RenderError::Encode(err.to_string()))?;
        debug!(width, height, bytes = png.len(); "Scene rasterized");
        Ok(png)
    }
}

/// Standard base64 encoding of image bytes for transport
pub fn encode_base64(bytes: &[u8]) -> String {
    base64::engine::general_purpose::STANDARD.encode(bytes)
}

#[cfg(test)]
mod tests {
    use textgraph_core::{
        color::Color,
        geometry::{Point, Size},
        scene::{Circle, Primitive},
    };

    use super::*;

    fn rasterizer() -> PngRasterizer {
        PngRasterizer::with_fontdb(Arc::new(fontdb::Database::new()))
    }

    #[test]
    fn test_blank_scene_has_canvas_dimensions() {
        let scene = Scene::new(Size::new(800.0, 600.0), Color::new("white").unwrap());
        let png = rasterizer().rasterize(&scene).unwrap();

        let pixmap = Pixmap::decode_png(&png).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (800, 600));

        let pixel = pixmap.pixel(400, 300).unwrap();
        assert_eq!((pixel.red(), pixel.green(), pixel.blue()), (255, 255, 255));
    }

    #[test]
    fn test_circle_is_painted() {
        let mut scene = Scene::new(Size::new(40.0, 30.0), Color::new("white").unwrap());
        scene.push(Primitive::Circle(Circle::new(
            Point::new(20.0, 15.0),
            5.0,
            Color::new("#69b3a2").unwrap(),
        )));
        let png = rasterizer().rasterize(&scene).unwrap();

        let pixmap = Pixmap::decode_png(&png).unwrap();
        let pixel = pixmap.pixel(20, 15).unwrap();
        assert_eq!((pixel.red(), pixel.green(), pixel.blue()), (0x69, 0xb3, 0xa2));
    }

    #[test]
    fn test_zero_sized_canvas_fails() {
        let scene = Scene::new(Size::new(0.0, 10.0), Color::new("white").unwrap());
        assert!(rasterizer().rasterize(&scene).is_err());
    }

    #[test]
    fn test_base64_encoding() {
        assert_eq!(encode_base64(b"png"), "cG5n");
        assert_eq!(encode_base64(&[]), "");
    }
}
