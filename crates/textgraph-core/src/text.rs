//! Label styling and measurement.
//!
//! [`TextStyle`] describes how node labels look. [`measure`] returns the
//! pixel size of a label using cosmic-text shaping against the fonts
//! installed on the host, so the scene renderer can keep labels on the
//! canvas.
//!
//! ```
//! # use textgraph_core::text::{TextStyle, measure};
//! let style = TextStyle::default();
//! let size = measure("Alice", &style);
//! assert!(size.width() > 0.0);
//! assert!(size.height() > 0.0);
//! ```

use std::sync::{Mutex, OnceLock};

use cosmic_text::{Attrs, Buffer, Family, FontSystem, Metrics, Shaping};
use log::{info, warn};

use crate::{color::Color, geometry::Size};

/// Visual style for node labels.
///
/// | Property | Default |
/// |----------|---------|
/// | Font family | `"sans-serif"` |
/// | Font size | `10` px |
/// | Color | `None` (renderer default, black) |
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    font_family: String,
    font_size: f32,
    color: Option<Color>,
}

impl TextStyle {
    pub fn new(font_family: impl Into<String>, font_size: f32) -> Self {
        Self {
            font_family: font_family.into(),
            font_size,
            color: None,
        }
    }

    /// Sets the fill color of the text
    pub fn with_color(mut self, color: Option<Color>) -> Self {
        self.color = color;
        self
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Font size in pixels
    pub fn font_size(&self) -> f32 {
        self.font_size
    }

    pub fn color(&self) -> Option<&Color> {
        self.color.as_ref()
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new("sans-serif", 10.0)
    }
}

/// Measures the rendered size of `text` in pixels.
///
/// Falls back to an average-advance estimate when no font on the host can
/// shape the text, so the result is positive for any non-empty input.
pub fn measure(text: &str, style: &TextStyle) -> Size {
    FONT_METRICS
        .get_or_init(FontMetrics::new)
        .measure(text, style)
}

/// Process-wide `FontSystem`, created on first use and shared behind a mutex.
///
/// Label measurement from concurrent pipeline runs is serialized on this lock.
struct FontMetrics {
    font_system: Mutex<FontSystem>,
}

impl FontMetrics {
    fn new() -> Self {
        info!("Initializing FontSystem for label metrics");
        Self {
            font_system: Mutex::new(FontSystem::new()),
        }
    }

    fn measure(&self, text: &str, style: &TextStyle) -> Size {
        if text.is_empty() {
            return Size::default();
        }

        let line_height = style.font_size() * 1.2;
        let fallback = Size::new(
            text.chars().count() as f32 * style.font_size() * 0.55,
            line_height,
        );

        let Ok(mut font_system) = self.font_system.lock() else {
            warn!("FontSystem lock poisoned, estimating label size");
            return fallback;
        };

        let metrics = Metrics::new(style.font_size(), line_height);
        let mut buffer = Buffer::new(&mut font_system, metrics);
        let mut buffer = buffer.borrow_with(&mut font_system);

        let attrs = Attrs::new().family(Family::Name(style.font_family()));
        buffer.set_size(None, None);
        buffer.set_text(text, &attrs, Shaping::Advanced, None);
        buffer.shape_until_scroll(true);

        let mut width: f32 = 0.0;
        let mut height: f32 = 0.0;
        for run in buffer.layout_runs() {
            if let Some(last) = run.glyphs.last() {
                width = width.max(last.x + last.w);
            }
            height += line_height;
        }

        if width <= 0.0 {
            return fallback;
        }

        Size::new(width, height.max(line_height))
    }
}

static FONT_METRICS: OnceLock<FontMetrics> = OnceLock::new();

#[cfg(test)]
mod tests {
    use float_cmp::assert_approx_eq;

    use super::*;

    #[test]
    fn test_text_style_defaults() {
        let style = TextStyle::default();
        assert_eq!(style.font_family(), "sans-serif");
        assert_approx_eq!(f32, style.font_size(), 10.0);
        assert!(style.color().is_none());
    }

    #[test]
    fn test_text_style_with_color() {
        let style = TextStyle::default().with_color(Some(Color::new("navy").unwrap()));
        assert!(style.color().is_some());
    }

    #[test]
    fn test_measure_empty_is_zero() {
        let size = measure("", &TextStyle::default());
        assert!(size.is_zero());
    }

    #[test]
    fn test_measure_longer_text_is_wider() {
        let style = TextStyle::default();
        let short = measure("Al", &style);
        let long = measure("Alice in Wonderland", &style);
        assert!(long.width() > short.width());
    }

    #[test]
    fn test_measure_larger_font_is_taller() {
        let small = measure("Bob", &TextStyle::new("sans-serif", 10.0));
        let large = measure("Bob", &TextStyle::new("sans-serif", 24.0));
        assert!(large.height() > small.height());
    }
}
