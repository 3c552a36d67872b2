// Caption shaping and centered placement

use crate::error::{CaptionError, Result};

/// RGBA8 brush color carried through Parley text layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TextBrushRgba8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

pub type CaptionLayout = parley::Layout<TextBrushRgba8>;

/// Stateful helper shaping single-line captions with the process font.
///
/// The Parley contexts inside are mutable per shaping call; the renderer
/// keeps one engine behind a mutex rather than rebuilding the (expensive)
/// font context per request.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    family_name: String,
}

impl TextLayoutEngine {
    /// Register the process font and resolve its primary family name.
    pub fn new(font_bytes: &[u8]) -> Result<Self> {
        let mut font_ctx = parley::FontContext::default();
        let families = font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.to_vec()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            CaptionError::Font("no font families registered from font bytes".to_string())
        })?;

        let family_name = font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| CaptionError::Font("registered font family has no name".to_string()))?
            .to_string();

        Ok(Self {
            font_ctx,
            layout_ctx: parley::LayoutContext::new(),
            family_name,
        })
    }

    pub fn family_name(&self) -> &str {
        &self.family_name
    }

    /// Shape `text` as a single unbroken line at `size_px`.
    ///
    /// This is the measurement half of measure-then-place: the layout is
    /// produced off-surface, and its advance width decides the centered
    /// draw position before any canvas pixel changes.
    pub fn layout_line(
        &mut self,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> CaptionLayout {
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(self.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: CaptionLayout = builder.build(text);
        layout.break_all_lines(None);
        layout
    }
}

/// Advance width of the first (only) line, in pixels. Empty text measures 0.
pub fn line_advance(layout: &CaptionLayout) -> f32 {
    layout
        .lines()
        .next()
        .map(|line| line.metrics().advance)
        .unwrap_or(0.0)
}

/// Baseline offset from the layout's top edge, in pixels.
pub fn line_baseline(layout: &CaptionLayout) -> f32 {
    layout
        .lines()
        .next()
        .map(|line| line.metrics().baseline)
        .unwrap_or(0.0)
}

/// Horizontal offset that centers a measured line on a surface.
///
/// Integer division truncating toward zero. Goes negative when the caption
/// is wider than the surface; the caller draws anyway (degraded layout).
pub fn centered_offset_x(surface_width: u32, measured_width: f32) -> i32 {
    (surface_width as i32 - measured_width as i32) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_offset_even_split() {
        assert_eq!(centered_offset_x(100, 80.0), 10);
        assert_eq!(centered_offset_x(800, 0.0), 400);
    }

    #[test]
    fn test_centered_offset_truncates_toward_zero() {
        // Fractional advance truncates before the division, as does the
        // division itself.
        assert_eq!(centered_offset_x(100, 81.9), 9);
        assert_eq!(centered_offset_x(101, 80.0), 10);
    }

    #[test]
    fn test_centered_offset_negative_when_too_wide() {
        assert_eq!(centered_offset_x(100, 120.0), -10);
        assert_eq!(centered_offset_x(100, 121.9), -10);
    }
}
