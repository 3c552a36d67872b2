// Compositing pipeline: decode, validate, caption, encode

mod canvas;
mod text;

pub use text::{centered_offset_x, CaptionLayout, TextBrushRgba8, TextLayoutEngine};

use crate::error::{CaptionError, Result};
use crate::fetch::SourceFetcher;
use crate::metrics;
use crate::models::CaptionRequest;
use image::GenericImageView;
use std::sync::{Arc, Mutex};
use tracing::{debug, warn};

/// Maximum accepted source image width, in pixels.
pub const MAX_WIDTH: u32 = 1200;
/// Maximum accepted source image height, in pixels.
pub const MAX_HEIGHT: u32 = 1200;
/// Caption font size as a factor of surface width.
pub const FONT_SCALING: f32 = 0.06;
/// Caption baseline placement as a factor of surface height, applied from
/// the top edge for the top caption and mirrored from the bottom edge for
/// the bottom one.
pub const HEIGHT_FACTOR: f32 = 0.14;

/// Baselines for the two captions on a surface of the given height.
pub fn caption_baselines(height: u32) -> (u32, u32) {
    let h1 = (height as f32 * HEIGHT_FACTOR) as u32;
    (h1, height - h1)
}

/// The image-compositing pipeline.
///
/// Holds the process font (loaded once at startup, shared read-only) and a
/// layout engine for shaping captions. One renderer serves all requests;
/// each request gets its own exclusively-owned canvas.
pub struct Renderer {
    font: vello_cpu::peniko::FontData,
    font_family: String,
    engine: Mutex<TextLayoutEngine>,
}

impl Renderer {
    pub fn new(font_bytes: Vec<u8>) -> Result<Self> {
        let engine = TextLayoutEngine::new(&font_bytes)?;
        let font_family = engine.family_name().to_string();
        debug!(family = %font_family, "caption font registered");
        let font =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        Ok(Self {
            font,
            font_family,
            engine: Mutex::new(engine),
        })
    }

    /// Primary family name of the process font.
    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    /// Run the full pipeline for `req`: fetch, decode, validate, caption,
    /// encode. Exactly one outbound fetch; the first failure aborts with no
    /// partial image.
    pub async fn generate(&self, req: &CaptionRequest, fetcher: &SourceFetcher) -> Result<Vec<u8>> {
        let source_bytes = fetcher.fetch(&req.source_url).await?;
        let timer = metrics::RENDER_DURATION.start_timer();
        let result = self.compose(&source_bytes, req);
        timer.observe_duration();
        result
    }

    /// Decode `source_bytes`, validate bounds, and draw both captions over
    /// a fresh copy of the source raster.
    pub fn compose(&self, source_bytes: &[u8], req: &CaptionRequest) -> Result<Vec<u8>> {
        // Cheap header peek: reject declared-oversized sources before
        // spending a full decode on them. The authoritative check on the
        // decoded dimensions still runs below.
        if let Ok(dim) = imagesize::blob_size(source_bytes) {
            if dim.width > MAX_WIDTH as usize || dim.height > MAX_HEIGHT as usize {
                return Err(CaptionError::TooLarge(format!(
                    "declared {}x{}",
                    dim.width, dim.height
                )));
            }
        }

        let source = image::load_from_memory(source_bytes).map_err(|e| {
            warn!(error = %e, "source decode failed");
            CaptionError::Decode(e.to_string())
        })?;
        let (width, height) = source.dimensions();
        if width > MAX_WIDTH || height > MAX_HEIGHT {
            return Err(CaptionError::TooLarge(format!(
                "decoded {}x{}",
                width, height
            )));
        }
        let w: u16 = width
            .try_into()
            .map_err(|_| CaptionError::Internal("surface width exceeds u16".to_string()))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| CaptionError::Internal("surface height exceeds u16".to_string()))?;

        let mut rgba = source.to_rgba8().into_raw();
        canvas::premultiply_rgba8_in_place(&mut rgba);
        let source_pixmap = canvas::pixmap_from_premul_rgba8(&rgba, width, height)?;

        let (h1, h2) = caption_baselines(height);
        let [r, g, b, a] = req.color.rgba8();
        let brush = TextBrushRgba8 { r, g, b, a };
        let size_px = width as f32 * FONT_SCALING;

        // Measure both captions before the canvas exists.
        let (top_layout, bottom_layout) = {
            let mut engine = self.engine.lock().expect("layout engine poisoned");
            (
                engine.layout_line(&req.top_text, size_px, brush),
                engine.layout_line(&req.bottom_text, size_px, brush),
            )
        };

        let mut ctx = vello_cpu::RenderContext::new(w, h);

        // Base layer: every source pixel drawn over the canvas.
        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(vello_cpu::Image {
            image: vello_cpu::ImageSource::Pixmap(Arc::new(source_pixmap)),
            sampler: vello_cpu::peniko::ImageSampler::default(),
        });
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            width as f64,
            height as f64,
        ));

        self.draw_caption(&mut ctx, &top_layout, width, h1, "top");
        self.draw_caption(&mut ctx, &bottom_layout, width, h2, "bottom");

        let mut canvas_pixmap = vello_cpu::Pixmap::new(w, h);
        ctx.flush();
        ctx.render_to_pixmap(&mut canvas_pixmap);

        canvas::encode_png(canvas_pixmap.data_as_u8_slice(), width, height)
    }

    /// Place one measured caption with its baseline at `baseline_h`.
    fn draw_caption(
        &self,
        ctx: &mut vello_cpu::RenderContext,
        layout: &CaptionLayout,
        surface_width: u32,
        baseline_h: u32,
        position: &str,
    ) {
        let measured = text::line_advance(layout);
        if measured > surface_width as f32 {
            // Degraded, not fatal: the caption draws clipped.
            warn!(
                position,
                measured = f64::from(measured),
                surface_width,
                "caption wider than surface, drawing clipped"
            );
            metrics::record_layout_degraded(position);
        }
        let offset_x = text::centered_offset_x(surface_width, measured);
        let baseline = text::line_baseline(layout);

        ctx.set_transform(vello_cpu::kurbo::Affine::translate((
            offset_x as f64,
            baseline_h as f64 - baseline as f64,
        )));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&self.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caption_baselines_mirror() {
        let (h1, h2) = caption_baselines(600);
        assert_eq!(h1, 84);
        assert_eq!(h2, 516);

        let (h1, h2) = caption_baselines(1000);
        assert_eq!(h1, 140);
        assert_eq!(h2, 860);
    }

    #[test]
    fn test_caption_baselines_small_surface() {
        let (h1, h2) = caption_baselines(10);
        assert_eq!(h1, 1);
        assert_eq!(h2, 9);
    }
}
