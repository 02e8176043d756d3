use std::{collections::HashMap, sync::Arc};

use tracing::debug;

use crate::{
    assets::decode::PreparedImage,
    assets::store::{PreparedAssetStore, TextBrushRgba8, TextLayoutEngine},
    eval::evaluator::EvaluatedFrame,
    foundation::core::{Affine, Rect, Rgba8Premul, scale_about},
    foundation::error::{VideoError, VideoResult},
    foundation::math::unpremul_u8,
    layout::flex::{DrawKind, DrawNode, FontRole},
    render::backend::{FrameRGBA, RenderBackend, RenderSettings},
};

#[derive(Clone, PartialEq, Eq, Hash)]
struct TextKey {
    text: String,
    role: FontRole,
    size_bits: u64,
    color: [u8; 4],
}

#[derive(Clone)]
struct ImagePaint {
    paint: vello_cpu::Image,
    w: u32,
    h: u32,
}

/// CPU raster backend built on `vello_cpu`.
///
/// Shaped text and the logo paint are cached across frames; a backend is meant to be
/// reused for every frame of a render (one per worker thread when rendering in parallel).
pub struct CpuBackend {
    settings: RenderSettings,
    ctx: Option<vello_cpu::RenderContext>,
    text_engine: TextLayoutEngine,
    text_cache: HashMap<TextKey, Arc<parley::Layout<TextBrushRgba8>>>,
    logo_cache: Option<(usize, ImagePaint)>,
}

impl CpuBackend {
    /// Create a backend with the given settings.
    pub fn new(settings: RenderSettings) -> Self {
        Self {
            settings,
            ctx: None,
            text_engine: TextLayoutEngine::new(),
            text_cache: HashMap::new(),
            logo_cache: None,
        }
    }

    fn with_ctx_mut<R>(
        &mut self,
        width: u16,
        height: u16,
        f: impl FnOnce(&mut Self, &mut vello_cpu::RenderContext) -> VideoResult<R>,
    ) -> VideoResult<R> {
        let mut ctx = match self.ctx.take() {
            None => vello_cpu::RenderContext::new(width, height),
            Some(ctx) if ctx.width() == width && ctx.height() == height => ctx,
            Some(_) => vello_cpu::RenderContext::new(width, height),
        };
        ctx.reset();
        let out = f(self, &mut ctx)?;
        self.ctx = Some(ctx);
        Ok(out)
    }

    fn logo_paint(&mut self, logo: &PreparedImage) -> VideoResult<ImagePaint> {
        let key = Arc::as_ptr(&logo.rgba8_premul) as usize;
        if let Some((k, p)) = &self.logo_cache
            && *k == key
        {
            return Ok(p.clone());
        }
        let pixmap = pixmap_from_premul_bytes(&logo.rgba8_premul, logo.width, logo.height)?;
        let paint = ImagePaint {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            w: logo.width,
            h: logo.height,
        };
        self.logo_cache = Some((key, paint.clone()));
        Ok(paint)
    }

    fn shaped_text(
        &mut self,
        text: &str,
        role: FontRole,
        size_px: f64,
        color: Rgba8Premul,
        assets: &PreparedAssetStore,
    ) -> VideoResult<Option<Arc<parley::Layout<TextBrushRgba8>>>> {
        let key = TextKey {
            text: text.to_owned(),
            role,
            size_bits: size_px.to_bits(),
            color: color.to_array(),
        };
        if let Some(t) = self.text_cache.get(&key) {
            return Ok(Some(t.clone()));
        }
        let Some(font) = assets.font(role) else {
            debug!(?role, text, "no font for text; skipping");
            return Ok(None);
        };

        let brush = TextBrushRgba8 {
            r: color.r,
            g: color.g,
            b: color.b,
            a: color.a,
        };
        let layout = Arc::new(
            self.text_engine
                .layout_plain(text, font, size_px as f32, brush)?,
        );
        self.text_cache.insert(key, Arc::clone(&layout));
        Ok(Some(layout))
    }

    fn draw_node(
        &mut self,
        node: &DrawNode,
        assets: &PreparedAssetStore,
        ctx: &mut vello_cpu::RenderContext,
    ) -> VideoResult<()> {
        let opacity = node.opacity.clamp(0.0, 1.0) as f32;
        if opacity <= 0.0 || node.scale <= 0.0 || !node.scale.is_finite() {
            return Ok(());
        }

        let rect = node.rect;
        // Node-local space: origin at the rect's top-left, scaled about the rect center.
        let tr = scale_about(rect.center(), node.scale) * Affine::translate(rect.origin().to_vec2());
        let local = Rect::new(0.0, 0.0, rect.width(), rect.height());

        ctx.set_blend_mode(vello_cpu::peniko::BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_transform(affine_to_cpu(tr));
        if opacity < 1.0 {
            ctx.push_opacity_layer(opacity);
        }

        match &node.kind {
            DrawKind::Panel {
                fill,
                radius,
                border,
            } => match border {
                Some((w, color)) if *w > 0.0 => {
                    ctx.set_paint(color_to_cpu(*color));
                    ctx.fill_path(&rounded_rect_path(local, *radius));
                    ctx.set_paint(color_to_cpu(*fill));
                    ctx.fill_path(&rounded_rect_path(local.inset(-*w), (*radius - *w).max(0.0)));
                }
                _ => {
                    ctx.set_paint(color_to_cpu(*fill));
                    ctx.fill_path(&rounded_rect_path(local, *radius));
                }
            },
            DrawKind::Image { radius } => {
                let p = self.logo_paint(assets.logo())?;
                let sx = local.width() / f64::from(p.w.max(1));
                let sy = local.height() / f64::from(p.h.max(1));
                ctx.set_paint_transform(affine_to_cpu(Affine::scale_non_uniform(sx, sy)));
                ctx.set_paint(p.paint);
                ctx.fill_path(&rounded_rect_path(local, *radius));
                ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
            }
            DrawKind::Text {
                text,
                role,
                size_px,
                color,
            } => {
                if let Some(t) = self.shaped_text(text, *role, *size_px, *color, assets)? {
                    let dx = (local.width() - f64::from(t.width())) / 2.0;
                    let dy = (local.height() - f64::from(t.height())) / 2.0;
                    ctx.set_transform(affine_to_cpu(tr * Affine::translate((dx, dy))));
                    draw_layout(ctx, &t);
                }
            }
        }

        if opacity < 1.0 {
            ctx.pop_layer();
        }
        Ok(())
    }
}

impl RenderBackend for CpuBackend {
    fn render_frame(
        &mut self,
        frame: &EvaluatedFrame,
        assets: &PreparedAssetStore,
    ) -> VideoResult<FrameRGBA> {
        let width: u16 = frame
            .canvas
            .width
            .try_into()
            .map_err(|_| VideoError::evaluation("canvas width exceeds u16"))?;
        let height: u16 = frame
            .canvas
            .height
            .try_into()
            .map_err(|_| VideoError::evaluation("canvas height exceeds u16"))?;

        let bg = self
            .settings
            .clear_rgba
            .unwrap_or_else(|| frame.background.to_array());

        let mut pixmap = vello_cpu::Pixmap::new(width, height);
        self.with_ctx_mut(width, height, |this, ctx| {
            // render_to_pixmap overwrites the target, so the background is painted as geometry.
            if bg[3] > 0 {
                ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    unpremul_u8(bg[0], bg[3]),
                    unpremul_u8(bg[1], bg[3]),
                    unpremul_u8(bg[2], bg[3]),
                    bg[3],
                ));
                ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                    0.0,
                    0.0,
                    f64::from(width),
                    f64::from(height),
                ));
            }
            if let Some(scene) = &frame.scene {
                for node in &scene.nodes {
                    this.draw_node(node, assets, ctx)?;
                }
            }
            ctx.flush();
            ctx.render_to_pixmap(&mut pixmap);
            Ok(())
        })?;

        Ok(FrameRGBA {
            width: frame.canvas.width,
            height: frame.canvas.height,
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        })
    }

    fn worker_render_settings(&self) -> Option<RenderSettings> {
        Some(self.settings.clone())
    }
}

/// Glyph ids belong to the face the run was shaped with, so each run is drawn with that face.
fn draw_layout(ctx: &mut vello_cpu::RenderContext, layout: &parley::Layout<TextBrushRgba8>) {
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
            ctx.glyph_run(run.run().font())
                .font_size(run.run().font_size())
                .fill_glyphs(glyphs);
        }
    }
}

fn color_to_cpu(c: Rgba8Premul) -> vello_cpu::peniko::Color {
    vello_cpu::peniko::Color::from_rgba8(
        unpremul_u8(c.r, c.a),
        unpremul_u8(c.g, c.a),
        unpremul_u8(c.b, c.a),
        c.a,
    )
}

fn rounded_rect_path(rect: Rect, radius: f64) -> vello_cpu::kurbo::BezPath {
    use kurbo::Shape;

    let radius = radius.clamp(0.0, rect.width().min(rect.height()) / 2.0);
    bezpath_to_cpu(&rect.to_rounded_rect(radius).to_path(0.1))
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &kurbo::BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

fn pixmap_from_premul_bytes(
    bytes: &[u8],
    width: u32,
    height: u32,
) -> VideoResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| VideoError::evaluation("pixmap width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| VideoError::evaluation("pixmap height exceeds u16"))?;
    if bytes.len()
        != (width as usize)
            .saturating_mul(height as usize)
            .saturating_mul(4)
    {
        return Err(VideoError::evaluation("pixmap byte len mismatch"));
    }
    // Pixmap stores PremulRgba8; our bytes are already premultiplied.
    let pixels = bytes
        .chunks_exact(4)
        .map(|px| {
            vello_cpu::peniko::color::PremulRgba8::from_u8_array([px[0], px[1], px[2], px[3]])
        })
        .collect::<Vec<_>>();
    let may_have_opacities = bytes.chunks_exact(4).any(|px| px[3] != 255);
    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
