use crate::foundation::error::{VideoError, VideoResult};

/// Pixel size for rasterizing `tree` with its longest side at `max_side`, keeping aspect.
pub fn svg_raster_size(tree: &usvg::Tree, max_side: u32) -> VideoResult<(u32, u32)> {
    let size = tree.size();
    let (w, h) = (size.width(), size.height());
    if !w.is_finite() || !h.is_finite() || w <= 0.0 || h <= 0.0 {
        return Err(VideoError::validation("svg has invalid width/height"));
    }
    if max_side == 0 {
        return Err(VideoError::validation("svg raster size must be > 0"));
    }

    let s = max_side as f32 / w.max(h);
    let width = ((w * s).round() as u32).max(1);
    let height = ((h * s).round() as u32).max(1);
    Ok((width, height))
}

/// Render `tree` stretched to `width x height`. tiny-skia pixmaps are already premultiplied.
pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> VideoResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| VideoError::validation("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.take())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/svg_raster.rs"]
mod tests;
