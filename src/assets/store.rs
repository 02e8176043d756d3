use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use tracing::{debug, warn};

use crate::{
    assets::decode::{self as assets_decode, PreparedImage, SVG_RASTER_PX},
    composition::model::Composition,
    foundation::error::{VideoError, VideoResult},
    layout::flex::FontRole,
};

/// Family names tried, in order, when no emoji font file is configured.
const EMOJI_FAMILIES: [&str; 5] = [
    "Noto Color Emoji",
    "Apple Color Emoji",
    "Segoe UI Emoji",
    "Twemoji Mozilla",
    "Noto Emoji",
];

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// Where a font came from.
pub enum FontOrigin {
    /// A file configured in the composition assets, normalized relative path.
    File(String),
    /// A face found through system (or `<root>/fonts`) font discovery.
    System(String),
}

#[derive(Clone)]
/// Font bytes ready for shaping and glyph rendering.
pub struct PreparedFont {
    /// Raw font file bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Face index inside the file (non-zero for collections).
    pub index: u32,
    /// Family name reported by the font.
    pub family: String,
    /// Where the bytes were loaded from.
    pub origin: FontOrigin,
}

impl std::fmt::Debug for PreparedFont {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedFont")
            .field("bytes_len", &self.bytes.len())
            .field("index", &self.index)
            .field("family", &self.family)
            .field("origin", &self.origin)
            .finish()
    }
}

#[derive(Clone, Debug)]
/// Immutable store of decoded assets used during rendering.
///
/// All IO and decoding happens in [`PreparedAssetStore::prepare`] so rendering stays IO-free.
pub struct PreparedAssetStore {
    logo: PreparedImage,
    regular: Option<PreparedFont>,
    bold: Option<PreparedFont>,
    emoji: Option<PreparedFont>,
}

impl PreparedAssetStore {
    /// Load the logo and fonts of `comp` from the filesystem root `root`.
    ///
    /// Configured files must exist. Fonts that are not configured are looked up by family name
    /// among system fonts and `<root>/fonts`; when nothing matches the corresponding text is not
    /// drawn.
    #[tracing::instrument(skip(comp, root), fields(comp = %comp.id))]
    pub fn prepare(comp: &Composition, root: impl Into<PathBuf>) -> VideoResult<Self> {
        let root = root.into();
        let assets = &comp.assets;

        let logo_path = normalize_rel_path(&assets.logo)?;
        let logo_is_svg = assets_decode::is_svg_path(&logo_path);
        let needs_fontdb = logo_is_svg
            || assets.font_regular.is_none()
            || assets.font_bold.is_none()
            || assets.font_emoji.is_none();
        let fontdb = needs_fontdb.then(|| build_fontdb(&root));

        let logo_bytes = read_bytes(&root, &logo_path)?;
        let logo = if logo_is_svg {
            let abs = root.join(&logo_path);
            let db = fontdb
                .clone()
                .unwrap_or_else(|| Arc::new(usvg::fontdb::Database::new()));
            assets_decode::decode_svg(&logo_bytes, db, abs.parent(), SVG_RASTER_PX)?
        } else {
            assets_decode::decode_image(&logo_bytes)?
        };
        debug!(width = logo.width, height = logo.height, "logo decoded");

        let system = fontdb.as_deref();
        let regular = match &assets.font_regular {
            Some(src) => Some(load_font_file(&root, src)?),
            None => system.and_then(|db| query_system_font(db, &comp.font_family, 400)),
        };
        let bold = match &assets.font_bold {
            Some(src) => Some(load_font_file(&root, src)?),
            None => system.and_then(|db| query_system_font(db, &comp.font_family, 700)),
        };
        let emoji = match &assets.font_emoji {
            Some(src) => Some(load_font_file(&root, src)?),
            None => system.and_then(|db| {
                EMOJI_FAMILIES
                    .iter()
                    .find_map(|family| query_exact_family(db, family))
            }),
        };

        if regular.is_none() {
            warn!(
                family = %comp.font_family,
                "no usable font found; text will not be drawn"
            );
        }
        if emoji.is_none() {
            debug!("no emoji font found; emoji glyphs will not be drawn");
        }

        Ok(Self {
            logo,
            regular,
            bold,
            emoji,
        })
    }

    /// Store holding only `logo` and no fonts; text nodes are skipped when rendering with it.
    pub fn in_memory(logo: PreparedImage) -> Self {
        Self {
            logo,
            regular: None,
            bold: None,
            emoji: None,
        }
    }

    /// Decoded logo.
    pub fn logo(&self) -> &PreparedImage {
        &self.logo
    }

    /// Font for `role`; bold falls back to regular.
    pub fn font(&self, role: FontRole) -> Option<&PreparedFont> {
        match role {
            FontRole::Regular => self.regular.as_ref(),
            FontRole::Bold => self.bold.as_ref().or(self.regular.as_ref()),
            FontRole::Emoji => self.emoji.as_ref(),
        }
    }
}

fn read_bytes(root: &Path, norm_path: &str) -> VideoResult<Vec<u8>> {
    let path = root.join(Path::new(norm_path));
    std::fs::read(&path)
        .with_context(|| format!("read asset bytes from '{}'", path.display()))
        .map_err(VideoError::from)
}

fn load_font_file(root: &Path, source: &str) -> VideoResult<PreparedFont> {
    let norm = normalize_rel_path(source)?;
    let bytes = read_bytes(root, &norm)?;
    let mut db = usvg::fontdb::Database::new();
    db.load_font_data(bytes.clone());
    let family = db
        .faces()
        .next()
        .and_then(|face| face.families.first().map(|(name, _)| name.clone()))
        .ok_or_else(|| VideoError::validation(format!("'{norm}' is not a usable font file")))?;
    Ok(PreparedFont {
        bytes: Arc::new(bytes),
        index: 0,
        family,
        origin: FontOrigin::File(norm),
    })
}

fn build_fontdb(root: &Path) -> Arc<usvg::fontdb::Database> {
    let mut db = usvg::fontdb::Database::new();
    db.load_system_fonts();
    load_fonts_from_dir(&mut db, &root.join("fonts"));
    debug!(faces = db.len(), "font database loaded");
    Arc::new(db)
}

fn load_fonts_from_dir(db: &mut usvg::fontdb::Database, dir: &Path) {
    let Ok(rd) = std::fs::read_dir(dir) else {
        return;
    };

    for entry in rd.flatten() {
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
            continue;
        };
        let ext = ext.to_ascii_lowercase();
        if ext != "ttf" && ext != "otf" && ext != "ttc" {
            continue;
        }
        if let Err(err) = db.load_font_file(&path) {
            debug!(path = %path.display(), %err, "skipping unreadable font");
        }
    }
}

fn query_system_font(
    db: &usvg::fontdb::Database,
    family: &str,
    weight: u16,
) -> Option<PreparedFont> {
    let families = [
        usvg::fontdb::Family::Name(family),
        usvg::fontdb::Family::Monospace,
    ];
    let query = usvg::fontdb::Query {
        families: &families,
        weight: usvg::fontdb::Weight(weight),
        stretch: usvg::fontdb::Stretch::Normal,
        style: usvg::fontdb::Style::Normal,
    };
    let id = db.query(&query)?;
    face_to_font(db, id)
}

fn query_exact_family(db: &usvg::fontdb::Database, family: &str) -> Option<PreparedFont> {
    let families = [usvg::fontdb::Family::Name(family)];
    let query = usvg::fontdb::Query {
        families: &families,
        weight: usvg::fontdb::Weight::NORMAL,
        stretch: usvg::fontdb::Stretch::Normal,
        style: usvg::fontdb::Style::Normal,
    };
    let id = db.query(&query)?;
    face_to_font(db, id)
}

fn face_to_font(db: &usvg::fontdb::Database, id: usvg::fontdb::ID) -> Option<PreparedFont> {
    let face = db.face(id)?;
    let family = face.families.first().map(|(name, _)| name.clone())?;
    let origin = match &face.source {
        usvg::fontdb::Source::File(path) | usvg::fontdb::Source::SharedFile(path, _) => {
            path.display().to_string()
        }
        usvg::fontdb::Source::Binary(_) => family.clone(),
    };
    let (bytes, index) = db.with_face_data(id, |data, index| (data.to_vec(), index))?;
    debug!(%family, %origin, "resolved system font");
    Some(PreparedFont {
        bytes: Arc::new(bytes),
        index,
        family,
        origin: FontOrigin::System(origin),
    })
}

/// Normalize and validate composition-relative asset paths.
///
/// The normalized result uses `/` separators, removes `.` segments, and rejects absolute paths or
/// parent traversals (`..`).
pub fn normalize_rel_path(source: &str) -> VideoResult<String> {
    let s = source.replace('\\', "/");
    if s.starts_with('/') {
        return Err(VideoError::validation("asset paths must be relative"));
    }
    if s.is_empty() {
        return Err(VideoError::validation("asset path must be non-empty"));
    }

    let mut out = Vec::<&str>::new();
    for part in s.split('/') {
        if part.is_empty() || part == "." {
            continue;
        }
        if part == ".." {
            return Err(VideoError::validation("asset paths must not contain '..'"));
        }
        out.push(part);
    }

    if out.is_empty() {
        return Err(VideoError::validation("asset path must contain a file name"));
    }

    Ok(out.join("/"))
}

/// Face registered with Parley under a family alias private to one [`PreparedFont`].
#[derive(Clone, Debug)]
struct RegisteredFace {
    family: String,
    weight: parley::style::FontWeight,
    style: parley::style::FontStyle,
    width: parley::style::FontWidth,
}

/// Stateful helper for building Parley text layouts from prepared fonts.
///
/// Each prepared font is registered once under its own family alias, and layouts request the
/// exact attributes of its face, so a run is always shaped with the font it was asked for even
/// when two fonts report the same family name.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    faces: HashMap<(usize, u32), RegisteredFace>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: HashMap::new(),
        }
    }

    fn face_for(&mut self, font: &PreparedFont) -> VideoResult<RegisteredFace> {
        let key = (Arc::as_ptr(&font.bytes) as usize, font.index);
        if let Some(face) = self.faces.get(&key) {
            return Ok(face.clone());
        }

        let alias = format!("picas-face-{}", self.faces.len());
        let registered = self.font_ctx.collection.register_fonts(
            parley::fontique::Blob::from(font.bytes.to_vec()),
            Some(parley::fontique::FontInfoOverride {
                family_name: Some(alias.as_str()),
                ..Default::default()
            }),
        );
        let info = registered
            .iter()
            .flat_map(|(_, infos)| infos.iter())
            .find(|info| info.index() == font.index)
            .ok_or_else(|| {
                VideoError::validation(format!(
                    "font '{}' has no face at index {}",
                    font.family, font.index
                ))
            })?;

        let face = RegisteredFace {
            family: alias,
            weight: info.weight(),
            style: info.style(),
            width: info.width(),
        };
        self.faces.insert(key, face.clone());
        Ok(face)
    }

    /// Shape and lay out one unwrapped line of text with `font`.
    pub fn layout_plain(
        &mut self,
        text: &str,
        font: &PreparedFont,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> VideoResult<parley::Layout<TextBrushRgba8>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(VideoError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let face = self.face_for(font)?;
        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Single(parley::style::FontFamily::Named(
                std::borrow::Cow::Owned(face.family),
            )),
        ));
        builder.push_default(parley::style::StyleProperty::FontWeight(face.weight));
        builder.push_default(parley::style::StyleProperty::FontStyle(face.style));
        builder.push_default(parley::style::StyleProperty::FontWidth(face.width));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<TextBrushRgba8> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
