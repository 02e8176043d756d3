use crate::foundation::core::{Canvas, Point, Rect, Rgba8Premul, Size};

/// Horizontal advance of one monospace glyph, in em.
pub const MONO_ADVANCE_EM: f64 = 0.6;
/// Height of one line of text, in em.
pub const LINE_HEIGHT_EM: f64 = 1.48;

/// Main axis of a [`Stack`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Children left to right.
    Row,
    /// Children top to bottom.
    Column,
}

/// Which loaded font draws a text run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum FontRole {
    /// Regular weight.
    Regular,
    /// Bold weight.
    Bold,
    /// Emoji glyphs.
    Emoji,
}

/// What gets painted inside a node's rectangle.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DrawKind {
    /// Rounded rectangle, optionally outlined.
    Panel {
        /// Fill color.
        fill: Rgba8Premul,
        /// Corner radius in pixels.
        radius: f64,
        /// Border drawn inside the rectangle as `(width, color)`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        border: Option<(f64, Rgba8Premul)>,
    },
    /// The logo image stretched to the rectangle with rounded corners.
    Image {
        /// Corner radius in pixels.
        radius: f64,
    },
    /// A single line of text centered in the rectangle.
    Text {
        /// Text content.
        text: String,
        /// Font used to shape it.
        role: FontRole,
        /// Font size in pixels.
        size_px: f64,
        /// Fill color.
        color: Rgba8Premul,
    },
}

/// A positioned paint operation in canvas pixels.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct DrawNode {
    /// Layout box, before scaling.
    pub rect: Rect,
    /// Uniform scale about the box center.
    pub scale: f64,
    /// Accumulated opacity in `[0, 1]`.
    pub opacity: f64,
    /// Paint operation.
    pub kind: DrawKind,
}

/// Layout tree node.
#[derive(Clone, Debug, PartialEq)]
pub enum Node {
    /// Container laying children out along one axis.
    Stack(Stack),
    /// Fixed-size box painted with one or more layers.
    Leaf(Leaf),
}

/// Children along an axis with a fixed gap, centered on the cross axis.
#[derive(Clone, Debug, PartialEq)]
pub struct Stack {
    /// Main axis.
    pub axis: Axis,
    /// Space between children in pixels.
    pub gap: f64,
    /// Opacity multiplied into every descendant.
    pub opacity: f64,
    /// Children in order.
    pub children: Vec<Node>,
}

/// A fixed-size box; every layer shares its rect, scale and opacity.
#[derive(Clone, Debug, PartialEq)]
pub struct Leaf {
    /// Box size. Scale does not affect layout.
    pub size: Size,
    /// Uniform scale about the box center.
    pub scale: f64,
    /// Opacity of the box.
    pub opacity: f64,
    /// Paint layers, back to front.
    pub layers: Vec<DrawKind>,
}

impl Node {
    /// Stack with full opacity.
    pub fn stack(axis: Axis, gap: f64, children: Vec<Node>) -> Self {
        Self::Stack(Stack {
            axis,
            gap,
            opacity: 1.0,
            children,
        })
    }

    /// Column with full opacity.
    pub fn column(gap: f64, children: Vec<Node>) -> Self {
        Self::stack(Axis::Column, gap, children)
    }

    /// Row with full opacity.
    pub fn row(gap: f64, children: Vec<Node>) -> Self {
        Self::stack(Axis::Row, gap, children)
    }

    /// Single line of text in a box sized by its monospace metrics.
    pub fn text(text: impl Into<String>, role: FontRole, size_px: f64, color: Rgba8Premul) -> Self {
        let text = text.into();
        let size = text_box(&text, size_px);
        Self::Leaf(Leaf {
            size,
            scale: 1.0,
            opacity: 1.0,
            layers: vec![DrawKind::Text {
                text,
                role,
                size_px,
                color,
            }],
        })
    }

    /// Logo image box.
    pub fn image(size: Size, radius: f64) -> Self {
        Self::Leaf(Leaf {
            size,
            scale: 1.0,
            opacity: 1.0,
            layers: vec![DrawKind::Image { radius }],
        })
    }

    /// Set opacity on a stack or leaf.
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        match &mut self {
            Self::Stack(s) => s.opacity = opacity,
            Self::Leaf(l) => l.opacity = opacity,
        }
        self
    }

    /// Set the scale of a leaf; stacks ignore it.
    pub fn with_scale(mut self, scale: f64) -> Self {
        if let Self::Leaf(l) = &mut self {
            l.scale = scale;
        }
        self
    }

    /// Override the size of a leaf; stacks ignore it.
    pub fn with_size(mut self, size: Size) -> Self {
        if let Self::Leaf(l) = &mut self {
            l.size = size;
        }
        self
    }

    /// Paint `panel` behind a leaf's existing layers; stacks ignore it.
    pub fn with_backdrop(mut self, panel: DrawKind) -> Self {
        if let Self::Leaf(l) = &mut self {
            l.layers.insert(0, panel);
        }
        self
    }

    /// Size the node occupies in its parent.
    pub fn measure(&self) -> Size {
        match self {
            Self::Leaf(l) => l.size,
            Self::Stack(s) => {
                let sizes = s.children.iter().map(Node::measure);
                let gaps = s.gap * s.children.len().saturating_sub(1) as f64;
                match s.axis {
                    Axis::Row => sizes.fold(Size::new(gaps, 0.0), |acc, c| {
                        Size::new(acc.width + c.width, acc.height.max(c.height))
                    }),
                    Axis::Column => sizes.fold(Size::new(0.0, gaps), |acc, c| {
                        Size::new(acc.width.max(c.width), acc.height + c.height)
                    }),
                }
            }
        }
    }
}

/// Box of a single line of monospace text.
pub fn text_box(text: &str, size_px: f64) -> Size {
    let chars = text.chars().count() as f64;
    Size::new(
        chars * MONO_ADVANCE_EM * size_px,
        LINE_HEIGHT_EM * size_px,
    )
}

/// Lay `root` out centered on the canvas and flatten it into paint order.
pub fn layout(root: &Node, canvas: Canvas) -> Vec<DrawNode> {
    let size = root.measure();
    let origin = Point::new(
        align_center(f64::from(canvas.width), size.width),
        align_center(f64::from(canvas.height), size.height),
    );
    let mut out = Vec::new();
    place(root, origin, 1.0, &mut out);
    out
}

fn place(node: &Node, origin: Point, parent_opacity: f64, out: &mut Vec<DrawNode>) {
    match node {
        Node::Leaf(l) => {
            let rect = Rect::from_origin_size(origin, l.size);
            let opacity = (parent_opacity * l.opacity).clamp(0.0, 1.0);
            out.extend(l.layers.iter().map(|kind| DrawNode {
                rect,
                scale: l.scale,
                opacity,
                kind: kind.clone(),
            }));
        }
        Node::Stack(s) => {
            let opacity = parent_opacity * s.opacity;
            let outer = node.measure();
            let mut cursor = origin;
            for child in &s.children {
                let c = child.measure();
                let at = match s.axis {
                    Axis::Row => Point::new(cursor.x, origin.y + align_center(outer.height, c.height)),
                    Axis::Column => Point::new(origin.x + align_center(outer.width, c.width), cursor.y),
                };
                place(child, at, opacity, out);
                match s.axis {
                    Axis::Row => cursor.x += c.width + s.gap,
                    Axis::Column => cursor.y += c.height + s.gap,
                }
            }
        }
    }
}

fn align_center(container: f64, content: f64) -> f64 {
    (container - content) / 2.0
}

#[cfg(test)]
#[path = "../../tests/unit/layout/flex.rs"]
mod tests;
