use crate::foundation::core::Viewport;
use crate::foundation::error::{HeroError, HeroResult};
use crate::palette::primitive::ColorRef;
use crate::scene::modifier::{Modifier, deserialize_modifiers};
use crate::scene::surface::SurfaceConfig;
use serde::{Deserialize, Serialize};

/// Id of the distinguished root-level group holding the canvas background.
pub const BACKGROUND_GROUP_ID: &str = "background-group";
/// Id (or name) of the surface inside the background group that paints the canvas.
pub const BACKGROUND_SURFACE_ID: &str = "background";

/// Root scene value (`HeroViewConfig` in persisted presets).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneConfig {
    /// Design-space dimensions of the hero image.
    #[serde(default)]
    pub viewport: Viewport,
    /// Seed colors and semantic context.
    #[serde(default)]
    pub colors: ColorConfig,
    /// Ordered layer tree; later entries paint over earlier ones.
    #[serde(default)]
    pub layers: Vec<LayerNode>,
    /// HTML overlay elements; never part of the render graph.
    #[serde(default)]
    pub foreground: ForegroundConfig,
}

impl SceneConfig {
    /// Scene with no layers.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            colors: ColorConfig::default(),
            layers: Vec::new(),
            foreground: ForegroundConfig::default(),
        }
    }

    /// Builder-style layer append.
    pub fn with_layer(mut self, layer: LayerNode) -> Self {
        self.layers.push(layer);
        self
    }

    /// Check structural constraints that serde cannot express.
    pub fn validate(&self) -> HeroResult<()> {
        self.viewport.validate()?;
        for layer in &self.layers {
            validate_layer(layer)?;
        }
        Ok(())
    }
}

fn validate_layer(layer: &LayerNode) -> HeroResult<()> {
    match layer {
        LayerNode::Group(g) => g.children.iter().try_for_each(validate_layer),
        LayerNode::Processor(p) => {
            for m in &p.modifiers {
                if let Modifier::Mask(mask) = m
                    && (!mask.feather.is_finite() || mask.feather < 0.0)
                {
                    return Err(HeroError::validation(format!(
                        "processor '{}': mask feather must be finite and >= 0",
                        p.meta.id
                    )));
                }
            }
            Ok(())
        }
        LayerNode::Text(t) if !t.font_size.is_finite() || t.font_size <= 0.0 => {
            Err(HeroError::validation(format!(
                "text '{}': fontSize must be finite and > 0",
                t.meta.id
            )))
        }
        _ => Ok(()),
    }
}

/// Seed colors consumed by the external palette generator, plus the semantic context.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorConfig {
    /// Brand seed.
    pub brand: Hsv,
    /// Accent seed.
    pub accent: Hsv,
    /// Foundation (neutral) seed.
    pub foundation: Hsv,
    /// Where the hero sits on the page; drives `auto` color resolution.
    #[serde(default)]
    pub semantic_context: SemanticContext,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            brand: Hsv::new(198.0, 70.0, 65.0),
            accent: Hsv::new(30.0, 80.0, 60.0),
            foundation: Hsv::new(220.0, 5.0, 96.0),
            semantic_context: SemanticContext::Canvas,
        }
    }
}

/// Hue in degrees, saturation and value in percent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsv {
    /// Hue.
    pub hue: f32,
    /// Saturation.
    pub saturation: f32,
    /// Value.
    pub value: f32,
}

impl Hsv {
    /// Build a triple.
    pub const fn new(hue: f32, saturation: f32, value: f32) -> Self {
        Self {
            hue,
            saturation,
            value,
        }
    }
}

/// Page context the hero is placed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SemanticContext {
    /// Plain page canvas.
    #[default]
    Canvas,
    /// Neutral section band.
    SectionNeutral,
    /// Brand-tinted section band.
    SectionTint,
    /// High-contrast section band.
    SectionContrast,
}

/// Fields shared by every layer node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeMeta {
    /// Stable id; empty ids fall back to an index path when deriving graph ids.
    #[serde(default)]
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub name: String,
    /// Hidden nodes are dropped before targeting and building.
    #[serde(default = "default_visible")]
    pub visible: bool,
}

fn default_visible() -> bool {
    true
}

impl NodeMeta {
    /// Visible node with the given id (also used as its name).
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            visible: true,
        }
    }
}

/// One entry of the layer tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum LayerNode {
    /// Legacy root-level background surface.
    Base(SurfaceLayer),
    /// Flat or patterned surface.
    Surface(SurfaceLayer),
    /// Text run.
    Text(TextLayer),
    /// External image.
    Image(ImageLayer),
    /// Ordered container.
    Group(GroupLayer),
    /// Modifier node applying masks and effects to its targets.
    Processor(ProcessorLayer),
}

impl LayerNode {
    /// Shared metadata.
    pub fn meta(&self) -> &NodeMeta {
        match self {
            Self::Base(l) | Self::Surface(l) => &l.meta,
            Self::Text(l) => &l.meta,
            Self::Image(l) => &l.meta,
            Self::Group(l) => &l.meta,
            Self::Processor(l) => &l.meta,
        }
    }

    /// `true` for processor nodes.
    pub fn is_processor(&self) -> bool {
        matches!(self, Self::Processor(_))
    }

    /// `true` when the node is visible.
    pub fn is_visible(&self) -> bool {
        self.meta().visible
    }

    /// Surface node with the given id.
    pub fn surface(id: impl Into<String>, surface: SurfaceConfig) -> Self {
        Self::Surface(SurfaceLayer {
            meta: NodeMeta::new(id),
            surface,
            colors: None,
        })
    }

    /// Group node with the given id and children.
    pub fn group(id: impl Into<String>, children: Vec<LayerNode>) -> Self {
        Self::Group(GroupLayer {
            meta: NodeMeta::new(id),
            children,
        })
    }

    /// Processor node with the given id and modifiers.
    pub fn processor(id: impl Into<String>, modifiers: Vec<Modifier>) -> Self {
        Self::Processor(ProcessorLayer {
            meta: NodeMeta::new(id),
            modifiers,
        })
    }

    /// Text node with default typography.
    pub fn text(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Text(TextLayer {
            meta: NodeMeta::new(id),
            text: text.into(),
            font_family: default_font_family(),
            font_size: default_font_size(),
            font_weight: default_font_weight(),
            letter_spacing: 0.0,
            line_height: default_line_height(),
            color: ColorRef::Auto,
            position: TextPosition::default(),
            rotation: 0.0,
        })
    }

    /// The canonical `background-group > surface("background")` pair.
    pub fn background(surface: SurfaceConfig) -> Self {
        Self::group(
            BACKGROUND_GROUP_ID,
            vec![Self::surface(BACKGROUND_SURFACE_ID, surface)],
        )
    }
}

/// `base` / `surface` payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceLayer {
    /// Shared metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Pattern descriptor.
    #[serde(default)]
    pub surface: SurfaceConfig,
    /// Optional per-layer colors; unset means both `auto`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub colors: Option<LayerColors>,
}

/// Per-layer color overrides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayerColors {
    /// Pattern foreground color.
    #[serde(default)]
    pub primary: ColorRef,
    /// Pattern background color.
    #[serde(default)]
    pub secondary: ColorRef,
}

/// Text payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextLayer {
    /// Shared metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Content.
    pub text: String,
    /// CSS font family.
    #[serde(default = "default_font_family")]
    pub font_family: String,
    /// Font size in pixels.
    #[serde(default = "default_font_size")]
    pub font_size: f32,
    /// CSS numeric weight.
    #[serde(default = "default_font_weight")]
    pub font_weight: u16,
    /// Extra tracking in em.
    #[serde(default)]
    pub letter_spacing: f32,
    /// Line height multiplier.
    #[serde(default = "default_line_height")]
    pub line_height: f32,
    /// Fill color.
    #[serde(default)]
    pub color: ColorRef,
    /// Placement.
    #[serde(default)]
    pub position: TextPosition,
    /// Rotation in radians.
    #[serde(default)]
    pub rotation: f32,
}

fn default_font_family() -> String {
    "Inter".to_owned()
}

fn default_font_size() -> f32 {
    48.0
}

fn default_font_weight() -> u16 {
    400
}

fn default_line_height() -> f32 {
    1.2
}

/// Normalized text placement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextPosition {
    /// Horizontal position in `[0, 1]`.
    pub x: f32,
    /// Vertical position in `[0, 1]`.
    pub y: f32,
    /// Which point of the text box sits at `(x, y)`.
    #[serde(default)]
    pub anchor: Anchor,
}

impl Default for TextPosition {
    fn default() -> Self {
        Self {
            x: 0.5,
            y: 0.5,
            anchor: Anchor::Center,
        }
    }
}

/// Nine-point compass anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Anchor {
    TopLeft,
    TopCenter,
    TopRight,
    CenterLeft,
    #[default]
    Center,
    CenterRight,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl Anchor {
    /// Offset of the anchor point inside the text box, as fractions of its size.
    pub fn offset(self) -> (f32, f32) {
        match self {
            Self::TopLeft => (0.0, 0.0),
            Self::TopCenter => (0.5, 0.0),
            Self::TopRight => (1.0, 0.0),
            Self::CenterLeft => (0.0, 0.5),
            Self::Center => (0.5, 0.5),
            Self::CenterRight => (1.0, 0.5),
            Self::BottomLeft => (0.0, 1.0),
            Self::BottomCenter => (0.5, 1.0),
            Self::BottomRight => (1.0, 1.0),
        }
    }
}

/// Image payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageLayer {
    /// Shared metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Opaque image identifier resolved by the renderer.
    pub image_id: String,
    /// Placement.
    #[serde(default)]
    pub placement: ImagePlacement,
}

/// Normalized image rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagePlacement {
    /// Left edge in `[0, 1]`.
    pub x: f32,
    /// Top edge in `[0, 1]`.
    pub y: f32,
    /// Width in `[0, 1]`.
    pub width: f32,
    /// Height in `[0, 1]`.
    pub height: f32,
    /// How the image fills the rectangle.
    #[serde(default)]
    pub fit: ImageFit,
    /// Opacity multiplier.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
}

fn default_opacity() -> f32 {
    1.0
}

impl Default for ImagePlacement {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: 1.0,
            height: 1.0,
            fit: ImageFit::Cover,
            opacity: 1.0,
        }
    }
}

/// Image fill mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ImageFit {
    /// Crop to fill.
    #[default]
    Cover,
    /// Letterbox to fit.
    Contain,
    /// Stretch.
    Fill,
}

/// Group payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupLayer {
    /// Shared metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Ordered children.
    #[serde(default)]
    pub children: Vec<LayerNode>,
}

/// Processor payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessorLayer {
    /// Shared metadata.
    #[serde(flatten)]
    pub meta: NodeMeta,
    /// Ordered modifiers; legacy effect bundles expand on read.
    #[serde(default, deserialize_with = "deserialize_modifiers")]
    pub modifiers: Vec<Modifier>,
}

/// HTML overlay rendered above the hero by the host page.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ForegroundConfig {
    /// Overlay elements in paint order.
    #[serde(default)]
    pub elements: Vec<ForegroundElement>,
}

/// One overlay element.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForegroundElement {
    /// Stable id.
    pub id: String,
    /// Element role.
    #[serde(rename = "type")]
    pub kind: ForegroundKind,
    /// Text content.
    #[serde(default)]
    pub content: String,
    /// Grid cell the element is placed in.
    #[serde(default)]
    pub position: Anchor,
    /// Hidden elements are not rendered by the host.
    #[serde(default = "default_visible")]
    pub visible: bool,
}

/// Overlay element role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ForegroundKind {
    /// Heading.
    Title,
    /// Body copy.
    Description,
    /// Call to action.
    Button,
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
