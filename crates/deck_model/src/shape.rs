//! Shape snapshot types
//!
//! A shape is read from the provider as a plain value. All geometry on these
//! types is in points (1/72 inch), exactly as the host application reports it.

use serde::{Deserialize, Serialize};

// =============================================================================
// Geometry
// =============================================================================

/// Declared position and size of a shape, in points
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Geometry {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

/// Width and height in points
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Internal margins of a text frame, in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl Default for Margins {
    /// Host defaults: 0.1" left/right, 0.05" top/bottom
    fn default() -> Self {
        Self {
            left: 7.2,
            top: 3.6,
            right: 7.2,
            bottom: 3.6,
        }
    }
}

/// Amount cropped from each side of a picture, in points
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Crop {
    #[serde(default)]
    pub left: f64,
    #[serde(default)]
    pub top: f64,
    #[serde(default)]
    pub right: f64,
    #[serde(default)]
    pub bottom: f64,
}

// =============================================================================
// Shape kinds
// =============================================================================

/// Placeholder type as reported by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaceholderKind {
    Title,
    CenterTitle,
    Subtitle,
    Body,
    Picture,
    Other,
}

/// Kind of shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "placeholder")]
pub enum ShapeKind {
    /// Embedded picture
    Picture,
    /// Picture linked to an external file
    LinkedPicture,
    /// Layout placeholder of the given type
    Placeholder(PlaceholderKind),
    /// Free text box
    TextBox,
    /// Drawn auto shape (rectangle, arrow, ...)
    AutoShape,
    /// Anything else (charts, tables, media, groups)
    Other,
}

impl ShapeKind {
    /// Whether the shape carries picture content
    pub fn is_picture(&self) -> bool {
        matches!(
            self,
            ShapeKind::Picture
                | ShapeKind::LinkedPicture
                | ShapeKind::Placeholder(PlaceholderKind::Picture)
        )
    }

    /// Whether the shape is a title, centered title, or subtitle placeholder
    pub fn is_title_placeholder(&self) -> bool {
        matches!(
            self,
            ShapeKind::Placeholder(
                PlaceholderKind::Title | PlaceholderKind::CenterTitle | PlaceholderKind::Subtitle
            )
        )
    }
}

// =============================================================================
// Text
// =============================================================================

/// Font of a text range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Font {
    pub name: String,
    /// Size in points
    pub size: f64,
}

impl Font {
    pub fn new(name: impl Into<String>, size: f64) -> Self {
        Self {
            name: name.into(),
            size,
        }
    }
}

/// Text frame of a shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextFrame {
    /// Full text content, including trailing breaks
    #[serde(default)]
    pub text: String,
    pub font: Font,
    #[serde(default)]
    pub margins: Margins,
}

impl TextFrame {
    pub fn new(text: impl Into<String>, font: Font) -> Self {
        Self {
            text: text.into(),
            font,
            margins: Margins::default(),
        }
    }

    /// Whether the frame holds any characters at all
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}

// =============================================================================
// Shape snapshot
// =============================================================================

/// A shape as read from the provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeInfo {
    pub name: String,
    pub id: u32,
    #[serde(default = "visible_default")]
    pub visible: bool,
    pub kind: ShapeKind,
    pub geometry: Geometry,
    #[serde(default)]
    pub text_frame: Option<TextFrame>,
    #[serde(default)]
    pub crop: Crop,
}

fn visible_default() -> bool {
    true
}

impl ShapeInfo {
    pub fn new(name: impl Into<String>, id: u32, kind: ShapeKind, geometry: Geometry) -> Self {
        Self {
            name: name.into(),
            id,
            visible: true,
            kind,
            geometry,
            text_frame: None,
            crop: Crop::default(),
        }
    }

    pub fn with_text(mut self, frame: TextFrame) -> Self {
        self.text_frame = Some(frame);
        self
    }

    pub fn with_crop(mut self, crop: Crop) -> Self {
        self.crop = crop;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Text content, if the shape has a non-empty text frame
    pub fn text(&self) -> Option<&str> {
        self.text_frame
            .as_ref()
            .filter(|frame| frame.has_text())
            .map(|frame| frame.text.as_str())
    }

    pub fn font(&self) -> Option<&Font> {
        self.text_frame.as_ref().map(|frame| &frame.font)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_picture_kinds() {
        assert!(ShapeKind::Picture.is_picture());
        assert!(ShapeKind::LinkedPicture.is_picture());
        assert!(ShapeKind::Placeholder(PlaceholderKind::Picture).is_picture());
        assert!(!ShapeKind::Placeholder(PlaceholderKind::Body).is_picture());
        assert!(!ShapeKind::TextBox.is_picture());
    }

    #[test]
    fn test_title_placeholders() {
        assert!(ShapeKind::Placeholder(PlaceholderKind::Title).is_title_placeholder());
        assert!(ShapeKind::Placeholder(PlaceholderKind::CenterTitle).is_title_placeholder());
        assert!(ShapeKind::Placeholder(PlaceholderKind::Subtitle).is_title_placeholder());
        assert!(!ShapeKind::Placeholder(PlaceholderKind::Body).is_title_placeholder());
        assert!(!ShapeKind::TextBox.is_title_placeholder());
    }

    #[test]
    fn test_empty_frame_has_no_text() {
        let shape = ShapeInfo::new("Box", 1, ShapeKind::TextBox, Geometry::default())
            .with_text(TextFrame::new("", Font::new("Arial", 18.0)));
        assert!(shape.text().is_none());
        assert!(shape.font().is_some());
    }

    #[test]
    fn test_shape_kind_serialization() {
        let json = serde_json::to_string(&ShapeKind::Placeholder(PlaceholderKind::CenterTitle)).unwrap();
        assert_eq!(json, r#"{"type":"placeholder","placeholder":"center_title"}"#);

        let parsed: ShapeKind = serde_json::from_str(r#"{"type":"picture"}"#).unwrap();
        assert_eq!(parsed, ShapeKind::Picture);
    }
}
