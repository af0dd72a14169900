//! Layout templates and the template registry
//!
//! A template describes, for each body slide (2 and 3), where titles, text,
//! and images are expected, as fractions of the slide size. Each zone is a
//! 4-tuple of measures. On disk a measure is written `N-u` where `u` is
//! `e` (edge, always 0), `w` (slide width / N) or `h` (slide height / N),
//! and `N` may carry a multiplier as `N*M`:
//!
//! ```text
//! 0-e,0-e,1-w,4-h|3*2-w,2-h,3-w,2-h
//! ```

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{BoundingBox, LayoutError, Result};

/// Slides that templates describe
pub const BODY_SLIDES: [usize; 2] = [2, 3];

/// Largest numerator or multiplier a measure may use
const MAX_FACTOR: u32 = 9;

// =============================================================================
// Zone kinds
// =============================================================================

/// What a zone is reserved for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ZoneKind {
    Title,
    Text,
    Images,
}

impl ZoneKind {
    pub const ALL: [ZoneKind; 3] = [ZoneKind::Title, ZoneKind::Text, ZoneKind::Images];

    pub fn as_str(&self) -> &'static str {
        match self {
            ZoneKind::Title => "title",
            ZoneKind::Text => "text",
            ZoneKind::Images => "images",
        }
    }
}

impl fmt::Display for ZoneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parse a `<kind>_<slide>` key such as `images_3`
pub fn parse_zone_key(key: &str) -> Result<(usize, ZoneKind)> {
    let invalid = || LayoutError::InvalidZoneKey(key.to_string());
    let (kind, slide) = key.rsplit_once('_').ok_or_else(invalid)?;
    let kind = ZoneKind::ALL
        .into_iter()
        .find(|k| k.as_str() == kind)
        .ok_or_else(invalid)?;
    let slide: usize = slide.parse().map_err(|_| invalid())?;
    if !BODY_SLIDES.contains(&slide) {
        return Err(invalid());
    }
    Ok((slide, kind))
}

pub fn zone_key(slide: usize, kind: ZoneKind) -> String {
    format!("{}_{}", kind, slide)
}

// =============================================================================
// Measures and zone descriptors
// =============================================================================

/// One component of a zone descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    /// Slide edge, resolves to 0
    Edge,
    /// `slide_width / divisor * multiplier`
    Width { divisor: u32, multiplier: u32 },
    /// `slide_height / divisor * multiplier`
    Height { divisor: u32, multiplier: u32 },
}

impl Measure {
    pub fn width(divisor: u32) -> Self {
        Measure::Width {
            divisor,
            multiplier: 1,
        }
    }

    pub fn height(divisor: u32) -> Self {
        Measure::Height {
            divisor,
            multiplier: 1,
        }
    }

    pub fn times(self, factor: u32) -> Self {
        match self {
            Measure::Edge => Measure::Edge,
            Measure::Width { divisor, .. } => Measure::Width {
                divisor,
                multiplier: factor,
            },
            Measure::Height { divisor, .. } => Measure::Height {
                divisor,
                multiplier: factor,
            },
        }
    }

    /// Resolve against a slide size in pixels
    pub fn resolve(&self, slide_width: f64, slide_height: f64) -> f64 {
        match *self {
            Measure::Edge => 0.0,
            Measure::Width {
                divisor,
                multiplier,
            } => slide_width / f64::from(divisor) * f64::from(multiplier),
            Measure::Height {
                divisor,
                multiplier,
            } => slide_height / f64::from(divisor) * f64::from(multiplier),
        }
    }
}

fn parse_factor(raw: &str, descriptor: &str) -> Result<u32> {
    let value: u32 = raw.parse().map_err(|_| LayoutError::InvalidDescriptor {
        descriptor: descriptor.to_string(),
        reason: format!("{:?} is not a number", raw),
    })?;
    if value == 0 || value > MAX_FACTOR {
        return Err(LayoutError::NumeratorOutOfRange(raw.to_string()));
    }
    Ok(value)
}

impl FromStr for Measure {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let (numerator, unit) = s.rsplit_once('-').ok_or_else(|| LayoutError::InvalidDescriptor {
            descriptor: s.to_string(),
            reason: "expected <numerator>-<unit>".to_string(),
        })?;

        if unit == "e" {
            return Ok(Measure::Edge);
        }

        let (divisor, multiplier) = match numerator.split_once('*') {
            Some((divisor, multiplier)) => (parse_factor(divisor, s)?, parse_factor(multiplier, s)?),
            None => (parse_factor(numerator, s)?, 1),
        };

        match unit {
            "w" => Ok(Measure::Width {
                divisor,
                multiplier,
            }),
            "h" => Ok(Measure::Height {
                divisor,
                multiplier,
            }),
            other => Err(LayoutError::InvalidDescriptor {
                descriptor: s.to_string(),
                reason: format!("unknown unit {:?}", other),
            }),
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (divisor, multiplier, unit) = match *self {
            Measure::Edge => return f.write_str("0-e"),
            Measure::Width {
                divisor,
                multiplier,
            } => (divisor, multiplier, 'w'),
            Measure::Height {
                divisor,
                multiplier,
            } => (divisor, multiplier, 'h'),
        };
        if multiplier == 1 {
            write!(f, "{}-{}", divisor, unit)
        } else {
            write!(f, "{}*{}-{}", divisor, multiplier, unit)
        }
    }
}

/// A zone as fractions of the slide: left, top, width, height
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ZoneDescriptor {
    pub left: Measure,
    pub top: Measure,
    pub width: Measure,
    pub height: Measure,
}

impl ZoneDescriptor {
    pub fn new(left: Measure, top: Measure, width: Measure, height: Measure) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn resolve(&self, slide_width: f64, slide_height: f64) -> BoundingBox {
        BoundingBox {
            left: self.left.resolve(slide_width, slide_height),
            top: self.top.resolve(slide_width, slide_height),
            width: self.width.resolve(slide_width, slide_height),
            height: self.height.resolve(slide_width, slide_height),
        }
    }

    /// Parse a pipe-separated list of zones
    pub fn parse_list(s: &str) -> Result<Vec<ZoneDescriptor>> {
        s.split('|')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::parse)
            .collect()
    }

    pub fn format_list(zones: &[ZoneDescriptor]) -> String {
        zones
            .iter()
            .map(ZoneDescriptor::to_string)
            .collect::<Vec<_>>()
            .join("|")
    }
}

impl FromStr for ZoneDescriptor {
    type Err = LayoutError;

    fn from_str(s: &str) -> Result<Self> {
        let parts = s
            .split(',')
            .map(str::parse)
            .collect::<Result<Vec<Measure>>>()?;
        match parts.as_slice() {
            [left, top, width, height] => Ok(ZoneDescriptor::new(*left, *top, *width, *height)),
            _ => Err(LayoutError::InvalidDescriptor {
                descriptor: s.to_string(),
                reason: format!("expected 4 measures, found {}", parts.len()),
            }),
        }
    }
}

impl fmt::Display for ZoneDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.left, self.top, self.width, self.height)
    }
}

// =============================================================================
// Templates
// =============================================================================

/// A named layout
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutTemplate {
    name: String,
    zones: BTreeMap<(usize, ZoneKind), Vec<ZoneDescriptor>>,
}

impl LayoutTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            zones: BTreeMap::new(),
        }
    }

    /// Build from `<kind>_<slide>` keys and boundary-format values
    pub fn from_entries<'a>(
        name: impl Into<String>,
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Result<Self> {
        let mut template = Self::new(name);
        for (key, value) in entries {
            let (slide, kind) = parse_zone_key(key)?;
            template
                .zones
                .insert((slide, kind), ZoneDescriptor::parse_list(value)?);
        }
        Ok(template)
    }

    /// Set the zones for one slide and kind
    pub fn with_zones(
        mut self,
        slide: usize,
        kind: ZoneKind,
        zones: Vec<ZoneDescriptor>,
    ) -> Result<Self> {
        if !BODY_SLIDES.contains(&slide) {
            return Err(LayoutError::InvalidZoneKey(zone_key(slide, kind)));
        }
        self.zones.insert((slide, kind), zones);
        Ok(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn zones(&self, slide: usize, kind: ZoneKind) -> &[ZoneDescriptor] {
        self.zones
            .get(&(slide, kind))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `(key, value)` pairs in the boundary format
    pub fn entries(&self) -> Vec<(String, String)> {
        self.zones
            .iter()
            .map(|(&(slide, kind), zones)| {
                (zone_key(slide, kind), ZoneDescriptor::format_list(zones))
            })
            .collect()
    }

    /// Resolve every zone against a slide size in pixels
    pub fn resolve(&self, slide_width: f64, slide_height: f64) -> ResolvedLayout {
        let zones = self
            .zones
            .iter()
            .map(|(&key, zones)| {
                let rects = zones
                    .iter()
                    .map(|zone| zone.resolve(slide_width, slide_height))
                    .collect();
                (key, rects)
            })
            .collect();
        ResolvedLayout { zones }
    }
}

/// A template resolved to pixel rectangles for one slide size
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedLayout {
    zones: BTreeMap<(usize, ZoneKind), Vec<BoundingBox>>,
}

impl ResolvedLayout {
    pub fn zones(&self, slide: usize, kind: ZoneKind) -> &[BoundingBox] {
        self.zones
            .get(&(slide, kind))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

// =============================================================================
// Registry
// =============================================================================

/// Templates in registration order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutRegistry {
    templates: Vec<LayoutTemplate>,
}

impl LayoutRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a template; a same-named template is replaced in place
    pub fn register(&mut self, template: LayoutTemplate) {
        match self.templates.iter_mut().find(|t| t.name == template.name) {
            Some(existing) => *existing = template,
            None => self.templates.push(template),
        }
    }

    pub fn get(&self, name: &str) -> Option<&LayoutTemplate> {
        self.templates.iter().find(|t| t.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &LayoutTemplate> {
        self.templates.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.iter().map(|t| t.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Resolve a template by name. Unknown names resolve to `None`.
    pub fn resolve(&self, name: &str, slide_width: f64, slide_height: f64) -> Option<ResolvedLayout> {
        self.get(name)
            .map(|template| template.resolve(slide_width, slide_height))
    }
}
