//! # Font Management
//!
//! Font lookup and glyph metrics for text measurement.
//!
//! The standard PDF fonts (Helvetica, Courier and their bold variants) are
//! built in; Times and anything unknown measures as Helvetica. TrueType
//! fonts can be registered from raw bytes and are measured with
//! ttf-parser.

pub mod metrics;

pub use metrics::StandardFontMetrics;
use std::collections::HashMap;

use crate::error::{Result, TableError};
use crate::style::FontSpec;

/// A font registry that maps font family + weight + style to font data.
pub struct FontRegistry {
    fonts: HashMap<FontKey, FontData>,
}

#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub struct FontKey {
    pub family: String,
    pub weight: u32,
    pub italic: bool,
}

#[derive(Debug, Clone)]
pub enum FontData {
    Standard(StandardFont),
    Custom(CustomFontMetrics),
}

/// Parsed metrics from a TrueType/OpenType font via ttf-parser.
#[derive(Debug, Clone)]
pub struct CustomFontMetrics {
    pub units_per_em: u16,
    pub advance_widths: HashMap<char, u16>,
    pub default_advance: u16,
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
}

impl CustomFontMetrics {
    /// Get the advance width of a character in points.
    pub fn char_width(&self, ch: char, font_size: f64) -> f64 {
        let w = self
            .advance_widths
            .get(&ch)
            .copied()
            .unwrap_or(self.default_advance);
        (w as f64 / self.units_per_em as f64) * font_size
    }

    pub fn line_height(&self, font_size: f64) -> f64 {
        let units = self.ascender as f64 - self.descender as f64 + self.line_gap as f64;
        units / self.units_per_em as f64 * font_size
    }

    /// Parse metrics from font data using ttf-parser.
    pub fn from_font_data(data: &[u8]) -> Option<Self> {
        let face = ttf_parser::Face::parse(data, 0).ok()?;
        let units_per_em = face.units_per_em();

        let mut advance_widths = HashMap::new();
        let mut default_advance = 0u16;

        for code in 32u32..=0xFFFF {
            if let Some(ch) = char::from_u32(code) {
                if let Some(glyph_id) = face.glyph_index(ch) {
                    let advance = face.glyph_hor_advance(glyph_id).unwrap_or(0);
                    advance_widths.insert(ch, advance);
                    if ch == ' ' {
                        default_advance = advance;
                    }
                }
            }
        }

        if default_advance == 0 {
            default_advance = units_per_em / 2;
        }

        Some(CustomFontMetrics {
            units_per_em,
            advance_widths,
            default_advance,
            ascender: face.ascender(),
            descender: face.descender(),
            line_gap: face.line_gap(),
        })
    }
}

/// The standard fonts with built-in metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StandardFont {
    Helvetica,
    HelveticaBold,
    Courier,
    CourierBold,
}

impl StandardFont {
    pub fn metrics(&self) -> &'static StandardFontMetrics {
        match self {
            Self::Helvetica => &metrics::HELVETICA,
            Self::HelveticaBold => &metrics::HELVETICA_BOLD,
            // Courier Bold keeps the 600 unit advance.
            Self::Courier | Self::CourierBold => &metrics::COURIER,
        }
    }
}

impl Default for FontRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FontRegistry {
    pub fn new() -> Self {
        let mut fonts = HashMap::new();

        let standard_mappings = vec![
            (("Helvetica", 400, false), StandardFont::Helvetica),
            (("Helvetica", 700, false), StandardFont::HelveticaBold),
            (("Helvetica", 400, true), StandardFont::Helvetica),
            (("Helvetica", 700, true), StandardFont::HelveticaBold),
            (("Courier", 400, false), StandardFont::Courier),
            (("Courier", 700, false), StandardFont::CourierBold),
            (("Courier", 400, true), StandardFont::Courier),
            (("Courier", 700, true), StandardFont::CourierBold),
        ];

        for ((family, weight, italic), font) in standard_mappings {
            fonts.insert(
                FontKey {
                    family: family.to_string(),
                    weight,
                    italic,
                },
                FontData::Standard(font),
            );
        }

        Self { fonts }
    }

    /// Look up a font, falling back to Helvetica if not found.
    pub fn resolve(&self, family: &str, weight: u32, italic: bool) -> &FontData {
        let snapped_weight = if weight >= 600 { 700 } else { 400 };
        for w in [weight, snapped_weight] {
            let key = FontKey {
                family: family.to_string(),
                weight: w,
                italic,
            };
            if let Some(font) = self.fonts.get(&key) {
                return font;
            }
        }

        if snapped_weight == 700 {
            &HELVETICA_BOLD_DATA
        } else {
            &HELVETICA_DATA
        }
    }

    /// Register a TrueType/OpenType font.
    pub fn register(&mut self, family: &str, weight: u32, italic: bool, data: &[u8]) -> Result<()> {
        let metrics = CustomFontMetrics::from_font_data(data)
            .ok_or_else(|| TableError::Font(format!("cannot parse font data for `{}`", family)))?;
        self.fonts.insert(
            FontKey {
                family: family.to_string(),
                weight,
                italic,
            },
            FontData::Custom(metrics),
        );
        Ok(())
    }
}

static HELVETICA_DATA: FontData = FontData::Standard(StandardFont::Helvetica);
static HELVETICA_BOLD_DATA: FontData = FontData::Standard(StandardFont::HelveticaBold);

/// Font lookup plus measurement, shared by everything that sizes text.
#[derive(Default)]
pub struct FontContext {
    registry: FontRegistry,
}

impl FontContext {
    pub fn new() -> Self {
        Self {
            registry: FontRegistry::new(),
        }
    }

    fn data(&self, font: &FontSpec) -> &FontData {
        self.registry.resolve(&font.family, font.weight, font.italic)
    }

    /// Get the advance width of a single character in points.
    pub fn char_width(&self, ch: char, font: &FontSpec) -> f64 {
        match self.data(font) {
            FontData::Standard(std_font) => std_font.metrics().char_width(ch, font.size),
            FontData::Custom(m) => m.char_width(ch, font.size),
        }
    }

    /// Measure the width of a string in points.
    pub fn measure_string(&self, text: &str, font: &FontSpec) -> f64 {
        match self.data(font) {
            FontData::Standard(std_font) => std_font.metrics().measure_string(text, font.size),
            FontData::Custom(_) => text.chars().map(|ch| self.char_width(ch, font)).sum(),
        }
    }

    /// Distance between consecutive baselines.
    pub fn line_height(&self, font: &FontSpec) -> f64 {
        match self.data(font) {
            FontData::Standard(std_font) => std_font.metrics().line_height(font.size),
            FontData::Custom(m) => m.line_height(font.size),
        }
    }

    pub fn registry_mut(&mut self) -> &mut FontRegistry {
        &mut self.registry
    }
}
