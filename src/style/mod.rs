//! # Table Options
//!
//! The configuration surface of a render pass: position, width, border,
//! cell margins and the appearance of each row kind. Everything is optional
//! and loosely typed on input (a border can be a number, a color, or both),
//! then resolved into concrete values before layout starts.

use serde::Deserialize;

use crate::error::Result;

/// An RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(from = "ColorInput")]
pub struct Color {
    pub r: f64, // 0.0 - 1.0
    pub g: f64,
    pub b: f64,
    pub a: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ColorInput {
    Hex(String),
    Rgba {
        r: f64,
        g: f64,
        b: f64,
        #[serde(default = "opaque")]
        a: f64,
    },
}

fn opaque() -> f64 {
    1.0
}

impl From<ColorInput> for Color {
    fn from(input: ColorInput) -> Self {
        match input {
            ColorInput::Hex(hex) => Color::hex(&hex),
            ColorInput::Rgba { r, g, b, a } => Color { r, g, b, a },
        }
    }
}

impl Color {
    pub const BLACK: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };
    pub const WHITE: Color = Color {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const TRANSPARENT: Color = Color {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 0.0,
    };

    pub fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b, a: 1.0 }
    }

    pub fn hex(hex: &str) -> Self {
        let hex = hex.trim_start_matches('#');
        let (r, g, b) = match hex.len() {
            3 => {
                let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).unwrap_or(0);
                (r, g, b)
            }
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(0);
                let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(0);
                let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(0);
                (r, g, b)
            }
            _ => (0, 0, 0),
        };
        Self {
            r: r as f64 / 255.0,
            g: g as f64 / 255.0,
            b: b as f64 / 255.0,
            a: 1.0,
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLACK
    }
}

/// Edge values (top, right, bottom, left) used for margins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub struct Edges {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Edges {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }

    pub fn symmetric(vertical: f64, horizontal: f64) -> Self {
        Self {
            top: vertical,
            right: horizontal,
            bottom: vertical,
            left: horizontal,
        }
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }
}

/// A concrete font selection.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: f64,
    pub weight: u32,
    pub italic: bool,
}

impl FontSpec {
    pub fn new(family: &str, size: f64) -> Self {
        Self {
            family: family.to_string(),
            size,
            weight: 400,
            italic: false,
        }
    }

    pub fn bold(mut self) -> Self {
        self.weight = 700;
        self
    }

    /// Parse a standard PDF font name such as `Helvetica-BoldOblique`.
    /// Unknown names are taken as a regular-weight family.
    pub fn from_name(name: &str, size: f64) -> Self {
        let (family, style) = match name.split_once('-') {
            Some((family, style)) => (family, style),
            None => (name, ""),
        };
        if !matches!(family, "Helvetica" | "Times" | "Courier") {
            return FontSpec::new(name, size);
        }
        Self {
            family: family.to_string(),
            size,
            weight: if style.contains("Bold") { 700 } else { 400 },
            italic: style.contains("Italic") || style.contains("Oblique"),
        }
    }
}

/// Font input: a size, a font name, or a partial spec.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FontOption {
    Size(f64),
    Name(String),
    Spec {
        #[serde(default)]
        family: Option<String>,
        #[serde(default)]
        size: Option<f64>,
        #[serde(default)]
        weight: Option<u32>,
        #[serde(default)]
        italic: Option<bool>,
    },
}

impl FontOption {
    fn apply(&self, base: &FontSpec) -> FontSpec {
        match self {
            FontOption::Size(size) => FontSpec {
                size: *size,
                ..base.clone()
            },
            FontOption::Name(name) => FontSpec::from_name(name, base.size),
            FontOption::Spec {
                family,
                size,
                weight,
                italic,
            } => FontSpec {
                family: family.clone().unwrap_or_else(|| base.family.clone()),
                size: size.unwrap_or(base.size),
                weight: weight.unwrap_or(base.weight),
                italic: italic.unwrap_or(base.italic),
            },
        }
    }
}

/// Appearance overrides for one kind of cell.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CellAppearance {
    #[serde(default)]
    pub background: Option<Color>,
    #[serde(default)]
    pub color: Option<Color>,
    #[serde(default)]
    pub font: Option<FontOption>,
}

/// Border input: a thickness, a color, or both.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BorderOption {
    Width(f64),
    Full { width: f64, color: Color },
    Color(Color),
}

/// Cell margin input: uniform, per axis, or per edge.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum MarginsOption {
    Uniform(f64),
    Axis { h: f64, v: f64 },
    Edges(Edges),
}

impl MarginsOption {
    fn resolve(&self) -> Edges {
        match self {
            MarginsOption::Uniform(v) => Edges::uniform(*v),
            MarginsOption::Axis { h, v } => Edges::symmetric(*v, *h),
            MarginsOption::Edges(edges) => *edges,
        }
    }
}

/// Options for one render pass. All fields are optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableOptions {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub border: Option<BorderOption>,
    pub margins: Option<MarginsOption>,

    /// Data cell shorthands, applied before `cell`.
    pub background: Option<Color>,
    pub color: Option<Color>,
    pub font: Option<FontOption>,

    pub header: Option<CellAppearance>,
    pub cell: Option<CellAppearance>,
    pub grouped: Option<CellAppearance>,
    pub summary: Option<CellAppearance>,
    pub grouped_summary: Option<CellAppearance>,
    pub title: Option<CellAppearance>,

    /// Draw the bottom border of a row even when the table continues on
    /// the next page.
    #[serde(default)]
    pub force_border_in_continue: bool,
}

/// A resolved border.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub width: f64,
    pub color: Color,
}

/// A resolved cell appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct Appearance {
    pub background: Color,
    pub color: Color,
    pub font: FontSpec,
}

impl Appearance {
    fn with(&self, overrides: Option<&CellAppearance>) -> Appearance {
        let mut resolved = self.clone();
        if let Some(o) = overrides {
            if let Some(bg) = o.background {
                resolved.background = bg;
            }
            if let Some(color) = o.color {
                resolved.color = color;
            }
            if let Some(font) = &o.font {
                resolved.font = font.apply(&resolved.font);
            }
        }
        resolved
    }
}

/// Fully resolved options: what layout works with.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedOptions {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub border: Border,
    pub margins: Edges,
    pub header: Appearance,
    pub cell: Appearance,
    pub grouped: Appearance,
    pub summary: Appearance,
    pub grouped_summary: Appearance,
    pub title: Appearance,
    pub force_border_in_continue: bool,
}

impl TableOptions {
    /// Parse options from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Resolve against the surface's cursor and content width.
    pub fn resolve(&self, cursor: (f64, f64), content_width: f64) -> ResolvedOptions {
        let default_border = Border {
            width: 3.0,
            color: Color::BLACK,
        };
        let border = match &self.border {
            None => default_border,
            Some(BorderOption::Width(width)) => Border {
                width: *width,
                ..default_border
            },
            Some(BorderOption::Color(color)) => Border {
                color: *color,
                ..default_border
            },
            Some(BorderOption::Full { width, color }) => Border {
                width: *width,
                color: *color,
            },
        };

        let header = Appearance {
            background: Color::hex("#ccc"),
            color: Color::BLACK,
            font: FontSpec::new("Helvetica", 12.0).bold(),
        }
        .with(self.header.as_ref());

        let cell = Appearance {
            background: Color::WHITE,
            color: Color::BLACK,
            font: FontSpec::new("Helvetica", 12.0),
        }
        .with(Some(&CellAppearance {
            background: self.background,
            color: self.color,
            font: self.font.clone(),
        }))
        .with(self.cell.as_ref());

        let summary = header.with(self.summary.as_ref());
        let title = Appearance {
            background: Color::TRANSPARENT,
            font: FontSpec::new("Helvetica", 14.0).bold(),
            ..header.clone()
        }
        .with(self.title.as_ref());

        ResolvedOptions {
            x: self.x.unwrap_or(cursor.0),
            y: self.y.unwrap_or(cursor.1),
            width: self.width.unwrap_or(content_width),
            border,
            margins: self
                .margins
                .as_ref()
                .map(MarginsOption::resolve)
                .unwrap_or(Edges::uniform(3.0)),
            grouped: header.with(self.grouped.as_ref()),
            grouped_summary: summary.with(self.grouped_summary.as_ref()),
            header,
            cell,
            summary,
            title,
            force_border_in_continue: self.force_border_in_continue,
        }
    }
}
