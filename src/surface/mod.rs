//! # Drawing Surface
//!
//! The boundary between the table engine and whatever actually puts ink on
//! pages. A [`Surface`] measures text, fills rectangles, draws text boxes
//! and starts new pages, and it owns a mutable `(x, y)` cursor that the
//! engine reads and writes as it walks down the page.
//!
//! [`PageRecorder`] is the bundled implementation: it measures with the
//! standard-font metrics (or registered TrueType fonts) and records every
//! draw call into per-page command lists. Real backends implement the
//! trait over their own document type.

use std::ops::{Deref, DerefMut};

use serde::Deserialize;

use crate::font::FontContext;
use crate::model::Align;
use crate::style::{Color, Edges, FontSpec};
use crate::text::TextLayout;

/// Page dimensions and margins as seen by the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentBounds {
    pub width: f64,
    pub height: f64,
    pub margins: Edges,
}

impl ContentBounds {
    /// Width between the left and right margins.
    pub fn content_width(&self) -> f64 {
        self.width - self.margins.horizontal()
    }

    /// Lowest y a row may reach.
    pub fn bottom_limit(&self) -> f64 {
        self.height - self.margins.bottom
    }
}

/// Placement of a text draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox<'a> {
    pub width: f64,
    pub height: f64,
    pub align: Align,
    pub font: &'a FontSpec,
    pub color: Color,
}

/// A page-oriented drawing and measurement target.
///
/// Calls mutate shared state (the cursor, the current page), so they must
/// be issued in program order from a single thread.
pub trait Surface {
    fn cursor(&self) -> (f64, f64);

    fn set_cursor(&mut self, x: f64, y: f64);

    fn content_bounds(&self) -> ContentBounds;

    /// Height of `text` wrapped at `max_width`. Implementations may move the
    /// cursor while measuring; callers probe through [`SavedCursor`].
    fn measure_text_height(&mut self, text: &str, max_width: f64, font: &FontSpec) -> f64;

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color);

    fn draw_text(&mut self, text: &str, x: f64, y: f64, text_box: &TextBox<'_>);

    /// Start a new page and move the cursor to its top-left content corner.
    fn add_page(&mut self);
}

/// Scoped cursor snapshot. Derefs to the surface and puts the cursor back
/// where it was when dropped, whichever way the scope is left.
pub struct SavedCursor<'a, S: Surface + ?Sized> {
    surface: &'a mut S,
    saved: (f64, f64),
}

impl<'a, S: Surface + ?Sized> SavedCursor<'a, S> {
    pub fn new(surface: &'a mut S) -> Self {
        let saved = surface.cursor();
        Self { surface, saved }
    }
}

impl<S: Surface + ?Sized> Deref for SavedCursor<'_, S> {
    type Target = S;

    fn deref(&self) -> &S {
        self.surface
    }
}

impl<S: Surface + ?Sized> DerefMut for SavedCursor<'_, S> {
    fn deref_mut(&mut self) -> &mut S {
        self.surface
    }
}

impl<S: Surface + ?Sized> Drop for SavedCursor<'_, S> {
    fn drop(&mut self) {
        let (x, y) = self.saved;
        self.surface.set_cursor(x, y);
    }
}

/// Standard page sizes in points.
#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
pub enum PageSize {
    #[default]
    A4,
    A3,
    A5,
    Letter,
    Legal,
    Custom {
        width: f64,
        height: f64,
    },
}

impl PageSize {
    /// Returns (width, height) in points.
    pub fn dimensions(&self) -> (f64, f64) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A5 => (419.53, 595.28),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

/// Size and margins of every page a [`PageRecorder`] produces.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct PageConfig {
    #[serde(default)]
    pub size: PageSize,
    /// Page margins in points (1/72 inch).
    #[serde(default = "default_margin")]
    pub margin: Edges,
}

fn default_margin() -> Edges {
    Edges::uniform(72.0)
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            size: PageSize::default(),
            margin: default_margin(),
        }
    }
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Rect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    Text {
        text: String,
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        align: Align,
        font: FontSpec,
        color: Color,
    },
}

/// One page of recorded draw calls.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedPage {
    pub width: f64,
    pub height: f64,
    pub commands: Vec<DrawCommand>,
}

impl RecordedPage {
    /// Every text drawn on this page, in order.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            DrawCommand::Rect { .. } => None,
        })
    }
}

type PageAddedHook = Box<dyn FnMut(usize, &mut RecordedPage)>;

/// A [`Surface`] that records draw calls per page.
pub struct PageRecorder {
    config: PageConfig,
    font_context: FontContext,
    text_layout: TextLayout,
    pages: Vec<RecordedPage>,
    cursor: (f64, f64),
    on_page_added: Option<PageAddedHook>,
}

impl PageRecorder {
    /// A recorder with one empty page and the cursor at its content origin.
    pub fn new(config: PageConfig) -> Self {
        let mut recorder = Self {
            config,
            font_context: FontContext::new(),
            text_layout: TextLayout::new(),
            pages: Vec::new(),
            cursor: (0.0, 0.0),
            on_page_added: None,
        };
        recorder.push_page();
        recorder
    }

    /// Called with the index of every page added after the first, before
    /// anything else is drawn on it. Used for page backgrounds.
    pub fn on_page_added(mut self, hook: impl FnMut(usize, &mut RecordedPage) + 'static) -> Self {
        self.on_page_added = Some(Box::new(hook));
        self
    }

    pub fn font_context_mut(&mut self) -> &mut FontContext {
        &mut self.font_context
    }

    pub fn pages(&self) -> &[RecordedPage] {
        &self.pages
    }

    pub fn into_pages(self) -> Vec<RecordedPage> {
        self.pages
    }

    /// Index of the page currently drawn on.
    pub fn current_page(&self) -> usize {
        self.pages.len().saturating_sub(1)
    }

    fn push_page(&mut self) {
        let (width, height) = self.config.size.dimensions();
        self.pages.push(RecordedPage {
            width,
            height,
            commands: Vec::new(),
        });
        self.cursor = (self.config.margin.left, self.config.margin.top);
    }

    fn record(&mut self, command: DrawCommand) {
        if let Some(page) = self.pages.last_mut() {
            page.commands.push(command);
        }
    }
}

impl Default for PageRecorder {
    fn default() -> Self {
        Self::new(PageConfig::default())
    }
}

impl Surface for PageRecorder {
    fn cursor(&self) -> (f64, f64) {
        self.cursor
    }

    fn set_cursor(&mut self, x: f64, y: f64) {
        self.cursor = (x, y);
    }

    fn content_bounds(&self) -> ContentBounds {
        let (width, height) = self.config.size.dimensions();
        ContentBounds {
            width,
            height,
            margins: self.config.margin,
        }
    }

    fn measure_text_height(&mut self, text: &str, max_width: f64, font: &FontSpec) -> f64 {
        self.text_layout
            .measure_height(&self.font_context, text, max_width.max(0.0), font)
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.record(DrawCommand::Rect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, x: f64, y: f64, text_box: &TextBox<'_>) {
        self.record(DrawCommand::Text {
            text: text.to_string(),
            x,
            y,
            width: text_box.width,
            height: text_box.height,
            align: text_box.align,
            font: text_box.font.clone(),
            color: text_box.color,
        });
        // Text flows: the cursor ends up below the box.
        self.cursor = (x, y + text_box.height);
    }

    fn add_page(&mut self) {
        self.push_page();
        let index = self.current_page();
        log::debug!("Page {} added", index + 1);
        if let Some(hook) = self.on_page_added.as_mut() {
            if let Some(page) = self.pages.last_mut() {
                hook(index, page);
            }
        }
    }
}
