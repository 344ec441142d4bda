//! # Header Tree Layout
//!
//! Sizes the declared header tree for one render pass.
//!
//! Widths come first. Every fixed width is subtracted from the table's
//! inner width together with the borders between siblings, and what is left
//! is shared equally by all auto-width leaves, whatever their depth, so
//! auto columns line up across branches. An auto group is exactly as wide
//! as its children plus the borders between them. A fixed-width group
//! shares its own width among its auto children.
//!
//! Heights come second. The header band is as tall as its most demanding
//! branch. Inside it, each group splits its height evenly across its
//! nesting levels, but never below what its title or its children need.

use std::borrow::Cow;

use log::{debug, warn};

use crate::error::Result;
use crate::format::{format_value, Formats};
use crate::layout::cells::{print_text, text_height};
use crate::model::{Align, Header, Record, Transform, ValueHeader};
use crate::style::ResolvedOptions;
use crate::surface::Surface;

/// A sized header node.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedHeader {
    pub title: String,
    pub width: f64,
    /// Height of this node's own title cell.
    pub height: f64,
    /// Smallest total height the subtree fits in.
    pub min_height: f64,
    pub align: Align,
    pub kind: PreparedKind,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PreparedKind {
    /// Index into [`HeaderLayout::columns`].
    Column(usize),
    Group(Vec<PreparedHeader>),
}

impl PreparedHeader {
    pub fn deep_levels(&self) -> usize {
        match &self.kind {
            PreparedKind::Column(_) => 0,
            PreparedKind::Group(children) => children
                .iter()
                .map(|c| c.deep_levels() + 1)
                .max()
                .unwrap_or(1),
        }
    }
}

/// A table column: a value header with its width fixed and defaults filled.
#[derive(Debug, Clone)]
pub struct Column {
    pub title: String,
    pub path: String,
    pub width: f64,
    pub align: Align,
    pub formats: Formats,
    pub empty: String,
    pub transform: Option<Transform>,
}

impl Column {
    fn new(header: &ValueHeader, width: f64) -> Self {
        Self {
            title: header.title.clone(),
            path: header.path.clone(),
            width,
            align: header.align.unwrap_or_default(),
            formats: header.formats.clone().unwrap_or_default(),
            empty: header.empty.clone().unwrap_or_default(),
            transform: header.transform.clone(),
        }
    }

    /// The text shown for `record` in this column.
    pub fn display(&self, record: &Record) -> Result<String> {
        let raw = record.resolve(&self.path)?;
        let value = match &self.transform {
            Some(transform) => Cow::Owned(transform.apply(raw)),
            None => Cow::Borrowed(raw),
        };
        Ok(format_value(&value, &self.formats, &self.empty))
    }
}

/// The outcome of header preparation.
#[derive(Debug, Clone)]
pub struct HeaderLayout {
    pub nodes: Vec<PreparedHeader>,
    /// Leaf columns in left-to-right order.
    pub columns: Vec<Column>,
    /// Height of the tallest header branch.
    pub max_height_cell: f64,
}

impl HeaderLayout {
    /// Height of the whole header band, top and bottom border included.
    pub fn band_height(&self, border: f64) -> f64 {
        self.max_height_cell + border * 2.0
    }
}

/// Free width left for auto leaves under `headers`, and how many there are.
pub fn calculate_free_width(headers: &[Header], width: f64, border: f64) -> (f64, usize) {
    let mut free = width - border * headers.len().saturating_sub(1) as f64;
    let mut autos = 0;

    for header in headers {
        match (header, header.fixed_width()) {
            (_, Some(fixed)) => free -= fixed,
            (Header::Group(group), None) => {
                let (rest, count) = calculate_free_width(&group.headers, free, border);
                free = rest;
                autos += count;
            }
            (Header::Value(_), None) => autos += 1,
        }
    }

    (free, autos)
}

fn auto_share(free: f64, autos: usize) -> f64 {
    if autos == 0 {
        if free > f64::EPSILON {
            warn!("{:.2}pt of header width left with no auto-width column to take it", free);
        }
        return 0.0;
    }
    if free < 0.0 {
        warn!("Fixed header widths exceed the table width by {:.2}pt", -free);
        return 0.0;
    }
    free / autos as f64
}

/// Size `headers` for a table of `opts.width`.
pub fn prepare<S: Surface + ?Sized>(
    surface: &mut S,
    headers: &[Header],
    opts: &ResolvedOptions,
) -> HeaderLayout {
    let border = opts.border.width;
    let width = opts.width - border * 2.0;
    let (free, autos) = calculate_free_width(headers, width, border);
    let auto_width = auto_share(free, autos);

    let mut columns = Vec::new();
    let (mut nodes, _, max_height_cell) =
        process(surface, headers, auto_width, &mut columns, opts);
    set_height(surface, &mut nodes, max_height_cell, opts);

    debug!(
        "Prepared {} columns: auto width {:.2}, header height {:.2}",
        columns.len(),
        auto_width,
        max_height_cell
    );

    HeaderLayout {
        nodes,
        columns,
        max_height_cell,
    }
}

/// Assign widths and measure required heights. Returns the nodes, their
/// summed width and the tallest subtree.
fn process<S: Surface + ?Sized>(
    surface: &mut S,
    headers: &[Header],
    auto_width: f64,
    columns: &mut Vec<Column>,
    opts: &ResolvedOptions,
) -> (Vec<PreparedHeader>, f64, f64) {
    let border = opts.border.width;
    let mut nodes = Vec::with_capacity(headers.len());
    let mut total_width = 0.0;
    let mut max_height: f64 = 0.0;

    for header in headers {
        let fixed = header.fixed_width();
        let node = match header {
            Header::Group(group) => {
                let (children, children_width, children_height) = match fixed {
                    None => process(surface, &group.headers, auto_width, columns, opts),
                    Some(width) => {
                        let (free, autos) = calculate_free_width(&group.headers, width, border);
                        let share = auto_share(free, autos);
                        process(surface, &group.headers, share, columns, opts)
                    }
                };
                let width = fixed.unwrap_or_else(|| {
                    children_width + border * group.headers.len().saturating_sub(1) as f64
                });
                let title_height = header_text_height(surface, &group.title, width, opts);
                let min_height = title_height + border + children_height;

                PreparedHeader {
                    title: group.title.clone(),
                    width,
                    height: 0.0,
                    min_height,
                    align: group.align.unwrap_or_default(),
                    kind: PreparedKind::Group(children),
                }
            }
            Header::Value(value) => {
                let width = fixed.unwrap_or(auto_width);
                let min_height = header_text_height(surface, &value.title, width, opts);
                columns.push(Column::new(value, width));

                PreparedHeader {
                    title: value.title.clone(),
                    width,
                    height: 0.0,
                    min_height,
                    align: value.align.unwrap_or_default(),
                    kind: PreparedKind::Column(columns.len() - 1),
                }
            }
        };

        total_width += node.width;
        max_height = max_height.max(node.min_height);
        nodes.push(node);
    }

    (nodes, total_width, max_height)
}

/// Distribute `height` down each subtree.
fn set_height<S: Surface + ?Sized>(
    surface: &mut S,
    nodes: &mut [PreparedHeader],
    height: f64,
    opts: &ResolvedOptions,
) {
    let border = opts.border.width;

    for node in nodes.iter_mut() {
        let deep = node.deep_levels() as f64;
        let title_height = match node.kind {
            PreparedKind::Column(_) => {
                node.height = height;
                continue;
            }
            PreparedKind::Group(_) => header_text_height(surface, &node.title, node.width, opts),
        };

        if let PreparedKind::Group(children) = &mut node.kind {
            let children_height = children.iter().map(|c| c.min_height).fold(0.0, f64::max);
            let even_split = (height - border * deep) / (deep + 1.0);
            let own = even_split
                .min(height - border - children_height)
                .max(title_height);

            set_height(surface, children, height - own - border, opts);
            node.height = own;
        }
    }
}

fn header_text_height<S: Surface + ?Sized>(
    surface: &mut S,
    text: &str,
    width: f64,
    opts: &ResolvedOptions,
) -> f64 {
    text_height(surface, text, width, &opts.margins, &opts.header.font)
}

/// Draw the header band with its top-left corner at `(x, y)`.
pub fn print_headers<S: Surface + ?Sized>(
    surface: &mut S,
    layout: &HeaderLayout,
    x: f64,
    y: f64,
    opts: &ResolvedOptions,
) {
    let border = opts.border.width;
    surface.fill_rect(
        x,
        y,
        opts.width,
        layout.band_height(border),
        opts.border.color,
    );

    let mut cx = x;
    for node in &layout.nodes {
        print_header(surface, node, &mut cx, y + border, opts);
    }
}

fn print_header<S: Surface + ?Sized>(
    surface: &mut S,
    node: &PreparedHeader,
    x: &mut f64,
    y: f64,
    opts: &ResolvedOptions,
) {
    let border = opts.border.width;
    *x += border;

    surface.fill_rect(*x, y, node.width, node.height, opts.header.background);
    print_text(
        surface,
        &node.title,
        *x,
        y,
        node.width,
        node.height,
        node.align,
        &opts.margins,
        &opts.header,
    );

    if let PreparedKind::Group(children) = &node.kind {
        let mut child_x = *x - border;
        for child in children {
            print_header(surface, child, &mut child_x, y + node.height + border, opts);
        }
    }
    *x += node.width;
}
