//! Cell measurement and drawing shared by every row kind.
//!
//! A cell is a background rectangle with text vertically centered inside
//! its margins. Rows paint the border color over their full width first and
//! let the cell backgrounds leave it showing between and around them.

use crate::error::Result;
use crate::layout::header::Column;
use crate::model::{Align, Record};
use crate::style::{Appearance, Edges, FontSpec, ResolvedOptions};
use crate::surface::{SavedCursor, Surface, TextBox};

/// Height of `text` in a cell `width` wide, margins included.
pub(crate) fn text_height<S: Surface + ?Sized>(
    surface: &mut S,
    text: &str,
    width: f64,
    margins: &Edges,
    font: &FontSpec,
) -> f64 {
    let mut probe = SavedCursor::new(surface);
    probe.measure_text_height(text, width - margins.horizontal(), font) + margins.vertical()
}

/// Draw `text` vertically centered in the cell at `(x, y)`.
#[allow(clippy::too_many_arguments)]
pub(crate) fn print_text<S: Surface + ?Sized>(
    surface: &mut S,
    text: &str,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    align: Align,
    margins: &Edges,
    appearance: &Appearance,
) {
    let inner = width - margins.horizontal();
    let mut probe = SavedCursor::new(surface);
    let text_height = probe.measure_text_height(text, inner, &appearance.font);
    let free = height - text_height - margins.vertical();
    probe.draw_text(
        text,
        x + margins.left,
        y + margins.top + free / 2.0,
        &TextBox {
            width: inner,
            height: text_height,
            align,
            font: &appearance.font,
            color: appearance.color,
        },
    );
}

/// Height of a data row: the tallest cell plus one border.
pub(crate) fn row_height<S: Surface + ?Sized>(
    surface: &mut S,
    record: &Record,
    columns: &[Column],
    opts: &ResolvedOptions,
) -> Result<f64> {
    let mut height: f64 = 0.0;
    for column in columns {
        let text = column.display(record)?;
        height = height.max(text_height(
            surface,
            &text,
            column.width,
            &opts.margins,
            &opts.cell.font,
        ));
    }
    Ok(height + opts.border.width)
}

/// Draw a data row. Without `bottom_border` the cells extend over the
/// border strip, leaving the row open toward the next page.
#[allow(clippy::too_many_arguments)]
pub(crate) fn print_row<S: Surface + ?Sized>(
    surface: &mut S,
    record: &Record,
    columns: &[Column],
    x: f64,
    y: f64,
    height: f64,
    bottom_border: bool,
    opts: &ResolvedOptions,
) -> Result<()> {
    let border = opts.border.width;
    surface.fill_rect(x, y, opts.width, height, opts.border.color);
    let cell_height = (height - if bottom_border { border } else { 0.0 }).max(0.0);

    let mut cx = x;
    for column in columns {
        cx += border;
        surface.fill_rect(cx, y, column.width, cell_height, opts.cell.background);
        let text = column.display(record)?;
        print_text(
            surface,
            &text,
            cx,
            y,
            column.width,
            cell_height,
            column.align,
            &opts.margins,
            &opts.cell,
        );
        cx += column.width;
    }
    Ok(())
}

/// Height of the full-width row carrying `text`, drawn in `appearance`.
pub(crate) fn banner_height<S: Surface + ?Sized>(
    surface: &mut S,
    text: &str,
    appearance: &Appearance,
    opts: &ResolvedOptions,
) -> f64 {
    let width = opts.width - opts.border.width * 2.0;
    text_height(surface, text, width, &opts.margins, &appearance.font) + opts.border.width
}

/// Draw a full-width row with `text` centered in a single cell.
pub(crate) fn print_banner<S: Surface + ?Sized>(
    surface: &mut S,
    text: &str,
    x: f64,
    y: f64,
    height: f64,
    appearance: &Appearance,
    opts: &ResolvedOptions,
) {
    let border = opts.border.width;
    let width = opts.width - border * 2.0;
    let cell_height = (height - border).max(0.0);

    surface.fill_rect(x, y, opts.width, height, opts.border.color);
    surface.fill_rect(x + border, y, width, cell_height, appearance.background);
    print_text(
        surface,
        text,
        x + border,
        y,
        width,
        cell_height,
        Align::Center,
        &opts.margins,
        appearance,
    );
}

/// Height of the borderless title band.
pub(crate) fn title_height<S: Surface + ?Sized>(
    surface: &mut S,
    title: &str,
    opts: &ResolvedOptions,
) -> f64 {
    text_height(surface, title, opts.width, &opts.margins, &opts.title.font)
}

pub(crate) fn print_title<S: Surface + ?Sized>(
    surface: &mut S,
    title: &str,
    x: f64,
    y: f64,
    height: f64,
    opts: &ResolvedOptions,
) {
    if opts.title.background.a > 0.0 {
        surface.fill_rect(x, y, opts.width, height, opts.title.background);
    }
    print_text(
        surface,
        title,
        x,
        y,
        opts.width,
        height,
        Align::Center,
        &opts.margins,
        &opts.title,
    );
}
