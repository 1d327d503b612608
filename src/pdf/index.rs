//! The two index sections: the province/capital table near the front and
//! the alphabetical hotel list at the back.

use std::ops::Range;

use crate::catalog::capital_of;
use crate::config::Geometry;
use crate::fonts::{Font, encodable};

use super::canvas::{Align, Canvas};
use super::document::{BLACK, Document, PageContext};
use super::resolve::PageTable;

const PROVINCE_ROW_HEIGHT: f32 = 8.0;
/// Height of the two province index titles plus the gap under them.
const PROVINCE_TITLES_HEIGHT: f32 = 12.0 + 10.0 + 8.0;
const TABLE_GAP: f32 = 10.0;
const TABLE_SPLIT: [f32; 3] = [0.40, 0.45, 0.15];
const TABLE_HEADINGS: [&str; 3] = ["PROVINCIAS", "CAPITALES", "Pág."];
const UNRESOLVED_PAGE: &str = "...";

const HOTEL_TITLES: [&str; 2] = [
    "Hoteles legalmente autorizados existentes en España, por orden alfabético.",
    "Hotels legally authorized existing in Spain, in alphabetical order.",
];
const HOTEL_TITLES_HEIGHT: f32 = 8.0 + 8.0 + 4.0;
const INDEX_FONT: Font = Font::regular(6.5);
const ELLIPSIS: char = '…';

/// Number of fixed-height rows whose bottom edge stays at or above `bottom`.
/// Always at least one, so a page can never be left empty.
pub fn rows_fitting(start: f32, row_height: f32, bottom: f32) -> usize {
    let rows = ((bottom - start) / row_height + 1e-4).floor();
    if rows < 1.0 { 1 } else { rows as usize }
}

/// Row ranges of the province tables, one per page. Each table row holds a
/// left and a right province, so `n` provinces need `ceil(n / 2)` rows.
pub fn plan_province_index(geometry: &Geometry, province_count: usize) -> Vec<Range<usize>> {
    let rows = province_count.div_ceil(2);
    let first = rows_fitting(
        geometry.margin + PROVINCE_TITLES_HEIGHT,
        PROVINCE_ROW_HEIGHT,
        geometry.bottom_limit,
    );
    let rest = rows_fitting(
        geometry.margin + PROVINCE_ROW_HEIGHT,
        PROVINCE_ROW_HEIGHT,
        geometry.bottom_limit,
    );

    let mut pages = vec![0..rows.min(first)];
    let mut next = rows.min(first);
    while next < rows {
        let end = rows.min(next + rest);
        pages.push(next..end);
        next = end;
    }
    pages
}

fn table_widths(geometry: &Geometry) -> [f32; 3] {
    let table = (geometry.usable_width() - TABLE_GAP) / 2.0;
    TABLE_SPLIT.map(|share| table * share)
}

fn write_row<C: Canvas>(canvas: &mut C, x: f32, y: f32, widths: &[f32; 3], cells: [&str; 3], aligns: [Align; 3]) {
    canvas.move_to(x, y);
    for ((w, text), align) in widths.iter().zip(cells).zip(aligns) {
        canvas.write_cell(*w, PROVINCE_ROW_HEIGHT, text, true, align);
    }
}

/// Print the province/capital tables. `provinces` is in index order; pages
/// come from `resolved` and print as `...` when unknown.
pub fn render_province_index<C: Canvas>(doc: &mut Document<C>, provinces: &[&str], resolved: &PageTable) {
    let geometry = doc.geometry().clone();
    let widths = table_widths(&geometry);
    let x_left = geometry.margin;
    let x_right = geometry.margin + widths.iter().sum::<f32>() + TABLE_GAP;
    let mid = provinces.len().div_ceil(2);
    let (left, right) = provinces.split_at(mid);

    let row = |province: &str| -> [String; 3] {
        [
            province.to_string(),
            capital_of(province).unwrap_or("-").to_string(),
            resolved
                .province_page(province)
                .map_or_else(|| UNRESOLVED_PAGE.to_string(), |p| p.to_string()),
        ]
    };

    doc.set_context(PageContext::default());
    for (page_idx, rows) in plan_province_index(&geometry, provinces.len()).into_iter().enumerate() {
        doc.new_page();
        let canvas = doc.canvas_mut();
        canvas.set_text_color(BLACK);
        canvas.set_draw_color(BLACK);

        let first_row_y = if page_idx == 0 {
            canvas.set_font(Font::bold(16.0));
            canvas.write_cell(0.0, 12.0, "PROVINCIAS DE ESPAÑA Y SUS CAPITALES", false, Align::Center);
            canvas.line_break(12.0);
            canvas.set_font(Font::bold(12.0));
            canvas.write_cell(0.0, 10.0, "PROVINCES OF SPAIN AND THEIR CAPITALS", false, Align::Center);
            canvas.line_break(10.0);
            canvas.line_break(8.0);
            geometry.margin + PROVINCE_TITLES_HEIGHT
        } else {
            geometry.margin + PROVINCE_ROW_HEIGHT
        };

        canvas.set_font(Font::bold(10.0));
        let header_y = first_row_y - PROVINCE_ROW_HEIGHT;
        for x in [x_left, x_right] {
            write_row(canvas, x, header_y, &widths, TABLE_HEADINGS, [Align::Center; 3]);
        }

        canvas.set_font(Font::regular(10.0));
        let body_align = [Align::Left, Align::Left, Align::Center];
        for (offset, i) in rows.enumerate() {
            let y = first_row_y + offset as f32 * PROVINCE_ROW_HEIGHT;
            let l = row(left[i]);
            write_row(canvas, x_left, y, &widths, l.each_ref().map(String::as_str), body_align);
            if let Some(province) = right.get(i) {
                let r = row(province);
                write_row(canvas, x_right, y, &widths, r.each_ref().map(String::as_str), body_align);
            }
            canvas.move_to(geometry.margin, y + PROVINCE_ROW_HEIGHT);
        }
    }
}

/// Split `count` sorted entries into pages of contiguous column runs. Each
/// page takes up to `rows_per_column * columns` entries and cuts them into
/// runs of `ceil(take / columns)`, so every column holds an unbroken
/// alphabetical range. An empty list still yields one (empty) page.
pub fn plan_index_columns(count: usize, columns: usize, rows_per_column: usize) -> Vec<Vec<Range<usize>>> {
    let columns = columns.max(1);
    let capacity = rows_per_column.max(1) * columns;
    let mut pages = Vec::new();
    let mut start = 0;

    while start < count {
        let take = capacity.min(count - start);
        let per_column = take.div_ceil(columns);
        let end = start + take;
        let runs = (start..end)
            .step_by(per_column)
            .map(|s| s..(s + per_column).min(end))
            .collect();
        pages.push(runs);
        start = end;
    }
    if pages.is_empty() {
        pages.push(Vec::new());
    }
    pages
}

/// `"{name} {dots} {page}"` sized to `max_width` in the canvas's current
/// font. Names too long for the space left by the page number are cut and
/// end in an ellipsis.
pub fn format_index_entry<C: Canvas + ?Sized>(canvas: &C, name: &str, page: usize, max_width: f32) -> String {
    let font = canvas.font();
    let width = |s: &str| canvas.measure_text_width(s, font);
    let page = page.to_string();
    let name_budget = max_width - width(&page) - 1.5 - 2.0;

    let mut name = encodable(name);
    if width(&name) > name_budget {
        while !name.is_empty() && width(&format!("{name}{ELLIPSIS}")) > name_budget {
            name.pop();
        }
        name = format!("{}{ELLIPSIS}", name.trim_end());
    }

    let space_left = max_width - width(&name) - width(&page) - 1.0;
    let dot_width = width(".");
    let dots = if dot_width > 0.0 {
        ((space_left / dot_width).floor().max(0.0) as usize).max(2)
    } else {
        2
    };
    format!("{name} {} {page}", ".".repeat(dots))
}

/// Hotels sorted case-insensitively. Names equal up to case keep their
/// first-seen order.
pub fn sorted_hotels(pages: &PageTable) -> Vec<(String, usize)> {
    let mut hotels = pages.hotels().to_vec();
    hotels.sort_by_cached_key(|(name, _)| name.to_lowercase());
    hotels
}

/// Print the alphabetical hotel index, starting on a new page.
pub fn render_hotel_index<C: Canvas>(doc: &mut Document<C>, pages: &PageTable) {
    let geometry = doc.geometry().clone();
    let hotels = sorted_hotels(pages);
    let column_width = geometry.index_column_width();
    let top = geometry.margin + HOTEL_TITLES_HEIGHT;
    let rows = rows_fitting(top, geometry.index_row_height, geometry.bottom_limit);

    doc.set_context(PageContext::default());
    for columns in plan_index_columns(hotels.len(), geometry.index_columns, rows) {
        doc.new_page();
        let canvas = doc.canvas_mut();
        canvas.set_text_color(BLACK);
        canvas.set_font(Font::bold(12.0));
        for title in HOTEL_TITLES {
            canvas.write_cell(0.0, 8.0, title, false, Align::Center);
            canvas.line_break(8.0);
        }
        canvas.line_break(4.0);

        canvas.set_font(INDEX_FONT);
        for (col, run) in columns.into_iter().enumerate() {
            let x = geometry.margin + col as f32 * column_width;
            for (row, i) in run.enumerate() {
                let (name, page) = &hotels[i];
                let line = format_index_entry(&*canvas, name, *page, column_width - 5.0);
                canvas.move_to(x + 1.5, top + row as f32 * geometry.index_row_height);
                canvas.write_cell(column_width - 3.0, geometry.index_row_height, &line, false, Align::Left);
            }
        }
    }
}
