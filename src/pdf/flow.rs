//! Column flow for the catalog pages.
//!
//! Entries are placed top to bottom in the current column. An entry that
//! would cross the bottom limit moves to the next column, and moving past
//! the last column opens a continuation page. Entries are never split.

use crate::catalog::{Entry, ProvinceGroup, title_case};
use crate::config::Geometry;
use crate::fonts::Font;
use crate::model::Record;

use super::canvas::{Align, Canvas};
use super::document::{BLACK, Document, PROVINCE_COLOR, PageContext};
use super::layout::{block_height, wrap_line_count};
use super::resolve::PageTable;

const RECORD_FONT: Font = Font::regular(8.0);
const NAME_FONT: Font = Font::bold(9.0);
const LOCALITY_FONT: Font = Font::bold(10.0);

/// Extra height reserved for a locality header on top of its text.
const LOCALITY_PADDING: f32 = 4.0;
/// Gap between the previous entry and a locality header.
const LOCALITY_OFFSET: f32 = 1.0;
/// Record text is indented this far from the column edge.
const TEXT_INDENT: f32 = 2.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Fit {
    Current,
    NextColumn,
    /// Every column was full; a continuation page must be opened.
    NewPage,
}

/// Per-pass cursor state: one vertical offset per column plus the column
/// being filled.
#[derive(Clone, Debug, PartialEq)]
pub struct LayoutState {
    cursors: Vec<f32>,
    column: usize,
    top: f32,
    bottom: f32,
    province: Option<String>,
    continuation: bool,
}

impl LayoutState {
    pub fn new(geometry: &Geometry) -> Self {
        Self::with_bounds(geometry.columns, geometry.top_start, geometry.bottom_limit)
    }

    pub fn with_bounds(columns: usize, top: f32, bottom: f32) -> Self {
        LayoutState {
            cursors: vec![top; columns.max(1)],
            column: 0,
            top,
            bottom,
            province: None,
            continuation: false,
        }
    }

    /// Fresh cursors for a new page.
    pub fn start_page(&mut self) {
        self.cursors.fill(self.top);
        self.column = 0;
    }

    pub fn start_province(&mut self, province: &str) {
        self.province = Some(province.to_string());
        self.continuation = false;
        self.start_page();
    }

    /// Decide where an entry of `required` height goes and move the state
    /// there. Only the current column is tested, so an entry taller than a
    /// whole column still lands at the top of the next one.
    pub fn fit(&mut self, required: f32) -> Fit {
        if self.cursor() + required <= self.bottom {
            return Fit::Current;
        }
        self.column += 1;
        if self.column < self.cursors.len() {
            return Fit::NextColumn;
        }
        self.continuation = true;
        self.start_page();
        Fit::NewPage
    }

    pub fn cursor(&self) -> f32 {
        self.cursors[self.column]
    }

    pub fn set_cursor(&mut self, y: f32) {
        self.cursors[self.column] = y;
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn province(&self) -> Option<&str> {
        self.province.as_deref()
    }

    pub fn is_continuation(&self) -> bool {
        self.continuation
    }
}

/// The six printed lines of a record block, each with its font.
pub fn record_lines(record: &Record) -> [(String, Font); 6] {
    let f = &record.fields;
    [
        (format!("{} · {} Habitaciones", f.classification, f.rooms), RECORD_FONT),
        (f.name.clone(), NAME_FONT),
        (title_case(&f.address), RECORD_FONT),
        (title_case(&format!("{} {}", f.postal_code, f.locality)), RECORD_FONT),
        (title_case(&format!("Tel: {}", f.phone)), RECORD_FONT),
        (f.website.to_lowercase(), RECORD_FONT),
    ]
}

fn locality_height<C: Canvas>(canvas: &C, geometry: &Geometry, locality: &str) -> f32 {
    let lines = wrap_line_count(canvas, locality, LOCALITY_FONT, geometry.column_width() - 4.0);
    lines as f32 * geometry.line_height + LOCALITY_PADDING
}

fn record_text_width(geometry: &Geometry) -> f32 {
    geometry.column_width() - 8.0
}

/// Height reserved for a record block and its optional locality header,
/// including the spacing after it. Lines are wrapped exactly as they will be
/// written.
fn entry_height<C: Canvas>(
    canvas: &C,
    geometry: &Geometry,
    locality: Option<&str>,
    lines: &[(String, Font)],
) -> f32 {
    let header_h = locality.map_or(0.0, |l| locality_height(canvas, geometry, l));
    let measured: Vec<(&str, Font)> = lines.iter().map(|(t, f)| (t.as_str(), *f)).collect();
    let body_h = block_height(canvas, &measured, record_text_width(geometry), geometry.line_height);
    header_h + body_h + geometry.entry_spacing
}

/// Lay out every province group, one or more pages each. Returns the first
/// page of every province and of every hotel, as placed in this pass.
pub fn lay_out_catalog<C: Canvas>(doc: &mut Document<C>, groups: &[ProvinceGroup<'_>]) -> PageTable {
    let geometry = doc.geometry().clone();
    let mut state = LayoutState::new(&geometry);
    let mut pages = PageTable::new();

    for group in groups {
        doc.set_context(PageContext::province(group.province, false));
        doc.new_page();
        state.start_province(group.province);
        pages.record_province(group.province, doc.page_number());

        let mut pending_locality: Option<&str> = None;
        for entry in &group.entries {
            match *entry {
                Entry::LocalityHeader(locality) => pending_locality = Some(locality),
                Entry::Record(record) => {
                    place_record(doc, &geometry, &mut state, pending_locality.take(), record);
                    pages.record_hotel(record.index_name(), doc.page_number());
                }
            }
        }
    }

    pages
}

fn place_record<C: Canvas>(
    doc: &mut Document<C>,
    geometry: &Geometry,
    state: &mut LayoutState,
    locality: Option<&str>,
    record: &Record,
) {
    let lines = record_lines(record);
    let locality = locality.map(str::to_uppercase);
    let text_width = record_text_width(geometry);
    let required = entry_height(doc.canvas(), geometry, locality.as_deref(), &lines);

    if state.fit(required) == Fit::NewPage {
        let province = state.province().unwrap_or_default().to_string();
        doc.set_context(PageContext::province(&province, true));
        doc.new_page();
    }

    let x = geometry.column_x(state.column());
    let mut y = state.cursor();
    let canvas = doc.canvas_mut();

    if let Some(locality) = locality.as_deref() {
        y += LOCALITY_OFFSET;
        canvas.move_to(x + TEXT_INDENT, y);
        canvas.set_font(LOCALITY_FONT);
        canvas.set_text_color(PROVINCE_COLOR);
        y += canvas.write_wrapped_text(geometry.column_width() - 4.0, geometry.line_height, locality, Align::Left);
        state.set_cursor(y);
    }

    canvas.move_to(x + TEXT_INDENT, y);
    canvas.set_text_color(BLACK);
    for (text, font) in &lines {
        canvas.set_font(*font);
        canvas.write_wrapped_text(text_width, geometry.line_height, text, Align::Left);
    }
    let (_, end_y) = canvas.position();
    state.set_cursor(end_y + geometry.entry_spacing);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{group_records, sort_records};
    use crate::config::PageFormat;
    use crate::model::RecordFields;
    use crate::pdf::canvas::{CELL_MARGIN, MeasureCanvas, PageSetup};

    #[test]
    fn entry_crossing_the_limit_moves_before_it_is_placed() {
        // Column of height 10 from 0; entries of 3, 3, 3 fill it to 9, then
        // an entry of 2 would end at 11.
        let mut state = LayoutState::with_bounds(2, 0.0, 10.0);
        for _ in 0..3 {
            assert_eq!(state.fit(3.0), Fit::Current);
            let y = state.cursor();
            state.set_cursor(y + 3.0);
        }
        assert_eq!(state.fit(1.0), Fit::Current);
        state.set_cursor(9.0);
        assert_eq!(state.fit(2.0), Fit::NextColumn);
        assert_eq!(state.column(), 1);
        assert_eq!(state.cursor(), 0.0);
        state.set_cursor(10.0);
        assert_eq!(state.fit(1.0), Fit::NewPage);
        assert_eq!(state.column(), 0);
        assert_eq!(state.cursor(), 0.0);
        assert!(state.is_continuation());
    }

    #[test]
    fn exact_fit_stays_in_column() {
        let mut state = LayoutState::with_bounds(3, 30.0, 280.0);
        state.set_cursor(270.0);
        assert_eq!(state.fit(10.0), Fit::Current);
        assert_eq!(state.fit(10.5), Fit::NextColumn);
    }

    #[test]
    fn province_start_clears_continuation() {
        let mut state = LayoutState::with_bounds(1, 0.0, 5.0);
        state.start_province("Lugo");
        state.set_cursor(5.0);
        assert_eq!(state.fit(1.0), Fit::NewPage);
        assert!(state.is_continuation());
        state.start_province("Soria");
        assert!(!state.is_continuation());
        assert_eq!(state.province(), Some("Soria"));
    }

    fn rec(province: &str, locality: &str, name: &str) -> Record {
        Record::new(RecordFields {
            province: province.into(),
            locality: locality.into(),
            name: name.into(),
            classification: "3 estrellas".into(),
            rooms: "40".into(),
            address: "calle mayor 1".into(),
            postal_code: "28001".into(),
            phone: "910000000".into(),
            website: "WWW.HOTEL.ES".into(),
        })
    }

    #[test]
    fn record_lines_are_formatted() {
        let lines = record_lines(&rec("Madrid", "madrid", "Hotel Sol"));
        let texts: Vec<&str> = lines.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(
            texts,
            [
                "3 estrellas · 40 Habitaciones",
                "Hotel Sol",
                "Calle Mayor 1",
                "28001 Madrid",
                "Tel: 910000000",
                "www.hotel.es",
            ]
        );
        assert_eq!(lines[1].1, NAME_FONT);
    }

    #[test]
    fn long_province_spills_onto_continuation_pages() {
        let g = Geometry::for_format(PageFormat::A4);
        let mut records: Vec<Record> = (0..120).map(|i| rec("Madrid", "Madrid", &format!("Hotel {i:03}"))).collect();
        records.push(rec("Soria", "Soria", "Hotel Soria"));
        sort_records(&mut records);
        let groups = group_records(&records);

        let mut doc = Document::new(MeasureCanvas::new(PageSetup::from_geometry(&g)), g);
        let pages = lay_out_catalog(&mut doc, &groups);
        let madrid_last = pages.hotel_page("Hotel 119").unwrap();
        assert_eq!(pages.province_page("Madrid"), Some(1));
        assert!(madrid_last > 1);
        assert_eq!(pages.province_page("Soria"), Some(madrid_last + 1));
        assert_eq!(doc.finish().page_count(), madrid_last + 1);
    }

    /// Append `" i"` to `seed` until `shown(text)` is wider than `width`.
    fn just_wider(
        canvas: &MeasureCanvas,
        seed: &str,
        font: Font,
        width: f32,
        shown: impl Fn(&str) -> String,
    ) -> String {
        let mut text = seed.to_string();
        while canvas.measure_text_width(&shown(&text), font) <= width {
            text.push_str(" i");
        }
        text
    }

    #[test]
    fn lines_just_over_the_text_width_are_counted_as_wrapped() {
        let g = Geometry::for_format(PageFormat::A4);
        let mut doc = Document::new(MeasureCanvas::new(PageSetup::from_geometry(&g)), g.clone());
        doc.set_context(PageContext::province("Madrid", false));
        doc.new_page();

        let inner = record_text_width(&g) - 2.0 * CELL_MARGIN;
        let canvas = doc.canvas();
        let address = just_wider(canvas, "calle", RECORD_FONT, inner, title_case);
        let postal_code = just_wider(canvas, "28001", RECORD_FONT, inner, |t| title_case(&format!("{t} Madrid")));
        let website = just_wider(canvas, "www", RECORD_FONT, inner, str::to_lowercase);
        let locality = just_wider(canvas, "VILLA", LOCALITY_FONT, g.column_width() - 4.0 - 2.0 * CELL_MARGIN, |t| {
            t.to_uppercase()
        });
        let record = Record::new(RecordFields {
            address,
            postal_code,
            website,
            ..rec("Madrid", "Madrid", "Hotel Límite").fields
        });

        let mut state = LayoutState::new(&g);
        state.start_province("Madrid");
        let required = entry_height(doc.canvas(), &g, Some(&locality), &record_lines(&record));
        // header: 2 lines plus padding; body: 9 lines plus padding; spacing
        assert_eq!(required, 2.0 * 4.0 + 4.0 + 4.0 + 9.0 * 4.0 + 2.0);

        let start = g.bottom_limit - required;
        state.set_cursor(start);
        place_record(&mut doc, &g, &mut state, Some(&locality), &record);

        assert_eq!(state.column(), 0);
        let end = state.cursor() - g.entry_spacing;
        assert!(end <= g.bottom_limit, "block ends at {end} > {}", g.bottom_limit);
        assert!((end - (start + LOCALITY_OFFSET + 11.0 * 4.0)).abs() < 1e-3);
    }
}
