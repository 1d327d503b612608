mod canvas;
mod document;
mod flow;
mod images;
mod index;
mod layout;
mod resolve;

use std::path::Path;
use std::time::Instant;

use crate::catalog::{ProvinceGroup, group_records, provinces_in_index_order, sort_records};
use crate::config::{CatalogConfig, Geometry, PageResolution};
use crate::model::Record;

pub use canvas::{Align, CELL_MARGIN, Canvas, MeasureCanvas, PageSetup, PdfCanvas, Pen};
pub use document::{Document, PageContext};
pub use flow::{Fit, LayoutState, lay_out_catalog, record_lines};
pub use index::{format_index_entry, plan_index_columns, plan_province_index, rows_fitting, sorted_hotels};
pub use layout::{BLOCK_PADDING, block_height, wrap_line_count, wrap_lines};
pub use resolve::{PageTable, front_matter_pages, one_page_per_province, simulate};

/// Result of a render pass: the finished canvas, the province pages the
/// index printed, and the pages every province and hotel actually landed on.
pub struct Composition<C> {
    pub canvas: C,
    pub resolved: PageTable,
    pub rendered: PageTable,
}

fn full_page_image<C: Canvas>(doc: &mut Document<C>, path: &Path, what: &str) {
    doc.new_page();
    let g = doc.geometry().clone();
    if let Err(e) = doc.canvas_mut().place_image(path, 0.0, 0.0, g.page_width, g.page_height) {
        log::warn!("Could not load {what} image {}: {e}", path.display());
    }
}

/// One complete pass over the document: front matter, province index,
/// catalog, hotel index. Both the simulation and the render run exactly
/// this, so their pagination cannot drift apart.
pub(crate) fn write_document<C: Canvas>(
    doc: &mut Document<C>,
    config: &CatalogConfig,
    groups: &[ProvinceGroup<'_>],
    provinces: &[&str],
    resolved: &PageTable,
) -> PageTable {
    doc.set_context(PageContext::default());
    if let Some(cover) = &config.cover_image {
        full_page_image(doc, cover, "cover");
    }
    if let Some(intro) = &config.intro_image {
        full_page_image(doc, intro, "intro");
    }

    index::render_province_index(doc, provinces, resolved);
    let rendered = lay_out_catalog(doc, groups);
    index::render_hotel_index(doc, &rendered);
    rendered
}

/// Sort, group, resolve province pages and render onto `canvas`.
pub fn compose<C: Canvas>(canvas: C, records: &[Record], config: &CatalogConfig) -> Composition<C> {
    let geometry = Geometry::for_format(config.format);
    let mut sorted = records.to_vec();
    sort_records(&mut sorted);
    let groups = group_records(&sorted);
    let provinces = provinces_in_index_order(&sorted);

    let t0 = Instant::now();
    let resolved = match config.resolution {
        PageResolution::FullSimulation => simulate(&groups, &provinces, config, &geometry),
        PageResolution::OnePagePerProvince => {
            let first = front_matter_pages(config, &geometry, provinces.len()) + 1;
            one_page_per_province(&groups, first)
        }
    };
    log::info!(
        "Timing: resolve={:.1}ms ({:?}, {} provinces)",
        t0.elapsed().as_secs_f64() * 1000.0,
        config.resolution,
        provinces.len()
    );
    for province in &provinces {
        log::debug!(
            "Province {province:?} resolved to page {:?}",
            resolved.province_page(province)
        );
    }

    let mut doc = Document::new(canvas, geometry);
    let rendered = write_document(&mut doc, config, &groups, &provinces, &resolved);
    let canvas = doc.finish();
    log::info!("Laid out {} pages", canvas.page_number());

    for province in &provinces {
        let (expected, actual) = (resolved.province_page(province), rendered.province_page(province));
        if expected != actual {
            log::debug!("Province {province:?}: index says page {expected:?}, content starts on {actual:?}");
        }
    }

    Composition {
        canvas,
        resolved,
        rendered,
    }
}

/// Render the whole catalog to PDF bytes.
pub fn render(records: &[Record], config: &CatalogConfig) -> Vec<u8> {
    let geometry = Geometry::for_format(config.format);
    let canvas = PdfCanvas::new(PageSetup::from_geometry(&geometry));
    let composition = compose(canvas, records, config);
    log::info!(
        "Rendered {} provinces, {} hotels",
        composition.rendered.province_count(),
        composition.rendered.hotels().len()
    );
    composition.canvas.finish(&config.title)
}
