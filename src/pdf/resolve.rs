use std::collections::{HashMap, HashSet};

use crate::catalog::ProvinceGroup;
use crate::config::{CatalogConfig, Geometry};

use super::canvas::{MeasureCanvas, PageSetup};
use super::document::Document;
use super::index::plan_province_index;

/// Page numbers learned while laying out: where each province starts and
/// where each hotel first appears. First recording wins in both.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PageTable {
    provinces: HashMap<String, usize>,
    hotels: Vec<(String, usize)>,
    seen_hotels: HashSet<String>,
}

impl PageTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_province(&mut self, province: &str, page: usize) {
        self.provinces.entry(province.to_string()).or_insert(page);
    }

    /// Names are keyed trimmed; empty names are ignored.
    pub fn record_hotel(&mut self, name: &str, page: usize) {
        let name = name.trim();
        if name.is_empty() || self.seen_hotels.contains(name) {
            return;
        }
        self.seen_hotels.insert(name.to_string());
        self.hotels.push((name.to_string(), page));
    }

    pub fn province_page(&self, province: &str) -> Option<usize> {
        self.provinces.get(province).copied()
    }

    pub fn hotel_page(&self, name: &str) -> Option<usize> {
        self.hotels.iter().find(|(n, _)| n == name).map(|&(_, p)| p)
    }

    /// Hotels in first-seen order.
    pub fn hotels(&self) -> &[(String, usize)] {
        &self.hotels
    }

    pub fn province_count(&self) -> usize {
        self.provinces.len()
    }
}

/// Dry-run the complete document on a [`MeasureCanvas`] and return the
/// pages it lands on. The render pass uses the same code path, so every
/// page number read from here is the one the real render produces.
pub fn simulate(
    groups: &[ProvinceGroup<'_>],
    provinces: &[&str],
    config: &CatalogConfig,
    geometry: &Geometry,
) -> PageTable {
    let canvas = MeasureCanvas::new(PageSetup::from_geometry(geometry));
    let mut doc = Document::new(canvas, geometry.clone());
    let table = super::write_document(&mut doc, config, groups, provinces, &PageTable::new());
    let canvas = doc.finish();
    log::debug!("Simulation laid out {} pages", canvas.page_count());
    table
}

/// Pages taken by everything before the first catalog page: cover, intro
/// and the province index.
pub fn front_matter_pages(config: &CatalogConfig, geometry: &Geometry, province_count: usize) -> usize {
    usize::from(config.cover_image.is_some())
        + usize::from(config.intro_image.is_some())
        + plan_province_index(geometry, province_count).len()
}

/// Assume each province fills exactly one page, starting at `first_page`.
pub fn one_page_per_province(groups: &[ProvinceGroup<'_>], first_page: usize) -> PageTable {
    let mut table = PageTable::new();
    for (i, group) in groups.iter().enumerate() {
        table.record_province(group.province, first_page + i);
    }
    table
}
