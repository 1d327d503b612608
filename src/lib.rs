pub mod catalog;
pub mod config;
mod error;
mod fonts;
pub mod model;
pub mod pdf;
pub mod xlsx;

pub use error::Error;
pub use fonts::{Font, FontStyle};

use std::path::Path;
use std::time::Instant;

use config::CatalogConfig;
use model::Record;

/// Read `input`, lay out the catalog and write the PDF to `output`.
pub fn generate_catalog(input: &Path, output: &Path, config: &CatalogConfig) -> Result<(), Error> {
    let t0 = Instant::now();

    let records = xlsx::parse(input)?;
    let t_load = t0.elapsed();

    let bytes = pdf::render(&records, config);
    let t_render = t0.elapsed();

    std::fs::write(output, &bytes).map_err(Error::Io)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: load={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms ({} records, output {} bytes)",
        t_load.as_secs_f64() * 1000.0,
        (t_render - t_load).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        records.len(),
        bytes.len(),
    );

    Ok(())
}

/// Lay out already loaded records and return the PDF bytes.
pub fn render_catalog(records: &[Record], config: &CatalogConfig) -> Vec<u8> {
    let t0 = Instant::now();
    let bytes = pdf::render(records, config);
    log::info!(
        "Timing: render={:.1}ms ({} records, output {} bytes)",
        t0.elapsed().as_secs_f64() * 1000.0,
        records.len(),
        bytes.len(),
    );
    bytes
}
