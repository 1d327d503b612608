mod common;

use common::record;
use hotel_catalog::config::{CatalogConfig, PageFormat};

/// Width and height, in points, of every /MediaBox in the file.
fn mediaboxes(pdf: &[u8]) -> Vec<(f32, f32)> {
    let text = String::from_utf8_lossy(pdf);
    let mut boxes = Vec::new();
    let mut rest = text.as_ref();
    while let Some(at) = rest.find("/MediaBox") {
        rest = &rest[at..];
        let (Some(start), Some(end)) = (rest.find('['), rest.find(']')) else {
            break;
        };
        let nums: Vec<f32> = rest[start + 1..end]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        if nums.len() == 4 {
            boxes.push((nums[2] - nums[0], nums[3] - nums[1]));
        }
        rest = &rest[end..];
    }
    boxes
}

#[test]
fn page_geometry_matches_format() {
    let records = vec![record("Soria", "Soria", "Hotel Duero"), record("Lugo", "Lugo", "Hotel Miño")];

    for (format, expected) in [(PageFormat::A4, (595.28, 841.89)), (PageFormat::Trade, (432.0, 648.0))] {
        let config = CatalogConfig {
            format,
            ..CatalogConfig::default()
        };
        let pdf = hotel_catalog::render_catalog(&records, &config);
        let boxes = mediaboxes(&pdf);
        assert_eq!(boxes.len(), 4, "{format:?}");
        for (w, h) in boxes {
            assert!((w - expected.0).abs() < 0.05, "{format:?}: width {w}");
            assert!((h - expected.1).abs() < 0.05, "{format:?}: height {h}");
        }
    }
}
