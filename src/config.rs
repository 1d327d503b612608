use std::path::PathBuf;

/// Physical page size. Only the two formats the catalog is printed in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PageFormat {
    /// 210 × 297 mm
    #[default]
    A4,
    /// 6 × 9 in trade paperback
    Trade,
}

impl PageFormat {
    /// (width, height) in millimetres.
    pub fn size_mm(self) -> (f32, f32) {
        match self {
            PageFormat::A4 => (210.0, 297.0),
            PageFormat::Trade => (152.4, 228.6),
        }
    }
}

/// How the province index learns the page each province starts on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PageResolution {
    /// Dry-run the whole document through the flow engine and read the
    /// pages off the simulation.
    #[default]
    FullSimulation,
    /// Count province transitions, one page each. Wrong as soon as a
    /// province spans more than one page.
    OnePagePerProvince,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CatalogConfig {
    pub format: PageFormat,
    /// Full-page cover image. `None` skips the cover page entirely.
    pub cover_image: Option<PathBuf>,
    /// Full-page image printed before the province index.
    pub intro_image: Option<PathBuf>,
    pub resolution: PageResolution,
    pub title: String,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        CatalogConfig {
            format: PageFormat::A4,
            cover_image: None,
            intro_image: None,
            resolution: PageResolution::FullSimulation,
            title: "Catálogo de hoteles".to_string(),
        }
    }
}

/// Fixed geometry of the catalog, in millimetres, derived from the page
/// format.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub page_width: f32,
    pub page_height: f32,
    pub margin: f32,
    pub columns: usize,
    pub top_start: f32,
    pub bottom_limit: f32,
    pub line_height: f32,
    pub entry_spacing: f32,
    pub index_columns: usize,
    pub index_row_height: f32,
}

impl Geometry {
    pub fn for_format(format: PageFormat) -> Self {
        let (page_width, page_height) = format.size_mm();
        Geometry {
            page_width,
            page_height,
            margin: 10.0,
            columns: 3,
            top_start: 30.0,
            bottom_limit: page_height - 17.0,
            line_height: 4.0,
            entry_spacing: 2.0,
            index_columns: 3,
            index_row_height: 4.5,
        }
    }

    pub fn usable_width(&self) -> f32 {
        self.page_width - 2.0 * self.margin
    }

    pub fn column_width(&self) -> f32 {
        self.usable_width() / self.columns as f32
    }

    pub fn column_x(&self, column: usize) -> f32 {
        self.margin + column as f32 * self.column_width()
    }

    pub fn index_column_width(&self) -> f32 {
        self.usable_width() / self.index_columns as f32
    }
}
