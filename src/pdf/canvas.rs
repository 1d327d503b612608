use std::collections::BTreeSet;
use std::path::Path;

use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref, Str, TextStr};

use crate::config::Geometry;
use crate::error::Error;
use crate::fonts::{Font, FontStyle, PT_PER_MM, encodable, to_winansi_bytes, unencodable_chars};

use super::images::{ImageColor, LoadedImage, load_image};

/// Inner horizontal padding of a cell, in millimetres.
pub const CELL_MARGIN: f32 = 1.0;

/// Stroke width for cell borders and rules, in millimetres.
const LINE_WIDTH: f32 = 0.2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSetup {
    pub width: f32,
    pub height: f32,
    pub margin: f32,
}

impl PageSetup {
    pub fn from_geometry(g: &Geometry) -> Self {
        PageSetup {
            width: g.page_width,
            height: g.page_height,
            margin: g.margin,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Drawing state: current font, colours, position and page. Coordinates are
/// millimetres from the top-left corner of the page.
#[derive(Clone, Debug, PartialEq)]
pub struct Pen {
    pub font: Font,
    pub text_color: [u8; 3],
    pub draw_color: [u8; 3],
    pub x: f32,
    pub y: f32,
    /// 1-based number of the current page, 0 before the first page.
    pub page: usize,
}

impl Pen {
    pub fn new(setup: &PageSetup) -> Self {
        Pen {
            font: Font::regular(9.0),
            text_color: [0, 0, 0],
            draw_color: [0, 0, 0],
            x: setup.margin,
            y: setup.margin,
            page: 0,
        }
    }
}

/// Page drawing capability shared by the dry-run and the real render.
///
/// Implementors supply the pen and the five `draw_*`/`start_page` backend
/// hooks; every cell, wrap and measuring operation is a provided method, so
/// a measuring canvas and a writing canvas cannot disagree about where text
/// lands.
pub trait Canvas {
    fn setup(&self) -> PageSetup;
    fn pen(&self) -> &Pen;
    fn pen_mut(&mut self) -> &mut Pen;

    /// Open a fresh, empty page. The pen has already been reset.
    fn start_page(&mut self);
    /// Draw `text` with its baseline at `baseline`, using the pen's font and
    /// text colour.
    fn draw_text(&mut self, x: f32, baseline: f32, text: &str);
    /// Stroke a rectangle outline with the pen's draw colour.
    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32);
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32);
    fn draw_image(&mut self, path: &Path, x: f32, y: f32, w: f32, h: f32) -> Result<(), Error>;

    fn measure_text_width(&self, text: &str, font: Font) -> f32 {
        font.text_width(text)
    }

    fn font(&self) -> Font {
        self.pen().font
    }

    fn set_font(&mut self, font: Font) {
        self.pen_mut().font = font;
    }

    fn set_text_color(&mut self, rgb: [u8; 3]) {
        self.pen_mut().text_color = rgb;
    }

    fn set_draw_color(&mut self, rgb: [u8; 3]) {
        self.pen_mut().draw_color = rgb;
    }

    fn position(&self) -> (f32, f32) {
        (self.pen().x, self.pen().y)
    }

    fn move_to(&mut self, x: f32, y: f32) {
        let pen = self.pen_mut();
        pen.x = x;
        pen.y = y;
    }

    fn page_number(&self) -> usize {
        self.pen().page
    }

    fn new_page(&mut self) {
        let margin = self.setup().margin;
        let pen = self.pen_mut();
        pen.page += 1;
        pen.x = margin;
        pen.y = margin;
        self.start_page();
    }

    /// Single-line cell at the pen position. A `width` of 0 extends the cell
    /// to the right margin. The pen moves right by the cell width.
    fn write_cell(&mut self, width: f32, height: f32, text: &str, border: bool, align: Align) {
        let setup = self.setup();
        let (x, y) = self.position();
        let width = if width == 0.0 {
            setup.width - setup.margin - x
        } else {
            width
        };

        if border {
            self.draw_rect(x, y, width, height);
        }
        if !encodable(text).is_empty() {
            let font = self.font();
            let text_w = self.measure_text_width(text, font);
            let tx = match align {
                Align::Left => x + CELL_MARGIN,
                Align::Center => x + (width - text_w) / 2.0,
                Align::Right => x + width - CELL_MARGIN - text_w,
            };
            let baseline = y + 0.5 * height + 0.3 * font.size_mm();
            self.draw_text(tx, baseline, text);
        }
        self.pen_mut().x = x + width;
    }

    /// Move to the left margin, `height` further down.
    fn line_break(&mut self, height: f32) {
        let margin = self.setup().margin;
        let pen = self.pen_mut();
        pen.x = margin;
        pen.y += height;
    }

    /// Word-wrapped text inside a box `width` wide, one cell per line. The
    /// pen ends at the starting x, below the last line. Returns the height
    /// used.
    fn write_wrapped_text(&mut self, width: f32, line_height: f32, text: &str, align: Align) -> f32 {
        let setup = self.setup();
        let (x, y) = self.position();
        let width = if width == 0.0 {
            setup.width - setup.margin - x
        } else {
            width
        };
        let lines = super::layout::wrap_lines(&*self, text, self.font(), width - 2.0 * CELL_MARGIN);
        for (i, line) in lines.iter().enumerate() {
            self.move_to(x, y + i as f32 * line_height);
            self.write_cell(width, line_height, line, false, align);
        }
        let used = lines.len() as f32 * line_height;
        self.move_to(x, y + used);
        used
    }

    /// Stretch an image over the given box. Errors are returned to the
    /// caller, which decides whether they are fatal.
    fn place_image(&mut self, path: &Path, x: f32, y: f32, w: f32, h: f32) -> Result<(), Error> {
        self.draw_image(path, x, y, w, h)
    }
}

/// Canvas that tracks positions and pages but draws nothing. Used for the
/// layout simulation pass.
pub struct MeasureCanvas {
    setup: PageSetup,
    pen: Pen,
}

impl MeasureCanvas {
    pub fn new(setup: PageSetup) -> Self {
        MeasureCanvas {
            pen: Pen::new(&setup),
            setup,
        }
    }

    pub fn page_count(&self) -> usize {
        self.pen.page
    }
}

impl Canvas for MeasureCanvas {
    fn setup(&self) -> PageSetup {
        self.setup
    }

    fn pen(&self) -> &Pen {
        &self.pen
    }

    fn pen_mut(&mut self) -> &mut Pen {
        &mut self.pen
    }

    fn start_page(&mut self) {}

    fn draw_text(&mut self, _x: f32, _baseline: f32, _text: &str) {}

    fn draw_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {}

    fn draw_line(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32) {}

    fn draw_image(&mut self, _path: &Path, _x: f32, _y: f32, _w: f32, _h: f32) -> Result<(), Error> {
        Ok(())
    }
}

fn rgb(c: [u8; 3]) -> (f32, f32, f32) {
    (c[0] as f32 / 255.0, c[1] as f32 / 255.0, c[2] as f32 / 255.0)
}

/// Canvas writing a PDF with the base-14 Helvetica family.
pub struct PdfCanvas {
    setup: PageSetup,
    pen: Pen,
    pdf: Pdf,
    next_id: i32,
    catalog_id: Ref,
    pages_id: Ref,
    pages: Vec<Content>,
    image_xobjects: Vec<(String, Ref)>,
    warned_chars: BTreeSet<char>,
}

impl PdfCanvas {
    pub fn new(setup: PageSetup) -> Self {
        PdfCanvas {
            pen: Pen::new(&setup),
            setup,
            pdf: Pdf::new(),
            next_id: 3,
            catalog_id: Ref::new(1),
            pages_id: Ref::new(2),
            pages: Vec::new(),
            image_xobjects: Vec::new(),
            warned_chars: BTreeSet::new(),
        }
    }

    fn alloc(&mut self) -> Ref {
        let r = Ref::new(self.next_id);
        self.next_id += 1;
        r
    }

    fn current(&mut self) -> Option<&mut Content> {
        self.pages.last_mut()
    }

    /// PDF user space has its origin at the bottom-left, in points.
    fn to_pdf(&self, x: f32, y: f32) -> (f32, f32) {
        (x * PT_PER_MM, (self.setup.height - y) * PT_PER_MM)
    }

    fn warn_unencodable(&mut self, text: &str) {
        for ch in unencodable_chars(text) {
            if self.warned_chars.insert(ch) {
                log::warn!("Dropping character {ch:?} (U+{:04X}): not representable in WinAnsi", ch as u32);
            }
        }
    }

    fn embed_image(&mut self, img: LoadedImage) -> String {
        let xobj_ref = self.alloc();
        let smask_ref = img.alpha.as_ref().map(|_| self.alloc());
        let pdf_name = format!("Im{}", self.image_xobjects.len() + 1);

        if let (Some(mask_ref), Some(alpha)) = (smask_ref, &img.alpha) {
            let mut mask = self.pdf.image_xobject(mask_ref, alpha);
            mask.filter(Filter::FlateDecode);
            mask.width(img.width as i32);
            mask.height(img.height as i32);
            mask.color_space().device_gray();
            mask.bits_per_component(8);
        }

        let mut xobj = self.pdf.image_xobject(xobj_ref, &img.data);
        xobj.filter(img.filter);
        xobj.width(img.width as i32);
        xobj.height(img.height as i32);
        match img.color {
            ImageColor::Gray => xobj.color_space().device_gray(),
            ImageColor::Rgb => xobj.color_space().device_rgb(),
        };
        xobj.bits_per_component(8);
        if let Some(mask_ref) = smask_ref {
            xobj.s_mask(mask_ref);
        }

        self.image_xobjects.push((pdf_name.clone(), xobj_ref));
        pdf_name
    }

    /// Assemble the page tree and return the PDF bytes.
    pub fn finish(mut self, title: &str) -> Vec<u8> {
        let font_refs: Vec<(FontStyle, Ref)> = FontStyle::ALL.iter().map(|&s| (s, self.alloc())).collect();
        for &(style, font_ref) in &font_refs {
            self.pdf
                .type1_font(font_ref)
                .base_font(Name(style.base_font()))
                .encoding_predefined(Name(b"WinAnsiEncoding"));
        }

        let contents = std::mem::take(&mut self.pages);
        let n = contents.len();
        let page_ids: Vec<Ref> = (0..n).map(|_| self.alloc()).collect();
        let content_ids: Vec<Ref> = (0..n).map(|_| self.alloc()).collect();

        for (i, c) in contents.into_iter().enumerate() {
            let raw = c.finish();
            let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
            self.pdf.stream(content_ids[i], &compressed).filter(Filter::FlateDecode);
        }

        self.pdf.catalog(self.catalog_id).pages(self.pages_id);
        self.pdf
            .pages(self.pages_id)
            .kids(page_ids.iter().copied())
            .count(n as i32);

        let (w_pt, h_pt) = (self.setup.width * PT_PER_MM, self.setup.height * PT_PER_MM);
        for i in 0..n {
            let mut page = self.pdf.page(page_ids[i]);
            page.media_box(Rect::new(0.0, 0.0, w_pt, h_pt))
                .parent(self.pages_id)
                .contents(content_ids[i]);
            let mut resources = page.resources();
            {
                let mut fonts = resources.fonts();
                for &(style, font_ref) in &font_refs {
                    fonts.pair(Name(style.pdf_name().as_bytes()), font_ref);
                }
            }
            if !self.image_xobjects.is_empty() {
                let mut xobjects = resources.x_objects();
                for (name, xobj_ref) in &self.image_xobjects {
                    xobjects.pair(Name(name.as_bytes()), *xobj_ref);
                }
            }
        }

        let info_id = self.alloc();
        self.pdf
            .document_info(info_id)
            .title(TextStr(title))
            .producer(TextStr(concat!("hotel-catalog ", env!("CARGO_PKG_VERSION"))));

        self.pdf.finish()
    }
}

impl Canvas for PdfCanvas {
    fn setup(&self) -> PageSetup {
        self.setup
    }

    fn pen(&self) -> &Pen {
        &self.pen
    }

    fn pen_mut(&mut self) -> &mut Pen {
        &mut self.pen
    }

    fn start_page(&mut self) {
        let mut content = Content::new();
        content.set_line_width(LINE_WIDTH * PT_PER_MM);
        self.pages.push(content);
    }

    fn draw_text(&mut self, x: f32, baseline: f32, text: &str) {
        self.warn_unencodable(text);
        let bytes = to_winansi_bytes(text);
        if bytes.is_empty() {
            return;
        }
        let (px, py) = self.to_pdf(x, baseline);
        let font = self.pen.font;
        let (r, g, b) = rgb(self.pen.text_color);
        let Some(content) = self.current() else {
            return;
        };
        content
            .begin_text()
            .set_fill_rgb(r, g, b)
            .set_font(Name(font.style.pdf_name().as_bytes()), font.size)
            .next_line(px, py)
            .show(Str(&bytes))
            .end_text();
    }

    fn draw_rect(&mut self, x: f32, y: f32, w: f32, h: f32) {
        let (px, py) = self.to_pdf(x, y + h);
        let (r, g, b) = rgb(self.pen.draw_color);
        let Some(content) = self.current() else {
            return;
        };
        content.set_stroke_rgb(r, g, b);
        content.rect(px, py, w * PT_PER_MM, h * PT_PER_MM);
        content.stroke();
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32) {
        let (ax, ay) = self.to_pdf(x1, y1);
        let (bx, by) = self.to_pdf(x2, y2);
        let (r, g, b) = rgb(self.pen.draw_color);
        let Some(content) = self.current() else {
            return;
        };
        content.set_stroke_rgb(r, g, b);
        content.move_to(ax, ay);
        content.line_to(bx, by);
        content.stroke();
    }

    fn draw_image(&mut self, path: &Path, x: f32, y: f32, w: f32, h: f32) -> Result<(), Error> {
        if self.pages.is_empty() {
            return Err(Error::Pdf("image placed before the first page".into()));
        }
        let img = load_image(path)?;
        let pdf_name = self.embed_image(img);
        let (px, py) = self.to_pdf(x, y + h);
        let Some(content) = self.current() else {
            return Ok(());
        };
        content.save_state();
        content.transform([w * PT_PER_MM, 0.0, 0.0, h * PT_PER_MM, px, py]);
        content.x_object(Name(pdf_name.as_bytes()));
        content.restore_state();
        Ok(())
    }
}
