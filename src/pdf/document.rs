use crate::config::Geometry;
use crate::fonts::Font;

use super::canvas::{Align, Canvas};

/// Colour of province headers and locality titles.
pub const PROVINCE_COLOR: [u8; 3] = [40, 40, 160];
pub const BLACK: [u8; 3] = [0, 0, 0];
const RULE_COLOR: [u8; 3] = [180, 180, 180];
const FOOTER_COLOR: [u8; 3] = [128, 128, 128];

/// y of the decorative rule under the province header.
const RULE_Y: f32 = 20.0;
/// Footer cell top, measured up from the bottom edge.
const FOOTER_OFFSET: f32 = 15.0;

/// What the header hook needs to know about the page being opened.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PageContext {
    /// Province whose pages are being laid out. `None` on front matter and
    /// on the hotel index, which get no header.
    pub province: Option<String>,
    pub continuation: bool,
}

impl PageContext {
    pub fn province(name: &str, continuation: bool) -> Self {
        PageContext {
            province: Some(name.to_string()),
            continuation,
        }
    }
}

/// A canvas plus the page decorations. Every page opened through
/// [`Document::new_page`] gets the header for the current context, and the
/// page it closes gets its footer.
pub struct Document<C> {
    canvas: C,
    context: PageContext,
    geometry: Geometry,
}

impl<C: Canvas> Document<C> {
    pub fn new(canvas: C, geometry: Geometry) -> Self {
        Document {
            canvas,
            context: PageContext::default(),
            geometry,
        }
    }

    pub fn canvas(&self) -> &C {
        &self.canvas
    }

    pub fn canvas_mut(&mut self) -> &mut C {
        &mut self.canvas
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Context for the next page opened. The current page is unaffected.
    pub fn set_context(&mut self, context: PageContext) {
        self.context = context;
    }

    pub fn page_number(&self) -> usize {
        self.canvas.page_number()
    }

    pub fn new_page(&mut self) {
        if self.canvas.page_number() > 0 {
            self.draw_footer();
        }
        self.canvas.new_page();
        self.draw_header();
    }

    /// Close the last page and hand back the canvas.
    pub fn finish(mut self) -> C {
        if self.canvas.page_number() > 0 {
            self.draw_footer();
        }
        self.canvas
    }

    fn draw_header(&mut self) {
        let Some(province) = self.context.province.as_deref() else {
            return;
        };
        let mut title = format!("PROVINCIA DE {}", province.to_uppercase());
        if self.context.continuation {
            title.push_str(" (cont.)");
        }

        let saved = self.canvas.pen().clone();
        let c = &mut self.canvas;
        c.set_font(Font::bold(14.0));
        c.set_text_color(PROVINCE_COLOR);
        c.write_cell(0.0, 8.0, &title, false, Align::Center);
        c.line_break(8.0);
        c.line_break(3.0);
        c.set_draw_color(RULE_COLOR);
        let margin = self.geometry.margin;
        c.draw_line(margin, RULE_Y, self.geometry.page_width - margin, RULE_Y);
        c.line_break(5.0);

        let pen = c.pen_mut();
        pen.font = saved.font;
        pen.text_color = saved.text_color;
        pen.draw_color = saved.draw_color;
    }

    fn draw_footer(&mut self) {
        let saved = self.canvas.pen().clone();
        let page = self.canvas.page_number().to_string();
        let c = &mut self.canvas;
        c.move_to(self.geometry.margin, self.geometry.page_height - FOOTER_OFFSET);
        c.set_font(Font::oblique(9.0));
        c.set_text_color(FOOTER_COLOR);
        c.write_cell(0.0, 10.0, &page, false, Align::Center);
        *c.pen_mut() = saved;
    }
}
