use std::collections::BTreeSet;

/// Points per millimetre. All layout happens in millimetres; the PDF
/// content stream is written in points.
pub const PT_PER_MM: f32 = 72.0 / 25.4;

/// The three base-14 faces the catalog draws with. None of them are
/// embedded: every PDF viewer ships them, and their advance widths are
/// fixed by the AFM files, so measuring here matches what gets rendered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontStyle {
    Regular,
    Bold,
    Oblique,
}

impl FontStyle {
    pub const ALL: [FontStyle; 3] = [FontStyle::Regular, FontStyle::Bold, FontStyle::Oblique];

    pub(crate) fn base_font(self) -> &'static [u8] {
        match self {
            FontStyle::Regular => b"Helvetica",
            FontStyle::Bold => b"Helvetica-Bold",
            FontStyle::Oblique => b"Helvetica-Oblique",
        }
    }

    /// Resource name used inside page content streams.
    pub(crate) fn pdf_name(self) -> &'static str {
        match self {
            FontStyle::Regular => "F1",
            FontStyle::Bold => "F2",
            FontStyle::Oblique => "F3",
        }
    }

    fn widths_1000(self) -> &'static [u16; 224] {
        match self {
            // Helvetica-Oblique shares the upright advance widths.
            FontStyle::Regular | FontStyle::Oblique => &HELVETICA_WIDTHS,
            FontStyle::Bold => &HELVETICA_BOLD_WIDTHS,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Font {
    pub style: FontStyle,
    /// Size in points.
    pub size: f32,
}

impl Font {
    pub const fn new(style: FontStyle, size: f32) -> Self {
        Font { style, size }
    }

    pub const fn regular(size: f32) -> Self {
        Font::new(FontStyle::Regular, size)
    }

    pub const fn bold(size: f32) -> Self {
        Font::new(FontStyle::Bold, size)
    }

    pub const fn oblique(size: f32) -> Self {
        Font::new(FontStyle::Oblique, size)
    }

    /// Font size expressed in millimetres.
    pub fn size_mm(&self) -> f32 {
        self.size / PT_PER_MM
    }

    /// Width of a single WinAnsi byte in 1000-units.
    fn byte_width_1000(&self, byte: u8) -> f32 {
        if byte >= 32 {
            self.style.widths_1000()[(byte - 32) as usize] as f32
        } else {
            0.0
        }
    }

    /// Rendered width of `text` in millimetres. Characters the output
    /// encoding cannot carry are dropped on output, so they measure zero.
    pub fn text_width(&self, text: &str) -> f32 {
        let units: f32 = to_winansi_bytes(text)
            .iter()
            .map(|&b| self.byte_width_1000(b))
            .sum();
        units * self.size_mm() / 1000.0
    }
}

/// Map a single Unicode char to its WinAnsi byte, or None if unmappable.
fn char_to_winansi(c: char) -> Option<u8> {
    match c as u32 {
        0x0020..=0x007E => Some(c as u8),
        0x00A0..=0x00FF => Some(c as u8), // Latin-1 supplement maps directly
        0x20AC => Some(0x80),
        0x201A => Some(0x82),
        0x0192 => Some(0x83),
        0x201E => Some(0x84),
        0x2026 => Some(0x85),
        0x2020 => Some(0x86),
        0x2021 => Some(0x87),
        0x02C6 => Some(0x88),
        0x2030 => Some(0x89),
        0x0160 => Some(0x8A),
        0x2039 => Some(0x8B),
        0x0152 => Some(0x8C),
        0x017D => Some(0x8E),
        0x2018 => Some(0x91),
        0x2019 => Some(0x92),
        0x201C => Some(0x93),
        0x201D => Some(0x94),
        0x2022 => Some(0x95), // bullet
        0x2013 => Some(0x96),
        0x2014 => Some(0x97),
        0x02DC => Some(0x98),
        0x2122 => Some(0x99),
        0x0161 => Some(0x9A),
        0x203A => Some(0x9B),
        0x0153 => Some(0x9C),
        0x017E => Some(0x9E),
        0x0178 => Some(0x9F),
        _ => None,
    }
}

/// Convert a UTF-8 string to WinAnsi (Windows-1252) bytes for PDF Str encoding.
/// Unmappable characters and control characters are dropped.
pub(crate) fn to_winansi_bytes(s: &str) -> Vec<u8> {
    s.chars().filter_map(char_to_winansi).collect()
}

/// Characters of `s` that the output encoding cannot represent.
pub(crate) fn unencodable_chars(s: &str) -> BTreeSet<char> {
    s.chars()
        .filter(|&c| char_to_winansi(c).is_none() && !c.is_control())
        .collect()
}

/// Keep only the characters `to_winansi_bytes` would emit.
pub(crate) fn encodable(s: &str) -> String {
    s.chars().filter(|&c| char_to_winansi(c).is_some()).collect()
}

/// Helvetica advance widths (AFM, 1000 units/em) for WinAnsi bytes 32..=255.
/// Undefined code points use the bullet width, as the standard metrics do.
#[rustfmt::skip]
static HELVETICA_WIDTHS: [u16; 224] = [
    // 0x20
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0x30
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    // 0x40
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    // 0x50
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    // 0x60
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    // 0x70
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, 350,
    // 0x80
    556, 350, 222, 556, 333, 1000, 556, 556, 333, 1000, 667, 333, 1000, 350, 611, 350,
    // 0x90
    350, 222, 222, 333, 333, 350, 556, 1000, 333, 1000, 500, 333, 944, 350, 500, 667,
    // 0xA0
    278, 333, 556, 556, 556, 556, 260, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // 0xB0
    400, 584, 333, 333, 333, 556, 537, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // 0xC0
    667, 667, 667, 667, 667, 667, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // 0xD0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // 0xE0
    556, 556, 556, 556, 556, 556, 889, 500, 556, 556, 556, 556, 278, 278, 278, 278,
    // 0xF0
    556, 556, 556, 556, 556, 556, 556, 584, 611, 556, 556, 556, 556, 500, 556, 500,
];

/// Helvetica-Bold advance widths (AFM, 1000 units/em) for WinAnsi bytes 32..=255.
#[rustfmt::skip]
static HELVETICA_BOLD_WIDTHS: [u16; 224] = [
    // 0x20
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    // 0x30
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    // 0x40
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    // 0x50
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    // 0x60
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    // 0x70
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, 350,
    // 0x80
    556, 350, 278, 556, 500, 1000, 556, 556, 333, 1000, 667, 333, 1000, 350, 611, 350,
    // 0x90
    350, 278, 278, 500, 500, 350, 556, 1000, 333, 1000, 556, 333, 944, 350, 500, 667,
    // 0xA0
    278, 333, 556, 556, 556, 556, 280, 556, 333, 737, 370, 556, 584, 333, 737, 333,
    // 0xB0
    400, 584, 333, 333, 333, 611, 556, 278, 333, 333, 365, 556, 834, 834, 834, 611,
    // 0xC0
    722, 722, 722, 722, 722, 722, 1000, 722, 667, 667, 667, 667, 278, 278, 278, 278,
    // 0xD0
    722, 722, 778, 778, 778, 778, 778, 584, 778, 722, 722, 722, 722, 667, 667, 611,
    // 0xE0
    556, 556, 556, 556, 556, 556, 889, 556, 556, 556, 556, 556, 278, 278, 278, 278,
    // 0xF0
    611, 611, 611, 611, 611, 611, 611, 584, 611, 611, 611, 611, 611, 556, 611, 556,
];
