#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use hotel_catalog::Font;
use hotel_catalog::model::{Record, RecordFields};
use hotel_catalog::pdf::{Canvas, PageSetup, Pen};

pub const HEADER: [&str; 9] = [
    "PROVINCIA",
    "LOCALIDAD",
    "CP",
    "NOMBRE DE EMPRESA",
    "CLASIFICACION HOTEL",
    "NRO. HABITACIONES",
    "DIRECCION",
    "TELEFONO1",
    "SITIO WEB",
];

pub fn record(province: &str, locality: &str, name: &str) -> Record {
    Record::new(RecordFields {
        province: province.into(),
        locality: locality.into(),
        name: name.into(),
        classification: "3 estrellas".into(),
        rooms: "20".into(),
        address: "plaza mayor 1".into(),
        postal_code: "00000".into(),
        phone: "900000000".into(),
        website: "www.example.es".into(),
    })
}

/// `count` hotels in the capital of `province`, named `"{prefix} {i}"`.
pub fn province_records(province: &str, capital: &str, prefix: &str, count: usize) -> Vec<Record> {
    (0..count)
        .map(|i| record(province, capital, &format!("{prefix} {i:03}")))
        .collect()
}

/// Per-test scratch directory under the target dir.
pub fn output_dir(test: &str) -> PathBuf {
    let dir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join(test);
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

// ---------------------------------------------------------------------------
// XLSX fixtures
// ---------------------------------------------------------------------------

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn column_letter(i: usize) -> String {
    let mut n = i + 1;
    let mut out = Vec::new();
    while n > 0 {
        let rem = (n - 1) % 26;
        out.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    out.reverse();
    String::from_utf8(out).unwrap()
}

/// A minimal workbook with one sheet. Header cells go through the shared
/// string table, numeric-looking data cells are written as numbers and
/// everything else as inline strings. Empty cells are left out.
pub fn workbook(header: &[&str], rows: &[Vec<&str>]) -> Vec<u8> {
    let mut shared = String::new();
    let mut sheet = String::from("<row r=\"1\">");
    for (i, h) in header.iter().enumerate() {
        sheet.push_str(&format!("<c r=\"{}1\" t=\"s\"><v>{i}</v></c>", column_letter(i)));
        shared.push_str(&format!("<si><t>{}</t></si>", xml_escape(h)));
    }
    sheet.push_str("</row>");

    for (r, row) in rows.iter().enumerate() {
        let n = r + 2;
        sheet.push_str(&format!("<row r=\"{n}\">"));
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            let cell_ref = format!("{}{n}", column_letter(c));
            if value.parse::<f64>().is_ok() {
                sheet.push_str(&format!("<c r=\"{cell_ref}\"><v>{value}</v></c>"));
            } else {
                sheet.push_str(&format!(
                    "<c r=\"{cell_ref}\" t=\"inlineStr\"><is><t>{}</t></is></c>",
                    xml_escape(value)
                ));
            }
        }
        sheet.push_str("</row>");
    }

    let files = [
        (
            "[Content_Types].xml",
            r#"<?xml version="1.0" encoding="UTF-8"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="xml" ContentType="application/xml"/></Types>"#.to_string(),
        ),
        (
            "xl/workbook.xml",
            r#"<?xml version="1.0" encoding="UTF-8"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets><sheet name="Hoteles" sheetId="1" r:id="rId7"/></sheets></workbook>"#.to_string(),
        ),
        (
            "xl/_rels/workbook.xml.rels",
            r#"<?xml version="1.0" encoding="UTF-8"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId7" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/hoteles.xml"/></Relationships>"#.to_string(),
        ),
        (
            "xl/worksheets/hoteles.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>{sheet}</sheetData></worksheet>"#
            ),
        ),
        (
            "xl/sharedStrings.xml",
            format!(
                r#"<?xml version="1.0" encoding="UTF-8"?><sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">{shared}</sst>"#
            ),
        ),
    ];

    let mut zip = zip::ZipWriter::new(Cursor::new(Vec::new()));
    let options = zip::write::SimpleFileOptions::default();
    for (name, content) in files {
        zip.start_file(name, options).unwrap();
        zip.write_all(content.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

pub fn write_workbook(path: &Path, header: &[&str], rows: &[Vec<&str>]) {
    std::fs::write(path, workbook(header, rows)).unwrap();
}

// ---------------------------------------------------------------------------
// Recording canvas
// ---------------------------------------------------------------------------

#[derive(Clone, Debug, PartialEq)]
pub struct TextOp {
    pub x: f32,
    pub baseline: f32,
    pub text: String,
    pub font: Font,
}

/// Canvas that keeps every text operation, grouped by page.
pub struct RecordingCanvas {
    setup: PageSetup,
    pen: Pen,
    pub pages: Vec<Vec<TextOp>>,
    pub images: Vec<(usize, PathBuf)>,
}

impl RecordingCanvas {
    pub fn new(setup: PageSetup) -> Self {
        RecordingCanvas {
            pen: Pen::new(&setup),
            setup,
            pages: Vec::new(),
            images: Vec::new(),
        }
    }

    pub fn texts(&self, page: usize) -> Vec<&str> {
        self.pages[page - 1].iter().map(|op| op.text.as_str()).collect()
    }

    /// 1-based pages on which `text` is drawn.
    pub fn pages_with(&self, text: &str) -> Vec<usize> {
        self.pages
            .iter()
            .enumerate()
            .filter(|(_, ops)| ops.iter().any(|op| op.text == text))
            .map(|(i, _)| i + 1)
            .collect()
    }
}

impl Canvas for RecordingCanvas {
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
        self.pages.push(Vec::new());
    }

    fn draw_text(&mut self, x: f32, baseline: f32, text: &str) {
        let font = self.pen.font;
        if let Some(page) = self.pages.last_mut() {
            page.push(TextOp {
                x,
                baseline,
                text: text.to_string(),
                font,
            });
        }
    }

    fn draw_rect(&mut self, _x: f32, _y: f32, _w: f32, _h: f32) {}

    fn draw_line(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32) {}

    fn draw_image(&mut self, path: &Path, _x: f32, _y: f32, _w: f32, _h: f32) -> Result<(), hotel_catalog::Error> {
        self.images.push((self.pen.page, path.to_path_buf()));
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// PDF inspection
// ---------------------------------------------------------------------------

fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack[from..]
        .windows(needle.len())
        .position(|w| w == needle)
        .map(|p| p + from)
}

fn dict_length(dict: &[u8]) -> Option<usize> {
    let at = find(dict, b"/Length", 0)? + b"/Length".len();
    let digits: String = dict[at..]
        .iter()
        .skip_while(|b| b.is_ascii_whitespace())
        .take_while(|b| b.is_ascii_digit())
        .map(|&b| b as char)
        .collect();
    digits.parse().ok()
}

/// Decompressed page content streams, in the order they were written.
/// Image XObjects are skipped.
pub fn content_streams(pdf: &[u8]) -> Vec<Vec<u8>> {
    let mut streams = Vec::new();
    let mut pos = 0;
    while let Some(obj) = find(pdf, b" obj", pos) {
        let Some(stream_kw) = find(pdf, b"stream", obj) else {
            break;
        };
        let next_obj = find(pdf, b" obj", obj + 4).unwrap_or(pdf.len());
        if stream_kw > next_obj {
            pos = next_obj;
            continue;
        }
        let dict = &pdf[obj..stream_kw];
        let mut start = stream_kw + b"stream".len();
        if pdf[start] == b'\r' {
            start += 1;
        }
        if pdf[start] == b'\n' {
            start += 1;
        }
        let len = dict_length(dict).unwrap_or(0);
        let data = &pdf[start..start + len];
        if find(dict, b"/Image", 0).is_none() {
            let raw = if find(dict, b"/FlateDecode", 0).is_some() {
                miniz_oxide::inflate::decompress_to_vec_zlib(data).unwrap()
            } else {
                data.to_vec()
            };
            streams.push(raw);
        }
        pos = start + len;
    }
    streams
}

fn winansi_char(b: u8) -> char {
    match b {
        0x80 => '€',
        0x85 => '…',
        _ => b as char,
    }
}

fn literal_string(data: &[u8], mut i: usize) -> (Vec<u8>, usize) {
    let mut out = Vec::new();
    let mut depth = 1;
    while i < data.len() {
        match data[i] {
            b'\\' => {
                i += 1;
                match data.get(i) {
                    Some(b'n') => out.push(b'\n'),
                    Some(b'r') => out.push(b'\r'),
                    Some(b't') => out.push(b'\t'),
                    Some(d) if d.is_ascii_digit() => {
                        let end = (i + 3).min(data.len());
                        let oct: String = data[i..end]
                            .iter()
                            .take_while(|b| (b'0'..=b'7').contains(*b))
                            .map(|&b| b as char)
                            .collect();
                        out.push(u8::from_str_radix(&oct, 8).unwrap_or(0));
                        i += oct.len().saturating_sub(1);
                    }
                    Some(&c) => out.push(c),
                    None => {}
                }
            }
            b'(' => {
                depth += 1;
                out.push(b'(');
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return (out, i + 1);
                }
                out.push(b')');
            }
            b => out.push(b),
        }
        i += 1;
    }
    (out, i)
}

fn hex_string(data: &[u8], i: usize) -> (Vec<u8>, usize) {
    let end = find(data, b">", i).unwrap_or(data.len());
    let hex: Vec<u8> = data[i..end].iter().copied().filter(u8::is_ascii_hexdigit).collect();
    let bytes = hex
        .chunks(2)
        .map(|pair| {
            let s = std::str::from_utf8(pair).unwrap();
            u8::from_str_radix(&format!("{s:0<2}"), 16).unwrap()
        })
        .collect();
    (bytes, end + 1)
}

/// Strings shown with `Tj` in one content stream.
pub fn shown_text(stream: &[u8]) -> Vec<String> {
    let mut texts = Vec::new();
    let mut i = 0;
    while i < stream.len() {
        let parsed = match stream[i] {
            b'(' => Some(literal_string(stream, i + 1)),
            b'<' if stream.get(i + 1) != Some(&b'<') => Some(hex_string(stream, i + 1)),
            _ => None,
        };
        let Some((bytes, end)) = parsed else {
            i += 1;
            continue;
        };
        let rest = &stream[end..];
        let op_at = rest.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(rest.len());
        if rest[op_at..].starts_with(b"Tj") {
            texts.push(bytes.into_iter().map(winansi_char).collect());
        }
        i = end;
    }
    texts
}

/// Text of every page of a PDF written by this crate.
pub fn page_texts(pdf: &[u8]) -> Vec<Vec<String>> {
    content_streams(pdf).iter().map(|s| shown_text(s)).collect()
}
