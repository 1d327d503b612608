mod sheet;

use std::io::{Read, Seek};
use std::path::Path;

use crate::error::Error;
use crate::model::{Record, RecordFields};

use sheet::{Row, parse_rows, parse_shared_strings};

const REL_NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const FALLBACK_SHEET: &str = "xl/worksheets/sheet1.xml";

/// Spreadsheet header of each record field, and whether a workbook without
/// it is rejected.
const COLUMNS: [(&str, bool); 9] = [
    ("PROVINCIA", true),
    ("LOCALIDAD", true),
    ("NOMBRE DE EMPRESA", true),
    ("CP", false),
    ("CLASIFICACION HOTEL", false),
    ("NRO. HABITACIONES", false),
    ("DIRECCION", false),
    ("TELEFONO1", false),
    ("SITIO WEB", false),
];

fn read_zip_text<R: Read + Seek>(zip: &mut zip::ZipArchive<R>, name: &str) -> Option<String> {
    let mut content = String::new();
    zip.by_name(name).ok()?.read_to_string(&mut content).ok()?;
    Some(content)
}

/// Archive path of the first worksheet listed in the workbook.
fn first_sheet_path<R: Read + Seek>(zip: &mut zip::ZipArchive<R>) -> Option<String> {
    let workbook = read_zip_text(zip, "xl/workbook.xml")?;
    let workbook = roxmltree::Document::parse(&workbook).ok()?;
    let rel_id = workbook
        .descendants()
        .find(|n| n.tag_name().name() == "sheet")?
        .attribute((REL_NS, "id"))?
        .to_string();

    let rels = read_zip_text(zip, "xl/_rels/workbook.xml.rels")?;
    let rels = roxmltree::Document::parse(&rels).ok()?;
    let target = rels
        .root_element()
        .children()
        .find(|n| n.tag_name().name() == "Relationship" && n.attribute("Id") == Some(rel_id.as_str()))?
        .attribute("Target")?;

    Some(match target.strip_prefix('/') {
        Some(absolute) => absolute.to_string(),
        None => format!("xl/{target}"),
    })
}

fn read_records<R: Read + Seek>(zip: &mut zip::ZipArchive<R>) -> Result<Vec<Record>, Error> {
    let shared = match read_zip_text(zip, "xl/sharedStrings.xml") {
        Some(xml) => parse_shared_strings(&roxmltree::Document::parse(&xml)?),
        None => Vec::new(),
    };

    let sheet_path = first_sheet_path(zip).unwrap_or_else(|| FALLBACK_SHEET.to_string());
    let sheet_xml = read_zip_text(zip, &sheet_path).ok_or_else(|| {
        Error::InvalidXlsx(format!("missing worksheet {sheet_path} (is this an XLSX file?)"))
    })?;
    let sheet = roxmltree::Document::parse(&sheet_xml)?;
    let mut rows = parse_rows(&sheet, &shared).into_iter();

    let header = rows.next().unwrap_or_default();
    let columns = map_columns(&header)?;

    let records: Vec<Record> = rows
        .filter(|row| row.values().any(|v| !v.trim().is_empty()))
        .map(|row| Record::new(row_fields(&row, &columns)))
        .collect();
    log::debug!("Read {} records from {sheet_path}", records.len());
    Ok(records)
}

/// Column index of each entry of [`COLUMNS`], `None` for absent optional
/// columns.
fn map_columns(header: &Row) -> Result<[Option<usize>; 9], Error> {
    let mut columns = [None; 9];
    for (slot, (name, required)) in columns.iter_mut().zip(COLUMNS) {
        *slot = header
            .iter()
            .find(|(_, text)| text.trim().to_uppercase() == name)
            .map(|(&col, _)| col);
        if slot.is_none() {
            if required {
                return Err(Error::MissingColumn(name.to_string()));
            }
            log::warn!("Column {name:?} not found, reading it as empty");
        }
    }
    Ok(columns)
}

fn row_fields(row: &Row, columns: &[Option<usize>; 9]) -> RecordFields {
    let cell = |i: usize| {
        columns[i]
            .and_then(|col| row.get(&col))
            .cloned()
            .unwrap_or_default()
    };
    RecordFields {
        province: cell(0),
        locality: cell(1),
        name: cell(2),
        postal_code: cell(3),
        classification: cell(4),
        rooms: cell(5),
        address: cell(6),
        phone: cell(7),
        website: cell(8),
    }
}

/// Read the hotel records from the first worksheet of an `.xlsx` file.
pub fn parse(path: &Path) -> Result<Vec<Record>, Error> {
    let file = std::fs::File::open(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())),
        ),
        _ => Error::Io(e),
    })?;

    let mut zip = zip::ZipArchive::new(file)
        .map_err(|_| Error::InvalidXlsx("file is not a ZIP archive".into()))?;
    read_records(&mut zip)
}

pub fn parse_bytes(data: &[u8]) -> Result<Vec<Record>, Error> {
    let mut zip = zip::ZipArchive::new(std::io::Cursor::new(data))
        .map_err(|_| Error::InvalidXlsx("data is not a ZIP archive".into()))?;
    read_records(&mut zip)
}
