use std::collections::BTreeMap;

/// Text of every shared string item, in table order. Rich-text runs are
/// concatenated; phonetic guides are skipped.
pub(super) fn parse_shared_strings(xml: &roxmltree::Document) -> Vec<String> {
    xml.root_element()
        .children()
        .filter(|n| n.tag_name().name() == "si")
        .map(string_item_text)
        .collect()
}

/// Concatenated `<t>` text of an `<si>` or `<is>` element.
fn string_item_text(node: roxmltree::Node) -> String {
    node.descendants()
        .filter(|n| n.tag_name().name() == "t")
        .filter(|n| !n.ancestors().any(|a| a.tag_name().name() == "rPh"))
        .filter_map(|n| n.text())
        .collect()
}

/// Zero-based column of a cell reference such as `"C7"` or `"AB12"`.
pub(super) fn column_index(cell_ref: &str) -> Option<usize> {
    let letters: Vec<u8> = cell_ref
        .bytes()
        .take_while(u8::is_ascii_alphabetic)
        .map(|b| b.to_ascii_uppercase())
        .collect();
    if letters.is_empty() {
        return None;
    }
    let n = letters
        .iter()
        .fold(0usize, |acc, &b| acc * 26 + (b - b'A' + 1) as usize);
    Some(n - 1)
}

/// Numbers are stored as text in the sheet XML; integral values print
/// without a fractional part so postal codes and phone numbers survive.
pub(super) fn format_number(raw: &str) -> String {
    match raw.trim().parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Ok(v) if v.is_finite() => v.to_string(),
        _ => raw.to_string(),
    }
}

fn cell_value(cell: roxmltree::Node, shared: &[String]) -> String {
    let value = cell
        .children()
        .find(|n| n.tag_name().name() == "v")
        .and_then(|v| v.text())
        .unwrap_or("");
    match cell.attribute("t").unwrap_or("n") {
        "s" => value
            .trim()
            .parse::<usize>()
            .ok()
            .and_then(|i| shared.get(i))
            .cloned()
            .unwrap_or_default(),
        "inlineStr" => cell
            .children()
            .find(|n| n.tag_name().name() == "is")
            .map(string_item_text)
            .unwrap_or_default(),
        "b" => (if value.trim() == "1" { "TRUE" } else { "FALSE" }).to_string(),
        "n" => format_number(value),
        _ => value.to_string(),
    }
}

/// One worksheet row: column index to cell text. Missing cells are absent.
pub(super) type Row = BTreeMap<usize, String>;

/// All rows of a worksheet, in document order.
pub(super) fn parse_rows(xml: &roxmltree::Document, shared: &[String]) -> Vec<Row> {
    let Some(sheet_data) = xml
        .root_element()
        .children()
        .find(|n| n.tag_name().name() == "sheetData")
    else {
        return Vec::new();
    };

    sheet_data
        .children()
        .filter(|n| n.tag_name().name() == "row")
        .map(|row| {
            let mut cells = Row::new();
            let mut next_col = 0;
            for cell in row.children().filter(|n| n.tag_name().name() == "c") {
                let col = cell.attribute("r").and_then(column_index).unwrap_or(next_col);
                cells.insert(col, cell_value(cell, shared));
                next_col = col + 1;
            }
            cells
        })
        .collect()
}
