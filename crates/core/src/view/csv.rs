#![forbid(unsafe_code)]

use serde::Serialize;

pub const CSV_BOM: &str = "\u{feff}";
pub const CSV_LINE_BREAK: &str = "\r\n";

pub const TAG_HEADER_ID: &str = "__tag__";
pub const TAG_HEADER_LABEL: &str = "タグ";
pub const NAME_HEADER_ID: &str = "__name__";
pub const NAME_HEADER_LABEL: &str = "項目名";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableHeader {
    pub id: String,
    pub name: String,
}

impl TableHeader {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableRow {
    pub tag_label: String,
    pub name: String,
    /// One cell per data header, in header order.
    pub values: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct TableData {
    pub headers: Vec<TableHeader>,
    pub rows: Vec<TableRow>,
}

/// Normalizes embedded line breaks to CRLF, then quotes the field when it holds a comma, a
/// quote or a line break.
pub fn normalize_csv_field(value: &str) -> String {
    let normalized = value
        .replace("\r\n", "\n")
        .replace('\r', "\n")
        .replace('\n', CSV_LINE_BREAK);
    let needs_quoting = normalized.contains([',', '"', '\r', '\n']);
    let escaped = normalized.replace('"', "\"\"");
    if needs_quoting {
        format!("\"{escaped}\"")
    } else {
        escaped
    }
}

pub fn create_csv_string(table: &TableData) -> String {
    let mut lines: Vec<String> = Vec::with_capacity(table.rows.len() + 1);
    if !table.headers.is_empty() {
        lines.push(
            table
                .headers
                .iter()
                .map(|header| normalize_csv_field(&header.name))
                .collect::<Vec<_>>()
                .join(","),
        );
    }

    for row in &table.rows {
        let mut data = row.values.iter();
        let cells = table
            .headers
            .iter()
            .map(|header| match header.id.as_str() {
                TAG_HEADER_ID => normalize_csv_field(&row.tag_label),
                NAME_HEADER_ID => normalize_csv_field(&row.name),
                _ => normalize_csv_field(data.next().map_or("", String::as_str)),
            })
            .collect::<Vec<_>>();
        lines.push(cells.join(","));
    }

    format!("{CSV_BOM}{}{CSV_LINE_BREAK}", lines.join(CSV_LINE_BREAK))
}
