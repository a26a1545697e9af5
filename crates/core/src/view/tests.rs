use super::*;
use crate::defaults::default_document;
use crate::normalize::{Document, normalize_data};
use serde_json::json;

fn sample() -> Document {
    normalize_data(&json!({
        "columns": [
            { "id": "b", "name": "Second", "order": 2 },
            { "id": "a", "name": "First", "order": 1 }
        ],
        "tags": [{ "id": "t1", "label": "Team, One", "order": 1 }],
        "items": [
            { "id": "x", "name": "With \"quote\"", "tag": "t1", "values": { "a": "done" } },
            { "id": "y", "name": "Loose", "values": { "b": "not-started" } }
        ]
    }))
    .unwrap()
}

fn ids(columns: &[crate::normalize::Column]) -> Vec<&str> {
    columns.iter().map(|c| c.id.as_str()).collect()
}

#[test]
fn visible_columns_follow_selection() {
    let doc = sample();
    assert_eq!(ids(&visible_columns(&doc.columns, None)), vec!["a", "b"]);
    assert!(visible_columns(&doc.columns, Some(&[])).is_empty());
    let only_b = vec!["b".to_string(), "missing".to_string()];
    assert_eq!(ids(&visible_columns(&doc.columns, Some(&only_b))), vec!["b"]);
}

#[test]
fn matrix_resolves_cells_and_tag_labels() {
    let doc = sample();
    let matrix = build_matrix(&doc, &MatrixFilter::default());
    assert_eq!(matrix.item_order, vec![0, 1]);
    let first = &matrix.rows[0];
    assert_eq!(first.tag_label, "Team, One");
    assert_eq!(first.values[0].as_ref().map(|e| e.label.as_str()), Some("完了"));
    assert_eq!(first.values[1], None);
    assert_eq!(matrix.rows[1].tag_label, "");
}

#[test]
fn matrix_filters_by_tag_and_item() {
    let doc = sample();
    let untagged = MatrixFilter {
        tags: Some(vec![None]),
        ..MatrixFilter::default()
    };
    let matrix = build_matrix(&doc, &untagged);
    assert_eq!(matrix.rows.len(), 1);
    assert_eq!(matrix.rows[0].id, "y");
    assert_eq!(matrix.item_order, vec![1]);

    let none = MatrixFilter {
        tags: Some(vec![Some("t1".to_string())]),
        items: Some(vec!["y".to_string()]),
        ..MatrixFilter::default()
    };
    assert!(build_matrix(&doc, &none).rows.is_empty());
}

#[test]
fn csv_escapes_and_terminates_with_crlf() {
    let doc = sample();
    let table = table_data(&build_matrix(&doc, &MatrixFilter::default()));
    let csv = create_csv_string(&table);
    let expected = "\u{feff}タグ,項目名,First,Second\r\n\
                    \"Team, One\",\"With \"\"quote\"\"\",完了,\r\n\
                    ,Loose,,未着手\r\n";
    assert_eq!(csv, expected);
}

#[test]
fn csv_without_headers_has_no_header_row() {
    let table = TableData {
        headers: Vec::new(),
        rows: vec![TableRow::default(), TableRow::default()],
    };
    assert_eq!(create_csv_string(&table), "\u{feff}\r\n\r\n");
    assert_eq!(create_csv_string(&TableData::default()), "\u{feff}\r\n");
}

#[test]
fn csv_field_normalizes_line_breaks() {
    assert_eq!(normalize_csv_field("a\nb\rc\r\nd"), "\"a\r\nb\r\nc\r\nd\"");
    assert_eq!(normalize_csv_field("plain"), "plain");
    assert_eq!(normalize_csv_field(""), "");
}

#[test]
fn exported_json_loads_back_unchanged() {
    let doc = default_document().unwrap();
    let text = export_json(&doc).unwrap();
    assert!(text.starts_with("{\n  \"valueSet\""));
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(normalize_data(&parsed).unwrap(), doc);
}

#[test]
fn default_document_shape() {
    let doc = default_document().unwrap();
    assert_eq!(doc.columns.len(), 3);
    assert_eq!(doc.tags.len(), 3);
    let names = doc.items.iter().map(|i| i.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["項目A", "項目B", "項目C"]);
    let values = doc.value_set.iter().map(|e| e.id.as_str()).collect::<Vec<_>>();
    assert_eq!(values, vec!["not-started", "in-progress", "done"]);
}
