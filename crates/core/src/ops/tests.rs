use super::*;
use crate::DataError;
use crate::normalize::{Document, normalize_data};
use serde_json::{Map, json};

fn fixture() -> Document {
    normalize_data(&json!({
        "columns": [
            { "id": "a", "name": "A" },
            { "id": "b", "name": "B" },
            { "id": "c", "name": "C" }
        ],
        "tags": [
            { "id": "t1", "label": "One", "order": 1 },
            { "id": "t2", "label": "Two", "order": 2 },
            { "id": "t3", "label": "Three", "order": 3 }
        ],
        "items": [
            {
                "id": "i1",
                "name": "First",
                "tags": ["t1", "t2"],
                "order": 1,
                "values": { "a": "in-progress", "c": "done" }
            },
            { "id": "i2", "name": "Second", "tag": "t2", "order": 1 }
        ]
    }))
    .unwrap()
}

fn tag_ids(doc: &Document) -> Vec<&str> {
    doc.tags.iter().map(|t| t.id.as_str()).collect()
}

fn cell<'a>(doc: &'a Document, item: &str, column: &str) -> Option<&'a str> {
    doc.item(item).unwrap().values[column].as_deref()
}

#[test]
fn add_column_appends_after_last() {
    let doc = normalize_data(&json!({
        "columns": [{ "id": "a", "name": "X", "order": 1 }],
        "items": [],
        "tags": [],
        "valueSet": []
    }))
    .unwrap();
    let next = add_column(&doc, "Y").unwrap();
    let columns = next
        .columns
        .iter()
        .map(|c| (c.name.as_str(), c.order))
        .collect::<Vec<_>>();
    assert_eq!(columns, vec![("X", 1), ("Y", 2)]);
    assert_eq!(next.columns[1].id, "y");
    assert!(next.items.is_empty());
}

#[test]
fn add_column_validates_and_seeds_unset_cells() {
    let doc = fixture();
    assert_eq!(add_column(&doc, "  ").unwrap_err(), DataError::EmptyColumnName);
    assert_eq!(add_column(&doc, "A").unwrap_err(), DataError::DuplicateColumnName);

    let next = add_column(&doc, "進捗").unwrap();
    assert_eq!(next.columns.last().unwrap().id, "column");
    assert_eq!(cell(&next, "i1", "column"), None);
    assert_eq!(cell(&next, "i1", "a"), Some("in-progress"));
}

#[test]
fn rename_column_checks_target_and_uniqueness() {
    let doc = fixture();
    assert_eq!(rename_column(&doc, "", "Z").unwrap_err(), DataError::InvalidColumnId);
    assert_eq!(rename_column(&doc, "a", " ").unwrap_err(), DataError::EmptyNewColumnName);
    assert_eq!(rename_column(&doc, "zz", "Z").unwrap_err(), DataError::ColumnNotFound);
    assert_eq!(rename_column(&doc, "a", "B").unwrap_err(), DataError::DuplicateColumnName);

    let next = rename_column(&doc, "a", "Alpha").unwrap();
    assert_eq!(next.column("a").unwrap().name, "Alpha");
    assert_eq!(cell(&next, "i1", "a"), Some("in-progress"));
    assert!(rename_column(&doc, "a", "A").is_ok());
}

#[test]
fn remove_column_keeps_at_least_one() {
    let doc = normalize_data(&json!({ "columns": [{ "id": "a", "name": "X" }] })).unwrap();
    let before = doc.clone();
    let err = remove_column(&doc, "a").unwrap_err();
    assert_eq!(err, DataError::LastColumn);
    assert_eq!(err.to_string(), "少なくとも1つの列を保持する必要があります");
    assert_eq!(doc, before);
}

#[test]
fn remove_column_strips_cells() {
    let doc = fixture();
    assert_eq!(remove_column(&doc, "x").unwrap_err(), DataError::ColumnNotFound);
    let next = remove_column(&doc, "c").unwrap();
    assert_eq!(next.columns.len(), 2);
    for item in &next.items {
        assert!(!item.values.contains_key("c"));
        assert_eq!(item.values.len(), 2);
    }
}

#[test]
fn add_item_seeds_selected_columns_with_first_value() {
    let doc = fixture();
    let mut values = Map::new();
    values.insert("b".to_string(), json!("完了"));
    let input = ItemInput {
        name: " Third ".to_string(),
        tag: Some("Three".to_string()),
        values,
        columns: Some(vec!["a".to_string(), "b".to_string()]),
        ..ItemInput::default()
    };
    let next = add_item(&doc, &input).unwrap();
    let item = next.item("third").unwrap();
    assert_eq!(item.name, "Third");
    assert_eq!(item.tag.as_deref(), Some("t3"));
    assert_eq!(item.order, 1);
    assert_eq!(cell(&next, "third", "a"), Some("not-started"));
    assert_eq!(cell(&next, "third", "b"), Some("done"));
    assert_eq!(cell(&next, "third", "c"), None);
    assert_eq!(next.items.last().unwrap().id, "third");
}

#[test]
fn add_item_rejects_blank_and_duplicate_names() {
    let doc = fixture();
    let blank = ItemInput::default();
    assert_eq!(add_item(&doc, &blank).unwrap_err(), DataError::EmptyItemName);
    let dup = ItemInput {
        name: "First".to_string(),
        ..ItemInput::default()
    };
    assert_eq!(add_item(&doc, &dup).unwrap_err(), DataError::DuplicateItemName);
}

#[test]
fn add_item_backfills_order_within_tag_bucket() {
    let doc = fixture();
    let input = ItemInput {
        name: "Another".to_string(),
        tags: vec!["t2".to_string()],
        ..ItemInput::default()
    };
    let next = add_item(&doc, &input).unwrap();
    assert_eq!(next.item("another").unwrap().order, 2);
}

#[test]
fn update_item_merges_partial_changes() {
    let doc = fixture();
    let updates = ItemUpdate {
        name: Some("Renamed".to_string()),
        tags: Some(vec!["Three".to_string()]),
        columns: Some(vec!["a".to_string(), "b".to_string()]),
        ..ItemUpdate::default()
    };
    let next = update_item(&doc, "i1", &updates).unwrap();
    let item = next.item("i1").unwrap();
    assert_eq!(item.name, "Renamed");
    assert_eq!(item.tag.as_deref(), Some("t3"));
    assert_eq!(item.tags, vec!["t3"]);
    assert_eq!(cell(&next, "i1", "a"), Some("in-progress"));
    assert_eq!(cell(&next, "i1", "b"), Some("not-started"));
    assert_eq!(cell(&next, "i1", "c"), None);
}

#[test]
fn update_item_values_and_tag_clearing() {
    let doc = fixture();
    let updates: ItemUpdate = serde_json::from_value(json!({
        "tag": null,
        "values": { "b": true, "zz": "done" }
    }))
    .unwrap();
    let next = update_item(&doc, "i1", &updates).unwrap();
    let item = next.item("i1").unwrap();
    assert_eq!(item.tag, None);
    assert!(item.tags.is_empty());
    assert_eq!(cell(&next, "i1", "b"), Some("in-progress"));
    assert_eq!(cell(&next, "i1", "c"), Some("done"));
    assert_eq!(next.items.last().unwrap().id, "i1");
}

#[test]
fn update_item_with_empty_tag_list_keeps_primary_tag() {
    let doc = fixture();
    let updates = ItemUpdate {
        tags: Some(Vec::new()),
        ..ItemUpdate::default()
    };
    let next = update_item(&doc, "i2", &updates).unwrap();
    let item = next.item("i2").unwrap();
    assert_eq!(item.tag.as_deref(), Some("t2"));
    assert_eq!(item.tags, vec!["t2"]);
}

#[test]
fn reorder_index_accepts_integers_only() {
    assert_eq!(reorder_index(&json!(2)), Ok(2));
    assert_eq!(reorder_index(&json!(-1)), Ok(-1));
    assert_eq!(reorder_index(&json!(3.0)), Ok(3));
    for bad in [json!(1.5), json!("1"), json!(null), json!(true)] {
        assert_eq!(reorder_index(&bad), Err(DataError::InvalidReorder));
    }
}

#[test]
fn update_item_validation() {
    let doc = fixture();
    let rename = |name: &str| ItemUpdate {
        name: Some(name.to_string()),
        ..ItemUpdate::default()
    };
    assert_eq!(
        update_item(&doc, "nope", &rename("x")).unwrap_err(),
        DataError::ItemNotFound
    );
    assert_eq!(
        update_item(&doc, "i1", &rename(" ")).unwrap_err(),
        DataError::EmptyItemName
    );
    assert_eq!(
        update_item(&doc, "i1", &rename("Second")).unwrap_err(),
        DataError::DuplicateItemName
    );
    assert!(update_item(&doc, "i1", &rename("First")).is_ok());
}

#[test]
fn remove_item_drops_target() {
    let doc = fixture();
    assert_eq!(remove_item(&doc, " ").unwrap_err(), DataError::InvalidItemId);
    assert_eq!(remove_item(&doc, "zz").unwrap_err(), DataError::ItemNotFound);
    let next = remove_item(&doc, "i1").unwrap();
    assert_eq!(next.items.len(), 1);
    assert!(next.item("i1").is_none());
}

#[test]
fn cycle_walks_value_set_and_back_to_unset() {
    let mut doc = fixture();
    let mut seen = Vec::new();
    for _ in 0..4 {
        doc = cycle_item_value(&doc, "i2", "a").unwrap();
        seen.push(cell(&doc, "i2", "a").map(str::to_string));
    }
    assert_eq!(
        seen,
        vec![
            Some("not-started".to_string()),
            Some("in-progress".to_string()),
            Some("done".to_string()),
            None
        ]
    );
    assert_eq!(
        cycle_item_value(&doc, "i2", "zz").unwrap_err(),
        DataError::ColumnNotFound
    );
}

#[test]
fn add_tag_generates_prefixed_id() {
    let doc = fixture();
    assert_eq!(add_tag(&doc, "").unwrap_err(), DataError::EmptyTagLabel);
    assert_eq!(add_tag(&doc, "One").unwrap_err(), DataError::DuplicateTagLabel);
    let next = add_tag(&doc, "Urgent Fix").unwrap();
    let tag = next.tags.last().unwrap();
    assert_eq!(tag.id, "tag-urgent-fix");
    assert_eq!(tag.order, 4);
    let next = add_tag(&next, "重要").unwrap();
    assert_eq!(next.tags.last().unwrap().id, "tag-tag");
}

#[test]
fn update_tag_keeps_old_label_as_alias() {
    let doc = fixture();
    assert_eq!(update_tag(&doc, "t1", "Two").unwrap_err(), DataError::DuplicateTagLabel);
    assert_eq!(update_tag(&doc, "t9", "Nine").unwrap_err(), DataError::TagNotFound);
    let next = update_tag(&doc, "t1", "Uno").unwrap();
    let tag = next.tag("t1").unwrap();
    assert_eq!(tag.label, "Uno");
    assert!(tag.aliases.iter().any(|a| a == "One"));

    let input = ItemInput {
        name: "Legacy".to_string(),
        tag: Some("One".to_string()),
        ..ItemInput::default()
    };
    let with_item = add_item(&next, &input).unwrap();
    assert_eq!(with_item.item("legacy").unwrap().tag.as_deref(), Some("t1"));
}

#[test]
fn delete_tag_promotes_next_remaining_tag() {
    let doc = fixture();
    assert_eq!(delete_tag(&doc, "t9").unwrap_err(), DataError::TagNotFound);
    let next = delete_tag(&doc, "t1").unwrap();
    assert_eq!(tag_ids(&next), vec!["t2", "t3"]);
    assert_eq!(next.tags.iter().map(|t| t.order).collect::<Vec<_>>(), vec![1, 2]);
    let item = next.item("i1").unwrap();
    assert_eq!(item.tag.as_deref(), Some("t2"));
    assert_eq!(item.tags, vec!["t2"]);
}

#[test]
fn reorder_tags_moves_and_renumbers() {
    let doc = fixture();
    let next = reorder_tags(&doc, 0, 2).unwrap();
    assert_eq!(tag_ids(&next), vec!["t2", "t3", "t1"]);
    assert_eq!(next.tags.iter().map(|t| t.order).collect::<Vec<_>>(), vec![1, 2, 3]);

    assert_eq!(reorder_tags(&doc, 1, 1).unwrap(), doc);
    assert_eq!(tag_ids(&reorder_tags(&doc, 2, -7).unwrap()), vec!["t3", "t1", "t2"]);
    assert_eq!(tag_ids(&reorder_tags(&doc, 0, 99).unwrap()), vec!["t2", "t3", "t1"]);
    assert_eq!(
        reorder_tags(&doc, 3, 0).unwrap_err(),
        DataError::SourceIndexOutOfRange
    );
    assert_eq!(
        reorder_tags(&doc, -1, 0).unwrap_err(),
        DataError::SourceIndexOutOfRange
    );
}

#[test]
fn value_set_entries_can_be_added_and_updated() {
    let doc = fixture();
    let blocked = ValueSetEntryInput {
        label: "Blocked".to_string(),
        color: Some("#FF0000".to_string()),
        ..ValueSetEntryInput::default()
    };
    let next = add_value_set_entry(&doc, &blocked).unwrap();
    let last = next.value_set.last().unwrap();
    assert_eq!((last.id.as_str(), last.color.as_str()), ("blocked", "#ff0000"));
    assert_eq!(
        add_value_set_entry(&next, &blocked).unwrap_err(),
        DataError::DuplicateValueLabel
    );

    let todo = ValueSetEntryInput {
        label: "Todo".to_string(),
        color: Some("#123456".to_string()),
        ..ValueSetEntryInput::default()
    };
    let next = update_value_set_entry(&doc, 0, &todo).unwrap();
    assert_eq!(next.value_set[0].id, "not-started");
    assert_eq!(next.value_set[0].label, "Todo");
    assert_eq!(next.value_set[0].color, "#123456");
    assert_eq!(
        update_value_set_entry(&doc, 9, &todo).unwrap_err(),
        DataError::ValueIndexOutOfRange
    );
    let clash = ValueSetEntryInput {
        label: "完了".to_string(),
        ..ValueSetEntryInput::default()
    };
    assert_eq!(
        update_value_set_entry(&doc, 0, &clash).unwrap_err(),
        DataError::DuplicateValueLabel
    );
}

#[test]
fn removing_value_entry_clears_cells() {
    let doc = fixture();
    let next = remove_value_set_entry(&doc, 1).unwrap();
    assert_eq!(next.value_set.len(), 2);
    assert_eq!(cell(&next, "i1", "a"), None);
    assert_eq!(cell(&next, "i1", "c"), Some("done"));

    let single = normalize_data(&json!({ "columns": [{ "name": "A" }], "valueSet": ["Only"] })).unwrap();
    assert_eq!(
        remove_value_set_entry(&single, 0).unwrap_err(),
        DataError::LastValueEntry
    );
    assert_eq!(
        remove_value_set_entry(&doc, 3).unwrap_err(),
        DataError::ValueIndexOutOfRange
    );
}

#[test]
fn reorder_value_set_moves_entry() {
    let doc = fixture();
    let next = reorder_value_set(&doc, 2, 0).unwrap();
    let ids = next.value_set.iter().map(|e| e.id.as_str()).collect::<Vec<_>>();
    assert_eq!(ids, vec!["done", "not-started", "in-progress"]);
    assert_eq!(cell(&next, "i1", "c"), Some("done"));
}
