#![forbid(unsafe_code)]

use crate::DataError;
use crate::normalize::{Document, normalize_data};
use serde_json::{Value, json};

/// Raw seed document shown on first launch and after a reset.
pub fn default_raw_document() -> Value {
    json!({
        "valueSet": [
            { "id": "not-started", "label": "未着手", "color": "#9e9e9e" },
            { "id": "in-progress", "label": "進行中", "color": "#f2c94c" },
            { "id": "done", "label": "完了", "color": "#4caf50" }
        ],
        "columns": [
            { "id": "col-progress", "name": "進捗", "type": "status", "order": 1 },
            { "id": "col-review", "name": "レビュー", "type": "status", "order": 2 },
            { "id": "col-done", "name": "完了", "type": "status", "order": 3 }
        ],
        "tags": [
            { "id": "tag-priority-high", "label": "重要", "order": 1, "aliases": ["重要"] },
            { "id": "tag-priority-normal", "label": "通常", "order": 2, "aliases": ["通常"] },
            { "id": "tag-priority-low", "label": "低優先", "order": 3, "aliases": ["低優先"] }
        ],
        "items": [
            {
                "id": "item-alpha",
                "name": "項目A",
                "tag": "tag-priority-high",
                "tags": ["tag-priority-high"],
                "order": 1,
                "values": { "col-progress": "done", "col-review": "in-progress", "col-done": null }
            },
            {
                "id": "item-bravo",
                "name": "項目B",
                "tag": "tag-priority-normal",
                "tags": ["tag-priority-normal"],
                "order": 2,
                "values": { "col-progress": "done", "col-review": "done", "col-done": "not-started" }
            },
            {
                "id": "item-charlie",
                "name": "項目C",
                "tag": "tag-priority-low",
                "tags": ["tag-priority-low"],
                "order": 3,
                "values": { "col-progress": "not-started", "col-review": null, "col-done": null }
            }
        ]
    })
}

pub fn default_document() -> Result<Document, DataError> {
    normalize_data(&default_raw_document())
}
