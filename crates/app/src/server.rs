#![forbid(unsafe_code)]

use crate::state::AppState;
use crate::{AppConfig, AppError, JsonRpcRequest, app_error_response, json_rpc_response};
use cm_core::alias::AliasResolver;
use cm_core::normalize::TagMatcher;
use cm_core::ops::{self, ItemInput, ItemUpdate, ValueSetEntryInput};
use cm_core::view::{build_matrix, create_csv_string, export_json, table_data};
use cm_core::{DataError, Document, default_document, normalize_data};
use cm_storage::{
    KeyValueStore, clear_document, load_document, load_read_only_preference, save_document,
    save_read_only_preference, sha256_hex,
};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

pub(crate) struct CheckMatrixServer {
    state: AppState,
    store: Box<dyn KeyValueStore>,
    config: AppConfig,
}

#[derive(Deserialize)]
struct LoadParams {
    data: Value,
}

#[derive(Deserialize)]
struct NameParams {
    name: String,
}

#[derive(Deserialize)]
struct IdParams {
    id: String,
}

#[derive(Deserialize)]
struct RenameParams {
    id: String,
    name: String,
}

#[derive(Deserialize)]
struct LabelParams {
    label: String,
}

#[derive(Deserialize)]
struct TagUpdateParams {
    id: String,
    label: String,
}

#[derive(Deserialize)]
struct ReorderParams {
    #[serde(default)]
    from: Value,
    #[serde(default)]
    to: Value,
}

impl ReorderParams {
    fn positions(&self) -> Result<(i64, i64), DataError> {
        Ok((ops::reorder_index(&self.from)?, ops::reorder_index(&self.to)?))
    }
}

#[derive(Deserialize)]
struct ItemUpdateParams {
    id: String,
    #[serde(flatten)]
    updates: ItemUpdate,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CycleParams {
    item_id: String,
    column_id: String,
}

#[derive(Deserialize)]
struct IndexParams {
    index: usize,
}

#[derive(Deserialize)]
struct ValueUpdateParams {
    index: usize,
    #[serde(flatten)]
    entry: ValueSetEntryInput,
}

#[derive(Deserialize)]
struct ColumnFilterParams {
    columns: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct TagFilterParams {
    tags: Option<Vec<String>>,
}

#[derive(Deserialize)]
struct ItemFilterParams {
    items: Option<Vec<String>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadOnlyParams {
    read_only: bool,
}

fn parse<T: DeserializeOwned>(params: Option<Value>) -> Result<T, AppError> {
    let params = match params {
        None | Some(Value::Null) => json!({}),
        Some(value) => value,
    };
    serde_json::from_value(params).map_err(|err| AppError::InvalidParams(err.to_string()))
}

/// Content hash of the canonical document JSON; equal documents share a revision.
pub(crate) fn revision(doc: &Document) -> String {
    sha256_hex(doc.to_value().to_string().as_bytes())
}

fn document_payload(doc: &Document) -> Value {
    json!({ "document": doc.to_value(), "revision": revision(doc) })
}

impl CheckMatrixServer {
    /// Restores the stored document (falling back to the built-in default) and picks the
    /// read-only mode: CLI override, then config, then the stored preference.
    pub(crate) fn new(
        store: Box<dyn KeyValueStore>,
        config: AppConfig,
        read_only_override: Option<bool>,
    ) -> Result<Self, DataError> {
        let document = match load_document(&store) {
            Some(doc) => doc,
            None => default_document()?,
        };
        let read_only = read_only_override
            .or(config.read_only)
            .unwrap_or_else(|| load_read_only_preference(&store));
        Ok(Self {
            state: AppState::new(document, read_only),
            store,
            config,
        })
    }

    pub(crate) fn handle(&mut self, request: JsonRpcRequest) -> Option<Value> {
        let JsonRpcRequest {
            method, id, params, ..
        } = request;
        let outcome = self.dispatch(&method, params);
        if let Err(err) = &outcome {
            tracing::debug!(method = %method, error = %err, "request rejected");
        }
        let id = id?;
        Some(match outcome {
            Ok(result) => json_rpc_response(Some(id), result),
            Err(err) => app_error_response(Some(id), &err),
        })
    }

    fn dispatch(&mut self, method: &str, params: Option<Value>) -> Result<Value, AppError> {
        match method {
            "ping" => Ok(json!({})),
            "document.get" => Ok(document_payload(self.state.document())),
            "document.load" => {
                let p: LoadParams = parse(params)?;
                self.state.ensure_writable()?;
                let doc = normalize_data(&p.data)?;
                self.state.replace(doc);
                save_document(&mut self.store, self.state.document());
                Ok(document_payload(self.state.document()))
            }
            "document.reset" => {
                self.state.ensure_writable()?;
                let doc = default_document()?;
                clear_document(&mut self.store);
                self.state.replace(doc);
                Ok(document_payload(self.state.document()))
            }
            "document.export_json" => {
                let content = export_json(self.state.document())
                    .map_err(|err| AppError::Internal(err.to_string()))?;
                Ok(json!({ "fileName": self.config.json_export_name, "content": content }))
            }
            "document.export_csv" => {
                let matrix = build_matrix(self.state.document(), &self.state.matrix_filter());
                let content = create_csv_string(&table_data(&matrix));
                Ok(json!({ "fileName": self.config.csv_export_name, "content": content }))
            }
            "matrix.get" => {
                let matrix = build_matrix(self.state.document(), &self.state.matrix_filter());
                Ok(json!({ "matrix": matrix, "selection": self.state.selection() }))
            }
            "filter.set_columns" => {
                let p: ColumnFilterParams = parse(params)?;
                self.state.select_columns(p.columns);
                Ok(json!({ "selection": self.state.selection() }))
            }
            "filter.set_tags" => {
                let p: TagFilterParams = parse(params)?;
                let tags = p.tags.map(|tags| self.resolve_tag_values(tags));
                self.state.select_tags(tags);
                Ok(json!({ "selection": self.state.selection() }))
            }
            "filter.set_items" => {
                let p: ItemFilterParams = parse(params)?;
                self.state.select_items(p.items);
                Ok(json!({ "selection": self.state.selection() }))
            }
            "read_only.get" => Ok(json!({ "readOnly": self.state.read_only() })),
            "read_only.set" => {
                let p: ReadOnlyParams = parse(params)?;
                self.state.set_read_only(p.read_only);
                save_read_only_preference(&mut self.store, p.read_only);
                Ok(json!({ "readOnly": self.state.read_only() }))
            }
            "column.add" => {
                let p: NameParams = parse(params)?;
                self.mutate(|doc| ops::add_column(doc, &p.name))
            }
            "column.rename" => {
                let p: RenameParams = parse(params)?;
                self.mutate(|doc| ops::rename_column(doc, &p.id, &p.name))
            }
            "column.remove" => {
                let p: IdParams = parse(params)?;
                self.mutate(|doc| ops::remove_column(doc, &p.id))
            }
            "item.add" => {
                let p: ItemInput = parse(params)?;
                self.mutate(|doc| ops::add_item(doc, &p))
            }
            "item.update" => {
                let p: ItemUpdateParams = parse(params)?;
                self.mutate(|doc| ops::update_item(doc, &p.id, &p.updates))
            }
            "item.remove" => {
                let p: IdParams = parse(params)?;
                self.mutate(|doc| ops::remove_item(doc, &p.id))
            }
            "item.cycle_value" => {
                let p: CycleParams = parse(params)?;
                self.mutate(|doc| ops::cycle_item_value(doc, &p.item_id, &p.column_id))
            }
            "tag.add" => {
                let p: LabelParams = parse(params)?;
                self.mutate(|doc| ops::add_tag(doc, &p.label))
            }
            "tag.update" => {
                let p: TagUpdateParams = parse(params)?;
                self.mutate(|doc| ops::update_tag(doc, &p.id, &p.label))
            }
            "tag.delete" => {
                let p: IdParams = parse(params)?;
                self.mutate(|doc| ops::delete_tag(doc, &p.id))
            }
            "tag.reorder" => {
                let p: ReorderParams = parse(params)?;
                let (from, to) = p.positions()?;
                self.mutate(|doc| ops::reorder_tags(doc, from, to))
            }
            "value_set.add" => {
                let p: ValueSetEntryInput = parse(params)?;
                self.mutate(|doc| ops::add_value_set_entry(doc, &p))
            }
            "value_set.update" => {
                let p: ValueUpdateParams = parse(params)?;
                self.mutate(|doc| ops::update_value_set_entry(doc, p.index, &p.entry))
            }
            "value_set.remove" => {
                let p: IndexParams = parse(params)?;
                self.mutate(|doc| ops::remove_value_set_entry(doc, p.index))
            }
            "value_set.reorder" => {
                let p: ReorderParams = parse(params)?;
                let (from, to) = p.positions()?;
                self.mutate(|doc| ops::reorder_value_set(doc, from, to))
            }
            other => Err(AppError::UnknownMethod(other.to_string())),
        }
    }

    fn mutate(
        &mut self,
        op: impl FnOnce(&Document) -> Result<Document, DataError>,
    ) -> Result<Value, AppError> {
        self.state.ensure_writable()?;
        let next = op(self.state.document())?;
        self.state.apply(next);
        save_document(&mut self.store, self.state.document());
        Ok(document_payload(self.state.document()))
    }

    /// Tag filters accept ids, labels or aliases; unknown values pass through unchanged.
    fn resolve_tag_values(&self, values: Vec<String>) -> Vec<String> {
        let doc = self.state.document();
        let Some(matcher) = TagMatcher::new(&doc.tags) else {
            return values;
        };
        values
            .into_iter()
            .map(|value| match matcher.resolve(&value) {
                Some(tag) => tag.id.clone(),
                None => value,
            })
            .collect()
    }
}
