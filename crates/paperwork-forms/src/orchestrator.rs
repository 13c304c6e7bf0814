//! One live form instance.
//!
//! The [`FormOrchestrator`] owns the [`FormValues`] of a form built from a
//! shared [`FormModel`]. It routes path-addressed reads and writes, delegates
//! collection and table operations by name, keeps derived fields current,
//! runs validation, renders the form in either mode and hands validated
//! snapshots to a [`SubmitHandler`].
//!
//! Every change is published as a [`FormEvent`] on the instance's signal.

use std::fmt::Write as _;
use std::sync::Arc;

use paperwork_core::logging::form_span;
use paperwork_core::utils::text::{escape_html, humanize_key};
use paperwork_core::{
    FieldPath, FileRef, ItemId, PaperworkError, PaperworkResult, Settings, Value, SETTINGS,
};
use paperwork_signals::{Signal, SignalReceiver};
use tracing::Instrument;

use crate::bound_field::BoundField;
use crate::collection::{CollectionItem, CollectionSpec};
use crate::fields::FieldDef;
use crate::model::FormModel;
use crate::render::{FieldRenderer, RenderContext, RenderMode, RenderedField, RenderedForm};
use crate::submit::{SubmitHandler, SubmitReceipt};
use crate::table::{ComputedRow, ComputedTable};
use crate::validation::{full_clean, ValidationErrors};
use crate::values::{FormValues, Location};

/// Something that happened to a form instance.
#[derive(Debug, Clone, PartialEq)]
pub enum FormEvent {
    /// A value was written at a path.
    ValueChanged {
        /// The canonical index path.
        path: String,
    },
    /// A collection entry was added.
    ItemAdded {
        /// The collection key.
        collection: String,
        /// The new entry's id.
        id: ItemId,
    },
    /// A collection entry was removed.
    ItemRemoved {
        /// The collection key.
        collection: String,
        /// The removed entry's id.
        id: ItemId,
    },
    /// A collection entry's fields were replaced.
    ItemReplaced {
        /// The collection key.
        collection: String,
        /// The entry's id.
        id: ItemId,
    },
    /// A dynamic column was added to a table.
    ColumnAdded {
        /// The table key.
        table: String,
        /// The column key.
        key: String,
    },
    /// A table row was added.
    RowAdded {
        /// The table key.
        table: String,
        /// The new row's id.
        id: ItemId,
    },
    /// A table row was removed.
    RowRemoved {
        /// The table key.
        table: String,
        /// The removed row's id.
        id: ItemId,
    },
    /// Derived cells of a row were recomputed.
    RowRecomputed {
        /// The table key.
        table: String,
        /// The row index.
        index: usize,
    },
    /// A derived top-level field changed.
    DerivedUpdated {
        /// The derived key.
        target: String,
        /// The new value.
        value: Value,
    },
    /// Validation ran.
    Validated {
        /// Number of paths with errors.
        error_count: usize,
    },
    /// The handler accepted a submission.
    Submitted {
        /// The form key.
        form: String,
    },
    /// Values were restored to their initial state.
    Reset,
}

/// A live form instance.
pub struct FormOrchestrator {
    model: Arc<FormModel>,
    values: FormValues,
    errors: ValidationErrors,
    events: Arc<Signal<FormEvent>>,
    date_format: String,
    span: tracing::Span,
}

impl std::fmt::Debug for FormOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormOrchestrator")
            .field("form", &self.model.name())
            .field("values", &self.values)
            .field("errors", &self.errors)
            .finish_non_exhaustive()
    }
}

impl FormOrchestrator {
    /// Creates an instance using the global settings.
    pub fn new(model: impl Into<Arc<FormModel>>) -> Self {
        Self::with_settings(model, SETTINGS.get())
    }

    /// Creates an instance using explicit settings.
    pub fn with_settings(model: impl Into<Arc<FormModel>>, settings: &Settings) -> Self {
        let model = model.into();
        let values = model.initial_values();
        let span = form_span(model.name());
        Self {
            model,
            values,
            errors: ValidationErrors::new(),
            events: Arc::new(Signal::new()),
            date_format: settings.date_format.clone(),
            span,
        }
    }

    /// The form declaration.
    pub fn model(&self) -> &FormModel {
        &self.model
    }

    /// The current values.
    pub const fn values(&self) -> &FormValues {
        &self.values
    }

    /// The event signal. Receivers run synchronously inside each operation.
    pub fn events(&self) -> Arc<Signal<FormEvent>> {
        Arc::clone(&self.events)
    }

    /// Connects a receiver to the event signal.
    pub fn subscribe(&self, receiver_id: impl Into<String>, callback: SignalReceiver<FormEvent>) {
        self.events.connect(receiver_id, callback);
    }

    fn emit(&self, event: FormEvent) {
        let _guard = self.span.enter();
        tracing::debug!(?event, "form event");
        self.events.send(&event);
    }

    fn locate(&self, path: &str) -> PaperworkResult<(FieldPath, Option<Location>)> {
        let parsed = FieldPath::parse(path)?;
        let location = self.values.locate(&parsed)?;
        Ok((parsed, location))
    }

    /// Reads the value at `path`.
    pub fn get(&self, path: &str) -> PaperworkResult<Value> {
        self.values.get(&FieldPath::parse(path)?)
    }

    /// Writes the value at `path`.
    ///
    /// Clears the errors shown for that path and recomputes the derived
    /// fields that depend on it. Table cells are stored without recomputing;
    /// call [`blur`](Self::blur) when editing of the cell finishes.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> PaperworkResult<bool> {
        let (parsed, location) = self.locate(path)?;
        let Some(location) = location else {
            return Ok(false);
        };
        if let Location::Scalar(name) = &location {
            if self.model.is_derived(name) {
                return Err(PaperworkError::ReadOnlyField(name.clone()));
            }
        }

        let changed = self.values.set(&parsed, value.into())?;
        if changed {
            let canonical = location.path();
            self.errors.clear_path(&canonical);
            self.emit(FormEvent::ValueChanged { path: canonical });
            if !matches!(location, Location::Cell { .. }) {
                self.refresh_derived(parsed.root());
            }
        }
        Ok(changed)
    }

    /// Writes the raw text of an Edit control, parsed by the path's field kind.
    ///
    /// Table cells parse as numbers when they can.
    pub fn input(&mut self, path: &str, raw: &str) -> PaperworkResult<bool> {
        let (_, location) = self.locate(path)?;
        let Some(location) = location else {
            return Ok(false);
        };
        let value = match self.model.definition_for(&location) {
            Some(def) => def.parse_input(raw, &self.date_format),
            None => match &location {
                Location::Cell { key, .. } => {
                    FieldDef::number(key.as_str()).parse_input(raw, &self.date_format)
                }
                _ if raw.is_empty() => Value::Null,
                _ => Value::from(raw),
            },
        };
        self.set(path, value)
    }

    /// Signals that editing of `path` finished.
    ///
    /// For the actual and comparator cells of a table this recomputes the
    /// row's derived cells. Returns whether a recompute happened.
    pub fn blur(&mut self, path: &str) -> PaperworkResult<bool> {
        let (_, location) = self.locate(path)?;
        match location {
            Some(Location::Cell { table, index, key }) => {
                let recomputed = self.values.table_mut(&table)?.commit(index, &key);
                if recomputed {
                    self.emit(FormEvent::RowRecomputed {
                        table: table.clone(),
                        index,
                    });
                    self.refresh_derived(&table);
                }
                Ok(recomputed)
            }
            _ => Ok(false),
        }
    }

    fn refresh_derived(&mut self, root: &str) {
        let model = Arc::clone(&self.model);
        for derived in model.derived_fields().iter().filter(|d| d.depends_on(root)) {
            let value = derived.compute(&self.values);
            if self.values.scalar(&derived.target) != Some(&value) {
                self.values.insert_scalar(derived.target.clone(), value.clone());
                self.emit(FormEvent::DerivedUpdated {
                    target: derived.target.clone(),
                    value,
                });
            }
        }
    }

    fn after_structure_change(&mut self, collection: &str, event: FormEvent) {
        // index paths below the collection no longer point at the same entries
        self.errors.clear_under(collection);
        self.emit(event);
        self.refresh_derived(collection);
    }

    // ── Collections ──────────────────────────────────────────────────

    /// Appends an entry holding exactly `seed`'s fields.
    pub fn add_item<I, K, V>(&mut self, collection: &str, seed: I) -> PaperworkResult<ItemId>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let id = self.values.collection_mut(collection)?.add(seed);
        self.after_structure_change(
            collection,
            FormEvent::ItemAdded {
                collection: collection.to_string(),
                id,
            },
        );
        Ok(id)
    }

    /// Appends a blank entry.
    pub fn add_blank_item(&mut self, collection: &str) -> PaperworkResult<ItemId> {
        let id = self.values.collection_mut(collection)?.add_blank();
        self.after_structure_change(
            collection,
            FormEvent::ItemAdded {
                collection: collection.to_string(),
                id,
            },
        );
        Ok(id)
    }

    /// Removes the entry at `index`. Out of range yields `Ok(None)`.
    pub fn remove_item(
        &mut self,
        collection: &str,
        index: usize,
    ) -> PaperworkResult<Option<CollectionItem>> {
        let removed = self.values.collection_mut(collection)?.remove(index);
        if let Some(item) = &removed {
            self.after_structure_change(
                collection,
                FormEvent::ItemRemoved {
                    collection: collection.to_string(),
                    id: item.id(),
                },
            );
        }
        Ok(removed)
    }

    /// Removes the entry with `id`.
    pub fn remove_item_id(
        &mut self,
        collection: &str,
        id: ItemId,
    ) -> PaperworkResult<Option<CollectionItem>> {
        match self.values.collection(collection)?.index_of(id) {
            Some(index) => self.remove_item(collection, index),
            None => Ok(None),
        }
    }

    /// Replaces every field of the entry at `index`, keeping its id.
    pub fn replace_item<I, K, V>(
        &mut self,
        collection: &str,
        index: usize,
        fields: I,
    ) -> PaperworkResult<bool>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let target = self.values.collection_mut(collection)?;
        let replaced = target.replace(index, fields);
        if let Some(id) = target.get(index).filter(|_| replaced).map(CollectionItem::id) {
            self.after_structure_change(
                collection,
                FormEvent::ItemReplaced {
                    collection: collection.to_string(),
                    id,
                },
            );
        }
        Ok(replaced)
    }

    /// Records a picked file on the entry at `index`.
    pub fn attach_file(
        &mut self,
        collection: &str,
        index: usize,
        file: FileRef,
    ) -> PaperworkResult<bool> {
        let target = self.values.collection_mut(collection)?;
        let attached = target.attach_file(index, file);
        if let Some(id) = target.get(index).filter(|_| attached).map(CollectionItem::id) {
            self.after_structure_change(
                collection,
                FormEvent::ItemReplaced {
                    collection: collection.to_string(),
                    id,
                },
            );
        }
        Ok(attached)
    }

    // ── Tables ───────────────────────────────────────────────────────

    /// Adds a dynamic column.
    ///
    /// A key that is empty, already registered, `id`, or the key of a source
    /// or derived column is a no-op.
    pub fn add_column(&mut self, table: &str, label: &str) -> PaperworkResult<bool> {
        let added = self.values.table_mut(table)?.add_column(label);
        if added {
            self.emit(FormEvent::ColumnAdded {
                table: table.to_string(),
                key: crate::table::ColumnRegistry::key_for(label),
            });
        }
        Ok(added)
    }

    /// Appends a blank row.
    pub fn add_row(&mut self, table: &str) -> PaperworkResult<ItemId> {
        let id = self.values.table_mut(table)?.add_row();
        self.after_structure_change(
            table,
            FormEvent::RowAdded {
                table: table.to_string(),
                id,
            },
        );
        Ok(id)
    }

    /// Removes the row at `index`. Out of range yields `Ok(None)`.
    pub fn remove_row(
        &mut self,
        table: &str,
        index: usize,
    ) -> PaperworkResult<Option<ComputedRow>> {
        let removed = self.values.table_mut(table)?.remove_row(index);
        if let Some(row) = &removed {
            self.after_structure_change(
                table,
                FormEvent::RowRemoved {
                    table: table.to_string(),
                    id: row.id,
                },
            );
        }
        Ok(removed)
    }

    /// Recomputes one row's derived cells. Out of range yields `Ok(false)`.
    pub fn recompute(&mut self, table: &str, index: usize) -> PaperworkResult<bool> {
        let recomputed = self.values.table_mut(table)?.recompute(index);
        if recomputed {
            self.emit(FormEvent::RowRecomputed {
                table: table.to_string(),
                index,
            });
            self.refresh_derived(table);
        }
        Ok(recomputed)
    }

    /// Recomputes every row of a table.
    pub fn recompute_all(&mut self, table: &str) -> PaperworkResult<()> {
        self.values.table_mut(table)?.recompute_all();
        self.refresh_derived(table);
        Ok(())
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Runs the full validation pipeline, replacing the current errors.
    ///
    /// Returns `true` if the form is valid.
    pub fn validate(&mut self) -> bool {
        self.errors = full_clean(&self.model, &self.values);
        let error_count = self.errors.len();
        self.emit(FormEvent::Validated { error_count });
        error_count == 0
    }

    /// The errors from the last validation, minus paths edited since.
    pub const fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// The errors shown for one path.
    ///
    /// The path is canonicalised first, so `signatures[0].name` and
    /// `signatures.0.name` read the same messages.
    pub fn errors_for(&self, path: &str) -> &[String] {
        match self.locate(path) {
            Ok((_, Some(location))) => self.errors.get(&location.path()),
            Ok((parsed, None)) => self.errors.get(&parsed.to_string()),
            Err(_) => self.errors.get(path),
        }
    }

    /// Returns `true` if no errors are currently recorded.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    // ── Output ───────────────────────────────────────────────────────

    /// A plain JSON object of every value.
    pub fn snapshot(&self) -> serde_json::Value {
        self.values.snapshot()
    }

    /// Validates, then hands the snapshot to `handler`.
    ///
    /// Submission is blocked while errors exist: the result is then a
    /// `PaperworkError::ValidationError` carrying every error by path.
    pub async fn submit(&mut self, handler: &dyn SubmitHandler) -> PaperworkResult<SubmitReceipt> {
        if !self.validate() {
            let error = self.errors.to_validation_error();
            self.span.in_scope(|| {
                tracing::info!(errors = error.field_count(), "submit blocked by validation errors");
            });
            return Err(PaperworkError::ValidationError(error));
        }

        let snapshot = self.snapshot();
        let receipt = SubmitReceipt::new(self.model.name(), &snapshot);
        handler
            .submit(self.model.name(), snapshot)
            .instrument(self.span.clone())
            .await?;

        self.span.in_scope(|| {
            tracing::info!(fields = receipt.field_count, "form submitted");
        });
        self.emit(FormEvent::Submitted {
            form: self.model.name().to_string(),
        });
        Ok(receipt)
    }

    /// Restores the initial values and clears every error.
    pub fn reset(&mut self) {
        self.values = self.model.initial_values();
        self.errors.clear();
        self.emit(FormEvent::Reset);
    }

    /// Renders the whole form in the context's mode.
    ///
    /// Fields, derived fields, collection entries and table cells are each
    /// rendered through the same [`FieldRenderer`], selected once for the pass.
    pub fn render(&self, ctx: &RenderContext) -> RenderedForm {
        let renderer = ctx.renderer();
        let mut fields = Vec::new();
        let mut body = String::new();

        let _ = write!(body, "<h1>{}</h1>", escape_html(self.model.form_title()));

        for def in self.model.fields() {
            let rendered = self.render_bound(renderer, ctx, def, def.name.clone());
            body.push_str(&rendered.html);
            fields.push(rendered);
        }

        for derived in self.model.derived_fields() {
            if self.model.field_def(&derived.target).is_some() {
                continue;
            }
            let text = self
                .values
                .scalar(&derived.target)
                .map(Value::to_form_text)
                .unwrap_or_default();
            let label = humanize_key(&derived.target);
            let rendered = renderer.render_readonly(&derived.target, &label, &text, ctx);
            body.push_str(&rendered.html);
            fields.push(rendered);
        }

        for spec in self.model.collections() {
            self.render_collection(renderer, ctx, spec, &mut body, &mut fields);
        }

        for spec in self.model.tables() {
            if let Ok(table) = self.values.table(&spec.name) {
                Self::render_table(renderer, ctx, table, &mut body, &mut fields);
            }
        }

        let mode_class = match ctx.mode() {
            RenderMode::Edit => "paperwork-form mode-edit",
            RenderMode::Print => "paperwork-form mode-print",
        };
        let html = match ctx.theme() {
            Some(theme) => {
                let published = theme.current();
                format!(
                    r#"<form class="{mode_class} {}" data-mode="{}" data-theme-revision="{}" style="{}">{body}</form>"#,
                    escape_html(&published.root_class()),
                    ctx.mode(),
                    published.revision,
                    escape_html(&published.root_style()),
                )
            }
            None => format!(
                r#"<form class="{mode_class}" data-mode="{}">{body}</form>"#,
                ctx.mode()
            ),
        };

        RenderedForm {
            mode: ctx.mode(),
            fields,
            html,
        }
    }

    fn render_bound(
        &self,
        renderer: &dyn FieldRenderer,
        ctx: &RenderContext,
        def: &FieldDef,
        path: String,
    ) -> RenderedField {
        let value = FieldPath::parse(&path)
            .and_then(|p| self.values.get(&p))
            .unwrap_or_default();
        let errors = self.errors.get(&path).to_vec();
        let bound = BoundField::new(def, path, value, errors);
        renderer.render_field(&bound, ctx)
    }

    fn render_collection(
        &self,
        renderer: &dyn FieldRenderer,
        ctx: &RenderContext,
        spec: &CollectionSpec,
        body: &mut String,
        fields: &mut Vec<RenderedField>,
    ) {
        let Ok(collection) = self.values.collection(&spec.name) else {
            return;
        };
        let _ = write!(
            body,
            r#"<section class="collection" data-collection="{}"><h2>{}</h2>"#,
            escape_html(&spec.name),
            escape_html(&spec.label)
        );
        if ctx.mode() == RenderMode::Edit {
            let messages = self.errors.get(&spec.name);
            if !messages.is_empty() {
                body.push_str(r#"<ul class="errorlist">"#);
                for message in messages {
                    let _ = write!(body, "<li>{}</li>", escape_html(message));
                }
                body.push_str("</ul>");
            }
        }
        for (index, item) in collection.iter().enumerate() {
            let _ = write!(body, r#"<div class="collection-item" data-id="{}">"#, item.id());
            for def in &spec.fields {
                let path = format!("{}.{index}.{}", spec.name, def.name);
                let rendered = self.render_bound(renderer, ctx, def, path);
                body.push_str(&rendered.html);
                fields.push(rendered);
            }
            body.push_str("</div>");
        }
        body.push_str("</section>");
    }

    fn render_table(
        renderer: &dyn FieldRenderer,
        ctx: &RenderContext,
        table: &ComputedTable,
        body: &mut String,
        fields: &mut Vec<RenderedField>,
    ) {
        let spec = table.spec();
        let static_columns = spec.columns();
        let derived_columns = spec.derived_columns();

        let _ = write!(
            body,
            r#"<table class="computed-table" data-table="{}"><caption>{}</caption><thead><tr>"#,
            escape_html(&spec.name),
            escape_html(&spec.label)
        );
        for column in &static_columns {
            let _ = write!(body, "<th>{}</th>", escape_html(&column.label));
        }
        for column in &derived_columns {
            let _ = write!(body, "<th>{}</th>", escape_html(&column.label));
        }
        for column in table.columns().iter() {
            let _ = write!(body, "<th>{}</th>", escape_html(&column.label));
        }
        body.push_str("</tr></thead><tbody>");

        for (index, row) in table.rows().iter().enumerate() {
            let _ = write!(body, r#"<tr data-id="{}">"#, row.id);
            for column in &static_columns {
                let def = if column.key == spec.actual_key || column.key == spec.comparator_key {
                    FieldDef::number(column.key.as_str())
                } else {
                    FieldDef::text(column.key.as_str())
                }
                .label(column.label.as_str());
                let path = format!("{}.{index}.{}", spec.name, column.key);
                let value = row.source.get(&column.key).cloned().unwrap_or_default();
                let bound = BoundField::new(&def, path, value, Vec::new());
                push_cell(body, fields, renderer.render_field(&bound, ctx));
            }
            for column in &derived_columns {
                let path = format!("{}.{index}.{}", spec.name, column.key);
                let text = row.derived.get(&column.key).cloned().unwrap_or_default();
                push_cell(body, fields, renderer.render_readonly(&path, &column.label, &text, ctx));
            }
            for column in table.columns().iter() {
                let def = FieldDef::text(column.key.as_str()).label(column.label.as_str());
                let path = format!("{}.{index}.{}", spec.name, column.key);
                let value = row.dynamic.get(&column.key).cloned().unwrap_or_default();
                let bound = BoundField::new(&def, path, value, Vec::new());
                push_cell(body, fields, renderer.render_field(&bound, ctx));
            }
            body.push_str("</tr>");
        }
        body.push_str("</tbody></table>");
    }
}

fn push_cell(body: &mut String, fields: &mut Vec<RenderedField>, rendered: RenderedField) {
    let _ = write!(body, "<td>{}</td>", rendered.html);
    fields.push(rendered);
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::collection::CollectionKind;
    use crate::derived::DerivedField;
    use crate::table::TableSpec;

    fn model() -> FormModel {
        FormModel::new("expenseReport")
            .field(FieldDef::text("employeeName").required(true))
            .field(FieldDef::number("advance"))
            .collection(CollectionSpec::new("attachments", CollectionKind::Attachments))
            .table(TableSpec::new("costs").source_column("item", "Item").with_initial_rows(1))
            .derived(DerivedField::join_collection(
                "attachmentNames",
                "attachments",
                "fileName",
                ", ",
            ))
            .derived(DerivedField::table_total("totalVariance", "costs", "variance"))
    }

    fn form() -> FormOrchestrator {
        FormOrchestrator::with_settings(model(), &Settings::default())
    }

    #[test]
    fn test_get_and_set_scalar() {
        let mut f = form();
        assert!(f.set("employeeName", "Ada").unwrap());
        assert_eq!(f.get("employeeName").unwrap(), Value::from("Ada"));
        assert!(f.get("bad path!").is_err());
    }

    #[test]
    fn test_set_derived_is_rejected() {
        let mut f = form();
        assert!(matches!(
            f.set("attachmentNames", "x"),
            Err(PaperworkError::ReadOnlyField(_))
        ));
    }

    #[test]
    fn test_input_parses_by_kind() {
        let mut f = form();
        f.input("advance", "250").unwrap();
        assert_eq!(f.get("advance").unwrap(), Value::Int(250));
        f.input("costs.0.actual", "12.5").unwrap();
        assert_eq!(f.get("costs.0.actual").unwrap(), Value::Float(12.5));
        f.input("costs.0.item", "Travel").unwrap();
        assert_eq!(f.get("costs.0.item").unwrap(), Value::from("Travel"));
    }

    #[test]
    fn test_blur_recomputes_and_refreshes_total() {
        let mut f = form();
        f.input("costs.0.actual", "120").unwrap();
        f.input("costs.0.budget", "100").unwrap();
        assert_eq!(f.get("costs.0.variance").unwrap(), Value::from(""));
        assert!(!f.blur("costs.0.item").unwrap());
        assert!(f.blur("costs.0.actual").unwrap());
        assert_eq!(f.get("costs.0.variance").unwrap(), Value::from("20.00"));
        assert_eq!(f.get("totalVariance").unwrap(), Value::Float(20.0));
    }

    #[test]
    fn test_collection_changes_refresh_derived() {
        let mut f = form();
        f.add_item("attachments", [("fileName", "a.pdf")]).unwrap();
        f.add_blank_item("attachments").unwrap();
        f.attach_file("attachments", 1, FileRef::new("b.pdf", "application/pdf", 3))
            .unwrap();
        assert_eq!(f.get("attachmentNames").unwrap(), Value::from("a.pdf, b.pdf"));

        f.remove_item("attachments", 0).unwrap();
        assert_eq!(f.get("attachmentNames").unwrap(), Value::from("b.pdf"));

        f.set("attachments.0.fileName", "c.pdf").unwrap();
        assert_eq!(f.get("attachmentNames").unwrap(), Value::from("c.pdf"));
    }

    #[test]
    fn test_unknown_collection_is_error() {
        let mut f = form();
        assert!(matches!(
            f.add_blank_item("nope"),
            Err(PaperworkError::UnknownCollection(_))
        ));
        assert!(matches!(f.add_row("nope"), Err(PaperworkError::UnknownTable(_))));
    }

    #[test]
    fn test_validate_and_clear_on_edit() {
        let mut f = form();
        assert!(!f.validate());
        assert_eq!(f.errors_for("employeeName"), ["This field is required."]);
        f.set("employeeName", "Ada").unwrap();
        assert!(f.errors_for("employeeName").is_empty());
        assert!(f.is_valid());
    }

    #[test]
    fn test_events_are_published() {
        let mut f = form();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        f.subscribe(
            "test",
            Arc::new(move |event: &FormEvent| sink.lock().unwrap().push(event.clone())),
        );
        let id = f.add_blank_item("attachments").unwrap();
        f.add_column("costs", "Region").unwrap();
        f.reset();

        let seen = seen.lock().unwrap();
        assert!(seen.contains(&FormEvent::ItemAdded {
            collection: "attachments".into(),
            id
        }));
        assert!(seen.contains(&FormEvent::ColumnAdded {
            table: "costs".into(),
            key: "Region".into()
        }));
        assert_eq!(seen.last(), Some(&FormEvent::Reset));
    }

    #[test]
    fn test_reset_restores_initial_values() {
        let mut f = form();
        f.set("employeeName", "Ada").unwrap();
        f.add_row("costs").unwrap();
        f.validate();
        f.reset();
        assert_eq!(f.get("employeeName").unwrap(), Value::Null);
        assert_eq!(f.values().table("costs").unwrap().len(), 1);
        assert!(f.errors().is_empty());
    }

    #[test]
    fn test_render_table_headers_and_cells() {
        let mut f = form();
        f.add_column("costs", "Cost Center").unwrap();
        let rendered = f.render(&RenderContext::edit());
        assert!(rendered.html.contains("<th>Item</th>"));
        assert!(rendered.html.contains("<th>Cost Center</th>"));
        assert!(rendered.field("costs.0.CostCenter").is_some());
        assert!(rendered.field("costs.0.variancePercent").is_some());
        assert!(rendered.html.contains(r#"data-mode="edit""#));
    }
}
