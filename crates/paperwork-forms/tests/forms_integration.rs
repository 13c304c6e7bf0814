//! Integration tests for the form runtime.
//!
//! These tests drive a complete personnel-action form through the
//! orchestrator, covering:
//! 1. Collection identity across add/remove/replace
//! 2. Computed table triggers and dynamic columns
//! 3. Edit/Print parity and themed rendering
//! 4. Validation and the async submit boundary

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use paperwork_core::{FileRef, ItemId, PaperworkError, PaperworkResult, Settings, Value};
use paperwork_forms::collection::{CollectionKind, CollectionSpec};
use paperwork_forms::derived::DerivedField;
use paperwork_forms::fields::FieldDef;
use paperwork_forms::model::FormModel;
use paperwork_forms::orchestrator::FormOrchestrator;
use paperwork_forms::render::{RenderContext, RenderMode};
use paperwork_forms::submit::{LoggingSubmitHandler, SubmitHandler};
use paperwork_forms::table::TableSpec;
use paperwork_theme::{ThemeCategory, ThemeRuntime};

// ============================================================================
// Shared helpers
// ============================================================================

fn personnel_action() -> FormModel {
    FormModel::new("personnelAction")
        .title("Personnel action")
        .field(FieldDef::text("employeeName").required(true))
        .field(FieldDef::date("effectiveDate"))
        .field(FieldDef::choice(
            "action",
            [("hire", "New hire"), ("transfer", "Transfer")],
        ))
        .field(FieldDef::checkbox("certified"))
        .collection(CollectionSpec::new("attachments", CollectionKind::Attachments))
        .collection(CollectionSpec::new("customFields", CollectionKind::CustomFields))
        .collection(
            CollectionSpec::new("signatures", CollectionKind::Signatures)
                .field(FieldDef::text("name").required(true))
                .with_min_items(1),
        )
        .table(
            TableSpec::new("revenue")
                .source_column("category", "Category")
                .with_initial_rows(1),
        )
        .derived(DerivedField::join_collection(
            "attachmentFileNames",
            "attachments",
            "fileName",
            ", ",
        ))
}

fn form() -> FormOrchestrator {
    FormOrchestrator::with_settings(personnel_action(), &Settings::default())
}

fn fill_required(f: &mut FormOrchestrator) {
    f.set("employeeName", "Ada Lovelace").unwrap();
    f.set("signatures.0.name", "Grace Hopper").unwrap();
}

/// Records every snapshot it receives.
#[derive(Default)]
struct RecordingHandler {
    received: Mutex<Vec<(String, serde_json::Value)>>,
}

#[async_trait]
impl SubmitHandler for RecordingHandler {
    async fn submit(&self, form_name: &str, snapshot: serde_json::Value) -> PaperworkResult<()> {
        self.received
            .lock()
            .unwrap()
            .push((form_name.to_string(), snapshot));
        Ok(())
    }
}

/// Rejects every submission.
struct FailingHandler;

#[async_trait]
impl SubmitHandler for FailingHandler {
    async fn submit(&self, _form_name: &str, _snapshot: serde_json::Value) -> PaperworkResult<()> {
        Err(PaperworkError::SubmitFailed("service unavailable".into()))
    }
}

// ============================================================================
// 1. Collections
// ============================================================================

#[test]
fn test_collection_ids_are_unique() {
    let mut f = form();
    let ids: HashSet<ItemId> = (0..25)
        .map(|i| f.add_item("customFields", [("label", format!("L{i}"))]).unwrap())
        .collect();
    assert_eq!(ids.len(), 25);
    assert_eq!(f.values().collection("customFields").unwrap().len(), 25);
}

#[test]
fn test_remove_then_add_holds_exactly_the_seed() {
    let mut f = form();
    f.add_item("customFields", [("label", "Region"), ("value", "EMEA")])
        .unwrap();
    f.remove_item("customFields", 0).unwrap();
    f.add_item("customFields", [("label", "Grade")]).unwrap();

    let item = f.values().collection("customFields").unwrap().get(0).unwrap().clone();
    assert_eq!(item.fields().len(), 1);
    assert_eq!(item.get("label"), Some(&Value::from("Grade")));
    assert_eq!(f.get("customFields.0.value").unwrap(), Value::Null);
}

#[test]
fn test_id_paths_survive_earlier_removals() {
    let mut f = form();
    f.add_item("customFields", [("label", "A")]).unwrap();
    let id = f.add_item("customFields", [("label", "B")]).unwrap();
    let by_id = format!("customFields.@{id}.label");

    f.remove_item("customFields", 0).unwrap();
    assert_eq!(f.get(&by_id).unwrap(), Value::from("B"));
    f.set(&by_id, "B2").unwrap();
    assert_eq!(f.get("customFields.0.label").unwrap(), Value::from("B2"));
    assert!(f.remove_item_id("customFields", id).unwrap().is_some());
    assert!(f.remove_item_id("customFields", id).unwrap().is_none());
}

#[test]
fn test_out_of_range_collection_operations_are_noops() {
    let mut f = form();
    assert!(f.remove_item("attachments", 3).unwrap().is_none());
    assert!(!f.replace_item("attachments", 3, [("fileName", "x")]).unwrap());
    assert!(!f.set("attachments.3.fileName", "x").unwrap());
    assert!(f.values().collection("attachments").unwrap().is_empty());
}

#[test]
fn test_replace_keeps_identity() {
    let mut f = form();
    let id = f.add_item("customFields", [("label", "Old"), ("value", "1")]).unwrap();
    assert!(f.replace_item("customFields", 0, [("label", "New")]).unwrap());
    let c = f.values().collection("customFields").unwrap();
    assert_eq!(c.get(0).unwrap().id(), id);
    assert!(c.get(0).unwrap().get("value").is_none());
}

#[test]
fn test_attachment_file_names_follow_structure() {
    let mut f = form();
    f.add_blank_item("attachments").unwrap();
    f.attach_file("attachments", 0, FileRef::new("offer.pdf", "application/pdf", 10))
        .unwrap();
    f.add_blank_item("attachments").unwrap();
    f.attach_file("attachments", 1, FileRef::new("id.png", "image/png", 20))
        .unwrap();

    assert_eq!(f.get("attachments.1.fileType").unwrap(), Value::from("image/png"));
    assert_eq!(
        f.get("attachmentFileNames").unwrap(),
        Value::from("offer.pdf, id.png")
    );
    f.remove_item("attachments", 0).unwrap();
    assert_eq!(f.get("attachmentFileNames").unwrap(), Value::from("id.png"));
}

// ============================================================================
// 2. Computed tables
// ============================================================================

#[test]
fn test_variance_over_budget() {
    let mut f = form();
    f.input("revenue.0.actual", "120").unwrap();
    f.input("revenue.0.budget", "100").unwrap();
    f.blur("revenue.0.budget").unwrap();
    assert_eq!(f.get("revenue.0.variance").unwrap(), Value::from("20.00"));
    assert_eq!(f.get("revenue.0.variancePercent").unwrap(), Value::from("20.00"));
}

#[test]
fn test_variance_with_zero_budget() {
    let mut f = form();
    f.input("revenue.0.actual", "80").unwrap();
    f.input("revenue.0.budget", "0").unwrap();
    f.blur("revenue.0.actual").unwrap();
    assert_eq!(f.get("revenue.0.variance").unwrap(), Value::from("80.00"));
    assert_eq!(f.get("revenue.0.variancePercent").unwrap(), Value::from("0.00"));
}

#[test]
fn test_derived_cells_stale_until_blur() {
    let mut f = form();
    f.input("revenue.0.actual", "50").unwrap();
    f.blur("revenue.0.actual").unwrap();
    f.input("revenue.0.actual", "75").unwrap();
    assert_eq!(f.get("revenue.0.variance").unwrap(), Value::from("50.00"));
    f.blur("revenue.0.actual").unwrap();
    assert_eq!(f.get("revenue.0.variance").unwrap(), Value::from("75.00"));
}

#[test]
fn test_derived_cells_are_read_only() {
    let mut f = form();
    assert!(matches!(
        f.set("revenue.0.variance", "1.00"),
        Err(PaperworkError::ReadOnlyField(_))
    ));
}

#[test]
fn test_duplicate_column_labels_collapse() {
    let mut f = form();
    assert!(f.add_column("revenue", "Region").unwrap());
    assert!(!f.add_column("revenue", "Region ").unwrap());
    assert_eq!(f.values().table("revenue").unwrap().columns().len(), 1);

    f.add_row("revenue").unwrap();
    assert_eq!(f.get("revenue.1.Region").unwrap(), Value::Null);
    assert!(f.set("revenue.1.Region", "APAC").unwrap());
}

#[test]
fn test_columns_cannot_shadow_declared_cells() {
    let mut f = form();
    f.input("revenue.0.actual", "120").unwrap();
    assert!(!f.add_column("revenue", "actual").unwrap());
    assert!(!f.add_column("revenue", "category").unwrap());
    assert!(!f.add_column("revenue", "variance").unwrap());
    assert!(!f.add_column("revenue", "variance Percent").unwrap());
    assert!(f.values().table("revenue").unwrap().columns().is_empty());

    let print = f.render(&RenderContext::print());
    let actual: Vec<_> = print
        .fields
        .iter()
        .filter(|field| field.path == "revenue.0.actual")
        .collect();
    assert_eq!(actual.len(), 1);
    assert_eq!(actual[0].bound_value, "120");
    assert_eq!(
        print
            .fields
            .iter()
            .filter(|field| field.path == "revenue.0.variance")
            .count(),
        1
    );
}

#[test]
fn test_free_form_column_labels_are_addressable() {
    let mut f = form();
    for label in ["2024", "Cost %", "Région", "Q1.5"] {
        assert!(f.add_column("revenue", label).unwrap(), "label {label}");
    }
    for key in ["2024", "Cost%", "Région", "Q15"] {
        let path = format!("revenue.0.{key}");
        assert!(f.input(&path, "5").unwrap(), "path {path}");
        assert_eq!(f.get(&path).unwrap(), Value::Int(5));
        assert!(!f.blur(&path).unwrap());
        assert!(f.errors_for(&path).is_empty());
    }

    let edit = f.render(&RenderContext::edit());
    let cell = edit.field("revenue.0.2024").unwrap();
    assert_eq!(cell.bound_value, "5");
    assert!(cell.html.contains(r#"name="revenue.0.2024""#));
    assert_eq!(f.snapshot()["revenue"][0]["Cost%"], 5);
}

// ============================================================================
// 3. Rendering
// ============================================================================

#[test]
fn test_edit_and_print_show_the_same_values() {
    let mut f = form();
    fill_required(&mut f);
    f.input("effectiveDate", "2024-07-01").unwrap();
    f.set("action", "transfer").unwrap();
    f.set("certified", true).unwrap();
    f.add_item("customFields", [("label", "Grade"), ("value", "7")]).unwrap();
    f.input("revenue.0.actual", "120").unwrap();
    f.input("revenue.0.budget", "100").unwrap();
    f.blur("revenue.0.actual").unwrap();
    f.add_column("revenue", "Cost Center").unwrap();
    f.add_column("revenue", "2024").unwrap();
    f.add_row("revenue").unwrap();
    f.input("revenue.0.CostCenter", "R&D").unwrap();
    f.input("revenue.1.2024", "42").unwrap();

    let edit = f.render(&RenderContext::edit());
    let print = f.render(&RenderContext::print());
    assert_eq!(edit.fields.len(), print.fields.len());
    for (e, p) in edit.fields.iter().zip(&print.fields) {
        assert_eq!(e.path, p.path);
        assert_eq!(e.bound_value, p.bound_value, "path {}", e.path);
        if !p.bound_value.trim().is_empty() {
            assert_eq!(p.display, p.bound_value);
        }
    }
    for rendered in [&edit, &print] {
        let mut seen = HashSet::new();
        for field in &rendered.fields {
            assert!(seen.insert(field.path.as_str()), "duplicate path {}", field.path);
            let value = f.get(&field.path).unwrap();
            assert_eq!(field.bound_value, value.to_form_text(), "path {}", field.path);
        }
    }
    assert_eq!(print.field("revenue.0.CostCenter").unwrap().display, "R&D");
    assert_eq!(print.field("revenue.1.2024").unwrap().display, "42");
    assert_eq!(print.field("revenue.0.variance").unwrap().display, "20.00");
    assert_eq!(print.field("customFields.0.value").unwrap().display, "7");
}

#[test]
fn test_print_uses_placeholder_and_hides_errors() {
    let mut f = form();
    f.validate();
    let edit = f.render(&RenderContext::edit());
    assert!(edit.html.contains("errorlist"));

    let print = f.render(&RenderContext::from_settings(
        RenderMode::Print,
        &Settings {
            print_placeholder: "(blank)".into(),
            ..Settings::default()
        },
    ));
    assert!(!print.html.contains("errorlist"));
    assert_eq!(print.field("employeeName").unwrap().display, "(blank)");
    assert!(!print.html.contains("<input"));
}

#[test]
fn test_themed_render_carries_variables() {
    let mut theme = ThemeRuntime::new();
    let handle = theme.handle();
    theme.update_setting(ThemeCategory::Color, "teal").unwrap();
    theme.set_dark_mode(true);

    let f = form();
    let html = f.render(&RenderContext::print().with_theme(handle)).html;
    assert!(html.contains("--primary-color: #0f766e"));
    assert!(html.contains("theme-dark"));
    assert!(html.contains(r#"data-theme-revision="2""#));
}

// ============================================================================
// 4. Validation and submit
// ============================================================================

#[test]
fn test_validation_errors_keyed_by_path() {
    let mut f = form();
    f.add_blank_item("signatures").unwrap();
    f.set("signatures.1.name", "Someone").unwrap();
    assert!(!f.validate());
    assert_eq!(f.errors_for("employeeName"), ["This field is required."]);
    assert_eq!(f.errors_for("signatures[0].name"), ["This field is required."]);
    assert!(f.errors_for("signatures.1.name").is_empty());
}

#[test]
fn test_min_items_reported_on_collection() {
    let mut f = form();
    f.remove_item("signatures", 0).unwrap();
    f.validate();
    assert_eq!(f.errors_for("signatures"), ["Please submit at least 1 entries."]);
}

#[tokio::test]
async fn test_submit_blocked_while_errors_exist() {
    let mut f = form();
    let handler = RecordingHandler::default();
    let err = f.submit(&handler).await.unwrap_err();
    match err {
        PaperworkError::ValidationError(ve) => {
            assert!(ve.field_errors.contains_key("employeeName"));
            assert!(ve.field_errors.contains_key("signatures.0.name"));
        }
        other => panic!("expected a validation error, got {other:?}"),
    }
    assert!(handler.received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_hands_snapshot_to_handler() {
    let mut f = form();
    fill_required(&mut f);
    f.add_item("customFields", [("label", "Grade"), ("value", "7")]).unwrap();
    let handler = RecordingHandler::default();

    let receipt = f.submit(&handler).await.unwrap();
    assert_eq!(receipt.form, "personnelAction");

    let received = handler.received.lock().unwrap();
    assert_eq!(received.len(), 1);
    let (name, snapshot) = &received[0];
    assert_eq!(name, "personnelAction");
    assert_eq!(snapshot["employeeName"], "Ada Lovelace");
    assert_eq!(snapshot["customFields"][0]["value"], "7");
    assert!(snapshot["customFields"][0]["id"].is_string());
    assert_eq!(snapshot["revenue"][0]["variance"], "");
    assert_eq!(receipt.field_count, snapshot.as_object().unwrap().len());
}

#[tokio::test]
async fn test_submit_failure_propagates() {
    let mut f = form();
    fill_required(&mut f);
    let err = f.submit(&FailingHandler).await.unwrap_err();
    assert!(matches!(err, PaperworkError::SubmitFailed(_)));
}

#[tokio::test]
async fn test_logging_handler_and_events() {
    let mut f = form();
    fill_required(&mut f);
    let submitted = Arc::new(Mutex::new(0_usize));
    let counter = Arc::clone(&submitted);
    f.subscribe(
        "count-submits",
        Arc::new(move |event: &paperwork_forms::FormEvent| {
            if matches!(event, paperwork_forms::FormEvent::Submitted { .. }) {
                *counter.lock().unwrap() += 1;
            }
        }),
    );
    f.submit(&LoggingSubmitHandler).await.unwrap();
    assert_eq!(*submitted.lock().unwrap(), 1);
}
