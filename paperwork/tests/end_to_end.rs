//! End-to-end tests through the facade crate: settings, theme, form
//! lifecycle and submission, the way an embedding application wires them.

use std::sync::{Arc, Mutex};

use paperwork::core::settings_loader;
use paperwork::prelude::*;
use paperwork::theme::PublishedTheme;

fn expense_report() -> FormModel {
    FormModel::new("expenseReport")
        .title("Expense report")
        .field(FieldDef::text("employeeName").required(true))
        .field(FieldDef::email("contactEmail"))
        .collection(CollectionSpec::new("attachments", CollectionKind::Attachments))
        .table(
            TableSpec::new("costs")
                .source_column("category", "Category")
                .with_initial_rows(2),
        )
        .derived(DerivedField::join_collection(
            "attachmentFileNames",
            "attachments",
            "fileName",
            "; ",
        ))
        .derived(DerivedField::table_total("totalVariance", "costs", "variance"))
}

#[tokio::test]
async fn test_full_session() -> anyhow::Result<()> {
    let settings = settings_loader::from_toml_str(
        r#"
        print_placeholder = "(none)"
        log_level = "paperwork_forms=debug"
        "#,
    )?;
    setup_logging(&settings);

    let mut theme = ThemeRuntime::from_settings(&settings)?;
    let mut form = FormOrchestrator::with_settings(expense_report(), &settings);

    form.input("employeeName", "Ada Lovelace")?;
    form.input("contactEmail", "ada@example.org")?;
    form.add_blank_item("attachments")?;
    form.attach_file(
        "attachments",
        0,
        FileRef::new("receipt.pdf", "application/pdf", 4096),
    )?;

    for (row, (actual, budget)) in [("120", "100"), ("45", "50")].into_iter().enumerate() {
        form.input(&format!("costs.{row}.actual"), actual)?;
        form.input(&format!("costs.{row}.budget"), budget)?;
        form.blur(&format!("costs.{row}.budget"))?;
    }
    assert_eq!(form.get("costs.1.variance")?, Value::from("-5.00"));
    assert_eq!(form.get("costs.1.variancePercent")?, Value::from("-10.00"));
    assert_eq!(form.get("totalVariance")?, Value::Float(15.0));
    assert_eq!(form.get("attachmentFileNames")?, Value::from("receipt.pdf"));

    theme.update_setting(ThemeCategory::Density, "compact")?;
    let print = form.render(
        &RenderContext::from_settings(RenderMode::Print, &settings).with_theme(theme.handle()),
    );
    assert!(print.html.contains("--spacing-unit: 4px"));
    assert_eq!(print.field("costs.0.category").map(|f| f.display.as_str()), Some("(none)"));

    let receipt = form.submit(&LoggingSubmitHandler).await?;
    assert_eq!(receipt.form, "expenseReport");
    Ok(())
}

#[test]
fn test_theme_changes_reach_every_handle() -> anyhow::Result<()> {
    let mut theme = ThemeRuntime::new();
    let header = theme.handle();
    let footer = theme.handle();
    let revisions = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&revisions);
    header.subscribe(
        "header",
        Arc::new(move |published: &PublishedTheme| sink.lock().unwrap().push(published.revision)),
    );

    theme.update_setting(ThemeCategory::Color, "teal")?;
    assert_eq!(footer.variable("--primary-color").as_deref(), Some("#0f766e"));
    assert!(theme.update_setting(ThemeCategory::Color, "magenta").is_err());
    theme.reset();
    assert_eq!(footer.variable("--primary-color").as_deref(), Some("#1e40af"));
    assert_eq!(*revisions.lock().unwrap(), vec![1, 2]);
    Ok(())
}

#[test]
fn test_invalid_email_blocks_until_fixed() -> anyhow::Result<()> {
    let mut form = FormOrchestrator::with_settings(expense_report(), &Settings::default());
    form.input("employeeName", "Ada")?;
    form.input("contactEmail", "not-an-email")?;
    assert!(!form.validate());
    assert_eq!(form.errors_for("contactEmail"), ["Enter a valid email address."]);

    form.input("contactEmail", "ada@example.org")?;
    assert!(form.errors_for("contactEmail").is_empty());
    assert!(form.validate());
    Ok(())
}
