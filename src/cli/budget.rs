use super::ui;
use crate::api::budget::BudgetSummary;
use crate::context::AppContext;
use crate::core::format;
use crate::i18n::Catalog;
use anyhow::Result;
use chrono::{Datelike, Utc};

pub async fn run(ctx: &AppContext, year: Option<u16>) -> Result<()> {
    let (_auth, catalog) = super::ready_with_fallback(ctx).await?;
    let service = ctx.budget_service();
    let year = year.unwrap_or_else(|| Utc::now().year() as u16);

    super::drive(
        catalog,
        || service.fetch_summary(year),
        |summary| println!("{}", render(summary, catalog)),
    )
    .await
}

fn render(summary: &BudgetSummary, catalog: &Catalog) -> String {
    let currency = &summary.currency;

    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(catalog.t("page.budget.category")),
        ui::header_cell(catalog.t("page.budget.allocated")),
        ui::header_cell(catalog.t("page.budget.spent")),
        ui::header_cell(catalog.t("page.budget.remaining")),
    ]);

    for category in &summary.categories {
        let remaining = category.allocated - category.spent;
        table.add_row(vec![
            comfy_table::Cell::new(&category.name),
            ui::amount_cell(format::currency(category.allocated, currency)),
            ui::amount_cell(format::currency(category.spent, currency)),
            ui::amount_cell(format::currency(remaining, currency)),
        ]);
    }

    let title = format!("{} {}", catalog.t("page.budget.title"), summary.year);
    let total = format!(
        "{} ({currency}): {} / {}",
        ui::style_text(catalog.t("page.total"), ui::StyleType::TotalLabel),
        ui::style_text(
            &format::currency(summary.total_spent(), currency),
            ui::StyleType::TotalValue
        ),
        format::currency(summary.total_allocated(), currency),
    );

    format!(
        "{}\n\n{}\n\n{}",
        ui::style_text(&title, ui::StyleType::Title),
        table,
        total
    )
}
