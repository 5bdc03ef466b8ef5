use super::ui;
use crate::api::investments::{self, Holding};
use crate::context::AppContext;
use crate::core::format;
use crate::i18n::Catalog;
use anyhow::Result;
use std::collections::BTreeMap;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let (_auth, catalog) = super::ready_with_fallback(ctx).await?;
    let client = ctx.client();

    super::drive(
        catalog,
        || investments::fetch_holdings(&client),
        |holdings| println!("{}", render(holdings, catalog)),
    )
    .await
}

fn render(holdings: &[Holding], catalog: &Catalog) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(catalog.t("page.investments.holding")),
        ui::header_cell(catalog.t("page.investments.units")),
        ui::header_cell(catalog.t("page.investments.price")),
        ui::header_cell(catalog.t("page.investments.value")),
        ui::header_cell(catalog.t("page.investments.change")),
    ]);

    // Holdings can span currencies; totals are kept per currency.
    let mut totals: BTreeMap<&str, f64> = BTreeMap::new();
    for holding in holdings {
        let display_name = holding.name.as_deref().unwrap_or(&holding.symbol);
        table.add_row(vec![
            comfy_table::Cell::new(display_name),
            ui::amount_cell(format!("{:.2}", holding.units)),
            ui::amount_cell(format::currency(holding.price, &holding.currency)),
            ui::amount_cell(format::currency(holding.value(), &holding.currency)),
            ui::change_cell(holding.change_pct),
        ]);
        *totals.entry(holding.currency.as_str()).or_default() += holding.value();
    }

    let totals_line = totals
        .iter()
        .map(|(currency, total)| {
            ui::style_text(&format::currency(*total, currency), ui::StyleType::TotalValue)
        })
        .collect::<Vec<_>>()
        .join(" + ");

    format!(
        "{}\n\n{}\n\n{}: {}",
        ui::style_text(catalog.t("page.investments.title"), ui::StyleType::Title),
        table,
        ui::style_text(catalog.t("page.total"), ui::StyleType::TotalLabel),
        totals_line
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_totals_per_currency() {
        let holdings = vec![
            Holding {
                symbol: "VWCE".to_string(),
                name: Some("FTSE All-World".to_string()),
                units: 10.0,
                price: 100.0,
                currency: "EUR".to_string(),
                change_pct: Some(1.5),
            },
            Holding {
                symbol: "AAPL".to_string(),
                name: None,
                units: 2.0,
                price: 190.0,
                currency: "USD".to_string(),
                change_pct: None,
            },
        ];

        let catalog = Catalog::load("en");
        let output = render(&holdings, &catalog);

        assert!(output.contains("FTSE All-World"));
        // Unnamed holdings fall back to their symbol.
        assert!(output.contains("AAPL"));
        assert!(output.contains("€1,000.00"));
        assert!(output.contains("$380.00"));
    }
}
