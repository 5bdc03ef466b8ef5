use super::ui;
use crate::api::market::{self, Quote};
use crate::context::AppContext;
use crate::i18n::Catalog;
use anyhow::Result;

pub async fn run(ctx: &AppContext, symbols: Vec<String>) -> Result<()> {
    let (_auth, catalog) = super::ready_with_fallback(ctx).await?;
    let client = ctx.client();

    super::drive(
        catalog,
        || market::fetch_quotes(&client, &symbols),
        |quotes| println!("{}", render(quotes, catalog)),
    )
    .await
}

fn render(quotes: &[Quote], catalog: &Catalog) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(catalog.t("page.market.symbol")),
        ui::header_cell(catalog.t("page.market.price")),
        ui::header_cell(catalog.t("page.market.change")),
    ]);

    for quote in quotes {
        table.add_row(vec![
            comfy_table::Cell::new(&quote.symbol),
            ui::amount_cell(crate::core::format::currency(quote.price, &quote.currency)),
            ui::change_cell(quote.change_pct),
        ]);
    }

    format!(
        "{}\n\n{}",
        ui::style_text(catalog.t("page.market.title"), ui::StyleType::Title),
        table
    )
}
