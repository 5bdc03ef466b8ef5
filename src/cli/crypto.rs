use super::ui;
use crate::api::crypto::{self, CryptoAsset};
use crate::context::AppContext;
use crate::core::format;
use crate::i18n::Catalog;
use anyhow::Result;

pub async fn run(ctx: &AppContext) -> Result<()> {
    let (_auth, catalog) = super::ready_with_fallback(ctx).await?;
    let client = ctx.client();

    super::drive(
        catalog,
        || crypto::fetch_assets(&client),
        |assets| println!("{}", render(assets, catalog)),
    )
    .await
}

fn render(assets: &[CryptoAsset], catalog: &Catalog) -> String {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell(catalog.t("page.crypto.asset")),
        ui::header_cell(catalog.t("page.crypto.price")),
        ui::header_cell(catalog.t("page.crypto.change_24h")),
        ui::header_cell(catalog.t("page.crypto.value")),
    ]);

    let mut total = 0.0;
    let mut any_held = false;
    for asset in assets {
        let display_name = asset.name.as_deref().unwrap_or(&asset.symbol);
        let value_cell = match asset.value() {
            Some(value) => {
                total += value;
                any_held = true;
                ui::amount_cell(format::currency(value, "USD"))
            }
            None => ui::change_cell(None),
        };
        table.add_row(vec![
            comfy_table::Cell::new(display_name),
            ui::amount_cell(format::currency(asset.price, "USD")),
            ui::change_cell(asset.change_24h),
            value_cell,
        ]);
    }

    let mut output = format!(
        "{}\n\n{}",
        ui::style_text(catalog.t("page.crypto.title"), ui::StyleType::Title),
        table
    );
    if any_held {
        output.push_str(&format!(
            "\n\n{}: {}",
            ui::style_text(catalog.t("page.total"), ui::StyleType::TotalLabel),
            ui::style_text(&format::currency(total, "USD"), ui::StyleType::TotalValue)
        ));
    }
    output
}
