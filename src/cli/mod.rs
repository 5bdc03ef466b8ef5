//! Page commands.
//!
//! Every page follows the same shape: bring the shared providers up
//! (showing a fallback while they load), fetch through the typed API
//! layer while tracking a local tri-state, then either render a table or
//! show the error with a manual retry prompt. There is no automatic
//! retry and no backoff; the user drives every re-fetch.

pub mod budget;
pub mod crypto;
pub mod investments;
pub mod login;
pub mod market;
pub mod setup;
pub mod ui;

use crate::context::{AppContext, AuthContext, RequestSeq};
use crate::core::envelope::ApiError;
use crate::i18n::Catalog;
use anyhow::Result;
use console::Term;
use std::future::Future;

/// Local fetch state of one page.
pub enum PageState<T> {
    Loading,
    Error(ApiError),
    Ready(T),
}

/// Brings the provider tree to `Ready`, rendering a spinner fallback
/// while it loads. The fallback text cannot come from the catalog, which
/// by definition is not ready yet.
pub(crate) async fn ready_with_fallback(ctx: &AppContext) -> Result<(&AuthContext, &Catalog)> {
    let spinner = ui::new_spinner("Preparing dashboard...");
    let result = ctx.ready().await;
    spinner.finish_and_clear();
    result
}

/// Fetch-render loop: one fetch per user decision, newest ticket wins.
pub(crate) async fn drive<T, Fut, FetchFn, RenderFn>(
    catalog: &Catalog,
    mut fetch: FetchFn,
    render: RenderFn,
) -> Result<()>
where
    Fut: Future<Output = Result<T, ApiError>>,
    FetchFn: FnMut() -> Fut,
    RenderFn: Fn(&T),
{
    let seq = RequestSeq::new();
    loop {
        let ticket = seq.begin();
        let spinner = ui::new_spinner(catalog.t("fallback.loading"));

        let result = fetch().await;
        spinner.finish_and_clear();

        // Only the holder of the newest ticket may commit. Fetches are
        // awaited one at a time here, so this ticket stays current; the
        // guard is the invariant any overlapping attempt must satisfy.
        let state = if seq.is_current(ticket) {
            match result {
                Ok(value) => PageState::Ready(value),
                Err(e) => PageState::Error(e),
            }
        } else {
            PageState::Loading
        };

        match state {
            PageState::Ready(value) => {
                render(&value);
                return Ok(());
            }
            PageState::Error(error) => {
                if !prompt_retry(catalog, &error) {
                    return Ok(());
                }
            }
            // A superseded fetch: loop again with a fresh ticket.
            PageState::Loading => continue,
        }
    }
}

fn prompt_retry(catalog: &Catalog, error: &ApiError) -> bool {
    eprintln!(
        "{}",
        ui::style_text(
            &format!("{}: {error}", catalog.t("page.error")),
            ui::StyleType::Error
        )
    );
    eprintln!(
        "{}",
        ui::style_text(catalog.t("page.retry_prompt"), ui::StyleType::Subtle)
    );

    // Without an interactive terminal there is nobody to press 'r'.
    match Term::stderr().read_char() {
        Ok('r') | Ok('R') => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn test_drive_renders_once_on_success() {
        let catalog = Catalog::load("en");
        let rendered = AtomicUsize::new(0);

        drive(
            &catalog,
            || async { Ok::<u32, ApiError>(42) },
            |value| {
                assert_eq!(*value, 42);
                rendered.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await
        .unwrap();

        assert_eq!(rendered.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_drive_reports_error_without_rendering() {
        let catalog = Catalog::load("en");
        let rendered = AtomicUsize::new(0);

        // Without an interactive terminal the retry prompt declines, so
        // the error ends the page cleanly after a single fetch.
        drive(
            &catalog,
            || async { Err::<u32, ApiError>(ApiError::Transport) },
            |_| {
                rendered.fetch_add(1, Ordering::SeqCst);
            },
        )
        .await
        .unwrap();

        assert_eq!(rendered.load(Ordering::SeqCst), 0);
    }
}
